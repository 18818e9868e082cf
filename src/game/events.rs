//! Game Events
//!
//! Events produced by a tick. The host reacts to them (logging, leaderboard
//! fetches) without ever reaching into the simulation mid-tick.

use serde::{Deserialize, Serialize};

use crate::game::collision::CollisionKind;
use crate::game::state::Mode;

/// Summary of a finished run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Name typed at name entry.
    pub name: String,
    /// Seconds survived.
    pub elapsed_seconds: f64,
    /// Whole seconds survived (the high-score unit).
    pub score: u32,
    /// Playing ticks survived.
    pub ticks: u32,
    /// What ended the run.
    pub cause: CollisionKind,
}

/// Game event data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// Mode changed.
    ModeChanged {
        /// Previous mode.
        from: Mode,
        /// New mode.
        to: Mode,
    },

    /// A fresh run was initialised and play began.
    RunStarted {
        /// Player name for the run.
        name: String,
        /// NPCs spawned.
        npc_count: u32,
    },

    /// The run ended in a collision. Fires once per GameOver entry.
    RunEnded(RunSummary),
}

impl GameEvent {
    /// Create a mode change event.
    pub fn mode_changed(from: Mode, to: Mode) -> Self {
        Self::ModeChanged { from, to }
    }

    /// Is this the end-of-run event?
    pub fn is_run_end(&self) -> bool {
        matches!(self, GameEvent::RunEnded(_))
    }
}
