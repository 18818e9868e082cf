//! Game Logic Module
//!
//! All game simulation code. Deterministic given a seed and an input sequence.
//!
//! ## Module Structure
//!
//! - `input`: Edge-triggered input contract and key tracking
//! - `arena`: Shrinking wall rectangle
//! - `actor`: Player, NPC and remote player records, NPC random walk
//! - `collision`: AABB tests that end a run
//! - `state`: Mode, run state and the full game state
//! - `tick`: Per-frame state machine
//! - `events`: Game events for the host and for replay verification

pub mod input;
pub mod arena;
pub mod actor;
pub mod collision;
pub mod state;
pub mod tick;
pub mod events;

// Re-export key types
pub use input::{InputFrame, InputSource, Key, KeyTracker};
pub use arena::Arena;
pub use actor::{Actor, ActorRole};
pub use collision::CollisionKind;
pub use state::{GameState, Mode, RunState};
pub use tick::{replay_run, tick, TickResult};
pub use events::{GameEvent, RunSummary};
