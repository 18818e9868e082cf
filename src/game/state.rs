//! Game State Definitions
//!
//! The state machine exclusively owns the arena, every actor and the run
//! state. Nothing outside `game/` mutates them except through
//! [`GameState::apply_remote_players`], which the host calls between ticks.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::GameConfig;
use crate::core::hash::{compute_state_hash, StateHash, StateHasher};
use crate::core::rng::{DeterministicRng, RandomSource};
use crate::game::actor::{spawn_npc, Actor, ActorRole};
use crate::game::arena::Arena;

// =============================================================================
// MODE
// =============================================================================

/// Top-level game mode. Exactly one is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Mode {
    /// "Press space" screen
    #[default]
    Title = 0,
    /// Typing a player name
    NameEntry = 1,
    /// Active run
    Playing = 2,
    /// Run ended, leaderboard shown
    GameOver = 3,
}

// =============================================================================
// RUN STATE
// =============================================================================

/// Per-process run bookkeeping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    /// Current mode.
    pub mode: Mode,
    /// Seconds spent in Playing this run.
    pub elapsed_seconds: f64,
    /// NPC speed scale, in [1.0, max_speed_multiplier].
    pub speed_multiplier: f64,
    /// Text typed during name entry.
    pub name_buffer: String,
    /// Ticks spent in name entry (drives the cursor blink).
    pub blink_counter: u32,
}

impl Default for RunState {
    fn default() -> Self {
        Self {
            mode: Mode::Title,
            elapsed_seconds: 0.0,
            speed_multiplier: 1.0,
            name_buffer: String::new(),
            blink_counter: 0,
        }
    }
}

impl RunState {
    /// Name as shown for the player: the buffer without surrounding whitespace.
    pub fn player_name(&self) -> &str {
        self.name_buffer.trim()
    }

    /// Cursor blink phase: visible for the first half of every second.
    pub fn cursor_visible(&self, tick_rate: u32) -> bool {
        let period = tick_rate.max(2);
        self.blink_counter % period < period / 2
    }
}

/// Keep only the last `max_lines` newline-delimited segments.
pub fn truncate_lines(buffer: &mut String, max_lines: usize) {
    let lines: Vec<&str> = buffer.split('\n').collect();
    if lines.len() > max_lines {
        *buffer = lines[lines.len() - max_lines..].join("\n");
    }
}

// =============================================================================
// GAME STATE
// =============================================================================

/// Complete simulation state.
///
/// Generic over the random source so tests can script NPC behaviour; the
/// default is the seeded [`DeterministicRng`].
#[derive(Clone, Debug)]
pub struct GameState<R = DeterministicRng> {
    /// Constants this state was built with
    pub config: GameConfig,

    /// RNG seed (for verification)
    pub seed: u64,

    /// Random source for spawns and NPC steps
    pub rng: R,

    /// Mode, timers and name buffer
    pub run: RunState,

    /// Wall rectangle
    pub arena: Arena,

    /// Local player
    pub player: Actor,

    /// NPCs, rebuilt on every run
    pub npcs: Vec<Actor>,

    /// Remote players, replaced wholesale by the host between ticks
    pub remote_players: Vec<Actor>,

    /// Playing ticks this run
    pub tick: u32,

    /// Best score across runs in this process
    pub best_score: u32,

    /// Runs started in this process
    pub runs_started: u32,

    /// Times GameOver has been entered
    pub game_over_entries: u32,
}

impl GameState<DeterministicRng> {
    /// Create a state seeded with `seed`, in Title mode with a run prepared.
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, seed, DeterministicRng::new(seed))
    }
}

impl<R: RandomSource> GameState<R> {
    /// Create a state around an explicit random source.
    pub fn with_rng(config: GameConfig, seed: u64, rng: R) -> Self {
        let arena = Arena::new(&config);
        let player = Actor::player("", &config);
        let mut state = Self {
            config,
            seed,
            rng,
            run: RunState::default(),
            arena,
            player,
            npcs: Vec::new(),
            remote_players: Vec::new(),
            tick: 0,
            best_score: 0,
            runs_started: 0,
            game_over_entries: 0,
        };
        state.reset_run();
        state
    }

    /// Rebuild arena, player, NPCs and run timers for a fresh run.
    ///
    /// The single initialisation routine: used at construction and on every
    /// new run. The name buffer and mode are left alone.
    pub fn reset_run(&mut self) {
        self.arena = Arena::new(&self.config);
        self.player = Actor::player(self.run.player_name(), &self.config);

        self.npcs = (1..=self.config.npc_count)
            .map(|id| spawn_npc(id, &format!("NPC{id}"), &mut self.rng, &self.config))
            .collect();

        self.run.elapsed_seconds = 0.0;
        self.run.speed_multiplier = 1.0;
        self.tick = 0;

        debug!(
            "Run reset: player at ({}, {}), {} npcs",
            self.player.x,
            self.player.y,
            self.npcs.len()
        );
    }
}

impl<R> GameState<R> {
    /// Current mode.
    #[inline]
    pub fn mode(&self) -> Mode {
        self.run.mode
    }

    /// Replace the remote player list between ticks.
    ///
    /// Entries not tagged as remote players are dropped.
    pub fn apply_remote_players(&mut self, players: Vec<Actor>) {
        let before = players.len();
        self.remote_players = players
            .into_iter()
            .filter(|actor| actor.role == ActorRole::RemotePlayer)
            .collect();

        if self.remote_players.len() != before {
            warn!(
                "Dropped {} roster entries not tagged as remote players",
                before - self.remote_players.len()
            );
        }
    }

    /// Whole seconds survived this run.
    pub fn score(&self) -> u32 {
        self.tick / self.config.tick_rate
    }

    /// Compute hash of current state for replay verification.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.tick, self.seed, |hasher| {
            hasher.update_u8(self.run.mode as u8);
            hasher.update_f64(self.run.elapsed_seconds);
            hasher.update_f64(self.run.speed_multiplier);
            hasher.update_str(&self.run.name_buffer);
            hasher.update_u32(self.run.blink_counter);

            hasher.update_f64(self.arena.left_x);
            hasher.update_f64(self.arena.right_x);
            hasher.update_f64(self.arena.top_y);
            hasher.update_f64(self.arena.bottom_y);

            hash_actor(hasher, &self.player);
            hasher.update_u32(self.npcs.len() as u32);
            for npc in &self.npcs {
                hash_actor(hasher, npc);
            }
            hasher.update_u32(self.remote_players.len() as u32);
            for remote in &self.remote_players {
                hash_actor(hasher, remote);
            }

            hasher.update_u32(self.best_score);
            hasher.update_u32(self.game_over_entries);
        })
    }
}

fn hash_actor(hasher: &mut StateHasher, actor: &Actor) {
    hasher.update_u8(actor.role as u8);
    hasher.update_u32(actor.id);
    hasher.update_i32(actor.x);
    hasher.update_i32(actor.y);
    hasher.update_str(&actor.name);
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::ScriptedRandom;

    #[test]
    fn test_new_state_is_title_with_run_ready() {
        let state = GameState::new(GameConfig::default(), 12345);

        assert_eq!(state.mode(), Mode::Title);
        assert_eq!((state.player.x, state.player.y), (100, 100));
        assert_eq!(state.npcs.len(), 3);
        assert_eq!(state.run.speed_multiplier, 1.0);
        assert_eq!(state.run.elapsed_seconds, 0.0);
        assert!(state.remote_players.is_empty());

        let names: Vec<_> = state.npcs.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["NPC1", "NPC2", "NPC3"]);
    }

    #[test]
    fn test_spawn_determinism() {
        let state1 = GameState::new(GameConfig::default(), 777);
        let state2 = GameState::new(GameConfig::default(), 777);

        assert_eq!(state1.npcs, state2.npcs);
        assert_eq!(state1.compute_hash(), state2.compute_hash());
    }

    #[test]
    fn test_scripted_spawns() {
        let rng = ScriptedRandom::new(vec![250, 250, 0, 0, 439, 439]);
        let state = GameState::with_rng(GameConfig::default(), 0, rng);

        let positions: Vec<_> = state.npcs.iter().map(|n| (n.x, n.y)).collect();
        assert_eq!(positions, vec![(300, 300), (50, 50), (489, 489)]);
    }

    #[test]
    fn test_reset_rebuilds_everything() {
        let mut state = GameState::new(GameConfig::default(), 99);
        let first_npcs = state.npcs.clone();

        state.player.x = 400;
        state.arena.shrink(20.0);
        state.run.speed_multiplier = 4.2;
        state.run.elapsed_seconds = 12.0;
        state.run.name_buffer = "Ann".into();
        state.tick = 720;

        state.reset_run();

        assert_eq!((state.player.x, state.player.y), (100, 100));
        assert_eq!(state.player.name, "Ann");
        assert_eq!(state.arena, Arena::new(&state.config));
        assert_eq!(state.run.speed_multiplier, 1.0);
        assert_eq!(state.run.elapsed_seconds, 0.0);
        assert_eq!(state.tick, 0);
        assert_eq!(state.npcs.len(), 3);
        assert_ne!(state.npcs, first_npcs, "fresh spawns expected");
        assert_eq!(state.run.name_buffer, "Ann");
    }

    #[test]
    fn test_truncate_lines_keeps_last_segments() {
        let mut buffer = (0..12).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        truncate_lines(&mut buffer, 10);
        assert_eq!(buffer, "2\n3\n4\n5\n6\n7\n8\n9\n10\n11");

        let mut short = String::from("Ann");
        truncate_lines(&mut short, 10);
        assert_eq!(short, "Ann");
    }

    #[test]
    fn test_cursor_blink() {
        let mut run = RunState::default();
        run.blink_counter = 0;
        assert!(run.cursor_visible(60));
        run.blink_counter = 29;
        assert!(run.cursor_visible(60));
        run.blink_counter = 30;
        assert!(!run.cursor_visible(60));
        run.blink_counter = 60;
        assert!(run.cursor_visible(60));
    }

    #[test]
    fn test_apply_remote_players_replaces_and_filters() {
        let mut state = GameState::new(GameConfig::default(), 1);
        state.apply_remote_players(vec![Actor::remote(1, "Bob", 400, 400)]);
        assert_eq!(state.remote_players.len(), 1);

        let stray = Actor::player("me", &state.config);
        state.apply_remote_players(vec![Actor::remote(2, "Cy", 10, 10), stray]);
        assert_eq!(state.remote_players.len(), 1);
        assert_eq!(state.remote_players[0].id, 2);
    }

    #[test]
    fn test_score_counts_whole_seconds() {
        let mut state = GameState::new(GameConfig::default(), 1);
        state.tick = 59;
        assert_eq!(state.score(), 0);
        state.tick = 60;
        assert_eq!(state.score(), 1);
        state.tick = 150;
        assert_eq!(state.score(), 2);
    }

    #[test]
    fn test_hash_changes_with_state() {
        let mut state = GameState::new(GameConfig::default(), 5);
        let before = state.compute_hash();
        state.player.x += 25;
        assert_ne!(before, state.compute_hash());
    }
}
