//! # Closing Walls
//!
//! Deterministic core for a single-player survival game: the avatar dodges a
//! closing wall and wandering NPCs while the clock runs, and a backend keeps
//! a leaderboard of high scores.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       CLOSING WALLS                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── rng.rs      - Seeded Xorshift128+ PRNG                  │
//! │  ├── rect.rs     - Axis-aligned bounding boxes               │
//! │  └── hash.rs     - State hashing for replay checks           │
//! │                                                              │
//! │  game/           - Game logic (deterministic)                │
//! │  ├── input.rs    - Edge-triggered input contract             │
//! │  ├── arena.rs    - Shrinking wall rectangle                  │
//! │  ├── actor.rs    - Player / NPC / remote actors              │
//! │  ├── collision.rs- Wall, NPC and player collisions           │
//! │  ├── state.rs    - Modes, run state, owned sub-models        │
//! │  ├── tick.rs     - Per-tick state machine                    │
//! │  └── events.rs   - Transition and run events                 │
//! │                                                              │
//! │  network/        - I/O (non-deterministic)                   │
//! │  ├── protocol.rs - Backend and roster message types          │
//! │  ├── leaderboard.rs - HTTP leaderboard client                │
//! │  ├── remote.rs   - Remote roster feed (inert by default)     │
//! │  └── session.rs  - Host driver: ticks + async fetches        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism
//!
//! `core/` and `game/` never touch the clock, the network or a global RNG.
//! Given the same [`config::GameConfig`], seed and input frames, a run
//! replays to the same state hash.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod game;
pub mod network;

// Re-export commonly used types
pub use crate::config::{AppConfig, ConfigError, GameConfig};
pub use crate::core::rng::{DeterministicRng, RandomSource};
pub use crate::game::input::{InputFrame, InputSource, Key, KeyTracker};
pub use crate::game::state::{GameState, Mode};
pub use crate::game::tick::{tick, TickResult};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Simulation tick rate (Hz)
pub const TICK_RATE: u32 = 60;
