//! Core deterministic primitives.
//!
//! Everything the simulation needs that is not game-specific: a seeded
//! random source, integer bounding boxes and state hashing.

pub mod hash;
pub mod rect;
pub mod rng;

// Re-export core types
pub use hash::{compute_state_hash, StateHash, StateHasher};
pub use rect::Rect;
pub use rng::{DeterministicRng, RandomSource, ScriptedRandom};
