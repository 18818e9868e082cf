//! Input Contract
//!
//! The simulation never polls a keyboard. It consumes edge-triggered signals
//! through [`InputSource`]: "key just pressed", "key held for N ticks" and
//! "characters typed this tick". [`InputFrame`] is the serializable snapshot
//! of those signals for one tick, and [`KeyTracker`] builds frames from
//! level-triggered "keys currently down" polling on the host side.

use serde::{Deserialize, Serialize};

// =============================================================================
// KEYS
// =============================================================================

/// Keys the game reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Key {
    /// Move up (W)
    Up = 0,
    /// Move down (S)
    Down = 1,
    /// Move left (A)
    Left = 2,
    /// Move right (D)
    Right = 3,
    /// Start / restart
    Space = 4,
    /// Confirm name
    Enter = 5,
    /// Delete last name character
    Backspace = 6,
}

impl Key {
    /// Number of tracked keys.
    pub const COUNT: usize = 7;

    /// All keys in index order.
    pub const ALL: [Key; Key::COUNT] = [
        Key::Up,
        Key::Down,
        Key::Left,
        Key::Right,
        Key::Space,
        Key::Enter,
        Key::Backspace,
    ];

    /// Slot in per-key arrays.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

// =============================================================================
// INPUT SOURCE
// =============================================================================

/// Edge-triggered input signals for one tick.
pub trait InputSource {
    /// True only on the first tick a key is down.
    fn just_pressed(&self, key: Key) -> bool {
        self.held_duration(key) == 1
    }

    /// Consecutive ticks the key has been down, including this one (0 = up).
    fn held_duration(&self, key: Key) -> u32;

    /// Characters typed this tick (possibly empty).
    fn typed_chars(&self) -> &str;
}

/// True when a held key should fire: on the first tick, then after `delay`
/// ticks every `interval` ticks.
#[inline]
pub fn repeating_key_pressed(duration: u32, delay: u32, interval: u32) -> bool {
    if duration == 1 {
        return true;
    }
    duration >= delay && interval > 0 && (duration - delay) % interval == 0
}

// =============================================================================
// INPUT FRAME
// =============================================================================

/// Input snapshot for a single tick.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFrame {
    /// Held duration per key, indexed by [`Key::index`].
    pub held: [u32; Key::COUNT],
    /// Characters typed this tick.
    pub typed: String,
}

impl InputFrame {
    /// Create an idle frame (nothing held, nothing typed).
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame where each given key was pressed this tick.
    pub fn pressed(keys: &[Key]) -> Self {
        let mut frame = Self::new();
        for key in keys {
            frame.held[key.index()] = 1;
        }
        frame
    }

    /// Frame carrying only typed text.
    pub fn typed(text: &str) -> Self {
        Self {
            typed: text.to_string(),
            ..Self::default()
        }
    }

    /// Set the held duration for a key.
    pub fn with_held(mut self, key: Key, ticks: u32) -> Self {
        self.held[key.index()] = ticks;
        self
    }

    /// Check if this is an idle frame (no input).
    pub fn is_idle(&self) -> bool {
        self.held.iter().all(|d| *d == 0) && self.typed.is_empty()
    }
}

impl InputSource for InputFrame {
    #[inline]
    fn held_duration(&self, key: Key) -> u32 {
        self.held[key.index()]
    }

    #[inline]
    fn typed_chars(&self) -> &str {
        &self.typed
    }
}

// =============================================================================
// KEY TRACKER
// =============================================================================

/// Turns level-triggered polling into [`InputFrame`]s.
///
/// Feed it the set of keys currently down once per tick; it counts how long
/// each has been held and resets the count on release.
#[derive(Clone, Debug, Default)]
pub struct KeyTracker {
    held: [u32; Key::COUNT],
}

impl KeyTracker {
    /// Create a tracker with every key up.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one tick and produce that tick's frame.
    pub fn advance(&mut self, keys_down: &[Key], typed: &str) -> InputFrame {
        let mut down = [false; Key::COUNT];
        for key in keys_down {
            down[key.index()] = true;
        }

        for (held, is_down) in self.held.iter_mut().zip(down) {
            *held = if is_down { held.saturating_add(1) } else { 0 };
        }

        InputFrame {
            held: self.held,
            typed: typed.to_string(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
