//! Arena Walls
//!
//! The play area is bounded by four walls whose inner faces advance toward
//! the centre. `left_x`/`top_y` are the outer faces of the left/top walls
//! (their inner faces sit one wall thickness further in); `right_x`/`bottom_y`
//! are the inner faces of the right/bottom walls.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;

/// Shrinking wall rectangle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    /// Left wall position.
    pub left_x: f64,
    /// Right wall position.
    pub right_x: f64,
    /// Top wall position.
    pub top_y: f64,
    /// Bottom wall position.
    pub bottom_y: f64,
    /// Smallest allowed `right_x - left_x`.
    min_span_x: f64,
    /// Smallest allowed `bottom_y - top_y`.
    min_span_y: f64,
}

impl Arena {
    /// Spawn the walls flush with the screen edges.
    pub fn new(config: &GameConfig) -> Self {
        let right_x = (config.screen_width - config.wall_width) as f64;
        let bottom_y = (config.screen_height - config.wall_height) as f64;

        // Tightest arena in which a perfectly placed actor still fits
        let min_span_x = ((config.wall_width + config.player_width) as f64).min(right_x);
        let min_span_y = ((config.wall_height + config.player_height) as f64).min(bottom_y);

        Self {
            left_x: 0.0,
            right_x,
            top_y: 0.0,
            bottom_y,
            min_span_x,
            min_span_y,
        }
    }

    /// Move every edge inward by `rate`.
    ///
    /// Opposite edges stop once their span reaches the floor; the remaining
    /// distance is split evenly so the arena stays centred. Returns true if
    /// any edge moved.
    pub fn shrink(&mut self, rate: f64) -> bool {
        if !(rate > 0.0) {
            return false;
        }

        let moved_x = shrink_axis(&mut self.left_x, &mut self.right_x, rate, self.min_span_x);
        let moved_y = shrink_axis(&mut self.top_y, &mut self.bottom_y, rate, self.min_span_y);
        moved_x || moved_y
    }

    /// Current horizontal span.
    #[inline]
    pub fn span_x(&self) -> f64 {
        self.right_x - self.left_x
    }

    /// Current vertical span.
    #[inline]
    pub fn span_y(&self) -> f64 {
        self.bottom_y - self.top_y
    }

    /// True once both axes sit at their floor.
    pub fn at_floor(&self) -> bool {
        self.span_x() <= self.min_span_x && self.span_y() <= self.min_span_y
    }

    /// Edges crossed or met. Never true for arenas built by [`Arena::new`].
    pub fn is_degenerate(&self) -> bool {
        self.left_x >= self.right_x || self.top_y >= self.bottom_y
    }
}

fn shrink_axis(lo: &mut f64, hi: &mut f64, rate: f64, min_span: f64) -> bool {
    let slack = (*hi - *lo) - min_span;
    if slack <= 0.0 {
        return false;
    }
    let step = rate.min(slack / 2.0);
    *lo += step;
    *hi -= step;
    true
}
