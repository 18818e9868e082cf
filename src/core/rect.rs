//! Axis-Aligned Bounding Boxes
//!
//! Integer rectangles used as collision proxies for actors.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle with corners `(x1, y1)` (top-left) and `(x2, y2)`
/// (bottom-right). Screen coordinates: y grows downward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x1: i32,
    /// Top edge
    pub y1: i32,
    /// Right edge
    pub x2: i32,
    /// Bottom edge
    pub y2: i32,
}

impl Rect {
    /// Create from raw corners.
    #[inline]
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Create from a top-left origin and a size.
    #[inline]
    pub const fn from_origin_size(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x + width,
            y2: y + height,
        }
    }

    /// Width (may be zero for collapsed boxes).
    #[inline]
    pub const fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    /// Height (may be zero for collapsed boxes).
    #[inline]
    pub const fn height(&self) -> i32 {
        self.y2 - self.y1
    }

    /// Shrink the box by `amount` on every side.
    ///
    /// An inset larger than half the size collapses that axis onto its
    /// centre line instead of inverting the box.
    pub fn inset(&self, amount: i32) -> Self {
        let (x1, x2) = inset_axis(self.x1, self.x2, amount);
        let (y1, y2) = inset_axis(self.y1, self.y2, amount);
        Self { x1, y1, x2, y2 }
    }

    /// Open-interval overlap test. Touching edges do not overlap.
    ///
    /// Symmetric: `a.overlaps(&b) == b.overlaps(&a)`.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x1 < other.x2 && self.x2 > other.x1 && self.y1 < other.y2 && self.y2 > other.y1
    }
}

fn inset_axis(lo: i32, hi: i32, amount: i32) -> (i32, i32) {
    let (lo, hi) = (lo + amount, hi - amount);
    if lo <= hi {
        (lo, hi)
    } else {
        let mid = lo + (hi - lo) / 2;
        (mid, mid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_from_origin_size() {
        let r = Rect::from_origin_size(100, 100, 100, 100);
        assert_eq!(r, Rect::new(100, 100, 200, 200));
        assert_eq!(r.width(), 100);
        assert_eq!(r.height(), 100);
    }

    #[test]
    fn test_edge_touching_is_not_overlap() {
        let a = Rect::from_origin_size(0, 0, 100, 100);
        let b = Rect::from_origin_size(100, 0, 100, 100);
        assert!(!a.overlaps(&b));

        let c = Rect::from_origin_size(99, 0, 100, 100);
        assert!(a.overlaps(&c));
    }

    #[test]
    fn test_inset() {
        let r = Rect::from_origin_size(300, 300, 100, 100);
        assert_eq!(r.inset(25), Rect::new(325, 325, 375, 375));

        // Exactly half collapses to the centre point
        assert_eq!(r.inset(50), Rect::new(350, 350, 350, 350));

        // Too large never inverts
        let collapsed = r.inset(80);
        assert!(collapsed.x1 <= collapsed.x2);
        assert!(collapsed.y1 <= collapsed.y2);
    }

    #[test]
    fn test_collapsed_box_still_hit_by_enclosing_box() {
        let point = Rect::from_origin_size(300, 300, 100, 100).inset(50);
        let player = Rect::from_origin_size(300, 300, 100, 100);
        assert!(player.overlaps(&point));

        let far = Rect::from_origin_size(0, 0, 100, 100);
        assert!(!far.overlaps(&point));
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(
            ax in -1000i32..1000, ay in -1000i32..1000, aw in 0i32..300, ah in 0i32..300,
            bx in -1000i32..1000, by in -1000i32..1000, bw in 0i32..300, bh in 0i32..300,
        ) {
            let a = Rect::from_origin_size(ax, ay, aw, ah);
            let b = Rect::from_origin_size(bx, by, bw, bh);
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn prop_inset_never_inverts(
            x in -1000i32..1000, y in -1000i32..1000,
            w in 0i32..300, h in 0i32..300, d in 0i32..400,
        ) {
            let r = Rect::from_origin_size(x, y, w, h).inset(d);
            prop_assert!(r.x1 <= r.x2);
            prop_assert!(r.y1 <= r.y2);
        }
    }
}
