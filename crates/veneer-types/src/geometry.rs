//! Integer rectangles used for item geometry, hit testing and invalidation.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in pixels.
///
/// Width and height are signed so that degenerate results of the position
/// algebra stay representable; [`Rect::is_empty`] treats any non-positive
/// extent as empty. Edges saturate at the `i32` limits, so a rectangle
/// placed at an extreme coordinate is clipped rather than wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.w)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.h)
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Check if a point is inside this rectangle (right/bottom exclusive).
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Check if this rectangle overlaps another with non-zero area.
    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Overlapping region, if any.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if left < right && top < bottom {
            Some(Rect::new(left, top, right.saturating_sub(left), bottom.saturating_sub(top)))
        } else {
            None
        }
    }

    /// Bounding box of both rectangles. Empty rectangles are ignored.
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let left = self.x.min(other.x);
        let top = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(left, top, right.saturating_sub(left), bottom.saturating_sub(top))
    }

    /// Shift by the given offsets.
    pub fn offset(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(self.x.saturating_add(dx), self.y.saturating_add(dy), self.w, self.h)
    }

    /// Shrink by the given amounts on each side.
    pub fn inset(&self, left: i32, top: i32, right: i32, bottom: i32) -> Rect {
        Rect::new(
            self.x.saturating_add(left),
            self.y.saturating_add(top),
            self.w.saturating_sub(left).saturating_sub(right).max(0),
            self.h.saturating_sub(top).saturating_sub(bottom).max(0),
        )
    }

    /// Move this rectangle inside `bounds`, shrinking it if it is larger.
    pub fn clamp_within(&self, bounds: &Rect) -> Rect {
        let w = self.w.min(bounds.w);
        let h = self.h.min(bounds.h);
        let x = self.x.clamp(bounds.x, bounds.right().saturating_sub(w).max(bounds.x));
        let y = self.y.clamp(bounds.y, bounds.bottom().saturating_sub(h).max(bounds.y));
        Rect::new(x, y, w, h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_right_exclusive() {
        let r = Rect::new(10, 10, 20, 20);
        assert!(r.contains(10, 10));
        assert!(r.contains(29, 29));
        assert!(!r.contains(30, 10));
        assert!(!r.contains(10, 30));
    }

    #[test]
    fn intersection_overlap() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        assert_eq!(a.intersection(&b), Some(Rect::new(5, 5, 5, 5)));
        assert!(a.intersects(&b));
    }

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(10, 0, 10, 10);
        assert!(!a.intersects(&b));
        assert_eq!(a.intersection(&b), None);
    }

    #[test]
    fn empty_never_intersects() {
        let a = Rect::new(0, 0, 0, 10);
        assert!(!a.intersects(&Rect::new(0, 0, 100, 100)));
    }

    #[test]
    fn union_ignores_empty() {
        let a = Rect::new(5, 5, 10, 10);
        assert_eq!(a.union(&Rect::ZERO), a);
        assert_eq!(
            a.union(&Rect::new(0, 0, 2, 2)),
            Rect::new(0, 0, 15, 15)
        );
    }

    #[test]
    fn clamp_within_moves_and_shrinks() {
        let screen = Rect::new(0, 0, 800, 600);
        let r = Rect::new(700, 550, 300, 100);
        assert_eq!(r.clamp_within(&screen), Rect::new(500, 500, 300, 100));
        let big = Rect::new(-50, -50, 1000, 700);
        assert_eq!(big.clamp_within(&screen), screen);
    }

    #[test]
    fn inset_never_negative() {
        let r = Rect::new(0, 0, 4, 4).inset(3, 3, 3, 3);
        assert_eq!((r.w, r.h), (0, 0));
    }

    #[test]
    fn extreme_edges_saturate() {
        let r = Rect::new(i32::MAX - 600, 0, 2000, 10);
        assert_eq!(r.right(), i32::MAX);
        assert_eq!(r.offset(1000, 0).x, i32::MAX);
        assert!(r.contains(i32::MAX - 1, 5));
        let wide = Rect::new(i32::MIN, 0, i32::MAX, 10);
        let visible = wide.intersection(&Rect::new(-10, 0, 20, 10));
        assert_eq!(visible, Some(Rect::new(-10, 0, 9, 10)));
        assert_eq!(
            Rect::new(i32::MAX - 5, 0, 20, 20).clamp_within(&Rect::new(i32::MAX - 10, 0, 100, 100)),
            Rect::new(i32::MAX - 10, 0, 20, 20)
        );
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        fn rect() -> impl Strategy<Value = Rect> {
            (any::<i32>(), any::<i32>(), any::<i32>(), any::<i32>())
                .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
        }

        proptest! {
            #[test]
            fn arithmetic_never_overflows(a in rect(), b in rect(), dx in any::<i32>(), dy in any::<i32>()) {
                let _ = a.union(&b);
                let _ = a.offset(dx, dy).inset(dx, dy, dx, dy);
                let _ = a.clamp_within(&b);
                if let Some(i) = a.intersection(&b) {
                    prop_assert!(!i.is_empty());
                    prop_assert!(a.intersects(&b));
                }
            }

            #[test]
            fn intersection_lies_in_both(a in rect(), b in rect()) {
                if let Some(i) = a.intersection(&b) {
                    prop_assert!(i.x >= a.x && i.x >= b.x);
                    prop_assert!(i.right() <= a.right() && i.right() <= b.right());
                    prop_assert!(i.bottom() <= a.bottom() && i.bottom() <= b.bottom());
                }
            }
        }
    }
}
