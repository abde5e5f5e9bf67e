//! Property-based invariant tests for the geometry primitives (Rect, Sides).
//!
//! 1. Intersection is commutative.
//! 2. Intersection result fits within both inputs.
//! 3. Contains agrees with intersection.
//! 4. Inner margin shrinks dimensions and stays inside the outer rect.
//! 5. `clamp_point` lands inside any non-empty rect and fixes inside points.
//! 6. No panics on extreme u16 values.

use caret_core::geometry::{Rect, Sides};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (any::<u16>(), any::<u16>(), any::<u16>(), any::<u16>())
        .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

fn small_rect_strategy() -> impl Strategy<Value = Rect> {
    (0u16..=500, 0u16..=500, 0u16..=500, 0u16..=500).prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

fn small_sides_strategy() -> impl Strategy<Value = Sides> {
    (0u16..=50, 0u16..=50, 0u16..=50, 0u16..=50).prop_map(|(t, r, b, l)| Sides::new(t, r, b, l))
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Intersection is commutative
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn intersection_commutative(a in small_rect_strategy(), b in small_rect_strategy()) {
        prop_assert_eq!(a.intersection(&b), b.intersection(&a));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Intersection result fits within both inputs
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn intersection_within_both(a in small_rect_strategy(), b in small_rect_strategy()) {
        if let Some(i) = a.intersection_opt(&b) {
            prop_assert!(i.x >= a.x && i.x >= b.x);
            prop_assert!(i.y >= a.y && i.y >= b.y);
            prop_assert!(i.right() <= a.right() && i.right() <= b.right());
            prop_assert!(i.bottom() <= a.bottom() && i.bottom() <= b.bottom());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Contains agrees with intersection
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn contains_agrees_with_intersection(
        a in small_rect_strategy(),
        b in small_rect_strategy(),
        px in 0u16..=1000,
        py in 0u16..=1000,
    ) {
        let both = a.contains(px, py) && b.contains(px, py);
        prop_assert_eq!(both, a.intersection(&b).contains(px, py));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Inner margin shrinks
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn inner_shrinks(r in small_rect_strategy(), margin in small_sides_strategy()) {
        let inner = r.inner(margin);
        prop_assert!(inner.width <= r.width);
        prop_assert!(inner.height <= r.height);
        if !inner.is_empty() {
            prop_assert!(r.contains(inner.x, inner.y));
            prop_assert!(inner.right() <= r.right());
            prop_assert!(inner.bottom() <= r.bottom());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. clamp_point
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn clamp_point_lands_inside(r in small_rect_strategy(), px in any::<u16>(), py in any::<u16>()) {
        let (cx, cy) = r.clamp_point(px, py);
        if r.is_empty() {
            prop_assert_eq!((cx, cy), r.origin());
        } else {
            prop_assert!(r.contains(cx, cy));
            if r.contains(px, py) {
                prop_assert_eq!((cx, cy), (px, py));
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. No panics on extreme values
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn extreme_values_do_not_panic(a in rect_strategy(), b in rect_strategy(), m in any::<u16>()) {
        let _ = a.intersection(&b);
        let _ = a.inner(Sides::all(m));
        let _ = a.clamp_point(m, m);
        let _ = a.area();
        prop_assert!(a.right() >= a.x);
        prop_assert!(a.bottom() >= a.y);
    }
}
