//! Property-based invariant tests for geometry sanitizing and the tag model.
//!
//! 1. Sanitized extents are always finite and non-negative.
//! 2. Sanitizing is idempotent.
//! 3. Sanitizing never changes a value that was already valid.
//! 4. Rect::contains agrees with its edges.
//! 5. Content fingerprints depend only on content.

use proptest::prelude::*;
use tagflow_core::geometry::{Point, Rect, Size, sanitize_extent};
use tagflow_core::tag::{Tag, TagId};

// ── Helpers ─────────────────────────────────────────────────────────────

fn any_extent() -> impl Strategy<Value = f64> {
    prop_oneof![
        any::<f64>(),
        Just(f64::NAN),
        Just(f64::INFINITY),
        Just(f64::NEG_INFINITY),
        -1e6f64..1e6,
    ]
}

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (0.0f64..500.0, 0.0f64..500.0, 0.0f64..500.0, 0.0f64..500.0)
        .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

// ═════════════════════════════════════════════════════════════════════════
// 1-3. Sanitizing
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn sanitized_extent_is_finite_and_non_negative(v in any_extent()) {
        let s = sanitize_extent(v);
        prop_assert!(s.is_finite(), "{v} sanitized to non-finite {s}");
        prop_assert!(s >= 0.0, "{v} sanitized to negative {s}");
    }

    #[test]
    fn sanitize_is_idempotent(v in any_extent()) {
        let once = sanitize_extent(v);
        prop_assert_eq!(sanitize_extent(once), once);
    }

    #[test]
    fn sanitize_preserves_valid_values(v in 0.0f64..1e12) {
        prop_assert_eq!(sanitize_extent(v), v);
    }

    #[test]
    fn sanitized_size_is_valid(w in any_extent(), h in any_extent()) {
        let s = Size::new(w, h).sanitized();
        prop_assert!(s.width.is_finite() && s.width >= 0.0);
        prop_assert!(s.height.is_finite() && s.height >= 0.0);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Containment
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn contains_agrees_with_edges(r in rect_strategy(), x in -10.0f64..1010.0, y in -10.0f64..1010.0) {
        let expected = x >= r.x && x < r.right() && y >= r.y && y < r.bottom();
        prop_assert_eq!(r.contains(Point::new(x, y)), expected);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Fingerprints
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn fingerprint_independent_of_identity(
        a in any::<u64>(),
        b in any::<u64>(),
        name in "[a-z ]{0,16}",
        count in any::<u64>(),
    ) {
        let ta = Tag::new(TagId::new(a), name.clone()).with_count(count);
        let tb = Tag::new(TagId::new(b), name).with_count(count);
        prop_assert_eq!(ta.content_fingerprint(), tb.content_fingerprint());
    }
}
