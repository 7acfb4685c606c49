//! Property-based invariant tests for the tag grid.
//!
//! 1. Settled rows partition the items in order.
//! 2. Frames stay inside the content box; oversized chips are capped.
//! 3. Frames within a row do not overlap and rows do not overlap.
//! 4. A settled grid does no further work for unchanged inputs.
//! 5. Reports for removed items never change the layout.
//! 6. Chip status follows the style and the selection set.

use std::collections::HashSet;

use proptest::prelude::*;
use tagflow_core::geometry::Size;
use tagflow_core::tag::{Tag, TagId};
use tagflow_widgets::{
    ChipStatus, MonospaceMeasurer, SelectionMode, TagGrid, TagGridConfig, TagGridStyle,
};

// ── Helpers ─────────────────────────────────────────────────────────────

fn items_strategy() -> impl Strategy<Value = Vec<Tag>> {
    prop::collection::vec(("[a-z]{1,12}", 0u64..5000), 0..24).prop_map(|entries| {
        entries
            .into_iter()
            .enumerate()
            .map(|(i, (name, count))| Tag::new(TagId::new(i as u64), name).with_count(count))
            .collect()
    })
}

fn style_strategy() -> impl Strategy<Value = TagGridStyle> {
    prop_oneof![
        Just(TagGridStyle::Default),
        Just(TagGridStyle::Deletable),
        Just(TagGridStyle::Selectable(SelectionMode::Single)),
        Just(TagGridStyle::Selectable(SelectionMode::Multiple)),
    ]
}

fn settled(
    items: &[Tag],
    width: f64,
    spacing: f64,
    inset: f64,
    style: TagGridStyle,
) -> TagGrid {
    let config = TagGridConfig::new(style)
        .with_spacing(spacing)
        .with_inset(inset);
    let mut grid = TagGrid::new(config);
    grid.set_container_width(width);
    let metrics = grid.chip_metrics();
    let selection = HashSet::new();
    grid.settle(&metrics, &MonospaceMeasurer::new(7.0, 17.0), items, &selection);
    grid
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Partition
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn settled_rows_partition_items(
        items in items_strategy(),
        width in 0.0f64..800.0,
        spacing in 0.0f64..16.0,
    ) {
        let grid = settled(&items, width, spacing, 8.0, TagGridStyle::Default);
        let mut next = 0usize;
        for range in grid.rows() {
            prop_assert_eq!(range.start, next);
            prop_assert!(range.end > range.start);
            next = range.end;
        }
        prop_assert_eq!(next, items.len());
        prop_assert!(items.iter().all(|t| grid.cached_size(t).is_some()));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Width invariant on frames
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn frames_fit_content_box(
        items in items_strategy(),
        width in 0.0f64..800.0,
        spacing in 0.0f64..16.0,
        inset in 0.0f64..24.0,
        style in style_strategy(),
    ) {
        let mut grid = settled(&items, width, spacing, inset, style);
        let right_edge = inset + grid.content_width();
        let selection = HashSet::new();
        let layout = grid.layout(&items, &selection);
        let frames = layout.frames();

        for range in layout.rows() {
            let last = &frames[range.end - 1];
            prop_assert!(
                last.rect.right() <= right_edge + 1e-6,
                "row {:?} ends at {} past {}",
                range, last.rect.right(), right_edge
            );
        }
        prop_assert!(layout.content_size().width <= width.max(2.0 * inset) + 1e-6);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. No overlap
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn frames_do_not_overlap(
        items in items_strategy(),
        width in 0.0f64..800.0,
        spacing in 0.0f64..16.0,
    ) {
        let mut grid = settled(&items, width, spacing, 8.0, TagGridStyle::Deletable);
        let selection = HashSet::new();
        let layout = grid.layout(&items, &selection);
        let frames = layout.frames();
        prop_assert_eq!(frames.len(), items.len());

        for pair in frames.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert_eq!(b.index, a.index + 1);
            if a.row == b.row {
                prop_assert!(b.rect.x >= a.rect.right() + spacing - 1e-9);
            } else {
                prop_assert!(b.rect.y >= a.rect.bottom() - 1e-9);
            }
        }

        let content = layout.content_size();
        for frame in &frames {
            prop_assert!(frame.rect.bottom() <= content.height + 1e-9);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Fixed point
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn settled_grid_is_a_fixed_point(
        items in items_strategy(),
        width in 0.0f64..800.0,
    ) {
        let mut grid = settled(&items, width, 8.0, 8.0, TagGridStyle::Default);
        let rows = grid.rows().to_vec();
        let passes = grid.stats().passes;

        let selection = HashSet::new();
        let metrics = grid.chip_metrics();
        grid.settle(&metrics, &MonospaceMeasurer::new(7.0, 17.0), &items, &selection);

        prop_assert_eq!(grid.stats().passes, passes);
        prop_assert_eq!(grid.rows(), rows.as_slice());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Stale reports
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn removed_item_reports_are_inert(
        items in items_strategy().prop_filter("need items", |v| v.len() > 1),
        width in 50.0f64..800.0,
        bogus in 0.0f64..1e4,
    ) {
        let mut grid = settled(&items, width, 8.0, 8.0, TagGridStyle::Default);
        let kept = items[1..].to_vec();
        let selection = HashSet::new();
        let metrics = grid.chip_metrics();
        grid.settle(&metrics, &MonospaceMeasurer::new(7.0, 17.0), &kept, &selection);
        let rows = grid.rows().to_vec();

        prop_assert!(!grid.report_size(&items[0], Size::new(bogus, bogus)));
        prop_assert!(!grid.needs_layout());
        grid.layout(&kept, &selection);
        prop_assert_eq!(grid.rows(), rows.as_slice());
        prop_assert!(!grid.cache().contains(items[0].id()));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Status
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn status_follows_style_and_selection(
        items in items_strategy(),
        style in style_strategy(),
        picks in prop::collection::vec(0u64..40, 0..10),
    ) {
        let selection: HashSet<TagId> = picks.into_iter().map(TagId::new).collect();
        let mut grid = TagGrid::new(TagGridConfig::new(style));
        let layout = grid.layout(&items, &selection);

        for frame in layout.frames() {
            let expected = match style {
                TagGridStyle::Default => ChipStatus::Default,
                TagGridStyle::Deletable => ChipStatus::Deletable,
                TagGridStyle::Selectable(_) if selection.contains(&frame.id) => ChipStatus::Selected,
                TagGridStyle::Selectable(_) => ChipStatus::Default,
            };
            prop_assert_eq!(frame.status, expected);
        }
    }
}
