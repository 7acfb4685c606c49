#![forbid(unsafe_code)]

//! Greedy flow (row-packing) layout.
//!
//! Items are placed left to right. An item joins the current row when the
//! row's remaining width still covers the item plus one spacing; otherwise it
//! opens a new row. One pass, no lookahead, no backtracking: an item is never
//! moved to an earlier row to save a line.
//!
//! # Invariants
//!
//! - **Order**: rows are contiguous runs; concatenating them reproduces the
//!   input order.
//! - **Partition**: every item lands in exactly one row.
//! - **Fit**: a row's widths plus `(n - 1) * spacing` never exceed the
//!   available width, except for a row holding a single oversized item.
//! - **Progress**: the first item of a row is placed unconditionally, so no
//!   row is ever empty and oversized items cannot stall the pass.
//! - **Determinism**: identical inputs produce identical ranges.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | No items | Zero rows |
//! | Width ≤ 0 or NaN | Width treated as 0; one item per row |
//! | Negative/NaN item width | Treated as 0 |
//! | Item wider than the row | Alone on its own row |
//!
//! # Example
//!
//! ```
//! use tagflow_layout::flow::pack;
//!
//! let widths = [30.0, 40.0, 50.0];
//! let rows = pack(&widths, |w| *w, 100.0, 10.0);
//! assert_eq!(rows, vec![&[30.0, 40.0][..], &[50.0][..]]);
//! ```

use std::ops::Range;

use tagflow_core::geometry::sanitize_extent;

/// Pack `items` into rows and return them as sub-slices.
///
/// `width_of` supplies each item's width; `available_width` is the row
/// capacity and `spacing` the gap between neighbours.
pub fn pack<T, F>(items: &[T], width_of: F, available_width: f64, spacing: f64) -> Vec<&[T]>
where
    F: FnMut(&T) -> f64,
{
    pack_ranges(items, width_of, available_width, spacing)
        .into_iter()
        .map(|range| &items[range])
        .collect()
}

/// Pack `items` into rows and return each row as an index range.
pub fn pack_ranges<T, F>(
    items: &[T],
    mut width_of: F,
    available_width: f64,
    spacing: f64,
) -> Vec<Range<usize>>
where
    F: FnMut(&T) -> f64,
{
    let available = sanitize_extent(available_width);
    let spacing = sanitize_extent(spacing);

    let mut rows = Vec::new();
    let mut start = 0usize;
    let mut remaining = available;

    for (idx, item) in items.iter().enumerate() {
        let advance = sanitize_extent(width_of(item)) + spacing;
        let row_is_empty = idx == start;

        if !row_is_empty && remaining - advance < 0.0 {
            rows.push(start..idx);
            start = idx;
            remaining = available;
        }

        remaining -= advance;
    }

    if start < items.len() {
        rows.push(start..items.len());
    }

    rows
}

/// Builder for flow layouts.
///
/// ```
/// use tagflow_layout::flow::Flow;
///
/// let layout = Flow::new(100.0).spacing(10.0).split(&[30.0, 40.0, 50.0], |w| *w);
/// assert_eq!(layout.row_count(), 2);
/// assert_eq!(layout.row_of(2), Some(1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flow {
    width: f64,
    spacing: f64,
}

impl Flow {
    /// A flow with the given row capacity and no spacing.
    pub fn new(width: f64) -> Self {
        Self {
            width: sanitize_extent(width),
            spacing: 0.0,
        }
    }

    /// Set the gap between neighbouring items.
    #[must_use]
    pub fn spacing(mut self, spacing: f64) -> Self {
        self.spacing = sanitize_extent(spacing);
        self
    }

    /// Row capacity after sanitizing.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Gap between items after sanitizing.
    pub fn gap(&self) -> f64 {
        self.spacing
    }

    /// Pack `items` into a [`FlowLayout`].
    pub fn split<T, F>(&self, items: &[T], width_of: F) -> FlowLayout
    where
        F: FnMut(&T) -> f64,
    {
        FlowLayout {
            rows: pack_ranges(items, width_of, self.width, self.spacing),
            item_count: items.len(),
        }
    }
}

/// Result of a flow pass: rows as contiguous index ranges.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FlowLayout {
    rows: Vec<Range<usize>>,
    item_count: usize,
}

impl FlowLayout {
    /// A layout with no rows.
    pub const EMPTY: Self = Self {
        rows: Vec::new(),
        item_count: 0,
    };

    /// Row ranges in order.
    #[inline]
    pub fn rows(&self) -> &[Range<usize>] {
        &self.rows
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of items the layout was computed for.
    #[inline]
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row index holding item `index`, if any.
    pub fn row_of(&self, index: usize) -> Option<usize> {
        if index >= self.item_count {
            return None;
        }
        // Rows are sorted and contiguous.
        let row = self.rows.partition_point(|r| r.end <= index);
        (row < self.rows.len()).then_some(row)
    }

    /// Map the ranges back onto `items`.
    ///
    /// Rows that fall outside `items` (a slice other than the one this
    /// layout was computed for) come back empty.
    pub fn iter_rows<'a, T>(&'a self, items: &'a [T]) -> impl Iterator<Item = &'a [T]> + 'a {
        self.rows
            .iter()
            .map(move |range| items.get(range.clone()).unwrap_or(&[]))
    }

    /// Take the ranges out of the layout.
    pub fn into_rows(self) -> Vec<Range<usize>> {
        self.rows
    }
}
