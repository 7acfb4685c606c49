#![forbid(unsafe_code)]

//! The tag grid controller.
//!
//! [`TagGrid`] owns the size cache and the last row partition. Everything
//! that can change the layout (container width, the item list, a measured
//! size, sizing configuration) only marks the grid dirty and records a
//! [`RelayoutReason`]. The next [`TagGrid::layout`] call runs at most one
//! packing pass, however many triggers arrived in between.
//!
//! Measurement is asynchronous with respect to placement: an item that has
//! not reported a size yet is packed with a full-width placeholder, the host
//! renders it, reports the real size through [`TagGrid::report_size`], and
//! the following pass places it properly. [`TagGrid::settle`] runs that loop
//! synchronously against a [`TextMeasurer`].
//!
//! # Example
//!
//! ```
//! use std::collections::HashSet;
//! use tagflow_core::tag::{Tag, TagId};
//! use tagflow_widgets::measure::MonospaceMeasurer;
//! use tagflow_widgets::tag_grid::TagGrid;
//!
//! let tags = vec![
//!     Tag::new(TagId::new(1), "rust").with_count(3),
//!     Tag::new(TagId::new(2), "layout"),
//! ];
//! let mut grid = TagGrid::default();
//! grid.set_container_width(400.0);
//!
//! let metrics = grid.chip_metrics();
//! let selection = HashSet::new();
//! let layout = grid.settle(&metrics, &MonospaceMeasurer::new(8.0, 16.0), &tags, &selection);
//! assert_eq!(layout.row_count(), 1);
//! ```

use std::collections::HashSet;
use std::hash::Hasher;
use std::ops::Range;

use bitflags::bitflags;
use rustc_hash::{FxHashMap, FxHashSet, FxHasher};

use tagflow_core::geometry::{Point, Rect, Size, sanitize_extent};
use tagflow_core::tag::{Tag, TagId};
use tagflow_core::{debug, debug_span, trace};
use tagflow_layout::flow::pack_ranges;
use tagflow_layout::size_cache::{CacheStats, SizeCache};

use crate::chip::{ChipMetrics, ChipStatus, TextMeasurer, normalize_scale};
use crate::config::{ConfigError, TagGridConfig, check_font_scale};

/// Upper bound on measure/layout rounds in [`TagGrid::settle`].
pub const MAX_SETTLE_PASSES: usize = 8;

/// Height of the placeholder used for unmeasured items.
pub const PLACEHOLDER_HEIGHT: f64 = 1.0;

bitflags! {
    /// Why a layout pass is pending.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RelayoutReason: u8 {
        /// Container width changed.
        const WIDTH       = 0b0001;
        /// Items were added, removed, reordered or edited.
        const ITEMS       = 0b0010;
        /// A chip reported a materially different size.
        const MEASUREMENT = 0b0100;
        /// Chip size, font scale, spacing or inset changed.
        const CONFIG      = 0b1000;
    }
}

/// Intent emitted by the grid. The caller owns the data and applies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagGridAction {
    Select(TagId),
    Delete(TagId),
}

/// Raw user input on a chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagGridGesture {
    /// Tap on the chip body.
    Tap(TagId),
    /// Tap on the delete affordance.
    TapDelete(TagId),
    /// "Delete" chosen from the chip's context menu.
    MenuDelete(TagId),
}

/// Counters describing the grid's work so far.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GridStats {
    /// Packing passes run.
    pub passes: u64,
    /// Relayout triggers received.
    pub triggers: u64,
    /// Triggers absorbed into an already pending pass.
    pub coalesced: u64,
    /// Measurements dropped because their item was gone or had changed.
    pub stale_reports: u64,
    /// Cache entries removed by pruning.
    pub pruned: u64,
    pub cache: CacheStats,
}

/// Flow layout controller for a collection of tag chips.
#[derive(Debug)]
pub struct TagGrid {
    config: TagGridConfig,
    font_scale: f64,
    container_width: f64,
    cache: SizeCache,
    rows: Vec<Range<usize>>,
    /// Identity and content of every item in the last synced list, in order.
    synced: Option<Vec<(TagId, u64)>>,
    /// Live identities and the content key their sizes are cached under.
    live: FxHashMap<TagId, u64>,
    /// `(id, content)` pairs for ids that occur more than once in the list.
    shared: FxHashSet<(TagId, u64)>,
    pending: RelayoutReason,
    passes: u64,
    triggers: u64,
    coalesced: u64,
    stale_reports: u64,
    pruned: u64,
}

impl TagGrid {
    /// Create a grid. Out-of-range spacing and inset are clamped.
    pub fn new(config: TagGridConfig) -> Self {
        Self {
            config: config.sanitized(),
            font_scale: 1.0,
            container_width: 0.0,
            cache: SizeCache::new(),
            rows: Vec::new(),
            synced: None,
            live: FxHashMap::default(),
            shared: FxHashSet::default(),
            pending: RelayoutReason::empty(),
            passes: 0,
            triggers: 0,
            coalesced: 0,
            stale_reports: 0,
            pruned: 0,
        }
    }

    pub fn config(&self) -> &TagGridConfig {
        &self.config
    }

    /// Replace the configuration.
    ///
    /// A new chip size or a switch into or out of the deletable style changes
    /// every chip's size and invalidates the whole cache. New spacing or inset
    /// only repacks.
    pub fn set_config(&mut self, config: TagGridConfig) {
        let config = config.sanitized();
        let resize = self.config.sizing_differs(&config);
        let respace = self.config.spacing_differs(&config);
        self.config = config;

        if resize {
            debug!("chip sizing changed, invalidating size cache");
            self.cache.invalidate_all();
        }
        if resize || respace {
            self.trigger(RelayoutReason::CONFIG);
        }
    }

    pub fn font_scale(&self) -> f64 {
        self.font_scale
    }

    /// Set the accessibility font scale. Invalid scales fall back to 1.0.
    ///
    /// A change invalidates every cached size.
    pub fn set_font_scale(&mut self, scale: f64) {
        let scale = normalize_scale(scale);
        if scale == self.font_scale {
            return;
        }
        debug!(from = self.font_scale, to = scale, "font scale changed, invalidating size cache");
        self.font_scale = scale;
        self.cache.invalidate_all();
        self.trigger(RelayoutReason::CONFIG);
    }

    /// Like [`set_font_scale`](Self::set_font_scale) but rejects invalid
    /// scales instead of falling back.
    pub fn try_set_font_scale(&mut self, scale: f64) -> Result<(), ConfigError> {
        let scale = check_font_scale(scale)?;
        self.set_font_scale(scale);
        Ok(())
    }

    pub fn container_width(&self) -> f64 {
        self.container_width
    }

    /// Report the container's width. Negative and NaN widths count as 0.
    pub fn set_container_width(&mut self, width: f64) {
        let width = sanitize_extent(width);
        if width != self.container_width {
            self.container_width = width;
            self.trigger(RelayoutReason::WIDTH);
        }
    }

    /// Width available for packing: the container minus the inset on both
    /// sides.
    pub fn content_width(&self) -> f64 {
        sanitize_extent(self.container_width - 2.0 * self.config.inset)
    }

    /// Size assumed for an item that has not been measured yet.
    pub fn placeholder_size(&self) -> Size {
        Size::new(self.content_width(), PLACEHOLDER_HEIGHT)
    }

    /// Metrics matching the grid's chip size and font scale.
    pub fn chip_metrics(&self) -> ChipMetrics {
        ChipMetrics::new(self.config.size).with_scale(self.font_scale)
    }

    /// Bring the grid up to date with `items`.
    ///
    /// Called by [`layout`](Self::layout); hosts only need it directly to
    /// make fresh items eligible for [`report_size`](Self::report_size)
    /// before the next pass. Returns `true` if the list changed.
    ///
    /// Items sharing an id share one cached size, keyed by the contents of
    /// all of them; the last accepted measurement for the id wins.
    pub fn sync_items(&mut self, items: &[Tag]) -> bool {
        if let Some(synced) = &self.synced
            && synced.len() == items.len()
            && synced
                .iter()
                .zip(items)
                .all(|(&(id, content), tag)| {
                    id == tag.id() && content == tag.content_fingerprint()
                })
        {
            return false;
        }

        let synced: Vec<(TagId, u64)> = items
            .iter()
            .map(|tag| (tag.id(), tag.content_fingerprint()))
            .collect();

        let mut groups: FxHashMap<TagId, ContentGroup> =
            FxHashMap::with_capacity_and_hasher(items.len(), Default::default());
        for &(id, content) in &synced {
            groups
                .entry(id)
                .and_modify(|group| group.push(content))
                .or_insert_with(|| ContentGroup::new(content));
        }

        let mut shared = FxHashSet::default();
        for &(id, content) in &synced {
            if groups.get(&id).is_some_and(|group| group.len > 1) {
                shared.insert((id, content));
            }
        }

        let mut live = FxHashMap::with_capacity_and_hasher(groups.len(), Default::default());
        for (id, group) in groups {
            let key = group.key();
            if let Some(&previous) = self.live.get(&id)
                && previous != key
            {
                debug!(id = %id, "tag content changed, invalidating its size");
                self.cache.invalidate(id);
            }
            live.insert(id, key);
        }

        self.live = live;
        self.shared = shared;
        self.synced = Some(synced);
        self.trigger(RelayoutReason::ITEMS);
        true
    }

    /// Record the rendered size of `tag`.
    ///
    /// Returns `true` when the size differed enough from the cached one to
    /// schedule a pass. A report for an item that is no longer in the list,
    /// or whose content has changed since, is dropped.
    pub fn report_size(&mut self, tag: &Tag, size: Size) -> bool {
        self.accept_report(tag, size).unwrap_or(false)
    }

    /// `None` if the report was stale, otherwise whether it scheduled a pass.
    fn accept_report(&mut self, tag: &Tag, size: Size) -> Option<bool> {
        let Some(key) = cache_key(&self.live, &self.shared, tag) else {
            self.stale_reports += 1;
            trace!(id = %tag.id(), "dropping stale measurement");
            return None;
        };
        let changed = self.cache.record(tag.id(), key, size);
        if changed {
            self.trigger(RelayoutReason::MEASUREMENT);
        }
        Some(changed)
    }

    /// Whether the next [`layout`](Self::layout) call will run a pass.
    ///
    /// Item changes are only noticed once the list is synced.
    pub fn needs_layout(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Reasons accumulated since the last pass.
    pub fn pending_reasons(&self) -> RelayoutReason {
        self.pending
    }

    /// Sync `items`, run a pass if anything changed, and return a view of
    /// the result.
    pub fn layout<'a>(
        &'a mut self,
        items: &'a [Tag],
        selection: &'a HashSet<TagId>,
    ) -> TagGridLayout<'a> {
        self.refresh(items);
        TagGridLayout {
            grid: self,
            items,
            selection,
        }
    }

    /// Measure every item without a valid cached size and report it.
    ///
    /// Returns how many measurements were accepted.
    pub fn measure_pending<M>(&mut self, metrics: &ChipMetrics, measurer: &M, items: &[Tag]) -> usize
    where
        M: TextMeasurer + ?Sized,
    {
        self.sync_items(items);
        let deletable = self.config.style.is_deletable();
        let mut measured = 0;
        for tag in items {
            if self.cached_size(tag).is_some() {
                continue;
            }
            let size = metrics.preferred_size(tag, deletable, measurer);
            if self.accept_report(tag, size).is_some() {
                measured += 1;
            }
        }
        measured
    }

    /// Alternate layout and measurement until nothing is pending, bounded by
    /// [`MAX_SETTLE_PASSES`].
    pub fn settle<'a, M>(
        &'a mut self,
        metrics: &ChipMetrics,
        measurer: &M,
        items: &'a [Tag],
        selection: &'a HashSet<TagId>,
    ) -> TagGridLayout<'a>
    where
        M: TextMeasurer + ?Sized,
    {
        for _ in 0..MAX_SETTLE_PASSES {
            self.refresh(items);
            if self.measure_pending(metrics, measurer, items) == 0 && !self.needs_layout() {
                break;
            }
        }
        self.layout(items, selection)
    }

    /// Translate a gesture into an action.
    ///
    /// Gestures on items the grid does not know, delete taps outside the
    /// deletable style, and menu deletes with the menu disabled yield `None`.
    pub fn handle_gesture(&self, gesture: TagGridGesture) -> Option<TagGridAction> {
        match gesture {
            TagGridGesture::Tap(id) if self.is_live(id) => Some(TagGridAction::Select(id)),
            TagGridGesture::TapDelete(id)
                if self.is_live(id) && self.config.style.is_deletable() =>
            {
                Some(TagGridAction::Delete(id))
            }
            TagGridGesture::MenuDelete(id) if self.is_live(id) && self.config.menu_enabled => {
                Some(TagGridAction::Delete(id))
            }
            _ => None,
        }
    }

    /// Display status of the chip for `id`.
    pub fn chip_status(&self, id: TagId, selection: &HashSet<TagId>) -> ChipStatus {
        self.config.style.chip_status(selection.contains(&id))
    }

    /// Valid cached size for `tag`, if measured.
    pub fn cached_size(&self, tag: &Tag) -> Option<Size> {
        let key = cache_key(&self.live, &self.shared, tag)?;
        self.cache.peek(tag.id(), key)
    }

    pub fn cache(&self) -> &SizeCache {
        &self.cache
    }

    /// Row ranges from the last pass.
    pub fn rows(&self) -> &[Range<usize>] {
        &self.rows
    }

    pub fn stats(&self) -> GridStats {
        GridStats {
            passes: self.passes,
            triggers: self.triggers,
            coalesced: self.coalesced,
            stale_reports: self.stale_reports,
            pruned: self.pruned,
            cache: self.cache.stats(),
        }
    }

    fn is_live(&self, id: TagId) -> bool {
        self.live.contains_key(&id)
    }

    fn trigger(&mut self, reason: RelayoutReason) {
        self.triggers += 1;
        if !self.pending.is_empty() {
            self.coalesced += 1;
        }
        self.pending |= reason;
    }

    fn refresh(&mut self, items: &[Tag]) {
        self.sync_items(items);
        if self.needs_layout() {
            self.run_pass(items);
        }
    }

    fn run_pass(&mut self, items: &[Tag]) {
        let span = debug_span!(
            "tag_grid.layout",
            items = items.len(),
            width = self.container_width,
            reasons = ?self.pending
        );
        let _guard = span.enter();
        self.pending = RelayoutReason::empty();

        let live = &self.live;
        let pruned = self.cache.prune(|id| live.contains_key(&id));
        if pruned > 0 {
            debug!(pruned, "pruned size cache");
            self.pruned += pruned as u64;
        }

        let width = self.content_width();
        let spacing = self.config.spacing;
        let placeholder = self.placeholder_size();
        let (live, shared, cache) = (&self.live, &self.shared, &mut self.cache);
        self.rows = pack_ranges(
            items,
            |tag| {
                cache_key(live, shared, tag)
                    .and_then(|key| cache.lookup(tag.id(), key))
                    .unwrap_or(placeholder)
                    .width
            },
            width,
            spacing,
        );
        self.passes += 1;
        debug!(rows = self.rows.len(), "layout pass complete");
    }
}

impl Default for TagGrid {
    fn default() -> Self {
        Self::new(TagGridConfig::default())
    }
}

/// Content key the size of `tag` is cached under. `None` unless `tag`
/// matches an item of the synced list.
fn cache_key(
    live: &FxHashMap<TagId, u64>,
    shared: &FxHashSet<(TagId, u64)>,
    tag: &Tag,
) -> Option<u64> {
    let id = tag.id();
    let content = tag.content_fingerprint();
    live.get(&id)
        .copied()
        .filter(|&key| key == content || shared.contains(&(id, content)))
}

/// Contents of every item sharing one id, in list order.
struct ContentGroup {
    first: u64,
    hasher: FxHasher,
    len: usize,
}

impl ContentGroup {
    fn new(content: u64) -> Self {
        let mut hasher = FxHasher::default();
        hasher.write_u64(content);
        Self {
            first: content,
            hasher,
            len: 1,
        }
    }

    fn push(&mut self, content: u64) {
        self.hasher.write_u64(content);
        self.len += 1;
    }

    /// A lone item is keyed by its own content.
    fn key(&self) -> u64 {
        if self.len == 1 {
            self.first
        } else {
            self.hasher.finish()
        }
    }
}

/// Where one chip sits after a pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChipFrame {
    /// Index into the item slice.
    pub index: usize,
    pub row: usize,
    pub id: TagId,
    pub status: ChipStatus,
    pub rect: Rect,
    /// `false` while the chip is still using the placeholder size.
    pub measured: bool,
}

/// Read-only view of a laid-out grid for one set of items and selection.
#[derive(Debug, Clone, Copy)]
pub struct TagGridLayout<'a> {
    grid: &'a TagGrid,
    items: &'a [Tag],
    selection: &'a HashSet<TagId>,
}

impl<'a> TagGridLayout<'a> {
    pub fn rows(&self) -> &'a [Range<usize>] {
        let grid = self.grid;
        &grid.rows
    }

    pub fn row_count(&self) -> usize {
        self.grid.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grid.rows.is_empty()
    }

    /// Rows as slices of the items.
    pub fn iter_rows(&self) -> impl Iterator<Item = &'a [Tag]> + 'a {
        let (grid, items) = (self.grid, self.items);
        grid.rows
            .iter()
            .map(move |range| items.get(range.clone()).unwrap_or(&[]))
    }

    /// Size used for item `index`: cached if measured, placeholder otherwise.
    pub fn size_of(&self, index: usize) -> Option<Size> {
        self.items.get(index).map(|tag| self.sized(tag).0)
    }

    pub fn status_of(&self, index: usize) -> Option<ChipStatus> {
        self.items
            .get(index)
            .map(|tag| self.grid.chip_status(tag.id(), self.selection))
    }

    /// Frames for every chip, row by row.
    ///
    /// Rows stack from the top inset with `spacing` between them; chips run
    /// from the left inset with `spacing` between them and are centered
    /// vertically in their row. A chip wider than the content width is
    /// capped to it.
    pub fn frames(&self) -> Vec<ChipFrame> {
        let spacing = self.grid.config.spacing;
        let inset = self.grid.config.inset;
        let mut frames = Vec::with_capacity(self.items.len());
        let mut y = inset;

        for (row, range) in self.grid.rows.iter().enumerate() {
            let Some(tags) = self.items.get(range.clone()) else {
                continue;
            };
            let row_height = self.row_height(tags);
            let mut x = inset;
            for (offset, tag) in tags.iter().enumerate() {
                let (size, measured) = self.sized(tag);
                let width = self.frame_width(size);
                frames.push(ChipFrame {
                    index: range.start + offset,
                    row,
                    id: tag.id(),
                    status: self.grid.chip_status(tag.id(), self.selection),
                    rect: Rect::new(x, y + (row_height - size.height) / 2.0, width, size.height),
                    measured,
                });
                x += width + spacing;
            }
            y += row_height + spacing;
        }
        frames
    }

    /// Full size of the laid-out content, insets included.
    ///
    /// Chips are capped to the content width, so the width is the
    /// container width unless the container is narrower than both insets.
    pub fn content_size(&self) -> Size {
        let spacing = self.grid.config.spacing;
        let inset = self.grid.config.inset;
        let mut height = 0.0;
        let mut widest: f64 = 0.0;

        for tags in self.iter_rows() {
            height += self.row_height(tags);
            let extent: f64 = tags
                .iter()
                .map(|tag| self.frame_width(self.sized(tag).0))
                .sum::<f64>()
                + spacing * tags.len().saturating_sub(1) as f64;
            widest = widest.max(extent);
        }
        height += spacing * self.row_count().saturating_sub(1) as f64;

        Size::new(
            self.grid.container_width.max(widest + 2.0 * inset),
            height + 2.0 * inset,
        )
        .sanitized()
    }

    /// The chip under `point`, if any.
    pub fn hit_test(&self, point: Point) -> Option<ChipFrame> {
        self.frames().into_iter().find(|f| f.rect.contains(point))
    }

    /// Gesture for a tap at `point`.
    ///
    /// In the deletable style a tap within `delete_zone` of the chip's right
    /// edge is a delete tap; see [`ChipMetrics::delete_zone_width`].
    pub fn gesture_at(&self, point: Point, delete_zone: f64) -> Option<TagGridGesture> {
        let frame = self.hit_test(point)?;
        let zone = sanitize_extent(delete_zone);
        if self.grid.config.style.is_deletable() && point.x >= frame.rect.right() - zone {
            Some(TagGridGesture::TapDelete(frame.id))
        } else {
            Some(TagGridGesture::Tap(frame.id))
        }
    }

    fn sized(&self, tag: &Tag) -> (Size, bool) {
        match self.grid.cached_size(tag) {
            Some(size) => (size, true),
            None => (self.grid.placeholder_size(), false),
        }
    }

    fn frame_width(&self, size: Size) -> f64 {
        size.width.min(self.grid.content_width())
    }

    fn row_height(&self, tags: &[Tag]) -> f64 {
        tags.iter()
            .map(|tag| self.sized(tag).0.height)
            .fold(0.0, f64::max)
    }
}
