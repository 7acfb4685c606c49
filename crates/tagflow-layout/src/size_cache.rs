#![forbid(unsafe_code)]

//! Identity-keyed cache of measured chip sizes.
//!
//! A chip's real size is only known after it has been rendered once, so the
//! flow pass works from the best size known so far. [`SizeCache`] holds those
//! sizes between passes.
//!
//! # Validity
//!
//! An entry answers a lookup only when all of these hold:
//!
//! - its content fingerprint equals the tag's current fingerprint (a rename
//!   or count change makes the old size useless);
//! - its generation equals the cache generation ([`SizeCache::invalidate_all`]
//!   bumps it when the sizing configuration changes, e.g. font scale).
//!
//! Anything else is a miss and the caller falls back to a placeholder.
//!
//! # Pruning
//!
//! [`SizeCache::prune`] drops entries whose identity is no longer live and
//! entries left behind by older generations, so the map never outgrows the
//! current item list plus whatever was measured since the last prune.
//!
//! # Example
//!
//! ```
//! use tagflow_core::geometry::Size;
//! use tagflow_core::tag::TagId;
//! use tagflow_layout::size_cache::SizeCache;
//!
//! let mut cache = SizeCache::new();
//! let id = TagId::new(1);
//!
//! assert!(cache.record(id, 0xfeed, Size::new(40.0, 20.0)));
//! assert_eq!(cache.lookup(id, 0xfeed), Some(Size::new(40.0, 20.0)));
//!
//! // Same size again: nothing changed, no relayout needed.
//! assert!(!cache.record(id, 0xfeed, Size::new(40.0, 20.0)));
//!
//! // Content changed: the old entry no longer answers.
//! assert_eq!(cache.lookup(id, 0xbeef), None);
//! ```

use std::collections::HashMap;

use rustc_hash::FxHashMap;
use tagflow_core::geometry::Size;
use tagflow_core::tag::TagId;

/// Two measurements closer than this on both axes count as the same size.
pub const SIZE_TOLERANCE: f64 = 1e-3;

#[derive(Clone, Copy, Debug)]
struct CacheEntry {
    size: Size,
    /// Content fingerprint the size was measured for.
    content: u64,
    /// Generation when this entry was recorded.
    generation: u64,
}

/// Statistics about cache performance.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CacheStats {
    /// Number of entries currently in the cache (valid or not).
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    /// Hit rate as a fraction (0.0 to 1.0).
    pub hit_rate: f64,
}

/// Measured sizes keyed by tag identity.
///
/// Not thread-safe; owned by a single grid and mutated from its event loop.
#[derive(Debug, Default)]
pub struct SizeCache {
    entries: FxHashMap<TagId, CacheEntry>,
    generation: u64,
    hits: u64,
    misses: u64,
}

impl SizeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Valid size for `id` measured with `content`, counting hit/miss.
    pub fn lookup(&mut self, id: TagId, content: u64) -> Option<Size> {
        match self.peek(id, content) {
            Some(size) => {
                self.hits += 1;
                Some(size)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Like [`lookup`](Self::lookup) but leaves the statistics alone.
    pub fn peek(&self, id: TagId, content: u64) -> Option<Size> {
        self.entries
            .get(&id)
            .filter(|e| e.generation == self.generation && e.content == content)
            .map(|e| e.size)
    }

    /// Store a measurement. The size is sanitized first.
    ///
    /// Returns `true` when the stored value changed materially: there was no
    /// valid entry, or the new size differs by more than [`SIZE_TOLERANCE`].
    /// A repeated identity simply overwrites: last measurement wins.
    pub fn record(&mut self, id: TagId, content: u64, size: Size) -> bool {
        let size = size.sanitized();
        let changed = match self.peek(id, content) {
            Some(previous) => !previous.approx_eq(size, SIZE_TOLERANCE),
            None => true,
        };
        self.entries.insert(
            id,
            CacheEntry {
                size,
                content,
                generation: self.generation,
            },
        );
        changed
    }

    /// Forget the entry for one identity.
    pub fn invalidate(&mut self, id: TagId) -> bool {
        self.entries.remove(&id).is_some()
    }

    /// Make every entry stale by bumping the generation. O(1); the stale
    /// entries are dropped by the next [`prune`](Self::prune).
    #[inline]
    pub fn invalidate_all(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Remove entries whose identity fails `is_live`, plus stale generations.
    ///
    /// Returns how many entries were removed.
    pub fn prune<F>(&mut self, mut is_live: F) -> usize
    where
        F: FnMut(TagId) -> bool,
    {
        let before = self.entries.len();
        let generation = self.generation;
        self.entries
            .retain(|id, e| e.generation == generation && is_live(*id));
        before - self.entries.len()
    }

    /// Whether an entry (valid or stale) exists for `id`.
    pub fn contains(&self, id: TagId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Get current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let total = self.hits + self.misses;
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
            hit_rate: if total > 0 {
                self.hits as f64 / total as f64
            } else {
                0.0
            },
        }
    }

    /// Reset statistics counters to zero.
    #[inline]
    pub fn reset_stats(&mut self) {
        self.hits = 0;
        self.misses = 0;
    }

    /// Drop every entry and start a new generation.
    #[inline]
    pub fn clear(&mut self) {
        self.entries.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    /// Snapshot of the valid entries, for inspection and tests.
    pub fn snapshot(&self) -> HashMap<TagId, Size> {
        self.entries
            .iter()
            .filter(|(_, e)| e.generation == self.generation)
            .map(|(id, e)| (*id, e.size))
            .collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
