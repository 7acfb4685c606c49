#![forbid(unsafe_code)]

//! Layout primitives for tag grids.
//!
//! - [`flow`] - greedy left-to-right row packing
//! - [`size_cache`] - identity-keyed cache of measured item sizes
//!
//! The two meet in the grid controller: every pass packs items using the
//! cached size when one is valid and a placeholder otherwise.
//!
//! ```
//! use tagflow_core::geometry::Size;
//! use tagflow_core::tag::{Tag, TagId};
//! use tagflow_layout::{Flow, SizeCache};
//!
//! let tags = [
//!     Tag::new(TagId::new(1), "a"),
//!     Tag::new(TagId::new(2), "b"),
//! ];
//! let mut cache = SizeCache::new();
//! cache.record(tags[0].id(), tags[0].content_fingerprint(), Size::new(30.0, 10.0));
//!
//! // The unmeasured tag falls back to a full-width placeholder.
//! let width = 100.0;
//! let layout = Flow::new(width).spacing(8.0).split(&tags, |t| {
//!     cache
//!         .lookup(t.id(), t.content_fingerprint())
//!         .map_or(width, |s| s.width)
//! });
//! assert_eq!(layout.rows(), &[0..1, 1..2]);
//! ```

pub mod flow;
pub mod size_cache;

pub use flow::{Flow, FlowLayout, pack, pack_ranges};
pub use size_cache::{CacheStats, SIZE_TOLERANCE, SizeCache};
pub use tagflow_core::geometry::{Point, Rect, Size};
