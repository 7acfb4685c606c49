#![forbid(unsafe_code)]

//! Core: geometry in layout units, the tag model, and logging shims.

pub mod geometry;
pub mod logging;
pub mod tag;

pub use geometry::{Point, Rect, Size, sanitize_extent};
pub use tag::{Tag, TagId};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, trace, trace_span, warn};
