#![forbid(unsafe_code)]

//! Logging shims.
//!
//! With the `tracing` feature the layout path logs through `tracing`; without
//! it every macro below expands to nothing, so the crates that call
//! `tagflow_core::debug!` and friends pay nothing for the instrumentation.
//!
//! Spans are always entered the same way regardless of the feature:
//!
//! ```
//! let span = tagflow_core::debug_span!("tag_grid.layout", items = 3);
//! let _guard = span.enter();
//! ```

#[cfg(feature = "tracing")]
pub use tracing::{debug, debug_span, trace, trace_span, warn};

#[cfg(not(feature = "tracing"))]
mod disabled {
    /// Discards a debug event.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    /// Discards a trace event.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    /// Discards a warn event.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }

    /// Produces an inert span.
    #[macro_export]
    macro_rules! debug_span {
        ($($arg:tt)*) => {
            $crate::logging::InertSpan
        };
    }

    /// Produces an inert span.
    #[macro_export]
    macro_rules! trace_span {
        ($($arg:tt)*) => {
            $crate::logging::InertSpan
        };
    }
}

/// Stand-in for `tracing::Span` when the `tracing` feature is off.
#[cfg(not(feature = "tracing"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct InertSpan;

#[cfg(not(feature = "tracing"))]
impl InertSpan {
    /// Enter the span. The guard does nothing on drop.
    #[inline]
    pub fn enter(&self) -> InertGuard {
        InertGuard
    }
}

/// Guard returned by [`InertSpan::enter`].
#[cfg(not(feature = "tracing"))]
#[derive(Debug)]
pub struct InertGuard;
