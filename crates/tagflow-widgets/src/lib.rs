#![forbid(unsafe_code)]

//! Tag chips and the grid that flows them into rows.
//!
//! - [`chip`]: chip size variants, status, and [`ChipMetrics`] for intrinsic
//!   sizes given a [`TextMeasurer`].
//! - [`measure`]: a column-counting [`MonospaceMeasurer`].
//! - [`config`]: [`TagGridConfig`] and the selection styles.
//! - [`tag_grid`]: the [`TagGrid`] controller, its layout view, and
//!   gesture handling.

pub mod chip;
pub mod config;
pub mod measure;
pub mod tag_grid;

pub use chip::{ChipMetrics, ChipSize, ChipStatus, Symbol, TextMeasurer, TextStyle};
pub use config::{ConfigError, SelectionMode, TagGridConfig, TagGridStyle};
pub use measure::MonospaceMeasurer;
pub use tag_grid::{
    ChipFrame, GridStats, MAX_SETTLE_PASSES, RelayoutReason, TagGrid, TagGridAction,
    TagGridGesture, TagGridLayout,
};
