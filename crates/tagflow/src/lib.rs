#![forbid(unsafe_code)]

//! tagflow public facade crate.
//!
//! Re-exports the tag model, the flow packer and the tag grid, and offers a
//! prelude for hosts embedding a grid.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use tagflow_core::geometry::{Point, Rect, Size};
pub use tagflow_core::tag::{Tag, TagId};

// --- Layout re-exports -----------------------------------------------------

pub use tagflow_layout::flow::{Flow, FlowLayout, pack, pack_ranges};
pub use tagflow_layout::size_cache::{CacheStats, SIZE_TOLERANCE, SizeCache};

// --- Widget re-exports -----------------------------------------------------

pub use tagflow_widgets::chip::{ChipMetrics, ChipSize, ChipStatus, TextMeasurer, TextStyle};
pub use tagflow_widgets::config::{ConfigError, SelectionMode, TagGridConfig, TagGridStyle};
pub use tagflow_widgets::measure::MonospaceMeasurer;
pub use tagflow_widgets::tag_grid::{
    ChipFrame, GridStats, RelayoutReason, TagGrid, TagGridAction, TagGridGesture, TagGridLayout,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for tagflow.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Rejected grid configuration.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for tagflow APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Validate `config` and build a grid from it.
///
/// [`TagGrid::new`] clamps bad values instead; use this when a bad config
/// should be reported.
pub fn try_grid(config: TagGridConfig) -> Result<TagGrid> {
    config.validate()?;
    Ok(TagGrid::new(config))
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ChipMetrics, ChipSize, Error, MonospaceMeasurer, Point, Result, SelectionMode, Size,
        Tag, TagGrid, TagGridAction, TagGridConfig, TagGridGesture, TagGridStyle, TagId,
        TextMeasurer,
    };

    pub use crate::{core, layout, widgets};
}

pub use tagflow_core as core;
pub use tagflow_layout as layout;
pub use tagflow_widgets as widgets;
