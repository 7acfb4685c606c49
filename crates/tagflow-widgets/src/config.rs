#![forbid(unsafe_code)]

//! Grid configuration: selection style, chip size, spacing and inset.

use std::fmt;

use tagflow_core::geometry::sanitize_extent;

use crate::chip::{ChipSize, ChipStatus};

/// Default gap between chips and between rows.
pub const DEFAULT_SPACING: f64 = 8.0;
/// Default padding around the whole grid.
pub const DEFAULT_INSET: f64 = 8.0;

/// Whether a selectable grid allows one or many selected chips.
///
/// The grid only reports taps; enforcing the mode is up to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SelectionMode {
    #[default]
    Single,
    Multiple,
}

/// How chips in a grid behave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TagGridStyle {
    /// Chips never show a selected state. Taps still emit `Select`.
    #[default]
    Default,
    /// Chips carry a delete affordance.
    Deletable,
    /// Chips show a checkmark when their id is in the selection set.
    Selectable(SelectionMode),
}

impl TagGridStyle {
    pub const fn is_deletable(self) -> bool {
        matches!(self, Self::Deletable)
    }

    pub const fn is_selectable(self) -> bool {
        matches!(self, Self::Selectable(_))
    }

    /// Status for a chip whose selection membership is `selected`.
    pub const fn chip_status(self, selected: bool) -> ChipStatus {
        match self {
            Self::Default => ChipStatus::Default,
            Self::Deletable => ChipStatus::Deletable,
            Self::Selectable(_) if selected => ChipStatus::Selected,
            Self::Selectable(_) => ChipStatus::Default,
        }
    }
}

/// Error from validating or parsing a [`TagGridConfig`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Spacing below zero.
    NegativeSpacing(f64),
    /// Inset below zero.
    NegativeInset(f64),
    /// A numeric field was NaN or infinite.
    NonFiniteValue { field: &'static str },
    /// Font scale that is not a finite positive number.
    InvalidFontScale(f64),
    /// Malformed JSON.
    #[cfg(feature = "serde")]
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeSpacing(v) => write!(f, "spacing must be non-negative, got {v}"),
            Self::NegativeInset(v) => write!(f, "inset must be non-negative, got {v}"),
            Self::NonFiniteValue { field } => write!(f, "{field} must be finite"),
            Self::InvalidFontScale(v) => {
                write!(f, "font scale must be finite and positive, got {v}")
            }
            #[cfg(feature = "serde")]
            Self::Parse(msg) => write!(f, "invalid grid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Check a font scale without falling back.
pub fn check_font_scale(scale: f64) -> Result<f64, ConfigError> {
    if scale.is_finite() && scale > 0.0 {
        Ok(scale)
    } else {
        Err(ConfigError::InvalidFontScale(scale))
    }
}

/// Configuration for a [`TagGrid`](crate::tag_grid::TagGrid).
///
/// ```
/// use tagflow_widgets::config::{SelectionMode, TagGridConfig, TagGridStyle};
/// use tagflow_widgets::chip::ChipSize;
///
/// let config = TagGridConfig::new(TagGridStyle::Selectable(SelectionMode::Multiple))
///     .with_size(ChipSize::Small)
///     .with_spacing(4.0);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.inset, 8.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TagGridConfig {
    pub style: TagGridStyle,
    pub size: ChipSize,
    /// Offer a context-menu "Delete" on each chip.
    pub menu_enabled: bool,
    /// Gap between chips in a row and between rows.
    pub spacing: f64,
    /// Padding between the container edge and the chips.
    pub inset: f64,
}

impl TagGridConfig {
    pub fn new(style: TagGridStyle) -> Self {
        Self {
            style,
            size: ChipSize::Normal,
            menu_enabled: false,
            spacing: DEFAULT_SPACING,
            inset: DEFAULT_INSET,
        }
    }

    #[must_use]
    pub fn with_size(mut self, size: ChipSize) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn with_menu(mut self, enabled: bool) -> Self {
        self.menu_enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    #[must_use]
    pub fn with_inset(mut self, inset: f64) -> Self {
        self.inset = inset;
        self
    }

    /// Reject negative or non-finite spacing and inset.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.spacing.is_finite() {
            return Err(ConfigError::NonFiniteValue { field: "spacing" });
        }
        if self.spacing < 0.0 {
            return Err(ConfigError::NegativeSpacing(self.spacing));
        }
        if !self.inset.is_finite() {
            return Err(ConfigError::NonFiniteValue { field: "inset" });
        }
        if self.inset < 0.0 {
            return Err(ConfigError::NegativeInset(self.inset));
        }
        Ok(())
    }

    /// Clamp spacing and inset into range instead of rejecting them.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.spacing = sanitize_extent(self.spacing);
        self.inset = sanitize_extent(self.inset);
        self
    }

    /// Parse and validate a JSON config. Missing fields take defaults.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Whether moving from `self` to `other` changes chip sizes.
    pub(crate) fn sizing_differs(&self, other: &Self) -> bool {
        self.size != other.size || self.style.is_deletable() != other.style.is_deletable()
    }

    /// Whether moving from `self` to `other` changes placement only.
    pub(crate) fn spacing_differs(&self, other: &Self) -> bool {
        self.spacing != other.spacing || self.inset != other.inset
    }
}

impl Default for TagGridConfig {
    fn default() -> Self {
        Self::new(TagGridStyle::Default)
    }
}
