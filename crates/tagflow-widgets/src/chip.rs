#![forbid(unsafe_code)]

//! Chip sizing.
//!
//! A chip is laid out as
//!
//! ```text
//! ┌──────────────────────────────────────────────┬───────────────┐
//! │ pad·1.5  [mark] 2 [name] 4 [(count)]  pad·1.5 │ pad [x] pad   │
//! └──────────────────────────────────────────────┴───────────────┘
//!                                                  deletable only
//! ```
//!
//! with `pad` above and below the tallest of the three labels. The mark slot
//! is always reserved (checkmark when selected, `#` otherwise) so selecting a
//! chip never changes its width.
//!
//! [`ChipMetrics::preferred_size`] computes that box from text measurements
//! supplied by a [`TextMeasurer`]. The grid trusts these numbers: whatever the
//! host finally renders must match them, or rows will jitter between passes.

use tagflow_core::geometry::{Size, sanitize_extent};
use tagflow_core::tag::Tag;

/// Gap between the mark and the name.
pub const MARK_GAP: f64 = 2.0;
/// Gap between the name and the count label.
pub const COUNT_GAP: f64 = 4.0;

/// Text style a chip label is set in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextStyle {
    Body,
    Caption2,
}

impl TextStyle {
    /// Nominal point size at a font scale of 1.0.
    pub const fn point_size(self) -> f64 {
        match self {
            Self::Body => 17.0,
            Self::Caption2 => 11.0,
        }
    }
}

/// Chip size variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ChipSize {
    #[default]
    Normal,
    Small,
}

impl ChipSize {
    pub const fn text_style(self) -> TextStyle {
        match self {
            Self::Normal => TextStyle::Body,
            Self::Small => TextStyle::Caption2,
        }
    }

    /// Padding before font scaling.
    pub const fn base_padding(self) -> f64 {
        match self {
            Self::Normal => 8.0,
            Self::Small => 4.0,
        }
    }
}

/// Visual state of one chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChipStatus {
    #[default]
    Default,
    Selected,
    Deletable,
}

impl ChipStatus {
    pub const fn is_selected(self) -> bool {
        matches!(self, Self::Selected)
    }

    pub const fn is_deletable(self) -> bool {
        matches!(self, Self::Deletable)
    }
}

/// Glyphs drawn inside a chip besides its labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// Selection mark; its box also reserves the slot for the `#` prefix.
    Checkmark,
    /// Delete affordance.
    Xmark,
}

impl Symbol {
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Checkmark => "\u{2713}",
            Self::Xmark => "\u{2715}",
        }
    }
}

/// Measures text for chip sizing.
///
/// Implementations must be deterministic: the same inputs give the same size
/// for as long as the platform's font state is unchanged.
pub trait TextMeasurer {
    /// Size of `text` set in `style` at font scale `scale`.
    fn measure_text(&self, text: &str, style: TextStyle, scale: f64) -> Size;

    /// Size of a symbol glyph. Defaults to measuring its text form.
    fn measure_symbol(&self, symbol: Symbol, style: TextStyle, scale: f64) -> Size {
        self.measure_text(symbol.glyph(), style, scale)
    }
}

impl<F> TextMeasurer for F
where
    F: Fn(&str, TextStyle, f64) -> Size,
{
    fn measure_text(&self, text: &str, style: TextStyle, scale: f64) -> Size {
        self(text, style, scale)
    }
}

/// The count label shown after the name, e.g. `(12)`.
pub fn count_label(count: u64) -> String {
    format!("({count})")
}

/// Sizing configuration for chips: size variant plus font scale.
///
/// ```
/// use tagflow_core::geometry::Size;
/// use tagflow_core::tag::{Tag, TagId};
/// use tagflow_widgets::chip::{ChipMetrics, ChipSize, TextStyle};
///
/// // Every glyph is 10 wide and 20 tall.
/// let measurer = |text: &str, _: TextStyle, _: f64| {
///     Size::new(text.chars().count() as f64 * 10.0, 20.0)
/// };
/// let metrics = ChipMetrics::new(ChipSize::Normal);
/// let size = metrics.preferred_size(&Tag::new(TagId::new(1), "ab"), false, &measurer);
///
/// // mark 10 + 2 + name 20 + 4 + "(0)" 30 + padding 2 * 12
/// assert_eq!(size, Size::new(90.0, 36.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChipMetrics {
    size: ChipSize,
    scale: f64,
    padding: Option<f64>,
}

impl ChipMetrics {
    pub fn new(size: ChipSize) -> Self {
        Self {
            size,
            scale: 1.0,
            padding: None,
        }
    }

    /// Set the font scale. Non-finite or non-positive scales fall back to 1.0.
    #[must_use]
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = normalize_scale(scale);
        self
    }

    /// Replace the variant's base padding (before scaling).
    ///
    /// Terminal hosts measuring in cells usually want 0 or 1 here.
    #[must_use]
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = Some(sanitize_extent(padding));
        self
    }

    pub fn size(&self) -> ChipSize {
        self.size
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Padding after font scaling.
    pub fn padding(&self) -> f64 {
        self.padding.unwrap_or_else(|| self.size.base_padding()) * self.scale
    }

    /// Intrinsic size of the chip for `tag`.
    pub fn preferred_size<M>(&self, tag: &Tag, deletable: bool, measurer: &M) -> Size
    where
        M: TextMeasurer + ?Sized,
    {
        let style = self.size.text_style();
        let padding = self.padding();

        let mark = measurer
            .measure_symbol(Symbol::Checkmark, style, self.scale)
            .sanitized();
        let name = measurer.measure_text(tag.name(), style, self.scale).sanitized();
        let count = measurer
            .measure_text(&count_label(tag.count()), style, self.scale)
            .sanitized();

        let height = mark.height.max(name.height).max(count.height) + padding * 2.0;
        let body = mark.width + MARK_GAP + name.width + COUNT_GAP + count.width;
        let mut width = body + padding * 1.5 * 2.0;

        if deletable {
            width += self.delete_zone_width(measurer);
        }

        Size::new(width, height).sanitized()
    }

    /// Width of the trailing delete affordance.
    pub fn delete_zone_width<M>(&self, measurer: &M) -> f64
    where
        M: TextMeasurer + ?Sized,
    {
        let xmark = measurer
            .measure_symbol(Symbol::Xmark, self.size.text_style(), self.scale)
            .sanitized();
        sanitize_extent(self.padding() * 2.0 + xmark.width)
    }
}

impl Default for ChipMetrics {
    fn default() -> Self {
        Self::new(ChipSize::Normal)
    }
}

pub(crate) fn normalize_scale(scale: f64) -> f64 {
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    }
}
