#![forbid(unsafe_code)]

//! A [`TextMeasurer`] for fixed-advance fonts.
//!
//! Widths are counted in display columns, grapheme by grapheme, so wide CJK
//! and emoji clusters take two columns and combining marks take none. Useful
//! for terminal hosts and for deterministic tests.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use tagflow_core::geometry::Size;

use crate::chip::{TextMeasurer, TextStyle, normalize_scale};

/// Column-counting text measurer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMeasurer {
    advance: f64,
    line_height: f64,
    scale_with_style: bool,
}

impl MonospaceMeasurer {
    /// One unit per column, one unit per line, style and scale ignored.
    ///
    /// This is what a character-cell grid wants.
    pub const fn terminal() -> Self {
        Self {
            advance: 1.0,
            line_height: 1.0,
            scale_with_style: false,
        }
    }

    /// A measurer with the given column advance and line height at Body size.
    ///
    /// Other styles scale proportionally to their point size, and the font
    /// scale multiplies everything.
    pub fn new(advance: f64, line_height: f64) -> Self {
        Self {
            advance: tagflow_core::sanitize_extent(advance),
            line_height: tagflow_core::sanitize_extent(line_height),
            scale_with_style: true,
        }
    }

    fn factor(&self, style: TextStyle, scale: f64) -> f64 {
        if self.scale_with_style {
            style.point_size() / TextStyle::Body.point_size() * normalize_scale(scale)
        } else {
            1.0
        }
    }
}

impl Default for MonospaceMeasurer {
    fn default() -> Self {
        Self::terminal()
    }
}

impl TextMeasurer for MonospaceMeasurer {
    fn measure_text(&self, text: &str, style: TextStyle, scale: f64) -> Size {
        let factor = self.factor(style, scale);
        let columns = display_width(text) as f64;
        Size::new(columns * self.advance * factor, self.line_height * factor)
    }
}

/// Display width of `text` in terminal columns.
pub fn display_width(text: &str) -> usize {
    if text.is_ascii() {
        return text.bytes().filter(|b| (0x20..=0x7E).contains(b)).count();
    }
    text.graphemes(true).map(grapheme_width).sum()
}

fn grapheme_width(grapheme: &str) -> usize {
    if grapheme.chars().all(char::is_control) {
        return 0;
    }
    UnicodeWidthStr::width(grapheme)
}
