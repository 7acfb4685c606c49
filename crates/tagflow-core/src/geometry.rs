#![forbid(unsafe_code)]

//! Geometric primitives in layout units.
//!
//! Layout units are whatever the host measures in (points, pixels, terminal
//! cells). The only requirement is that chip sizes and the container width
//! use the same unit.
//!
//! Every value that enters packing arithmetic goes through
//! [`sanitize_extent`], so NaN and negative inputs degrade to zero instead
//! of poisoning row widths.

/// Clamp a length to a finite, non-negative value.
///
/// NaN and negative values become `0.0`; positive infinity becomes
/// `f64::MAX`.
///
/// ```
/// use tagflow_core::geometry::sanitize_extent;
///
/// assert_eq!(sanitize_extent(12.5), 12.5);
/// assert_eq!(sanitize_extent(-3.0), 0.0);
/// assert_eq!(sanitize_extent(f64::NAN), 0.0);
/// assert_eq!(sanitize_extent(f64::INFINITY), f64::MAX);
/// ```
#[inline]
#[must_use]
pub fn sanitize_extent(value: f64) -> f64 {
    if value.is_nan() || value <= 0.0 {
        0.0
    } else if value.is_infinite() {
        f64::MAX
    } else {
        value
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Size {
    /// Zero size.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Create a new size. Values are stored as given.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Copy of this size with both extents run through [`sanitize_extent`].
    #[inline]
    #[must_use]
    pub fn sanitized(self) -> Self {
        Self::new(sanitize_extent(self.width), sanitize_extent(self.height))
    }

    /// Whether either extent is zero (after sanitizing).
    #[inline]
    pub fn is_empty(self) -> bool {
        let s = self.sanitized();
        s.width == 0.0 || s.height == 0.0
    }

    /// Whether both extents are within `tolerance` of `other`'s.
    #[inline]
    pub fn approx_eq(self, other: Size, tolerance: f64) -> bool {
        (self.width - other.width).abs() <= tolerance
            && (self.height - other.height).abs() <= tolerance
    }
}

/// A position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// The origin.
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle, origin at top-left.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: f64,
    /// Top edge (inclusive).
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle at `origin` with the given size.
    #[inline]
    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }
}
