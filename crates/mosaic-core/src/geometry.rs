#![forbid(unsafe_code)]

//! Geometric primitives.

/// Aspect ratio used whenever a width/height ratio cannot be formed.
pub const DEFAULT_ASPECT_RATIO: f64 = 1.0;

/// Width over height, falling back to [`DEFAULT_ASPECT_RATIO`] for a zero
/// height (or any input that would not give a finite positive ratio).
#[inline]
pub fn aspect_ratio(width: f64, height: f64) -> f64 {
    sanitize_aspect_ratio(width / height)
}

/// Clamp a declared ratio into the valid range: finite and strictly positive.
#[inline]
pub fn sanitize_aspect_ratio(ratio: f64) -> f64 {
    if ratio.is_finite() && ratio > 0.0 {
        ratio
    } else {
        DEFAULT_ASPECT_RATIO
    }
}

/// A pixel extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Zero extent.
    pub const ZERO: Self = Self::new(0, 0);

    /// Create a new size.
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Component-wise maximum.
    #[inline]
    #[must_use]
    pub fn max(self, other: Size) -> Size {
        Size::new(self.width.max(other.width), self.height.max(other.height))
    }

    /// Width over height, `1.0` when the height is zero.
    #[inline]
    pub fn aspect_ratio(&self) -> f64 {
        aspect_ratio(f64::from(self.width), f64::from(self.height))
    }

    /// Area in pixels.
    #[inline]
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width, height)
    }
}

/// A pixel rectangle for viewports, layout bounds, and hit testing.
///
/// `x`/`y` is the corner with the smallest coordinates; whether that is the
/// top-left or bottom-left on screen is a convention of the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: u32,
    /// Lower-coordinate edge (inclusive).
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    pub const fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Zero-area rectangle anchored at this rectangle's origin.
    #[inline]
    pub const fn collapsed(&self) -> Self {
        Self::new(self.x, self.y, 0, 0)
    }

    /// Extent of the rectangle.
    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Far vertical edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// Area in pixels.
    #[inline]
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width over height, `1.0` for a zero-height rectangle.
    #[inline]
    pub fn aspect_ratio(&self) -> f64 {
        self.size().aspect_ratio()
    }

    /// Check if a pixel is inside the rectangle.
    #[inline]
    pub const fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Check if a continuous point is inside the rectangle.
    ///
    /// The rectangle covers `[x, x + width) x [y, y + height)`.
    #[inline]
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= f64::from(self.x)
            && x < f64::from(self.right())
            && y >= f64::from(self.y)
            && y < f64::from(self.bottom())
    }

    /// Position of a point relative to this rectangle's origin.
    #[inline]
    pub fn relative_point(&self, x: f64, y: f64) -> (f64, f64) {
        (x - f64::from(self.x), y - f64::from(self.y))
    }

    /// Position of a point relative to this rectangle, scaled so the
    /// rectangle spans `[0, 1]` on both axes.
    ///
    /// Degenerate axes map to `0.0`.
    pub fn normalized_point(&self, x: f64, y: f64) -> (f64, f64) {
        let (rx, ry) = self.relative_point(x, y);
        let nx = if self.width == 0 {
            0.0
        } else {
            rx / f64::from(self.width)
        };
        let ny = if self.height == 0 {
            0.0
        } else {
            ry / f64::from(self.height)
        };
        (nx, ny)
    }

    /// Compute the intersection with another rectangle.
    ///
    /// Returns an empty rectangle if the rectangles don't overlap.
    #[inline]
    pub fn intersection(&self, other: &Rect) -> Rect {
        self.intersection_opt(other).unwrap_or_default()
    }

    /// Compute the intersection with another rectangle, returning `None` if no overlap.
    #[inline]
    pub fn intersection_opt(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Rect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());

        Rect {
            x,
            y,
            width: right.saturating_sub(x),
            height: bottom.saturating_sub(y),
        }
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::{Rect, Size, aspect_ratio, sanitize_aspect_ratio};
    use proptest::prelude::*;

    #[test]
    fn rect_contains_edges() {
        let rect = Rect::new(2, 3, 4, 5);
        assert!(rect.contains(2, 3));
        assert!(rect.contains(5, 7));
        assert!(!rect.contains(6, 3));
        assert!(!rect.contains(2, 8));
    }

    #[test]
    fn rect_contains_point_is_half_open() {
        let rect = Rect::new(10, 10, 10, 10);
        assert!(rect.contains_point(10.0, 10.0));
        assert!(rect.contains_point(19.99, 19.99));
        assert!(!rect.contains_point(20.0, 15.0));
        assert!(!rect.contains_point(9.5, 15.0));
    }

    #[test]
    fn rect_intersection_overlaps() {
        let a = Rect::new(0, 0, 4, 4);
        let b = Rect::new(2, 2, 4, 4);
        assert_eq!(a.intersection(&b), Rect::new(2, 2, 2, 2));
    }

    #[test]
    fn rect_intersection_no_overlap_is_empty() {
        let a = Rect::new(0, 0, 2, 2);
        let b = Rect::new(3, 3, 2, 2);
        assert_eq!(a.intersection(&b), Rect::default());
    }

    #[test]
    fn collapsed_keeps_origin() {
        let rect = Rect::new(7, 9, 30, 40);
        assert_eq!(rect.collapsed(), Rect::new(7, 9, 0, 0));
        assert!(rect.collapsed().is_empty());
    }

    #[test]
    fn zero_height_aspect_defaults_to_one() {
        assert_eq!(aspect_ratio(640.0, 0.0), 1.0);
        assert_eq!(Size::new(640, 0).aspect_ratio(), 1.0);
        assert_eq!(Rect::from_size(0, 0).aspect_ratio(), 1.0);
        assert_eq!(sanitize_aspect_ratio(f64::NAN), 1.0);
        assert_eq!(sanitize_aspect_ratio(-2.0), 1.0);
        assert_eq!(Size::new(640, 480).aspect_ratio(), 640.0 / 480.0);
    }

    #[test]
    fn normalized_point_spans_unit_square() {
        let rect = Rect::new(100, 50, 200, 100);
        assert_eq!(rect.relative_point(150.0, 75.0), (50.0, 25.0));
        assert_eq!(rect.normalized_point(300.0, 150.0), (1.0, 1.0));
        assert_eq!(Rect::new(5, 5, 0, 0).normalized_point(9.0, 9.0), (0.0, 0.0));
    }

    #[test]
    fn display_formats() {
        assert_eq!(Rect::new(1, 2, 3, 4).to_string(), "3x4+1+2");
        assert_eq!(Size::new(8, 6).to_string(), "8x6");
    }

    proptest! {
        #[test]
        fn union_contains_both(
            ax in 0u32..1000, ay in 0u32..1000, aw in 0u32..1000, ah in 0u32..1000,
            bx in 0u32..1000, by in 0u32..1000, bw in 0u32..1000, bh in 0u32..1000,
        ) {
            let a = Rect::new(ax, ay, aw, ah);
            let b = Rect::new(bx, by, bw, bh);
            let u = a.union(&b);
            prop_assert!(u.x <= a.x && u.x <= b.x);
            prop_assert!(u.right() >= a.right() && u.right() >= b.right());
            prop_assert!(u.bottom() >= a.bottom() && u.bottom() >= b.bottom());
        }

        #[test]
        fn aspect_ratio_is_always_positive(w in 0u32..10_000, h in 0u32..10_000) {
            let ratio = Size::new(w, h).aspect_ratio();
            prop_assert!(ratio.is_finite());
            prop_assert!(ratio > 0.0);
        }
    }
}
