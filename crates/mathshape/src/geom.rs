use std::fmt::{self, Debug, Formatter};
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// A length in em units, relative to the nominal font size.
///
/// One em is the font size, so `Em::new(0.5)` at a 12pt font is 6pt.
#[derive(Default, Copy, Clone, PartialEq, PartialOrd)]
pub struct Em(f64);

impl Em {
    /// The zero length.
    pub const fn zero() -> Self {
        Self(0.0)
    }

    /// Create an em length.
    pub const fn new(em: f64) -> Self {
        Self(em)
    }

    /// Create an em length from a length in font design units.
    pub fn from_units(units: impl Into<f64>, units_per_em: f64) -> Self {
        Self(units.into() / units_per_em)
    }

    /// The number of em units.
    pub const fn get(self) -> f64 {
        self.0
    }

    /// Convert to an absolute length at the given font size in points.
    pub fn at(self, font_size: f64) -> f64 {
        self.0 * font_size
    }
}

impl Debug for Em {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}em", self.0)
    }
}

impl Add for Em {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Em {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul<f64> for Em {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self(self.0 * rhs)
    }
}

impl Neg for Em {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

/// A font size in points that can be used as a cache key.
///
/// Wraps a finite `f64` and implements `Eq`/`Hash` over its bit pattern.
#[derive(Copy, Clone, PartialEq)]
pub struct FontSize(f64);

impl FontSize {
    /// Create a font size. The value must be finite.
    pub fn new(points: f64) -> Self {
        assert!(points.is_finite(), "font size must be finite");
        Self(points)
    }

    /// The size in points.
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl Eq for FontSize {}

impl std::hash::Hash for FontSize {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl Debug for FontSize {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}pt", self.0)
    }
}

/// Which direction a glyph is stretched along.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// A point in layout space.
///
/// The coordinate system is baseline-relative: a fragment's own origin sits
/// on its baseline and the y axis grows downwards, so ascenders have
/// negative y coordinates relative to the baseline.
#[derive(Default, Debug, Copy, Clone, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// The origin point.
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Create a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// A point with a zero y coordinate.
    pub const fn with_x(x: f64) -> Self {
        Self { x, y: 0.0 }
    }

    /// A point with a zero x coordinate.
    pub const fn with_y(y: f64) -> Self {
        Self { x: 0.0, y }
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

/// An axis-aligned rectangle given by its top-left corner and its size.
#[derive(Default, Debug, Copy, Clone, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

/// An RGBA color with 8-bit channels.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);

    /// Create an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}
