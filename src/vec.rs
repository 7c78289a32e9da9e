//! 2D vector and size types used by the simulation.

use crate::float::Float;
use core::ops::{Add, AddAssign, Sub, Neg};

// --------------------------------------------------------------------------
// Vec2<F> — 2D vector / point
// --------------------------------------------------------------------------

/// 2D vector, also used for points (particle positions, rail anchors).
///
/// Screen convention: `+x` right, `+y` down.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vec2<F: Float> {
    pub x: F,
    pub y: F,
}

impl<F: Float> Vec2<F> {
    /// Create a new 2D vector.
    pub fn new(x: F, y: F) -> Self { Vec2 { x, y } }

    /// Zero vector.
    pub fn zero() -> Self { Vec2 { x: F::zero(), y: F::zero() } }

    /// Unit vector pointing `radians` from `+x`.
    pub fn from_angle(radians: F) -> Self {
        Vec2 { x: radians.cos(), y: radians.sin() }
    }

    /// Dot product.
    pub fn dot(self, other: Self) -> F {
        self.x * other.x + self.y * other.y
    }

    /// Scale both components by a scalar.
    pub fn scale(self, s: F) -> Self { Vec2 { x: self.x * s, y: self.y * s } }

    /// Component-wise multiplication.
    pub fn component_mul(self, other: Self) -> Self {
        Vec2 { x: self.x * other.x, y: self.y * other.y }
    }

    /// Squared length (avoids sqrt).
    pub fn length_sq(self) -> F { self.dot(self) }

    /// Length (magnitude).
    pub fn length(self) -> F { self.length_sq().sqrt() }

    /// Distance between two points.
    pub fn distance(self, other: Self) -> F { (self - other).length() }

    /// Heading of this vector in radians, `atan2(y, x)`.
    pub fn angle(self) -> F { F::atan2(self.y, self.x) }

    /// Point halfway between `self` and `other`.
    pub fn midpoint(self, other: Self) -> Self {
        (self + other).scale(F::half())
    }

    /// True when neither component is NaN or infinite.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl<F: Float> Add for Vec2<F> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self { Vec2 { x: self.x + rhs.x, y: self.y + rhs.y } }
}

impl<F: Float> AddAssign for Vec2<F> {
    fn add_assign(&mut self, rhs: Self) {
        self.x = self.x + rhs.x;
        self.y = self.y + rhs.y;
    }
}

impl<F: Float> Sub for Vec2<F> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self { Vec2 { x: self.x - rhs.x, y: self.y - rhs.y } }
}

impl<F: Float> Neg for Vec2<F> {
    type Output = Self;
    fn neg(self) -> Self { Vec2 { x: -self.x, y: -self.y } }
}

// --------------------------------------------------------------------------
// Size2<F> — rectangle extent
// --------------------------------------------------------------------------

/// Width and height of the rectangle a strip is built over.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Size2<F: Float> {
    pub width: F,
    pub height: F,
}

impl<F: Float> Size2<F> {
    pub fn new(width: F, height: F) -> Self { Size2 { width, height } }
}
