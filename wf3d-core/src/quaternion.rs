/// Rotations as quaternions
use std::fmt;
use std::ops::{Add, Mul, MulAssign, Sub};

use crate::geometry::{Direction, Point};
use crate::vector::{Vec3, Vec4};

/// A quaternion stored as `(x, y, z, w)`, with `w` the real part.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion(Vec4);

impl Quaternion {
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self(Vec4::new([x, y, z, w]))
    }

    pub const fn identity() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    /// Rotation of `degrees` around `axis` (right-hand rule).
    ///
    /// The axis is normalized first; a zero axis yields the identity.
    pub fn from_axis_angle(degrees: f32, axis: &Direction) -> Self {
        let Some(axis) = axis.xyz().to_unit() else {
            return Self::identity();
        };
        let (sin, cos) = (degrees.to_radians() / 2.0).sin_cos();
        Self::new(axis[0] * sin, axis[1] * sin, axis[2] * sin, cos)
    }

    pub fn x(&self) -> f32 {
        self.0[0]
    }

    pub fn y(&self) -> f32 {
        self.0[1]
    }

    pub fn z(&self) -> f32 {
        self.0[2]
    }

    pub fn w(&self) -> f32 {
        self.0[3]
    }

    pub fn as_vector(&self) -> &Vec4 {
        &self.0
    }

    /// Imaginary part.
    pub fn im(&self) -> Vec3 {
        Vec3::new([self.x(), self.y(), self.z()])
    }

    /// Real part.
    pub fn re(&self) -> f32 {
        self.w()
    }

    pub fn norm(&self) -> f32 {
        self.0.norm()
    }

    pub fn conjugate(&self) -> Self {
        Self::new(-self.x(), -self.y(), -self.z(), self.w())
    }

    /// Conjugate scaled by `1 / |q|²`, or `None` for the zero quaternion.
    pub fn inverse(&self) -> Option<Self> {
        let n2 = self.0.norm_squared();
        if n2 == 0.0 {
            return None;
        }
        Some(self.conjugate() * (1.0 / n2))
    }

    /// Same rotation scaled back to unit length.
    pub fn normalized(&self) -> Option<Self> {
        self.0.to_unit().map(Self)
    }

    pub fn is_unit(&self) -> bool {
        self.0.is_unit()
    }

    /// Sandwich product `q · p · q⁻¹`, with the point's homogeneous
    /// coordinate as the real part.
    pub fn rotate(&self, p: &Point) -> Point {
        let Some(inverse) = self.inverse() else {
            return *p;
        };
        let pure = Self(*p.as_vector());
        let rotated = *self * pure * inverse;
        Point::new(rotated.x(), rotated.y(), rotated.z())
    }

    pub fn approx_eq(&self, other: &Self, tolerance: f32) -> bool {
        self.0.approx_eq(&other.0, tolerance)
    }

    /// Equal as rotations: `q` and `-q` describe the same orientation.
    pub fn same_rotation(&self, other: &Self, tolerance: f32) -> bool {
        self.approx_eq(other, tolerance) || self.approx_eq(&(*other * -1.0), tolerance)
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<Vec4> for Quaternion {
    fn from(v: Vec4) -> Self {
        Self(v)
    }
}

/// Hamilton product.
impl Mul for Quaternion {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let (v1, s1) = (self.im(), self.re());
        let (v2, s2) = (rhs.im(), rhs.re());
        let cross = v1.cross(&v2).unwrap_or_default();
        let v = v2 * s1 + v1 * s2 + cross;
        Self::new(v[0], v[1], v[2], s1 * s2 - v1.dot(&v2))
    }
}

impl MulAssign for Quaternion {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Mul<f32> for Quaternion {
    type Output = Self;

    fn mul(self, s: f32) -> Self {
        Self(self.0 * s)
    }
}

impl Add for Quaternion {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Quaternion {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl fmt::Display for Quaternion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
