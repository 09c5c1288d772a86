/// Fixed-size vectors with compile-time dimension
use std::fmt;
use std::ops::{Add, AddAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::error::GeometryError;

/// Tolerance used by the approximate predicates (`is_unit`, `is_ortho`, ...).
pub const EPSILON: f32 = 1e-5;

/// An ordered tuple of `N` components.
///
/// A `Vector` always holds meaningful numbers. Operations that can
/// degenerate (normalizing a zero vector, inverting a singular matrix)
/// return `Option` instead of a sentinel value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector<const N: usize> {
    data: [f32; N],
}

pub type Vec2 = Vector<2>;
pub type Vec3 = Vector<3>;
pub type Vec4 = Vector<4>;

impl<const N: usize> Vector<N> {
    pub const fn new(data: [f32; N]) -> Self {
        Self { data }
    }

    /// Build a vector from untrusted data, rejecting NaN and infinities.
    pub fn checked(data: [f32; N]) -> Option<Self> {
        data.iter().all(|c| c.is_finite()).then_some(Self { data })
    }

    pub const fn zeros() -> Self {
        Self { data: [0.0; N] }
    }

    /// A vector with every component set to `value`.
    pub const fn splat(value: f32) -> Self {
        Self { data: [value; N] }
    }

    pub fn from_fn(f: impl FnMut(usize) -> f32) -> Self {
        Self {
            data: std::array::from_fn(f),
        }
    }

    pub const fn dim(&self) -> usize {
        N
    }

    pub fn as_array(&self) -> &[f32; N] {
        &self.data
    }

    pub fn into_array(self) -> [f32; N] {
        self.data
    }

    /// Component `i`, or a range error past the declared dimension.
    pub fn at(&self, i: usize) -> Result<f32, GeometryError> {
        self.data
            .get(i)
            .copied()
            .ok_or(GeometryError::OutOfRange { index: i, len: N })
    }

    pub fn dot(&self, other: &Self) -> f32 {
        self.data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| a * b)
            .sum()
    }

    /// Cross product of the first three components of both operands.
    ///
    /// Fails with a range error if either operand has fewer than 3 components.
    pub fn cross<const M: usize>(&self, other: &Vector<M>) -> Result<Vec3, GeometryError> {
        if N < 3 {
            return Err(GeometryError::OutOfRange { index: 2, len: N });
        }
        if M < 3 {
            return Err(GeometryError::OutOfRange { index: 2, len: M });
        }
        let (a, b) = (&self.data[..], &other.as_array()[..]);
        Ok(Vector::new([
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]))
    }

    pub fn norm_squared(&self) -> f32 {
        self.dot(self)
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f32 {
        self.norm_squared().sqrt()
    }

    /// The vector scaled to unit length, or `None` for a zero vector.
    pub fn to_unit(&self) -> Option<Self> {
        let n = self.norm();
        if n == 0.0 || !n.is_finite() {
            return None;
        }
        Some(*self * (1.0 / n))
    }

    pub fn is_unit(&self) -> bool {
        (self.norm() - 1.0).abs() <= EPSILON
    }

    /// True if both vectors are non-zero, point in different directions,
    /// and are perpendicular.
    pub fn is_ortho(&self, other: &Self) -> bool {
        let (Some(u1), Some(u2)) = (self.to_unit(), other.to_unit()) else {
            return false;
        };
        if u1.approx_eq(&u2, EPSILON) {
            return false;
        }
        u1.dot(&u2).abs() <= EPSILON
    }

    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|c| *c == 0.0)
    }

    /// Component-wise comparison within `tolerance`.
    pub fn approx_eq(&self, other: &Self, tolerance: f32) -> bool {
        self.data
            .iter()
            .zip(other.data.iter())
            .all(|(a, b)| (a - b).abs() <= tolerance)
    }

    /// Component-wise product.
    pub fn component_mul(&self, other: &Self) -> Self {
        Self::from_fn(|i| self.data[i] * other.data[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f32> {
        self.data.iter()
    }
}

impl<const N: usize> Default for Vector<N> {
    fn default() -> Self {
        Self::zeros()
    }
}

impl<const N: usize> From<[f32; N]> for Vector<N> {
    fn from(data: [f32; N]) -> Self {
        Self::new(data)
    }
}

impl<const N: usize> From<nalgebra::SVector<f32, N>> for Vector<N> {
    fn from(v: nalgebra::SVector<f32, N>) -> Self {
        Self::from_fn(|i| v[i])
    }
}

impl<const N: usize> From<Vector<N>> for nalgebra::SVector<f32, N> {
    fn from(v: Vector<N>) -> Self {
        nalgebra::SVector::from_column_slice(v.as_array())
    }
}

impl<const N: usize> Index<usize> for Vector<N> {
    type Output = f32;

    fn index(&self, i: usize) -> &f32 {
        &self.data[i]
    }
}

impl<const N: usize> IndexMut<usize> for Vector<N> {
    fn index_mut(&mut self, i: usize) -> &mut f32 {
        &mut self.data[i]
    }
}

impl<const N: usize> Add for Vector<N> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::from_fn(|i| self.data[i] + rhs.data[i])
    }
}

/// Adds a scalar to every component.
impl<const N: usize> Add<f32> for Vector<N> {
    type Output = Self;

    fn add(self, rhs: f32) -> Self {
        Self::from_fn(|i| self.data[i] + rhs)
    }
}

impl<const N: usize> AddAssign for Vector<N> {
    fn add_assign(&mut self, rhs: Self) {
        for (a, b) in self.data.iter_mut().zip(rhs.data) {
            *a += b;
        }
    }
}

impl<const N: usize> Sub for Vector<N> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::from_fn(|i| self.data[i] - rhs.data[i])
    }
}

impl<const N: usize> SubAssign for Vector<N> {
    fn sub_assign(&mut self, rhs: Self) {
        for (a, b) in self.data.iter_mut().zip(rhs.data) {
            *a -= b;
        }
    }
}

impl<const N: usize> Neg for Vector<N> {
    type Output = Self;

    fn neg(self) -> Self {
        self * -1.0
    }
}

impl<const N: usize> Mul<f32> for Vector<N> {
    type Output = Self;

    fn mul(self, s: f32) -> Self {
        Self::from_fn(|i| self.data[i] * s)
    }
}

impl<const N: usize> Mul<Vector<N>> for f32 {
    type Output = Vector<N>;

    fn mul(self, v: Vector<N>) -> Vector<N> {
        v * self
    }
}

impl<const N: usize> MulAssign<f32> for Vector<N> {
    fn mul_assign(&mut self, s: f32) {
        for a in &mut self.data {
            *a *= s;
        }
    }
}

impl<const N: usize> fmt::Display for Vector<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<")?;
        for (i, c) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{c}")?;
        }
        write!(f, ">")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_at() {
        let v = Vec2::new([1.5, 2.0]);
        assert_eq!(v.at(0), Ok(1.5));
        assert_eq!(v.at(1), Ok(2.0));
        assert_eq!(v.at(2), Err(GeometryError::OutOfRange { index: 2, len: 2 }));
    }

    #[test]
    fn test_cross() {
        let v1 = Vec3::new([2.0, 3.0, 4.0]);
        let v2 = Vec3::new([5.0, 6.0, 7.0]);
        assert_eq!(v1.cross(&v2), Ok(Vec3::new([-3.0, 6.0, -3.0])));

        // Mixed dimensions only use the first three components.
        let v4 = Vec4::new([1.5, 2.0, 0.0, 5.0]);
        assert!(v1.cross(&v4).is_ok());

        let v5 = Vec2::new([1.5, 2.0]);
        assert!(matches!(v1.cross(&v5), Err(GeometryError::OutOfRange { .. })));
        assert!(matches!(v5.cross(&v1), Err(GeometryError::OutOfRange { .. })));
    }

    #[test]
    fn test_dot() {
        let v1 = Vec3::new([4.0, 8.0, 10.0]);
        let v2 = Vec3::new([9.0, 2.0, 7.0]);
        assert_eq!(v1.dot(&v2), 122.0);
        assert_eq!(v1.dot(&Vec3::zeros()), 0.0);
    }

    #[test]
    fn test_is_ortho() {
        let x = Vec2::new([1.0, 0.0]);
        let y = Vec2::new([0.0, 1.0]);
        assert!(x.is_ortho(&y));
        assert!(!x.is_ortho(&x));
        assert!(!x.is_ortho(&Vec2::zeros()));

        let x3 = Vec3::new([1.0, 0.0, 0.0]);
        let y3 = Vec3::new([0.0, 2.0, 0.0]);
        assert!(x3.is_ortho(&y3));
    }

    #[test]
    fn test_norm_and_unit() {
        let v = Vec2::new([3.0, 2.0]);
        assert_relative_eq!(v.norm(), 13f32.sqrt());
        assert_eq!(Vec2::zeros().norm(), 0.0);

        let u = v.to_unit().unwrap();
        assert!(u.is_unit());
        assert_relative_eq!(u[0], 0.83205, epsilon = 1e-4);
        assert_relative_eq!(u[1], 0.55470, epsilon = 1e-4);
        assert!(!v.is_unit());
    }

    #[test]
    fn test_to_unit_zero_is_none() {
        assert_eq!(Vec3::zeros().to_unit(), None);
    }

    #[test]
    fn test_to_unit_idempotent() {
        for data in [[3.0, 2.0, 1.0], [-0.001, 5.0, 1e3], [1.0, 0.0, 0.0]] {
            let once = Vec3::new(data).to_unit().unwrap();
            let twice = once.to_unit().unwrap();
            assert!(once.approx_eq(&twice, EPSILON));
            assert_relative_eq!(twice.norm(), 1.0, epsilon = EPSILON);
        }
    }

    #[test]
    fn test_checked_rejects_nan() {
        assert!(Vec3::checked([1.0, f32::NAN, 0.0]).is_none());
        assert!(Vec3::checked([1.0, f32::INFINITY, 0.0]).is_none());
        assert_eq!(Vec3::checked([1.0, 2.0, 3.0]), Some(Vec3::new([1.0, 2.0, 3.0])));
    }

    #[test]
    fn test_operators() {
        let v1 = Vec2::new([3.0, 2.0]);
        let v2 = Vec2::new([1.0, 2.0]);
        assert_eq!(v1 - v2, Vec2::new([2.0, 0.0]));
        assert_eq!(-v1, Vec2::new([-3.0, -2.0]));
        assert_eq!(v2 * -2.0, Vec2::new([-2.0, -4.0]));
        assert_eq!(-2.0 * v2, Vec2::new([-2.0, -4.0]));
        assert_eq!(v1 + 1.0, Vec2::new([4.0, 3.0]));
        assert_eq!(v1.component_mul(&v2), Vec2::new([3.0, 4.0]));

        let mut m = v2 * -2.0;
        m *= -1.0;
        assert_eq!(m, Vec2::new([2.0, 4.0]));
        m += v1;
        assert_eq!(m, Vec2::new([5.0, 6.0]));
        m -= v1;
        assert_eq!(m, Vec2::new([2.0, 4.0]));
    }

    #[test]
    fn test_display() {
        assert_eq!(Vec3::new([1.0, 2.5, -3.0]).to_string(), "<1,2.5,-3>");
    }

    #[test]
    fn test_nalgebra_roundtrip() {
        let v = Vec4::new([1.0, 2.0, 3.0, 4.0]);
        let n: nalgebra::Vector4<f32> = v.into();
        assert_eq!(n.w, 4.0);
        assert_eq!(Vec4::from(n), v);
    }
}
