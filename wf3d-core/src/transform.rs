/// 3D affine transformations on homogeneous coordinates
use std::cell::OnceCell;
use std::fmt;

use crate::geometry::{Direction, LineSegment, Point, Sphere, Triangle};
use crate::matrix::Mat4;
use crate::quaternion::Quaternion;
use crate::vector::Vec3;

/// A 4×4 homogeneous matrix, with its equivalent rotation quaternion
/// computed on first request.
#[derive(Debug, Clone)]
pub struct Transform {
    matrix: Mat4,
    rotation: OnceCell<Quaternion>,
}

impl Transform {
    pub fn identity() -> Self {
        Self::from_matrix(Mat4::identity())
    }

    pub fn from_matrix(matrix: Mat4) -> Self {
        Self {
            matrix,
            rotation: OnceCell::new(),
        }
    }

    /// Pure rotation matrix for `q`, which is expected to be unit length.
    pub fn from_quaternion(q: Quaternion) -> Self {
        let (x, y, z, w) = (q.x(), q.y(), q.z(), q.w());
        let matrix = Mat4::new([
            [
                1.0 - 2.0 * (y * y + z * z),
                2.0 * (x * y - w * z),
                2.0 * (x * z + w * y),
                0.0,
            ],
            [
                2.0 * (x * y + w * z),
                1.0 - 2.0 * (x * x + z * z),
                2.0 * (y * z - w * x),
                0.0,
            ],
            [
                2.0 * (x * z - w * y),
                2.0 * (y * z + w * x),
                1.0 - 2.0 * (x * x + y * y),
                0.0,
            ],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        Self {
            matrix,
            rotation: OnceCell::from(q),
        }
    }

    /// Rotation of `degrees` around `axis`.
    pub fn from_axis_angle(degrees: f32, axis: &Direction) -> Self {
        Self::from_quaternion(Quaternion::from_axis_angle(degrees, axis))
    }

    /// Translation by `v`, or a diagonal scale by `v` when `scale` is set.
    pub fn from_vector(v: Vec3, scale: bool) -> Self {
        let mut m = Mat4::identity();
        for i in 0..3 {
            if scale {
                m[(i, i)] = v[i];
            } else {
                m[(i, 3)] = v[i];
            }
        }
        Self::from_matrix(m)
    }

    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        Self::from_vector(Vec3::new([x, y, z]), false)
    }

    pub fn scale(x: f32, y: f32, z: f32) -> Self {
        Self::from_vector(Vec3::new([x, y, z]), true)
    }

    pub fn matrix(&self) -> &Mat4 {
        &self.matrix
    }

    /// Composition `self · other`: the result applies `other` first, then `self`.
    pub fn concat(&self, other: &Transform) -> Transform {
        Transform::from_matrix(self.matrix * other.matrix)
    }

    pub fn inverse(&self) -> Option<Transform> {
        self.matrix.inverse().map(Transform::from_matrix)
    }

    /// Rotation quaternion equivalent to the upper-left 3×3 block.
    pub fn to_quat(&self) -> Quaternion {
        *self.rotation.get_or_init(|| matrix_to_quaternion(&self.matrix))
    }

    /// Largest factor by which the transform stretches any axis.
    pub fn max_scale(&self) -> f32 {
        (0..3)
            .map(|j| Vec3::from_fn(|i| self.matrix[(i, j)]).norm())
            .fold(0.0, f32::max)
    }

    pub fn apply<T: Transformable>(&self, value: &T) -> T {
        value.transformed(self)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl PartialEq for Transform {
    fn eq(&self, other: &Self) -> bool {
        self.matrix == other.matrix
    }
}

impl From<Mat4> for Transform {
    fn from(matrix: Mat4) -> Self {
        Self::from_matrix(matrix)
    }
}

impl From<Quaternion> for Transform {
    fn from(q: Quaternion) -> Self {
        Self::from_quaternion(q)
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.matrix, f)
    }
}

/// Trace-based extraction, branching on the largest diagonal term when the
/// trace is not positive.
fn matrix_to_quaternion(m: &Mat4) -> Quaternion {
    let (m00, m11, m22) = (m[(0, 0)], m[(1, 1)], m[(2, 2)]);
    let trace = m00 + m11 + m22;

    if trace > 0.0 {
        let s = (trace + 1.0).sqrt() * 2.0;
        Quaternion::new(
            (m[(2, 1)] - m[(1, 2)]) / s,
            (m[(0, 2)] - m[(2, 0)]) / s,
            (m[(1, 0)] - m[(0, 1)]) / s,
            0.25 * s,
        )
    } else if m00 > m11 && m00 > m22 {
        let s = (1.0 + m00 - m11 - m22).sqrt() * 2.0;
        Quaternion::new(
            0.25 * s,
            (m[(0, 1)] + m[(1, 0)]) / s,
            (m[(0, 2)] + m[(2, 0)]) / s,
            (m[(2, 1)] - m[(1, 2)]) / s,
        )
    } else if m11 > m22 {
        let s = (1.0 + m11 - m00 - m22).sqrt() * 2.0;
        Quaternion::new(
            (m[(0, 1)] + m[(1, 0)]) / s,
            0.25 * s,
            (m[(1, 2)] + m[(2, 1)]) / s,
            (m[(0, 2)] - m[(2, 0)]) / s,
        )
    } else {
        let s = (1.0 + m22 - m00 - m11).sqrt() * 2.0;
        Quaternion::new(
            (m[(0, 2)] + m[(2, 0)]) / s,
            (m[(1, 2)] + m[(2, 1)]) / s,
            0.25 * s,
            (m[(1, 0)] - m[(0, 1)]) / s,
        )
    }
}

/// Values a [`Transform`] can be applied to.
pub trait Transformable {
    fn transformed(&self, t: &Transform) -> Self;
}

impl Transformable for Point {
    fn transformed(&self, t: &Transform) -> Self {
        Point::from_homogeneous(*t.matrix() * *self.as_vector())
    }
}

/// `w = 0` cancels the translation column.
impl Transformable for Direction {
    fn transformed(&self, t: &Transform) -> Self {
        Direction::from_homogeneous(*t.matrix() * *self.as_vector())
    }
}

/// The center goes through the full matrix; the radius grows by the largest
/// axis scale. Exact for uniform scale, a bounding approximation otherwise.
impl Transformable for Sphere {
    fn transformed(&self, t: &Transform) -> Self {
        Sphere::new(t.apply(&self.center), self.radius * t.max_scale())
    }
}

impl Transformable for Triangle {
    fn transformed(&self, t: &Transform) -> Self {
        let [p0, p1, p2] = self.vertices().map(|p| t.apply(&p));
        Triangle::new(p0, p1, p2)
    }
}

impl Transformable for LineSegment {
    fn transformed(&self, t: &Transform) -> Self {
        LineSegment::new(t.apply(&self.begin()), t.apply(&self.end()))
    }
}
