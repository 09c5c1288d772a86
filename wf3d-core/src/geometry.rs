/// Geometry primitives for 3D wireframe rendering
///
/// Every primitive lives in homogeneous 3D space: points carry `w = 1`,
/// directions carry `w = 0`, so a single 4×4 matrix translates the former
/// and leaves the latter untranslated.
use std::cell::OnceCell;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use crate::quaternion::Quaternion;
use crate::vector::{Vec2, Vec3, Vec4};

/// A homogeneous position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point(Vec4);

impl Point {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self(Vec4::new([x, y, z, 1.0]))
    }

    pub const fn origin() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn from_vec3(v: Vec3) -> Self {
        Self::new(v[0], v[1], v[2])
    }

    /// Wraps a transformed homogeneous vector, keeping its `w`.
    ///
    /// Affine transforms keep `w = 1`; a projection may not.
    pub const fn from_homogeneous(v: Vec4) -> Self {
        Self(v)
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

    pub fn xyz(&self) -> Vec3 {
        Vec3::new([self.x(), self.y(), self.z()])
    }

    pub fn as_vector(&self) -> &Vec4 {
        &self.0
    }

    /// True if the point lies strictly on the negative side of `plane`.
    pub fn behind(&self, plane: &Plane) -> bool {
        plane.signed_distance(self) < 0.0
    }

    /// Displacement from this point to `other`.
    pub fn length_to(&self, other: &Point) -> Direction {
        Direction::from_vec3(other.xyz() - self.xyz())
    }

    pub fn distance_to(&self, other: &Point) -> f32 {
        self.length_to(other).norm()
    }

    /// True if the point is strictly farther than the radius from the center.
    pub fn outside(&self, sphere: &Sphere) -> bool {
        self.distance_to(&sphere.center) > sphere.radius
    }

    pub fn rotate(&self, q: &Quaternion) -> Point {
        q.rotate(self)
    }

    /// Perspective divide onto the `z = w` plane; a zero `w` counts as 1.
    pub fn project(&self) -> Vec2 {
        let w = if self.w() == 0.0 { 1.0 } else { self.w() };
        Vec2::new([self.x() / w, self.y() / w])
    }

    pub fn approx_eq(&self, other: &Self, tolerance: f32) -> bool {
        self.0.approx_eq(&other.0, tolerance)
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::origin()
    }
}

impl Add<Direction> for Point {
    type Output = Point;

    fn add(self, d: Direction) -> Point {
        Point(self.0 + d.0)
    }
}

impl Sub for Point {
    type Output = Direction;

    fn sub(self, other: Point) -> Direction {
        other.length_to(&self)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A homogeneous displacement or normal.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Direction(Vec4);

impl Direction {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self(Vec4::new([x, y, z, 0.0]))
    }

    pub fn from_vec3(v: Vec3) -> Self {
        Self::new(v[0], v[1], v[2])
    }

    /// Wraps a transformed homogeneous vector, keeping its `w`.
    pub const fn from_homogeneous(v: Vec4) -> Self {
        Self(v)
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

    pub fn xyz(&self) -> Vec3 {
        Vec3::new([self.x(), self.y(), self.z()])
    }

    pub fn as_vector(&self) -> &Vec4 {
        &self.0
    }

    pub fn dot(&self, other: &Direction) -> f32 {
        self.xyz().dot(&other.xyz())
    }

    pub fn cross(&self, other: &Direction) -> Direction {
        // Both operands have three spatial components.
        Direction::from_vec3(self.xyz().cross(&other.xyz()).unwrap_or_default())
    }

    pub fn norm(&self) -> f32 {
        self.xyz().norm()
    }

    pub fn to_unit(&self) -> Option<Direction> {
        self.xyz().to_unit().map(Direction::from_vec3)
    }

    pub fn is_zero(&self) -> bool {
        self.xyz().is_zero()
    }

    pub fn approx_eq(&self, other: &Self, tolerance: f32) -> bool {
        self.0.approx_eq(&other.0, tolerance)
    }
}

impl Add for Direction {
    type Output = Direction;

    fn add(self, other: Direction) -> Direction {
        Direction(self.0 + other.0)
    }
}

impl Neg for Direction {
    type Output = Direction;

    fn neg(self) -> Direction {
        Direction::from_vec3(-self.xyz())
    }
}

impl Mul<f32> for Direction {
    type Output = Direction;

    fn mul(self, s: f32) -> Direction {
        Direction::from_vec3(self.xyz() * s)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// The plane `ax + by + cz + d = 0`, stored with a unit normal `(a, b, c)`.
///
/// Points with a positive signed distance are in front of the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane(Vec4);

impl Plane {
    /// Normalizes `(a, b, c, d)` by the length of `(a, b, c)`.
    ///
    /// Returns `None` when the normal is zero.
    pub fn new(a: f32, b: f32, c: f32, d: f32) -> Option<Self> {
        let n = Vec3::new([a, b, c]).norm();
        if n == 0.0 || !n.is_finite() {
            return None;
        }
        Some(Self(Vec4::new([a / n, b / n, c / n, d / n])))
    }

    /// Wraps `(a, b, c, d)` as is; `(a, b, c)` must already be unit length.
    pub(crate) const fn from_unit_normal(a: f32, b: f32, c: f32, d: f32) -> Self {
        Self(Vec4::new([a, b, c, d]))
    }

    /// The plane through `point` facing along `normal`.
    pub fn from_point_normal(point: &Point, normal: &Direction) -> Option<Self> {
        let n = normal.to_unit()?;
        Self::new(n.x(), n.y(), n.z(), -n.dot(&Direction::from_vec3(point.xyz())))
    }

    pub fn normal(&self) -> Direction {
        Direction::new(self.0[0], self.0[1], self.0[2])
    }

    pub fn offset(&self) -> f32 {
        self.0[3]
    }

    pub fn as_vector(&self) -> &Vec4 {
        &self.0
    }

    pub fn signed_distance(&self, p: &Point) -> f32 {
        self.normal().xyz().dot(&p.xyz()) + self.offset()
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A bounding sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Point,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Point, radius: f32) -> Self {
        Self { center, radius }
    }

    /// True only if the whole sphere is on the negative side of `plane`.
    /// A sphere touching the plane is not behind it.
    pub fn behind(&self, plane: &Plane) -> bool {
        plane.signed_distance(&self.center) + self.radius < 0.0
    }
}

impl fmt::Display for Sphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.center, self.radius)
    }
}

/// A triangle face defined by three points
///
/// The winding order decides which side is the front face.
#[derive(Debug, Clone)]
pub struct Triangle {
    vertices: [Point; 3],
    area: OnceCell<f32>,
}

impl Triangle {
    pub fn new(p0: Point, p1: Point, p2: Point) -> Self {
        Self {
            vertices: [p0, p1, p2],
            area: OnceCell::new(),
        }
    }

    pub fn vertices(&self) -> &[Point; 3] {
        &self.vertices
    }

    pub fn p0(&self) -> Point {
        self.vertices[0]
    }

    pub fn p1(&self) -> Point {
        self.vertices[1]
    }

    pub fn p2(&self) -> Point {
        self.vertices[2]
    }

    fn edge_cross(&self) -> Direction {
        let [v0, v1, v2] = self.vertices;
        v0.length_to(&v1).cross(&v0.length_to(&v2))
    }

    /// Unit face normal, or `None` for a degenerate triangle.
    pub fn normal(&self) -> Option<Direction> {
        self.edge_cross().to_unit()
    }

    /// Area, computed on first request.
    pub fn area(&self) -> f32 {
        *self.area.get_or_init(|| self.edge_cross().norm() / 2.0)
    }

    /// The three edges, in the order `p0p1`, `p0p2`, `p1p2`.
    pub fn edges(&self) -> [LineSegment; 3] {
        let [v0, v1, v2] = self.vertices;
        [
            LineSegment::new(v0, v1),
            LineSegment::new(v0, v2),
            LineSegment::new(v1, v2),
        ]
    }
}

impl fmt::Display for Triangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [v0, v1, v2] = &self.vertices;
        write!(f, "({v0},{v1},{v2})")
    }
}

/// A segment between two points, with its direction and length cached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    begin: Point,
    end: Point,
    direction: Direction,
    length: f32,
}

impl LineSegment {
    pub fn new(begin: Point, end: Point) -> Self {
        let direction = begin.length_to(&end);
        Self {
            begin,
            end,
            direction,
            length: direction.norm(),
        }
    }

    pub fn begin(&self) -> Point {
        self.begin
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    /// Dot product of the segment direction with the plane normal.
    /// Zero means the segment is parallel to the plane.
    pub fn inter_coef(&self, plane: &Plane) -> f32 {
        self.direction.dot(&plane.normal())
    }

    /// Intersection with `plane`, if it exists and lies on the segment.
    pub fn inter(&self, plane: &Plane) -> Option<Point> {
        let denom = self.inter_coef(plane);
        if denom == 0.0 {
            return None;
        }
        let coef = -plane.signed_distance(&self.begin) / denom;
        let p = self.begin + self.direction * coef;

        (self.begin.distance_to(&p) <= self.length && self.end.distance_to(&p) <= self.length)
            .then_some(p)
    }
}

impl fmt::Display for LineSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.begin, self.end)
    }
}
