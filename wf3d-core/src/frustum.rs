/// View-frustum containment and segment clipping
///
/// The frustum lives in view space: the camera sits at the origin and looks
/// down `-Z`. Every plane faces inwards, so a point is outside the frustum
/// exactly when it is behind one of the six planes.
use crate::geometry::{LineSegment, Plane, Point, Sphere};
use crate::vector::EPSILON;

/// How far a clipped endpoint may sit behind a plane and still count as
/// inside, absorbing rounding in the segment-plane intersection.
const CLIP_TOLERANCE: f32 = 1e-3;

/// The six frustum planes, in clipping order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Near,
    Far,
    Left,
    Right,
    Bottom,
    Top,
}

impl Side {
    pub const ALL: [Side; 6] = [
        Side::Near,
        Side::Far,
        Side::Left,
        Side::Right,
        Side::Bottom,
        Side::Top,
    ];
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frustum {
    planes: [Plane; 6],
    near: f32,
    far: f32,
    aspect: f32,
    e: f32,
}

impl Frustum {
    /// `e` is the focal scale `1 / tan(fov / 2)`, `aspect` is width over height.
    pub fn new(near: f32, far: f32, aspect: f32, e: f32) -> Self {
        let mut frustum = Self {
            planes: [Plane::from_unit_normal(0.0, 0.0, -1.0, 0.0); 6],
            near,
            far,
            aspect,
            e,
        };
        frustum.update(e);
        frustum
    }

    /// Rebuild all six planes for a new focal scale.
    pub fn update(&mut self, e: f32) {
        self.e = e;
        let (n, f, a) = (self.near, self.far, self.aspect);

        let side = (e * e + a * a).sqrt();
        let (se, sa) = (e / side, a / side);
        let vertical = (e * e + 1.0).sqrt();
        let (ve, v1) = (e / vertical, 1.0 / vertical);

        self.planes = [
            Plane::from_unit_normal(0.0, 0.0, -1.0, -n),
            Plane::from_unit_normal(0.0, 0.0, 1.0, f),
            Plane::from_unit_normal(se, 0.0, -sa, 0.0),
            Plane::from_unit_normal(-se, 0.0, -sa, 0.0),
            Plane::from_unit_normal(0.0, ve, -v1, 0.0),
            Plane::from_unit_normal(0.0, -ve, -v1, 0.0),
        ];
    }

    pub fn plane(&self, side: Side) -> &Plane {
        &self.planes[side as usize]
    }

    pub fn planes(&self) -> &[Plane; 6] {
        &self.planes
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn focal_scale(&self) -> f32 {
        self.e
    }

    /// Which planes the point is behind, indexed like [`Side::ALL`].
    pub fn planes_behind(&self, p: &Point) -> [bool; 6] {
        self.planes.map(|plane| p.behind(&plane))
    }

    pub fn outside(&self, p: &Point) -> bool {
        self.planes.iter().any(|plane| p.behind(plane))
    }

    /// True if the sphere is entirely behind at least one plane.
    pub fn outside_sphere(&self, sphere: &Sphere) -> bool {
        self.planes.iter().any(|plane| sphere.behind(plane))
    }

    /// The part of `segment` inside the frustum, or `None` if none of it is.
    ///
    /// An endpoint outside the frustum is replaced by the first point, in
    /// [`Side::ALL`] order, where the segment crosses a plane that endpoint
    /// violates. When both endpoints are outside, the result joins the first
    /// two distinct crossings of the planes either endpoint violates.
    ///
    /// The result always runs in the same direction as `segment`.
    pub fn inter(&self, segment: &LineSegment) -> Option<LineSegment> {
        let begin_behind = self.planes_behind(&segment.begin());
        let end_behind = self.planes_behind(&segment.end());
        let begin_inside = !begin_behind.contains(&true);
        let end_inside = !end_behind.contains(&true);

        match (begin_inside, end_inside) {
            (true, true) => return Some(*segment),
            (true, false) => {
                if let Some(p) = self.first_crossing(segment, &end_behind) {
                    return Some(LineSegment::new(segment.begin(), p));
                }
            }
            (false, true) => {
                if let Some(p) = self.first_crossing(segment, &begin_behind) {
                    return Some(LineSegment::new(p, segment.end()));
                }
            }
            (false, false) => {}
        }

        // Both endpoints outside, or the single crossing was lost to rounding.
        let violated: [bool; 6] = std::array::from_fn(|i| begin_behind[i] || end_behind[i]);
        let mut crossings = self.crossings(segment, &violated);
        let first = crossings.next()?;
        let second = crossings.find(|p| !p.approx_eq(&first, EPSILON))?;

        // Keep the segment's orientation.
        let begin = segment.begin();
        if begin.distance_to(&second) < begin.distance_to(&first) {
            Some(LineSegment::new(second, first))
        } else {
            Some(LineSegment::new(first, second))
        }
    }

    fn first_crossing(&self, segment: &LineSegment, violated: &[bool; 6]) -> Option<Point> {
        self.crossings(segment, violated).next()
    }

    /// Intersections with the violated planes that lie on the segment and
    /// inside the frustum, in plane order.
    fn crossings<'a>(
        &'a self,
        segment: &'a LineSegment,
        violated: &'a [bool; 6],
    ) -> impl Iterator<Item = Point> + 'a {
        self.planes
            .iter()
            .zip(violated.iter())
            .filter(|&(_, &behind)| behind)
            .filter_map(move |(plane, _)| crossing(segment, plane))
            .filter(move |p| self.contains_within(p, CLIP_TOLERANCE))
    }

    fn contains_within(&self, p: &Point, tolerance: f32) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.signed_distance(p) >= -tolerance)
    }
}

/// Where `segment` crosses `plane`, measured from the endpoint in front of it.
///
/// Stepping from the far side of the plane loses precision in proportion to
/// that endpoint's distance, which can push the crossing past the tolerance.
fn crossing(segment: &LineSegment, plane: &Plane) -> Option<Point> {
    if segment.begin().behind(plane) {
        LineSegment::new(segment.end(), segment.begin()).inter(plane)
    } else {
        segment.inter(plane)
    }
}
