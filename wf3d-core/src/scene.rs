/// Scene model: meshes placed in the world and the per-frame wireframe pipeline
use log::{debug, warn};

use crate::camera::{Camera, Command};
use crate::error::GeometryError;
use crate::geometry::{Point, Sphere, Triangle};
use crate::transform::Transform;
use crate::vector::Vec2;

/// A triangle mesh positioned in the world
///
/// Faces index into the vertex list. Counter-clockwise winding, seen from
/// outside, marks the front face.
#[derive(Debug, Clone, PartialEq)]
pub struct Object3D {
    name: String,
    position: Point,
    vertices: Vec<Point>,
    faces: Vec<[usize; 3]>,
}

impl Object3D {
    pub fn new(name: impl Into<String>, position: Point) -> Self {
        Self {
            name: name.into(),
            position,
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Axis-aligned cube of edge `size`, centered on its origin.
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let mut cube = Self::new("cube", Point::origin());
        for (x, y, z) in [
            (-h, -h, -h),
            (h, -h, -h),
            (h, h, -h),
            (-h, h, -h),
            (-h, -h, h),
            (h, -h, h),
            (h, h, h),
            (-h, h, h),
        ] {
            cube.add_vertex(x, y, z);
        }
        cube.faces = vec![
            [4, 5, 6],
            [4, 6, 7],
            [0, 2, 1],
            [0, 3, 2],
            [1, 2, 6],
            [1, 6, 5],
            [0, 4, 7],
            [0, 7, 3],
            [3, 7, 6],
            [3, 6, 2],
            [0, 1, 5],
            [0, 5, 4],
        ];
        cube
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    /// Append a vertex in model coordinates and return its index.
    pub fn add_vertex(&mut self, x: f32, y: f32, z: f32) -> usize {
        self.vertices.push(Point::new(x, y, z));
        self.vertices.len() - 1
    }

    /// Append a face over three existing vertices and return its index.
    pub fn add_face(&mut self, i1: usize, i2: usize, i3: usize) -> Result<usize, GeometryError> {
        let indices = [i1, i2, i3];
        if let Some(&index) = indices.iter().find(|&&i| i >= self.vertices.len()) {
            return Err(GeometryError::FaceIndex {
                index,
                vertices: self.vertices.len(),
            });
        }
        self.faces.push(indices);
        let n = self.faces.len() - 1;
        if self.face(n).and_then(|t| t.normal()).is_none() {
            warn!("face {n} of {} is degenerate and will never be drawn", self.name);
        }
        Ok(n)
    }

    pub fn remove_face(&mut self, n: usize) -> Option<[usize; 3]> {
        (n < self.faces.len()).then(|| self.faces.remove(n))
    }

    /// Remove a vertex along with every face using it; later indices shift down.
    pub fn remove_vertex(&mut self, i: usize) -> Option<Point> {
        if i >= self.vertices.len() {
            return None;
        }
        self.faces.retain(|face| !face.contains(&i));
        for face in &mut self.faces {
            for index in face.iter_mut() {
                if *index > i {
                    *index -= 1;
                }
            }
        }
        Some(self.vertices.remove(i))
    }

    /// The `n`-th face in model coordinates.
    pub fn face(&self, n: usize) -> Option<Triangle> {
        let [i1, i2, i3] = *self.faces.get(n)?;
        Some(Triangle::new(
            self.vertices[i1],
            self.vertices[i2],
            self.vertices[i3],
        ))
    }

    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// World-space bounding sphere around the object position.
    pub fn bsphere(&self) -> Sphere {
        let radius = self
            .vertices
            .iter()
            .map(|v| v.xyz().norm())
            .fold(0.0, f32::max);
        Sphere::new(self.position, radius)
    }

    /// Model matrix: translation to the object position.
    pub fn transform(&self) -> Transform {
        Transform::translation(self.position.x(), self.position.y(), self.position.z())
    }
}

/// A visible edge in normalized device coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge2 {
    pub from: Vec2,
    pub to: Vec2,
}

#[derive(Debug, Clone)]
pub struct Scene {
    camera: Camera,
    objects: Vec<Object3D>,
}

impl Scene {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            objects: Vec::new(),
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn objects(&self) -> &[Object3D] {
        &self.objects
    }

    pub fn add_object(&mut self, object: Object3D) {
        debug!(
            "adding {} ({} vertices, {} faces) at {}",
            object.name(),
            object.num_vertices(),
            object.num_faces(),
            object.position()
        );
        self.objects.push(object);
    }

    pub fn press(&mut self, command: Command) {
        self.camera.press(command);
    }

    pub fn release(&mut self, command: Command) {
        self.camera.release(command);
    }

    pub fn update(&mut self) {
        self.camera.update();
    }

    /// Every visible edge of the current frame.
    ///
    /// Objects whose bounding sphere misses the frustum are skipped whole.
    /// Edges of front faces are clipped to the frustum before projection.
    pub fn frame(&self) -> Vec<Edge2> {
        let view = self.camera.view();
        let projection = Transform::from_matrix(*self.camera.projection());
        let mut edges = Vec::new();

        for object in &self.objects {
            if self.camera.outside_frustum(&view.apply(&object.bsphere())) {
                debug!("{} is outside the field of view", object.name());
                continue;
            }

            let model_view = view.concat(&object.transform());
            for triangle in (0..object.num_faces()).filter_map(|n| object.face(n)) {
                let triangle = model_view.apply(&triangle);
                if !self.camera.sees(&triangle) {
                    continue;
                }
                for edge in triangle.edges() {
                    if let Some(visible) = self.camera.visible_part(&edge) {
                        let clipped = projection.apply(&visible);
                        edges.push(Edge2 {
                            from: clipped.begin().project(),
                            to: clipped.end().project(),
                        });
                    }
                }
            }
        }
        edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tetrahedron() -> Object3D {
        let mut o = Object3D::new("tetra", Point::origin());
        o.add_vertex(0.0, 0.0, 0.0);
        o.add_vertex(1.0, 0.0, 0.0);
        o.add_vertex(0.0, 1.0, 0.0);
        o.add_vertex(0.0, 0.0, 1.0);
        o.add_face(0, 2, 1).unwrap();
        o.add_face(0, 1, 3).unwrap();
        o.add_face(0, 3, 2).unwrap();
        o.add_face(1, 2, 3).unwrap();
        o
    }

    #[test]
    fn test_add_face_checks_indices() {
        let mut o = tetrahedron();
        assert_eq!(
            o.add_face(0, 4, 1),
            Err(GeometryError::FaceIndex { index: 4, vertices: 4 })
        );
        assert_eq!(o.num_faces(), 4);
    }

    #[test]
    fn test_face() {
        let o = tetrahedron();
        let t = o.face(3).unwrap();
        assert_eq!(t.vertices(), &[
            Point::new(1.0, 0.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
            Point::new(0.0, 0.0, 1.0),
        ]);
        assert!(o.face(4).is_none());
    }

    #[test]
    fn test_remove_face() {
        let mut o = tetrahedron();
        assert_eq!(o.remove_face(1), Some([0, 1, 3]));
        assert_eq!(o.faces(), &[[0, 2, 1], [0, 3, 2], [1, 2, 3]]);
        assert_eq!(o.remove_face(3), None);
    }

    #[test]
    fn test_remove_vertex_reindexes() {
        let mut o = tetrahedron();
        assert_eq!(o.remove_vertex(1), Some(Point::new(1.0, 0.0, 0.0)));
        // Only the face avoiding vertex 1 survives, shifted down.
        assert_eq!(o.faces(), &[[0, 2, 1]]);
        assert_eq!(o.num_vertices(), 3);
        assert_eq!(o.face(0).unwrap().p1(), Point::new(0.0, 0.0, 1.0));
        assert_eq!(o.remove_vertex(3), None);
    }

    #[test]
    fn test_bsphere() {
        let mut o = Object3D::cube(2.0);
        o.set_position(Point::new(4.0, 0.0, 0.0));
        let sphere = o.bsphere();
        assert_eq!(sphere.center, Point::new(4.0, 0.0, 0.0));
        assert!((sphere.radius - 3f32.sqrt()).abs() < 1e-6);
        assert_eq!(Object3D::new("empty", Point::origin()).bsphere().radius, 0.0);
    }

    #[test]
    fn test_cube_faces_point_outwards() {
        let cube = Object3D::cube(2.0);
        assert_eq!(cube.num_faces(), 12);
        for n in 0..cube.num_faces() {
            let t = cube.face(n).unwrap();
            let normal = t.normal().unwrap();
            let centroid = t.p0().xyz() + t.p1().xyz() + t.p2().xyz();
            assert!(normal.xyz().dot(&centroid) > 0.0, "face {n} points inwards");
        }
    }

    #[test]
    fn test_frame_draws_front_faces() {
        let mut scene = Scene::new(Camera::new(800, 600));
        scene.add_object(Object3D::cube(1.0));
        scene.update();
        let edges = scene.frame();
        // From straight ahead only the front square shows: two triangles.
        assert_eq!(edges.len(), 6);
        for edge in &edges {
            for p in [edge.from, edge.to] {
                assert!(p[0].abs() <= 1.0 && p[1].abs() <= 1.0, "{p} is off screen");
            }
        }
    }

    #[test]
    fn test_frame_culls_objects_behind() {
        let mut scene = Scene::new(Camera::new(800, 600));
        let mut cube = Object3D::cube(1.0);
        cube.set_position(Point::new(0.0, 0.0, 10.0));
        scene.add_object(cube);
        scene.update();
        assert!(scene.frame().is_empty());
    }

    #[test]
    fn test_scene_forwards_commands() {
        let mut scene = Scene::new(Camera::new(800, 600));
        scene.press(Command::MoveRight);
        scene.update();
        assert!(scene.camera().position().x() > 0.0);
        scene.release(Command::MoveRight);
        assert!(scene.camera().velocity().is_zero());
    }
}
