/// WF3D Core Library - Geometry and camera engine for wireframe rendering
///
/// This library provides the frame-independent core: fixed-size linear
/// algebra, quaternion rotations, affine transforms, frustum culling and
/// clipping, the fly-through camera, the scene model and the `.geo` loader.

pub mod camera;
pub mod config;
pub mod error;
pub mod frustum;
pub mod geo;
pub mod geometry;
pub mod matrix;
pub mod projection;
pub mod quaternion;
pub mod scene;
pub mod transform;
pub mod vector;

// Re-export commonly used types
pub use camera::{Camera, Command};
pub use config::{CameraConfig, ViewerConfig};
pub use error::{GeometryError, LoadError};
pub use frustum::{Frustum, Side};
pub use geo::{load_geo, parse_geo, Placement};
pub use geometry::{Direction, LineSegment, Plane, Point, Sphere, Triangle};
pub use matrix::{Mat4, Matrix};
pub use quaternion::Quaternion;
pub use scene::{Edge2, Object3D, Scene};
pub use transform::{Transform, Transformable};
pub use vector::{Vec2, Vec3, Vec4, Vector};
