/// Perspective projection and screen mapping
use nalgebra::Matrix4;

use crate::matrix::Mat4;
use crate::vector::Vec2;

/// Bounds on the focal scale, so fields of view at or past 0° and 180°
/// still produce a usable matrix.
pub const MIN_FOCAL: f32 = 1e-3;
pub const MAX_FOCAL: f32 = 1e3;

/// Focal scale `e = 1 / tan(fov / 2)` for a vertical field of view in degrees.
pub fn focal_scale(fov_degrees: f32) -> f32 {
    let e = 1.0 / (fov_degrees.to_radians() / 2.0).tan();
    if e.is_nan() {
        MIN_FOCAL
    } else {
        e.clamp(MIN_FOCAL, MAX_FOCAL)
    }
}

/// Right-handed perspective matrix for a camera looking down `-Z`.
///
/// View-space depths `-near` and `-far` map to NDC `z = -1` and `z = 1`.
/// Requires `near < far`, which [`CameraConfig::validate`] enforces.
///
/// [`CameraConfig::validate`]: crate::config::CameraConfig::validate
pub fn perspective(e: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let fovy = 2.0 * (1.0 / e).atan();
    Matrix4::new_perspective(aspect, fovy, near, far).into()
}

/// Map normalized device coordinates to pixel (or cell) coordinates
///
/// `(-1, 1)` is the top-left corner, `(1, -1)` the bottom-right.
pub fn to_screen(ndc: Vec2, width: u32, height: u32) -> Vec2 {
    Vec2::new([
        (ndc[0] + 1.0) * 0.5 * width as f32,
        (1.0 - ndc[1]) * 0.5 * height as f32,
    ])
}
