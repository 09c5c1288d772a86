/// Fly-through camera and its visibility queries
///
/// Input glue drives the camera with [`Command`]s: a press sets one velocity
/// component, the matching release clears it, and [`Camera::update`]
/// integrates whatever is set once per frame.
use log::debug;

use crate::config::CameraConfig;
use crate::frustum::Frustum;
use crate::geometry::{Direction, LineSegment, Point, Sphere, Triangle};
use crate::matrix::Mat4;
use crate::projection::{focal_scale, perspective};
use crate::quaternion::Quaternion;
use crate::transform::Transform;
use crate::vector::Vec3;

/// Field-of-view bounds, in degrees.
pub const MIN_FOV: f32 = 0.0;
pub const MAX_FOV: f32 = 260.0;

/// Discrete input commands understood by [`Camera::press`] and
/// [`Camera::release`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    TurnXUp,
    TurnXDown,
    TurnYUp,
    TurnYDown,
    TurnZUp,
    TurnZDown,
    ZoomIn,
    ZoomOut,
    Reset,
}

impl Command {
    /// Command bound to a character key.
    pub fn from_char(c: char) -> Option<Self> {
        let command = match c.to_ascii_lowercase() {
            'w' => Self::TurnXUp,
            's' => Self::TurnXDown,
            'a' => Self::TurnYUp,
            'd' => Self::TurnYDown,
            'q' => Self::TurnZUp,
            'e' => Self::TurnZDown,
            'z' => Self::ZoomIn,
            'x' => Self::ZoomOut,
            ' ' => Self::Reset,
            _ => return None,
        };
        Some(command)
    }

    /// Command bound to a key name as browsers report it (`"ArrowUp"`, `"w"`, `" "`).
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(Self::MoveUp),
            "ArrowDown" => Some(Self::MoveDown),
            "ArrowLeft" => Some(Self::MoveLeft),
            "ArrowRight" => Some(Self::MoveRight),
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::from_char(c),
                    _ => None,
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Camera {
    config: CameraConfig,
    width: u32,
    height: u32,
    position: Point,
    orientation: Quaternion,
    /// Vertical field of view, in degrees.
    alpha: f32,
    velocity: Vec3,
    turn: Vec3,
    zooming: bool,
    projection: Mat4,
    view: Transform,
    transform: Transform,
    frustum: Frustum,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_config(width, height, CameraConfig::default())
    }

    pub fn with_config(width: u32, height: u32, config: CameraConfig) -> Self {
        let aspect = aspect_ratio(width, height);
        let alpha = config.fov_degrees.clamp(MIN_FOV, MAX_FOV);
        let e = focal_scale(alpha);
        let [x, y, z] = config.home;

        let mut camera = Self {
            width,
            height,
            position: Point::new(x, y, z),
            orientation: Quaternion::identity(),
            alpha,
            velocity: Vec3::zeros(),
            turn: Vec3::zeros(),
            zooming: false,
            projection: perspective(e, aspect, config.near, config.far),
            view: Transform::identity(),
            transform: Transform::identity(),
            frustum: Frustum::new(config.near, config.far, aspect, e),
            config,
        };
        camera.rebuild_view();
        camera
    }

    /// Restore the home pose and the configured field of view, and stop all motion.
    pub fn reset(&mut self) {
        let [x, y, z] = self.config.home;
        self.position = Point::new(x, y, z);
        self.orientation = Quaternion::identity();
        self.velocity = Vec3::zeros();
        self.turn = Vec3::zeros();
        self.alpha = self.config.fov_degrees.clamp(MIN_FOV, MAX_FOV);
        self.rebuild_projection();
        self.rebuild_view();
        debug!("camera reset to {}", self.position);
    }

    /// Change the viewport, rebuilding the frustum and projection for the new aspect ratio.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        let aspect = aspect_ratio(width, height);
        self.frustum = Frustum::new(self.config.near, self.config.far, aspect, focal_scale(self.alpha));
        self.rebuild_projection();
        self.rebuild_view();
    }

    pub fn move_up(&mut self) {
        self.velocity[1] = self.config.move_speed;
    }

    pub fn move_down(&mut self) {
        self.velocity[1] = -self.config.move_speed;
    }

    pub fn move_left(&mut self) {
        self.velocity[0] = -self.config.move_speed;
    }

    pub fn move_right(&mut self) {
        self.velocity[0] = self.config.move_speed;
    }

    pub fn turn_x_up(&mut self) {
        self.turn[0] = self.config.turn_speed;
    }

    pub fn turn_x_down(&mut self) {
        self.turn[0] = -self.config.turn_speed;
    }

    pub fn turn_y_up(&mut self) {
        self.turn[1] = self.config.turn_speed;
    }

    pub fn turn_y_down(&mut self) {
        self.turn[1] = -self.config.turn_speed;
    }

    pub fn turn_z_up(&mut self) {
        self.turn[2] = self.config.turn_speed;
    }

    pub fn turn_z_down(&mut self) {
        self.turn[2] = -self.config.turn_speed;
    }

    /// Widen the field of view by one step.
    pub fn zoom_in(&mut self) {
        if self.alpha < MAX_FOV {
            self.zooming = true;
            self.alpha = (self.alpha + self.config.zoom_step).min(MAX_FOV);
        }
    }

    /// Narrow the field of view by one step.
    pub fn zoom_out(&mut self) {
        if self.alpha > MIN_FOV {
            self.zooming = true;
            self.alpha = (self.alpha - self.config.zoom_step).max(MIN_FOV);
        }
    }

    pub fn stop_move_updown(&mut self) {
        self.velocity[1] = 0.0;
    }

    pub fn stop_move_leftright(&mut self) {
        self.velocity[0] = 0.0;
    }

    pub fn stop_turn_x(&mut self) {
        self.turn[0] = 0.0;
    }

    pub fn stop_turn_y(&mut self) {
        self.turn[1] = 0.0;
    }

    pub fn stop_turn_z(&mut self) {
        self.turn[2] = 0.0;
    }

    pub fn stop_zoom(&mut self) {
        self.zooming = false;
    }

    pub fn press(&mut self, command: Command) {
        match command {
            Command::MoveUp => self.move_up(),
            Command::MoveDown => self.move_down(),
            Command::MoveLeft => self.move_left(),
            Command::MoveRight => self.move_right(),
            Command::TurnXUp => self.turn_x_up(),
            Command::TurnXDown => self.turn_x_down(),
            Command::TurnYUp => self.turn_y_up(),
            Command::TurnYDown => self.turn_y_down(),
            Command::TurnZUp => self.turn_z_up(),
            Command::TurnZDown => self.turn_z_down(),
            Command::ZoomIn => self.zoom_in(),
            Command::ZoomOut => self.zoom_out(),
            Command::Reset => self.reset(),
        }
    }

    pub fn release(&mut self, command: Command) {
        match command {
            Command::MoveUp | Command::MoveDown => self.stop_move_updown(),
            Command::MoveLeft | Command::MoveRight => self.stop_move_leftright(),
            Command::TurnXUp | Command::TurnXDown => self.stop_turn_x(),
            Command::TurnYUp | Command::TurnYDown => self.stop_turn_y(),
            Command::TurnZUp | Command::TurnZDown => self.stop_turn_z(),
            Command::ZoomIn | Command::ZoomOut => self.stop_zoom(),
            Command::Reset => {}
        }
    }

    /// Advance one frame.
    pub fn update(&mut self) {
        if self.zooming {
            self.rebuild_projection();
        }
        if !self.turn.is_zero() {
            let step = Quaternion::from_axis_angle(self.turn.norm(), &Direction::from_vec3(self.turn));
            // Renormalize every step so the orientation does not drift.
            self.orientation = (self.orientation * step)
                .normalized()
                .unwrap_or_default();
        }
        self.position = self.position + Direction::from_vec3(self.velocity);
        self.rebuild_view();
    }

    fn rebuild_projection(&mut self) {
        let e = focal_scale(self.alpha);
        self.frustum.update(e);
        self.projection = perspective(e, self.frustum.aspect(), self.config.near, self.config.far);
        debug!("projection rebuilt for a {:.2}° field of view", self.alpha);
    }

    fn rebuild_view(&mut self) {
        let pose = Transform::translation(self.position.x(), self.position.y(), self.position.z())
            .concat(&Transform::from_quaternion(self.orientation));
        // A rigid pose is always invertible.
        self.view = pose.inverse().unwrap_or_default();
        self.transform = Transform::from_matrix(self.projection).concat(&self.view);
    }

    /// Combined view-projection transform, world space to clip space.
    pub fn get_transform(&self) -> &Transform {
        &self.transform
    }

    /// World space to view space.
    pub fn view(&self) -> &Transform {
        &self.view
    }

    pub fn projection(&self) -> &Mat4 {
        &self.projection
    }

    pub fn frustum(&self) -> &Frustum {
        &self.frustum
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn orientation(&self) -> Quaternion {
        self.orientation
    }

    /// Current vertical field of view, in degrees.
    pub fn fov(&self) -> f32 {
        self.alpha
    }

    pub fn is_zooming(&self) -> bool {
        self.zooming
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn turn_velocity(&self) -> Vec3 {
        self.turn
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// True if a view-space sphere lies entirely outside the field of view.
    pub fn outside_frustum(&self, sphere: &Sphere) -> bool {
        self.frustum.outside_sphere(sphere)
    }

    /// True if a view-space triangle faces the camera.
    ///
    /// Degenerate triangles have no front face and are never seen.
    pub fn sees(&self, triangle: &Triangle) -> bool {
        let eye = triangle.p0().length_to(&Point::origin());
        triangle
            .normal()
            .is_some_and(|normal| normal.dot(&eye) > 0.0)
    }

    /// Part of a view-space segment inside the field of view.
    pub fn visible_part(&self, segment: &LineSegment) -> Option<LineSegment> {
        self.frustum.inter(segment)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

fn aspect_ratio(width: u32, height: u32) -> f32 {
    if width == 0 || height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}
