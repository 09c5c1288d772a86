/// Viewer configuration
///
/// Every field has a default, so a configuration file only needs to name
/// the values it changes:
///
/// ```toml
/// frame_rate = 60
///
/// [camera]
/// fov_degrees = 60.0
/// home = [0.0, 1.0, 5.0]
/// ```
use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// Camera optics and per-frame motion magnitudes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    /// Initial vertical field of view, in degrees.
    pub fov_degrees: f32,
    /// Distance to the near clipping plane.
    pub near: f32,
    /// Distance to the far clipping plane.
    pub far: f32,
    /// Translation per frame while a move command is held.
    pub move_speed: f32,
    /// Rotation per frame, in degrees, while a turn command is held.
    pub turn_speed: f32,
    /// Field-of-view change, in degrees, per zoom command.
    pub zoom_step: f32,
    /// Position restored by `reset`.
    pub home: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 80.0,
            near: 0.5,
            far: 100.0,
            move_speed: 0.05,
            turn_speed: 1.0,
            zoom_step: 0.5,
            home: [0.0, 0.0, 3.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    pub camera: CameraConfig,
    /// Distance between consecutive objects loaded from mesh files.
    pub object_spacing: f32,
    /// Target frames per second of the render loop.
    pub frame_rate: u32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            object_spacing: 0.5,
            frame_rate: 30,
        }
    }
}

impl CameraConfig {
    /// Reject values that would put NaN into the projection.
    pub fn validate(&self) -> Result<(), LoadError> {
        let finite = [
            ("fov_degrees", self.fov_degrees),
            ("near", self.near),
            ("far", self.far),
            ("move_speed", self.move_speed),
            ("turn_speed", self.turn_speed),
            ("zoom_step", self.zoom_step),
        ];
        if let Some(&(field, _)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return invalid(field, "must be finite");
        }
        if !self.home.iter().all(|c| c.is_finite()) {
            return invalid("home", "must be finite");
        }
        if self.near <= 0.0 {
            return invalid("near", "must be positive");
        }
        if self.far <= self.near {
            return invalid("far", "must be greater than near");
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &'static str) -> Result<(), LoadError> {
    Err(LoadError::ConfigValue { field, reason })
}

impl ViewerConfig {
    /// Parse and validate a TOML configuration.
    pub fn from_toml_str(text: &str) -> Result<Self, LoadError> {
        let config: Self = toml::from_str(text)?;
        config.camera.validate()?;
        Ok(config)
    }
}
