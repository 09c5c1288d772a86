/// Error types for the geometry core and the mesh loader
use thiserror::Error;

/// Errors raised by the geometry core.
///
/// Degenerate geometry (parallel planes, zero-length normals, singular
/// matrices) is not an error; those cases are reported as `None`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A coordinate index past the declared dimension.
    #[error("index {index} out of range for dimension {len}")]
    OutOfRange { index: usize, len: usize },

    /// A face refers to a vertex the object does not have.
    #[error("face refers to vertex {index}, but the object has {vertices} vertices")]
    FaceIndex { index: usize, vertices: usize },
}

/// Errors raised while loading meshes or configuration.
#[derive(Error, Debug)]
pub enum LoadError {
    /// Malformed `.geo` text.
    #[error("parse error at byte {offset}: {message}")]
    Parse { offset: usize, message: String },

    /// Well-formed text describing an invalid mesh.
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Invalid TOML configuration.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Well-formed TOML with a value the camera cannot use.
    #[error("invalid configuration value `{field}`: {reason}")]
    ConfigValue { field: &'static str, reason: &'static str },
}

impl LoadError {
    pub fn parse(offset: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            offset,
            message: message.into(),
        }
    }
}
