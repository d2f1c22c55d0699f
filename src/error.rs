use thiserror::Error;

/// Top-level error type for the snapmeasure crate.
///
/// Snapping and measurement never fail; these errors come from model
/// bookkeeping and configuration only.
#[derive(Debug, Error)]
pub enum SnapMeasureError {
    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors related to model parts and their transforms.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("part not found: {0}")]
    PartNotFound(String),

    #[error("non-finite vertex position at index {index}")]
    NonFinitePosition { index: usize },

    #[error("invalid transform: {0}")]
    InvalidTransform(String),

    #[error("fit extent must be positive and finite, got {0}")]
    InvalidExtent(f64),
}

/// Errors related to viewer configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Convenience type alias for results using [`SnapMeasureError`].
pub type Result<T> = std::result::Result<T, SnapMeasureError>;
