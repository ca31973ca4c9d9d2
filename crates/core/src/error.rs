//! Error types for the star field engine.

use thiserror::Error;

/// Errors produced by star field operations.
#[derive(Debug, Error)]
pub enum StarFieldError {
    /// A construction-time setting was rejected (zero particle count,
    /// inverted duration range, non-finite parameter).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A trigger carried input the engine cannot act on (non-finite origin).
    #[error("invalid trigger: {0}")]
    InvalidTrigger(String),

    /// Surface width or height was zero, negative, or not finite.
    #[error("invalid dimensions: surface width and height must be finite and positive")]
    InvalidDimensions,

    /// A frame tick was negative or not finite.
    #[error("invalid time step: {0} ms")]
    InvalidTimeStep(f64),

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Writing or reading an artifact (snapshot, seed file) failed.
    #[error("io error: {0}")]
    Io(String),
}
