use thiserror::Error;

/// Errors raised by the cloth simulator.
///
/// Numeric edge cases inside a step (coincident particles, a particle at the
/// sphere centre) are handled in place and never surface here.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClothError {
    /// A configuration value is out of its valid range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A caller-provided buffer does not match the grid size.
    #[error("Buffer size mismatch: expected {expected} elements, got {actual}")]
    BufferSize { expected: usize, actual: usize },
}

pub type ClothResult<T> = Result<T, ClothError>;
