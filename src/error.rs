use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FieldError {
    #[error("field dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    #[error("cell ({x}, {y}) is outside the {width}x{height} field")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    #[error("zoom must be a positive finite number, got {0}")]
    InvalidZoom(f32),
    #[error("pixel buffer holds {actual} bytes but the viewport needs {needed}")]
    BufferTooSmall { needed: usize, actual: usize },
    #[error("seed region must span at least one cell, got {0}")]
    InvalidRegion(usize),
}
