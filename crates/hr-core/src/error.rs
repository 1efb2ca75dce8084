use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("out of bounds")]
    OutOfBounds,

    #[error("invalid stride")]
    InvalidStride,

    /// The destination binding does not have the extent the dispatch writes.
    #[error(
        "destination extent mismatch: expected {}x{}, got {}x{}",
        .expected.0, .expected.1, .actual.0, .actual.1
    )]
    DestinationExtent {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("invalid thread group size {x}x{y}")]
    InvalidGroupSize { x: u32, y: u32 },
}
