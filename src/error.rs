use thiserror::Error;

/// Top-level error type for the sweep mesh generator.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error(transparent)]
    Curve(#[from] CurveError),

    #[error(transparent)]
    Tessellation(#[from] TessellationError),
}

/// Errors raised while building the curve collaborators (centerlines, width curves).
#[derive(Debug, Error)]
pub enum CurveError {
    #[error("width curve needs at least one point")]
    EmptyWidthCurve,

    #[error("width curve offset {offset} at index {index} is outside [0, 1]")]
    OffsetOutOfRange { index: usize, offset: f64 },

    #[error("width curve offsets must be sorted: index {index} has {offset} after {previous}")]
    UnsortedOffsets {
        index: usize,
        offset: f64,
        previous: f64,
    },

    #[error("non-finite value in {0}")]
    NonFinite(&'static str),
}

/// Errors related to the generated mesh buffers.
#[derive(Debug, Error)]
pub enum TessellationError {
    #[error("attribute buffer `{name}` has {actual} entries, expected {expected}")]
    BufferLength {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("triangle {triangle} references vertex {index}, but only {vertex_count} exist")]
    IndexOutOfRange {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("triangle {0} references the same vertex more than once")]
    DegenerateTriangle(usize),
}

/// Convenience type alias for results using [`SweepError`].
pub type Result<T> = std::result::Result<T, SweepError>;
