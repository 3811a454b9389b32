use thiserror::Error;

/// Caller-input errors, all detected before any pixel is computed.
///
/// `generate` never fails mid-computation and never returns a partially
/// filled raster.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid viewport {width}x{height}: both dimensions must be nonzero")]
    InvalidViewport { width: usize, height: usize },
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
    #[error("unsupported fractal kind {0:?}: expected \"mandelbrot\" or \"julia\"")]
    UnsupportedFractalKind(String),
}
