use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;

use crate::complex::{c, C};
use crate::error::Error;

lazy_static! {
    /// Classic Julia constant, fixed for every pixel. Exposing it as a user
    /// parameter is a natural extension point, deliberately not taken here.
    pub static ref JULIA_C: C<f64> = c(-0.7, 0.27015);
}

/// Which recurrence/initial-state pairing to iterate.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FractalKind {
    Mandelbrot,
    Julia,
}

impl FromStr for FractalKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.to_ascii_lowercase().as_str() {
            "mandelbrot" => Ok(Self::Mandelbrot),
            "julia" => Ok(Self::Julia),
            _ => Err(Error::UnsupportedFractalKind(s.to_string())),
        }
    }
}

impl fmt::Display for FractalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mandelbrot => write!(f, "mandelbrot"),
            Self::Julia => write!(f, "julia"),
        }
    }
}

/// Immutable settings for one render.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderParams {
    pub kind: FractalKind,
    /// Iteration bound; every pixel runs at most this many passes.
    pub max_iterations: u32,
    /// Full plane-coordinate span mapped across each viewport axis.
    pub zoom: f64,
}

impl RenderParams {
    pub fn new(kind: FractalKind, max_iterations: u32, zoom: f64) -> Self {
        Self {
            kind,
            max_iterations,
            zoom,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.max_iterations == 0 {
            return Err(Error::InvalidParameters(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if !self.zoom.is_finite() || self.zoom <= 0.0 {
            return Err(Error::InvalidParameters(format!(
                "zoom must be positive and finite, got {}",
                self.zoom
            )));
        }
        Ok(())
    }
}

impl Default for RenderParams {
    fn default() -> Self {
        Self::new(FractalKind::Mandelbrot, 100, 4.0)
    }
}
