use log::debug;

pub mod bench;
pub mod complex;
pub mod coord;
pub mod error;
pub mod painter;
pub mod params;
pub mod raster;
pub mod solver;
pub mod threads;

pub use crate::coord::Viewport;
pub use crate::error::Error;
pub use crate::painter::{EscapeTimePainter, Painter};
pub use crate::params::{FractalKind, RenderParams};
pub use crate::raster::Raster;

use crate::solver::{FractalState, Solver, VecSolver, VecState};

/// Renders one grayscale raster.
///
/// Pure function of its inputs: no state survives between calls and
/// identical inputs always produce identical rasters. Fails wholesale on
/// invalid input; it never returns a partially filled buffer.
pub fn generate(viewport: &Viewport, params: &RenderParams) -> Result<Raster, Error> {
    viewport.validate()?;
    params.validate()?;
    debug!(
        "rendering {} {}x{} (max_iterations={}, zoom={})",
        params.kind, viewport.width, viewport.height, params.max_iterations, params.zoom
    );
    let initial = VecState::initialize(viewport, params);
    let solved = VecSolver::from_params(params).solve(initial);
    Ok(EscapeTimePainter::new(params.max_iterations).paint(&solved))
}

/// Same contract as [`generate`], computed on `threads` row-split workers.
///
/// Parallelism is purely a performance choice: the output raster is
/// byte-identical to the single-threaded one.
pub fn generate_parallel(
    viewport: &Viewport,
    params: &RenderParams,
    threads: usize,
) -> Result<Raster, Error> {
    if threads == 0 {
        return Err(Error::InvalidParameters(
            "thread count must be at least 1".to_string(),
        ));
    }
    viewport.validate()?;
    params.validate()?;
    debug!(
        "rendering {} {}x{} on {} threads (max_iterations={}, zoom={})",
        params.kind, viewport.width, viewport.height, threads, params.max_iterations, params.zoom
    );
    let initial = VecState::initialize(viewport, params);
    let solved = VecSolver::from_params(params).threaded(threads).solve(initial);
    Ok(EscapeTimePainter::new(params.max_iterations).paint(&solved))
}
