use crate::coord::Viewport;
use crate::params::RenderParams;
use crate::threads::{Call, Join, Split, WorkerPool};

pub mod array;
pub mod simd;
pub mod vec;

pub use array::{ArraySolver, ArrayState};
pub use simd::{SimdSolver, SimdState};
pub use vec::{VecSolver, VecState};

/// Escape radius of the iteration kernel; a pixel escapes once
/// |z|^2 >= ESCAPE_RADIUS^2.
pub const ESCAPE_RADIUS: f64 = 2.0;

pub(crate) const ESCAPE_RADIUS_SQ: f64 = ESCAPE_RADIUS * ESCAPE_RADIUS;

/// Per-pixel iteration state for one render.
///
/// Initialization is where the two fractal kinds diverge: Mandelbrot seeds
/// z = 0 with c at the pixel's plane coordinate, Julia seeds z at the
/// pixel's plane coordinate with the fixed c. The recurrence itself is
/// shared by every backend.
pub trait FractalState {
    fn initialize(viewport: &Viewport, params: &RenderParams) -> Self;
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    /// Escape count for pixel (x, y); -1 if it never escaped within the
    /// iteration bound.
    fn i_value(&self, x: usize, y: usize) -> i32;
}

pub trait Solver<T> {
    fn solve(&self, state: T) -> T;

    fn threaded(self, n: usize) -> WorkerPool<T, T>
    where
        Self: Sized + Clone + Send + 'static,
        T: Split + Join + Send + 'static,
    {
        WorkerPool::with(n, || {
            let solver = self.clone();
            move |state| solver.solve(state)
        })
    }
}

impl<T> Solver<T> for WorkerPool<T, T>
where
    T: Split + Join + Send + 'static,
{
    fn solve(&self, state: T) -> T {
        self.call(state)
    }
}

/// Default backend on one worker per physical core.
pub fn default_solver(params: &RenderParams) -> WorkerPool<VecState, VecState> {
    VecSolver::from_params(params).threaded(num_cpus::get_physical())
}
