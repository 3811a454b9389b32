use lazy_static::lazy_static;
use ultraviolet::{f64x4, DMat2x4, DVec2x4};
use wide::CmpGe;

use crate::complex::{c, C};
use crate::coord::Viewport;
use crate::params::{FractalKind, RenderParams, JULIA_C};
use crate::solver::{FractalState, Solver, ESCAPE_RADIUS_SQ};

lazy_static! {
    static ref INF: f64x4 = f64x4::splat(f64::INFINITY);
    static ref ZERO: f64x4 = f64x4::splat(0.0);
    static ref ONE: f64x4 = f64x4::splat(1.0);
    static ref ESCAPE_SQ: f64x4 = f64x4::splat(ESCAPE_RADIUS_SQ);
}

const LANES: usize = 4;

/// Four complex numbers as a 2x2 matrix per lane: multiplying by
/// [[re, -im], [im, re]] is complex multiplication.
pub type C4 = DMat2x4;

pub fn c4(re: f64x4, im: f64x4) -> C4 {
    DMat2x4::new(DVec2x4::new(re, im), DVec2x4::new(-im, re))
}

fn splat4(point: C<f64>) -> C4 {
    c4(f64x4::splat(point.re), f64x4::splat(point.im))
}

fn abs_sq(z: C4) -> f64x4 {
    z.cols[0].mag_sq()
}

#[derive(Clone, Debug)]
pub struct SimdCell {
    pub(crate) c: C4,
    pub(crate) z: C4,
    pub(crate) i: f64x4,
}

/// Four-pixels-per-cell backend; pixels pack into lanes in linear-index
/// order, padded to a full lane group. The padding lanes are computed but
/// never read back.
#[derive(Clone)]
pub struct SimdState {
    width: usize,
    height: usize,
    state: Vec<SimdCell>,
}

impl FractalState for SimdState {
    fn initialize(viewport: &Viewport, params: &RenderParams) -> Self {
        let mut points = viewport.generate_complex_coordinates(params.zoom);
        while points.len() % LANES != 0 {
            points.push(c(0.0, 0.0));
        }

        let mut state = Vec::with_capacity(points.len() / LANES);
        for chunk in points.chunks(LANES) {
            let re = f64x4::new([chunk[0].re, chunk[1].re, chunk[2].re, chunk[3].re]);
            let im = f64x4::new([chunk[0].im, chunk[1].im, chunk[2].im, chunk[3].im]);
            let point = c4(re, im);
            let (z, constant) = match params.kind {
                FractalKind::Mandelbrot => (c4(*ZERO, *ZERO), point),
                FractalKind::Julia => (point, splat4(*JULIA_C)),
            };
            state.push(SimdCell {
                c: constant,
                z,
                i: *INF,
            });
        }

        Self {
            width: viewport.width,
            height: viewport.height,
            state,
        }
    }

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn i_value(&self, x: usize, y: usize) -> i32 {
        let n = y * self.width + x;
        let lane = self.state[n / LANES].i.as_array_ref()[n % LANES];
        if lane.is_finite() {
            lane as i32
        } else {
            -1
        }
    }
}

#[derive(Clone, Debug)]
pub struct SimdSolver {
    max_iterations: u32,
}

impl SimdSolver {
    pub fn new(max_iterations: u32) -> Self {
        Self { max_iterations }
    }

    pub fn from_params(params: &RenderParams) -> Self {
        Self::new(params.max_iterations)
    }
}

impl Default for SimdSolver {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Solver<SimdState> for SimdSolver {
    fn solve(&self, mut state: SimdState) -> SimdState {
        let bound = f64x4::splat(f64::from(self.max_iterations));
        for cell in &mut state.state {
            // lanes already outside the radius exit with count 0, matching
            // the scalar backend's pre-pass check
            let diverged0 = abs_sq(cell.z).cmp_ge(*ESCAPE_SQ);
            cell.i = diverged0.blend(*ZERO, *INF);

            let mut pass = *ZERO;
            for _ in 0..self.max_iterations {
                pass += *ONE;
                cell.z = (cell.z * cell.z) + cell.c;
                let diverged = abs_sq(cell.z).cmp_ge(*ESCAPE_SQ);
                cell.i = cell.i.min(diverged.blend(pass, *INF));
            }

            // a lane that first diverged on the very last pass hit the
            // bound, which counts as "never escaped"
            let interior = cell.i.cmp_ge(bound);
            cell.i = interior.blend(*INF, cell.i);
        }
        state
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::solver::{VecSolver, VecState};

    fn assert_matches_vec_backend(viewport: Viewport, params: RenderParams) {
        let simd = SimdSolver::from_params(&params).solve(SimdState::initialize(&viewport, &params));
        let vec = VecSolver::from_params(&params).solve(VecState::initialize(&viewport, &params));
        for (x, y) in viewport.pixels() {
            assert_eq!(
                simd.i_value(x, y),
                vec.i_value(x, y),
                "i_value mismatch at ({}, {})",
                x,
                y
            );
        }
    }

    #[test]
    fn test_matches_vec_backend_mandelbrot() {
        assert_matches_vec_backend(
            Viewport::new(25, 19),
            RenderParams::new(FractalKind::Mandelbrot, 50, 4.0),
        );
    }

    #[test]
    fn test_matches_vec_backend_julia() {
        assert_matches_vec_backend(
            Viewport::new(25, 19),
            RenderParams::new(FractalKind::Julia, 50, 4.0),
        );
    }

    #[test]
    fn test_odd_pixel_counts_are_padded() {
        // 5 pixels pack into two lane groups; the padding never leaks
        let viewport = Viewport::new(5, 1);
        let params = RenderParams::new(FractalKind::Mandelbrot, 20, 4.0);
        let state = SimdState::initialize(&viewport, &params);
        assert_eq!(state.state.len(), 2);
        let solved = SimdSolver::from_params(&params).solve(state);
        for (x, y) in viewport.pixels() {
            let i = solved.i_value(x, y);
            assert!(i >= -1 && i < 20);
        }
    }
}
