use crate::complex::{origin, C};
use crate::coord::Viewport;
use crate::params::{FractalKind, RenderParams, JULIA_C};
use crate::solver::{FractalState, Solver, ESCAPE_RADIUS_SQ};
use crate::threads::{Join, Split};

#[derive(Clone, Debug)]
pub struct VecCell {
    pub(crate) c: C<f64>,
    pub(crate) z: C<f64>,
    pub(crate) i: i32,
}

impl VecCell {
    fn seed(kind: FractalKind, point: C<f64>) -> Self {
        let (z, c) = match kind {
            FractalKind::Mandelbrot => (origin(), point),
            FractalKind::Julia => (point, *JULIA_C),
        };
        Self { c, z, i: -1 }
    }
}

/// Scalar backend with a per-cell early-escape loop; the default.
#[derive(Clone, Debug)]
pub struct VecState {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) state: Vec<VecCell>,
}

impl FractalState for VecState {
    fn initialize(viewport: &Viewport, params: &RenderParams) -> Self {
        let state = viewport
            .generate_complex_coordinates(params.zoom)
            .into_iter()
            .map(|point| VecCell::seed(params.kind, point))
            .collect();
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
        self.state[y * self.width + x].i
    }
}

impl Split for VecState {
    fn split_to_vec(self, n: usize) -> Vec<Self> {
        let rows = self.state.split_to_vec(self.height);
        let row_groups = rows.split_to_vec(n);

        let mut parts = Vec::with_capacity(n);
        for row_group in row_groups {
            let height = row_group.len();
            parts.push(Self {
                width: self.width,
                height,
                state: Vec::join_vec(row_group),
            });
        }
        parts
    }
}

impl Join for VecState {
    fn join_vec(parts: Vec<Self>) -> Self {
        let width = parts[0].width;
        let mut height = 0;
        let mut state_parts = Vec::with_capacity(parts.len());
        for part in parts {
            assert!(part.width == width, "different width");
            height += part.height;
            state_parts.push(part.state);
        }
        Self {
            width,
            height,
            state: Vec::join_vec(state_parts),
        }
    }
}

#[derive(Clone, Debug)]
pub struct VecSolver {
    max_iterations: u32,
}

impl VecSolver {
    pub fn new(max_iterations: u32) -> Self {
        Self { max_iterations }
    }

    pub fn from_params(params: &RenderParams) -> Self {
        Self::new(params.max_iterations)
    }
}

impl Default for VecSolver {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Solver<VecState> for VecSolver {
    fn solve(&self, mut state: VecState) -> VecState {
        for cell in &mut state.state {
            let mut count = 0;
            while count < self.max_iterations && cell.z.norm_sqr() < ESCAPE_RADIUS_SQ {
                cell.z = (cell.z * cell.z) + cell.c;
                count += 1;
            }
            // reaching the bound means "never escaped", even if the final
            // pass happened to leave |z| outside the radius
            cell.i = if count == self.max_iterations {
                -1
            } else {
                count as i32
            };
        }
        state
    }
}
