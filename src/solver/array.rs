use std::sync::Arc;

use ndarray::{concatenate, s, Array, Array1, Array2, Axis, Zip};

use crate::complex::{origin, C};
use crate::coord::Viewport;
use crate::params::{FractalKind, RenderParams, JULIA_C};
use crate::solver::{FractalState, Solver, ESCAPE_RADIUS_SQ};
use crate::threads::{Join, RangeSplitter, Split};

/// Lockstep ndarray backend: every unescaped cell advances one pass per
/// sweep, always running the full iteration bound.
#[derive(Clone, Debug)]
pub struct ArrayState {
    pub(crate) width: usize,
    pub(crate) height: usize,
    /// Sweeps applied so far; equals the pass count of every cell still
    /// marked -1.
    pub(crate) iteration: i32,
    pub(crate) ca: Arc<Array2<C<f64>>>,
    pub(crate) za: Arc<Array2<C<f64>>>,
    pub(crate) ia: Arc<Array2<i32>>,
}

impl FractalState for ArrayState {
    fn initialize(viewport: &Viewport, params: &RenderParams) -> Self {
        let width = viewport.width;
        let height = viewport.height;
        let points: Array2<C<f64>> = viewport
            .generate_complex_coordinates(params.zoom)
            .into_iter()
            .collect::<Array1<C<f64>>>()
            .into_shape((height, width))
            .unwrap();
        let (ca, za) = match params.kind {
            FractalKind::Mandelbrot => {
                let za = Array::from_elem((height, width), origin());
                (points, za)
            }
            FractalKind::Julia => {
                let ca = Array::from_elem((height, width), *JULIA_C);
                (ca, points)
            }
        };
        let ia: Array2<i32> = Array::from_elem((height, width), -1);
        Self {
            width,
            height,
            iteration: 0,
            ca: Arc::new(ca),
            za: Arc::new(za),
            ia: Arc::new(ia),
        }
    }

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn i_value(&self, x: usize, y: usize) -> i32 {
        self.ia[[y, x]]
    }
}

impl Split for ArrayState {
    fn split_to_vec(self, n: usize) -> Vec<Self> {
        let mut split = Vec::with_capacity(n);
        for (m, k) in RangeSplitter::split(0, self.height, n) {
            let slice = s![m..k, ..];
            split.push(ArrayState {
                width: self.width,
                height: k - m,
                iteration: self.iteration,
                ca: Arc::new(self.ca.slice(slice).into_owned()),
                za: Arc::new(self.za.slice(slice).into_owned()),
                ia: Arc::new(self.ia.slice(slice).into_owned()),
            });
        }
        split
    }
}

impl Join for ArrayState {
    fn join_vec(states: Vec<ArrayState>) -> Self {
        let width = states[0].width;
        let iteration = states[0].iteration;
        let mut height = 0;
        let mut cas = vec![];
        let mut zas = vec![];
        let mut ias = vec![];

        for state in &states {
            assert!(state.width == width, "different width");
            assert!(state.iteration == iteration, "different iteration");
            height += state.height;
            cas.push(state.ca.as_ref().view());
            zas.push(state.za.as_ref().view());
            ias.push(state.ia.as_ref().view());
        }

        let ca = concatenate(Axis(0), &cas).unwrap();
        let za = concatenate(Axis(0), &zas).unwrap();
        let ia = concatenate(Axis(0), &ias).unwrap();
        ArrayState {
            width,
            height,
            iteration,
            ca: Arc::new(ca),
            za: Arc::new(za),
            ia: Arc::new(ia),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ArraySolver {
    max_iterations: u32,
}

impl ArraySolver {
    pub fn new(max_iterations: u32) -> Self {
        Self { max_iterations }
    }

    pub fn from_params(params: &RenderParams) -> Self {
        Self::new(params.max_iterations)
    }

    fn sweep(&self, state: &ArrayState) -> ArrayState {
        let mut new_za = Array2::from_elem((state.height, state.width), origin());
        let mut new_ia = Array2::from_elem((state.height, state.width), -1);

        // escape is checked before the pass, so a frozen cell's count is
        // exactly the number of passes it ran
        Zip::from(state.ia.as_ref())
            .and(&mut new_ia)
            .and(state.za.as_ref())
            .and(&mut new_za)
            .and(state.ca.as_ref())
            .for_each(|&iv, niv, &zv, nzv, &cv| {
                if iv != -1 {
                    *niv = iv;
                    *nzv = zv;
                } else if zv.norm_sqr() >= ESCAPE_RADIUS_SQ {
                    *niv = state.iteration;
                    *nzv = zv;
                } else {
                    *niv = -1;
                    *nzv = (zv * zv) + cv;
                }
            });

        ArrayState {
            width: state.width,
            height: state.height,
            iteration: state.iteration + 1,
            ca: state.ca.clone(),
            za: Arc::new(new_za),
            ia: Arc::new(new_ia),
        }
    }
}

impl Default for ArraySolver {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Solver<ArrayState> for ArraySolver {
    fn solve(&self, mut state: ArrayState) -> ArrayState {
        for _ in 0..self.max_iterations {
            state = self.sweep(&state);
        }
        state
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::solver::{VecSolver, VecState};

    fn assert_matches_vec_backend(viewport: Viewport, params: RenderParams) {
        let arr = ArraySolver::from_params(&params).solve(ArrayState::initialize(&viewport, &params));
        let vec = VecSolver::from_params(&params).solve(VecState::initialize(&viewport, &params));
        for (x, y) in viewport.pixels() {
            assert_eq!(
                arr.i_value(x, y),
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
            Viewport::new(24, 17),
            RenderParams::new(FractalKind::Mandelbrot, 50, 4.0),
        );
    }

    #[test]
    fn test_matches_vec_backend_julia() {
        assert_matches_vec_backend(
            Viewport::new(24, 17),
            RenderParams::new(FractalKind::Julia, 50, 4.0),
        );
    }

    #[test]
    fn test_split_join_roundtrip() {
        let viewport = Viewport::new(6, 7);
        let params = RenderParams::default();
        let state = ArrayState::initialize(&viewport, &params);
        let reference = state.ca.clone();

        let parts = state.split_to_vec(3);
        assert_eq!(parts.len(), 3);
        let joined = ArrayState::join_vec(parts);
        assert_eq!(joined.height, 7);
        assert_eq!(joined.ca.as_ref(), reference.as_ref());
    }
}
