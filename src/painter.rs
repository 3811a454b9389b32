use crate::coord::Viewport;
use crate::raster::Raster;
use crate::solver::FractalState;

pub trait Painter {
    fn i_value_intensity(&self, i_value: i32) -> u8;

    fn paint<S: FractalState>(&self, state: &S) -> Raster {
        let mut raster = Raster::new(state.width(), state.height());
        for (x, y) in Viewport::new(state.width(), state.height()).pixels() {
            raster.set(x, y, self.i_value_intensity(state.i_value(x, y)));
        }
        raster
    }
}

/// Maps escape counts to 8-bit grayscale.
///
/// A pixel that never escaped renders black; everything else scales
/// linearly with its escape count. No gamma, no smoothing.
pub struct EscapeTimePainter {
    max_iterations: f64,
}

impl EscapeTimePainter {
    pub fn new(max_iterations: u32) -> Self {
        Self {
            max_iterations: max_iterations as f64,
        }
    }
}

impl Painter for EscapeTimePainter {
    fn i_value_intensity(&self, i_value: i32) -> u8 {
        if i_value < 0 {
            return 0;
        }
        ((i_value as f64 / self.max_iterations) * 255.0).round() as u8
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_interior_is_black() {
        let painter = EscapeTimePainter::new(100);
        assert_eq!(painter.i_value_intensity(-1), 0);
    }

    #[test]
    fn test_escape_counts_scale_linearly() {
        let painter = EscapeTimePainter::new(100);
        assert_eq!(painter.i_value_intensity(0), 0);
        assert_eq!(painter.i_value_intensity(1), 3); // round(2.55)
        assert_eq!(painter.i_value_intensity(50), 128); // round(127.5)
        assert_eq!(painter.i_value_intensity(99), 252); // round(252.45)
    }

    #[test]
    fn test_count_below_bound_stays_in_range() {
        for max in [10u32, 100, 1000] {
            let painter = EscapeTimePainter::new(max);
            for i in 0..max {
                let v = painter.i_value_intensity(i as i32);
                assert!(u32::from(v) <= 255);
            }
        }
    }
}
