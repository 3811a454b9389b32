use fraxel::bench::{Benchmark, BenchmarkReport};
use fraxel::coord::Viewport;
use fraxel::params::{FractalKind, RenderParams};
use fraxel::solver::{ArrayState, FractalState, SimdState, VecState};

fn bench_init<S: FractalState + 'static>(name: &str, height: usize, repeats: usize) -> Benchmark {
    let viewport = Viewport::new((3 * height) / 2, height);
    let params = RenderParams::new(FractalKind::Mandelbrot, 100, 4.0);
    let f = move || {
        S::initialize(&viewport, &params);
    };
    Benchmark::iter(&format!("stateinit-{}-{}", name, height), repeats, f)
}

fn main() {
    BenchmarkReport::with_benches(&[
        bench_init::<VecState>("vec", 1000, 10),
        bench_init::<ArrayState>("arr", 1000, 10),
        bench_init::<SimdState>("simd", 1000, 10),
        bench_init::<VecState>("vec", 2000, 10),
        bench_init::<ArrayState>("arr", 2000, 10),
        bench_init::<SimdState>("simd", 2000, 10),
    ])
    .report("stateinit");
}
