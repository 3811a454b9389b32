use std::path::PathBuf;
use std::process::exit;

use log::info;
use structopt::StructOpt;

use fraxel::{generate_parallel, FractalKind, RenderParams, Viewport};

/// Renders an escape-time fractal to a grayscale PNG.
#[derive(Debug, StructOpt)]
#[structopt(name = "fraxel-imagegen")]
struct Opt {
    /// Fractal kind: "mandelbrot" or "julia"
    #[structopt(short, long, default_value = "mandelbrot")]
    kind: FractalKind,

    /// Output width in pixels
    #[structopt(long, default_value = "1500")]
    width: usize,

    /// Output height in pixels
    #[structopt(long, default_value = "1200")]
    height: usize,

    /// Iteration bound (viewer toolbar offers 10-1000)
    #[structopt(short = "i", long, default_value = "100")]
    max_iterations: u32,

    /// Full plane span mapped across the viewport (viewer toolbar offers 1.0-10.0)
    #[structopt(short, long, default_value = "4.0")]
    zoom: f64,

    /// Worker threads; defaults to the number of physical cores
    #[structopt(short, long)]
    threads: Option<usize>,

    /// Output file
    #[structopt(short, long, default_value = "fractal.png", parse(from_os_str))]
    output: PathBuf,
}

fn main() {
    env_logger::init();
    let opt = Opt::from_args();

    let viewport = Viewport::new(opt.width, opt.height);
    let params = RenderParams::new(opt.kind, opt.max_iterations, opt.zoom);
    let threads = opt.threads.unwrap_or_else(num_cpus::get_physical);

    let raster = match generate_parallel(&viewport, &params, threads) {
        Ok(raster) => raster,
        Err(e) => {
            eprintln!("render rejected: {}", e);
            exit(1);
        }
    };
    info!("rendered {} samples", raster.len());

    if let Err(e) = raster.to_image().save(&opt.output) {
        eprintln!("failed to save {}: {}", opt.output.display(), e);
        exit(1);
    }
    println!("wrote {}", opt.output.display());
}
