//! Command line renderer.
//!
//! Loads a JSON scene description (or a built-in demo scene), builds
//! the world and renders it to a PNG.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use beam_renderer::{render_parallel, Camera, RenderConfig, World};
use clap::Parser;

mod demo;

#[derive(Debug, Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Scene description (JSON); renders the built-in demo scene when omitted
    #[clap(short, long, value_parser)]
    scene: Option<PathBuf>,

    /// File name to write the image to
    #[clap(short, long, value_parser, default_value = "out.png")]
    output: PathBuf,

    /// Image width in pixels
    #[clap(long, default_value_t = 800)]
    width: u32,

    /// Image height in pixels
    #[clap(long, default_value_t = 450)]
    height: u32,

    /// Samples per pixel
    #[clap(long, default_value_t = 16)]
    samples: u32,

    /// Maximum ray recursion depth
    #[clap(long, default_value_t = 50)]
    max_depth: u32,

    /// Seed for the per-pixel jitter
    #[clap(long, default_value_t = 0)]
    seed: u64,

    /// Worker threads (defaults to all cores)
    #[clap(long)]
    threads: Option<usize>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure the thread pool")?;
    }

    let start = Instant::now();
    let scene = match &args.scene {
        Some(path) => beam_core::load_scene(path)
            .with_context(|| format!("failed to load scene {}", path.display()))?,
        None => demo::demo_scene(),
    };
    log::info!("loaded scene '{}' in {:?}", scene.name, start.elapsed());

    let start = Instant::now();
    let world = World::from_scene(&scene).context("failed to build the world")?;
    let stats = world.build_stats();
    log::info!(
        "built world in {:?}: {} primitives, {} lights, {} bvh nodes ({} spatial splits)",
        start.elapsed(),
        world.primitive_count(),
        world.lights().len(),
        stats.nodes,
        stats.spatial_splits
    );

    let camera = Camera::from_desc(&scene.camera, args.width, args.height);
    let config = RenderConfig {
        samples_per_pixel: args.samples.max(1),
        max_depth: args.max_depth.max(1),
        seed: args.seed,
    };

    let start = Instant::now();
    let image = render_parallel(&camera, &world, &config);
    log::info!(
        "rendered {}x{} @ {} spp in {:?}",
        args.width,
        args.height,
        config.samples_per_pixel,
        start.elapsed()
    );

    image
        .save_png(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    println!("Saved {}", args.output.display());

    Ok(())
}
