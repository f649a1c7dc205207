//! rasterdag - reference CLI exercising the pipeline end to end
//!
//! Not part of the core specification (§6): this is the minimum
//! harness needed to drive a real PPM file through a source node, an
//! optional chain of filter nodes, a sink node, and the tile-stitching
//! renderer, so the core crates can be exercised without embedding
//! them in a host application first.

use anyhow::{Context, Result};
use clap::Parser;
use rasterdag_core::Point;
use rasterdag_formats::PixelFormat;
use rasterdag_graph::{FilterKind, FilterNode, Node, Renderer, RendererOptions, SinkNode, SourceNode};
use rasterdag_image::ImageBuffer;
use rasterdag_pool::EntryPool;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Byte size of one pool allocator block.
const POOL_BLOCK_SIZE: usize = 4096;

/// Number of blocks in the pool allocator, sized generously against a
/// single tile's worst-case premultiplied intermediate (a box blur
/// grows its output, so this leaves headroom beyond one bare tile).
const POOL_BLOCK_COUNT: u32 = 512;

/// Pool slots: this pipeline never runs more than one node wanting
/// pool-backed scratch at a time, but a couple of spares cost nothing.
const POOL_SLOT_COUNT: usize = 4;

#[derive(Parser)]
#[command(name = "rasterdag")]
#[command(author, version, about = "Render one image through a filter chain")]
struct Cli {
    /// Input PPM (P6) image path.
    input: PathBuf,

    /// Output PPM (P6) image path.
    #[arg(short = 'o', long = "output")]
    output: PathBuf,

    /// Scales RGB by this factor before writing the output.
    #[arg(long)]
    brightness: Option<f32>,

    /// Desaturates the image to luma.
    #[arg(long)]
    grayscale: bool,

    /// Scales alpha by this factor.
    #[arg(long)]
    alpha: Option<f32>,

    /// Verbose output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "rasterdag=info",
        2 => "rasterdag=debug",
        _ => "rasterdag=trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    if verbose > 0 {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

/// Builds the filter chain requested on the command line, applied in
/// the order listed on `--help`: brightness, then grayscale, then
/// alpha.
fn build_graph(cli: &Cli, source: ImageBuffer) -> Node {
    let mut node = Node::Source(SourceNode::new(source));
    if let Some(factor) = cli.brightness {
        node = Node::Filter(FilterNode::new(FilterKind::Brightness(factor), Box::new(node)));
    }
    if cli.grayscale {
        node = Node::Filter(FilterNode::new(FilterKind::Grayscale, Box::new(node)));
    }
    if let Some(factor) = cli.alpha {
        node = Node::Filter(FilterNode::new(FilterKind::Alpha(factor), Box::new(node)));
    }
    node
}

fn run(cli: Cli) -> Result<()> {
    tracing::info!(input = %cli.input.display(), output = %cli.output.display(), "rendering");

    let input_file = std::fs::File::open(&cli.input)
        .with_context(|| format!("opening input {}", cli.input.display()))?;
    let source = rasterdag_io::ppm::read(input_file)
        .with_context(|| format!("decoding PPM {}", cli.input.display()))?;
    let (width, height) = (source.width(), source.height());

    let upstream = Box::new(build_graph(&cli, source));
    let mut sink = SinkNode::new(upstream, width, height, Point::from_int(0, 0));

    let mut pool = EntryPool::new(POOL_BLOCK_SIZE, POOL_BLOCK_COUNT, POOL_SLOT_COUNT)
        .context("constructing buffer pool")?;
    let mut canvas = ImageBuffer::new(width, height, PixelFormat::Rgba8Straight)
        .context("allocating output canvas")?;

    let renderer = Renderer::new(RendererOptions::default());
    renderer
        .execute(&mut sink, &mut pool, &mut canvas.as_view_mut())
        .context("executing render graph")?;

    let output_file = std::fs::File::create(&cli.output)
        .with_context(|| format!("creating output {}", cli.output.display()))?;
    rasterdag_io::ppm::write(output_file, &canvas)
        .with_context(|| format!("encoding PPM {}", cli.output.display()))?;

    tracing::info!(width, height, "render complete");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
    Ok(())
}
