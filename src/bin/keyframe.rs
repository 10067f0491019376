// Render one composited frame to a PNG, for checking how a video keys out
// without opening the overlay window.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use chroma_overlay::{config::Config, video, Compositor, VideoSource};

#[derive(Parser)]
#[command(name = "keyframe", version, about = "Render a chroma-keyed frame of a video to PNG")]
struct Cli {
    /// Video (or still image) to read
    video: PathBuf,

    /// PNG file to write
    output: PathBuf,

    /// Zero-based frame to render; indices past the end wrap like playback does
    #[arg(short, long, default_value_t = 0)]
    index: u64,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    config.validate()?;

    let source = video::open_source(&cli.video)?;
    let mut compositor = Compositor::new(source, &config)?;

    let info = compositor.source().info().clone();
    println!("Source: {} ({}x{} @ {:.2}fps)", info.label, info.width, info.height, info.fps);

    let mut image = compositor.produce_next_frame()?;
    for _ in 0..cli.index {
        image = compositor.produce_next_frame()?;
    }

    image
        .save_png(&cli.output)
        .with_context(|| format!("could not write {}", cli.output.display()))?;

    let total = (image.width() * image.height()) as usize;
    let stats = compositor.stats();
    println!("Frame {} ({} rewinds): {}x{}, {} of {} pixels transparent",
             cli.index, stats.rewinds, image.width(), image.height(),
             image.transparent_pixels(), total);
    println!("Saved to {}", cli.output.display());

    Ok(())
}
