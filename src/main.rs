use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use chroma_overlay::{config::Config, overlay, video, Compositor};

#[derive(Parser)]
#[command(
    name = "chroma-overlay",
    version,
    about = "Play a green-screen video as a transparent desktop overlay",
    long_about = "Chroma-overlay loops a video in a borderless, always-on-top window, making green-screen pixels transparent so the subject appears to stand on the desktop. Drag the window with the left mouse button; press Escape to quit."
)]
struct Cli {
    /// Video file to play (defaults to [video] path from the config, or video.mp4)
    video: Option<PathBuf>,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .init();

    if let Err(e) = run(cli) {
        let message = match e.downcast_ref::<chroma_overlay::OverlayError>() {
            Some(overlay_error) => overlay_error.user_message(),
            None => format!("{:#}", e),
        };
        eprintln!("Error: {}", message);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    info!("Starting application");

    let mut config = match cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(&config_path)?
        }
        None => Config::default(),
    };

    if let Some(video) = cli.video {
        config.video.path = video;
    }
    config.validate()?;

    // The source is opened and validated before any window exists.
    let source = video::open_source(&config.video.path)?;
    let compositor = Compositor::new(source, &config)?;

    overlay::run(compositor, &config.window).context("overlay window failed")?;
    info!("Overlay closed");
    Ok(())
}
