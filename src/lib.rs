//! # chroma-overlay
//!
//! Play a green-screen video as a desktop mascot: a borderless, always-on-top,
//! draggable window where green pixels are transparent and the video loops
//! forever.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chroma_overlay::{config::Config, overlay, video, Compositor};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::default();
//! let source = video::open_source(&config.video.path)?;
//! let compositor = Compositor::new(source, &config)?;
//! overlay::run(compositor, &config.window)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`video`] - sources, frames, display sizing
//! - [`chroma`] - HSV conversion and the green-screen key
//! - [`compositor`] - the per-frame loop: decode, fit, key, present, reschedule
//! - [`overlay`] - the desktop window and its event loop
//! - [`config`] - configuration management
//!
//! ## Headless use
//!
//! The compositor does not depend on a window. Anything implementing
//! [`Presenter`](compositor::Presenter) can receive frames:
//!
//! ```rust,no_run
//! use chroma_overlay::compositor::Presenter;
//! use chroma_overlay::video::CompositedImage;
//!
//! struct CountTransparent(usize);
//!
//! impl Presenter for CountTransparent {
//!     fn present(&mut self, image: CompositedImage) -> chroma_overlay::Result<()> {
//!         self.0 = image.transparent_pixels();
//!         Ok(())
//!     }
//! }
//! ```

pub mod chroma;
pub mod compositor;
pub mod config;
pub mod error;
pub mod overlay;
pub mod video;

// Re-export commonly used types for convenience
pub use crate::{
    compositor::{Compositor, Presenter},
    config::Config,
    error::{OverlayError, Result},
    video::{VideoSource, open_source},
};
