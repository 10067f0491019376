//! # Video Module
//!
//! Opens video files, decodes frames sequentially, and sizes them for display.

pub mod types;
pub mod sizing;
pub mod source;

#[cfg(feature = "ffmpeg")]
mod ffmpeg_source;

pub use types::{CompositedImage, Frame, VideoInfo};
pub use sizing::{frame_delay, DisplaySize};
pub use source::{ensure_video_file, is_image_file, open_source, MemorySource, VideoSource};
#[cfg(feature = "ffmpeg")]
pub use ffmpeg_source::FfmpegSource;
