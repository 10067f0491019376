use image::imageops::FilterType;
use image::{ImageBuffer, Rgb, RgbImage, RgbaImage};

use crate::video::sizing::DisplaySize;

/// Represents a single decoded video frame
///
/// A thin wrapper around an RGB image buffer. Frames are transient: the
/// compositor builds a new one for every tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    buffer: RgbImage,
}

impl Frame {
    /// Create a new frame from an RGB image buffer
    pub fn new(buffer: RgbImage) -> Self {
        Self { buffer }
    }

    /// Create a new frame with the given dimensions filled with the specified color
    pub fn new_filled(width: u32, height: u32, color: [u8; 3]) -> Self {
        let buffer = ImageBuffer::from_fn(width, height, |_, _| {
            Rgb(color)
        });
        Self { buffer }
    }

    /// Create a frame from tightly packed RGB bytes
    pub fn from_rgb_bytes(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        ImageBuffer::from_raw(width, height, data)
            .map(|buffer| Self { buffer })
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// Get a pixel at the given coordinates (returns RGB array)
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.buffer.get_pixel(x, y).0
    }

    /// Set a pixel at the given coordinates
    pub fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 3]) {
        self.buffer.put_pixel(x, y, Rgb(color));
    }

    /// Get the underlying image buffer
    pub fn as_image(&self) -> &RgbImage {
        &self.buffer
    }

    /// Resize to the display size with bilinear filtering.
    ///
    /// Frames already at the target size are returned unchanged.
    pub fn resized(self, size: DisplaySize) -> Self {
        if self.width() == size.width && self.height() == size.height {
            return self;
        }

        let buffer = image::imageops::resize(
            &self.buffer,
            size.width,
            size.height,
            FilterType::Triangle,
        );
        Self { buffer }
    }
}

/// A display-sized frame carrying a per-pixel alpha channel
///
/// Alpha is either 0 (keyed out) or 255 (opaque).
#[derive(Clone, Debug, PartialEq)]
pub struct CompositedImage {
    buffer: RgbaImage,
}

impl CompositedImage {
    pub fn new(buffer: RgbaImage) -> Self {
        Self { buffer }
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// Get a pixel at the given coordinates (returns RGBA array)
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.buffer.get_pixel(x, y).0
    }

    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        self.buffer.get_pixel(x, y)[3]
    }

    /// Number of fully transparent pixels
    pub fn transparent_pixels(&self) -> usize {
        self.buffer.pixels().filter(|p| p[3] == 0).count()
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.buffer
    }

    /// Save the image as a PNG file, alpha included
    pub fn save_png<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), image::ImageError> {
        self.buffer.save(path)
    }
}

/// Properties reported by an open video source
#[derive(Debug, Clone, PartialEq)]
pub struct VideoInfo {
    /// Human-readable source name, usually the file path
    pub label: String,

    pub width: u32,

    pub height: u32,

    /// Frames per second as reported by the container; may be zero or NaN
    pub fps: f64,

    /// Total frame count, when the container knows it
    pub frame_count: Option<u64>,
}
