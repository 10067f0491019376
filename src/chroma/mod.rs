//! # Chroma Keying
//!
//! Turns green-screen pixels transparent. Pixels are classified in 8-bit HSV
//! space against a fixed band, and the resulting mask becomes the alpha
//! channel of the composited image.

pub mod hsv;
pub mod key;

pub use hsv::Hsv;
pub use key::{ChromaKey, HsvRange};
