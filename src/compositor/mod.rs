//! # Compositor Loop
//!
//! The only stateful component: it owns the video source and turns each
//! decoded frame into a keyed, display-sized image.

pub mod engine;

pub use engine::{Compositor, PlaybackStats, Presenter};
