//! # Overlay Window
//!
//! The desktop side of the player: a borderless, transparent, always-on-top
//! window that presents composited frames, follows pointer drags, and drives
//! the compositor from the window system's event loop.

pub mod app;
pub mod drag;
pub mod renderer;
pub mod vertex;
pub mod window;

pub use app::run;
pub use drag::{DragState, WindowPosition};
pub use renderer::Renderer;
pub use window::OverlayWindow;
