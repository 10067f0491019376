use std::sync::Arc;

use tracing::info;
use winit::dpi::PhysicalSize;
use winit::event_loop::EventLoopWindowTarget;
use winit::window::{Window, WindowBuilder, WindowLevel};

use crate::compositor::Presenter;
use crate::config::WindowConfig;
use crate::error::{Result, WindowError};
use crate::overlay::renderer::Renderer;
use crate::video::CompositedImage;

/// Borderless, transparent, top-most window showing composited frames
///
/// The latest frame stays on the GPU so the window can be repainted on
/// expose without waiting for the next tick.
pub struct OverlayWindow {
    window: Arc<Window>,
    renderer: Renderer,
}

impl OverlayWindow {
    pub fn new(target: &EventLoopWindowTarget<()>, config: &WindowConfig) -> Result<Self> {
        let level = if config.always_on_top {
            WindowLevel::AlwaysOnTop
        } else {
            WindowLevel::Normal
        };

        let window = WindowBuilder::new()
            .with_title(config.title.as_str())
            .with_inner_size(PhysicalSize::new(config.width, config.height))
            .with_decorations(false)
            .with_transparent(true)
            .with_resizable(false)
            .with_window_level(level)
            .build(target)
            .map_err(WindowError::from)?;
        let window = Arc::new(window);

        let renderer = pollster::block_on(Renderer::new(window.clone(), config.transparent_color))?;

        info!("Created {}x{} overlay window '{}'", config.width, config.height, config.title);

        Ok(Self { window, renderer })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        self.renderer.resize(size.width, size.height);
    }

    /// Repaint the current frame over the transparent background
    pub fn redraw(&mut self) -> Result<()> {
        self.renderer.render()
    }
}

impl Presenter for OverlayWindow {
    fn present(&mut self, image: CompositedImage) -> Result<()> {
        self.renderer.upload(&image);
        self.renderer.render()
    }
}
