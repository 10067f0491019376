use std::time::Instant;

use tracing::{debug, error, info, warn};
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, Event, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget},
    keyboard::{KeyCode, PhysicalKey},
};

use crate::compositor::Compositor;
use crate::config::WindowConfig;
use crate::error::{OverlayError, Result, WindowError};
use crate::overlay::drag::{DragState, WindowPosition};
use crate::overlay::window::OverlayWindow;
use crate::video::VideoSource;

/// Create the overlay window and drive `compositor` until the window closes.
///
/// Ticks run on the event-loop thread: after each tick the loop sleeps until
/// `completion + delay`, handling input in between. A playback error stops
/// the loop and is returned.
pub fn run<S: VideoSource>(compositor: Compositor<S>, config: &WindowConfig) -> Result<()> {
    let event_loop = EventLoop::new().map_err(WindowError::from)?;
    let window = OverlayWindow::new(&event_loop, config)?;
    let mut app = OverlayApp::new(compositor, window);

    event_loop
        .run(|event, target| app.handle_event(event, target))
        .map_err(WindowError::from)?;

    app.finish()
}

/// Event-loop state: the compositor, its window, and pointer tracking
struct OverlayApp<S> {
    compositor: Compositor<S>,
    window: OverlayWindow,
    drag: DragState,
    cursor: (f64, f64),
    next_tick: Instant,
    failure: Option<OverlayError>,
}

impl<S: VideoSource> OverlayApp<S> {
    fn new(compositor: Compositor<S>, window: OverlayWindow) -> Self {
        Self {
            compositor,
            window,
            drag: DragState::default(),
            cursor: (0.0, 0.0),
            next_tick: Instant::now(),
            failure: None,
        }
    }

    fn handle_event(&mut self, event: Event<()>, target: &EventLoopWindowTarget<()>) {
        match event {
            Event::WindowEvent { window_id, event } if window_id == self.window.window().id() => {
                self.handle_window_event(event, target);
            }
            Event::AboutToWait => self.run_due_tick(target),
            _ => {}
        }
    }

    fn handle_window_event(&mut self, event: WindowEvent, target: &EventLoopWindowTarget<()>) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event: KeyEvent {
                    physical_key: PhysicalKey::Code(KeyCode::Escape),
                    state: ElementState::Pressed,
                    ..
                },
                ..
            } => {
                info!("Closing overlay after {} frames", self.compositor.stats().frames_presented);
                target.exit();
            }
            WindowEvent::MouseInput { state, button: MouseButton::Left, .. } => match state {
                ElementState::Pressed => self.begin_drag(),
                ElementState::Released => self.drag.release(),
            },
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x, position.y);
                self.follow_pointer();
            }
            WindowEvent::Resized(size) => self.window.resize(size),
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.window.redraw() {
                    self.fail(e, target);
                }
            }
            _ => {}
        }
    }

    /// Run the tick if its deadline has passed, then sleep until the next one
    fn run_due_tick(&mut self, target: &EventLoopWindowTarget<()>) {
        if self.failure.is_some() {
            return;
        }

        if Instant::now() >= self.next_tick {
            match self.compositor.tick(&mut self.window) {
                Ok(delay) => self.next_tick = Instant::now() + delay,
                Err(e) => {
                    self.fail(e, target);
                    return;
                }
            }
        }

        target.set_control_flow(ControlFlow::WaitUntil(self.next_tick));
    }

    fn begin_drag(&mut self) {
        if self.window.window().outer_position().is_ok() {
            self.drag.press(self.cursor);
            return;
        }

        // No readable window position (e.g. Wayland): let the window manager move it.
        if let Err(e) = self.window.window().drag_window() {
            warn!("Window manager refused to drag the overlay: {}", e);
        }
    }

    fn follow_pointer(&mut self) {
        if !self.drag.is_dragging() {
            return;
        }

        let Ok(origin) = self.window.window().outer_position() else {
            return;
        };
        let origin = WindowPosition { x: origin.x, y: origin.y };

        if let Some(target) = self.drag.follow(origin, self.cursor) {
            debug!("Moving overlay to ({}, {})", target.x, target.y);
            self.window
                .window()
                .set_outer_position(PhysicalPosition::new(target.x, target.y));
        }
    }

    fn fail(&mut self, e: OverlayError, target: &EventLoopWindowTarget<()>) {
        error!("Playback stopped: {}", e);
        self.failure = Some(e);
        target.exit();
    }

    fn finish(self) -> Result<()> {
        match self.failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
