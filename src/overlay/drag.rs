//! Grab-offset window dragging.

/// Top-left corner of the window in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPosition {
    pub x: i32,
    pub y: i32,
}

/// Tracks a pointer drag on the borderless window
///
/// Pointer positions are window-relative, as delivered by the window system.
#[derive(Debug, Clone, Copy, Default)]
pub struct DragState {
    grab_offset: Option<(f64, f64)>,
}

impl DragState {
    /// Record where inside the window the pointer went down
    pub fn press(&mut self, pointer: (f64, f64)) {
        self.grab_offset = Some(pointer);
    }

    pub fn release(&mut self) {
        self.grab_offset = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.grab_offset.is_some()
    }

    /// Where the window must move so the grab offset sits under `pointer` again.
    ///
    /// Returns `None` when no drag is active or the window is already in place.
    pub fn follow(&self, origin: WindowPosition, pointer: (f64, f64)) -> Option<WindowPosition> {
        let (grab_x, grab_y) = self.grab_offset?;
        let dx = (pointer.0 - grab_x).round() as i32;
        let dy = (pointer.1 - grab_y).round() as i32;

        if dx == 0 && dy == 0 {
            return None;
        }

        Some(WindowPosition {
            x: origin.x + dx,
            y: origin.y + dy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_move_without_press() {
        let drag = DragState::default();
        assert!(!drag.is_dragging());
        assert_eq!(drag.follow(WindowPosition { x: 10, y: 10 }, (50.0, 50.0)), None);
    }

    #[test]
    fn test_window_follows_pointer_with_fixed_offset() {
        let mut drag = DragState::default();
        drag.press((10.0, 20.0));

        let origin = WindowPosition { x: 100, y: 100 };
        let moved = drag.follow(origin, (15.0, 30.0)).unwrap();
        assert_eq!(moved, WindowPosition { x: 105, y: 110 });

        // The screen point under the pointer is the same grab point on the window.
        let pointer_on_screen = (origin.x + 15, origin.y + 30);
        assert_eq!((moved.x + 10, moved.y + 20), pointer_on_screen);
    }

    #[test]
    fn test_drag_can_move_window_off_the_top_left() {
        let mut drag = DragState::default();
        drag.press((200.0, 300.0));

        let moved = drag.follow(WindowPosition { x: 5, y: 5 }, (100.0, 100.0)).unwrap();
        assert_eq!(moved, WindowPosition { x: -95, y: -195 });
    }

    #[test]
    fn test_pointer_at_grab_point_does_not_move() {
        let mut drag = DragState::default();
        drag.press((42.0, 7.0));
        assert_eq!(drag.follow(WindowPosition { x: 0, y: 0 }, (42.2, 6.9)), None);
    }

    #[test]
    fn test_release_ends_drag() {
        let mut drag = DragState::default();
        drag.press((1.0, 1.0));
        drag.release();
        assert!(!drag.is_dragging());
        assert_eq!(drag.follow(WindowPosition { x: 0, y: 0 }, (9.0, 9.0)), None);
    }
}
