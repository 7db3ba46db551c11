// src/app/interaction.rs
//
// Pointer gesture state for the image resizer canvas. Pure geometry; the UI
// feeds it pointer positions and applies the commits it returns.

use eframe::egui::{self, Pos2, Rect, Vec2};
use tracing::debug;

pub const MIN_IMAGE_SIDE: f32 = 50.0;
pub const DEFAULT_IMAGE_SIZE: Vec2 = Vec2::new(300.0, 200.0);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handle {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

impl Handle {
    pub const ALL: [Handle; 8] = [
        Handle::TopLeft,
        Handle::Top,
        Handle::TopRight,
        Handle::Right,
        Handle::BottomRight,
        Handle::Bottom,
        Handle::BottomLeft,
        Handle::Left,
    ];

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            Handle::TopLeft | Handle::TopRight | Handle::BottomRight | Handle::BottomLeft
        )
    }

    fn touches_left(self) -> bool {
        matches!(self, Handle::TopLeft | Handle::Left | Handle::BottomLeft)
    }

    fn touches_right(self) -> bool {
        matches!(self, Handle::TopRight | Handle::Right | Handle::BottomRight)
    }

    fn touches_top(self) -> bool {
        matches!(self, Handle::TopLeft | Handle::Top | Handle::TopRight)
    }

    fn touches_bottom(self) -> bool {
        matches!(self, Handle::BottomLeft | Handle::Bottom | Handle::BottomRight)
    }

    /// Where the handle sits on the image frame.
    pub fn anchor(self, rect: Rect) -> Pos2 {
        let x = if self.touches_left() {
            rect.left()
        } else if self.touches_right() {
            rect.right()
        } else {
            rect.center().x
        };
        let y = if self.touches_top() {
            rect.top()
        } else if self.touches_bottom() {
            rect.bottom()
        } else {
            rect.center().y
        };
        egui::pos2(x, y)
    }

    pub fn cursor(self) -> egui::CursorIcon {
        match self {
            Handle::TopLeft => egui::CursorIcon::ResizeNorthWest,
            Handle::Top => egui::CursorIcon::ResizeNorth,
            Handle::TopRight => egui::CursorIcon::ResizeNorthEast,
            Handle::Right => egui::CursorIcon::ResizeEast,
            Handle::BottomRight => egui::CursorIcon::ResizeSouthEast,
            Handle::Bottom => egui::CursorIcon::ResizeSouth,
            Handle::BottomLeft => egui::CursorIcon::ResizeSouthWest,
            Handle::Left => egui::CursorIcon::ResizeWest,
        }
    }
}

/// New size for a resize gesture that started at `start` and has moved `delta`.
///
/// Edges grow or shrink by the delta with a floor of [`MIN_IMAGE_SIDE`].
/// Corners keep the starting aspect ratio and follow the axis that moved most.
pub fn resize_math(handle: Handle, start: Vec2, delta: Vec2) -> Vec2 {
    let mut w = start.x;
    let mut h = start.y;

    if handle.touches_right() {
        w = (start.x + delta.x).max(MIN_IMAGE_SIDE);
    }
    if handle.touches_left() {
        w = (start.x - delta.x).max(MIN_IMAGE_SIDE);
    }
    if handle.touches_bottom() {
        h = (start.y + delta.y).max(MIN_IMAGE_SIDE);
    }
    if handle.touches_top() {
        h = (start.y - delta.y).max(MIN_IMAGE_SIDE);
    }

    if handle.is_corner() && start.y > 0.0 {
        let aspect = start.x / start.y;
        if delta.x.abs() > delta.y.abs() {
            h = w / aspect;
        } else {
            w = h * aspect;
        }
    }

    egui::vec2(w, h)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gesture {
    Idle,
    Dragging {
        pointer_origin: Pos2,
        start_offset: Vec2,
    },
    Resizing {
        handle: Handle,
        pointer_origin: Pos2,
        start_size: Vec2,
    },
}

/// What a finished gesture produced.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Commit {
    Moved(Vec2),
    Resized { width: u32, height: u32 },
}

#[derive(Clone, Debug)]
pub struct ImageInteraction {
    pub gesture: Gesture,
    pub selected: bool,
    pub offset: Vec2,
    pub size: Vec2,
}

impl Default for ImageInteraction {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_SIZE)
    }
}

impl ImageInteraction {
    pub fn new(size: Vec2) -> Self {
        Self {
            gesture: Gesture::Idle,
            selected: false,
            offset: Vec2::ZERO,
            size,
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.gesture, Gesture::Idle)
    }

    pub fn begin_drag(&mut self, pointer: Pos2) {
        self.selected = true;
        self.gesture = Gesture::Dragging {
            pointer_origin: pointer,
            start_offset: self.offset,
        };
    }

    pub fn begin_resize(&mut self, handle: Handle, pointer: Pos2) {
        self.selected = true;
        self.gesture = Gesture::Resizing {
            handle,
            pointer_origin: pointer,
            start_size: self.size,
        };
    }

    pub fn pointer_moved(&mut self, pointer: Pos2) {
        match self.gesture {
            Gesture::Idle => {}
            Gesture::Dragging {
                pointer_origin,
                start_offset,
            } => {
                self.offset = start_offset + (pointer - pointer_origin);
            }
            Gesture::Resizing {
                handle,
                pointer_origin,
                start_size,
            } => {
                self.size = resize_math(handle, start_size, pointer - pointer_origin);
            }
        }
    }

    /// Pointer released: back to idle, reporting what changed.
    pub fn release(&mut self) -> Option<Commit> {
        let commit = match self.gesture {
            Gesture::Idle => None,
            Gesture::Dragging { .. } => Some(Commit::Moved(self.offset)),
            Gesture::Resizing { .. } => Some(Commit::Resized {
                width: self.size.x.round() as u32,
                height: self.size.y.round() as u32,
            }),
        };
        self.gesture = Gesture::Idle;
        commit
    }

    /// Pointer left the window or focus was lost mid-gesture. Keeps whatever
    /// the gesture reached so far.
    pub fn cancel(&mut self) -> Option<Commit> {
        if self.is_active() {
            debug!(gesture = ?self.gesture, "image gesture cancelled");
        }
        self.release()
    }

    pub fn deselect(&mut self) {
        self.selected = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_respect_minimum() {
        let start = egui::vec2(300.0, 200.0);
        assert_eq!(resize_math(Handle::Right, start, egui::vec2(40.0, 99.0)), egui::vec2(340.0, 200.0));
        assert_eq!(resize_math(Handle::Left, start, egui::vec2(40.0, 0.0)), egui::vec2(260.0, 200.0));
        assert_eq!(resize_math(Handle::Top, start, egui::vec2(0.0, 500.0)), egui::vec2(300.0, 50.0));
        assert_eq!(resize_math(Handle::Bottom, start, egui::vec2(0.0, -500.0)), egui::vec2(300.0, 50.0));
    }

    #[test]
    fn corners_keep_aspect_ratio() {
        let start = egui::vec2(300.0, 200.0);

        // horizontal movement dominates
        let s = resize_math(Handle::BottomRight, start, egui::vec2(60.0, 10.0));
        assert_eq!(s, egui::vec2(360.0, 240.0));

        // vertical movement dominates
        let s = resize_math(Handle::TopLeft, start, egui::vec2(5.0, 100.0));
        assert_eq!(s, egui::vec2(150.0, 100.0));
    }

    #[test]
    fn drag_moves_by_pointer_delta() {
        let mut it = ImageInteraction::default();
        it.begin_drag(egui::pos2(10.0, 10.0));
        it.pointer_moved(egui::pos2(25.0, 5.0));
        assert_eq!(it.offset, egui::vec2(15.0, -5.0));
        assert_eq!(it.release(), Some(Commit::Moved(egui::vec2(15.0, -5.0))));
        assert_eq!(it.gesture, Gesture::Idle);
    }

    #[test]
    fn resize_commits_rounded_size() {
        let mut it = ImageInteraction::default();
        it.begin_resize(Handle::Right, egui::pos2(300.0, 100.0));
        it.pointer_moved(egui::pos2(350.4, 100.0));
        assert_eq!(
            it.release(),
            Some(Commit::Resized {
                width: 350,
                height: 200
            })
        );
    }

    #[test]
    fn cancel_returns_to_idle() {
        let mut it = ImageInteraction::default();
        it.begin_resize(Handle::Bottom, egui::pos2(0.0, 0.0));
        it.pointer_moved(egui::pos2(0.0, 30.0));

        assert!(it.cancel().is_some());
        assert!(!it.is_active());

        // further movement has no effect once idle
        it.pointer_moved(egui::pos2(0.0, 300.0));
        assert_eq!(it.size, egui::vec2(300.0, 230.0));
        assert_eq!(it.cancel(), None);
    }

    #[test]
    fn handles_sit_on_the_frame() {
        let r = Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(100.0, 50.0));
        assert_eq!(Handle::TopLeft.anchor(r), egui::pos2(0.0, 0.0));
        assert_eq!(Handle::Right.anchor(r), egui::pos2(100.0, 25.0));
        assert_eq!(Handle::Bottom.anchor(r), egui::pos2(50.0, 50.0));
    }
}
