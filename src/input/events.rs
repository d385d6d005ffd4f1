use crate::core::geo::Point;
use serde::{Deserialize, Serialize};

/// Input events delivered to the image viewer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Completed click (press and release without a drag)
    Click {
        position: Point,
        button: MouseButton,
    },
    /// Primary button pressed
    PointerDown { position: Point },
    /// Pointer moved, with or without a button held
    PointerMove { position: Point },
    /// Primary button released
    PointerUp { position: Point },
    /// Pointer entered the viewer area
    PointerEnter,
    /// Pointer left the viewer area
    PointerLeave,
    /// Scroll wheel; positive `delta` zooms in
    Scroll { delta: f64, position: Point },
    /// Viewer container placed or resized on screen
    Resize { origin: Point, size: Point },
    /// Keyboard input
    KeyPress { key: KeyCode },
}

/// Keyboard key codes the viewer reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    Plus,
    Minus,
    Home,
    Escape,
    Other(u32),
}

/// Mouse button types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

impl InputEvent {
    /// Gets the primary position associated with this event, if any
    pub fn position(&self) -> Option<Point> {
        match self {
            InputEvent::Click { position, .. }
            | InputEvent::PointerDown { position }
            | InputEvent::PointerMove { position }
            | InputEvent::PointerUp { position }
            | InputEvent::Scroll { position, .. } => Some(*position),
            _ => None,
        }
    }

    /// Whether the event only moves the pointer
    pub fn is_pointer_motion(&self) -> bool {
        matches!(
            self,
            InputEvent::PointerMove { .. } | InputEvent::PointerEnter | InputEvent::PointerLeave
        )
    }
}
