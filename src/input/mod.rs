pub mod events;
pub mod handler;

// Re-export the essential types
pub use events::{InputEvent, KeyCode, MouseButton};
pub use handler::{DragState, InputHandler, ViewerAction, ViewerCursor, ViewportCommand, ViewportHandle};
