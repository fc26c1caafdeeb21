mod drag;
mod drawing;

pub use drag::{DragSession, DragTarget};
pub use drawing::{DrawingSession, DrawingState, StrokeEnd, MIN_WALL_LENGTH};
