mod rotate;
mod translate;

pub use rotate::RotateComponent;
pub use translate::TranslateComponent;
