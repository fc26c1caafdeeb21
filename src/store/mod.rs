mod history;
mod plan;
mod project;

pub use history::{History, DEFAULT_HISTORY_LIMIT};
pub use plan::FloorPlan;
pub use project::ProjectStore;
