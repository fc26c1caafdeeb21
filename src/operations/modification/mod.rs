mod add_wall;
mod move_node;
mod opening;
mod remove_wall;
mod split;
mod split_crossings;

pub use add_wall::AddWall;
pub use move_node::MoveNode;
pub use opening::{AddOpening, RemoveOpening};
pub use remove_wall::RemoveWall;
pub use split::{SplitOutcome, SplitWall, MIN_SEGMENT_LENGTH};
pub use split_crossings::SplitCrossings;
