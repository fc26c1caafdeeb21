mod angle;
mod snap_point;
mod wall_face;

pub use angle::{snap_angle, ANGLE_SNAP_INCREMENT};
pub use snap_point::{SnapOptions, SnapPoint, SnapResult, SnapTarget, SnapType};
pub use wall_face::{FaceSnap, SnapToWallFace, WallFace};
