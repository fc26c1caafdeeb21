use std::f64::consts::FRAC_PI_4;

use crate::math::angle::{angle_between_points, snap_to_increment};
use crate::math::distance_2d::distance;
use crate::math::{direction, Point2, TOLERANCE};

/// Angle-snap step: 45°.
pub const ANGLE_SNAP_INCREMENT: f64 = FRAC_PI_4;

/// Rounds the direction from `start` to `current` to the nearest 45° while
/// keeping the distance.
#[must_use]
pub fn snap_angle(start: &Point2, current: &Point2) -> Point2 {
    let length = distance(start, current);
    if length < TOLERANCE {
        return *current;
    }
    let angle = snap_to_increment(angle_between_points(start, current), ANGLE_SNAP_INCREMENT);
    start + direction(angle) * length
}
