use std::f64::consts::{PI, TAU};

use super::junction::{Arm, Junction, JunctionKind};
use crate::math::angle::{normalize_angle, normalize_signed_angle};
use crate::math::{direction, Point2};

/// Angular gap below which two arms are treated as folded onto each other.
pub const NEAR_FOLDED_ANGLE: f64 = 0.01;

/// Distance from π below which two arms are treated as collinear.
pub const NEAR_STRAIGHT_ANGLE: f64 = 0.1;

/// Upper bound on a miter length, as a multiple of the half thickness.
pub const MAX_MITER_RATIO: f64 = 3.0;

/// The two corner points of one wall end.
///
/// Sides are relative to the arm's direction away from the junction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MiterPair {
    /// Corner on the counter-clockwise (left-hand) side.
    pub ccw: Point2,
    /// Corner on the clockwise (right-hand) side.
    pub cw: Point2,
}

/// Computes the corners of arm `index` at `junction`.
#[must_use]
pub fn end_miters(junction: &Junction, index: usize) -> MiterPair {
    let arm = &junction.arms[index];
    match junction.kind {
        JunctionKind::Endpoint => perpendicular(&junction.position, arm),
        JunctionKind::Corner => {
            let (other, _) = junction.neighbours(index);
            two_wall_miter(&junction.position, arm, other)
        }
        JunctionKind::TJunction | JunctionKind::Cross | JunctionKind::Star => {
            let (cw, ccw) = junction.neighbours(index);
            let ccw_gap = normalize_angle(ccw.angle - arm.angle);
            let cw_gap = normalize_angle(arm.angle - cw.angle);
            MiterPair {
                ccw: side_corner(&junction.position, arm, ccw_gap, 1.0),
                cw: side_corner(&junction.position, arm, cw_gap, -1.0),
            }
        }
    }
}

/// Square end: plain perpendicular offsets.
fn perpendicular(position: &Point2, arm: &Arm) -> MiterPair {
    let offset = direction(arm.angle + PI / 2.0) * arm.half_thickness;
    MiterPair {
        ccw: position + offset,
        cw: position - offset,
    }
}

/// Corner shared with the neighbour `gap` radians away on one side.
///
/// `sign` is `1.0` for the counter-clockwise side and `-1.0` for the
/// clockwise side. The corner lies on the bisector of the gap at
/// `offset / sin(gap / 2)` from the junction.
fn side_corner(position: &Point2, arm: &Arm, gap: f64, sign: f64) -> Point2 {
    let h = arm.half_thickness;
    let folded = gap < NEAR_FOLDED_ANGLE || gap > TAU - NEAR_FOLDED_ANGLE;
    let straight = (gap - PI).abs() < NEAR_STRAIGHT_ANGLE;
    if folded || straight {
        return position + direction(arm.angle + sign * PI / 2.0) * h;
    }
    let half = gap / 2.0;
    let length = (h / half.sin()).min(MAX_MITER_RATIO * h);
    position + direction(arm.angle + sign * half) * length
}

/// Two-wall corner from the turn angle between the walls.
///
/// Walking in along `other` and out along `arm`, the miter line is
/// perpendicular to the mean heading and the miter length is
/// `offset / cos(turn / 2)`.
fn two_wall_miter(position: &Point2, arm: &Arm, other: &Arm) -> MiterPair {
    let h = arm.half_thickness;
    let heading_in = other.angle + PI;
    let turn = normalize_signed_angle(arm.angle - heading_in);
    if turn.abs() < NEAR_STRAIGHT_ANGLE || PI - turn.abs() < NEAR_FOLDED_ANGLE {
        return perpendicular(position, arm);
    }
    let half = turn / 2.0;
    let length = (h / half.cos()).min(MAX_MITER_RATIO * h);
    let offset = direction(heading_in + half + PI / 2.0) * length;
    MiterPair {
        ccw: position + offset,
        cw: position - offset,
    }
}
