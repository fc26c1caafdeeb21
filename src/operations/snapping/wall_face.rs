use crate::graph::{WallGraph, WallId};
use crate::math::distance_2d::{distance, project_onto_segment};
use crate::math::{cross_2d, left_normal, Point2, Vector2};
use crate::operations::modification::MIN_SEGMENT_LENGTH;

/// Drags shorter than this fall back to nearest-face selection, in pixels.
const MIN_DRAG_LENGTH: f64 = 0.5;

/// `|sin|` of the drag-to-wall angle below which the drag's side is ambiguous.
const MIN_SIDE_SINE: f64 = 0.1;

/// One of a wall's two long surfaces, relative to its start→end direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallFace {
    Left,
    Right,
}

/// A point snapped onto a wall face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceSnap {
    pub point: Point2,
    pub wall_id: WallId,
    pub face: WallFace,
    /// Distance from the query point, in pixels.
    pub distance: f64,
}

/// Snaps onto the surface of a nearby wall so a new wall ends flush with it.
///
/// The face is picked from the side the drag approaches from: a drag heading
/// to the wall's left comes from its right and lands on the right face. When
/// the drag is too short or runs nearly parallel to the wall, the closer face
/// wins, and an exact tie goes to the left face. Points whose projection lies
/// within the snap tolerance (at least `MIN_SEGMENT_LENGTH`) of a wall end are
/// left to node snapping. Every wall is tested.
#[derive(Debug, Clone, Copy)]
pub struct SnapToWallFace {
    point: Point2,
    drag_start: Point2,
    tolerance: f64,
}

impl SnapToWallFace {
    #[must_use]
    pub fn new(point: Point2, drag_start: Point2, tolerance: f64) -> Self {
        Self {
            point,
            drag_start,
            tolerance,
        }
    }

    #[must_use]
    pub fn execute(&self, graph: &WallGraph) -> Option<FaceSnap> {
        let drag = self.point - self.drag_start;
        let scale = graph.pixels_per_meter();
        let end_margin = MIN_SEGMENT_LENGTH.max(self.tolerance);

        graph
            .walls()
            .filter_map(|wall| {
                let (a, b) = (wall.centerline.start, wall.centerline.end);
                let dir = wall.centerline.delta().try_normalize(f64::EPSILON)?;
                let normal = left_normal(&dir);
                let half = wall.half_thickness_px(scale);

                let projection = project_onto_segment(&self.point, &a, &b);
                let length = wall.centerline.pixel_length();
                let along = projection.t * length;
                if along < end_margin || length - along < end_margin {
                    return None;
                }
                let left = projection.point + normal * half;
                let right = projection.point - normal * half;
                let d_left = distance(&self.point, &left);
                let d_right = distance(&self.point, &right);

                let closer = if d_left <= d_right {
                    WallFace::Left
                } else {
                    WallFace::Right
                };
                let face = match self.face_from_drag(&drag, &dir) {
                    Some(WallFace::Left) if d_left <= self.tolerance => WallFace::Left,
                    Some(WallFace::Right) if d_right <= self.tolerance => WallFace::Right,
                    _ => closer,
                };
                let (point, d) = match face {
                    WallFace::Left => (left, d_left),
                    WallFace::Right => (right, d_right),
                };
                (d <= self.tolerance).then_some(FaceSnap {
                    point,
                    wall_id: wall.id,
                    face,
                    distance: d,
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn face_from_drag(&self, drag: &Vector2, dir: &Vector2) -> Option<WallFace> {
        let len = drag.norm();
        if len < MIN_DRAG_LENGTH {
            return None;
        }
        let side = cross_2d(dir, &(drag / len));
        if side.abs() < MIN_SIDE_SINE {
            None
        } else if side > 0.0 {
            Some(WallFace::Right)
        } else {
            Some(WallFace::Left)
        }
    }
}
