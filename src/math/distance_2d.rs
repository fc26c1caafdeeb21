use super::{Point2, TOLERANCE};

/// Foot of the perpendicular from a point onto a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentProjection {
    /// Closest point on the segment.
    pub point: Point2,
    /// Segment parameter of `point`, clamped to `[0, 1]`.
    pub t: f64,
    /// Distance from the query point to `point`.
    pub distance: f64,
}

/// Euclidean distance between two points.
#[must_use]
pub fn distance(a: &Point2, b: &Point2) -> f64 {
    (b - a).norm()
}

/// Projects `p` onto the segment `a`–`b`, clamping to the segment.
///
/// A zero-length segment projects every point onto `a`.
#[must_use]
pub fn project_onto_segment(p: &Point2, a: &Point2, b: &Point2) -> SegmentProjection {
    let d = b - a;
    let len_sq = d.norm_squared();

    if len_sq < TOLERANCE * TOLERANCE {
        return SegmentProjection {
            point: *a,
            t: 0.0,
            distance: distance(p, a),
        };
    }

    let t = ((p - a).dot(&d) / len_sq).clamp(0.0, 1.0);
    let point = a + d * t;
    SegmentProjection {
        point,
        t,
        distance: distance(p, &point),
    }
}

/// Returns the minimum distance from `p` to the segment `a`–`b`.
#[must_use]
pub fn point_to_segment_dist(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    project_onto_segment(p, a, b).distance
}
