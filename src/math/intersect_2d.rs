use super::{cross_2d, Point2, Vector2, PARALLEL_DETERMINANT};

/// Parametric 2D line-line intersection.
///
/// Given lines `p1 + t * d1` and `p2 + u * d2`, returns `(t, u)` if not parallel.
/// Directions whose determinant falls below [`PARALLEL_DETERMINANT`] are
/// treated as parallel.
#[must_use]
pub fn line_line_intersect_2d(
    p1: &Point2,
    d1: &Vector2,
    p2: &Point2,
    d2: &Vector2,
) -> Option<(f64, f64)> {
    let cross = cross_2d(d1, d2);
    if cross.abs() < PARALLEL_DETERMINANT {
        return None;
    }
    let delta = p2 - p1;
    let t = cross_2d(&delta, d2) / cross;
    let u = cross_2d(&delta, d1) / cross;
    Some((t, u))
}

/// Intersection point of the infinite lines through `a0`–`a1` and `b0`–`b1`.
///
/// Directions are normalized first so the parallel test is scale independent.
#[must_use]
pub fn infinite_line_intersection(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
) -> Option<Point2> {
    let da = (a1 - a0).try_normalize(f64::EPSILON)?;
    let db = (b1 - b0).try_normalize(f64::EPSILON)?;
    let (t, _) = line_line_intersect_2d(a0, &da, b0, &db)?;
    Some(a0 + da * t)
}

/// Bounded segment-segment intersection in 2D.
///
/// Returns `(intersection_point, t, u)` where `t` and `u` are in `[0, 1]`.
#[must_use]
pub fn segment_segment_intersect_2d(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
) -> Option<(Point2, f64, f64)> {
    let da = a1 - a0;
    let db = b1 - b0;

    // Scale-independent parallel test on the unit directions.
    let (ua, ub) = (da.try_normalize(f64::EPSILON)?, db.try_normalize(f64::EPSILON)?);
    if cross_2d(&ua, &ub).abs() < PARALLEL_DETERMINANT {
        return None;
    }

    let cross = cross_2d(&da, &db);
    let delta = b0 - a0;
    let t = cross_2d(&delta, &db) / cross;
    let u = cross_2d(&delta, &da) / cross;

    // Use a small epsilon to include endpoints.
    let eps = 1e-9;
    if t >= -eps && t <= 1.0 + eps && u >= -eps && u <= 1.0 + eps {
        let t_clamped = t.clamp(0.0, 1.0);
        Some((a0 + da * t_clamped, t_clamped, u.clamp(0.0, 1.0)))
    } else {
        None
    }
}
