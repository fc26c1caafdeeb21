use std::f64::consts::{PI, TAU};

use super::Point2;

/// Normalizes an angle into `[0, 2π)`.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if a >= TAU {
        0.0
    } else {
        a
    }
}

/// Normalizes an angle into `(−π, π]`.
#[must_use]
pub fn normalize_signed_angle(angle: f64) -> f64 {
    let a = normalize_angle(angle);
    if a > PI {
        a - TAU
    } else {
        a
    }
}

/// Direction angle from `a` to `b`, normalized into `[0, 2π)`.
#[must_use]
pub fn angle_between_points(a: &Point2, b: &Point2) -> f64 {
    normalize_angle((b.y - a.y).atan2(b.x - a.x))
}

/// Rounds `angle` to the nearest multiple of `increment`, normalized into `[0, 2π)`.
#[must_use]
pub fn snap_to_increment(angle: f64, increment: f64) -> f64 {
    if increment <= 0.0 {
        return normalize_angle(angle);
    }
    normalize_angle((angle / increment).round() * increment)
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn normalize_wraps_negative() {
        assert_abs_diff_eq!(normalize_angle(-FRAC_PI_2), 3.0 * FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize_angle(5.0 * PI), PI, epsilon = 1e-12);
    }

    #[test]
    fn normalize_never_returns_tau() {
        let a = normalize_angle(-1e-18);
        assert!((0.0..TAU).contains(&a), "a={a}");
    }

    #[test]
    fn signed_range_is_half_open() {
        assert_abs_diff_eq!(normalize_signed_angle(PI), PI, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize_signed_angle(-PI), PI, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize_signed_angle(3.0 * FRAC_PI_2), -FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn angle_between_points_quadrants() {
        let o = Point2::origin();
        assert_abs_diff_eq!(angle_between_points(&o, &Point2::new(0.0, 1.0)), FRAC_PI_2);
        assert_abs_diff_eq!(
            angle_between_points(&o, &Point2::new(0.0, -1.0)),
            3.0 * FRAC_PI_2,
            epsilon = 1e-12
        );
    }

    #[test]
    fn snap_to_45_degrees() {
        assert_abs_diff_eq!(snap_to_increment(0.7, FRAC_PI_4), FRAC_PI_4, epsilon = 1e-12);
        assert_abs_diff_eq!(snap_to_increment(TAU - 0.1, FRAC_PI_4), 0.0, epsilon = 1e-12);
    }
}
