pub mod angle;
pub mod distance_2d;
pub mod intersect_2d;
pub mod polygon_2d;

/// 2D point type (pixel space).
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Determinant below which two directions are treated as parallel.
pub const PARALLEL_DETERMINANT: f64 = 1e-4;

/// 2D cross product (z component of the 3D cross product).
#[must_use]
pub fn cross_2d(a: &Vector2, b: &Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Unit vector pointing in direction `angle` (radians).
#[must_use]
pub fn direction(angle: f64) -> Vector2 {
    Vector2::new(angle.cos(), angle.sin())
}

/// Left-hand normal of a direction: the direction rotated by +90°.
#[must_use]
pub fn left_normal(dir: &Vector2) -> Vector2 {
    Vector2::new(-dir.y, dir.x)
}
