use crate::error::Result;
use crate::graph::{NodeId, WallGraph, WallId};
use crate::math::distance_2d::project_onto_segment;
use crate::math::intersect_2d::infinite_line_intersection;
use crate::math::Point2;
use crate::operations::modification::MIN_SEGMENT_LENGTH;

/// Default perpendicular tolerance for intersection hits, in pixels.
pub const DEFAULT_INTERSECTION_TOLERANCE: f64 = 10.0;

/// Slack allowed beyond a target segment's ends for extended-centerline hits, in pixels.
pub const SEGMENT_BOUNDS_SLACK: f64 = 0.1;

/// A hit in a wall's interior, eligible for splitting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallHit {
    pub wall_id: WallId,
    /// Projection of the query point onto the centerline.
    pub point: Point2,
    /// Distance from the wall's start along the centerline, in pixels.
    pub along: f64,
    /// Perpendicular distance from the query point, in pixels.
    pub distance: f64,
}

/// A hit close to one of a wall's endpoints; merged into, never split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndpointHit {
    pub wall_id: WallId,
    pub node_id: NodeId,
    pub distance: f64,
}

/// Walls near a point, split by whether the hit is interior.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntersectionHits {
    /// Sorted by increasing distance.
    pub interior: Vec<WallHit>,
    pub near_endpoint: Vec<EndpointHit>,
}

impl IntersectionHits {
    /// The closest interior hit.
    #[must_use]
    pub fn nearest(&self) -> Option<&WallHit> {
        self.interior.first()
    }
}

/// Finds walls whose centerline passes within `tolerance` of a point.
#[derive(Debug, Clone)]
pub struct FindIntersectingWalls {
    point: Point2,
    tolerance: f64,
    exclude: Vec<WallId>,
}

impl FindIntersectingWalls {
    #[must_use]
    pub fn new(point: Point2, tolerance: f64) -> Self {
        Self {
            point,
            tolerance,
            exclude: Vec::new(),
        }
    }

    #[must_use]
    pub fn excluding(mut self, walls: impl IntoIterator<Item = WallId>) -> Self {
        self.exclude.extend(walls);
        self
    }

    #[must_use]
    pub fn execute(&self, graph: &WallGraph) -> IntersectionHits {
        let mut hits = IntersectionHits::default();
        for wall in graph.walls().filter(|w| !self.exclude.contains(&w.id)) {
            let (start, end) = (wall.centerline.start, wall.centerline.end);
            let projection = project_onto_segment(&self.point, &start, &end);
            if projection.distance > self.tolerance {
                continue;
            }
            let length = wall.centerline.pixel_length();
            let along = projection.t * length;
            if along < MIN_SEGMENT_LENGTH {
                hits.near_endpoint.push(EndpointHit {
                    wall_id: wall.id,
                    node_id: wall.start_node,
                    distance: projection.distance,
                });
            } else if length - along < MIN_SEGMENT_LENGTH {
                hits.near_endpoint.push(EndpointHit {
                    wall_id: wall.id,
                    node_id: wall.end_node,
                    distance: projection.distance,
                });
            } else {
                hits.interior.push(WallHit {
                    wall_id: wall.id,
                    point: projection.point,
                    along,
                    distance: projection.distance,
                });
            }
        }
        hits.interior.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

/// Intersects the infinite line through a new wall with a target wall's
/// centerline.
///
/// Used when a new wall ends flush against the target's face: the target is
/// cut where the new wall's centerline would meet it, not where the new wall
/// visually touches. Returns `None` for parallel lines or when the hit falls
/// outside the target segment by more than [`SEGMENT_BOUNDS_SLACK`].
///
/// # Errors
///
/// Returns `GraphError::WallNotFound` if the target does not exist.
pub fn extended_centerline_intersection(
    new_start: &Point2,
    new_end: &Point2,
    target: WallId,
    graph: &WallGraph,
) -> Result<Option<Point2>> {
    let wall = graph.wall(target)?;
    let (a, b) = (wall.centerline.start, wall.centerline.end);
    let Some(hit) = infinite_line_intersection(new_start, new_end, &a, &b) else {
        return Ok(None);
    };
    let length = wall.centerline.pixel_length();
    let along = (hit - a).dot(&wall.centerline.delta()) / length;
    let within = along >= -SEGMENT_BOUNDS_SLACK && along <= length + SEGMENT_BOUNDS_SLACK;
    Ok(within.then_some(hit))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::graph::SequentialIds;
    use crate::operations::modification::AddWall;

    const TOL: f64 = DEFAULT_INTERSECTION_TOLERANCE;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn horizontal_wall() -> (WallGraph, WallId) {
        let mut graph = WallGraph::new();
        let mut ids = SequentialIds::new();
        let w = AddWall::new(p(0.0, 0.0), p(100.0, 0.0), 10.0)
            .execute(&mut graph, &mut ids)
            .unwrap();
        (graph, w)
    }

    #[test]
    fn interior_hit_within_tolerance() {
        let (graph, w) = horizontal_wall();
        let hits = FindIntersectingWalls::new(p(40.0, 7.0), TOL).execute(&graph);
        let hit = hits.nearest().unwrap();
        assert_eq!(hit.wall_id, w);
        assert_eq!(hit.point, p(40.0, 0.0));
        assert!((hit.distance - 7.0).abs() < 1e-12);
        assert!(hits.near_endpoint.is_empty());
    }

    #[test]
    fn hit_near_endpoint_is_reported_separately() {
        let (graph, w) = horizontal_wall();
        let hits = FindIntersectingWalls::new(p(97.0, 2.0), TOL).execute(&graph);
        assert!(hits.interior.is_empty());
        assert_eq!(hits.near_endpoint.len(), 1);
        assert_eq!(hits.near_endpoint[0].node_id, graph.wall(w).unwrap().end_node);
    }

    #[test]
    fn far_point_and_excluded_walls_miss() {
        let (graph, w) = horizontal_wall();
        let far = FindIntersectingWalls::new(p(50.0, 11.0), TOL).execute(&graph);
        assert_eq!(far, IntersectionHits::default());
        let excluded = FindIntersectingWalls::new(p(50.0, 1.0), TOL)
            .excluding([w])
            .execute(&graph);
        assert!(excluded.interior.is_empty());
    }

    #[test]
    fn extended_centerline_meets_target_centerline() {
        let (graph, w) = horizontal_wall();
        // New wall ends on the target's top face at y = 5.
        let hit = extended_centerline_intersection(&p(30.0, 60.0), &p(30.0, 5.0), w, &graph)
            .unwrap()
            .unwrap();
        assert!((hit.x - 30.0).abs() < 1e-9);
        assert!(hit.y.abs() < 1e-9);
    }

    #[test]
    fn extended_centerline_outside_segment_is_rejected() {
        let (graph, w) = horizontal_wall();
        let miss =
            extended_centerline_intersection(&p(120.0, 60.0), &p(120.0, 5.0), w, &graph).unwrap();
        assert!(miss.is_none());
        let parallel =
            extended_centerline_intersection(&p(0.0, 20.0), &p(50.0, 20.0), w, &graph).unwrap();
        assert!(parallel.is_none());
    }
}
