use tracing::trace;

use crate::error::{OperationError, Result};
use crate::graph::{IdSource, NodeId, Opening, Wall, WallGraph, WallId, NODE_MERGE_TOLERANCE};
use crate::math::distance_2d::{distance, point_to_segment_dist, project_onto_segment};
use crate::math::Point2;

/// Shortest segment a split may leave behind, in pixels.
pub const MIN_SEGMENT_LENGTH: f64 = 6.0;

/// Distance from the centerline past which a merged split node bends the wall.
const OFF_LINE_EPSILON: f64 = 1e-9;

/// Result of a successful split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitOutcome {
    /// Node inserted (or reused) at the split point.
    pub node: NodeId,
    /// The original wall, now ending at `node`.
    pub first: WallId,
    /// The new wall from `node` to the original end.
    pub second: WallId,
}

/// Splits a wall in two at an interior point.
///
/// The point is projected onto the centerline. A node already within
/// [`NODE_MERGE_TOLERANCE`] of the projection is reused as the split node,
/// even if that bends the wall slightly.
#[derive(Debug, Clone, Copy)]
pub struct SplitWall {
    wall: WallId,
    point: Point2,
    node: Option<NodeId>,
}

impl SplitWall {
    #[must_use]
    pub fn new(wall: WallId, point: Point2) -> Self {
        Self {
            wall,
            point,
            node: None,
        }
    }

    /// Uses an existing node as the split node instead of merging or creating
    /// one. The node is moved onto the centerline and its walls resynced.
    #[must_use]
    pub fn with_node(mut self, node: NodeId) -> Self {
        self.node = Some(node);
        self
    }

    /// Executes the split.
    ///
    /// Openings at or before the split distance stay on the first segment;
    /// the rest move to the second with their position reduced by the split
    /// distance and their plan-view centres recomputed.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::SegmentTooShort` if either segment would be
    /// shorter than [`MIN_SEGMENT_LENGTH`] at the actual split node, and
    /// `OperationError::InvalidInput` if the split node is one of the wall's
    /// own endpoints or already shares a wall with one. Every check runs before
    /// the graph is touched.
    pub fn execute(&self, graph: &mut WallGraph, ids: &mut impl IdSource) -> Result<SplitOutcome> {
        let wall = graph.wall(self.wall)?;
        let (start, end) = (wall.centerline.start, wall.centerline.end);
        let projection = project_onto_segment(&self.point, &start, &end);

        // The node the split will use, if it already exists, and where it ends up.
        let existing = match self.node {
            Some(node) => {
                graph.node(node)?;
                Some(node)
            }
            None => graph.find_node_near(&projection.point, NODE_MERGE_TOLERANCE),
        };
        let split_point = match (self.node, existing) {
            (None, Some(node)) => graph.node(node)?.position,
            _ => projection.point,
        };

        let shortest = distance(&start, &split_point).min(distance(&split_point, &end));
        if shortest < MIN_SEGMENT_LENGTH {
            return Err(OperationError::SegmentTooShort {
                length: shortest,
                min: MIN_SEGMENT_LENGTH,
            }
            .into());
        }
        if let Some(node) = existing {
            if wall.touches(node) {
                return Err(OperationError::InvalidInput(format!(
                    "cannot split {} at its own endpoint {node}",
                    self.wall
                ))
                .into());
            }
            let duplicate = graph
                .node(node)?
                .connected_walls
                .iter()
                .filter_map(|w| graph.wall(*w).ok())
                .any(|w| w.touches(wall.start_node) || w.touches(wall.end_node));
            if duplicate {
                return Err(OperationError::InvalidInput(format!(
                    "splitting {} at {node} would duplicate a wall",
                    self.wall
                ))
                .into());
            }
        }
        let on_centerline = point_to_segment_dist(&split_point, &start, &end) < OFF_LINE_EPSILON;

        let original = wall.clone();
        let node = match (self.node, existing) {
            (Some(node), _) => {
                graph.node_mut(node)?.position = split_point;
                let attached: Vec<WallId> =
                    graph.node(node)?.connected_walls.iter().copied().collect();
                for w in attached {
                    graph.sync_wall(w)?;
                }
                node
            }
            (None, Some(node)) => node,
            (None, None) => graph.find_or_create_node(split_point, ids),
        };
        let scale = graph.pixels_per_meter();
        let split_distance = distance(&start, &split_point) / scale;

        let second_id = ids.wall_id();
        let (kept, moved): (Vec<Opening>, Vec<Opening>) = original
            .openings
            .into_iter()
            .partition(|o| o.position <= split_distance);

        // Segment 1 keeps its opening centres only while its direction holds.
        {
            let first = graph.wall_mut(self.wall)?;
            first.end_node = node;
            first.openings = kept;
            if on_centerline {
                first.reshape(start, split_point, scale);
            } else {
                first.sync(start, split_point, scale);
            }
        }
        graph.node_mut(original.end_node)?.connected_walls.remove(&self.wall);
        graph.node_mut(node)?.connected_walls.insert(self.wall);

        // Segment 2.
        let mut second = Wall::new(
            second_id,
            node,
            original.end_node,
            split_point,
            end,
            original.thickness,
            scale,
        );
        second.style = original.style;
        second.openings = moved
            .into_iter()
            .map(|mut o| {
                o.position -= split_distance;
                o.wall_id = second_id;
                o
            })
            .collect();
        second.normalize_openings();
        second.refresh_opening_centers(scale);
        graph.insert_wall(second)?;

        trace!(wall = %self.wall, %second_id, %node, split_distance, "wall split");
        Ok(SplitOutcome {
            node,
            first: self.wall,
            second: second_id,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::graph::{OpeningKind, SequentialIds};
    use crate::operations::modification::AddWall;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn wall_with_openings(positions: &[f64]) -> (WallGraph, SequentialIds, WallId) {
        let mut graph = WallGraph::new();
        let mut ids = SequentialIds::new();
        let w = AddWall::new(p(0.0, 0.0), p(100.0, 0.0), 10.0)
            .execute(&mut graph, &mut ids)
            .unwrap();
        for &pos in positions {
            let mut o = Opening::new(ids.opening_id(), w, OpeningKind::Passage, pos, 8.0, 2.0, 0.0);
            o.center = Some(p(pos, 0.0));
            o.center_3d = Some(crate::math::Point3::new(pos, 0.0, 1.0));
            graph.wall_mut(w).unwrap().openings.push(o);
        }
        (graph, ids, w)
    }

    #[test]
    fn split_yields_two_walls_partitioning_openings() {
        let (mut graph, mut ids, w) = wall_with_openings(&[20.0, 75.0]);

        let outcome = SplitWall::new(w, p(40.0, 0.0)).execute(&mut graph, &mut ids).unwrap();
        graph.validate().unwrap();

        let first = graph.wall(outcome.first).unwrap();
        let second = graph.wall(outcome.second).unwrap();
        assert_relative_eq!(first.length, 40.0);
        assert_relative_eq!(second.length, 60.0);
        assert_eq!(first.end_node, outcome.node);
        assert_eq!(second.start_node, outcome.node);

        assert_eq!(first.openings.len(), 1);
        assert_relative_eq!(first.openings[0].position, 20.0);
        assert!(first.openings[0].center_3d.is_some(), "segment 1 openings untouched");

        assert_eq!(second.openings.len(), 1);
        let moved = &second.openings[0];
        assert_relative_eq!(moved.position, 35.0);
        assert_eq!(moved.wall_id, outcome.second);
        let center = moved.center.unwrap();
        assert_relative_eq!(center.x, 75.0, epsilon = 1e-9);
        assert!(moved.center_3d.is_none());
    }

    #[test]
    fn split_node_registers_both_segments() {
        let (mut graph, mut ids, w) = wall_with_openings(&[]);
        let original_end = graph.wall(w).unwrap().end_node;

        let outcome = SplitWall::new(w, p(50.0, 3.0)).execute(&mut graph, &mut ids).unwrap();

        let node = graph.node(outcome.node).unwrap();
        assert_eq!(node.position, p(50.0, 0.0));
        assert_eq!(node.degree(), 2);
        let end = graph.node(original_end).unwrap();
        assert!(end.connected_walls.contains(&outcome.second));
        assert!(!end.connected_walls.contains(&w));
    }

    #[test]
    fn split_near_endpoint_is_rejected_atomically() {
        let (mut graph, mut ids, w) = wall_with_openings(&[50.0]);
        let before = graph.clone();

        assert!(SplitWall::new(w, p(5.0, 0.0)).execute(&mut graph, &mut ids).is_err());
        assert!(SplitWall::new(w, p(95.0, 0.0)).execute(&mut graph, &mut ids).is_err());
        assert_eq!(graph, before);
    }

    #[test]
    fn split_at_minimum_length_is_accepted() {
        let (mut graph, mut ids, w) = wall_with_openings(&[]);
        let at = MIN_SEGMENT_LENGTH + 1e-9;
        let outcome = SplitWall::new(w, p(at, 0.0))
            .execute(&mut graph, &mut ids)
            .unwrap();
        assert_relative_eq!(graph.wall(outcome.first).unwrap().length, at, epsilon = 1e-9);
    }

    #[test]
    fn split_with_existing_node_moves_it_onto_the_wall() {
        let (mut graph, mut ids, w) = wall_with_openings(&[]);
        let stub = AddWall::new(p(60.0, 40.0), p(60.0, 2.0), 10.0)
            .execute(&mut graph, &mut ids)
            .unwrap();
        let stub_end = graph.wall(stub).unwrap().end_node;

        let outcome = SplitWall::new(w, p(60.0, 2.0))
            .with_node(stub_end)
            .execute(&mut graph, &mut ids)
            .unwrap();

        assert_eq!(outcome.node, stub_end);
        assert_eq!(graph.node(stub_end).unwrap().degree(), 3);
        assert_eq!(graph.wall(stub).unwrap().centerline.end, p(60.0, 0.0));
        graph.validate().unwrap();
    }

    #[test]
    fn split_merges_into_a_node_just_off_the_centerline() {
        let (mut graph, mut ids, w) = wall_with_openings(&[20.0]);
        let stub = AddWall::new(p(50.0, 0.8), p(50.0, 40.0), 10.0)
            .execute(&mut graph, &mut ids)
            .unwrap();
        let stray = graph.wall(stub).unwrap().start_node;

        let outcome = SplitWall::new(w, p(50.0, 0.0)).execute(&mut graph, &mut ids).unwrap();

        assert_eq!(outcome.node, stray);
        assert_eq!(graph.node(stray).unwrap().degree(), 3);
        let first = graph.wall(outcome.first).unwrap();
        assert_eq!(first.centerline.end, p(50.0, 0.8));
        assert!(first.openings[0].center.is_none(), "bent segment drops cached centres");
        assert_eq!(graph.wall(outcome.second).unwrap().centerline.start, p(50.0, 0.8));
        graph.validate().unwrap();
    }

    #[test]
    fn merged_node_too_close_to_an_end_is_rejected() {
        let (mut graph, mut ids, w) = wall_with_openings(&[]);
        AddWall::new(p(5.8, 0.5), p(5.8, 40.0), 10.0)
            .execute(&mut graph, &mut ids)
            .unwrap();
        let before = graph.clone();

        let err = SplitWall::new(w, p(6.3, 0.0)).execute(&mut graph, &mut ids);
        assert!(err.is_err());
        assert_eq!(graph, before);
    }

    #[test]
    fn split_that_would_duplicate_a_wall_is_rejected() {
        let (mut graph, mut ids, w) = wall_with_openings(&[]);
        AddWall::new(p(0.0, 0.0), p(50.0, 0.5), 10.0)
            .execute(&mut graph, &mut ids)
            .unwrap();
        let before = graph.clone();

        assert!(SplitWall::new(w, p(50.0, 0.0)).execute(&mut graph, &mut ids).is_err());
        assert_eq!(graph, before);
    }

    #[test]
    fn missing_wall_is_an_error() {
        let mut graph = WallGraph::new();
        let mut ids = SequentialIds::new();
        assert!(SplitWall::new(WallId(3), p(0.0, 0.0)).execute(&mut graph, &mut ids).is_err());
    }
}
