use tracing::trace;

use super::split::{SplitOutcome, SplitWall, MIN_SEGMENT_LENGTH};
use crate::error::Result;
use crate::graph::{IdSource, WallGraph, WallId};
use crate::math::intersect_2d::segment_segment_intersect_2d;
use crate::math::Point2;

/// Splits a wall and every wall whose interior it crosses at the crossing
/// points, so each crossing becomes a shared junction node.
#[derive(Debug, Clone, Copy)]
pub struct SplitCrossings {
    wall: WallId,
}

#[derive(Debug, Clone, Copy)]
struct Crossing {
    /// Distance along the crossing wall, in pixels.
    along: f64,
    other: WallId,
    point: Point2,
}

impl SplitCrossings {
    #[must_use]
    pub fn new(wall: WallId) -> Self {
        Self { wall }
    }

    /// Executes the splits, returning one pair of outcomes (other wall, this
    /// wall) per crossing.
    ///
    /// Crossings closer than [`MIN_SEGMENT_LENGTH`] to an endpoint of either
    /// wall, or to the previous crossing, are skipped.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::WallNotFound` if the wall does not exist.
    pub fn execute(
        &self,
        graph: &mut WallGraph,
        ids: &mut impl IdSource,
    ) -> Result<Vec<(SplitOutcome, SplitOutcome)>> {
        let crossings = self.find_crossings(graph)?;

        let mut remaining = self.wall;
        let mut outcomes = Vec::with_capacity(crossings.len());
        for crossing in crossings {
            let other = SplitWall::new(crossing.other, crossing.point).execute(graph, ids)?;
            let point = graph.node(other.node)?.position;
            let this = SplitWall::new(remaining, point).execute(graph, ids)?;
            remaining = this.second;
            outcomes.push((other, this));
        }

        trace!(wall = %self.wall, crossings = outcomes.len(), "crossings split");
        Ok(outcomes)
    }

    fn find_crossings(&self, graph: &WallGraph) -> Result<Vec<Crossing>> {
        let wall = graph.wall(self.wall)?;
        let (a0, a1) = (wall.centerline.start, wall.centerline.end);
        let len_a = wall.centerline.pixel_length();

        let mut crossings: Vec<Crossing> = graph
            .walls()
            .filter(|other| other.id != self.wall)
            .filter(|other| !other.touches(wall.start_node) && !other.touches(wall.end_node))
            .filter_map(|other| {
                let (b0, b1) = (other.centerline.start, other.centerline.end);
                let len_b = other.centerline.pixel_length();
                let (point, t, u) = segment_segment_intersect_2d(&a0, &a1, &b0, &b1)?;
                let interior = |s: f64, len: f64| {
                    s * len >= MIN_SEGMENT_LENGTH && (1.0 - s) * len >= MIN_SEGMENT_LENGTH
                };
                (interior(t, len_a) && interior(u, len_b)).then_some(Crossing {
                    along: t * len_a,
                    other: other.id,
                    point,
                })
            })
            .collect();
        crossings.sort_by(|a, b| a.along.total_cmp(&b.along));

        let mut accepted: Vec<Crossing> = Vec::with_capacity(crossings.len());
        for c in crossings {
            let previous = accepted.last().map_or(0.0, |p| p.along);
            if c.along - previous >= MIN_SEGMENT_LENGTH {
                accepted.push(c);
            }
        }
        Ok(accepted)
    }
}
