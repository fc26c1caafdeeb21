use tracing::trace;

use crate::error::{OperationError, Result};
use crate::graph::{IdSource, Wall, WallGraph, WallId, WallStyle, NODE_MERGE_TOLERANCE};
use crate::math::distance_2d::distance;
use crate::math::Point2;

/// Adds a wall between two points, merging endpoints into existing nodes.
#[derive(Debug, Clone)]
pub struct AddWall {
    start: Point2,
    end: Point2,
    thickness: f64,
    style: Option<WallStyle>,
}

impl AddWall {
    /// Creates a new `AddWall` operation.
    ///
    /// * `thickness` - Wall thickness in metres.
    #[must_use]
    pub fn new(start: Point2, end: Point2, thickness: f64) -> Self {
        Self {
            start,
            end,
            thickness,
            style: None,
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: WallStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Executes the insertion, returning the new wall's ID.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` for a non-positive thickness or a
    /// wall duplicating an existing one, and `OperationError::Degenerate` when
    /// both endpoints resolve to the same node. The graph is untouched on error.
    pub fn execute(&self, graph: &mut WallGraph, ids: &mut impl IdSource) -> Result<WallId> {
        if !(self.thickness.is_finite() && self.thickness > 0.0) {
            return Err(OperationError::InvalidInput(format!(
                "wall thickness must be positive, got {}",
                self.thickness
            ))
            .into());
        }

        let start_existing = graph.find_node_near(&self.start, NODE_MERGE_TOLERANCE);
        let end_existing = graph.find_node_near(&self.end, NODE_MERGE_TOLERANCE);
        let same_node = matches!((start_existing, end_existing), (Some(a), Some(b)) if a == b);
        if same_node || distance(&self.start, &self.end) <= NODE_MERGE_TOLERANCE {
            return Err(OperationError::Degenerate("wall endpoints coincide".to_owned()).into());
        }
        if let (Some(a), Some(b)) = (start_existing, end_existing) {
            let node = graph.node(a)?;
            let duplicate = node
                .connected_walls
                .iter()
                .filter_map(|w| graph.wall(*w).ok())
                .any(|w| w.other_end(a) == Some(b));
            if duplicate {
                return Err(
                    OperationError::InvalidInput("a wall already joins these nodes".to_owned())
                        .into(),
                );
            }
        }

        let start_node = graph.find_or_create_node(self.start, ids);
        let end_node = graph.find_or_create_node(self.end, ids);
        let start = graph.node(start_node)?.position;
        let end = graph.node(end_node)?.position;

        let mut wall = Wall::new(
            ids.wall_id(),
            start_node,
            end_node,
            start,
            end,
            self.thickness,
            graph.pixels_per_meter(),
        );
        wall.style.clone_from(&self.style);
        let id = graph.insert_wall(wall)?;
        trace!(wall = %id, %start_node, %end_node, "wall added");
        Ok(id)
    }
}
