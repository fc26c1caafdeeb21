use crate::error::Result;
use crate::graph::{NodeId, WallGraph, WallId};
use crate::math::Point2;

/// Moves a node and resynchronizes every wall attached to it.
#[derive(Debug, Clone, Copy)]
pub struct MoveNode {
    node: NodeId,
    position: Point2,
}

impl MoveNode {
    #[must_use]
    pub fn new(node: NodeId, position: Point2) -> Self {
        Self { node, position }
    }

    /// Executes the move, returning the walls whose geometry changed.
    ///
    /// Openings on those walls are re-clamped and their cached centres dropped.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::NodeNotFound` if the node does not exist, or
    /// `GraphError::WallNotFound` if the node lists a missing wall.
    pub fn execute(&self, graph: &mut WallGraph) -> Result<Vec<WallId>> {
        let node = graph.node_mut(self.node)?;
        node.position = self.position;
        let walls: Vec<WallId> = node.connected_walls.iter().copied().collect();
        for &wall in &walls {
            graph.sync_wall(wall)?;
        }
        Ok(walls)
    }
}
