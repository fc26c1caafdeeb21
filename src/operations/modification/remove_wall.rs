use tracing::trace;

use crate::error::Result;
use crate::graph::{Wall, WallGraph, WallId};

/// Removes a wall and any nodes it leaves without connections.
#[derive(Debug, Clone, Copy)]
pub struct RemoveWall {
    wall: WallId,
}

impl RemoveWall {
    #[must_use]
    pub fn new(wall: WallId) -> Self {
        Self { wall }
    }

    /// Executes the removal, returning the detached wall with its openings.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::WallNotFound` if the wall does not exist.
    pub fn execute(&self, graph: &mut WallGraph) -> Result<Wall> {
        let wall = graph.take_wall(self.wall)?;
        let orphans = graph.remove_orphan_nodes();
        trace!(wall = %self.wall, orphans = orphans.len(), "wall removed");
        Ok(wall)
    }
}
