use crate::error::Result;
use crate::graph::{WallGraph, WallId};
use crate::math::Vector2;
use crate::operations::query::ConnectedComponent;

/// Translates the connected component containing a wall.
#[derive(Debug, Clone, Copy)]
pub struct TranslateComponent {
    wall: WallId,
    displacement: Vector2,
}

impl TranslateComponent {
    /// Creates a new `TranslateComponent` operation.
    ///
    /// * `displacement` - Offset in pixels.
    #[must_use]
    pub fn new(wall: WallId, displacement: Vector2) -> Self {
        Self { wall, displacement }
    }

    /// Executes the translation, returning the walls that moved.
    ///
    /// # Errors
    ///
    /// Returns an error if the seed wall or a referenced node is missing.
    pub fn execute(&self, graph: &mut WallGraph) -> Result<Vec<WallId>> {
        let component = ConnectedComponent::new(self.wall).execute(graph)?;
        for &node in &component.nodes {
            graph.node_mut(node)?.position += self.displacement;
        }
        for &wall in &component.walls {
            graph.sync_wall(wall)?;
        }
        Ok(component.walls.into_iter().collect())
    }
}
