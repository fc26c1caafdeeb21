use nalgebra::Rotation2;

use crate::error::{OperationError, Result};
use crate::graph::{WallGraph, WallId};
use crate::math::Point2;
use crate::operations::query::ConnectedComponent;

/// Rotates the connected component containing a wall about a pivot.
#[derive(Debug, Clone, Copy)]
pub struct RotateComponent {
    wall: WallId,
    pivot: Option<Point2>,
    angle: f64,
}

impl RotateComponent {
    /// Creates a new `RotateComponent` operation pivoting on the
    /// component's node centroid.
    ///
    /// * `angle` - Rotation angle in radians, counter-clockwise.
    #[must_use]
    pub fn new(wall: WallId, angle: f64) -> Self {
        Self {
            wall,
            pivot: None,
            angle,
        }
    }

    #[must_use]
    pub fn about(mut self, pivot: Point2) -> Self {
        self.pivot = Some(pivot);
        self
    }

    /// Executes the rotation, returning the walls that moved.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` for a non-finite angle, or an
    /// error if the seed wall or a referenced node is missing.
    pub fn execute(&self, graph: &mut WallGraph) -> Result<Vec<WallId>> {
        if !self.angle.is_finite() {
            return Err(OperationError::InvalidInput("rotation angle must be finite".into()).into());
        }
        let component = ConnectedComponent::new(self.wall).execute(graph)?;

        let pivot = match self.pivot {
            Some(p) => p,
            None => {
                let mut sum = Point2::origin().coords;
                for &node in &component.nodes {
                    sum += graph.node(node)?.position.coords;
                }
                #[allow(clippy::cast_precision_loss)]
                let count = component.nodes.len().max(1) as f64;
                Point2::from(sum / count)
            }
        };

        let rotation = Rotation2::new(self.angle);
        for &node in &component.nodes {
            let n = graph.node_mut(node)?;
            n.position = pivot + rotation * (n.position - pivot);
        }
        for &wall in &component.walls {
            graph.sync_wall(wall)?;
        }
        Ok(component.walls.into_iter().collect())
    }
}
