use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::id::{NodeId, WallId};
use crate::math::Point2;

/// A junction point shared by one or more walls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallNode {
    pub id: NodeId,
    /// Position in pixel space.
    pub position: Point2,
    /// Walls that reference this node as start or end.
    pub connected_walls: BTreeSet<WallId>,
}

impl WallNode {
    /// Creates a node with no connections.
    #[must_use]
    pub fn new(id: NodeId, position: Point2) -> Self {
        Self {
            id,
            position,
            connected_walls: BTreeSet::new(),
        }
    }

    /// Junction degree.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.connected_walls.len()
    }

    #[must_use]
    pub fn is_orphan(&self) -> bool {
        self.connected_walls.is_empty()
    }
}
