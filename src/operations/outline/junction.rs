use crate::error::Result;
use crate::graph::{NodeId, WallGraph, WallId};
use crate::math::Point2;

/// Classification of a node by the number of walls meeting there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JunctionKind {
    Endpoint,
    Corner,
    TJunction,
    Cross,
    Star,
}

impl JunctionKind {
    /// Classifies a junction degree. A node without walls has no kind.
    #[must_use]
    pub fn classify(degree: usize) -> Option<Self> {
        match degree {
            0 => None,
            1 => Some(Self::Endpoint),
            2 => Some(Self::Corner),
            3 => Some(Self::TJunction),
            4 => Some(Self::Cross),
            _ => Some(Self::Star),
        }
    }
}

/// One wall leaving a junction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arm {
    pub wall_id: WallId,
    /// Direction pointing away from the junction, radians in `[0, 2π)`.
    pub angle: f64,
    /// Half the wall thickness, in pixels.
    pub half_thickness: f64,
    /// Whether the junction is the wall's start node.
    pub at_start: bool,
}

/// A node together with its arms sorted counter-clockwise.
#[derive(Debug, Clone, PartialEq)]
pub struct Junction {
    pub node: NodeId,
    pub position: Point2,
    pub kind: JunctionKind,
    pub arms: Vec<Arm>,
}

impl Junction {
    /// Builds the junction at `node`.
    ///
    /// Returns `Ok(None)` for a node with no walls.
    ///
    /// # Errors
    ///
    /// Returns an error if the node or one of its walls is missing.
    pub fn at(graph: &WallGraph, node: NodeId) -> Result<Option<Self>> {
        let n = graph.node(node)?;
        let Some(kind) = JunctionKind::classify(n.degree()) else {
            return Ok(None);
        };
        let scale = graph.pixels_per_meter();

        let mut arms = Vec::with_capacity(n.degree());
        for &wall_id in &n.connected_walls {
            let wall = graph.wall(wall_id)?;
            arms.push(Arm {
                wall_id,
                angle: wall.angle_away_from(node),
                half_thickness: wall.half_thickness_px(scale),
                at_start: wall.start_node == node,
            });
        }
        arms.sort_by(|a, b| a.angle.total_cmp(&b.angle).then(a.wall_id.cmp(&b.wall_id)));

        Ok(Some(Self {
            node,
            position: n.position,
            kind,
            arms,
        }))
    }

    /// Index of a wall's arm.
    #[must_use]
    pub fn arm_index(&self, wall: WallId) -> Option<usize> {
        self.arms.iter().position(|a| a.wall_id == wall)
    }

    /// The clockwise and counter-clockwise neighbours of arm `index`.
    ///
    /// For a two-arm junction both neighbours are the other arm; for a single
    /// arm both are the arm itself.
    #[must_use]
    pub fn neighbours(&self, index: usize) -> (&Arm, &Arm) {
        let n = self.arms.len();
        let cw = &self.arms[(index + n - 1) % n];
        let ccw = &self.arms[(index + 1) % n];
        (cw, ccw)
    }
}
