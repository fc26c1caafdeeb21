mod junction;
mod miter;

pub use junction::{Arm, Junction, JunctionKind};
pub use miter::{end_miters, MiterPair, MAX_MITER_RATIO, NEAR_FOLDED_ANGLE, NEAR_STRAIGHT_ANGLE};

use std::collections::BTreeMap;

use crate::error::{GraphError, Result};
use crate::graph::{NodeId, Wall, WallGraph, WallId};
use crate::math::Point2;
use crate::operations::query::ConnectedComponent;

/// Render polygon of one wall.
#[derive(Debug, Clone, PartialEq)]
pub struct WallPolygon {
    pub wall_id: WallId,
    /// `[start_left, end_left, end_right, start_right]`.
    pub polygon: Vec<Point2>,
}

/// Turns the thin-line wall graph into thick-wall polygons with mitered
/// junctions.
///
/// Pure over the graph snapshot: each wall end depends only on the walls
/// meeting at that node.
#[derive(Debug, Clone, Copy, Default)]
pub struct WallOutlines {
    component: Option<WallId>,
}

impl WallOutlines {
    /// Outlines every wall in the graph.
    #[must_use]
    pub fn new() -> Self {
        Self { component: None }
    }

    /// Outlines only the connected component containing `wall`.
    #[must_use]
    pub fn for_component(wall: WallId) -> Self {
        Self {
            component: Some(wall),
        }
    }

    /// Executes the outline generation, ordered by wall ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the graph holds a dangling node or wall reference.
    pub fn execute(&self, graph: &WallGraph) -> Result<Vec<WallPolygon>> {
        let walls: Vec<&Wall> = match self.component {
            Some(seed) => {
                let component = ConnectedComponent::new(seed).execute(graph)?;
                component
                    .walls
                    .iter()
                    .map(|&id| graph.wall(id))
                    .collect::<std::result::Result<_, _>>()?
            }
            None => graph.walls().collect(),
        };

        let mut junctions: BTreeMap<NodeId, Junction> = BTreeMap::new();
        let mut out = Vec::with_capacity(walls.len());
        for wall in walls {
            let start = miters_at(graph, &mut junctions, wall.start_node, wall.id)?;
            let end = miters_at(graph, &mut junctions, wall.end_node, wall.id)?;
            // At the end node the arm points backwards, so its
            // counter-clockwise side is the wall's right side.
            out.push(WallPolygon {
                wall_id: wall.id,
                polygon: vec![start.ccw, end.cw, end.ccw, start.cw],
            });
        }
        Ok(out)
    }
}

fn miters_at(
    graph: &WallGraph,
    cache: &mut BTreeMap<NodeId, Junction>,
    node: NodeId,
    wall: WallId,
) -> Result<MiterPair> {
    if !cache.contains_key(&node) {
        let junction = Junction::at(graph, node)?.ok_or(GraphError::OrphanNode(node))?;
        cache.insert(node, junction);
    }
    let junction = cache.get(&node).ok_or(GraphError::NodeNotFound(node))?;
    let index = junction
        .arm_index(wall)
        .ok_or(GraphError::UnregisteredWall { node, wall })?;
    Ok(end_miters(junction, index))
}
