pub mod id;
pub mod node;
pub mod opening;
pub mod wall;

pub use id::{IdSource, NodeId, OpeningId, SequentialIds, WallId};
pub use node::WallNode;
pub use opening::{
    DoorSwing, EnteredDimensions, HingeSide, LengthUnit, Opening, OpeningAlignment, OpeningKind,
};
pub use wall::{Centerline, Wall, WallStyle};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, PersistError, Result};
use crate::math::distance_2d::distance;
use crate::math::Point2;

/// Distance within which a new wall endpoint merges into an existing node, in pixels.
pub const NODE_MERGE_TOLERANCE: f64 = 1.0;

/// Slack allowed when checking opening bounds, in metres.
const OPENING_BOUNDS_SLACK: f64 = 1e-9;

fn default_scale() -> f64 {
    1.0
}

/// The wall graph: nodes, walls and the openings they carry.
///
/// The graph exclusively owns its entities; walls and nodes reference each
/// other by ID. Serializes as `{ "nodes": {id: node}, "edges": {id: wall} }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallGraph {
    nodes: BTreeMap<NodeId, WallNode>,
    edges: BTreeMap<WallId, Wall>,
    #[serde(default = "default_scale")]
    pixels_per_meter: f64,
}

impl Default for WallGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl WallGraph {
    /// Creates an empty graph at one pixel per metre.
    #[must_use]
    pub fn new() -> Self {
        Self::with_scale(1.0)
    }

    /// Creates an empty graph with the given drawing scale.
    #[must_use]
    pub fn with_scale(pixels_per_meter: f64) -> Self {
        Self {
            nodes: BTreeMap::new(),
            edges: BTreeMap::new(),
            pixels_per_meter,
        }
    }

    #[must_use]
    pub fn pixels_per_meter(&self) -> f64 {
        self.pixels_per_meter
    }

    #[must_use]
    pub fn to_pixels(&self, meters: f64) -> f64 {
        meters * self.pixels_per_meter
    }

    #[must_use]
    pub fn to_meters(&self, pixels: f64) -> f64 {
        pixels / self.pixels_per_meter
    }

    // --- Node operations ---

    pub fn nodes(&self) -> impl Iterator<Item = &WallNode> {
        self.nodes.values()
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns a reference to the node, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::NodeNotFound` if the node does not exist.
    pub fn node(&self, id: NodeId) -> std::result::Result<&WallNode, GraphError> {
        self.nodes.get(&id).ok_or(GraphError::NodeNotFound(id))
    }

    /// Returns a mutable reference to the node, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::NodeNotFound` if the node does not exist.
    pub fn node_mut(&mut self, id: NodeId) -> std::result::Result<&mut WallNode, GraphError> {
        self.nodes.get_mut(&id).ok_or(GraphError::NodeNotFound(id))
    }

    /// Nearest node within `tolerance` pixels of `point`.
    #[must_use]
    pub fn find_node_near(&self, point: &Point2, tolerance: f64) -> Option<NodeId> {
        self.nodes
            .values()
            .map(|n| (n.id, distance(&n.position, point)))
            .filter(|&(_, d)| d <= tolerance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Returns the node within [`NODE_MERGE_TOLERANCE`] of `point`, creating
    /// one when none exists.
    ///
    /// Linear scan; a spatial index becomes worthwhile around 10⁴ nodes.
    pub fn find_or_create_node(&mut self, point: Point2, ids: &mut impl IdSource) -> NodeId {
        if let Some(id) = self.find_node_near(&point, NODE_MERGE_TOLERANCE) {
            return id;
        }
        let id = ids.node_id();
        self.nodes.insert(id, WallNode::new(id, point));
        id
    }

    /// Removes every node with no connected walls, returning their IDs.
    pub fn remove_orphan_nodes(&mut self) -> Vec<NodeId> {
        let orphans: Vec<NodeId> = self
            .nodes
            .values()
            .filter(|n| n.is_orphan())
            .map(|n| n.id)
            .collect();
        for id in &orphans {
            self.nodes.remove(id);
        }
        orphans
    }

    // --- Wall operations ---

    pub fn walls(&self) -> impl Iterator<Item = &Wall> {
        self.edges.values()
    }

    #[must_use]
    pub fn wall_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns a reference to the wall, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::WallNotFound` if the wall does not exist.
    pub fn wall(&self, id: WallId) -> std::result::Result<&Wall, GraphError> {
        self.edges.get(&id).ok_or(GraphError::WallNotFound(id))
    }

    /// Returns a mutable reference to the wall, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::WallNotFound` if the wall does not exist.
    pub fn wall_mut(&mut self, id: WallId) -> std::result::Result<&mut Wall, GraphError> {
        self.edges.get_mut(&id).ok_or(GraphError::WallNotFound(id))
    }

    /// Inserts a wall and registers it on both endpoint nodes.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::NodeNotFound` if either endpoint is missing; the
    /// graph is left unchanged in that case.
    pub fn insert_wall(&mut self, wall: Wall) -> std::result::Result<WallId, GraphError> {
        self.node(wall.start_node)?;
        self.node(wall.end_node)?;
        let id = wall.id;
        let (start, end) = (wall.start_node, wall.end_node);
        self.edges.insert(id, wall);
        self.node_mut(start)?.connected_walls.insert(id);
        self.node_mut(end)?.connected_walls.insert(id);
        Ok(id)
    }

    /// Detaches a wall from its nodes and removes it. Orphaned nodes are kept;
    /// call [`WallGraph::remove_orphan_nodes`] afterwards.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::WallNotFound` if the wall does not exist.
    pub fn take_wall(&mut self, id: WallId) -> std::result::Result<Wall, GraphError> {
        let wall = self.edges.remove(&id).ok_or(GraphError::WallNotFound(id))?;
        for node in [wall.start_node, wall.end_node] {
            if let Some(n) = self.nodes.get_mut(&node) {
                n.connected_walls.remove(&id);
            }
        }
        Ok(wall)
    }

    /// Recomputes a wall's derived geometry from its current node positions.
    ///
    /// # Errors
    ///
    /// Returns an error if the wall or either of its nodes is missing.
    pub fn sync_wall(&mut self, id: WallId) -> std::result::Result<(), GraphError> {
        let (start_node, end_node) = {
            let w = self.wall(id)?;
            (w.start_node, w.end_node)
        };
        let start = self.node(start_node)?.position;
        let end = self.node(end_node)?.position;
        let scale = self.pixels_per_meter;
        self.wall_mut(id)?.sync(start, end, scale);
        Ok(())
    }

    /// Finds an opening by ID across all walls.
    #[must_use]
    pub fn opening(&self, id: OpeningId) -> Option<&Opening> {
        self.edges
            .values()
            .flat_map(|w| w.openings.iter())
            .find(|o| o.id == id)
    }

    /// Largest raw ID in use, for seeding an [`IdSource`].
    #[must_use]
    pub fn max_id(&self) -> u64 {
        let nodes = self.nodes.keys().map(|id| id.0);
        let walls = self.edges.values().flat_map(|w| {
            std::iter::once(w.id.0).chain(w.openings.iter().map(|o| o.id.0))
        });
        nodes.chain(walls).max().unwrap_or(0)
    }

    // --- Invariants ---

    /// Checks node/wall cross-references and opening bounds.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> std::result::Result<(), GraphError> {
        for node in self.nodes.values() {
            if node.is_orphan() {
                return Err(GraphError::OrphanNode(node.id));
            }
            for &wall_id in &node.connected_walls {
                let wall = self.wall(wall_id).map_err(|_| GraphError::DanglingConnection {
                    node: node.id,
                    wall: wall_id,
                })?;
                if !wall.touches(node.id) {
                    return Err(GraphError::DanglingConnection {
                        node: node.id,
                        wall: wall_id,
                    });
                }
            }
        }
        for wall in self.edges.values() {
            for node_id in [wall.start_node, wall.end_node] {
                let node = self.node(node_id)?;
                if !node.connected_walls.contains(&wall.id) {
                    return Err(GraphError::UnregisteredWall {
                        node: node_id,
                        wall: wall.id,
                    });
                }
            }
            for opening in &wall.openings {
                if opening.wall_id != wall.id || !opening.fits(wall.length, OPENING_BOUNDS_SLACK) {
                    return Err(GraphError::OpeningOutOfBounds {
                        wall: wall.id,
                        opening: opening.id,
                    });
                }
            }
        }
        Ok(())
    }

    // --- Persistence ---

    /// Serializes the graph as nested JSON maps.
    ///
    /// # Errors
    ///
    /// Returns `PersistError::Json` if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| PersistError::from(e).into())
    }

    /// Loads a graph from JSON and validates it.
    ///
    /// # Errors
    ///
    /// Returns `PersistError::Json` on malformed input, or a `GraphError` if
    /// the loaded graph violates an invariant.
    pub fn from_json(json: &str) -> Result<Self> {
        let graph: Self = serde_json::from_str(json).map_err(PersistError::from)?;
        graph.validate()?;
        Ok(graph)
    }
}
