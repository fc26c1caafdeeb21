use std::collections::{BTreeSet, VecDeque};

use crate::error::Result;
use crate::graph::{NodeId, WallGraph, WallId};

/// Walls attached to a node, or sharing a node with a wall.
#[derive(Debug, Clone, Copy)]
pub enum ConnectedWalls {
    AtNode(NodeId),
    AdjacentTo(WallId),
}

impl ConnectedWalls {
    #[must_use]
    pub fn at_node(node: NodeId) -> Self {
        Self::AtNode(node)
    }

    #[must_use]
    pub fn adjacent_to(wall: WallId) -> Self {
        Self::AdjacentTo(wall)
    }

    /// Executes the query. A wall is never reported as adjacent to itself.
    ///
    /// # Errors
    ///
    /// Returns an error if the node or wall does not exist.
    pub fn execute(&self, graph: &WallGraph) -> Result<Vec<WallId>> {
        match *self {
            Self::AtNode(node) => Ok(graph.node(node)?.connected_walls.iter().copied().collect()),
            Self::AdjacentTo(wall) => {
                let w = graph.wall(wall)?;
                let mut out = BTreeSet::new();
                for node in [w.start_node, w.end_node] {
                    out.extend(graph.node(node)?.connected_walls.iter().copied());
                }
                out.remove(&wall);
                Ok(out.into_iter().collect())
            }
        }
    }
}

/// The walls and nodes reachable from a wall through shared nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Component {
    pub walls: BTreeSet<WallId>,
    pub nodes: BTreeSet<NodeId>,
}

/// Breadth-first traversal over node adjacency starting at one wall.
#[derive(Debug, Clone, Copy)]
pub struct ConnectedComponent {
    wall: WallId,
}

impl ConnectedComponent {
    #[must_use]
    pub fn new(wall: WallId) -> Self {
        Self { wall }
    }

    /// Executes the traversal.
    ///
    /// # Errors
    ///
    /// Returns an error if the seed wall or any referenced node is missing.
    pub fn execute(&self, graph: &WallGraph) -> Result<Component> {
        let mut component = Component::default();
        let mut queue = VecDeque::from([self.wall]);
        component.walls.insert(self.wall);

        while let Some(wall_id) = queue.pop_front() {
            let wall = graph.wall(wall_id)?;
            for node_id in [wall.start_node, wall.end_node] {
                if !component.nodes.insert(node_id) {
                    continue;
                }
                for &next in &graph.node(node_id)?.connected_walls {
                    if component.walls.insert(next) {
                        queue.push_back(next);
                    }
                }
            }
        }
        Ok(component)
    }
}

/// Partitions every wall in the graph into connected components.
///
/// # Errors
///
/// Returns an error if the graph references a missing node.
pub fn components(graph: &WallGraph) -> Result<Vec<Component>> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    for wall in graph.walls() {
        if seen.contains(&wall.id) {
            continue;
        }
        let component = ConnectedComponent::new(wall.id).execute(graph)?;
        seen.extend(component.walls.iter().copied());
        out.push(component);
    }
    Ok(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::graph::SequentialIds;
    use crate::math::Point2;
    use crate::operations::modification::AddWall;

    fn add(graph: &mut WallGraph, ids: &mut SequentialIds, a: (f64, f64), b: (f64, f64)) -> WallId {
        AddWall::new(Point2::new(a.0, a.1), Point2::new(b.0, b.1), 0.2)
            .execute(graph, ids)
            .unwrap()
    }

    #[test]
    fn component_follows_chain_but_not_islands() {
        let mut graph = WallGraph::new();
        let mut ids = SequentialIds::new();
        let a = add(&mut graph, &mut ids, (0.0, 0.0), (10.0, 0.0));
        let b = add(&mut graph, &mut ids, (10.0, 0.0), (10.0, 10.0));
        let c = add(&mut graph, &mut ids, (10.0, 10.0), (0.0, 10.0));
        let island = add(&mut graph, &mut ids, (50.0, 50.0), (60.0, 50.0));

        let component = ConnectedComponent::new(a).execute(&graph).unwrap();
        assert_eq!(component.walls, BTreeSet::from([a, b, c]));
        assert_eq!(component.nodes.len(), 4);
        assert!(!component.walls.contains(&island));

        assert_eq!(components(&graph).unwrap().len(), 2);
    }

    #[test]
    fn adjacent_walls_exclude_self() {
        let mut graph = WallGraph::new();
        let mut ids = SequentialIds::new();
        let a = add(&mut graph, &mut ids, (0.0, 0.0), (10.0, 0.0));
        let b = add(&mut graph, &mut ids, (10.0, 0.0), (10.0, 10.0));
        let c = add(&mut graph, &mut ids, (0.0, 0.0), (0.0, 10.0));

        let adjacent = ConnectedWalls::adjacent_to(a).execute(&graph).unwrap();
        assert_eq!(adjacent, vec![b, c]);

        let corner = graph.wall(a).unwrap().end_node;
        let at_node = ConnectedWalls::at_node(corner).execute(&graph).unwrap();
        assert_eq!(at_node, vec![a, b]);
    }
}
