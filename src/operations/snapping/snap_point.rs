use crate::config::UnitSystem;
use crate::graph::{NodeId, WallGraph, WallId};
use crate::math::distance_2d::{distance, project_onto_segment};
use crate::math::Point2;

/// What a snapped point attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapTarget {
    Node(NodeId),
    Wall(WallId),
    Grid,
}

/// Tag of a [`SnapTarget`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapType {
    Node,
    Wall,
    Grid,
}

/// A resolved cursor position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    pub point: Point2,
    pub target: Option<SnapTarget>,
}

impl SnapResult {
    /// An unsnapped result at `point`.
    #[must_use]
    pub fn free(point: Point2) -> Self {
        Self {
            point,
            target: None,
        }
    }

    #[must_use]
    pub fn snapped(&self) -> bool {
        self.target.is_some()
    }

    #[must_use]
    pub fn snap_type(&self) -> Option<SnapType> {
        self.target.map(|t| match t {
            SnapTarget::Node(_) => SnapType::Node,
            SnapTarget::Wall(_) => SnapType::Wall,
            SnapTarget::Grid => SnapType::Grid,
        })
    }
}

/// Snap behaviour while drawing and dragging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapOptions {
    /// Snap radius in pixels.
    pub tolerance: f64,
    pub nodes: bool,
    pub walls: bool,
    pub grid: bool,
    /// Round drawing directions to 45° steps.
    pub angle: bool,
    pub unit_system: UnitSystem,
}

impl Default for SnapOptions {
    fn default() -> Self {
        Self {
            tolerance: 10.0,
            nodes: true,
            walls: true,
            grid: true,
            angle: false,
            unit_system: UnitSystem::Metric,
        }
    }
}

/// Resolves a raw cursor point against nodes, wall centerlines and the grid.
///
/// The first class that has a target within tolerance wins, in that order.
#[derive(Debug, Clone, Copy)]
pub struct SnapPoint {
    raw: Point2,
    options: SnapOptions,
}

impl SnapPoint {
    #[must_use]
    pub fn new(raw: Point2, options: SnapOptions) -> Self {
        Self { raw, options }
    }

    #[must_use]
    pub fn execute(&self, graph: &WallGraph) -> SnapResult {
        let tol = self.options.tolerance;

        if self.options.nodes {
            if let Some(id) = graph.find_node_near(&self.raw, tol) {
                if let Ok(node) = graph.node(id) {
                    return SnapResult {
                        point: node.position,
                        target: Some(SnapTarget::Node(id)),
                    };
                }
            }
        }

        if self.options.walls {
            let nearest = graph
                .walls()
                .map(|w| {
                    let proj =
                        project_onto_segment(&self.raw, &w.centerline.start, &w.centerline.end);
                    (w.id, proj)
                })
                .filter(|(_, proj)| proj.distance <= tol)
                .min_by(|a, b| a.1.distance.total_cmp(&b.1.distance));
            if let Some((id, proj)) = nearest {
                return SnapResult {
                    point: proj.point,
                    target: Some(SnapTarget::Wall(id)),
                };
            }
        }

        if self.options.grid {
            let pitch = graph.to_pixels(self.options.unit_system.grid_pitch_meters());
            if pitch > 0.0 {
                let grid = Point2::new(
                    (self.raw.x / pitch).round() * pitch,
                    (self.raw.y / pitch).round() * pitch,
                );
                if distance(&grid, &self.raw) <= tol {
                    return SnapResult {
                        point: grid,
                        target: Some(SnapTarget::Grid),
                    };
                }
            }
        }

        SnapResult::free(self.raw)
    }
}
