use tracing::debug;

use crate::graph::{NodeId, WallGraph, WallId};
use crate::math::angle::angle_between_points;
use crate::math::Point2;
use crate::operations::modification::MoveNode;
use crate::operations::transform::{RotateComponent, TranslateComponent};
use crate::store::FloorPlan;

/// What a geometry drag moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragTarget {
    /// A single node; its walls stretch to follow.
    Node(NodeId),
    /// The connected component of a wall, translated rigidly.
    Component(WallId),
    /// The connected component of a wall, rotated about a pivot.
    Rotation { wall: WallId, pivot: Point2 },
}

#[derive(Debug, Clone)]
struct ActiveDrag {
    target: DragTarget,
    anchor: Point2,
    /// The committed graph when the drag began.
    origin: WallGraph,
}

/// Live geometry drag with a single undo entry.
///
/// Each `update` re-applies the whole move to the pre-drag snapshot and shows
/// the result without recording history. `finish` records one entry and
/// `cancel` puts the snapshot back.
#[derive(Debug, Clone, Default)]
pub struct DragSession {
    active: Option<ActiveDrag>,
}

impl DragSession {
    #[must_use]
    pub fn new() -> Self {
        Self { active: None }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    #[must_use]
    pub fn target(&self) -> Option<DragTarget> {
        self.active.as_ref().map(|drag| drag.target)
    }

    /// Starts dragging `node` from `anchor`. Returns `false` if the node does
    /// not exist or a drag is already running.
    pub fn begin_node(&mut self, node: NodeId, anchor: Point2, plan: &FloorPlan) -> bool {
        let exists = plan.graph().node(node).is_ok();
        exists && self.begin(DragTarget::Node(node), anchor, plan)
    }

    /// Starts translating the component containing `wall`.
    pub fn begin_component(&mut self, wall: WallId, anchor: Point2, plan: &FloorPlan) -> bool {
        let exists = plan.graph().wall(wall).is_ok();
        exists && self.begin(DragTarget::Component(wall), anchor, plan)
    }

    /// Starts rotating the component containing `wall` about `pivot`.
    pub fn begin_rotation(
        &mut self,
        wall: WallId,
        pivot: Point2,
        anchor: Point2,
        plan: &FloorPlan,
    ) -> bool {
        let exists = plan.graph().wall(wall).is_ok();
        exists && self.begin(DragTarget::Rotation { wall, pivot }, anchor, plan)
    }

    fn begin(&mut self, target: DragTarget, anchor: Point2, plan: &FloorPlan) -> bool {
        if self.active.is_some() {
            return false;
        }
        self.active = Some(ActiveDrag {
            target,
            anchor,
            origin: plan.snapshot(),
        });
        true
    }

    /// Previews the drag at `point`. A declined move keeps the last preview.
    pub fn update(&mut self, point: Point2, plan: &mut FloorPlan) -> bool {
        let Some(drag) = &self.active else {
            return false;
        };
        let origin = &drag.origin;
        match drag.target {
            DragTarget::Node(node) => plan
                .preview("drag node", origin, |graph, _| {
                    MoveNode::new(node, point).execute(graph)
                })
                .is_some(),
            DragTarget::Component(wall) => {
                let displacement = point - drag.anchor;
                plan.preview("drag component", origin, |graph, _| {
                    TranslateComponent::new(wall, displacement).execute(graph)
                })
                .is_some()
            }
            DragTarget::Rotation { wall, pivot } => {
                let angle = angle_between_points(&pivot, &point)
                    - angle_between_points(&pivot, &drag.anchor);
                plan.preview("rotate component", origin, |graph, _| {
                    RotateComponent::new(wall, angle).about(pivot).execute(graph)
                })
                .is_some()
            }
        }
    }

    /// Ends the drag and records it as one history entry.
    pub fn finish(&mut self, plan: &mut FloorPlan) -> bool {
        let Some(drag) = self.active.take() else {
            return false;
        };
        plan.checkpoint();
        debug!(drag = ?drag.target, "drag committed");
        true
    }

    /// Ends the drag and restores the graph captured when it began.
    pub fn cancel(&mut self, plan: &mut FloorPlan) {
        if let Some(drag) = self.active.take() {
            plan.restore(drag.origin);
            debug!(drag = ?drag.target, "drag cancelled");
        }
    }
}
