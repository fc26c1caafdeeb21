use tracing::debug;

use crate::error::Result;
use crate::graph::{IdSource, NodeId, WallGraph, WallId};
use crate::math::distance_2d::distance;
use crate::math::Point2;
use crate::operations::modification::{AddWall, SplitCrossings, SplitWall};
use crate::operations::query::{
    extended_centerline_intersection, FindIntersectingWalls, DEFAULT_INTERSECTION_TOLERANCE,
};
use crate::operations::snapping::{snap_angle, FaceSnap, SnapToWallFace};
use crate::store::FloorPlan;

/// Strokes shorter than this are discarded on finish, in pixels.
pub const MIN_WALL_LENGTH: f64 = 5.0;

/// A resolved stroke endpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeEnd {
    pub point: Point2,
    /// Set when the endpoint landed on another wall's face.
    pub face: Option<FaceSnap>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawingState {
    Idle,
    Drawing { start: StrokeEnd, current: StrokeEnd },
}

/// Turns pointer samples into committed walls.
///
/// `start` anchors the stroke, `update` previews it and `finish` commits it
/// and splits the walls it lands on. Every sample is re-snapped against the
/// plan's committed graph.
#[derive(Debug, Clone)]
pub struct DrawingSession {
    state: DrawingState,
    thickness: f64,
}

impl DrawingSession {
    /// A session drawing walls of `thickness` metres.
    #[must_use]
    pub fn new(thickness: f64) -> Self {
        Self {
            state: DrawingState::Idle,
            thickness,
        }
    }

    /// A session using the plan's default wall thickness.
    #[must_use]
    pub fn for_plan(plan: &FloorPlan) -> Self {
        Self::new(plan.config().wall_thickness)
    }

    #[must_use]
    pub fn state(&self) -> DrawingState {
        self.state
    }

    #[must_use]
    pub fn is_drawing(&self) -> bool {
        matches!(self.state, DrawingState::Drawing { .. })
    }

    /// Anchors a new stroke, replacing any stroke in progress.
    pub fn start(&mut self, point: Point2, plan: &FloorPlan) -> StrokeEnd {
        // The anchor is its own drag vector, so the nearest face wins.
        let start = resolve(point, point, plan);
        self.state = DrawingState::Drawing {
            start,
            current: start,
        };
        start
    }

    /// Re-snaps the moving end and returns the preview segment.
    pub fn update(&mut self, point: Point2, plan: &FloorPlan) -> Option<(Point2, Point2)> {
        let DrawingState::Drawing { start, .. } = self.state else {
            return None;
        };
        let current = resolve_end(&start, point, plan);
        self.state = DrawingState::Drawing { start, current };
        Some((start.point, current.point))
    }

    /// Commits the stroke ending at `point` and returns the new wall.
    ///
    /// The wall and the splits it triggers form one history entry. Strokes
    /// shorter than [`MIN_WALL_LENGTH`] are dropped. The session is idle
    /// afterwards in every case.
    pub fn finish(&mut self, point: Point2, plan: &mut FloorPlan) -> Option<WallId> {
        let state = std::mem::replace(&mut self.state, DrawingState::Idle);
        let DrawingState::Drawing { start, .. } = state else {
            return None;
        };
        let end = resolve_end(&start, point, plan);
        let length = distance(&start.point, &end.point);
        if length < MIN_WALL_LENGTH {
            debug!(length, "stroke too short");
            return None;
        }

        let thickness = self.thickness;
        let wall = plan.edit("draw wall", |graph, ids| {
            let wall = AddWall::new(start.point, end.point, thickness).execute(graph, ids)?;
            let splits = split_for_new_wall(graph, ids, wall, &start, &end)?;
            debug!(%wall, splits, "wall drawn");
            Ok(wall)
        })?;
        Some(wall)
    }

    /// Abandons the stroke in progress.
    pub fn cancel(&mut self) {
        self.state = DrawingState::Idle;
    }

    /// Tool switch: forces the session idle.
    pub fn deactivate(&mut self) {
        self.cancel();
    }
}

fn resolve(point: Point2, drag_start: Point2, plan: &FloorPlan) -> StrokeEnd {
    let tolerance = plan.config().snap_tolerance;
    if let Some(face) = SnapToWallFace::new(point, drag_start, tolerance).execute(plan.graph()) {
        return StrokeEnd {
            point: face.point,
            face: Some(face),
        };
    }
    StrokeEnd {
        point: plan.snap(point).point,
        face: None,
    }
}

/// Face snapping wins; otherwise the angle snap, when enabled, replaces
/// point snapping so the stroke keeps its 45° direction.
fn resolve_end(start: &StrokeEnd, point: Point2, plan: &FloorPlan) -> StrokeEnd {
    let tolerance = plan.config().snap_tolerance;
    if let Some(face) = SnapToWallFace::new(point, start.point, tolerance).execute(plan.graph()) {
        return StrokeEnd {
            point: face.point,
            face: Some(face),
        };
    }
    if plan.config().angle_snap {
        return StrokeEnd {
            point: snap_angle(&start.point, &point),
            face: None,
        };
    }
    resolve(point, start.point, plan)
}

/// Splits the walls touched by a freshly drawn wall and returns how many
/// splits were made. Each declined split (too close to an endpoint) is
/// skipped; every split is atomic, so the graph stays consistent.
fn split_for_new_wall(
    graph: &mut WallGraph,
    ids: &mut impl IdSource,
    wall: WallId,
    start: &StrokeEnd,
    end: &StrokeEnd,
) -> Result<usize> {
    let (start_node, end_node) = {
        let w = graph.wall(wall)?;
        (w.start_node, w.end_node)
    };
    let mut splits = 0;
    for (stroke_end, node) in [(start, start_node), (end, end_node)] {
        let split = match stroke_end.face {
            Some(face) => split_at_face(graph, ids, &start.point, &end.point, &face),
            None => split_at_endpoint(graph, ids, wall, node),
        };
        match split {
            Ok(true) => splits += 1,
            Ok(false) => {}
            Err(err) => debug!(%wall, %node, error = %err, "endpoint split skipped"),
        }
    }
    match SplitCrossings::new(wall).execute(graph, ids) {
        Ok(crossings) => splits += crossings.len(),
        Err(err) => debug!(%wall, error = %err, "crossing split skipped"),
    }
    Ok(splits)
}

/// Cuts the face's wall where the new wall's centerline would meet it. The
/// new wall keeps its flush endpoint.
fn split_at_face(
    graph: &mut WallGraph,
    ids: &mut impl IdSource,
    new_start: &Point2,
    new_end: &Point2,
    face: &FaceSnap,
) -> Result<bool> {
    let Some(hit) = extended_centerline_intersection(new_start, new_end, face.wall_id, graph)?
    else {
        return Ok(false);
    };
    SplitWall::new(face.wall_id, hit).execute(graph, ids)?;
    Ok(true)
}

/// Joins an endpoint into the interior of the nearest wall under it.
fn split_at_endpoint(
    graph: &mut WallGraph,
    ids: &mut impl IdSource,
    wall: WallId,
    node: NodeId,
) -> Result<bool> {
    let end = graph.node(node)?;
    let attached: Vec<WallId> = end.connected_walls.iter().copied().collect();
    let hits = FindIntersectingWalls::new(end.position, DEFAULT_INTERSECTION_TOLERANCE)
        .excluding(attached)
        .excluding([wall])
        .execute(graph);
    let Some(hit) = hits.nearest().copied() else {
        return Ok(false);
    };
    SplitWall::new(hit.wall_id, hit.point)
        .with_node(node)
        .execute(graph, ids)?;
    Ok(true)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;
    use tracing_subscriber::EnvFilter;

    use super::*;
    use crate::config::EditorConfig;
    use crate::graph::NODE_MERGE_TOLERANCE;
    use crate::operations::outline::{Junction, JunctionKind};
    use crate::operations::snapping::WallFace;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn plan() -> FloorPlan {
        FloorPlan::new(EditorConfig {
            pixels_per_meter: 1.0,
            ..EditorConfig::default()
        })
    }

    fn draw(
        session: &mut DrawingSession,
        plan: &mut FloorPlan,
        from: Point2,
        to: Point2,
    ) -> Option<WallId> {
        session.start(from, plan);
        session.update(to, plan);
        session.finish(to, plan)
    }

    fn assert_point(actual: Point2, x: f64, y: f64) {
        assert_abs_diff_eq!(actual.x, x, epsilon = 1e-9);
        assert_abs_diff_eq!(actual.y, y, epsilon = 1e-9);
    }

    #[test]
    fn crossing_stroke_splits_both_walls_into_a_cross() {
        init_tracing();
        let mut plan = plan();
        let mut session = DrawingSession::new(10.0);
        let a = draw(&mut session, &mut plan, p(0.0, 0.0), p(100.0, 0.0)).unwrap();
        let b = draw(&mut session, &mut plan, p(50.0, -50.0), p(50.0, 50.0)).unwrap();

        let graph = plan.graph();
        assert_eq!(graph.wall_count(), 4);
        let centre = graph.find_node_near(&p(50.0, 0.0), NODE_MERGE_TOLERANCE).unwrap();
        assert_eq!(graph.node(centre).unwrap().degree(), 4);
        assert_eq!(JunctionKind::classify(4), Some(JunctionKind::Cross));

        // A keeps its ID as the western half and ends at the cross.
        let a1 = graph.wall(a).unwrap();
        assert_eq!(a1.end_node, centre);
        assert!(graph.wall(b).unwrap().touches(centre));

        let polygons = plan.outlines().unwrap();
        let a1_poly = &polygons.iter().find(|poly| poly.wall_id == a).unwrap().polygon;
        assert_point(a1_poly[0], 0.0, 5.0);
        assert_point(a1_poly[1], 45.0, 5.0);
        assert_point(a1_poly[2], 45.0, -5.0);
        assert_point(a1_poly[3], 0.0, -5.0);

        let east = graph
            .walls()
            .find(|w| w.start_node == centre && (w.centerline.end - p(100.0, 0.0)).norm() < 1e-9)
            .unwrap();
        let a2_poly = &polygons.iter().find(|poly| poly.wall_id == east.id).unwrap().polygon;
        assert_point(a2_poly[0], 55.0, 5.0);
        assert_point(a2_poly[3], 55.0, -5.0);
    }

    #[test]
    fn one_undo_removes_the_wall_and_its_splits() {
        let mut plan = plan();
        let mut session = DrawingSession::new(10.0);
        draw(&mut session, &mut plan, p(0.0, 0.0), p(100.0, 0.0)).unwrap();
        let single = plan.snapshot();
        draw(&mut session, &mut plan, p(50.0, -50.0), p(50.0, 50.0)).unwrap();
        assert_eq!(plan.graph().wall_count(), 4);

        assert!(plan.undo());
        assert_eq!(plan.graph(), &single);
        assert_eq!(plan.graph().wall_count(), 1);
    }

    #[test]
    fn strokes_from_wall_ends_share_nodes_with_default_settings() {
        let mut plan = FloorPlan::default();
        let mut session = DrawingSession::for_plan(&plan);
        let corners = [p(0.0, 0.0), p(300.0, 0.0), p(300.0, 200.0), p(0.0, 200.0)];
        let a = draw(&mut session, &mut plan, corners[0], corners[1]).unwrap();
        let b = draw(&mut session, &mut plan, corners[1], corners[2]).unwrap();

        let graph = plan.graph();
        let corner = graph.wall(a).unwrap().end_node;
        assert_eq!(graph.wall(b).unwrap().start_node, corner);
        let junction = Junction::at(graph, corner).unwrap().unwrap();
        assert_eq!(junction.kind, JunctionKind::Corner);

        draw(&mut session, &mut plan, corners[2], corners[3]).unwrap();
        draw(&mut session, &mut plan, corners[3], corners[0]).unwrap();
        let graph = plan.graph();
        assert_eq!(graph.wall_count(), 4);
        assert_eq!(graph.node_count(), 4);
        assert!(graph.nodes().all(|n| n.degree() == 2));
    }

    #[test]
    fn endpoint_on_centerline_forms_a_t_junction() {
        let mut plan = plan();
        let mut session = DrawingSession::new(30.0);
        draw(&mut session, &mut plan, p(0.0, 0.0), p(100.0, 0.0)).unwrap();
        let stem = draw(&mut session, &mut plan, p(50.0, -60.0), p(50.0, 0.0)).unwrap();

        let graph = plan.graph();
        assert_eq!(graph.wall_count(), 3);
        let joint = graph.wall(stem).unwrap().end_node;
        assert_eq!(graph.node(joint).unwrap().degree(), 3);
        assert_point(graph.node(joint).unwrap().position, 50.0, 0.0);
    }

    #[test]
    fn face_snapped_end_splits_target_at_extended_centerline() {
        let mut plan = plan();
        let mut session = DrawingSession::new(10.0);
        let a = draw(&mut session, &mut plan, p(0.0, 0.0), p(100.0, 0.0)).unwrap();

        session.start(p(50.0, -50.0), &plan);
        let (_, preview_end) = session.update(p(50.0, -7.0), &plan).unwrap();
        assert_point(preview_end, 50.0, -5.0);
        let DrawingState::Drawing { current, .. } = session.state() else {
            panic!("session should be drawing");
        };
        assert_eq!(current.face.unwrap().face, WallFace::Right);

        let new = session.finish(p(50.0, -7.0), &mut plan).unwrap();
        let graph = plan.graph();
        assert_eq!(graph.wall_count(), 3);
        assert_point(graph.wall(a).unwrap().centerline.end, 50.0, 0.0);
        let flush = graph.wall(new).unwrap();
        assert_point(flush.centerline.end, 50.0, -5.0);
        assert_eq!(graph.node(flush.end_node).unwrap().degree(), 1);
    }

    #[test]
    fn short_stroke_is_a_silent_no_op() {
        let mut plan = plan();
        let mut session = DrawingSession::new(10.0);
        let entries = plan.history().len();

        assert!(draw(&mut session, &mut plan, p(0.0, 0.0), p(3.0, 0.0)).is_none());
        assert!(!session.is_drawing());
        assert_eq!(plan.graph().wall_count(), 0);
        assert_eq!(plan.history().len(), entries);
    }

    #[test]
    fn plain_wall_is_a_single_history_entry() {
        let mut plan = plan();
        let mut session = DrawingSession::new(10.0);
        draw(&mut session, &mut plan, p(0.0, 0.0), p(100.0, 0.0)).unwrap();
        assert_eq!(plan.history().len(), 2);
    }

    #[test]
    fn angle_snap_rounds_the_stroke() {
        let mut plan = FloorPlan::new(EditorConfig {
            pixels_per_meter: 1.0,
            angle_snap: true,
            ..EditorConfig::default()
        });
        let mut session = DrawingSession::new(10.0);
        let wall = draw(&mut session, &mut plan, p(0.0, 0.0), p(100.0, 6.0)).unwrap();
        let w = plan.graph().wall(wall).unwrap();
        assert_abs_diff_eq!(w.angle, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn cancel_and_deactivate_return_to_idle() {
        let plan = plan();
        let mut session = DrawingSession::new(10.0);
        session.start(p(0.0, 0.0), &plan);
        session.cancel();
        assert_eq!(session.state(), DrawingState::Idle);

        session.start(p(0.0, 0.0), &plan);
        session.deactivate();
        assert!(session.update(p(10.0, 0.0), &plan).is_none());
    }
}
