use tracing::debug;

use super::history::History;
use crate::config::EditorConfig;
use crate::error::Result;
use crate::graph::{IdSource, NodeId, Opening, OpeningId, SequentialIds, Wall, WallGraph, WallId};
use crate::math::{Point2, Vector2};
use crate::operations::modification::{
    AddOpening, AddWall, MoveNode, RemoveOpening, RemoveWall, SplitOutcome, SplitWall,
};
use crate::operations::outline::{WallOutlines, WallPolygon};
use crate::operations::snapping::{SnapPoint, SnapResult};
use crate::operations::transform::{RotateComponent, TranslateComponent};

/// One project's committed wall graph, its undo history and settings.
///
/// Every edit runs on a deep copy of the graph. The copy is validated and
/// committed only if the operation succeeds; otherwise it is dropped and the
/// edit reports `None`.
#[derive(Debug, Clone)]
pub struct FloorPlan {
    graph: WallGraph,
    history: History,
    ids: SequentialIds,
    config: EditorConfig,
}

impl Default for FloorPlan {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl FloorPlan {
    /// Creates an empty plan drawn at the configured scale.
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        Self::from_graph(WallGraph::with_scale(config.pixels_per_meter), config)
    }

    /// Wraps an existing graph. New IDs continue after the largest one in use.
    #[must_use]
    pub fn from_graph(graph: WallGraph, config: EditorConfig) -> Self {
        Self {
            ids: SequentialIds::after(graph.max_id()),
            history: History::new(graph.clone(), config.history_limit),
            graph,
            config,
        }
    }

    /// Loads a plan from a serialized graph.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the graph fails validation.
    pub fn from_json(json: &str, config: EditorConfig) -> Result<Self> {
        Ok(Self::from_graph(WallGraph::from_json(json)?, config))
    }

    #[must_use]
    pub fn graph(&self) -> &WallGraph {
        &self.graph
    }

    /// Deep copy of the committed graph.
    #[must_use]
    pub fn snapshot(&self) -> WallGraph {
        self.graph.clone()
    }

    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Applies `op` to a copy of the graph and commits it as one history entry.
    ///
    /// Returns `None` when the operation fails or leaves the graph invalid;
    /// the committed graph is then unchanged.
    pub fn edit<T>(
        &mut self,
        label: &str,
        op: impl FnOnce(&mut WallGraph, &mut SequentialIds) -> Result<T>,
    ) -> Option<T> {
        let value = self.apply(label, self.graph.clone(), op)?;
        self.history.push(self.graph.clone());
        Some(value)
    }

    /// Applies `op` to a copy of `base` and shows the result without
    /// recording history. Used for live drag previews.
    pub(crate) fn preview<T>(
        &mut self,
        label: &str,
        base: &WallGraph,
        op: impl FnOnce(&mut WallGraph, &mut SequentialIds) -> Result<T>,
    ) -> Option<T> {
        self.apply(label, base.clone(), op)
    }

    /// Records the current graph as a history entry.
    pub(crate) fn checkpoint(&mut self) {
        self.history.push(self.graph.clone());
    }

    /// Puts back a previously captured graph without touching history.
    pub(crate) fn restore(&mut self, graph: WallGraph) {
        self.graph = graph;
    }

    fn apply<T>(
        &mut self,
        label: &str,
        mut draft: WallGraph,
        op: impl FnOnce(&mut WallGraph, &mut SequentialIds) -> Result<T>,
    ) -> Option<T> {
        let mut ids = self.ids.clone();
        let outcome = op(&mut draft, &mut ids).and_then(|value| {
            draft.validate()?;
            Ok(value)
        });
        match outcome {
            Ok(value) => {
                self.graph = draft;
                self.ids = ids;
                Some(value)
            }
            Err(err) => {
                debug!(edit = label, error = %err, "edit declined");
                None
            }
        }
    }

    /// Steps back one history entry. Returns whether anything changed.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(graph) => {
                self.graph = graph.clone();
                true
            }
            None => false,
        }
    }

    /// Re-applies the last undone entry. Returns whether anything changed.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(graph) => {
                self.graph = graph.clone();
                true
            }
            None => false,
        }
    }

    pub fn add_wall(&mut self, start: Point2, end: Point2, thickness: f64) -> Option<WallId> {
        self.edit("add wall", |graph, ids| {
            AddWall::new(start, end, thickness).execute(graph, ids)
        })
    }

    pub fn remove_wall(&mut self, wall: WallId) -> Option<Wall> {
        self.edit("remove wall", |graph, _| RemoveWall::new(wall).execute(graph))
    }

    pub fn move_node(&mut self, node: NodeId, position: Point2) -> Option<Vec<WallId>> {
        self.edit("move node", |graph, _| {
            MoveNode::new(node, position).execute(graph)
        })
    }

    pub fn split_wall(&mut self, wall: WallId, point: Point2) -> Option<SplitOutcome> {
        self.edit("split wall", |graph, ids| {
            SplitWall::new(wall, point).execute(graph, ids)
        })
    }

    pub fn translate_component(
        &mut self,
        wall: WallId,
        displacement: Vector2,
    ) -> Option<Vec<WallId>> {
        self.edit("translate component", |graph, _| {
            TranslateComponent::new(wall, displacement).execute(graph)
        })
    }

    pub fn rotate_component(&mut self, wall: WallId, angle: f64) -> Option<Vec<WallId>> {
        self.edit("rotate component", |graph, _| {
            RotateComponent::new(wall, angle).execute(graph)
        })
    }

    /// Adds the opening built by `make` from a freshly allocated ID.
    pub fn add_opening(&mut self, make: impl FnOnce(OpeningId) -> Opening) -> Option<OpeningId> {
        self.edit("add opening", |graph, ids| {
            AddOpening::new(make(ids.opening_id())).execute(graph)
        })
    }

    pub fn remove_opening(&mut self, wall: WallId, opening: OpeningId) -> Option<Opening> {
        self.edit("remove opening", |graph, _| {
            RemoveOpening::new(wall, opening).execute(graph)
        })
    }

    /// Render polygons for every wall of the committed graph.
    ///
    /// # Errors
    ///
    /// Returns an error only if the graph holds dangling references.
    pub fn outlines(&self) -> Result<Vec<WallPolygon>> {
        WallOutlines::new().execute(&self.graph)
    }

    /// Snaps a raw cursor point with the configured options.
    #[must_use]
    pub fn snap(&self, raw: Point2) -> SnapResult {
        SnapPoint::new(raw, self.config.snap_options()).execute(&self.graph)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::OperationError;
    use crate::graph::OpeningKind;
    use crate::store::DEFAULT_HISTORY_LIMIT;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn plan() -> FloorPlan {
        FloorPlan::new(EditorConfig {
            pixels_per_meter: 1.0,
            ..EditorConfig::default()
        })
    }

    #[test]
    fn failed_edit_leaves_graph_untouched() {
        let mut plan = plan();
        let wall = plan.add_wall(p(0.0, 0.0), p(100.0, 0.0), 10.0).unwrap();
        let before = plan.snapshot();
        let entries = plan.history().len();

        // Mutates the copy, then fails.
        let result: Option<()> = plan.edit("half applied", |graph, _| {
            graph.wall_mut(wall)?.thickness = 99.0;
            Err(OperationError::Degenerate("late failure".to_owned()).into())
        });

        assert!(result.is_none());
        assert_eq!(plan.graph(), &before);
        assert_eq!(plan.history().len(), entries);
    }

    #[test]
    fn invalid_result_is_declined() {
        let mut plan = plan();
        let wall = plan.add_wall(p(0.0, 0.0), p(100.0, 0.0), 10.0).unwrap();

        let result = plan.edit("orphan", |graph, ids| {
            graph.find_or_create_node(p(500.0, 500.0), ids);
            Ok(())
        });

        assert!(result.is_none());
        assert_eq!(plan.graph().node_count(), 2);
        assert!(plan.graph().wall(wall).is_ok());
    }

    #[test]
    fn declined_split_reports_none() {
        let mut plan = plan();
        let wall = plan.add_wall(p(0.0, 0.0), p(100.0, 0.0), 10.0).unwrap();
        assert!(plan.split_wall(wall, p(2.0, 0.0)).is_none());
        assert_eq!(plan.graph().wall_count(), 1);
    }

    #[test]
    fn snapshot_is_independent_of_later_edits() {
        let mut plan = plan();
        plan.add_wall(p(0.0, 0.0), p(100.0, 0.0), 10.0).unwrap();
        let snapshot = plan.snapshot();
        plan.add_wall(p(100.0, 0.0), p(100.0, 100.0), 10.0).unwrap();

        assert_eq!(snapshot.wall_count(), 1);
        assert_eq!(plan.graph().wall_count(), 2);
    }

    #[test]
    fn undo_redo_restore_committed_states() {
        let mut plan = plan();
        let a = plan.add_wall(p(0.0, 0.0), p(100.0, 0.0), 10.0).unwrap();
        let outcome = plan.split_wall(a, p(40.0, 0.0)).unwrap();
        assert_eq!(plan.graph().wall_count(), 2);

        assert!(plan.undo());
        assert_eq!(plan.graph().wall_count(), 1);
        assert!(plan.undo());
        assert_eq!(plan.graph().wall_count(), 0);
        assert!(!plan.undo());

        assert!(plan.redo());
        assert!(plan.redo());
        assert!(plan.graph().wall(outcome.second).is_ok());
        assert!(!plan.redo());
    }

    #[test]
    fn history_stays_bounded() {
        let mut plan = plan();
        for i in 0..60 {
            let x = f64::from(i) * 20.0;
            plan.add_wall(p(x, 0.0), p(x, 100.0), 10.0).unwrap();
        }
        assert_eq!(plan.history().len(), DEFAULT_HISTORY_LIMIT);
    }

    #[test]
    fn ids_are_not_reused_after_a_decline() {
        let mut plan = plan();
        let a = plan.add_wall(p(0.0, 0.0), p(100.0, 0.0), 10.0).unwrap();
        assert!(plan.add_wall(p(0.0, 0.0), p(100.0, 0.0), 10.0).is_none());
        let b = plan.add_wall(p(0.0, 50.0), p(100.0, 50.0), 10.0).unwrap();
        assert!(b.0 > a.0);
        assert!(plan.graph().validate().is_ok());
    }

    #[test]
    fn opening_gets_a_fresh_id() {
        let mut plan = plan();
        let wall = plan.add_wall(p(0.0, 0.0), p(400.0, 0.0), 10.0).unwrap();
        let id = plan
            .add_opening(|id| Opening::new(id, wall, OpeningKind::Passage, 100.0, 80.0, 200.0, 0.0))
            .unwrap();

        assert!(plan.graph().opening(id).is_some());
        let removed = plan.remove_opening(wall, id).unwrap();
        assert_eq!(removed.id, id);
        assert!(plan.graph().opening(id).is_none());
    }

    #[test]
    fn loads_from_json() {
        let mut source = plan();
        source.add_wall(p(0.0, 0.0), p(100.0, 0.0), 10.0).unwrap();
        let json = source.graph().to_json().unwrap();

        let mut loaded = FloorPlan::from_json(&json, EditorConfig::default()).unwrap();
        assert_eq!(loaded.graph(), source.graph());
        let next = loaded.add_wall(p(0.0, 50.0), p(100.0, 50.0), 10.0).unwrap();
        assert!(next.0 > source.graph().max_id());
    }
}
