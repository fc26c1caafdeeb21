use crate::error::{GraphError, OperationError, Result};
use crate::graph::{Opening, OpeningId, WallGraph, WallId};

/// Adds an opening to its wall, clamping it into the wall's bounds.
#[derive(Debug, Clone)]
pub struct AddOpening {
    opening: Opening,
}

impl AddOpening {
    #[must_use]
    pub fn new(opening: Opening) -> Self {
        Self { opening }
    }

    /// Executes the insertion. Openings are kept ordered by position.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::WallNotFound` if the opening's wall is missing and
    /// `OperationError::InvalidInput` for non-positive dimensions.
    pub fn execute(&self, graph: &mut WallGraph) -> Result<OpeningId> {
        let o = &self.opening;
        if !(o.width > 0.0 && o.height > 0.0 && o.sill_height >= 0.0) {
            return Err(OperationError::InvalidInput(format!(
                "opening {} needs positive width and height",
                o.id
            ))
            .into());
        }
        let scale = graph.pixels_per_meter();
        let wall = graph.wall_mut(o.wall_id)?;
        let mut opening = o.clone();
        opening.clamp_to(wall.length);
        opening.center = Some(wall.point_at(opening.position, scale));
        opening.angle = Some(wall.angle);
        opening.center_3d = None;

        let index = wall
            .openings
            .partition_point(|existing| existing.position <= opening.position);
        wall.openings.insert(index, opening);
        Ok(o.id)
    }
}

/// Removes an opening from a wall.
#[derive(Debug, Clone, Copy)]
pub struct RemoveOpening {
    wall: WallId,
    opening: OpeningId,
}

impl RemoveOpening {
    #[must_use]
    pub fn new(wall: WallId, opening: OpeningId) -> Self {
        Self { wall, opening }
    }

    /// Executes the removal, returning the detached opening.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::WallNotFound` or `GraphError::OpeningNotFound`.
    pub fn execute(&self, graph: &mut WallGraph) -> Result<Opening> {
        let wall = graph.wall_mut(self.wall)?;
        let index = wall
            .openings
            .iter()
            .position(|o| o.id == self.opening)
            .ok_or(GraphError::OpeningNotFound(self.opening))?;
        Ok(wall.openings.remove(index))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::graph::{IdSource, OpeningKind, SequentialIds};
    use crate::math::Point2;
    use crate::operations::modification::AddWall;

    fn graph_with_wall() -> (WallGraph, SequentialIds, WallId) {
        let mut graph = WallGraph::with_scale(10.0);
        let mut ids = SequentialIds::new();
        let w = AddWall::new(Point2::new(0.0, 0.0), Point2::new(50.0, 0.0), 0.2)
            .execute(&mut graph, &mut ids)
            .unwrap();
        (graph, ids, w)
    }

    #[test]
    fn added_opening_is_clamped_and_centred() {
        let (mut graph, mut ids, w) = graph_with_wall();
        let kind = OpeningKind::Window { panes: 2 };
        let o = Opening::new(ids.opening_id(), w, kind, 4.9, 1.0, 1.2, 0.9);
        AddOpening::new(o).execute(&mut graph).unwrap();

        let opening = &graph.wall(w).unwrap().openings[0];
        assert!((opening.position - 4.5).abs() < 1e-12);
        let center = opening.center.unwrap();
        assert!((center.x - 45.0).abs() < 1e-9);
        graph.validate().unwrap();
    }

    #[test]
    fn openings_stay_ordered_by_position() {
        let (mut graph, mut ids, w) = graph_with_wall();
        for pos in [3.0, 1.0, 2.0] {
            let o = Opening::new(ids.opening_id(), w, OpeningKind::Passage, pos, 0.5, 2.0, 0.0);
            AddOpening::new(o).execute(&mut graph).unwrap();
        }
        let positions: Vec<f64> =
            graph.wall(w).unwrap().openings.iter().map(|o| o.position).collect();
        assert_eq!(positions, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn opening_on_missing_wall_is_rejected() {
        let (mut graph, mut ids, _) = graph_with_wall();
        let kind = OpeningKind::Passage;
        let o = Opening::new(ids.opening_id(), WallId(999), kind, 1.0, 0.5, 2.0, 0.0);
        assert!(AddOpening::new(o).execute(&mut graph).is_err());
    }

    #[test]
    fn remove_opening_detaches_it() {
        let (mut graph, mut ids, w) = graph_with_wall();
        let id = ids.opening_id();
        let o = Opening::new(id, w, OpeningKind::Passage, 1.0, 0.5, 2.0, 0.0);
        AddOpening::new(o).execute(&mut graph).unwrap();

        let removed = RemoveOpening::new(w, id).execute(&mut graph).unwrap();
        assert_eq!(removed.id, id);
        assert!(graph.wall(w).unwrap().openings.is_empty());
        assert!(RemoveOpening::new(w, id).execute(&mut graph).is_err());
    }
}
