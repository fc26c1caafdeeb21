use serde::{Deserialize, Serialize};

use super::id::{NodeId, WallId};
use super::opening::Opening;
use crate::math::angle::angle_between_points;
use crate::math::distance_2d::distance;
use crate::math::{direction, Point2, Vector2};

/// Cached copy of a wall's endpoint positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Centerline {
    pub start: Point2,
    pub end: Point2,
}

impl Centerline {
    /// Length in pixels.
    #[must_use]
    pub fn pixel_length(&self) -> f64 {
        distance(&self.start, &self.end)
    }

    /// Vector from start to end.
    #[must_use]
    pub fn delta(&self) -> Vector2 {
        self.end - self.start
    }
}

/// Optional presentation metadata carried through edits untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hatch: Option<String>,
}

/// A straight wall between two nodes.
///
/// `centerline`, `angle` and `length` are derived from the endpoint positions
/// and refreshed by [`Wall::sync`]; they are never edited directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub id: WallId,
    pub start_node: NodeId,
    pub end_node: NodeId,
    pub centerline: Centerline,
    /// Thickness in metres.
    pub thickness: f64,
    /// Direction from start to end, radians in `[0, 2π)`.
    pub angle: f64,
    /// Length in metres.
    pub length: f64,
    #[serde(default)]
    pub openings: Vec<Opening>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<WallStyle>,
}

impl Wall {
    /// Creates a wall with geometry derived from `start` and `end`.
    #[must_use]
    pub fn new(
        id: WallId,
        start_node: NodeId,
        end_node: NodeId,
        start: Point2,
        end: Point2,
        thickness: f64,
        pixels_per_meter: f64,
    ) -> Self {
        let mut wall = Self {
            id,
            start_node,
            end_node,
            centerline: Centerline { start, end },
            thickness,
            angle: 0.0,
            length: 0.0,
            openings: Vec::new(),
            style: None,
        };
        wall.sync(start, end, pixels_per_meter);
        wall
    }

    /// Recomputes derived geometry from new endpoint positions, re-clamps
    /// openings and drops their cached centres.
    pub fn sync(&mut self, start: Point2, end: Point2, pixels_per_meter: f64) {
        self.reshape(start, end, pixels_per_meter);
        for opening in &mut self.openings {
            opening.invalidate_cache();
        }
    }

    /// Like [`Wall::sync`], but keeps the cached centres of openings that did
    /// not move. Only valid when the start point and direction are unchanged.
    pub fn reshape(&mut self, start: Point2, end: Point2, pixels_per_meter: f64) {
        self.centerline = Centerline { start, end };
        self.angle = angle_between_points(&start, &end);
        self.length = distance(&start, &end) / pixels_per_meter;
        self.normalize_openings();
    }

    /// Clamps every opening into the wall's bounds, dropping the cached
    /// centres of the ones that moved. A no-op on a valid wall.
    pub fn normalize_openings(&mut self) -> bool {
        let length = self.length;
        let mut changed = false;
        for opening in &mut self.openings {
            if opening.clamp_to(length) {
                opening.invalidate_cache();
                changed = true;
            }
        }
        changed
    }

    /// Whether `node` is one of this wall's endpoints.
    #[must_use]
    pub fn touches(&self, node: NodeId) -> bool {
        self.start_node == node || self.end_node == node
    }

    /// The endpoint opposite `node`, if `node` is an endpoint.
    #[must_use]
    pub fn other_end(&self, node: NodeId) -> Option<NodeId> {
        if self.start_node == node {
            Some(self.end_node)
        } else if self.end_node == node {
            Some(self.start_node)
        } else {
            None
        }
    }

    /// Unit direction from start to end.
    #[must_use]
    pub fn direction(&self) -> Vector2 {
        direction(self.angle)
    }

    /// Half the thickness, in pixels.
    #[must_use]
    pub fn half_thickness_px(&self, pixels_per_meter: f64) -> f64 {
        self.thickness * pixels_per_meter / 2.0
    }

    /// Direction pointing away from `node` along the wall, in radians.
    #[must_use]
    pub fn angle_away_from(&self, node: NodeId) -> f64 {
        if self.start_node == node {
            self.angle
        } else {
            crate::math::angle::normalize_angle(self.angle + std::f64::consts::PI)
        }
    }

    /// Point on the centerline `meters` from the start node.
    #[must_use]
    pub fn point_at(&self, meters: f64, pixels_per_meter: f64) -> Point2 {
        self.centerline.start + self.direction() * (meters * pixels_per_meter)
    }

    /// Recomputes the cached plan-view centre of every opening and drops the
    /// 3D centre, which belongs to a downstream generator.
    pub fn refresh_opening_centers(&mut self, pixels_per_meter: f64) {
        let angle = self.angle;
        let centers: Vec<Point2> = self
            .openings
            .iter()
            .map(|o| self.point_at(o.position, pixels_per_meter))
            .collect();
        for (opening, center) in self.openings.iter_mut().zip(centers) {
            opening.center = Some(center);
            opening.angle = Some(angle);
            opening.center_3d = None;
        }
    }
}
