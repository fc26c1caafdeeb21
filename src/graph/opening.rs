use serde::{Deserialize, Serialize};

use super::id::{OpeningId, WallId};
use crate::math::{Point2, Point3};

/// The closed set of opening kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OpeningKind {
    Door { swing: DoorSwing, hinge: HingeSide },
    Window { panes: u8 },
    Passage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorSwing {
    Inward,
    Outward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HingeSide {
    Left,
    Right,
}

/// Where the opening sits across the wall thickness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpeningAlignment {
    #[default]
    Center,
    Interior,
    Exterior,
}

/// Length units a user may type dimensions in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthUnit {
    Meters,
    Centimeters,
    Millimeters,
    Feet,
    Inches,
}

impl LengthUnit {
    /// Metres per one of this unit.
    #[must_use]
    pub fn meters_per_unit(self) -> f64 {
        match self {
            Self::Meters => 1.0,
            Self::Centimeters => 0.01,
            Self::Millimeters => 0.001,
            Self::Feet => 0.3048,
            Self::Inches => 0.0254,
        }
    }

    #[must_use]
    pub fn to_meters(self, value: f64) -> f64 {
        value * self.meters_per_unit()
    }
}

/// Dimensions exactly as the user entered them.
///
/// Kept alongside the metric values so a round trip through the UI does not
/// accumulate conversion error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnteredDimensions {
    pub width: f64,
    pub height: f64,
    pub sill_height: f64,
    pub unit: LengthUnit,
}

/// A door, window or passage cut into a wall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opening {
    pub id: OpeningId,
    /// Owning wall.
    pub wall_id: WallId,
    pub kind: OpeningKind,
    /// Distance of the opening centre from the wall's start node, in metres.
    pub position: f64,
    pub width: f64,
    pub height: f64,
    pub sill_height: f64,
    #[serde(default)]
    pub alignment: OpeningAlignment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entered: Option<EnteredDimensions>,
    /// Cached plan-view centre; `None` means a consumer must recompute it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<Point2>,
    /// Cached plan-view direction, matching the owning wall's angle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
    /// Cached 3D centre owned by the 3D generator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_3d: Option<Point3>,
}

impl Opening {
    /// Creates an opening with metric dimensions and no cached geometry.
    #[must_use]
    pub fn new(
        id: OpeningId,
        wall_id: WallId,
        kind: OpeningKind,
        position: f64,
        width: f64,
        height: f64,
        sill_height: f64,
    ) -> Self {
        Self {
            id,
            wall_id,
            kind,
            position,
            width,
            height,
            sill_height,
            alignment: OpeningAlignment::Center,
            entered: None,
            center: None,
            angle: None,
            center_3d: None,
        }
    }

    /// Creates an opening from user-entered dimensions, converting them to metres.
    #[must_use]
    pub fn from_entered(
        id: OpeningId,
        wall_id: WallId,
        kind: OpeningKind,
        position: f64,
        entered: EnteredDimensions,
    ) -> Self {
        let unit = entered.unit;
        Self {
            entered: Some(entered),
            ..Self::new(
                id,
                wall_id,
                kind,
                position,
                unit.to_meters(entered.width),
                unit.to_meters(entered.height),
                unit.to_meters(entered.sill_height),
            )
        }
    }

    #[must_use]
    pub fn half_width(&self) -> f64 {
        self.width / 2.0
    }

    /// Clamps `position` so the opening lies within a wall of `wall_length`.
    ///
    /// An opening wider than its wall is centred. Returns `true` when the
    /// position changed.
    #[allow(clippy::float_cmp)]
    pub fn clamp_to(&mut self, wall_length: f64) -> bool {
        let hw = self.half_width();
        let clamped = if wall_length < self.width {
            wall_length / 2.0
        } else {
            self.position.clamp(hw, wall_length - hw)
        };
        if clamped == self.position {
            return false;
        }
        self.position = clamped;
        true
    }

    /// Whether the opening lies within a wall of `wall_length`.
    #[must_use]
    pub fn fits(&self, wall_length: f64, tolerance: f64) -> bool {
        if wall_length < self.width {
            return (self.position - wall_length / 2.0).abs() <= tolerance;
        }
        let hw = self.half_width();
        self.position >= hw - tolerance && self.position <= wall_length - hw + tolerance
    }

    /// Drops every cached centre so downstream consumers recompute them.
    pub fn invalidate_cache(&mut self) {
        self.center = None;
        self.angle = None;
        self.center_3d = None;
    }
}
