use serde::{Deserialize, Serialize};

use crate::error::{PersistError, Result};
use crate::operations::snapping::SnapOptions;
use crate::store::DEFAULT_HISTORY_LIMIT;

/// Measurement system selected by the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitSystem {
    Imperial,
    #[default]
    Metric,
}

impl UnitSystem {
    /// Default grid pitch in metres: 6 in imperial, 25 cm metric.
    #[must_use]
    pub fn grid_pitch_meters(self) -> f64 {
        match self {
            Self::Imperial => 6.0 * 0.0254,
            Self::Metric => 0.25,
        }
    }
}

/// Editor settings consumed by the store and the editing sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub unit_system: UnitSystem,
    /// Drawing scale for new plans.
    pub pixels_per_meter: f64,
    /// Snap radius in pixels.
    pub snap_tolerance: f64,
    pub snap_to_nodes: bool,
    pub snap_to_walls: bool,
    pub snap_to_grid: bool,
    pub angle_snap: bool,
    /// Thickness of newly drawn walls, in metres.
    pub wall_thickness: f64,
    pub history_limit: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            unit_system: UnitSystem::Metric,
            pixels_per_meter: 100.0,
            snap_tolerance: 10.0,
            snap_to_nodes: true,
            snap_to_walls: true,
            snap_to_grid: true,
            angle_snap: false,
            wall_thickness: 0.2,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl EditorConfig {
    /// Loads settings from JSON; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `PersistError::Json` on malformed input.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json).map_err(PersistError::from)?)
    }

    #[must_use]
    pub fn snap_options(&self) -> SnapOptions {
        SnapOptions {
            tolerance: self.snap_tolerance,
            nodes: self.snap_to_nodes,
            walls: self.snap_to_walls,
            grid: self.snap_to_grid,
            angle: self.angle_snap,
            unit_system: self.unit_system,
        }
    }
}
