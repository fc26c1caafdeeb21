use std::collections::HashMap;

use tracing::debug;

use super::plan::FloorPlan;
use crate::config::EditorConfig;

/// Floor plans keyed by project ID.
///
/// Plans are created on first access with the store's default settings and
/// never shared between projects.
#[derive(Debug, Clone, Default)]
pub struct ProjectStore {
    plans: HashMap<String, FloorPlan>,
    config: EditorConfig,
}

impl ProjectStore {
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        Self {
            plans: HashMap::new(),
            config,
        }
    }

    /// The plan for `id`, created empty if it does not exist yet.
    pub fn project(&mut self, id: &str) -> &mut FloorPlan {
        let config = &self.config;
        self.plans.entry(id.to_owned()).or_insert_with(|| {
            debug!(project = id, "floor plan created");
            FloorPlan::new(config.clone())
        })
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&FloorPlan> {
        self.plans.get(id)
    }

    /// Registers an existing plan, returning the one it replaces.
    pub fn insert(&mut self, id: impl Into<String>, plan: FloorPlan) -> Option<FloorPlan> {
        self.plans.insert(id.into(), plan)
    }

    pub fn remove(&mut self, id: &str) -> Option<FloorPlan> {
        self.plans.remove(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.plans.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.plans.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}
