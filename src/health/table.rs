//! Shared table of published health snapshots.

use super::state::{HealthState, HealthSummary};
use crate::registry::Registry;
use dashmap::DashMap;
use std::sync::Arc;

/// Concurrent map of backend id to its latest [`HealthState`].
///
/// Cloning is cheap and every clone sees the same map. The monitor is the only
/// writer; the router, the API and the CLI only read snapshots.
#[derive(Debug, Clone, Default)]
pub struct HealthTable {
    states: Arc<DashMap<String, HealthState>>,
}

impl HealthTable {
    /// Seed every registered backend with an `Unknown` snapshot.
    pub fn for_registry(registry: &Registry) -> Self {
        let states = DashMap::with_capacity(registry.len());
        for backend in registry.list() {
            states.insert(backend.id.clone(), HealthState::default());
        }
        Self {
            states: Arc::new(states),
        }
    }

    /// Latest snapshot for a backend, or `None` if the id was never seeded.
    pub fn current_status(&self, backend_id: &str) -> Option<HealthState> {
        self.states.get(backend_id).map(|entry| entry.value().clone())
    }

    /// Snapshots for all registered backends, in registry order.
    pub fn snapshot(&self, registry: &Registry) -> Vec<(String, HealthState)> {
        registry
            .list()
            .iter()
            .map(|b| {
                let state = self.current_status(&b.id).unwrap_or_default();
                (b.id.clone(), state)
            })
            .collect()
    }

    /// Aggregate counts over the registered backends.
    pub fn summary(&self, registry: &Registry) -> HealthSummary {
        let snapshot = self.snapshot(registry);
        HealthSummary::from_states(snapshot.iter().map(|(_, s)| s))
    }

    /// Replace the snapshot for a backend in one step.
    pub(crate) fn publish(&self, backend_id: &str, state: HealthState) {
        self.states.insert(backend_id.to_string(), state);
    }
}
