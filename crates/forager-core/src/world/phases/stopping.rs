use super::super::{RunState, World};
use crate::config::StopRule;
use crate::metrics::{self, StopRecord};
use tracing::info;

impl World {
    /// Whether the configured stop rule fires for the current agent stores.
    pub fn stop_condition_met(&self) -> bool {
        let cap = self.config.max_store;
        match self.config.stop_rule {
            StopRule::AnyAgent => self.agents.iter().any(|a| a.store > cap),
            StopRule::LastProcessed => self.agents.last().is_some_and(|a| a.store > cap),
        }
    }

    /// Transition to `Stopped` and record the store total if the stop rule
    /// fires. Returns true only on the transition itself.
    pub(in crate::world) fn evaluate_stop(&mut self) -> bool {
        if self.state == RunState::Stopped || !self.stop_condition_met() {
            return false;
        }
        let record = StopRecord {
            frame: self.frame_index,
            sweeps: self.sweep_index,
            store_total: metrics::store_total(&self.agents),
        };
        info!(
            frame = record.frame,
            sweeps = record.sweeps,
            store_total = record.store_total,
            "stopping condition reached"
        );
        self.state = RunState::Stopped;
        self.stop_record = Some(record);
        true
    }
}
