use crate::agent::Agent;
use crate::environment::Environment;
use serde::{Deserialize, Serialize};

/// Aggregate state sampled at the end of a frame.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct FrameMetrics {
    pub frame: usize,
    pub sweeps: usize,
    pub store_total: f64,
    pub store_mean: f64,
    pub store_max: f64,
    pub environment_total: f64,
}

impl FrameMetrics {
    pub fn collect(frame: usize, sweeps: usize, agents: &[Agent], environment: &Environment) -> Self {
        let store_total = store_total(agents);
        let store_mean = if agents.is_empty() {
            0.0
        } else {
            store_total / agents.len() as f64
        };
        let store_max = agents.iter().map(|a| a.store).fold(0.0, f64::max);
        Self {
            frame,
            sweeps,
            store_total,
            store_mean,
            store_max,
            environment_total: environment.total(),
        }
    }
}

/// Emitted once when a run transitions to stopped.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StopRecord {
    /// Frame (counted from 1) at whose end the stop fired.
    pub frame: usize,
    /// Sweeps completed when the stop fired.
    pub sweeps: usize,
    /// Sum of every agent's store at that moment.
    pub store_total: f64,
}

fn default_schema_version() -> u32 {
    1
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub frames_run: usize,
    pub sweeps_run: usize,
    pub sample_every: usize,
    pub stopped: bool,
    #[serde(default)]
    pub stop_record: Option<StopRecord>,
    pub final_store_total: f64,
    pub final_environment_total: f64,
    /// Wall-clock time spent in sweeps by this call to `World::run`.
    #[serde(default)]
    pub sweep_time_us: u64,
    pub samples: Vec<FrameMetrics>,
}

pub fn store_total(agents: &[Agent]) -> f64 {
    agents.iter().map(|a| a.store).sum()
}
