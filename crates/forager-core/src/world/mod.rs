use crate::agent::{spawn_agents, Agent};
use crate::config::{SimConfig, SimConfigError};
use crate::environment::Environment;
use crate::metrics::{self, FrameMetrics, RunSummary, StopRecord};
use crate::rng::{create_rng, derive_rng};
use rand_chacha::ChaCha12Rng;
use std::collections::HashSet;
use std::time::Instant;
use std::{error::Error, fmt};
use tracing::debug;

mod phases;
#[cfg(test)]
mod tests;

/// Stream index used to derive the placement RNG from the config seed.
const PLACEMENT_STREAM: u64 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Running,
    /// Terminal. Frames requested after this point are no-ops.
    Stopped,
}

#[derive(Clone, Debug, Default)]
pub struct FrameTimings {
    pub sweeps_us: u64,
    pub total_us: u64,
}

/// Owns the agents, the grid they forage on, and the driver state.
pub struct World {
    agents: Vec<Agent>,
    environment: Environment,
    config: SimConfig,
    rng: ChaCha12Rng,
    state: RunState,
    frame_index: usize,
    sweep_index: usize,
    stop_record: Option<StopRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorldInitError {
    Config(SimConfigError),
    GridSizeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
    AgentCountMismatch {
        expected: usize,
        actual: usize,
    },
    AgentOutOfBounds {
        id: u32,
        x: usize,
        y: usize,
    },
    DuplicateAgentId(u32),
}

impl fmt::Display for WorldInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldInitError::Config(e) => write!(f, "{}", e),
            WorldInitError::GridSizeMismatch { expected, actual } => write!(
                f,
                "environment is {}x{} but config expects {}x{}",
                actual.0, actual.1, expected.0, expected.1
            ),
            WorldInitError::AgentCountMismatch { expected, actual } => write!(
                f,
                "agents.len() ({actual}) must match num_agents ({expected})"
            ),
            WorldInitError::AgentOutOfBounds { id, x, y } => {
                write!(f, "agent {id} at ({x}, {y}) lies outside the grid")
            }
            WorldInitError::DuplicateAgentId(id) => write!(f, "agent id {id} is used twice"),
        }
    }
}

impl From<SimConfigError> for WorldInitError {
    fn from(err: SimConfigError) -> Self {
        WorldInitError::Config(err)
    }
}

impl Error for WorldInitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            WorldInitError::Config(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    InvalidSampleEvery,
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::InvalidSampleEvery => write!(f, "sample_every must be positive"),
        }
    }
}

impl Error for RunError {}

impl World {
    pub fn new(
        agents: Vec<Agent>,
        environment: Environment,
        config: SimConfig,
    ) -> Result<Self, WorldInitError> {
        config.validate()?;
        let expected = (config.grid_width, config.grid_height);
        let actual = (environment.width(), environment.height());
        if expected != actual {
            return Err(WorldInitError::GridSizeMismatch { expected, actual });
        }
        if agents.len() != config.num_agents {
            return Err(WorldInitError::AgentCountMismatch {
                expected: config.num_agents,
                actual: agents.len(),
            });
        }
        let mut ids = HashSet::with_capacity(agents.len());
        for agent in &agents {
            if agent.x >= environment.width() || agent.y >= environment.height() {
                return Err(WorldInitError::AgentOutOfBounds {
                    id: agent.id,
                    x: agent.x,
                    y: agent.y,
                });
            }
            if !ids.insert(agent.id) {
                return Err(WorldInitError::DuplicateAgentId(agent.id));
            }
        }

        let rng = create_rng(config.seed);
        Ok(Self {
            agents,
            environment,
            config,
            rng,
            state: RunState::Running,
            frame_index: 0,
            sweep_index: 0,
            stop_record: None,
        })
    }

    /// Spawn `config.num_agents` agents, taking initial positions from
    /// `coords` (`[x, y]`) while they last and random cells afterwards.
    pub fn populate(
        environment: Environment,
        config: SimConfig,
        coords: &[[usize; 2]],
    ) -> Result<Self, WorldInitError> {
        config.validate()?;
        if coords.len() < config.num_agents {
            debug!(
                supplied = coords.len(),
                num_agents = config.num_agents,
                "placing remaining agents at random cells"
            );
        }
        let mut placement_rng = derive_rng(config.seed, PLACEMENT_STREAM);
        let agents = spawn_agents(
            config.num_agents,
            coords,
            environment.width(),
            environment.height(),
            &mut placement_rng,
        );
        Self::new(agents, environment, config)
    }

    /// Run one frame: `iterations_per_frame` sweeps followed by a single
    /// stopping-condition check. Does nothing once the world has stopped.
    pub fn run_frame(&mut self) -> FrameTimings {
        if self.state == RunState::Stopped {
            return FrameTimings::default();
        }
        let total_start = Instant::now();

        for _ in 0..self.config.iterations_per_frame {
            self.sweep();
        }
        let sweeps_us = total_start.elapsed().as_micros() as u64;

        self.frame_index += 1;
        self.evaluate_stop();
        debug!(
            frame = self.frame_index,
            sweeps = self.sweep_index,
            store_total = self.store_total(),
            environment_total = self.environment.total(),
            "frame complete"
        );

        FrameTimings {
            sweeps_us,
            total_us: total_start.elapsed().as_micros() as u64,
        }
    }

    /// Run frames until the world stops or `max_frames` frames have run,
    /// sampling metrics every `sample_every` frames and on the final frame.
    pub fn run(&mut self, sample_every: usize) -> Result<RunSummary, RunError> {
        if sample_every == 0 {
            return Err(RunError::InvalidSampleEvery);
        }
        let mut samples = Vec::new();
        let mut sweep_time_us = 0u64;
        while self.state == RunState::Running && self.frame_index < self.config.max_frames {
            sweep_time_us += self.run_frame().sweeps_us;
            let last_frame = self.state == RunState::Stopped
                || self.frame_index == self.config.max_frames;
            if self.frame_index % sample_every == 0 || last_frame {
                samples.push(self.frame_metrics());
            }
        }
        Ok(RunSummary {
            schema_version: 1,
            frames_run: self.frame_index,
            sweeps_run: self.sweep_index,
            sample_every,
            stopped: self.state == RunState::Stopped,
            stop_record: self.stop_record.clone(),
            final_store_total: self.store_total(),
            final_environment_total: self.environment.total(),
            sweep_time_us,
            samples,
        })
    }

    pub fn frame_metrics(&self) -> FrameMetrics {
        FrameMetrics::collect(
            self.frame_index,
            self.sweep_index,
            &self.agents,
            &self.environment,
        )
    }

    /// Agents in their current (most recently shuffled) order.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Frames completed so far.
    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// Sweeps completed so far.
    pub fn sweep_index(&self) -> usize {
        self.sweep_index
    }

    pub fn stop_record(&self) -> Option<&StopRecord> {
        self.stop_record.as_ref()
    }

    pub fn store_total(&self) -> f64 {
        metrics::store_total(&self.agents)
    }
}
