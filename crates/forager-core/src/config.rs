use serde::{Deserialize, Serialize};

/// Which agents are inspected when deciding whether a run should stop.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StopRule {
    /// Stop as soon as any agent's store exceeds `max_store`.
    #[default]
    AnyAgent,
    /// Only inspect the agent processed last in the final sweep of the frame.
    /// Kept for comparison with legacy runs; misses full agents elsewhere in
    /// the order.
    LastProcessed,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Deterministic seed for reproducible simulation runs.
    pub seed: u64,
    /// Number of agents placed at startup.
    pub num_agents: usize,
    /// Sweeps executed per frame before the stopping condition is checked.
    pub iterations_per_frame: usize,
    /// Maximum planar distance at which two agents share their stores.
    pub neighbourhood_radius: f64,
    /// Store level above which the run stops.
    pub max_store: f64,
    /// Number of grid columns (x axis).
    pub grid_width: usize,
    /// Number of grid rows (y axis).
    pub grid_height: usize,
    /// Upper bound on frames executed by a run.
    pub max_frames: usize,
    /// Stopping-condition variant.
    pub stop_rule: StopRule,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            num_agents: 10,
            iterations_per_frame: 10,
            neighbourhood_radius: 20.0,
            max_store: 1000.0,
            grid_width: 100,
            grid_height: 100,
            max_frames: 1000,
            stop_rule: StopRule::AnyAgent,
        }
    }
}

macro_rules! define_sim_config_error {
    (
        $(
            $variant:ident $( { $($field:ident : $type:ty),* } )? => $fmt:literal $(, $arg:expr)*
        );* $(;)?
    ) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum SimConfigError {
            $(
                $variant $( { $($field : $type),* } )?,
            )*
        }

        impl std::fmt::Display for SimConfigError {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        Self::$variant $( { $($field),* } )? => write!(f, $fmt $(, $arg)*),
                    )*
                }
            }
        }
    };
}

define_sim_config_error! {
    InvalidNumAgents => "num_agents must be greater than 0";
    TooManyAgents { max: usize, actual: usize } => "Too many agents: {} > max {}", actual, max;
    InvalidIterationsPerFrame => "iterations_per_frame must be greater than 0";
    InvalidMaxFrames => "max_frames must be greater than 0";
    InvalidNeighbourhoodRadius => "neighbourhood_radius must be non-negative and finite";
    InvalidMaxStore => "max_store must be non-negative and finite";
    InvalidGridDimensions => "grid_width and grid_height must be greater than 0";
    GridTooLarge { max: usize, width: usize, height: usize } => "grid {width}x{height} exceeds supported maximum dimension ({max})";
}

impl std::error::Error for SimConfigError {}

impl SimConfig {
    pub const MAX_GRID_DIM: usize = crate::constants::MAX_GRID_DIM;

    /// Sharing is quadratic in the agent count; keep sweeps tractable.
    pub const MAX_TOTAL_AGENTS: usize = 50_000;

    pub fn validate(&self) -> Result<(), SimConfigError> {
        self.validate_agents()?;
        self.validate_schedule()?;
        self.validate_thresholds()?;
        self.validate_grid()?;
        Ok(())
    }

    fn validate_agents(&self) -> Result<(), SimConfigError> {
        if self.num_agents == 0 {
            return Err(SimConfigError::InvalidNumAgents);
        }
        if self.num_agents > Self::MAX_TOTAL_AGENTS {
            return Err(SimConfigError::TooManyAgents {
                max: Self::MAX_TOTAL_AGENTS,
                actual: self.num_agents,
            });
        }
        Ok(())
    }

    fn validate_schedule(&self) -> Result<(), SimConfigError> {
        if self.iterations_per_frame == 0 {
            return Err(SimConfigError::InvalidIterationsPerFrame);
        }
        if self.max_frames == 0 {
            return Err(SimConfigError::InvalidMaxFrames);
        }
        Ok(())
    }

    fn validate_thresholds(&self) -> Result<(), SimConfigError> {
        if !(self.neighbourhood_radius.is_finite() && self.neighbourhood_radius >= 0.0) {
            return Err(SimConfigError::InvalidNeighbourhoodRadius);
        }
        if !(self.max_store.is_finite() && self.max_store >= 0.0) {
            return Err(SimConfigError::InvalidMaxStore);
        }
        Ok(())
    }

    fn validate_grid(&self) -> Result<(), SimConfigError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(SimConfigError::InvalidGridDimensions);
        }
        if self.grid_width > Self::MAX_GRID_DIM || self.grid_height > Self::MAX_GRID_DIM {
            return Err(SimConfigError::GridTooLarge {
                max: Self::MAX_GRID_DIM,
                width: self.grid_width,
                height: self.grid_height,
            });
        }
        Ok(())
    }
}
