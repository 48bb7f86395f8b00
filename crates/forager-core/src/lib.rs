pub mod agent;
pub mod config;
pub mod constants;
pub mod environment;
pub mod grid_io;
pub mod metrics;
pub mod rng;
pub mod world;

pub use agent::Agent;
pub use config::{SimConfig, SimConfigError, StopRule};
pub use environment::{Environment, EnvironmentError};
pub use metrics::{FrameMetrics, RunSummary, StopRecord};
pub use world::{RunState, World, WorldInitError};
