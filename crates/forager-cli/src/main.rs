use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use forager_core::config::SimConfig;
use forager_core::grid_io;
use forager_core::world::World;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

const GRID_OUT_FILE: &str = "dataout.csv";
const STORE_LOG_FILE: &str = "data_eaten.csv";
const SUMMARY_FILE: &str = "summary.json";

#[derive(Parser)]
#[command(name = "forager")]
#[command(about = "Random-walk foraging agents on a resource grid")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation over a grid file
    Run {
        /// Comma-separated grid of resource values (one row per line)
        #[arg(long)]
        grid: PathBuf,

        /// Path to config file (JSON); defaults are used when omitted
        #[arg(long)]
        config: Option<PathBuf>,

        /// Initial agent coordinates, one `x,y` pair per line
        #[arg(long)]
        coords: Option<PathBuf>,

        /// Output directory for the final grid, stop log and summary
        #[arg(long, default_value = ".")]
        out: PathBuf,

        /// Record frame metrics every N frames
        #[arg(long, default_value_t = 1)]
        sample_every: usize,
    },
    /// Dump the default configuration to stdout
    DumpDefaultConfig,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}

fn load_config(path: Option<&Path>) -> Result<SimConfig> {
    let Some(path) = path else {
        return Ok(SimConfig::default());
    };
    let file = File::open(path).context("failed to open config file")?;
    let config: SimConfig =
        serde_json::from_reader(BufReader::new(file)).context("failed to parse config")?;
    info!(?path, "loaded config");
    Ok(config)
}

/// Coordinates are optional input: any failure falls back to random placement.
fn load_coordinates(path: Option<&Path>) -> Vec<[usize; 2]> {
    let Some(path) = path else {
        return Vec::new();
    };
    match grid_io::load_coordinates(path) {
        Ok(coords) => {
            info!(count = coords.len(), ?path, "loaded initial coordinates");
            coords
        }
        Err(err) => {
            warn!(%err, "initial coordinates unavailable, placing agents at random");
            Vec::new()
        }
    }
}

fn run(
    grid: &Path,
    config: Option<&Path>,
    coords: Option<&Path>,
    out: &Path,
    sample_every: usize,
) -> Result<()> {
    let start = Instant::now();
    let mut sim_config = load_config(config)?;

    let environment = grid_io::load_grid(grid).context("failed to load environment grid")?;
    if (sim_config.grid_width, sim_config.grid_height)
        != (environment.width(), environment.height())
    {
        info!(
            width = environment.width(),
            height = environment.height(),
            "using grid dimensions from input file"
        );
        sim_config.grid_width = environment.width();
        sim_config.grid_height = environment.height();
    }
    sim_config.validate().context("Config validation error")?;

    let coords = load_coordinates(coords);
    let mut world =
        World::populate(environment, sim_config, &coords).context("failed to initialize world")?;

    info!(
        agents = world.agents().len(),
        max_frames = world.config().max_frames,
        "simulating"
    );
    let summary = world.run(sample_every).context("run failed")?;

    std::fs::create_dir_all(out).context("failed to create output directory")?;
    grid_io::save_grid(&out.join(GRID_OUT_FILE), world.environment())
        .context("failed to write final grid")?;
    if let Some(record) = &summary.stop_record {
        grid_io::append_store_total(&out.join(STORE_LOG_FILE), record.store_total)
            .context("failed to append store total")?;
    }
    let file = File::create(out.join(SUMMARY_FILE)).context("failed to create summary file")?;
    serde_json::to_writer_pretty(file, &summary).context("failed to write summary")?;

    info!(
        frames = summary.frames_run,
        stopped = summary.stopped,
        store_total = summary.final_store_total,
        elapsed_ms = start.elapsed().as_millis() as u64,
        sweep_time_us = summary.sweep_time_us,
        ?out,
        "run complete"
    );
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::DumpDefaultConfig => {
            let config = SimConfig::default();
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Run {
            grid,
            config,
            coords,
            out,
            sample_every,
        } => run(
            &grid,
            config.as_deref(),
            coords.as_deref(),
            &out,
            sample_every,
        )?,
    }
    Ok(())
}
