//! antsim CLI - headless colony simulation.
//!
//! - `antsim run` - step a world and print a JSON summary
//! - `antsim check` - validate a config file
//! - `antsim config` - print the default config as YAML

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

use antsim::{SimConfig, Simulation, WorldSnapshot};
use antsim_core::SplitMix64;

#[derive(Parser)]
#[command(name = "antsim")]
#[command(about = "Headless colony simulation", version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the simulation
    Run {
        /// YAML config; defaults apply to missing fields
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of steps
        #[arg(long, default_value_t = 3600)]
        ticks: u64,

        /// Step length in seconds
        #[arg(long, default_value_t = 0.016)]
        dt: f32,

        /// RNG seed
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Log a progress line every N steps (0 disables)
        #[arg(long, default_value_t = 600)]
        report_every: u64,

        /// Write the final world snapshot as JSON
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },

    /// Validate a config file
    Check {
        config: PathBuf,
    },

    /// Print the default config
    Config,
}

#[derive(Serialize)]
struct ColonySummary {
    id: u8,
    food: f32,
    workers: usize,
    soldiers: usize,
    enemies_sighted: u32,
    population_delta: i64,
}

#[derive(Serialize)]
struct RunSummary {
    ticks: u64,
    seed: u64,
    simulated_seconds: f64,
    ground_food: u64,
    pairs: usize,
    spawned: usize,
    retired: usize,
    colonies: Vec<ColonySummary>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let default = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            config,
            ticks,
            dt,
            seed,
            report_every,
            snapshot,
        } => {
            let config = load_config(config.as_deref())?;
            run(config, ticks, dt, seed, report_every, snapshot.as_deref())
        }
        Commands::Check { config } => {
            let config = load_config(Some(&config))?;
            println!(
                "ok: {} colonies, {}x{} world",
                config.colonies.len(),
                config.world.width,
                config.world.height
            );
            Ok(())
        }
        Commands::Config => {
            print!("{}", serde_yaml::to_string(&SimConfig::default())?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<SimConfig> {
    let Some(path) = path else {
        debug!("using default config");
        return Ok(SimConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: SimConfig = serde_yaml::from_str(&text)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid config {}", path.display()))?;
    Ok(config)
}

fn run(
    config: SimConfig,
    ticks: u64,
    dt: f32,
    seed: u64,
    report_every: u64,
    snapshot_path: Option<&Path>,
) -> Result<()> {
    anyhow::ensure!(dt > 0.0, "--dt must be positive, got {dt}");

    let mut rng = SplitMix64::new(seed);
    let mut sim = Simulation::new(config, &mut rng).context("Failed to build simulation")?;
    info!(colonies = sim.colonies().len(), population = sim.population(), seed, "starting");

    let (mut pairs, mut spawned, mut retired) = (0, 0, 0);
    for _ in 0..ticks {
        let report = sim.step(dt, &mut rng);
        pairs += report.pairs;
        spawned += report.spawned;
        retired += report.retired;
        if report_every > 0 && report.tick % report_every == 0 {
            info!(
                tick = report.tick,
                population = sim.population(),
                ground_food = sim.grid().total_food(),
                "progress"
            );
        }
    }

    let world = sim.snapshot();
    if let Some(path) = snapshot_path {
        write_snapshot(path, &world)?;
    }

    let summary = RunSummary {
        ticks,
        seed,
        simulated_seconds: ticks as f64 * f64::from(dt),
        ground_food: world.ground_food,
        pairs,
        spawned,
        retired,
        colonies: world
            .colonies
            .iter()
            .map(|c| ColonySummary {
                id: c.id.0,
                food: c.resource.food,
                workers: c.workers,
                soldiers: c.soldiers,
                enemies_sighted: c.resource.enemies_sighted,
                population_delta: c.population_delta,
            })
            .collect(),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn write_snapshot(path: &Path, world: &WorldSnapshot) -> Result<()> {
    let json = serde_json::to_string(world)?;
    fs::write(path, json).with_context(|| format!("Failed to write snapshot {}", path.display()))?;
    info!(path = %path.display(), "snapshot written");
    Ok(())
}
