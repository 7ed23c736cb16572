//! Headless simulation runner.
//!
//! Loads configuration, seeds a world, and drives it for a number of
//! ticks, logging notable events and periodic stats. The rendering layer
//! is a separate host; this binary exists for soak runs, tuning, and
//! reproducing seeds.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use formicarium_core::config::SimConfig;
use formicarium_core::init_logging;
use formicarium_core::world::World;
use formicarium_data::SimEvent;

#[derive(Parser)]
#[command(name = "formicarium")]
#[command(about = "Headless ant colony simulation runner")]
struct Cli {
    /// Path to a TOML config file; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// RNG seed override for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of ticks to run.
    #[arg(long, default_value_t = 20_000)]
    ticks: u64,

    /// Initial ant count override.
    #[arg(long)]
    ants: Option<usize>,

    /// Initial food source count override.
    #[arg(long)]
    food: Option<usize>,

    /// Exploration pheromone decay rate override (per second).
    #[arg(long)]
    decay_rate: Option<f32>,

    /// Simulation speed multiplier override.
    #[arg(long)]
    speed: Option<f64>,

    /// Print the default configuration as TOML and exit.
    #[arg(long)]
    dump_default_config: bool,

    /// Print a JSON snapshot every N ticks (0 disables).
    #[arg(long, default_value_t = 0)]
    snapshot_every: u64,
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    if cli.dump_default_config {
        let toml = toml::to_string_pretty(&SimConfig::default())?;
        println!("{toml}");
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            SimConfig::from_toml(&content)
                .with_context(|| format!("parsing config file {}", path.display()))?
        }
        None => SimConfig::default(),
    };

    if let Some(seed) = cli.seed {
        config.world.seed = Some(seed);
    }
    if let Some(ants) = cli.ants {
        config.world.initial_ants = ants;
    }
    if let Some(food) = cli.food {
        config.world.initial_food_sources = food;
    }
    if let Some(rate) = cli.decay_rate {
        config.pheromone.exploration_decay_rate = rate;
    }
    if let Some(speed) = cli.speed {
        config.world.speed_multiplier = speed;
    }
    config.validate()?;

    let step_ms = config.world.tick_step * 1000.0;
    let mut world = World::new(config)?;
    tracing::info!(seed = world.seed(), ticks = cli.ticks, "Starting run");

    for _ in 0..cli.ticks {
        let events = world.advance(step_ms);
        for event in &events {
            log_event(world.tick, event);
        }
        if cli.snapshot_every > 0 && world.tick % cli.snapshot_every == 0 {
            println!("{}", serde_json::to_string(&world.snapshot())?);
        }
        if world.colony.population() == 0 && world.colony.brood.total() == 0 {
            tracing::warn!(tick = world.tick, "Colony extinct, stopping");
            break;
        }
    }

    let snapshot = world.snapshot();
    tracing::info!(
        tick = snapshot.tick,
        population = snapshot.population,
        storage = snapshot.food_storage,
        generation = snapshot.generation,
        deaths = snapshot.total_deaths,
        "Run complete"
    );
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

fn log_event(tick: u64, event: &SimEvent) {
    match event {
        SimEvent::AttackStarted
        | SimEvent::AttackEnded
        | SimEvent::QueenFlightStarted
        | SimEvent::GenerationAdvanced { .. } => {
            tracing::info!(tick = tick, event = ?event, "World event");
        }
        SimEvent::AntDied { .. } | SimEvent::FoodDepleted { .. } | SimEvent::PuddleFormed { .. } => {
            tracing::debug!(tick = tick, event = ?event, "World event");
        }
        _ => {}
    }
}
