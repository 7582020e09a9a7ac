//! Warfront - headless combat runner
//!
//! Plays a battle scenario out tick by tick and prints the after-action
//! report. Without `--scenario`, a built-in swordsmen-versus-archers battle
//! is used.

use clap::Parser;
use std::path::PathBuf;

use warfront::core::config::CombatConfig;
use warfront::core::error::{CombatError, Result};
use warfront::scenario::Scenario;

/// Headless combat runner
#[derive(Parser, Debug)]
#[command(name = "warfront")]
#[command(about = "Resolve a battle scenario and print the combat report")]
struct Args {
    /// Scenario file (TOML)
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Combat configuration overrides (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulated seconds per tick
    #[arg(long, default_value_t = 0.1)]
    dt: f64,

    /// Maximum ticks before giving up
    #[arg(long, default_value_t = 100_000)]
    max_ticks: u64,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,

    /// Log every attack
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "warfront=debug" } else { "warfront=info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => CombatConfig::load(path)?,
        None => CombatConfig::default(),
    };
    config.validate()?;

    let scenario = match &args.scenario {
        Some(path) => Scenario::load(path)?,
        None => Scenario::default(),
    };

    tracing::info!(
        "Running scenario on {:?}: {} vs {} units",
        scenario.terrain,
        scenario.attacker.units.values().sum::<u32>(),
        scenario.defender.units.values().sum::<u32>()
    );

    let result = scenario.run(&config, args.dt, args.max_ticks)?;
    if result.timed_out {
        tracing::warn!("Combat still running after {} ticks", result.ticks);
    }

    match args.format.as_str() {
        "json" => println!("{}", result.report.to_json()?),
        "text" => println!("{}", result.report.summary()),
        other => {
            return Err(CombatError::InvalidConfig(format!(
                "unknown output format '{}', expected json or text",
                other
            )))
        }
    }

    Ok(())
}
