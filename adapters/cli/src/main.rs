#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that seeds a population into a configured locator.

mod session;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use habitat_core::{seeded_rng, LocatorConfig};
use habitat_locator_random::RandomLocator;
use habitat_locator_torus::TorusLocator;
use habitat_system_initializer::{emas_initializer, Bounds};
use tracing::info;

use crate::session::Session;

/// Command-line arguments accepted by the habitat binary.
#[derive(Debug, Parser)]
#[command(name = "habitat", about = "Seeds agents into a spatial locator")]
struct CliArgs {
    /// TOML file selecting the locator strategy; defaults to a 10x10 torus.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of agents to create.
    #[arg(long, default_value_t = 100)]
    agents: usize,
    /// Starting energy assigned to every agent.
    #[arg(long, default_value_t = 10.0)]
    energy: f64,
    /// Interaction rounds to run once the agents are placed.
    #[arg(long, default_value_t = 1)]
    rounds: usize,
}

/// Entry point for the habitat command-line interface.
fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let args = CliArgs::parse();
    let config = load_config(args.config.as_deref())?;
    info!(?config, agents = args.agents, "assembling simulation");

    let mut rng = seeded_rng(config.seed());
    let population = emas_initializer(args.energy, args.agents, Bounds::default(), &mut rng);

    let report = match config {
        LocatorConfig::Torus {
            width,
            height,
            radius,
            seed,
        } => {
            let locator = TorusLocator::seeded(width, height, radius, seed)
                .context("invalid torus configuration")?;
            Session::new(locator, &population).run(args.rounds)
        }
        LocatorConfig::Random { seed } => {
            Session::new(RandomLocator::seeded(seed), &population).run(args.rounds)
        }
    };

    println!("{report}");
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<LocatorConfig> {
    let Some(path) = path else {
        return Ok(LocatorConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read locator config {}", path.display()))?;
    toml::from_str(&raw)
        .with_context(|| format!("failed to parse locator config {}", path.display()))
}
