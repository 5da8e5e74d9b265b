#![deny(clippy::all, clippy::pedantic)]

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use shatter_physics::WorldConfig;
use shatter_runtime::app::{self, RunOptions};
use shatter_runtime::scenario::{self, Scenario, SceneOverrides};

/// Run a breakable-constraint demo scene without a window.
#[derive(Debug, Parser)]
#[command(name = "shatter", version, about)]
struct Args {
    #[arg(long, value_enum, default_value_t = Scenario::Chain)]
    scenario: Scenario,
    #[arg(long, default_value_t = 600)]
    steps: u32,
    /// Seconds per step.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,
    /// Overrides the config's substep count.
    #[arg(long)]
    substeps: Option<u32>,
    /// Overrides the config's solver iterations.
    #[arg(long)]
    iterations: Option<u32>,
    /// JSON `WorldConfig`; missing fields take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// JSON topology overrides with optional `chain`, `plate` and `wall` sections.
    #[arg(long)]
    scene: Option<PathBuf>,
    #[arg(long, default_value_t = 60)]
    report_every: u32,
    #[arg(long, default_value_t = tracing::Level::INFO)]
    log_level: tracing::Level,
}

fn read_json<T: serde::de::DeserializeOwned + Default>(path: Option<&Path>) -> Result<T> {
    let Some(path) = path else {
        return Ok(T::default());
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn load_config(args: &Args) -> Result<WorldConfig> {
    let mut config: WorldConfig = read_json(args.config.as_deref())?;
    if let Some(substeps) = args.substeps {
        config.substeps = substeps;
    }
    if let Some(iterations) = args.iterations {
        config.solver_iterations = iterations;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt().with_max_level(args.log_level).init();

    let config = load_config(&args)?;
    let scene: SceneOverrides = read_json(args.scene.as_deref())?;
    let mut world = scenario::build(args.scenario, config, &scene)?;
    app::run(
        &mut world,
        &RunOptions {
            steps: args.steps,
            dt: args.dt,
            report_every: args.report_every,
        },
    );
    Ok(())
}
