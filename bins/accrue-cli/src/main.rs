//! accrue-cli — rebase accrual simulation front end.
//!
//! Loads a JSON simulation spec (horizon, regimes, position, purchase
//! mesh), generates the standard scenario set, and writes plain CSV
//! tables: one rate-schedule table, or one accrual/break-even table per
//! scenario and position.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Deserialize;
use tracing::info;

use accrue_core::types::{Position, RatePath};
use accrue_sim::breakeven::first_at_or_below;
use accrue_sim::runner::{MeshPoint, ScenarioOutcome, run_scenarios};
use accrue_sim::schedule::{Horizon, Regime, Schedule};

/// Rebase accrual and break-even simulator.
#[derive(Parser)]
#[command(name = "accrue-cli")]
#[command(version, about = "Simulate rebase reward accrual and break-even prices")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Log output format ("text" or "json")
    #[arg(long, global = true, default_value = "text")]
    log_format: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the per-scenario rate schedule and write it as one CSV table.
    Schedule(ScheduleArgs),
    /// Run the scenario × purchase-mesh simulation and write per-scenario CSV tables.
    Simulate(SimulateArgs),
}

#[derive(Args)]
struct ScheduleArgs {
    /// Path to the JSON simulation spec.
    spec: PathBuf,

    /// Output CSV path.
    #[arg(short, long, default_value = "rate-schedule.csv")]
    out: PathBuf,

    /// RNG seed for the uniform_random scenario (fresh entropy if omitted).
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args)]
struct SimulateArgs {
    /// Path to the JSON simulation spec.
    spec: PathBuf,

    /// Directory for per-scenario CSV output.
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// RNG seed for the uniform_random scenario (fresh entropy if omitted).
    #[arg(long)]
    seed: Option<u64>,

    /// Report the first rebase whose break-even price is at or below this.
    #[arg(long)]
    target_price: Option<f64>,
}

/// On-disk simulation spec.
#[derive(Deserialize, Clone, Debug)]
struct SimSpec {
    horizon: Horizon,
    regimes: Vec<Regime>,
    initial_balance: f64,
    cost_basis: f64,
    #[serde(default)]
    mesh: Vec<MeshPoint>,
}

impl SimSpec {
    fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read spec file {}", path.display()))?;
        let spec: SimSpec = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse spec file {}", path.display()))?;
        Ok(spec)
    }

    fn schedule(&self) -> Schedule {
        Schedule {
            horizon: self.horizon,
            regimes: self.regimes.clone(),
        }
    }

    fn position(&self) -> Result<Position> {
        Position::new(self.initial_balance, self.cost_basis).context("invalid position in spec")
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, &cli.log_format);

    match cli.command {
        Commands::Schedule(args) => cmd_schedule(args),
        Commands::Simulate(args) => cmd_simulate(args),
    }
}

fn cmd_schedule(args: ScheduleArgs) -> Result<()> {
    let spec = SimSpec::load(&args.spec)?;
    let mut rng = seeded_rng(args.seed);

    let scenarios = spec.schedule().scenarios(&mut rng)?;
    let csv = schedule_csv(&scenarios);
    fs::write(&args.out, csv)
        .with_context(|| format!("failed to write {}", args.out.display()))?;

    info!(
        periods = spec.horizon.periods,
        scenarios = scenarios.len(),
        out = %args.out.display(),
        "rate schedule written"
    );
    Ok(())
}

fn cmd_simulate(args: SimulateArgs) -> Result<()> {
    let spec = SimSpec::load(&args.spec)?;
    let mut rng = seeded_rng(args.seed);

    let base = spec.position()?;
    let scenarios = spec.schedule().scenarios(&mut rng)?;
    let results = run_scenarios(&scenarios, base, &spec.mesh)?;

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("failed to create {}", args.out_dir.display()))?;

    for (name, outcomes) in &results {
        for (i, outcome) in outcomes.iter().enumerate() {
            let file = if i == 0 {
                format!("accrual-{name}.csv")
            } else {
                format!("accrual-{name}-mesh-{i}.csv")
            };
            let out_path = args.out_dir.join(&file);
            fs::write(&out_path, outcome_csv(outcome))
                .with_context(|| format!("failed to write {}", out_path.display()))?;
        }

        // Terminal summary for the base position.
        let base_outcome = &outcomes[0];
        info!(
            scenario = name.as_str(),
            terminal_balance = base_outcome.accrual.terminal().balance,
            terminal_break_even = base_outcome.break_even.terminal().price,
            "scenario complete"
        );

        if let Some(target) = args.target_price {
            match first_at_or_below(&base_outcome.break_even, target) {
                Some(hit) => info!(
                    scenario = name.as_str(),
                    target_price = target,
                    timestamp = %hit.timestamp,
                    price = hit.price,
                    "break-even target reached"
                ),
                None => info!(
                    scenario = name.as_str(),
                    target_price = target,
                    "break-even target not reached within horizon"
                ),
            }
        }
    }

    info!(
        scenarios = results.len(),
        positions = spec.mesh.len() + 1,
        out_dir = %args.out_dir.display(),
        "simulation complete"
    );
    Ok(())
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// One row per rebase: timestamp plus one rate column per scenario.
fn schedule_csv(scenarios: &BTreeMap<String, RatePath>) -> String {
    let mut out = String::from("timestamp");
    for name in scenarios.keys() {
        out.push(',');
        out.push_str(name);
    }
    out.push('\n');

    let Some(first) = scenarios.values().next() else {
        return out;
    };
    for i in 0..first.len() {
        out.push_str(&first.points()[i].timestamp.to_rfc3339());
        for path in scenarios.values() {
            out.push_str(&format!(",{}", path.points()[i].rate));
        }
        out.push('\n');
    }
    out
}

/// One row per rebase: timestamp, accrued balance, break-even price.
fn outcome_csv(outcome: &ScenarioOutcome) -> String {
    let mut out = String::from("timestamp,balance,break_even_price\n");
    for (a, b) in outcome
        .accrual
        .points()
        .iter()
        .zip(outcome.break_even.points())
    {
        out.push_str(&format!(
            "{},{},{}\n",
            a.timestamp.to_rfc3339(),
            a.balance,
            b.price
        ));
    }
    out
}

/// Initialize tracing subscriber with the given log level and output format.
///
/// Pass `format = "json"` for structured JSON output. Any other value
/// defaults to human-readable text.
fn init_logging(level_str: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_str));

    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_level(true))
            .init();
    }
}
