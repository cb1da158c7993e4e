//! Dwelling simulator entry point: CLI wiring and scenario-driven runs.

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::info;

use dwelling_sim::config::ScenarioConfig;
use dwelling_sim::io::export::export_csv;
use dwelling_sim::sim::clock::TickPacer;
use dwelling_sim::sim::engine::Engine;
use dwelling_sim::sim::kpi::RunReport;
use dwelling_sim::sim::types::TickRecord;

#[derive(Parser)]
#[command(
    name = "dwelling-sim",
    about = "Solar-powered dwelling controller simulator",
    version
)]
struct Cli {
    /// Load the scenario from a TOML file
    #[arg(long, conflicts_with = "preset")]
    scenario: Option<PathBuf>,

    /// Use a built-in preset (baseline, night_intrusion, low_battery, lockout)
    #[arg(long)]
    preset: Option<String>,

    /// Override the random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the number of ticks to simulate
    #[arg(long)]
    ticks: Option<u32>,

    /// Export tick records to CSV
    #[arg(long)]
    telemetry_out: Option<PathBuf>,

    /// Skip the per-tick lines and print only the run report
    #[arg(long, short = 'q')]
    quiet: bool,

    /// Pace ticks against the wall clock instead of running flat out
    #[arg(long)]
    realtime: bool,

    /// Increase log verbosity (-v for debug)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,

    /// Open the interactive terminal UI
    #[cfg(feature = "tui")]
    #[arg(long)]
    tui: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose > 0 {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

/// Resolves the scenario: `--scenario` file, then `--preset`, then baseline.
fn load_scenario(cli: &Cli) -> Result<(ScenarioConfig, String)> {
    let (mut scenario, name) = if let Some(path) = &cli.scenario {
        let cfg = ScenarioConfig::from_toml_file(path)
            .with_context(|| format!("loading scenario {}", path.display()))?;
        (cfg, path.display().to_string())
    } else if let Some(name) = &cli.preset {
        (ScenarioConfig::from_preset(name)?, name.clone())
    } else {
        (ScenarioConfig::baseline(), "baseline".to_string())
    };

    if let Some(seed) = cli.seed {
        scenario.simulation.seed = seed;
    }
    if let Some(ticks) = cli.ticks {
        scenario.simulation.ticks = ticks;
    }

    let errors = scenario.validate();
    if !errors.is_empty() {
        let list: Vec<String> = errors.iter().map(ToString::to_string).collect();
        bail!("invalid scenario:\n  {}", list.join("\n  "));
    }
    Ok((scenario, name))
}

fn run(cli: Cli) -> Result<()> {
    let (scenario, name) = load_scenario(&cli)?;

    #[cfg(feature = "tui")]
    if cli.tui {
        return dwelling_sim::tui::run(&scenario, &name).context("terminal UI failed");
    }

    info!(
        scenario = %name,
        ticks = scenario.simulation.ticks,
        seed = scenario.simulation.seed,
        "starting simulation"
    );

    let mut engine = Engine::from_config(&scenario);
    let records = if cli.realtime {
        run_realtime(&mut engine, scenario.simulation.tick_ms, cli.quiet)
    } else {
        let records = engine.run();
        if !cli.quiet {
            for r in &records {
                println!("{r}");
            }
        }
        records
    };

    println!("\n{}", RunReport::from_records(&records));

    if let Some(path) = &cli.telemetry_out {
        export_csv(&records, path)
            .with_context(|| format!("writing telemetry to {}", path.display()))?;
        info!(path = %path.display(), rows = records.len(), "telemetry written");
    }
    Ok(())
}

/// Steps the engine once per wall-clock quantum, printing as it goes.
fn run_realtime(engine: &mut Engine, tick_ms: u64, quiet: bool) -> Vec<TickRecord> {
    let total = engine.total_ticks();
    let start = Instant::now();
    let elapsed_ms = || u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    let mut pacer = TickPacer::new(tick_ms, 0);
    let mut records = Vec::with_capacity(total as usize);

    while pacer.tick_count() < total {
        let now = elapsed_ms();
        match pacer.poll(now) {
            Some(t) => {
                let record = engine.step(t);
                if !quiet {
                    println!("{record}");
                }
                records.push(record);
            }
            None => thread::sleep(Duration::from_millis(pacer.remaining_ms(now))),
        }
    }
    records
}
