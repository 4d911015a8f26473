//! Oilfield Production Simulation
//!
//! Builds the configured fields and streams well telemetry as JSON lines on
//! stdout. Logs go to stderr, so the output can be piped straight into a
//! loader:
//!
//! # Usage
//! ```bash
//! # 30 days of history at one sample per 30 min
//! ./simulation --days 30 --samples-per-day 48 > history.jsonl
//!
//! # Drive one well through liquid loading
//! ./simulation --scenario well_loading --well CA-MAC-LAG-01-001 --no-anomalies
//!
//! # Realtime: one cycle every 5 s, one simulated hour per real minute
//! ./simulation --mode realtime --interval-secs 5 --acceleration 60
//! ```

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, ValueEnum};
use tracing::info;

use oilfield_sim::{FieldSimulation, ScenarioKind, SimulationConfig, TelemetryRecord};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Back-fill history as fast as possible
    Historical,
    /// One cycle per wall-clock interval
    Realtime,
}

#[derive(Parser, Debug)]
#[command(name = "oilfield-simulation")]
#[command(about = "Synthetic telemetry for Venezuelan oilfield wells")]
#[command(version)]
struct Args {
    /// TOML config file (default: $OILFIELD_SIM_CONFIG, then ./sim_config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run mode
    #[arg(long, value_enum, default_value = "historical")]
    mode: Mode,

    /// Days of history to generate (historical mode)
    #[arg(short, long)]
    days: Option<u32>,

    /// Telemetry samples per simulated day (historical mode)
    #[arg(long)]
    samples_per_day: Option<u32>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Force the anomaly injector on
    #[arg(long, conflicts_with = "no_anomalies")]
    anomalies: bool,

    /// Force the anomaly injector off
    #[arg(long)]
    no_anomalies: bool,

    /// Scripted scenario to bind (e.g. pump_degradation, well_loading)
    #[arg(long)]
    scenario: Option<ScenarioKind>,

    /// Bind the scenario to this well only (default: every applicable well)
    #[arg(long, requires = "scenario")]
    well: Option<String>,

    /// Wall-clock seconds between cycles (realtime mode)
    #[arg(long)]
    interval_secs: Option<u64>,

    /// Simulated time per wall-clock time (realtime mode)
    #[arg(long)]
    acceleration: Option<f64>,

    /// Stop after this many cycles (realtime mode)
    #[arg(long)]
    max_cycles: Option<u64>,

    /// Print the effective config as TOML and exit
    #[arg(long)]
    dump_config: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_filter = if args.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    let config = effective_config(&args)?;
    if args.dump_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let mut sim = FieldSimulation::from_config(&config).context("failed to build fields")?;
    for summary in sim.field_summaries() {
        info!(
            field = %summary.field_name,
            template = %summary.template,
            pads = summary.num_pads,
            wells = summary.total_wells,
            "Field ready"
        );
    }

    if let Some(kind) = args.scenario {
        match &args.well {
            Some(well) => sim.bind_scenario(well, kind)?,
            None => {
                let bound = sim.bind_scenario_all(kind)?;
                if bound == 0 {
                    anyhow::bail!("scenario {kind} applies to none of the simulated wells");
                }
                info!(scenario = %kind, wells = bound, "Scenario bound to all applicable wells");
            }
        }
    }

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let flush_each = args.mode == Mode::Realtime;
    let mut write_record = |record: &TelemetryRecord| -> io::Result<()> {
        serde_json::to_writer(&mut out, record)?;
        out.write_all(b"\n")?;
        if flush_each {
            out.flush()?;
        }
        Ok(())
    };

    let stats = match args.mode {
        Mode::Historical => {
            let s = &config.simulation;
            sim.run_historical(s.days, s.samples_per_day, &mut write_record)?
        }
        Mode::Realtime => {
            let s = &config.simulation;
            sim.set_sim_time(Utc::now());
            // Runs until the cycle limit or until the process is interrupted
            let stop = AtomicBool::new(false);
            sim.run_realtime(
                Duration::from_secs(s.realtime_interval_secs),
                s.time_acceleration,
                args.max_cycles,
                &stop,
                &mut write_record,
            )?
        }
    };
    out.flush()?;

    info!(
        ticks = stats.ticks,
        records = stats.records,
        simulated_days = stats.simulated_days,
        shut_in_records = stats.shut_in_records,
        anomalies_injected = stats.anomalies_injected,
        anomalies_resolved = stats.anomalies_resolved,
        "Simulation complete"
    );
    Ok(())
}

/// Config from file or lookup order, with CLI overrides applied and re-validated
fn effective_config(args: &Args) -> anyhow::Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::load_from_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => SimulationConfig::load(),
    };

    let sim = &mut config.simulation;
    if let Some(seed) = args.seed {
        sim.seed = seed;
    }
    if let Some(days) = args.days {
        sim.days = days;
    }
    if let Some(spd) = args.samples_per_day {
        sim.samples_per_day = spd;
    }
    if let Some(interval) = args.interval_secs {
        sim.realtime_interval_secs = interval;
    }
    if let Some(acceleration) = args.acceleration {
        sim.time_acceleration = acceleration;
    }
    if args.anomalies {
        config.anomalies.enabled = true;
    }
    if args.no_anomalies {
        config.anomalies.enabled = false;
    }

    config.validate()?;
    Ok(config)
}
