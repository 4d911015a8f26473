//! Field simulation driver
//!
//! `FieldSimulation` advances every well of every field in lock-step. For
//! each well and tick the order is fixed: anomaly injector, bound scenarios,
//! then `WellModel::step`. Wells are visited in field, pad and well order,
//! so a seeded run reproduces record for record.
//!
//! Two run modes mirror how the telemetry is consumed downstream:
//!
//! - **historical**: back-fill `days × samples_per_day` ticks as fast as possible
//! - **realtime**: one tick per wall-clock interval, with optional time acceleration

use std::collections::BTreeMap;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration as StdDuration, Instant};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::anomaly::{AnomalyInjector, AnomalyType};
use crate::config::SimulationConfig;
use crate::models::{FieldModel, FieldSummary, LiftType, ModelError, Telemetry, WellModel, WellStatus};
use crate::scenarios::{Scenario, ScenarioKind, ScenarioSummary};

/// Realtime cycles between progress log lines
const REALTIME_LOG_EVERY: u64 = 10;

// ============================================================================
// Errors and records
// ============================================================================

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("time step must be positive and finite (got {0} days)")]
    InvalidTimeStep(f64),

    #[error("unknown well '{0}'")]
    UnknownWell(String),

    #[error("scenario {scenario} does not apply to {well} ({lift_type} well)")]
    InapplicableScenario {
        scenario: ScenarioKind,
        well: String,
        lift_type: LiftType,
    },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("telemetry sink failed: {0}")]
    Sink(#[from] io::Error),
}

/// One well's telemetry for one tick, tagged for transport
#[derive(Debug, Clone, Serialize)]
pub struct TelemetryRecord {
    /// Sample time (ms since the Unix epoch)
    pub ts: i64,
    pub field: String,
    pub pad: String,
    pub well: String,
    pub device_type: &'static str,
    /// Status the tick ran under
    pub status: WellStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub anomalies: Vec<AnomalyType>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub scenarios: BTreeMap<&'static str, ScenarioSummary>,
    pub values: Telemetry,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimulationStats {
    pub ticks: u64,
    pub records: u64,
    pub simulated_days: f64,
    /// Records produced while the well was not producing
    pub shut_in_records: u64,
    pub anomalies_injected: u64,
    pub anomalies_resolved: u64,
    pub active_anomalies: usize,
}

// ============================================================================
// Driver
// ============================================================================

pub struct FieldSimulation {
    fields: Vec<FieldModel>,
    injector: Option<AnomalyInjector>,
    scenarios: BTreeMap<String, Vec<Box<dyn Scenario>>>,
    sim_time: DateTime<Utc>,
    scenario_seed: u64,
    scenarios_bound: u64,
    stats: SimulationStats,
}

impl FieldSimulation {
    pub fn new(fields: Vec<FieldModel>, start_time: DateTime<Utc>) -> Self {
        Self {
            fields,
            injector: None,
            scenarios: BTreeMap::new(),
            sim_time: start_time,
            scenario_seed: 0,
            scenarios_bound: 0,
            stats: SimulationStats::default(),
        }
    }

    /// Build every field and, when enabled, an injector seeded with the
    /// top-level seed
    pub fn from_config(config: &SimulationConfig) -> Result<Self, SimulationError> {
        let fields = config.build_fields()?;
        let seed = config.simulation.seed;

        let mut sim = Self::new(fields, config.simulation.resolved_start_time());
        sim.scenario_seed = seed;
        if config.anomalies.enabled {
            sim.injector = Some(AnomalyInjector::from_settings(&config.anomalies, seed));
        }
        Ok(sim)
    }

    pub fn with_injector(mut self, injector: AnomalyInjector) -> Self {
        self.injector = Some(injector);
        self
    }

    pub fn disable_anomalies(&mut self) {
        self.injector = None;
    }

    pub fn set_sim_time(&mut self, sim_time: DateTime<Utc>) {
        self.sim_time = sim_time;
    }

    pub fn sim_time(&self) -> DateTime<Utc> {
        self.sim_time
    }

    pub fn fields(&self) -> &[FieldModel] {
        &self.fields
    }

    pub fn injector(&self) -> Option<&AnomalyInjector> {
        self.injector.as_ref()
    }

    pub fn injector_mut(&mut self) -> Option<&mut AnomalyInjector> {
        self.injector.as_mut()
    }

    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    pub fn well_count(&self) -> usize {
        self.fields.iter().map(FieldModel::well_count).sum()
    }

    pub fn wells(&self) -> impl Iterator<Item = &WellModel> {
        self.fields.iter().flat_map(FieldModel::wells)
    }

    pub fn well(&self, name: &str) -> Option<&WellModel> {
        self.wells().find(|w| w.name() == name)
    }

    pub fn well_mut(&mut self, name: &str) -> Option<&mut WellModel> {
        self.fields
            .iter_mut()
            .flat_map(FieldModel::wells_mut)
            .find(|w| w.name() == name)
    }

    pub fn field_summaries(&self) -> Vec<FieldSummary> {
        self.fields.iter().map(FieldModel::summary).collect()
    }

    pub fn bound_scenarios(&self, well_name: &str) -> Vec<&'static str> {
        self.scenarios
            .get(well_name)
            .map(|bound| bound.iter().map(|s| s.name()).collect())
            .unwrap_or_default()
    }

    /// Attach a fresh `kind` scenario to one well
    ///
    /// Binding a scenario that is already bound to the well is a no-op.
    pub fn bind_scenario(&mut self, well_name: &str, kind: ScenarioKind) -> Result<(), SimulationError> {
        let seed = self.scenario_seed.wrapping_add(self.scenarios_bound + 1);
        let scenario = kind.build(seed);

        let well = self
            .well(well_name)
            .ok_or_else(|| SimulationError::UnknownWell(well_name.to_string()))?;
        if !scenario.is_applicable(well) {
            return Err(SimulationError::InapplicableScenario {
                scenario: kind,
                well: well_name.to_string(),
                lift_type: well.lift_type(),
            });
        }

        let bound = self.scenarios.entry(well_name.to_string()).or_default();
        if bound.iter().any(|s| s.name() == kind.as_str()) {
            debug!(well = %well_name, scenario = %kind, "Scenario already bound");
            return Ok(());
        }
        bound.push(scenario);
        self.scenarios_bound += 1;
        info!(well = %well_name, scenario = %kind, "Scenario bound");
        Ok(())
    }

    /// Attach `kind` to every well it applies to; returns how many were bound
    pub fn bind_scenario_all(&mut self, kind: ScenarioKind) -> Result<usize, SimulationError> {
        let probe = kind.build(self.scenario_seed);
        let targets: Vec<String> = self
            .wells()
            .filter(|w| probe.is_applicable(w))
            .map(|w| w.name().to_string())
            .collect();
        for name in &targets {
            self.bind_scenario(name, kind)?;
        }
        Ok(targets.len())
    }

    /// Detach every scenario from a well and hand water cut back to the
    /// reservoir model
    pub fn clear_scenarios(&mut self, well_name: &str) -> usize {
        let removed = self.scenarios.remove(well_name).map_or(0, |bound| bound.len());
        if let Some(well) = self.well_mut(well_name) {
            well.set_water_cut_scripted(false);
        }
        removed
    }

    /// Advance every well by `dt_days` and return one record per well
    pub fn tick(&mut self, dt_days: f64) -> Result<Vec<TelemetryRecord>, SimulationError> {
        if !(dt_days.is_finite() && dt_days > 0.0) {
            return Err(SimulationError::InvalidTimeStep(dt_days));
        }

        let now = self.sim_time;
        let ts = now.timestamp_millis();
        let Self {
            fields,
            injector,
            scenarios,
            stats,
            ..
        } = self;

        let mut records = Vec::new();
        for field in fields.iter_mut() {
            let field_name = field.name().to_string();
            for pad in field.pads_mut() {
                let pad_name = pad.name().to_string();
                for well in pad.wells_mut() {
                    if let Some(injector) = injector.as_mut() {
                        injector.maybe_inject(well, dt_days);
                    }

                    let mut summaries = BTreeMap::new();
                    if let Some(bound) = scenarios.get_mut(well.name()) {
                        for scenario in bound.iter_mut() {
                            let summary = scenario.apply(well, dt_days, now);
                            if !summary.is_empty() {
                                summaries.insert(scenario.name(), summary);
                            }
                        }
                    }

                    let status = well.status();
                    let values = well.step(dt_days, now);
                    if status != WellStatus::Producing {
                        stats.shut_in_records += 1;
                    }
                    records.push(TelemetryRecord {
                        ts,
                        field: field_name.clone(),
                        pad: pad_name.clone(),
                        well: well.name().to_string(),
                        device_type: well.device_type(),
                        status,
                        anomalies: well.active_anomalies().to_vec(),
                        scenarios: summaries,
                        values,
                    });
                }
            }
        }

        self.sim_time = now + duration_from_days(dt_days);
        self.stats.ticks += 1;
        self.stats.records += records.len() as u64;
        self.stats.simulated_days += dt_days;
        if let Some(injector) = &self.injector {
            self.stats.anomalies_injected = injector.injected_total();
            self.stats.anomalies_resolved = injector.resolved_total();
            self.stats.active_anomalies = injector.active_count();
        }
        Ok(records)
    }

    /// Back-fill `days` of history at `samples_per_day`, streaming every
    /// record to `sink`
    pub fn run_historical<F>(
        &mut self,
        days: u32,
        samples_per_day: u32,
        mut sink: F,
    ) -> Result<SimulationStats, SimulationError>
    where
        F: FnMut(&TelemetryRecord) -> io::Result<()>,
    {
        let dt_days = 1.0 / f64::from(samples_per_day);
        if !dt_days.is_finite() {
            return Err(SimulationError::InvalidTimeStep(dt_days));
        }
        let total_steps = u64::from(days) * u64::from(samples_per_day);
        info!(
            days,
            samples_per_day,
            total_steps,
            wells = self.well_count(),
            start = %self.sim_time,
            "Starting historical generation"
        );

        let mut last_logged_pct = 0;
        for step in 1..=total_steps {
            for record in self.tick(dt_days)? {
                sink(&record)?;
            }

            let pct = step * 100 / total_steps / 10 * 10;
            if pct > last_logged_pct {
                last_logged_pct = pct;
                info!(
                    progress_pct = pct,
                    sim_time = %self.sim_time,
                    records = self.stats.records,
                    active_anomalies = self.stats.active_anomalies,
                    "Historical progress"
                );
            }
        }

        info!(
            ticks = self.stats.ticks,
            records = self.stats.records,
            anomalies_injected = self.stats.anomalies_injected,
            "Historical generation complete"
        );
        Ok(self.stats.clone())
    }

    /// Tick once per `interval` of wall-clock time until `stop` is raised or
    /// `max_cycles` ticks have run
    ///
    /// Each tick advances simulated time by `interval × acceleration`.
    pub fn run_realtime<F>(
        &mut self,
        interval: StdDuration,
        acceleration: f64,
        max_cycles: Option<u64>,
        stop: &AtomicBool,
        mut sink: F,
    ) -> Result<SimulationStats, SimulationError>
    where
        F: FnMut(&TelemetryRecord) -> io::Result<()>,
    {
        let dt_days = interval.as_secs_f64() * acceleration / 86_400.0;
        if !(dt_days.is_finite() && dt_days > 0.0) {
            return Err(SimulationError::InvalidTimeStep(dt_days));
        }
        info!(
            interval_ms = interval.as_millis(),
            acceleration,
            dt_days,
            "Starting realtime simulation"
        );

        let mut cycle = 0u64;
        while !stop.load(Ordering::Relaxed) && max_cycles.map_or(true, |max| cycle < max) {
            let cycle_start = Instant::now();

            for record in self.tick(dt_days)? {
                sink(&record)?;
            }
            cycle += 1;

            if cycle % REALTIME_LOG_EVERY == 0 {
                info!(cycle, sim_time = %self.sim_time, records = self.stats.records, "Realtime cycle");
            }

            let elapsed = cycle_start.elapsed();
            if elapsed < interval && max_cycles.map_or(true, |max| cycle < max) {
                std::thread::sleep(interval - elapsed);
            }
        }

        info!(cycles = cycle, records = self.stats.records, "Realtime simulation stopped");
        Ok(self.stats.clone())
    }
}

#[allow(clippy::cast_possible_truncation)]
fn duration_from_days(days: f64) -> Duration {
    Duration::milliseconds((days * 86_400_000.0).round() as i64)
}
