//! Electrical Issues - unstable grid supply on artificially lifted wells
//!
//! Each tick either continues an outage in progress, starts a new outage
//! (2-19 ticks long), or with some probability sags the supply voltage. A
//! sag raises motor current by half the voltage drop. When power returns
//! the well goes through `starting` before it produces again.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use tracing::{debug, info};

use super::{summary, Scenario, ScenarioSummary};
use crate::models::{LiftType, WellModel, WellStatus};
use crate::noise::uniform;

/// Smallest voltage sag (fraction)
const MIN_SAG: f64 = 0.05;

pub struct ElectricalIssuesScenario {
    pub outage_prob_per_step: f64,
    pub sag_prob_per_step: f64,
    /// Largest voltage sag (fraction)
    pub sag_magnitude: f64,
    pub elapsed_days: f64,
    outage_remaining_steps: Option<u32>,
    rng: StdRng,
}

impl ElectricalIssuesScenario {
    pub fn new(seed: u64) -> Self {
        Self {
            outage_prob_per_step: 0.05,
            sag_prob_per_step: 0.15,
            sag_magnitude: 0.15,
            elapsed_days: 0.0,
            outage_remaining_steps: None,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn in_outage(&self) -> bool {
        self.outage_remaining_steps.is_some()
    }
}

impl Scenario for ElectricalIssuesScenario {
    fn name(&self) -> &'static str {
        "electrical_issues"
    }

    fn description(&self) -> &'static str {
        "Electrical power instability (Venezuela)"
    }

    fn apply(&mut self, well: &mut WellModel, dt_days: f64, _sim_time: DateTime<Utc>) -> ScenarioSummary {
        self.elapsed_days += dt_days;

        if let Some(remaining) = self.outage_remaining_steps {
            let remaining = remaining.saturating_sub(1);
            if remaining == 0 {
                self.outage_remaining_steps = None;
                well.set_status(WellStatus::Starting);
                info!(well = %well.name(), "Power restored");
                return summary([("electrical_event", json!("power_restored"))]);
            }
            self.outage_remaining_steps = Some(remaining);
            well.set_status(WellStatus::ShutIn);
            return summary([("electrical_event", json!("outage"))]);
        }

        if self.rng.gen::<f64>() < self.outage_prob_per_step {
            let steps: u32 = self.rng.gen_range(2..20);
            self.outage_remaining_steps = Some(steps);
            well.set_status(WellStatus::ShutIn);
            info!(well = %well.name(), steps, "Power outage");
            return summary([
                ("electrical_event", json!("outage_start")),
                ("outage_duration_steps", json!(steps)),
            ]);
        }

        if self.rng.gen::<f64>() < self.sag_prob_per_step {
            let sag = uniform(&mut self.rng, MIN_SAG, self.sag_magnitude);
            let m = well.modifiers_mut();
            m.electrical.voltage *= 1.0 - sag;
            m.electrical.current *= 1.0 + sag * 0.5;
            debug!(well = %well.name(), voltage_drop_pct = sag * 100.0, "Voltage sag");
            return summary([
                ("electrical_event", json!("voltage_sag")),
                ("voltage_drop_pct", json!(sag * 100.0)),
            ]);
        }

        ScenarioSummary::new()
    }

    fn is_applicable(&self, well: &WellModel) -> bool {
        matches!(well.lift_type(), LiftType::Esp | LiftType::Srp | LiftType::Pcp)
    }
}
