//! Well Loading - liquid accumulating in the tubing until the well dies
//!
//! Production and wellhead pressure fall as severity ramps over
//! `onset_days`. Past severity 0.95 the well dies and is shut in; after
//! `recovery_time_days` it restarts with its loading history cut to 30 %.

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{info, warn};

use super::{summary, Scenario, ScenarioSummary};
use crate::models::{LiftType, WellModel, WellStatus};

/// Severity at which the well can no longer lift its liquid column
const DEATH_SEVERITY: f64 = 0.95;

/// Share of severity and elapsed time kept after a restart
const RESTART_RETENTION: f64 = 0.3;

#[derive(Debug, Clone)]
pub struct WellLoadingScenario {
    pub onset_days: f64,
    pub elapsed_days: f64,
    pub severity: f64,
    pub well_died: bool,
    pub recovery_time_days: f64,
    shut_in_elapsed_days: f64,
}

impl Default for WellLoadingScenario {
    fn default() -> Self {
        Self {
            onset_days: 30.0,
            elapsed_days: 0.0,
            severity: 0.0,
            well_died: false,
            recovery_time_days: 3.0,
            shut_in_elapsed_days: 0.0,
        }
    }
}

impl Scenario for WellLoadingScenario {
    fn name(&self) -> &'static str {
        "well_loading"
    }

    fn description(&self) -> &'static str {
        "Well loading up with liquids, production declining"
    }

    fn apply(&mut self, well: &mut WellModel, dt_days: f64, _sim_time: DateTime<Utc>) -> ScenarioSummary {
        self.elapsed_days += dt_days;

        if self.well_died {
            self.shut_in_elapsed_days += dt_days;
            if self.shut_in_elapsed_days >= self.recovery_time_days {
                self.well_died = false;
                self.severity *= RESTART_RETENTION;
                self.elapsed_days *= RESTART_RETENTION;
                well.set_status(WellStatus::Producing);
                info!(well = %well.name(), severity = self.severity, "Restart after liquid loading");
                return summary([("well_loading_event", json!("restart_attempt"))]);
            }
            well.set_status(WellStatus::ShutIn);
            return summary([("well_loading_event", json!("shut_in_recovery"))]);
        }

        self.severity = (self.elapsed_days / self.onset_days).min(1.0);
        let production_factor = (1.0 - 0.8 * self.severity).max(0.05);
        let thp_factor = (1.0 - 0.6 * self.severity).max(0.2);

        let m = well.modifiers_mut();
        m.hydraulic.efficiency *= production_factor;
        m.hydraulic.thp_factor *= thp_factor;

        if self.severity > DEATH_SEVERITY {
            self.well_died = true;
            self.shut_in_elapsed_days = 0.0;
            well.set_status(WellStatus::ShutIn);
            warn!(well = %well.name(), severity = self.severity, "Well died from liquid loading");
            return summary([
                ("well_loading_event", json!("well_died")),
                ("loading_severity", json!(self.severity)),
            ]);
        }

        summary([
            ("loading_severity", json!(self.severity)),
            ("production_factor", json!(production_factor)),
        ])
    }

    fn is_applicable(&self, well: &WellModel) -> bool {
        matches!(well.lift_type(), LiftType::GasLift | LiftType::Esp)
    }
}
