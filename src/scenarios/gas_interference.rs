//! Gas Interference - free gas at the pump intake
//!
//! SRP: incomplete fillage and a gas-locked card shape.
//! ESP: intermittent gas lock with current and flow surging.

use std::f64::consts::PI;

use chrono::{DateTime, Utc};
use serde_json::json;

use super::{summary, Scenario, ScenarioSummary};
use crate::models::{LiftType, WellModel};

/// Surge cycle period (days)
const SURGE_PERIOD_DAYS: f64 = 0.5;

#[derive(Debug, Clone)]
pub struct GasInterferenceScenario {
    pub severity: f64,
    pub max_severity: f64,
    pub onset_days: f64,
    pub elapsed_days: f64,
}

impl Default for GasInterferenceScenario {
    fn default() -> Self {
        Self {
            severity: 0.0,
            max_severity: 0.8,
            onset_days: 14.0,
            elapsed_days: 0.0,
        }
    }
}

impl Scenario for GasInterferenceScenario {
    fn name(&self) -> &'static str {
        "gas_interference"
    }

    fn description(&self) -> &'static str {
        "Free gas entering the pump intake"
    }

    fn apply(&mut self, well: &mut WellModel, dt_days: f64, _sim_time: DateTime<Utc>) -> ScenarioSummary {
        self.elapsed_days += dt_days;
        self.severity = (self.elapsed_days / self.onset_days).min(self.max_severity);

        let s = self.severity;
        let surge = 0.15 * s * (self.elapsed_days * 2.0 * PI / SURGE_PERIOD_DAYS).sin();

        let m = well.modifiers_mut();
        m.hydraulic.fillage *= 1.0 - 0.4 * s;
        m.hydraulic.efficiency *= 1.0 - 0.3 * s;
        m.hydraulic.flow_surge *= 1.0 + surge;

        summary([("gas_interference_severity", json!(s))])
    }

    fn is_applicable(&self, well: &WellModel) -> bool {
        matches!(well.lift_type(), LiftType::Srp | LiftType::Esp)
    }
}
