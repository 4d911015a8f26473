//! Pump Degradation - progressive wear of ESP, SRP and PCP pumps
//!
//! Efficiency falls linearly with time (floored at 40 %) while motor current
//! and vibration climb (capped at 1.5× and 3×). ESP and PCP wells also have
//! their stored pump efficiency rewritten so brake horsepower and
//! displacement follow the wear.

use chrono::{DateTime, Utc};
use serde_json::json;

use super::{summary, Scenario, ScenarioSummary};
use crate::models::{LiftEquipment, LiftType, WellModel};

const MIN_EFFICIENCY_FACTOR: f64 = 0.4;
const MAX_CURRENT_FACTOR: f64 = 1.5;
const MAX_VIBRATION_FACTOR: f64 = 3.0;

/// Healthy PCP volumetric efficiency
const PCP_NOMINAL_EFFICIENCY: f64 = 0.70;

#[derive(Debug, Clone)]
pub struct PumpDegradationScenario {
    pub efficiency_loss_pct_per_day: f64,
    pub current_rise_pct_per_day: f64,
    pub vibration_rise_pct_per_day: f64,
    pub elapsed_days: f64,
}

impl Default for PumpDegradationScenario {
    fn default() -> Self {
        Self {
            efficiency_loss_pct_per_day: 0.15,
            current_rise_pct_per_day: 0.10,
            vibration_rise_pct_per_day: 0.20,
            elapsed_days: 0.0,
        }
    }
}

impl PumpDegradationScenario {
    pub fn efficiency_factor(&self) -> f64 {
        (1.0 - self.efficiency_loss_pct_per_day / 100.0 * self.elapsed_days).max(MIN_EFFICIENCY_FACTOR)
    }
}

impl Scenario for PumpDegradationScenario {
    fn name(&self) -> &'static str {
        "pump_degradation"
    }

    fn description(&self) -> &'static str {
        "Gradual pump degradation over weeks/months"
    }

    fn apply(&mut self, well: &mut WellModel, dt_days: f64, _sim_time: DateTime<Utc>) -> ScenarioSummary {
        self.elapsed_days += dt_days;

        let eff = self.efficiency_factor();
        let current = (1.0 + self.current_rise_pct_per_day / 100.0 * self.elapsed_days).min(MAX_CURRENT_FACTOR);
        let vibration = (1.0 + self.vibration_rise_pct_per_day / 100.0 * self.elapsed_days).min(MAX_VIBRATION_FACTOR);

        let m = well.modifiers_mut();
        m.hydraulic.efficiency *= eff;
        m.electrical.current *= current;
        m.mechanical.vibration *= vibration;

        match well.lift_mut() {
            LiftEquipment::Esp(esp) => esp.pump_efficiency = esp.efficiency_at_bep * eff,
            LiftEquipment::Pcp(pcp) => pcp.pump_efficiency = PCP_NOMINAL_EFFICIENCY * eff,
            LiftEquipment::Srp(_) | LiftEquipment::GasLift(_) => {}
        }

        summary([
            ("degradation_severity", json!(1.0 - eff)),
            ("days_degrading", json!(self.elapsed_days)),
        ])
    }

    fn is_applicable(&self, well: &WellModel) -> bool {
        matches!(well.lift_type(), LiftType::Esp | LiftType::Srp | LiftType::Pcp)
    }
}
