//! Casing Heading - slug-flow pressure oscillation in gas-lift annuli

use chrono::{DateTime, Utc};
use serde_json::json;

use super::{summary, Scenario, ScenarioSummary};
use crate::models::{CasingHeading, LiftType, WellModel};

/// Sinusoidal casing pressure swing whose amplitude grows to full size over
/// `onset_days`
#[derive(Debug, Clone)]
pub struct CasingHeadingScenario {
    pub period_min: f64,
    pub amplitude_psi: f64,
    pub severity: f64,
    pub elapsed_days: f64,
    pub onset_days: f64,
}

impl Default for CasingHeadingScenario {
    fn default() -> Self {
        Self {
            period_min: 15.0,
            amplitude_psi: 120.0,
            severity: 0.5,
            elapsed_days: 0.0,
            onset_days: 2.0,
        }
    }
}

impl Scenario for CasingHeadingScenario {
    fn name(&self) -> &'static str {
        "casing_heading"
    }

    fn description(&self) -> &'static str {
        "Pressure oscillations from unstable gas lift"
    }

    fn apply(&mut self, well: &mut WellModel, dt_days: f64, _sim_time: DateTime<Utc>) -> ScenarioSummary {
        self.elapsed_days += dt_days;
        self.severity = (self.elapsed_days / self.onset_days).min(1.0);
        let amplitude = self.amplitude_psi * self.severity;

        if well.lift_type() == LiftType::GasLift {
            well.modifiers_mut().set_casing_heading(CasingHeading {
                period_min: self.period_min,
                amplitude_psi: amplitude,
            });
        }

        summary([
            ("casing_heading_severity", json!(self.severity)),
            ("oscillation_period_min", json!(self.period_min)),
            ("oscillation_amplitude_psi", json!(amplitude)),
        ])
    }

    fn is_applicable(&self, well: &WellModel) -> bool {
        well.lift_type() == LiftType::GasLift
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::well::test_support::{sim_time, well_with};
    use crate::models::{GasLiftEquipment, LiftEquipment};

    #[test]
    fn test_amplitude_grows_over_onset() {
        let mut well = well_with(LiftEquipment::GasLift(GasLiftEquipment::default()), 1);
        let mut scenario = CasingHeadingScenario::default();

        let s = scenario.apply(&mut well, 1.0, sim_time());
        assert_eq!(s["oscillation_amplitude_psi"], json!(60.0));
        assert_eq!(well.modifiers().casing_heading.unwrap().amplitude_psi, 60.0);

        well.reset_modifiers();
        scenario.apply(&mut well, 5.0, sim_time());
        let heading = well.modifiers().casing_heading.unwrap();
        assert_eq!(heading.amplitude_psi, 120.0);
        assert_eq!(heading.period_min, 15.0);
    }

    #[test]
    fn test_heading_shows_in_casing_pressure() {
        let mut steady = well_with(LiftEquipment::GasLift(GasLiftEquipment::default()), 7);
        let mut heading = well_with(LiftEquipment::GasLift(GasLiftEquipment::default()), 7);
        let mut scenario = CasingHeadingScenario {
            elapsed_days: 2.0,
            ..CasingHeadingScenario::default()
        };

        let mut max_gap: f64 = 0.0;
        let mut t = sim_time();
        for _ in 0..60 {
            scenario.apply(&mut heading, 1.0 / 1440.0, t);
            let a = steady.step(1.0 / 1440.0, t).get("chp_psi").unwrap();
            let b = heading.step(1.0 / 1440.0, t).get("chp_psi").unwrap();
            max_gap = max_gap.max((a - b).abs());
            t += chrono::Duration::minutes(1);
        }
        assert!(max_gap > 50.0, "heading produced no casing swing");
    }
}
