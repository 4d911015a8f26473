//! Water Breakthrough - water cut climbs toward 90 % over about three weeks
//!
//! Progress follows the smoothstep curve `p²(3 - 2p)` from the water cut
//! observed on the first tick to the target. While bound, the scenario owns
//! the reservoir water cut and the anomaly injector leaves it alone.

use chrono::{DateTime, Utc};
use serde_json::json;

use super::{summary, Scenario, ScenarioSummary};
use crate::models::reservoir::MAX_WATER_CUT;
use crate::models::WellModel;

#[derive(Debug, Clone)]
pub struct WaterBreakthroughScenario {
    pub target_water_cut: f64,
    pub onset_days: f64,
    pub elapsed_days: f64,
    initial_water_cut: Option<f64>,
}

impl Default for WaterBreakthroughScenario {
    fn default() -> Self {
        Self {
            target_water_cut: 0.90,
            onset_days: 21.0,
            elapsed_days: 0.0,
            initial_water_cut: None,
        }
    }
}

/// Smoothstep on `[0, 1]`
pub fn s_curve(progress: f64) -> f64 {
    let p = progress.clamp(0.0, 1.0);
    p * p * (3.0 - 2.0 * p)
}

impl Scenario for WaterBreakthroughScenario {
    fn name(&self) -> &'static str {
        "water_breakthrough"
    }

    fn description(&self) -> &'static str {
        "Sudden water breakthrough from aquifer or nearby injector"
    }

    fn apply(&mut self, well: &mut WellModel, dt_days: f64, _sim_time: DateTime<Utc>) -> ScenarioSummary {
        let initial = *self
            .initial_water_cut
            .get_or_insert_with(|| well.reservoir().water_cut());

        self.elapsed_days += dt_days;
        let progress = if self.onset_days > 0.0 {
            (self.elapsed_days / self.onset_days).min(1.0)
        } else {
            1.0
        };

        let water_cut = initial + (self.target_water_cut - initial) * s_curve(progress);
        well.reservoir_mut().set_water_cut(water_cut.min(MAX_WATER_CUT));
        well.set_water_cut_scripted(true);

        summary([
            ("water_breakthrough_progress", json!(progress)),
            ("water_cut_pct", json!(well.reservoir().water_cut() * 100.0)),
        ])
    }

    fn is_applicable(&self, _well: &WellModel) -> bool {
        true
    }
}
