//! Scripted operating scenarios
//!
//! A scenario is a deterministic fault progression bound to one well. Unlike
//! the anomaly injector it is started on purpose and runs for as long as it
//! stays bound, driven by the time elapsed since it was first applied.
//!
//! ## Scenarios
//!
//! 1. **normal_operation** - no-op; natural variability comes from the well
//! 2. **pump_degradation** - linear efficiency loss with rising current and vibration
//! 3. **gas_interference** - reduced fillage with a half-day surge
//! 4. **water_breakthrough** - S-curve water cut rise toward 90 %
//! 5. **casing_heading** - annulus pressure oscillation on gas-lift wells
//! 6. **electrical_issues** - random outages and voltage sags (seeded)
//! 7. **well_loading** - liquid loading until the well dies, then restart
//!
//! Scenarios run after the anomaly injector and before `WellModel::step`.
//! Their modifier contributions multiply onto whatever the injector left in
//! the bag.

pub mod casing_heading;
pub mod electrical_issues;
pub mod gas_interference;
pub mod normal_operation;
pub mod pump_degradation;
pub mod water_breakthrough;
pub mod well_loading;

pub use casing_heading::CasingHeadingScenario;
pub use electrical_issues::ElectricalIssuesScenario;
pub use gas_interference::GasInterferenceScenario;
pub use normal_operation::NormalOperationScenario;
pub use pump_degradation::PumpDegradationScenario;
pub use water_breakthrough::WaterBreakthroughScenario;
pub use well_loading::WellLoadingScenario;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{ModelError, WellModel};

/// Per-tick report of what a scenario did (flat JSON object)
pub type ScenarioSummary = serde_json::Map<String, Value>;

pub(crate) fn summary<const N: usize>(entries: [(&str, Value); N]) -> ScenarioSummary {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

/// Scripted fault progression applied to a single well once per tick
pub trait Scenario: Send {
    /// Stable identifier (e.g. "gas_interference")
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Advance the scenario by `dt_days` and impose its effect on `well`
    fn apply(&mut self, well: &mut WellModel, dt_days: f64, sim_time: DateTime<Utc>) -> ScenarioSummary;

    fn is_applicable(&self, well: &WellModel) -> bool;
}

// ============================================================================
// Scenario registry
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    NormalOperation,
    PumpDegradation,
    GasInterference,
    WaterBreakthrough,
    CasingHeading,
    ElectricalIssues,
    WellLoading,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 7] = [
        Self::NormalOperation,
        Self::PumpDegradation,
        Self::GasInterference,
        Self::WaterBreakthrough,
        Self::CasingHeading,
        Self::ElectricalIssues,
        Self::WellLoading,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NormalOperation => "normal_operation",
            Self::PumpDegradation => "pump_degradation",
            Self::GasInterference => "gas_interference",
            Self::WaterBreakthrough => "water_breakthrough",
            Self::CasingHeading => "casing_heading",
            Self::ElectricalIssues => "electrical_issues",
            Self::WellLoading => "well_loading",
        }
    }

    /// Fresh scenario instance; only stochastic scenarios use `seed`
    pub fn build(self, seed: u64) -> Box<dyn Scenario> {
        match self {
            Self::NormalOperation => Box::new(NormalOperationScenario),
            Self::PumpDegradation => Box::<PumpDegradationScenario>::default(),
            Self::GasInterference => Box::<GasInterferenceScenario>::default(),
            Self::WaterBreakthrough => Box::<WaterBreakthroughScenario>::default(),
            Self::CasingHeading => Box::<CasingHeadingScenario>::default(),
            Self::ElectricalIssues => Box::new(ElectricalIssuesScenario::new(seed)),
            Self::WellLoading => Box::<WellLoadingScenario>::default(),
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScenarioKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| ModelError::InvalidConfiguration {
                field: "scenario",
                reason: format!("unknown scenario '{s}'"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::well::test_support::well_with;
    use crate::models::{
        EspEquipment, GasLiftEquipment, LiftEquipment, PcpEquipment, SrpEquipment,
    };

    #[test]
    fn test_parse_names() {
        assert_eq!("well_loading".parse::<ScenarioKind>().unwrap(), ScenarioKind::WellLoading);
        assert_eq!("Gas-Interference".parse::<ScenarioKind>().unwrap(), ScenarioKind::GasInterference);
        assert!("meteor_strike".parse::<ScenarioKind>().is_err());
    }

    #[test]
    fn test_build_names_match_kind() {
        for kind in ScenarioKind::ALL {
            assert_eq!(kind.build(1).name(), kind.as_str());
        }
    }

    #[test]
    fn test_applicability_matrix() {
        let wells = [
            well_with(LiftEquipment::Esp(EspEquipment::default()), 1),
            well_with(LiftEquipment::Srp(SrpEquipment::default()), 1),
            well_with(LiftEquipment::GasLift(GasLiftEquipment::default()), 1),
            well_with(LiftEquipment::Pcp(PcpEquipment::default()), 1),
        ];
        let applicable = |kind: ScenarioKind| -> Vec<bool> {
            let scenario = kind.build(1);
            wells.iter().map(|w| scenario.is_applicable(w)).collect()
        };
        assert_eq!(applicable(ScenarioKind::NormalOperation), [true, true, true, true]);
        assert_eq!(applicable(ScenarioKind::PumpDegradation), [true, true, false, true]);
        assert_eq!(applicable(ScenarioKind::GasInterference), [true, true, false, false]);
        assert_eq!(applicable(ScenarioKind::WaterBreakthrough), [true, true, true, true]);
        assert_eq!(applicable(ScenarioKind::CasingHeading), [false, false, true, false]);
        assert_eq!(applicable(ScenarioKind::ElectricalIssues), [true, true, false, true]);
        assert_eq!(applicable(ScenarioKind::WellLoading), [true, false, true, false]);
    }
}
