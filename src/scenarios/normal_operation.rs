//! Normal Operation - steady production with natural variability

use chrono::{DateTime, Utc};

use super::{Scenario, ScenarioSummary};
use crate::models::WellModel;

/// Baseline scenario; the well's own noise and decline provide all variation
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalOperationScenario;

impl Scenario for NormalOperationScenario {
    fn name(&self) -> &'static str {
        "normal_operation"
    }

    fn description(&self) -> &'static str {
        "Normal production with natural variability"
    }

    fn apply(&mut self, _well: &mut WellModel, _dt_days: f64, _sim_time: DateTime<Utc>) -> ScenarioSummary {
        ScenarioSummary::new()
    }

    fn is_applicable(&self, _well: &WellModel) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::well::test_support::{sim_time, well_with};
    use crate::models::{LiftEquipment, SrpEquipment};

    #[test]
    fn test_leaves_well_untouched() {
        let mut well = well_with(LiftEquipment::Srp(SrpEquipment::default()), 2);
        let summary = NormalOperationScenario.apply(&mut well, 1.0, sim_time());
        assert!(summary.is_empty());
        assert!(well.modifiers().is_neutral());
    }
}
