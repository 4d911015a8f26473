//! Per-well anomaly bookkeeping and random injection

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::info;

use super::{ActiveAnomaly, AnomalyType};
use crate::config::defaults::{
    ANOMALY_ONSET_MAX_DAYS, ANOMALY_ONSET_MIN_DAYS, DEFAULT_MAX_CONCURRENT_ANOMALIES,
};
use crate::config::AnomalySettings;
use crate::models::{ModelError, WellModel};
use crate::noise::uniform;

pub struct AnomalyInjector {
    probability_per_day: f64,
    enabled_types: Vec<AnomalyType>,
    max_concurrent: usize,
    rng: StdRng,
    active: BTreeMap<String, Vec<ActiveAnomaly>>,
    injected_total: u64,
    resolved_total: u64,
}

impl AnomalyInjector {
    pub fn new(probability_per_day: f64, enabled_types: Vec<AnomalyType>, seed: u64) -> Self {
        Self {
            probability_per_day: probability_per_day.max(0.0),
            enabled_types,
            max_concurrent: DEFAULT_MAX_CONCURRENT_ANOMALIES,
            rng: StdRng::seed_from_u64(seed),
            active: BTreeMap::new(),
            injected_total: 0,
            resolved_total: 0,
        }
    }

    pub fn from_settings(settings: &AnomalySettings, seed: u64) -> Self {
        Self::new(settings.probability_per_well_per_day, settings.enabled_types(), seed)
            .with_max_concurrent(settings.max_concurrent)
    }

    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }

    /// Age existing anomalies, rebuild the well's modifiers from them, then
    /// inject a new anomaly with probability `p·dt`
    pub fn maybe_inject(&mut self, well: &mut WellModel, dt_days: f64) {
        self.update(well, dt_days);

        if self.rng.gen::<f64>() < self.probability_per_day * dt_days {
            self.inject_random(well);
        }
        self.publish(well);
    }

    /// Start `anomaly_type` on `well` immediately, bypassing the dice roll
    /// and the concurrency limit
    pub fn force_inject(
        &mut self,
        well: &mut WellModel,
        anomaly_type: AnomalyType,
        onset_days: Option<f64>,
    ) -> Result<(), ModelError> {
        if !anomaly_type.applies_to(well.lift_type()) {
            return Err(ModelError::InvalidConfiguration {
                field: "anomaly_type",
                reason: format!("{anomaly_type} does not apply to {} wells", well.lift_type()),
            });
        }
        if self.active_for(well.name()).iter().any(|a| a.anomaly_type == anomaly_type) {
            return Err(ModelError::InvalidConfiguration {
                field: "anomaly_type",
                reason: format!("{anomaly_type} is already active on {}", well.name()),
            });
        }
        let onset = onset_days.unwrap_or_else(|| uniform(&mut self.rng, ANOMALY_ONSET_MIN_DAYS, ANOMALY_ONSET_MAX_DAYS));
        self.start(well, anomaly_type, onset);
        self.publish(well);
        Ok(())
    }

    fn update(&mut self, well: &mut WellModel, dt_days: f64) {
        well.reset_modifiers();

        let Some(anomalies) = self.active.get_mut(well.name()) else {
            return;
        };
        let rng = &mut self.rng;
        let mut resolved = Vec::new();
        anomalies.retain_mut(|anomaly| {
            if anomaly.advance(dt_days) {
                anomaly.apply(well, rng);
                true
            } else {
                resolved.push(anomaly.anomaly_type);
                false
            }
        });

        for anomaly_type in resolved {
            self.resolved_total += 1;
            info!(well = %well.name(), anomaly = %anomaly_type, "Anomaly resolved");
        }
    }

    fn inject_random(&mut self, well: &WellModel) {
        let current = self.active_for(well.name());
        if current.len() >= self.max_concurrent {
            return;
        }
        let lift_type = well.lift_type();
        let candidates: Vec<AnomalyType> = self
            .enabled_types
            .iter()
            .copied()
            .filter(|t| t.applies_to(lift_type))
            .filter(|t| !current.iter().any(|a| a.anomaly_type == *t))
            .collect();

        let Some(&anomaly_type) = candidates.choose(&mut self.rng) else {
            return;
        };
        let onset = uniform(&mut self.rng, ANOMALY_ONSET_MIN_DAYS, ANOMALY_ONSET_MAX_DAYS);
        self.start(well, anomaly_type, onset);
    }

    fn start(&mut self, well: &WellModel, anomaly_type: AnomalyType, onset_days: f64) {
        let mut anomaly = ActiveAnomaly::new(anomaly_type, well.counters().days_on_production, onset_days);
        match anomaly_type {
            AnomalyType::SensorDrift => {
                anomaly.drift_sign = if self.rng.gen_bool(0.5) { 1.0 } else { -1.0 };
            }
            AnomalyType::CasingHeading => {
                anomaly.heading_period_min = uniform(&mut self.rng, 5.0, 30.0);
            }
            _ => {}
        }

        info!(
            well = %well.name(),
            anomaly = %anomaly_type,
            onset_days,
            "Injected anomaly"
        );
        self.injected_total += 1;
        self.active.entry(well.name().to_string()).or_default().push(anomaly);
    }

    fn publish(&self, well: &mut WellModel) {
        let types = self.active_for(well.name()).iter().map(|a| a.anomaly_type).collect();
        well.set_active_anomalies(types);
    }

    pub fn active_for(&self, well_name: &str) -> &[ActiveAnomaly] {
        self.active.get(well_name).map_or(&[], Vec::as_slice)
    }

    /// Active anomalies across all wells
    pub fn active_count(&self) -> usize {
        self.active.values().map(Vec::len).sum()
    }

    /// Active anomalies by type
    pub fn summary(&self) -> BTreeMap<AnomalyType, usize> {
        let mut counts = BTreeMap::new();
        for anomaly in self.active.values().flatten() {
            *counts.entry(anomaly.anomaly_type).or_insert(0) += 1;
        }
        counts
    }

    pub fn injected_total(&self) -> u64 {
        self.injected_total
    }

    pub fn resolved_total(&self) -> u64 {
        self.resolved_total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::well::test_support::{sim_time, well_with};
    use crate::models::{EspEquipment, GasLiftEquipment, LiftEquipment, LiftType};

    fn esp() -> WellModel {
        well_with(LiftEquipment::Esp(EspEquipment::default()), 5)
    }

    #[test]
    fn test_certain_injection() {
        let mut injector = AnomalyInjector::new(1.0, AnomalyType::ALL.to_vec(), 1);
        let mut well = esp();
        injector.maybe_inject(&mut well, 1.0);
        assert_eq!(injector.active_for(well.name()).len(), 1);
        assert_eq!(well.active_anomalies().len(), 1);
        let a = &injector.active_for(well.name())[0];
        assert!(a.anomaly_type.applies_to(LiftType::Esp));
        assert!((10.0..=60.0).contains(&a.onset_days));
        assert_eq!(injector.injected_total(), 1);
    }

    #[test]
    fn test_zero_probability_never_injects() {
        let mut injector = AnomalyInjector::new(0.0, AnomalyType::ALL.to_vec(), 1);
        let mut well = esp();
        for _ in 0..1000 {
            injector.maybe_inject(&mut well, 1.0);
        }
        assert_eq!(injector.active_count(), 0);
    }

    #[test]
    fn test_concurrency_limit_and_no_duplicates() {
        let mut injector = AnomalyInjector::new(1.0, AnomalyType::ALL.to_vec(), 2);
        let mut well = esp();
        for _ in 0..5 {
            injector.maybe_inject(&mut well, 1.0);
        }
        let active = injector.active_for(well.name());
        assert_eq!(active.len(), 2);
        assert_ne!(active[0].anomaly_type, active[1].anomaly_type);
    }

    #[test]
    fn test_only_enabled_and_applicable_types() {
        let mut injector = AnomalyInjector::new(1.0, vec![AnomalyType::CasingHeading], 3);
        let mut well = esp();
        injector.maybe_inject(&mut well, 1.0);
        assert_eq!(injector.active_count(), 0);

        let mut gl = well_with(LiftEquipment::GasLift(GasLiftEquipment::default()), 3);
        injector.maybe_inject(&mut gl, 1.0);
        assert_eq!(injector.summary().get(&AnomalyType::CasingHeading), Some(&1));
    }

    #[test]
    fn test_anomaly_resolves_after_three_onsets() {
        let mut injector = AnomalyInjector::new(0.0, AnomalyType::ALL.to_vec(), 4);
        let mut well = esp();
        injector
            .force_inject(&mut well, AnomalyType::PumpDegradation, Some(2.0))
            .unwrap();
        for _ in 0..6 {
            injector.maybe_inject(&mut well, 1.0);
        }
        assert_eq!(injector.active_count(), 1);
        injector.maybe_inject(&mut well, 1.0);
        assert_eq!(injector.active_count(), 0);
        assert_eq!(injector.resolved_total(), 1);
        assert!(well.active_anomalies().is_empty());
        assert!(well.modifiers().is_neutral());
    }

    #[test]
    fn test_modifiers_rebuilt_each_tick() {
        let mut injector = AnomalyInjector::new(0.0, AnomalyType::ALL.to_vec(), 4);
        let mut well = esp();
        injector
            .force_inject(&mut well, AnomalyType::GasInterference, Some(1.0))
            .unwrap();
        for _ in 0..3 {
            injector.maybe_inject(&mut well, 0.5);
        }
        // Severity capped at 1: fillage 0.6, never compounded across ticks
        assert!((well.modifiers().hydraulic.fillage - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_force_inject_rejects_inapplicable() {
        let mut injector = AnomalyInjector::new(0.0, AnomalyType::ALL.to_vec(), 4);
        let mut well = esp();
        assert!(injector
            .force_inject(&mut well, AnomalyType::CasingHeading, None)
            .is_err());
        injector.force_inject(&mut well, AnomalyType::StuckSensor, None).unwrap();
        assert!(injector.force_inject(&mut well, AnomalyType::StuckSensor, None).is_err());
    }

    #[test]
    fn test_stuck_sensor_freezes_flow_through_step() {
        let mut injector = AnomalyInjector::new(0.0, AnomalyType::ALL.to_vec(), 4);
        let mut well = esp();
        let first = well.step(1.0 / 24.0, sim_time()).get("flow_rate_bpd");
        injector.force_inject(&mut well, AnomalyType::StuckSensor, Some(1.0)).unwrap();
        for _ in 0..4 {
            injector.maybe_inject(&mut well, 1.0 / 24.0);
            let t = well.step(1.0 / 24.0, sim_time());
            assert_eq!(t.get("flow_rate_bpd"), first);
        }
    }

    #[test]
    fn test_same_seed_same_history() {
        let run = |seed| {
            let mut injector = AnomalyInjector::new(0.5, AnomalyType::ALL.to_vec(), seed);
            let mut well = esp();
            let mut log = Vec::new();
            for _ in 0..200 {
                injector.maybe_inject(&mut well, 0.25);
                log.push(well.active_anomalies().to_vec());
            }
            log
        };
        assert_eq!(run(9), run(9));
    }
}
