//! Stochastic anomaly injection
//!
//! Anomalies develop over an onset period: severity ramps linearly from 0 to
//! 1 over `onset_days`, holds at 1, and the anomaly resolves once it has run
//! for three onset periods. Each tick an active anomaly re-asserts its
//! modifiers on the well; it never mutates lift physics directly.

mod injector;

pub use injector::AnomalyInjector;

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::defaults::ANOMALY_LIFETIME_ONSETS;
use crate::models::{CasingHeading, LiftType, ModelError, WellModel};
use crate::noise::uniform;

/// Water cut the injector will push a well to, never beyond
const WATER_BREAKTHROUGH_CAP: f64 = 0.95;

/// Water cut added per tick at full severity
const WATER_BREAKTHROUGH_STEP: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyType {
    PumpDegradation,
    SensorDrift,
    GasInterference,
    ElectricalFluctuation,
    WaterBreakthrough,
    SandProduction,
    CasingHeading,
    StuckSensor,
}

impl AnomalyType {
    pub const ALL: [AnomalyType; 8] = [
        Self::PumpDegradation,
        Self::SensorDrift,
        Self::GasInterference,
        Self::ElectricalFluctuation,
        Self::WaterBreakthrough,
        Self::SandProduction,
        Self::CasingHeading,
        Self::StuckSensor,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PumpDegradation => "pump_degradation",
            Self::SensorDrift => "sensor_drift",
            Self::GasInterference => "gas_interference",
            Self::ElectricalFluctuation => "electrical_fluctuation",
            Self::WaterBreakthrough => "water_breakthrough",
            Self::SandProduction => "sand_production",
            Self::CasingHeading => "casing_heading",
            Self::StuckSensor => "stuck_sensor",
        }
    }

    /// Lift types this anomaly can develop on
    pub fn applicable_lift_types(self) -> &'static [LiftType] {
        use LiftType::{Esp, GasLift, Pcp, Srp};
        match self {
            Self::PumpDegradation | Self::ElectricalFluctuation => &[Esp, Srp, Pcp],
            Self::GasInterference => &[Srp, Esp],
            Self::SandProduction => &[Pcp, Esp],
            Self::CasingHeading => &[GasLift],
            Self::SensorDrift | Self::WaterBreakthrough | Self::StuckSensor => &LiftType::ALL,
        }
    }

    pub fn applies_to(self, lift_type: LiftType) -> bool {
        self.applicable_lift_types().contains(&lift_type)
    }
}

impl fmt::Display for AnomalyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnomalyType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ModelError::InvalidConfiguration {
                field: "anomaly_type",
                reason: format!("unknown anomaly type '{s}'"),
            })
    }
}

// ============================================================================
// Active anomaly
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveAnomaly {
    pub anomaly_type: AnomalyType,
    /// Well's days on production when the anomaly started
    pub start_day: f64,
    pub elapsed_days: f64,
    /// 0..=1
    pub severity: f64,
    pub onset_days: f64,
    pub resolved: bool,
    /// Direction of a drifting transmitter (±1)
    pub drift_sign: f64,
    /// Oscillation period of a heading annulus (min)
    pub heading_period_min: f64,
}

impl ActiveAnomaly {
    pub fn new(anomaly_type: AnomalyType, start_day: f64, onset_days: f64) -> Self {
        Self {
            anomaly_type,
            start_day,
            elapsed_days: 0.0,
            severity: 0.0,
            onset_days,
            resolved: false,
            drift_sign: 1.0,
            heading_period_min: 15.0,
        }
    }

    pub fn max_duration_days(&self) -> f64 {
        self.onset_days * ANOMALY_LIFETIME_ONSETS
    }

    /// Age the anomaly by `dt_days`; returns false once it has resolved
    pub fn advance(&mut self, dt_days: f64) -> bool {
        self.elapsed_days += dt_days.max(0.0);
        if self.elapsed_days > self.max_duration_days() {
            self.resolved = true;
            return false;
        }
        self.severity = if self.onset_days > 0.0 {
            (self.elapsed_days / self.onset_days).min(1.0)
        } else {
            1.0
        };
        true
    }

    /// Layer this anomaly's effect onto the well's pending modifiers
    pub fn apply(&self, well: &mut WellModel, rng: &mut StdRng) {
        let s = self.severity;
        match self.anomaly_type {
            AnomalyType::PumpDegradation => {
                let m = well.modifiers_mut();
                m.hydraulic.efficiency *= 1.0 - 0.3 * s;
                m.electrical.current *= 1.0 + 0.2 * s;
                m.mechanical.vibration *= 1.0 + 0.5 * s;
                m.mechanical.temperature *= 1.0 + 0.1 * s;
            }
            AnomalyType::SensorDrift => {
                well.modifiers_mut().sensor.drift *= 1.0 + 0.15 * s * self.drift_sign;
            }
            AnomalyType::GasInterference => {
                let m = well.modifiers_mut();
                m.hydraulic.fillage *= 1.0 - 0.4 * s;
                m.hydraulic.efficiency *= 1.0 - 0.25 * s;
            }
            AnomalyType::ElectricalFluctuation => {
                if rng.gen::<f64>() < 0.3 * s {
                    let current = uniform(rng, 0.7, 1.3);
                    let voltage = uniform(rng, 0.8, 1.1);
                    let m = well.modifiers_mut();
                    m.electrical.current *= current;
                    m.electrical.voltage *= voltage;
                }
            }
            AnomalyType::WaterBreakthrough => {
                // A scripted breakthrough owns the water cut while it runs
                if !well.water_cut_scripted() {
                    let wc = well.reservoir().water_cut();
                    if wc < WATER_BREAKTHROUGH_CAP {
                        let next = (wc + WATER_BREAKTHROUGH_STEP * s).min(WATER_BREAKTHROUGH_CAP);
                        well.reservoir_mut().set_water_cut(next);
                    }
                }
            }
            AnomalyType::SandProduction => {
                let m = well.modifiers_mut();
                m.mechanical.torque *= 1.0 + 0.4 * s;
                m.mechanical.vibration *= 1.0 + 0.6 * s;
            }
            AnomalyType::CasingHeading => {
                if well.lift_type() == LiftType::GasLift {
                    well.modifiers_mut().set_casing_heading(CasingHeading {
                        period_min: self.heading_period_min,
                        amplitude_psi: 50.0 + 150.0 * s,
                    });
                }
            }
            AnomalyType::StuckSensor => {
                well.modifiers_mut().sensor.stuck = true;
            }
        }
    }
}
