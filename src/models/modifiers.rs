//! Per-tick anomaly modifiers
//!
//! Anomalies and scenarios express their effect on a well as multiplicative
//! factors grouped by subsystem. A well takes the bag at the start of every
//! step (`std::mem::take`), so a factor lives for exactly one tick and
//! contributors must re-assert it each tick.
//!
//! Contributions compose multiplicatively: two sources that each cut
//! efficiency by 20 % yield 0.64, never a silent overwrite.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HydraulicModifiers {
    /// Pump/lift efficiency; scales reported flow and efficiency
    pub efficiency: f64,
    /// SRP pump fillage
    pub fillage: f64,
    /// Transient surge on the physical inflow
    pub flow_surge: f64,
    /// Wellhead pressure (liquid loading)
    pub thp_factor: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ElectricalModifiers {
    pub current: f64,
    pub voltage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MechanicalModifiers {
    pub vibration: f64,
    pub temperature: f64,
    pub torque: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SensorModifiers {
    /// Multiplicative error on the flow transmitter
    pub drift: f64,
    /// Flow transmitter frozen at its previous reading
    pub stuck: bool,
}

/// Slug-flow oscillation in a gas-lift annulus
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CasingHeading {
    pub period_min: f64,
    pub amplitude_psi: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnomalyModifiers {
    pub hydraulic: HydraulicModifiers,
    pub electrical: ElectricalModifiers,
    pub mechanical: MechanicalModifiers,
    pub sensor: SensorModifiers,
    pub casing_heading: Option<CasingHeading>,
}

impl Default for AnomalyModifiers {
    fn default() -> Self {
        Self {
            hydraulic: HydraulicModifiers {
                efficiency: 1.0,
                fillage: 1.0,
                flow_surge: 1.0,
                thp_factor: 1.0,
            },
            electrical: ElectricalModifiers {
                current: 1.0,
                voltage: 1.0,
            },
            mechanical: MechanicalModifiers {
                vibration: 1.0,
                temperature: 1.0,
                torque: 1.0,
            },
            sensor: SensorModifiers {
                drift: 1.0,
                stuck: false,
            },
            casing_heading: None,
        }
    }
}

impl AnomalyModifiers {
    pub fn is_neutral(&self) -> bool {
        *self == Self::default()
    }

    /// Install a heading oscillation, keeping the stronger one if two sources overlap
    pub fn set_casing_heading(&mut self, heading: CasingHeading) {
        match self.casing_heading {
            Some(existing) if existing.amplitude_psi >= heading.amplitude_psi => {}
            _ => self.casing_heading = Some(heading),
        }
    }
}
