//! Continuous gas lift
//!
//! Production responds to injection through a gas-lift performance curve
//! (GLPC) that peaks at the optimal injection rate. When the annulus is
//! heading, casing pressure and production oscillate together.

use std::f64::consts::PI;

use serde_json::json;

use super::telemetry::{Attributes, Telemetry};
use super::well::StepContext;
use super::{ensure, ModelError};
use crate::noise::{Bounds, NoiseGenerator, Outlier};
use crate::physics_engine::units::round_to;

/// Flow swing that accompanies a full casing-heading cycle
const HEADING_FLOW_SWING: f64 = 0.15;

#[derive(Debug, Clone, PartialEq)]
pub struct GasLiftEquipment {
    // Valves and mandrels
    pub num_mandrels: u32,
    pub operating_valve_depth_ft: f64,
    pub valve_port_size_64ths: u32,
    pub valve_type: String,
    pub valve_depths_ft: Vec<f64>,
    pub valve_opening_psi: Vec<f64>,
    pub valve_closing_psi: Vec<f64>,
    pub annular_volume_bbl: f64,

    // Injection
    pub injection_rate_mscfd: f64,
    pub injection_pressure_psi: f64,
    pub optimal_injection_mscfd: f64,
    pub max_injection_mscfd: f64,
    pub design_injection_mscfd: f64,

    // Gas supply
    pub gas_supply_pressure_psi: f64,
    pub gas_max_available_mscfd: f64,
    pub gas_cost_usd_mscf: f64,

    pub choke_size_64ths: u32,

    /// Phase of the last heading cycle (rad)
    pub heading_phase: f64,
}

impl Default for GasLiftEquipment {
    fn default() -> Self {
        Self {
            num_mandrels: 5,
            operating_valve_depth_ft: 7000.0,
            valve_port_size_64ths: 16,
            valve_type: "IPO".to_string(),
            valve_depths_ft: vec![2000.0, 3500.0, 5000.0, 6000.0, 7000.0],
            valve_opening_psi: vec![1200.0, 1100.0, 1000.0, 950.0, 900.0],
            valve_closing_psi: vec![1050.0, 960.0, 870.0, 820.0, 780.0],
            annular_volume_bbl: 120.0,
            injection_rate_mscfd: 600.0,
            injection_pressure_psi: 1200.0,
            optimal_injection_mscfd: 500.0,
            max_injection_mscfd: 1200.0,
            design_injection_mscfd: 800.0,
            gas_supply_pressure_psi: 1300.0,
            gas_max_available_mscfd: 1200.0,
            gas_cost_usd_mscf: 2.50,
            choke_size_64ths: 24,
            heading_phase: 0.0,
        }
    }
}

impl GasLiftEquipment {
    pub fn validate(&self) -> Result<(), ModelError> {
        ensure(
            self.injection_rate_mscfd >= 0.0,
            "gas_lift.injection_rate_mscfd",
            self.injection_rate_mscfd,
            "must not be negative",
        )?;
        ensure(
            self.injection_pressure_psi > 0.0,
            "gas_lift.injection_pressure_psi",
            self.injection_pressure_psi,
            "must be positive",
        )?;
        ensure(
            self.max_injection_mscfd > 0.0,
            "gas_lift.max_injection_mscfd",
            self.max_injection_mscfd,
            "must be positive",
        )?;
        #[allow(clippy::cast_precision_loss)]
        let depths = self.valve_depths_ft.len() as f64;
        ensure(
            self.valve_opening_psi.len() == self.valve_depths_ft.len()
                && self.valve_closing_psi.len() == self.valve_depths_ft.len(),
            "gas_lift.valve_depths_ft",
            depths,
            "valve depth, opening and closing arrays must have equal length",
        )
    }

    /// Production multiplier from the gas-lift performance curve
    ///
    /// Below optimal: 0.6 + 0.4·r. Past optimal: 1 − 0.1·(r − 1)².
    pub fn glpc_factor(&self, injection_mscfd: f64) -> f64 {
        if self.optimal_injection_mscfd <= 0.0 {
            return 1.0;
        }
        let ratio = injection_mscfd / self.optimal_injection_mscfd;
        if ratio <= 1.0 {
            0.6 + 0.4 * ratio
        } else {
            1.0 - 0.1 * (ratio - 1.0).powi(2)
        }
    }

    pub(crate) fn telemetry(&mut self, ctx: &mut StepContext<'_>) -> Telemetry {
        let m = ctx.modifiers;
        let water_cut = ctx.base.water_cut_fraction();

        let glpc = self.glpc_factor(self.injection_rate_mscfd);
        let mut effective_flow = ctx.base.flow_rate_bpd * glpc * m.hydraulic.efficiency;

        let thp_base = (200.0 - 0.05 * effective_flow + 0.1 * self.injection_pressure_psi * 0.1)
            * m.hydraulic.thp_factor;
        let thp = ctx.noise.gaussian(thp_base, 3.0, Bounds::range(50.0, 500.0));

        let mut chp_base = self.injection_pressure_psi * 0.85;
        if let Some(heading) = m.casing_heading {
            if heading.period_min > 0.0 {
                self.heading_phase = 2.0 * PI * ctx.minute_of_day() / heading.period_min;
                chp_base += heading.amplitude_psi * self.heading_phase.sin();
                effective_flow *= 1.0 + HEADING_FLOW_SWING * self.heading_phase.sin();
            }
        }
        let chp = ctx.noise.gaussian(chp_base, 3.0, Bounds::min(100.0));

        let diurnal = NoiseGenerator::diurnal_factor(ctx.hour_of_day(), 0.015);
        let tht = ctx
            .noise
            .gaussian(ctx.reservoir.temperature_f() * 0.55 * diurnal, 0.8, Bounds::min(80.0));

        // Total GOR = formation GOR + injected gas-liquid ratio
        let oil_rate = effective_flow * (1.0 - water_cut);
        let injected_glr = self.injection_rate_mscfd * 1000.0 / oil_rate.max(1.0);
        let total_gor = ctx.base.gor_scf_stb + injected_glr;

        // Lift efficiency tracks the GLPC; never below 20 % while gas is flowing
        let efficiency_pct = (glpc * 100.0 * m.hydraulic.efficiency).clamp(20.0, 100.0);

        let noise = &mut *ctx.noise;
        let mut t = Telemetry::new();
        t.set("thp_psi", round_to(thp, 1));
        t.set("chp_psi", round_to(chp, 1));
        t.set("tht_f", round_to(tht, 1));
        t.set(
            "gl_injection_rate_mscfd",
            round_to(noise.gaussian(self.injection_rate_mscfd, 5.0, Bounds::min(0.0)), 1),
        );
        t.set(
            "gl_injection_pressure_psi",
            round_to(noise.gaussian(self.injection_pressure_psi, 2.0, Bounds::min(200.0)), 1),
        );
        t.set("choke_size_64ths", f64::from(self.choke_size_64ths));
        t.set(
            "flow_rate_bpd",
            round_to(noise.with_outliers(effective_flow, 8.0, Outlier::SENSOR_GLITCH, Bounds::min(0.0)), 1),
        );
        t.set("water_cut_pct", round_to(ctx.base.water_cut_pct, 2));
        t.set("gor_scf_stb", round_to(noise.gaussian(total_gor, 5.0, Bounds::min(0.0)), 1));
        t.set("pump_efficiency_pct", round_to(efficiency_pct, 1));

        t.alias("tubing_pressure_psi", "thp_psi");
        t.alias("casing_pressure_psi", "chp_psi");
        t.alias("wellhead_temperature_f", "tht_f");
        t
    }

    pub(crate) fn attributes(&self, attrs: &mut Attributes) {
        let entries = [
            ("gl_num_mandrels", json!(self.num_mandrels)),
            ("gl_operating_valve_depth_ft", json!(self.operating_valve_depth_ft)),
            ("gl_valve_port_size_64ths", json!(self.valve_port_size_64ths)),
            ("gl_valve_type", json!(self.valve_type)),
            ("gl_valve_depths_ft", json!(self.valve_depths_ft)),
            ("gl_valve_opening_psi", json!(self.valve_opening_psi)),
            ("gl_valve_closing_psi", json!(self.valve_closing_psi)),
            ("gl_annular_volume_bbl", json!(self.annular_volume_bbl)),
            ("gl_optimal_injection_mscfd", json!(self.optimal_injection_mscfd)),
            ("gl_max_injection_mscfd", json!(self.max_injection_mscfd)),
            ("gl_design_injection_mscfd", json!(self.design_injection_mscfd)),
            ("gl_injection_pressure_psi", json!(self.injection_pressure_psi)),
            ("gl_gas_supply_pressure_psi", json!(self.gas_supply_pressure_psi)),
            ("gl_gas_max_available_mscfd", json!(self.gas_max_available_mscfd)),
            ("gl_gas_cost_usd_mscf", json!(self.gas_cost_usd_mscf)),
            ("gl_choke_size_64ths", json!(self.choke_size_64ths)),
            ("install_date", json!("")),
        ];
        for (key, value) in entries {
            attrs.insert(key.to_string(), value);
        }
    }
}
