//! Sucker-rod (beam) pump
//!
//! Plunger displacement and fillage, fluid level above the pump, polished
//! rod loads with a simplified Everitt-Jennings acceleration factor, beam
//! motor loading and a synthetic surface dynamometer card.

use std::f64::consts::PI;

use serde_json::json;

use super::telemetry::{Attributes, Telemetry};
use super::well::StepContext;
use super::{ensure, ModelError};
use crate::noise::{Bounds, NoiseGenerator};
use crate::physics_engine::units::round_to;

/// Points per synthetic dynamometer card
pub const CARD_POINTS: usize = 200;

/// Minutes of simulated time between dynamometer cards
const CARD_INTERVAL_MIN: f64 = 30.0;

/// Steel rod buoyancy in produced fluid (fraction of air weight)
const ROD_BUOYANCY: f64 = 0.128;

#[derive(Debug, Clone, PartialEq)]
pub struct SrpEquipment {
    pub unit_type: String,
    pub beam_load_capacity_lb: f64,
    pub stroke_length_in: f64,
    pub max_spm: f64,
    pub prime_mover_hp: f64,
    pub pump_bore_in: f64,
    pub plunger_length_ft: f64,
    pub rod_material: String,
    pub rod_weight_lb_ft: f64,

    // Operating state
    pub spm: f64,
    pub pump_fillage_pct: f64,
    pub fluid_level_ft: f64,
    pub stroke_counter: u64,
    pub prl_max_lb: f64,
    pub prl_min_lb: f64,
}

impl Default for SrpEquipment {
    fn default() -> Self {
        Self {
            unit_type: "conventional".to_string(),
            beam_load_capacity_lb: 25_000.0,
            stroke_length_in: 144.0,
            max_spm: 12.0,
            prime_mover_hp: 50.0,
            pump_bore_in: 2.0,
            plunger_length_ft: 4.0,
            rod_material: "grade_D".to_string(),
            rod_weight_lb_ft: 2.2,
            spm: 7.0,
            pump_fillage_pct: 85.0,
            fluid_level_ft: 2500.0,
            stroke_counter: 0,
            prl_max_lb: 15_000.0,
            prl_min_lb: 4000.0,
        }
    }
}

impl SrpEquipment {
    pub fn validate(&self) -> Result<(), ModelError> {
        ensure(
            self.beam_load_capacity_lb > 0.0,
            "srp.beam_load_capacity_lb",
            self.beam_load_capacity_lb,
            "must be positive",
        )?;
        ensure(self.stroke_length_in > 0.0, "srp.stroke_length_in", self.stroke_length_in, "must be positive")?;
        ensure(self.pump_bore_in > 0.0, "srp.pump_bore_in", self.pump_bore_in, "must be positive")?;
        ensure(self.spm > 0.0, "srp.spm", self.spm, "must be positive")?;
        ensure(self.prime_mover_hp > 0.0, "srp.prime_mover_hp", self.prime_mover_hp, "must be positive")?;
        ensure(self.rod_weight_lb_ft >= 0.0, "srp.rod_weight_lb_ft", self.rod_weight_lb_ft, "must not be negative")
    }

    pub fn plunger_area_sq_in(&self) -> f64 {
        PI * (self.pump_bore_in / 2.0).powi(2)
    }

    /// Theoretical pump displacement (bpd)
    ///
    /// PD = A · S · SPM · 1440 / 9702
    pub fn displacement_bpd(&self) -> f64 {
        self.plunger_area_sq_in() * self.stroke_length_in * self.spm * 1440.0 / 9702.0
    }

    /// Polished rod loads (max, min) in lb for a fluid level above the pump
    pub fn rod_loads(&self, pump_depth_ft: f64, gradient: f64, fluid_level_ft: f64) -> (f64, f64) {
        let rod_weight = self.rod_weight_lb_ft * pump_depth_ft;
        let fluid_load = self.plunger_area_sq_in() * gradient * fluid_level_ft;
        let buoyancy = rod_weight * ROD_BUOYANCY;

        let acceleration = 1.0 + (self.spm / 15.0).powi(2);
        let max = (rod_weight + fluid_load - buoyancy) * acceleration;
        let min = (rod_weight - buoyancy - fluid_load * 0.1) / acceleration;
        (max.max(3000.0), min.max(500.0))
    }

    pub(crate) fn telemetry(&mut self, ctx: &mut StepContext<'_>) -> Telemetry {
        let flow_rate = ctx.base.flow_rate_bpd;
        let pump_depth = ctx.geometry.pump_depth_ft;
        let m = ctx.modifiers;

        let displacement = self.displacement_bpd();
        self.pump_fillage_pct = if displacement > 0.0 {
            (flow_rate / displacement * 100.0).min(100.0)
        } else {
            0.0
        };

        let gradient = ctx.gradient();
        if gradient > 0.0 {
            let casing_back_pressure = ctx.noise.gaussian(50.0, 5.0, Bounds::min(20.0));
            let level = pump_depth - (ctx.reservoir.current_pressure_psi() - casing_back_pressure) / gradient;
            self.fluid_level_ft = level.max(200.0).min(pump_depth - 100.0);
        }

        let (prl_max, prl_min) = self.rod_loads(pump_depth, gradient, self.fluid_level_ft);
        self.prl_max_lb = prl_max;
        self.prl_min_lb = prl_min;

        let avg_load = (prl_max + prl_min) / 2.0;
        let load_fraction = avg_load / self.beam_load_capacity_lb.max(1.0);
        let motor_current = 30.0 * load_fraction * (self.spm / 7.0) * m.electrical.current;
        let motor_power = motor_current * 460.0 * 3.0_f64.sqrt() * 0.8 / 1000.0;

        let noise = &mut *ctx.noise;
        let thp = noise.gaussian(80.0 - 0.01 * flow_rate, 3.0, Bounds::range(15.0, 200.0));
        let chp = noise.gaussian(150.0 + 0.02 * flow_rate, 3.0, Bounds::range(30.0, 400.0));

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let strokes = (self.spm * ctx.dt_days * 1440.0).max(0.0).round() as u64;
        self.stroke_counter += strokes;

        let fillage = self.pump_fillage_pct * m.hydraulic.fillage;
        // Floor at 30 %: a stroking pump always lifts something
        let efficiency_pct = (fillage * m.hydraulic.efficiency * 0.9).clamp(30.0, 100.0);

        let mut t = Telemetry::new();
        t.set("thp_psi", round_to(thp, 1));
        t.set("chp_psi", round_to(chp, 1));
        t.set("motor_current_a", round_to(noise.gaussian(motor_current, 5.0, Bounds::min(5.0)), 2));
        t.set("motor_power_kw", round_to(noise.gaussian(motor_power, 3.0, Bounds::min(1.0)), 2));
        t.set("spm", round_to(noise.gaussian(self.spm, 1.0, Bounds::range(2.0, 15.0)), 2));
        t.set(
            "polished_rod_load_max_lb",
            round_to(noise.gaussian(prl_max, 2.0, Bounds::min(2000.0)), 0),
        );
        t.set(
            "polished_rod_load_min_lb",
            round_to(noise.gaussian(prl_min, 2.0, Bounds::min(500.0)), 0),
        );
        t.set("fluid_level_ft", round_to(noise.gaussian(self.fluid_level_ft, 5.0, Bounds::min(200.0)), 0));
        t.set(
            "pump_fillage_pct",
            round_to(noise.gaussian(fillage, 3.0, Bounds::range(20.0, 100.0)), 1),
        );
        t.set("pump_efficiency_pct", round_to(efficiency_pct, 1));
        t.set_count("stroke_counter", self.stroke_counter);
        t.set("flow_rate_bpd", round_to(flow_rate * m.hydraulic.efficiency, 1));
        t.set("water_cut_pct", round_to(ctx.base.water_cut_pct, 2));

        t.alias("tubing_pressure_psi", "thp_psi");
        t.alias("casing_pressure_psi", "chp_psi");
        t.alias("load_lb", "polished_rod_load_max_lb");

        let minutes_in_step = ctx.dt_days * 1440.0;
        if minutes_in_step >= CARD_INTERVAL_MIN || noise.chance(minutes_in_step / CARD_INTERVAL_MIN) {
            t.set_card("dynamo_card_surface", self.dynamometer_card(prl_max, prl_min, fillage, noise));
        }
        t
    }

    /// Surface dynamometer card as `[position_in, load_lb]` pairs
    ///
    /// Upstroke ramps onto the full fluid load, holds it for the filled part
    /// of the barrel and sags once the plunger hits gas; the downstroke
    /// unloads over the first tenth and rides the rod weight back down.
    pub fn dynamometer_card(
        &self,
        prl_max: f64,
        prl_min: f64,
        fillage_pct: f64,
        noise: &mut NoiseGenerator,
    ) -> Vec<[f64; 2]> {
        let fillage = (fillage_pct / 100.0).clamp(0.0, 1.0);
        let span = prl_max - prl_min;

        #[allow(clippy::cast_precision_loss)]
        let n = CARD_POINTS as f64;
        (0..CARD_POINTS)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let theta = 2.0 * PI * i as f64 / n;
                let position = self.stroke_length_in * (1.0 - theta.cos()) / 2.0;

                let load = if theta < PI {
                    if theta < 0.1 * PI {
                        prl_min + span * (theta / (0.1 * PI))
                    } else if theta < PI * fillage {
                        prl_max
                    } else {
                        let blend = (theta - PI * fillage) / (PI * (1.0 - fillage)).max(f64::EPSILON);
                        prl_max - span * 0.3 * blend.min(1.0)
                    }
                } else if theta < 1.1 * PI {
                    prl_max - span * ((theta - PI) / (0.1 * PI))
                } else {
                    prl_min
                };

                [round_to(position, 2), round_to(noise.gaussian(load, 1.0, Bounds::NONE), 0)]
            })
            .collect()
    }

    pub(crate) fn attributes(&self, attrs: &mut Attributes) {
        let entries = [
            ("srp_unit_type", json!(self.unit_type)),
            ("srp_beam_load_capacity_lb", json!(self.beam_load_capacity_lb)),
            ("srp_stroke_length_in", json!(self.stroke_length_in)),
            ("srp_max_spm", json!(self.max_spm)),
            ("srp_prime_mover_hp", json!(self.prime_mover_hp)),
            ("srp_pump_bore_in", json!(self.pump_bore_in)),
            ("srp_rod_material", json!(self.rod_material)),
            ("install_date", json!("")),
        ];
        for (key, value) in entries {
            attrs.insert(key.to_string(), value);
        }
    }
}
