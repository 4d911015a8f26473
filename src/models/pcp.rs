//! Progressive cavity pump
//!
//! Displacement scales with rotor speed. Drive torque follows the
//! differential pressure across the stator, inflated by oil viscosity and
//! by produced sand.

use serde_json::json;

use super::telemetry::{Attributes, Telemetry};
use super::well::StepContext;
use super::{ensure, ModelError};
use crate::noise::{Bounds, Outlier};
use crate::physics_engine::units::{hp_to_kw, round_to};

/// Torque per psi of differential pressure (ft·lb/psi)
const TORQUE_PER_PSI: f64 = 0.8;
/// Extra torque per percent of sand in the produced fluid (ft·lb)
const SAND_TORQUE_PER_PCT: f64 = 100.0;
/// Drive chain efficiency between motor and polished rod
const DRIVE_EFFICIENCY: f64 = 0.9;

#[derive(Debug, Clone, PartialEq)]
pub struct PcpEquipment {
    // Pump
    pub pump_model: String,
    pub pump_geometry: String,
    pub pump_stages: u32,
    pub displacement_cc_rev: f64,
    pub max_rate_bpd: f64,
    pub max_differential_psi: f64,

    // Stator elastomer
    pub elastomer_type: String,
    pub elastomer_max_temp_f: f64,
    pub design_temp_f: f64,

    // Surface drive
    pub drive_type: String,
    pub max_rpm: f64,
    pub max_torque_ftlb: f64,
    pub motor_hp: f64,
    pub motor_voltage_v: f64,
    pub gear_ratio: f64,
    pub has_vsd: bool,
    pub brake_type: String,

    // Rods
    pub rod_type: String,
    pub rod_diameter_in: f64,
    pub rod_grade: String,
    pub coupling_type: String,

    // Produced fluid
    pub h2s_ppm: f64,
    pub co2_pct: f64,

    // Operating state
    pub drive_rpm: f64,
    pub current_torque_ftlb: f64,
    pub sand_pct: f64,
    pub pump_efficiency: f64,
}

impl Default for PcpEquipment {
    fn default() -> Self {
        Self {
            pump_model: "Moyno 7L6".to_string(),
            pump_geometry: "2-3 lobe".to_string(),
            pump_stages: 3,
            displacement_cc_rev: 1200.0,
            max_rate_bpd: 2000.0,
            max_differential_psi: 2000.0,
            elastomer_type: "NBR".to_string(),
            elastomer_max_temp_f: 275.0,
            design_temp_f: 200.0,
            drive_type: "surface_drive".to_string(),
            max_rpm: 400.0,
            max_torque_ftlb: 4500.0,
            motor_hp: 60.0,
            motor_voltage_v: 460.0,
            gear_ratio: 14.7,
            has_vsd: true,
            brake_type: "band".to_string(),
            rod_type: "continuous".to_string(),
            rod_diameter_in: 1.0,
            rod_grade: "D".to_string(),
            coupling_type: "slim_hole".to_string(),
            h2s_ppm: 0.0,
            co2_pct: 0.0,
            drive_rpm: 250.0,
            current_torque_ftlb: 2000.0,
            sand_pct: 1.0,
            pump_efficiency: 0.70,
        }
    }
}

impl PcpEquipment {
    pub fn validate(&self) -> Result<(), ModelError> {
        ensure(self.max_rpm > 0.0, "pcp.max_rpm", self.max_rpm, "must be positive")?;
        ensure(
            self.drive_rpm >= 0.0 && self.drive_rpm <= self.max_rpm,
            "pcp.drive_rpm",
            self.drive_rpm,
            "must lie between 0 and max_rpm",
        )?;
        ensure(self.max_rate_bpd > 0.0, "pcp.max_rate_bpd", self.max_rate_bpd, "must be positive")?;
        ensure(
            self.max_torque_ftlb > 0.0,
            "pcp.max_torque_ftlb",
            self.max_torque_ftlb,
            "must be positive",
        )?;
        ensure(
            self.pump_efficiency > 0.0 && self.pump_efficiency <= 1.0,
            "pcp.pump_efficiency",
            self.pump_efficiency,
            "must lie in (0, 1]",
        )?;
        ensure(
            (0.0..=100.0).contains(&self.sand_pct),
            "pcp.sand_pct",
            self.sand_pct,
            "must lie in [0, 100]",
        )
    }

    /// Volumetric displacement at the given speed (bbl/d)
    pub fn displacement_bpd(&self, rpm: f64) -> f64 {
        if self.max_rpm <= 0.0 {
            return 0.0;
        }
        self.max_rate_bpd / self.max_rpm * rpm * self.pump_efficiency
    }

    /// Drive torque from differential pressure, viscosity and sand
    ///
    /// `viscosity_cp` above 10 000 cP no longer adds drag.
    pub fn drive_torque(&self, differential_psi: f64, viscosity_cp: f64) -> f64 {
        let viscosity_factor = 1.0 + 0.0001 * viscosity_cp.min(10_000.0);
        let dp = differential_psi.min(self.max_differential_psi);
        (dp * TORQUE_PER_PSI * viscosity_factor).min(self.max_torque_ftlb) + self.sand_pct * SAND_TORQUE_PER_PCT
    }

    pub(crate) fn telemetry(&mut self, ctx: &mut StepContext<'_>) -> Telemetry {
        let m = ctx.modifiers;
        let pump_depth = ctx.geometry.pump_depth_ft;
        let perf_depth = ctx.geometry.perforations_top_ft;
        let reservoir_pressure = ctx.reservoir.current_pressure_psi();
        let gradient = ctx.gradient();
        let water_cut = ctx.base.water_cut_fraction();
        let flow_rate = ctx.base.flow_rate_bpd;

        let displacement = self.displacement_bpd(self.drive_rpm);

        let viscosity = ctx.fluid.live_oil_viscosity(reservoir_pressure, None);
        let differential = gradient * (pump_depth - 200.0);
        self.current_torque_ftlb = self.drive_torque(differential, viscosity);

        let hydraulic_hp = self.current_torque_ftlb * self.drive_rpm / 5252.0;
        let current = 35.0 * hydraulic_hp / self.motor_hp.max(1.0);
        let power_kw = hp_to_kw(hydraulic_hp) / DRIVE_EFFICIENCY;

        let intake = (reservoir_pressure - gradient * (perf_depth - pump_depth)).max(30.0);

        let thp_base = (100.0 - 0.02 * flow_rate + 20.0 * (1.0 - water_cut)) * m.hydraulic.thp_factor;
        let thp = ctx.noise.gaussian(thp_base, 2.0, Bounds::range(15.0, 300.0));
        let chp = ctx.noise.gaussian(200.0 + 0.01 * flow_rate, 2.0, Bounds::range(30.0, 500.0));

        let volumetric_efficiency = (95.0 * m.hydraulic.efficiency).clamp(40.0, 100.0);
        let pump_efficiency_pct = volumetric_efficiency * 0.85;

        let noise = &mut *ctx.noise;
        let mut t = Telemetry::new();
        t.set("thp_psi", round_to(thp, 1));
        t.set("chp_psi", round_to(chp, 1));
        t.set(
            "drive_torque_ftlb",
            round_to(
                noise.gaussian(self.current_torque_ftlb * m.mechanical.torque, 5.0, Bounds::min(100.0)),
                1,
            ),
        );
        t.set("drive_rpm", round_to(noise.gaussian(self.drive_rpm, 1.5, Bounds::min(30.0)), 1));
        t.set(
            "motor_current_a",
            round_to(noise.gaussian(current * m.electrical.current, 4.0, Bounds::min(5.0)), 2),
        );
        t.set("motor_power_kw", round_to(noise.gaussian(power_kw, 3.0, Bounds::min(1.0)), 2));
        t.set("intake_pressure_psi", round_to(noise.gaussian(intake, 2.0, Bounds::min(30.0)), 1));
        t.set("flow_rate_bpd", round_to(flow_rate * m.hydraulic.efficiency, 1));
        t.set("water_cut_pct", round_to(ctx.base.water_cut_pct, 2));
        t.set("gor_scf_stb", round_to(ctx.base.gor_scf_stb, 1));
        t.set(
            "sand_pct",
            round_to(noise.with_outliers(self.sand_pct, 25.0, Outlier::SENSOR_GLITCH, Bounds::range(0.0, 10.0)), 2),
        );
        t.set(
            "pump_efficiency_pct",
            round_to(noise.gaussian(pump_efficiency_pct, 1.5, Bounds::range(30.0, 100.0)), 1),
        );
        t.set("pump_displacement_bpd", round_to(displacement, 1));

        t.alias("tubing_pressure_psi", "thp_psi");
        t.alias("casing_pressure_psi", "chp_psi");
        t.alias("speed_rpm", "drive_rpm");
        t.alias("motor_torque_ftlb", "drive_torque_ftlb");
        t
    }

    pub(crate) fn attributes(&self, attrs: &mut Attributes) {
        let entries = [
            ("pcp_pump_model", json!(self.pump_model)),
            ("pcp_pump_geometry", json!(self.pump_geometry)),
            ("pcp_pump_stages", json!(self.pump_stages)),
            ("pcp_displacement_cc_rev", json!(self.displacement_cc_rev)),
            ("pcp_max_rate_bpd", json!(self.max_rate_bpd)),
            ("pcp_max_differential_psi", json!(self.max_differential_psi)),
            ("pcp_elastomer_type", json!(self.elastomer_type)),
            ("pcp_elastomer_max_temp_f", json!(self.elastomer_max_temp_f)),
            ("pcp_design_temp_f", json!(self.design_temp_f)),
            ("pcp_drive_type", json!(self.drive_type)),
            ("pcp_max_rpm", json!(self.max_rpm)),
            ("pcp_max_torque_ftlb", json!(self.max_torque_ftlb)),
            ("pcp_motor_hp", json!(self.motor_hp)),
            ("pcp_motor_voltage_v", json!(self.motor_voltage_v)),
            ("pcp_gear_ratio", json!(self.gear_ratio)),
            ("pcp_has_vsd", json!(self.has_vsd)),
            ("pcp_brake_type", json!(self.brake_type)),
            ("pcp_rod_type", json!(self.rod_type)),
            ("pcp_rod_diameter_in", json!(self.rod_diameter_in)),
            ("pcp_rod_grade", json!(self.rod_grade)),
            ("pcp_coupling_type", json!(self.coupling_type)),
            ("pcp_h2s_ppm", json!(self.h2s_ppm)),
            ("pcp_co2_pct", json!(self.co2_pct)),
            ("pcp_sand_pct_initial", json!(self.sand_pct)),
            ("install_date", json!("")),
        ];
        for (key, value) in entries {
            attrs.insert(key.to_string(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::well::test_support::{sim_time, well_with};
    use crate::models::well::LiftEquipment;

    #[test]
    fn test_displacement_scales_with_speed() {
        let pcp = PcpEquipment::default();
        // 2000 / 400 × 250 × 0.7
        assert!((pcp.displacement_bpd(250.0) - 875.0).abs() < 1e-9);
        assert!((pcp.displacement_bpd(400.0) - 1400.0).abs() < 1e-9);
    }

    #[test]
    fn test_torque_capped_before_sand() {
        let pcp = PcpEquipment {
            sand_pct: 2.0,
            max_differential_psi: 5000.0,
            ..PcpEquipment::default()
        };
        // 5000 × 0.8 × 2 = 8000, capped at 4500, then sand on top
        let torque = pcp.drive_torque(100_000.0, 50_000.0);
        assert!((torque - (4500.0 + 200.0)).abs() < 1e-9);
    }

    #[test]
    fn test_differential_limit_keeps_torque_below_cap() {
        let pcp = PcpEquipment {
            sand_pct: 2.0,
            ..PcpEquipment::default()
        };
        // 2000 psi limit × 0.8 × 2 = 3200
        let torque = pcp.drive_torque(100_000.0, 50_000.0);
        assert!((torque - (3200.0 + 200.0)).abs() < 1e-9);
    }

    #[test]
    fn test_viscous_oil_needs_more_torque() {
        let pcp = PcpEquipment::default();
        assert!(pcp.drive_torque(1000.0, 5000.0) > pcp.drive_torque(1000.0, 10.0));
    }

    #[test]
    fn test_validate_rejects_overspeed() {
        let pcp = PcpEquipment {
            drive_rpm: 500.0,
            ..PcpEquipment::default()
        };
        assert!(pcp.validate().is_err());
    }

    #[test]
    fn test_telemetry_keys_and_aliases() {
        let mut well = well_with(LiftEquipment::Pcp(PcpEquipment::default()), 21);
        let t = well.step(1.0 / 24.0, sim_time());
        for key in [
            "thp_psi", "chp_psi", "drive_torque_ftlb", "drive_rpm", "motor_current_a",
            "motor_power_kw", "intake_pressure_psi", "flow_rate_bpd", "water_cut_pct",
            "sand_pct", "pump_efficiency_pct", "speed_rpm", "motor_torque_ftlb",
        ] {
            assert!(t.contains_key(key), "missing {}", key);
        }
        assert_eq!(t.get("speed_rpm"), t.get("drive_rpm"));
        let sand = t.get("sand_pct").unwrap();
        assert!((0.0..=10.0).contains(&sand));
    }

    #[test]
    fn test_torque_modifier_raises_reading() {
        let mut base = well_with(LiftEquipment::Pcp(PcpEquipment::default()), 22);
        let mut worn = well_with(LiftEquipment::Pcp(PcpEquipment::default()), 22);
        worn.modifiers_mut().mechanical.torque = 1.5;
        let a = base.step(1.0 / 24.0, sim_time()).get("drive_torque_ftlb").unwrap();
        let b = worn.step(1.0 / 24.0, sim_time()).get("drive_torque_ftlb").unwrap();
        // Same seed, same noise draw
        assert!(b > a * 1.4);
    }
}
