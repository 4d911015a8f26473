//! Electric submersible pump
//!
//! Parabolic head curve scaled by the affinity laws, motor loading from
//! hydraulic power, VSD-scaled electrical readings, load-driven motor
//! temperature, BEP-deviation vibration and a slowly wandering insulation
//! resistance.

use serde_json::json;

use super::telemetry::{Attributes, Telemetry};
use super::well::StepContext;
use super::{ensure, ModelError};
use crate::noise::{Bounds, NoiseGenerator};
use crate::physics_engine::units::{pump_hydraulic_hp, round_to, three_phase_power_kw};

/// Correlation between the X and Y accelerometer channels
const VIBRATION_XY_CORRELATION: f64 = 0.7;

#[derive(Debug, Clone, PartialEq)]
pub struct EspEquipment {
    // Pump
    pub pump_model: String,
    pub pump_stages: u32,
    pub design_rate_bpd: f64,
    pub design_head_ft: f64,
    pub bep_rate_bpd: f64,
    pub bep_head_ft_per_stage: f64,
    pub efficiency_at_bep: f64,
    pub min_flow_bpd: f64,
    /// Current hydraulic efficiency; degrades with wear
    pub pump_efficiency: f64,

    // Motor
    pub motor_hp: f64,
    pub motor_voltage_v: f64,
    pub motor_amperage_a: f64,
    pub motor_power_factor: f64,
    pub motor_poles: u32,
    pub motor_temp_max_f: f64,

    // VSD
    pub vsd_installed: bool,
    pub vsd_frequency_hz: f64,
    pub vsd_nominal_hz: f64,

    // Well-specific alarm thresholds
    pub vibration_alarm_ips: f64,
    pub vibration_shutdown_ips: f64,
    pub motor_temp_alarm_f: f64,
    pub insulation_alarm_mohm: f64,
    pub underload_pct: f64,
    pub overload_pct: f64,

    // Operating state
    pub intake_pressure_psi: f64,
    pub discharge_pressure_psi: f64,
    pub motor_temp_f: f64,
    pub vibration_ips: f64,
    pub insulation_mohm: f64,
}

impl Default for EspEquipment {
    fn default() -> Self {
        Self {
            pump_model: "DN1750".to_string(),
            pump_stages: 200,
            design_rate_bpd: 1200.0,
            design_head_ft: 5000.0,
            bep_rate_bpd: 1000.0,
            bep_head_ft_per_stage: 25.0,
            efficiency_at_bep: 0.58,
            min_flow_bpd: 300.0,
            pump_efficiency: 0.58,
            motor_hp: 150.0,
            motor_voltage_v: 2200.0,
            motor_amperage_a: 45.0,
            motor_power_factor: 0.85,
            motor_poles: 2,
            motor_temp_max_f: 350.0,
            vsd_installed: true,
            vsd_frequency_hz: 60.0,
            vsd_nominal_hz: 60.0,
            vibration_alarm_ips: 0.35,
            vibration_shutdown_ips: 0.50,
            motor_temp_alarm_f: 320.0,
            insulation_alarm_mohm: 200.0,
            underload_pct: 30.0,
            overload_pct: 110.0,
            intake_pressure_psi: 800.0,
            discharge_pressure_psi: 3000.0,
            motor_temp_f: 220.0,
            vibration_ips: 0.08,
            insulation_mohm: 1200.0,
        }
    }
}

impl EspEquipment {
    pub fn validate(&self) -> Result<(), ModelError> {
        ensure(self.design_rate_bpd > 0.0, "esp.design_rate_bpd", self.design_rate_bpd, "must be positive")?;
        ensure(self.design_head_ft > 0.0, "esp.design_head_ft", self.design_head_ft, "must be positive")?;
        ensure(self.motor_hp > 0.0, "esp.motor_hp", self.motor_hp, "must be positive")?;
        ensure(self.motor_voltage_v > 0.0, "esp.motor_voltage_v", self.motor_voltage_v, "must be positive")?;
        ensure(self.motor_amperage_a > 0.0, "esp.motor_amperage_a", self.motor_amperage_a, "must be positive")?;
        ensure(self.vsd_nominal_hz > 0.0, "esp.vsd_nominal_hz", self.vsd_nominal_hz, "must be positive")?;
        ensure(self.vsd_frequency_hz > 0.0, "esp.vsd_frequency_hz", self.vsd_frequency_hz, "must be positive")?;
        ensure(
            self.pump_efficiency > 0.0 && self.pump_efficiency <= 1.0,
            "esp.pump_efficiency",
            self.pump_efficiency,
            "must be within (0, 1]",
        )
    }

    pub fn frequency_ratio(&self) -> f64 {
        self.vsd_frequency_hz / self.vsd_nominal_hz
    }

    /// Developed head (ft) at `flow_rate_bpd`
    ///
    /// H = 1.3·H_design · (1 − (Q/Qmax)²) · (N/N0)², Qmax = 1.4·Q_design·(N/N0)
    pub fn pump_head(&self, flow_rate_bpd: f64, freq_ratio: f64) -> f64 {
        let h_shutoff = self.design_head_ft * 1.3;
        let q_max = self.design_rate_bpd * 1.4 * freq_ratio;
        if q_max <= 0.0 {
            return 0.0;
        }
        let q_ratio = (flow_rate_bpd / q_max).min(1.0);
        (h_shutoff * (1.0 - q_ratio * q_ratio) * freq_ratio * freq_ratio).max(0.0)
    }

    pub(crate) fn telemetry(&mut self, ctx: &mut StepContext<'_>) -> Telemetry {
        let flow_rate = ctx.base.flow_rate_bpd;
        let reservoir_temp = ctx.reservoir.temperature_f();
        let geometry = ctx.geometry;
        let m = ctx.modifiers;

        let freq_ratio = self.frequency_ratio();
        let head = self.pump_head(flow_rate, freq_ratio);

        // Pressures
        let gradient = ctx.gradient();
        let intake = (ctx.reservoir.current_pressure_psi()
            - gradient * (geometry.perforations_top_ft - geometry.pump_depth_ft))
            .max(50.0);
        let discharge = intake + head * gradient;

        // Motor loading
        let hydraulic_hp = pump_hydraulic_hp(flow_rate, head * gradient);
        let brake_hp = hydraulic_hp / self.pump_efficiency.max(0.1);
        let load_factor = brake_hp / self.motor_hp.max(1.0);

        // Magnetising current keeps at least 20 % of nameplate
        let current = (self.motor_amperage_a * load_factor * freq_ratio)
            .max(self.motor_amperage_a * 0.2 * freq_ratio);
        let voltage = self.motor_voltage_v * freq_ratio;
        let power_kw = three_phase_power_kw(voltage, current, self.motor_power_factor);

        let diurnal = NoiseGenerator::diurnal_factor(ctx.hour_of_day(), 0.01);
        let motor_temp = (reservoir_temp + 30.0 * load_factor) * diurnal;

        let flow_deviation = (flow_rate - self.bep_rate_bpd).abs() / self.bep_rate_bpd.max(1.0);
        let base_vibration = 0.05 + 0.3 * flow_deviation * flow_deviation;
        let (vib_x, vib_y) = ctx.noise.correlated_pair(
            base_vibration,
            base_vibration,
            15.0,
            15.0,
            VIBRATION_XY_CORRELATION,
        );
        let vib_x = vib_x.max(0.01);
        let vib_y = vib_y.max(0.01);

        self.insulation_mohm = ctx.noise.random_walk(self.insulation_mohm, 2.0, Bounds::range(50.0, 2000.0));

        let thp = ((discharge - gradient * geometry.pump_depth_ft) * m.hydraulic.thp_factor).max(20.0);
        let chp = (intake + gradient * (geometry.pump_depth_ft - geometry.perforations_top_ft) * 0.5).max(30.0);

        // Wire-to-water efficiency; floor at 5 %: a running pump always moves some fluid
        let efficiency_pct = (hydraulic_hp / (power_kw * 1.341).max(0.1) * 100.0 * m.hydraulic.efficiency)
            .clamp(5.0, 100.0);

        self.intake_pressure_psi = intake;
        self.discharge_pressure_psi = discharge;
        self.motor_temp_f = motor_temp * m.mechanical.temperature;
        self.vibration_ips = vib_x.max(vib_y) * m.mechanical.vibration;

        let noise = &mut *ctx.noise;
        let mut t = Telemetry::new();
        t.set("thp_psi", round_to(noise.gaussian(thp, 2.0, Bounds::min(10.0)), 1));
        t.set("chp_psi", round_to(noise.gaussian(chp, 2.0, Bounds::min(10.0)), 1));
        t.set("tht_f", round_to(noise.gaussian(reservoir_temp * 0.6 * diurnal, 0.5, Bounds::min(80.0)), 1));
        t.set("intake_pressure_psi", round_to(noise.gaussian(intake, 2.0, Bounds::min(50.0)), 1));
        t.set("discharge_pressure_psi", round_to(noise.gaussian(discharge, 2.0, Bounds::min(100.0)), 1));
        t.set("motor_temp_f", round_to(noise.gaussian(self.motor_temp_f, 0.5, Bounds::min(100.0)), 1));
        t.set("intake_temp_f", round_to(noise.gaussian(reservoir_temp * 0.85, 0.5, Bounds::min(100.0)), 1));
        t.set(
            "motor_current_a",
            round_to(noise.gaussian(current * m.electrical.current, 3.0, Bounds::min(5.0)), 2),
        );
        t.set(
            "motor_voltage_v",
            round_to(noise.gaussian(voltage * m.electrical.voltage, 1.5, Bounds::min(400.0)), 1),
        );
        t.set("motor_power_kw", round_to(noise.gaussian(power_kw, 2.0, Bounds::min(0.0)), 2));
        t.set("vsd_frequency_hz", round_to(noise.gaussian(self.vsd_frequency_hz, 0.3, Bounds::NONE), 2));
        t.set("vibration_x_ips", round_to(vib_x * m.mechanical.vibration, 4));
        t.set("vibration_y_ips", round_to(vib_y * m.mechanical.vibration, 4));
        t.set("insulation_mohm", round_to(self.insulation_mohm, 0));
        t.set("flow_rate_bpd", round_to(flow_rate * m.hydraulic.efficiency, 1));
        t.set("water_cut_pct", round_to(ctx.base.water_cut_pct, 2));
        t.set("gor_scf_stb", round_to(ctx.base.gor_scf_stb, 1));
        t.set(
            "pump_efficiency_pct",
            round_to(noise.gaussian(efficiency_pct, 1.5, Bounds::range(0.0, 100.0)), 1),
        );

        t.alias("frequency_hz", "vsd_frequency_hz");
        t.alias("motor_temperature_f", "motor_temp_f");
        t.set("vibration_ips", round_to(self.vibration_ips, 4));
        t.alias("tubing_pressure_psi", "thp_psi");
        t.alias("casing_pressure_psi", "chp_psi");
        t.alias("wellhead_temperature_f", "tht_f");
        t
    }

    pub(crate) fn attributes(&self, attrs: &mut Attributes) {
        let entries = [
            ("esp_pump_model", json!(self.pump_model)),
            ("esp_pump_stages", json!(self.pump_stages)),
            ("esp_design_rate_bpd", json!(self.design_rate_bpd)),
            ("esp_design_head_ft", json!(self.design_head_ft)),
            ("esp_bep_rate_bpd", json!(self.bep_rate_bpd)),
            ("esp_bep_head_ft_per_stage", json!(self.bep_head_ft_per_stage)),
            ("esp_efficiency_at_bep", json!(self.efficiency_at_bep)),
            ("esp_min_flow_bpd", json!(self.min_flow_bpd)),
            ("esp_motor_hp", json!(self.motor_hp)),
            ("esp_motor_voltage_v", json!(self.motor_voltage_v)),
            ("esp_motor_amperage_a", json!(self.motor_amperage_a)),
            ("esp_motor_power_factor", json!(self.motor_power_factor)),
            ("esp_motor_temp_max_f", json!(self.motor_temp_max_f)),
            ("esp_vsd_installed", json!(self.vsd_installed)),
            ("esp_vsd_nominal_hz", json!(self.vsd_nominal_hz)),
            ("esp_vibration_alarm_ips", json!(self.vibration_alarm_ips)),
            ("esp_vibration_shutdown_ips", json!(self.vibration_shutdown_ips)),
            ("esp_motor_temp_alarm_f", json!(self.motor_temp_alarm_f)),
            ("esp_insulation_alarm_mohm", json!(self.insulation_alarm_mohm)),
            ("esp_underload_pct", json!(self.underload_pct)),
            ("esp_overload_pct", json!(self.overload_pct)),
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
    fn test_shutoff_head() {
        let esp = EspEquipment::default();
        assert!((esp.pump_head(0.0, 1.0) - 6500.0).abs() < 1e-9);
    }

    #[test]
    fn test_head_at_runout_is_zero() {
        let esp = EspEquipment::default();
        assert_eq!(esp.pump_head(1680.0, 1.0), 0.0);
        assert_eq!(esp.pump_head(5000.0, 1.0), 0.0);
    }

    #[test]
    fn test_affinity_law_scaling() {
        let esp = EspEquipment::default();
        // At zero flow head scales with (N/N0)²
        let h50 = esp.pump_head(0.0, 50.0 / 60.0);
        assert!((h50 - 6500.0 * (50.0_f64 / 60.0).powi(2)).abs() < 1e-9);
    }

    #[test]
    fn test_validate_rejects_zero_motor() {
        let esp = EspEquipment { motor_hp: 0.0, ..EspEquipment::default() };
        assert!(esp.validate().is_err());
    }

    #[test]
    fn test_telemetry_keys_and_aliases() {
        let mut well = well_with(LiftEquipment::Esp(EspEquipment::default()), 3);
        let t = well.step(1.0 / 24.0, sim_time());
        for key in [
            "thp_psi", "chp_psi", "tht_f", "intake_pressure_psi", "discharge_pressure_psi",
            "motor_temp_f", "intake_temp_f", "motor_current_a", "motor_voltage_v",
            "motor_power_kw", "vsd_frequency_hz", "vibration_x_ips", "vibration_y_ips",
            "insulation_mohm", "flow_rate_bpd", "water_cut_pct", "gor_scf_stb",
            "pump_efficiency_pct", "frequency_hz", "motor_temperature_f", "vibration_ips",
            "tubing_pressure_psi", "casing_pressure_psi", "wellhead_temperature_f",
        ] {
            assert!(t.contains_key(key), "missing {}", key);
        }
        assert_eq!(t.get("thp_psi"), t.get("tubing_pressure_psi"));
        assert_eq!(t.get("motor_temp_f"), t.get("motor_temperature_f"));
        let eff = t.get("pump_efficiency_pct").unwrap();
        assert!((0.0..=100.0).contains(&eff));
        assert!(t.get("discharge_pressure_psi").unwrap() > t.get("intake_pressure_psi").unwrap());
    }

    #[test]
    fn test_degradation_modifiers_raise_current_and_vibration() {
        let run = |degraded: bool| {
            let mut well = well_with(LiftEquipment::Esp(EspEquipment::default()), 9);
            let mut current = 0.0;
            let mut vibration = 0.0;
            for _ in 0..50 {
                if degraded {
                    let m = well.modifiers_mut();
                    m.electrical.current *= 1.2;
                    m.mechanical.vibration *= 1.5;
                }
                let t = well.step(1.0 / 24.0, sim_time());
                current += t.get("motor_current_a").unwrap();
                vibration += t.get("vibration_ips").unwrap();
            }
            (current, vibration)
        };
        let (c0, v0) = run(false);
        let (c1, v1) = run(true);
        assert!(c1 > c0 * 1.1, "current {} vs {}", c1, c0);
        assert!(v1 > v0 * 1.3, "vibration {} vs {}", v1, v0);
    }

    #[test]
    fn test_efficiency_modifier_lowers_reported_efficiency() {
        let run = |efficiency: f64| {
            let mut well = well_with(LiftEquipment::Esp(EspEquipment::default()), 14);
            (0..20)
                .map(|_| {
                    well.modifiers_mut().hydraulic.efficiency = efficiency;
                    well.step(1.0 / 24.0, sim_time()).get("pump_efficiency_pct").unwrap()
                })
                .collect::<Vec<_>>()
        };
        let healthy = run(1.0);
        let worn = run(0.7);
        // Same seed, same noise draws: only the modifier differs
        for (h, w) in healthy.iter().zip(&worn) {
            assert!(*h > 8.0 && *h < 95.0, "healthy efficiency {} should be off the clamps", h);
            assert!((w / h - 0.7).abs() < 0.02, "worn {} vs healthy {}", w, h);
        }
    }
}
