//! Well model: identity, status machine, geometry and lift dispatch
//!
//! `WellModel::step` runs the shared part of every tick (status dispatch,
//! flowing bottom-hole pressure, reservoir step, cumulative counters, noisy
//! base readings) and then hands a `StepContext` to the lift equipment,
//! which layers its own physics and produces the telemetry record.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use super::esp::EspEquipment;
use super::fluid::FluidModel;
use super::gas_lift::GasLiftEquipment;
use super::modifiers::AnomalyModifiers;
use super::pcp::PcpEquipment;
use super::reservoir::ReservoirModel;
use super::srp::SrpEquipment;
use super::telemetry::{Attributes, Telemetry};
use super::{ensure, ModelError};
use crate::anomaly::AnomalyType;
use crate::noise::{Bounds, NoiseGenerator, Outlier};
use crate::physics_engine::units::round_to;

/// Minimum flowing bottom-hole pressure (psi)
const MIN_PWF_PSI: f64 = 50.0;

// ============================================================================
// Enumerations
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LiftType {
    #[serde(rename = "ESP", alias = "esp")]
    Esp,
    #[serde(rename = "SRP", alias = "srp")]
    Srp,
    #[serde(rename = "gas_lift", alias = "GAS_LIFT", alias = "gaslift")]
    GasLift,
    #[serde(rename = "PCP", alias = "pcp")]
    Pcp,
}

impl LiftType {
    pub const ALL: [LiftType; 4] = [Self::Esp, Self::Srp, Self::GasLift, Self::Pcp];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Esp => "ESP",
            Self::Srp => "SRP",
            Self::GasLift => "gas_lift",
            Self::Pcp => "PCP",
        }
    }

    /// Transport-side device profile for the well's RTU
    pub fn device_type(self) -> &'static str {
        match self {
            Self::Esp => "rtu_esp",
            Self::Srp => "rtu_srp",
            Self::GasLift => "rtu_gaslift",
            Self::Pcp => "rtu_pcp",
        }
    }
}

impl fmt::Display for LiftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LiftType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "esp" => Ok(Self::Esp),
            "srp" => Ok(Self::Srp),
            "gas_lift" | "gaslift" | "gl" => Ok(Self::GasLift),
            "pcp" => Ok(Self::Pcp),
            other => Err(ModelError::InvalidConfiguration {
                field: "lift_type",
                reason: format!("unknown lift type '{other}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WellStatus {
    Producing,
    ShutIn,
    Workover,
    Starting,
    Stopping,
}

impl WellStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Producing => "producing",
            Self::ShutIn => "shut_in",
            Self::Workover => "workover",
            Self::Starting => "starting",
            Self::Stopping => "stopping",
        }
    }
}

impl fmt::Display for WellStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Well data
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WellIdentity {
    pub name: String,
    pub field_name: String,
    pub pad_name: String,
}

impl WellIdentity {
    pub fn new(name: impl Into<String>, field_name: impl Into<String>, pad_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_name: field_name.into(),
            pad_name: pad_name.into(),
        }
    }

    /// Corporate well code: `PDVSA-{first three letters of field}-{well}`
    pub fn pdvsa_code(&self) -> String {
        let prefix: String = self.field_name.chars().take(3).collect();
        format!("PDVSA-{}-{}", prefix.to_uppercase(), self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellGeometry {
    pub total_depth_md_ft: f64,
    pub total_depth_tvd_ft: f64,
    pub casing_od_in: f64,
    pub casing_id_in: f64,
    pub tubing_od_in: f64,
    pub tubing_id_in: f64,
    pub pump_depth_ft: f64,
    pub perforations_top_ft: f64,
    pub perforations_bottom_ft: f64,
    pub completion_type: String,
}

impl Default for WellGeometry {
    fn default() -> Self {
        Self {
            total_depth_md_ft: 8000.0,
            total_depth_tvd_ft: 7500.0,
            casing_od_in: 7.0,
            casing_id_in: 6.184,
            tubing_od_in: 2.875,
            tubing_id_in: 2.441,
            pump_depth_ft: 6000.0,
            perforations_top_ft: 7000.0,
            perforations_bottom_ft: 7500.0,
            completion_type: "vertical".to_string(),
        }
    }
}

impl WellGeometry {
    pub fn validate(&self) -> Result<(), ModelError> {
        ensure(self.pump_depth_ft > 0.0, "pump_depth_ft", self.pump_depth_ft, "must be positive")?;
        ensure(
            self.perforations_top_ft > 0.0,
            "perforations_top_ft",
            self.perforations_top_ft,
            "must be positive",
        )?;
        ensure(
            self.perforations_bottom_ft >= self.perforations_top_ft,
            "perforations_bottom_ft",
            self.perforations_bottom_ft,
            "must not be above the top perforation",
        )?;
        ensure(
            self.total_depth_md_ft >= self.total_depth_tvd_ft,
            "total_depth_md_ft",
            self.total_depth_md_ft,
            "measured depth cannot be shorter than vertical depth",
        )?;
        ensure(
            self.tubing_id_in > 0.0 && self.tubing_id_in < self.tubing_od_in,
            "tubing_id_in",
            self.tubing_id_in,
            "must be positive and smaller than tubing OD",
        )?;
        ensure(
            self.casing_id_in > 0.0 && self.casing_id_in < self.casing_od_in,
            "casing_id_in",
            self.casing_id_in,
            "must be positive and smaller than casing OD",
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WellCounters {
    pub cumulative_oil_stb: f64,
    pub cumulative_water_stb: f64,
    pub cumulative_gas_mscf: f64,
    pub days_on_production: f64,
}

/// Noisy readings shared by every lift type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseReadings {
    pub flow_rate_bpd: f64,
    pub water_cut_pct: f64,
    pub gor_scf_stb: f64,
}

impl BaseReadings {
    pub fn water_cut_fraction(&self) -> f64 {
        self.water_cut_pct / 100.0
    }
}

/// Everything a lift model may read while producing one record
pub struct StepContext<'a> {
    pub reservoir: &'a ReservoirModel,
    pub fluid: &'a FluidModel,
    pub geometry: &'a WellGeometry,
    pub modifiers: &'a AnomalyModifiers,
    pub noise: &'a mut NoiseGenerator,
    pub base: BaseReadings,
    pub sim_time: DateTime<Utc>,
    pub dt_days: f64,
}

impl StepContext<'_> {
    /// Fractional hour of day, used for diurnal cycles
    pub fn hour_of_day(&self) -> f64 {
        f64::from(self.sim_time.hour()) + f64::from(self.sim_time.minute()) / 60.0
    }

    pub fn minute_of_day(&self) -> f64 {
        f64::from(self.sim_time.hour()) * 60.0
            + f64::from(self.sim_time.minute())
            + f64::from(self.sim_time.second()) / 60.0
    }

    /// Mixed gradient at the reported water cut (psi/ft)
    pub fn gradient(&self) -> f64 {
        self.fluid.fluid_gradient(self.base.water_cut_fraction())
    }
}

// ============================================================================
// Lift equipment
// ============================================================================

/// Closed set of artificial-lift installations
pub enum LiftEquipment {
    Esp(EspEquipment),
    Srp(SrpEquipment),
    GasLift(GasLiftEquipment),
    Pcp(PcpEquipment),
}

impl LiftEquipment {
    pub fn lift_type(&self) -> LiftType {
        match self {
            Self::Esp(_) => LiftType::Esp,
            Self::Srp(_) => LiftType::Srp,
            Self::GasLift(_) => LiftType::GasLift,
            Self::Pcp(_) => LiftType::Pcp,
        }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        match self {
            Self::Esp(e) => e.validate(),
            Self::Srp(e) => e.validate(),
            Self::GasLift(e) => e.validate(),
            Self::Pcp(e) => e.validate(),
        }
    }

    fn telemetry(&mut self, ctx: &mut StepContext<'_>) -> Telemetry {
        match self {
            Self::Esp(e) => e.telemetry(ctx),
            Self::Srp(e) => e.telemetry(ctx),
            Self::GasLift(e) => e.telemetry(ctx),
            Self::Pcp(e) => e.telemetry(ctx),
        }
    }

    fn attributes(&self, attrs: &mut Attributes) {
        match self {
            Self::Esp(e) => e.attributes(attrs),
            Self::Srp(e) => e.attributes(attrs),
            Self::GasLift(e) => e.attributes(attrs),
            Self::Pcp(e) => e.attributes(attrs),
        }
    }
}

// ============================================================================
// Well model
// ============================================================================

pub struct WellModel {
    pub identity: WellIdentity,
    pub geometry: WellGeometry,
    status: WellStatus,
    reservoir: ReservoirModel,
    fluid: FluidModel,
    lift: LiftEquipment,
    counters: WellCounters,
    modifiers: AnomalyModifiers,
    active_anomalies: Vec<AnomalyType>,
    noise: NoiseGenerator,
    last_flow_reading: Option<f64>,
    scripted_water_cut: bool,
}

impl WellModel {
    pub fn new(
        identity: WellIdentity,
        geometry: WellGeometry,
        reservoir: ReservoirModel,
        fluid: FluidModel,
        lift: LiftEquipment,
        seed: u64,
    ) -> Result<Self, ModelError> {
        geometry.validate()?;
        fluid.validate()?;
        lift.validate()?;
        Ok(Self {
            identity,
            geometry,
            status: WellStatus::Producing,
            reservoir,
            fluid,
            lift,
            counters: WellCounters::default(),
            modifiers: AnomalyModifiers::default(),
            active_anomalies: Vec::new(),
            noise: NoiseGenerator::new(seed),
            last_flow_reading: None,
            scripted_water_cut: false,
        })
    }

    pub fn name(&self) -> &str {
        &self.identity.name
    }

    pub fn lift_type(&self) -> LiftType {
        self.lift.lift_type()
    }

    pub fn status(&self) -> WellStatus {
        self.status
    }

    pub fn set_status(&mut self, status: WellStatus) {
        if status != self.status {
            debug!(well = %self.identity.name, from = %self.status, to = %status, "Well status changed");
            self.status = status;
        }
    }

    pub fn reservoir(&self) -> &ReservoirModel {
        &self.reservoir
    }

    pub fn reservoir_mut(&mut self) -> &mut ReservoirModel {
        &mut self.reservoir
    }

    pub fn fluid(&self) -> &FluidModel {
        &self.fluid
    }

    pub fn lift(&self) -> &LiftEquipment {
        &self.lift
    }

    pub fn lift_mut(&mut self) -> &mut LiftEquipment {
        &mut self.lift
    }

    pub fn counters(&self) -> &WellCounters {
        &self.counters
    }

    /// Modifiers that the next `step` will consume
    pub fn modifiers(&self) -> &AnomalyModifiers {
        &self.modifiers
    }

    pub fn modifiers_mut(&mut self) -> &mut AnomalyModifiers {
        &mut self.modifiers
    }

    pub fn reset_modifiers(&mut self) {
        self.modifiers = AnomalyModifiers::default();
    }

    pub fn active_anomalies(&self) -> &[AnomalyType] {
        &self.active_anomalies
    }

    pub fn set_active_anomalies(&mut self, anomalies: Vec<AnomalyType>) {
        self.active_anomalies = anomalies;
    }

    /// True while a scripted scenario owns the reservoir water cut
    pub fn water_cut_scripted(&self) -> bool {
        self.scripted_water_cut
    }

    pub fn set_water_cut_scripted(&mut self, scripted: bool) {
        self.scripted_water_cut = scripted;
    }

    /// Hydrostatic Pwf: liquid column between pump intake and perforations
    /// plus 50 psi, floored at 50 psi
    pub fn calculate_pwf(&self) -> f64 {
        let gradient = self.fluid.fluid_gradient(self.reservoir.water_cut());
        let depth_below_pump = self.geometry.perforations_top_ft - self.geometry.pump_depth_ft;
        (gradient * depth_below_pump + 50.0).max(MIN_PWF_PSI)
    }

    /// Advance the well by `dt_days` and return one telemetry record
    ///
    /// Modifiers are consumed by this call. A well that is not producing
    /// reports zero flow and a static wellhead pressure; `starting` and
    /// `stopping` settle into `producing` and `shut_in` after one such tick.
    pub fn step(&mut self, dt_days: f64, sim_time: DateTime<Utc>) -> Telemetry {
        let modifiers = std::mem::take(&mut self.modifiers);

        match self.status {
            WellStatus::Producing => {}
            WellStatus::Starting => {
                let telemetry = self.shut_in_telemetry();
                self.set_status(WellStatus::Producing);
                return telemetry;
            }
            WellStatus::Stopping => {
                let telemetry = self.shut_in_telemetry();
                self.set_status(WellStatus::ShutIn);
                return telemetry;
            }
            WellStatus::ShutIn | WellStatus::Workover => return self.shut_in_telemetry(),
        }

        let dt_days = dt_days.max(0.0);
        let pwf = self.calculate_pwf();
        let state = self.reservoir.step(pwf, dt_days);

        self.counters.days_on_production += dt_days;
        self.counters.cumulative_oil_stb += state.oil_rate_bpd * dt_days;
        self.counters.cumulative_water_stb += state.water_rate_bpd * dt_days;
        self.counters.cumulative_gas_mscf += state.gor_scf_stb * state.oil_rate_bpd * dt_days / 1000.0;

        let physical_flow = state.flow_rate_bpd * modifiers.hydraulic.flow_surge;
        let base = BaseReadings {
            flow_rate_bpd: self.noise.with_outliers(
                physical_flow,
                7.0,
                Outlier::SENSOR_GLITCH,
                Bounds::min(0.0),
            ),
            water_cut_pct: self.noise.gaussian(state.water_cut_pct, 3.0, Bounds::range(0.0, 100.0)),
            gor_scf_stb: self.noise.gaussian(state.gor_scf_stb, 5.0, Bounds::min(0.0)),
        };

        let Self {
            lift,
            reservoir,
            fluid,
            geometry,
            noise,
            ..
        } = self;
        let mut ctx = StepContext {
            reservoir,
            fluid,
            geometry,
            modifiers: &modifiers,
            noise,
            base,
            sim_time,
            dt_days,
        };
        let mut telemetry = lift.telemetry(&mut ctx);

        if let Some(flow) = telemetry.get("flow_rate_bpd") {
            let reading = if modifiers.sensor.stuck {
                NoiseGenerator::stuck_sensor(flow, self.last_flow_reading)
            } else {
                round_to(flow * modifiers.sensor.drift, 1)
            };
            telemetry.set("flow_rate_bpd", reading);
            self.last_flow_reading = Some(reading);
        }

        telemetry
    }

    fn shut_in_telemetry(&mut self) -> Telemetry {
        let static_thp = self.reservoir.current_pressure_psi() * 0.3;
        let mut telemetry = Telemetry::new();
        telemetry.set("flow_rate_bpd", 0.0);
        telemetry.set("water_cut_pct", 0.0);
        telemetry.set("gor_scf_stb", 0.0);
        telemetry.set("thp_psi", round_to(self.noise.gaussian(static_thp, 1.0, Bounds::NONE), 1));
        telemetry.alias("tubing_pressure_psi", "thp_psi");
        telemetry
    }

    /// One-time metadata snapshot for entity creation
    pub fn static_attributes(&self) -> Attributes {
        let id = &self.identity;
        let g = &self.geometry;
        let lift_type = self.lift_type().as_str();

        let mut attrs = Attributes::new();
        let entries = [
            ("well_name", json!(id.name)),
            ("well_code_pdvsa", json!(id.pdvsa_code())),
            ("field_name", json!(id.field_name)),
            ("macolla_name", json!(id.pad_name)),
            ("lift_type", json!(lift_type)),
            ("lifting_type", json!(lift_type)),
            ("status", json!(self.status.as_str())),
            ("total_depth_md_ft", json!(g.total_depth_md_ft)),
            ("total_depth_tvd_ft", json!(g.total_depth_tvd_ft)),
            ("casing_od_in", json!(g.casing_od_in)),
            ("casing_id_in", json!(g.casing_id_in)),
            ("tubing_od_in", json!(g.tubing_od_in)),
            ("tubing_id_in", json!(g.tubing_id_in)),
            ("pump_depth_ft", json!(g.pump_depth_ft)),
            ("perforations_top_ft", json!(g.perforations_top_ft)),
            ("perforations_bottom_ft", json!(g.perforations_bottom_ft)),
            ("completion_type", json!(g.completion_type)),
            // Filled in later by the optimization service
            ("opt_last_run", json!("")),
            ("opt_current_operating_point_bpd", json!(0)),
            ("opt_recommended_rate_bpd", json!(0)),
            ("opt_potential_gain_bpd", json!(0)),
            ("opt_potential_gain_percent", json!(0)),
            ("opt_recommended_action", json!("")),
            ("opt_efficiency_percent", json!(0)),
            ("opt_specific_energy_kwh_bbl", json!(0)),
            ("opt_well_health_score", json!(0)),
            ("opt_status", json!("")),
            ("opt_decline_rate_monthly_percent", json!(0)),
            ("opt_cluster_id", json!("")),
            ("opt_similar_wells", json!("")),
        ];
        for (key, value) in entries {
            attrs.insert(key.to_string(), value);
        }

        attrs.extend(self.reservoir.attributes());
        self.lift.attributes(&mut attrs);
        attrs
    }

    pub fn device_type(&self) -> &'static str {
        self.lift_type().device_type()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::models::reservoir::ReservoirParams;
    use chrono::TimeZone;

    pub fn sim_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 10, 30, 0).unwrap()
    }

    pub fn well_with(lift: LiftEquipment, seed: u64) -> WellModel {
        let params = ReservoirParams {
            initial_pressure_psi: 2800.0,
            bubble_point_psi: 1800.0,
            ipr_qmax_bpd: 1500.0,
            water_cut_initial: 0.3,
            ..ReservoirParams::default()
        };
        let reservoir = ReservoirModel::new(params, seed + 1).unwrap();
        let fluid = FluidModel {
            api_gravity: 25.0,
            bubble_point_psi: 1800.0,
            ..FluidModel::default()
        };
        WellModel::new(
            WellIdentity::new("LM-TST-001", "Lago de Maracaibo", "MAC-TST-01"),
            WellGeometry::default(),
            reservoir,
            fluid,
            lift,
            seed,
        )
        .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    fn esp_well() -> WellModel {
        well_with(LiftEquipment::Esp(EspEquipment::default()), 42)
    }

    #[test]
    fn test_lift_type_strings() {
        assert_eq!(LiftType::GasLift.as_str(), "gas_lift");
        assert_eq!("gas_lift".parse::<LiftType>().unwrap(), LiftType::GasLift);
        assert_eq!("ESP".parse::<LiftType>().unwrap(), LiftType::Esp);
        assert!("plunger".parse::<LiftType>().is_err());
        assert_eq!(serde_json::to_string(&LiftType::Pcp).unwrap(), "\"PCP\"");
    }

    #[test]
    fn test_device_types() {
        let types: Vec<_> = LiftType::ALL.iter().map(|t| t.device_type()).collect();
        assert_eq!(types, vec!["rtu_esp", "rtu_srp", "rtu_gaslift", "rtu_pcp"]);
    }

    #[test]
    fn test_pdvsa_code() {
        let id = WellIdentity::new("LM-EST01-003", "lago de maracaibo", "MAC-EST-01");
        assert_eq!(id.pdvsa_code(), "PDVSA-LAG-LM-EST01-003");
    }

    #[test]
    fn test_geometry_validation() {
        assert!(WellGeometry::default().validate().is_ok());
        let bad = WellGeometry {
            tubing_id_in: 3.0,
            ..WellGeometry::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_pwf_hydrostatic() {
        let well = esp_well();
        let gradient = well.fluid().fluid_gradient(0.3);
        let expected = gradient * 1000.0 + 50.0;
        assert!((well.calculate_pwf() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_shut_in_reports_zero_flow() {
        let mut well = esp_well();
        for status in [WellStatus::ShutIn, WellStatus::Workover] {
            well.set_status(status);
            let t = well.step(1.0 / 24.0, sim_time());
            assert_eq!(t.get("flow_rate_bpd"), Some(0.0));
            assert!(t.get("thp_psi").unwrap() > 0.0);
            assert!(!t.contains_key("motor_current_a"));
        }
    }

    #[test]
    fn test_shut_in_does_not_deplete() {
        let mut well = esp_well();
        well.set_status(WellStatus::ShutIn);
        let p0 = well.reservoir().current_pressure_psi();
        for _ in 0..10 {
            well.step(1.0, sim_time());
        }
        assert_eq!(well.reservoir().current_pressure_psi(), p0);
        assert_eq!(well.counters().cumulative_oil_stb, 0.0);
    }

    #[test]
    fn test_starting_settles_to_producing() {
        let mut well = esp_well();
        well.set_status(WellStatus::Starting);
        let t = well.step(1.0 / 24.0, sim_time());
        assert_eq!(t.get("flow_rate_bpd"), Some(0.0));
        assert_eq!(well.status(), WellStatus::Producing);

        well.set_status(WellStatus::Stopping);
        well.step(1.0 / 24.0, sim_time());
        assert_eq!(well.status(), WellStatus::ShutIn);
    }

    #[test]
    fn test_producing_step_accumulates() {
        let mut well = esp_well();
        let t = well.step(1.0, sim_time());
        assert!(t.get("flow_rate_bpd").unwrap() > 0.0);
        let c = well.counters();
        assert!(c.cumulative_oil_stb > 0.0);
        assert!(c.cumulative_water_stb > 0.0);
        assert!(c.cumulative_gas_mscf > 0.0);
        assert_eq!(c.days_on_production, 1.0);
    }

    #[test]
    fn test_modifiers_consumed_each_step() {
        let mut well = esp_well();
        well.modifiers_mut().hydraulic.efficiency = 0.5;
        well.step(1.0 / 24.0, sim_time());
        assert!(well.modifiers().is_neutral());
    }

    #[test]
    fn test_stuck_sensor_repeats_reading() {
        let mut well = esp_well();
        let first = well.step(1.0 / 24.0, sim_time()).get("flow_rate_bpd").unwrap();
        for _ in 0..5 {
            well.modifiers_mut().sensor.stuck = true;
            let t = well.step(1.0 / 24.0, sim_time());
            assert_eq!(t.get("flow_rate_bpd"), Some(first));
        }
    }

    #[test]
    fn test_static_attributes() {
        let well = esp_well();
        let attrs = well.static_attributes();
        assert_eq!(attrs["well_code_pdvsa"], "PDVSA-LAG-LM-TST-001");
        assert_eq!(attrs["lift_type"], "ESP");
        assert_eq!(attrs["lifting_type"], "ESP");
        assert_eq!(attrs["status"], "producing");
        assert_eq!(attrs["opt_cluster_id"], "");
        assert!(attrs.contains_key("drive_mechanism"));
        assert!(attrs.contains_key("esp_motor_hp"));
        assert_eq!(well.device_type(), "rtu_esp");
    }

    #[test]
    fn test_same_seed_same_telemetry() {
        let mut a = esp_well();
        let mut b = esp_well();
        for _ in 0..48 {
            let ta = serde_json::to_string(&a.step(1.0 / 48.0, sim_time())).unwrap();
            let tb = serde_json::to_string(&b.step(1.0 / 48.0, sim_time())).unwrap();
            assert_eq!(ta, tb);
        }
    }
}
