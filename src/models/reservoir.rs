//! Reservoir inflow and depletion
//!
//! One drainage volume per well: inflow performance (Vogel below the bubble
//! point, straight-line PI otherwise), material-balance-style pressure
//! depletion driven by recovery factor, and a drive-dependent water-cut rise.
//!
//! The step path never fails. Degenerate inputs produce zero flow or the
//! 100 psi pressure floor.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::telemetry::Attributes;
use super::{ensure, ModelError};
use crate::physics_engine::correlations;
use crate::physics_engine::units::round_to;

/// Abandonment floor for average reservoir pressure (psi)
pub const MIN_RESERVOIR_PRESSURE_PSI: f64 = 100.0;

/// Water cut ceiling (fraction)
pub const MAX_WATER_CUT: f64 = 0.98;

/// Relative jitter on the daily water-cut rise
const WATER_CUT_JITTER: f64 = 0.1;

// ============================================================================
// Regimes
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriveMechanism {
    SolutionGas,
    WaterDrive,
    GasCap,
}

impl DriveMechanism {
    /// k in `P = Pi · (1 − k·RF)`; stronger support depletes slower
    pub fn depletion_coefficient(self) -> f64 {
        match self {
            Self::WaterDrive => 0.3,
            Self::GasCap => 0.5,
            Self::SolutionGas => 0.7,
        }
    }

    /// Mean water-cut rise per day (fraction)
    pub fn daily_water_cut_rise(self) -> f64 {
        match self {
            Self::WaterDrive => 0.0003,
            Self::GasCap => 0.0002,
            Self::SolutionGas => 0.000_15,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SolutionGas => "solution_gas",
            Self::WaterDrive => "water_drive",
            Self::GasCap => "gas_cap",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IprModel {
    Vogel,
    Darcy,
}

impl IprModel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vogel => "vogel",
            Self::Darcy => "darcy",
        }
    }
}

// ============================================================================
// Construction parameters
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservoirParams {
    pub initial_pressure_psi: f64,
    pub temperature_f: f64,
    pub bubble_point_psi: f64,
    pub api_gravity: f64,
    pub gor_scf_stb: f64,
    pub water_cut_initial: f64,
    /// Straight-line J (bpd/psi); estimated from qmax when absent
    pub productivity_index: Option<f64>,
    /// Absolute open-flow potential (bpd)
    pub ipr_qmax_bpd: f64,
    pub ipr_model: IprModel,
    pub drive_mechanism: DriveMechanism,
    pub ooip_stb: f64,
    /// Fetkovich back-pressure coefficients, reported only when c > 0
    pub fetkovich_c: f64,
    pub fetkovich_n: f64,
    pub gas_gravity: f64,
    pub water_gravity: f64,
}

impl Default for ReservoirParams {
    fn default() -> Self {
        Self {
            initial_pressure_psi: 2500.0,
            temperature_f: 180.0,
            bubble_point_psi: 1500.0,
            api_gravity: 25.0,
            gor_scf_stb: 200.0,
            water_cut_initial: 0.3,
            productivity_index: None,
            ipr_qmax_bpd: 1500.0,
            ipr_model: IprModel::Vogel,
            drive_mechanism: DriveMechanism::SolutionGas,
            ooip_stb: 500_000.0,
            fetkovich_c: 0.0,
            fetkovich_n: 0.85,
            gas_gravity: 0.75,
            water_gravity: 1.05,
        }
    }
}

impl ReservoirParams {
    pub fn validate(&self) -> Result<(), ModelError> {
        ensure(
            self.initial_pressure_psi >= MIN_RESERVOIR_PRESSURE_PSI,
            "initial_pressure_psi",
            self.initial_pressure_psi,
            "must be at least the 100 psi abandonment pressure",
        )?;
        ensure(self.ipr_qmax_bpd > 0.0, "ipr_qmax_bpd", self.ipr_qmax_bpd, "must be positive")?;
        ensure(self.ooip_stb > 0.0, "ooip_stb", self.ooip_stb, "must be positive")?;
        ensure(
            (0.0..=MAX_WATER_CUT).contains(&self.water_cut_initial),
            "water_cut_initial",
            self.water_cut_initial,
            "must be within [0, 0.98]",
        )?;
        ensure(self.api_gravity > 0.0, "api_gravity", self.api_gravity, "must be positive")?;
        ensure(self.gor_scf_stb >= 0.0, "gor_scf_stb", self.gor_scf_stb, "must not be negative")?;
        ensure(
            self.bubble_point_psi >= 0.0,
            "bubble_point_psi",
            self.bubble_point_psi,
            "must not be negative",
        )?;
        ensure(self.temperature_f.is_finite(), "temperature_f", self.temperature_f, "must be finite")?;
        if let Some(pi) = self.productivity_index {
            ensure(pi > 0.0, "productivity_index", pi, "must be positive")?;
        }
        Ok(())
    }
}

// ============================================================================
// Model
// ============================================================================

/// Rates and state after one reservoir step
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReservoirState {
    pub flow_rate_bpd: f64,
    pub oil_rate_bpd: f64,
    pub water_rate_bpd: f64,
    pub water_cut_pct: f64,
    pub reservoir_pressure_psi: f64,
    pub gor_scf_stb: f64,
}

pub struct ReservoirModel {
    params: ReservoirParams,
    current_pressure_psi: f64,
    water_cut: f64,
    cumulative_oil_stb: f64,
    rng: StdRng,
}

impl ReservoirModel {
    pub fn new(params: ReservoirParams, seed: u64) -> Result<Self, ModelError> {
        params.validate()?;
        Ok(Self {
            current_pressure_psi: params.initial_pressure_psi,
            water_cut: params.water_cut_initial,
            cumulative_oil_stb: 0.0,
            params,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn params(&self) -> &ReservoirParams {
        &self.params
    }

    pub fn current_pressure_psi(&self) -> f64 {
        self.current_pressure_psi
    }

    pub fn initial_pressure_psi(&self) -> f64 {
        self.params.initial_pressure_psi
    }

    pub fn temperature_f(&self) -> f64 {
        self.params.temperature_f
    }

    pub fn bubble_point_psi(&self) -> f64 {
        self.params.bubble_point_psi
    }

    pub fn water_cut(&self) -> f64 {
        self.water_cut
    }

    pub fn cumulative_oil_stb(&self) -> f64 {
        self.cumulative_oil_stb
    }

    pub fn recovery_factor(&self) -> f64 {
        self.cumulative_oil_stb / self.params.ooip_stb
    }

    /// Override water cut (scenario or anomaly), clamped to [0, 0.98]
    pub fn set_water_cut(&mut self, water_cut: f64) {
        if water_cut.is_finite() {
            self.water_cut = water_cut.clamp(0.0, MAX_WATER_CUT);
        }
    }

    /// Liquid inflow (bpd) at flowing bottom-hole pressure `pwf_psi`
    pub fn flow_rate_bpd(&self, pwf_psi: f64) -> f64 {
        let pr = self.current_pressure_psi;
        if pwf_psi >= pr || pr <= 0.0 {
            return 0.0;
        }

        let q_liquid = if self.params.ipr_model == IprModel::Vogel && pr <= self.params.bubble_point_psi {
            correlations::vogel_ipr(pr, self.params.ipr_qmax_bpd, pwf_psi)
        } else {
            let j = self
                .params
                .productivity_index
                .unwrap_or_else(|| self.estimate_productivity_index());
            j * (pr - pwf_psi)
        };
        q_liquid.max(0.0)
    }

    pub fn oil_rate_bpd(&self, pwf_psi: f64) -> f64 {
        self.flow_rate_bpd(pwf_psi) * (1.0 - self.water_cut)
    }

    pub fn water_rate_bpd(&self, pwf_psi: f64) -> f64 {
        self.flow_rate_bpd(pwf_psi) * self.water_cut
    }

    /// Deplete pressure by recovery factor: `P = max(Pi · (1 − k·RF), 100)`
    pub fn update_pressure(&mut self, oil_produced_stb: f64, _dt_days: f64) {
        self.cumulative_oil_stb += oil_produced_stb.max(0.0);
        let factor = 1.0 - self.params.drive_mechanism.depletion_coefficient() * self.recovery_factor();
        self.current_pressure_psi =
            (self.params.initial_pressure_psi * factor).max(MIN_RESERVOIR_PRESSURE_PSI);
    }

    /// Drive-dependent water-cut rise with ±10 % jitter, capped at 0.98
    pub fn update_water_cut(&mut self, dt_days: f64) {
        let jitter = Normal::new(0.0, WATER_CUT_JITTER)
            .map(|n| n.sample(&mut self.rng))
            .unwrap_or(0.0);
        let daily = (self.params.drive_mechanism.daily_water_cut_rise() * (1.0 + jitter)).max(0.0);
        self.water_cut = (self.water_cut + daily * dt_days.max(0.0)).min(MAX_WATER_CUT);
    }

    /// Produce for `dt_days` against `pwf_psi` and advance depletion
    pub fn step(&mut self, pwf_psi: f64, dt_days: f64) -> ReservoirState {
        let q_liquid = self.flow_rate_bpd(pwf_psi);
        let q_oil = q_liquid * (1.0 - self.water_cut);
        let q_water = q_liquid * self.water_cut;

        self.update_pressure(q_oil * dt_days.max(0.0), dt_days);
        self.update_water_cut(dt_days);

        ReservoirState {
            flow_rate_bpd: q_liquid,
            oil_rate_bpd: q_oil,
            water_rate_bpd: q_water,
            water_cut_pct: self.water_cut * 100.0,
            reservoir_pressure_psi: self.current_pressure_psi,
            gor_scf_stb: self.current_gor(),
        }
    }

    /// Producing GOR; free gas lifts it by up to 2.5× as pressure falls below Pb
    pub fn current_gor(&self) -> f64 {
        let pb = self.params.bubble_point_psi;
        if self.current_pressure_psi >= pb || pb <= 0.0 {
            return self.params.gor_scf_stb;
        }
        let pressure_ratio = self.current_pressure_psi / pb;
        self.params.gor_scf_stb * (1.0 + 1.5 * (1.0 - pressure_ratio))
    }

    fn estimate_productivity_index(&self) -> f64 {
        if self.params.ipr_qmax_bpd > 0.0 && self.current_pressure_psi > 0.0 {
            self.params.ipr_qmax_bpd / self.current_pressure_psi
        } else {
            1.0
        }
    }

    pub fn attributes(&self) -> Attributes {
        let p = &self.params;
        let mut attrs = Attributes::new();
        let mut put = |k: &str, v: serde_json::Value| {
            attrs.insert(k.to_string(), v);
        };
        put("reservoir_pressure_psi", json!(p.initial_pressure_psi));
        put("reservoir_temperature_f", json!(p.temperature_f));
        put("bubble_point_psi", json!(p.bubble_point_psi));
        put("api_gravity", json!(p.api_gravity));
        put("gor_scf_stb", json!(p.gor_scf_stb));
        put("water_cut_initial_pct", json!(round_to(p.water_cut_initial * 100.0, 1)));
        put(
            "oil_viscosity_cp",
            json!(correlations::beggs_robinson_dead_oil(p.api_gravity, p.temperature_f)),
        );
        put(
            "bo_factor",
            json!(correlations::standing_oil_fvf(p.gor_scf_stb, p.gas_gravity, p.api_gravity, p.temperature_f)),
        );
        put(
            "productivity_index_bpd_psi",
            json!(p.productivity_index.unwrap_or_else(|| self.estimate_productivity_index())),
        );
        put("ipr_model", json!(p.ipr_model.as_str()));
        put("ipr_qmax_bpd", json!(p.ipr_qmax_bpd));
        put("drive_mechanism", json!(p.drive_mechanism.as_str()));
        put("gas_gravity", json!(p.gas_gravity));
        put("water_gravity", json!(p.water_gravity));
        put("ooip_stb", json!(p.ooip_stb));
        if p.fetkovich_c > 0.0 {
            put("fetkovich_c", json!(p.fetkovich_c));
            put("fetkovich_n", json!(p.fetkovich_n));
        }
        attrs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reservoir(params: ReservoirParams) -> ReservoirModel {
        ReservoirModel::new(params, 11).unwrap()
    }

    #[test]
    fn test_rejects_bad_construction() {
        let bad_qmax = ReservoirParams { ipr_qmax_bpd: 0.0, ..ReservoirParams::default() };
        assert!(ReservoirModel::new(bad_qmax, 1).is_err());
        let bad_wc = ReservoirParams { water_cut_initial: 0.99, ..ReservoirParams::default() };
        assert!(ReservoirModel::new(bad_wc, 1).is_err());
        let bad_p = ReservoirParams { initial_pressure_psi: 50.0, ..ReservoirParams::default() };
        assert!(ReservoirModel::new(bad_p, 1).is_err());
        let bad_pi = ReservoirParams { productivity_index: Some(-1.0), ..ReservoirParams::default() };
        assert!(ReservoirModel::new(bad_pi, 1).is_err());
    }

    #[test]
    fn test_no_flow_at_or_above_reservoir_pressure() {
        let r = reservoir(ReservoirParams::default());
        assert_eq!(r.flow_rate_bpd(2500.0), 0.0);
        assert_eq!(r.flow_rate_bpd(3000.0), 0.0);
    }

    #[test]
    fn test_vogel_used_below_bubble_point() {
        let r = reservoir(ReservoirParams {
            initial_pressure_psi: 1400.0,
            bubble_point_psi: 1500.0,
            ipr_qmax_bpd: 1000.0,
            ..ReservoirParams::default()
        });
        assert!((r.flow_rate_bpd(0.0) - 1000.0).abs() < 1e-9);
        assert!((r.flow_rate_bpd(700.0) - 700.0).abs() < 1e-9);
    }

    #[test]
    fn test_straight_line_pi_above_bubble_point() {
        let r = reservoir(ReservoirParams {
            initial_pressure_psi: 2000.0,
            bubble_point_psi: 1500.0,
            ipr_qmax_bpd: 1000.0,
            ..ReservoirParams::default()
        });
        // J = qmax / pr = 0.5 bpd/psi
        assert!((r.flow_rate_bpd(1000.0) - 500.0).abs() < 1e-9);

        let explicit = reservoir(ReservoirParams {
            productivity_index: Some(2.0),
            ipr_model: IprModel::Darcy,
            ..ReservoirParams::default()
        });
        assert!((explicit.flow_rate_bpd(2400.0) - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_oil_water_split() {
        let r = reservoir(ReservoirParams { water_cut_initial: 0.25, ..ReservoirParams::default() });
        let q = r.flow_rate_bpd(1000.0);
        assert!((r.oil_rate_bpd(1000.0) - 0.75 * q).abs() < 1e-9);
        assert!((r.water_rate_bpd(1000.0) - 0.25 * q).abs() < 1e-9);
    }

    #[test]
    fn test_depletion_by_drive_mechanism() {
        let mut pressures = Vec::new();
        for drive in [DriveMechanism::WaterDrive, DriveMechanism::GasCap, DriveMechanism::SolutionGas] {
            let mut r = reservoir(ReservoirParams { drive_mechanism: drive, ..ReservoirParams::default() });
            r.update_pressure(50_000.0, 1.0);
            pressures.push(r.current_pressure_psi());
        }
        // RF = 0.1: 2500·0.97, 2500·0.95, 2500·0.93
        assert!((pressures[0] - 2425.0).abs() < 1e-9);
        assert!((pressures[1] - 2375.0).abs() < 1e-9);
        assert!((pressures[2] - 2325.0).abs() < 1e-9);
    }

    #[test]
    fn test_pressure_floor() {
        let mut r = reservoir(ReservoirParams::default());
        r.update_pressure(10_000_000.0, 1.0);
        assert_eq!(r.current_pressure_psi(), MIN_RESERVOIR_PRESSURE_PSI);
    }

    #[test]
    fn test_water_cut_cap() {
        let mut r = reservoir(ReservoirParams { water_cut_initial: 0.97, ..ReservoirParams::default() });
        r.update_water_cut(1000.0);
        assert_eq!(r.water_cut(), MAX_WATER_CUT);
        r.set_water_cut(1.5);
        assert_eq!(r.water_cut(), MAX_WATER_CUT);
    }

    #[test]
    fn test_gor_rises_below_bubble_point() {
        let mut r = reservoir(ReservoirParams {
            initial_pressure_psi: 2000.0,
            bubble_point_psi: 2000.0,
            gor_scf_stb: 300.0,
            ..ReservoirParams::default()
        });
        assert_eq!(r.current_gor(), 300.0);
        // Deplete to half of Pb: 300 · (1 + 1.5·0.5)
        r.update_pressure(0.5 / 0.7 * 500_000.0, 1.0);
        assert!((r.current_gor() - 525.0).abs() < 1e-6, "gor = {}", r.current_gor());
    }

    #[test]
    fn test_step_reports_state() {
        let mut r = reservoir(ReservoirParams::default());
        let state = r.step(1200.0, 1.0);
        assert!(state.flow_rate_bpd > 0.0);
        assert!((state.oil_rate_bpd + state.water_rate_bpd - state.flow_rate_bpd).abs() < 1e-9);
        assert!(state.reservoir_pressure_psi < 2500.0);
        assert!(r.cumulative_oil_stb() > 0.0);
    }

    #[test]
    fn test_attributes_fetkovich_only_when_set() {
        let r = reservoir(ReservoirParams::default());
        assert!(!r.attributes().contains_key("fetkovich_c"));
        let f = reservoir(ReservoirParams { fetkovich_c: 0.002, ..ReservoirParams::default() });
        let attrs = f.attributes();
        assert!(attrs.contains_key("fetkovich_c"));
        assert_eq!(attrs["drive_mechanism"], "solution_gas");
        assert_eq!(attrs["water_cut_initial_pct"], 30.0);
    }
}
