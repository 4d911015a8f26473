//! PVT and inflow correlations
//!
//! Closed-form black-oil correlations used by the fluid and reservoir models.
//! Units are oilfield units throughout: psia, °F, scf/STB, cp, bpd.
//!
//! Every correlation clamps its output to a physical range so that extreme
//! inputs degrade into plausible values instead of NaN telemetry.

use super::units::{api_to_sg, PSI_PER_FT_WATER};

/// Atmospheric pressure floor for bubble point and solution GOR (psia)
pub const ATMOSPHERIC_PSI: f64 = 14.7;

/// Minimum oil viscosity returned by the Beggs-Robinson correlations (cp)
pub const MIN_OIL_VISCOSITY_CP: f64 = 0.1;

/// Z-factor clamp range
pub const Z_FACTOR_MIN: f64 = 0.3;
pub const Z_FACTOR_MAX: f64 = 1.5;

/// Default produced-water salinity (ppm NaCl)
pub const DEFAULT_SALINITY_PPM: f64 = 30_000.0;

// ============================================================================
// Standing (1947)
// ============================================================================

/// Standing bubble point pressure (psia)
///
/// a = 0.00091·T − 0.0125·API
/// Pb = 18.2 · ((Rs / γg)^0.83 · 10^a − 1.4)
///
/// Returns 0 for a dead oil (GOR ≤ 0), otherwise at least atmospheric.
pub fn standing_bubble_point(temperature_f: f64, api: f64, gor_scf_stb: f64, gas_sg: f64) -> f64 {
    if gor_scf_stb <= 0.0 || gas_sg <= 0.0 {
        return 0.0;
    }
    let a = 0.00091 * temperature_f - 0.0125 * api;
    let pb = 18.2 * ((gor_scf_stb / gas_sg).powf(0.83) * 10_f64.powf(a) - 1.4);
    pb.max(ATMOSPHERIC_PSI)
}

/// Standing solution gas-oil ratio at a pressure below the bubble point (scf/STB)
///
/// Rs = γg · ((P / 18.2 + 1.4) · 10^(−a))^1.2048
pub fn standing_solution_gor(pressure_psi: f64, temperature_f: f64, api: f64, gas_sg: f64) -> f64 {
    if pressure_psi <= ATMOSPHERIC_PSI {
        return 0.0;
    }
    let a = 0.00091 * temperature_f - 0.0125 * api;
    let rs = gas_sg * ((pressure_psi / 18.2 + 1.4) * 10_f64.powf(-a)).powf(1.2048);
    rs.max(0.0)
}

/// Standing oil formation volume factor (rb/STB)
///
/// F = Rs · (γg / γo)^0.5 + 1.25·T
/// Bo = 0.9759 + 0.00012 · F^1.2
pub fn standing_oil_fvf(gor_scf_stb: f64, gas_sg: f64, api: f64, temperature_f: f64) -> f64 {
    let oil_sg = api_to_sg(api);
    let f = gor_scf_stb.max(0.0) * (gas_sg.max(0.0) / oil_sg).sqrt() + 1.25 * temperature_f;
    let bo = 0.9759 + 0.00012 * f.max(0.0).powf(1.2);
    bo.max(1.0)
}

// ============================================================================
// Beggs-Robinson (1975)
// ============================================================================

/// Beggs-Robinson dead oil viscosity (cp)
///
/// z = 3.0324 − 0.02023·API
/// x = 10^z · T^−1.163
/// μod = 10^x − 1
pub fn beggs_robinson_dead_oil(api: f64, temperature_f: f64) -> f64 {
    let z = 3.0324 - 0.02023 * api;
    let y = 10_f64.powf(z);
    let x = y * temperature_f.max(1.0).powf(-1.163);
    let mu = 10_f64.powf(x) - 1.0;
    if mu.is_nan() {
        return MIN_OIL_VISCOSITY_CP;
    }
    mu.max(MIN_OIL_VISCOSITY_CP)
}

/// Beggs-Robinson live (gas-saturated) oil viscosity (cp)
///
/// A = 10.715 · (Rs + 100)^−0.515
/// B = 5.44 · (Rs + 150)^−0.338
/// μo = A · μod^B
pub fn beggs_robinson_live_oil(dead_oil_viscosity_cp: f64, solution_gor: f64) -> f64 {
    if solution_gor <= 0.0 {
        return dead_oil_viscosity_cp;
    }
    let a = 10.715 * (solution_gor + 100.0).powf(-0.515);
    let b = 5.44 * (solution_gor + 150.0).powf(-0.338);
    (a * dead_oil_viscosity_cp.powf(b)).max(MIN_OIL_VISCOSITY_CP)
}

// ============================================================================
// Gas and water
// ============================================================================

/// Simplified Brill-Beggs gas compressibility factor
///
/// Pseudo-criticals from Standing's gas-gravity fit, then
/// Z = A + (1 − A)·e^(−B) + 0.132, clamped to [0.3, 1.5].
pub fn gas_z_factor(pressure_psi: f64, temperature_f: f64, gas_sg: f64) -> f64 {
    let tpc = 168.0 + 325.0 * gas_sg - 12.5 * gas_sg * gas_sg;
    let ppc = 677.0 + 15.0 * gas_sg - 37.5 * gas_sg * gas_sg;
    if tpc <= 0.0 || ppc <= 0.0 {
        return 1.0;
    }
    let tpr = (temperature_f + 460.0) / tpc;
    let ppr = pressure_psi / ppc;

    let a = 1.39 * (tpr - 0.92).max(0.0).sqrt() - 0.36 * tpr - 0.101;
    let b = (0.62 - 0.23 * tpr) * ppr;
    let c = (0.066 / (tpr - 0.86) - 0.037) * ppr.powi(2);
    let d = (0.32 / 10_f64.powf(9.0 * (tpr - 1.0))) * ppr.powi(6);
    let e = b + c + d;

    let z = a + (1.0 - a) * (-e).exp() + 0.132;
    if !z.is_finite() {
        return 1.0;
    }
    z.clamp(Z_FACTOR_MIN, Z_FACTOR_MAX)
}

/// Produced water density (ppg) corrected for salinity and temperature
///
/// ρw = 8.34 · (1 + 3.6e-6·S) · (1 − 3.6e-4·(T − 60))
pub fn water_density_ppg(temperature_f: f64, salinity_ppm: f64) -> f64 {
    let rho = 8.34 * (1.0 + 3.6e-6 * salinity_ppm) * (1.0 - 3.6e-4 * (temperature_f - 60.0));
    rho.max(8.0)
}

/// Mixed liquid gradient (psi/ft) by linear volume-fraction mixing
///
/// grad = (γo·(1 − wc) + γw·wc) · 0.433
pub fn fluid_gradient(api: f64, water_cut: f64, water_sg: f64) -> f64 {
    let oil_sg = api_to_sg(api);
    let wc = water_cut.clamp(0.0, 1.0);
    (wc * water_sg + (1.0 - wc) * oil_sg) * PSI_PER_FT_WATER
}

// ============================================================================
// Inflow performance
// ============================================================================

/// Vogel (1968) IPR for solution-gas drive below the bubble point
///
/// q = qmax · (1 − 0.2·(Pwf/Pr) − 0.8·(Pwf/Pr)²)
pub fn vogel_ipr(reservoir_pressure_psi: f64, qmax_bpd: f64, pwf_psi: f64) -> f64 {
    if reservoir_pressure_psi <= 0.0 || pwf_psi >= reservoir_pressure_psi {
        return 0.0;
    }
    let ratio = pwf_psi.max(0.0) / reservoir_pressure_psi;
    (qmax_bpd * (1.0 - 0.2 * ratio - 0.8 * ratio * ratio)).max(0.0)
}

/// Straight-line productivity index from a single well test (bpd/psi)
pub fn productivity_index(rate_bpd: f64, reservoir_pressure_psi: f64, pwf_psi: f64) -> f64 {
    let drawdown = reservoir_pressure_psi - pwf_psi;
    if drawdown <= 0.0 {
        return 0.0;
    }
    rate_bpd / drawdown
}
