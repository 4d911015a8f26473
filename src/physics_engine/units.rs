//! Oilfield unit conversions and small shared formulas

/// Hydrostatic gradient of fresh water (psi/ft per unit specific gravity)
pub const PSI_PER_FT_WATER: f64 = 0.433;

/// Horsepower to kilowatts
pub const KW_PER_HP: f64 = 0.7457;

/// Stock-tank oil specific gravity from API gravity
///
/// SG = 141.5 / (API + 131.5)
pub fn api_to_sg(api: f64) -> f64 {
    141.5 / (api + 131.5)
}

/// API gravity from stock-tank oil specific gravity
pub fn sg_to_api(sg: f64) -> f64 {
    if sg <= 0.0 {
        return 0.0;
    }
    141.5 / sg - 131.5
}

pub fn hp_to_kw(hp: f64) -> f64 {
    hp * KW_PER_HP
}

pub fn kw_to_hp(kw: f64) -> f64 {
    kw / KW_PER_HP
}

/// Pump hydraulic horsepower
///
/// HHP = Q (bpd) × ΔP (psi) / 136,048
pub fn pump_hydraulic_hp(rate_bpd: f64, delta_p_psi: f64) -> f64 {
    rate_bpd * delta_p_psi / 136_048.0
}

/// Three-phase electrical power (kW)
///
/// P = V × I × √3 × PF / 1000
pub fn three_phase_power_kw(voltage_v: f64, current_a: f64, power_factor: f64) -> f64 {
    voltage_v * current_a * 3.0_f64.sqrt() * power_factor / 1000.0
}

/// Specific energy of production (kWh per barrel)
pub fn specific_energy_kwh_bbl(power_kw: f64, rate_bpd: f64) -> f64 {
    if rate_bpd <= 0.0 {
        return 0.0;
    }
    power_kw * 24.0 / rate_bpd
}

/// Hydrostatic pressure of a fluid column (psi)
pub fn hydrostatic_pressure_psi(gradient_psi_ft: f64, height_ft: f64) -> f64 {
    gradient_psi_ft * height_ft
}

/// Round to a fixed number of decimals for telemetry output
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}
