//! Config Loading Tests
//!
//! File loading, lookup order, typo detection and validation of the
//! simulation config, exercised through the public API only.

use std::io::Write;

use oilfield_sim::config::defaults::CONFIG_ENV_VAR;
use oilfield_sim::config::validation::{validate_physical_ranges, validate_unknown_keys};
use oilfield_sim::{AnomalyType, ConfigError, FieldSimulation, LiftType, SimulationConfig};

fn write_temp(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

const BOSCAN: &str = r#"
[simulation]
seed = 7
days = 3
samples_per_day = 24

[anomalies]
enabled = true
probability_per_well_per_day = 0.1
types = ["pump_degradation", "stuck_sensor"]

[[fields]]
name = "Campo Boscan"
template = "lago_maracaibo"
num_macollas = 2
wells_per_macolla = [3, 2]

[fields.lift_distribution]
ESP = 0.5
SRP = 0.5

[fields.reservoir]
pressure_psi = [1800.0, 2600.0]
temperature_f = [150.0, 190.0]
api_gravity = [10.0, 14.0]
water_cut = [0.2, 0.5]
gor_scf_stb = [80.0, 200.0]

[fields.production]
avg_rate_bpd = [150.0, 400.0]
"#;

// ============================================================================
// Loading
// ============================================================================

#[test]
fn loads_full_file_with_aliases() {
    let file = write_temp(BOSCAN);
    let config = SimulationConfig::load_from_file(file.path()).unwrap();

    assert_eq!(config.simulation.seed, 7);
    assert_eq!(config.simulation.samples_per_day, 24);
    assert_eq!(
        config.anomalies.enabled_types(),
        vec![AnomalyType::PumpDegradation, AnomalyType::StuckSensor]
    );
    let field = &config.fields[0];
    assert_eq!(field.num_pads, 2);
    assert_eq!(field.wells_per_pad, vec![3, 2]);
    assert_eq!(
        field.lift_fractions().unwrap(),
        vec![(LiftType::Esp, 0.5), (LiftType::Srp, 0.5)]
    );
}

#[test]
fn loaded_file_builds_expected_layout() {
    let file = write_temp(BOSCAN);
    let config = SimulationConfig::load_from_file(file.path()).unwrap();
    let sim = FieldSimulation::from_config(&config).unwrap();

    assert_eq!(sim.well_count(), 5);
    let summary = &sim.field_summaries()[0];
    assert_eq!(summary.pads[0].name, "MAC-BOS-01");
    assert_eq!(summary.pads[1].num_wells, 2);
    assert!(sim
        .wells()
        .all(|w| matches!(w.lift_type(), LiftType::Esp | LiftType::Srp)));
    assert!(sim.injector().is_some());
}

#[test]
fn missing_file_is_io_error() {
    let err = SimulationConfig::load_from_file(std::path::Path::new("/nonexistent/sim.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(..)));
}

#[test]
fn malformed_toml_is_parse_error() {
    let file = write_temp("[simulation\nseed = ");
    let err = SimulationConfig::load_from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(..)));
    assert!(err.to_string().contains("parse error"));
}

#[test]
fn env_var_takes_precedence_over_defaults() {
    let file = write_temp(BOSCAN);
    std::env::set_var(CONFIG_ENV_VAR, file.path());
    let config = SimulationConfig::load();
    std::env::remove_var(CONFIG_ENV_VAR);

    assert_eq!(config.fields.len(), 1);
    assert_eq!(config.fields[0].name, "Campo Boscan");
}

#[test]
fn saved_config_loads_back_identically() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sim_config.toml");
    let config = SimulationConfig::default();
    config.save_to_file(&path).unwrap();

    let reloaded = SimulationConfig::load_from_file(&path).unwrap();
    assert_eq!(reloaded, config);
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn every_problem_is_reported_at_once() {
    let file = write_temp(
        r#"
[simulation]
samples_per_day = 0

[[fields]]
name = "Campo Roto"
num_macollas = 0

[fields.reservoir]
pressure_psi = [3000.0, 1000.0]
water_cut = [0.1, 0.99]
"#,
    );
    let err = SimulationConfig::load_from_file(file.path()).unwrap_err();
    let ConfigError::Validation(errors) = err else {
        panic!("expected validation error, got {err}");
    };
    assert!(errors.len() >= 4, "errors: {errors:?}");
    assert!(errors.iter().any(|e| e.contains("samples_per_day")));
    assert!(errors.iter().any(|e| e.contains("num_pads")));
    assert!(errors.iter().any(|e| e.contains("pressure_psi")));
    assert!(errors.iter().any(|e| e.contains("water_cut")));
}

#[test]
fn unknown_lift_type_is_rejected() {
    let mut config = SimulationConfig::default();
    config.fields[0].lift_distribution.insert("jet_pump".to_string(), 0.2);
    let (errors, _) = validate_physical_ranges(&config);
    assert!(errors.iter().any(|e| e.contains("jet_pump")), "errors: {errors:?}");
}

#[test]
fn typo_warns_with_suggestion_but_still_loads() {
    let toml_str = r#"
[simulation]
sampels_per_day = 12
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].suggestion.as_deref(), Some("simulation.samples_per_day"));

    let file = write_temp(toml_str);
    let config = SimulationConfig::load_from_file(file.path()).unwrap();
    assert_eq!(config.simulation.samples_per_day, 48);
}

#[test]
fn lift_distribution_keys_are_free_form() {
    let warnings = validate_unknown_keys(BOSCAN);
    assert!(warnings.is_empty(), "warnings: {warnings:?}");
}
