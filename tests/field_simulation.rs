//! Field Simulation Tests
//!
//! Multi-day runs over the built-in fields, checking physical invariants
//! that must hold for every well on every tick.

use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};
use oilfield_sim::models::TelemetryValue;
use oilfield_sim::{
    FieldSimulation, LiftType, ScenarioKind, SimulationConfig, TelemetryRecord, WellStatus,
};

fn quiet_config() -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.simulation.start_time = Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
    config.anomalies.enabled = false;
    config
}

fn collect(sim: &mut FieldSimulation, days: u32, samples_per_day: u32) -> Vec<TelemetryRecord> {
    let mut records = Vec::new();
    sim.run_historical(days, samples_per_day, |r| {
        records.push(r.clone());
        Ok(())
    })
    .unwrap();
    records
}

// ============================================================================
// Layout
// ============================================================================

#[test]
fn default_fields_cover_every_lift_type() {
    let sim = FieldSimulation::from_config(&quiet_config()).unwrap();
    assert_eq!(sim.fields().len(), 2);
    assert_eq!(sim.well_count(), 16);

    let mut by_lift: BTreeMap<LiftType, usize> = BTreeMap::new();
    for well in sim.wells() {
        *by_lift.entry(well.lift_type()).or_default() += 1;
    }
    for lift in LiftType::ALL {
        assert!(by_lift.get(&lift).copied().unwrap_or(0) > 0, "no {lift} wells");
    }

    let cerro_negro = &sim.fields()[1];
    assert!(cerro_negro
        .wells()
        .all(|w| w.reservoir().params().drive_mechanism.as_str() == "solution_gas"));
}

#[test]
fn device_types_follow_lift_type() {
    let mut sim = FieldSimulation::from_config(&quiet_config()).unwrap();
    for record in sim.tick(1.0 / 48.0).unwrap() {
        let lift = sim.well(&record.well).unwrap().lift_type();
        assert_eq!(record.device_type, lift.device_type());
    }
}

// ============================================================================
// Physical invariants over a run
// ============================================================================

#[test]
fn reservoirs_deplete_and_water_cut_rises() {
    let mut sim = FieldSimulation::from_config(&quiet_config()).unwrap();
    let before: Vec<(f64, f64)> = sim
        .wells()
        .map(|w| (w.reservoir().current_pressure_psi(), w.reservoir().water_cut()))
        .collect();

    collect(&mut sim, 20, 4);

    for (well, (p0, wc0)) in sim.wells().zip(before) {
        let r = well.reservoir();
        assert!(r.current_pressure_psi() <= p0, "{} pressure rose", well.name());
        assert!(r.current_pressure_psi() >= 100.0);
        assert!(r.water_cut() >= wc0, "{} water cut fell", well.name());
        assert!(r.water_cut() <= 0.98);
        assert!(well.counters().cumulative_oil_stb > 0.0);
    }
}

#[test]
fn readings_stay_physical() {
    let mut config = quiet_config();
    config.anomalies.enabled = true;
    config.anomalies.probability_per_well_per_day = 0.3;
    let mut sim = FieldSimulation::from_config(&config).unwrap();

    for record in collect(&mut sim, 10, 12) {
        let v = &record.values;
        let flow = v.get("flow_rate_bpd").unwrap();
        assert!(flow.is_finite() && flow >= 0.0, "{}: flow {flow}", record.well);
        let wc = v.get("water_cut_pct").unwrap();
        assert!((0.0..=100.0).contains(&wc), "{}: water cut {wc}", record.well);
        for (key, value) in v.iter() {
            if let TelemetryValue::Number(x) = value {
                assert!(x.is_finite(), "{}: {key} = {x}", record.well);
            }
        }
    }
}

#[test]
fn srp_cards_are_published() {
    let mut sim = FieldSimulation::from_config(&quiet_config()).unwrap();
    let records = collect(&mut sim, 1, 48);
    let srp: Vec<_> = records.iter().filter(|r| r.device_type == "rtu_srp").collect();
    assert!(!srp.is_empty());
    assert!(srp.iter().any(|r| r.values.card("dynamo_card_surface").is_some()));
}

// ============================================================================
// Scenarios through the driver
// ============================================================================

#[test]
fn well_loading_kills_and_restarts_gas_lift_well() {
    let mut sim = FieldSimulation::from_config(&quiet_config()).unwrap();
    let gl = sim
        .wells()
        .find(|w| w.lift_type() == LiftType::GasLift)
        .map(|w| w.name().to_string())
        .unwrap();
    sim.bind_scenario(&gl, ScenarioKind::WellLoading).unwrap();

    let mut died = false;
    let mut restarted = false;
    for _ in 0..40 {
        let records = sim.tick(1.0).unwrap();
        let record = records.iter().find(|r| r.well == gl).unwrap();
        let event = record
            .scenarios
            .get("well_loading")
            .and_then(|s| s.get("well_loading_event"))
            .and_then(|e| e.as_str());
        match event {
            Some("well_died") => {
                died = true;
                assert_eq!(record.values.get("flow_rate_bpd"), Some(0.0));
            }
            Some("restart_attempt") => restarted = true,
            _ => {}
        }
    }
    assert!(died && restarted);
    assert_eq!(sim.well(&gl).unwrap().status(), WellStatus::Producing);
}

#[test]
fn water_breakthrough_drives_reported_water_cut() {
    let mut sim = FieldSimulation::from_config(&quiet_config()).unwrap();
    let well = sim.wells().next().map(|w| w.name().to_string()).unwrap();
    sim.bind_scenario(&well, ScenarioKind::WaterBreakthrough).unwrap();

    for _ in 0..30 {
        sim.tick(1.0).unwrap();
    }
    let wc = sim.well(&well).unwrap().reservoir().water_cut();
    assert!(wc >= 0.89, "water cut {wc}");
}

#[test]
fn shut_in_wells_report_zero_flow() {
    let mut sim = FieldSimulation::from_config(&quiet_config()).unwrap();
    let name = sim.wells().next().map(|w| w.name().to_string()).unwrap();
    sim.well_mut(&name).unwrap().set_status(WellStatus::ShutIn);

    let records = sim.tick(0.5).unwrap();
    let record = records.iter().find(|r| r.well == name).unwrap();
    assert_eq!(record.status, WellStatus::ShutIn);
    assert_eq!(record.values.get("flow_rate_bpd"), Some(0.0));
    assert_eq!(sim.stats().shut_in_records, 1);
}
