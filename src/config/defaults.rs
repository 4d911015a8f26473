//! Simulation-wide default constants.
//!
//! Grouped by subsystem. Config structs fall back to these when a TOML file
//! omits a key.

// ============================================================================
// Loading
// ============================================================================

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "OILFIELD_SIM_CONFIG";

/// Config file looked up in the working directory when the env var is unset.
pub const LOCAL_CONFIG_FILE: &str = "sim_config.toml";

// ============================================================================
// Simulation clock
// ============================================================================

/// Top-level seed; field `i` is seeded with `seed + i * FIELD_SEED_STRIDE`.
pub const DEFAULT_SEED: u64 = 42;

pub const FIELD_SEED_STRIDE: u64 = 1_000;

/// Days of history generated by a batch run.
pub const DEFAULT_DAYS: u32 = 30;

/// 48 samples/day = one record every 30 minutes.
pub const DEFAULT_SAMPLES_PER_DAY: u32 = 48;

/// Above this rate the run is legal but very large (one record per minute).
pub const SAMPLES_PER_DAY_WARN: u32 = 1_440;

/// Wall-clock seconds between realtime cycles.
pub const DEFAULT_REALTIME_INTERVAL_SECS: u64 = 30;

/// Simulated time per wall-clock time in realtime mode (60 = 1 min real is 1 h simulated).
pub const DEFAULT_TIME_ACCELERATION: f64 = 1.0;

// ============================================================================
// Anomaly injection
// ============================================================================

/// Chance that a healthy well develops an anomaly during one day.
pub const DEFAULT_ANOMALY_PROBABILITY_PER_DAY: f64 = 0.02;

/// Anomalies allowed on one well at the same time.
pub const DEFAULT_MAX_CONCURRENT_ANOMALIES: usize = 2;

/// Onset window (days): severity ramps from 0 to 1 over U(min, max).
pub const ANOMALY_ONSET_MIN_DAYS: f64 = 10.0;
pub const ANOMALY_ONSET_MAX_DAYS: f64 = 60.0;

/// An anomaly resolves once it has run this many onset periods.
pub const ANOMALY_LIFETIME_ONSETS: f64 = 3.0;

// ============================================================================
// Pads and facilities
// ============================================================================

/// Wells on a pad when `wells_per_pad` is empty.
pub const DEFAULT_WELLS_PER_PAD: usize = 10;

/// Nominal AOF potential relative to the sampled average rate.
pub const QMAX_PER_AVG_RATE: f64 = 2.5;

/// Vogel IPR is used when `Pr <= VOGEL_PB_MARGIN * Pb`.
pub const VOGEL_PB_MARGIN: f64 = 1.2;

/// Range for the reference depth each well's geometry is derived from (ft).
pub const BASE_DEPTH_RANGE_FT: [f64; 2] = [4_000.0, 12_000.0];

/// Range for original oil in place per well (STB).
pub const OOIP_RANGE_STB: [f64; 2] = [200_000.0, 2_000_000.0];
