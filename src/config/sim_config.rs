//! Simulation configuration structs, loading and validation

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use super::defaults;
use crate::anomaly::AnomalyType;
use crate::models::{FieldModel, LiftType, ModelError};

/// Inclusive `[min, max]` sampling range
pub type Range = [f64; 2];

// ============================================================================
// Top-Level Config
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub simulation: SimulationSettings,
    pub anomalies: AnomalySettings,
    pub fields: Vec<FieldConfig>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationSettings::default(),
            anomalies: AnomalySettings::default(),
            fields: vec![FieldConfig::lagunillas(), FieldConfig::cerro_negro()],
        }
    }
}

// ============================================================================
// Sections
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    pub seed: u64,
    pub days: u32,
    pub samples_per_day: u32,
    /// First sample time; defaults to `days` before now
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    pub realtime_interval_secs: u64,
    pub time_acceleration: f64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            seed: defaults::DEFAULT_SEED,
            days: defaults::DEFAULT_DAYS,
            samples_per_day: defaults::DEFAULT_SAMPLES_PER_DAY,
            start_time: None,
            realtime_interval_secs: defaults::DEFAULT_REALTIME_INTERVAL_SECS,
            time_acceleration: defaults::DEFAULT_TIME_ACCELERATION,
        }
    }
}

impl SimulationSettings {
    pub fn dt_days(&self) -> f64 {
        1.0 / f64::from(self.samples_per_day.max(1))
    }

    /// Simulated days advanced by one realtime cycle
    #[allow(clippy::cast_precision_loss)]
    pub fn realtime_dt_days(&self) -> f64 {
        self.realtime_interval_secs as f64 * self.time_acceleration / 86_400.0
    }

    pub fn resolved_start_time(&self) -> DateTime<Utc> {
        self.start_time
            .unwrap_or_else(|| Utc::now() - Duration::days(i64::from(self.days)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalySettings {
    pub enabled: bool,
    pub probability_per_well_per_day: f64,
    pub max_concurrent: usize,
    /// Anomaly types that may be injected; every type when empty
    pub types: Vec<AnomalyType>,
}

impl Default for AnomalySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            probability_per_well_per_day: defaults::DEFAULT_ANOMALY_PROBABILITY_PER_DAY,
            max_concurrent: defaults::DEFAULT_MAX_CONCURRENT_ANOMALIES,
            types: Vec::new(),
        }
    }
}

impl AnomalySettings {
    pub fn enabled_types(&self) -> Vec<AnomalyType> {
        if self.types.is_empty() {
            AnomalyType::ALL.to_vec()
        } else {
            self.types.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    pub name: String,
    /// Template name; drives the choice of drive mechanism
    #[serde(default)]
    pub template: String,
    #[serde(default = "default_num_pads", alias = "num_macollas")]
    pub num_pads: usize,
    /// Wells on each pad; the last entry repeats for any remaining pads
    #[serde(default, alias = "wells_per_macolla")]
    pub wells_per_pad: Vec<usize>,
    /// Lift type (`ESP`, `SRP`, `gas_lift`, `PCP`) to fraction of wells
    #[serde(default = "default_lift_distribution")]
    pub lift_distribution: BTreeMap<String, f64>,
    #[serde(default)]
    pub reservoir: ReservoirRanges,
    #[serde(default)]
    pub production: ProductionRanges,
}

fn default_num_pads() -> usize {
    1
}

fn default_lift_distribution() -> BTreeMap<String, f64> {
    BTreeMap::from([("ESP".to_string(), 1.0)])
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservoirRanges {
    pub pressure_psi: Range,
    pub temperature_f: Range,
    pub api_gravity: Range,
    pub water_cut: Range,
    pub gor_scf_stb: Range,
}

impl Default for ReservoirRanges {
    fn default() -> Self {
        Self {
            pressure_psi: [1500.0, 3000.0],
            temperature_f: [150.0, 200.0],
            api_gravity: [10.0, 30.0],
            water_cut: [0.2, 0.7],
            gor_scf_stb: [100.0, 500.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductionRanges {
    pub avg_rate_bpd: Range,
}

impl Default for ProductionRanges {
    fn default() -> Self {
        Self {
            avg_rate_bpd: [200.0, 1500.0],
        }
    }
}

impl FieldConfig {
    /// Light-to-medium crude on the east coast of Lake Maracaibo
    pub fn lagunillas() -> Self {
        Self {
            name: "Campo Lagunillas".to_string(),
            template: "lago_maracaibo".to_string(),
            num_pads: 2,
            wells_per_pad: vec![6, 4],
            lift_distribution: BTreeMap::from([
                ("gas_lift".to_string(), 0.5),
                ("ESP".to_string(), 0.3),
                ("SRP".to_string(), 0.2),
            ]),
            reservoir: ReservoirRanges {
                pressure_psi: [2000.0, 3500.0],
                temperature_f: [160.0, 210.0],
                api_gravity: [18.0, 30.0],
                water_cut: [0.2, 0.7],
                gor_scf_stb: [200.0, 600.0],
            },
            production: ProductionRanges {
                avg_rate_bpd: [300.0, 1500.0],
            },
        }
    }

    /// Extra-heavy crude in the Orinoco belt
    pub fn cerro_negro() -> Self {
        Self {
            name: "Campo Cerro Negro".to_string(),
            template: "faja_orinoco".to_string(),
            num_pads: 1,
            wells_per_pad: vec![6],
            lift_distribution: BTreeMap::from([("PCP".to_string(), 0.6), ("ESP".to_string(), 0.4)]),
            reservoir: ReservoirRanges {
                pressure_psi: [1000.0, 1600.0],
                temperature_f: [120.0, 140.0],
                api_gravity: [8.0, 12.0],
                water_cut: [0.05, 0.3],
                gor_scf_stb: [50.0, 120.0],
            },
            production: ProductionRanges {
                avg_rate_bpd: [200.0, 800.0],
            },
        }
    }

    /// Lift fractions keyed by parsed lift type, in configuration order
    pub fn lift_fractions(&self) -> Result<Vec<(LiftType, f64)>, ModelError> {
        self.lift_distribution
            .iter()
            .map(|(name, fraction)| Ok((name.parse::<LiftType>()?, *fraction)))
            .collect()
    }

    /// Well count for pad `index` (0-based)
    pub fn wells_for_pad(&self, index: usize) -> usize {
        self.wells_per_pad
            .get(index)
            .or_else(|| self.wells_per_pad.last())
            .copied()
            .unwrap_or(defaults::DEFAULT_WELLS_PER_PAD)
    }

    /// Three-letter prefix used in pad names: last word of the field name
    pub fn pad_prefix(&self) -> String {
        let prefix: String = self
            .name
            .split_whitespace()
            .last()
            .unwrap_or("")
            .chars()
            .take(3)
            .collect::<String>()
            .to_uppercase();
        if prefix.is_empty() {
            "FLD".to_string()
        } else {
            prefix
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

impl SimulationConfig {
    /// Load configuration using the standard search order.
    ///
    /// 1. `$OILFIELD_SIM_CONFIG`
    /// 2. `./sim_config.toml`
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(defaults::CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), fields = config.fields.len(), "Loaded simulation config from OILFIELD_SIM_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from OILFIELD_SIM_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "OILFIELD_SIM_CONFIG points to non-existent file, falling back");
            }
        }

        let local = PathBuf::from(defaults::LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!(fields = config.fields.len(), "Loaded simulation config from ./sim_config.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./sim_config.toml, using defaults");
                }
            }
        }

        info!("No sim_config.toml found, using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;

        for w in super::validation::validate_unknown_keys(&contents) {
            warn!("{}", w);
        }

        let config: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Simulation config saved");
        Ok(())
    }

    /// Check the whole config, collecting every problem.
    ///
    /// Suspicious-but-legal values are logged as warnings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        if self.simulation.samples_per_day == 0 {
            errors.push("simulation.samples_per_day must be > 0".to_string());
        }
        if self.simulation.realtime_interval_secs == 0 {
            errors.push("simulation.realtime_interval_secs must be > 0".to_string());
        }
        let accel = self.simulation.time_acceleration;
        if !(accel.is_finite() && accel > 0.0) {
            errors.push(format!("simulation.time_acceleration must be > 0 (got {accel})"));
        }
        if self.simulation.days == 0 {
            errors.push("simulation.days must be > 0".to_string());
        }

        let p = self.anomalies.probability_per_well_per_day;
        if !p.is_finite() || !(0.0..=1.0).contains(&p) {
            errors.push(format!("anomalies.probability_per_well_per_day = {p} must be within [0, 1]"));
        }

        if self.fields.is_empty() {
            errors.push("at least one [[fields]] entry is required".to_string());
        }
        let mut seen = std::collections::BTreeSet::new();
        for field in &self.fields {
            if field.name.trim().is_empty() {
                errors.push("fields.name must not be empty".to_string());
            } else if !seen.insert(field.name.as_str()) {
                errors.push(format!("duplicate field name '{}'", field.name));
            }
        }

        let (range_errors, range_warnings) = super::validation::validate_physical_ranges(self);
        errors.extend(range_errors);
        for w in &range_warnings {
            warn!("{}", w);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Build every configured field; field `i` is seeded `seed + i·1000`.
    pub fn build_fields(&self) -> Result<Vec<FieldModel>, ModelError> {
        let mut seed = self.simulation.seed;
        let mut fields = Vec::with_capacity(self.fields.len());
        for field_cfg in &self.fields {
            let field = FieldModel::build(field_cfg, seed)?;
            info!(
                field = %field.name(),
                pads = field.pads().len(),
                wells = field.well_count(),
                "Initialized field"
            );
            fields.push(field);
            seed = seed.wrapping_add(defaults::FIELD_SEED_STRIDE);
        }
        Ok(fields)
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error ({}): {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("config parse error ({}): {}", .0.display(), .1)]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("config serialization error: {0}")]
    Serialize(#[source] toml::ser::Error),

    #[error("config validation failed:\n{}", bullet_list(.0))]
    Validation(Vec<String>),
}

fn bullet_list(errors: &[String]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}
