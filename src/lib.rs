//! Oilfield Sim: Venezuelan oilfield production simulator
//!
//! Generates realistic synthetic telemetry for artificially lifted wells
//! grouped into pads ("macollas") and fields.
//!
//! ## Architecture
//!
//! - **Physics Engine**: PVT correlations, IPR, Arps decline, unit helpers
//! - **Noise**: Seeded sensor perturbations (Gaussian, glitches, diurnal, drift)
//! - **Models**: Reservoir, fluid and well models with ESP/SRP/gas lift/PCP equipment
//! - **Anomaly**: Stochastic fault injection with onset and resolution
//! - **Scenarios**: Scripted fault progressions bound to chosen wells
//! - **Simulation**: Tick driver producing timestamped telemetry records

pub mod anomaly;
pub mod config;
pub mod models;
pub mod noise;
pub mod physics_engine;
pub mod scenarios;
pub mod simulation;

// Re-export configuration
pub use config::{ConfigError, FieldConfig, SimulationConfig};

// Re-export models
pub use models::{
    FieldModel, FluidModel, LiftEquipment, LiftType, ModelError, PadModel, ReservoirModel,
    Telemetry, WellModel, WellStatus,
};

// Re-export anomaly and scenario types
pub use anomaly::{ActiveAnomaly, AnomalyInjector, AnomalyType};
pub use scenarios::{Scenario, ScenarioKind, ScenarioSummary};

// Re-export the driver
pub use simulation::{FieldSimulation, SimulationError, SimulationStats, TelemetryRecord};
