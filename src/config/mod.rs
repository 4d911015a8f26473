//! Simulation Configuration Module
//!
//! Field layouts, reservoir sampling ranges, anomaly injection settings and
//! the simulation clock, loaded from TOML.
//!
//! ## Loading Order
//!
//! 1. `OILFIELD_SIM_CONFIG` environment variable (path to TOML file)
//! 2. `sim_config.toml` in the current working directory
//! 3. Built-in defaults (two Venezuelan fields)
//!
//! ## Usage
//!
//! ```ignore
//! let config = SimulationConfig::load();
//! let fields = config.build_fields()?;
//! ```

mod sim_config;
pub mod defaults;
pub mod validation;

pub use sim_config::*;
