//! Physics Engine Module
//!
//! Deterministic petroleum-engineering calculations for the simulator.
//! Nothing here holds state or draws random numbers except the decline
//! parameter generator.
//!
//! ## Correlations
//! - `standing_bubble_point()` / `standing_solution_gor()` / `standing_oil_fvf()`
//! - `beggs_robinson_dead_oil()` / `beggs_robinson_live_oil()` - Oil viscosity
//! - `gas_z_factor()` - Simplified Brill-Beggs Z
//! - `water_density_ppg()` / `fluid_gradient()` - Column gradients
//! - `vogel_ipr()` / `productivity_index()` - Inflow performance
//!
//! ## Decline
//! - `DeclineParameters` - Arps exponential, hyperbolic and harmonic curves;
//!   `DeclineGenerator` draws randomized parameters from a seed

pub mod correlations;
pub mod decline;
pub mod units;

pub use correlations::{
    beggs_robinson_dead_oil, beggs_robinson_live_oil, fluid_gradient, gas_z_factor,
    productivity_index, standing_bubble_point, standing_oil_fvf, standing_solution_gor,
    vogel_ipr, water_density_ppg,
};
pub use decline::{DeclineGenerator, DeclineParameters};
pub use units::{api_to_sg, round_to};
