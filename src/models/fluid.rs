//! Per-well PVT fluid model
//!
//! A read-only view over the correlations, parameterized by the well's
//! crude and brine. Temperatures default to reservoir temperature.

use serde::{Deserialize, Serialize};

use super::{ensure, ModelError};
use crate::physics_engine::correlations::{self, DEFAULT_SALINITY_PPM};
use crate::physics_engine::units::api_to_sg;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FluidModel {
    pub api_gravity: f64,
    pub gas_sg: f64,
    pub water_sg: f64,
    pub reservoir_temperature_f: f64,
    /// Solution GOR at the bubble point (scf/STB)
    pub gor_scf_stb: f64,
    pub bubble_point_psi: f64,
    pub salinity_ppm: f64,
}

impl Default for FluidModel {
    fn default() -> Self {
        Self {
            api_gravity: 25.0,
            gas_sg: 0.75,
            water_sg: 1.05,
            reservoir_temperature_f: 180.0,
            gor_scf_stb: 200.0,
            bubble_point_psi: 1500.0,
            salinity_ppm: DEFAULT_SALINITY_PPM,
        }
    }
}

impl FluidModel {
    pub fn validate(&self) -> Result<(), ModelError> {
        ensure(self.api_gravity > 0.0, "api_gravity", self.api_gravity, "must be positive")?;
        ensure(self.gas_sg > 0.0, "gas_sg", self.gas_sg, "must be positive")?;
        ensure(self.water_sg > 0.0, "water_sg", self.water_sg, "must be positive")?;
        ensure(self.gor_scf_stb >= 0.0, "gor_scf_stb", self.gor_scf_stb, "must not be negative")?;
        ensure(
            self.bubble_point_psi >= 0.0,
            "bubble_point_psi",
            self.bubble_point_psi,
            "must not be negative",
        )?;
        ensure(self.salinity_ppm >= 0.0, "salinity_ppm", self.salinity_ppm, "must not be negative")
    }

    pub fn oil_sg(&self) -> f64 {
        api_to_sg(self.api_gravity)
    }

    fn temperature(&self, temperature_f: Option<f64>) -> f64 {
        temperature_f.unwrap_or(self.reservoir_temperature_f)
    }

    /// Solution GOR: constant above the bubble point, Standing below it
    pub fn solution_gor(&self, pressure_psi: f64, temperature_f: Option<f64>) -> f64 {
        if pressure_psi >= self.bubble_point_psi {
            return self.gor_scf_stb;
        }
        correlations::standing_solution_gor(
            pressure_psi,
            self.temperature(temperature_f),
            self.api_gravity,
            self.gas_sg,
        )
    }

    pub fn bo(&self, pressure_psi: f64, temperature_f: Option<f64>) -> f64 {
        let t = self.temperature(temperature_f);
        let rs = self.solution_gor(pressure_psi, Some(t));
        correlations::standing_oil_fvf(rs, self.gas_sg, self.api_gravity, t)
    }

    pub fn dead_oil_viscosity(&self, temperature_f: Option<f64>) -> f64 {
        correlations::beggs_robinson_dead_oil(self.api_gravity, self.temperature(temperature_f))
    }

    pub fn live_oil_viscosity(&self, pressure_psi: f64, temperature_f: Option<f64>) -> f64 {
        let t = self.temperature(temperature_f);
        let dead = self.dead_oil_viscosity(Some(t));
        correlations::beggs_robinson_live_oil(dead, self.solution_gor(pressure_psi, Some(t)))
    }

    pub fn gas_z_factor(&self, pressure_psi: f64, temperature_f: Option<f64>) -> f64 {
        correlations::gas_z_factor(pressure_psi, self.temperature(temperature_f), self.gas_sg)
    }

    /// Mixed liquid gradient (psi/ft) at the given water cut fraction
    pub fn fluid_gradient(&self, water_cut: f64) -> f64 {
        correlations::fluid_gradient(self.api_gravity, water_cut, self.water_sg)
    }

    pub fn water_density_ppg(&self, temperature_f: Option<f64>) -> f64 {
        correlations::water_density_ppg(self.temperature(temperature_f), self.salinity_ppm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fluid() -> FluidModel {
        FluidModel {
            api_gravity: 30.0,
            bubble_point_psi: 2000.0,
            gor_scf_stb: 400.0,
            ..FluidModel::default()
        }
    }

    #[test]
    fn test_solution_gor_above_bubble_point_is_constant() {
        let f = fluid();
        assert_eq!(f.solution_gor(2500.0, None), 400.0);
        assert_eq!(f.solution_gor(2000.0, None), 400.0);
        assert!(f.solution_gor(1000.0, None) < 400.0);
    }

    #[test]
    fn test_live_viscosity_rises_as_gas_leaves() {
        let f = fluid();
        let at_pb = f.live_oil_viscosity(2000.0, None);
        let depleted = f.live_oil_viscosity(300.0, None);
        assert!(depleted > at_pb, "{} should exceed {}", depleted, at_pb);
        assert!(depleted <= f.dead_oil_viscosity(None));
    }

    #[test]
    fn test_bo_shrinks_below_bubble_point() {
        let f = fluid();
        assert!(f.bo(2000.0, None) > f.bo(500.0, None));
        assert!(f.bo(14.0, None) >= 1.0);
    }

    #[test]
    fn test_gradient_matches_correlation() {
        let f = fluid();
        assert!((f.fluid_gradient(0.0) - 0.3794).abs() < 1e-3);
    }

    #[test]
    fn test_temperature_override() {
        let f = fluid();
        assert!(f.dead_oil_viscosity(Some(100.0)) > f.dead_oil_viscosity(None));
        assert!(f.water_density_ppg(Some(60.0)) > f.water_density_ppg(None));
    }

    #[test]
    fn test_validate_rejects_bad_gravity() {
        let f = FluidModel {
            gas_sg: 0.0,
            ..FluidModel::default()
        };
        assert!(f.validate().is_err());
        assert!(FluidModel::default().validate().is_ok());
    }
}
