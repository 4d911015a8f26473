//! Sensor noise primitives
//!
//! Seeded perturbations that turn clean physics into plausible SCADA
//! readings: proportional Gaussian noise, glitch outliers, a diurnal cycle,
//! correlated channel pairs, random walks, drift and stuck sensors.
//!
//! Every generator owns its own `StdRng`. Two generators built from the same
//! seed produce identical sequences.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Uniform draw on `[lo, hi)` that tolerates an empty or inverted range
pub(crate) fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    if hi <= lo {
        return lo;
    }
    rng.gen_range(lo..hi)
}

/// Optional clamp applied to a noisy reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Bounds {
    pub const NONE: Self = Self { min: None, max: None };

    pub const fn min(min: f64) -> Self {
        Self { min: Some(min), max: None }
    }

    pub const fn range(min: f64, max: f64) -> Self {
        Self { min: Some(min), max: Some(max) }
    }

    pub fn apply(&self, value: f64) -> f64 {
        let mut v = value;
        if let Some(lo) = self.min {
            v = v.max(lo);
        }
        if let Some(hi) = self.max {
            v = v.min(hi);
        }
        v
    }
}

/// Glitch model for `with_outliers`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outlier {
    /// Probability that a sample is a glitch
    pub probability: f64,
    /// Glitch size in multiples of the normal sigma
    pub sigma: f64,
}

impl Outlier {
    /// Default field sensor: one glitch in 200 samples, 3σ
    pub const SENSOR_GLITCH: Self = Self {
        probability: 0.005,
        sigma: 3.0,
    };
}

pub struct NoiseGenerator {
    rng: StdRng,
}

impl NoiseGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn standard_normal(&mut self) -> f64 {
        self.rng.sample(StandardNormal)
    }

    /// `value + N(0, |value|·pct/100)`, clamped. Zero stays zero.
    pub fn gaussian(&mut self, value: f64, noise_pct: f64, bounds: Bounds) -> f64 {
        if value == 0.0 {
            return 0.0;
        }
        let sigma = value.abs() * noise_pct / 100.0;
        let noisy = value + self.standard_normal() * sigma;
        bounds.apply(noisy)
    }

    /// Gaussian noise, except that with `outlier.probability` the sample
    /// jumps by ±`outlier.sigma` standard deviations
    pub fn with_outliers(
        &mut self,
        value: f64,
        noise_pct: f64,
        outlier: Outlier,
        bounds: Bounds,
    ) -> f64 {
        let noisy = if self.rng.gen::<f64>() < outlier.probability {
            let sigma = value.abs() * noise_pct / 100.0;
            let sign = if self.rng.gen_bool(0.5) { 1.0 } else { -1.0 };
            value + sigma * outlier.sigma * sign
        } else {
            self.gaussian(value, noise_pct, Bounds::NONE)
        };
        bounds.apply(noisy)
    }

    /// Daily sinusoid referenced to 14:00 (factor 1.0 at 14:00, maximum at 20:00)
    ///
    /// factor = 1 + A·sin(2π(h − 14)/24)
    pub fn diurnal_factor(hour_of_day: f64, amplitude: f64) -> f64 {
        let phase = 2.0 * std::f64::consts::PI * (hour_of_day - 14.0) / 24.0;
        1.0 + amplitude * phase.sin()
    }

    /// Two readings whose noise terms have Pearson correlation `rho`
    pub fn correlated_pair(
        &mut self,
        value_a: f64,
        value_b: f64,
        noise_pct_a: f64,
        noise_pct_b: f64,
        rho: f64,
    ) -> (f64, f64) {
        let rho = rho.clamp(-1.0, 1.0);
        let z1 = self.standard_normal();
        let z2 = rho * z1 + (1.0 - rho * rho).sqrt() * self.standard_normal();

        let sigma_a = value_a.abs() * noise_pct_a / 100.0;
        let sigma_b = value_b.abs() * noise_pct_b / 100.0;
        (value_a + z1 * sigma_a, value_b + z2 * sigma_b)
    }

    /// A stuck transmitter repeats its last reading
    pub fn stuck_sensor(value: f64, stuck_value: Option<f64>) -> f64 {
        stuck_value.unwrap_or(value)
    }

    /// Linear transmitter drift: `value + rate·hours`
    pub fn sensor_drift(value: f64, drift_rate_per_hour: f64, elapsed_hours: f64) -> f64 {
        value + drift_rate_per_hour * elapsed_hours
    }

    /// One Brownian step of standard deviation `step_size`, clamped
    pub fn random_walk(&mut self, current: f64, step_size: f64, bounds: Bounds) -> f64 {
        bounds.apply(current + self.standard_normal() * step_size)
    }

    /// Bernoulli trial; probabilities outside [0, 1] saturate
    pub fn chance(&mut self, probability: f64) -> bool {
        if probability <= 0.0 {
            return false;
        }
        self.rng.gen::<f64>() < probability
    }

    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        uniform(&mut self.rng, lo, hi)
    }

    pub fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        mean + self.standard_normal() * std_dev
    }
}
