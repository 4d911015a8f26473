//! Arps production decline curves
//!
//! q(t) = qi / (1 + b·Di·t)^(1/b), with the exponential (b = 0) and
//! harmonic (b = 1) limits. Di is a nominal annual decline; time is in days.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::noise::uniform;

const DAYS_PER_YEAR: f64 = 365.0;

/// Arps decline parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeclineParameters {
    /// Initial rate (bpd)
    pub qi_bpd: f64,
    /// Initial nominal decline (1/year)
    pub di: f64,
    /// Arps exponent: 0 exponential, 0..1 hyperbolic, 1 harmonic
    pub b: f64,
    /// Economic limit; rates never drop below it
    pub min_rate_bpd: f64,
}

impl DeclineParameters {
    pub fn new(qi_bpd: f64, di: f64, b: f64) -> Self {
        Self {
            qi_bpd,
            di,
            b,
            min_rate_bpd: 5.0,
        }
    }

    pub fn with_min_rate(mut self, min_rate_bpd: f64) -> Self {
        self.min_rate_bpd = min_rate_bpd;
        self
    }

    /// q(t) = qi · e^(−Di·t)
    pub fn exponential_rate(&self, t_days: f64) -> f64 {
        let t_years = t_days / DAYS_PER_YEAR;
        (self.qi_bpd * (-self.di * t_years).exp()).max(self.min_rate_bpd)
    }

    /// q(t) = qi / (1 + b·Di·t)^(1/b)
    ///
    /// Falls back to the exponential form for b ≤ 0 and harmonic for b ≥ 1.
    pub fn hyperbolic_rate(&self, t_days: f64) -> f64 {
        if self.b <= 0.0 {
            return self.exponential_rate(t_days);
        }
        if self.b >= 1.0 {
            return self.harmonic_rate(t_days);
        }
        let t_years = t_days / DAYS_PER_YEAR;
        let denominator = (1.0 + self.b * self.di * t_years).powf(1.0 / self.b);
        if denominator <= 0.0 || !denominator.is_finite() {
            return self.min_rate_bpd;
        }
        (self.qi_bpd / denominator).max(self.min_rate_bpd)
    }

    /// q(t) = qi / (1 + Di·t)
    pub fn harmonic_rate(&self, t_days: f64) -> f64 {
        let t_years = t_days / DAYS_PER_YEAR;
        let denominator = 1.0 + self.di * t_years;
        if denominator <= 0.0 {
            return self.min_rate_bpd;
        }
        (self.qi_bpd / denominator).max(self.min_rate_bpd)
    }

    /// q(t) / qi, the multiplicative decline factor in (0, 1]
    pub fn decline_factor(&self, t_days: f64) -> f64 {
        if self.qi_bpd <= 0.0 {
            return 1.0;
        }
        self.hyperbolic_rate(t_days) / self.qi_bpd
    }

    /// Cumulative production to time t (STB) from the analytic Arps integrals
    ///
    /// - b = 0: Np = (qi − q) / Di
    /// - b = 1: Np = qi / Di · ln(qi / q)
    /// - else:  Np = qi^b / ((1 − b)·Di) · (qi^(1−b) − q^(1−b))
    pub fn cumulative_production(&self, t_days: f64) -> f64 {
        let qt = self.hyperbolic_rate(t_days);
        let qi = self.qi_bpd;

        let np = if self.di <= 0.0 {
            qi * t_days
        } else if self.b <= 0.0 {
            (qi - qt) / self.di * DAYS_PER_YEAR
        } else if (self.b - 1.0).abs() < 1e-6 || self.b > 1.0 {
            if qt <= 0.0 {
                return 0.0;
            }
            qi / self.di * (qi / qt).ln() * DAYS_PER_YEAR
        } else {
            let factor = qi.powf(self.b) / ((1.0 - self.b) * self.di);
            factor * (qi.powf(1.0 - self.b) - qt.powf(1.0 - self.b)) * DAYS_PER_YEAR
        };
        np.max(0.0)
    }
}

/// Seeded source of randomized decline parameters
pub struct DeclineGenerator {
    rng: StdRng,
}

impl DeclineGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Randomized decline parameters around a nominal annual decline
    ///
    /// Di is jittered ±10 %, b is drawn from [0.3, 0.7] and the economic
    /// limit is 2 % of qi (at least 5 bpd).
    pub fn generate_decline_params(
        &mut self,
        initial_rate_bpd: f64,
        annual_decline_rate: f64,
    ) -> DeclineParameters {
        let di = annual_decline_rate * uniform(&mut self.rng, 0.9, 1.1);
        let b = uniform(&mut self.rng, 0.3, 0.7);
        DeclineParameters {
            qi_bpd: initial_rate_bpd,
            di,
            b,
            min_rate_bpd: (initial_rate_bpd * 0.02).max(5.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exponential_one_year() {
        let params = DeclineParameters::new(1000.0, 0.3, 0.0);
        let q = params.exponential_rate(365.0);
        assert!((q - 740.818).abs() < 0.01, "expected ~740.8 bpd, got {}", q);
    }

    #[test]
    fn test_rates_respect_economic_limit() {
        let params = DeclineParameters::new(100.0, 2.0, 0.5).with_min_rate(20.0);
        assert_eq!(params.hyperbolic_rate(365.0 * 30.0), 20.0);
        assert_eq!(params.exponential_rate(365.0 * 30.0), 20.0);
    }

    #[test]
    fn test_hyperbolic_between_exponential_and_harmonic() {
        let t = 730.0;
        let exp = DeclineParameters::new(1000.0, 0.5, 0.0).exponential_rate(t);
        let hyp = DeclineParameters::new(1000.0, 0.5, 0.5).hyperbolic_rate(t);
        let har = DeclineParameters::new(1000.0, 0.5, 1.0).harmonic_rate(t);
        assert!(exp < hyp && hyp < har, "exp {} < hyp {} < har {}", exp, hyp, har);
    }

    #[test]
    fn test_hyperbolic_dispatch_limits() {
        let p0 = DeclineParameters::new(800.0, 0.4, 0.0);
        assert_eq!(p0.hyperbolic_rate(100.0), p0.exponential_rate(100.0));
        let p1 = DeclineParameters::new(800.0, 0.4, 1.0);
        assert_eq!(p1.hyperbolic_rate(100.0), p1.harmonic_rate(100.0));
    }

    #[test]
    fn test_decline_factor_starts_at_one() {
        let params = DeclineParameters::new(600.0, 0.3, 0.5);
        assert!((params.decline_factor(0.0) - 1.0).abs() < 1e-12);
        assert!(params.decline_factor(365.0) < 1.0);
    }

    #[test]
    fn test_cumulative_exponential_matches_integral() {
        let params = DeclineParameters::new(1000.0, 0.3, 0.0).with_min_rate(0.0);
        let np = params.cumulative_production(365.0);
        // (1000 − 740.818) / 0.3 × 365
        assert!((np - 315_338.0).abs() < 50.0, "Np = {}", np);
    }

    #[test]
    fn test_cumulative_hyperbolic_monotone() {
        let params = DeclineParameters::new(1000.0, 0.4, 0.5);
        let one = params.cumulative_production(365.0);
        let two = params.cumulative_production(730.0);
        assert!(one > 0.0 && two > one);
        // Never more than producing at qi the whole time
        assert!(one < 1000.0 * 365.0);
    }

    #[test]
    fn test_cumulative_no_decline() {
        let params = DeclineParameters::new(500.0, 0.0, 0.5);
        assert!((params.cumulative_production(10.0) - 5000.0).abs() < 1e-9);
    }

    #[test]
    fn test_generate_params_ranges_and_determinism() {
        let mut a = DeclineGenerator::new(7);
        let mut b = DeclineGenerator::new(7);
        let pa = a.generate_decline_params(1000.0, 0.25);
        let pb = b.generate_decline_params(1000.0, 0.25);
        assert_eq!(pa, pb);
        assert!(pa.di >= 0.225 && pa.di <= 0.275);
        assert!(pa.b >= 0.3 && pa.b <= 0.7);
        assert_eq!(pa.min_rate_bpd, 20.0);
    }

    #[test]
    fn test_generated_params_drive_curves() {
        let mut gen = DeclineGenerator::new(11);
        let params = gen.generate_decline_params(400.0, 0.3);
        let q = params.hyperbolic_rate(3650.0);
        assert!(q >= params.min_rate_bpd && q < params.qi_bpd);
        assert!((params.decline_factor(3650.0) - q / params.qi_bpd).abs() < 1e-12);
    }
}
