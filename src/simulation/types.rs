//! Simulator interface and reward statistics.

use rand::Rng;

use crate::models::Route;

/// Summary of a batch of simulated rewards.
#[derive(Debug, Clone, PartialEq)]
pub struct RewardEstimate {
    mean: f64,
    std_dev: f64,
    samples: Vec<f64>,
}

impl RewardEstimate {
    /// Summarizes samples given in trial order.
    ///
    /// The mean is accumulated sequentially in that order, so the same
    /// samples always give the same bits.
    pub fn from_samples(samples: Vec<f64>) -> Self {
        let n = samples.len();
        if n == 0 {
            return Self {
                mean: 0.0,
                std_dev: 0.0,
                samples,
            };
        }
        let mean = samples.iter().sum::<f64>() / n as f64;
        let variance = if n > 1 {
            samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };
        Self {
            mean,
            std_dev: variance.sqrt(),
            samples,
        }
    }

    /// Expected reward.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Sample standard deviation (Bessel-corrected).
    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    /// Standard error of the mean, `std_dev / sqrt(n)`.
    pub fn std_error(&self) -> f64 {
        if self.samples.is_empty() {
            0.0
        } else {
            self.std_dev / (self.samples.len() as f64).sqrt()
        }
    }

    /// Individual trial rewards in trial order.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Mean penalized by spread: `mean - aversion * std_dev`.
    pub fn risk_adjusted(&self, aversion: f64) -> f64 {
        self.mean - aversion * self.std_dev
    }
}

/// Scores routes under randomized environmental conditions.
///
/// Engines only talk to the environment through this trait, so tests can
/// swap in a deterministic stand-in.
pub trait RewardSimulator: Send + Sync {
    /// Draws one stochastic reward for `route`.
    fn sample<R: Rng>(&self, route: &Route, rng: &mut R) -> f64;

    /// Estimates the fleet reward of `routes` over many trials.
    ///
    /// A trial's sample is the sum of every route's reward in that trial.
    /// Repeated calls with equal routes must return equal estimates.
    fn estimate(&self, routes: &[Route]) -> RewardEstimate;
}
