//! SA configuration.

use crate::error::MissionError;
use crate::instance::AnnealingParams;

/// Configuration for the Simulated Annealing algorithm.
///
/// Cooling is geometric: `T_{k+1} = cooling_rate * T_k` after every
/// `iterations_per_temperature` iterations. The run ends once the
/// temperature drops below `min_temperature`.
///
/// # Examples
///
/// ```
/// use drone_sweep::sa::SaConfig;
///
/// let config = SaConfig::default()
///     .with_initial_temperature(1000.0)
///     .with_cooling_rate(0.95)
///     .with_min_temperature(0.1)
///     .with_seed(8634452);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.temperature_steps(), 180);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaConfig {
    /// Initial temperature. Higher values allow more exploration.
    pub initial_temperature: f64,

    /// Geometric cooling factor in (0, 1). Higher = slower cooling.
    pub cooling_rate: f64,

    /// Minimum temperature. The algorithm stops when T drops below this.
    pub min_temperature: f64,

    /// Number of iterations at each temperature level.
    pub iterations_per_temperature: usize,

    /// Maximum total iterations (hard budget). 0 = no limit.
    pub max_iterations: usize,

    /// Perturbation attempts per iteration before the iteration is skipped.
    pub max_neighbor_attempts: usize,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 100.0,
            cooling_rate: 0.95,
            min_temperature: 1e-3,
            iterations_per_temperature: 1,
            max_iterations: 0,
            max_neighbor_attempts: 32,
            seed: None,
        }
    }
}

impl SaConfig {
    /// Takes the temperature schedule from an instance's parameters.
    pub fn from_params(params: &AnnealingParams) -> Self {
        Self {
            initial_temperature: params.initial_temp,
            cooling_rate: params.cooling_rate,
            min_temperature: params.min_temp,
            ..Self::default()
        }
    }

    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_iterations_per_temperature(mut self, n: usize) -> Self {
        self.iterations_per_temperature = n;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_max_neighbor_attempts(mut self, n: usize) -> Self {
        self.max_neighbor_attempts = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of temperature levels the schedule visits before the
    /// temperature falls below the minimum.
    ///
    /// Away from exact boundaries this is
    /// `floor(ln(T_min / T_0) / ln(rate)) + 1`. The levels are counted with
    /// the runner's own `T *= rate` recurrence, so a minimum that lands on a
    /// level is counted the same way the runner visits it. Returns 0 for an
    /// invalid schedule.
    pub fn temperature_steps(&self) -> usize {
        if self.validate().is_err() {
            return 0;
        }
        let mut levels = 0;
        let mut temperature = self.initial_temperature;
        while temperature >= self.min_temperature {
            levels += 1;
            temperature *= self.cooling_rate;
        }
        levels
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), MissionError> {
        AnnealingParams::new(
            self.initial_temperature,
            self.cooling_rate,
            self.min_temperature,
        )
        .validate()?;
        if self.iterations_per_temperature == 0 {
            return Err(MissionError::InvalidAnnealing(
                "iterations_per_temperature must be positive".into(),
            ));
        }
        if self.max_neighbor_attempts == 0 {
            return Err(MissionError::InvalidAnnealing(
                "max_neighbor_attempts must be positive".into(),
            ));
        }
        Ok(())
    }
}
