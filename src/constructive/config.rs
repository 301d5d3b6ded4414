//! Constructive engine configuration.

use crate::error::MissionError;

/// Configuration for the constructive heuristic.
///
/// # Examples
///
/// ```
/// use drone_sweep::constructive::ConstructiveConfig;
///
/// let config = ConstructiveConfig::default()
///     .with_risk_aversion(0.25)
///     .with_max_passes(20);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstructiveConfig {
    /// Weight of the simulated reward's standard deviation in the
    /// stochastic objective `mean - risk_aversion * std_dev`.
    ///
    /// 0 optimizes expected reward only; larger values prefer steadier
    /// routes.
    pub risk_aversion: f64,

    /// Upper bound on improvement passes of the stochastic local search.
    pub max_passes: usize,
}

impl Default for ConstructiveConfig {
    fn default() -> Self {
        Self {
            risk_aversion: 0.5,
            max_passes: 50,
        }
    }
}

impl ConstructiveConfig {
    pub fn with_risk_aversion(mut self, aversion: f64) -> Self {
        self.risk_aversion = aversion;
        self
    }

    pub fn with_max_passes(mut self, n: usize) -> Self {
        self.max_passes = n;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), MissionError> {
        if !(self.risk_aversion.is_finite() && self.risk_aversion >= 0.0) {
            return Err(MissionError::InvalidSearch(format!(
                "risk_aversion must be non-negative, got {}",
                self.risk_aversion
            )));
        }
        if self.max_passes == 0 {
            return Err(MissionError::InvalidSearch(
                "max_passes must be positive".into(),
            ));
        }
        Ok(())
    }
}
