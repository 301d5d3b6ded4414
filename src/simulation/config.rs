//! Condition factors and Monte Carlo settings.

use std::collections::BTreeMap;

use crate::error::MissionError;

/// How strongly a condition factor bears on an individual node.
///
/// A factor with weight `w` and exposure `e` scales a node's quality by
/// `1 - w * e * u` with `u ~ Uniform[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Exposure {
    /// One draw per route and trial, shared by every node (e.g. weather).
    Route,
    /// Independent draw per node, full exposure.
    Node,
    /// Independent draw per node, scaled by `1 - quality`: weak cells
    /// suffer more from poor reference signals.
    SignalDeficit,
    /// Independent draw per node, scaled by `k / m` for the `k`-th of `m`
    /// stops: the deeper into unexplored terrain, the riskier.
    Progress,
}

impl Exposure {
    /// Exposure used when a factor is configured by name only.
    pub fn default_for(name: &str) -> Self {
        match name {
            "weather" => Exposure::Route,
            "unexplored_area" => Exposure::Progress,
            "rsrq" | "rsrp" => Exposure::SignalDeficit,
            _ => Exposure::Node,
        }
    }

    /// Exposure of a node with `quality` at 1-based `position` of `stops`.
    pub fn scale(self, quality: f64, position: usize, stops: usize) -> f64 {
        match self {
            Exposure::Route | Exposure::Node => 1.0,
            Exposure::SignalDeficit => 1.0 - quality,
            Exposure::Progress => position as f64 / stops as f64,
        }
    }
}

/// A validated environmental factor.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConditionFactor {
    /// Relative weight in `[0, 1]`; the largest fraction of a node's
    /// quality this factor can remove.
    pub factor: f64,
    /// Scope of the factor's draws.
    pub exposure: Exposure,
}

/// One entry of the mission's condition mapping, e.g.
/// `"weather": {"factor": 0.2}`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FactorEntry {
    /// Weight in `[0, 1]`.
    pub factor: f64,
    /// Overrides [`Exposure::default_for`] when given.
    #[cfg_attr(feature = "serde", serde(default))]
    pub exposure: Option<Exposure>,
}

impl FactorEntry {
    pub fn new(factor: f64) -> Self {
        Self {
            factor,
            exposure: None,
        }
    }
}

/// Named environmental factors applied by the simulator.
///
/// Factors are kept in name order, which fixes the order of random draws.
///
/// # Examples
///
/// ```
/// use drone_sweep::simulation::{ConditionFactors, Exposure};
///
/// let factors = ConditionFactors::from_weights([
///     ("weather", 0.2),
///     ("unexplored_area", 0.4),
///     ("rsrq", 0.5),
///     ("rsrp", 0.1),
/// ])
/// .unwrap();
///
/// assert_eq!(factors.len(), 4);
/// assert_eq!(factors.get("weather").unwrap().exposure, Exposure::Route);
/// assert!(ConditionFactors::from_weights([("weather", 1.5)]).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConditionFactors {
    factors: BTreeMap<String, ConditionFactor>,
}

impl ConditionFactors {
    /// No factors: simulated reward equals nominal reward.
    pub fn new() -> Self {
        Self::default()
    }

    /// The four factors of the reference drone sweep mission.
    pub fn drone_sweep() -> Self {
        let mut factors = BTreeMap::new();
        for (name, factor) in [
            ("weather", 0.2),
            ("unexplored_area", 0.4),
            ("rsrq", 0.5),
            ("rsrp", 0.1),
        ] {
            factors.insert(
                name.to_string(),
                ConditionFactor {
                    factor,
                    exposure: Exposure::default_for(name),
                },
            );
        }
        Self { factors }
    }

    /// Builds factors from `name -> {factor, exposure?}` entries.
    pub fn from_entries<I, K>(entries: I) -> Result<Self, MissionError>
    where
        I: IntoIterator<Item = (K, FactorEntry)>,
        K: Into<String>,
    {
        entries
            .into_iter()
            .try_fold(Self::new(), |acc, (name, entry)| {
                let name = name.into();
                let exposure = entry
                    .exposure
                    .unwrap_or_else(|| Exposure::default_for(&name));
                acc.with_exposed_factor(name, entry.factor, exposure)
            })
    }

    /// Builds factors from `(name, weight)` pairs with default exposures.
    pub fn from_weights<'a, I>(weights: I) -> Result<Self, MissionError>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        Self::from_entries(
            weights
                .into_iter()
                .map(|(name, factor)| (name, FactorEntry::new(factor))),
        )
    }

    /// Adds a factor with an explicit exposure.
    ///
    /// Rejects blank names, duplicate names and weights outside `[0, 1]`.
    pub fn with_exposed_factor(
        mut self,
        name: impl Into<String>,
        factor: f64,
        exposure: Exposure,
    ) -> Result<Self, MissionError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(MissionError::InvalidFactor {
                name,
                reason: "name must not be blank".into(),
            });
        }
        if !(0.0..=1.0).contains(&factor) {
            return Err(MissionError::InvalidFactor {
                name,
                reason: format!("factor must lie in [0, 1], got {factor}"),
            });
        }
        if self.factors.contains_key(&name) {
            return Err(MissionError::InvalidFactor {
                name,
                reason: "defined twice".into(),
            });
        }
        self.factors
            .insert(name, ConditionFactor { factor, exposure });
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&ConditionFactor> {
        self.factors.get(name)
    }

    /// Factors in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConditionFactor)> {
        self.factors.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }
}

/// Monte Carlo settings.
///
/// # Examples
///
/// ```
/// use drone_sweep::simulation::MonteCarloConfig;
///
/// let config = MonteCarloConfig::default()
///     .with_trials(500)
///     .with_seed(1025747)
///     .with_parallel(false);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonteCarloConfig {
    /// Number of independent trials per estimate.
    pub trials: usize,

    /// Base seed; trial `t` draws from its own stream derived from it.
    pub seed: u64,

    /// Whether to fan trials out on the rayon pool. Results are identical
    /// either way.
    pub parallel: bool,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            trials: 200,
            seed: 0,
            parallel: true,
        }
    }
}

impl MonteCarloConfig {
    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), MissionError> {
        if self.trials == 0 {
            return Err(MissionError::InvalidSimulation(
                "trials must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_exposures() {
        assert_eq!(Exposure::default_for("weather"), Exposure::Route);
        assert_eq!(Exposure::default_for("unexplored_area"), Exposure::Progress);
        assert_eq!(Exposure::default_for("rsrq"), Exposure::SignalDeficit);
        assert_eq!(Exposure::default_for("rsrp"), Exposure::SignalDeficit);
        assert_eq!(Exposure::default_for("dust"), Exposure::Node);
    }

    #[test]
    fn test_exposure_scale_in_unit_range() {
        assert_eq!(Exposure::Node.scale(0.3, 1, 4), 1.0);
        assert!((Exposure::SignalDeficit.scale(0.3, 1, 4) - 0.7).abs() < 1e-12);
        assert!((Exposure::Progress.scale(0.3, 1, 4) - 0.25).abs() < 1e-12);
        assert_eq!(Exposure::Progress.scale(0.3, 4, 4), 1.0);
    }

    #[test]
    fn test_drone_sweep_matches_weights() {
        let expected = ConditionFactors::from_weights([
            ("weather", 0.2),
            ("unexplored_area", 0.4),
            ("rsrq", 0.5),
            ("rsrp", 0.1),
        ])
        .unwrap();
        assert_eq!(ConditionFactors::drone_sweep(), expected);
    }

    #[test]
    fn test_name_order() {
        let factors = ConditionFactors::drone_sweep();
        let names: Vec<&str> = factors.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["rsrp", "rsrq", "unexplored_area", "weather"]);
    }

    #[test]
    fn test_rejects_bad_weight() {
        assert!(ConditionFactors::from_weights([("weather", -0.1)]).is_err());
        assert!(ConditionFactors::from_weights([("weather", f64::NAN)]).is_err());
        assert!(ConditionFactors::from_weights([("weather", 1.0)]).is_ok());
    }

    #[test]
    fn test_rejects_blank_and_duplicate_names() {
        assert!(ConditionFactors::from_weights([("  ", 0.1)]).is_err());
        let err = ConditionFactors::from_weights([("rsrq", 0.1), ("rsrq", 0.2)]).unwrap_err();
        assert!(matches!(err, MissionError::InvalidFactor { .. }));
    }

    #[test]
    fn test_explicit_exposure_wins() {
        let factors = ConditionFactors::from_entries([(
            "weather",
            FactorEntry {
                factor: 0.3,
                exposure: Some(Exposure::Node),
            },
        )])
        .unwrap();
        assert_eq!(factors.get("weather").unwrap().exposure, Exposure::Node);
    }

    #[test]
    fn test_monte_carlo_config() {
        let config = MonteCarloConfig::default();
        assert_eq!(config.trials, 200);
        assert!(config.parallel);
        assert!(config.validate().is_ok());
        assert!(config.with_trials(0).validate().is_err());
    }
}
