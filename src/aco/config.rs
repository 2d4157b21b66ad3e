//! ACO configuration and pheromone update policies.

use super::heuristic::check_accuracy;
use crate::error::{AcoError, Result};

/// How the trail is reinforced and decayed at the end of a generation.
///
/// Every policy reinforces first and evaporates second.
///
/// # References
///
/// - Dorigo, Maniezzo & Colorni (1996), "Ant System: Optimization by a
///   Colony of Cooperating Agents"
/// - Stützle & Hoos (2000), "MAX-MIN Ant System"
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PheromonePolicy {
    /// Every tour deposits `q / fitness` on each traversed edge; evaporation
    /// multiplies every entry by `1 - evaporation_rate`.
    #[default]
    Plain,

    /// Only the best `floor(elite_proportion * colony_size)` tours deposit.
    /// Evaporation as in [`Plain`](PheromonePolicy::Plain).
    Elitist {
        /// Fraction of the colony allowed to deposit, in (0, 1].
        elite_proportion: f64,
    },

    /// Elitist selection with a capped deposit and a floor on evaporation.
    ///
    /// Each single deposit is `min(q / fitness, upper_bound)`; the running
    /// sum on an edge is not clamped. After evaporation every off-diagonal
    /// entry is raised to at least `lower_bound`.
    MinMax {
        /// Fraction of the colony allowed to deposit, in (0, 1].
        elite_proportion: f64,
        /// Cap on one deposit.
        upper_bound: f64,
        /// Floor applied after evaporation.
        lower_bound: f64,
    },
}

impl PheromonePolicy {
    /// Fraction of the colony that reinforces the trail.
    pub fn elite_proportion(&self) -> f64 {
        match *self {
            PheromonePolicy::Plain => 1.0,
            PheromonePolicy::Elitist { elite_proportion }
            | PheromonePolicy::MinMax {
                elite_proportion, ..
            } => elite_proportion,
        }
    }

    /// Number of tours that reinforce in a full generation.
    pub fn elite_count(&self, colony_size: usize) -> usize {
        match self {
            PheromonePolicy::Plain => colony_size,
            _ => (self.elite_proportion() * colony_size as f64).floor() as usize,
        }
    }

    /// Cap on a single deposit, if any.
    pub fn deposit_cap(&self) -> Option<f64> {
        match *self {
            PheromonePolicy::MinMax { upper_bound, .. } => Some(upper_bound),
            _ => None,
        }
    }

    /// Floor applied after evaporation, if any.
    pub fn evaporation_floor(&self) -> Option<f64> {
        match *self {
            PheromonePolicy::MinMax { lower_bound, .. } => Some(lower_bound),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            PheromonePolicy::Plain => "plain",
            PheromonePolicy::Elitist { .. } => "elitist",
            PheromonePolicy::MinMax { .. } => "min-max",
        }
    }
}

impl std::fmt::Display for PheromonePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration for an ant colony run.
///
/// # Examples
///
/// ```
/// use u_aco::aco::{AcoConfig, PheromonePolicy};
///
/// let config = AcoConfig::default()
///     .with_colony_size(20)
///     .with_alpha(0.5)
///     .with_beta(3.0)
///     .with_policy(PheromonePolicy::MinMax {
///         elite_proportion: 0.2,
///         upper_bound: 10.0,
///         lower_bound: 1.0,
///     })
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcoConfig {
    /// Number of ants per generation.
    pub colony_size: usize,

    /// Deposit numerator: a tour of length `L` deposits `q / L` per edge.
    pub q: f64,

    /// Pheromone importance exponent.
    pub alpha: f64,

    /// Heuristic (inverse distance) importance exponent.
    pub beta: f64,

    /// Node every ant starts and ends at.
    pub start_node: usize,

    /// Fraction of pheromone removed each generation, in [0, 1).
    pub evaporation_rate: f64,

    /// Reinforcement policy.
    pub policy: PheromonePolicy,

    /// Total number of tour evaluations before the run stops.
    pub evaluation_budget: usize,

    /// Decimal places for heuristic values and initial pheromone draws.
    ///
    /// `None` keeps full precision.
    pub accuracy: Option<u32>,

    /// Build the tours of one generation on the rayon pool.
    ///
    /// Only honoured with the `parallel` feature. Results do not depend on it.
    pub parallel: bool,

    /// Random seed for reproducibility. `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for AcoConfig {
    fn default() -> Self {
        Self {
            colony_size: 10,
            q: 1.0,
            alpha: 1.0,
            beta: 2.0,
            start_node: 0,
            evaporation_rate: 0.3,
            policy: PheromonePolicy::Plain,
            evaluation_budget: 10_000,
            accuracy: None,
            parallel: false,
            seed: None,
        }
    }
}

impl AcoConfig {
    /// Tuned parameters for the plain Ant System on mid-sized instances
    /// (tens of nodes).
    ///
    /// - Colony: 130, q: 500, alpha: 0.5, beta: 9, evaporation: 0.3
    pub fn tuned_plain() -> Self {
        Self {
            colony_size: 130,
            q: 500.0,
            alpha: 0.5,
            beta: 9.0,
            evaporation_rate: 0.3,
            ..Self::default()
        }
    }

    /// [`tuned_plain`](Self::tuned_plain) with elitist Min-Max reinforcement.
    ///
    /// - Elite proportion: 0.2, upper bound: 10, lower bound: 1
    pub fn tuned_elitist_min_max() -> Self {
        Self {
            policy: PheromonePolicy::MinMax {
                elite_proportion: 0.2,
                upper_bound: 10.0,
                lower_bound: 1.0,
            },
            ..Self::tuned_plain()
        }
    }

    pub fn with_colony_size(mut self, n: usize) -> Self {
        self.colony_size = n;
        self
    }

    pub fn with_q(mut self, q: f64) -> Self {
        self.q = q;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    pub fn with_start_node(mut self, node: usize) -> Self {
        self.start_node = node;
        self
    }

    pub fn with_evaporation_rate(mut self, rate: f64) -> Self {
        self.evaporation_rate = rate;
        self
    }

    pub fn with_policy(mut self, policy: PheromonePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_evaluation_budget(mut self, n: usize) -> Self {
        self.evaluation_budget = n;
        self
    }

    pub fn with_accuracy(mut self, decimals: u32) -> Self {
        self.accuracy = Some(decimals);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the parameters that do not depend on the graph.
    ///
    /// `start_node` is checked against the graph size when a run starts.
    pub fn validate(&self) -> Result<()> {
        if self.colony_size == 0 {
            return Err(config_err("colony_size must be positive"));
        }
        if !(self.q > 0.0 && self.q.is_finite()) {
            return Err(config_err(format!("q must be positive, got {}", self.q)));
        }
        if !(self.alpha >= 0.0 && self.alpha.is_finite()) {
            return Err(config_err(format!(
                "alpha must be non-negative, got {}",
                self.alpha
            )));
        }
        if !(self.beta >= 0.0 && self.beta.is_finite()) {
            return Err(config_err(format!(
                "beta must be non-negative, got {}",
                self.beta
            )));
        }
        if !(0.0..1.0).contains(&self.evaporation_rate) {
            return Err(config_err(format!(
                "evaporation_rate must be in [0, 1), got {}",
                self.evaporation_rate
            )));
        }
        if self.evaluation_budget == 0 {
            return Err(config_err("evaluation_budget must be positive"));
        }
        check_accuracy(self.accuracy)?;

        match self.policy {
            PheromonePolicy::Plain => {}
            PheromonePolicy::Elitist { elite_proportion } => {
                self.validate_elite(elite_proportion)?;
            }
            PheromonePolicy::MinMax {
                elite_proportion,
                upper_bound,
                lower_bound,
            } => {
                self.validate_elite(elite_proportion)?;
                if !(lower_bound >= 0.0 && upper_bound.is_finite()) {
                    return Err(config_err(format!(
                        "bounds must be finite and non-negative, got [{lower_bound}, {upper_bound}]"
                    )));
                }
                if lower_bound >= upper_bound {
                    return Err(config_err(format!(
                        "lower_bound ({lower_bound}) must be less than upper_bound ({upper_bound})"
                    )));
                }
            }
        }
        Ok(())
    }

    fn validate_elite(&self, elite_proportion: f64) -> Result<()> {
        if !(elite_proportion > 0.0 && elite_proportion <= 1.0) {
            return Err(config_err(format!(
                "elite_proportion must be in (0, 1], got {elite_proportion}"
            )));
        }
        if self.policy.elite_count(self.colony_size) == 0 {
            return Err(config_err(format!(
                "elite_proportion {elite_proportion} selects no ants from a colony of {}",
                self.colony_size
            )));
        }
        Ok(())
    }
}

fn config_err(msg: impl Into<String>) -> AcoError {
    AcoError::Configuration(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AcoConfig::default();
        assert_eq!(config.colony_size, 10);
        assert_eq!(config.evaluation_budget, 10_000);
        assert_eq!(config.policy, PheromonePolicy::Plain);
        assert!((config.beta - 2.0).abs() < 1e-15);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets_validate() {
        let plain = AcoConfig::tuned_plain();
        assert_eq!(plain.colony_size, 130);
        assert!(plain.validate().is_ok());

        let mmas = AcoConfig::tuned_elitist_min_max();
        assert_eq!(mmas.policy.elite_count(mmas.colony_size), 26);
        assert_eq!(mmas.policy.deposit_cap(), Some(10.0));
        assert_eq!(mmas.policy.evaporation_floor(), Some(1.0));
        assert!(mmas.validate().is_ok());
    }

    #[test]
    fn test_validate_bad_evaporation() {
        let config = AcoConfig::default().with_evaporation_rate(1.0);
        assert!(matches!(config.validate(), Err(AcoError::Configuration(_))));
        let config = AcoConfig::default().with_evaporation_rate(-0.1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_evaporation_ok() {
        assert!(AcoConfig::default().with_evaporation_rate(0.0).validate().is_ok());
    }

    #[test]
    fn test_validate_bad_scalars() {
        assert!(AcoConfig::default().with_colony_size(0).validate().is_err());
        assert!(AcoConfig::default().with_q(0.0).validate().is_err());
        assert!(AcoConfig::default().with_alpha(-1.0).validate().is_err());
        assert!(AcoConfig::default().with_beta(f64::NAN).validate().is_err());
        assert!(AcoConfig::default().with_evaluation_budget(0).validate().is_err());
    }

    #[test]
    fn test_validate_accuracy_range() {
        assert!(AcoConfig::default().with_accuracy(15).validate().is_ok());
        assert!(matches!(
            AcoConfig::default().with_accuracy(16).validate(),
            Err(AcoError::Configuration(_))
        ));
        assert!(AcoConfig::default().with_accuracy(400).validate().is_err());
        assert!(AcoConfig::default().with_accuracy(u32::MAX).validate().is_err());
    }

    #[test]
    fn test_validate_bounds_order() {
        let config = AcoConfig::default().with_policy(PheromonePolicy::MinMax {
            elite_proportion: 0.5,
            upper_bound: 1.0,
            lower_bound: 1.0,
        });
        assert!(config.validate().is_err());

        let config = AcoConfig::default().with_policy(PheromonePolicy::MinMax {
            elite_proportion: 0.5,
            upper_bound: 2.0,
            lower_bound: -1.0,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_elite_proportion() {
        let config = AcoConfig::default().with_policy(PheromonePolicy::Elitist {
            elite_proportion: 0.0,
        });
        assert!(config.validate().is_err());

        let config = AcoConfig::default().with_policy(PheromonePolicy::Elitist {
            elite_proportion: 1.5,
        });
        assert!(config.validate().is_err());

        // floor(0.05 * 10) == 0 ants would deposit
        let config = AcoConfig::default().with_policy(PheromonePolicy::Elitist {
            elite_proportion: 0.05,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_elite_count_floors() {
        let policy = PheromonePolicy::Elitist {
            elite_proportion: 0.3,
        };
        assert_eq!(policy.elite_count(10), 3);
        assert_eq!(policy.elite_count(7), 2);
        assert_eq!(PheromonePolicy::Plain.elite_count(7), 7);
    }

    #[test]
    fn test_policy_display() {
        assert_eq!(PheromonePolicy::Plain.to_string(), "plain");
        assert_eq!(
            PheromonePolicy::Elitist {
                elite_proportion: 0.5
            }
            .to_string(),
            "elitist"
        );
    }
}
