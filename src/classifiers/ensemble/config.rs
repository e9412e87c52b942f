use crate::classifiers::ensemble::ConfigError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

fn default_pool_size() -> usize {
    10
}

fn default_active_count() -> usize {
    3
}

fn default_reselection_period() -> u64 {
    1
}

fn default_window_size() -> usize {
    1000
}

fn default_true() -> bool {
    true
}

/// How recent performance is summarised per learner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum FitnessMode {
    /// Exact accuracy over the last `window_size` observations.
    SlidingWindow {
        #[serde(default = "default_window_size")]
        #[schemars(
            title = "Window Size",
            description = "Number of recent predictions kept per learner",
            range(min = 1)
        )]
        window_size: usize,
    },
    /// Exponentially smoothed accuracy, `score = score * alpha + (1 - alpha) * correct`.
    Decay {
        #[schemars(
            title = "Decay Factor",
            description = "Weight of the previous score, in [0, 1)",
            range(min = 0.0, max = 1.0)
        )]
        decay_factor: f64,
    },
}

impl Default for FitnessMode {
    fn default() -> Self {
        FitnessMode::SlidingWindow {
            window_size: default_window_size(),
        }
    }
}

/// How the active learners' votes become the ensemble's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum VotingStrategy {
    /// Each active learner casts one vote for its arg-max class.
    #[default]
    Majority,
    /// Each active learner adds its normalised distribution, scaled by fitness.
    Weighted {
        #[serde(default = "default_true")]
        #[schemars(
            title = "Use Fitness Weights",
            description = "Scale votes by fitness (false = every learner weighs 1.0)"
        )]
        use_fitness_weights: bool,
    },
    /// A meta-learner trained online on the pool's votes answers instead.
    Stacking {
        #[serde(default)]
        #[schemars(
            title = "Cascade Features",
            description = "Feed the original input attributes to the meta-learner too"
        )]
        cascade_features: bool,
    },
}

impl VotingStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            VotingStrategy::Majority => "majority",
            VotingStrategy::Weighted { .. } => "weighted",
            VotingStrategy::Stacking { .. } => "stacking",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EnsembleConfig {
    #[serde(default = "default_pool_size")]
    #[schemars(
        title = "Pool Size",
        description = "Number of base learners kept in the pool",
        range(min = 1)
    )]
    pub pool_size: usize,

    #[serde(default)]
    #[schemars(title = "Fitness", description = "Recent-performance estimator")]
    pub fitness: FitnessMode,

    #[serde(default = "default_active_count")]
    #[schemars(
        title = "Active Count",
        description = "Number of top learners that vote (K)",
        range(min = 1)
    )]
    pub active_count: usize,

    #[serde(default = "default_reselection_period")]
    #[schemars(
        title = "Reselection Period",
        description = "Recompute the active set every N trained instances",
        range(min = 1)
    )]
    pub reselection_period: u64,

    #[serde(default)]
    #[schemars(title = "Voting", description = "Aggregation strategy")]
    pub voting: VotingStrategy,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            pool_size: default_pool_size(),
            fitness: FitnessMode::default(),
            active_count: default_active_count(),
            reselection_period: default_reselection_period(),
            voting: VotingStrategy::default(),
        }
    }
}

impl EnsembleConfig {
    /// Checks everything that can be checked before the target domain is known.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool_size == 0 {
            return Err(ConfigError::EmptyPool);
        }
        if self.active_count == 0 {
            return Err(ConfigError::NoActiveLearners);
        }
        if self.active_count > self.pool_size {
            return Err(ConfigError::ActiveCountExceedsPool {
                active: self.active_count,
                pool: self.pool_size,
            });
        }
        match self.fitness {
            FitnessMode::SlidingWindow { window_size: 0 } => return Err(ConfigError::ZeroWindow),
            FitnessMode::Decay { decay_factor } if !(0.0..1.0).contains(&decay_factor) => {
                return Err(ConfigError::DecayOutOfRange(decay_factor));
            }
            _ => {}
        }
        if self.reselection_period == 0 {
            return Err(ConfigError::ZeroReselectionPeriod);
        }
        Ok(())
    }

    /// Checks the target domain once the stream schema is bound.
    pub fn validate_target(&self, num_classes: usize) -> Result<(), ConfigError> {
        if num_classes == 0 {
            return Err(ConfigError::UnsupportedTarget);
        }
        if matches!(self.voting, VotingStrategy::Stacking { .. }) && num_classes != 2 {
            return Err(ConfigError::NonBinaryStacking {
                classes: num_classes,
            });
        }
        Ok(())
    }
}
