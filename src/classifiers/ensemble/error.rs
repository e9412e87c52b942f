use thiserror::Error;

/// Contract violations detected while building or binding an ensemble.
///
/// These are fatal to engine startup. Misbehaving pool members never surface
/// here: their votes are absorbed during aggregation instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("pool size must be at least 1")]
    EmptyPool,

    #[error("active count must be at least 1")]
    NoActiveLearners,

    #[error("active count {active} exceeds pool size {pool}")]
    ActiveCountExceedsPool { active: usize, pool: usize },

    #[error("window size must be greater than 0")]
    ZeroWindow,

    #[error("decay factor {0} is outside [0, 1)")]
    DecayOutOfRange(f64),

    #[error("reselection period must be at least 1")]
    ZeroReselectionPeriod,

    #[error("stacking supports binary targets only, got {classes} classes")]
    NonBinaryStacking { classes: usize },

    #[error("target attribute must be nominal")]
    UnsupportedTarget,
}
