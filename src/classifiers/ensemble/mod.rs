//! Adaptive online ensemble: a pool of incremental learners whose recent
//! accuracy is tracked per learner, the best `K` of which answer each query.

mod adaptive_ensemble;
mod aggregator;
mod config;
mod error;
mod handle;
mod selector;
mod stacking;
mod tracker;

pub use adaptive_ensemble::{AdaptiveEnsemble, EngineState, EnsembleOutput};
pub use aggregator::{Aggregator, VoteAccumulator, VoteContext, normalize};
pub use config::{EnsembleConfig, FitnessMode, VotingStrategy};
pub use error::ConfigError;
pub use handle::LearnerHandle;
pub use selector::{Selector, select};
pub use stacking::{StackingAggregator, StackingContext};
pub use tracker::{DecayedRecord, FitnessRecord, PerformanceTracker, WindowRecord};
