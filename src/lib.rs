pub mod classifiers;
pub mod core;
pub mod evaluation;
pub mod streams;
pub mod tasks;
pub mod ui;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use classifiers::ensemble::{AdaptiveEnsemble, ConfigError, EnsembleConfig};
