pub mod bayes;
pub mod classifier;
pub mod ensemble;
pub mod lazy;
pub mod rules;

pub use classifier::{Classifier, predicted_class};
