mod oracle_classifier;

pub use oracle_classifier::{ConstantClassifier, InvertedOracleClassifier, OracleClassifier};
