//! Deterministic classifiers, streams and fixtures for tests.

mod dummies;
mod spies;
mod streams;
mod stubs;

pub use dummies::ClassifierNoneVotes;
pub use spies::{TrainSpyClassifier, TrainSpyHandle};
pub use streams::VecStream;
pub use stubs::{ConstantClassifier, InvertedOracleClassifier, OracleClassifier};

use crate::core::attributes::{AttributeRef, NominalAttribute, NumericAttribute};
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::DenseInstance;
use std::sync::Arc;

/// One numeric input `x` followed by a nominal `class` with `classes` values.
pub fn nominal_header(classes: usize) -> Arc<InstanceHeader> {
    let labels = (0..classes).map(|c| c.to_string()).collect();
    let attrs: Vec<AttributeRef> = vec![
        Arc::new(NumericAttribute::new("x")),
        Arc::new(NominalAttribute::with_values("class", labels)),
    ];
    Arc::new(InstanceHeader::new("test", attrs, 1))
}

pub fn binary_header() -> Arc<InstanceHeader> {
    nominal_header(2)
}

pub fn binary_instance(x: f64, label: Option<usize>) -> DenseInstance {
    let y = label.map_or(f64::NAN, |l| l as f64);
    DenseInstance::new(binary_header(), vec![x, y], 1.0)
}
