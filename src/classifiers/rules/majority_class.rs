use crate::classifiers::Classifier;
use crate::classifiers::ensemble::ConfigError;
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use std::sync::Arc;

/// Votes the weighted class distribution seen so far.
#[derive(Default)]
pub struct MajorityClass {
    observed_class_distribution: Vec<f64>,
}

impl MajorityClass {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Classifier for MajorityClass {
    fn get_votes_for_instance(&self, _instance: &dyn Instance) -> Vec<f64> {
        self.observed_class_distribution.clone()
    }

    fn set_model_context(&mut self, header: Arc<InstanceHeader>) -> Result<(), ConfigError> {
        self.observed_class_distribution = vec![0.0; header.number_of_classes()];
        Ok(())
    }

    fn train_on_instance(&mut self, instance: &dyn Instance) {
        let Some(class) = instance.class_value() else {
            return;
        };
        let class = class as usize;
        if class >= self.observed_class_distribution.len() {
            self.observed_class_distribution.resize(class + 1, 0.0);
        }
        self.observed_class_distribution[class] += instance.weight();
    }

    fn reset(&mut self) {
        self.observed_class_distribution.fill(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{binary_header, binary_instance};

    #[test]
    fn votes_follow_observed_counts() {
        let mut m = MajorityClass::new();
        m.set_model_context(binary_header()).unwrap();
        assert_eq!(m.get_votes_for_instance(&binary_instance(0.0, None)), vec![0.0, 0.0]);

        for y in [1, 1, 0] {
            m.train_on_instance(&binary_instance(0.0, Some(y)));
        }
        m.train_on_instance(&binary_instance(0.0, None));
        assert_eq!(m.get_votes_for_instance(&binary_instance(0.0, None)), vec![1.0, 2.0]);

        m.reset();
        assert_eq!(m.get_votes_for_instance(&binary_instance(0.0, None)), vec![0.0, 0.0]);
    }
}
