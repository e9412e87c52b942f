use crate::classifiers::Classifier;
use crate::classifiers::ensemble::ConfigError;
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use std::sync::Arc;

/// One pool member. The ensemble owns every handle exclusively.
pub struct LearnerHandle {
    index: usize,
    learner: Box<dyn Classifier>,
}

impl LearnerHandle {
    pub fn new(index: usize, learner: Box<dyn Classifier>) -> Self {
        Self { index, learner }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn predict_votes(&self, instance: &dyn Instance) -> Vec<f64> {
        self.learner.get_votes_for_instance(instance)
    }

    pub fn train(&mut self, instance: &dyn Instance) {
        self.learner.train_on_instance(instance);
    }

    pub fn reset(&mut self) {
        self.learner.reset();
    }

    pub fn set_model_context(&mut self, header: Arc<InstanceHeader>) -> Result<(), ConfigError> {
        self.learner.set_model_context(header)
    }
}

impl std::fmt::Debug for LearnerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LearnerHandle")
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}
