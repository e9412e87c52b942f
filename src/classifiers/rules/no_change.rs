use crate::classifiers::Classifier;
use crate::classifiers::ensemble::ConfigError;
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use std::sync::Arc;

/// Predicts the most recently observed label. Strong on streams with
/// temporal dependence between consecutive labels.
#[derive(Default)]
pub struct NoChange {
    num_classes: usize,
    last_class: Option<usize>,
}

impl NoChange {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Classifier for NoChange {
    fn get_votes_for_instance(&self, _instance: &dyn Instance) -> Vec<f64> {
        let mut votes = vec![0.0; self.num_classes];
        if let Some(c) = self.last_class {
            if c >= votes.len() {
                votes.resize(c + 1, 0.0);
            }
            votes[c] = 1.0;
        }
        votes
    }

    fn set_model_context(&mut self, header: Arc<InstanceHeader>) -> Result<(), ConfigError> {
        self.num_classes = header.number_of_classes();
        self.last_class = None;
        Ok(())
    }

    fn train_on_instance(&mut self, instance: &dyn Instance) {
        if let Some(class) = instance.class_value() {
            self.last_class = Some(class as usize);
        }
    }

    fn reset(&mut self) {
        self.last_class = None;
    }
}
