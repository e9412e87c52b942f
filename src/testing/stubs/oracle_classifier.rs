use crate::classifiers::Classifier;
use crate::classifiers::ensemble::ConfigError;
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use std::sync::Arc;

fn one_hot(class: usize, num_classes: usize) -> Vec<f64> {
    let mut v = vec![0.0; num_classes.max(2)];
    if class < v.len() {
        v[class] = 1.0;
    }
    v
}

/// Reads the label off the instance, so it is right whenever one is present.
#[derive(Default)]
pub struct OracleClassifier {
    num_classes: usize,
}

impl Classifier for OracleClassifier {
    fn get_votes_for_instance(&self, instance: &dyn Instance) -> Vec<f64> {
        let y = instance.class_value().unwrap_or_default() as usize;
        one_hot(y, self.num_classes)
    }

    fn set_model_context(&mut self, header: Arc<InstanceHeader>) -> Result<(), ConfigError> {
        self.num_classes = header.number_of_classes();
        Ok(())
    }

    fn train_on_instance(&mut self, _instance: &dyn Instance) {}

    fn reset(&mut self) {}
}

/// Always votes for the class after the true one, so it is never right.
#[derive(Default)]
pub struct InvertedOracleClassifier {
    num_classes: usize,
}

impl Classifier for InvertedOracleClassifier {
    fn get_votes_for_instance(&self, instance: &dyn Instance) -> Vec<f64> {
        let n = self.num_classes.max(2);
        let y = instance.class_value().unwrap_or_default() as usize;
        one_hot((y + 1) % n, n)
    }

    fn set_model_context(&mut self, header: Arc<InstanceHeader>) -> Result<(), ConfigError> {
        self.num_classes = header.number_of_classes();
        Ok(())
    }

    fn train_on_instance(&mut self, _instance: &dyn Instance) {}

    fn reset(&mut self) {}
}

/// Always votes for one fixed class.
pub struct ConstantClassifier {
    class: usize,
    num_classes: usize,
}

impl ConstantClassifier {
    pub fn new(class: usize) -> Self {
        Self {
            class,
            num_classes: 2,
        }
    }
}

impl Classifier for ConstantClassifier {
    fn get_votes_for_instance(&self, _instance: &dyn Instance) -> Vec<f64> {
        one_hot(self.class, self.num_classes)
    }

    fn set_model_context(&mut self, header: Arc<InstanceHeader>) -> Result<(), ConfigError> {
        self.num_classes = header.number_of_classes();
        Ok(())
    }

    fn train_on_instance(&mut self, _instance: &dyn Instance) {}

    fn reset(&mut self) {}
}
