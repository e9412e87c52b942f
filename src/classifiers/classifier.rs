use crate::classifiers::ensemble::ConfigError;
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use crate::evaluation::Measurement;
use std::sync::Arc;

pub trait Classifier {
    fn get_votes_for_instance(&self, instance: &dyn Instance) -> Vec<f64>;

    /// Binds the learner to a stream schema. Learners that cannot model the
    /// given target domain reject it here.
    fn set_model_context(&mut self, header: Arc<InstanceHeader>) -> Result<(), ConfigError>;

    fn train_on_instance(&mut self, instance: &dyn Instance);

    /// Forgets everything learned so far while keeping the model context.
    fn reset(&mut self);

    fn measurements(&self) -> Vec<Measurement> {
        Vec::new()
    }
}

/// Arg-max of a vote vector, lowest index on ties. `None` when no class has a
/// positive finite score.
pub fn predicted_class(votes: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in votes.iter().enumerate() {
        if !v.is_finite() || v <= 0.0 {
            continue;
        }
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}
