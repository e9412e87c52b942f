use crate::classifiers::predicted_class;
use crate::core::instances::Instance;
use crate::evaluation::{BasicEstimator, Estimator, Measurement};

pub trait PerformanceEvaluator {
    /// Scores one prediction against the instance's revealed label.
    fn add_result(&mut self, instance: &dyn Instance, votes: Vec<f64>);
    fn performance(&self) -> Vec<Measurement>;
    fn reset(&mut self);
}

/// Accuracy and Cohen's kappa over every scored instance.
///
/// Instances without a label, or whose votes name no class, are not scored.
pub struct BasicClassificationEvaluator<E: Estimator = BasicEstimator> {
    num_classes: usize,
    accuracy: E,
    /// Weight of true labels per class.
    row: Vec<f64>,
    /// Weight of predictions per class.
    col: Vec<f64>,
    total: f64,
}

impl<E: Estimator> BasicClassificationEvaluator<E> {
    pub fn new(num_classes: usize) -> Self {
        Self {
            num_classes,
            accuracy: E::default(),
            row: vec![0.0; num_classes],
            col: vec![0.0; num_classes],
            total: 0.0,
        }
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    fn kappa(&self) -> f64 {
        if self.total <= 0.0 {
            return 0.0;
        }
        let p0 = self.accuracy.estimation();
        let pc: f64 = self
            .row
            .iter()
            .zip(&self.col)
            .map(|(r, c)| (r / self.total) * (c / self.total))
            .sum();
        if (1.0 - pc).abs() < f64::EPSILON {
            return 0.0;
        }
        (p0 - pc) / (1.0 - pc)
    }

    fn grow(&mut self, class: usize) {
        if class >= self.row.len() {
            self.row.resize(class + 1, 0.0);
            self.col.resize(class + 1, 0.0);
            self.num_classes = class + 1;
        }
    }
}

impl<E: Estimator> PerformanceEvaluator for BasicClassificationEvaluator<E> {
    fn add_result(&mut self, instance: &dyn Instance, votes: Vec<f64>) {
        let w = instance.weight();
        if w <= 0.0 {
            return;
        }
        let Some(truth) = instance.class_value() else {
            return;
        };
        let Some(predicted) = predicted_class(&votes) else {
            return;
        };
        let truth = truth as usize;

        self.grow(truth.max(predicted));
        self.row[truth] += w;
        self.col[predicted] += w;
        self.total += w;
        self.accuracy
            .add(if predicted == truth { 1.0 } else { 0.0 }, w);
    }

    fn performance(&self) -> Vec<Measurement> {
        vec![
            Measurement::new("accuracy", self.accuracy.estimation()),
            Measurement::new("kappa", self.kappa()),
        ]
    }

    fn reset(&mut self) {
        self.accuracy.reset();
        self.row.fill(0.0);
        self.col.fill(0.0);
        self.total = 0.0;
    }
}
