use crate::classifiers::Classifier;
use crate::classifiers::ensemble::ConfigError;
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use std::collections::VecDeque;
use std::sync::Arc;

struct Stored {
    inputs: Vec<f64>,
    class: usize,
}

/// k nearest neighbours over the most recent `limit` labelled instances.
///
/// Numeric inputs are min-max scaled by the range seen so far; nominal inputs
/// contribute 0 when equal and 1 otherwise. Missing inputs count as maximally
/// distant.
pub struct Knn {
    k: usize,
    limit: usize,
    num_classes: usize,
    /// Header positions of the inputs and whether each is nominal.
    inputs: Vec<(usize, bool)>,
    window: VecDeque<Stored>,
    min: Vec<f64>,
    max: Vec<f64>,
}

impl Knn {
    pub fn new(k: usize, limit: usize) -> Self {
        Self {
            k: k.max(1),
            limit: limit.max(1),
            num_classes: 0,
            inputs: Vec::new(),
            window: VecDeque::new(),
            min: Vec::new(),
            max: Vec::new(),
        }
    }

    fn extract(&self, instance: &dyn Instance) -> Vec<f64> {
        self.inputs
            .iter()
            .map(|&(i, _)| {
                if instance.is_missing_at_index(i) {
                    f64::NAN
                } else {
                    instance.value_at_index(i).unwrap_or(f64::NAN)
                }
            })
            .collect()
    }

    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        let mut sum = 0.0;
        for (j, &(_, nominal)) in self.inputs.iter().enumerate() {
            let d = if a[j].is_nan() || b[j].is_nan() {
                1.0
            } else if nominal {
                if a[j] == b[j] { 0.0 } else { 1.0 }
            } else {
                let range = self.max[j] - self.min[j];
                if range > 0.0 {
                    (a[j] - b[j]) / range
                } else {
                    0.0
                }
            };
            sum += d * d;
        }
        sum.sqrt()
    }
}

impl Classifier for Knn {
    fn get_votes_for_instance(&self, instance: &dyn Instance) -> Vec<f64> {
        let mut votes = vec![0.0; self.num_classes];
        if self.window.is_empty() {
            return votes;
        }
        let query = self.extract(instance);
        let mut scored: Vec<(f64, usize)> = self
            .window
            .iter()
            .map(|s| (self.distance(&query, &s.inputs), s.class))
            .collect();
        scored.sort_by(|a, b| a.0.total_cmp(&b.0));

        for &(_, class) in scored.iter().take(self.k) {
            if class >= votes.len() {
                votes.resize(class + 1, 0.0);
            }
            votes[class] += 1.0;
        }
        votes
    }

    fn set_model_context(&mut self, header: Arc<InstanceHeader>) -> Result<(), ConfigError> {
        self.num_classes = header.number_of_classes();
        self.inputs = header
            .input_indices()
            .map(|i| (i, header.attributes[i].is_nominal()))
            .collect();
        self.reset();
        Ok(())
    }

    fn train_on_instance(&mut self, instance: &dyn Instance) {
        let Some(class) = instance.class_value() else {
            return;
        };
        let inputs = self.extract(instance);
        for (j, &v) in inputs.iter().enumerate() {
            if !v.is_nan() {
                self.min[j] = self.min[j].min(v);
                self.max[j] = self.max[j].max(v);
            }
        }
        if self.window.len() == self.limit {
            self.window.pop_front();
        }
        self.window.push_back(Stored {
            inputs,
            class: class as usize,
        });
    }

    fn reset(&mut self) {
        self.window.clear();
        self.min = vec![f64::INFINITY; self.inputs.len()];
        self.max = vec![f64::NEG_INFINITY; self.inputs.len()];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{binary_header, binary_instance};

    fn trained(k: usize, limit: usize, points: &[(f64, usize)]) -> Knn {
        let mut knn = Knn::new(k, limit);
        knn.set_model_context(binary_header()).unwrap();
        for &(x, y) in points {
            knn.train_on_instance(&binary_instance(x, Some(y)));
        }
        knn
    }

    #[test]
    fn nearest_neighbours_decide() {
        let knn = trained(3, 100, &[(0.0, 0), (0.1, 0), (0.2, 0), (5.0, 1), (5.1, 1)]);
        assert_eq!(knn.get_votes_for_instance(&binary_instance(0.05, None)), vec![3.0, 0.0]);
        assert_eq!(knn.get_votes_for_instance(&binary_instance(5.2, None)), vec![1.0, 2.0]);
    }

    #[test]
    fn window_forgets_oldest() {
        let knn = trained(1, 2, &[(0.0, 0), (5.0, 1), (6.0, 1)]);
        assert_eq!(knn.get_votes_for_instance(&binary_instance(0.0, None)), vec![0.0, 1.0]);
    }

    #[test]
    fn empty_and_reset_vote_nothing() {
        let mut knn = trained(1, 5, &[(1.0, 1)]);
        knn.reset();
        assert_eq!(knn.get_votes_for_instance(&binary_instance(1.0, None)), vec![0.0, 0.0]);
    }
}
