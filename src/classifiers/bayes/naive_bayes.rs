use crate::classifiers::classifier::Classifier;
use crate::classifiers::ensemble::ConfigError;
use crate::core::estimators::GaussianEstimator;
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use std::sync::Arc;

/// Per-attribute class-conditional statistics.
#[derive(Clone, Debug)]
enum AttributeObserver {
    /// `counts[class][value]`, Laplace-smoothed over `num_values`.
    Nominal {
        counts: Vec<Vec<f64>>,
        num_values: usize,
    },
    Numeric(Vec<GaussianEstimator>),
}

impl AttributeObserver {
    fn for_attribute(num_values: Option<usize>) -> Self {
        match num_values {
            Some(n) => AttributeObserver::Nominal {
                counts: Vec::new(),
                num_values: n,
            },
            None => AttributeObserver::Numeric(Vec::new()),
        }
    }

    fn observe(&mut self, value: f64, class: usize, weight: f64) {
        match self {
            AttributeObserver::Nominal { counts, num_values } => {
                if value < 0.0 {
                    return;
                }
                let v = value as usize;
                if class >= counts.len() {
                    counts.resize_with(class + 1, Vec::new);
                }
                let row = &mut counts[class];
                if v >= row.len() {
                    row.resize(v + 1, 0.0);
                }
                row[v] += weight;
                *num_values = (*num_values).max(v + 1);
            }
            AttributeObserver::Numeric(estimators) => {
                if class >= estimators.len() {
                    estimators.resize_with(class + 1, GaussianEstimator::new);
                }
                estimators[class].add_observation(value, weight);
            }
        }
    }

    /// `P(value | class)`, 0 for classes the observer has never seen.
    fn probability(&self, value: f64, class: usize) -> f64 {
        match self {
            AttributeObserver::Nominal { counts, num_values } => {
                let Some(row) = counts.get(class) else {
                    return 0.0;
                };
                let count = if value >= 0.0 {
                    row.get(value as usize).copied().unwrap_or(0.0)
                } else {
                    0.0
                };
                let total: f64 = row.iter().sum();
                (count + 1.0) / (total + (*num_values).max(1) as f64)
            }
            AttributeObserver::Numeric(estimators) => estimators
                .get(class)
                .filter(|e| e.total_weight() > 0.0)
                .map_or(0.0, |e| e.probability_density(value)),
        }
    }
}

pub struct NaiveBayes {
    header: Option<Arc<InstanceHeader>>,
    class_distribution: Vec<f64>,
    /// Indexed like the header's attributes; `None` at the class position.
    observers: Vec<Option<AttributeObserver>>,
}

impl Default for NaiveBayes {
    fn default() -> Self {
        Self::new()
    }
}

impl NaiveBayes {
    pub fn new() -> Self {
        Self {
            header: None,
            class_distribution: Vec::new(),
            observers: Vec::new(),
        }
    }

    fn fresh_observers(header: &InstanceHeader) -> Vec<Option<AttributeObserver>> {
        (0..header.number_of_attributes())
            .map(|i| {
                if i == header.class_index() {
                    return None;
                }
                header
                    .attribute_at_index(i)
                    .map(|a| AttributeObserver::for_attribute(a.num_values()))
            })
            .collect()
    }
}

impl Classifier for NaiveBayes {
    fn get_votes_for_instance(&self, instance: &dyn Instance) -> Vec<f64> {
        let class_sum: f64 = self.class_distribution.iter().sum();
        if class_sum <= 0.0 {
            return vec![0.0; self.class_distribution.len()];
        }

        let mut votes = Vec::with_capacity(self.class_distribution.len());
        for (class, prior) in self.class_distribution.iter().enumerate() {
            let mut score = prior / class_sum;
            for (i, observer) in self.observers.iter().enumerate() {
                let Some(observer) = observer else { continue };
                if instance.is_missing_at_index(i) {
                    continue;
                }
                let Some(x) = instance.value_at_index(i) else {
                    continue;
                };
                score *= observer.probability(x, class);
            }
            votes.push(score);
        }
        votes
    }

    fn set_model_context(&mut self, header: Arc<InstanceHeader>) -> Result<(), ConfigError> {
        self.class_distribution = vec![0.0; header.number_of_classes()];
        self.observers = Self::fresh_observers(&header);
        self.header = Some(header);
        Ok(())
    }

    fn train_on_instance(&mut self, instance: &dyn Instance) {
        let w = instance.weight();
        if w <= 0.0 {
            return;
        }
        let Some(class) = instance.class_value() else {
            return;
        };
        let class = class as usize;

        if class >= self.class_distribution.len() {
            self.class_distribution.resize(class + 1, 0.0);
        }
        self.class_distribution[class] += w;

        for (i, observer) in self.observers.iter_mut().enumerate() {
            let Some(observer) = observer else { continue };
            if instance.is_missing_at_index(i) {
                continue;
            }
            if let Some(x) = instance.value_at_index(i) {
                observer.observe(x, class, w);
            }
        }
    }

    fn reset(&mut self) {
        self.class_distribution.fill(0.0);
        if let Some(header) = self.header.as_ref() {
            self.observers = Self::fresh_observers(header);
        }
    }
}
