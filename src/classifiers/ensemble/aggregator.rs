use crate::classifiers::ensemble::{ConfigError, StackingAggregator, VotingStrategy};
use crate::classifiers::{Classifier, predicted_class};
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use std::sync::Arc;
use tracing::trace;

/// Divides every score by the vector's sum. A zero sum leaves the vector as is.
pub fn normalize(votes: &[f64]) -> Vec<f64> {
    let sum: f64 = votes.iter().sum();
    if sum == 0.0 {
        return votes.to_vec();
    }
    votes.iter().map(|v| v / sum).collect()
}

/// Normalised distribution of one member's votes, padded to `num_classes`.
///
/// `None` when the vote is malformed: empty, longer than the target domain,
/// negative or non-finite, or summing to zero. Such votes count for nothing.
pub(crate) fn member_distribution(votes: &[f64], num_classes: usize) -> Option<Vec<f64>> {
    if votes.is_empty() || votes.len() > num_classes {
        return None;
    }
    if votes.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return None;
    }
    let mut dist = normalize(votes);
    if dist.iter().sum::<f64>() == 0.0 {
        return None;
    }
    dist.resize(num_classes, 0.0);
    Some(dist)
}

/// Per-call class → score tally.
#[derive(Clone, Debug, Default)]
pub struct VoteAccumulator {
    scores: Vec<f64>,
}

impl VoteAccumulator {
    pub fn new(num_classes: usize) -> Self {
        Self {
            scores: vec![0.0; num_classes],
        }
    }

    pub fn add(&mut self, class: usize, mass: f64) {
        if class >= self.scores.len() {
            self.scores.resize(class + 1, 0.0);
        }
        self.scores[class] += mass;
    }

    pub fn add_distribution(&mut self, dist: &[f64], weight: f64) {
        for (class, p) in dist.iter().enumerate() {
            self.add(class, p * weight);
        }
    }

    pub fn total(&self) -> f64 {
        self.scores.iter().sum()
    }

    pub fn into_votes(self) -> Vec<f64> {
        self.scores
    }
}

/// Everything a strategy may look at for one instance.
pub struct VoteContext<'a> {
    pub instance: &'a dyn Instance,
    /// Raw votes of every pool member, by pool index.
    pub member_votes: &'a [Vec<f64>],
    pub active: &'a [usize],
    pub fitness: &'a [f64],
    pub num_classes: usize,
}

impl VoteContext<'_> {
    fn active_distributions(&self) -> impl Iterator<Item = (usize, Vec<f64>)> + '_ {
        self.active.iter().filter_map(|&i| {
            let votes = self.member_votes.get(i)?;
            match member_distribution(votes, self.num_classes) {
                Some(dist) => Some((i, dist)),
                None => {
                    trace!(learner = i, len = votes.len(), "ignoring malformed vote");
                    None
                }
            }
        })
    }
}

/// One unit vote per active member for its arg-max class.
pub(crate) fn majority(ctx: &VoteContext<'_>) -> Vec<f64> {
    let mut acc = VoteAccumulator::new(ctx.num_classes);
    for (_, dist) in ctx.active_distributions() {
        if let Some(class) = predicted_class(&dist) {
            acc.add(class, 1.0);
        }
    }
    acc.into_votes()
}

pub enum Aggregator {
    Majority,
    Weighted { use_fitness_weights: bool },
    Stacking(Box<StackingAggregator>),
}

impl Aggregator {
    /// `meta` is only invoked for the stacking strategy.
    pub fn new(strategy: VotingStrategy, meta: impl FnOnce() -> Box<dyn Classifier>) -> Self {
        match strategy {
            VotingStrategy::Majority => Aggregator::Majority,
            VotingStrategy::Weighted {
                use_fitness_weights,
            } => Aggregator::Weighted {
                use_fitness_weights,
            },
            VotingStrategy::Stacking { cascade_features } => {
                Aggregator::Stacking(Box::new(StackingAggregator::new(meta(), cascade_features)))
            }
        }
    }

    pub fn set_model_context(
        &mut self,
        header: &Arc<InstanceHeader>,
        pool_size: usize,
    ) -> Result<(), ConfigError> {
        match self {
            Aggregator::Stacking(s) => s.set_model_context(header, pool_size),
            _ => Ok(()),
        }
    }

    pub fn combine(&self, ctx: &VoteContext<'_>) -> Vec<f64> {
        match self {
            Aggregator::Majority => majority(ctx),
            Aggregator::Weighted {
                use_fitness_weights,
            } => {
                let mut acc = VoteAccumulator::new(ctx.num_classes);
                for (i, dist) in ctx.active_distributions() {
                    let weight = if *use_fitness_weights {
                        ctx.fitness.get(i).copied().unwrap_or(0.0)
                    } else {
                        1.0
                    };
                    acc.add_distribution(&dist, weight);
                }
                acc.into_votes()
            }
            Aggregator::Stacking(s) => s.combine(ctx),
        }
    }

    /// Lets trainable strategies learn from a labelled instance.
    pub fn learn(&mut self, ctx: &VoteContext<'_>) {
        if let Aggregator::Stacking(s) = self {
            s.learn(ctx);
        }
    }

    pub fn reset(&mut self) {
        if let Aggregator::Stacking(s) = self {
            s.reset();
        }
    }
}
