use crate::classifiers::ensemble::aggregator::member_distribution;
use crate::classifiers::ensemble::{
    Aggregator, ConfigError, EnsembleConfig, LearnerHandle, PerformanceTracker, Selector,
    VoteContext,
};
use crate::classifiers::{Classifier, predicted_class};
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use crate::evaluation::Measurement;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Pool allocated, no stream schema bound yet.
    Uninitialized,
    Ready,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleOutput {
    pub votes: Vec<f64>,
    pub predicted: Option<usize>,
}

/// Pool of incremental learners answered by its currently fittest members.
///
/// Each labelled instance is scored against every member's prediction before
/// any member trains on it; the active set only changes at reselection points.
pub struct AdaptiveEnsemble {
    config: EnsembleConfig,
    state: EngineState,
    pool: Vec<LearnerHandle>,
    tracker: PerformanceTracker,
    selector: Selector,
    aggregator: Aggregator,
    header: Option<Arc<InstanceHeader>>,
    num_classes: usize,
    instances_trained: u64,
    reselections: u64,
}

impl AdaptiveEnsemble {
    /// Validates `config` and builds the pool. `factory` is called once per
    /// pool index `0..pool_size`; with stacking it is called once more with
    /// `pool_size` for the meta-learner.
    pub fn new<F>(config: EnsembleConfig, mut factory: F) -> Result<Self, ConfigError>
    where
        F: FnMut(usize) -> Box<dyn Classifier>,
    {
        config.validate()?;

        let pool: Vec<LearnerHandle> = (0..config.pool_size)
            .map(|i| LearnerHandle::new(i, factory(i)))
            .collect();
        let tracker = PerformanceTracker::new(config.pool_size, &config.fitness);
        let mut selector = Selector::new(config.active_count, config.reselection_period);
        selector.reselect(&tracker.fitness_vector());
        let aggregator = Aggregator::new(config.voting, || factory(config.pool_size));

        Ok(Self {
            config,
            state: EngineState::Uninitialized,
            pool,
            tracker,
            selector,
            aggregator,
            header: None,
            num_classes: 0,
            instances_trained: 0,
            reselections: 0,
        })
    }

    /// Builds the ensemble and binds it to `header` in one step.
    pub fn with_header<F>(
        config: EnsembleConfig,
        factory: F,
        header: Arc<InstanceHeader>,
    ) -> Result<Self, ConfigError>
    where
        F: FnMut(usize) -> Box<dyn Classifier>,
    {
        let mut ensemble = Self::new(config, factory)?;
        ensemble.set_model_context(header)?;
        Ok(ensemble)
    }

    pub fn config(&self) -> &EnsembleConfig {
        &self.config
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn pool_size(&self) -> usize {
        self.pool.len()
    }

    pub fn active_set(&self) -> &[usize] {
        self.selector.active_set()
    }

    pub fn fitness_vector(&self) -> Vec<f64> {
        self.tracker.fitness_vector()
    }

    pub fn instances_trained(&self) -> u64 {
        self.instances_trained
    }

    /// Raw votes of every pool member, by pool index.
    pub fn member_votes(&self, instance: &dyn Instance) -> Vec<Vec<f64>> {
        self.pool.iter().map(|h| h.predict_votes(instance)).collect()
    }

    /// Runs the whole predict, observe, train, reselect cycle for one instance
    /// and returns the prediction made before training.
    pub fn process(&mut self, instance: &dyn Instance) -> EnsembleOutput {
        if self.state != EngineState::Ready {
            return EnsembleOutput {
                votes: Vec::new(),
                predicted: None,
            };
        }
        let member_votes = self.member_votes(instance);
        let votes = self.combine(instance, &member_votes);
        self.learn(instance, &member_votes);
        let predicted = predicted_class(&votes);
        EnsembleOutput { votes, predicted }
    }

    fn combine(&self, instance: &dyn Instance, member_votes: &[Vec<f64>]) -> Vec<f64> {
        let fitness = self.tracker.fitness_vector();
        let ctx = VoteContext {
            instance,
            member_votes,
            active: self.selector.active_set(),
            fitness: &fitness,
            num_classes: self.num_classes,
        };
        self.aggregator.combine(&ctx)
    }

    fn learn(&mut self, instance: &dyn Instance, member_votes: &[Vec<f64>]) {
        let Some(truth) = instance.class_value() else {
            return;
        };
        let truth = truth as usize;

        // Malformed votes predict nothing, exactly as the aggregator sees them.
        for (i, votes) in member_votes.iter().enumerate() {
            let predicted =
                member_distribution(votes, self.num_classes).and_then(|d| predicted_class(&d));
            self.tracker.observe(i, predicted, truth);
        }

        let fitness = self.tracker.fitness_vector();
        let ctx = VoteContext {
            instance,
            member_votes,
            active: self.selector.active_set(),
            fitness: &fitness,
            num_classes: self.num_classes,
        };
        self.aggregator.learn(&ctx);

        for handle in &mut self.pool {
            handle.train(instance);
        }
        self.instances_trained += 1;

        if let Some(changed) = self.selector.tick(&fitness) {
            self.reselections += 1;
            if changed {
                debug!(
                    active = ?self.selector.active_set(),
                    instances = self.instances_trained,
                    "active set changed"
                );
            }
        }
    }
}

impl Classifier for AdaptiveEnsemble {
    fn get_votes_for_instance(&self, instance: &dyn Instance) -> Vec<f64> {
        if self.state != EngineState::Ready {
            return Vec::new();
        }
        let member_votes = self.member_votes(instance);
        self.combine(instance, &member_votes)
    }

    fn set_model_context(&mut self, header: Arc<InstanceHeader>) -> Result<(), ConfigError> {
        let num_classes = header.number_of_classes();
        self.config.validate_target(num_classes)?;
        self.aggregator
            .set_model_context(&header, self.config.pool_size)?;
        for handle in &mut self.pool {
            handle.set_model_context(Arc::clone(&header))?;
        }

        self.num_classes = num_classes;
        self.header = Some(header);
        self.state = EngineState::Ready;
        info!(
            pool_size = self.config.pool_size,
            active_count = self.config.active_count,
            voting = self.config.voting.name(),
            classes = num_classes,
            "ensemble ready"
        );
        Ok(())
    }

    fn train_on_instance(&mut self, instance: &dyn Instance) {
        if self.state != EngineState::Ready {
            return;
        }
        let member_votes = self.member_votes(instance);
        self.learn(instance, &member_votes);
    }

    fn reset(&mut self) {
        self.tracker.reset_all();
        for handle in &mut self.pool {
            handle.reset();
        }
        self.aggregator.reset();
        self.selector.reselect(&self.tracker.fitness_vector());
        self.instances_trained = 0;
        self.reselections = 0;
        debug!(pool_size = self.pool.len(), "ensemble reset");
    }

    fn measurements(&self) -> Vec<Measurement> {
        let fitness = self.tracker.fitness_vector();
        let active = self.selector.active_set();
        let best = fitness.iter().copied().fold(0.0, f64::max);
        let mean_active = if active.is_empty() {
            0.0
        } else {
            active.iter().map(|&i| fitness[i]).sum::<f64>() / active.len() as f64
        };
        vec![
            Measurement::new("ensemble_best_fitness", best),
            Measurement::new("ensemble_mean_active_fitness", mean_active),
            Measurement::new("ensemble_reselections", self.reselections as f64),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::bayes::NaiveBayes;
    use crate::classifiers::ensemble::{FitnessMode, VotingStrategy};
    use crate::testing::{
        ConstantClassifier, InvertedOracleClassifier, OracleClassifier, TrainSpyClassifier,
        binary_header, binary_instance, nominal_header,
    };

    fn config(pool: usize, window: usize, k: usize) -> EnsembleConfig {
        EnsembleConfig {
            pool_size: pool,
            fitness: FitnessMode::SlidingWindow {
                window_size: window,
            },
            active_count: k,
            reselection_period: 1,
            voting: VotingStrategy::Majority,
        }
    }

    /// Pool index 0 is always right, 1 always says class 1, the rest are always wrong.
    fn scenario_factory(i: usize) -> Box<dyn Classifier> {
        match i {
            0 => Box::new(OracleClassifier::default()),
            1 => Box::new(ConstantClassifier::new(1)),
            _ => Box::new(InvertedOracleClassifier::default()),
        }
    }

    #[test]
    fn top_two_are_selected_and_vote_together() {
        let mut e =
            AdaptiveEnsemble::with_header(config(5, 4, 2), scenario_factory, binary_header())
                .unwrap();
        assert_eq!(e.active_set(), &[0, 1]);

        for label in [1, 0, 1, 0] {
            e.process(&binary_instance(0.0, Some(label)));
        }
        assert_eq!(e.fitness_vector(), vec![1.0, 0.5, 0.0, 0.0, 0.0]);
        assert_eq!(e.active_set(), &[0, 1]);

        let out = e.process(&binary_instance(0.0, Some(1)));
        assert_eq!(out.votes, vec![0.0, 2.0]);
        assert_eq!(out.predicted, Some(1));
    }

    #[test]
    fn ties_among_the_rest_are_broken_by_index() {
        let factory = |i: usize| -> Box<dyn Classifier> {
            match i {
                3 => Box::new(OracleClassifier::default()),
                _ => Box::new(InvertedOracleClassifier::default()),
            }
        };
        let mut e = AdaptiveEnsemble::with_header(config(5, 4, 2), factory, binary_header())
            .unwrap();
        e.process(&binary_instance(0.0, Some(0)));
        assert_eq!(e.active_set(), &[3, 0]);
    }

    #[test]
    fn prediction_uses_pre_training_votes() {
        let mut e = AdaptiveEnsemble::with_header(
            config(1, 4, 1),
            |_| Box::new(OracleClassifier::default()) as Box<dyn Classifier>,
            binary_header(),
        )
        .unwrap();
        let out = e.process(&binary_instance(0.0, Some(0)));
        assert_eq!(out.votes, vec![1.0, 0.0]);
        assert_eq!(e.fitness_vector(), vec![0.25]);
    }

    #[test]
    fn unlabelled_instances_are_predicted_but_not_learned() {
        let spies: Vec<_> = (0..3).map(|_| TrainSpyClassifier::new()).collect();
        let handles: Vec<_> = spies.iter().map(|(_, h)| h.clone()).collect();
        let mut spies = spies.into_iter().map(|(s, _)| Some(s)).collect::<Vec<_>>();
        let factory = move |i: usize| -> Box<dyn Classifier> {
            Box::new(spies[i].take().expect("one spy per index"))
        };
        let mut e = AdaptiveEnsemble::with_header(config(3, 4, 2), factory, binary_header())
            .unwrap();

        e.process(&binary_instance(0.0, None));
        assert!(handles.iter().all(|h| h.count() == 0));
        assert_eq!(e.instances_trained(), 0);

        e.process(&binary_instance(0.0, Some(1)));
        assert!(handles.iter().all(|h| h.count() == 1));
        assert_eq!(e.instances_trained(), 1);
    }

    #[test]
    fn grace_period_delays_reselection() {
        let cfg = EnsembleConfig {
            reselection_period: 3,
            ..config(3, 4, 1)
        };
        let factory = |i: usize| -> Box<dyn Classifier> {
            match i {
                2 => Box::new(OracleClassifier::default()),
                _ => Box::new(InvertedOracleClassifier::default()),
            }
        };
        let mut e = AdaptiveEnsemble::with_header(cfg, factory, binary_header()).unwrap();
        e.process(&binary_instance(0.0, Some(0)));
        e.process(&binary_instance(0.0, Some(1)));
        assert_eq!(e.active_set(), &[0]);
        e.process(&binary_instance(0.0, Some(1)));
        assert_eq!(e.active_set(), &[2]);
    }

    #[test]
    fn reset_clears_fitness_and_learners() {
        let (spy, handle) = TrainSpyClassifier::new();
        let mut spy = Some(spy);
        let factory = move |i: usize| -> Box<dyn Classifier> {
            if i == 1 {
                if let Some(s) = spy.take() {
                    return Box::new(s);
                }
            }
            Box::new(OracleClassifier::default())
        };
        let mut e = AdaptiveEnsemble::with_header(config(2, 4, 1), factory, binary_header())
            .unwrap();
        for label in [0, 1, 1] {
            e.process(&binary_instance(0.0, Some(label)));
        }
        assert!(e.fitness_vector()[0] > 0.0);

        e.reset();
        assert_eq!(handle.resets(), 1);
        assert_eq!(e.fitness_vector(), vec![0.0, 0.0]);
        assert_eq!(e.active_set(), &[0]);
        assert_eq!(e.state(), EngineState::Ready);
        assert_eq!(e.instances_trained(), 0);
    }

    #[test]
    fn stacking_with_three_classes_fails_to_build() {
        let cfg = EnsembleConfig {
            voting: VotingStrategy::Stacking {
                cascade_features: false,
            },
            ..config(3, 4, 2)
        };
        let err = AdaptiveEnsemble::with_header(
            cfg,
            |_| Box::new(OracleClassifier::default()) as Box<dyn Classifier>,
            nominal_header(3),
        )
        .err()
        .unwrap();
        assert_eq!(err, ConfigError::NonBinaryStacking { classes: 3 });
    }

    #[test]
    fn invalid_config_fails_before_building_the_pool() {
        let mut calls = 0;
        let err = AdaptiveEnsemble::new(config(2, 4, 3), |_| {
            calls += 1;
            Box::new(OracleClassifier::default()) as Box<dyn Classifier>
        })
        .err()
        .unwrap();
        assert_eq!(err, ConfigError::ActiveCountExceedsPool { active: 3, pool: 2 });
        assert_eq!(calls, 0);
    }

    #[test]
    fn uninitialized_engine_answers_nothing() {
        let mut e = AdaptiveEnsemble::new(config(2, 4, 1), |_| {
            Box::new(OracleClassifier::default()) as Box<dyn Classifier>
        })
        .unwrap();
        assert_eq!(e.state(), EngineState::Uninitialized);
        let out = e.process(&binary_instance(0.0, Some(1)));
        assert!(out.votes.is_empty());
        assert_eq!(out.predicted, None);
        assert_eq!(e.instances_trained(), 0);
    }

    /// Points at the true class with a negative score on the other one.
    #[derive(Default)]
    struct NegativeMarginClassifier;

    impl Classifier for NegativeMarginClassifier {
        fn get_votes_for_instance(&self, instance: &dyn Instance) -> Vec<f64> {
            match instance.class_value() {
                Some(c) if c == 1.0 => vec![-1.0, 2.0],
                _ => vec![2.0, -1.0],
            }
        }

        fn set_model_context(&mut self, _header: Arc<InstanceHeader>) -> Result<(), ConfigError> {
            Ok(())
        }

        fn train_on_instance(&mut self, _instance: &dyn Instance) {}

        fn reset(&mut self) {}
    }

    #[test]
    fn malformed_votes_earn_no_fitness() {
        let factory = |i: usize| -> Box<dyn Classifier> {
            match i {
                0 => Box::new(InvertedOracleClassifier::default()),
                _ => Box::new(NegativeMarginClassifier),
            }
        };
        let mut e = AdaptiveEnsemble::with_header(config(2, 4, 1), factory, binary_header())
            .unwrap();
        for label in [1, 0, 1, 0] {
            e.process(&binary_instance(0.0, Some(label)));
        }
        assert_eq!(e.fitness_vector(), vec![0.0, 0.0]);
        assert_eq!(e.active_set(), &[0]);

        let out = e.process(&binary_instance(0.0, Some(1)));
        assert_eq!(out.predicted, Some(0));
    }

    fn stacking(cascade_features: bool) -> EnsembleConfig {
        EnsembleConfig {
            voting: VotingStrategy::Stacking { cascade_features },
            reselection_period: 1_000,
            ..config(2, 4, 1)
        }
    }

    #[test]
    fn stacking_calls_the_factory_once_more_for_the_meta_learner() {
        let mut built = Vec::new();
        let factory = |i: usize| -> Box<dyn Classifier> {
            built.push(i);
            Box::new(OracleClassifier::default())
        };
        AdaptiveEnsemble::with_header(stacking(false), factory, binary_header()).unwrap();
        assert_eq!(built, vec![0, 1, 2]);
    }

    #[test]
    fn stacking_learns_when_the_active_answer_is_wrong() {
        // The active member is always wrong; the meta-learner learns to overrule it.
        let factory = |i: usize| -> Box<dyn Classifier> {
            match i {
                0 => Box::new(InvertedOracleClassifier::default()),
                1 => Box::new(OracleClassifier::default()),
                _ => Box::new(NaiveBayes::new()),
            }
        };
        let mut e = AdaptiveEnsemble::with_header(stacking(false), factory, binary_header())
            .unwrap();

        let first = e.process(&binary_instance(0.0, Some(1)));
        assert_eq!(first.predicted, Some(0), "untrained meta-learner defers");

        for i in 0..20 {
            e.process(&binary_instance(0.0, Some(i % 2)));
        }
        assert_eq!(e.active_set(), &[0]);

        for label in [0, 1, 1, 0] {
            let votes = e.get_votes_for_instance(&binary_instance(0.3, Some(label)));
            assert_eq!(predicted_class(&votes), Some(label), "votes={votes:?}");
        }
    }

    #[test]
    fn stacking_reads_pool_votes_to_judge_the_active_answer() {
        // Active member always says 1; only the oracle's vote tells when that is right.
        let factory = |i: usize| -> Box<dyn Classifier> {
            match i {
                0 => Box::new(ConstantClassifier::new(1)),
                1 => Box::new(OracleClassifier::default()),
                _ => Box::new(NaiveBayes::new()),
            }
        };
        let mut e = AdaptiveEnsemble::with_header(stacking(false), factory, binary_header())
            .unwrap();
        for label in [1, 0, 0, 1, 1, 0, 1, 0] {
            e.process(&binary_instance(0.0, Some(label)));
        }
        assert_eq!(e.active_set(), &[0]);

        for label in [0, 1, 0, 1] {
            let votes = e.get_votes_for_instance(&binary_instance(0.7, Some(label)));
            assert_eq!(predicted_class(&votes), Some(label), "votes={votes:?}");
        }
    }

    #[test]
    fn measurements_report_fitness_summary() {
        let mut e =
            AdaptiveEnsemble::with_header(config(5, 4, 2), scenario_factory, binary_header())
                .unwrap();
        for label in [1, 0, 1, 0] {
            e.process(&binary_instance(0.0, Some(label)));
        }
        let m = e.measurements();
        let get = |name: &str| m.iter().find(|m| m.name == name).map(|m| m.value);
        assert_eq!(get("ensemble_best_fitness"), Some(1.0));
        assert_eq!(get("ensemble_mean_active_fitness"), Some(0.75));
        assert_eq!(get("ensemble_reselections"), Some(4.0));
    }
}
