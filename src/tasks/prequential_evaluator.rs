use crate::classifiers::Classifier;
use crate::evaluation::{LearningCurve, PerformanceEvaluator, Snapshot};
use crate::streams::Stream;
use std::collections::BTreeMap;
use std::io::{Error, ErrorKind};
use std::sync::mpsc::Sender;

use cpu_time::ThreadTime;
use tracing::{debug, info};

/// Test-then-train over a stream: every instance is first scored, then learned.
pub struct PrequentialEvaluator {
    learner: Box<dyn Classifier>,
    stream: Box<dyn Stream>,
    evaluator: Box<dyn PerformanceEvaluator>,

    curve: LearningCurve,

    max_instances: Option<u64>,
    max_seconds: Option<u64>,
    sample_frequency: u64,

    processed: u64,
    start_cpu: ThreadTime,
    progress_tx: Option<Sender<Snapshot>>,
}

impl PrequentialEvaluator {
    /// Binds `learner` to the stream's schema. A learner that rejects the
    /// schema fails construction with `InvalidInput`.
    pub fn new(
        mut learner: Box<dyn Classifier>,
        stream: Box<dyn Stream>,
        evaluator: Box<dyn PerformanceEvaluator>,
        max_instances: Option<u64>,
        max_seconds: Option<u64>,
        sample_frequency: u64,
    ) -> Result<Self, Error> {
        if sample_frequency == 0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "sample_frequency must be > 0",
            ));
        }

        learner
            .set_model_context(stream.shared_header())
            .map_err(|e| Error::new(ErrorKind::InvalidInput, e))?;

        Ok(Self {
            learner,
            stream,
            evaluator,
            curve: LearningCurve::default(),
            max_instances,
            max_seconds,
            sample_frequency,
            processed: 0,
            start_cpu: ThreadTime::now(),
            progress_tx: None,
        })
    }

    pub fn with_progress(mut self, tx: Sender<Snapshot>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    pub fn run(&mut self) -> Result<(), Error> {
        self.start_cpu = ThreadTime::now();
        info!(
            relation = self.stream.header().relation_name(),
            max_instances = ?self.max_instances,
            max_seconds = ?self.max_seconds,
            "prequential evaluation started"
        );

        while self.stream.has_more_instances() {
            if self.max_instances.is_some_and(|n| self.processed >= n) {
                debug!(processed = self.processed, "instance budget reached");
                break;
            }
            if self
                .max_seconds
                .is_some_and(|s| self.start_cpu.elapsed().as_secs() >= s)
            {
                debug!(processed = self.processed, "time budget reached");
                break;
            }

            let Some(instance) = self.stream.next_instance() else {
                break;
            };
            self.processed += 1;

            let votes = self.learner.get_votes_for_instance(instance.as_ref());
            self.evaluator.add_result(instance.as_ref(), votes);
            self.learner.train_on_instance(instance.as_ref());

            if self.processed % self.sample_frequency == 0 {
                self.push_snapshot();
            }
        }

        if self.curve.latest().is_none_or(|s| s.instances_seen != self.processed) {
            self.push_snapshot();
        }

        if let Some(last) = self.curve.latest() {
            info!(summary = %last, "prequential evaluation finished");
        }
        Ok(())
    }

    pub fn curve(&self) -> &LearningCurve {
        &self.curve
    }

    pub fn processed(&self) -> u64 {
        self.processed
    }

    fn push_snapshot(&mut self) {
        let mut accuracy = f64::NAN;
        let mut kappa = f64::NAN;
        let mut extras = BTreeMap::new();

        let reported = self
            .evaluator
            .performance()
            .into_iter()
            .chain(self.learner.measurements());
        for m in reported {
            match m.name.as_ref() {
                "accuracy" => accuracy = m.value,
                "kappa" => kappa = m.value,
                other => {
                    extras.insert(other.to_string(), m.value);
                }
            }
        }

        let snapshot = Snapshot {
            instances_seen: self.processed,
            accuracy,
            kappa,
            seconds: self.start_cpu.elapsed().as_secs_f64(),
            extras,
        };

        if let Some(tx) = &self.progress_tx {
            let _ = tx.send(snapshot.clone());
        }
        self.curve.push(snapshot);
    }
}
