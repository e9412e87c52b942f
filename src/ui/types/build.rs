use crate::classifiers::Classifier;
use crate::classifiers::bayes::NaiveBayes;
use crate::classifiers::ensemble::AdaptiveEnsemble;
use crate::classifiers::lazy::Knn;
use crate::classifiers::rules::{MajorityClass, NoChange};
use crate::evaluation::{BasicClassificationEvaluator, BasicEstimator, PerformanceEvaluator};
use crate::streams::{SeaGenerator, Stream};
use crate::ui::types::choices::{
    AdaptiveEnsembleParams, BaseLearnerKind, EvaluatorChoice, KnnParams, LearnerChoice,
    StreamChoice,
};
use anyhow::{Context, Result, bail};

pub fn build_stream(choice: StreamChoice) -> Result<Box<dyn Stream>> {
    match choice {
        StreamChoice::SeaGenerator(p) => {
            let stream = SeaGenerator::new(
                p.function_id,
                p.balance,
                p.noise_pct,
                p.max_instances,
                p.seed,
            )
            .context("invalid SEA parameters")?;
            Ok(Box::new(stream))
        }
    }
}

pub fn build_evaluator(
    choice: EvaluatorChoice,
    num_classes: usize,
) -> Result<Box<dyn PerformanceEvaluator>> {
    match choice {
        EvaluatorChoice::BasicClassification(_) => Ok(Box::new(
            BasicClassificationEvaluator::<BasicEstimator>::new(num_classes),
        )),
    }
}

/// The learner is returned unbound; the task binds it to the stream's schema.
pub fn build_learner(choice: LearnerChoice) -> Result<Box<dyn Classifier>> {
    let defaults = KnnParams::default();
    match choice {
        LearnerChoice::NaiveBayes(_) => Ok(base_learner(BaseLearnerKind::NaiveBayes, defaults)),
        LearnerChoice::MajorityClass(_) => {
            Ok(base_learner(BaseLearnerKind::MajorityClass, defaults))
        }
        LearnerChoice::NoChange(_) => Ok(base_learner(BaseLearnerKind::NoChange, defaults)),
        LearnerChoice::Knn(p) => Ok(base_learner(BaseLearnerKind::Knn, p)),
        LearnerChoice::AdaptiveEnsemble(p) => build_ensemble(p),
    }
}

fn build_ensemble(params: AdaptiveEnsembleParams) -> Result<Box<dyn Classifier>> {
    if params.base_learners.is_empty() {
        bail!("base_learners must name at least one learner");
    }
    let pool_size = params.ensemble.pool_size;
    let kinds = params.base_learners;
    let knn = params.knn;
    let meta = params.meta_learner;

    let ensemble = AdaptiveEnsemble::new(params.ensemble, |i| {
        if i == pool_size {
            base_learner(meta, knn)
        } else {
            base_learner(kinds[i % kinds.len()], knn)
        }
    })
    .context("invalid ensemble configuration")?;
    Ok(Box::new(ensemble))
}

fn base_learner(kind: BaseLearnerKind, knn: KnnParams) -> Box<dyn Classifier> {
    match kind {
        BaseLearnerKind::NaiveBayes => Box::new(NaiveBayes::new()),
        BaseLearnerKind::MajorityClass => Box::new(MajorityClass::new()),
        BaseLearnerKind::NoChange => Box::new(NoChange::new()),
        BaseLearnerKind::Knn => Box::new(Knn::new(knn.k, knn.limit)),
    }
}
