use crate::classifiers::ensemble::EnsembleConfig;
use crate::ui::types::choices::{NoParams, UIChoice};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{Display, EnumDiscriminants, EnumIter, EnumMessage, EnumString, IntoStaticStr};

fn default_k() -> usize {
    5
}

fn default_limit() -> usize {
    1000
}

fn default_base_learners() -> Vec<BaseLearnerKind> {
    vec![
        BaseLearnerKind::NaiveBayes,
        BaseLearnerKind::Knn,
        BaseLearnerKind::MajorityClass,
        BaseLearnerKind::NoChange,
    ]
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct KnnParams {
    #[serde(default = "default_k")]
    #[schemars(
        title = "Neighbours",
        description = "Number of neighbours that vote",
        range(min = 1)
    )]
    pub k: usize,

    #[serde(default = "default_limit")]
    #[schemars(
        title = "Window Limit",
        description = "Most recent labelled instances kept",
        range(min = 1)
    )]
    pub limit: usize,
}

impl Default for KnnParams {
    fn default() -> Self {
        Self {
            k: default_k(),
            limit: default_limit(),
        }
    }
}

/// Learners the ensemble may put in its pool (and use as stacking meta-learner).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum BaseLearnerKind {
    NaiveBayes,
    MajorityClass,
    NoChange,
    Knn,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AdaptiveEnsembleParams {
    #[serde(flatten)]
    pub ensemble: EnsembleConfig,

    /// Pool member `i` is `base_learners[i % len]`.
    #[serde(default = "default_base_learners")]
    #[schemars(
        title = "Base Learners",
        description = "Learner kinds cycled over the pool indices"
    )]
    pub base_learners: Vec<BaseLearnerKind>,

    #[serde(default)]
    #[schemars(title = "kNN", description = "Parameters for every kNN pool member")]
    pub knn: KnnParams,

    #[serde(default = "default_meta_learner")]
    #[schemars(
        title = "Meta Learner",
        description = "Learner trained on the pool's votes when voting is stacking"
    )]
    pub meta_learner: BaseLearnerKind,
}

fn default_meta_learner() -> BaseLearnerKind {
    BaseLearnerKind::NaiveBayes
}

impl Default for AdaptiveEnsembleParams {
    fn default() -> Self {
        Self {
            ensemble: EnsembleConfig::default(),
            base_learners: default_base_learners(),
            knn: KnnParams::default(),
            meta_learner: default_meta_learner(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, EnumDiscriminants)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case")]
#[strum_discriminants(name(LearnerKind))]
#[strum_discriminants(derive(EnumIter, EnumString, Display, IntoStaticStr, EnumMessage))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum LearnerChoice {
    #[strum_discriminants(strum(
        message = "Naive Bayes",
        detailed_message = "Counts for nominal inputs, a Gaussian per class for numeric ones."
    ))]
    NaiveBayes(NoParams),

    #[strum_discriminants(strum(
        message = "Majority Class",
        detailed_message = "Predicts the most frequent class seen so far."
    ))]
    MajorityClass(NoParams),

    #[strum_discriminants(strum(
        message = "No Change",
        detailed_message = "Predicts the last label seen."
    ))]
    NoChange(NoParams),

    #[strum_discriminants(strum(
        message = "kNN",
        detailed_message = "Nearest neighbours over a bounded window of recent instances."
    ))]
    Knn(KnnParams),

    #[strum_discriminants(strum(
        message = "Adaptive Ensemble",
        detailed_message = "Pool of learners answered by its currently fittest members."
    ))]
    AdaptiveEnsemble(AdaptiveEnsembleParams),
}

impl UIChoice for LearnerChoice {
    type Kind = LearnerKind;

    fn default_params(kind: Self::Kind) -> Value {
        let params = match kind {
            LearnerKind::NaiveBayes | LearnerKind::MajorityClass | LearnerKind::NoChange => {
                serde_json::to_value(NoParams::default())
            }
            LearnerKind::Knn => serde_json::to_value(KnnParams::default()),
            LearnerKind::AdaptiveEnsemble => {
                serde_json::to_value(AdaptiveEnsembleParams::default())
            }
        };
        params.unwrap_or(Value::Null)
    }
}
