mod evaluator_choice;
mod learner_choice;
mod schema;
mod stream_choice;
mod task_choice;

pub use evaluator_choice::{EvaluatorChoice, EvaluatorKind};
pub use learner_choice::{
    AdaptiveEnsembleParams, BaseLearnerKind, KnnParams, LearnerChoice, LearnerKind,
};
pub use schema::{FieldKind, FieldSpec, specs_for_kind};
pub use stream_choice::{SeaParameters, StreamChoice, StreamKind};
pub use task_choice::{DumpFormat, PrequentialParams, TaskChoice, TaskKind};

use schemars::{JsonSchema, Schema, schema_for};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::str::FromStr;
use strum::{EnumMessage, IntoEnumIterator};

/// Parameter block for variants that take none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NoParams {}

/// A serde-tagged `{"type": kind, "params": {...}}` enum the CLI can build from
/// a kind name plus overridden defaults.
pub trait UIChoice: Sized + Serialize + DeserializeOwned + JsonSchema {
    type Kind: Copy + Into<&'static str> + EnumMessage + IntoEnumIterator + FromStr;

    fn schema() -> Schema {
        schema_for!(Self)
    }

    fn default_params(kind: Self::Kind) -> Value;

    fn from_parts(kind: Self::Kind, params: Value) -> anyhow::Result<Self> {
        let tag: &'static str = kind.into();
        Ok(serde_json::from_value(json!({ "type": tag, "params": params }))?)
    }
}
