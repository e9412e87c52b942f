use crate::ui::types::choices::{NoParams, UIChoice};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{Display, EnumDiscriminants, EnumIter, EnumMessage, EnumString, IntoStaticStr};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, EnumDiscriminants)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case")]
#[strum_discriminants(name(EvaluatorKind))]
#[strum_discriminants(derive(EnumIter, EnumString, Display, IntoStaticStr, EnumMessage))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum EvaluatorChoice {
    #[strum_discriminants(strum(
        message = "Basic Classification",
        detailed_message = "Accuracy and Cohen's kappa over every scored instance."
    ))]
    BasicClassification(NoParams),
}

impl UIChoice for EvaluatorChoice {
    type Kind = EvaluatorKind;

    fn default_params(kind: Self::Kind) -> Value {
        match kind {
            EvaluatorKind::BasicClassification => {
                serde_json::to_value(NoParams::default()).unwrap_or(Value::Null)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builds_from_kebab_kind() {
        let kind: EvaluatorKind = "basic-classification".parse().unwrap();
        let choice = EvaluatorChoice::from_parts(kind, EvaluatorChoice::default_params(kind))
            .unwrap();
        assert_eq!(
            serde_json::to_value(choice).unwrap(),
            json!({"type": "basic-classification", "params": {}})
        );
    }
}
