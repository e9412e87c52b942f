use crate::ui::types::choices::UIChoice;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{Display, EnumDiscriminants, EnumIter, EnumMessage, EnumString, IntoStaticStr};

const DEFAULT_SEED: u64 = 42;
fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_sea_function() -> u8 {
    2
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SeaParameters {
    #[serde(default = "default_sea_function")]
    #[schemars(
        title = "Function",
        description = "Which SEA concept labels the stream; thresholds 8, 9, 7 and 9.5",
        range(min = 1, max = 4),
        default = "default_sea_function"
    )]
    pub function_id: u8,

    #[serde(default)]
    #[schemars(title = "Balance", description = "Emit class 1 and class 0 in strict alternation")]
    pub balance: bool,

    #[serde(default)]
    #[schemars(
        title = "Noise",
        description = "Chance that a generated label is flipped",
        range(min = 0.0, max = 1.0)
    )]
    pub noise_pct: f32,

    #[serde(default)]
    #[schemars(
        title = "Max Instances",
        description = "Stream length; unbounded when absent"
    )]
    pub max_instances: Option<u64>,

    #[serde(default = "default_seed")]
    #[schemars(title = "Seed", description = "Seed replayed on restart", default = "default_seed")]
    pub seed: u64,
}

impl Default for SeaParameters {
    fn default() -> Self {
        Self {
            function_id: default_sea_function(),
            balance: false,
            noise_pct: 0.0,
            max_instances: None,
            seed: DEFAULT_SEED,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, EnumDiscriminants)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case")]
#[strum_discriminants(name(StreamKind))]
#[strum_discriminants(derive(EnumIter, EnumString, Display, IntoStaticStr, EnumMessage))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum StreamChoice {
    #[strum_discriminants(strum(
        message = "SEA Generator",
        detailed_message = "Three uniform inputs in [0, 10); the label compares attrib1 + attrib2 with the concept threshold."
    ))]
    SeaGenerator(SeaParameters),
}

impl UIChoice for StreamChoice {
    type Kind = StreamKind;

    fn default_params(kind: Self::Kind) -> Value {
        match kind {
            StreamKind::SeaGenerator => {
                serde_json::to_value(SeaParameters::default()).unwrap_or(Value::Null)
            }
        }
    }
}
