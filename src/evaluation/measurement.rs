use std::borrow::Cow;

/// A named scalar reported by an evaluator or a learner.
#[derive(Clone, Debug, PartialEq)]
pub struct Measurement {
    pub name: Cow<'static, str>,
    pub value: f64,
}

impl Measurement {
    pub fn new(name: impl Into<Cow<'static, str>>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}
