use crate::core::attributes::Attribute;
use std::any::Any;

#[derive(Clone, Debug)]
pub struct NumericAttribute {
    pub name: String,
}

impl NumericAttribute {
    pub fn new(name: impl Into<String>) -> NumericAttribute {
        NumericAttribute { name: name.into() }
    }
}

impl Attribute for NumericAttribute {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn num_values(&self) -> Option<usize> {
        None
    }
}
