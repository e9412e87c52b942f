use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct DenseInstance {
    header: Arc<InstanceHeader>,
    values: Vec<f64>,
    weight: f64,
}

impl DenseInstance {
    pub fn new(header: Arc<InstanceHeader>, values: Vec<f64>, weight: f64) -> Self {
        Self {
            header,
            values,
            weight,
        }
    }

    pub fn set_class_value(&mut self, value: Option<f64>) {
        let idx = self.header.class_index();
        if idx < self.values.len() {
            self.values[idx] = value.unwrap_or(f64::NAN);
        }
    }
}

impl Instance for DenseInstance {
    fn weight(&self) -> f64 {
        self.weight
    }

    fn value_at_index(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    fn is_missing_at_index(&self, index: usize) -> bool {
        self.values.get(index).is_none_or(|v| v.is_nan())
    }

    fn number_of_attributes(&self) -> usize {
        self.values.len()
    }

    fn class_index(&self) -> usize {
        self.header.class_index()
    }

    fn class_value(&self) -> Option<f64> {
        self.values
            .get(self.header.class_index())
            .copied()
            .filter(|v| !v.is_nan())
    }

    fn number_of_classes(&self) -> usize {
        self.header.number_of_classes()
    }

    fn header(&self) -> &InstanceHeader {
        &self.header
    }

    fn to_vec(&self) -> Vec<f64> {
        self.values.clone()
    }
}
