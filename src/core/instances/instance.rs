use crate::core::instance_header::InstanceHeader;

pub trait Instance {
    fn weight(&self) -> f64;
    fn value_at_index(&self, index: usize) -> Option<f64>;
    /// Out-of-range indices count as missing.
    fn is_missing_at_index(&self, index: usize) -> bool;
    fn number_of_attributes(&self) -> usize;
    fn class_index(&self) -> usize;
    /// `None` when the label has not been revealed yet.
    fn class_value(&self) -> Option<f64>;
    fn number_of_classes(&self) -> usize;
    fn header(&self) -> &InstanceHeader;
    fn to_vec(&self) -> Vec<f64>;
}
