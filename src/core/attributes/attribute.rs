use std::any::Any;
use std::sync::Arc;

pub type AttributeRef = Arc<dyn Attribute + Send + Sync>;

pub trait Attribute: Any + Send + Sync {
    fn name(&self) -> String;

    fn as_any(&self) -> &dyn Any;

    /// Number of admissible values for nominal attributes, `None` for numeric ones.
    fn num_values(&self) -> Option<usize>;

    fn is_nominal(&self) -> bool {
        self.num_values().is_some()
    }
}
