mod majority_class;
mod no_change;

pub use majority_class::MajorityClass;
pub use no_change::NoChange;
