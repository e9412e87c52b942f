use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use std::io::Error;
use std::sync::Arc;

pub trait Stream {
    fn header(&self) -> &InstanceHeader;
    fn has_more_instances(&self) -> bool;
    fn next_instance(&mut self) -> Option<Box<dyn Instance>>;
    fn restart(&mut self) -> Result<(), Error>;
    /// Header handle to bind learners to.
    fn shared_header(&self) -> Arc<InstanceHeader>;
}
