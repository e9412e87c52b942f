use crate::core::instance_header::InstanceHeader;
use crate::core::instances::{DenseInstance, Instance};
use crate::streams::Stream;
use crate::testing::nominal_header;
use std::io::Error;
use std::sync::Arc;

/// Replays a fixed label sequence; the single input equals the label.
pub struct VecStream {
    header: Arc<InstanceHeader>,
    labels: Vec<usize>,
    pos: usize,
}

impl VecStream {
    pub fn new(labels: Vec<usize>) -> Self {
        let classes = labels.iter().copied().max().map_or(2, |m| (m + 1).max(2));
        Self {
            header: nominal_header(classes),
            labels,
            pos: 0,
        }
    }
}

impl Stream for VecStream {
    fn header(&self) -> &InstanceHeader {
        &self.header
    }

    fn has_more_instances(&self) -> bool {
        self.pos < self.labels.len()
    }

    fn next_instance(&mut self) -> Option<Box<dyn Instance>> {
        let y = *self.labels.get(self.pos)?;
        self.pos += 1;
        Some(Box::new(DenseInstance::new(
            Arc::clone(&self.header),
            vec![y as f64, y as f64],
            1.0,
        )))
    }

    fn restart(&mut self) -> Result<(), Error> {
        self.pos = 0;
        Ok(())
    }

    fn shared_header(&self) -> Arc<InstanceHeader> {
        Arc::clone(&self.header)
    }
}
