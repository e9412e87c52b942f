use crate::classifiers::Classifier;
use crate::classifiers::ensemble::ConfigError;
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

#[derive(Clone)]
pub struct TrainSpyHandle {
    trains: Arc<AtomicU64>,
    resets: Arc<AtomicU64>,
}

impl TrainSpyHandle {
    pub fn count(&self) -> u64 {
        self.trains.load(Ordering::Relaxed)
    }

    pub fn resets(&self) -> u64 {
        self.resets.load(Ordering::Relaxed)
    }
}

/// Oracle that counts how often it is trained and reset.
pub struct TrainSpyClassifier {
    handle: TrainSpyHandle,
    num_classes: usize,
}

impl TrainSpyClassifier {
    pub fn new() -> (Self, TrainSpyHandle) {
        let handle = TrainSpyHandle {
            trains: Arc::new(AtomicU64::new(0)),
            resets: Arc::new(AtomicU64::new(0)),
        };
        (
            Self {
                handle: handle.clone(),
                num_classes: 2,
            },
            handle,
        )
    }
}

impl Classifier for TrainSpyClassifier {
    fn get_votes_for_instance(&self, inst: &dyn Instance) -> Vec<f64> {
        let y = inst.class_value().unwrap_or_default() as usize;
        let mut v = vec![0.0; self.num_classes.max(2)];
        if y < v.len() {
            v[y] = 1.0;
        }
        v
    }

    fn set_model_context(&mut self, h: Arc<InstanceHeader>) -> Result<(), ConfigError> {
        self.num_classes = h.number_of_classes();
        Ok(())
    }

    fn train_on_instance(&mut self, _inst: &dyn Instance) {
        self.handle.trains.fetch_add(1, Ordering::Relaxed);
    }

    fn reset(&mut self) {
        self.handle.resets.fetch_add(1, Ordering::Relaxed);
    }
}
