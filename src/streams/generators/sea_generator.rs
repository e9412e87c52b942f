use crate::core::attributes::{AttributeRef, NominalAttribute, NumericAttribute};
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::{DenseInstance, Instance};
use crate::streams::Stream;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::{Error, ErrorKind};
use std::sync::Arc;

const THRESHOLDS: [f64; 4] = [8.0, 9.0, 7.0, 9.5];

/// SEA concepts: three uniform attributes in `[0, 10)`, class 0 when
/// `attrib1 + attrib2` is at most the concept's threshold. `attrib3` is noise.
#[derive(Debug)]
pub struct SeaGenerator {
    header: Arc<InstanceHeader>,
    function_id: u8,
    balance: bool,
    noise_pct: f32,
    max_instances: Option<u64>,
    seed: u64,
    rng: StdRng,
    produced: u64,
    next_class_should_be_zero: bool,
}

impl SeaGenerator {
    pub fn new(
        function_id: u8,
        balance: bool,
        noise_pct: f32,
        max_instances: Option<u64>,
        seed: u64,
    ) -> Result<Self, Error> {
        if !(1..=4).contains(&function_id) {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!("SEA function must be in 1..=4, got {function_id}"),
            ));
        }
        if !(0.0..=1.0).contains(&noise_pct) {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!("noise must be in [0, 1], got {noise_pct}"),
            ));
        }

        let attributes: Vec<AttributeRef> = vec![
            Arc::new(NumericAttribute::new("attrib1")),
            Arc::new(NumericAttribute::new("attrib2")),
            Arc::new(NumericAttribute::new("attrib3")),
            Arc::new(NominalAttribute::with_values(
                "class",
                vec!["groupA".into(), "groupB".into()],
            )),
        ];

        Ok(Self {
            header: Arc::new(InstanceHeader::new(
                format!("sea-f{function_id}"),
                attributes,
                3,
            )),
            function_id,
            balance,
            noise_pct,
            max_instances,
            seed,
            rng: StdRng::seed_from_u64(seed),
            produced: 0,
            next_class_should_be_zero: false,
        })
    }

    fn class_of(&self, a1: f64, a2: f64) -> usize {
        let threshold = THRESHOLDS[(self.function_id - 1) as usize];
        if a1 + a2 <= threshold { 0 } else { 1 }
    }

    fn draw(&mut self) -> ([f64; 3], usize) {
        loop {
            let a = [
                10.0 * self.rng.random::<f64>(),
                10.0 * self.rng.random::<f64>(),
                10.0 * self.rng.random::<f64>(),
            ];
            let class = self.class_of(a[0], a[1]);
            if !self.balance || (class == 0) == self.next_class_should_be_zero {
                if self.balance {
                    self.next_class_should_be_zero = !self.next_class_should_be_zero;
                }
                return (a, class);
            }
        }
    }
}

impl Stream for SeaGenerator {
    fn header(&self) -> &InstanceHeader {
        &self.header
    }

    fn has_more_instances(&self) -> bool {
        self.max_instances.is_none_or(|m| self.produced < m)
    }

    fn next_instance(&mut self) -> Option<Box<dyn Instance>> {
        if !self.has_more_instances() {
            return None;
        }
        let (a, mut class) = self.draw();
        if self.noise_pct > 0.0 && self.rng.random::<f32>() < self.noise_pct {
            class = 1 - class;
        }
        self.produced += 1;

        Some(Box::new(DenseInstance::new(
            Arc::clone(&self.header),
            vec![a[0], a[1], a[2], class as f64],
            1.0,
        )))
    }

    fn restart(&mut self) -> Result<(), Error> {
        self.rng = StdRng::seed_from_u64(self.seed);
        self.produced = 0;
        self.next_class_should_be_zero = false;
        Ok(())
    }

    fn shared_header(&self) -> Arc<InstanceHeader> {
        Arc::clone(&self.header)
    }
}
