use crate::classifiers::ensemble::FitnessMode;

/// Exact accuracy over the last `W` observations, kept in a ring of flags.
///
/// Slots never written count as incorrect, so fitness under-estimates until
/// the window has filled once. A zero-width record is inert: it ignores every
/// observation and reports 0. Ensemble configs reject `W = 0` before one is built.
#[derive(Clone, Debug)]
pub struct WindowRecord {
    buffer: Vec<bool>,
    total_correct: usize,
    seen: u64,
}

impl WindowRecord {
    pub fn new(window_size: usize) -> Self {
        Self {
            buffer: vec![false; window_size],
            total_correct: 0,
            seen: 0,
        }
    }

    pub fn observe(&mut self, correct: bool) {
        let w = self.buffer.len();
        if w == 0 {
            return;
        }
        let slot = (self.seen % w as u64) as usize;
        let previous = self.buffer[slot];
        if previous != correct {
            if correct {
                self.total_correct += 1;
            } else {
                self.total_correct -= 1;
            }
            self.buffer[slot] = correct;
        }
        self.seen += 1;
    }

    pub fn fitness(&self) -> f64 {
        if self.buffer.is_empty() {
            return 0.0;
        }
        self.total_correct as f64 / self.buffer.len() as f64
    }

    pub fn total_correct(&self) -> usize {
        self.total_correct
    }

    pub fn window_size(&self) -> usize {
        self.buffer.len()
    }

    pub fn reset(&mut self) {
        self.buffer.fill(false);
        self.total_correct = 0;
        self.seen = 0;
    }
}

/// Exponentially smoothed accuracy in `[0, 1]`.
#[derive(Clone, Debug)]
pub struct DecayedRecord {
    alpha: f64,
    score: f64,
}

impl DecayedRecord {
    pub fn new(alpha: f64) -> Self {
        Self { alpha, score: 0.0 }
    }

    pub fn observe(&mut self, correct: bool) {
        let hit = if correct { 1.0 } else { 0.0 };
        self.score = self.score * self.alpha + (1.0 - self.alpha) * hit;
    }

    pub fn fitness(&self) -> f64 {
        self.score
    }

    pub fn reset(&mut self) {
        self.score = 0.0;
    }
}

#[derive(Clone, Debug)]
pub enum FitnessRecord {
    Window(WindowRecord),
    Decayed(DecayedRecord),
}

impl FitnessRecord {
    pub fn for_mode(mode: &FitnessMode) -> Self {
        match *mode {
            FitnessMode::SlidingWindow { window_size } => {
                FitnessRecord::Window(WindowRecord::new(window_size))
            }
            FitnessMode::Decay { decay_factor } => {
                FitnessRecord::Decayed(DecayedRecord::new(decay_factor))
            }
        }
    }

    pub fn observe(&mut self, correct: bool) {
        match self {
            FitnessRecord::Window(r) => r.observe(correct),
            FitnessRecord::Decayed(r) => r.observe(correct),
        }
    }

    pub fn fitness(&self) -> f64 {
        match self {
            FitnessRecord::Window(r) => r.fitness(),
            FitnessRecord::Decayed(r) => r.fitness(),
        }
    }

    pub fn reset(&mut self) {
        match self {
            FitnessRecord::Window(r) => r.reset(),
            FitnessRecord::Decayed(r) => r.reset(),
        }
    }
}

/// Per-learner fitness arena, indexed by pool position.
#[derive(Clone, Debug)]
pub struct PerformanceTracker {
    records: Vec<FitnessRecord>,
}

impl PerformanceTracker {
    pub fn new(pool_size: usize, mode: &FitnessMode) -> Self {
        Self {
            records: (0..pool_size).map(|_| FitnessRecord::for_mode(mode)).collect(),
        }
    }

    /// Records whether learner `index` got `truth` right. A learner with no
    /// prediction counts as wrong.
    pub fn observe(&mut self, index: usize, predicted: Option<usize>, truth: usize) {
        if let Some(record) = self.records.get_mut(index) {
            record.observe(predicted == Some(truth));
        }
    }

    pub fn fitness(&self, index: usize) -> f64 {
        self.records.get(index).map_or(0.0, FitnessRecord::fitness)
    }

    pub fn fitness_vector(&self) -> Vec<f64> {
        self.records.iter().map(FitnessRecord::fitness).collect()
    }

    pub fn reset(&mut self, index: usize) {
        if let Some(record) = self.records.get_mut(index) {
            record.reset();
        }
    }

    pub fn reset_all(&mut self) {
        self.records.iter_mut().for_each(FitnessRecord::reset);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record(&self, index: usize) -> Option<&FitnessRecord> {
        self.records.get(index)
    }
}
