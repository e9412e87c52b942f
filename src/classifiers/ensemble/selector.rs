/// Picks the `k` fittest indices, best first.
///
/// Repeated linear-scan maximum extraction; on equal fitness the lowest index
/// wins. NaN fitness ranks below every number.
pub fn select(fitness: &[f64], k: usize) -> Vec<usize> {
    let rank = |v: f64| if v.is_nan() { f64::NEG_INFINITY } else { v };
    let k = k.min(fitness.len());
    let mut taken = vec![false; fitness.len()];
    let mut chosen = Vec::with_capacity(k);

    for _ in 0..k {
        let mut best: Option<usize> = None;
        for (i, &f) in fitness.iter().enumerate() {
            if taken[i] {
                continue;
            }
            match best {
                Some(b) if rank(f) <= rank(fitness[b]) => {}
                _ => best = Some(i),
            }
        }
        let Some(b) = best else { break };
        taken[b] = true;
        chosen.push(b);
    }
    chosen
}

/// Owns the active set and decides when it is recomputed.
#[derive(Clone, Debug)]
pub struct Selector {
    active_count: usize,
    period: u64,
    since_last: u64,
    active: Vec<usize>,
}

impl Selector {
    pub fn new(active_count: usize, period: u64) -> Self {
        Self {
            active_count,
            period: period.max(1),
            since_last: 0,
            active: Vec::new(),
        }
    }

    pub fn active_set(&self) -> &[usize] {
        &self.active
    }

    /// Replaces the active set wholesale. Returns whether membership or order changed.
    pub fn reselect(&mut self, fitness: &[f64]) -> bool {
        let next = select(fitness, self.active_count);
        self.since_last = 0;
        if next == self.active {
            return false;
        }
        self.active = next;
        true
    }

    /// Counts one trained instance and reselects once the period has elapsed.
    /// Returns `Some(changed)` when a reselection happened.
    pub fn tick(&mut self, fitness: &[f64]) -> Option<bool> {
        self.since_last += 1;
        if self.since_last < self.period {
            return None;
        }
        Some(self.reselect(fitness))
    }
}
