const NORMAL_CONSTANT: f64 = 2.506_628_274_631_000_7; // sqrt(2π)

/// Incremental weighted mean and variance (Welford).
#[derive(Clone, Debug, Default)]
pub struct GaussianEstimator {
    weight_sum: f64,
    mean: f64,
    variance_sum: f64,
}

impl GaussianEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn add_observation(&mut self, value: f64, weight: f64) {
        if !value.is_finite() || weight <= 0.0 {
            return;
        }

        if self.weight_sum > 0.0 {
            self.weight_sum += weight;
            let last_mean = self.mean;
            self.mean += weight * (value - last_mean) / self.weight_sum;
            self.variance_sum += weight * (value - last_mean) * (value - self.mean);
        } else {
            self.mean = value;
            self.weight_sum = weight;
        }
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn variance(&self) -> f64 {
        if self.weight_sum > 1.0 {
            self.variance_sum / (self.weight_sum - 1.0)
        } else {
            0.0
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn total_weight(&self) -> f64 {
        self.weight_sum
    }

    /// Density at `value`; a zero-variance estimator is a unit spike at its mean.
    pub fn probability_density(&self, value: f64) -> f64 {
        if self.weight_sum <= 0.0 {
            return 0.0;
        }
        let std_dev = self.std_dev();
        if std_dev > 0.0 {
            let diff = value - self.mean;
            return (1.0 / (NORMAL_CONSTANT * std_dev))
                * ((-diff * diff) / (2.0 * std_dev * std_dev)).exp();
        }
        if value == self.mean { 1.0 } else { 0.0 }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::GaussianEstimator;

    const EPS: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    #[test]
    fn starts_empty() {
        let g = GaussianEstimator::new();
        assert!(approx_eq(g.variance(), 0.0, EPS));
        assert!(approx_eq(g.probability_density(0.0), 0.0, EPS));
        assert!(approx_eq(g.total_weight(), 0.0, EPS));
    }

    #[test]
    fn three_observations_variance_known() {
        let mut g = GaussianEstimator::new();
        g.add_observation(-1.0, 1.0);
        g.add_observation(0.0, 1.0);
        g.add_observation(1.0, 1.0);

        assert!(approx_eq(g.mean(), 0.0, EPS));
        assert!(approx_eq(g.variance(), 1.0, 1e-12));

        let expected = 1.0 / (2.0 * std::f64::consts::PI).sqrt();
        assert!(approx_eq(g.probability_density(0.0), expected, 1e-9));
    }

    #[test]
    fn weighted_data_behaves_like_repetition() {
        let mut gw = GaussianEstimator::new();
        gw.add_observation(0.0, 2.0);
        gw.add_observation(2.0, 1.0);

        let mut g_rep = GaussianEstimator::new();
        g_rep.add_observation(0.0, 1.0);
        g_rep.add_observation(0.0, 1.0);
        g_rep.add_observation(2.0, 1.0);

        assert!(approx_eq(gw.mean(), g_rep.mean(), 1e-12));
        assert!(approx_eq(gw.variance(), g_rep.variance(), 1e-12));
    }

    #[test]
    fn ignores_invalid_values_and_zero_weight() {
        let mut g = GaussianEstimator::new();
        g.add_observation(f64::NAN, 1.0);
        g.add_observation(f64::INFINITY, 1.0);
        g.add_observation(3.0, 0.0);
        assert!(approx_eq(g.total_weight(), 0.0, EPS));
    }

    #[test]
    fn zero_variance_is_spike_and_reset_clears() {
        let mut g = GaussianEstimator::new();
        g.add_observation(10.0, 3.0);
        assert!(approx_eq(g.probability_density(10.0), 1.0, 1e-12));
        assert!(approx_eq(g.probability_density(9.5), 0.0, 1e-12));

        g.reset();
        assert!(approx_eq(g.total_weight(), 0.0, EPS));
        assert!(approx_eq(g.probability_density(10.0), 0.0, EPS));
    }
}
