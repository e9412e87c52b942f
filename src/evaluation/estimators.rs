/// Running weighted mean of a stream of observations.
pub trait Estimator: Default {
    fn add(&mut self, value: f64, weight: f64);
    /// NaN until some weight has been observed.
    fn estimation(&self) -> f64;
    fn total_weight(&self) -> f64;
    fn reset(&mut self);
}

#[derive(Clone, Debug, Default)]
pub struct BasicEstimator {
    sum: f64,
    weight: f64,
}

impl Estimator for BasicEstimator {
    fn add(&mut self, value: f64, weight: f64) {
        if !value.is_finite() || weight <= 0.0 {
            return;
        }
        self.sum += value * weight;
        self.weight += weight;
    }

    fn estimation(&self) -> f64 {
        if self.weight > 0.0 {
            self.sum / self.weight
        } else {
            f64::NAN
        }
    }

    fn total_weight(&self) -> f64 {
        self.weight
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}
