use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};

#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub instances_seen: u64,
    pub accuracy: f64,
    pub kappa: f64,
    /// CPU seconds spent by the evaluating thread.
    pub seconds: f64,
    pub extras: BTreeMap<String, f64>,
}

impl Snapshot {
    pub(crate) fn fmtv(v: f64) -> String {
        if v.is_nan() {
            "NaN".into()
        } else {
            format!("{v:.6}")
        }
    }
}

impl Display for Snapshot {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "seen={}, acc={}, kappa={}, t={:.6}s",
            self.instances_seen,
            Self::fmtv(self.accuracy),
            Self::fmtv(self.kappa),
            self.seconds
        )?;
        for (k, v) in &self.extras {
            write!(f, ", {k}={}", Self::fmtv(*v))?;
        }
        Ok(())
    }
}
