use crate::evaluation::Snapshot;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveFormat {
    Csv,
    Tsv,
    Json,
}

/// Every snapshot taken during a run, in order.
#[derive(Debug, Clone, Default)]
pub struct LearningCurve {
    snapshots: Vec<Snapshot>,
}

impl LearningCurve {
    pub fn push(&mut self, snapshot: Snapshot) {
        self.snapshots.push(snapshot);
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn export(&self, path: &Path, format: CurveFormat) -> io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        match format {
            CurveFormat::Csv => self.write_delimited(&mut out, ',')?,
            CurveFormat::Tsv => self.write_delimited(&mut out, '\t')?,
            CurveFormat::Json => {
                serde_json::to_writer_pretty(&mut out, &self.snapshots)?;
                writeln!(out)?;
            }
        }
        out.flush()
    }

    /// Extras become extra columns; a snapshot lacking one leaves the cell empty.
    fn write_delimited<W: Write>(&self, out: &mut W, sep: char) -> io::Result<()> {
        let extra_keys: BTreeSet<&str> = self
            .snapshots
            .iter()
            .flat_map(|s| s.extras.keys().map(String::as_str))
            .collect();

        let mut header = vec!["instances_seen", "accuracy", "kappa", "seconds"];
        header.extend(extra_keys.iter().copied());
        writeln!(out, "{}", header.join(&sep.to_string()))?;

        for s in &self.snapshots {
            let mut row = vec![
                s.instances_seen.to_string(),
                Snapshot::fmtv(s.accuracy),
                Snapshot::fmtv(s.kappa),
                Snapshot::fmtv(s.seconds),
            ];
            for key in &extra_keys {
                row.push(s.extras.get(*key).map_or_else(String::new, |v| Snapshot::fmtv(*v)));
            }
            writeln!(out, "{}", row.join(&sep.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn snap(seen: u64, extra: Option<f64>) -> Snapshot {
        let mut extras = BTreeMap::new();
        if let Some(v) = extra {
            extras.insert("ensemble_reselections".to_string(), v);
        }
        Snapshot {
            instances_seen: seen,
            accuracy: 0.5,
            kappa: f64::NAN,
            seconds: 1.0,
            extras,
        }
    }

    fn curve() -> LearningCurve {
        let mut c = LearningCurve::default();
        c.push(snap(10, None));
        c.push(snap(20, Some(2.0)));
        c
    }

    #[test]
    fn csv_export_has_union_of_extra_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curve.csv");
        curve().export(&path, CurveFormat::Csv).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "instances_seen,accuracy,kappa,seconds,ensemble_reselections",
                "10,0.500000,NaN,1.000000,",
                "20,0.500000,NaN,1.000000,2.000000",
            ]
        );
    }

    #[test]
    fn tsv_export_uses_tabs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curve.tsv");
        curve().export(&path, CurveFormat::Tsv).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("instances_seen\taccuracy\tkappa\tseconds"));
    }

    #[test]
    fn json_export_is_an_array_of_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curve.json");
        curve().export(&path, CurveFormat::Json).unwrap();

        let v: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let arr = v.as_array().unwrap();
        assert_eq!(arr.len(), 2);
        assert_eq!(arr[1]["instances_seen"], 20);
        assert_eq!(arr[1]["extras"]["ensemble_reselections"], 2.0);
        assert!(arr[0]["kappa"].is_null());
    }

    #[test]
    fn latest_tracks_last_push() {
        let c = curve();
        assert_eq!(c.len(), 2);
        assert!(!c.is_empty());
        assert_eq!(c.latest().unwrap().instances_seen, 20);
    }
}
