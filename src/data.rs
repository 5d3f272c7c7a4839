//! JSON inputs produced by the benchmark runs.
//!
//! - gas files: an object of named per-leaf gas arrays
//! - metrics files: `{ group: [ {height, setup_runtime, …}, … ] }`
//! - scaling files: an array of `{name, constraints, setup, prove, verify}`

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::error::ShapeMismatchError;
use crate::core::heatmap::{Heatmap, pivot};
use crate::core::paired::PairedSeries;
use crate::core::scaling::ScalingRecord;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("key {0:?} not found in gas data")]
    MissingKey(String),
    #[error(transparent)]
    Shape(#[from] ShapeMismatchError),
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DataError> {
    let text = fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| DataError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Named gas series, e.g. `"mmrGas": [...]`, `"imtGas": [...]`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GasData {
    pub series: BTreeMap<String, Vec<f64>>,
}

impl GasData {
    pub fn load(path: &Path) -> Result<Self, DataError> {
        read_json(path)
    }

    pub fn get(&self, key: &str) -> Result<&[f64], DataError> {
        self.series
            .get(key)
            .map(Vec::as_slice)
            .ok_or_else(|| DataError::MissingKey(key.to_string()))
    }

    pub fn paired(&self, baseline_key: &str, candidate_key: &str) -> Result<PairedSeries, DataError> {
        let baseline = self.get(baseline_key)?.to_vec();
        let candidate = self.get(candidate_key)?.to_vec();
        Ok(PairedSeries::new(baseline, candidate)?)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub height: u32,
    pub setup_runtime: f64,
    pub prove_runtime: f64,
    #[serde(rename = "setup_ram_MB")]
    pub setup_ram_mb: f64,
    #[serde(rename = "prove_ram_MB")]
    pub prove_ram_mb: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Metric {
    #[default]
    SetupRuntime,
    ProveRuntime,
    SetupRamMb,
    ProveRamMb,
}

impl Metric {
    #[inline]
    pub fn of(self, record: &MetricRecord) -> f64 {
        match self {
            Metric::SetupRuntime => record.setup_runtime,
            Metric::ProveRuntime => record.prove_runtime,
            Metric::SetupRamMb => record.setup_ram_mb,
            Metric::ProveRamMb => record.prove_ram_mb,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricsData {
    pub groups: BTreeMap<String, Vec<MetricRecord>>,
}

impl MetricsData {
    pub fn load(path: &Path) -> Result<Self, DataError> {
        read_json(path)
    }

    /// Rows = groups, columns = heights.
    pub fn heatmap(&self, metric: Metric) -> Result<Heatmap, DataError> {
        let records = self.groups.iter().flat_map(|(group, recs)| {
            recs.iter()
                .map(move |r| (group.as_str(), r.height, metric.of(r)))
        });
        Ok(pivot(records)?)
    }
}

pub fn load_scaling(path: &Path) -> Result<Vec<ScalingRecord>, DataError> {
    read_json(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gas_keys_are_free_form() {
        let data: GasData = serde_json::from_str(
            r#"{"S.AGG Dep./ST.": [1, 2, 3], "Amotised S.AGG Dep./ST.": [64, 32, 96]}"#,
        )
        .unwrap();
        let series = data
            .paired("S.AGG Dep./ST.", "Amotised S.AGG Dep./ST.")
            .unwrap();
        assert_eq!(series.candidate(), &[64.0, 32.0, 96.0]);
        assert!(matches!(
            data.paired("mmrGas", "imtGas"),
            Err(DataError::MissingKey(k)) if k == "mmrGas"
        ));
    }

    #[test]
    fn gas_length_mismatch_surfaces_as_shape_error() {
        let data: GasData = serde_json::from_str(r#"{"a": [1, 2], "b": [1, 2, 3]}"#).unwrap();
        assert!(matches!(
            data.paired("a", "b"),
            Err(DataError::Shape(ShapeMismatchError::LengthMismatch { .. }))
        ));
    }

    #[test]
    fn metrics_pivot_selects_metric() {
        let data: MetricsData = serde_json::from_str(
            r#"{
                "MiMC": [
                    {"height":1,"setup_runtime":2.65,"prove_runtime":0.55,"setup_ram_MB":180.58,"prove_ram_MB":227.23},
                    {"height":2,"setup_runtime":6.62,"prove_runtime":0.82,"setup_ram_MB":211.80,"prove_ram_MB":314.63}
                ],
                "GMiMC": [
                    {"height":1,"setup_runtime":12.26,"prove_runtime":0.59,"setup_ram_MB":276.73,"prove_ram_MB":192.90}
                ]
            }"#,
        )
        .unwrap();
        let hm = data.heatmap(Metric::ProveRuntime).unwrap();
        assert_eq!(hm.row_labels, vec!["GMiMC", "MiMC"]);
        assert_eq!(hm.col_keys, vec![1, 2]);
        assert_eq!(hm.grid.get(1, 1), Some(0.82));
        assert!(hm.grid.get(0, 1).unwrap().is_nan());
        let ram = data.heatmap(Metric::SetupRamMb).unwrap();
        assert_eq!(ram.grid.get(0, 0), Some(276.73));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = GasData::load(Path::new("/nonexistent/costfig/gas.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/costfig/gas.json"));
    }
}
