//! Aggregate analysis over every circuit file in a directory.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::analysis::{QasmAnalysis, analyze_file};
use crate::error::{QasmError, QasmResult};

/// Analysis of one file within a directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileAnalysis {
    /// File name relative to the analyzed directory.
    pub file: String,
    #[serde(flatten)]
    pub analysis: QasmAnalysis,
}

/// Arithmetic means and gate totals across a set of circuits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStatistics {
    pub total_circuits: usize,
    pub avg_qubit_count: f64,
    pub avg_gate_count: f64,
    pub avg_circuit_depth: f64,
    pub avg_single_qubit_gates: f64,
    pub avg_two_qubit_gates: f64,
    /// Gate invocations by name, summed over all circuits.
    pub total_gate_types: BTreeMap<String, usize>,
}

impl AggregateStatistics {
    /// Aggregate a non-empty set of analyses. Returns `None` for an empty set.
    pub fn from_analyses<'a>(
        analyses: impl IntoIterator<Item = &'a QasmAnalysis>,
    ) -> Option<Self> {
        let analyses: Vec<&QasmAnalysis> = analyses.into_iter().collect();
        if analyses.is_empty() {
            return None;
        }

        let n = analyses.len() as f64;
        let mean = |f: fn(&QasmAnalysis) -> usize| -> f64 {
            analyses.iter().map(|a| f(a) as f64).sum::<f64>() / n
        };

        let mut total_gate_types = BTreeMap::new();
        for analysis in &analyses {
            for (gate, count) in &analysis.gate_types {
                *total_gate_types.entry(gate.clone()).or_insert(0) += count;
            }
        }

        Some(Self {
            total_circuits: analyses.len(),
            avg_qubit_count: mean(|a| a.qubit_count),
            avg_gate_count: mean(|a| a.gate_count),
            avg_circuit_depth: mean(|a| a.circuit_depth),
            avg_single_qubit_gates: mean(|a| a.single_qubit_gate_count),
            avg_two_qubit_gates: mean(|a| a.two_qubit_gate_count),
            total_gate_types,
        })
    }
}

/// Per-file analyses plus their aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryAnalysis {
    pub analyses: Vec<FileAnalysis>,
    pub aggregate: AggregateStatistics,
}

/// Analyze every `.qasm` file directly inside `dir`, in file-name order.
///
/// Files that cannot be read are skipped. Returns `Ok(None)` when no circuit
/// could be analyzed.
pub fn analyze_dir(dir: &Path) -> QasmResult<Option<DirectoryAnalysis>> {
    let entries = std::fs::read_dir(dir).map_err(|source| QasmError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<String> = entries
        .flatten()
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.ends_with(".qasm"))
        .collect();
    files.sort();

    let mut analyses = Vec::with_capacity(files.len());
    for file in files {
        match analyze_file(&dir.join(&file)) {
            Ok(analysis) => {
                debug!("Analyzed {}: {} gates", file, analysis.gate_count);
                analyses.push(FileAnalysis { file, analysis });
            }
            Err(e) => warn!("Skipping {}: {}", file, e),
        }
    }

    let Some(aggregate) = AggregateStatistics::from_analyses(analyses.iter().map(|f| &f.analysis))
    else {
        return Ok(None);
    };

    Ok(Some(DirectoryAnalysis {
        analyses,
        aggregate,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_empty() {
        assert!(AggregateStatistics::from_analyses(std::iter::empty()).is_none());
    }

    #[test]
    fn test_aggregate_means_and_totals() {
        let a = crate::analyze("qreg q[2];\nh q[0];\ncx q[0],q[1];\n");
        let b = crate::analyze("qreg q[4];\nh q[0];\nh q[1];\nh q[2];\nh q[3];\n");
        let agg = AggregateStatistics::from_analyses([&a, &b]).unwrap();

        assert_eq!(agg.total_circuits, 2);
        assert!((agg.avg_qubit_count - 3.0).abs() < 1e-9);
        assert!((agg.avg_gate_count - 3.0).abs() < 1e-9);
        assert!((agg.avg_two_qubit_gates - 0.5).abs() < 1e-9);
        assert_eq!(agg.total_gate_types.get("h"), Some(&5));
        assert_eq!(agg.total_gate_types.get("cx"), Some(&1));
    }
}
