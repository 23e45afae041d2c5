//! In-memory enrichment of accepted records.
//!
//! Fills the derived fields the index carries: the folder join key, a
//! fallback id and timestamp, and circuit metrics taken from the
//! submission's QASM files. Values a human provided are never overwritten,
//! with the exception of `benchmarkFolder`.

use std::path::Path;

use chrono::{DateTime, Utc};
use qupacabras_qasm::{QasmAnalysis, analyze_file};
use serde_json::Number;
use tracing::{debug, warn};

use crate::record::{BenchmarkRecord, QuantumSpecific};

/// Enrich `record`, stamping a missing timestamp with the current time.
///
/// This makes enrichment non-idempotent for records without a timestamp;
/// see [`enrich_at`] for a deterministic variant.
pub fn enrich(record: &mut BenchmarkRecord, folder: &str, folder_path: &Path) {
    enrich_at(record, folder, folder_path, Utc::now());
}

/// Enrich `record`, using `now` for a missing timestamp.
pub fn enrich_at(record: &mut BenchmarkRecord, folder: &str, folder_path: &Path, now: DateTime<Utc>) {
    record.benchmark_folder = Some(folder.to_string());

    if record.id.is_none() {
        debug!(folder, "Using folder name as id");
        record.id = Some(folder.to_string());
    }
    if record.timestamp.is_none() {
        debug!(folder, "Stamping missing timestamp");
        record.timestamp = Some(now);
    }

    let analyses = analyze_circuits(&record.qasm_files, folder_path);
    if let Some(first) = analyses.first() {
        let qs = record
            .quantum_specific
            .get_or_insert_with(QuantumSpecific::default);
        fill_from_analysis(qs, first);
        if analyses.len() > 1 && qs.circuit_variations.is_none() {
            qs.circuit_variations = Some(Number::from(analyses.len()));
        }
        debug!(folder, files = analyses.len(), "Derived circuit metrics");
    }
}

/// Analyse every declared QASM file that exists, in declaration order.
fn analyze_circuits(files: &[String], folder_path: &Path) -> Vec<QasmAnalysis> {
    files
        .iter()
        .map(|file| folder_path.join(file))
        .filter(|path| path.is_file())
        .filter_map(|path| match analyze_file(&path) {
            Ok(analysis) => Some(analysis),
            Err(e) => {
                warn!("{e}");
                None
            }
        })
        .collect()
}

fn fill_from_analysis(qs: &mut QuantumSpecific, analysis: &QasmAnalysis) {
    let count = Number::from;

    qs.qubit_count.get_or_insert(count(analysis.qubit_count));
    qs.gate_count.get_or_insert(count(analysis.gate_count));
    qs.circuit_depth.get_or_insert(count(analysis.circuit_depth));
    qs.two_qubit_gate_count
        .get_or_insert(count(analysis.two_qubit_gate_count));
    qs.single_qubit_gate_count
        .get_or_insert(count(analysis.single_qubit_gate_count));
    qs.measurement_count
        .get_or_insert(count(analysis.measurement_count));
    qs.gate_breakdown.get_or_insert_with(|| {
        analysis
            .gate_types
            .iter()
            .map(|(gate, n)| (gate.clone(), count(*n)))
            .collect()
    });
}
