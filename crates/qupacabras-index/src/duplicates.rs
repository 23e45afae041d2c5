//! Probable-duplicate detection across the collected records.

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::record::BenchmarkRecord;

/// A later record that looks like a resubmission of an earlier one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateFinding {
    /// Id of the later record.
    pub current: String,
    /// Id of the first record seen with the same signature.
    pub existing: String,
    pub signature: String,
}

/// Flag records whose signature matches an earlier record's and whose metric
/// value lies within `tolerance` of it.
///
/// Single left-to-right pass; every record is compared against the *first*
/// record with its signature only. Findings are a report, records are never
/// dropped.
pub fn detect_duplicates(records: &[BenchmarkRecord], tolerance: f64) -> Vec<DuplicateFinding> {
    let mut first_seen: FxHashMap<String, &BenchmarkRecord> = FxHashMap::default();
    let mut findings = Vec::new();

    for record in records {
        let signature = record.signature();
        match first_seen.get(&signature) {
            Some(existing) => {
                if (record.metric() - existing.metric()).abs() < tolerance {
                    findings.push(DuplicateFinding {
                        current: record.display_id().to_string(),
                        existing: existing.display_id().to_string(),
                        signature,
                    });
                }
            }
            None => {
                first_seen.insert(signature, record);
            }
        }
    }

    findings
}
