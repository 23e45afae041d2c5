//! Index builder: walks the submissions tree and writes the merged index.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::config::IndexConfig;
use crate::duplicates::{DuplicateFinding, detect_duplicates};
use crate::enrich::enrich;
use crate::error::{IndexError, IndexResult};
use crate::record::BenchmarkRecord;
use crate::report::ValidationReport;
use crate::validation::{SubmissionValidator, ValidationResult};

/// What happened to one submission folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FolderStatus {
    /// Valid; the record is part of the index.
    Accepted,
    /// At least one hard error; excluded from the index.
    Rejected,
    /// No record file in the folder.
    Missing,
}

/// Per-folder outcome, in processing order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FolderOutcome {
    pub folder: String,
    pub status: FolderStatus,
    pub result: ValidationResult,
}

/// Result of an index build.
#[derive(Debug, Clone)]
pub struct IndexOutcome {
    /// Accepted records, newest first.
    pub records: Vec<BenchmarkRecord>,
    pub folders: Vec<FolderOutcome>,
    pub duplicates: Vec<DuplicateFinding>,
    pub output_path: PathBuf,
}

impl IndexOutcome {
    /// Number of folders with the given status.
    pub fn count(&self, status: FolderStatus) -> usize {
        self.folders.iter().filter(|f| f.status == status).count()
    }
}

/// Builds the benchmark index from a submissions directory.
#[derive(Debug, Clone)]
pub struct IndexBuilder {
    config: IndexConfig,
    validator: SubmissionValidator,
}

impl IndexBuilder {
    pub fn new(config: IndexConfig) -> Self {
        let validator = SubmissionValidator::with_unstamped(config.allow_unstamped);
        Self { config, validator }
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Validate, enrich and sort every submission without writing anything.
    pub fn collect(&self) -> IndexResult<IndexOutcome> {
        let root = &self.config.submissions_dir;
        let folders = list_submission_folders(root, &self.config)?;
        info!(count = folders.len(), root = %root.display(), "Found submission folders");

        let mut records = Vec::new();
        let mut outcomes = Vec::with_capacity(folders.len());

        for folder in folders {
            let folder_path = root.join(&folder);
            let record_path = folder_path.join(&self.config.benchmark_file);

            if !record_path.is_file() {
                warn!(folder = %folder, "No {} found, skipping", self.config.benchmark_file);
                outcomes.push(FolderOutcome {
                    folder,
                    status: FolderStatus::Missing,
                    result: ValidationResult::default(),
                });
                continue;
            }

            let (doc, mut result) = self.validator.load_and_validate(&record_path, &folder);
            log_warnings(&folder, &result);

            let status = match parse_record(doc, &mut result) {
                Some(mut record) => {
                    enrich(&mut record, &folder, &folder_path);
                    info!(folder = %folder, algorithm = %record.algorithm_name, "Added benchmark");
                    records.push(record);
                    FolderStatus::Accepted
                }
                None => {
                    for e in &result.errors {
                        error!(folder = %folder, field = %e.field, "{}", e.message);
                    }
                    FolderStatus::Rejected
                }
            };
            outcomes.push(FolderOutcome {
                folder,
                status,
                result,
            });
        }

        sort_newest_first(&mut records);

        let duplicates = detect_duplicates(&records, self.config.duplicate_tolerance);
        for dup in &duplicates {
            warn!(
                signature = %dup.signature,
                "{} may duplicate {}", dup.current, dup.existing
            );
        }

        Ok(IndexOutcome {
            records,
            folders: outcomes,
            duplicates,
            output_path: self.config.output_file.clone(),
        })
    }

    /// Collect the index and write it to the configured output file.
    pub fn build(&self) -> IndexResult<IndexOutcome> {
        let outcome = self.collect()?;
        write_index(&outcome.output_path, &outcome.records)?;
        info!(
            count = outcome.records.len(),
            path = %outcome.output_path.display(),
            "Generated benchmark index"
        );
        Ok(outcome)
    }

    /// Validate every submission folder without enriching or writing.
    ///
    /// Folders without a record file count as invalid here, unlike in
    /// [`build`](Self::build) where they are only skipped.
    pub fn validate_all(&self) -> IndexResult<ValidationReport> {
        let root = &self.config.submissions_dir;
        let mut folders = Vec::new();
        let mut records = Vec::new();

        for folder in list_submission_folders(root, &self.config)? {
            let record_path = root.join(&folder).join(&self.config.benchmark_file);

            if !record_path.is_file() {
                warn!(folder = %folder, "No {} found", self.config.benchmark_file);
                folders.push(FolderOutcome {
                    result: ValidationResult::failed(
                        "file",
                        format!("{} not found", self.config.benchmark_file),
                    ),
                    folder,
                    status: FolderStatus::Missing,
                });
                continue;
            }

            let (doc, mut result) = self.validator.load_and_validate(&record_path, &folder);
            log_warnings(&folder, &result);

            let status = match parse_record(doc, &mut result) {
                Some(mut record) => {
                    record.benchmark_folder = Some(folder.clone());
                    records.push(record);
                    FolderStatus::Accepted
                }
                None => FolderStatus::Rejected,
            };
            folders.push(FolderOutcome {
                folder,
                status,
                result,
            });
        }

        let duplicates = detect_duplicates(&records, self.config.duplicate_tolerance);
        Ok(ValidationReport {
            folders,
            duplicates,
        })
    }
}

/// Deserialize a validated document, recording a failure as a file error.
///
/// Returns `None` when validation already failed or the document does not
/// fit [`BenchmarkRecord`]; in the latter case `result` is marked invalid.
fn parse_record(doc: Option<Value>, result: &mut ValidationResult) -> Option<BenchmarkRecord> {
    if !result.valid {
        return None;
    }
    match serde_json::from_value(doc?) {
        Ok(record) => Some(record),
        Err(e) => {
            result.error("file", format!("Error reading/parsing file: {e}"));
            None
        }
    }
}

/// Immediate subdirectories of `root`, minus excluded names, sorted.
fn list_submission_folders(root: &Path, config: &IndexConfig) -> IndexResult<Vec<String>> {
    if !root.is_dir() {
        return Err(IndexError::SubmissionsRootMissing(root.to_path_buf()));
    }

    let io_err = |source| IndexError::Io {
        path: root.to_path_buf(),
        source,
    };

    let mut folders = Vec::new();
    for entry in fs::read_dir(root).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        if !entry.path().is_dir() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) if !config.is_excluded(&name) => folders.push(name),
            Ok(_) => {}
            Err(name) => warn!("Skipping folder with non UTF-8 name: {}", name.to_string_lossy()),
        }
    }

    folders.sort();
    Ok(folders)
}

/// Stable sort by timestamp, most recent first.
pub fn sort_newest_first(records: &mut [BenchmarkRecord]) {
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

/// Write records as a pretty-printed JSON array with a trailing newline,
/// creating the parent directory if needed.
pub fn write_index(path: &Path, records: &[BenchmarkRecord]) -> IndexResult<()> {
    let write_err = |source| IndexError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let mut json = serde_json::to_string_pretty(records)?;
    json.push('\n');
    fs::write(path, json).map_err(write_err)
}

fn log_warnings(folder: &str, result: &ValidationResult) {
    for w in &result.warnings {
        warn!(folder = %folder, field = %w.field, "{}", w.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::parse_timestamp;
    use proptest::prelude::*;
    use serde_json::json;

    fn record_at(id: &str, ts: i64) -> BenchmarkRecord {
        let mut r: BenchmarkRecord = serde_json::from_value(json!({
            "id": id,
            "algorithmName": "QFT",
            "device": "sim",
            "metricName": "fidelity",
            "metricValue": 0.5,
        }))
        .unwrap();
        r.timestamp = chrono::DateTime::from_timestamp(ts, 0);
        r
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let mut records = vec![record_at("a", 10), record_at("b", 20), record_at("c", 10)];
        sort_newest_first(&mut records);
        let ids: Vec<&str> = records.iter().map(BenchmarkRecord::display_id).collect();
        assert_eq!(ids, ["b", "a", "c"]);
    }

    #[test]
    fn test_list_folders_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["zeta", "alpha", "template"] {
            fs::create_dir(dir.path().join(name)).unwrap();
        }
        fs::write(dir.path().join("README.md"), "hi").unwrap();

        let folders = list_submission_folders(dir.path(), &IndexConfig::default()).unwrap();
        assert_eq!(folders, ["alpha", "zeta"]);
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = list_submission_folders(&dir.path().join("nope"), &IndexConfig::default())
            .unwrap_err();
        assert!(matches!(err, IndexError::SubmissionsRootMissing(_)));
    }

    #[test]
    fn test_write_index_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("public/nested/benchmarks.json");
        let mut r = record_at("a", 0);
        r.timestamp = parse_timestamp("2024-01-01T00:00:00Z");
        write_index(&path, &[r]).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("[\n  {\n    \"id\": \"a\""));
        assert!(text.ends_with("}\n]\n"));
        assert!(text.contains("\"timestamp\": \"2024-01-01T00:00:00.000Z\""));
    }

    #[test]
    fn test_unparseable_record_is_rejected() {
        let mut result = ValidationResult::default();
        let doc = json!({"algorithmName": 42, "device": "sim"});
        assert!(parse_record(Some(doc), &mut result).is_none());
        assert!(!result.valid);
        assert_eq!(result.errors[0].field, "file");
        assert!(result.errors[0].message.starts_with("Error reading/parsing file: "));
    }

    #[test]
    fn test_parse_record_skips_invalid_results() {
        let mut result = ValidationResult::failed("metricValue", "is required");
        let doc = json!({"algorithmName": "QFT"});
        assert!(parse_record(Some(doc), &mut result).is_none());
        assert_eq!(result.errors.len(), 1);
    }

    proptest! {
        #[test]
        fn prop_sorted_newest_first(stamps in prop::collection::vec(0_i64..2_000_000_000, 0..30)) {
            let mut records: Vec<BenchmarkRecord> = stamps
                .iter()
                .enumerate()
                .map(|(i, ts)| record_at(&i.to_string(), *ts))
                .collect();
            sort_newest_first(&mut records);
            for pair in records.windows(2) {
                prop_assert!(pair[0].timestamp >= pair[1].timestamp);
            }
        }
    }
}
