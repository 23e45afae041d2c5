//! End-to-end index builds over throw-away submission trees.

use std::fs;
use std::path::PathBuf;

use qupacabras_index::{FolderStatus, IndexBuilder, IndexConfig, IndexError};
use serde_json::{Value, json};
use tempfile::TempDir;

const BELL: &str = "OPENQASM 2.0;\ninclude \"qelib1.inc\";\nqreg q[2];\ncreg c[2];\nh q[0];\ncx q[0],q[1];\nmeasure q -> c;\n";

struct Tree {
    dir: TempDir,
}

impl Tree {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("submissions")).unwrap();
        Self { dir }
    }

    fn submissions(&self) -> PathBuf {
        self.dir.path().join("submissions")
    }

    fn output(&self) -> PathBuf {
        self.dir.path().join("public/benchmarks.json")
    }

    fn folder(&self, name: &str) -> PathBuf {
        let path = self.submissions().join(name);
        fs::create_dir_all(&path).unwrap();
        path
    }

    fn submit(&self, name: &str, doc: Value) -> PathBuf {
        let path = self.folder(name);
        fs::write(
            path.join("benchmark.json"),
            serde_json::to_string_pretty(&doc).unwrap(),
        )
        .unwrap();
        path
    }

    fn config(&self) -> IndexConfig {
        IndexConfig {
            submissions_dir: self.submissions(),
            output_file: self.output(),
            ..IndexConfig::default()
        }
    }

    fn builder(&self) -> IndexBuilder {
        IndexBuilder::new(self.config())
    }

    fn read_output(&self) -> Vec<Value> {
        serde_json::from_str(&fs::read_to_string(self.output()).unwrap()).unwrap()
    }
}

fn benchmark(id: &str, timestamp: &str) -> Value {
    json!({
        "id": id,
        "algorithmName": "Grover",
        "team": ["Ada", "Grace"],
        "device": format!("device_{id}"),
        "metricName": "success probability",
        "metricValue": 0.81,
        "uncertainty": 0.02,
        "timestamp": timestamp,
        "quantumSpecific": {"shots": 1024}
    })
}

fn ids(records: &[Value]) -> Vec<&str> {
    records.iter().map(|r| r["id"].as_str().unwrap()).collect()
}

fn status_of(outcome: &qupacabras_index::IndexOutcome, folder: &str) -> FolderStatus {
    outcome
        .folders
        .iter()
        .find(|f| f.folder == folder)
        .map(|f| f.status)
        .unwrap()
}

#[test]
fn test_build_sorts_newest_first() {
    let tree = Tree::new();
    tree.submit("old", benchmark("old", "2023-05-01T00:00:00Z"));
    tree.submit("new", benchmark("new", "2024-05-01T00:00:00Z"));
    tree.submit("mid", benchmark("mid", "2024-01-01T00:00:00+05:00"));

    let outcome = tree.builder().build().unwrap();
    assert_eq!(outcome.records.len(), 3);

    let records = tree.read_output();
    assert_eq!(ids(&records), ["new", "mid", "old"]);
    assert_eq!(records[1]["timestamp"], "2023-12-31T19:00:00.000Z");
    assert_eq!(records[1]["benchmarkFolder"], "mid");
}

#[test]
fn test_id_mismatch_is_excluded() {
    let tree = Tree::new();
    tree.submit("good", benchmark("good", "2024-01-01T00:00:00Z"));
    tree.submit("renamed", benchmark("original_name", "2024-01-02T00:00:00Z"));

    let outcome = tree.builder().build().unwrap();
    assert_eq!(status_of(&outcome, "renamed"), FolderStatus::Rejected);
    assert_eq!(ids(&tree.read_output()), ["good"]);
}

#[test]
fn test_missing_qasm_rejects_submission() {
    let tree = Tree::new();
    let mut doc = benchmark("circuit", "2024-01-01T00:00:00Z");
    doc["qasmFiles"] = json!(["missing.qasm"]);
    tree.submit("circuit", doc);

    let outcome = tree.builder().build().unwrap();
    let folder = &outcome.folders[0];
    assert_eq!(folder.status, FolderStatus::Rejected);
    assert!(!folder.result.valid);
    assert_eq!(folder.result.errors[0].field, "qasmFiles");
    assert!(tree.read_output().is_empty());
}

#[test]
fn test_quantum_metrics_populated_from_qasm() {
    let tree = Tree::new();
    let mut doc = benchmark("bell", "2024-01-01T00:00:00Z");
    doc.as_object_mut().unwrap().remove("quantumSpecific");
    doc["qasmFiles"] = json!(["bell.qasm"]);
    let folder = tree.submit("bell", doc);
    fs::write(folder.join("bell.qasm"), BELL).unwrap();

    let outcome = tree.builder().build().unwrap();
    let result = &outcome.folders[0].result;
    assert!(result.valid);
    assert!(!result.warnings.iter().any(|w| w.field == "qasmFiles"));

    let qs = &tree.read_output()[0]["quantumSpecific"];
    assert_eq!(qs["qubitCount"], 2);
    assert_eq!(qs["gateCount"], 2);
    assert_eq!(qs["singleQubitGateCount"], 1);
    assert_eq!(qs["twoQubitGateCount"], 1);
    assert_eq!(qs["measurementCount"], 1);
    assert_eq!(qs["gateBreakdown"], json!({"cx": 1, "h": 1}));
    assert!(qs.get("circuitVariations").is_none());
}

#[test]
fn test_rerun_is_byte_identical() {
    let tree = Tree::new();
    let mut doc = benchmark("bell", "2024-01-01T00:00:00Z");
    doc["qasmFiles"] = json!(["bell.qasm"]);
    doc["customNote"] = json!({"z": 1, "a": 2});
    let folder = tree.submit("bell", doc);
    fs::write(folder.join("bell.qasm"), BELL).unwrap();
    tree.submit("other", benchmark("other", "2022-01-01T00:00:00Z"));

    tree.builder().build().unwrap();
    let first = fs::read(tree.output()).unwrap();
    tree.builder().build().unwrap();
    let second = fs::read(tree.output()).unwrap();

    assert_eq!(first, second);
    assert!(first.ends_with(b"]\n"));
}

#[test]
fn test_draft_timestamp_is_stamped_per_run() {
    let tree = Tree::new();
    let mut doc = benchmark("draft", "unused");
    doc.as_object_mut().unwrap().remove("timestamp");
    doc.as_object_mut().unwrap().remove("id");
    tree.submit("draft", doc);

    let config = IndexConfig {
        allow_unstamped: true,
        ..tree.config()
    };

    let first = IndexBuilder::new(config.clone()).build().unwrap();
    std::thread::sleep(std::time::Duration::from_millis(5));
    let second = IndexBuilder::new(config).build().unwrap();

    assert_eq!(first.records[0].id.as_deref(), Some("draft"));
    assert!(first.records[0].timestamp.is_some());
    assert!(second.records[0].timestamp > first.records[0].timestamp);

    // Without draft mode the same folder is rejected.
    let strict = tree.builder().build().unwrap();
    assert!(strict.records.is_empty());
}

#[test]
fn test_corrupt_json_does_not_abort_build() {
    let tree = Tree::new();
    let broken = tree.folder("broken");
    fs::write(broken.join("benchmark.json"), "{ \"id\": ").unwrap();
    tree.submit("fine", benchmark("fine", "2024-01-01T00:00:00Z"));

    let outcome = tree.builder().build().unwrap();
    assert_eq!(status_of(&outcome, "broken"), FolderStatus::Rejected);
    assert_eq!(outcome.folders[0].result.errors[0].field, "file");
    assert_eq!(ids(&tree.read_output()), ["fine"]);
}

#[test]
fn test_template_and_empty_folders() {
    let tree = Tree::new();
    tree.submit("template", benchmark("template", "2024-01-01T00:00:00Z"));
    tree.folder("work_in_progress");
    tree.submit("real", benchmark("real", "2024-01-01T00:00:00Z"));

    let outcome = tree.builder().build().unwrap();
    let folders: Vec<&str> = outcome.folders.iter().map(|f| f.folder.as_str()).collect();
    assert_eq!(folders, ["real", "work_in_progress"]);
    assert_eq!(outcome.count(FolderStatus::Missing), 1);
    assert_eq!(ids(&tree.read_output()), ["real"]);
}

#[test]
fn test_duplicates_reported_not_removed() {
    let tree = Tree::new();
    let mut a = benchmark("a_first", "2024-01-01T00:00:00Z");
    let mut b = benchmark("b_second", "2024-02-01T00:00:00Z");
    a["device"] = json!("ibm_kyoto");
    b["device"] = json!("ibm_kyoto");
    tree.submit("a_first", a);
    tree.submit("b_second", b);

    let outcome = tree.builder().build().unwrap();
    assert_eq!(outcome.records.len(), 2);
    // Detection runs over the sorted collection, so the newer record is first.
    assert_eq!(outcome.duplicates.len(), 1);
    assert_eq!(outcome.duplicates[0].current, "a_first");
    assert_eq!(outcome.duplicates[0].existing, "b_second");
}

#[test]
fn test_validate_all_counts_missing_record_as_invalid() {
    let tree = Tree::new();
    tree.submit("ok", benchmark("ok", "2024-01-01T00:00:00Z"));
    tree.folder("empty");

    let report = tree.builder().validate_all().unwrap();
    assert_eq!(report.total(), 2);
    assert_eq!(report.valid_count(), 1);
    assert!(!report.all_valid());
    let empty = report.folders.iter().find(|f| f.folder == "empty").unwrap();
    assert_eq!(empty.result.errors[0].message, "benchmark.json not found");
    assert!(!tree.output().exists());
}

#[test]
fn test_missing_root_is_fatal() {
    let tree = Tree::new();
    let config = IndexConfig {
        submissions_dir: tree.dir.path().join("nowhere"),
        ..tree.config()
    };
    let err = IndexBuilder::new(config).build().unwrap_err();
    assert!(matches!(err, IndexError::SubmissionsRootMissing(_)));
}

#[test]
fn test_output_path_cannot_be_written() {
    let tree = Tree::new();
    tree.submit("ok", benchmark("ok", "2024-01-01T00:00:00Z"));
    // A regular file where the output directory should be.
    fs::write(tree.dir.path().join("public"), "").unwrap();

    let err = tree.builder().build().unwrap_err();
    assert!(matches!(err, IndexError::Write { .. }));
}

