//! Stamping contributor and timestamp into a submission file.
//!
//! This is the only place the pipeline rewrites a `benchmark.json`. Existing
//! values always win; the file is only written when something was added.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::info;

use crate::error::{IndexError, IndexResult};
use crate::record::canonical_timestamp;

/// Which fields [`stamp_metadata`] added.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StampOutcome {
    pub added_contributor: bool,
    pub added_timestamp: bool,
}

impl StampOutcome {
    pub fn changed(&self) -> bool {
        self.added_contributor || self.added_timestamp
    }
}

/// Add `contributor` and `timestamp` to the record at `path` where they are
/// missing, null or empty. Key order of the file is preserved.
pub fn stamp_metadata(
    path: &Path,
    contributor: &str,
    timestamp: DateTime<Utc>,
) -> IndexResult<StampOutcome> {
    let text = fs::read_to_string(path).map_err(|source| IndexError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut doc: Value = serde_json::from_str(&text)?;
    let map = doc
        .as_object_mut()
        .ok_or_else(|| IndexError::NotAnObject(path.to_path_buf()))?;

    let missing = |v: Option<&Value>| match v {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    };

    let mut outcome = StampOutcome::default();
    if missing(map.get("contributor")) {
        map.insert("contributor".into(), Value::String(contributor.to_string()));
        outcome.added_contributor = true;
    }
    if missing(map.get("timestamp")) {
        map.insert(
            "timestamp".into(),
            Value::String(canonical_timestamp(&timestamp)),
        );
        outcome.added_timestamp = true;
    }

    if outcome.changed() {
        let mut json = serde_json::to_string_pretty(&doc)?;
        json.push('\n');
        fs::write(path, json).map_err(|source| IndexError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), ?outcome, "Stamped submission metadata");
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::parse_timestamp;

    fn now() -> DateTime<Utc> {
        parse_timestamp("2025-02-03T04:05:06Z").unwrap()
    }

    #[test]
    fn test_adds_missing_fields_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("benchmark.json");
        fs::write(&path, r#"{"id": "x", "algorithmName": "QFT", "contributor": ""}"#).unwrap();

        let outcome = stamp_metadata(&path, "octocat", now()).unwrap();
        assert!(outcome.added_contributor && outcome.added_timestamp);

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "{\n  \"id\": \"x\",\n  \"algorithmName\": \"QFT\",\n  \"contributor\": \"octocat\",\n  \"timestamp\": \"2025-02-03T04:05:06.000Z\"\n}\n"
        );
    }

    #[test]
    fn test_existing_values_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("benchmark.json");
        let original = r#"{"contributor":"ada","timestamp":"2024-01-01T00:00:00Z"}"#;
        fs::write(&path, original).unwrap();

        let outcome = stamp_metadata(&path, "octocat", now()).unwrap();
        assert!(!outcome.changed());
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_rejects_non_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("benchmark.json");
        fs::write(&path, "[1, 2]").unwrap();
        assert!(matches!(
            stamp_metadata(&path, "octocat", now()),
            Err(IndexError::NotAnObject(_))
        ));
    }
}
