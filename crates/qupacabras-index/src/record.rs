//! Benchmark record data model.
//!
//! These types describe the shape of a `benchmark.json` file *after* it has
//! passed schema validation. Raw submissions are validated as
//! [`serde_json::Value`] first, so a malformed file never reaches serde.
//!
//! Numeric fields hold [`Number`] rather than a primitive so the index
//! reproduces what the author wrote: `5` stays `5` and `5.0` stays `5.0`.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Number;

/// One submitted benchmark result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub algorithm_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<Vec<String>>,
    pub device: String,
    pub metric_name: String,
    pub metric_value: Number,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uncertainty: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paper_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributor: Option<String>,
    #[serde(
        default,
        with = "iso_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(
        default,
        with = "iso_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub accepted_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub methodology: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub qasm_files: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_rates: Option<ErrorRates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_time: Option<UnitStatSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantum_specific: Option<QuantumSpecific>,
    /// Submission folder name; always overwritten by the pipeline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benchmark_folder: Option<String>,
    /// Fields this model does not know about, carried through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BenchmarkRecord {
    /// The id used in reports: the declared id, else the folder name.
    pub fn display_id(&self) -> &str {
        self.id
            .as_deref()
            .or(self.benchmark_folder.as_deref())
            .unwrap_or("<unnamed>")
    }

    /// `metricValue` as a float, for comparisons.
    pub fn metric(&self) -> f64 {
        as_f64(&self.metric_value)
    }

    /// Duplicate-detection key: `algorithmName-device-metricName`.
    pub fn signature(&self) -> String {
        format!("{}-{}-{}", self.algorithm_name, self.device, self.metric_name)
    }
}

/// `{min, median, mean, max}` summary statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatSummary {
    pub min: f64,
    pub median: f64,
    pub mean: f64,
    pub max: f64,
}

/// A [`StatSummary`] as it appears in a submission, with its optional unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitStatSummary {
    pub min: Number,
    pub median: Number,
    pub mean: Number,
    pub max: Number,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UnitStatSummary {
    pub fn summary(&self) -> StatSummary {
        StatSummary {
            min: as_f64(&self.min),
            median: as_f64(&self.median),
            mean: as_f64(&self.mean),
            max: as_f64(&self.max),
        }
    }
}

/// Error-rate statistics by error source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRates {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qubit: Option<UnitStatSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readout: Option<UnitStatSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub two_qubit_gate: Option<UnitStatSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub single_qubit_gate: Option<UnitStatSummary>,
}

/// Declared or derived circuit metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantumSpecific {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qubit_count: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gate_count: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circuit_depth: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub single_qubit_gate_count: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub two_qubit_gate_count: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement_count: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gate_breakdown: Option<BTreeMap<String, Number>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circuit_variations: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shots: Option<Number>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn as_f64(n: &Number) -> f64 {
    n.as_f64().unwrap_or(f64::NAN)
}

/// Render a timestamp the way browsers' `Date#toISOString` does.
pub fn canonical_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an RFC 3339 timestamp with any offset into UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

/// Serde adapter for optional timestamps in canonical form.
mod iso_timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S>(ts: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match ts {
            Some(ts) => serializer.serialize_str(&super::canonical_timestamp(ts)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|s| {
            super::parse_timestamp(&s)
                .ok_or_else(|| de::Error::custom(format!("invalid RFC 3339 timestamp '{s}'")))
        })
        .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_timestamp_normalized_to_utc_millis() {
        let record: BenchmarkRecord = serde_json::from_value(json!({
            "algorithmName": "Grover",
            "device": "ibm_brisbane",
            "metricName": "success probability",
            "metricValue": 0.81,
            "timestamp": "2024-01-01T12:00:00+02:00"
        }))
        .unwrap();

        let out = serde_json::to_value(&record).unwrap();
        assert_eq!(out["timestamp"], "2024-01-01T10:00:00.000Z");
    }

    #[test]
    fn test_unknown_fields_carried_through() {
        let record: BenchmarkRecord = serde_json::from_value(json!({
            "algorithmName": "QAOA",
            "device": "sim",
            "metricName": "approx ratio",
            "metricValue": 0.7,
            "customField": {"nested": true},
            "quantumSpecific": {"qubitCount": 4, "ansatz": "hea"}
        }))
        .unwrap();

        assert_eq!(record.extra["customField"]["nested"], true);
        let qs = record.quantum_specific.as_ref().unwrap();
        assert_eq!(qs.qubit_count, Some(4.into()));
        assert_eq!(qs.extra["ansatz"], "hea");

        let out = serde_json::to_value(&record).unwrap();
        assert_eq!(out["customField"]["nested"], true);
        assert_eq!(out["quantumSpecific"]["ansatz"], "hea");
        assert!(out.get("uncertainty").is_none());
    }

    #[test]
    fn test_execution_time_unit() {
        let stats: UnitStatSummary = serde_json::from_value(json!({
            "min": 1.0, "median": 2.0, "mean": 2.5, "max": 4.0, "unit": "seconds"
        }))
        .unwrap();
        assert_eq!(stats.unit.as_deref(), Some("seconds"));
        assert_eq!(stats.summary().max, 4.0);
    }

    #[test]
    fn test_numbers_written_as_authored() {
        let doc = json!({
            "algorithmName": "Grover",
            "device": "sim",
            "metricName": "success probability",
            "metricValue": 5,
            "uncertainty": 0.5,
            "executionTime": {"min": 1, "median": 2.0, "mean": 2, "max": 3},
            "quantumSpecific": {"qubitCount": 5.0, "gateBreakdown": {"cx": 2.0, "h": 1}}
        });
        let record: BenchmarkRecord = serde_json::from_value(doc.clone()).unwrap();
        assert_eq!(record.metric(), 5.0);

        let out = serde_json::to_string(&record).unwrap();
        assert!(out.contains(r#""metricValue":5,"#));
        assert!(out.contains(r#""median":2.0"#));
        assert!(out.contains(r#""qubitCount":5.0"#));
        assert!(out.contains(r#""cx":2.0"#));
        assert_eq!(serde_json::to_value(&record).unwrap(), doc);
    }

    #[test]
    fn test_signature_and_display_id() {
        let mut record: BenchmarkRecord = serde_json::from_value(json!({
            "algorithmName": "VQE",
            "device": "IonQ Aria",
            "metricName": "energy",
            "metricValue": -1.13
        }))
        .unwrap();
        assert_eq!(record.signature(), "VQE-IonQ Aria-energy");
        assert_eq!(record.display_id(), "<unnamed>");
        record.benchmark_folder = Some("vqe_h2".into());
        assert_eq!(record.display_id(), "vqe_h2");
        record.id = Some("vqe_h2_v2".into());
        assert_eq!(record.display_id(), "vqe_h2_v2");
    }

    #[test]
    fn test_parse_timestamp_rejects_date_only() {
        assert!(parse_timestamp("2024-01-01").is_none());
        assert!(parse_timestamp("2024-01-01T00:00:00Z").is_some());
    }
}
