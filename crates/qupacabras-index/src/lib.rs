//! Qupacabras index: validation and index generation for benchmark submissions
//!
//! Every submission is a folder under the submissions root holding one
//! `benchmark.json` and any number of QASM circuit files. This crate checks
//! each submission and merges the accepted ones into the single JSON array
//! the static site renders.
//!
//! # Overview
//!
//! - **Schema**: structural validation of the raw document
//! - **Statistics**: ordering and range checks on `{min, median, mean, max}`
//! - **Submission validation**: schema, id/folder match, QASM files and
//!   advisory checks, accumulated as errors and warnings
//! - **Duplicates**: same algorithm, device and metric with a near-equal value
//! - **Index building**: enrichment, newest-first ordering, output writing
//!
//! # Architecture
//!
//! ```text
//! submissions/<folder>/benchmark.json
//!              |
//!              v
//!     SubmissionValidator --(invalid)--> rejected, logged
//!              |
//!              v
//!          enrich()  <-- qupacabras-qasm
//!              |
//!              v
//!   sort newest first -> detect_duplicates -> public/benchmarks.json
//! ```
//!
//! # Example
//!
//! ```no_run
//! use qupacabras_index::{IndexBuilder, IndexConfig};
//!
//! let builder = IndexBuilder::new(IndexConfig::default());
//! let outcome = builder.build()?;
//! println!("indexed {} benchmarks", outcome.records.len());
//! # Ok::<(), qupacabras_index::IndexError>(())
//! ```

pub mod builder;
pub mod config;
pub mod duplicates;
pub mod enrich;
pub mod error;
pub mod metadata;
pub mod record;
pub mod report;
pub mod schema;
pub mod stats;
pub mod validation;

pub use builder::{FolderOutcome, FolderStatus, IndexBuilder, IndexOutcome};
pub use config::{ConfigError, IndexConfig};
pub use duplicates::{DuplicateFinding, detect_duplicates};
pub use enrich::{enrich, enrich_at};
pub use error::{IndexError, IndexResult};
pub use metadata::{StampOutcome, stamp_metadata};
pub use record::BenchmarkRecord;
pub use report::ValidationReport;
pub use schema::Schema;
pub use stats::check_stat_summary;
pub use validation::{SubmissionValidator, ValidationResult};
