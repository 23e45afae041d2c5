//! Circuit inspector for Qupacabras benchmark submissions.
//!
//! Submissions ship their circuits as `OpenQASM` text. This crate does not
//! build a circuit; it reads the text line by line and derives the handful of
//! structural metrics the benchmark index displays.
//!
//! | Line kind | Example | Effect |
//! |-----------|---------|--------|
//! | Version / include | `OPENQASM 2.0;` | ignored |
//! | Quantum register | `qreg q[5];`, `qubit[5] q;` | `qubitCount += 5` |
//! | Classical register | `creg c[5];`, `bit[5] c;` | `classicalBitCount += 5` |
//! | Measurement | `measure q -> c;` | `measurementCount += 1` |
//! | Barrier | `barrier q;` | `hasBarrier = true` |
//! | Anything else | `cx q[0], q[1];` | gate, classified by qubit operand count |
//!
//! # Example
//!
//! ```rust
//! use qupacabras_qasm::analyze;
//!
//! let analysis = analyze(r#"
//!     OPENQASM 2.0;
//!     qreg q[2];
//!     creg c[2];
//!     h q[0];
//!     cx q[0],q[1];
//!     measure q -> c;
//! "#);
//!
//! assert_eq!(analysis.qubit_count, 2);
//! assert_eq!(analysis.gate_count, 2);
//! assert_eq!(analysis.two_qubit_gate_count, 1);
//! assert_eq!(analysis.measurement_count, 1);
//! ```

mod analysis;
mod directory;
mod error;
mod lexer;
mod sniff;

pub use analysis::{QasmAnalysis, analyze, analyze_file};
pub use directory::{AggregateStatistics, DirectoryAnalysis, FileAnalysis, analyze_dir};
pub use error::{QasmError, QasmResult};
pub use sniff::looks_like_qasm;
