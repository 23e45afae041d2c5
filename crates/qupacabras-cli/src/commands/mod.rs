//! CLI command implementations.

pub mod analyze_qasm;
pub mod build_index;
pub mod common;
pub mod stamp;
pub mod status;
pub mod validate;
pub mod version;
