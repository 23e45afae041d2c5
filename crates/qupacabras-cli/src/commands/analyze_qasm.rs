//! Analyze-qasm command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use tracing::debug;

use qupacabras_qasm::{DirectoryAnalysis, QasmAnalysis, analyze_dir, analyze_file};

/// Execute the analyze-qasm command on a file or a directory.
pub fn execute(path: &Path, json: bool) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("Path not found: {}", path.display());
    }

    if path.is_dir() {
        debug!(path = %path.display(), "Analyzing QASM directory");
        let result = analyze_dir(path)
            .with_context(|| format!("Failed to analyze {}", path.display()))?;
        let Some(result) = result else {
            anyhow::bail!("No .qasm files could be analyzed in {}", path.display());
        };
        if json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            print_directory(path, &result);
        }
    } else {
        debug!(path = %path.display(), "Analyzing QASM file");
        let analysis = analyze_file(path)
            .with_context(|| format!("Failed to analyze {}", path.display()))?;
        if json {
            println!("{}", serde_json::to_string_pretty(&analysis)?);
        } else {
            print_file(path, &analysis);
        }
    }

    Ok(())
}

fn print_file(path: &Path, analysis: &QasmAnalysis) {
    println!(
        "{} Analyzing QASM file: {}",
        style("→").cyan().bold(),
        style(path.display()).green()
    );
    println!();
    println!("{}", style("Circuit Analysis:").bold());
    println!("   Qubits: {}", analysis.qubit_count);
    println!("   Classical bits: {}", analysis.classical_bit_count);
    println!("   Total gates: {}", analysis.gate_count);
    println!("   Circuit depth: {}", analysis.circuit_depth);
    println!("   Single-qubit gates: {}", analysis.single_qubit_gate_count);
    println!("   Two-qubit gates: {}", analysis.two_qubit_gate_count);
    println!("   Multi-qubit gates: {}", analysis.multi_qubit_gate_count);
    println!("   Measurements: {}", analysis.measurement_count);
    println!("   Barriers: {}", if analysis.has_barrier { "yes" } else { "no" });
    println!();
    println!("{}", style("Gate Breakdown:").bold());
    for (gate, count) in &analysis.gate_types {
        println!("   {gate}: {count}");
    }
}

fn print_directory(path: &Path, result: &DirectoryAnalysis) {
    let agg = &result.aggregate;
    println!(
        "{} Analyzing QASM files in directory: {}",
        style("→").cyan().bold(),
        style(path.display()).green()
    );
    println!();
    println!("{}", style("Aggregate Statistics:").bold());
    println!("   Total circuits: {}", agg.total_circuits);
    println!("   Average qubits: {:.1}", agg.avg_qubit_count);
    println!("   Average gates: {:.1}", agg.avg_gate_count);
    println!("   Average depth: {:.1}", agg.avg_circuit_depth);
    println!("   Average 1Q gates: {:.1}", agg.avg_single_qubit_gates);
    println!("   Average 2Q gates: {:.1}", agg.avg_two_qubit_gates);
    println!();
    println!("{}", style("Gate Types Used:").bold());
    for (gate, count) in &agg.total_gate_types {
        println!(
            "   {gate}: {count} total ({:.1} avg)",
            *count as f64 / agg.total_circuits as f64
        );
    }
}
