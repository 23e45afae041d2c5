//! Single-circuit analysis.
//!
//! The inspector walks the source as a sequence of logical lines and
//! classifies each one, in order of precedence, as a register declaration,
//! a measurement, a barrier, or a gate invocation.
//!
//! Depth is an approximation: every qubit touched by a gate advances its own
//! layer counter by one, and the circuit depth is the largest counter seen.
//! Two-qubit gates do not synchronise the layers of their operands, so the
//! reported depth is a lower bound rather than a certified depth.

use std::collections::BTreeMap;
use std::path::Path;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::{QasmError, QasmResult};
use crate::lexer::{Token, tokenize};

/// Identifiers that start a statement but never name a gate.
const NON_GATE_KEYWORDS: &[&str] = &[
    "for", "while", "else", "let", "const", "input", "output", "int", "uint", "float", "bool",
    "angle", "return", "extern", "duration",
];

/// Structural metrics extracted from one circuit file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QasmAnalysis {
    /// Total width of all quantum registers.
    pub qubit_count: usize,
    /// Total width of all classical registers.
    pub classical_bit_count: usize,
    /// Number of gate invocations, regardless of arity.
    pub gate_count: usize,
    /// Gates acting on exactly one qubit.
    pub single_qubit_gate_count: usize,
    /// Gates acting on exactly two qubits.
    pub two_qubit_gate_count: usize,
    /// Gates acting on three or more qubits.
    pub multi_qubit_gate_count: usize,
    /// Measurement statements.
    pub measurement_count: usize,
    /// Approximate circuit depth (see module docs).
    pub circuit_depth: usize,
    /// Gate invocations by gate name.
    pub gate_types: BTreeMap<String, usize>,
    /// Whether any barrier statement was seen.
    pub has_barrier: bool,
}

/// Analyze `OpenQASM` source text.
pub fn analyze(source: &str) -> QasmAnalysis {
    let mut inspector = Inspector::default();
    for line in logical_lines(tokenize(source)) {
        inspector.visit(&line);
    }
    inspector.analysis
}

/// Read and analyze a circuit file.
pub fn analyze_file(path: &Path) -> QasmResult<QasmAnalysis> {
    let source = std::fs::read_to_string(path).map_err(|source| QasmError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(analyze(&source))
}

#[derive(Default)]
struct Inspector {
    analysis: QasmAnalysis,
    quantum_registers: FxHashSet<String>,
    qubit_depth: FxHashMap<(String, u64), usize>,
}

impl Inspector {
    fn visit(&mut self, line: &[Token]) {
        let line = strip_condition(line);
        let Some(first) = line.first() else {
            return;
        };

        match first {
            Token::OpenQasm | Token::Include => {}
            Token::Qreg => {
                if let Some((name, width)) = named_register(&line[1..]) {
                    self.declare_quantum(name, width);
                }
            }
            Token::Qubit => {
                if let Some((name, width)) = typed_register(&line[1..]) {
                    self.declare_quantum(name, width);
                }
            }
            Token::Creg => {
                if let Some((_, width)) = named_register(&line[1..]) {
                    self.declare_classical(width, line);
                }
            }
            Token::Bit => {
                if let Some((_, width)) = typed_register(&line[1..]) {
                    self.declare_classical(width, line);
                }
            }
            _ if line.contains(&Token::Measure) => self.analysis.measurement_count += 1,
            Token::Barrier => self.analysis.has_barrier = true,
            Token::Identifier(name) if !NON_GATE_KEYWORDS.contains(&name.as_str()) => {
                self.visit_gate(name, &line[1..]);
            }
            _ => {}
        }
    }

    fn declare_quantum(&mut self, name: String, width: usize) {
        self.analysis.qubit_count = self.analysis.qubit_count.saturating_add(width);
        self.quantum_registers.insert(name);
    }

    /// `bit[2] c = measure q;` declares and measures in one statement.
    fn declare_classical(&mut self, width: usize, line: &[Token]) {
        self.analysis.classical_bit_count = self.analysis.classical_bit_count.saturating_add(width);
        if line.contains(&Token::Measure) {
            self.analysis.measurement_count += 1;
        }
    }

    fn visit_gate(&mut self, name: &str, rest: &[Token]) {
        // `c[0] = 1` and stray operand fragments are not invocations.
        if rest.first() == Some(&Token::LBracket) {
            return;
        }
        let operands = skip_parenthesized(rest);
        if operands.is_empty() {
            return;
        }

        *self.analysis.gate_types.entry(name.to_string()).or_insert(0) += 1;
        self.analysis.gate_count += 1;

        let qubits = self.qubit_operands(operands);
        match qubits.len() {
            0 => {}
            1 => self.analysis.single_qubit_gate_count += 1,
            2 => self.analysis.two_qubit_gate_count += 1,
            _ => self.analysis.multi_qubit_gate_count += 1,
        }

        for qubit in qubits {
            let depth = self.qubit_depth.entry(qubit).or_insert(0);
            *depth += 1;
            self.analysis.circuit_depth = self.analysis.circuit_depth.max(*depth);
        }
    }

    /// Distinct `reg[index]` references to declared quantum registers, in order.
    fn qubit_operands(&self, tokens: &[Token]) -> Vec<(String, u64)> {
        let mut qubits: Vec<(String, u64)> = Vec::new();
        for window in tokens.windows(4) {
            if let [
                Token::Identifier(reg),
                Token::LBracket,
                Token::IntLiteral(index),
                Token::RBracket,
            ] = window
            {
                if !self.quantum_registers.contains(reg) {
                    continue;
                }
                let qubit = (reg.clone(), *index);
                if !qubits.contains(&qubit) {
                    qubits.push(qubit);
                }
            }
        }
        qubits
    }
}

/// Split a token stream into logical lines.
///
/// A line ends at `;`, a newline, or a brace. A newline directly after a
/// comma, an open parenthesis or an operator continues the statement, so
/// operand lists may wrap. Gate, opaque and subroutine definitions are
/// dropped together with their bodies.
fn logical_lines(tokens: Vec<Token>) -> Vec<Vec<Token>> {
    let mut lines = Vec::new();
    let mut current = Vec::new();
    let mut iter = tokens.into_iter();

    while let Some(token) = iter.next() {
        match token {
            Token::Gate | Token::Opaque | Token::Def if current.is_empty() => {
                skip_definition(&mut iter);
            }
            Token::Newline
                if matches!(
                    current.last(),
                    Some(Token::Comma | Token::LParen | Token::Operator)
                ) => {}
            Token::Semicolon | Token::Newline | Token::LBrace | Token::RBrace => {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
            }
            other => current.push(other),
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn skip_definition(iter: &mut impl Iterator<Item = Token>) {
    let mut depth = 0usize;
    for token in iter {
        match token {
            Token::LBrace => depth += 1,
            Token::RBrace => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return;
                }
            }
            Token::Semicolon if depth == 0 => return,
            _ => {}
        }
    }
}

/// Drop an `if (...)` guard so the guarded statement is analyzed.
fn strip_condition(line: &[Token]) -> &[Token] {
    match line.first() {
        Some(Token::If) => skip_parenthesized(&line[1..]),
        _ => line,
    }
}

/// Skip a leading balanced `( ... )` group, if present.
fn skip_parenthesized(tokens: &[Token]) -> &[Token] {
    if tokens.first() != Some(&Token::LParen) {
        return tokens;
    }
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::LParen => depth += 1,
            Token::RParen => {
                depth -= 1;
                if depth == 0 {
                    return &tokens[i + 1..];
                }
            }
            _ => {}
        }
    }
    &[]
}

/// `name[width]` as in `qreg q[5]`.
fn named_register(tokens: &[Token]) -> Option<(String, usize)> {
    match tokens {
        [
            Token::Identifier(name),
            Token::LBracket,
            Token::IntLiteral(width),
            Token::RBracket,
            ..,
        ] => Some((name.clone(), usize::try_from(*width).ok()?)),
        _ => None,
    }
}

/// `[width] name` or a bare `name` as in `qubit[5] q` / `qubit q`.
fn typed_register(tokens: &[Token]) -> Option<(String, usize)> {
    match tokens {
        [
            Token::LBracket,
            Token::IntLiteral(width),
            Token::RBracket,
            Token::Identifier(name),
            ..,
        ] => Some((name.clone(), usize::try_from(*width).ok()?)),
        [Token::Identifier(name), ..] => Some((name.clone(), 1)),
        _ => None,
    }
}
