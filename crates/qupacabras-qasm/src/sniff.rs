//! Heuristic check that a text file is QASM at all.

use crate::lexer::{Token, tokenize};

/// Returns `true` if the source contains at least one of: a version header,
/// a quantum register declaration, a classical register declaration or an
/// include directive.
///
/// This is a sniff, not a parse. A `true` result says nothing about whether
/// the rest of the file is well formed.
pub fn looks_like_qasm(source: &str) -> bool {
    let tokens: Vec<Token> = tokenize(source)
        .into_iter()
        .filter(|t| *t != Token::Newline)
        .collect();

    tokens.windows(5).any(|w| {
        matches!(
            w,
            [
                Token::Qreg | Token::Creg,
                Token::Identifier(_),
                Token::LBracket,
                Token::IntLiteral(_),
                Token::RBracket,
            ]
        )
    }) || tokens.windows(4).any(|w| {
        matches!(
            w,
            [
                Token::Qubit | Token::Bit,
                Token::LBracket,
                Token::IntLiteral(_),
                Token::RBracket,
            ]
        )
    }) || tokens.windows(2).any(|w| {
        matches!(
            w,
            [Token::OpenQasm, Token::FloatLiteral(_) | Token::IntLiteral(_)]
                | [Token::Include, Token::StringLiteral(_)]
        )
    })
}
