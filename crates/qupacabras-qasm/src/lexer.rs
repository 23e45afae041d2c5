//! Lexer for the subset of `OpenQASM` 2/3 the inspector cares about.
//!
//! Newlines are significant: the inspector treats both `;` and a line break
//! as the end of a logical line.

use logos::Logos;

/// Tokens for `OpenQASM` source.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\f]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*[^*]*\*+(?:[^/*][^*]*\*+)*/")]
pub enum Token {
    // Directives
    #[token("OPENQASM", ignore(ascii_case))]
    OpenQasm,

    #[token("include")]
    Include,

    // Register declarations
    #[token("qreg")]
    Qreg,

    #[token("creg")]
    Creg,

    #[token("qubit")]
    Qubit,

    #[token("bit")]
    Bit,

    // Statements with dedicated handling
    #[token("measure")]
    Measure,

    #[token("barrier")]
    Barrier,

    #[token("if")]
    If,

    // Definitions (skipped, they do not invoke anything)
    #[token("gate")]
    Gate,

    #[token("opaque")]
    Opaque,

    #[token("def")]
    Def,

    // Literals
    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    FloatLiteral(f64),

    #[regex(r"[0-9]+", |lex| lex.slice().parse::<u64>().ok())]
    IntLiteral(u64),

    #[regex(r#""[^"]*""#, |lex| {
        let s = lex.slice();
        Some(s[1..s.len()-1].to_string())
    })]
    StringLiteral(String),

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    // Punctuation
    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token(";")]
    Semicolon,

    #[token(",")]
    Comma,

    #[token("\n")]
    Newline,

    /// Any run of operator characters (`->`, `==`, `=`, `+`, `@`, ...).
    #[regex(r"[-+*/%<>=!&|^~@:.$]+")]
    Operator,
}

/// Tokenize a QASM source string, dropping anything the lexer cannot match.
pub fn tokenize(source: &str) -> Vec<Token> {
    Token::lexer(source).filter_map(Result::ok).collect()
}
