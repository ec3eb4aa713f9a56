//! src/error.rs

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unrecognized character '{ch}' on line {line}")]
    UnrecognizedCharacter { ch: char, line: usize },
    #[error("unterminated {what} starting on line {line}")]
    Unterminated { what: &'static str, line: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected {expected}, but found {found} on line {line}")]
    UnexpectedToken {
        expected: String,
        found: String,
        line: usize,
    },
    #[error("expected {expected}, but found end of input")]
    UnexpectedEof { expected: String },
}

/// Errors raised while evaluating constant blocks. All of them abort
/// generation for the current type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("no const values found for type {prefix}")]
    NoEntriesFound { prefix: String },
    #[error("cannot convert literal {literal}: {reason}")]
    Conversion { literal: String, reason: String },
    #[error("unsupported operand in constant expression: {operand}")]
    UnsupportedOperand { operand: String },
    #[error("unsupported operator in constant expression: {operator}")]
    UnsupportedOperator { operator: String },
    #[error("division by zero in constant expression")]
    DivisionByZero,
}

impl EvalError {
    pub(crate) fn conversion(literal: &str, reason: impl Into<String>) -> Self {
        EvalError::Conversion {
            literal: literal.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("type name is required")]
    EmptyTypeName,
    #[error("first letter must be lowercase (private)")]
    TypeNotPrivate,
    #[error("generate called before a successful parse")]
    NotParsed,
    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to lex {}: {source}", path.display())]
    Lex {
        path: PathBuf,
        #[source]
        source: LexError,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
    #[error(transparent)]
    Eval(#[from] EvalError),
    /// Lookup by value needs every value to map to one constant. `clashes`
    /// lists each shared value as `multiple names for value N: a, b`.
    #[error("cannot generate getter, {clashes}")]
    DuplicateValues { clashes: String },
    #[error("failed to render enum source: {0}")]
    Render(#[from] std::fmt::Error),
}
