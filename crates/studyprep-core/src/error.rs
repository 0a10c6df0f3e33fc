//! Core error types.
//!
//! Grading never surfaces errors to callers: `SymbolicError` is produced by the
//! expression engine and recovered inside the grader. `StoreError` covers the
//! durable documents (answer log, readiness store, progress tracker).

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while parsing or normalizing a symbolic expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SymbolicError {
    /// The input contained a character the expression grammar does not accept.
    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    /// The expression ended where an operand was expected.
    #[error("unexpected end of expression")]
    UnexpectedEnd,

    /// A token appeared where it is not allowed (e.g. `2 + * 3`).
    #[error("unexpected token '{0}'")]
    UnexpectedToken(String),

    /// Parentheses were not balanced.
    #[error("unbalanced parentheses")]
    Unbalanced,

    /// Division by an expression that is not a nonzero constant.
    #[error("unsupported division: {0}")]
    UnsupportedDivision(String),

    /// Exponent that is not a small non-negative integer constant.
    #[error("unsupported exponent: {0}")]
    UnsupportedExponent(String),

    /// Expansion would exceed the term or degree limits.
    #[error("expression too complex to expand")]
    TooComplex,

    /// Nesting deeper than the parser accepts.
    #[error("expression nested more than {0} levels deep")]
    TooDeep(usize),
}

/// Errors reading or writing the durable study documents.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading a document from disk failed.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing a document to disk failed.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A document existed but could not be parsed.
    #[error("malformed document {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Serializing a document failed.
    #[error("failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A submission referenced a week the question bank does not contain.
    #[error("week {0} not found in question bank")]
    UnknownWeek(u32),

    /// A submission referenced a question index outside the week's list.
    #[error("question index {index} out of range for week {week} ({len} questions)")]
    UnknownQuestion { week: u32, index: usize, len: usize },
}

impl StoreError {
    /// Returns `true` if the error refers to the submission itself rather than
    /// the underlying storage.
    pub fn is_bad_submission(&self) -> bool {
        matches!(
            self,
            StoreError::UnknownWeek(_) | StoreError::UnknownQuestion { .. }
        )
    }
}
