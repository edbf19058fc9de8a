//! Error taxonomy for path compilation and evaluation.

use thiserror::Error;

/// Errors raised while compiling a path expression.
///
/// Compilation is all-or-nothing: a failed parse caches nothing and returns
/// no partial AST. Every variant except [`ParseError::EmptyPath`] carries the
/// offending substring and its byte offset within the trimmed source text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty path expression")]
    EmptyPath,
    #[error("unterminated `[` in segment `{segment}` at offset {at}")]
    UnterminatedBracket { segment: String, at: usize },
    #[error("unrecognized subscript `{subscript}` at offset {at}")]
    InvalidSubscript { subscript: String, at: usize },
    #[error("invalid slice `{subscript}` at offset {at}")]
    InvalidSlice { subscript: String, at: usize },
    #[error("invalid filter subject `{subject}` at offset {at}: {reason}")]
    InvalidFilterSubject {
        subject: String,
        at: usize,
        reason: String,
    },
}

/// Errors raised while evaluating a compiled path.
///
/// Type mismatches during traversal (indexing into a scalar, member lookup
/// on a sequence) are not errors; those branches simply yield no matches.
/// Only structurally invalid queries fail evaluation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    #[error("slice step must be nonzero in `{segment}`")]
    InvalidStep { segment: String },
    #[error("predicate `{predicate}` is not usable as {expected}")]
    TypeMismatch { predicate: String, expected: String },
    #[error("evaluation budget exceeded after {visited} node visits")]
    BudgetExceeded { visited: usize },
}

/// Union error for entry points that compile and evaluate in one call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JsonPathError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}
