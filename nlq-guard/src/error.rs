//! Validation error types.

use thiserror::Error;

/// Why a candidate query was refused.
///
/// Every variant is an expected outcome of checking untrusted input, not a
/// system fault. A rejected candidate must never be executed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// A statement separator or more than one `SELECT` keyword.
    #[error("SQL query cannot contain multiple statements")]
    MultipleStatements,
    /// A `--`, `/*` or `*/` comment marker.
    #[error("SQL query cannot contain comments")]
    CommentNotAllowed,
    /// The leading verb is not `SELECT`.
    #[error("Only SELECT queries are allowed")]
    NotASelect,
    /// No `FROM <table>` clause was found.
    #[error("SQL query must include a FROM clause")]
    MissingFromClause,
    /// A referenced table is not the permitted one.
    #[error("Table '{table}' is not allowed")]
    TableNotAllowed {
        /// Lowercased table name as it appeared in the query.
        table: String,
    },
    /// A projected identifier is not on the column allowlist.
    #[error("Column '{column}' is not allowed. Allowed columns: {}", allowed.join(", "))]
    ColumnNotAllowed {
        /// The offending fragment as written in the query.
        column: String,
        /// Columns the table does allow.
        allowed: Vec<String>,
    },
    /// The projection between `SELECT` and `FROM` could not be extracted.
    #[error("Invalid SELECT statement format")]
    InvalidSelectFormat,
}

impl ValidationError {
    /// Stable machine-readable code for responses and logs.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MultipleStatements => "multiple_statements",
            Self::CommentNotAllowed => "comment_not_allowed",
            Self::NotASelect => "not_a_select",
            Self::MissingFromClause => "missing_from_clause",
            Self::TableNotAllowed { .. } => "table_not_allowed",
            Self::ColumnNotAllowed { .. } => "column_not_allowed",
            Self::InvalidSelectFormat => "invalid_select_format",
        }
    }
}

/// A classified validation failure together with the candidate that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("rejected candidate query: {reason}")]
pub struct Rejection {
    /// Why the candidate was refused.
    #[source]
    pub reason: ValidationError,
    /// The original candidate text, untrimmed.
    pub candidate: String,
}

impl Rejection {
    pub(crate) fn new(reason: ValidationError, candidate: &str) -> Self {
        Self {
            reason,
            candidate: candidate.to_string(),
        }
    }
}
