//! Allowlist validation for generated SQL.
//!
//! A candidate query is checked by an ordered chain of rules. The first rule
//! that fails decides the [`ValidationError`]; nothing is rewritten unless
//! every rule passes. Only then is the row limit enforced and a
//! [`ValidatedQuery`] produced.
//!
//! This is a conservative tokenizer over the query text, not a SQL parser.
//! It accepts the simple single-table shapes a text generator should emit and
//! refuses anything that names an unknown table or column.
//!
//! # Example
//!
//! ```
//! use nlq_guard::{QueryValidator, ValidationError};
//!
//! let validator = QueryValidator::default();
//!
//! let query = validator.validate("SELECT id, name FROM users").unwrap();
//! assert_eq!(query.as_str(), "SELECT id, name FROM users LIMIT 100");
//!
//! let rejected = validator.validate("SELECT id FROM users; DROP TABLE users").unwrap_err();
//! assert_eq!(rejected.reason, ValidationError::MultipleStatements);
//! ```

mod limit;
mod projection;
mod quoted;
mod statement;
mod table;

use crate::error::{Rejection, ValidationError};
use crate::query::ValidatedQuery;
use crate::schema::{Registry, TableSchema};
use regex::Regex;

/// State shared by the rules while one candidate is checked.
#[derive(Debug)]
pub(crate) struct Scan<'a> {
    sql: &'a str,
    registry: &'static Registry,
    table: Option<&'static TableSchema>,
}

impl<'a> Scan<'a> {
    fn new(sql: &'a str, registry: &'static Registry) -> Self {
        Self {
            sql,
            registry,
            table: None,
        }
    }
}

type Rule = fn(&mut Scan<'_>) -> Result<(), ValidationError>;

/// Validation rules in the order they run.
///
/// Later rules may rely on state set by earlier ones: `check_projection`
/// reads the table resolved by `check_table`.
const RULES: &[Rule] = &[
    statement::reject_separators,
    statement::reject_comments,
    statement::require_select,
    statement::reject_extra_selects,
    table::check_table,
    projection::check_projection,
];

/// Validates candidate queries against a fixed registry.
///
/// Stateless and cheap to copy; one instance can serve any number of
/// concurrent requests.
#[derive(Debug, Clone, Copy)]
pub struct QueryValidator {
    registry: &'static Registry,
}

impl QueryValidator {
    /// Create a validator for `registry`.
    #[must_use]
    pub const fn new(registry: &'static Registry) -> Self {
        Self { registry }
    }

    /// The registry this validator enforces.
    #[must_use]
    pub const fn registry(&self) -> &'static Registry {
        self.registry
    }

    /// Check `candidate` and return it as a bounded, validated query.
    pub fn validate(&self, candidate: &str) -> Result<ValidatedQuery, Rejection> {
        let mut scan = Scan::new(candidate.trim(), self.registry);

        for rule in RULES {
            rule(&mut scan).map_err(|reason| Rejection::new(reason, candidate))?;
        }

        let table = scan
            .table
            .ok_or_else(|| Rejection::new(ValidationError::MissingFromClause, candidate))?;
        let (sql, limit) = limit::enforce_row_limit(scan.sql);

        Ok(ValidatedQuery::new(sql, table.name(), limit))
    }
}

impl Default for QueryValidator {
    fn default() -> Self {
        Self::new(Registry::builtin())
    }
}

/// Validate `candidate` against `registry`.
///
/// Shorthand for `QueryValidator::new(registry).validate(candidate)`.
pub fn validate(candidate: &str, registry: &'static Registry) -> Result<ValidatedQuery, Rejection> {
    QueryValidator::new(registry).validate(candidate)
}

/// Compile one of the built-in patterns.
#[allow(clippy::expect_used)]
fn pattern(re: &str) -> Regex {
    // Literals only; every pattern is exercised by the unit tests below.
    Regex::new(re).expect("built-in pattern must compile")
}
