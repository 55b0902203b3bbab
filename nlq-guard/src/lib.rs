//! Validation layer between an untrusted SQL generator and a real database.
//!
//! A text generator turns a natural-language question into a string that
//! claims to be SQL. This crate decides whether that string may run. The
//! only way to obtain a [`ValidatedQuery`] is through [`QueryValidator`],
//! which proves the text is:
//!
//! - a single statement with no `;` and no comments,
//! - a `SELECT` (exactly one),
//! - reading exactly one table from the [`Registry`],
//! - projecting only allowlisted columns (or `*`),
//! - bounded by `LIMIT n` with `n <= 100`.
//!
//! Everything else is refused with a [`ValidationError`].
//!
//! ```
//! use nlq_guard::{QueryValidator, ValidationError};
//!
//! let validator = QueryValidator::default();
//!
//! let query = validator.validate("SELECT * FROM users LIMIT 500").unwrap();
//! assert_eq!(query.as_str(), "SELECT * FROM users LIMIT 100");
//!
//! let err = validator.validate("SELECT password FROM users").unwrap_err();
//! assert_eq!(err.reason.kind(), "column_not_allowed");
//! ```

pub mod constants;
mod error;
mod query;
mod schema;
mod validate;

pub use constants::{ALLOWED_COLUMNS, ALLOWED_TABLE, MAX_ROW_LIMIT};
pub use error::{Rejection, ValidationError};
pub use query::ValidatedQuery;
pub use schema::{Registry, TableSchema};
pub use validate::{QueryValidator, validate};
