//! The validated query value.

use std::fmt;

/// SQL text that passed every validation rule.
///
/// Only the validator can construct one, so holding a `ValidatedQuery` is
/// proof that the text is a single `SELECT` over one allowlisted table,
/// projects only allowlisted columns, has no statement separator or comment,
/// and carries a `LIMIT` no larger than [`MAX_ROW_LIMIT`](crate::MAX_ROW_LIMIT).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidatedQuery {
    sql: String,
    table: &'static str,
    limit: u64,
}

impl ValidatedQuery {
    pub(crate) const fn new(sql: String, table: &'static str, limit: u64) -> Self {
        Self { sql, table, limit }
    }

    /// The SQL text to execute.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.sql
    }

    /// The registry table the query reads from.
    #[must_use]
    pub const fn table(&self) -> &'static str {
        self.table
    }

    /// The effective row limit.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    /// Consume the value, returning the SQL text.
    #[must_use]
    pub fn into_sql(self) -> String {
        self.sql
    }
}

impl AsRef<str> for ValidatedQuery {
    fn as_ref(&self) -> &str {
        &self.sql
    }
}

impl fmt::Display for ValidatedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}
