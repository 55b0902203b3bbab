//! Compile-time schema registry.
//!
//! The registry is the allowlist every candidate query is checked against.
//! It only has `const` constructors and no mutating methods, so the set of
//! readable tables and columns cannot be influenced by runtime input.
//!
//! # Example
//!
//! ```
//! use nlq_guard::Registry;
//!
//! let registry = Registry::builtin();
//! assert_eq!(registry.allowed_columns("USERS"), Some(&["id", "name", "created_at"][..]));
//! assert!(registry.allowed_columns("accounts").is_none());
//! ```

use crate::constants::{ALLOWED_COLUMNS, ALLOWED_TABLE};

static BUILTIN_TABLES: [TableSchema; 1] = [TableSchema::new(ALLOWED_TABLE, ALLOWED_COLUMNS)];

/// The registry shipped with the service: `users(id, name, created_at)`.
static BUILTIN: Registry = Registry::new(&BUILTIN_TABLES);

/// One readable table and the columns a projection may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
    name: &'static str,
    columns: &'static [&'static str],
}

impl TableSchema {
    /// Describe a table. Names should be given in lowercase.
    #[must_use]
    pub const fn new(name: &'static str, columns: &'static [&'static str]) -> Self {
        Self { name, columns }
    }

    /// Table name as stored in the registry.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Allowed column names.
    #[must_use]
    pub const fn columns(&self) -> &'static [&'static str] {
        self.columns
    }

    /// Whether `column` is on this table's allowlist (ASCII case-insensitive).
    #[must_use]
    pub fn allows(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c.eq_ignore_ascii_case(column))
    }
}

/// Immutable table → allowed-columns mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registry {
    tables: &'static [TableSchema],
}

impl Registry {
    /// Build a registry from a static table list.
    #[must_use]
    pub const fn new(tables: &'static [TableSchema]) -> Self {
        Self { tables }
    }

    /// The registry compiled into this crate.
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Look up a table by name (ASCII case-insensitive).
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&'static TableSchema> {
        self.tables.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Allowed columns for `table`, or `None` if the table is not readable.
    #[must_use]
    pub fn allowed_columns(&self, table: &str) -> Option<&'static [&'static str]> {
        self.table(table).map(TableSchema::columns)
    }

    /// The permitted table when the registry holds exactly one.
    #[must_use]
    pub fn single_table(&self) -> Option<&'static TableSchema> {
        match self.tables {
            [only] => Some(only),
            _ => None,
        }
    }

    /// All registered tables.
    #[must_use]
    pub const fn tables(&self) -> &'static [TableSchema] {
        self.tables
    }
}
