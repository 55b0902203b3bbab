//! Query execution against `SQLite`.
//!
//! Executors only ever see a [`ValidatedQuery`]; there is no way to hand
//! them raw text. They add no checks of their own.

use async_trait::async_trait;
use nlq_guard::ValidatedQuery;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result set of one query.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Rows {
    /// Column names in result order.
    pub columns: Vec<String>,
    /// One entry per row, values in column order.
    pub rows: Vec<Vec<Value>>,
}

/// Execution failures.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The database rejected or failed the statement.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// The blocking worker panicked or was cancelled.
    #[error("query worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Runs validated queries and returns their rows.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Execute `query` exactly as validated.
    async fn execute(&self, query: ValidatedQuery) -> Result<Rows, ExecutionError>;
}

/// Executor over a `SQLite` database file.
///
/// A fresh read-only connection is opened per query and the statement runs
/// on the blocking pool.
#[derive(Debug, Clone)]
pub struct SqliteExecutor {
    path: PathBuf,
}

impl SqliteExecutor {
    /// Executor for the database at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Database file this executor reads.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl QueryExecutor for SqliteExecutor {
    async fn execute(&self, query: ValidatedQuery) -> Result<Rows, ExecutionError> {
        let path = self.path.clone();
        let rows = tokio::task::spawn_blocking(move || run(&path, query.as_str())).await??;
        Ok(rows)
    }
}

fn run(path: &Path, sql: &str) -> Result<Rows, rusqlite::Error> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    let mut stmt = conn.prepare(sql)?;

    let columns: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(str::to_string)
        .collect();
    let width = columns.len();

    let rows = stmt
        .query_map([], |row| {
            (0..width)
                .map(|i| row.get_ref(i).map(to_json))
                .collect::<Result<Vec<_>, _>>()
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Rows { columns, rows })
}

/// Map one `SQLite` value to JSON. Non-finite reals become `null`.
fn to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::from(bytes.to_vec()),
    }
}
