//! Centralized constants for the guard.
//!
//! Everything the validator enforces is fixed at build time. Widening the
//! allowlist or the row ceiling is a code change, never a runtime setting.

// ============================================================================
// SCHEMA ALLOWLIST
// ============================================================================

/// The only table queries may read from.
pub const ALLOWED_TABLE: &str = "users";

/// Columns of [`ALLOWED_TABLE`] that may appear in a projection.
///
/// Stored lowercase; lookups are ASCII case-insensitive.
pub const ALLOWED_COLUMNS: &[&str] = &["id", "name", "created_at"];

// ============================================================================
// ROW LIMIT
// ============================================================================

/// Hard ceiling on rows a validated query may return.
pub const MAX_ROW_LIMIT: u64 = 100;

// ============================================================================
// PROJECTION TOKENIZER
// ============================================================================

/// Tokens the projection check skips instead of treating as column names.
///
/// Covers aliases, `DISTINCT`, the basic aggregates and `CASE` expressions.
pub const PROJECTION_KEYWORDS: &[&str] = &[
    "AS", "DISTINCT", "COUNT", "SUM", "AVG", "MAX", "MIN", "CASE", "WHEN", "THEN", "ELSE", "END",
];

/// Statement separator. Any occurrence rejects the candidate.
pub const STATEMENT_SEPARATOR: char = ';';

/// Comment markers. A comment could hide the appended `LIMIT` clause.
pub const COMMENT_MARKERS: &[&str] = &["--", "/*", "*/"];
