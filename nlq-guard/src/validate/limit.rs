//! Row-limit enforcement.
//!
//! Runs after every rule has passed. SQLite allows an expression after
//! `LIMIT`, so only one shape is trusted: a trailing `LIMIT <digits>`,
//! optionally followed by `OFFSET <digits>`, with the bound no larger than
//! [`MAX_ROW_LIMIT`]. A bound over the ceiling is lowered and the offset
//! kept. Any other `LIMIT` tail (an expression, a negative or non-numeric
//! bound, the `LIMIT offset, count` form, a bare `LIMIT`) is replaced by
//! exactly `LIMIT 100`. A query with no `LIMIT` keyword outside quotes gets
//! ` LIMIT 100` appended.

use super::pattern;
use super::quoted::QuotedSpans;
use crate::constants::MAX_ROW_LIMIT;
use regex::Regex;
use std::sync::LazyLock;

static LIMIT_KEYWORD: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)\bLIMIT\b"));

/// The only tail kept as written.
static SIMPLE_TAIL: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)\ALIMIT\s+(\d+)(\s+OFFSET\s+\d+)?\s*\z"));

/// Returns the bounded SQL and the effective row limit.
pub(super) fn enforce_row_limit(sql: &str) -> (String, u64) {
    let sql = sql.trim_end();
    let Some(start) = clause_start(sql) else {
        return (format!("{sql} LIMIT {MAX_ROW_LIMIT}"), MAX_ROW_LIMIT);
    };

    let (head, tail) = sql.split_at(start);
    let Some(caps) = SIMPLE_TAIL.captures(tail) else {
        return (format!("{head}LIMIT {MAX_ROW_LIMIT}"), MAX_ROW_LIMIT);
    };

    match caps.get(1).and_then(|bound| parse_bound(bound.as_str())) {
        Some(bound) if bound <= MAX_ROW_LIMIT => (sql.to_string(), bound),
        _ => {
            let offset = caps.get(2).map_or("", |m| m.as_str());
            (format!("{head}LIMIT {MAX_ROW_LIMIT}{offset}"), MAX_ROW_LIMIT)
        },
    }
}

/// Byte offset of the first `LIMIT` keyword outside quoted text.
fn clause_start(sql: &str) -> Option<usize> {
    let quoted = QuotedSpans::of(sql);
    LIMIT_KEYWORD
        .find_iter(sql)
        .map(|m| m.start())
        .find(|start| !quoted.contains(*start))
}

/// A bound is trusted only when it is a bare run of ASCII digits.
fn parse_bound(bound: &str) -> Option<u64> {
    if bound.is_empty() || !bound.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    bound.parse().ok()
}
