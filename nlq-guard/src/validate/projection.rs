//! Projection rule: every identifier between `SELECT` and `FROM` must be an
//! allowlisted column or a recognized keyword.

use super::{Scan, pattern};
use crate::constants::PROJECTION_KEYWORDS;
use crate::error::ValidationError;
use regex::Regex;
use std::sync::LazyLock;

static PROJECTION: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?is)\ASELECT\s+(.+?)\s+FROM\b"));

/// Identifier-like fragments; quotes and punctuation fall between matches.
static FRAGMENT: LazyLock<Regex> = LazyLock::new(|| pattern(r"[\w.]+"));

/// Runs after `check_table`; a scan with no resolved table is treated as
/// missing its FROM clause.
pub(super) fn check_projection(scan: &mut Scan<'_>) -> Result<(), ValidationError> {
    let Some(table) = scan.table else {
        return Err(ValidationError::MissingFromClause);
    };

    let projection = PROJECTION
        .captures(scan.sql)
        .and_then(|caps| caps.get(1))
        .ok_or(ValidationError::InvalidSelectFormat)?
        .as_str();

    // Any `*` skips the column checks for the whole projection.
    if projection.contains('*') {
        return Ok(());
    }

    for fragment in FRAGMENT.find_iter(projection).map(|m| m.as_str()) {
        if is_keyword(fragment) {
            continue;
        }

        let column = fragment.rsplit('.').next().unwrap_or(fragment);
        if !table.allows(column) {
            return Err(ValidationError::ColumnNotAllowed {
                column: fragment.to_string(),
                allowed: table.columns().iter().map(|c| (*c).to_string()).collect(),
            });
        }
    }

    Ok(())
}

#[inline]
fn is_keyword(fragment: &str) -> bool {
    PROJECTION_KEYWORDS
        .iter()
        .any(|keyword| keyword.eq_ignore_ascii_case(fragment))
}
