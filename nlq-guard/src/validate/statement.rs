//! Statement-shape rules: one statement, no comments, a leading `SELECT`.

use super::{Scan, pattern};
use crate::constants::{COMMENT_MARKERS, STATEMENT_SEPARATOR};
use crate::error::ValidationError;
use regex::Regex;
use std::sync::LazyLock;

static LEADING_SELECT: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)\ASELECT\b"));
static SELECT_KEYWORD: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)\bSELECT\b"));

/// Reject any statement separator. Truncating at the separator would
/// silently drop attacker-supplied trailing content.
pub(super) fn reject_separators(scan: &mut Scan<'_>) -> Result<(), ValidationError> {
    if scan.sql.contains(STATEMENT_SEPARATOR) {
        return Err(ValidationError::MultipleStatements);
    }
    Ok(())
}

/// Reject SQL comments; a trailing `--` would swallow the appended `LIMIT`.
pub(super) fn reject_comments(scan: &mut Scan<'_>) -> Result<(), ValidationError> {
    if COMMENT_MARKERS.iter().any(|marker| scan.sql.contains(marker)) {
        return Err(ValidationError::CommentNotAllowed);
    }
    Ok(())
}

pub(super) fn require_select(scan: &mut Scan<'_>) -> Result<(), ValidationError> {
    if !LEADING_SELECT.is_match(scan.sql) {
        return Err(ValidationError::NotASelect);
    }
    Ok(())
}

/// A second `SELECT` means a subquery or `UNION` slipped past the separator check.
pub(super) fn reject_extra_selects(scan: &mut Scan<'_>) -> Result<(), ValidationError> {
    if SELECT_KEYWORD.find_iter(scan.sql).nth(1).is_some() {
        return Err(ValidationError::MultipleStatements);
    }
    Ok(())
}
