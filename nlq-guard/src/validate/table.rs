//! Table-reference rule.
//!
//! The first `FROM` names the table; it must match a registry table exactly
//! (no prefix or substring match, no schema qualifier). Every other table
//! reference must name that same table: a later `FROM`, a `JOIN` target, a
//! comma-listed source, or the `expr IN table` form. A source that does not
//! read as a plain or quoted identifier (a parenthesized source, a
//! table-valued call, anything unrecognized) is refused. Keywords inside
//! quoted text are ignored.

use super::quoted::QuotedSpans;
use super::{Scan, pattern};
use crate::error::ValidationError;
use crate::schema::TableSchema;
use regex::Regex;
use std::sync::LazyLock;

/// Keywords that introduce a table source.
static SOURCE_KEYWORD: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)\b(FROM|JOIN|IN)\b"));

/// Source list of a `FROM` clause, up to the next clause keyword.
static FROM_SOURCES: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"(?is)\A\s*(.*?)(?:\bWHERE\b|\bGROUP\b|\bORDER\b|\bHAVING\b|\bLIMIT\b|\bOFFSET\b|\z)")
});

/// A bare or quoted identifier at the start of a source, not followed by a
/// call or qualifier.
static SOURCE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r#"\A\s*(?:"(\w+)"|'(\w+)'|`(\w+)`|\[(\w+)\]|(\w+))\s*([.(])?"#)
});

/// One table source as written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source<'a> {
    /// A readable identifier.
    Named(&'a str),
    /// Anything else; the raw leading token.
    Opaque(&'a str),
}

pub(super) fn check_table(scan: &mut Scan<'_>) -> Result<(), ValidationError> {
    let mut sources = table_sources(scan.sql);

    let target = match sources.next() {
        Some(Source::Named(name)) => name.to_ascii_lowercase(),
        Some(Source::Opaque(raw)) if !raw.is_empty() => {
            return Err(ValidationError::TableNotAllowed {
                table: raw.to_ascii_lowercase(),
            });
        },
        _ => return Err(ValidationError::MissingFromClause),
    };

    let table = scan
        .registry
        .table(&target)
        .ok_or(ValidationError::TableNotAllowed { table: target })?;

    for source in sources {
        ensure_same_table(table, source)?;
    }

    scan.table = Some(table);
    Ok(())
}

fn ensure_same_table(table: &TableSchema, source: Source<'_>) -> Result<(), ValidationError> {
    match source {
        Source::Named(name) if table.name().eq_ignore_ascii_case(name) => Ok(()),
        Source::Named(name) | Source::Opaque(name) if !name.is_empty() => {
            Err(ValidationError::TableNotAllowed {
                table: name.to_ascii_lowercase(),
            })
        },
        _ => Err(ValidationError::InvalidSelectFormat),
    }
}

/// Every table source in the query, the first `FROM` target first.
fn table_sources(sql: &str) -> impl Iterator<Item = Source<'_>> {
    let quoted = QuotedSpans::of(sql);
    let mut sources = Vec::new();

    for caps in SOURCE_KEYWORD.captures_iter(sql) {
        let (Some(whole), Some(keyword)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if quoted.contains(whole.start()) {
            continue;
        }
        let rest = sql.get(whole.end()..).unwrap_or("");

        if keyword.as_str().eq_ignore_ascii_case("IN") {
            // `IN (...)` is a value list; `IN name` reads a table.
            if !rest.trim_start().starts_with('(') {
                sources.push(source_at(rest));
            }
            continue;
        }

        sources.push(source_at(rest));
        if keyword.as_str().eq_ignore_ascii_case("FROM") {
            let listed = FROM_SOURCES
                .captures(rest)
                .and_then(|caps| caps.get(1))
                .map_or("", |m| m.as_str());
            sources.extend(listed.split(',').skip(1).map(source_at));
        }
    }

    sources.into_iter()
}

fn source_at(text: &str) -> Source<'_> {
    let named = SOURCE_NAME.captures(text).and_then(|caps| {
        let name = caps.iter().skip(1).take(5).flatten().next()?;
        // `name(` is a table-valued call; `name.` is a schema qualifier and
        // reports the schema.
        match caps.get(6).map(|m| m.as_str()) {
            Some("(") => None,
            _ => Some(name.as_str()),
        }
    });

    named.map_or_else(
        || Source::Opaque(text.split_whitespace().next().unwrap_or("")),
        Source::Named,
    )
}
