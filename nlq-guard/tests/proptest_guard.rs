//! Property-based tests for query validation using proptest.
//!
//! These tests generate candidate queries from small token pools, plus
//! random noise, and check the guarantees every validated query must carry.

use nlq_guard::{MAX_ROW_LIMIT, QueryValidator, ValidatedQuery, ValidationError};
use proptest::prelude::*;
use regex::Regex;

fn validator() -> QueryValidator {
    QueryValidator::default()
}

/// Independent checks of the validated-query guarantees.
fn assert_bounded(query: &ValidatedQuery) -> Result<(), TestCaseError> {
    let sql = query.as_str();
    prop_assert!(!sql.contains(';'), "separator in {}", sql);

    let from = Regex::new(r#"(?i)\bFROM\s+[\["'`]?(\w+)"#).unwrap();
    let table = from
        .captures(sql)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_ascii_lowercase());
    prop_assert_eq!(table.as_deref(), Some("users"), "table in {}", sql);

    // The statement must end in a plain numeric bound; anything else could
    // evaluate to more rows than it shows.
    let tail = Regex::new(r"(?i)\bLIMIT\s+(\d+)(?:\s+OFFSET\s+\d+)?\s*\z").unwrap();
    let bound: Option<u64> = tail
        .captures(sql)
        .and_then(|caps| caps.get(1)?.as_str().parse().ok());
    prop_assert!(bound.is_some(), "no trailing LIMIT in {}", sql);
    prop_assert!(bound <= Some(MAX_ROW_LIMIT), "unbounded {}", sql);
    prop_assert_eq!(bound, Some(query.limit()), "reported limit for {}", sql);
    Ok(())
}

/// Vary casing and whitespace without changing meaning.
fn reshape(sql: &str, upper: bool) -> String {
    let cased = if upper {
        sql.to_ascii_uppercase()
    } else {
        sql.to_ascii_lowercase()
    };
    format!("  {}\n", cased.replace(' ', " \n\t "))
}

fn allowed_column() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["id", "name", "created_at", "ID", "Name", "CREATED_AT", "users.id"])
}

fn forbidden_column() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["password", "email", "ssn", "api_key", "users.password"])
}

fn foreign_table() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["accounts", "users_secret", "sqlite_master", "user", "Payments"])
}

fn limit_clause() -> impl Strategy<Value = Option<u64>> {
    prop::option::of(prop_oneof![0u64..=MAX_ROW_LIMIT, 0u64..1_000_000])
}

/// LIMIT tails whose value is computed rather than written out.
fn computed_limit() -> impl Strategy<Value = String> {
    (1u64..50, 100u64..1_000_000).prop_flat_map(|(small, large)| {
        prop::sample::select(vec![
            format!("LIMIT {small} + {large}"),
            format!("LIMIT {small} * {large}"),
            format!("LIMIT ({large})"),
            format!("LIMIT {small} OFFSET 1 + {large}"),
            format!("LIMIT abs(-{large})"),
            format!("LIMIT {small}, {large}"),
        ])
    })
}

/// Ways of naming another table as a second source.
fn smuggled_source() -> impl Strategy<Value = String> {
    foreign_table().prop_flat_map(|table| {
        prop::sample::select(vec![
            format!(" JOIN [{table}] ON 1=1"),
            format!(" JOIN ({table}) ON 1=1"),
            format!(", [{table}]"),
            format!(", ({table})"),
            format!(", \"{table}\""),
            format!(" WHERE id IN {table}"),
            format!(" WHERE id NOT IN [{table}]"),
        ])
    })
}

fn render(columns: &[&str], table: &str, limit: Option<u64>) -> String {
    let limit = limit.map(|n| format!(" LIMIT {n}")).unwrap_or_default();
    format!("SELECT {} FROM {table}{limit}", columns.join(", "))
}

// =============================================================================
// Accepted queries
// =============================================================================

proptest! {
    /// Allowlisted projections over the permitted table are always accepted
    #[test]
    fn allowlisted_queries_accepted(
        columns in prop::collection::vec(allowed_column(), 1..5),
        limit in limit_clause()
    ) {
        let sql = render(&columns, "users", limit);
        let query = validator().validate(&sql);
        prop_assert!(query.is_ok(), "should accept {}: {:?}", sql, query);

        let query = query.unwrap();
        assert_bounded(&query)?;
        prop_assert_eq!(query.limit(), limit.map_or(MAX_ROW_LIMIT, |n| n.min(MAX_ROW_LIMIT)));
        let expected_prefix = format!("SELECT {} FROM users", columns.join(", "));
        prop_assert!(query.as_str().starts_with(&expected_prefix));
    }

    /// Re-validating a validated query changes nothing
    #[test]
    fn validation_is_idempotent(
        columns in prop::collection::vec(allowed_column(), 1..5),
        limit in limit_clause(),
        star in any::<bool>()
    ) {
        let sql = if star {
            render(&["*"], "users", limit)
        } else {
            render(&columns, "users", limit)
        };
        let once = validator().validate(&sql).unwrap();
        let twice = validator().validate(once.as_str()).unwrap();
        prop_assert_eq!(once, twice);
    }
}

// =============================================================================
// Row bound
// =============================================================================

proptest! {
    /// A computed LIMIT is replaced by the maximum, never trusted
    #[test]
    fn computed_limit_replaced(
        columns in prop::collection::vec(allowed_column(), 1..4),
        tail in computed_limit(),
        upper in any::<bool>()
    ) {
        let sql = format!("SELECT {} FROM users {tail}", columns.join(", "));
        let query = validator().validate(&reshape(&sql, upper)).unwrap();
        assert_bounded(&query)?;
        prop_assert_eq!(query.limit(), MAX_ROW_LIMIT);
    }

    /// LIMIT text inside a literal does not count as a clause
    #[test]
    fn quoted_limit_ignored(
        bound in 0u64..1_000_000,
        quote in prop::sample::select(vec!['\'', '"'])
    ) {
        let sql = format!("SELECT id FROM users WHERE name <> {quote}LIMIT {bound} {quote}");
        let query = validator().validate(&sql).unwrap();
        assert_bounded(&query)?;
        prop_assert_eq!(query.as_str(), format!("{sql} LIMIT {MAX_ROW_LIMIT}"));
    }
}

// =============================================================================
// Rejected queries
// =============================================================================

proptest! {
    /// One forbidden column anywhere in the projection is named in the error
    #[test]
    fn forbidden_column_rejected(
        columns in prop::collection::vec(allowed_column(), 0..4),
        bad in forbidden_column(),
        at in any::<prop::sample::Index>()
    ) {
        let mut columns = columns;
        let idx = at.index(columns.len() + 1);
        columns.insert(idx, bad);
        let sql = render(&columns, "users", None);

        let reason = validator().validate(&sql).unwrap_err().reason;
        match reason {
            ValidationError::ColumnNotAllowed { column, .. } => prop_assert_eq!(column, bad),
            other => prop_assert!(false, "expected ColumnNotAllowed for {}, got {:?}", sql, other),
        }
    }

    /// Any other table is rejected and reported lowercased
    #[test]
    fn foreign_table_rejected(
        columns in prop::collection::vec(allowed_column(), 1..4),
        table in foreign_table()
    ) {
        let sql = render(&columns, table, None);
        prop_assert_eq!(
            validator().validate(&sql).unwrap_err().reason,
            ValidationError::TableNotAllowed { table: table.to_ascii_lowercase() }
        );
    }

    /// A second source is rejected however it is quoted or bracketed
    #[test]
    fn smuggled_source_rejected(
        columns in prop::collection::vec(allowed_column(), 1..4),
        source in smuggled_source(),
        upper in any::<bool>()
    ) {
        let sql = format!("SELECT {} FROM users{source}", columns.join(", "));
        let reason = validator().validate(&reshape(&sql, upper)).unwrap_err().reason;
        prop_assert!(
            matches!(reason, ValidationError::TableNotAllowed { .. }),
            "expected TableNotAllowed for {}, got {:?}", sql, reason
        );
    }

    /// Casing and whitespace never turn a rejection into an acceptance
    #[test]
    fn rejection_survives_reshaping(
        columns in prop::collection::vec(allowed_column(), 1..4),
        bad in forbidden_column(),
        table in foreign_table(),
        use_bad_table in any::<bool>(),
        upper in any::<bool>()
    ) {
        let sql = if use_bad_table {
            render(&columns, table, None)
        } else {
            let mut with_bad = columns.clone();
            with_bad.push(bad);
            render(&with_bad, "users", None)
        };

        let original = validator().validate(&sql).unwrap_err().reason;
        let reshaped = validator().validate(&reshape(&sql, upper)).unwrap_err().reason;
        prop_assert_eq!(original.kind(), reshaped.kind());
    }

    /// A separator anywhere rejects the candidate as multiple statements
    #[test]
    fn separator_anywhere_rejected(
        columns in prop::collection::vec(allowed_column(), 1..4),
        tail in "[a-zA-Z ]{0,20}",
        at in any::<prop::sample::Index>()
    ) {
        let mut sql = render(&columns, "users", None);
        let idx = at.index(sql.len() + 1);
        sql.insert(idx, ';');
        sql.push_str(&tail);

        prop_assert_eq!(
            validator().validate(&sql).unwrap_err().reason,
            ValidationError::MultipleStatements
        );
    }

    /// Statements that do not start with SELECT are refused
    #[test]
    fn non_select_verbs_rejected(
        verb in prop_oneof![
            Just("INSERT INTO users VALUES (1)"),
            Just("UPDATE users SET name = 'x'"),
            Just("DELETE FROM users"),
            Just("DROP TABLE users"),
            Just("ALTER TABLE users RENAME TO x"),
            Just("PRAGMA table_info(users)"),
            Just("ATTACH DATABASE 'x' AS y"),
        ],
        upper in any::<bool>()
    ) {
        prop_assert_eq!(
            validator().validate(&reshape(verb, upper)).unwrap_err().reason,
            ValidationError::NotASelect
        );
    }
}

// =============================================================================
// Fuzzing-style Random Input Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Random ASCII never panics, and anything accepted is bounded
    #[test]
    fn random_ascii_bounded(s in "[[:print:]]{0,100}") {
        if let Ok(query) = validator().validate(&s) {
            assert_bounded(&query)?;
        }
    }

    /// Random projections over the permitted table never escape the bounds
    #[test]
    fn random_projection_bounded(middle in "[[:print:]]{1,60}", tail in "[[:print:]]{0,40}") {
        let sql = format!("SELECT {middle} FROM users {tail}");
        if let Ok(query) = validator().validate(&sql) {
            assert_bounded(&query)?;
        }
    }

    /// Random bytes should never panic
    #[test]
    fn random_bytes_no_panic(bytes in prop::collection::vec(any::<u8>(), 0..100)) {
        if let Ok(s) = std::str::from_utf8(&bytes) {
            let _result = validator().validate(s);
        }
    }
}
