//! Quoted regions of a candidate.
//!
//! String literals (`'...'`) and quoted identifiers (`"..."`, `` `...` ``,
//! `[...]`) are opaque to the keyword rules: a `LIMIT` or `FROM` inside
//! them is text, not a clause. A doubled quote (`'it''s'`) closes and
//! reopens the region, which leaves it covered. An unterminated quote runs
//! to the end of the input.

use std::ops::Range;

/// Byte ranges of every quoted region, in order.
#[derive(Debug, Default)]
pub(super) struct QuotedSpans(Vec<Range<usize>>);

impl QuotedSpans {
    pub(super) fn of(sql: &str) -> Self {
        let mut spans = Vec::new();
        let mut open: Option<(usize, char)> = None;

        for (i, c) in sql.char_indices() {
            match open {
                Some((start, close)) if c == close => {
                    spans.push(start..i + c.len_utf8());
                    open = None;
                },
                Some(_) => {},
                None => {
                    open = match c {
                        '\'' | '"' | '`' => Some((i, c)),
                        '[' => Some((i, ']')),
                        _ => None,
                    };
                },
            }
        }

        if let Some((start, _)) = open {
            spans.push(start..sql.len());
        }
        Self(spans)
    }

    /// Whether byte offset `pos` lies inside a quoted region.
    pub(super) fn contains(&self, pos: usize) -> bool {
        self.0.iter().any(|span| span.contains(&pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(sql: &str) -> Vec<Range<usize>> {
        QuotedSpans::of(sql).0
    }

    #[test]
    fn test_no_quotes() {
        assert!(spans("SELECT id FROM users").is_empty());
    }

    #[test]
    fn test_each_quote_style() {
        let sql = r#"a 'b' "c" `d` [e]"#;
        assert_eq!(spans(sql), vec![2..5, 6..9, 10..13, 14..17]);
    }

    #[test]
    fn test_doubled_quote_stays_covered() {
        let sql = "x = 'it''s' y";
        let quoted = QuotedSpans::of(sql);
        for pos in 4..11 {
            assert!(quoted.contains(pos), "pos {pos}");
        }
        assert!(!quoted.contains(12));
    }

    #[test]
    fn test_other_quotes_inside_a_literal() {
        assert_eq!(spans(r#"'a "b" [c'"#), vec![0..10]);
    }

    #[test]
    fn test_unterminated_runs_to_end() {
        assert_eq!(spans("WHERE name = 'LIMIT 5"), vec![13..21]);
    }
}
