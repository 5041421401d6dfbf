//! The driver collaborator.
//!
//! A [`Query`](crate::Query) never quotes or escapes on its own: every
//! dialect-specific decision goes through a [`Driver`]. Builders hold the driver
//! behind an `Arc`, so copies of a builder share one driver.
//!
//! [`StandardDriver`] is a configurable implementation covering the common
//! dialects; bring your own by implementing the trait.

mod standard;

pub use standard::StandardDriver;

use crate::ident::{NameQuote, QualifiedName, write_segment};
use std::fmt;

/// A date/time component extracted by the `%y`..`%S` format tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatePart {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl DatePart {
    /// SQL keyword for this part.
    pub fn keyword(self) -> &'static str {
        match self {
            DatePart::Year => "YEAR",
            DatePart::Month => "MONTH",
            DatePart::Day => "DAY",
            DatePart::Hour => "HOUR",
            DatePart::Minute => "MINUTE",
            DatePart::Second => "SECOND",
        }
    }

    /// `strftime` directive for this part.
    pub fn strftime(self) -> &'static str {
        match self {
            DatePart::Year => "%Y",
            DatePart::Month => "%m",
            DatePart::Day => "%d",
            DatePart::Hour => "%H",
            DatePart::Minute => "%M",
            DatePart::Second => "%S",
        }
    }

    /// Map a format type code (case-insensitive) to a part.
    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_lowercase() {
            'y' => Some(DatePart::Year),
            'm' => Some(DatePart::Month),
            'd' => Some(DatePart::Day),
            'h' => Some(DatePart::Hour),
            'i' => Some(DatePart::Minute),
            's' => Some(DatePart::Second),
            _ => None,
        }
    }
}

/// Dialect-specific quoting, escaping and pagination.
pub trait Driver: fmt::Debug + Send + Sync {
    /// Escape `text` for inclusion inside a string literal.
    ///
    /// `extra` additionally escapes LIKE wildcards (`%` and `_`).
    fn escape(&self, text: &str, extra: bool) -> String;

    /// Wrap `text` in single quotes, escaping it first when `escape` is set.
    fn quote(&self, text: &str, escape: bool) -> String {
        if escape {
            format!("'{}'", self.escape(text, false))
        } else {
            format!("'{text}'")
        }
    }

    /// Identifier quote characters.
    fn name_quote(&self) -> NameQuote;

    /// Quote a (possibly dot-qualified) name, appending `AS <alias>` when given.
    fn quote_name(&self, name: &str, alias: Option<&str>) -> String {
        let quote = self.name_quote();
        let mut out = QualifiedName::parse(name).to_sql(quote);
        if let Some(alias) = alias {
            out.push_str(" AS ");
            write_segment(alias, quote, &mut out);
        }
        out
    }

    /// Null/zero timestamp literal, quoted when `quoted` is set.
    fn null_date(&self, quoted: bool) -> String;

    /// chrono `strftime` pattern for date literals.
    fn date_format(&self) -> &str;

    /// Real table prefix.
    fn prefix(&self) -> &str;

    /// Placeholder standing in for [`prefix`](Driver::prefix) in SQL text.
    fn prefix_placeholder(&self) -> &str {
        "#__"
    }

    /// Current-timestamp expression.
    fn current_timestamp(&self) -> String {
        "CURRENT_TIMESTAMP()".to_string()
    }

    /// Extract `part` from the SQL expression `expr`.
    fn date_part(&self, part: DatePart, expr: &str) -> String {
        format!("{}({expr})", part.keyword())
    }

    /// Concatenate SQL expressions, placing the quoted `separator` between them.
    fn concatenate(&self, values: &[&str], separator: Option<&str>) -> String {
        let glue = match separator {
            Some(sep) => format!(" || {} || ", self.quote(sep, true)),
            None => " || ".to_string(),
        };
        format!("({})", values.join(&glue))
    }

    /// Add `interval` (signed) units of `part` to the date literal `date`.
    fn date_add(&self, date: &str, interval: &str, part: DatePart) -> String {
        format!(
            "DATE_ADD({}, INTERVAL {interval} {})",
            self.quote(date, true),
            part.keyword()
        )
    }

    /// Apply LIMIT/OFFSET to an assembled statement.
    ///
    /// Called only when `limit` or `offset` is non-zero. The default returns
    /// `sql` unchanged, meaning the dialect has no pagination capability.
    fn apply_limit_offset(&self, sql: String, limit: u64, offset: u64) -> String {
        let _ = (limit, offset);
        sql
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Minimal;

    impl Driver for Minimal {
        fn escape(&self, text: &str, _extra: bool) -> String {
            text.replace('\'', "''")
        }

        fn name_quote(&self) -> NameQuote {
            NameQuote::symmetric('"')
        }

        fn null_date(&self, quoted: bool) -> String {
            if quoted { "'0'".into() } else { "0".into() }
        }

        fn date_format(&self) -> &str {
            "%Y"
        }

        fn prefix(&self) -> &str {
            ""
        }
    }

    #[test]
    fn default_quote_escapes() {
        assert_eq!(Minimal.quote("it's", true), "'it''s'");
        assert_eq!(Minimal.quote("it's", false), "'it's'");
    }

    #[test]
    fn default_quote_name_with_alias() {
        assert_eq!(Minimal.quote_name("a.b", None), r#""a"."b""#);
        assert_eq!(Minimal.quote_name("a.b", Some("x")), r#""a"."b" AS "x""#);
    }

    #[test]
    fn default_date_part_and_limit() {
        assert_eq!(Minimal.date_part(DatePart::Minute, "'x'"), "MINUTE('x')");
        assert_eq!(Minimal.apply_limit_offset("SELECT 1".into(), 5, 5), "SELECT 1");
    }

    #[test]
    fn default_concatenate_and_date_add() {
        assert_eq!(Minimal.concatenate(&["a", "b"], None), "(a || b)");
        assert_eq!(Minimal.concatenate(&["a", "b"], Some("-")), "(a || '-' || b)");
        assert_eq!(
            Minimal.date_add("2024-01-01", "3", DatePart::Month),
            "DATE_ADD('2024-01-01', INTERVAL 3 MONTH)"
        );
    }

    #[test]
    fn date_part_codes() {
        assert_eq!(DatePart::from_code('Y'), Some(DatePart::Year));
        assert_eq!(DatePart::from_code('i'), Some(DatePart::Minute));
        assert_eq!(DatePart::from_code('I'), Some(DatePart::Minute));
        assert_eq!(DatePart::from_code('q'), None);
    }
}
