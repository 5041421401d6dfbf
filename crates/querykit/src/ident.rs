//! Dotted-name quoting.
//!
//! [`QualifiedName`] splits `schema.table.column` into segments so a driver can
//! quote each one independently with its [`NameQuote`] characters.
//!
//! # Example
//! ```ignore
//! use querykit::ident::{NameQuote, QualifiedName};
//!
//! let q = NameQuote::parse("`")?;
//! assert_eq!(QualifiedName::parse("db.users").to_sql(q), "`db`.`users`");
//! # Ok::<(), querykit::QueryError>(())
//! ```

use crate::error::{QueryError, QueryResult};

/// Opening/closing identifier quote characters of a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameQuote {
    pub open: char,
    pub close: char,
}

impl NameQuote {
    /// Same character on both sides (`"` or `` ` ``).
    pub const fn symmetric(q: char) -> Self {
        Self { open: q, close: q }
    }

    /// Parse a one- or two-character quote specification (`"`, `` ` ``, `[]`).
    pub fn parse(spec: &str) -> QueryResult<Self> {
        let mut chars = spec.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(q), None, None) => Ok(Self::symmetric(q)),
            (Some(open), Some(close), None) => Ok(Self { open, close }),
            _ => Err(QueryError::config(format!(
                "name quote must be one or two characters, got {spec:?}"
            ))),
        }
    }
}

/// A possibly dot-qualified SQL name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName<'a> {
    pub parts: Vec<&'a str>,
}

impl<'a> QualifiedName<'a> {
    /// Split on `.`. Empty segments are kept and quoted as empty names.
    pub fn parse(name: &'a str) -> Self {
        Self {
            parts: name.split('.').collect(),
        }
    }

    /// Render every segment quoted.
    pub fn to_sql(&self, quote: NameQuote) -> String {
        let mut cap = self.parts.len().saturating_sub(1); // dots
        for part in &self.parts {
            cap += part.len() + 2;
        }
        let mut out = String::with_capacity(cap);
        self.write_sql(quote, &mut out);
        out
    }

    pub(crate) fn write_sql(&self, quote: NameQuote, out: &mut String) {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            write_segment(part, quote, out);
        }
    }
}

/// Quote a single segment, doubling any embedded closing quote.
pub(crate) fn write_segment(segment: &str, quote: NameQuote, out: &mut String) {
    out.push(quote.open);
    for ch in segment.chars() {
        if ch == quote.close {
            out.push(quote.close);
        }
        out.push(ch);
    }
    out.push(quote.close);
}

#[cfg(test)]
mod tests {
    use super::*;

    const BACKTICK: NameQuote = NameQuote::symmetric('`');

    #[test]
    fn quote_simple() {
        assert_eq!(QualifiedName::parse("users").to_sql(BACKTICK), "`users`");
    }

    #[test]
    fn quote_dotted() {
        assert_eq!(
            QualifiedName::parse("db.users.id").to_sql(BACKTICK),
            "`db`.`users`.`id`"
        );
    }

    #[test]
    fn quote_brackets() {
        let q = NameQuote::parse("[]").unwrap();
        assert_eq!(QualifiedName::parse("dbo.users").to_sql(q), "[dbo].[users]");
    }

    #[test]
    fn doubles_embedded_closing_quote() {
        let q = NameQuote::symmetric('"');
        assert_eq!(QualifiedName::parse(r#"we"ird"#).to_sql(q), r#""we""ird""#);

        let q = NameQuote::parse("[]").unwrap();
        assert_eq!(QualifiedName::parse("a]b").to_sql(q), "[a]]b]");
    }

    #[test]
    fn parse_rejects_bad_spec() {
        assert!(NameQuote::parse("").is_err());
        assert!(NameQuote::parse("abc").is_err());
    }
}
