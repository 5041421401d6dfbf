//! Token interpolation.
//!
//! A template is scanned for `%%` (literal percent), `%<type>` and
//! `%<n>$<type>`. Each non-literal token takes the next argument (1-based)
//! unless `<n>` names one explicitly; explicit indices do not advance the
//! counter.
//!
//! | code | output |
//! |---|---|
//! | `a` | argument as a bare number |
//! | `e` / `E` | escaped / escaped including `%` and `_` |
//! | `n` | quoted identifier |
//! | `q` / `Q` | quoted literal, escaped / unescaped |
//! | `r` | argument verbatim |
//! | `y m d h i s` | date part of the quoted literal |
//! | `Y M D H I S` | date part of the quoted identifier |
//! | `t` | current timestamp (no argument) |
//! | `z` / `Z` | null date, raw / quoted (no argument) |
//!
//! Anything else after `%` is copied through untouched.
//!
//! # Example
//! ```ignore
//! use querykit::{Query, StandardDriver, sql_format};
//!
//! let q = Query::with_driver(StandardDriver::mysql().into_shared());
//! let cond = q.format("%n = %q AND %2$n > %3$a", &["title", "created", "5"])?;
//! let same = sql_format!(q, "%n = %q AND %2$n > %3$a", "title", "created", 5)?;
//! # Ok::<(), querykit::QueryError>(())
//! ```

use crate::driver::DatePart;
use crate::error::{QueryError, QueryResult};
use crate::query::Query;
use regex::Regex;
use std::sync::OnceLock;

/// How tokens that cannot be resolved are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatMode {
    /// A missing or zero index reads as an empty argument.
    #[default]
    Lenient,
    /// A missing or zero index is an [`QueryError::InvalidToken`].
    Strict,
}

fn token_regex() -> &'static Regex {
    static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    TOKEN_RE.get_or_init(|| {
        Regex::new(r"%(?:(?:(\d+)\$)?([aeEnqQryYmMdDhHiIsStzZ])|%)")
            .expect("invalid built-in format token regex")
    })
}

fn leading_number_regex() -> &'static Regex {
    static NUMBER_RE: OnceLock<Regex> = OnceLock::new();
    NUMBER_RE.get_or_init(|| {
        Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?")
            .expect("invalid built-in number regex")
    })
}

/// Coerce `text` to a bare number: integer, then float, then its leading
/// numeric prefix, else `0`.
pub fn coerce_number(text: &str) -> String {
    let text = text.trim();
    if let Ok(n) = text.parse::<i64>() {
        return n.to_string();
    }
    if let Ok(f) = text.parse::<f64>()
        && f.is_finite()
    {
        return f.to_string();
    }
    match leading_number_regex().find(text) {
        Some(m) => match m.as_str().parse::<i64>() {
            Ok(n) => n.to_string(),
            Err(_) => m.as_str().parse::<f64>().map_or_else(|_| "0".to_string(), |f| f.to_string()),
        },
        None => "0".to_string(),
    }
}

/// Interpolate `args` into `template`.
///
/// Tokens needing a driver (`e n q y..S t z`) fail with
/// [`QueryError::NoDriver`] when `query` has none bound.
pub fn format<S: AsRef<str>>(
    query: &Query,
    template: &str,
    args: &[S],
    mode: FormatMode,
) -> QueryResult<String> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;
    let mut next = 1usize;

    for caps in token_regex().captures_iter(template) {
        let Some(token) = caps.get(0) else { continue };
        out.push_str(&template[last..token.start()]);
        last = token.end();

        let Some(code) = caps.get(2).and_then(|m| m.as_str().chars().next()) else {
            out.push('%');
            continue;
        };

        match code {
            't' => {
                out.push_str(&query.current_timestamp()?);
                continue;
            }
            'z' => {
                out.push_str(&query.null_date(false)?);
                continue;
            }
            'Z' => {
                out.push_str(&query.null_date(true)?);
                continue;
            }
            _ => {}
        }

        let index = match caps.get(1) {
            Some(m) => m.as_str().parse::<usize>().unwrap_or(0),
            None => {
                let i = next;
                next += 1;
                i
            }
        };

        let arg = match index.checked_sub(1).and_then(|i| args.get(i)) {
            Some(arg) => arg.as_ref(),
            None => {
                if mode == FormatMode::Strict {
                    return Err(QueryError::invalid_token(
                        token.as_str(),
                        format!("argument {index} not among {} supplied", args.len()),
                    ));
                }
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    target: "querykit.sql",
                    token = token.as_str(),
                    index,
                    supplied = args.len(),
                    "format token has no argument, substituting empty"
                );
                ""
            }
        };

        out.push_str(&substitute(query, code, arg)?);
    }

    out.push_str(&template[last..]);
    Ok(out)
}

fn substitute(query: &Query, code: char, arg: &str) -> QueryResult<String> {
    match code {
        'a' => Ok(coerce_number(arg)),
        'e' => query.escape(arg, false),
        'E' => query.escape(arg, true),
        'n' => query.quote_name(arg),
        'q' => query.quote(arg),
        'Q' => query.quote_unescaped(arg),
        'r' => Ok(arg.to_string()),
        _ => match DatePart::from_code(code) {
            Some(part) => {
                let expr = if code.is_ascii_lowercase() {
                    query.quote(arg)?
                } else {
                    query.quote_name(arg)?
                };
                query.date_part(part, &expr)
            }
            None => Ok(String::new()),
        },
    }
}

impl Query {
    /// Interpolate `args` into `template`; unresolvable indices become empty.
    pub fn format<S: AsRef<str>>(&self, template: &str, args: &[S]) -> QueryResult<String> {
        format(self, template, args, FormatMode::Lenient)
    }

    /// Like [`format`](Query::format), but unresolvable indices are errors.
    pub fn format_strict<S: AsRef<str>>(&self, template: &str, args: &[S]) -> QueryResult<String> {
        format(self, template, args, FormatMode::Strict)
    }
}

/// Call [`Query::format`] with arguments converted through `ToString`.
///
/// ```ignore
/// let cond = sql_format!(q, "%n > %a", "hits", 100)?;
/// ```
#[macro_export]
macro_rules! sql_format {
    ($query:expr, $template:expr $(, $arg:expr)* $(,)?) => {
        $query.format(
            $template,
            &[$(::std::string::ToString::to_string(&$arg)),*] as &[::std::string::String],
        )
    };
}
