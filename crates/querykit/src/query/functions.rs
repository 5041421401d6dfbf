//! Driver-backed quoting helpers and SQL function snippets.
//!
//! Anything whose spelling differs between dialects goes through the bound
//! driver and fails with [`QueryError::NoDriver`] without one. `cast_as_char`,
//! `char_length` and `length` render the same everywhere and need no driver.

use super::Query;
use crate::driver::{DatePart, Driver};
use crate::error::{QueryError, QueryResult};
use chrono::NaiveDateTime;

impl Query {
    fn require_driver(&self, operation: &'static str) -> QueryResult<&dyn Driver> {
        self.driver
            .as_deref()
            .ok_or(QueryError::no_driver(operation))
    }

    // ==================== Quoting ====================

    /// Escape `text` for use inside a string literal.
    pub fn escape(&self, text: &str, extra: bool) -> QueryResult<String> {
        Ok(self.require_driver("escape")?.escape(text, extra))
    }

    /// Quote and escape a string literal.
    pub fn quote(&self, text: &str) -> QueryResult<String> {
        Ok(self.require_driver("quote")?.quote(text, true))
    }

    /// Quote a string literal without escaping it.
    pub fn quote_unescaped(&self, text: &str) -> QueryResult<String> {
        Ok(self.require_driver("quote")?.quote(text, false))
    }

    /// Quote and escape every element.
    pub fn quote_all<S: AsRef<str>>(&self, texts: &[S]) -> QueryResult<Vec<String>> {
        let driver = self.require_driver("quote")?;
        Ok(texts.iter().map(|t| driver.quote(t.as_ref(), true)).collect())
    }

    /// Quote a (possibly dot-qualified) identifier.
    pub fn quote_name(&self, name: &str) -> QueryResult<String> {
        Ok(self.require_driver("quote_name")?.quote_name(name, None))
    }

    /// Quote an identifier and append `AS <quoted alias>`.
    pub fn quote_name_as(&self, name: &str, alias: &str) -> QueryResult<String> {
        Ok(self.require_driver("quote_name")?.quote_name(name, Some(alias)))
    }

    /// Quote every identifier.
    pub fn quote_names<S: AsRef<str>>(&self, names: &[S]) -> QueryResult<Vec<String>> {
        let driver = self.require_driver("quote_name")?;
        Ok(names.iter().map(|n| driver.quote_name(n.as_ref(), None)).collect())
    }

    // ==================== Dates ====================

    /// The driver's null/zero timestamp, quoted when `quoted` is set.
    pub fn null_date(&self, quoted: bool) -> QueryResult<String> {
        Ok(self.require_driver("null_date")?.null_date(quoted))
    }

    /// The driver's `strftime` pattern for date literals.
    pub fn date_format(&self) -> QueryResult<String> {
        Ok(self.require_driver("date_format")?.date_format().to_string())
    }

    /// Format `value` with the driver's date format and quote it.
    pub fn date_to_sql(&self, value: &NaiveDateTime) -> QueryResult<String> {
        use std::fmt::Write;

        let driver = self.require_driver("date_to_sql")?;
        let mut text = String::new();
        write!(&mut text, "{}", value.format(driver.date_format())).map_err(|_| {
            QueryError::config(format!("invalid date format {:?}", driver.date_format()))
        })?;
        Ok(driver.quote(&text, true))
    }

    /// The driver's current-timestamp expression.
    pub fn current_timestamp(&self) -> QueryResult<String> {
        Ok(self.require_driver("current_timestamp")?.current_timestamp())
    }

    /// Extract `part` from the SQL expression `expr`.
    pub fn date_part(&self, part: DatePart, expr: &str) -> QueryResult<String> {
        Ok(self.require_driver("date_part")?.date_part(part, expr))
    }

    pub fn year(&self, expr: &str) -> QueryResult<String> {
        self.date_part(DatePart::Year, expr)
    }

    pub fn month(&self, expr: &str) -> QueryResult<String> {
        self.date_part(DatePart::Month, expr)
    }

    pub fn day(&self, expr: &str) -> QueryResult<String> {
        self.date_part(DatePart::Day, expr)
    }

    pub fn hour(&self, expr: &str) -> QueryResult<String> {
        self.date_part(DatePart::Hour, expr)
    }

    pub fn minute(&self, expr: &str) -> QueryResult<String> {
        self.date_part(DatePart::Minute, expr)
    }

    pub fn second(&self, expr: &str) -> QueryResult<String> {
        self.date_part(DatePart::Second, expr)
    }

    /// Add `interval` units of `part` to the date literal `date`.
    pub fn date_add(&self, date: &str, interval: &str, part: DatePart) -> QueryResult<String> {
        Ok(self.require_driver("date_add")?.date_add(date, interval, part))
    }

    // ==================== Strings ====================

    /// `CAST(<value> AS CHAR)`
    pub fn cast_as_char(&self, value: &str) -> String {
        format!("CAST({value} AS CHAR)")
    }

    /// `CHAR_LENGTH(<field>)`, followed by `<op> <condition>` when both are given.
    pub fn char_length(&self, field: &str, op: Option<&str>, condition: Option<&str>) -> String {
        match (op, condition) {
            (Some(op), Some(condition)) => format!("CHAR_LENGTH({field}) {op} {condition}"),
            _ => format!("CHAR_LENGTH({field})"),
        }
    }

    /// `LENGTH(<value>)`
    pub fn length(&self, value: &str) -> String {
        format!("LENGTH({value})")
    }

    /// Concatenate SQL expressions in the driver's dialect.
    ///
    /// A separator is quoted through the driver and placed between values.
    pub fn concatenate<S: AsRef<str>>(
        &self,
        values: &[S],
        separator: Option<&str>,
    ) -> QueryResult<String> {
        let driver = self.require_driver("concatenate")?;
        let parts: Vec<&str> = values.iter().map(AsRef::as_ref).collect();
        Ok(driver.concatenate(&parts, separator))
    }
}
