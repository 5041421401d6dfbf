use super::{DatePart, Driver};
use crate::config::{
    ConcatStyle, DatePartStyle, DriverConfig, EscapeStyle, IntervalStyle, LimitStyle,
};
use crate::error::QueryResult;
use crate::ident::NameQuote;
use std::sync::Arc;

/// A [`Driver`] driven entirely by a [`DriverConfig`].
///
/// # Example
/// ```ignore
/// use querykit::{DriverConfig, Query, StandardDriver};
///
/// let driver = StandardDriver::new(DriverConfig::mysql().with_prefix("app_"))?;
/// let mut q = Query::with_driver(driver.into_shared());
/// let users = q.quote_name("#__users")?;
/// q.select("*").from(users)?;
/// # Ok::<(), querykit::QueryError>(())
/// ```
#[derive(Debug, Clone)]
pub struct StandardDriver {
    config: DriverConfig,
    quote: NameQuote,
}

impl StandardDriver {
    /// Build a driver from a validated configuration.
    pub fn new(config: DriverConfig) -> QueryResult<Self> {
        config.validate()?;
        let quote = config.name_quote()?;
        Ok(Self { config, quote })
    }

    /// MySQL / MariaDB dialect.
    pub fn mysql() -> Self {
        Self {
            config: DriverConfig::mysql(),
            quote: NameQuote::symmetric('`'),
        }
    }

    /// PostgreSQL dialect.
    pub fn postgres() -> Self {
        Self {
            config: DriverConfig::postgres(),
            quote: NameQuote::symmetric('"'),
        }
    }

    /// SQLite dialect.
    pub fn sqlite() -> Self {
        Self {
            config: DriverConfig::sqlite(),
            quote: NameQuote::symmetric('"'),
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Wrap in an `Arc` for binding to builders.
    pub fn into_shared(self) -> Arc<dyn Driver> {
        Arc::new(self)
    }
}

/// Largest row count MySQL accepts; stands in for "no limit" when only an
/// offset is set.
const MYSQL_NO_LIMIT: u64 = u64::MAX;

fn escape_backslash(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '\0' => out.push_str("\\0"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x1a' => out.push_str("\\Z"),
            '\\' | '\'' | '"' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
}

impl Driver for StandardDriver {
    fn escape(&self, text: &str, extra: bool) -> String {
        let mut out = String::with_capacity(text.len() + 2);
        match self.config.escape {
            EscapeStyle::Doubling => {
                for ch in text.chars() {
                    if ch == '\'' {
                        out.push('\'');
                    }
                    out.push(ch);
                }
            }
            EscapeStyle::Backslash => escape_backslash(text, &mut out),
        }

        if extra {
            let mut wild = String::with_capacity(out.len());
            for ch in out.chars() {
                if ch == '%' || ch == '_' {
                    wild.push('\\');
                }
                wild.push(ch);
            }
            out = wild;
        }
        out
    }

    fn name_quote(&self) -> NameQuote {
        self.quote
    }

    fn null_date(&self, quoted: bool) -> String {
        if quoted {
            self.quote(&self.config.null_date, true)
        } else {
            self.config.null_date.clone()
        }
    }

    fn date_format(&self) -> &str {
        &self.config.date_format
    }

    fn prefix(&self) -> &str {
        &self.config.prefix
    }

    fn prefix_placeholder(&self) -> &str {
        &self.config.prefix_placeholder
    }

    fn current_timestamp(&self) -> String {
        self.config.current_timestamp.clone()
    }

    fn date_part(&self, part: DatePart, expr: &str) -> String {
        match self.config.date_part {
            DatePartStyle::Function => format!("{}({expr})", part.keyword()),
            DatePartStyle::Extract => format!("EXTRACT({} FROM {expr})", part.keyword()),
            DatePartStyle::Strftime => {
                format!("CAST(strftime('{}', {expr}) AS INTEGER)", part.strftime())
            }
        }
    }

    fn concatenate(&self, values: &[&str], separator: Option<&str>) -> String {
        match (self.config.concat, separator) {
            (ConcatStyle::Pipes, None) => format!("({})", values.join(" || ")),
            (ConcatStyle::Pipes, Some(sep)) => {
                let glue = format!(" || {} || ", self.quote(sep, true));
                format!("({})", values.join(&glue))
            }
            (ConcatStyle::Function, None) => format!("CONCAT({})", values.join(", ")),
            (ConcatStyle::Function, Some(sep)) => format!(
                "CONCAT_WS({}, {})",
                self.quote(sep, true),
                values.join(", ")
            ),
        }
    }

    fn date_add(&self, date: &str, interval: &str, part: DatePart) -> String {
        let date = self.quote(date, true);
        let interval = interval.trim();
        match self.config.interval {
            IntervalStyle::DateAdd => {
                format!("DATE_ADD({date}, INTERVAL {interval} {})", part.keyword())
            }
            IntervalStyle::Interval => {
                let amount = self.quote(&format!("{interval} {}", part.keyword()), true);
                format!("({date}::timestamp + INTERVAL {amount})")
            }
            IntervalStyle::Modifier => {
                let sign = if interval.starts_with(['-', '+']) { "" } else { "+" };
                let unit = part.keyword().to_ascii_lowercase();
                let modifier = self.quote(&format!("{sign}{interval} {unit}"), true);
                format!("datetime({date}, {modifier})")
            }
        }
    }

    fn apply_limit_offset(&self, mut sql: String, limit: u64, offset: u64) -> String {
        use std::fmt::Write;
        match self.config.limit {
            LimitStyle::LimitOffset => {
                if limit > 0 {
                    let _ = write!(&mut sql, " LIMIT {limit}");
                }
                if offset > 0 {
                    let _ = write!(&mut sql, " OFFSET {offset}");
                }
            }
            LimitStyle::MySql => match (limit, offset) {
                (0, 0) => {}
                (limit, 0) => {
                    let _ = write!(&mut sql, " LIMIT {limit}");
                }
                (0, offset) => {
                    let _ = write!(&mut sql, " LIMIT {offset}, {MYSQL_NO_LIMIT}");
                }
                (limit, offset) => {
                    let _ = write!(&mut sql, " LIMIT {offset}, {limit}");
                }
            },
            LimitStyle::None => {}
        }
        sql
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DriverConfig;

    #[test]
    fn doubling_escape() {
        let d = StandardDriver::postgres();
        assert_eq!(d.escape("O'Brien", false), "O''Brien");
        assert_eq!(d.quote("O'Brien", true), "'O''Brien'");
    }

    #[test]
    fn backslash_escape() {
        let d = StandardDriver::mysql();
        assert_eq!(d.escape("a'b\"c\\d\ne", false), "a\\'b\\\"c\\\\d\\ne");
    }

    #[test]
    fn extra_escape_wildcards() {
        let d = StandardDriver::postgres();
        assert_eq!(d.escape("50%_off", true), "50\\%\\_off");
        assert_eq!(d.escape("50%_off", false), "50%_off");
    }

    #[test]
    fn quote_name_per_dialect() {
        assert_eq!(StandardDriver::mysql().quote_name("db.t", Some("x")), "`db`.`t` AS `x`");
        assert_eq!(StandardDriver::postgres().quote_name("t", None), "\"t\"");

        let mssql = StandardDriver::new(DriverConfig::new().with_name_quote("[]")).unwrap();
        assert_eq!(mssql.quote_name("dbo.t", None), "[dbo].[t]");
    }

    #[test]
    fn null_date_quoting() {
        let d = StandardDriver::mysql();
        assert_eq!(d.null_date(false), "0000-00-00 00:00:00");
        assert_eq!(d.null_date(true), "'0000-00-00 00:00:00'");
    }

    #[test]
    fn date_part_styles() {
        assert_eq!(StandardDriver::mysql().date_part(DatePart::Year, "x"), "YEAR(x)");
        assert_eq!(
            StandardDriver::postgres().date_part(DatePart::Month, "x"),
            "EXTRACT(MONTH FROM x)"
        );
        assert_eq!(
            StandardDriver::sqlite().date_part(DatePart::Day, "x"),
            "CAST(strftime('%d', x) AS INTEGER)"
        );
    }

    #[test]
    fn limit_styles() {
        let pg = StandardDriver::postgres();
        assert_eq!(pg.apply_limit_offset("Q".into(), 10, 0), "Q LIMIT 10");
        assert_eq!(pg.apply_limit_offset("Q".into(), 10, 20), "Q LIMIT 10 OFFSET 20");
        assert_eq!(pg.apply_limit_offset("Q".into(), 0, 20), "Q OFFSET 20");

        let my = StandardDriver::mysql();
        assert_eq!(my.apply_limit_offset("Q".into(), 10, 20), "Q LIMIT 20, 10");
        assert_eq!(my.apply_limit_offset("Q".into(), 10, 0), "Q LIMIT 10");
        assert_eq!(
            my.apply_limit_offset("Q".into(), 0, 20),
            "Q LIMIT 20, 18446744073709551615"
        );

        let none =
            StandardDriver::new(DriverConfig::new().with_limit_style(LimitStyle::None)).unwrap();
        assert_eq!(none.apply_limit_offset("Q".into(), 10, 20), "Q");
    }

    #[test]
    fn concatenate_per_dialect() {
        let my = StandardDriver::mysql();
        assert_eq!(my.concatenate(&["a", "b"], None), "CONCAT(a, b)");
        assert_eq!(my.concatenate(&["a", "b"], Some(" ")), "CONCAT_WS(' ', a, b)");

        for d in [StandardDriver::postgres(), StandardDriver::sqlite()] {
            assert_eq!(d.concatenate(&["a", "b"], None), "(a || b)");
            assert_eq!(d.concatenate(&["a", "b"], Some(" ")), "(a || ' ' || b)");
        }
    }

    #[test]
    fn date_add_per_dialect() {
        assert_eq!(
            StandardDriver::mysql().date_add("2024-01-01", "-1", DatePart::Day),
            "DATE_ADD('2024-01-01', INTERVAL -1 DAY)"
        );
        assert_eq!(
            StandardDriver::postgres().date_add("2024-01-01", "-1", DatePart::Day),
            "('2024-01-01'::timestamp + INTERVAL '-1 DAY')"
        );
        assert_eq!(
            StandardDriver::sqlite().date_add("2024-01-01", "2", DatePart::Hour),
            "datetime('2024-01-01', '+2 hour')"
        );
        assert_eq!(
            StandardDriver::sqlite().date_add("2024-01-01", "-1", DatePart::Day),
            "datetime('2024-01-01', '-1 day')"
        );
    }

    #[test]
    fn new_rejects_invalid_config() {
        assert!(StandardDriver::new(DriverConfig::new().with_name_quote("")).is_err());
    }
}
