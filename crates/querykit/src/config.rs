//! Driver configuration.
//!
//! [`DriverConfig`] carries the dialect settings consumed by
//! [`StandardDriver`](crate::driver::StandardDriver). It can be built from a
//! preset or deserialized from TOML:
//!
//! ```toml
//! name_quote = "`"
//! prefix = "app_"
//! escape = "backslash"
//! limit = "my_sql"
//! concat = "function"
//! ```

use crate::error::{QueryError, QueryResult};
use crate::ident::NameQuote;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How string literals are escaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EscapeStyle {
    /// `'` becomes `''` (ANSI).
    #[default]
    Doubling,
    /// Backslash-escape quotes, backslashes and control characters (MySQL).
    Backslash,
}

/// How LIMIT/OFFSET pagination is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitStyle {
    /// `LIMIT n OFFSET m`, each part only when non-zero.
    #[default]
    LimitOffset,
    /// `LIMIT offset, limit`.
    MySql,
    /// The dialect has no pagination capability; SQL is left untouched.
    None,
}

/// How date-part extraction functions are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DatePartStyle {
    /// `YEAR(expr)`
    #[default]
    Function,
    /// `EXTRACT(YEAR FROM expr)`
    Extract,
    /// `CAST(strftime('%Y', expr) AS INTEGER)`
    Strftime,
}

/// How string concatenation is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcatStyle {
    /// `(a || b)` (ANSI, PostgreSQL, SQLite).
    #[default]
    Pipes,
    /// `CONCAT(a, b)` / `CONCAT_WS(sep, a, b)` (MySQL, where `||` is logical OR).
    Function,
}

/// How date arithmetic is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalStyle {
    /// `DATE_ADD('date', INTERVAL n DAY)`
    #[default]
    DateAdd,
    /// `('date'::timestamp + INTERVAL 'n DAY')`
    Interval,
    /// `datetime('date', '+n day')`
    Modifier,
}

/// Dialect settings for [`StandardDriver`](crate::driver::StandardDriver).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Identifier quote characters: one (`"`) or an open/close pair (`[]`).
    pub name_quote: String,
    /// Zero/null timestamp literal.
    pub null_date: String,
    /// chrono `strftime` pattern used for date literals.
    pub date_format: String,
    /// Real table prefix.
    pub prefix: String,
    /// Placeholder replaced with `prefix` when dumping.
    pub prefix_placeholder: String,
    pub escape: EscapeStyle,
    pub limit: LimitStyle,
    pub date_part: DatePartStyle,
    pub concat: ConcatStyle,
    pub interval: IntervalStyle,
    /// Current-timestamp expression.
    pub current_timestamp: String,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            name_quote: "\"".to_string(),
            null_date: "1970-01-01 00:00:00".to_string(),
            date_format: "%Y-%m-%d %H:%M:%S".to_string(),
            prefix: String::new(),
            prefix_placeholder: "#__".to_string(),
            escape: EscapeStyle::Doubling,
            limit: LimitStyle::LimitOffset,
            date_part: DatePartStyle::Function,
            concat: ConcatStyle::Pipes,
            interval: IntervalStyle::DateAdd,
            current_timestamp: "CURRENT_TIMESTAMP".to_string(),
        }
    }
}

impl DriverConfig {
    /// Create a new configuration with ANSI defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// MySQL / MariaDB preset.
    pub fn mysql() -> Self {
        Self {
            name_quote: "`".to_string(),
            null_date: "0000-00-00 00:00:00".to_string(),
            escape: EscapeStyle::Backslash,
            limit: LimitStyle::MySql,
            concat: ConcatStyle::Function,
            current_timestamp: "CURRENT_TIMESTAMP()".to_string(),
            ..Self::default()
        }
    }

    /// PostgreSQL preset.
    pub fn postgres() -> Self {
        Self {
            date_part: DatePartStyle::Extract,
            interval: IntervalStyle::Interval,
            ..Self::default()
        }
    }

    /// SQLite preset.
    pub fn sqlite() -> Self {
        Self {
            null_date: "0000-00-00 00:00:00".to_string(),
            date_part: DatePartStyle::Strftime,
            interval: IntervalStyle::Modifier,
            ..Self::default()
        }
    }

    /// Set the table prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the identifier quote characters.
    pub fn with_name_quote(mut self, quote: impl Into<String>) -> Self {
        self.name_quote = quote.into();
        self
    }

    /// Set the pagination style.
    pub fn with_limit_style(mut self, style: LimitStyle) -> Self {
        self.limit = style;
        self
    }

    /// Parse and validate a TOML document. Missing keys fall back to defaults.
    pub fn from_toml_str(raw: &str) -> QueryResult<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> QueryResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw).map_err(|e| match e {
            QueryError::Config(msg) => {
                QueryError::config(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    /// Check the settings are usable.
    pub fn validate(&self) -> QueryResult<()> {
        self.name_quote()?;
        if self.prefix_placeholder.is_empty() {
            return Err(QueryError::config("prefix_placeholder must not be empty"));
        }
        if self.date_format.is_empty() {
            return Err(QueryError::config("date_format must not be empty"));
        }
        Ok(())
    }

    /// Parsed identifier quote characters.
    pub fn name_quote(&self) -> QueryResult<NameQuote> {
        NameQuote::parse(&self.name_quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_validate() {
        for config in [
            DriverConfig::new(),
            DriverConfig::mysql(),
            DriverConfig::postgres(),
            DriverConfig::sqlite(),
        ] {
            config.validate().unwrap();
        }
    }

    #[test]
    fn toml_partial_document_uses_defaults() {
        let config = DriverConfig::from_toml_str(
            r#"
            name_quote = "[]"
            prefix = "jos_"
            escape = "backslash"
            limit = "my_sql"
            "#,
        )
        .unwrap();

        assert_eq!(config.name_quote().unwrap(), NameQuote { open: '[', close: ']' });
        assert_eq!(config.prefix, "jos_");
        assert_eq!(config.escape, EscapeStyle::Backslash);
        assert_eq!(config.limit, LimitStyle::MySql);
        assert_eq!(config.prefix_placeholder, "#__");
        assert_eq!(config.date_part, DatePartStyle::Function);
        assert_eq!(config.concat, ConcatStyle::Pipes);
        assert_eq!(config.interval, IntervalStyle::DateAdd);
    }

    #[test]
    fn presets_pick_dialect_functions() {
        assert_eq!(DriverConfig::mysql().concat, ConcatStyle::Function);
        assert_eq!(DriverConfig::postgres().concat, ConcatStyle::Pipes);
        assert_eq!(DriverConfig::postgres().interval, IntervalStyle::Interval);
        assert_eq!(DriverConfig::sqlite().interval, IntervalStyle::Modifier);

        let config = DriverConfig::from_toml_str(
            r#"
            concat = "function"
            interval = "modifier"
            "#,
        )
        .unwrap();
        assert_eq!(config.concat, ConcatStyle::Function);
        assert_eq!(config.interval, IntervalStyle::Modifier);
    }

    #[test]
    fn toml_rejects_bad_quote() {
        let err = DriverConfig::from_toml_str(r#"name_quote = "abc""#).unwrap_err();
        assert!(matches!(err, QueryError::Config(_)));
    }

    #[test]
    fn toml_rejects_unknown_style() {
        assert!(DriverConfig::from_toml_str(r#"limit = "top""#).is_err());
    }

    #[test]
    fn toml_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("driver.toml");
        std::fs::write(&path, "prefix = \"t_\"\ndate_part = \"extract\"\n").unwrap();

        let config = DriverConfig::from_toml_file(&path).unwrap();
        assert_eq!(config.prefix, "t_");
        assert_eq!(config.date_part, DatePartStyle::Extract);
    }

    #[test]
    fn serialized_preset_parses_back() {
        let raw = toml::to_string(&DriverConfig::mysql()).unwrap();
        assert!(raw.contains("limit = \"my_sql\""));
        assert_eq!(DriverConfig::from_toml_str(&raw).unwrap(), DriverConfig::mysql());
    }

    #[test]
    fn toml_file_missing_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DriverConfig::from_toml_file(dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, QueryError::Io(_)));
    }
}
