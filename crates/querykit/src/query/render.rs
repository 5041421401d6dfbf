use super::{Query, StatementType};
use crate::error::{QueryError, QueryResult};
use crate::fragment::{Fragment, Value};
use std::fmt;

/// Space-separated clause writer.
struct ClauseWriter {
    out: String,
}

impl ClauseWriter {
    fn new() -> Self {
        Self { out: String::new() }
    }

    fn keyword(&mut self, kw: &str) {
        if !self.out.is_empty() {
            self.out.push(' ');
        }
        self.out.push_str(kw);
    }

    fn clause(&mut self, fragment: Option<&Fragment>) {
        if let Some(fragment) = fragment {
            if !self.out.is_empty() {
                self.out.push(' ');
            }
            fragment.write_sql(&mut self.out);
        }
    }

    fn joins(&mut self, joins: &[Fragment]) {
        for join in joins {
            self.clause(Some(join));
        }
    }
}

impl Query {
    /// Render the statement.
    ///
    /// The text is derived from the current clauses on every call; nothing is
    /// cached.
    pub fn to_sql(&self) -> String {
        let sql = match &self.raw {
            Some(raw) => raw.to_string(),
            None => self.render_clauses(),
        };
        let sql = self.apply_pagination(sql);

        #[cfg(feature = "tracing")]
        tracing::trace!(
            target: "querykit.sql",
            statement_type = ?self.statement_type,
            raw = self.raw.is_some(),
            len = sql.len(),
            "rendered statement"
        );

        sql
    }

    fn render_clauses(&self) -> String {
        let mut w = ClauseWriter::new();

        match self.statement_type {
            StatementType::Select => {
                w.clause(self.select.as_ref());
                w.clause(self.from.as_ref());
                w.joins(&self.joins);
                w.clause(self.where_.as_ref());
                w.clause(self.group.as_ref());
                w.clause(self.having.as_ref());
                w.clause(self.union.as_ref());
                w.clause(self.union_all.as_ref());
                w.clause(self.order.as_ref());
            }
            StatementType::Delete => {
                w.clause(self.delete.as_ref());
                w.clause(self.from.as_ref());
                w.joins(&self.joins);
                w.clause(self.where_.as_ref());
            }
            StatementType::Update => {
                w.clause(self.update.as_ref());
                w.joins(&self.joins);
                w.clause(self.set.as_ref());
                w.clause(self.where_.as_ref());
            }
            StatementType::Insert => {
                w.clause(self.insert.as_ref());
                if self.set.is_some() {
                    w.clause(self.set.as_ref());
                } else if let Some(values) = &self.values {
                    w.clause(self.columns.as_ref());
                    if !values.first().is_some_and(Value::is_query) {
                        w.keyword("VALUES");
                    }
                    w.clause(Some(values));
                }
            }
            StatementType::Union => {
                w.clause(self.union.as_ref());
                w.clause(self.union_all.as_ref());
            }
            StatementType::Call => w.clause(self.call.as_ref()),
            StatementType::Exec => w.clause(self.exec.as_ref()),
            StatementType::None => {}
        }

        w.out
    }

    /// Hand the statement to the driver's LIMIT/OFFSET transformer.
    ///
    /// Without a driver, or with both values zero, `sql` is returned as is.
    fn apply_pagination(&self, sql: String) -> String {
        match &self.driver {
            Some(driver) if self.limit > 0 || self.offset > 0 => {
                driver.apply_limit_offset(sql, self.limit, self.offset)
            }
            _ => sql,
        }
    }

    /// Render for display: the prefix placeholder is replaced with the real
    /// table prefix and the text is wrapped in a `<pre>` block.
    pub fn dump(&self) -> QueryResult<String> {
        let driver = self.driver.as_ref().ok_or(QueryError::no_driver("dump"))?;
        let sql = self
            .to_sql()
            .replace(driver.prefix_placeholder(), driver.prefix());

        #[cfg(feature = "tracing")]
        tracing::debug!(target: "querykit.sql", sql = %sql, "dump");

        Ok(format!("<pre class=\"querykit\">{sql}</pre>"))
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}
