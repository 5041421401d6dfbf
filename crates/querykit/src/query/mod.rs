//! The statement builder.
//!
//! [`Query`] holds at most one [`Fragment`] per clause and renders them in the
//! order dictated by its [`StatementType`]. Clause methods create the fragment
//! on first use and append to it afterwards; a glue argument given after the
//! first call is ignored.
//!
//! # Example
//!
//! ```ignore
//! use querykit::{Query, StandardDriver};
//!
//! let mut q = Query::with_driver(StandardDriver::mysql().into_shared());
//! q.select(["a.id", "a.title"])
//!     .from("#__content AS a")?
//!     .left_join("#__users AS u ON u.id = a.created_by")
//!     .where_("a.state = 1")
//!     .or_where(["a.featured = 1", "a.access = 0"])?
//!     .order("a.created DESC")
//!     .set_limit(10, 0);
//!
//! println!("{q}");
//! # Ok::<(), querykit::QueryError>(())
//! ```

mod functions;
mod render;

use crate::driver::Driver;
use crate::error::{QueryError, QueryResult};
use crate::fragment::{Fragment, GROUP, IntoValues, Value};
use std::fmt;
use std::sync::Arc;

/// Which slots participate in rendering, and in what order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatementType {
    #[default]
    None,
    Select,
    Insert,
    Update,
    Delete,
    Union,
    Call,
    Exec,
}

/// A clause slot of a [`Query`], for [`Query::clear`] and [`Query::clause`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Clause {
    Select,
    Delete,
    Update,
    Insert,
    From,
    Join,
    Set,
    Where,
    Group,
    Having,
    Order,
    Columns,
    Values,
    Exec,
    Call,
    Union,
    UnionAll,
    Limit,
    Offset,
}

impl Clause {
    pub fn as_str(self) -> &'static str {
        match self {
            Clause::Select => "select",
            Clause::Delete => "delete",
            Clause::Update => "update",
            Clause::Insert => "insert",
            Clause::From => "from",
            Clause::Join => "join",
            Clause::Set => "set",
            Clause::Where => "where",
            Clause::Group => "group",
            Clause::Having => "having",
            Clause::Order => "order",
            Clause::Columns => "columns",
            Clause::Values => "values",
            Clause::Exec => "exec",
            Clause::Call => "call",
            Clause::Union => "union",
            Clause::UnionAll => "union_all",
            Clause::Limit => "limit",
            Clause::Offset => "offset",
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A mutable SQL statement under construction.
///
/// Cloning deep-copies every clause (including nested sub-queries) while the
/// bound driver stays shared.
#[derive(Debug, Clone, Default)]
pub struct Query {
    driver: Option<Arc<dyn Driver>>,
    statement_type: StatementType,
    /// Raw SQL override; bypasses clause rendering.
    raw: Option<Value>,
    select: Option<Fragment>,
    delete: Option<Fragment>,
    update: Option<Fragment>,
    insert: Option<Fragment>,
    from: Option<Fragment>,
    joins: Vec<Fragment>,
    set: Option<Fragment>,
    where_: Option<Fragment>,
    group: Option<Fragment>,
    having: Option<Fragment>,
    order: Option<Fragment>,
    columns: Option<Fragment>,
    values: Option<Fragment>,
    call: Option<Fragment>,
    exec: Option<Fragment>,
    union: Option<Fragment>,
    union_all: Option<Fragment>,
    auto_increment_field: Option<String>,
    limit: u64,
    offset: u64,
}

/// Create the fragment in `slot` or append to it.
fn accumulate(slot: &mut Option<Fragment>, name: &str, values: Vec<Value>, glue: String) {
    match slot {
        Some(fragment) => {
            #[cfg(feature = "tracing")]
            {
                if fragment.glue() != glue {
                    tracing::debug!(
                        target: "querykit.sql",
                        clause = fragment.name(),
                        kept = fragment.glue(),
                        ignored = %glue,
                        "glue argument ignored on existing clause"
                    );
                }
            }
            fragment.append(values);
        }
        None => *slot = Some(Fragment::new(name, values, glue)),
    }
}

impl Query {
    /// Create a builder with no driver bound.
    ///
    /// Clause methods and rendering work; driver-backed helpers such as
    /// [`quote`](Query::quote) fail with [`QueryError::NoDriver`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder bound to `driver`.
    pub fn with_driver(driver: Arc<dyn Driver>) -> Self {
        Self {
            driver: Some(driver),
            ..Self::default()
        }
    }

    /// Create an empty builder sharing this builder's driver.
    ///
    /// Handy for sub-queries.
    pub fn fresh(&self) -> Self {
        Self {
            driver: self.driver.clone(),
            ..Self::default()
        }
    }

    /// Bind (or rebind) the driver.
    pub fn set_driver(&mut self, driver: Arc<dyn Driver>) -> &mut Self {
        self.driver = Some(driver);
        self
    }

    /// The bound driver, if any.
    pub fn driver(&self) -> Option<&Arc<dyn Driver>> {
        self.driver.as_ref()
    }

    pub fn statement_type(&self) -> StatementType {
        self.statement_type
    }

    /// Column generated by the server for the current INSERT, if declared.
    pub fn auto_increment_field(&self) -> Option<&str> {
        self.auto_increment_field.as_deref()
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// The fragment held in `clause`'s slot.
    ///
    /// `Join` yields the first join only; see [`joins`](Query::joins) for all
    /// of them. `Limit`/`Offset` hold no fragment and always return `None`.
    pub fn clause(&self, clause: Clause) -> Option<&Fragment> {
        match clause {
            Clause::Select => self.select.as_ref(),
            Clause::Delete => self.delete.as_ref(),
            Clause::Update => self.update.as_ref(),
            Clause::Insert => self.insert.as_ref(),
            Clause::From => self.from.as_ref(),
            Clause::Join => self.joins.first(),
            Clause::Set => self.set.as_ref(),
            Clause::Where => self.where_.as_ref(),
            Clause::Group => self.group.as_ref(),
            Clause::Having => self.having.as_ref(),
            Clause::Order => self.order.as_ref(),
            Clause::Columns => self.columns.as_ref(),
            Clause::Values => self.values.as_ref(),
            Clause::Exec => self.exec.as_ref(),
            Clause::Call => self.call.as_ref(),
            Clause::Union => self.union.as_ref(),
            Clause::UnionAll => self.union_all.as_ref(),
            Clause::Limit | Clause::Offset => None,
        }
    }

    pub fn joins(&self) -> &[Fragment] {
        &self.joins
    }

    /// `true` when nothing would be rendered.
    pub fn is_empty(&self) -> bool {
        self.raw.is_none() && self.statement_type == StatementType::None
    }

    // ==================== SELECT / FROM / JOIN ====================

    /// Add columns to the SELECT list.
    pub fn select(&mut self, columns: impl IntoValues) -> &mut Self {
        self.statement_type = StatementType::Select;
        accumulate(&mut self.select, "SELECT", columns.into_values(), ",".into());
        self
    }

    /// Add tables to the FROM list.
    ///
    /// Returns [`QueryError::MissingSubqueryAlias`] if any value is a
    /// sub-query; use [`from_subquery`](Query::from_subquery) for those.
    pub fn from(&mut self, tables: impl IntoValues) -> QueryResult<&mut Self> {
        let values = tables.into_values();
        if values.iter().any(Value::is_query) {
            return Err(QueryError::MissingSubqueryAlias);
        }
        self.push_from(values);
        Ok(self)
    }

    /// Add `(<subquery>) AS <quoted alias>` to the FROM list.
    pub fn from_subquery(&mut self, query: &Query, alias: &str) -> QueryResult<&mut Self> {
        let alias = self.quote_name(alias)?;
        self.push_from(vec![Value::Text(format!("({}) AS {alias}", query.to_sql()))]);
        Ok(self)
    }

    fn push_from(&mut self, values: Vec<Value>) {
        accumulate(&mut self.from, "FROM", values, ",".into());
    }

    /// Add a `<KIND> JOIN <conditions>` clause.
    ///
    /// Every call adds a separate join; joins are never merged.
    pub fn join(&mut self, kind: &str, conditions: impl IntoValues) -> &mut Self {
        let name = format!("{} JOIN", kind.trim().to_uppercase());
        self.joins.push(Fragment::list(name, conditions));
        self
    }

    pub fn inner_join(&mut self, conditions: impl IntoValues) -> &mut Self {
        self.join("INNER", conditions)
    }

    pub fn left_join(&mut self, conditions: impl IntoValues) -> &mut Self {
        self.join("LEFT", conditions)
    }

    pub fn right_join(&mut self, conditions: impl IntoValues) -> &mut Self {
        self.join("RIGHT", conditions)
    }

    pub fn outer_join(&mut self, conditions: impl IntoValues) -> &mut Self {
        self.join("OUTER", conditions)
    }

    // ==================== WHERE / HAVING ====================

    /// Add WHERE conditions joined by `AND`.
    pub fn where_(&mut self, conditions: impl IntoValues) -> &mut Self {
        self.where_glue(conditions, "AND")
    }

    /// Add WHERE conditions; `glue` (upper-cased) only takes effect on the
    /// first call.
    pub fn where_glue(&mut self, conditions: impl IntoValues, glue: &str) -> &mut Self {
        let glue = format!(" {} ", glue.trim().to_uppercase());
        accumulate(&mut self.where_, "WHERE", conditions.into_values(), glue);
        self
    }

    /// Turn the current WHERE into `WHERE (<old>) <OUTER> (<new>)`.
    ///
    /// Returns [`QueryError::NoWhereClause`] if no WHERE exists yet.
    pub fn extend_where(
        &mut self,
        outer_glue: &str,
        conditions: impl IntoValues,
        inner_glue: &str,
    ) -> QueryResult<&mut Self> {
        let old = self.where_.take().ok_or(QueryError::NoWhereClause)?;
        let outer = format!(" {} ", outer_glue.trim().to_uppercase());
        let inner = format!(" {} ", inner_glue.trim().to_uppercase());

        let mut extended = Fragment::new("WHERE", old.renamed(GROUP), outer);
        extended.append(Fragment::group(conditions, inner));
        self.where_ = Some(extended);
        Ok(self)
    }

    /// `extend_where("OR", conditions, "AND")`
    pub fn or_where(&mut self, conditions: impl IntoValues) -> QueryResult<&mut Self> {
        self.extend_where("OR", conditions, "AND")
    }

    /// `extend_where("AND", conditions, "AND")`
    pub fn and_where(&mut self, conditions: impl IntoValues) -> QueryResult<&mut Self> {
        self.extend_where("AND", conditions, "AND")
    }

    /// Add HAVING conditions joined by `AND`.
    pub fn having(&mut self, conditions: impl IntoValues) -> &mut Self {
        self.having_glue(conditions, "AND")
    }

    /// Add HAVING conditions; `glue` only takes effect on the first call.
    pub fn having_glue(&mut self, conditions: impl IntoValues, glue: &str) -> &mut Self {
        let glue = format!(" {} ", glue.trim().to_uppercase());
        accumulate(&mut self.having, "HAVING", conditions.into_values(), glue);
        self
    }

    // ==================== GROUP / ORDER ====================

    pub fn group(&mut self, columns: impl IntoValues) -> &mut Self {
        accumulate(&mut self.group, "GROUP BY", columns.into_values(), ",".into());
        self
    }

    pub fn order(&mut self, columns: impl IntoValues) -> &mut Self {
        accumulate(&mut self.order, "ORDER BY", columns.into_values(), ",".into());
        self
    }

    // ==================== INSERT / UPDATE / DELETE ====================

    /// Start an INSERT into `table`, replacing any previous target.
    pub fn insert(&mut self, table: impl IntoValues) -> &mut Self {
        self.statement_type = StatementType::Insert;
        self.insert = Some(Fragment::list("INSERT INTO", table));
        self.auto_increment_field = None;
        self
    }

    /// Start an INSERT and record the server-generated column.
    ///
    /// The field is metadata for the execution layer and is not rendered.
    pub fn insert_with_key(&mut self, table: impl IntoValues, field: &str) -> &mut Self {
        self.insert(table);
        self.auto_increment_field = Some(field.to_string());
        self
    }

    /// Add to the INSERT column list.
    pub fn columns(&mut self, columns: impl IntoValues) -> &mut Self {
        accumulate(&mut self.columns, GROUP, columns.into_values(), ",".into());
        self
    }

    /// Add VALUES tuples, each given as the text between its parentheses.
    pub fn values(&mut self, tuples: impl IntoValues) -> &mut Self {
        accumulate(&mut self.values, GROUP, tuples.into_values(), "),(".into());
        self
    }

    /// Start an UPDATE of `table`, replacing any previous target.
    pub fn update(&mut self, table: impl IntoValues) -> &mut Self {
        self.statement_type = StatementType::Update;
        self.update = Some(Fragment::list("UPDATE", table));
        self
    }

    /// Add SET assignments (UPDATE, or INSERT ... SET).
    pub fn set(&mut self, conditions: impl IntoValues) -> &mut Self {
        self.set_glue(conditions, ",")
    }

    /// Add SET assignments; `glue` only takes effect on the first call.
    pub fn set_glue(&mut self, conditions: impl IntoValues, glue: &str) -> &mut Self {
        let glue = format!("{}\n\t", glue.trim().to_uppercase());
        accumulate(&mut self.set, "SET", conditions.into_values(), glue);
        self
    }

    /// Start a DELETE. Add the table with [`from`](Query::from).
    pub fn delete(&mut self) -> &mut Self {
        self.statement_type = StatementType::Delete;
        self.delete = Some(Fragment::keyword("DELETE"));
        self
    }

    /// `delete()` followed by `FROM table`.
    pub fn delete_from(&mut self, table: &str) -> &mut Self {
        self.delete();
        self.push_from(table.into_values());
        self
    }

    // ==================== CALL / EXEC ====================

    /// Add stored procedures to a CALL statement.
    pub fn call(&mut self, procedures: impl IntoValues) -> &mut Self {
        self.statement_type = StatementType::Call;
        accumulate(&mut self.call, "CALL", procedures.into_values(), ",".into());
        self
    }

    /// Add stored procedures to an EXEC statement.
    pub fn exec(&mut self, procedures: impl IntoValues) -> &mut Self {
        self.statement_type = StatementType::Exec;
        accumulate(&mut self.exec, "EXEC", procedures.into_values(), ",".into());
        self
    }

    // ==================== UNION ====================

    /// Add queries to a `UNION`. Clears any ORDER BY.
    pub fn union(&mut self, queries: impl IntoValues) -> &mut Self {
        self.union_with(queries, false)
    }

    /// Add queries to a `UNION DISTINCT`. Clears any ORDER BY.
    pub fn union_distinct(&mut self, queries: impl IntoValues) -> &mut Self {
        self.union_with(queries, true)
    }

    /// Add queries to the UNION slot.
    ///
    /// `distinct` picks the keyword only when the slot is created; later calls
    /// append under the keyword already chosen.
    pub fn union_with(&mut self, queries: impl IntoValues, distinct: bool) -> &mut Self {
        let (name, glue) = if distinct {
            ("UNION DISTINCT ()", ") UNION DISTINCT (")
        } else {
            ("UNION ()", ") UNION (")
        };
        self.order = None;
        self.mark_union();
        accumulate(&mut self.union, name, queries.into_values(), glue.into());
        self
    }

    /// Add queries to a `UNION ALL`. Clears any ORDER BY.
    pub fn union_all(&mut self, queries: impl IntoValues) -> &mut Self {
        self.order = None;
        self.mark_union();
        accumulate(
            &mut self.union_all,
            "UNION ALL ()",
            queries.into_values(),
            ") UNION ALL (".into(),
        );
        self
    }

    fn mark_union(&mut self) {
        if self.statement_type == StatementType::None {
            self.statement_type = StatementType::Union;
        }
    }

    // ==================== Raw SQL / pagination / reset ====================

    /// Use `sql` verbatim instead of the clauses.
    ///
    /// Pagination is still applied on render.
    pub fn set_query(&mut self, sql: impl Into<Value>) -> &mut Self {
        self.raw = Some(sql.into());
        self
    }

    /// Set LIMIT and OFFSET (0 means unset). Applied through the driver.
    pub fn set_limit(&mut self, limit: u64, offset: u64) -> &mut Self {
        self.limit = limit;
        self.offset = offset;
        self
    }

    /// Reset one clause. Always discards a raw SQL override.
    pub fn clear(&mut self, clause: Clause) -> &mut Self {
        self.raw = None;
        match clause {
            Clause::Select => {
                self.select = None;
                self.statement_type = StatementType::None;
            }
            Clause::Delete => {
                self.delete = None;
                self.statement_type = StatementType::None;
            }
            Clause::Update => {
                self.update = None;
                self.statement_type = StatementType::None;
            }
            Clause::Insert => {
                self.insert = None;
                self.auto_increment_field = None;
                self.statement_type = StatementType::None;
            }
            Clause::Exec => {
                self.exec = None;
                self.statement_type = StatementType::None;
            }
            Clause::Call => {
                self.call = None;
                self.statement_type = StatementType::None;
            }
            Clause::From => self.from = None,
            Clause::Join => self.joins.clear(),
            Clause::Set => self.set = None,
            Clause::Where => self.where_ = None,
            Clause::Group => self.group = None,
            Clause::Having => self.having = None,
            Clause::Order => self.order = None,
            Clause::Columns => self.columns = None,
            Clause::Values => self.values = None,
            Clause::Union => {
                self.union = None;
                self.unmark_union();
            }
            Clause::UnionAll => {
                self.union_all = None;
                self.unmark_union();
            }
            Clause::Limit => {
                self.limit = 0;
                self.offset = 0;
            }
            Clause::Offset => self.offset = 0,
        }
        self
    }

    fn unmark_union(&mut self) {
        if self.statement_type == StatementType::Union
            && self.union.is_none()
            && self.union_all.is_none()
        {
            self.statement_type = StatementType::None;
        }
    }

    /// Reset every clause and the statement type. The driver stays bound.
    pub fn clear_all(&mut self) -> &mut Self {
        let driver = self.driver.take();
        *self = Self {
            driver,
            ..Self::default()
        };
        self
    }
}
