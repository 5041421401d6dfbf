//! End-to-end checks against a custom driver implementation.

use querykit::{
    Clause, DriverConfig, Driver, NameQuote, Query, QueryError, StandardDriver, Value, sql_format,
};
use std::sync::Arc;

/// Upper-cases identifiers, single-quotes values, paginates with `TOP`-style
/// wrapping to prove the transformer sees the assembled text.
#[derive(Debug)]
struct TestDriver;

impl Driver for TestDriver {
    fn escape(&self, text: &str, _extra: bool) -> String {
        text.replace('\'', "''")
    }

    fn name_quote(&self) -> NameQuote {
        NameQuote::symmetric('"')
    }

    fn quote_name(&self, name: &str, alias: Option<&str>) -> String {
        match alias {
            Some(alias) => format!("{} AS {}", name.to_uppercase(), alias.to_uppercase()),
            None => name.to_uppercase(),
        }
    }

    fn null_date(&self, quoted: bool) -> String {
        if quoted { "'NULLDATE'".into() } else { "NULLDATE".into() }
    }

    fn date_format(&self) -> &str {
        "%Y"
    }

    fn prefix(&self) -> &str {
        "tst_"
    }

    fn apply_limit_offset(&self, sql: String, limit: u64, offset: u64) -> String {
        format!("/* {limit},{offset} */ {sql}")
    }
}

fn query() -> Query {
    Query::with_driver(Arc::new(TestDriver))
}

#[test]
fn format_uses_driver_quoting() {
    let q = query();
    assert_eq!(q.format("%1$n = %2$q", &["id", "abc"]).unwrap(), "ID = 'abc'");
    assert_eq!(q.format::<&str>("100%%", &[]).unwrap(), "100%");
}

#[test]
fn macro_mixes_argument_types() {
    let q = query();
    let out = sql_format!(q, "%n BETWEEN %a AND %a OR %n = %Z", "hits", 10, 2.5, "seen").unwrap();
    assert_eq!(out, "HITS BETWEEN 10 AND 2.5 OR SEEN = 'NULLDATE'");
}

#[test]
fn custom_pagination_applied_last() {
    let mut q = query();
    q.select("*").from("t").unwrap().set_limit(3, 6);
    assert_eq!(q.to_sql(), "/* 3,6 */ SELECT * FROM t");

    q.set_query("SELECT 1");
    assert_eq!(q.to_sql(), "/* 3,6 */ SELECT 1");
}

#[test]
fn subquery_in_where_and_from() {
    let q = query();

    let mut ids = q.fresh();
    ids.select("user_id").from("sessions").unwrap().where_("active = 1");

    let mut outer = q.fresh();
    outer
        .select("*")
        .from("users")
        .unwrap()
        .where_(format!("id IN ({ids})"));
    assert_eq!(
        outer.to_sql(),
        "SELECT * FROM users WHERE id IN (SELECT user_id FROM sessions WHERE active = 1)"
    );

    let mut wrapped = q.fresh();
    wrapped.select("s.user_id").from_subquery(&ids, "s").unwrap();
    assert_eq!(
        wrapped.to_sql(),
        "SELECT s.user_id FROM (SELECT user_id FROM sessions WHERE active = 1) AS S"
    );
}

#[test]
fn nested_query_values_follow_later_mutation_of_copy_only() {
    let mut inner = query();
    inner.select("a").from("x").unwrap();

    let mut outer = query();
    outer.union(&inner);

    inner.where_("a > 1");
    assert_eq!(outer.to_sql(), "UNION (SELECT a FROM x)");

    let mut copy = outer.clone();
    copy.union(Value::from("SELECT a FROM y"));
    assert_eq!(outer.to_sql(), "UNION (SELECT a FROM x)");
    assert_eq!(copy.to_sql(), "UNION (SELECT a FROM x) UNION (SELECT a FROM y)");
}

#[test]
fn precondition_errors_leave_state_intact() {
    let mut q = query();
    q.select("*");

    let mut sub = query();
    sub.select("1");
    let err = q.from(vec![Value::from("t"), Value::from(sub)]).unwrap_err();
    assert!(matches!(err, QueryError::MissingSubqueryAlias));
    assert!(q.clause(Clause::From).is_none());

    assert!(matches!(q.and_where("x").unwrap_err(), QueryError::NoWhereClause));
    assert_eq!(q.to_sql(), "SELECT *");
}

#[test]
fn no_driver_is_a_configuration_error() {
    let q = Query::new();
    let err = q.quote("x").unwrap_err();
    assert!(err.is_no_driver());
    assert_eq!(
        err.to_string(),
        "No database driver bound to the query (required by quote)"
    );
}

#[test]
fn toml_configured_driver() {
    let config = DriverConfig::from_toml_str(
        r#"
        name_quote = "[]"
        prefix = "app_"
        prefix_placeholder = "{p}"
        limit = "none"
        "#,
    )
    .unwrap();
    let driver = StandardDriver::new(config).unwrap();

    let mut q = Query::with_driver(driver.into_shared());
    let table = q.quote_name("{p}orders").unwrap();
    q.select("*").from(table).unwrap().set_limit(10, 0);

    assert_eq!(q.to_sql(), "SELECT * FROM [{p}orders]");
    assert_eq!(
        q.dump().unwrap(),
        "<pre class=\"querykit\">SELECT * FROM [app_orders]</pre>"
    );
}
