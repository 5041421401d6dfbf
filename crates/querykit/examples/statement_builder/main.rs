//! Example demonstrating querykit's statement builder and formatter.
//!
//! Run with:
//!   cargo run --example statement_builder -p querykit
//!
//! Optional: point QUERYKIT_DRIVER at a TOML driver config, e.g.
//!   QUERYKIT_DRIVER=driver.toml

use querykit::{DriverConfig, Query, QueryResult, StandardDriver, sql_format};
use std::env;

fn driver_from_env() -> QueryResult<StandardDriver> {
    match env::var("QUERYKIT_DRIVER") {
        Ok(path) => StandardDriver::new(DriverConfig::from_toml_file(path)?),
        Err(_) => StandardDriver::new(DriverConfig::mysql().with_prefix("jos_")),
    }
}

fn main() -> QueryResult<()> {
    let db = Query::with_driver(driver_from_env()?.into_shared());

    // SELECT with joins, nested WHERE groups and pagination.
    let mut q = db.fresh();
    let cols = q.quote_names(&["a.id", "a.title", "u.name"])?;
    let content = q.quote_name_as("#__content", "a")?;
    let users = q.quote_name_as("#__users", "u")?;
    let published = sql_format!(q, "%n = %a", "a.state", 1)?;
    q.select(cols)
        .from(content)?
        .left_join(format!("{users} ON u.id = a.created_by"))
        .where_(published);
    let featured = sql_format!(q, "%n = %a", "a.featured", 1)?;
    let since = sql_format!(q, "%Y >= %a", "a.created", 2020)?;
    q.or_where([featured, since])?
        .order("a.created DESC")
        .set_limit(10, 20);
    println!("{}\n", q.dump()?);

    // INSERT with an auto-increment key.
    let mut ins = db.fresh();
    let title = ins.quote("It's here")?;
    ins.insert_with_key("#__content", "id")
        .columns(["title", "state"])
        .values([format!("{title},1"), "'Draft',0".to_string()]);
    println!("{}", ins.dump()?);
    println!("auto-increment: {:?}\n", ins.auto_increment_field());

    // UPDATE ... SET ... WHERE
    let mut upd = db.fresh();
    let now = upd.current_timestamp()?;
    upd.update("#__content")
        .set(vec!["state = 0".to_string(), format!("modified = {now}")])
        .where_("id = 42");
    println!("{}\n", upd.dump()?);

    // UNION of two sub-selects.
    let mut a = db.fresh();
    a.select("id").from("#__content")?;
    let mut b = db.fresh();
    b.select("id").from("#__archive")?;
    let mut union = db.fresh();
    union.union(a).union(b);
    println!("{}", union.dump()?);

    Ok(())
}
