//! # querykit
//!
//! A dialect-agnostic SQL statement builder.
//!
//! ## Features
//!
//! - **Clause composition**: each clause is a [`Fragment`] created on first use
//!   and extended by later calls, joined by a clause-specific glue
//! - **Statement shapes**: SELECT, INSERT, UPDATE, DELETE, UNION, CALL, EXEC,
//!   rendered in the right order from the same clause slots
//! - **Sub-queries**: any clause value can be a nested [`Query`]
//! - **Token interpolation**: `format("%n = %q", ...)` with typed substitutions
//! - **Pluggable dialects**: quoting, escaping and LIMIT/OFFSET go through a
//!   [`Driver`]; [`StandardDriver`] covers MySQL, PostgreSQL and SQLite
//!
//! ## Example
//!
//! ```ignore
//! use querykit::{Query, StandardDriver};
//!
//! let mut q = Query::with_driver(StandardDriver::postgres().into_shared());
//! q.select(["id", "title"])
//!     .from("articles")?
//!     .where_(["state = 1", "access = 0"])
//!     .order("created DESC")
//!     .set_limit(20, 40);
//!
//! assert_eq!(
//!     q.to_sql(),
//!     "SELECT id,title FROM articles WHERE state = 1 AND access = 0 ORDER BY created DESC LIMIT 20 OFFSET 40"
//! );
//!
//! // INSERT
//! let mut ins = q.fresh();
//! ins.insert("articles")
//!     .columns(["title", "state"])
//!     .values(["'a',1", "'b',0"]);
//! assert_eq!(ins.to_sql(), "INSERT INTO articles (title,state) VALUES ('a',1),('b',0)");
//! # Ok::<(), querykit::QueryError>(())
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod format;
pub mod fragment;
pub mod ident;
pub mod query;

pub use config::{
    ConcatStyle, DatePartStyle, DriverConfig, EscapeStyle, IntervalStyle, LimitStyle,
};
pub use driver::{DatePart, Driver, StandardDriver};
pub use error::{QueryError, QueryResult};
pub use format::FormatMode;
pub use fragment::{Fragment, IntoValues, Value};
pub use ident::NameQuote;
pub use query::{Clause, Query, StatementType};
