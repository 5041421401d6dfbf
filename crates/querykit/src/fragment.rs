//! Clause fragments.
//!
//! A [`Fragment`] is one SQL clause under construction: a keyword (`WHERE`,
//! `ORDER BY`, ...), an ordered list of [`Value`]s, and the glue placed between
//! them. The glue is fixed when the fragment is created; [`Fragment::append`]
//! only adds values.
//!
//! A name ending in `()` wraps the joined values in parentheses, so `"()"`
//! renders an unnamed group and `"UNION ()"` renders `UNION (...)`.

use crate::query::Query;
use std::fmt;

/// Marker name of an unnamed, parenthesized group.
pub const GROUP: &str = "()";

/// One child of a [`Fragment`].
#[derive(Debug, Clone)]
pub enum Value {
    /// Opaque SQL text.
    Text(String),
    /// A nested statement, rendered with its own [`Query::to_sql`].
    Query(Box<Query>),
    /// A nested fragment, typically a `()` group built by `extend_where`.
    Group(Fragment),
}

impl Value {
    /// `true` for [`Value::Query`].
    pub fn is_query(&self) -> bool {
        matches!(self, Value::Query(_))
    }

    fn write_sql(&self, out: &mut String) {
        match self {
            Value::Text(s) => out.push_str(s),
            Value::Query(q) => out.push_str(&q.to_sql()),
            Value::Group(f) => f.write_sql(out),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_sql(&mut out);
        f.write_str(&out)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Text(s.clone())
    }
}

impl From<Query> for Value {
    fn from(q: Query) -> Self {
        Value::Query(Box::new(q))
    }
}

impl From<&Query> for Value {
    fn from(q: &Query) -> Self {
        Value::Query(Box::new(q.clone()))
    }
}

impl From<Fragment> for Value {
    fn from(f: Fragment) -> Self {
        Value::Group(f)
    }
}

/// Convert an argument into a flat list of [`Value`]s.
///
/// A single value becomes a one-element list; a sequence is flattened one level.
pub trait IntoValues {
    fn into_values(self) -> Vec<Value>;
}

impl IntoValues for Value {
    fn into_values(self) -> Vec<Value> {
        vec![self]
    }
}

impl IntoValues for &str {
    fn into_values(self) -> Vec<Value> {
        vec![self.into()]
    }
}

impl IntoValues for String {
    fn into_values(self) -> Vec<Value> {
        vec![self.into()]
    }
}

impl IntoValues for &String {
    fn into_values(self) -> Vec<Value> {
        vec![self.into()]
    }
}

impl IntoValues for Query {
    fn into_values(self) -> Vec<Value> {
        vec![self.into()]
    }
}

impl IntoValues for &Query {
    fn into_values(self) -> Vec<Value> {
        vec![self.into()]
    }
}

impl IntoValues for Fragment {
    fn into_values(self) -> Vec<Value> {
        vec![self.into()]
    }
}

impl<T: Into<Value>> IntoValues for Vec<T> {
    fn into_values(self) -> Vec<Value> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T: Into<Value>, const N: usize> IntoValues for [T; N] {
    fn into_values(self) -> Vec<Value> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T: Clone + Into<Value>> IntoValues for &[T] {
    fn into_values(self) -> Vec<Value> {
        self.iter().cloned().map(Into::into).collect()
    }
}

/// A named, glue-joined list of clause values.
#[derive(Debug, Clone)]
pub struct Fragment {
    name: String,
    children: Vec<Value>,
    glue: String,
}

impl Fragment {
    /// Create a fragment. `glue` is fixed for the fragment's lifetime.
    pub fn new(name: impl Into<String>, values: impl IntoValues, glue: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: values.into_values(),
            glue: glue.into(),
        }
    }

    /// Create a fragment with the default `,` glue.
    pub fn list(name: impl Into<String>, values: impl IntoValues) -> Self {
        Self::new(name, values, ",")
    }

    /// Create a fragment with a name and no values (e.g. a bare `DELETE`).
    pub fn keyword(name: impl Into<String>) -> Self {
        Self::new(name, Vec::<Value>::new(), ",")
    }

    /// Create an unnamed `()` group.
    pub fn group(values: impl IntoValues, glue: impl Into<String>) -> Self {
        Self::new(GROUP, values, glue)
    }

    /// Add more values. Name and glue are unchanged.
    pub fn append(&mut self, values: impl IntoValues) -> &mut Self {
        self.children.extend(values.into_values());
        self
    }

    /// Change the name in place.
    pub fn rename(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    /// Consume and return the fragment under a new name.
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn glue(&self) -> &str {
        &self.glue
    }

    pub fn children(&self) -> &[Value] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// First child, if any.
    pub fn first(&self) -> Option<&Value> {
        self.children.first()
    }

    /// Render the fragment.
    pub fn to_sql(&self) -> String {
        let mut out = String::new();
        self.write_sql(&mut out);
        out
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        let wrapped = self.name.strip_suffix(GROUP);
        let head = wrapped.unwrap_or(&self.name);

        match wrapped {
            Some(_) => {
                out.push_str(head);
                out.push('(');
            }
            None => {
                out.push_str(head);
                if !self.children.is_empty() {
                    out.push(' ');
                }
            }
        }

        for (i, child) in self.children.iter().enumerate() {
            if i > 0 {
                out.push_str(&self.glue);
            }
            child.write_sql(out);
        }

        if wrapped.is_some() {
            out.push(')');
        }
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}
