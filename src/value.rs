#[cfg(test)]
#[path = "./value_tests.rs"]
mod tests;

use crate::table::Table;
use crate::time::DateTime;
use std::fmt;

/// A decoded TOML value.
///
/// Use the `as_*` methods ([`as_str`](Self::as_str),
/// [`as_integer`](Self::as_integer), [`as_table`](Self::as_table), etc.) to
/// extract the value, or pattern match directly.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Datetime(DateTime),
    Array(Array),
    Table(Table),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&DateTime> {
        match self {
            Value::Datetime(dt) => Some(dt),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }

    /// The annotated-output tag for this value.
    pub fn type_str(&self) -> &'static str {
        match self {
            Value::String(..) => "string",
            Value::Integer(..) => "integer",
            Value::Float(..) => "float",
            Value::Boolean(..) => "bool",
            Value::Datetime(dt) => dt.type_str(),
            Value::Array(..) => "array",
            Value::Table(..) => "table",
        }
    }
}

/// A TOML array: ordered, possibly heterogeneous values.
#[derive(Clone, Default, PartialEq)]
pub struct Array {
    items: Vec<Value>,
    /// Set when the array was built from `[[name]]` headers. Literal arrays
    /// may not be extended by headers and vice versa.
    pub(crate) aot: bool,
}

impl Array {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Creates an array-of-tables holding its first entry.
    pub(crate) fn with_first_entry(entry: Value) -> Self {
        Array {
            items: vec![entry],
            aot: true,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    pub(crate) fn push(&mut self, value: Value) {
        self.items.push(value);
    }

    pub(crate) fn last_mut(&mut self) -> Option<&mut Value> {
        self.items.last_mut()
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.items).finish()
    }
}
