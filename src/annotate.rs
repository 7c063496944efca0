use crate::table::{Key, Table};
use crate::value::{Array, Value};

/// Rewrites a value tree into its type-annotated form: every node becomes a
/// two-entry table `{ type = "...", value = ... }`. Scalars carry a canonical
/// string rendering under `value`; arrays and tables carry their annotated
/// children.
///
/// The `type` tag is [`Value::type_str`]. Useful for schemaless comparison
/// of decoded documents, where both the values and their TOML types matter.
/// [`decode`](crate::decode) never applies this transform itself.
pub fn annotate(value: &Value) -> Value {
    match value {
        Value::Table(table) => {
            let mut children = Table::new();
            for (i, (name, entry)) in table.iter().enumerate() {
                children.insert(Key::new(name, i), annotate(entry));
            }
            tagged("table", Value::Table(children))
        }
        Value::Array(array) => {
            let mut children = Array::new();
            for entry in array {
                children.push(annotate(entry));
            }
            tagged("array", Value::Array(children))
        }
        scalar => tagged(scalar.type_str(), Value::String(scalar_text(scalar))),
    }
}

fn tagged(tag: &str, value: Value) -> Value {
    let mut out = Table::new();
    out.insert(Key::new("type", 0), Value::String(tag.to_string()));
    out.insert(Key::new("value", 1), value);
    Value::Table(out)
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => float_text(*f),
        Value::Boolean(b) => b.to_string(),
        Value::Datetime(dt) => dt.to_string(),
        Value::Array(..) | Value::Table(..) => unreachable!("containers carry children, not text"),
    }
}

/// Formats a float so the text always reads back as a float: `nan`, `inf`,
/// `-inf` for the specials, and a forced `.0` on integral values that would
/// otherwise print as plain integers.
fn float_text(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }
    if f.is_infinite() {
        return if f < 0.0 { "-inf" } else { "inf" }.to_string();
    }
    let mut text = f.to_string();
    if !text.contains(['.', 'e', 'E']) {
        text.push_str(".0");
    }
    text
}

#[cfg(test)]
#[path = "./annotate_tests.rs"]
mod tests;
