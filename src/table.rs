#[cfg(test)]
#[path = "./table_tests.rs"]
mod tests;

use crate::value::Value;
use std::fmt;

/// A table key together with the position of its first binding.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Key {
    pub name: String,
    pub pos: usize,
}

impl Key {
    pub fn new(name: impl Into<String>, pos: usize) -> Self {
        Key {
            name: name.into(),
            pos,
        }
    }
}

/// A TOML table: key-value pairs in insertion order, with a hash index for
/// constant-time lookup.
///
/// The table also remembers how it came into existence, which drives the
/// redefinition rules during assembly: a table bound by a `[header]` is
/// closed against further headers, an inline table is closed entirely, and a
/// table created by a dotted key may only keep growing through dotted keys.
#[derive(Clone, Default)]
pub struct Table {
    entries: Vec<(Key, Value)>,
    index: foldhash::HashMap<String, usize>,

    /// Bound by a `[name]` header (explicitly defined).
    pub(crate) defined: bool,
    /// Written inline (`{...}`); closed against any later extension.
    pub(crate) frozen: bool,
    /// Created as an intermediate segment of a dotted key.
    pub(crate) dotted: bool,
}

impl Table {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a reference to the value for `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        let idx = *self.index.get(name)?;
        Some(&self.entries[idx].1)
    }

    /// Returns a mutable reference to the value for `name`.
    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        let idx = *self.index.get(name)?;
        Some(&mut self.entries[idx].1)
    }

    /// Returns `true` if the table contains the key.
    #[inline]
    pub fn contains_key(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Position where `name` was first bound.
    pub(crate) fn key_pos(&self, name: &str) -> Option<usize> {
        let idx = *self.index.get(name)?;
        Some(self.entries[idx].0.pos)
    }

    /// Inserts a key-value pair. Does **not** check for duplicates; the
    /// assembler checks with [`contains_key`](Self::contains_key) first so a
    /// re-binding becomes a diagnostic instead of an overwrite.
    pub(crate) fn insert(&mut self, key: Key, value: Value) {
        self.index.insert(key.name.clone(), self.entries.len());
        self.entries.push((key, value));
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.name.as_str(), v))
    }

    /// Returns the keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.name.as_str())
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .zip(&other.entries)
                .all(|(a, b)| a.0.name == b.0.name && a.1 == b.1)
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
