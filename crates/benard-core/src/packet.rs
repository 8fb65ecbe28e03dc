//! The packet: a named-value snapshot of simulation state.
//!
//! A [`Packet`] is an insertion-ordered map from variable name to
//! [`Array`]. Producers build one per snapshot with exactly the keys of
//! their data list; consumers apply it onto their own local state and
//! then drop it. Packets are ephemeral and owned — pushing the same
//! snapshot at several consumers means cloning it per destination.

use std::fmt;

use indexmap::IndexMap;

use crate::array::Array;

/// An ordered mapping from variable name to array value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Packet {
    entries: IndexMap<String, Array>,
}

impl Packet {
    /// An empty packet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value under a name, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Array>) {
        self.entries.insert(name.into(), value.into());
    }

    /// Look up a value by name.
    pub fn get(&self, name: &str) -> Option<&Array> {
        self.entries.get(name)
    }

    /// Whether the packet carries a value for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// The variable names, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Array)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of variables in the packet.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the packet holds no variables.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "packet{{")?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        write!(f, "}}")
    }
}

impl FromIterator<(String, Array)> for Packet {
    fn from_iter<I: IntoIterator<Item = (String, Array)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insertion_order_is_preserved() {
        let mut p = Packet::new();
        p.insert("temperature", vec![1.0, 2.0]);
        p.insert("vorticity", vec![0.0, 0.0]);
        p.insert("time", 0.25);
        let keys: Vec<_> = p.keys().collect();
        assert_eq!(keys, ["temperature", "vorticity", "time"]);
    }

    #[test]
    fn clone_is_deep() {
        let mut p = Packet::new();
        p.insert("time", 1.0);
        let mut q = p.clone();
        q.insert("time", 2.0);
        assert_eq!(p.get("time").unwrap().as_scalar(), Some(1.0));
        assert_eq!(q.get("time").unwrap().as_scalar(), Some(2.0));
    }
}
