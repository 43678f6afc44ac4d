//! Document path keys

use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of a document path: an object field name or an array index.
///
/// Serializes untagged, so a path round-trips as a JSON array of strings and
/// numbers (`["Units", "Main", "Equipment", 0, "Guid"]`), which is the wire
/// form consumed by the editing layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    Index(usize),
    Name(String),
}

impl Key {
    pub fn name(name: impl Into<String>) -> Self {
        Key::Name(name.into())
    }

    pub fn index(index: usize) -> Self {
        Key::Index(index)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Name(name) => write!(f, "{name}"),
            Key::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(name)
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Key::Index(index)
    }
}

/// Join a path into the dot-separated lookup key used by the error index
/// (`Units.Main.Equipment.0.Guid`). The empty path maps to `_root`.
pub fn path_key(path: &[Key]) -> String {
    if path.is_empty() {
        return "_root".to_string();
    }
    path.iter()
        .map(Key::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

/// A copy of `base` extended by one key. Convenience for building issue paths.
pub fn child(base: &[Key], key: impl Into<Key>) -> Vec<Key> {
    let mut path = base.to_vec();
    path.push(key.into());
    path
}
