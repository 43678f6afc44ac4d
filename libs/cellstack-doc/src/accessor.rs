//! Read/write/merge operations over the document tree
//!
//! All writes are copy-on-write: the input document is cloned and the clone is
//! edited in place, so callers can keep the previous snapshot (the editing
//! layer relies on this for undo and for re-validating the old state).

use crate::path::Key;
use serde_json::{Map, Value};

/// Read the value at `path`. Returns `None` if any key along the way does not
/// resolve; never panics on a malformed path or document.
pub fn get<'a>(doc: &'a Value, path: &[Key]) -> Option<&'a Value> {
    let mut current = doc;
    for key in path {
        current = match key {
            Key::Name(name) => current.as_object()?.get(name)?,
            Key::Index(index) => current.as_array()?.get(*index)?,
        };
    }
    Some(current)
}

/// As [`get`], substituting `fallback` for an unresolved path.
pub fn get_or<'a>(doc: &'a Value, path: &[Key], fallback: &'a Value) -> &'a Value {
    get(doc, path).unwrap_or(fallback)
}

/// True iff every key along `path` resolves to a value.
pub fn has(doc: &Value, path: &[Key]) -> bool {
    get(doc, path).is_some()
}

/// Return a new document with `value` placed at `path`.
///
/// Missing intermediate containers are created: an array when the next key is
/// an index, an object otherwise. An intermediate that exists but has the
/// wrong shape (a scalar where a container is needed) is replaced. Writing
/// past the end of an array pads the gap with nulls.
pub fn set(doc: &Value, path: &[Key], value: Value) -> Value {
    if path.is_empty() {
        return value;
    }
    let mut out = doc.clone();
    set_in_place(&mut out, path, value);
    out
}

fn set_in_place(target: &mut Value, path: &[Key], value: Value) {
    let (key, rest) = match path.split_first() {
        Some(split) => split,
        None => {
            *target = value;
            return;
        }
    };

    match key {
        Key::Name(name) => {
            if !target.is_object() {
                *target = Value::Object(Map::new());
            }
            if let Value::Object(map) = target {
                let slot = map.entry(name.clone()).or_insert(Value::Null);
                if rest.is_empty() {
                    *slot = value;
                } else {
                    coerce_container(slot, &rest[0]);
                    set_in_place(slot, rest, value);
                }
            }
        }
        Key::Index(index) => {
            if !target.is_array() {
                *target = Value::Array(Vec::new());
            }
            if let Value::Array(arr) = target {
                while arr.len() <= *index {
                    arr.push(Value::Null);
                }
                let slot = &mut arr[*index];
                if rest.is_empty() {
                    *slot = value;
                } else {
                    coerce_container(slot, &rest[0]);
                    set_in_place(slot, rest, value);
                }
            }
        }
    }
}

// A null or mismatched intermediate becomes the container the next key needs.
fn coerce_container(slot: &mut Value, next: &Key) {
    match next {
        Key::Name(_) if !slot.is_object() => *slot = Value::Object(Map::new()),
        Key::Index(_) if !slot.is_array() => *slot = Value::Array(Vec::new()),
        _ => {}
    }
}

/// Return a new document with the entry at `path` removed.
///
/// Removing an array element excises it; later elements shift down by one. If
/// the path does not resolve, the document comes back unchanged (as a clone).
pub fn delete(doc: &Value, path: &[Key]) -> Value {
    let mut out = doc.clone();
    let (last, parent_path) = match path.split_last() {
        Some(split) => split,
        None => return out,
    };

    let parent = match get_mut(&mut out, parent_path) {
        Some(parent) => parent,
        None => return out,
    };
    match (last, parent) {
        (Key::Name(name), Value::Object(map)) => {
            map.remove(name);
        }
        (Key::Index(index), Value::Array(arr)) => {
            if *index < arr.len() {
                arr.remove(*index);
            }
        }
        _ => {}
    }
    out
}

fn get_mut<'a>(doc: &'a mut Value, path: &[Key]) -> Option<&'a mut Value> {
    let mut current = doc;
    for key in path {
        current = match key {
            Key::Name(name) => current.as_object_mut()?.get_mut(name)?,
            Key::Index(index) => current.as_array_mut()?.get_mut(*index)?,
        };
    }
    Some(current)
}

/// Deep-merge `partial` into `doc`, returning a new document.
///
/// Objects merge key by key. Arrays are replaced wholesale, never merged
/// element-wise: a partial that carries an `Equipment` list defines the whole
/// list. Scalars from the partial win.
pub fn merge(doc: &Value, partial: &Value) -> Value {
    match (doc, partial) {
        (Value::Object(base), Value::Object(overlay)) => {
            let mut merged = base.clone();
            for (key, value) in overlay {
                let slot = match base.get(key) {
                    Some(existing) => merge(existing, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), slot);
            }
            Value::Object(merged)
        }
        _ => partial.clone(),
    }
}
