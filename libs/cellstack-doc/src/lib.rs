//! Path-addressed document access
//!
//! The configuration document is an untyped `serde_json::Value` tree owned by
//! the editing layer. Every read and write goes through the accessor functions
//! in this crate, addressed by a path of string and index keys.
//!
//! Two contracts hold for all operations:
//! - They never panic and never return errors. A path that does not resolve
//!   yields `None` (reads) or the document unchanged (writes). Malformed
//!   documents are the validator's concern, not the accessor's.
//! - Write operations never mutate their input. `set`, `delete` and `merge`
//!   return a new document; the original stays valid.
//!
//! # Example
//!
//! ```
//! use cellstack_doc::{get, set, Key};
//! use serde_json::json;
//!
//! let doc = json!({ "Units": { "Ems": { "Equipment": [] } } });
//! let path = [Key::name("Units"), Key::name("Ems"), Key::name("Equipment"), Key::index(0)];
//! let doc2 = set(&doc, &path, json!({ "Type": "Smartmeter" }));
//!
//! assert!(get(&doc2, &path).is_some());
//! assert!(get(&doc, &path).is_none()); // input untouched
//! ```

pub mod accessor;
pub mod path;

pub use accessor::{delete, get, get_or, has, merge, set};
pub use path::{child, path_key, Key};
