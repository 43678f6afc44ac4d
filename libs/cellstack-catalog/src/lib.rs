//! Component catalog for battery-storage installations
//!
//! The catalog is the single source of truth for what a plant configuration
//! may contain: component kinds with their field trees, enumeration tables,
//! per-unit equipment count bounds, hardware family gating, and the defaults
//! template each kind is instantiated from. All of it is static data;
//! the only runtime behavior is the defaults resolver.
//!
//! The validator crate consumes these definitions; nothing here inspects a
//! document.

pub mod cardinality;
pub mod components;
pub mod defaults;
pub mod enums;
pub mod error;
pub mod family;
pub mod fields;

pub use cardinality::{bounds_for, CardinalityBound, CARDINALITY_BOUNDS};
pub use components::{ComponentKind, UnitId};
pub use defaults::{
    create_instance, create_instance_with, DefaultLeaf, DefaultNode, IdGenerator, InstanceContext,
    UuidV4Generator,
};
pub use enums::{EnumTable, HardwareModels, IndexedLabel};
pub use error::{CatalogError, Result};
pub use family::HardwareFamily;
pub use fields::{FieldDef, FieldGroup, FieldKind, FieldNode, NumberBounds};
