//! Field schema building blocks
//!
//! A component definition is a tree of named field nodes: leaves carry a
//! value kind, groups nest further fields. The structural validator walks
//! this tree against the untyped document; the UI walks it to render forms.

use crate::enums::EnumTable;

/// Numeric range constraint. `None` on either side leaves it open.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberBounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Whole numbers only (ports, day counts, cabinet counts).
    pub integer: bool,
}

impl NumberBounds {
    pub const fn int(min: f64, max: f64) -> Self {
        NumberBounds { min: Some(min), max: Some(max), integer: true }
    }

    pub const fn float(min: f64, max: f64) -> Self {
        NumberBounds { min: Some(min), max: Some(max), integer: false }
    }
}

/// What a leaf field holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// UUID string, generated once per instance and never edited.
    Uuid,
    /// Dotted-quad IPv4 address.
    Ipv4,
    Bool,
    /// Free text, must be non-empty.
    Text,
    /// JSON number, optionally bounded.
    Number(NumberBounds),
    /// String of the form `"<magnitude><unit>"`, e.g. `"30kW"`.
    NumberWithUnit { unit: &'static str, bounds: NumberBounds },
    /// Two-element `[index, label]` array drawn from an indexed table.
    IndexString(EnumTable),
    /// Fixed discriminator value, e.g. a component's `Type` tag.
    Const(&'static str),
    /// One of the members of an enumeration table.
    EnumRef(EnumTable),
}

/// A leaf field: its kind plus presence and editability flags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDef {
    pub kind: FieldKind,
    pub required: bool,
    /// Rendered but not editable (generated identifiers).
    pub read_only: bool,
}

/// One node of a component's field tree.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldNode {
    Leaf(FieldDef),
    Group { required: bool, fields: FieldGroup },
}

/// Ordered named children of a group. Order matters: the defaults resolver
/// fills fields in declaration order, and derived defaults read siblings
/// resolved before them.
pub type FieldGroup = Vec<(&'static str, FieldNode)>;

impl FieldNode {
    pub fn field(kind: FieldKind) -> Self {
        FieldNode::Leaf(FieldDef { kind, required: true, read_only: false })
    }

    pub fn optional_field(kind: FieldKind) -> Self {
        FieldNode::Leaf(FieldDef { kind, required: false, read_only: false })
    }

    pub fn locked_field(kind: FieldKind) -> Self {
        FieldNode::Leaf(FieldDef { kind, required: true, read_only: true })
    }

    pub fn group(fields: FieldGroup) -> Self {
        FieldNode::Group { required: true, fields }
    }

    pub fn optional_group(fields: FieldGroup) -> Self {
        FieldNode::Group { required: false, fields }
    }

    pub fn is_required(&self) -> bool {
        match self {
            FieldNode::Leaf(def) => def.required,
            FieldNode::Group { required, .. } => *required,
        }
    }
}
