//! Compiled structural checks
//!
//! Walks a component's declared field tree against a document fragment and
//! collects an Issue for every shape, type, range or membership violation.
//! Unknown keys are violations too: a stale or renamed field in an imported
//! document must surface here, not vanish silently.

use crate::decode::{check_ipv4, decode_index_pair, decode_unit_value};
use crate::issue::Issue;
use cellstack_catalog::{ComponentKind, FieldDef, FieldGroup, FieldKind, FieldNode, NumberBounds};
use cellstack_doc::{child, Key};
use serde_json::Value;

/// Check one component instance against its kind's field tree. Issues carry
/// paths relative to the document root, rooted at `base`.
pub fn check_component(kind: ComponentKind, value: &Value, base: &[Key], issues: &mut Vec<Issue>) {
    check_group(kind.fields(), value, base, issues);
}

/// Check a document fragment against a field group.
pub fn check_group(fields: &FieldGroup, value: &Value, base: &[Key], issues: &mut Vec<Issue>) {
    let Some(map) = value.as_object() else {
        issues.push(Issue::new("Expected an object", base.to_vec()));
        return;
    };

    for (name, node) in fields {
        let path = child(base, *name);
        match (node, map.get(*name)) {
            (FieldNode::Group { fields, .. }, Some(value)) => {
                check_group(fields, value, &path, issues);
            }
            (FieldNode::Group { required: true, .. }, None) => {
                issues.push(Issue::new(format!("Missing required group {name}"), path));
            }
            (FieldNode::Group { required: false, .. }, None) => {}
            (FieldNode::Leaf(def), Some(value)) => check_field(def, value, &path, issues),
            (FieldNode::Leaf(def), None) => {
                if def.required {
                    issues.push(Issue::new(format!("Missing required field {name}"), path));
                }
            }
        }
    }

    // declared keys only
    for key in map.keys() {
        if !fields.iter().any(|(name, _)| name == key) {
            issues.push(Issue::new(format!("Unknown field {key}"), child(base, key.as_str())));
        }
    }
}

fn check_field(def: &FieldDef, value: &Value, path: &[Key], issues: &mut Vec<Issue>) {
    match def.kind {
        FieldKind::Uuid => {
            match value.as_str() {
                Some(raw) if uuid::Uuid::parse_str(raw).is_ok() => {}
                _ => issues.push(Issue::new("Invalid UUID", path.to_vec())),
            }
        }
        FieldKind::Ipv4 => match value.as_str() {
            Some(raw) => {
                if let Err(err) = check_ipv4(raw) {
                    issues.push(Issue::new(err.to_string(), path.to_vec()));
                }
            }
            None => issues.push(Issue::new("Expected an IPv4 address string", path.to_vec())),
        },
        FieldKind::Bool => {
            if !value.is_boolean() {
                issues.push(Issue::new("Expected a boolean", path.to_vec()));
            }
        }
        FieldKind::Text => match value.as_str() {
            Some(raw) => {
                if def.required && raw.is_empty() {
                    issues.push(Issue::new("Must not be empty", path.to_vec()));
                }
            }
            None => issues.push(Issue::new("Expected a string", path.to_vec())),
        },
        FieldKind::Number(bounds) => check_number(value, &bounds, path, issues),
        FieldKind::NumberWithUnit { unit, bounds } => match value.as_str() {
            Some(raw) => match decode_unit_value(raw, unit) {
                Ok(decoded) => {
                    check_magnitude(decoded.magnitude, &bounds, path, issues);
                }
                Err(err) => issues.push(Issue::new(err.to_string(), path.to_vec())),
            },
            None => issues.push(Issue::new(
                format!("Expected a string of the form <number>{unit}"),
                path.to_vec(),
            )),
        },
        FieldKind::IndexString(table) => {
            if let Err(err) = decode_index_pair(value, table) {
                issues.push(Issue::new(err.to_string(), path.to_vec()));
            }
        }
        FieldKind::Const(expected) => {
            if value.as_str() != Some(expected) {
                issues.push(Issue::new(format!("Must be {expected}"), path.to_vec()));
            }
        }
        FieldKind::EnumRef(table) => match value.as_str() {
            Some(raw) if table.contains(raw) => {}
            _ => issues.push(Issue::new(
                format!("Must be one of: {}", table.values().join(", ")),
                path.to_vec(),
            )),
        },
    }
}

fn check_number(value: &Value, bounds: &NumberBounds, path: &[Key], issues: &mut Vec<Issue>) {
    let Some(number) = value.as_f64() else {
        issues.push(Issue::new("Expected a number", path.to_vec()));
        return;
    };
    if bounds.integer && number.fract() != 0.0 {
        issues.push(Issue::new("Must be a whole number", path.to_vec()));
        return;
    }
    check_magnitude(number, bounds, path, issues);
}

fn check_magnitude(number: f64, bounds: &NumberBounds, path: &[Key], issues: &mut Vec<Issue>) {
    if let Some(min) = bounds.min {
        if number < min {
            issues.push(Issue::new(format!("Must be at least {min}"), path.to_vec()));
            return;
        }
    }
    if let Some(max) = bounds.max {
        if number > max {
            issues.push(Issue::new(format!("Must be at most {max}"), path.to_vec()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellstack_catalog::{create_instance_with, IdGenerator, InstanceContext};
    use serde_json::json;

    struct FixedIds;

    impl IdGenerator for FixedIds {
        fn next_id(&mut self) -> String {
            "8f14e45f-ceea-467f-9538-02c8a9a7d9a1".to_string()
        }
    }

    fn check_kind(kind: ComponentKind, value: &Value) -> Vec<Issue> {
        let mut issues = Vec::new();
        check_component(kind, value, &[], &mut issues);
        issues
    }

    #[test]
    fn test_defaults_pass_for_every_kind() {
        for kind in ComponentKind::all() {
            for n in [1, 2, 11] {
                let instance = create_instance_with(*kind, InstanceContext::new(n), &mut FixedIds);
                let issues = check_kind(*kind, &instance);
                assert!(issues.is_empty(), "{kind} (n={n}): {issues:?}");
            }
        }
    }

    #[test]
    fn test_missing_required_field_is_reported() {
        let mut instance =
            create_instance_with(ComponentKind::Smartmeter, InstanceContext::new(1), &mut FixedIds);
        instance.as_object_mut().unwrap().remove("Guid");

        let issues = check_kind(ComponentKind::Smartmeter, &instance);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "Missing required field Guid");
        assert_eq!(issues[0].path, vec![Key::name("Guid")]);
    }

    #[test]
    fn test_unknown_key_is_reported() {
        let mut instance =
            create_instance_with(ComponentKind::SlaveLocalUM, InstanceContext::new(1), &mut FixedIds);
        instance["LegacyField"] = json!(1);

        let issues = check_kind(ComponentKind::SlaveLocalUM, &instance);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "Unknown field LegacyField");
    }

    #[test]
    fn test_enum_membership() {
        let mut instance =
            create_instance_with(ComponentKind::Smartmeter, InstanceContext::new(1), &mut FixedIds);
        instance["HardwareType"] = json!("Siemens");

        let issues = check_kind(ComponentKind::Smartmeter, &instance);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.starts_with("Must be one of:"));
        assert_eq!(issues[0].path, vec![Key::name("HardwareType")]);
    }

    #[test]
    fn test_number_bounds_and_integrality() {
        let mut instance =
            create_instance_with(ComponentKind::Smartmeter, InstanceContext::new(1), &mut FixedIds);

        instance["Config"]["Port"] = json!(70000);
        let issues = check_kind(ComponentKind::Smartmeter, &instance);
        assert_eq!(issues[0].message, "Must be at most 65535");

        instance["Config"]["Port"] = json!(502.5);
        let issues = check_kind(ComponentKind::Smartmeter, &instance);
        assert_eq!(issues[0].message, "Must be a whole number");

        instance["Config"]["Port"] = json!("502");
        let issues = check_kind(ComponentKind::Smartmeter, &instance);
        assert_eq!(issues[0].message, "Expected a number");
    }

    #[test]
    fn test_unit_magnitude_bounds() {
        let mut instance =
            create_instance_with(ComponentKind::System, InstanceContext::new(1), &mut FixedIds);
        instance["BatteryBalancing"]["PreemptiveMaxGridChargePower"] = json!("900kW");

        let issues = check_kind(ComponentKind::System, &instance);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "Must be at most 50");
        assert_eq!(
            issues[0].path,
            vec![Key::name("BatteryBalancing"), Key::name("PreemptiveMaxGridChargePower")]
        );
    }

    #[test]
    fn test_const_tag_mismatch() {
        let mut instance =
            create_instance_with(ComponentKind::SlaveLocalUM, InstanceContext::new(1), &mut FixedIds);
        instance["Type"] = json!("SlaveRemoteUM");

        let issues = check_kind(ComponentKind::SlaveLocalUM, &instance);
        assert_eq!(issues[0].message, "Must be SlaveLocalUM");
    }

    #[test]
    fn test_non_object_fragment() {
        let issues = check_kind(ComponentKind::System, &json!("not an object"));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "Expected an object");
    }
}
