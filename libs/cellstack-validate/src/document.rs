//! Whole-document structural validation
//!
//! The root shape (customer, PLC block, system block, the two units and
//! their equipment lists) is fixed; equipment items are dispatched to their
//! component check by the `Type` tag. Unknown tags and misplaced kinds are
//! Issues at the item's `Type` path, never a reason to stop.

use crate::issue::Issue;
use crate::structural::check_component;
use cellstack_catalog::{ComponentKind, EnumTable, UnitId};
use cellstack_doc::{child, Key};
use serde_json::Value;

const ROOT_KEYS: &[&str] = &["Customer", "ModularPlc", "System", "Units"];

/// Run the full structural pass and return its issues.
pub fn check_document(doc: &Value) -> Vec<Issue> {
    let mut issues = Vec::new();

    let Some(root) = doc.as_object() else {
        issues.push(Issue::new("Configuration must be an object", vec![]));
        return issues;
    };

    // Customer
    match root.get("Customer").and_then(Value::as_str) {
        Some(customer) if !customer.is_empty() => {}
        Some(_) => issues.push(Issue::new("Must not be empty", vec![Key::name("Customer")])),
        None => issues.push(Issue::new(
            "Missing required field Customer",
            vec![Key::name("Customer")],
        )),
    }

    // singletons
    check_singleton(root, "ModularPlc", ComponentKind::ModularPlc, &mut issues);
    check_singleton(root, "System", ComponentKind::System, &mut issues);

    // units
    match root.get("Units") {
        Some(units) => check_units(units, &mut issues),
        None => issues.push(Issue::new("Missing required group Units", vec![Key::name("Units")])),
    }

    for key in root.keys() {
        if !ROOT_KEYS.contains(&key.as_str()) {
            issues.push(Issue::new(format!("Unknown field {key}"), vec![Key::name(key)]));
        }
    }

    issues
}

fn check_singleton(
    root: &serde_json::Map<String, Value>,
    name: &str,
    kind: ComponentKind,
    issues: &mut Vec<Issue>,
) {
    match root.get(name) {
        Some(value) => check_component(kind, value, &[Key::name(name)], issues),
        None => issues.push(Issue::new(
            format!("Missing required group {name}"),
            vec![Key::name(name)],
        )),
    }
}

fn check_units(units: &Value, issues: &mut Vec<Issue>) {
    let base = [Key::name("Units")];
    let Some(map) = units.as_object() else {
        issues.push(Issue::new("Expected an object", base.to_vec()));
        return;
    };

    for unit in UnitId::all() {
        let unit_path = child(&base, unit.as_str());
        match map.get(unit.as_str()) {
            Some(value) => check_unit(*unit, value, &unit_path, issues),
            None => issues.push(Issue::new(
                format!("Missing required group {unit}"),
                unit_path,
            )),
        }
    }

    for key in map.keys() {
        if UnitId::try_parse(key).is_none() {
            issues.push(Issue::new(format!("Unknown field {key}"), child(&base, key.as_str())));
        }
    }
}

fn check_unit(unit: UnitId, value: &Value, base: &[Key], issues: &mut Vec<Issue>) {
    let Some(map) = value.as_object() else {
        issues.push(Issue::new("Expected an object", base.to_vec()));
        return;
    };

    // the Main unit carries a family tag
    if unit == UnitId::Main {
        let path = child(base, "Type");
        match map.get("Type").and_then(Value::as_str) {
            Some(tag) if EnumTable::MainUnitTypes.contains(tag) => {}
            Some(_) => issues.push(Issue::new(
                format!("Must be one of: {}", EnumTable::MainUnitTypes.values().join(", ")),
                path,
            )),
            None => issues.push(Issue::new("Missing required field Type", path)),
        }
    }

    let equipment_path = child(base, "Equipment");
    match map.get("Equipment") {
        Some(Value::Array(items)) => {
            for (index, item) in items.iter().enumerate() {
                check_equipment_item(unit, item, &child(&equipment_path, index), issues);
            }
        }
        Some(_) => issues.push(Issue::new("Expected a list", equipment_path)),
        None => issues.push(Issue::new("Missing required field Equipment", equipment_path)),
    }

    for key in map.keys() {
        let known = key == "Equipment" || (unit == UnitId::Main && key == "Type");
        if !known {
            issues.push(Issue::new(format!("Unknown field {key}"), child(base, key.as_str())));
        }
    }
}

fn check_equipment_item(unit: UnitId, item: &Value, base: &[Key], issues: &mut Vec<Issue>) {
    let type_path = child(base, "Type");
    let Some(tag) = item.get("Type").and_then(Value::as_str) else {
        issues.push(Issue::new("Missing required field Type", type_path));
        return;
    };
    let Some(kind) = ComponentKind::try_parse(tag) else {
        issues.push(Issue::new(format!("Unknown component kind: {tag}"), type_path));
        return;
    };
    if !unit.accepts(kind) {
        issues.push(Issue::new(
            format!("{kind} is not allowed in the {unit} unit"),
            type_path,
        ));
        return;
    }
    check_component(kind, item, base, issues);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_document_reports_every_root_group() {
        let issues = check_document(&json!({}));
        let messages: Vec<_> = issues.iter().map(|i| i.message.as_str()).collect();
        assert!(messages.contains(&"Missing required field Customer"));
        assert!(messages.contains(&"Missing required group ModularPlc"));
        assert!(messages.contains(&"Missing required group System"));
        assert!(messages.contains(&"Missing required group Units"));
    }

    #[test]
    fn test_unknown_equipment_tag() {
        let doc = json!({ "Units": { "Ems": { "Equipment": [ { "Type": "Flywheel" } ] } } });
        let issues = check_document(&doc);
        let issue = issues
            .iter()
            .find(|i| i.message == "Unknown component kind: Flywheel")
            .unwrap();
        assert_eq!(
            issue.path,
            vec![
                Key::name("Units"),
                Key::name("Ems"),
                Key::name("Equipment"),
                Key::index(0),
                Key::name("Type"),
            ]
        );
    }

    #[test]
    fn test_kind_in_wrong_unit() {
        let doc = json!({ "Units": { "Ems": { "Equipment": [ { "Type": "BatteryInverter" } ] } } });
        let issues = check_document(&doc);
        assert!(issues
            .iter()
            .any(|i| i.message == "BatteryInverter is not allowed in the Ems unit"));
    }

    #[test]
    fn test_main_type_must_be_a_family_tag() {
        let doc = json!({ "Units": { "Main": { "Type": "Virtual", "Equipment": [] } } });
        let issues = check_document(&doc);
        assert!(issues
            .iter()
            .any(|i| i.message == "Must be one of: Terra, Blokk"
                && i.path == vec![Key::name("Units"), Key::name("Main"), Key::name("Type")]));
    }

    #[test]
    fn test_unknown_root_key() {
        let doc = json!({ "Legacy": 1 });
        let issues = check_document(&doc);
        assert!(issues.iter().any(|i| i.message == "Unknown field Legacy"));
    }
}
