//! Cross-field business rules
//!
//! Rules that no single field check can express: hardware-model coherence,
//! hardware-family gating, address uniqueness and equipment cardinality.
//! The pass is defensive throughout: it runs on structurally broken
//! documents without panicking, reading everything through the path
//! accessor and skipping what does not resolve. All applicable violations
//! are collected in one pass; rules never short-circuit each other.

use crate::issue::Issue;
use cellstack_catalog::{bounds_for, ComponentKind, EnumTable, HardwareFamily, UnitId};
use cellstack_doc::{child, get, Key};
use serde_json::Value;

/// Evaluate every cross rule against the document.
pub fn apply_cross_rules(doc: &Value) -> Vec<Issue> {
    let mut issues = Vec::new();
    check_hardware_models(doc, &mut issues);
    check_variant_gating(doc, &mut issues);
    check_addresses(doc, &mut issues);
    check_cardinality(doc, &mut issues);
    issues
}

// ============================================================================
// Shared lookups
// ============================================================================

fn equipment_path(unit: UnitId) -> Vec<Key> {
    vec![Key::name("Units"), Key::name(unit.as_str()), Key::name("Equipment")]
}

fn equipment(doc: &Value, unit: UnitId) -> &[Value] {
    get(doc, &equipment_path(unit))
        .and_then(Value::as_array)
        .map_or(&[], Vec::as_slice)
}

fn tag_of(item: &Value) -> Option<&str> {
    item.get("Type").and_then(Value::as_str)
}

fn str_at<'a>(item: &'a Value, keys: &[&str]) -> Option<&'a str> {
    let path: Vec<Key> = keys.iter().map(|k| Key::name(*k)).collect();
    get(item, &path).and_then(Value::as_str)
}

fn hardware_family(doc: &Value) -> HardwareFamily {
    let variant = get(doc, &[Key::name("ModularPlc"), Key::name("Hardwarevariante")])
        .and_then(Value::as_str)
        .unwrap_or("");
    HardwareFamily::from_variant(variant)
}

// ============================================================================
// Rule 1: hardware-model coherence
// ============================================================================

const HARDWARE_MAPPED_KINDS: &[(UnitId, ComponentKind, EnumTable)] = &[
    (UnitId::Ems, ComponentKind::Smartmeter, EnumTable::EmsSmartmeterHardware),
    (UnitId::Main, ComponentKind::SmartmeterMain, EnumTable::MainSmartmeterHardware),
];

fn check_hardware_models(doc: &Value, issues: &mut Vec<Issue>) {
    for (unit, kind, table) in HARDWARE_MAPPED_KINDS {
        let base = equipment_path(*unit);
        for (index, item) in equipment(doc, *unit).iter().enumerate() {
            if tag_of(item) != Some(kind.as_str()) {
                continue;
            }
            let item_path = child(&base, index);
            let Some(hardware) = str_at(item, &["HardwareType"]) else {
                continue;
            };
            let Some(models) = table.models_for(hardware) else {
                issues.push(Issue::new(
                    format!("Unknown hardware make: {hardware}"),
                    child(&item_path, "HardwareType"),
                ));
                continue;
            };
            if let Some(model) = str_at(item, &["HardwareModel"]) {
                if !models.contains(&model) {
                    issues.push(Issue::new(
                        format!("{model} is not a model of {hardware}"),
                        child(&item_path, "HardwareModel"),
                    ));
                }
            }
        }
    }
}

// ============================================================================
// Rule 2: hardware-family gating
// ============================================================================

fn check_variant_gating(doc: &Value, issues: &mut Vec<Issue>) {
    let family = hardware_family(doc);

    let main_path = [Key::name("Units"), Key::name("Main")];
    if get(doc, &main_path).is_some() {
        let main_type = get(doc, &child(&main_path, "Type")).and_then(Value::as_str);
        if main_type != Some(family.as_str()) {
            issues.push(Issue::new(
                format!("Main unit type must be {family} (selected hardware variant)"),
                child(&main_path, "Type"),
            ));
        }
    }

    let base = equipment_path(UnitId::Main);
    for (index, item) in equipment(doc, UnitId::Main).iter().enumerate() {
        if tag_of(item) != Some(ComponentKind::BatteryInverter.as_str()) {
            continue;
        }
        let item_path = child(&base, index);

        if let Some(inverter) = str_at(item, &["Inverter", "Type"]) {
            if !family.inverter_types().contains(&inverter) {
                issues.push(Issue::new(
                    format!("Inverter type must belong to the {family} family"),
                    child(&child(&item_path, "Inverter"), "Type"),
                ));
            }
        }
        if let Some(battery) = str_at(item, &["Battery", "Type"]) {
            if !family.battery_types().contains(&battery) {
                issues.push(Issue::new(
                    format!("Battery type must belong to the {family} family"),
                    child(&child(&item_path, "Battery"), "Type"),
                ));
            }
        }

        let has_modbus = item.get("Modbus").is_some();
        if family.requires_modbus() && !has_modbus {
            issues.push(Issue::new(
                format!("Modbus module is required on {family} hardware"),
                child(&item_path, "Modbus"),
            ));
        }
        if !family.requires_modbus() && has_modbus {
            issues.push(Issue::new(
                format!("Modbus module is not allowed on {family} hardware"),
                child(&item_path, "Modbus"),
            ));
        }
    }
}

// ============================================================================
// Rule 3: address uniqueness
// ============================================================================

fn check_addresses(doc: &Value, issues: &mut Vec<Issue>) {
    check_remote_slave_addresses(doc, issues);

    // Terra couples the addresses inside one battery inverter; Blokk has no
    // shared bridge, so addresses must instead be unique across inverters.
    match hardware_family(doc) {
        HardwareFamily::Terra => check_shared_inverter_addresses(doc, issues),
        HardwareFamily::Blokk => check_distinct_inverter_addresses(doc, issues),
    }
}

fn check_remote_slave_addresses(doc: &Value, issues: &mut Vec<Issue>) {
    let base = equipment_path(UnitId::Ems);
    let remotes: Vec<(usize, &str)> = equipment(doc, UnitId::Ems)
        .iter()
        .enumerate()
        .filter(|(_, item)| tag_of(item) == Some(ComponentKind::SlaveRemoteUM.as_str()))
        .filter_map(|(index, item)| str_at(item, &["Ip"]).map(|ip| (index, ip)))
        .collect();

    for (index, ip) in &remotes {
        let shared = remotes.iter().any(|(other, other_ip)| other != index && other_ip == ip);
        if shared {
            issues.push(Issue::new(
                format!("IP address {ip} is already used by another remote slave"),
                child(&child(&base, *index), "Ip"),
            ));
        }
    }
}

/// Addresses of each battery inverter's sub-components, in equipment order.
fn inverter_addresses(doc: &Value) -> Vec<(usize, Vec<String>)> {
    equipment(doc, UnitId::Main)
        .iter()
        .enumerate()
        .filter(|(_, item)| tag_of(item) == Some(ComponentKind::BatteryInverter.as_str()))
        .map(|(index, item)| {
            let addresses = [
                str_at(item, &["Inverter", "Config", "Ip"]),
                str_at(item, &["Battery", "Config", "Ip"]),
                str_at(item, &["Modbus", "Config", "Ip"]),
            ]
            .into_iter()
            .flatten()
            .map(str::to_string)
            .collect();
            (index, addresses)
        })
        .collect()
}

fn check_shared_inverter_addresses(doc: &Value, issues: &mut Vec<Issue>) {
    let base = equipment_path(UnitId::Main);
    for (index, addresses) in inverter_addresses(doc) {
        let all_equal = addresses.windows(2).all(|pair| pair[0] == pair[1]);
        if !all_equal {
            issues.push(Issue::new(
                "Inverter, battery and modbus must share one IP address",
                child(&base, index),
            ));
        }
    }
}

fn check_distinct_inverter_addresses(doc: &Value, issues: &mut Vec<Issue>) {
    let base = equipment_path(UnitId::Main);
    let per_inverter = inverter_addresses(doc);

    for (index, addresses) in &per_inverter {
        let clash = addresses.iter().find(|ip| {
            per_inverter
                .iter()
                .any(|(other, other_ips)| other != index && other_ips.contains(*ip))
        });
        if let Some(ip) = clash {
            issues.push(Issue::new(
                format!("IP address {ip} is also used by another battery inverter"),
                child(&base, *index),
            ));
        }
    }
}

// ============================================================================
// Rule 4: cardinality
// ============================================================================

fn check_cardinality(doc: &Value, issues: &mut Vec<Issue>) {
    for unit in UnitId::all() {
        let items = equipment(doc, *unit);
        let path = equipment_path(*unit);

        for bound in bounds_for(*unit) {
            let count = items
                .iter()
                .filter(|item| tag_of(item) == Some(bound.kind.as_str()))
                .count();

            if bound.is_exactly_one() {
                if count != 1 {
                    issues.push(Issue::new(
                        format!("{} must appear exactly once", bound.kind),
                        path.clone(),
                    ));
                }
                continue;
            }
            if let Some(min) = bound.min {
                if count < min {
                    issues.push(Issue::new(
                        format!("At least {min} {} required", bound.kind),
                        path.clone(),
                    ));
                }
            }
            if let Some(max) = bound.max {
                if count > max {
                    issues.push(Issue::new(
                        format!("At most {max} {} allowed", bound.kind),
                        path.clone(),
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rules_survive_arbitrary_garbage() {
        for doc in [json!(null), json!([]), json!("x"), json!({ "Units": 5 })] {
            // must not panic; cardinality minimums still fire
            let issues = apply_cross_rules(&doc);
            assert!(!issues.is_empty());
        }
    }

    #[test]
    fn test_unknown_hardware_make_and_model() {
        let doc = json!({
            "Units": { "Ems": { "Equipment": [
                { "Type": "Smartmeter", "HardwareType": "Siemens", "HardwareModel": "EM24" },
                { "Type": "Smartmeter", "HardwareType": "Phoenix", "HardwareModel": "EM24" }
            ]}}
        });
        let issues = apply_cross_rules(&doc);
        assert!(issues.iter().any(|i| i.message == "Unknown hardware make: Siemens"));
        assert!(issues.iter().any(|i| i.message == "EM24 is not a model of Phoenix"));
        // a valid make never also reports its model against another table
        assert!(!issues.iter().any(|i| i.message.contains("model of Siemens")));
    }

    #[test]
    fn test_main_type_follows_variant() {
        let doc = json!({
            "ModularPlc": { "Hardwarevariante": "BlokkV3" },
            "Units": { "Main": { "Type": "Terra", "Equipment": [] } }
        });
        let issues = apply_cross_rules(&doc);
        assert!(issues
            .iter()
            .any(|i| i.message == "Main unit type must be Blokk (selected hardware variant)"));
    }

    #[test]
    fn test_exactly_one_bound_is_one_issue_either_way() {
        // zero local slaves
        let doc = json!({ "Units": { "Ems": { "Equipment": [] } } });
        let count = apply_cross_rules(&doc)
            .iter()
            .filter(|i| i.message == "SlaveLocalUM must appear exactly once")
            .count();
        assert_eq!(count, 1);

        // two local slaves: same single message
        let doc = json!({ "Units": { "Ems": { "Equipment": [
            { "Type": "SlaveLocalUM" }, { "Type": "SlaveLocalUM" }
        ]}}});
        let count = apply_cross_rules(&doc)
            .iter()
            .filter(|i| i.message == "SlaveLocalUM must appear exactly once")
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_maximum_bound_is_one_issue_regardless_of_excess() {
        let items: Vec<_> = (0..15).map(|_| json!({ "Type": "Smartmeter" })).collect();
        let doc = json!({ "Units": { "Ems": { "Equipment": items } } });
        let count = apply_cross_rules(&doc)
            .iter()
            .filter(|i| i.message == "At most 10 Smartmeter allowed")
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_remote_slave_address_clash_hits_both() {
        let doc = json!({ "Units": { "Ems": { "Equipment": [
            { "Type": "SlaveLocalUM" },
            { "Type": "SlaveRemoteUM", "Ip": "192.168.0.10" },
            { "Type": "SlaveRemoteUM", "Ip": "192.168.0.10" },
            { "Type": "SlaveRemoteUM", "Ip": "192.168.0.11" }
        ]}}});
        let issues = apply_cross_rules(&doc);
        let clashes: Vec<_> = issues
            .iter()
            .filter(|i| i.message.contains("already used by another remote slave"))
            .collect();
        assert_eq!(clashes.len(), 2);
        assert_eq!(cellstack_doc::path_key(&clashes[0].path), "Units.Ems.Equipment.1.Ip");
        assert_eq!(cellstack_doc::path_key(&clashes[1].path), "Units.Ems.Equipment.2.Ip");
    }

    #[test]
    fn test_terra_sub_addresses_must_match() {
        let doc = json!({
            "ModularPlc": { "Hardwarevariante": "Terra" },
            "Units": { "Main": { "Type": "Terra", "Equipment": [ {
                "Type": "BatteryInverter",
                "Inverter": { "Type": "TerraInverter", "Config": { "Ip": "192.168.1.10" } },
                "Battery": { "Type": "TerraBattery", "Config": { "Ip": "192.168.1.11" } },
                "Modbus": { "Type": "TerraModbus", "Config": { "Ip": "192.168.1.10" } }
            } ] } }
        });
        let issues = apply_cross_rules(&doc);
        assert!(issues
            .iter()
            .any(|i| i.message == "Inverter, battery and modbus must share one IP address"));
    }

    #[test]
    fn test_blokk_addresses_unique_across_inverters() {
        let inverter = |ip: &str| {
            json!({
                "Type": "BatteryInverter",
                "Inverter": { "Type": "InverterKaco", "Config": { "Ip": ip } },
                "Battery": { "Type": "BatteryPylontechM1xBms", "Config": { "Ip": ip } }
            })
        };
        let doc = json!({
            "ModularPlc": { "Hardwarevariante": "BlokkV3" },
            "Units": { "Main": { "Type": "Blokk",
                "Equipment": [ inverter("192.168.1.10"), inverter("192.168.1.10") ] } }
        });
        let issues = apply_cross_rules(&doc);
        let clashes = issues
            .iter()
            .filter(|i| i.message.contains("also used by another battery inverter"))
            .count();
        assert_eq!(clashes, 2);

        // distinct addresses clear both; sharing within one inverter is fine
        let doc = json!({
            "ModularPlc": { "Hardwarevariante": "BlokkV3" },
            "Units": { "Main": { "Type": "Blokk",
                "Equipment": [ inverter("192.168.1.10"), inverter("192.168.1.20") ] } }
        });
        let issues = apply_cross_rules(&doc);
        assert!(!issues.iter().any(|i| i.message.contains("also used")));
    }
}
