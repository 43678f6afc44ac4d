//! Defaults resolver
//!
//! Each component definition carries a defaults template mirroring its field
//! tree. Templates are declarative data, not closures: a leaf is one of a
//! closed set of directives, so a template can be inspected and tested
//! without executing it.
//!
//! Resolution runs in declaration order. A derived leaf
//! ([`DefaultLeaf::FirstModelOf`]) reads a sibling resolved earlier in the
//! same group, which is why field order in the catalog matters.

use crate::components::ComponentKind;
use crate::enums::EnumTable;
use serde_json::{Map, Value};

// ============================================================================
// Template types
// ============================================================================

/// One leaf directive of a defaults template.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultLeaf {
    /// A fixed JSON value.
    Literal(Value),
    /// A freshly generated UUID, one per resolution.
    Uuid,
    /// A string with `${n}` / `${nn}` placeholders filled from the instance
    /// counter (`${nn}` is zero-padded to two digits).
    Pattern(&'static str),
    /// The first model listed for the hardware make held by a sibling field
    /// resolved earlier in the same group.
    FirstModelOf { field: &'static str, table: EnumTable },
}

/// One node of a defaults template.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultNode {
    Leaf(DefaultLeaf),
    Group(Vec<(&'static str, DefaultNode)>),
}

impl DefaultNode {
    pub fn literal(value: Value) -> Self {
        DefaultNode::Leaf(DefaultLeaf::Literal(value))
    }

    pub fn uuid() -> Self {
        DefaultNode::Leaf(DefaultLeaf::Uuid)
    }

    pub fn pattern(template: &'static str) -> Self {
        DefaultNode::Leaf(DefaultLeaf::Pattern(template))
    }

    pub fn first_model_of(field: &'static str, table: EnumTable) -> Self {
        DefaultNode::Leaf(DefaultLeaf::FirstModelOf { field, table })
    }

    pub fn group(entries: Vec<(&'static str, DefaultNode)>) -> Self {
        DefaultNode::Group(entries)
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Per-instance inputs to resolution: the 1-based ordinal of the new
/// component among its siblings of the same kind.
#[derive(Debug, Clone, Copy)]
pub struct InstanceContext {
    pub n: u32,
}

impl InstanceContext {
    pub fn new(n: u32) -> Self {
        InstanceContext { n }
    }
}

/// Source of generated identifiers. Production uses [`UuidV4Generator`];
/// tests inject a deterministic one.
pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

/// Random version-4 UUIDs.
#[derive(Debug, Default)]
pub struct UuidV4Generator;

impl IdGenerator for UuidV4Generator {
    fn next_id(&mut self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Resolve a component's defaults template into a complete instance value.
pub fn create_instance(kind: ComponentKind, ctx: InstanceContext) -> Value {
    create_instance_with(kind, ctx, &mut UuidV4Generator)
}

/// As [`create_instance`], with an injected identifier source.
pub fn create_instance_with(
    kind: ComponentKind,
    ctx: InstanceContext,
    ids: &mut dyn IdGenerator,
) -> Value {
    tracing::debug!(kind = kind.as_str(), n = ctx.n, "resolving component defaults");
    resolve_node(kind.defaults(), ctx, ids)
}

fn resolve_node(node: &DefaultNode, ctx: InstanceContext, ids: &mut dyn IdGenerator) -> Value {
    match node {
        DefaultNode::Group(entries) => resolve_group(entries, ctx, ids),
        DefaultNode::Leaf(DefaultLeaf::Literal(value)) => value.clone(),
        DefaultNode::Leaf(DefaultLeaf::Uuid) => Value::String(ids.next_id()),
        DefaultNode::Leaf(DefaultLeaf::Pattern(template)) => {
            Value::String(apply_pattern(template, ctx.n))
        }
        // Only meaningful inside a group, where the sibling is in scope.
        DefaultNode::Leaf(DefaultLeaf::FirstModelOf { .. }) => Value::String(String::new()),
    }
}

fn resolve_group(
    entries: &[(&'static str, DefaultNode)],
    ctx: InstanceContext,
    ids: &mut dyn IdGenerator,
) -> Value {
    let mut map = Map::new();
    for (name, node) in entries {
        let value = match node {
            DefaultNode::Leaf(DefaultLeaf::FirstModelOf { field, table }) => {
                let hardware = map.get(*field).and_then(Value::as_str).unwrap_or("");
                Value::String(table.first_model(hardware).to_string())
            }
            other => resolve_node(other, ctx, ids),
        };
        map.insert((*name).to_string(), value);
    }
    Value::Object(map)
}

fn apply_pattern(template: &str, n: u32) -> String {
    template
        .replace("${nn}", &format!("{n:02}"))
        .replace("${n}", &n.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct SeqIds(u32);

    impl IdGenerator for SeqIds {
        fn next_id(&mut self) -> String {
            self.0 += 1;
            format!("id-{:04}", self.0)
        }
    }

    #[test]
    fn test_pattern_placeholders() {
        assert_eq!(apply_pattern("Smartmeter ${n}", 3), "Smartmeter 3");
        assert_eq!(apply_pattern("SN-${nn}", 3), "SN-03");
        assert_eq!(apply_pattern("SN-${nn}", 12), "SN-12");
        assert_eq!(apply_pattern("plain", 7), "plain");
    }

    #[test]
    fn test_first_model_follows_sibling_hardware() {
        let template = DefaultNode::group(vec![
            ("HardwareType", DefaultNode::literal(json!("Janitza"))),
            (
                "HardwareModel",
                DefaultNode::first_model_of("HardwareType", EnumTable::EmsSmartmeterHardware),
            ),
        ]);
        let out = resolve_node(&template, InstanceContext::new(1), &mut SeqIds(0));
        assert_eq!(out["HardwareModel"], "UMG 96 PA");
    }

    #[test]
    fn test_first_model_unknown_hardware_is_empty() {
        let template = DefaultNode::group(vec![
            ("HardwareType", DefaultNode::literal(json!("Siemens"))),
            (
                "HardwareModel",
                DefaultNode::first_model_of("HardwareType", EnumTable::EmsSmartmeterHardware),
            ),
        ]);
        let out = resolve_node(&template, InstanceContext::new(1), &mut SeqIds(0));
        assert_eq!(out["HardwareModel"], "");
    }

    #[test]
    fn test_smartmeter_instance_is_fully_populated() {
        let mut ids = SeqIds(0);
        let out =
            create_instance_with(ComponentKind::Smartmeter, InstanceContext::new(2), &mut ids);

        assert_eq!(out["Name"], "Smartmeter 2");
        assert_eq!(out["Type"], "Smartmeter");
        assert_eq!(out["HardwareType"], "CarloGavazzi");
        assert_eq!(out["HardwareModel"], "EM24");
        assert_eq!(out["Guid"], "id-0001");
        assert_eq!(out["Config"]["Usecase"], "GridConnectionPointControl");
        assert_eq!(out["Config"]["Port"], 502);
    }

    #[test]
    fn test_battery_inverter_defaults_are_terra() {
        let mut ids = SeqIds(0);
        let out =
            create_instance_with(ComponentKind::BatteryInverter, InstanceContext::new(1), &mut ids);

        assert_eq!(out["Inverter"]["Type"], "TerraInverter");
        assert_eq!(out["Inverter"]["Config"]["NominalInverterPower"], 125000);
        assert_eq!(out["Battery"]["Type"], "TerraBattery");
        assert_eq!(out["Battery"]["Config"]["BatteryCabinetModuleCount"], 6);
        assert_eq!(out["Modbus"]["Type"], "TerraModbus");
        // each generated identifier is distinct
        assert_ne!(out["Inverter"]["Guid"], out["Battery"]["Guid"]);
        assert_ne!(out["Battery"]["Guid"], out["Modbus"]["Guid"]);
    }

    #[test]
    fn test_system_serial_number_is_zero_padded() {
        let out = create_instance_with(ComponentKind::System, InstanceContext::new(4), &mut SeqIds(0));
        assert_eq!(out["SerialNumber"], "SN-04");
        assert_eq!(out["BatteryBalancing"]["PreemptiveMode"], json!(["0", "Off"]));
        assert_eq!(out["BatteryBalancing"]["PreemptiveMaxGridChargePower"], "30kW");
        assert_eq!(out["ExternalControl"]["FallbackMode"], json!(["0", "Standby"]));
    }

    #[test]
    fn test_real_uuid_generator_parses() {
        let out = create_instance(ComponentKind::SlaveLocalUM, InstanceContext::new(1));
        let guid = out["Guid"].as_str().unwrap();
        assert!(uuid::Uuid::parse_str(guid).is_ok());
    }
}
