//! Component catalog
//!
//! Every installable component kind, with its field tree and its defaults
//! template. The kind set is closed: equipment lists in the document carry a
//! `Type` tag that must parse to a [`ComponentKind`], and an unknown tag is a
//! validation issue, not a panic.

use crate::defaults::DefaultNode;
use crate::enums::EnumTable;
use crate::error::CatalogError;
use crate::fields::{FieldGroup, FieldKind, FieldNode, NumberBounds};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;

// ============================================================================
// Component kinds
// ============================================================================

/// Every component kind the catalog defines. Equipment kinds live in unit
/// equipment lists; `System` and `ModularPlc` are plant-wide singletons
/// addressed by fixed document paths.
///
/// Variant names are exactly the `Type` tags in the document, so serde
/// round-trips a kind as its tag string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    Smartmeter,
    SlaveLocalUM,
    SlaveRemoteUM,
    SmartmeterMain,
    BatteryInverter,
    System,
    ModularPlc,
}

impl ComponentKind {
    pub fn all() -> &'static [ComponentKind] {
        &[
            ComponentKind::Smartmeter,
            ComponentKind::SlaveLocalUM,
            ComponentKind::SlaveRemoteUM,
            ComponentKind::SmartmeterMain,
            ComponentKind::BatteryInverter,
            ComponentKind::System,
            ComponentKind::ModularPlc,
        ]
    }

    /// The `Type` tag this kind carries in the document.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Smartmeter => "Smartmeter",
            ComponentKind::SlaveLocalUM => "SlaveLocalUM",
            ComponentKind::SlaveRemoteUM => "SlaveRemoteUM",
            ComponentKind::SmartmeterMain => "SmartmeterMain",
            ComponentKind::BatteryInverter => "BatteryInverter",
            ComponentKind::System => "System",
            ComponentKind::ModularPlc => "ModularPlc",
        }
    }

    pub fn try_parse(tag: &str) -> Option<ComponentKind> {
        ComponentKind::all().iter().copied().find(|kind| kind.as_str() == tag)
    }

    /// True for kinds that live in a unit's equipment list.
    pub fn is_equipment(&self) -> bool {
        !matches!(self, ComponentKind::System | ComponentKind::ModularPlc)
    }

    /// This kind's field tree.
    pub fn fields(&self) -> &'static FieldGroup {
        match self {
            ComponentKind::Smartmeter => &SMARTMETER_FIELDS,
            ComponentKind::SlaveLocalUM => &SLAVE_LOCAL_FIELDS,
            ComponentKind::SlaveRemoteUM => &SLAVE_REMOTE_FIELDS,
            ComponentKind::SmartmeterMain => &SMARTMETER_MAIN_FIELDS,
            ComponentKind::BatteryInverter => &BATTERY_INVERTER_FIELDS,
            ComponentKind::System => &SYSTEM_FIELDS,
            ComponentKind::ModularPlc => &MODULAR_PLC_FIELDS,
        }
    }

    /// This kind's defaults template, mirroring [`fields`](Self::fields).
    pub fn defaults(&self) -> &'static DefaultNode {
        match self {
            ComponentKind::Smartmeter => &SMARTMETER_DEFAULTS,
            ComponentKind::SlaveLocalUM => &SLAVE_LOCAL_DEFAULTS,
            ComponentKind::SlaveRemoteUM => &SLAVE_REMOTE_DEFAULTS,
            ComponentKind::SmartmeterMain => &SMARTMETER_MAIN_DEFAULTS,
            ComponentKind::BatteryInverter => &BATTERY_INVERTER_DEFAULTS,
            ComponentKind::System => &SYSTEM_DEFAULTS,
            ComponentKind::ModularPlc => &MODULAR_PLC_DEFAULTS,
        }
    }
}

impl FromStr for ComponentKind {
    type Err = CatalogError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        ComponentKind::try_parse(tag).ok_or_else(|| CatalogError::UnknownComponent(tag.to_string()))
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Units
// ============================================================================

/// The two equipment-bearing units of a plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitId {
    Ems,
    Main,
}

impl UnitId {
    pub fn all() -> &'static [UnitId] {
        &[UnitId::Ems, UnitId::Main]
    }

    /// The unit's key under `Units` in the document.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitId::Ems => "Ems",
            UnitId::Main => "Main",
        }
    }

    pub fn try_parse(name: &str) -> Option<UnitId> {
        UnitId::all().iter().copied().find(|unit| unit.as_str() == name)
    }

    /// Equipment kinds this unit's list accepts.
    pub fn equipment_kinds(&self) -> &'static [ComponentKind] {
        match self {
            UnitId::Ems => &[
                ComponentKind::Smartmeter,
                ComponentKind::SlaveLocalUM,
                ComponentKind::SlaveRemoteUM,
            ],
            UnitId::Main => &[ComponentKind::SmartmeterMain, ComponentKind::BatteryInverter],
        }
    }

    pub fn accepts(&self, kind: ComponentKind) -> bool {
        self.equipment_kinds().contains(&kind)
    }
}

impl FromStr for UnitId {
    type Err = CatalogError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        UnitId::try_parse(name).ok_or_else(|| CatalogError::UnknownUnit(name.to_string()))
    }
}

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Field trees
// ============================================================================

static SMARTMETER_FIELDS: Lazy<FieldGroup> = Lazy::new(|| {
    vec![
        ("Name", FieldNode::field(FieldKind::Text)),
        ("Displayname", FieldNode::field(FieldKind::Text)),
        ("Type", FieldNode::field(FieldKind::Const("Smartmeter"))),
        ("HardwareType", FieldNode::field(FieldKind::EnumRef(EnumTable::EmsSmartmeterHardware))),
        ("HardwareModel", FieldNode::field(FieldKind::Text)),
        ("Guid", FieldNode::locked_field(FieldKind::Uuid)),
        (
            "Config",
            FieldNode::group(vec![
                ("Usecase", FieldNode::field(FieldKind::EnumRef(EnumTable::SmartmeterUsecases))),
                ("Port", FieldNode::field(FieldKind::Number(NumberBounds::int(1.0, 65535.0)))),
            ]),
        ),
    ]
});

static SLAVE_LOCAL_FIELDS: Lazy<FieldGroup> = Lazy::new(|| {
    vec![
        ("Name", FieldNode::field(FieldKind::Text)),
        ("Displayname", FieldNode::field(FieldKind::Text)),
        ("Type", FieldNode::field(FieldKind::Const("SlaveLocalUM"))),
        ("Guid", FieldNode::locked_field(FieldKind::Uuid)),
    ]
});

static SLAVE_REMOTE_FIELDS: Lazy<FieldGroup> = Lazy::new(|| {
    vec![
        ("Name", FieldNode::field(FieldKind::Text)),
        ("Displayname", FieldNode::field(FieldKind::Text)),
        ("Type", FieldNode::field(FieldKind::Const("SlaveRemoteUM"))),
        ("Ip", FieldNode::field(FieldKind::Ipv4)),
        ("Guid", FieldNode::locked_field(FieldKind::Uuid)),
    ]
});

static SMARTMETER_MAIN_FIELDS: Lazy<FieldGroup> = Lazy::new(|| {
    vec![
        ("Name", FieldNode::field(FieldKind::Text)),
        ("Displayname", FieldNode::field(FieldKind::Text)),
        ("Type", FieldNode::field(FieldKind::Const("SmartmeterMain"))),
        ("HardwareType", FieldNode::field(FieldKind::EnumRef(EnumTable::MainSmartmeterHardware))),
        ("HardwareModel", FieldNode::field(FieldKind::Text)),
        ("Guid", FieldNode::locked_field(FieldKind::Uuid)),
    ]
});

static BATTERY_INVERTER_FIELDS: Lazy<FieldGroup> = Lazy::new(|| {
    vec![
        ("Name", FieldNode::field(FieldKind::Text)),
        ("Type", FieldNode::field(FieldKind::Const("BatteryInverter"))),
        (
            "Inverter",
            FieldNode::group(vec![
                ("Name", FieldNode::field(FieldKind::Text)),
                ("Type", FieldNode::field(FieldKind::EnumRef(EnumTable::InverterTypes))),
                ("Guid", FieldNode::locked_field(FieldKind::Uuid)),
                (
                    "Config",
                    FieldNode::group(vec![
                        (
                            "InverterType",
                            FieldNode::field(FieldKind::EnumRef(EnumTable::InverterVendors)),
                        ),
                        (
                            "NominalInverterPower",
                            FieldNode::field(FieldKind::Number(NumberBounds::int(1.0, 125_000.0))),
                        ),
                        ("Ip", FieldNode::field(FieldKind::Ipv4)),
                    ]),
                ),
            ]),
        ),
        (
            "Battery",
            FieldNode::group(vec![
                ("Name", FieldNode::field(FieldKind::Text)),
                ("Type", FieldNode::field(FieldKind::EnumRef(EnumTable::BatteryTypes))),
                ("Guid", FieldNode::locked_field(FieldKind::Uuid)),
                (
                    "Config",
                    FieldNode::group(vec![
                        (
                            "BatteryType",
                            FieldNode::field(FieldKind::EnumRef(EnumTable::BatteryVendors)),
                        ),
                        (
                            "BatteryCabinetCount",
                            FieldNode::field(FieldKind::Number(NumberBounds::int(1.0, 5.0))),
                        ),
                        (
                            "BatteryCabinetModuleCount",
                            FieldNode::field(FieldKind::Number(NumberBounds::int(1.0, 25.0))),
                        ),
                        ("Ip", FieldNode::field(FieldKind::Ipv4)),
                    ]),
                ),
            ]),
        ),
        (
            // Present on Terra hardware, absent on Blokk; the family rules
            // decide which, so the group itself is optional.
            "Modbus",
            FieldNode::optional_group(vec![
                ("Name", FieldNode::field(FieldKind::Text)),
                ("Type", FieldNode::field(FieldKind::EnumRef(EnumTable::ModbusTypes))),
                ("Guid", FieldNode::locked_field(FieldKind::Uuid)),
                (
                    "Config",
                    FieldNode::group(vec![("Ip", FieldNode::field(FieldKind::Ipv4))]),
                ),
            ]),
        ),
    ]
});

static SYSTEM_FIELDS: Lazy<FieldGroup> = Lazy::new(|| {
    vec![
        ("SerialNumber", FieldNode::field(FieldKind::Text)),
        (
            "BatteryBalancing",
            FieldNode::group(vec![
                (
                    "PreemptiveMode",
                    FieldNode::field(FieldKind::IndexString(EnumTable::BatteryBalancingModes)),
                ),
                (
                    "PreemptiveDaysToEnable",
                    FieldNode::field(FieldKind::Number(NumberBounds::int(0.0, 365.0))),
                ),
                (
                    "PreemptiveMaxGridChargePower",
                    FieldNode::field(FieldKind::NumberWithUnit {
                        unit: "kW",
                        bounds: NumberBounds::float(0.0, 50.0),
                    }),
                ),
                (
                    "ForcedDaysToEnable",
                    FieldNode::field(FieldKind::Number(NumberBounds::int(0.0, 365.0))),
                ),
                (
                    "ForcedMaxGridChargePowerPerInverter",
                    FieldNode::field(FieldKind::NumberWithUnit {
                        unit: "kW",
                        bounds: NumberBounds::float(0.0, 50.0),
                    }),
                ),
            ]),
        ),
        (
            "ExternalControl",
            FieldNode::group(vec![(
                "FallbackMode",
                FieldNode::field(FieldKind::IndexString(EnumTable::ExternalFallbackModes)),
            )]),
        ),
    ]
});

static MODULAR_PLC_FIELDS: Lazy<FieldGroup> = Lazy::new(|| {
    vec![
        ("Version", FieldNode::field(FieldKind::EnumRef(EnumTable::PlcVersions))),
        (
            "Hardwarevariante",
            FieldNode::field(FieldKind::EnumRef(EnumTable::HardwareVariants)),
        ),
    ]
});

// ============================================================================
// Defaults templates
// ============================================================================

static SMARTMETER_DEFAULTS: Lazy<DefaultNode> = Lazy::new(|| {
    DefaultNode::group(vec![
        ("Name", DefaultNode::pattern("Smartmeter ${n}")),
        ("Displayname", DefaultNode::pattern("Smartmeter ${n}")),
        ("Type", DefaultNode::literal(json!("Smartmeter"))),
        ("HardwareType", DefaultNode::literal(json!("CarloGavazzi"))),
        (
            "HardwareModel",
            DefaultNode::first_model_of("HardwareType", EnumTable::EmsSmartmeterHardware),
        ),
        ("Guid", DefaultNode::uuid()),
        (
            "Config",
            DefaultNode::group(vec![
                ("Usecase", DefaultNode::literal(json!("GridConnectionPointControl"))),
                ("Port", DefaultNode::literal(json!(502))),
            ]),
        ),
    ])
});

static SLAVE_LOCAL_DEFAULTS: Lazy<DefaultNode> = Lazy::new(|| {
    DefaultNode::group(vec![
        ("Name", DefaultNode::pattern("Slave ${n}")),
        ("Displayname", DefaultNode::pattern("Slave ${n}")),
        ("Type", DefaultNode::literal(json!("SlaveLocalUM"))),
        ("Guid", DefaultNode::uuid()),
    ])
});

static SLAVE_REMOTE_DEFAULTS: Lazy<DefaultNode> = Lazy::new(|| {
    DefaultNode::group(vec![
        ("Name", DefaultNode::pattern("Slave ${n}")),
        ("Displayname", DefaultNode::pattern("Slave ${n}")),
        ("Type", DefaultNode::literal(json!("SlaveRemoteUM"))),
        ("Ip", DefaultNode::literal(json!("192.168.0.10"))),
        ("Guid", DefaultNode::uuid()),
    ])
});

static SMARTMETER_MAIN_DEFAULTS: Lazy<DefaultNode> = Lazy::new(|| {
    DefaultNode::group(vec![
        ("Name", DefaultNode::literal(json!("Smartmeter"))),
        ("Displayname", DefaultNode::literal(json!("Local Power Measurement"))),
        ("Type", DefaultNode::literal(json!("SmartmeterMain"))),
        ("HardwareType", DefaultNode::literal(json!("Virtual"))),
        (
            "HardwareModel",
            DefaultNode::first_model_of("HardwareType", EnumTable::MainSmartmeterHardware),
        ),
        ("Guid", DefaultNode::uuid()),
    ])
});

static BATTERY_INVERTER_DEFAULTS: Lazy<DefaultNode> = Lazy::new(|| {
    DefaultNode::group(vec![
        ("Name", DefaultNode::pattern("BatteryInverter ${n}")),
        ("Type", DefaultNode::literal(json!("BatteryInverter"))),
        (
            "Inverter",
            DefaultNode::group(vec![
                ("Name", DefaultNode::pattern("Inverter ${n}")),
                ("Type", DefaultNode::literal(json!("TerraInverter"))),
                ("Guid", DefaultNode::uuid()),
                (
                    "Config",
                    DefaultNode::group(vec![
                        ("InverterType", DefaultNode::literal(json!("SofarTerra"))),
                        ("NominalInverterPower", DefaultNode::literal(json!(125_000))),
                        ("Ip", DefaultNode::literal(json!("192.168.1.10"))),
                    ]),
                ),
            ]),
        ),
        (
            "Battery",
            DefaultNode::group(vec![
                ("Name", DefaultNode::pattern("Battery ${n}")),
                ("Type", DefaultNode::literal(json!("TerraBattery"))),
                ("Guid", DefaultNode::uuid()),
                (
                    "Config",
                    DefaultNode::group(vec![
                        ("BatteryType", DefaultNode::literal(json!("SofarTerra"))),
                        ("BatteryCabinetCount", DefaultNode::literal(json!(1))),
                        ("BatteryCabinetModuleCount", DefaultNode::literal(json!(6))),
                        ("Ip", DefaultNode::literal(json!("192.168.1.10"))),
                    ]),
                ),
            ]),
        ),
        (
            "Modbus",
            DefaultNode::group(vec![
                ("Name", DefaultNode::literal(json!("TerraModbus"))),
                ("Type", DefaultNode::literal(json!("TerraModbus"))),
                ("Guid", DefaultNode::uuid()),
                (
                    "Config",
                    DefaultNode::group(vec![("Ip", DefaultNode::literal(json!("192.168.1.10")))]),
                ),
            ]),
        ),
    ])
});

static SYSTEM_DEFAULTS: Lazy<DefaultNode> = Lazy::new(|| {
    DefaultNode::group(vec![
        ("SerialNumber", DefaultNode::pattern("SN-${nn}")),
        (
            "BatteryBalancing",
            DefaultNode::group(vec![
                ("PreemptiveMode", DefaultNode::literal(json!(["0", "Off"]))),
                ("PreemptiveDaysToEnable", DefaultNode::literal(json!(14))),
                ("PreemptiveMaxGridChargePower", DefaultNode::literal(json!("30kW"))),
                ("ForcedDaysToEnable", DefaultNode::literal(json!(30))),
                ("ForcedMaxGridChargePowerPerInverter", DefaultNode::literal(json!("10kW"))),
            ]),
        ),
        (
            "ExternalControl",
            DefaultNode::group(vec![(
                "FallbackMode",
                DefaultNode::literal(json!(["0", "Standby"])),
            )]),
        ),
    ])
});

static MODULAR_PLC_DEFAULTS: Lazy<DefaultNode> = Lazy::new(|| {
    DefaultNode::group(vec![
        ("Version", DefaultNode::literal(json!("0.0.3"))),
        ("Hardwarevariante", DefaultNode::literal(json!("Terra"))),
    ])
});
