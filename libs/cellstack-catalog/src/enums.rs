//! Enumeration tables
//!
//! Every closed value set referenced by a field definition lives here as a
//! static table, addressed through [`EnumTable`]. Field definitions hold an
//! `EnumTable` value instead of their own string lists, so a table is defined
//! once and every consumer (defaults resolver, structural checks, cross rules)
//! reads the same data.
//!
//! Three table shapes exist:
//! - plain value lists (`values`),
//! - hardware-to-models maps (`models_for` / `first_model`), where the
//!   enumerated values are the map keys,
//! - indexed label pairs (`indexed`), stored in the document as a
//!   two-element `[index, label]` array.

// ============================================================================
// Plain value lists
// ============================================================================

const SMARTMETER_USECASES: &[&str] = &["Undefined", "GridConnectionPointControl"];

const INVERTER_TYPES: &[&str] = &["TerraInverter", "InverterKaco"];

const BATTERY_TYPES: &[&str] = &["TerraBattery", "BatteryPylontechM1xBms"];

const MODBUS_TYPES: &[&str] = &["TerraModbus"];

const INVERTER_VENDORS: &[&str] = &["SofarTerra", "Kaco"];

const BATTERY_VENDORS: &[&str] = &["SofarTerra", "PylontechM1C"];

const PLC_VERSIONS: &[&str] = &["0.0.1", "0.0.2", "0.0.3"];

const HARDWARE_VARIANTS: &[&str] = &["Terra", "BlokkV3"];

const MAIN_UNIT_TYPES: &[&str] = &["Terra", "Blokk"];

// ============================================================================
// Hardware-to-models maps
// ============================================================================

/// One row of a hardware map: a hardware make and the models it ships in.
#[derive(Debug, Clone, Copy)]
pub struct HardwareModels {
    pub hardware: &'static str,
    pub models: &'static [&'static str],
}

const EMS_SMARTMETER_MODELS: &[HardwareModels] = &[
    HardwareModels { hardware: "CarloGavazzi", models: &["EM24"] },
    HardwareModels { hardware: "Phoenix", models: &["EM375"] },
    HardwareModels { hardware: "Janitza", models: &["UMG 96 PA", "UMG 96 RM", "UMG 509 Pro"] },
    HardwareModels { hardware: "Beckhoff", models: &["El34x3"] },
    HardwareModels { hardware: "Virtual", models: &["Virtual"] },
];

const MAIN_SMARTMETER_MODELS: &[HardwareModels] = &[
    HardwareModels { hardware: "Virtual", models: &["Virtual"] },
    HardwareModels { hardware: "Beckhoff", models: &["El34x3"] },
];

// ============================================================================
// Indexed label pairs
// ============================================================================

/// One member of an indexed enumeration. The document stores the pair as a
/// two-element array of strings, e.g. `["1", "Preemptive"]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexedLabel {
    pub index: &'static str,
    pub label: &'static str,
}

const BATTERY_BALANCING_MODES: &[IndexedLabel] = &[
    IndexedLabel { index: "0", label: "Off" },
    IndexedLabel { index: "1", label: "Preemptive" },
    IndexedLabel { index: "2", label: "Forced" },
];

const EXTERNAL_FALLBACK_MODES: &[IndexedLabel] = &[
    IndexedLabel { index: "0", label: "Standby" },
    IndexedLabel { index: "1", label: "HoldLastSetpoint" },
    IndexedLabel { index: "2", label: "ZeroPower" },
];

// ============================================================================
// Table handle
// ============================================================================

/// Handle to one enumeration table. Field definitions carry this instead of
/// embedding value lists of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumTable {
    EmsSmartmeterHardware,
    MainSmartmeterHardware,
    SmartmeterUsecases,
    InverterTypes,
    BatteryTypes,
    ModbusTypes,
    InverterVendors,
    BatteryVendors,
    PlcVersions,
    HardwareVariants,
    MainUnitTypes,
    BatteryBalancingModes,
    ExternalFallbackModes,
}

impl EnumTable {
    /// The member values of this table. For hardware maps these are the
    /// hardware makes; indexed tables have no plain values (use [`indexed`]).
    ///
    /// [`indexed`]: EnumTable::indexed
    pub fn values(&self) -> Vec<&'static str> {
        match self {
            EnumTable::EmsSmartmeterHardware => {
                EMS_SMARTMETER_MODELS.iter().map(|row| row.hardware).collect()
            }
            EnumTable::MainSmartmeterHardware => {
                MAIN_SMARTMETER_MODELS.iter().map(|row| row.hardware).collect()
            }
            EnumTable::SmartmeterUsecases => SMARTMETER_USECASES.to_vec(),
            EnumTable::InverterTypes => INVERTER_TYPES.to_vec(),
            EnumTable::BatteryTypes => BATTERY_TYPES.to_vec(),
            EnumTable::ModbusTypes => MODBUS_TYPES.to_vec(),
            EnumTable::InverterVendors => INVERTER_VENDORS.to_vec(),
            EnumTable::BatteryVendors => BATTERY_VENDORS.to_vec(),
            EnumTable::PlcVersions => PLC_VERSIONS.to_vec(),
            EnumTable::HardwareVariants => HARDWARE_VARIANTS.to_vec(),
            EnumTable::MainUnitTypes => MAIN_UNIT_TYPES.to_vec(),
            EnumTable::BatteryBalancingModes | EnumTable::ExternalFallbackModes => Vec::new(),
        }
    }

    /// True iff `value` is a member of this table.
    pub fn contains(&self, value: &str) -> bool {
        self.values().contains(&value)
    }

    /// The indexed members of this table, or `None` for tables that are not
    /// index/label pairs.
    pub fn indexed(&self) -> Option<&'static [IndexedLabel]> {
        match self {
            EnumTable::BatteryBalancingModes => Some(BATTERY_BALANCING_MODES),
            EnumTable::ExternalFallbackModes => Some(EXTERNAL_FALLBACK_MODES),
            _ => None,
        }
    }

    /// The models a hardware make ships in, or `None` when this table is not
    /// a hardware map or does not know the make.
    pub fn models_for(&self, hardware: &str) -> Option<&'static [&'static str]> {
        let rows = match self {
            EnumTable::EmsSmartmeterHardware => EMS_SMARTMETER_MODELS,
            EnumTable::MainSmartmeterHardware => MAIN_SMARTMETER_MODELS,
            _ => return None,
        };
        rows.iter()
            .find(|row| row.hardware == hardware)
            .map(|row| row.models)
    }

    /// The first listed model for a hardware make, used by the defaults
    /// resolver. Empty string when the make (or the table) has no models.
    pub fn first_model(&self, hardware: &str) -> &'static str {
        self.models_for(hardware)
            .and_then(|models| models.first().copied())
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hardware_map_keys_are_the_values() {
        let values = EnumTable::EmsSmartmeterHardware.values();
        assert_eq!(values, vec!["CarloGavazzi", "Phoenix", "Janitza", "Beckhoff", "Virtual"]);
        assert!(EnumTable::EmsSmartmeterHardware.contains("Janitza"));
        assert!(!EnumTable::EmsSmartmeterHardware.contains("Siemens"));
    }

    #[test]
    fn test_models_for_known_and_unknown_hardware() {
        assert_eq!(
            EnumTable::EmsSmartmeterHardware.models_for("Janitza"),
            Some(["UMG 96 PA", "UMG 96 RM", "UMG 509 Pro"].as_slice())
        );
        assert_eq!(EnumTable::EmsSmartmeterHardware.models_for("Siemens"), None);
        assert_eq!(EnumTable::InverterTypes.models_for("CarloGavazzi"), None);
    }

    #[test]
    fn test_first_model_falls_back_to_empty() {
        assert_eq!(EnumTable::EmsSmartmeterHardware.first_model("CarloGavazzi"), "EM24");
        assert_eq!(EnumTable::MainSmartmeterHardware.first_model("Virtual"), "Virtual");
        assert_eq!(EnumTable::EmsSmartmeterHardware.first_model("Siemens"), "");
        assert_eq!(EnumTable::PlcVersions.first_model("0.0.3"), "");
    }

    #[test]
    fn test_indexed_tables_have_pairs_not_values() {
        let modes = EnumTable::BatteryBalancingModes.indexed().unwrap();
        assert_eq!(modes[1], IndexedLabel { index: "1", label: "Preemptive" });
        assert!(EnumTable::BatteryBalancingModes.values().is_empty());
        assert!(EnumTable::PlcVersions.indexed().is_none());
    }

    #[test]
    fn test_main_hardware_is_a_subset_of_ems_hardware() {
        let ems = EnumTable::EmsSmartmeterHardware.values();
        for hardware in EnumTable::MainSmartmeterHardware.values() {
            assert!(ems.contains(&hardware));
        }
    }
}
