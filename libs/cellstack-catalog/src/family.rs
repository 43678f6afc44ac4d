//! Hardware family classification
//!
//! The PLC hardware variant (`ModularPlc.Hardwarevariante`) decides which
//! inverter, battery and modbus sub-types a battery inverter block may carry.
//! Variant strings are classified into two families; everything that is not
//! Terra is treated as Blokk, so a new Blokk revision gates correctly without
//! a catalog change.

use serde::{Deserialize, Serialize};

/// The two hardware families a plant can be built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HardwareFamily {
    Terra,
    Blokk,
}

impl HardwareFamily {
    /// Classify a variant string. Any variant containing `terra`
    /// (case-insensitive) is Terra; everything else is Blokk.
    pub fn from_variant(variant: &str) -> Self {
        if variant.to_lowercase().contains("terra") {
            HardwareFamily::Terra
        } else {
            HardwareFamily::Blokk
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HardwareFamily::Terra => "Terra",
            HardwareFamily::Blokk => "Blokk",
        }
    }

    /// Inverter sub-types this family accepts.
    pub fn inverter_types(&self) -> &'static [&'static str] {
        match self {
            HardwareFamily::Terra => &["TerraInverter"],
            HardwareFamily::Blokk => &["InverterKaco"],
        }
    }

    /// Battery sub-types this family accepts.
    pub fn battery_types(&self) -> &'static [&'static str] {
        match self {
            HardwareFamily::Terra => &["TerraBattery"],
            HardwareFamily::Blokk => &["BatteryPylontechM1xBms"],
        }
    }

    /// Whether a battery inverter block must carry a `Modbus` group. Terra
    /// hardware speaks modbus through a dedicated bridge; Blokk hardware has
    /// no such device and the group must be absent.
    pub fn requires_modbus(&self) -> bool {
        matches!(self, HardwareFamily::Terra)
    }
}

impl std::fmt::Display for HardwareFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_classification() {
        assert_eq!(HardwareFamily::from_variant("Terra"), HardwareFamily::Terra);
        assert_eq!(HardwareFamily::from_variant("TERRA-2"), HardwareFamily::Terra);
        assert_eq!(HardwareFamily::from_variant("BlokkV3"), HardwareFamily::Blokk);
        // unknown variants fall to Blokk
        assert_eq!(HardwareFamily::from_variant("BlokkV4"), HardwareFamily::Blokk);
        assert_eq!(HardwareFamily::from_variant(""), HardwareFamily::Blokk);
    }

    #[test]
    fn test_family_gates_are_disjoint() {
        let terra = HardwareFamily::Terra;
        let blokk = HardwareFamily::Blokk;
        for t in terra.inverter_types() {
            assert!(!blokk.inverter_types().contains(t));
        }
        for t in terra.battery_types() {
            assert!(!blokk.battery_types().contains(t));
        }
        assert!(terra.requires_modbus());
        assert!(!blokk.requires_modbus());
    }
}
