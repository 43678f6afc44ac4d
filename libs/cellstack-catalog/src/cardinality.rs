//! Per-unit equipment count bounds

use crate::components::{ComponentKind, UnitId};

/// How many components of one kind a unit's equipment list may hold.
/// `None` on either side leaves it unbounded.
#[derive(Debug, Clone, Copy)]
pub struct CardinalityBound {
    pub unit: UnitId,
    pub kind: ComponentKind,
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl CardinalityBound {
    /// Exactly-once bounds collapse to a single issue rather than separate
    /// too-few/too-many messages, so callers can phrase them specially.
    pub fn is_exactly_one(&self) -> bool {
        self.min == Some(1) && self.max == Some(1)
    }
}

pub const CARDINALITY_BOUNDS: &[CardinalityBound] = &[
    CardinalityBound {
        unit: UnitId::Ems,
        kind: ComponentKind::Smartmeter,
        min: None,
        max: Some(10),
    },
    CardinalityBound {
        unit: UnitId::Ems,
        kind: ComponentKind::SlaveLocalUM,
        min: Some(1),
        max: Some(1),
    },
    CardinalityBound {
        unit: UnitId::Ems,
        kind: ComponentKind::SlaveRemoteUM,
        min: None,
        max: Some(9),
    },
    CardinalityBound {
        unit: UnitId::Main,
        kind: ComponentKind::SmartmeterMain,
        min: Some(1),
        max: Some(1),
    },
    CardinalityBound {
        unit: UnitId::Main,
        kind: ComponentKind::BatteryInverter,
        min: Some(1),
        max: None,
    },
];

/// The bounds applying to one unit.
pub fn bounds_for(unit: UnitId) -> impl Iterator<Item = &'static CardinalityBound> {
    CARDINALITY_BOUNDS.iter().filter(move |bound| bound.unit == unit)
}
