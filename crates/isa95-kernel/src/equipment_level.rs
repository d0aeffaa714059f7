//! ISA-95 equipment element levels (`ISA95EquipmentElementLevelEnum`).
//!
//! The numeric codes are fixed by the standard. Code 10 is unassigned.

use isa95_space::EnumField;
use serde::{Deserialize, Serialize};

pub const EQUIPMENT_LEVEL_ENUM: &str = "ISA95EquipmentElementLevelEnum";

/// Level of an element in the role-based equipment hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum EquipmentLevel {
    /// Top level of a role-based equipment hierarchy: a collection of sites and areas.
    Enterprise = 0,
    /// Physical, geographical or logical grouping determined by the enterprise.
    Site = 1,
    /// Physical, geographical or logical grouping determined by the site.
    Area = 2,
    /// Lowest level scheduled for batch manufacturing (IEC 61512-1).
    ProcessCell = 3,
    /// Scheduled for batch and continuous manufacturing (IEC 61512-1).
    Unit = 4,
    /// Scheduled for discrete manufacturing.
    ProductionLine = 5,
    /// Scheduled for discrete manufacturing.
    WorkCell = 6,
    /// Lowest level scheduled for continuous manufacturing.
    ProductionUnit = 7,
    /// Material movement equipment.
    StorageZone = 8,
    /// Material movement equipment.
    StorageUnit = 9,
    /// Any element below a work centre; lowest level scheduled by Level 3.
    WorkUnit = 11,
    /// Engineered subdivision of a process cell, unit or equipment module.
    EquipmentModule = 12,
    /// Engineered subdivision of a process cell, unit, equipment module or
    /// control module.
    ControlModule = 13,
    /// Application-specific level; the actual level is carried by the
    /// `OtherValue` property of the hierarchy scope.
    Other = 14,
}

impl EquipmentLevel {
    pub const ALL: [EquipmentLevel; 14] = [
        EquipmentLevel::Enterprise,
        EquipmentLevel::Site,
        EquipmentLevel::Area,
        EquipmentLevel::ProcessCell,
        EquipmentLevel::Unit,
        EquipmentLevel::ProductionLine,
        EquipmentLevel::WorkCell,
        EquipmentLevel::ProductionUnit,
        EquipmentLevel::StorageZone,
        EquipmentLevel::StorageUnit,
        EquipmentLevel::WorkUnit,
        EquipmentLevel::EquipmentModule,
        EquipmentLevel::ControlModule,
        EquipmentLevel::Other,
    ];

    pub fn value(self) -> i32 {
        self as i32
    }

    pub fn name(self) -> &'static str {
        match self {
            EquipmentLevel::Enterprise => "Enterprise",
            EquipmentLevel::Site => "Site",
            EquipmentLevel::Area => "Area",
            EquipmentLevel::ProcessCell => "ProcessCell",
            EquipmentLevel::Unit => "Unit",
            EquipmentLevel::ProductionLine => "ProductionLine",
            EquipmentLevel::WorkCell => "WorkCell",
            EquipmentLevel::ProductionUnit => "ProductionUnit",
            EquipmentLevel::StorageZone => "StorageZone",
            EquipmentLevel::StorageUnit => "StorageUnit",
            EquipmentLevel::WorkUnit => "WorkUnit",
            EquipmentLevel::EquipmentModule => "EquipmentModule",
            EquipmentLevel::ControlModule => "ControlModule",
            EquipmentLevel::Other => "Other",
        }
    }

    pub fn from_value(value: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.value() == value)
    }

    /// The enumeration as registered with an address space.
    pub fn enum_fields() -> Vec<EnumField> {
        Self::ALL
            .into_iter()
            .map(|level| EnumField {
                name: level.name().to_string(),
                value: level.value(),
            })
            .collect()
    }
}

impl std::fmt::Display for EquipmentLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for EquipmentLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(value) = s.parse::<i32>() {
            return Self::from_value(value)
                .ok_or_else(|| format!("unassigned equipment level code: {value}"));
        }
        Self::ALL
            .into_iter()
            .find(|level| level.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown equipment level: {s}"))
    }
}
