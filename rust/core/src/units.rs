// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Document length units and their conversion to meters.
//!
//! glTF is defined in meters, so every coordinate coming out of the host
//! document is multiplied by [`UnitSystem::meters_per_unit`] before export.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Linear unit system of a host document.
///
/// The enum mirrors the units a CAD host can report. Only a handful of them
/// have a conversion factor; the rest export unscaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum UnitSystem {
    #[default]
    None,
    Microns,
    Millimeters,
    Centimeters,
    Meters,
    Kilometers,
    Inches,
    Feet,
    Yards,
    Miles,
    CustomUnits,
}

impl UnitSystem {
    /// Scale factor converting one document unit to meters.
    ///
    /// Units without an entry in the table (including `Microns` and
    /// `Kilometers`) fall back to 1.0, so their coordinates are written as-is.
    #[inline]
    pub fn meters_per_unit(self) -> f64 {
        match self {
            UnitSystem::None | UnitSystem::Meters => 1.0,
            UnitSystem::Millimeters => 0.001,
            UnitSystem::Centimeters => 0.01,
            UnitSystem::Inches => 0.0254,
            UnitSystem::Feet => 0.3048,
            _ => 1.0,
        }
    }

    /// Parse a unit name as written in document snapshots and config
    /// (`"mm"`, `"millimeters"`, `"ft"`, ...). Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        let unit = match name.trim().to_ascii_lowercase().as_str() {
            "none" | "" => UnitSystem::None,
            "um" | "micron" | "microns" => UnitSystem::Microns,
            "mm" | "millimeter" | "millimeters" => UnitSystem::Millimeters,
            "cm" | "centimeter" | "centimeters" => UnitSystem::Centimeters,
            "m" | "meter" | "meters" => UnitSystem::Meters,
            "km" | "kilometer" | "kilometers" => UnitSystem::Kilometers,
            "in" | "inch" | "inches" => UnitSystem::Inches,
            "ft" | "foot" | "feet" => UnitSystem::Feet,
            "yd" | "yard" | "yards" => UnitSystem::Yards,
            "mi" | "mile" | "miles" => UnitSystem::Miles,
            "custom" | "custom_units" => UnitSystem::CustomUnits,
            _ => return None,
        };
        Some(unit)
    }
}
