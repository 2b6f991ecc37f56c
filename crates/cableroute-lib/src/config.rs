//! Tunables for a routing run.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Anchors closer than this switch the finder into high-accuracy mode.
pub const HIGH_ACCURACY_THRESHOLD_M: f64 = 15.0;

/// Multiplier applied to inferred gap lengths.
pub const CONTINGENCY_FACTOR: f64 = 1.20;

/// Length units understood by the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthUnit {
    Millimetres,
    #[default]
    Metres,
    Feet,
}

impl LengthUnit {
    pub fn metres_per_unit(self) -> f64 {
        match self {
            LengthUnit::Millimetres => 0.001,
            LengthUnit::Metres => 1.0,
            LengthUnit::Feet => 0.3048,
        }
    }

    /// Convert `value` expressed in `self` into `target`.
    pub fn convert(self, value: f64, target: LengthUnit) -> f64 {
        if self == target {
            return value;
        }
        value * self.metres_per_unit() / target.metres_per_unit()
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            LengthUnit::Millimetres => "mm",
            LengthUnit::Metres => "m",
            LengthUnit::Feet => "ft",
        };
        f.write_str(value)
    }
}

impl FromStr for LengthUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mm" | "millimetre" | "millimetres" | "millimeter" | "millimeters" => {
                Ok(LengthUnit::Millimetres)
            }
            "m" | "metre" | "metres" | "meter" | "meters" => Ok(LengthUnit::Metres),
            "ft" | "foot" | "feet" => Ok(LengthUnit::Feet),
            other => Err(format!("unknown length unit '{other}' (expected mm, m or ft)")),
        }
    }
}

/// Settings applied to every cable in a batch.
#[derive(Debug, Clone, Serialize)]
pub struct RouteConfig {
    /// Unit of element lengths and coordinates in the project file.
    pub native_unit: LengthUnit,
    /// Unit of the lengths written to the report.
    pub display_unit: LengthUnit,
    /// Anchor separation, in metres, below which high accuracy is used.
    pub high_accuracy_threshold_m: f64,
    /// Multiplier applied to the virtual (unsupported) length.
    pub contingency_factor: f64,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            native_unit: LengthUnit::Metres,
            display_unit: LengthUnit::Metres,
            high_accuracy_threshold_m: HIGH_ACCURACY_THRESHOLD_M,
            contingency_factor: CONTINGENCY_FACTOR,
        }
    }
}

impl RouteConfig {
    /// High-accuracy threshold expressed in the native unit.
    pub fn high_accuracy_threshold(&self) -> f64 {
        LengthUnit::Metres.convert(self.high_accuracy_threshold_m, self.native_unit)
    }

    /// Convert a native length into the report unit.
    pub fn to_display(&self, value: f64) -> f64 {
        self.native_unit.convert(value, self.display_unit)
    }
}
