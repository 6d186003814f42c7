//! Chamber water level.

use core::fmt;

/// Water level in the chamber, as reported by the level sensors.
///
/// The five real levels are ordered from low to high; `Error` means the
/// sensors gave no usable reading and has no rank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum WaterLevel {
    Low,
    BelowValve2,
    AboveValve2,
    AboveValve3,
    High,
    Error,
}

impl WaterLevel {
    /// Real levels, low first.
    pub const LEVELS: [WaterLevel; 5] = [
        WaterLevel::Low,
        WaterLevel::BelowValve2,
        WaterLevel::AboveValve2,
        WaterLevel::AboveValve3,
        WaterLevel::High,
    ];

    /// Position in [`WaterLevel::LEVELS`], `None` for `Error`.
    pub fn rank(self) -> Option<usize> {
        Self::LEVELS.iter().position(|level| *level == self)
    }

    /// Level at `rank`, `None` past the top.
    pub fn from_rank(rank: usize) -> Option<Self> {
        Self::LEVELS.get(rank).copied()
    }

    pub fn is_error(self) -> bool {
        self == WaterLevel::Error
    }
}

impl fmt::Display for WaterLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WaterLevel::Low => "low",
            WaterLevel::BelowValve2 => "below-valve-2",
            WaterLevel::AboveValve2 => "above-valve-2",
            WaterLevel::AboveValve3 => "above-valve-3",
            WaterLevel::High => "high",
            WaterLevel::Error => "error",
        };
        f.write_str(name)
    }
}
