//! Door-side vocabulary: which gate, what it reports, how it locks.

use core::fmt;
use core::str::FromStr;

use crate::error::{CoreError, CoreResult};
use crate::water::WaterLevel;

/// One end of the chamber.
///
/// The left gate faces the low water side and the right gate faces the high
/// water side. A gate may only be opened when the chamber level matches its side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DoorSide {
    Left,
    Right,
}

impl DoorSide {
    pub const ALL: [DoorSide; 2] = [DoorSide::Left, DoorSide::Right];

    /// The only water level at which this gate may be opened.
    pub fn operating_level(self) -> WaterLevel {
        match self {
            DoorSide::Left => WaterLevel::Low,
            DoorSide::Right => WaterLevel::High,
        }
    }

    /// Whether the gate may be opened with the chamber at `level`.
    pub fn permits_opening_at(self, level: WaterLevel) -> bool {
        level == self.operating_level()
    }

    /// Gate on the other end of the chamber.
    pub fn opposite(self) -> DoorSide {
        match self {
            DoorSide::Left => DoorSide::Right,
            DoorSide::Right => DoorSide::Left,
        }
    }

    /// Gate that serves a vessel when the chamber sits at `level`, if any.
    pub fn serving(level: WaterLevel) -> Option<DoorSide> {
        match level {
            WaterLevel::Low => Some(DoorSide::Left),
            WaterLevel::High => Some(DoorSide::Right),
            _ => None,
        }
    }
}

impl fmt::Display for DoorSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DoorSide::Left => f.write_str("left"),
            DoorSide::Right => f.write_str("right"),
        }
    }
}

/// State of a gate as reported by the hardware. Never asserted by the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DoorState {
    Open,
    Closed,
    Locked,
    Opening,
    Closing,
    Stopped,
    MotorDamaged,
    Error,
}

impl DoorState {
    /// Closed, with or without the lock engaged.
    pub fn is_shut(self) -> bool {
        matches!(self, DoorState::Closed | DoorState::Locked)
    }

    /// Travelling, or halted somewhere between open and closed.
    pub fn is_in_motion(self) -> bool {
        matches!(
            self,
            DoorState::Opening | DoorState::Closing | DoorState::Stopped
        )
    }
}

impl fmt::Display for DoorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DoorState::Open => "open",
            DoorState::Closed => "closed",
            DoorState::Locked => "locked",
            DoorState::Opening => "opening",
            DoorState::Closing => "closing",
            DoorState::Stopped => "stopped",
            DoorState::MotorDamaged => "motor-damaged",
            DoorState::Error => "error",
        };
        f.write_str(name)
    }
}

/// Locking behaviour of a gate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DoorType {
    /// Locks itself after closing and must be unlocked before opening.
    FastLock,
    #[default]
    NoLock,
}

impl FromStr for DoorType {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s {
            "fast-lock" | "fast_lock" | "fastlock" => Ok(DoorType::FastLock),
            "no-lock" | "no_lock" | "nolock" => Ok(DoorType::NoLock),
            other => Err(CoreError::UnknownName {
                what: "door type",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for DoorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DoorType::FastLock => f.write_str("fast-lock"),
            DoorType::NoLock => f.write_str("no-lock"),
        }
    }
}

/// Lock type of each gate, fixed for the lifetime of a chamber.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LockTypes {
    pub left: DoorType,
    pub right: DoorType,
}

impl LockTypes {
    /// Same lock type on both gates.
    pub fn uniform(kind: DoorType) -> Self {
        Self {
            left: kind,
            right: kind,
        }
    }

    pub fn for_side(&self, side: DoorSide) -> DoorType {
        match side {
            DoorSide::Left => self.left,
            DoorSide::Right => self.right,
        }
    }
}

/// Rank of water valves in a gate, numbered 1..=3 from the bottom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValveRowPosition {
    Bottom,
    Middle,
    Top,
}

impl ValveRowPosition {
    /// Bottom to top.
    pub const ALL: [ValveRowPosition; 3] = [
        ValveRowPosition::Bottom,
        ValveRowPosition::Middle,
        ValveRowPosition::Top,
    ];

    /// 1-based row number used by the device protocol.
    pub fn number(self) -> u8 {
        match self {
            ValveRowPosition::Bottom => 1,
            ValveRowPosition::Middle => 2,
            ValveRowPosition::Top => 3,
        }
    }

    pub fn from_number(number: u8) -> CoreResult<Self> {
        match number {
            1 => Ok(ValveRowPosition::Bottom),
            2 => Ok(ValveRowPosition::Middle),
            3 => Ok(ValveRowPosition::Top),
            index => Err(CoreError::IndexOob {
                what: "valve row",
                index,
            }),
        }
    }

    /// 0-based index, bottom first.
    pub fn index(self) -> usize {
        usize::from(self.number() - 1)
    }
}

impl fmt::Display for ValveRowPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValveRowPosition::Bottom => f.write_str("bottom"),
            ValveRowPosition::Middle => f.write_str("middle"),
            ValveRowPosition::Top => f.write_str("top"),
        }
    }
}
