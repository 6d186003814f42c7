//! Traffic signals at each gate.

use core::fmt;

use crate::door::DoorSide;
use crate::error::{CoreError, CoreResult};

/// Signal aspect as reported by the hardware.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LightState {
    RedOn,
    GreenOn,
    Error,
}

impl fmt::Display for LightState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LightState::RedOn => f.write_str("red"),
            LightState::GreenOn => f.write_str("green"),
            LightState::Error => f.write_str("error"),
        }
    }
}

/// Which way a signal faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LightFacing {
    /// Faces vessels inside the chamber (governs leaving).
    Inside,
    /// Faces vessels waiting outside the gate (governs entering).
    Outside,
}

/// A signal identified by gate and facing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LightLocation {
    pub side: DoorSide,
    pub facing: LightFacing,
}

impl LightLocation {
    pub const ALL: [LightLocation; 4] = [
        LightLocation::new(DoorSide::Left, LightFacing::Outside),
        LightLocation::new(DoorSide::Left, LightFacing::Inside),
        LightLocation::new(DoorSide::Right, LightFacing::Inside),
        LightLocation::new(DoorSide::Right, LightFacing::Outside),
    ];

    pub const fn new(side: DoorSide, facing: LightFacing) -> Self {
        Self { side, facing }
    }

    /// Signal number used by the device protocol, 1..=4 from left to right.
    pub fn number(self) -> u8 {
        match (self.side, self.facing) {
            (DoorSide::Left, LightFacing::Outside) => 1,
            (DoorSide::Left, LightFacing::Inside) => 2,
            (DoorSide::Right, LightFacing::Inside) => 3,
            (DoorSide::Right, LightFacing::Outside) => 4,
        }
    }

    pub fn from_number(number: u8) -> CoreResult<Self> {
        number
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(usize::from(i)).copied())
            .ok_or(CoreError::IndexOob {
                what: "light location",
                index: number,
            })
    }
}

impl fmt::Display for LightLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let facing = match self.facing {
            LightFacing::Inside => "inside",
            LightFacing::Outside => "outside",
        };
        write!(f, "{} {} ({})", self.side, facing, self.number())
    }
}
