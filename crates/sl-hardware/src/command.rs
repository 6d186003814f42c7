//! Record of commands issued to a backend.

use sl_core::{DoorSide, LightLocation, ValveRowPosition};

/// Category of a command, used for fault injection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommandKind {
    OpenDoor,
    CloseDoor,
    StopDoor,
    LockDoor,
    UnlockDoor,
    RedLight,
    GreenLight,
    ValveOpen,
    ValveClose,
}

/// A command as it was issued, with its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HardwareCommand {
    OpenDoor(DoorSide),
    CloseDoor(DoorSide),
    StopDoor(DoorSide),
    LockDoor(DoorSide),
    UnlockDoor(DoorSide),
    RedLight(LightLocation),
    GreenLight(LightLocation),
    ValveOpen(DoorSide, ValveRowPosition),
    ValveClose(DoorSide, ValveRowPosition),
}

impl HardwareCommand {
    pub fn kind(&self) -> CommandKind {
        match self {
            HardwareCommand::OpenDoor(_) => CommandKind::OpenDoor,
            HardwareCommand::CloseDoor(_) => CommandKind::CloseDoor,
            HardwareCommand::StopDoor(_) => CommandKind::StopDoor,
            HardwareCommand::LockDoor(_) => CommandKind::LockDoor,
            HardwareCommand::UnlockDoor(_) => CommandKind::UnlockDoor,
            HardwareCommand::RedLight(_) => CommandKind::RedLight,
            HardwareCommand::GreenLight(_) => CommandKind::GreenLight,
            HardwareCommand::ValveOpen(..) => CommandKind::ValveOpen,
            HardwareCommand::ValveClose(..) => CommandKind::ValveClose,
        }
    }

    /// Gate the command acts on.
    pub fn side(&self) -> DoorSide {
        match self {
            HardwareCommand::OpenDoor(side)
            | HardwareCommand::CloseDoor(side)
            | HardwareCommand::StopDoor(side)
            | HardwareCommand::LockDoor(side)
            | HardwareCommand::UnlockDoor(side)
            | HardwareCommand::ValveOpen(side, _)
            | HardwareCommand::ValveClose(side, _) => *side,
            HardwareCommand::RedLight(location) | HardwareCommand::GreenLight(location) => {
                location.side
            }
        }
    }

    /// True for commands that move a gate.
    pub fn is_door_motion(&self) -> bool {
        matches!(
            self,
            HardwareCommand::OpenDoor(_) | HardwareCommand::CloseDoor(_)
        )
    }
}
