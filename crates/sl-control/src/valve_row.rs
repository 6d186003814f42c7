//! One rank of valves in a gate.

use sl_core::{DoorSide, ValveRowPosition};
use sl_hardware::LockHardware;

/// Pass-through to one valve row on one gate.
///
/// No local state and no validation: sequencing is the caller's job. A `false`
/// from [`ValveRow::open`] or [`ValveRow::close`] means the command was not
/// confirmed.
pub struct ValveRow<'a, H: LockHardware + ?Sized> {
    hw: &'a H,
    side: DoorSide,
    position: ValveRowPosition,
}

impl<'a, H: LockHardware + ?Sized> ValveRow<'a, H> {
    pub fn new(hw: &'a H, side: DoorSide, position: ValveRowPosition) -> Self {
        Self { hw, side, position }
    }

    pub fn side(&self) -> DoorSide {
        self.side
    }

    pub fn position(&self) -> ValveRowPosition {
        self.position
    }

    /// Open the row. Returns the acknowledgement.
    pub fn open(&self) -> bool {
        self.hw.valve_open(self.side, self.position)
    }

    /// Close the row. Returns the acknowledgement.
    pub fn close(&self) -> bool {
        self.hw.valve_close(self.side, self.position)
    }

    pub fn is_open(&self) -> bool {
        self.hw.valve_is_open(self.side, self.position)
    }
}
