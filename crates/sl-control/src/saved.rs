//! What a gate was doing when it was paused.

use sl_core::{DoorState, ValveRowPosition};

/// Per-gate record kept across a pause.
///
/// Live hardware state alone cannot tell a halted gate's direction, so the
/// direction is recorded when motion starts. Valve bits are recorded when a
/// pause closes the rows. The record is valid only while a pause is in
/// effect; it is reset when an operation finishes normally or a resume
/// consumes it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SavedDoorState {
    /// `Error` when nothing is saved.
    pub door_state: DoorState,
    pub top_valve_was_open: bool,
    pub middle_valve_was_open: bool,
    pub bottom_valve_was_open: bool,
}

impl Default for SavedDoorState {
    fn default() -> Self {
        Self {
            door_state: DoorState::Error,
            top_valve_was_open: false,
            middle_valve_was_open: false,
            bottom_valve_was_open: false,
        }
    }
}

impl SavedDoorState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_reset(&self) -> bool {
        *self == Self::default()
    }

    pub fn valve_was_open(&self, row: ValveRowPosition) -> bool {
        match row {
            ValveRowPosition::Bottom => self.bottom_valve_was_open,
            ValveRowPosition::Middle => self.middle_valve_was_open,
            ValveRowPosition::Top => self.top_valve_was_open,
        }
    }

    pub fn record_valve(&mut self, row: ValveRowPosition, was_open: bool) {
        match row {
            ValveRowPosition::Bottom => self.bottom_valve_was_open = was_open,
            ValveRowPosition::Middle => self.middle_valve_was_open = was_open,
            ValveRowPosition::Top => self.top_valve_was_open = was_open,
        }
    }

    /// Saved valve bits, bottom first.
    pub fn valve_bits(&self) -> [bool; 3] {
        ValveRowPosition::ALL.map(|row| self.valve_was_open(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_and_resets_to_error_with_no_valves() {
        let mut saved = SavedDoorState::default();
        assert!(saved.is_reset());

        saved.door_state = DoorState::Opening;
        saved.record_valve(ValveRowPosition::Middle, true);
        assert_eq!(saved.valve_bits(), [false, true, false]);
        assert!(!saved.is_reset());

        saved.reset();
        assert_eq!(saved.door_state, DoorState::Error);
        assert!(saved.is_reset());
    }
}
