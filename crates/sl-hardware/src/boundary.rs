//! The trait the controller drives.

use sl_core::{DoorSide, DoorState, LightLocation, LightState, ValveRowPosition, WaterLevel};

use crate::status::LightCommandStatus;

/// Getter/setter surface of the lock installation.
///
/// Methods take `&self`: one instance is shared by every gate, signal and
/// valve row of a chamber, so implementations use interior mutability and
/// serialize concurrent calls themselves.
pub trait LockHardware: Send + Sync {
    /// Current state of a gate.
    fn door_state(&self, side: DoorSide) -> DoorState;

    /// Current chamber water level.
    fn water_level(&self) -> WaterLevel;

    /// Current aspect of a signal.
    fn light_state(&self, location: LightLocation) -> LightState;

    /// Start opening a gate. Returns the acknowledgement.
    fn open_door(&self, side: DoorSide) -> bool;

    /// Start closing a gate. Returns the acknowledgement.
    fn close_door(&self, side: DoorSide) -> bool;

    /// Halt the gate motor. Returns the acknowledgement.
    fn stop_door(&self, side: DoorSide) -> bool;

    /// Engage the gate lock. Returns the acknowledgement.
    fn lock_door(&self, side: DoorSide) -> bool;

    /// Release the gate lock. Returns the acknowledgement.
    fn unlock_door(&self, side: DoorSide) -> bool;

    /// Switch a signal to red.
    fn red_light(&self, location: LightLocation) -> LightCommandStatus;

    /// Switch a signal to green.
    fn green_light(&self, location: LightLocation) -> LightCommandStatus;

    /// Open a row of valves. Returns the acknowledgement.
    fn valve_open(&self, side: DoorSide, row: ValveRowPosition) -> bool;

    /// Close a row of valves. Returns the acknowledgement.
    fn valve_close(&self, side: DoorSide, row: ValveRowPosition) -> bool;

    /// Whether a row of valves is open.
    fn valve_is_open(&self, side: DoorSide, row: ValveRowPosition) -> bool;
}
