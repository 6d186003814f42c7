//! Sluice chamber control: gates, valve rows, signals and the pause protocol.
//!
//! # Architecture
//!
//! ```text
//! Sluice ── left Door ──┬─ inside / outside TrafficLight
//!        │              └─ bottom / middle / top ValveRow
//!        └─ right Door ── (same)
//!                 │
//!                 ▼
//!           &dyn LockHardware
//! ```
//!
//! - [`Sluice`] orchestrates raising, lowering and vessel passage, and owns the
//!   chamber-level pause flag and the macro-operation to resume.
//! - [`Door`] opens and closes one gate, keeps its signals red while the gate
//!   moves, and freezes/resumes its own motion and valves.
//! - [`TrafficLight`] and [`ValveRow`] are thin wrappers over the hardware.
//!
//! Every operation returns [`ControlResult`]. Failures travel back up the
//! call chain unchanged; nothing is retried inside the controller.
//!
//! # Pausing
//!
//! An emergency stop is an [`InterruptRequest`] carried on an
//! [`InterruptLine`]. Another thread may raise it at any time; polling loops
//! observe it each iteration, freeze in place and return
//! [`ControlError::InterruptReceived`]. [`Sluice::pass_interrupt`] with
//! [`InterruptRequest::Resume`] picks the frozen operation back up.

pub mod door;
pub mod error;
pub mod interrupt;
pub mod poll;
pub mod saved;
pub mod sluice;
pub mod traffic_light;
pub mod valve_row;

pub use door::Door;
pub use error::{ControlError, ControlResult};
pub use interrupt::{InterruptLine, InterruptRequest};
pub use poll::{PollPolicy, Poller};
pub use saved::SavedDoorState;
pub use sluice::Sluice;
pub use traffic_light::TrafficLight;
pub use valve_row::ValveRow;
