//! Hardware boundary of the sluice controller.
//!
//! The controller never talks to devices directly. Every query and command goes
//! through [`LockHardware`], which a communication layer implements against the
//! real installation (or a remote simulator). This crate also ships
//! [`SimulatedLock`], an in-memory chamber used by tests and the CLI.
//!
//! # Contract
//!
//! - Queries return the device's view, including its own error values.
//! - Commands return an acknowledgement. `false` means the command was not
//!   confirmed; the caller decides what that means.
//! - Implementations serialize their own calls. The controller takes no locks
//!   and assumes each call is atomic and immediately consistent.

pub mod boundary;
pub mod command;
pub mod error;
pub mod sim;
pub mod status;

pub use boundary::LockHardware;
pub use command::{CommandKind, HardwareCommand};
pub use error::{HardwareError, HardwareResult};
pub use sim::{ChamberSnapshot, ReadKind, SimConfig, SimulatedLock};
pub use status::LightCommandStatus;
