//! Error types for hardware setup.

use thiserror::Error;

/// Result type for hardware setup operations.
pub type HardwareResult<T> = Result<T, HardwareError>;

/// Errors raised while configuring a hardware backend.
///
/// Runtime command failures are not errors here: they travel back as
/// acknowledgements and statuses.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HardwareError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}
