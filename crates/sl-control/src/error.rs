//! Result codes of control operations.

use thiserror::Error;

/// Result type for control operations. `Ok(())` is the success code.
pub type ControlResult<T = ()> = Result<T, ControlError>;

/// Every way a control operation can end other than success.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlError {
    /// A command was issued but the hardware did not confirm it.
    #[error("No acknowledgement received from the hardware")]
    NoAckReceived,

    /// A signal reported an error state.
    #[error("Invalid light state")]
    InvalidLightState,

    /// The water level does not allow the operation, or the sensor failed.
    #[error("Incorrect water level for this operation")]
    IncorrectWaterLevel,

    /// The gate is not in a state from which the operation can proceed.
    #[error("Incorrect door state for this operation")]
    IncorrectDoorState,

    /// The chamber is at an intermediate level where no cycle can start.
    #[error("Invalid water level to start a cycle")]
    InvalidWaterLevel,

    /// The gate motor reported damage.
    #[error("Door motor damaged")]
    MotorDamaged,

    /// The operation was frozen by a pause and can be resumed.
    #[error("Interrupt received; operation paused")]
    InterruptReceived,

    /// Called while paused with no matching operation to continue.
    #[error("Invalid call: no operation to continue")]
    InvalidCall,

    /// Reached a path that normal operation never takes.
    #[error("Work in progress")]
    WorkInProgress,

    /// A polling loop hit its configured bound.
    #[error("Poll limit exceeded while {what} ({polls} polls)")]
    PollLimitExceeded { what: &'static str, polls: u64 },
}

impl ControlError {
    /// The command may succeed if issued again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ControlError::NoAckReceived)
    }

    /// The operation is frozen, not failed.
    pub fn is_resumable(&self) -> bool {
        matches!(self, ControlError::InterruptReceived)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert!(ControlError::NoAckReceived.is_retryable());
        assert!(!ControlError::MotorDamaged.is_retryable());
        assert!(ControlError::InterruptReceived.is_resumable());
        assert!(!ControlError::InvalidCall.is_resumable());
    }

    #[test]
    fn poll_limit_message_names_the_loop() {
        let err = ControlError::PollLimitExceeded {
            what: "raising water",
            polls: 10,
        };
        assert_eq!(
            err.to_string(),
            "Poll limit exceeded while raising water (10 polls)"
        );
    }
}
