//! Outcome of a signal command.

/// Result of a red/green command on a traffic light.
///
/// Device protocols report these as small integers; [`LightCommandStatus::from_raw`]
/// maps them so raw codes never leave the boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LightCommandStatus {
    /// The aspect changed and the device confirmed it.
    Ok,
    /// At least one of the messages was not confirmed.
    Unacked,
    /// The device reported a light state it should not be in.
    InvalidState,
}

impl LightCommandStatus {
    /// Map a raw protocol code: `0` ok, `-1` unacked, `-2` invalid state.
    /// Anything else is treated as unacked.
    pub fn from_raw(code: i32) -> Self {
        match code {
            0 => LightCommandStatus::Ok,
            -2 => LightCommandStatus::InvalidState,
            _ => LightCommandStatus::Unacked,
        }
    }

    pub fn raw(self) -> i32 {
        match self {
            LightCommandStatus::Ok => 0,
            LightCommandStatus::Unacked => -1,
            LightCommandStatus::InvalidState => -2,
        }
    }

    pub fn is_ok(self) -> bool {
        self == LightCommandStatus::Ok
    }
}
