//! One traffic signal.

use sl_core::{LightLocation, LightState};
use sl_hardware::{LightCommandStatus, LockHardware};
use tracing::debug;

use crate::error::{ControlError, ControlResult};

/// A signal at one gate, facing inside or outside the chamber.
///
/// [`TrafficLight::to_red`] and [`TrafficLight::to_green`] are idempotent:
/// a signal already showing the target aspect is left alone, and a signal in
/// error is never commanded.
pub struct TrafficLight<'a, H: LockHardware + ?Sized> {
    hw: &'a H,
    location: LightLocation,
}

impl<'a, H: LockHardware + ?Sized> TrafficLight<'a, H> {
    pub fn new(hw: &'a H, location: LightLocation) -> Self {
        Self { hw, location }
    }

    pub fn location(&self) -> LightLocation {
        self.location
    }

    pub fn state(&self) -> LightState {
        self.hw.light_state(self.location)
    }

    pub fn to_red(&self) -> ControlResult {
        match self.state() {
            LightState::RedOn => Ok(()),
            LightState::GreenOn => {
                debug!(light = %self.location, "switching signal to red");
                settle(self.hw.red_light(self.location))
            }
            LightState::Error => Err(ControlError::InvalidLightState),
        }
    }

    pub fn to_green(&self) -> ControlResult {
        match self.state() {
            LightState::GreenOn => Ok(()),
            LightState::RedOn => {
                debug!(light = %self.location, "switching signal to green");
                settle(self.hw.green_light(self.location))
            }
            LightState::Error => Err(ControlError::InvalidLightState),
        }
    }
}

fn settle(status: LightCommandStatus) -> ControlResult {
    match status {
        LightCommandStatus::Ok => Ok(()),
        LightCommandStatus::Unacked => Err(ControlError::NoAckReceived),
        LightCommandStatus::InvalidState => Err(ControlError::InvalidLightState),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use sl_core::{DoorSide, LightFacing};
    use sl_hardware::{CommandKind, SimulatedLock};

    fn location() -> LightLocation {
        LightLocation::new(DoorSide::Left, LightFacing::Outside)
    }

    #[test]
    fn already_red_issues_nothing() {
        let hw = SimulatedLock::default();
        let light = TrafficLight::new(&hw, location());
        assert_eq!(light.to_red(), Ok(()));
        assert!(hw.command_log().is_empty());
    }

    #[test]
    fn green_then_red() {
        let hw = SimulatedLock::default();
        let light = TrafficLight::new(&hw, location());
        assert_eq!(light.to_green(), Ok(()));
        assert_eq!(light.state(), LightState::GreenOn);
        assert_eq!(light.to_red(), Ok(()));
        assert_eq!(light.state(), LightState::RedOn);
        assert_eq!(hw.command_log().len(), 2);
    }

    #[test]
    fn unacked_toggle_maps_to_no_ack() {
        let hw = SimulatedLock::default();
        hw.fail_command(CommandKind::GreenLight);
        let light = TrafficLight::new(&hw, location());
        assert_eq!(light.to_green(), Err(ControlError::NoAckReceived));
    }

    #[test]
    fn error_state_fails_without_command() {
        let hw = SimulatedLock::default();
        hw.set_light(location(), LightState::Error);
        let light = TrafficLight::new(&hw, location());
        assert_eq!(light.to_green(), Err(ControlError::InvalidLightState));
        assert_eq!(light.to_red(), Err(ControlError::InvalidLightState));
        assert!(hw.command_log().is_empty());
    }

    fn any_light() -> impl Strategy<Value = LightState> {
        prop_oneof![
            Just(LightState::RedOn),
            Just(LightState::GreenOn),
            Just(LightState::Error),
        ]
    }

    proptest! {
        #[test]
        fn at_most_one_command_and_only_on_change(initial in any_light(), green in any::<bool>()) {
            let hw = SimulatedLock::default();
            hw.set_light(location(), initial);
            let light = TrafficLight::new(&hw, location());

            let target = if green { LightState::GreenOn } else { LightState::RedOn };
            let result = if green { light.to_green() } else { light.to_red() };

            let commands = hw.command_log().len();
            match initial {
                LightState::Error => {
                    prop_assert_eq!(result, Err(ControlError::InvalidLightState));
                    prop_assert_eq!(commands, 0);
                }
                state if state == target => {
                    prop_assert_eq!(result, Ok(()));
                    prop_assert_eq!(commands, 0);
                }
                _ => {
                    prop_assert_eq!(result, Ok(()));
                    prop_assert_eq!(commands, 1);
                    prop_assert_eq!(light.state(), target);
                }
            }
        }
    }
}
