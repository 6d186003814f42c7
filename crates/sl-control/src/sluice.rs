//! The whole chamber: raising, lowering and vessel passage.

use sl_core::{ChamberMacroState, DoorSide, DoorState, LockTypes, ValveRowPosition, WaterLevel};
use sl_hardware::LockHardware;
use tracing::{debug, info, warn};

use crate::door::Door;
use crate::error::{ControlError, ControlResult};
use crate::interrupt::{InterruptLine, InterruptRequest};
use crate::poll::{PollPolicy, Poller};

/// Chamber controller owning both gates.
///
/// Operations run to completion or until a pause freezes them. The pause can
/// come from [`Sluice::pass_interrupt`] or from any clone of
/// [`Sluice::interrupt_line`] raised on another thread; in the latter case
/// the running operation returns [`ControlError::InterruptReceived`] and the
/// chamber stays frozen until `pass_interrupt(Resume)`.
pub struct Sluice<'a, H: LockHardware + ?Sized> {
    hw: &'a H,
    left: Door<'a, H>,
    right: Door<'a, H>,
    line: InterruptLine,
    policy: PollPolicy,
    paused: bool,
    resuming: bool,
    macro_state: ChamberMacroState,
}

impl<'a, H: LockHardware + ?Sized> Sluice<'a, H> {
    /// Create a chamber controller.
    ///
    /// # Arguments
    ///
    /// * `hw` - Hardware boundary shared by every component
    /// * `lock_types` - Which gates lock themselves after closing
    /// * `policy` - Pacing and bound of every polling loop
    pub fn new(hw: &'a H, lock_types: LockTypes, policy: PollPolicy) -> Self {
        let line = InterruptLine::new();
        Self {
            hw,
            left: Door::new(hw, DoorSide::Left, lock_types.left, line.clone(), policy),
            right: Door::new(hw, DoorSide::Right, lock_types.right, line.clone(), policy),
            line,
            policy,
            paused: false,
            resuming: false,
            macro_state: ChamberMacroState::Waiting,
        }
    }

    pub fn door(&self, side: DoorSide) -> &Door<'a, H> {
        match side {
            DoorSide::Left => &self.left,
            DoorSide::Right => &self.right,
        }
    }

    pub fn door_mut(&mut self, side: DoorSide) -> &mut Door<'a, H> {
        match side {
            DoorSide::Left => &mut self.left,
            DoorSide::Right => &mut self.right,
        }
    }

    /// Operation that a resume would continue.
    pub fn macro_state(&self) -> ChamberMacroState {
        self.macro_state
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Handle for raising the emergency signal from elsewhere.
    pub fn interrupt_line(&self) -> InterruptLine {
        self.line.clone()
    }

    /// Raise or lower the chamber to the opposite level.
    ///
    /// At `Low` the left gate is closed and the chamber filled through the
    /// right valve rows; at `High` the right gate is closed and the chamber
    /// drained through the left rows. While a resume is running this instead
    /// continues the stored direction.
    pub fn start(&mut self) -> ControlResult {
        let result = if self.resuming {
            if self.observe_pause() {
                Err(ControlError::InterruptReceived)
            } else {
                self.continue_sluicing()
            }
        } else if self.observe_pause() {
            if self.macro_state.is_sluicing() {
                Err(ControlError::InterruptReceived)
            } else {
                debug!(state = %self.macro_state, "start while frozen with nothing to continue");
                Err(ControlError::InvalidCall)
            }
        } else {
            self.begin_sluicing()
        };
        self.finish(result)
    }

    /// Let a vessel into the chamber through the gate matching the level.
    pub fn allow_entry(&mut self) -> ControlResult {
        if self.observe_pause() {
            return Err(ControlError::InterruptReceived);
        }
        let result = self.pass_vessel(ChamberMacroState::AllowingEntry);
        self.finish(result)
    }

    /// Let a vessel out of the chamber through the gate matching the level.
    pub fn allow_exit(&mut self) -> ControlResult {
        if self.observe_pause() {
            return Err(ControlError::InterruptReceived);
        }
        let result = self.pass_vessel(ChamberMacroState::AllowingExit);
        self.finish(result)
    }

    /// Apply an emergency request to the whole chamber.
    ///
    /// `Pause` freezes both gates and returns `Ok(())`. `Resume` lets both
    /// gates finish their own frozen movement, then continues the stored
    /// operation and returns its result. A resume with nothing paused is a
    /// no-op.
    pub fn pass_interrupt(&mut self, request: InterruptRequest) -> ControlResult {
        self.line.request(request);
        match request {
            InterruptRequest::Pause => {
                self.freeze();
                Ok(())
            }
            InterruptRequest::Resume => self.resume(),
        }
    }

    /// Single-button emergency: pause when running, resume when paused.
    pub fn toggle_interrupt(&mut self) -> ControlResult {
        let request = if self.paused {
            InterruptRequest::Resume
        } else {
            InterruptRequest::Pause
        };
        self.pass_interrupt(request)
    }

    /// Close every open valve row on one side, top first.
    pub fn close_valves(&self, side: DoorSide) -> ControlResult {
        let door = self.door(side);
        for position in ValveRowPosition::ALL.iter().rev() {
            let row = door.row(*position);
            if row.is_open() && !row.close() {
                warn!(%side, row = %position, "valve row did not confirm closing");
                return Err(ControlError::NoAckReceived);
            }
        }
        Ok(())
    }

    fn resume(&mut self) -> ControlResult {
        if !self.paused {
            debug!("resume with nothing paused");
            return Ok(());
        }
        info!(state = %self.macro_state, "chamber resuming");
        self.paused = false;
        self.left.interrupt_reaction(InterruptRequest::Resume);
        if !self.observe_pause() {
            self.right.interrupt_reaction(InterruptRequest::Resume);
        }
        // A pause raised while the gates were resuming freezes everything again.
        if self.observe_pause() {
            info!(state = %self.macro_state, "paused again while resuming");
            return Err(ControlError::InterruptReceived);
        }

        self.resuming = true;
        let result = match self.macro_state {
            ChamberMacroState::SluicingUp | ChamberMacroState::SluicingDown => self.start(),
            ChamberMacroState::AllowingEntry => self.allow_entry(),
            ChamberMacroState::AllowingExit => self.allow_exit(),
            ChamberMacroState::Waiting => Ok(()),
        };
        self.resuming = false;
        result
    }

    fn begin_sluicing(&mut self) -> ControlResult {
        match self.hw.water_level() {
            WaterLevel::Low => {
                self.macro_state = ChamberMacroState::SluicingUp;
                info!("raising chamber");
                self.seal(DoorSide::Left)?;
                self.sluice_up()
            }
            WaterLevel::High => {
                self.macro_state = ChamberMacroState::SluicingDown;
                info!("lowering chamber");
                self.seal(DoorSide::Right)?;
                self.sluice_down()
            }
            level => {
                debug!(%level, "chamber is not at an end level");
                Err(ControlError::InvalidWaterLevel)
            }
        }
    }

    fn continue_sluicing(&mut self) -> ControlResult {
        let side = match self.macro_state {
            ChamberMacroState::SluicingUp => DoorSide::Left,
            ChamberMacroState::SluicingDown => DoorSide::Right,
            _ => return Err(ControlError::InvalidCall),
        };
        if !self.hw.door_state(side).is_shut() {
            warn!(%side, "gate not shut, cannot continue sluicing");
            return Err(ControlError::IncorrectDoorState);
        }
        if side == DoorSide::Left {
            self.sluice_up()
        } else {
            self.sluice_down()
        }
    }

    fn pass_vessel(&mut self, operation: ChamberMacroState) -> ControlResult {
        let side = self.serving_door()?;
        self.macro_state = operation;
        info!(%side, %operation, "passing vessel");
        let door = self.door_mut(side);
        if operation == ChamberMacroState::AllowingEntry {
            door.allow_entry()
        } else {
            door.allow_exit()
        }
    }

    /// Close the gate that must stay shut while the level changes.
    fn seal(&mut self, side: DoorSide) -> ControlResult {
        if self.hw.door_state(side) == DoorState::Open {
            self.door_mut(side).close_door()?;
        }
        let state = self.hw.door_state(side);
        if state.is_shut() {
            Ok(())
        } else {
            debug!(%side, %state, "gate not shut");
            Err(ControlError::IncorrectDoorState)
        }
    }

    fn sluice_up(&mut self) -> ControlResult {
        let mut poller = Poller::new(self.policy, "raising chamber");
        loop {
            let position = match self.hw.water_level() {
                WaterLevel::Low | WaterLevel::BelowValve2 => ValveRowPosition::Bottom,
                WaterLevel::AboveValve2 => ValveRowPosition::Middle,
                WaterLevel::AboveValve3 => ValveRowPosition::Top,
                WaterLevel::High => break,
                WaterLevel::Error => {
                    warn!("water level sensor error while raising");
                    return Err(ControlError::IncorrectWaterLevel);
                }
            };
            let row = self.right.row(position);
            if !row.is_open() {
                debug!(row = %position, "opening filling row");
                if !row.open() {
                    warn!(row = %position, "valve row did not confirm opening");
                    return Err(ControlError::NoAckReceived);
                }
            }
            if self.observe_pause() {
                return Err(ControlError::InterruptReceived);
            }
            if let Err(err) = poller.tick() {
                warn!(%err, "chamber did not fill");
                self.close_valves(DoorSide::Right)?;
                return Err(err);
            }
        }
        info!(polls = poller.polls(), "chamber high");
        self.close_valves(DoorSide::Right)
    }

    fn sluice_down(&mut self) -> ControlResult {
        if !self.left.row(ValveRowPosition::Bottom).open() {
            warn!("draining row did not confirm opening");
        }
        let mut poller = Poller::new(self.policy, "lowering chamber");
        loop {
            match self.hw.water_level() {
                WaterLevel::Low => break,
                WaterLevel::Error => {
                    warn!("water level sensor error while lowering");
                    return Err(ControlError::IncorrectWaterLevel);
                }
                _ => {}
            }
            if self.observe_pause() {
                return Err(ControlError::InterruptReceived);
            }
            if let Err(err) = poller.tick() {
                warn!(%err, "chamber did not drain");
                self.close_valves(DoorSide::Left)?;
                return Err(err);
            }
        }
        info!(polls = poller.polls(), "chamber low");
        self.close_valves(DoorSide::Left)
    }

    fn serving_door(&self) -> ControlResult<DoorSide> {
        let level = self.hw.water_level();
        DoorSide::serving(level).ok_or_else(|| {
            debug!(%level, "no gate serves this level");
            ControlError::IncorrectWaterLevel
        })
    }

    /// Freeze the chamber and both gates.
    fn freeze(&mut self) {
        self.line.request(InterruptRequest::Pause);
        if self.paused {
            return;
        }
        info!(state = %self.macro_state, "chamber paused");
        self.paused = true;
        self.left.interrupt_reaction(InterruptRequest::Pause);
        self.right.interrupt_reaction(InterruptRequest::Pause);
    }

    /// Take up a pause raised on the line. Returns whether the chamber is paused.
    fn observe_pause(&mut self) -> bool {
        if !self.paused && self.line.pause_requested() {
            self.freeze();
        }
        self.paused
    }

    fn finish(&mut self, result: ControlResult) -> ControlResult {
        match result {
            Ok(()) => self.macro_state = ChamberMacroState::Waiting,
            Err(ControlError::InterruptReceived) => self.freeze(),
            Err(err) => debug!(%err, state = %self.macro_state, "operation failed"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use sl_core::{DoorType, LightFacing, LightLocation, LightState};
    use sl_hardware::{CommandKind, HardwareCommand, ReadKind, SimConfig, SimulatedLock};

    fn chamber(level: WaterLevel, left: DoorState, right: DoorState) -> SimulatedLock {
        SimulatedLock::new(SimConfig {
            door_travel_polls: 3,
            water_polls_per_level: 2,
            initial_level: level,
            left_door: left,
            right_door: right,
        })
        .unwrap()
    }

    fn sluice(hw: &SimulatedLock) -> Sluice<'_, SimulatedLock> {
        Sluice::new(
            hw,
            LockTypes::uniform(DoorType::NoLock),
            PollPolicy::unbounded().with_max_polls(1_000),
        )
    }

    #[test]
    fn start_rejects_intermediate_level() {
        let hw = chamber(WaterLevel::AboveValve2, DoorState::Closed, DoorState::Closed);
        let mut lock = sluice(&hw);
        assert_eq!(lock.start(), Err(ControlError::InvalidWaterLevel));
        assert!(hw.command_log().is_empty());
    }

    #[test]
    fn start_at_low_closes_left_gate_and_raises() {
        let hw = chamber(WaterLevel::Low, DoorState::Open, DoorState::Closed);
        let mut lock = sluice(&hw);

        assert_eq!(lock.start(), Ok(()));

        let snapshot = hw.snapshot();
        assert_eq!(snapshot.level, WaterLevel::High);
        assert_eq!(snapshot.left_door, DoorState::Closed);
        assert_eq!(snapshot.valve_bits(DoorSide::Right), [false; 3]);
        assert_eq!(lock.macro_state(), ChamberMacroState::Waiting);
    }

    #[test]
    fn start_at_high_drains_through_left_rows() {
        let hw = chamber(WaterLevel::High, DoorState::Closed, DoorState::Closed);
        let mut lock = sluice(&hw);

        assert_eq!(lock.start(), Ok(()));
        assert_eq!(
            hw.command_log()[0],
            HardwareCommand::ValveOpen(DoorSide::Left, ValveRowPosition::Bottom)
        );
        let snapshot = hw.snapshot();
        assert_eq!(snapshot.level, WaterLevel::Low);
        assert_eq!(snapshot.valve_bits(DoorSide::Left), [false; 3]);
    }

    #[test]
    fn sensor_error_mid_raise_stops_valve_commands() {
        let hw = Arc::new(chamber(WaterLevel::Low, DoorState::Closed, DoorState::Closed));
        let remote = Arc::clone(&hw);
        hw.on_read(ReadKind::WaterLevel, 3, move || {
            remote.force_water_level(Some(WaterLevel::Error))
        });
        let mut lock = sluice(&hw);

        assert_eq!(lock.start(), Err(ControlError::IncorrectWaterLevel));
        assert_eq!(
            hw.command_log(),
            vec![HardwareCommand::ValveOpen(DoorSide::Right, ValveRowPosition::Bottom)]
        );
    }

    #[test]
    fn unacked_filling_row_surfaces_no_ack() {
        let hw = chamber(WaterLevel::Low, DoorState::Closed, DoorState::Closed);
        hw.fail_command(CommandKind::ValveOpen);
        let mut lock = sluice(&hw);
        assert_eq!(lock.start(), Err(ControlError::NoAckReceived));
        assert_eq!(lock.macro_state(), ChamberMacroState::SluicingUp);
    }

    #[test]
    fn left_gate_stuck_open_is_incorrect_state() {
        let hw = chamber(WaterLevel::Low, DoorState::Closed, DoorState::Closed);
        hw.force_door_state(DoorSide::Left, Some(DoorState::Stopped));
        let mut lock = sluice(&hw);
        assert_eq!(lock.start(), Err(ControlError::IncorrectDoorState));
    }

    #[test]
    fn entry_at_low_uses_left_gate() {
        let hw = chamber(WaterLevel::Low, DoorState::Closed, DoorState::Closed);
        let mut lock = sluice(&hw);

        assert_eq!(lock.allow_entry(), Ok(()));
        let snapshot = hw.snapshot();
        assert_eq!(snapshot.left_door, DoorState::Open);
        assert_eq!(
            snapshot.light(LightLocation::new(DoorSide::Left, LightFacing::Outside)),
            LightState::GreenOn
        );
        assert_eq!(snapshot.right_door, DoorState::Closed);
    }

    #[test]
    fn passage_at_intermediate_level_is_refused() {
        let hw = chamber(WaterLevel::AboveValve3, DoorState::Closed, DoorState::Closed);
        let mut lock = sluice(&hw);
        assert_eq!(lock.allow_exit(), Err(ControlError::IncorrectWaterLevel));
        assert_eq!(lock.macro_state(), ChamberMacroState::Waiting);
    }

    #[test]
    fn resume_without_pause_is_a_no_op() {
        let hw = chamber(WaterLevel::Low, DoorState::Closed, DoorState::Closed);
        let mut lock = sluice(&hw);
        assert_eq!(lock.pass_interrupt(InterruptRequest::Resume), Ok(()));
        assert!(hw.command_log().is_empty());
    }

    #[test]
    fn frozen_chamber_refuses_new_work() {
        let hw = chamber(WaterLevel::Low, DoorState::Closed, DoorState::Closed);
        let mut lock = sluice(&hw);
        assert_eq!(lock.toggle_interrupt(), Ok(()));
        assert!(lock.is_paused());
        hw.clear_log();

        assert_eq!(lock.start(), Err(ControlError::InvalidCall));
        assert_eq!(lock.allow_entry(), Err(ControlError::InterruptReceived));
        assert!(hw.command_log().is_empty());

        assert_eq!(lock.toggle_interrupt(), Ok(()));
        assert!(!lock.is_paused());
        assert_eq!(lock.allow_entry(), Ok(()));
    }

    #[test]
    fn close_valves_goes_top_down() {
        let hw = chamber(WaterLevel::Low, DoorState::Closed, DoorState::Closed);
        for row in ValveRowPosition::ALL {
            hw.set_valve(DoorSide::Right, row, true);
        }
        let lock = sluice(&hw);

        assert_eq!(lock.close_valves(DoorSide::Right), Ok(()));
        assert_eq!(
            hw.command_log(),
            vec![
                HardwareCommand::ValveClose(DoorSide::Right, ValveRowPosition::Top),
                HardwareCommand::ValveClose(DoorSide::Right, ValveRowPosition::Middle),
                HardwareCommand::ValveClose(DoorSide::Right, ValveRowPosition::Bottom),
            ]
        );
    }

    #[test]
    fn close_valves_stops_at_first_unacked() {
        let hw = chamber(WaterLevel::Low, DoorState::Closed, DoorState::Closed);
        hw.set_valve(DoorSide::Left, ValveRowPosition::Top, true);
        hw.set_valve(DoorSide::Left, ValveRowPosition::Bottom, true);
        hw.fail_command(CommandKind::ValveClose);
        let lock = sluice(&hw);

        assert_eq!(lock.close_valves(DoorSide::Left), Err(ControlError::NoAckReceived));
        assert_eq!(hw.command_log().len(), 1);
    }
}
