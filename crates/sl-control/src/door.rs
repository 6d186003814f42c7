//! One gate of the chamber.
//!
//! A [`Door`] owns the two signals and three valve rows of its gate. It opens
//! and closes the gate against the hardware, keeps the signals red while the
//! gate moves, and implements its half of the pause protocol:
//!
//! - **pause**: halt a moving gate, or close the open valve rows of a standing
//!   gate while remembering which were open;
//! - **resume**: reopen the remembered rows, or restart the interrupted
//!   opening/closing.

use sl_core::{
    DoorSide, DoorState, DoorType, LightFacing, LightLocation, LightState, ValveRowPosition,
};
use sl_hardware::LockHardware;
use tracing::{debug, info, warn};

use crate::error::{ControlError, ControlResult};
use crate::interrupt::{InterruptLine, InterruptRequest};
use crate::poll::{PollPolicy, Poller};
use crate::saved::SavedDoorState;
use crate::traffic_light::TrafficLight;
use crate::valve_row::ValveRow;

/// Direction of a gate movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Travel {
    Open,
    Close,
}

impl Travel {
    fn in_progress(self) -> DoorState {
        match self {
            Travel::Open => DoorState::Opening,
            Travel::Close => DoorState::Closing,
        }
    }

    fn reached(self, state: DoorState) -> bool {
        match self {
            Travel::Open => state == DoorState::Open,
            Travel::Close => state.is_shut(),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Travel::Open => "opening gate",
            Travel::Close => "closing gate",
        }
    }
}

/// One gate with its signals and valve rows.
pub struct Door<'a, H: LockHardware + ?Sized> {
    hw: &'a H,
    side: DoorSide,
    kind: DoorType,
    line: InterruptLine,
    policy: PollPolicy,
    paused: bool,
    saved: SavedDoorState,
    light_inside: TrafficLight<'a, H>,
    light_outside: TrafficLight<'a, H>,
    /// Bottom, middle, top.
    rows: [ValveRow<'a, H>; 3],
}

impl<'a, H: LockHardware + ?Sized> Door<'a, H> {
    pub fn new(
        hw: &'a H,
        side: DoorSide,
        kind: DoorType,
        line: InterruptLine,
        policy: PollPolicy,
    ) -> Self {
        Self {
            hw,
            side,
            kind,
            line,
            policy,
            paused: false,
            saved: SavedDoorState::default(),
            light_inside: TrafficLight::new(hw, LightLocation::new(side, LightFacing::Inside)),
            light_outside: TrafficLight::new(hw, LightLocation::new(side, LightFacing::Outside)),
            rows: ValveRowPosition::ALL.map(|position| ValveRow::new(hw, side, position)),
        }
    }

    pub fn side(&self) -> DoorSide {
        self.side
    }

    pub fn kind(&self) -> DoorType {
        self.kind
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn saved_state(&self) -> SavedDoorState {
        self.saved
    }

    pub fn row(&self, position: ValveRowPosition) -> &ValveRow<'a, H> {
        &self.rows[position.index()]
    }

    pub fn light(&self, facing: LightFacing) -> &TrafficLight<'a, H> {
        match facing {
            LightFacing::Inside => &self.light_inside,
            LightFacing::Outside => &self.light_outside,
        }
    }

    /// Let a vessel leave the chamber through this gate.
    ///
    /// Holds the outside signal red, opens a shut gate, then shows green on
    /// the inside signal.
    pub fn allow_exit(&mut self) -> ControlResult {
        hold_red(&self.light_outside)?;

        match self.hw.door_state(self.side) {
            DoorState::Open => self.light_inside.to_green(),
            state if state.is_shut() => {
                self.open_door()?;
                self.light_inside.to_green()
            }
            state => {
                debug!(side = %self.side, %state, "gate cannot let a vessel out");
                Err(ControlError::IncorrectDoorState)
            }
        }
    }

    /// Let a vessel enter the chamber through this gate.
    ///
    /// Holds the inside signal red, opens a shut or halted gate, then shows
    /// green on the outside signal.
    pub fn allow_entry(&mut self) -> ControlResult {
        hold_red(&self.light_inside)?;

        match self.hw.door_state(self.side) {
            DoorState::Open => self.light_outside.to_green(),
            DoorState::Closed | DoorState::Locked | DoorState::Stopped => {
                self.open_door()?;
                self.light_outside.to_green()
            }
            DoorState::MotorDamaged => {
                warn!(side = %self.side, "gate motor damaged");
                Err(ControlError::MotorDamaged)
            }
            state => {
                debug!(side = %self.side, %state, "gate cannot let a vessel in");
                Err(ControlError::IncorrectDoorState)
            }
        }
    }

    /// Open the gate and wait until it reports open.
    ///
    /// Refuses unless the water level matches this side. Unlocks first when
    /// the gate is fast-locking or currently locked.
    pub fn open_door(&mut self) -> ControlResult {
        if self.frozen() {
            return Err(ControlError::InterruptReceived);
        }

        let level = self.hw.water_level();
        if !self.side.permits_opening_at(level) {
            debug!(side = %self.side, %level, "water level forbids opening");
            return Err(ControlError::IncorrectWaterLevel);
        }

        if self.kind == DoorType::FastLock || self.hw.door_state(self.side) == DoorState::Locked {
            self.confirm(self.hw.unlock_door(self.side), "unlock")?;
        }

        info!(side = %self.side, "opening gate");
        self.travel(Travel::Open)?;
        self.saved.reset();
        Ok(())
    }

    /// Close the gate and wait until it reports closed.
    ///
    /// Both signals go red and every open valve row is closed before the gate
    /// moves. A fast-locking gate is locked once shut.
    pub fn close_door(&mut self) -> ControlResult {
        if self.frozen() {
            return Err(ControlError::InterruptReceived);
        }

        self.light_inside.to_red()?;
        self.light_outside.to_red()?;

        for row in &self.rows {
            if row.is_open() && !row.close() {
                warn!(side = %self.side, row = %row.position(), "valve row did not confirm closing");
                return Err(ControlError::NoAckReceived);
            }
        }

        info!(side = %self.side, "closing gate");
        self.travel(Travel::Close)?;
        self.saved.reset();

        if self.kind == DoorType::FastLock {
            self.confirm(self.hw.lock_door(self.side), "lock")?;
        }
        Ok(())
    }

    /// Apply an emergency request to this gate.
    ///
    /// `Pause` freezes the gate in place; `Resume` continues what was frozen.
    /// A request matching the current state is ignored. The shared line must
    /// already carry `Resume` when resuming, or the restarted motion stops
    /// straight away.
    pub fn interrupt_reaction(&mut self, request: InterruptRequest) {
        match request {
            InterruptRequest::Pause if !self.paused => {
                info!(side = %self.side, "gate paused");
                self.paused = true;
                let _ = self.stop_door();
            }
            InterruptRequest::Resume if self.paused => {
                info!(side = %self.side, saved = %self.saved.door_state, "gate resuming");
                self.paused = false;
                let _ = self.stop_door();
            }
            _ => debug!(side = %self.side, ?request, "gate already in requested state"),
        }
    }

    /// Freeze (while paused) or restore (after resume) the gate.
    ///
    /// Always ends with a hardware stop and reports
    /// [`ControlError::NoAckReceived`]; the stop's own acknowledgement is only
    /// logged, and a resumed movement's outcome shows up in the gate state.
    pub fn stop_door(&mut self) -> ControlResult {
        if self.paused {
            let state = self.hw.door_state(self.side);
            if state.is_shut() {
                self.saved.door_state = state;
                self.freeze_valves();
            } else if state.is_in_motion() {
                // Keep the recorded direction: `Stopped` alone cannot tell it.
                if !self.hw.stop_door(self.side) {
                    warn!(side = %self.side, "gate motor did not confirm halt");
                }
            } else {
                self.saved.door_state = state;
                self.freeze_valves();
            }
        } else {
            match self.saved.door_state {
                DoorState::Opening => {
                    if let Err(err) = self.open_door() {
                        warn!(side = %self.side, %err, "resumed opening did not complete");
                    }
                }
                DoorState::Closing => {
                    if let Err(err) = self.close_door() {
                        warn!(side = %self.side, %err, "resumed closing did not complete");
                    }
                }
                state => {
                    debug!(side = %self.side, %state, "restoring valve rows");
                    self.restore_valves();
                    self.saved.reset();
                }
            }
        }

        let acked = self.hw.stop_door(self.side);
        debug!(side = %self.side, acked, "gate stop issued");
        Err(ControlError::NoAckReceived)
    }

    /// Issue the travel command, then poll until the target or a pause.
    ///
    /// The recorded direction survives only a pause; any other failure
    /// clears it.
    fn travel(&mut self, travel: Travel) -> ControlResult {
        self.command(travel)?;
        self.saved.door_state = travel.in_progress();

        let result = self.follow(travel);
        if !matches!(result, Ok(()) | Err(ControlError::InterruptReceived)) {
            self.saved.reset();
        }
        result
    }

    fn follow(&mut self, travel: Travel) -> ControlResult {
        let mut poller = Poller::new(self.policy, travel.label());
        let mut state = self.hw.door_state(self.side);
        loop {
            match state {
                DoorState::Stopped => self.command(travel)?,
                DoorState::MotorDamaged => {
                    warn!(side = %self.side, "gate motor damaged while moving");
                    return Err(ControlError::MotorDamaged);
                }
                _ => {}
            }
            if let Err(err) = poller.tick() {
                warn!(side = %self.side, %err, "gate did not finish moving");
                self.hw.stop_door(self.side);
                return Err(err);
            }
            state = self.hw.door_state(self.side);
            if travel.reached(state) || self.observe_pause() {
                break;
            }
        }

        if !travel.reached(state) {
            let _ = self.stop_door();
            return Err(ControlError::InterruptReceived);
        }
        debug!(side = %self.side, %state, polls = poller.polls(), "gate reached target");
        Ok(())
    }

    fn command(&self, travel: Travel) -> ControlResult {
        match travel {
            Travel::Open => self.confirm(self.hw.open_door(self.side), "open"),
            Travel::Close => self.confirm(self.hw.close_door(self.side), "close"),
        }
    }

    fn confirm(&self, acked: bool, what: &'static str) -> ControlResult {
        if acked {
            Ok(())
        } else {
            warn!(side = %self.side, command = what, "gate command not acknowledged");
            Err(ControlError::NoAckReceived)
        }
    }

    /// Paused already, or a pause is waiting on the line.
    fn frozen(&self) -> bool {
        self.paused || self.line.pause_requested()
    }

    /// Take up a pause raised on the line. Returns whether the gate is paused.
    fn observe_pause(&mut self) -> bool {
        if !self.paused && self.line.pause_requested() {
            info!(side = %self.side, "pause observed while gate moving");
            self.paused = true;
        }
        self.paused
    }

    fn freeze_valves(&mut self) {
        for row in self.rows.iter().rev() {
            let open = row.is_open();
            self.saved.record_valve(row.position(), open);
            if open && !row.close() {
                warn!(side = %self.side, row = %row.position(), "valve row did not confirm closing");
            }
        }
    }

    fn restore_valves(&self) {
        for row in &self.rows {
            if self.saved.valve_was_open(row.position()) && !row.open() {
                warn!(side = %self.side, row = %row.position(), "valve row did not confirm reopening");
            }
        }
    }
}

/// Make sure a signal shows red before the gate is touched.
fn hold_red<H: LockHardware + ?Sized>(light: &TrafficLight<'_, H>) -> ControlResult {
    match light.state() {
        LightState::RedOn => Ok(()),
        LightState::GreenOn => light.to_red().map_err(|_| ControlError::NoAckReceived),
        LightState::Error => Err(ControlError::InvalidLightState),
    }
}
