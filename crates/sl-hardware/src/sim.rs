//! In-memory lock chamber.
//!
//! `SimulatedLock` models just enough physics for the controller to run end to
//! end: gates travel over a fixed number of state polls, the water level moves
//! one step per `water_polls_per_level` reads while a side's valves are open,
//! and signals flip when commanded. Faults can be injected per command kind,
//! per gate, per signal and for the level sensor.
//!
//! All state lives behind one mutex, so calls are serialized the way a real
//! communication layer would serialize them.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use sl_core::{
    DoorSide, DoorState, LightFacing, LightLocation, LightState, ValveRowPosition, WaterLevel,
};
use tracing::trace;

use crate::boundary::LockHardware;
use crate::command::{CommandKind, HardwareCommand};
use crate::error::{HardwareError, HardwareResult};
use crate::status::LightCommandStatus;

/// Setup of a simulated chamber.
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Door-state reads a gate needs to travel fully open or closed.
    pub door_travel_polls: u32,
    /// Water-level reads per level step while valves are open.
    pub water_polls_per_level: u32,
    /// Starting water level (must be a real level).
    pub initial_level: WaterLevel,
    /// Starting state of the left gate: open, closed or locked.
    pub left_door: DoorState,
    /// Starting state of the right gate: open, closed or locked.
    pub right_door: DoorState,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            door_travel_polls: 3,
            water_polls_per_level: 2,
            initial_level: WaterLevel::Low,
            left_door: DoorState::Closed,
            right_door: DoorState::Closed,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> HardwareResult<()> {
        if self.door_travel_polls == 0 {
            return Err(HardwareError::InvalidArg {
                what: "door_travel_polls must be positive",
            });
        }
        if self.water_polls_per_level == 0 {
            return Err(HardwareError::InvalidArg {
                what: "water_polls_per_level must be positive",
            });
        }
        if self.initial_level.rank().is_none() {
            return Err(HardwareError::InvalidArg {
                what: "initial_level must be a real level",
            });
        }
        for state in [self.left_door, self.right_door] {
            if !matches!(
                state,
                DoorState::Open | DoorState::Closed | DoorState::Locked
            ) {
                return Err(HardwareError::InvalidArg {
                    what: "initial door state must be open, closed or locked",
                });
            }
        }
        Ok(())
    }
}

/// Query kinds that can carry a read hook.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReadKind {
    WaterLevel,
    DoorState,
}

/// Point-in-time view of the simulated chamber.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChamberSnapshot {
    pub level: WaterLevel,
    pub left_door: DoorState,
    pub right_door: DoorState,
    /// Indexed by signal number - 1.
    pub lights: [LightState; 4],
    /// Indexed by side (left, right) then row (bottom first).
    pub valves: [[bool; 3]; 2],
}

impl ChamberSnapshot {
    pub fn door(&self, side: DoorSide) -> DoorState {
        match side {
            DoorSide::Left => self.left_door,
            DoorSide::Right => self.right_door,
        }
    }

    pub fn light(&self, location: LightLocation) -> LightState {
        self.lights[usize::from(location.number() - 1)]
    }

    pub fn valve_open(&self, side: DoorSide, row: ValveRowPosition) -> bool {
        self.valves[side_index(side)][row.index()]
    }

    /// Open/closed bits of one side, bottom first.
    pub fn valve_bits(&self, side: DoorSide) -> [bool; 3] {
        self.valves[side_index(side)]
    }
}

impl fmt::Display for ChamberSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "water level: {}", self.level)?;
        for side in DoorSide::ALL {
            let valves: Vec<&str> = ValveRowPosition::ALL
                .iter()
                .map(|row| if self.valve_open(side, *row) { "open" } else { "shut" })
                .collect();
            writeln!(
                f,
                "{side} gate: {} | inside {} | outside {} | valves (bottom..top) {}",
                self.door(side),
                self.light(LightLocation::new(side, LightFacing::Inside)),
                self.light(LightLocation::new(side, LightFacing::Outside)),
                valves.join(" ")
            )?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Motion {
    Idle,
    Opening,
    Closing,
}

/// One gate: travel counts polls from 0 (shut) to `full` (open).
#[derive(Debug)]
struct GateSim {
    travel: u32,
    full: u32,
    motion: Motion,
    locked: bool,
    forced: Option<DoorState>,
}

impl GateSim {
    fn new(initial: DoorState, full: u32) -> Self {
        Self {
            travel: if initial == DoorState::Open { full } else { 0 },
            full,
            motion: Motion::Idle,
            locked: initial == DoorState::Locked,
            forced: None,
        }
    }

    fn advance(&mut self) {
        match self.motion {
            Motion::Opening => {
                self.travel = (self.travel + 1).min(self.full);
                if self.travel == self.full {
                    self.motion = Motion::Idle;
                }
            }
            Motion::Closing => {
                self.travel = self.travel.saturating_sub(1);
                if self.travel == 0 {
                    self.motion = Motion::Idle;
                }
            }
            Motion::Idle => {}
        }
    }

    fn reported(&self) -> DoorState {
        if let Some(forced) = self.forced {
            return forced;
        }
        match self.motion {
            Motion::Opening => DoorState::Opening,
            Motion::Closing => DoorState::Closing,
            Motion::Idle if self.travel == self.full => DoorState::Open,
            Motion::Idle if self.travel == 0 && self.locked => DoorState::Locked,
            Motion::Idle if self.travel == 0 => DoorState::Closed,
            Motion::Idle => DoorState::Stopped,
        }
    }
}

type ReadAction = Box<dyn FnOnce() + Send>;

struct ReadHook {
    kind: ReadKind,
    at: u64,
    action: ReadAction,
}

struct ChamberSim {
    level_rank: usize,
    level_progress: u32,
    water_polls_per_level: u32,
    forced_level: Option<WaterLevel>,
    gates: [GateSim; 2],
    lights: [LightState; 4],
    valves: [[bool; 3]; 2],
    failing: HashSet<CommandKind>,
    log: Vec<HardwareCommand>,
    water_reads: u64,
    door_reads: u64,
    hooks: Vec<ReadHook>,
}

impl ChamberSim {
    fn gate(&mut self, side: DoorSide) -> &mut GateSim {
        &mut self.gates[side_index(side)]
    }

    fn light_mut(&mut self, location: LightLocation) -> &mut LightState {
        &mut self.lights[usize::from(location.number() - 1)]
    }

    /// Log the command; returns false if its kind is set to fail.
    fn issue(&mut self, command: HardwareCommand) -> bool {
        trace!(?command, "simulated command");
        self.log.push(command);
        !self.failing.contains(&command.kind())
    }

    fn step_water(&mut self) {
        let filling = self.valves[side_index(DoorSide::Right)].iter().any(|v| *v);
        let draining = self.valves[side_index(DoorSide::Left)].iter().any(|v| *v);
        let top = WaterLevel::LEVELS.len() - 1;
        let rising = match (filling, draining) {
            (true, false) if self.level_rank < top => true,
            (false, true) if self.level_rank > 0 => false,
            _ => return,
        };
        self.level_progress += 1;
        if self.level_progress >= self.water_polls_per_level {
            self.level_progress = 0;
            if rising {
                self.level_rank += 1;
            } else {
                self.level_rank -= 1;
            }
        }
    }

    fn level(&self) -> WaterLevel {
        self.forced_level
            .unwrap_or_else(|| WaterLevel::from_rank(self.level_rank).unwrap_or(WaterLevel::Error))
    }

    fn take_due_hooks(&mut self, kind: ReadKind) -> Vec<ReadAction> {
        let count = match kind {
            ReadKind::WaterLevel => self.water_reads,
            ReadKind::DoorState => self.door_reads,
        };
        let (due, pending): (Vec<ReadHook>, Vec<ReadHook>) = self
            .hooks
            .drain(..)
            .partition(|hook| hook.kind == kind && hook.at <= count);
        self.hooks = pending;
        due.into_iter().map(|hook| hook.action).collect()
    }
}

/// Thread-safe in-memory chamber implementing [`LockHardware`].
pub struct SimulatedLock {
    inner: Mutex<ChamberSim>,
}

impl Default for SimulatedLock {
    fn default() -> Self {
        Self::build(&SimConfig::default())
    }
}

impl fmt::Debug for SimulatedLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulatedLock")
            .field("snapshot", &self.snapshot())
            .finish()
    }
}

impl SimulatedLock {
    /// Create a simulated chamber.
    pub fn new(config: SimConfig) -> HardwareResult<Self> {
        config.validate()?;
        Ok(Self::build(&config))
    }

    fn build(config: &SimConfig) -> Self {
        let sim = ChamberSim {
            level_rank: config.initial_level.rank().unwrap_or(0),
            level_progress: 0,
            water_polls_per_level: config.water_polls_per_level,
            forced_level: None,
            gates: [
                GateSim::new(config.left_door, config.door_travel_polls),
                GateSim::new(config.right_door, config.door_travel_polls),
            ],
            lights: [LightState::RedOn; 4],
            valves: [[false; 3]; 2],
            failing: HashSet::new(),
            log: Vec::new(),
            water_reads: 0,
            door_reads: 0,
            hooks: Vec::new(),
        };
        Self {
            inner: Mutex::new(sim),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ChamberSim> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make every command of `kind` go unacknowledged (and have no effect).
    pub fn fail_command(&self, kind: CommandKind) {
        self.lock().failing.insert(kind);
    }

    /// Undo [`SimulatedLock::fail_command`].
    pub fn restore_command(&self, kind: CommandKind) {
        self.lock().failing.remove(&kind);
    }

    /// Pin the reported state of a gate, or release it with `None`.
    pub fn force_door_state(&self, side: DoorSide, state: Option<DoorState>) {
        self.lock().gate(side).forced = state;
    }

    /// Pin the reported water level, or release it with `None`.
    pub fn force_water_level(&self, level: Option<WaterLevel>) {
        self.lock().forced_level = level;
    }

    /// Set a signal aspect directly, including `Error`.
    pub fn set_light(&self, location: LightLocation, state: LightState) {
        *self.lock().light_mut(location) = state;
    }

    /// Set a valve row directly, bypassing the command log.
    pub fn set_valve(&self, side: DoorSide, row: ValveRowPosition, open: bool) {
        self.lock().valves[side_index(side)][row.index()] = open;
    }

    /// Run `action` once, right after the `nth` read (1-based, counted from
    /// creation) of the given kind. The action runs with the simulator
    /// unlocked, so it may drive the simulator through an `Arc`.
    pub fn on_read(&self, kind: ReadKind, nth: u64, action: impl FnOnce() + Send + 'static) {
        self.lock().hooks.push(ReadHook {
            kind,
            at: nth,
            action: Box::new(action),
        });
    }

    /// Number of reads of a kind so far.
    pub fn reads(&self, kind: ReadKind) -> u64 {
        let sim = self.lock();
        match kind {
            ReadKind::WaterLevel => sim.water_reads,
            ReadKind::DoorState => sim.door_reads,
        }
    }

    /// Every command issued so far, in order.
    pub fn command_log(&self) -> Vec<HardwareCommand> {
        self.lock().log.clone()
    }

    pub fn clear_log(&self) {
        self.lock().log.clear();
    }

    /// Current state without advancing any motion.
    pub fn snapshot(&self) -> ChamberSnapshot {
        let sim = self.lock();
        ChamberSnapshot {
            level: sim.level(),
            left_door: sim.gates[0].reported(),
            right_door: sim.gates[1].reported(),
            lights: sim.lights,
            valves: sim.valves,
        }
    }
}

impl LockHardware for SimulatedLock {
    fn door_state(&self, side: DoorSide) -> DoorState {
        let (state, due) = {
            let mut sim = self.lock();
            sim.door_reads += 1;
            let gate = sim.gate(side);
            gate.advance();
            let state = gate.reported();
            (state, sim.take_due_hooks(ReadKind::DoorState))
        };
        due.into_iter().for_each(|action| action());
        state
    }

    fn water_level(&self) -> WaterLevel {
        let (level, due) = {
            let mut sim = self.lock();
            sim.water_reads += 1;
            sim.step_water();
            let level = sim.level();
            (level, sim.take_due_hooks(ReadKind::WaterLevel))
        };
        due.into_iter().for_each(|action| action());
        level
    }

    fn light_state(&self, location: LightLocation) -> LightState {
        *self.lock().light_mut(location)
    }

    fn open_door(&self, side: DoorSide) -> bool {
        let mut sim = self.lock();
        if !sim.issue(HardwareCommand::OpenDoor(side)) {
            return false;
        }
        let gate = sim.gate(side);
        if !gate.locked && gate.travel < gate.full {
            gate.motion = Motion::Opening;
        }
        true
    }

    fn close_door(&self, side: DoorSide) -> bool {
        let mut sim = self.lock();
        if !sim.issue(HardwareCommand::CloseDoor(side)) {
            return false;
        }
        let gate = sim.gate(side);
        if gate.travel > 0 {
            gate.motion = Motion::Closing;
        }
        true
    }

    fn stop_door(&self, side: DoorSide) -> bool {
        let mut sim = self.lock();
        if !sim.issue(HardwareCommand::StopDoor(side)) {
            return false;
        }
        sim.gate(side).motion = Motion::Idle;
        true
    }

    fn lock_door(&self, side: DoorSide) -> bool {
        let mut sim = self.lock();
        if !sim.issue(HardwareCommand::LockDoor(side)) {
            return false;
        }
        let gate = sim.gate(side);
        if gate.travel != 0 || gate.motion != Motion::Idle {
            return false;
        }
        gate.locked = true;
        true
    }

    fn unlock_door(&self, side: DoorSide) -> bool {
        let mut sim = self.lock();
        if !sim.issue(HardwareCommand::UnlockDoor(side)) {
            return false;
        }
        sim.gate(side).locked = false;
        true
    }

    fn red_light(&self, location: LightLocation) -> LightCommandStatus {
        let mut sim = self.lock();
        if !sim.issue(HardwareCommand::RedLight(location)) {
            return LightCommandStatus::Unacked;
        }
        let light = sim.light_mut(location);
        if *light == LightState::Error {
            return LightCommandStatus::InvalidState;
        }
        *light = LightState::RedOn;
        LightCommandStatus::Ok
    }

    fn green_light(&self, location: LightLocation) -> LightCommandStatus {
        let mut sim = self.lock();
        if !sim.issue(HardwareCommand::GreenLight(location)) {
            return LightCommandStatus::Unacked;
        }
        let light = sim.light_mut(location);
        if *light == LightState::Error {
            return LightCommandStatus::InvalidState;
        }
        *light = LightState::GreenOn;
        LightCommandStatus::Ok
    }

    fn valve_open(&self, side: DoorSide, row: ValveRowPosition) -> bool {
        let mut sim = self.lock();
        if !sim.issue(HardwareCommand::ValveOpen(side, row)) {
            return false;
        }
        sim.valves[side_index(side)][row.index()] = true;
        true
    }

    fn valve_close(&self, side: DoorSide, row: ValveRowPosition) -> bool {
        let mut sim = self.lock();
        if !sim.issue(HardwareCommand::ValveClose(side, row)) {
            return false;
        }
        sim.valves[side_index(side)][row.index()] = false;
        true
    }

    fn valve_is_open(&self, side: DoorSide, row: ValveRowPosition) -> bool {
        self.lock().valves[side_index(side)][row.index()]
    }
}

fn side_index(side: DoorSide) -> usize {
    match side {
        DoorSide::Left => 0,
        DoorSide::Right => 1,
    }
}
