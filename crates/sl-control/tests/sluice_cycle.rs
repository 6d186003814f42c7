//! Full passages through a simulated chamber.

use sl_control::{ControlError, PollPolicy, Sluice};
use sl_core::{
    ChamberMacroState, DoorSide, DoorState, DoorType, LightFacing, LightLocation, LightState,
    LockTypes, WaterLevel,
};
use sl_hardware::{CommandKind, HardwareCommand, LockHardware, SimConfig, SimulatedLock};

fn lock_types() -> LockTypes {
    LockTypes {
        left: DoorType::NoLock,
        right: DoorType::FastLock,
    }
}

fn policy() -> PollPolicy {
    PollPolicy::unbounded().with_max_polls(10_000)
}

fn light(side: DoorSide, facing: LightFacing) -> LightLocation {
    LightLocation::new(side, facing)
}

#[test]
fn vessel_goes_up_and_back_down() {
    let hw = SimulatedLock::new(SimConfig {
        right_door: DoorState::Locked,
        ..SimConfig::default()
    })
    .unwrap();
    let mut sluice = Sluice::new(&hw, lock_types(), policy());

    // Entry at low water.
    assert_eq!(sluice.allow_entry(), Ok(()));
    let snapshot = hw.snapshot();
    assert_eq!(snapshot.left_door, DoorState::Open);
    assert_eq!(snapshot.light(light(DoorSide::Left, LightFacing::Outside)), LightState::GreenOn);

    // Raise: the open left gate is closed first, with its signals red.
    assert_eq!(sluice.start(), Ok(()));
    let snapshot = hw.snapshot();
    assert_eq!(snapshot.level, WaterLevel::High);
    assert_eq!(snapshot.left_door, DoorState::Closed);
    assert_eq!(snapshot.light(light(DoorSide::Left, LightFacing::Outside)), LightState::RedOn);
    assert_eq!(snapshot.valve_bits(DoorSide::Right), [false; 3]);

    // Exit at high water through the fast-lock gate.
    assert_eq!(sluice.allow_exit(), Ok(()));
    let snapshot = hw.snapshot();
    assert_eq!(snapshot.right_door, DoorState::Open);
    assert_eq!(snapshot.light(light(DoorSide::Right, LightFacing::Inside)), LightState::GreenOn);
    assert!(hw.command_log().contains(&HardwareCommand::UnlockDoor(DoorSide::Right)));

    // Lower again: the right gate closes and locks itself.
    hw.clear_log();
    assert_eq!(sluice.start(), Ok(()));
    let snapshot = hw.snapshot();
    assert_eq!(snapshot.level, WaterLevel::Low);
    assert_eq!(snapshot.right_door, DoorState::Locked);
    assert_eq!(snapshot.light(light(DoorSide::Right, LightFacing::Inside)), LightState::RedOn);
    assert_eq!(snapshot.valve_bits(DoorSide::Left), [false; 3]);
    assert_eq!(sluice.macro_state(), ChamberMacroState::Waiting);

    let log = hw.command_log();
    let lock_at = log
        .iter()
        .position(|c| *c == HardwareCommand::LockDoor(DoorSide::Right))
        .unwrap();
    let drain_at = log
        .iter()
        .position(|c| c.kind() == CommandKind::ValveOpen)
        .unwrap();
    assert!(lock_at < drain_at, "gate locked before draining");
}

#[test]
fn open_gate_passage_only_touches_lights() {
    let hw = SimulatedLock::new(SimConfig {
        initial_level: WaterLevel::High,
        right_door: DoorState::Open,
        ..SimConfig::default()
    })
    .unwrap();
    let mut sluice = Sluice::new(&hw, lock_types(), policy());

    assert_eq!(sluice.allow_exit(), Ok(()));
    assert_eq!(
        hw.command_log(),
        vec![HardwareCommand::GreenLight(light(DoorSide::Right, LightFacing::Inside))]
    );

    assert_eq!(sluice.allow_entry(), Ok(()));
    assert_eq!(
        hw.command_log()[1..],
        [
            HardwareCommand::RedLight(light(DoorSide::Right, LightFacing::Inside)),
            HardwareCommand::GreenLight(light(DoorSide::Right, LightFacing::Outside)),
        ]
    );
}

#[test]
fn closing_under_broken_signal_never_moves_the_gate() {
    let hw = SimulatedLock::new(SimConfig {
        left_door: DoorState::Open,
        ..SimConfig::default()
    })
    .unwrap();
    hw.set_light(light(DoorSide::Left, LightFacing::Inside), LightState::Error);
    let mut sluice = Sluice::new(&hw, lock_types(), policy());

    assert_eq!(sluice.start(), Err(ControlError::InvalidLightState));
    assert!(
        !hw.command_log()
            .iter()
            .any(|c| c.kind() == CommandKind::CloseDoor)
    );
    assert_eq!(sluice.macro_state(), ChamberMacroState::SluicingUp);
}

#[test]
fn damaged_motor_stops_entry() {
    let hw = SimulatedLock::default();
    hw.force_door_state(DoorSide::Left, Some(DoorState::MotorDamaged));
    let mut sluice = Sluice::new(&hw, lock_types(), policy());

    assert_eq!(sluice.allow_entry(), Err(ControlError::MotorDamaged));
    assert!(hw.command_log().is_empty());
}

#[test]
fn bounded_loop_gives_up_and_closes_rows() {
    let hw = SimulatedLock::new(SimConfig {
        water_polls_per_level: 1_000,
        ..SimConfig::default()
    })
    .unwrap();
    let mut sluice = Sluice::new(&hw, lock_types(), PollPolicy::unbounded().with_max_polls(20));

    let err = sluice.start().unwrap_err();
    assert_eq!(
        err,
        ControlError::PollLimitExceeded {
            what: "raising chamber",
            polls: 20
        }
    );
    assert!(!err.is_retryable());
    assert_eq!(hw.snapshot().valve_bits(DoorSide::Right), [false; 3]);
}

#[test]
fn drives_hardware_behind_a_trait_object() {
    let sim = SimulatedLock::new(SimConfig {
        initial_level: WaterLevel::High,
        ..SimConfig::default()
    })
    .unwrap();
    let hw: &dyn LockHardware = &sim;
    let mut sluice = Sluice::new(hw, lock_types(), policy());

    assert_eq!(sluice.start(), Ok(()));
    assert_eq!(sim.snapshot().level, WaterLevel::Low);
    assert_eq!(sim.snapshot().right_door, DoorState::Closed);
}
