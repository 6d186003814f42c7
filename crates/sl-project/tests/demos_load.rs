use std::path::PathBuf;

use sl_core::{DoorType, LockTypes, WaterLevel};
use sl_project::{load_json, load_yaml};

fn demo(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../demos")
        .join(name)
}

#[test]
fn demo_yaml_loads() {
    let config = load_yaml(&demo("lock3.yaml")).unwrap();
    assert_eq!(config.name, "Lock 3");
    assert_eq!(config.right.lock, DoorType::FastLock);
    assert_eq!(config.polling.max_polls, Some(100_000));
}

#[test]
fn demo_json_loads() {
    let config = load_json(&demo("fast_lock.json")).unwrap();
    assert_eq!(config.lock_types(), LockTypes::uniform(DoorType::FastLock));
    assert_eq!(config.simulator.initial_level, WaterLevel::High);
    assert_eq!(config.polling.interval().as_millis(), 5);
}

#[test]
fn legacy_demo_is_migrated() {
    let config = load_yaml(&demo("legacy_v0.yaml")).unwrap();
    assert_eq!(config.version, sl_project::LATEST_VERSION);
    assert_eq!(config.lock_types(), LockTypes::uniform(DoorType::FastLock));
    assert_eq!(config.port, None);
}
