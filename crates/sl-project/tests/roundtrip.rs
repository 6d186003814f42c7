use proptest::prelude::*;
use sl_core::{DoorType, WaterLevel};
use sl_project::schema::*;
use sl_project::{
    ProjectError, ValidationError, from_yaml_str, load_json, load_yaml, save_json, save_yaml,
    validate_config,
};

fn sample() -> LockConfig {
    LockConfig {
        left: DoorDef {
            lock: DoorType::NoLock,
        },
        right: DoorDef {
            lock: DoorType::FastLock,
        },
        polling: PollingDef {
            interval_ms: 10,
            max_polls: Some(5_000),
        },
        simulator: SimulatorDef {
            door_travel_polls: 5,
            water_polls_per_level: 1,
            initial_level: WaterLevel::High,
        },
        ..LockConfig::new("Lock 3")
    }
}

#[test]
fn roundtrip_yaml() {
    let config = sample();
    validate_config(&config).unwrap();

    let path = std::env::temp_dir().join("sl_project_roundtrip.yaml");
    save_yaml(&path, &config).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(config, loaded);
}

#[test]
fn roundtrip_json() {
    let config = sample();
    let path = std::env::temp_dir().join("sl_project_roundtrip.json");
    save_json(&path, &config).unwrap();
    let loaded = load_json(&path).unwrap();

    assert_eq!(config, loaded);
}

#[test]
fn minimal_yaml_uses_defaults() {
    let config = from_yaml_str("version: 1\nname: Bare\n").unwrap();
    assert_eq!(config.left.lock, DoorType::NoLock);
    assert_eq!(config.right.lock, DoorType::NoLock);
    assert_eq!(config.polling, PollingDef::default());
    assert_eq!(config.simulator, SimulatorDef::default());
}

#[test]
fn unknown_lock_type_is_a_yaml_error() {
    let err = from_yaml_str("version: 1\nname: Bad\nleft: { lock: padlock }\n").unwrap_err();
    assert!(matches!(err, ProjectError::Yaml(_)));
}

#[test]
fn invalid_config_is_not_saved() {
    let config = LockConfig {
        name: String::new(),
        ..sample()
    };
    let path = std::env::temp_dir().join("sl_project_never_written.yaml");
    let _ = std::fs::remove_file(&path);

    let err = save_yaml(&path, &config).unwrap_err();
    assert!(matches!(
        err,
        ProjectError::Validation(ValidationError::InvalidValue { .. })
    ));
    assert!(!path.exists());
}

proptest! {
    #[test]
    fn polling_validation_matches_bounds(
        interval_ms in 0u64..120_000,
        max_polls in proptest::option::of(0u64..1_000),
    ) {
        let config = LockConfig {
            polling: PollingDef { interval_ms, max_polls },
            ..LockConfig::new("generated")
        };
        let expected = interval_ms <= 60_000 && max_polls != Some(0);
        prop_assert_eq!(validate_config(&config).is_ok(), expected);
    }
}
