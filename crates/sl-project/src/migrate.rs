//! Schema migration framework.

use sl_core::{DoorType, LockTypes};

use crate::ProjectError;
use crate::schema::{DoorDef, LockConfig};

pub const LATEST_VERSION: u32 = 1;

/// Port on which version 0 installations ran their fast-locking chamber.
pub const FAST_LOCK_PORT: u16 = 5557;

pub fn migrate_to_latest(mut config: LockConfig) -> Result<LockConfig, ProjectError> {
    while config.version < LATEST_VERSION {
        config = migrate_one_version(config)?;
    }
    Ok(config)
}

fn migrate_one_version(config: LockConfig) -> Result<LockConfig, ProjectError> {
    match config.version {
        0 => migrate_v0_to_v1(config),
        v => Err(ProjectError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

/// Version 0 selected the lock type of both gates by simulator port.
fn migrate_v0_to_v1(mut config: LockConfig) -> Result<LockConfig, ProjectError> {
    if let Some(port) = config.port.take() {
        let kind = if port == FAST_LOCK_PORT {
            DoorType::FastLock
        } else {
            DoorType::NoLock
        };
        let types = LockTypes::uniform(kind);
        config.left = DoorDef { lock: types.left };
        config.right = DoorDef { lock: types.right };
    }
    config.version = 1;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v0(port: Option<u16>) -> LockConfig {
        LockConfig {
            version: 0,
            port,
            ..LockConfig::new("legacy")
        }
    }

    #[test]
    fn fast_lock_port_makes_both_gates_fast_lock() {
        let config = migrate_to_latest(v0(Some(FAST_LOCK_PORT))).unwrap();
        assert_eq!(config.version, LATEST_VERSION);
        assert_eq!(config.lock_types(), LockTypes::uniform(DoorType::FastLock));
        assert_eq!(config.port, None);
    }

    #[test]
    fn other_ports_are_no_lock() {
        let config = migrate_to_latest(v0(Some(5555))).unwrap();
        assert_eq!(config.lock_types(), LockTypes::uniform(DoorType::NoLock));
    }

    #[test]
    fn missing_port_keeps_sections() {
        let mut legacy = v0(None);
        legacy.right.lock = DoorType::FastLock;
        let config = migrate_to_latest(legacy).unwrap();
        assert_eq!(config.right.lock, DoorType::FastLock);
        assert_eq!(config.left.lock, DoorType::NoLock);
    }
}
