//! Lock configuration schema.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use sl_core::{DoorType, LockTypes, WaterLevel};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LockConfig {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub left: DoorDef,
    #[serde(default)]
    pub right: DoorDef,
    #[serde(default)]
    pub polling: PollingDef,
    #[serde(default)]
    pub simulator: SimulatorDef,
    /// Simulator port from version 0 files. Migration turns it into lock
    /// types; current files must not carry it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

impl LockConfig {
    /// A current-version configuration with default sections.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: crate::migrate::LATEST_VERSION,
            name: name.into(),
            left: DoorDef::default(),
            right: DoorDef::default(),
            polling: PollingDef::default(),
            simulator: SimulatorDef::default(),
            port: None,
        }
    }

    pub fn lock_types(&self) -> LockTypes {
        LockTypes {
            left: self.left.lock,
            right: self.right.lock,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DoorDef {
    #[serde(default)]
    pub lock: DoorType,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PollingDef {
    /// Delay between polls of the hardware, in milliseconds.
    #[serde(default)]
    pub interval_ms: u64,
    /// Upper bound on polls per loop; absent means unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_polls: Option<u64>,
}

impl PollingDef {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Behaviour of the in-memory chamber used when no real hardware is attached.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SimulatorDef {
    pub door_travel_polls: u32,
    pub water_polls_per_level: u32,
    pub initial_level: WaterLevel,
}

impl Default for SimulatorDef {
    fn default() -> Self {
        Self {
            door_travel_polls: 3,
            water_polls_per_level: 2,
            initial_level: WaterLevel::Low,
        }
    }
}
