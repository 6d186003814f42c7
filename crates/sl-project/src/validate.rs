//! Configuration validation logic.

use crate::schema::{LockConfig, PollingDef, SimulatorDef};

/// Longest accepted delay between polls.
pub const MAX_INTERVAL_MS: u64 = 60_000;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported feature: {feature} - {reason}")]
    Unsupported { feature: String, reason: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_config(config: &LockConfig) -> Result<(), ValidationError> {
    if config.version != crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: config.version,
        });
    }

    if config.name.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "name".to_string(),
            value: format!("{:?}", config.name),
            reason: "must not be empty".to_string(),
        });
    }

    if let Some(port) = config.port {
        return Err(ValidationError::Unsupported {
            feature: format!("port {}", port),
            reason: "set left.lock and right.lock instead".to_string(),
        });
    }

    validate_polling(&config.polling)?;
    validate_simulator(&config.simulator)?;
    Ok(())
}

fn validate_polling(polling: &PollingDef) -> Result<(), ValidationError> {
    if polling.interval_ms > MAX_INTERVAL_MS {
        return Err(ValidationError::InvalidValue {
            field: "polling.interval_ms".to_string(),
            value: polling.interval_ms.to_string(),
            reason: format!("must be at most {}", MAX_INTERVAL_MS),
        });
    }
    if polling.max_polls == Some(0) {
        return Err(ValidationError::InvalidValue {
            field: "polling.max_polls".to_string(),
            value: "0".to_string(),
            reason: "must be positive; omit it for no bound".to_string(),
        });
    }
    Ok(())
}

fn validate_simulator(simulator: &SimulatorDef) -> Result<(), ValidationError> {
    for (field, value) in [
        ("simulator.door_travel_polls", simulator.door_travel_polls),
        ("simulator.water_polls_per_level", simulator.water_polls_per_level),
    ] {
        if value == 0 {
            return Err(ValidationError::InvalidValue {
                field: field.to_string(),
                value: value.to_string(),
                reason: "must be positive".to_string(),
            });
        }
    }
    if simulator.initial_level.is_error() {
        return Err(ValidationError::InvalidValue {
            field: "simulator.initial_level".to_string(),
            value: simulator.initial_level.to_string(),
            reason: "must be a real level".to_string(),
        });
    }
    Ok(())
}
