//! sl-project: lock configuration file format and validation.

pub mod migrate;
pub mod schema;
pub mod validate;

pub use migrate::{FAST_LOCK_PORT, LATEST_VERSION, migrate_to_latest};
pub use schema::*;
pub use validate::{ValidationError, validate_config};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Migration error: {what}")]
    Migration { what: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse, migrate and validate a YAML document.
pub fn from_yaml_str(content: &str) -> ProjectResult<LockConfig> {
    let config: LockConfig = serde_yaml::from_str(content)?;
    finish_load(config)
}

pub fn load_yaml(path: &std::path::Path) -> ProjectResult<LockConfig> {
    let content = std::fs::read_to_string(path)?;
    from_yaml_str(&content)
}

pub fn save_yaml(path: &std::path::Path, config: &LockConfig) -> ProjectResult<()> {
    validate_config(config)?;
    let content = serde_yaml::to_string(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ProjectResult<LockConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: LockConfig = serde_json::from_str(&content)?;
    finish_load(config)
}

pub fn save_json(path: &std::path::Path, config: &LockConfig) -> ProjectResult<()> {
    validate_config(config)?;
    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

fn finish_load(config: LockConfig) -> ProjectResult<LockConfig> {
    let config = migrate_to_latest(config)?;
    validate_config(&config)?;
    Ok(config)
}
