//! Error type of the command line front-end.

use sl_control::ControlError;
use sl_hardware::HardwareError;
use sl_project::ProjectError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Project(#[from] ProjectError),

    #[error("Simulator error: {0}")]
    Hardware(#[from] HardwareError),

    #[error("Step '{step}' failed: {source}")]
    Step {
        step: &'static str,
        source: ControlError,
    },
}

pub type CliResult<T> = Result<T, CliError>;
