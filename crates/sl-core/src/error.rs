use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Unknown {what}: '{value}'")]
    UnknownName { what: &'static str, value: String },

    #[error("Index out of range: {what} (index={index})")]
    IndexOob { what: &'static str, index: u8 },
}
