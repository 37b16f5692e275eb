use thiserror::Error;

/// Contract violations raised by the matching core
#[derive(Debug, Error, PartialEq)]
pub enum MatchError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<validator::ValidationErrors> for MatchError {
    fn from(errors: validator::ValidationErrors) -> Self {
        MatchError::Validation(errors.to_string())
    }
}
