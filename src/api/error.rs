use thiserror::Error;

use crate::core::DomainError;

/// Failure turning user-facing inputs (percentages, monthly amounts, city
/// names) into a scenario the cost model accepts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("unsupported jurisdiction: {0}")]
    UnsupportedJurisdiction(String),

    #[error("{flag} {reason}")]
    InvalidInput {
        flag: &'static str,
        reason: &'static str,
    },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("failed to encode JSON output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}
