//! Error types for access configuration
//!
//! Evaluation itself never fails: a missing permission is `false`, an
//! unknown role is `None`. Errors only arise while ingesting configuration.

use thiserror::Error;

/// Access configuration error types.
#[derive(Debug, Error)]
pub enum AccessError {
    /// Configuration text could not be parsed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A role declares a malformed permission string
    #[error("Invalid permission {permission:?} in role {role}")]
    InvalidPermission {
        /// Role id
        role: String,
        /// Offending permission string
        permission: String,
    },
}

/// Result type for access configuration operations.
pub type AccessResult<T> = Result<T, AccessError>;

impl AccessError {
    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            AccessError::InvalidConfig(_) => "INVALID_CONFIG",
            AccessError::InvalidPermission { .. } => "INVALID_PERMISSION",
        }
    }
}
