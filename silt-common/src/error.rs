//! Error handling for the Silt backend
//!
//! This module defines the error type shared by the backend crates.
//! Recoverable errors only cover data validation (building target
//! descriptions and interval tables); violations of tracker contracts
//! are programmer errors and panic instead.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main backend error type
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BackendError {
    #[error("Invalid target description: {message}")]
    InvalidTarget { message: String },

    #[error("Invalid live interval for {reg}: {message}")]
    InvalidInterval { reg: String, message: String },

    #[error("Internal backend error: {message}")]
    InternalError { message: String },
}

impl BackendError {
    /// Create a target-description validation error
    pub fn invalid_target(message: impl Into<String>) -> Self {
        BackendError::InvalidTarget {
            message: message.into(),
        }
    }

    /// Create a live-interval validation error
    pub fn invalid_interval(reg: impl Into<String>, message: impl Into<String>) -> Self {
        BackendError::InvalidInterval {
            reg: reg.into(),
            message: message.into(),
        }
    }
}

/// Convert from String (for simple error cases)
impl From<String> for BackendError {
    fn from(message: String) -> Self {
        BackendError::InternalError { message }
    }
}
