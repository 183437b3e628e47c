//! Silt Backend - Common Types and Utilities
//!
//! This crate contains shared types and error definitions used across
//! all components of the Silt machine-level backend.

pub mod error;
pub mod types;

pub use error::BackendError;
pub use types::*;
