//! Common scalar identifiers used throughout the backend
//!
//! These are plain indices into target-description tables; the tables
//! themselves live in `silt-mir`.

/// Index of a target pressure set
pub type PressureSetId = u16;

/// Index of a target register class
pub type RegClassId = u16;
