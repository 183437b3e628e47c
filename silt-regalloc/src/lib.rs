//! Silt Backend - Register Pressure Tracking
//!
//! Measures how many registers of each target pressure set are
//! simultaneously live across a region of a basic block, one machine
//! instruction at a time. A `PressureTracker` walks the block forward
//! (`advance`) or backward (`recede`) from an initial position,
//! maintaining the current weighted pressure per pressure set, the
//! high-water mark observed so far, and the registers that cross the
//! region's top and bottom boundaries.
//!
//! The tracker consumes the data model from `silt-mir` read-only: the
//! target register description (classes, weights, overlaps), the
//! virtual register table, the allocatable-register mask, and
//! optionally a live-interval table for precise kill detection.

pub mod liveset;
pub mod operands;
pub mod pressure;
pub mod tracker;

#[cfg(test)]
mod tests;

pub use liveset::LiveRegSet;
pub use operands::{collect_operands, RegOperands};
pub use pressure::{IntervalPressure, PressureResult, RegionPressure};
pub use tracker::{BoundaryState, PressureTracker};
