//! Silt Backend - Machine IR and Target Data Model
//!
//! This crate defines the machine-level data structures the backend
//! analyses operate on: register identifiers, target register
//! descriptions (classes, overlaps, pressure sets), instructions with
//! register operands, and slot-indexed live-interval tables.
//!
//! Everything here is plain data built by the caller; the analyses that
//! consume it (such as the pressure tracker in `silt-regalloc`) borrow
//! it read-only.

pub mod instr;
pub mod reg;
pub mod slots;
pub mod target;

pub use instr::{MachineBlock, MachineInst, Operand};
pub use reg::Reg;
pub use slots::{LiveInterval, LiveIntervals, SlotIndex};
pub use target::{AllocatableInfo, RegClass, TargetDesc, VirtRegTable};
