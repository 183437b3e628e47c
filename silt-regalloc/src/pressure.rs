//! Set-pressure arithmetic and per-region pressure results
//!
//! Pressure is counted per target pressure set, not per register: every
//! live register adds its class weight to each set the class belongs
//! to. A region's result carries the high-water mark per set plus the
//! registers found to cross the region's boundaries. Two result
//! flavors exist, differing only in how the boundary endpoints are
//! recorded: slot indexes when live intervals are available, plain
//! instruction positions otherwise.

use serde::{Deserialize, Serialize};
use silt_common::RegClassId;
use silt_mir::{Reg, SlotIndex, TargetDesc};

/// Add `class`'s weight to each of its pressure sets in `curr`,
/// raising `max` wherever `curr` passes it.
pub fn increase_set_pressure(
    curr: &mut [u32],
    max: &mut [u32],
    class: RegClassId,
    target: &TargetDesc,
) {
    let weight = target.class_weight(class);
    for &set in target.pressure_sets_of(class) {
        let set = set as usize;
        curr[set] += weight;
        if curr[set] > max[set] {
            max[set] = curr[set];
        }
    }
}

/// Remove `class`'s weight from each of its pressure sets in `curr`.
pub fn decrease_set_pressure(curr: &mut [u32], class: RegClassId, target: &TargetDesc) {
    let weight = target.class_weight(class);
    for &set in target.pressure_sets_of(class) {
        let set = set as usize;
        assert!(curr[set] >= weight, "register pressure underflow");
        curr[set] -= weight;
    }
}

/// Pressure summary of one scanned region: the per-set high-water mark
/// and the registers live across the top and bottom boundaries. Both
/// register lists stay sorted and duplicate-free.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PressureResult {
    pub max_set_pressure: Vec<u32>,
    pub live_in_regs: Vec<Reg>,
    pub live_out_regs: Vec<Reg>,
}

impl PressureResult {
    fn reset(&mut self) {
        self.max_set_pressure.clear();
        self.live_in_regs.clear();
        self.live_out_regs.clear();
    }

    /// Bump the high-water mark for `class` without touching any
    /// current-pressure vector. Used when a boundary-crossing register
    /// is discovered mid-scan.
    pub fn increase(&mut self, class: RegClassId, target: &TargetDesc) {
        let weight = target.class_weight(class);
        for &set in target.pressure_sets_of(class) {
            self.max_set_pressure[set as usize] += weight;
        }
    }

    /// Directly lower the high-water mark for `class`.
    pub fn decrease(&mut self, class: RegClassId, target: &TargetDesc) {
        decrease_set_pressure(&mut self.max_set_pressure, class, target);
    }
}

/// Region pressure with slot-indexed boundaries (live intervals
/// available).
#[derive(Debug, Clone, Default)]
pub struct IntervalPressure {
    pub top_idx: Option<SlotIndex>,
    pub bottom_idx: Option<SlotIndex>,
    pub result: PressureResult,
}

impl IntervalPressure {
    /// Clear for another round of tracking.
    pub fn reset(&mut self) {
        self.top_idx = None;
        self.bottom_idx = None;
        self.result.reset();
    }

    /// Reopen the top if the recorded boundary no longer encloses the
    /// position about to be crossed. Keeps the boundary whenever
    /// `top_idx <= next_top`.
    pub fn open_top(&mut self, next_top: SlotIndex) {
        match self.top_idx {
            Some(top) if top <= next_top => return,
            None => return,
            _ => {}
        }
        self.top_idx = None;
        self.result.live_in_regs.clear();
    }

    /// Reopen the bottom unless it still encloses the position about to
    /// be crossed. Keeps the boundary whenever `bottom_idx > prev_bottom`.
    pub fn open_bottom(&mut self, prev_bottom: SlotIndex) {
        match self.bottom_idx {
            Some(bottom) if bottom > prev_bottom => return,
            None => return,
            _ => {}
        }
        self.bottom_idx = None;
        self.result.live_out_regs.clear();
    }
}

/// Region pressure with position-based boundaries (no live intervals).
#[derive(Debug, Clone, Default)]
pub struct RegionPressure {
    pub top_pos: Option<usize>,
    pub bottom_pos: Option<usize>,
    pub result: PressureResult,
}

impl RegionPressure {
    /// Clear for another round of tracking.
    pub fn reset(&mut self) {
        self.top_pos = None;
        self.bottom_pos = None;
        self.result.reset();
    }

    /// Reopen the top if it is exactly the instruction being crossed.
    pub fn open_top(&mut self, prev_top: usize) {
        if self.top_pos != Some(prev_top) {
            return;
        }
        self.top_pos = None;
        self.result.live_in_regs.clear();
    }

    /// Reopen the bottom if it is exactly the instruction being crossed.
    pub fn open_bottom(&mut self, prev_bottom: usize) {
        if self.bottom_pos != Some(prev_bottom) {
            return;
        }
        self.bottom_pos = None;
        self.result.live_out_regs.clear();
    }
}
