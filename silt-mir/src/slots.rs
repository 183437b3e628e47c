//! Slot indexes and live-interval tables
//!
//! Each instruction position `i` owns two totally-ordered slots: a base
//! slot `2*i` and a register slot `2*i + 1` (where its register
//! writes/kills take effect). A `LiveIntervals` table records, per
//! virtual register, the register slots at which the register is
//! killed. The table is built from caller-provided liveness data; it
//! performs no analysis of its own.

use crate::instr::MachineBlock;
use crate::reg::Reg;
use serde::{Deserialize, Serialize};
use silt_common::BackendError;
use std::collections::BTreeMap;
use std::fmt;

/// A totally-ordered position in the instruction stream.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SlotIndex(pub u32);

impl SlotIndex {
    /// Base slot of the instruction at position `pos`.
    pub fn base_of(pos: usize) -> SlotIndex {
        SlotIndex(2 * pos as u32)
    }

    /// The register sub-slot of this index.
    pub fn register_slot(self) -> SlotIndex {
        SlotIndex(self.0 | 1)
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.0 >> 1, if self.0 & 1 == 1 { "r" } else { "" })
    }
}

/// Kill positions of one virtual register.
#[derive(Debug, Clone)]
pub struct LiveInterval {
    pub reg: Reg,
    kill_slots: Vec<SlotIndex>,
}

impl LiveInterval {
    /// Whether the register's live range ends at `slot`.
    pub fn killed_at(&self, slot: SlotIndex) -> bool {
        self.kill_slots.binary_search(&slot).is_ok()
    }
}

/// Per-virtual-register interval table plus the instruction/slot
/// numbering for one block.
#[derive(Debug, Clone, Default)]
pub struct LiveIntervals {
    intervals: BTreeMap<u32, LiveInterval>,
}

impl LiveIntervals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the kill slots of a virtual register.
    pub fn add_interval(
        &mut self,
        reg: Reg,
        kill_slots: Vec<SlotIndex>,
    ) -> Result<(), BackendError> {
        if !reg.is_virtual() {
            return Err(BackendError::invalid_interval(
                reg.to_string(),
                "intervals are tracked for virtual registers only",
            ));
        }
        if kill_slots.windows(2).any(|w| w[0] >= w[1]) {
            return Err(BackendError::invalid_interval(
                reg.to_string(),
                "kill slots must be strictly increasing",
            ));
        }
        self.intervals
            .insert(reg.virt_index(), LiveInterval { reg, kill_slots });
        Ok(())
    }

    /// Slot of the instruction at `pos`.
    pub fn slot_index_of(&self, pos: usize) -> SlotIndex {
        SlotIndex::base_of(pos)
    }

    /// Slot just past the last instruction of the block.
    pub fn block_end_slot(&self, block: &MachineBlock) -> SlotIndex {
        SlotIndex::base_of(block.end())
    }

    /// Interval of a virtual register. The register must have been
    /// registered with `add_interval`.
    pub fn interval_of(&self, reg: Reg) -> &LiveInterval {
        self.intervals
            .get(&reg.virt_index())
            .expect("no live interval recorded for virtual register")
    }
}
