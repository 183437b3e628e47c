//! The pressure tracker: bidirectional per-instruction scanning
//!
//! A `PressureTracker` owns a cursor into one basic block and walks it
//! one real instruction at a time, upward (`recede`) or downward
//! (`advance`), skipping debug pseudo-instructions. Crossing an
//! instruction applies its liveness transitions to the working live
//! sets and the current pressure vector, records the per-set high-water
//! mark, and discovers registers that are live across whichever region
//! boundary is still open.
//!
//! With a live-interval table the tracker uses slot-indexed boundaries
//! and precise kill information; without one it falls back to
//! position-based boundaries and deliberately coarser virtual-register
//! results (every unseen use is treated as live-in).

use log::{debug, trace};
use silt_common::RegClassId;
use silt_mir::{AllocatableInfo, LiveIntervals, MachineBlock, Reg, TargetDesc, VirtRegTable};

use crate::liveset::LiveRegSet;
use crate::operands::{collect_operands, find_reg_alias};
use crate::pressure::{
    decrease_set_pressure, increase_set_pressure, IntervalPressure, PressureResult,
    RegionPressure,
};

/// The two region-boundary flavors, sharing the `PressureResult` tail.
#[derive(Debug, Clone)]
pub enum BoundaryState {
    /// Slot-indexed endpoints; requires live intervals.
    Interval(IntervalPressure),
    /// Instruction-position endpoints.
    Region(RegionPressure),
}

impl BoundaryState {
    pub fn result(&self) -> &PressureResult {
        match self {
            BoundaryState::Interval(p) => &p.result,
            BoundaryState::Region(p) => &p.result,
        }
    }

    fn result_mut(&mut self) -> &mut PressureResult {
        match self {
            BoundaryState::Interval(p) => &mut p.result,
            BoundaryState::Region(p) => &mut p.result,
        }
    }
}

/// Append `reg` to a sorted register list, keeping it sorted. No-op if
/// already present.
fn insert_sorted(regs: &mut Vec<Reg>, reg: Reg) {
    if let Err(pos) = regs.binary_search(&reg) {
        regs.insert(pos, reg);
    }
}

/// Tracks register pressure across a region of one basic block.
pub struct PressureTracker<'a> {
    target: &'a TargetDesc,
    virt_regs: &'a VirtRegTable,
    allocatable: &'a AllocatableInfo,
    intervals: Option<&'a LiveIntervals>,
    block: &'a MachineBlock,
    require_intervals: bool,

    /// Cursor position within the block; `block.end()` is past-the-end.
    pos: usize,
    /// Current weighted pressure per pressure set.
    curr_set_pressure: Vec<u32>,
    /// Boundary endpoints, high-water mark and boundary registers.
    boundary: BoundaryState,
    /// Physical registers live at the cursor, keyed by hardware id.
    live_phys: LiveRegSet,
    /// Virtual registers live at the cursor, keyed by virtual index.
    live_virt: LiveRegSet,
}

impl<'a> PressureTracker<'a> {
    /// Set up a tracker at `pos` inside `block`.
    ///
    /// When `require_intervals` is true, `intervals` must be provided
    /// and the tracker uses slot-indexed boundaries with precise kill
    /// detection; passing `None` then is a fatal misuse. Leading debug
    /// pseudo-instructions at `pos` are skipped.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        require_intervals: bool,
        target: &'a TargetDesc,
        virt_regs: &'a VirtRegTable,
        allocatable: &'a AllocatableInfo,
        intervals: Option<&'a LiveIntervals>,
        block: &'a MachineBlock,
        pos: usize,
    ) -> Self {
        if require_intervals {
            assert!(
                intervals.is_some(),
                "interval pressure tracking requires live intervals"
            );
        }

        let mut pos = pos;
        while pos != block.end() && block.insts[pos].is_debug_value() {
            pos += 1;
        }

        let num_sets = target.num_pressure_sets();
        let zero = vec![0u32; num_sets];

        let boundary = if require_intervals {
            let mut p = IntervalPressure::default();
            p.reset();
            p.result.max_set_pressure = zero.clone();
            BoundaryState::Interval(p)
        } else {
            let mut p = RegionPressure::default();
            p.reset();
            p.result.max_set_pressure = zero.clone();
            BoundaryState::Region(p)
        };

        let mut live_phys = LiveRegSet::new();
        live_phys.set_universe(target.num_regs() as usize);
        let mut live_virt = LiveRegSet::new();
        live_virt.set_universe(virt_regs.num_virt_regs() as usize);

        debug!(
            "pressure tracker at {pos} over {} insts, {num_sets} pressure sets",
            block.len()
        );

        Self {
            target,
            virt_regs,
            allocatable,
            intervals,
            block,
            require_intervals,
            pos,
            curr_set_pressure: zero,
            boundary,
            live_phys,
            live_virt,
        }
    }

    /// The accumulated result: high-water mark and boundary registers.
    pub fn pressure(&self) -> &PressureResult {
        self.boundary.result()
    }

    /// Boundary endpoints in whichever flavor is active.
    pub fn boundary(&self) -> &BoundaryState {
        &self.boundary
    }

    pub fn curr_set_pressure(&self) -> &[u32] {
        &self.curr_set_pressure
    }

    pub fn live_in_regs(&self) -> &[Reg] {
        &self.boundary.result().live_in_regs
    }

    pub fn live_out_regs(&self) -> &[Reg] {
        &self.boundary.result().live_out_regs
    }

    pub fn cursor(&self) -> usize {
        self.pos
    }

    pub fn live_phys(&self) -> &LiveRegSet {
        &self.live_phys
    }

    pub fn live_virt(&self) -> &LiveRegSet {
        &self.live_virt
    }

    fn intervals(&self) -> &'a LiveIntervals {
        self.intervals
            .expect("interval pressure tracking requires live intervals")
    }

    fn class_of(&self, reg: Reg) -> RegClassId {
        if reg.is_virtual() {
            self.virt_regs.class_of(reg)
        } else {
            self.target.minimal_phys_class(reg)
        }
    }

    /// Raise current pressure for each register's class, bumping the
    /// high-water mark where passed.
    fn increase_reg_pressure(&mut self, regs: &[Reg]) {
        for &reg in regs {
            let class = self.class_of(reg);
            let result = self.boundary.result_mut();
            increase_set_pressure(
                &mut self.curr_set_pressure,
                &mut result.max_set_pressure,
                class,
                self.target,
            );
        }
    }

    /// Lower current pressure for each register's class.
    fn decrease_reg_pressure(&mut self, regs: &[Reg]) {
        for &reg in regs {
            let class = self.class_of(reg);
            decrease_set_pressure(&mut self.curr_set_pressure, class, self.target);
        }
    }

    /// Does the region have a recorded top boundary (with live-ins)?
    pub fn is_top_closed(&self) -> bool {
        match &self.boundary {
            BoundaryState::Interval(p) => p.top_idx.is_some(),
            BoundaryState::Region(p) => p.top_pos.is_some(),
        }
    }

    /// Does the region have a recorded bottom boundary (with live-outs)?
    pub fn is_bottom_closed(&self) -> bool {
        match &self.boundary {
            BoundaryState::Interval(p) => p.bottom_idx.is_some(),
            BoundaryState::Region(p) => p.bottom_pos.is_some(),
        }
    }

    /// All currently-live registers, sorted and deduplicated.
    fn snapshot_live_regs(&self) -> Vec<Reg> {
        let mut regs = Vec::with_capacity(self.live_phys.len() + self.live_virt.len());
        regs.extend(self.live_phys.iter().map(Reg::phys));
        regs.extend(self.live_virt.iter().map(Reg::virt));
        regs.sort();
        regs.dedup();
        regs
    }

    /// Record the top boundary at the cursor and summarize live-ins.
    pub fn close_top(&mut self) {
        let pos = self.pos;
        match &mut self.boundary {
            BoundaryState::Interval(p) => {
                let slot = self.intervals.expect("no intervals").slot_index_of(pos);
                p.top_idx = Some(slot.register_slot());
            }
            BoundaryState::Region(p) => p.top_pos = Some(pos),
        }

        let snapshot = self.snapshot_live_regs();
        trace!("close top at {pos}: {} live regs", snapshot.len());
        let result = self.boundary.result_mut();
        assert!(
            result.live_in_regs.is_empty(),
            "inconsistent max pressure result"
        );
        result.live_in_regs = snapshot;
    }

    /// Record the bottom boundary at the cursor and summarize live-outs.
    pub fn close_bottom(&mut self) {
        let pos = self.pos;
        let at_end = pos == self.block.end();
        match &mut self.boundary {
            BoundaryState::Interval(p) => {
                let lis = self.intervals.expect("no intervals");
                p.bottom_idx = Some(if at_end {
                    lis.block_end_slot(self.block)
                } else {
                    lis.slot_index_of(pos).register_slot()
                });
            }
            BoundaryState::Region(p) => p.bottom_pos = Some(pos),
        }

        let snapshot = self.snapshot_live_regs();
        trace!("close bottom at {pos}: {} live regs", snapshot.len());
        let result = self.boundary.result_mut();
        assert!(
            result.live_out_regs.is_empty(),
            "inconsistent max pressure result"
        );
        result.live_out_regs = snapshot;
    }

    /// Finalize the region: close whichever single boundary is still
    /// open. With both boundaries open nothing has been tracked and the
    /// live sets must be empty.
    pub fn close_region(&mut self) {
        if !self.is_top_closed() && !self.is_bottom_closed() {
            assert!(
                self.live_phys.is_empty() && self.live_virt.is_empty(),
                "no region boundary"
            );
            return;
        }
        if !self.is_bottom_closed() {
            self.close_bottom();
        } else if !self.is_top_closed() {
            self.close_top();
        }
        // Both already closed: nothing to do.
    }

    /// Record a physical register live across the still-open top
    /// boundary and charge it to the high-water mark.
    fn discover_phys_live_in(&mut self, reg: Reg) {
        assert!(
            !self.live_phys.contains(reg.phys_index()),
            "avoid bumping max pressure twice"
        );
        let target = self.target;
        let class = self.target.minimal_phys_class(reg);
        let result = self.boundary.result_mut();
        if find_reg_alias(reg, &result.live_in_regs, target).is_some() {
            return;
        }
        debug!("discovered phys live-in {reg}");
        insert_sorted(&mut result.live_in_regs, reg);
        result.increase(class, target);
    }

    /// Record a physical register live across the still-open bottom
    /// boundary and charge it to the high-water mark.
    fn discover_phys_live_out(&mut self, reg: Reg) {
        assert!(
            !self.live_phys.contains(reg.phys_index()),
            "avoid bumping max pressure twice"
        );
        let target = self.target;
        let class = self.target.minimal_phys_class(reg);
        let result = self.boundary.result_mut();
        if find_reg_alias(reg, &result.live_out_regs, target).is_some() {
            return;
        }
        debug!("discovered phys live-out {reg}");
        insert_sorted(&mut result.live_out_regs, reg);
        result.increase(class, target);
    }

    /// Record a virtual register live across the still-open top
    /// boundary and charge it to the high-water mark.
    fn discover_virt_live_in(&mut self, reg: Reg) {
        assert!(
            !self.live_virt.contains(reg.virt_index()),
            "avoid bumping max pressure twice"
        );
        let target = self.target;
        let class = self.virt_regs.class_of(reg);
        let result = self.boundary.result_mut();
        if result.live_in_regs.binary_search(&reg).is_ok() {
            return;
        }
        debug!("discovered virt live-in {reg}");
        insert_sorted(&mut result.live_in_regs, reg);
        result.increase(class, target);
    }

    /// Record a virtual register live across the still-open bottom
    /// boundary and charge it to the high-water mark.
    fn discover_virt_live_out(&mut self, reg: Reg) {
        assert!(
            !self.live_virt.contains(reg.virt_index()),
            "avoid bumping max pressure twice"
        );
        let target = self.target;
        let class = self.virt_regs.class_of(reg);
        let result = self.boundary.result_mut();
        if result.live_out_regs.binary_search(&reg).is_ok() {
            return;
        }
        debug!("discovered virt live-out {reg}");
        insert_sorted(&mut result.live_out_regs, reg);
        result.increase(class, target);
    }

    /// Step one instruction upward. Returns false when no analyzable
    /// instruction remains above, after finalizing the region.
    pub fn recede(&mut self) -> bool {
        // Top of the analyzable region.
        if self.pos == 0 {
            self.close_region();
            return false;
        }
        if !self.is_bottom_closed() {
            self.close_bottom();
        }

        // Growing upward past the recorded top reopens it.
        if !self.require_intervals && self.is_top_closed() {
            let pos = self.pos;
            if let BoundaryState::Region(p) = &mut self.boundary {
                p.open_top(pos);
            }
        }

        // Find the previous real instruction.
        loop {
            self.pos -= 1;
            if self.pos == 0 || !self.block.insts[self.pos].is_debug_value() {
                break;
            }
        }
        if self.block.insts[self.pos].is_debug_value() {
            self.close_region();
            return false;
        }

        let slot_idx = if self.require_intervals {
            Some(self.intervals().slot_index_of(self.pos).register_slot())
        } else {
            None
        };

        if self.require_intervals && self.is_top_closed() {
            if let BoundaryState::Interval(p) = &mut self.boundary {
                p.open_top(slot_idx.expect("no slot index"));
            }
        }

        trace!("recede across {}", self.pos);
        let (phys, virt) = collect_operands(
            &self.block.insts[self.pos],
            self.target,
            self.allocatable,
        );

        // Boost pressure for all dead defs together.
        self.increase_reg_pressure(&phys.dead_defs);
        self.increase_reg_pressure(&virt.dead_defs);
        self.decrease_reg_pressure(&phys.dead_defs);
        self.decrease_reg_pressure(&virt.dead_defs);

        // Kill liveness at live defs.
        // TODO: consider earlyclobbers?
        for &reg in &phys.defs {
            if self.live_phys.erase(reg.phys_index()) {
                self.decrease_reg_pressure(&[reg]);
            } else {
                self.discover_phys_live_out(reg);
            }
        }
        for &reg in &virt.defs {
            if self.live_virt.erase(reg.virt_index()) {
                self.decrease_reg_pressure(&[reg]);
            } else {
                self.discover_virt_live_out(reg);
            }
        }

        // Generate liveness for uses.
        for &reg in &phys.uses {
            if !self.live_phys.contains_alias(reg, self.target) {
                self.increase_reg_pressure(&[reg]);
                self.live_phys.insert(reg.phys_index());
            }
        }
        for &reg in &virt.uses {
            if !self.live_virt.contains(reg.virt_index()) {
                // A use that is not killed here is also live below the
                // region.
                if self.require_intervals {
                    let li = self.intervals().interval_of(reg);
                    if !li.killed_at(slot_idx.expect("no slot index")) {
                        self.discover_virt_live_out(reg);
                    }
                }
                self.increase_reg_pressure(&[reg]);
                self.live_virt.insert(reg.virt_index());
            }
        }
        true
    }

    /// Step one instruction downward. Returns false when no analyzable
    /// instruction remains below, after finalizing the region.
    pub fn advance(&mut self) -> bool {
        // Bottom of the analyzable region.
        if self.pos == self.block.end() {
            self.close_region();
            return false;
        }
        if !self.is_top_closed() {
            self.close_top();
        }

        let slot_idx = if self.require_intervals {
            Some(self.intervals().slot_index_of(self.pos).register_slot())
        } else {
            None
        };

        // Growing downward past the recorded bottom reopens it.
        if self.is_bottom_closed() {
            let pos = self.pos;
            match &mut self.boundary {
                BoundaryState::Interval(p) => p.open_bottom(slot_idx.expect("no slot index")),
                BoundaryState::Region(p) => p.open_bottom(pos),
            }
        }

        trace!("advance across {}", self.pos);
        let (phys, virt) = collect_operands(
            &self.block.insts[self.pos],
            self.target,
            self.allocatable,
        );

        // Kill liveness at last uses.
        for &reg in &phys.uses {
            if !self.live_phys.contains_alias(reg, self.target) {
                self.discover_phys_live_in(reg);
            } else {
                // Allocatable physregs are always single-use before
                // register allocation.
                self.decrease_reg_pressure(&[reg]);
                self.live_phys.erase(reg.phys_index());
            }
        }
        for &reg in &virt.uses {
            if self.require_intervals {
                let killed = self
                    .intervals()
                    .interval_of(reg)
                    .killed_at(slot_idx.expect("no slot index"));
                if killed {
                    if self.live_virt.erase(reg.virt_index()) {
                        self.decrease_reg_pressure(&[reg]);
                    } else {
                        self.discover_virt_live_in(reg);
                    }
                }
            } else if !self.live_virt.contains(reg.virt_index()) {
                self.discover_virt_live_in(reg);
                self.increase_reg_pressure(&[reg]);
            }
        }

        // Generate liveness for defs.
        for &reg in &phys.defs {
            if !self.live_phys.contains_alias(reg, self.target) {
                self.increase_reg_pressure(&[reg]);
                self.live_phys.insert(reg.phys_index());
            }
        }
        for &reg in &virt.defs {
            if self.live_virt.insert(reg.virt_index()) {
                self.increase_reg_pressure(&[reg]);
            }
        }

        // Boost pressure for all dead defs together.
        self.increase_reg_pressure(&phys.dead_defs);
        self.increase_reg_pressure(&virt.dead_defs);
        self.decrease_reg_pressure(&phys.dead_defs);
        self.decrease_reg_pressure(&virt.dead_defs);

        // Find the next real instruction.
        loop {
            self.pos += 1;
            if self.pos == self.block.end() || !self.block.insts[self.pos].is_debug_value() {
                break;
            }
        }
        true
    }
}
