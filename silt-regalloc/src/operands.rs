//! Per-instruction operand classification
//!
//! Splits one instruction's register operands into uses, live defs and
//! dead defs, separately for physical and virtual registers. Within
//! each vector registers are unique: virtual registers by exact id,
//! physical registers up to aliasing (a register is not appended when
//! any register overlapping it is already present).

use silt_mir::{AllocatableInfo, MachineInst, Operand, Reg, TargetDesc};

/// Position of the first register in `regs` that overlaps `reg`.
/// Physical registers only.
pub(crate) fn find_reg_alias(reg: Reg, regs: &[Reg], target: &TargetDesc) -> Option<usize> {
    for &alias in target.overlap_set(reg) {
        if let Some(pos) = regs.iter().position(|&r| r == Reg::phys(alias)) {
            return Some(pos);
        }
    }
    None
}

/// Membership search used before appending: exact id for virtual
/// registers, alias-aware for physical registers.
fn find_reg(reg: Reg, regs: &[Reg], target: &TargetDesc) -> Option<usize> {
    if reg.is_virtual() {
        return regs.iter().position(|&r| r == reg);
    }
    find_reg_alias(reg, regs, target)
}

/// One instruction's unique register operands of a single kind
/// (physical or virtual), in operand-visit order.
#[derive(Debug, Clone, Default)]
pub struct RegOperands {
    pub uses: Vec<Reg>,
    pub defs: Vec<Reg>,
    pub dead_defs: Vec<Reg>,
}

impl RegOperands {
    /// Route one operand's register into the matching vectors.
    fn collect(&mut self, op: &Operand, target: &TargetDesc) {
        if op.reads && find_reg(op.reg, &self.uses, target).is_none() {
            self.uses.push(op.reg);
        }
        if op.defines {
            if op.dead {
                if find_reg(op.reg, &self.dead_defs, target).is_none() {
                    self.dead_defs.push(op.reg);
                }
            } else if find_reg(op.reg, &self.defs, target).is_none() {
                self.defs.push(op.reg);
            }
        }
    }
}

/// Classify an instruction's operands into physical and virtual
/// `RegOperands`. Null registers are skipped, and physical registers
/// are considered only when allocatable.
pub fn collect_operands(
    inst: &MachineInst,
    target: &TargetDesc,
    allocatable: &AllocatableInfo,
) -> (RegOperands, RegOperands) {
    let mut phys = RegOperands::default();
    let mut virt = RegOperands::default();

    for op in &inst.operands {
        if op.reg.is_null() {
            continue;
        }
        if op.reg.is_virtual() {
            virt.collect(op, target);
        } else if allocatable.is_allocatable(op.reg) {
            phys.collect(op, target);
        }
    }

    // A physical register that is both live-defined and dead-defined in
    // the same instruction is charged once, through the live def.
    let RegOperands {
        defs, dead_defs, ..
    } = &mut phys;
    dead_defs.retain(|&reg| find_reg_alias(reg, defs, target).is_none());

    (phys, virt)
}
