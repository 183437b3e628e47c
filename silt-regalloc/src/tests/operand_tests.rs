//! Tests for per-instruction operand classification

use super::{all_allocatable, test_target};
use crate::operands::collect_operands;
use silt_mir::{AllocatableInfo, MachineInst, Operand, Reg};

#[test]
fn test_basic_classification() {
    let target = test_target();
    let alloc = all_allocatable(&target);
    let (v0, v1, v2) = (Reg::virt(0), Reg::virt(1), Reg::virt(2));

    let inst = MachineInst::new(vec![
        Operand::use_of(v0),
        Operand::def(v1),
        Operand::dead_def(v2),
        Operand::use_of(Reg::phys(3)),
        Operand::def(Reg::phys(4)),
    ]);
    let (phys, virt) = collect_operands(&inst, &target, &alloc);

    assert_eq!(virt.uses, vec![v0]);
    assert_eq!(virt.defs, vec![v1]);
    assert_eq!(virt.dead_defs, vec![v2]);
    assert_eq!(phys.uses, vec![Reg::phys(3)]);
    assert_eq!(phys.defs, vec![Reg::phys(4)]);
    assert!(phys.dead_defs.is_empty());
}

#[test]
fn test_use_def_operand_lands_in_both_vectors() {
    let target = test_target();
    let alloc = all_allocatable(&target);
    let v0 = Reg::virt(0);

    let inst = MachineInst::new(vec![Operand::use_def(v0)]);
    let (_, virt) = collect_operands(&inst, &target, &alloc);

    assert_eq!(virt.uses, vec![v0]);
    assert_eq!(virt.defs, vec![v0]);
}

#[test]
fn test_null_registers_are_skipped() {
    let target = test_target();
    let alloc = all_allocatable(&target);

    let inst = MachineInst::new(vec![Operand::use_of(Reg::NULL), Operand::def(Reg::NULL)]);
    let (phys, virt) = collect_operands(&inst, &target, &alloc);

    assert!(phys.uses.is_empty() && phys.defs.is_empty());
    assert!(virt.uses.is_empty() && virt.defs.is_empty());
}

#[test]
fn test_non_allocatable_phys_regs_are_skipped() {
    let target = test_target();
    // Only p3 is allocatable.
    let alloc = AllocatableInfo::from_regs(target.num_regs(), &[Reg::phys(3)]);

    let inst = MachineInst::new(vec![
        Operand::use_of(Reg::phys(1)),
        Operand::use_of(Reg::phys(3)),
        Operand::def(Reg::phys(4)),
    ]);
    let (phys, _) = collect_operands(&inst, &target, &alloc);

    assert_eq!(phys.uses, vec![Reg::phys(3)]);
    assert!(phys.defs.is_empty());
}

#[test]
fn test_virtual_dedup_is_exact_id() {
    let target = test_target();
    let alloc = all_allocatable(&target);
    let (v0, v1) = (Reg::virt(0), Reg::virt(1));

    let inst = MachineInst::new(vec![
        Operand::use_of(v1),
        Operand::use_of(v0),
        Operand::use_of(v1),
    ]);
    let (_, virt) = collect_operands(&inst, &target, &alloc);

    // Unique, in visit order.
    assert_eq!(virt.uses, vec![v1, v0]);
}

#[test]
fn test_physical_dedup_is_alias_aware() {
    let target = test_target();
    let alloc = all_allocatable(&target);

    // p1 and p2 overlap: the second use adds nothing.
    let inst = MachineInst::new(vec![
        Operand::use_of(Reg::phys(1)),
        Operand::use_of(Reg::phys(2)),
        Operand::use_of(Reg::phys(3)),
    ]);
    let (phys, _) = collect_operands(&inst, &target, &alloc);

    assert_eq!(phys.uses, vec![Reg::phys(1), Reg::phys(3)]);
}

#[test]
fn test_dead_def_purged_when_aliasing_live_def() {
    let target = test_target();
    let alloc = all_allocatable(&target);

    let inst = MachineInst::new(vec![
        Operand::def(Reg::phys(1)),
        Operand::dead_def(Reg::phys(2)),
        Operand::dead_def(Reg::phys(3)),
    ]);
    let (phys, _) = collect_operands(&inst, &target, &alloc);

    // The dead def of p2 aliases the live def of p1 and is dropped;
    // p3 does not alias anything and survives.
    assert_eq!(phys.defs, vec![Reg::phys(1)]);
    assert_eq!(phys.dead_defs, vec![Reg::phys(3)]);
}

#[test]
fn test_virtual_dead_defs_are_not_purged_against_defs() {
    let target = test_target();
    let alloc = all_allocatable(&target);
    let (v0, v1) = (Reg::virt(0), Reg::virt(1));

    let inst = MachineInst::new(vec![Operand::def(v0), Operand::dead_def(v1)]);
    let (_, virt) = collect_operands(&inst, &target, &alloc);

    assert_eq!(virt.defs, vec![v0]);
    assert_eq!(virt.dead_defs, vec![v1]);
}
