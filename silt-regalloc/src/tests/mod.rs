//! Test suites for pressure tracking
//!
//! Shared fixtures: small hand-built targets. `test_target` has a
//! single pressure set with a weight-1 and a weight-2 class, and a
//! physical alias pair (p1/p2, a sub/super register pair) next to two
//! standalone registers. `two_set_target` splits integer and float
//! pressure with one class contributing to both sets.

mod operand_tests;

use silt_mir::{AllocatableInfo, Reg, RegClass, TargetDesc};

pub(crate) fn test_target() -> TargetDesc {
    TargetDesc {
        num_regs: 5,
        pressure_sets: vec!["IntRegs".to_string()],
        classes: vec![
            RegClass {
                name: "gr".to_string(),
                weight: 1,
                pressure_sets: vec![0],
            },
            RegClass {
                name: "gr_wide".to_string(),
                weight: 2,
                pressure_sets: vec![0],
            },
        ],
        overlaps: vec![vec![], vec![1, 2], vec![1, 2], vec![3], vec![4]],
        min_class: vec![0, 0, 0, 0, 0],
    }
}

pub(crate) fn two_set_target() -> TargetDesc {
    TargetDesc {
        num_regs: 3,
        pressure_sets: vec!["IntRegs".to_string(), "FloatRegs".to_string()],
        classes: vec![
            RegClass {
                name: "gr".to_string(),
                weight: 1,
                pressure_sets: vec![0],
            },
            RegClass {
                name: "fr".to_string(),
                weight: 1,
                pressure_sets: vec![1],
            },
            RegClass {
                name: "pair".to_string(),
                weight: 1,
                pressure_sets: vec![0, 1],
            },
        ],
        overlaps: vec![vec![], vec![1], vec![2]],
        min_class: vec![0, 0, 1],
    }
}

pub(crate) fn all_allocatable(target: &TargetDesc) -> AllocatableInfo {
    let regs: Vec<Reg> = (1..target.num_regs()).map(Reg::phys).collect();
    AllocatableInfo::from_regs(target.num_regs(), &regs)
}
