//! Target register description
//!
//! Static tables describing the target's register file: register
//! classes with weights and pressure-set membership, per-register
//! overlap sets, and the minimal class of each physical register.
//! These tables are built once per target (by hand in tests, by a
//! generator in a full backend) and consumed read-only.

use crate::reg::Reg;
use silt_common::{BackendError, PressureSetId, RegClassId};

/// A target register class.
///
/// The weight is the amount a live member of this class adds to each of
/// the class's pressure sets.
#[derive(Debug, Clone)]
pub struct RegClass {
    pub name: String,
    pub weight: u32,
    pub pressure_sets: Vec<PressureSetId>,
}

/// Complete register-file description for one target.
#[derive(Debug, Clone, Default)]
pub struct TargetDesc {
    /// Size of the physical register table. Valid ids are `1..num_regs`;
    /// id 0 is the null register.
    pub num_regs: u32,
    /// Pressure set names, indexed by `PressureSetId`.
    pub pressure_sets: Vec<String>,
    /// Register classes, indexed by `RegClassId`.
    pub classes: Vec<RegClass>,
    /// Per physical register: every physical id it overlaps, itself
    /// included. Entry 0 is unused.
    pub overlaps: Vec<Vec<u32>>,
    /// Per physical register: its minimal register class. Entry 0 is
    /// unused.
    pub min_class: Vec<RegClassId>,
}

impl TargetDesc {
    pub fn num_regs(&self) -> u32 {
        self.num_regs
    }

    pub fn num_pressure_sets(&self) -> usize {
        self.pressure_sets.len()
    }

    /// Overlap set of a physical register, itself included.
    pub fn overlap_set(&self, reg: Reg) -> &[u32] {
        &self.overlaps[reg.phys_index() as usize]
    }

    /// Minimal class containing a physical register.
    pub fn minimal_phys_class(&self, reg: Reg) -> RegClassId {
        self.min_class[reg.phys_index() as usize]
    }

    pub fn class(&self, id: RegClassId) -> &RegClass {
        &self.classes[id as usize]
    }

    pub fn class_weight(&self, id: RegClassId) -> u32 {
        self.classes[id as usize].weight
    }

    pub fn pressure_sets_of(&self, id: RegClassId) -> &[PressureSetId] {
        &self.classes[id as usize].pressure_sets
    }

    /// Check the tables for internal consistency.
    pub fn validate(&self) -> Result<(), BackendError> {
        let nregs = self.num_regs as usize;
        if self.overlaps.len() != nregs {
            return Err(BackendError::invalid_target(format!(
                "overlap table has {} entries, expected {}",
                self.overlaps.len(),
                nregs
            )));
        }
        if self.min_class.len() != nregs {
            return Err(BackendError::invalid_target(format!(
                "minimal-class table has {} entries, expected {}",
                self.min_class.len(),
                nregs
            )));
        }
        for class in &self.classes {
            if class.weight == 0 {
                return Err(BackendError::invalid_target(format!(
                    "class {} has zero weight",
                    class.name
                )));
            }
            for &set in &class.pressure_sets {
                if set as usize >= self.pressure_sets.len() {
                    return Err(BackendError::invalid_target(format!(
                        "class {} names pressure set {} of {}",
                        class.name,
                        set,
                        self.pressure_sets.len()
                    )));
                }
            }
        }
        for id in 1..self.num_regs {
            if !self.overlaps[id as usize].contains(&id) {
                return Err(BackendError::invalid_target(format!(
                    "overlap set of p{id} does not include itself"
                )));
            }
            if self.min_class[id as usize] as usize >= self.classes.len() {
                return Err(BackendError::invalid_target(format!(
                    "p{id} has out-of-range minimal class"
                )));
            }
        }
        Ok(())
    }
}

/// Virtual register table: one register class per created virtual
/// register. Plays the MachineRegisterInfo role for the tracker.
#[derive(Debug, Clone, Default)]
pub struct VirtRegTable {
    classes: Vec<RegClassId>,
}

impl VirtRegTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fresh virtual register of the given class.
    pub fn create(&mut self, class: RegClassId) -> Reg {
        let reg = Reg::virt(self.classes.len() as u32);
        self.classes.push(class);
        reg
    }

    pub fn num_virt_regs(&self) -> u32 {
        self.classes.len() as u32
    }

    pub fn class_of(&self, reg: Reg) -> RegClassId {
        self.classes[reg.virt_index() as usize]
    }
}

/// Which physical registers the allocator may use. Plays the
/// RegisterClassInfo role for the tracker.
#[derive(Debug, Clone)]
pub struct AllocatableInfo {
    allocatable: Vec<bool>,
}

impl AllocatableInfo {
    /// All registers non-allocatable.
    pub fn new(num_regs: u32) -> Self {
        Self {
            allocatable: vec![false; num_regs as usize],
        }
    }

    /// Build from an explicit list of allocatable registers.
    pub fn from_regs(num_regs: u32, regs: &[Reg]) -> Self {
        let mut info = Self::new(num_regs);
        for &reg in regs {
            info.allocatable[reg.phys_index() as usize] = true;
        }
        info
    }

    pub fn is_allocatable(&self, reg: Reg) -> bool {
        self.allocatable[reg.phys_index() as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_target() -> TargetDesc {
        TargetDesc {
            num_regs: 3,
            pressure_sets: vec!["GPR".to_string()],
            classes: vec![RegClass {
                name: "gr".to_string(),
                weight: 1,
                pressure_sets: vec![0],
            }],
            overlaps: vec![vec![], vec![1, 2], vec![1, 2]],
            min_class: vec![0, 0, 0],
        }
    }

    #[test]
    fn test_validate_ok() {
        assert!(small_target().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_weight() {
        let mut target = small_target();
        target.classes[0].weight = 0;
        assert!(matches!(
            target.validate(),
            Err(BackendError::InvalidTarget { .. })
        ));
    }

    #[test]
    fn test_validate_pressure_set_out_of_range() {
        let mut target = small_target();
        target.classes[0].pressure_sets.push(5);
        assert!(target.validate().is_err());
    }

    #[test]
    fn test_validate_missing_self_overlap() {
        let mut target = small_target();
        target.overlaps[2] = vec![1];
        assert!(target.validate().is_err());
    }

    #[test]
    fn test_overlap_and_class_queries() {
        let target = small_target();
        assert_eq!(target.overlap_set(Reg::phys(1)), &[1, 2]);
        assert_eq!(target.minimal_phys_class(Reg::phys(2)), 0);
        assert_eq!(target.class_weight(0), 1);
        assert_eq!(target.pressure_sets_of(0), &[0]);
    }

    #[test]
    fn test_virt_reg_table() {
        let mut vregs = VirtRegTable::new();
        let a = vregs.create(0);
        let b = vregs.create(1);
        assert_eq!(a, Reg::virt(0));
        assert_eq!(b, Reg::virt(1));
        assert_eq!(vregs.num_virt_regs(), 2);
        assert_eq!(vregs.class_of(a), 0);
        assert_eq!(vregs.class_of(b), 1);
    }

    #[test]
    fn test_allocatable_info() {
        let info = AllocatableInfo::from_regs(4, &[Reg::phys(2)]);
        assert!(!info.is_allocatable(Reg::phys(1)));
        assert!(info.is_allocatable(Reg::phys(2)));
        assert!(!info.is_allocatable(Reg::phys(3)));
    }
}
