//! Register identifiers
//!
//! A single opaque id space covers both physical and virtual registers.
//! Physical registers are numbered from 1 (id 0 is the null register,
//! used for operands that name no register). Virtual registers occupy
//! the upper half of the id space.

use serde::{Deserialize, Serialize};
use std::fmt;

/// First id of the virtual register space.
const VIRT_BASE: u32 = 1 << 31;

/// An opaque register id, physical or virtual.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Reg(pub u32);

impl Reg {
    /// The null register (no register at all).
    pub const NULL: Reg = Reg(0);

    /// Physical register with the given hardware number (>= 1).
    pub fn phys(n: u32) -> Self {
        debug_assert!(n > 0 && n < VIRT_BASE, "physical register out of range");
        Reg(n)
    }

    /// Virtual register number `n`.
    pub fn virt(n: u32) -> Self {
        debug_assert!(n < VIRT_BASE, "virtual register out of range");
        Reg(VIRT_BASE + n)
    }

    pub fn is_null(self) -> bool {
        self.0 == 0
    }

    pub fn is_virtual(self) -> bool {
        self.0 >= VIRT_BASE
    }

    pub fn is_physical(self) -> bool {
        !self.is_null() && !self.is_virtual()
    }

    /// Table index of a physical register. Panics on virtual registers.
    pub fn phys_index(self) -> u32 {
        assert!(!self.is_virtual(), "phys_index on virtual register");
        self.0
    }

    /// Zero-based index of a virtual register. Panics on physical registers.
    pub fn virt_index(self) -> u32 {
        assert!(self.is_virtual(), "virt_index on physical register");
        self.0 - VIRT_BASE
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "noreg")
        } else if self.is_virtual() {
            write!(f, "v{}", self.virt_index())
        } else {
            write!(f, "p{}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_space_partition() {
        let p = Reg::phys(3);
        let v = Reg::virt(3);

        assert!(p.is_physical());
        assert!(!p.is_virtual());
        assert!(v.is_virtual());
        assert!(!v.is_physical());
        assert_ne!(p, v);

        assert!(Reg::NULL.is_null());
        assert!(!Reg::NULL.is_virtual());
        assert!(!Reg::NULL.is_physical());
    }

    #[test]
    fn test_indices() {
        assert_eq!(Reg::phys(7).phys_index(), 7);
        assert_eq!(Reg::virt(0).virt_index(), 0);
        assert_eq!(Reg::virt(12).virt_index(), 12);
    }

    #[test]
    fn test_ordering_groups_physical_before_virtual() {
        // Sorted live-in/out lists rely on numeric id order.
        let mut regs = vec![Reg::virt(0), Reg::phys(9), Reg::phys(1), Reg::virt(2)];
        regs.sort();
        assert_eq!(
            regs,
            vec![Reg::phys(1), Reg::phys(9), Reg::virt(0), Reg::virt(2)]
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Reg::phys(4).to_string(), "p4");
        assert_eq!(Reg::virt(4).to_string(), "v4");
        assert_eq!(Reg::NULL.to_string(), "noreg");
    }

    #[test]
    #[should_panic]
    fn test_virt_index_on_physical_panics() {
        Reg::phys(1).virt_index();
    }
}
