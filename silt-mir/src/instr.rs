//! Machine instructions and register operands
//!
//! An instruction carries a flat list of register operands (bundled
//! sub-instructions are flattened into that list in visit order by
//! whoever builds the block) plus a debug-value marker. Positions
//! within a block are plain indices; `MachineBlock::end()` is the
//! one-past-the-last position.

use crate::reg::Reg;

/// A single register operand with its access flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operand {
    pub reg: Reg,
    /// Operand reads a value from the register.
    pub reads: bool,
    /// Operand writes the register.
    pub defines: bool,
    /// The written value is never used.
    pub dead: bool,
}

impl Operand {
    /// A plain use.
    pub fn use_of(reg: Reg) -> Self {
        Self {
            reg,
            reads: true,
            defines: false,
            dead: false,
        }
    }

    /// A live def.
    pub fn def(reg: Reg) -> Self {
        Self {
            reg,
            reads: false,
            defines: true,
            dead: false,
        }
    }

    /// A def whose result is never used.
    pub fn dead_def(reg: Reg) -> Self {
        Self {
            reg,
            reads: false,
            defines: true,
            dead: true,
        }
    }

    /// An operand that both reads and writes (two-address style).
    pub fn use_def(reg: Reg) -> Self {
        Self {
            reg,
            reads: true,
            defines: true,
            dead: false,
        }
    }
}

/// One machine instruction: its register operands in visit order.
#[derive(Debug, Clone, Default)]
pub struct MachineInst {
    pub operands: Vec<Operand>,
    debug_value: bool,
}

impl MachineInst {
    pub fn new(operands: Vec<Operand>) -> Self {
        Self {
            operands,
            debug_value: false,
        }
    }

    /// A debug pseudo-instruction. Transparent to every analysis.
    pub fn debug_value() -> Self {
        Self {
            operands: Vec::new(),
            debug_value: true,
        }
    }

    pub fn is_debug_value(&self) -> bool {
        self.debug_value
    }
}

/// A straight-line sequence of machine instructions.
#[derive(Debug, Clone, Default)]
pub struct MachineBlock {
    pub insts: Vec<MachineInst>,
}

impl MachineBlock {
    pub fn new(insts: Vec<MachineInst>) -> Self {
        Self { insts }
    }

    pub fn len(&self) -> usize {
        self.insts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.insts.is_empty()
    }

    /// One past the last instruction position.
    pub fn end(&self) -> usize {
        self.insts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operand_flags() {
        let v = Reg::virt(0);

        let u = Operand::use_of(v);
        assert!(u.reads && !u.defines && !u.dead);

        let d = Operand::def(v);
        assert!(!d.reads && d.defines && !d.dead);

        let dd = Operand::dead_def(v);
        assert!(!dd.reads && dd.defines && dd.dead);

        let ud = Operand::use_def(v);
        assert!(ud.reads && ud.defines && !ud.dead);
    }

    #[test]
    fn test_debug_value_marker() {
        assert!(MachineInst::debug_value().is_debug_value());
        assert!(!MachineInst::new(vec![]).is_debug_value());
    }

    #[test]
    fn test_block_end() {
        let block = MachineBlock::new(vec![
            MachineInst::new(vec![]),
            MachineInst::new(vec![]),
        ]);
        assert_eq!(block.len(), 2);
        assert_eq!(block.end(), 2);
        assert!(!block.is_empty());
    }
}
