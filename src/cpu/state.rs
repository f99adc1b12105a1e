/*!
state.rs - Architectural 6502 register file and status flags.

Overview
========
`CpuState` owns every architecturally visible register:
  - A, X, Y (8-bit)
  - SP (8-bit, stack lives at 0x0100 | SP)
  - PC (16-bit)
  - P  (8-bit status, modelled as `Status` bitflags)

It deliberately excludes bus access, decode, and cycle accounting; those live
in `addressing`, `dispatch`, and `cycles` respectively. Flag manipulation
(`set_flag`, `test_flag`, `update_zero`, ...) is provided by the `CpuRegs`
trait so handler code stays generic.

Status Register Bit Layout
==========================
Bit: 7 6 5 4 3 2 1 0
     N V U B D I Z C

U reads as 1 whenever P is pushed. B only exists on the stack copy: PHP/BRK
push it set, NMI pushes it clear.

Power-on
========
SP = 0xFD, P = 0x24 (I | U), A = X = Y = 0. PC is loaded from the reset vector
by `Cpu::reset`.
*/

use bitflags::bitflags;

bitflags! {
    /// Processor status register (P).
    ///
    /// | Bit | Mask | Name              |
    /// |-----|------|-------------------|
    /// | 7   | 0x80 | NEGATIVE          |
    /// | 6   | 0x40 | OVERFLOW          |
    /// | 5   | 0x20 | UNUSED            |
    /// | 4   | 0x10 | BREAK             |
    /// | 3   | 0x08 | DECIMAL           |
    /// | 2   | 0x04 | INTERRUPT_DISABLE |
    /// | 1   | 0x02 | ZERO              |
    /// | 0   | 0x01 | CARRY             |
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Status: u8 {
        const CARRY = 0b0000_0001;
        const ZERO = 0b0000_0010;
        const INTERRUPT_DISABLE = 0b0000_0100;
        /// Toggled by SED/CLD; the NES ALU ignores it.
        const DECIMAL = 0b0000_1000;
        const BREAK = 0b0001_0000;
        const UNUSED = 0b0010_0000;
        const OVERFLOW = 0b0100_0000;
        const NEGATIVE = 0b1000_0000;
    }
}

/// Stack pointer after power-on / reset.
pub const POWER_ON_SP: u8 = 0xFD;

/// Status after power-on / reset (0x24).
pub const POWER_ON_STATUS: Status = Status::INTERRUPT_DISABLE.union(Status::UNUSED);

/// Base address of the fixed stack page.
pub const STACK_PAGE: u16 = 0x0100;

/// Plain 6502 register container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuState {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub pc: u16,
    pub status: Status,
}

impl Default for CpuState {
    fn default() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            sp: POWER_ON_SP,
            pc: 0x0000,
            status: POWER_ON_STATUS,
        }
    }
}

impl CpuState {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current stack slot address.
    #[inline]
    pub fn stack_addr(&self) -> u16 {
        STACK_PAGE | self.sp as u16
    }
}
