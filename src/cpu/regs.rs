/*!
regs.rs - `CpuRegs`: the register + flag interface instruction handlers are
written against.

Scope
=====
The trait covers architectural registers and status-flag semantics only:
  - no bus access
  - no stack push/pull (see `execute`, which takes an explicit bus)
  - no instruction fetch (see `addressing`)

Keeping memory out of the trait lets handlers borrow `&mut C` and `&mut B`
side by side without aliasing.

Flag semantics
==============
`update_zero` and `update_negative` always write their flag, in both
directions; a stale Z or N from a previous instruction is never left behind.
Setting or clearing one flag never disturbs the others.
*/

use crate::cpu::state::{CpuState, Status};

pub trait CpuRegs {
    fn a(&self) -> u8;
    fn x(&self) -> u8;
    fn y(&self) -> u8;
    fn sp(&self) -> u8;
    fn pc(&self) -> u16;
    fn status(&self) -> Status;

    fn set_a(&mut self, v: u8);
    fn set_x(&mut self, v: u8);
    fn set_y(&mut self, v: u8);
    fn set_sp(&mut self, v: u8);
    fn set_pc(&mut self, v: u16);
    fn set_status(&mut self, v: Status);

    /// Advance PC by `delta`, wrapping at 16 bits.
    #[inline]
    fn advance_pc(&mut self, delta: u16) {
        let pc = self.pc().wrapping_add(delta);
        self.set_pc(pc);
    }

    #[inline]
    fn set_flag(&mut self, flag: Status) {
        let p = self.status() | flag;
        self.set_status(p);
    }

    #[inline]
    fn clear_flag(&mut self, flag: Status) {
        let p = self.status() - flag;
        self.set_status(p);
    }

    #[inline]
    fn test_flag(&self, flag: Status) -> bool {
        self.status().contains(flag)
    }

    /// Set or clear `flag` from a boolean.
    #[inline]
    fn assign_flag(&mut self, flag: Status, on: bool) {
        if on {
            self.set_flag(flag);
        } else {
            self.clear_flag(flag);
        }
    }

    #[inline]
    fn update_zero(&mut self, value: u8) {
        self.assign_flag(Status::ZERO, value == 0);
    }

    #[inline]
    fn update_negative(&mut self, value: u8) {
        self.assign_flag(Status::NEGATIVE, value & 0x80 != 0);
    }

    #[inline]
    fn update_zn(&mut self, value: u8) {
        self.update_zero(value);
        self.update_negative(value);
    }

    /// Status byte as pushed to the stack: UNUSED forced on, BREAK set only
    /// for PHP/BRK.
    #[inline]
    fn status_for_push(&self, brk: bool) -> u8 {
        let mut p = self.status() | Status::UNUSED;
        p.set(Status::BREAK, brk);
        p.bits()
    }
}

impl CpuRegs for CpuState {
    #[inline]
    fn a(&self) -> u8 {
        self.a
    }
    #[inline]
    fn x(&self) -> u8 {
        self.x
    }
    #[inline]
    fn y(&self) -> u8 {
        self.y
    }
    #[inline]
    fn sp(&self) -> u8 {
        self.sp
    }
    #[inline]
    fn pc(&self) -> u16 {
        self.pc
    }
    #[inline]
    fn status(&self) -> Status {
        self.status
    }

    #[inline]
    fn set_a(&mut self, v: u8) {
        self.a = v;
    }
    #[inline]
    fn set_x(&mut self, v: u8) {
        self.x = v;
    }
    #[inline]
    fn set_y(&mut self, v: u8) {
        self.y = v;
    }
    #[inline]
    fn set_sp(&mut self, v: u8) {
        self.sp = v;
    }
    #[inline]
    fn set_pc(&mut self, v: u16) {
        self.pc = v;
    }
    #[inline]
    fn set_status(&mut self, v: Status) {
        self.status = v;
    }
}
