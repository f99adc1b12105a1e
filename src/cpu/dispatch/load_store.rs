/*!
load_store.rs - Load / Store family (LDA LDX LDY STA STX STY)

Overview
========
Loads copy the operand into a register and update Z/N from the loaded value.
Stores write a register to the effective address and leave flags alone.

Cycle Accounting
================
Loads mark themselves eligible for the page-cross penalty; the resolver
decides whether a crossing actually happened (Absolute,X/Y and (Indirect),Y).
Stores never mark: STA abs,X / abs,Y / (ind),Y always pay the fixup, and
their table cost already includes it.

Return Contract
===============
`handle` returns true when the mnemonic belongs to this family.
*/

use crate::cpu::cycles::PendingCycles;
use crate::cpu::dispatch::Instr;
use crate::cpu::regs::CpuRegs;
use crate::cpu::table::Mnemonic;
use crate::cpu_bus::CpuBus;

pub(super) fn handle<C: CpuRegs, B: CpuBus>(
    instr: Instr,
    cpu: &mut C,
    bus: &mut B,
    pending: &mut PendingCycles,
) -> bool {
    let operand = instr.operand;
    match instr.op.mnemonic {
        Mnemonic::Lda => {
            let v = operand.read(bus);
            cpu.set_a(v);
            cpu.update_zn(v);
            pending.mark_eligible();
        }
        Mnemonic::Ldx => {
            let v = operand.read(bus);
            cpu.set_x(v);
            cpu.update_zn(v);
            pending.mark_eligible();
        }
        Mnemonic::Ldy => {
            let v = operand.read(bus);
            cpu.set_y(v);
            cpu.update_zn(v);
            pending.mark_eligible();
        }
        Mnemonic::Sta => store(bus, operand.address(), cpu.a()),
        Mnemonic::Stx => store(bus, operand.address(), cpu.x()),
        Mnemonic::Sty => store(bus, operand.address(), cpu.y()),
        _ => return false,
    }
    true
}

#[inline]
fn store<B: CpuBus>(bus: &mut B, addr: Option<u16>, value: u8) {
    if let Some(addr) = addr {
        bus.write(addr, value);
    }
}
