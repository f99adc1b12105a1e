/*!
rmw.rs - Read-Modify-Write family (ASL LSR ROL ROR INC DEC)

Accumulator forms transform A in place. Memory forms go through
`execute::modify`, which reads the cell, writes the old value back, then
writes the result. Absolute,X forms carry their fixup in the table cost and
never pay the page-cross penalty, so nothing here marks eligibility.

Shifts and rotates always update Z and N from the result.
*/

use crate::cpu::dispatch::Instr;
use crate::cpu::execute::{asl, decrement, increment, lsr, modify, rol, ror};
use crate::cpu::regs::CpuRegs;
use crate::cpu::table::Mnemonic;
use crate::cpu_bus::CpuBus;

pub(super) fn handle<C: CpuRegs, B: CpuBus>(instr: Instr, cpu: &mut C, bus: &mut B) -> bool {
    let transform: fn(&mut C, u8) -> u8 = match instr.op.mnemonic {
        Mnemonic::Asl => asl,
        Mnemonic::Lsr => lsr,
        Mnemonic::Rol => rol,
        Mnemonic::Ror => ror,
        Mnemonic::Inc => increment,
        Mnemonic::Dec => decrement,
        _ => return false,
    };
    modify(cpu, bus, instr.operand, transform);
    true
}
