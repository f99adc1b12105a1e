/*!
compare.rs - Compare family (CMP CPX CPY)

Subtract without storing: C = reg >= M, Z = reg == M, N = bit 7 of reg - M.
Only CMP has indexed forms, so only CMP can ever pay the page-cross penalty;
CPX/CPY mark eligibility too but the resolver never reports a crossing for
their modes.
*/

use crate::cpu::cycles::PendingCycles;
use crate::cpu::dispatch::Instr;
use crate::cpu::execute::compare;
use crate::cpu::regs::CpuRegs;
use crate::cpu::table::Mnemonic;
use crate::cpu_bus::CpuBus;

pub(super) fn handle<C: CpuRegs, B: CpuBus>(
    instr: Instr,
    cpu: &mut C,
    bus: &mut B,
    pending: &mut PendingCycles,
) -> bool {
    let reg = match instr.op.mnemonic {
        Mnemonic::Cmp => cpu.a(),
        Mnemonic::Cpx => cpu.x(),
        Mnemonic::Cpy => cpu.y(),
        _ => return false,
    };
    let m = instr.operand.read(bus);
    compare(cpu, reg, m);
    pending.mark_eligible();
    true
}
