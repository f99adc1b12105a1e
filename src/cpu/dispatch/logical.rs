/*!
logical.rs - Logical family (AND ORA EOR BIT)

AND/ORA/EOR combine the operand into A and update Z/N; they are eligible for
the page-cross penalty. BIT never touches A: Z comes from A & M, N and V are
copied from bits 7 and 6 of M.
*/

use crate::cpu::cycles::PendingCycles;
use crate::cpu::dispatch::Instr;
use crate::cpu::execute::bit;
use crate::cpu::regs::CpuRegs;
use crate::cpu::table::Mnemonic;
use crate::cpu_bus::CpuBus;

pub(super) fn handle<C: CpuRegs, B: CpuBus>(
    instr: Instr,
    cpu: &mut C,
    bus: &mut B,
    pending: &mut PendingCycles,
) -> bool {
    let combine: fn(u8, u8) -> u8 = match instr.op.mnemonic {
        Mnemonic::And => |a, m| a & m,
        Mnemonic::Ora => |a, m| a | m,
        Mnemonic::Eor => |a, m| a ^ m,
        Mnemonic::Bit => {
            let m = instr.operand.read(bus);
            bit(cpu, m);
            return true;
        }
        _ => return false,
    };
    let m = instr.operand.read(bus);
    let r = combine(cpu.a(), m);
    cpu.set_a(r);
    cpu.update_zn(r);
    pending.mark_eligible();
    true
}
