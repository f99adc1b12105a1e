/*!
arithmetic.rs - ADC / SBC

Binary mode only: the NES CPU has no decimal adder, so D is ignored here even
when set. SBC is ADC of the one's complement of the operand. Both are
eligible for the page-cross penalty.
*/

use crate::cpu::cycles::PendingCycles;
use crate::cpu::dispatch::Instr;
use crate::cpu::execute::{adc, sbc};
use crate::cpu::regs::CpuRegs;
use crate::cpu::table::Mnemonic;
use crate::cpu_bus::CpuBus;

pub(super) fn handle<C: CpuRegs, B: CpuBus>(
    instr: Instr,
    cpu: &mut C,
    bus: &mut B,
    pending: &mut PendingCycles,
) -> bool {
    match instr.op.mnemonic {
        Mnemonic::Adc => adc(cpu, instr.operand.read(bus)),
        Mnemonic::Sbc => sbc(cpu, instr.operand.read(bus)),
        _ => return false,
    }
    pending.mark_eligible();
    true
}
