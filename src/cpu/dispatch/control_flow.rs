/*!
control_flow.rs - Control-flow / system family (JMP JSR RTS RTI BRK)

Behavior Details
================
- JMP takes the resolved address; the indirect page-wrap quirk lives in the
  resolver.
- JSR pushes the address of its own last byte (PC - 1), high byte first.
- RTS pulls low then high and resumes at that address + 1.
- RTI pulls status, then PC. B is dropped and U forced on the way in.
- BRK skips its padding byte, pushes PC and status with B set, sets I and
  loads PC from 0xFFFE. Execution continues at the handler.
*/

use crate::cpu::dispatch::{IRQ_VECTOR, Instr};
use crate::cpu::execute::{interrupt, pull, pull_word, push_word};
use crate::cpu::regs::CpuRegs;
use crate::cpu::state::Status;
use crate::cpu::table::Mnemonic;
use crate::cpu_bus::CpuBus;

pub(super) fn handle<C: CpuRegs, B: CpuBus>(instr: Instr, cpu: &mut C, bus: &mut B) -> bool {
    match instr.op.mnemonic {
        Mnemonic::Jmp => {
            if let Some(target) = instr.operand.address() {
                cpu.set_pc(target);
            }
        }
        Mnemonic::Jsr => {
            if let Some(target) = instr.operand.address() {
                let ret = cpu.pc().wrapping_sub(1);
                push_word(cpu, bus, ret);
                cpu.set_pc(target);
            }
        }
        Mnemonic::Rts => {
            let ret = pull_word(cpu, bus);
            cpu.set_pc(ret.wrapping_add(1));
        }
        Mnemonic::Rti => {
            let p = pull(cpu, bus);
            cpu.set_status(pulled_status(p));
            let pc = pull_word(cpu, bus);
            cpu.set_pc(pc);
        }
        Mnemonic::Brk => {
            cpu.advance_pc(1);
            interrupt(cpu, bus, IRQ_VECTOR, true);
        }
        _ => return false,
    }
    true
}

/// Status as loaded by PLP / RTI: B has no storage, U always reads set.
pub(super) fn pulled_status(p: u8) -> Status {
    (Status::from_bits_retain(p) - Status::BREAK) | Status::UNUSED
}
