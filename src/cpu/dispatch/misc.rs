/*!
misc.rs - Transfers / Stack / Flag / Register step family

Transfers:   TAX TAY TXA TYA TSX TXS
Stack:       PHA PLA PHP PLP
Flags:       CLC SEC CLI SEI CLD SED CLV
Inc / Dec:   INX INY DEX DEY
Other:       NOP

Every instruction here has a fixed cost; none touch the pending cycle state.
TXS is the only transfer that leaves Z/N alone.
*/

use crate::cpu::dispatch::Instr;
use crate::cpu::dispatch::control_flow::pulled_status;
use crate::cpu::execute::{pull, push};
use crate::cpu::regs::CpuRegs;
use crate::cpu::state::Status;
use crate::cpu::table::Mnemonic;
use crate::cpu_bus::CpuBus;

pub(super) fn handle<C: CpuRegs, B: CpuBus>(instr: Instr, cpu: &mut C, bus: &mut B) -> bool {
    match instr.op.mnemonic {
        // Transfers
        Mnemonic::Tax => {
            let v = cpu.a();
            load(cpu, C::set_x, v);
        }
        Mnemonic::Tay => {
            let v = cpu.a();
            load(cpu, C::set_y, v);
        }
        Mnemonic::Txa => {
            let v = cpu.x();
            load(cpu, C::set_a, v);
        }
        Mnemonic::Tya => {
            let v = cpu.y();
            load(cpu, C::set_a, v);
        }
        Mnemonic::Tsx => {
            let v = cpu.sp();
            load(cpu, C::set_x, v);
        }
        Mnemonic::Txs => {
            let x = cpu.x();
            cpu.set_sp(x);
        }

        // Stack
        Mnemonic::Pha => {
            let a = cpu.a();
            push(cpu, bus, a);
        }
        Mnemonic::Php => {
            let p = cpu.status_for_push(true);
            push(cpu, bus, p);
        }
        Mnemonic::Pla => {
            let v = pull(cpu, bus);
            load(cpu, C::set_a, v);
        }
        Mnemonic::Plp => {
            let p = pull(cpu, bus);
            cpu.set_status(pulled_status(p));
        }

        // Flags
        Mnemonic::Clc => cpu.clear_flag(Status::CARRY),
        Mnemonic::Sec => cpu.set_flag(Status::CARRY),
        Mnemonic::Cli => cpu.clear_flag(Status::INTERRUPT_DISABLE),
        Mnemonic::Sei => cpu.set_flag(Status::INTERRUPT_DISABLE),
        Mnemonic::Cld => cpu.clear_flag(Status::DECIMAL),
        Mnemonic::Sed => cpu.set_flag(Status::DECIMAL),
        Mnemonic::Clv => cpu.clear_flag(Status::OVERFLOW),

        // Register increment / decrement
        Mnemonic::Inx => {
            let v = cpu.x().wrapping_add(1);
            load(cpu, C::set_x, v);
        }
        Mnemonic::Iny => {
            let v = cpu.y().wrapping_add(1);
            load(cpu, C::set_y, v);
        }
        Mnemonic::Dex => {
            let v = cpu.x().wrapping_sub(1);
            load(cpu, C::set_x, v);
        }
        Mnemonic::Dey => {
            let v = cpu.y().wrapping_sub(1);
            load(cpu, C::set_y, v);
        }

        Mnemonic::Nop => {}
        _ => return false,
    }
    true
}

/// Store `v` through `set` and update Z/N from it.
#[inline]
fn load<C: CpuRegs>(cpu: &mut C, set: fn(&mut C, u8), v: u8) {
    set(cpu, v);
    cpu.update_zn(v);
}
