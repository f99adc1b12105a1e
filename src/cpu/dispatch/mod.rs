/*!
dispatch - Orchestrator for a single 6502 CPU step (NMI / decode / execute).

Overview
========
One call to `step`:
1. If the NMI line is raised: push PC high, PC low, status (B clear), set I,
   load PC from 0xFFFA, lower the line, and report 7 cycles. No opcode is
   fetched on that step.
2. Otherwise fetch the opcode at PC and advance PC.
3. Look up the descriptor in the static table (`table::lookup`).
4. Resolve the operand through the descriptor's addressing mode.
5. Hand the instruction to the family handler chain below.
6. Settle cycles: base + branch extras + the page-cross penalty when the
   resolver saw a crossing *and* the handler marked itself eligible. The
   pending flags are cleared here on every path.

Family chain
============
```text
    load_store -> logical -> arithmetic -> compare -> rmw
               -> branches -> control_flow -> misc
```

Each family `handle` matches on the descriptor's `Mnemonic` and returns
`true` once it has executed the instruction. Nothing claims
`Mnemonic::Illegal`; it falls through to `illegal`, which logs and executes
as a zero-cycle no-op so a stray byte can never wedge the core.
*/

use crate::cpu::addressing::{Operand, resolve};
use crate::cpu::cycles::{INTERRUPT_CYCLES, PendingCycles};
use crate::cpu::execute::interrupt;
use crate::cpu::nmi::NmiLine;
use crate::cpu::regs::CpuRegs;
use crate::cpu::table::{Opcode, lookup};
use crate::cpu_bus::CpuBus;

pub(crate) mod arithmetic;
pub(crate) mod branches;
pub(crate) mod compare;
pub(crate) mod control_flow;
pub(crate) mod load_store;
pub(crate) mod logical;
pub(crate) mod misc;
pub(crate) mod rmw;

/// NMI vector location.
pub const NMI_VECTOR: u16 = 0xFFFA;
/// Power-on / reset vector location.
pub const RESET_VECTOR: u16 = 0xFFFC;
/// BRK / IRQ vector location.
pub const IRQ_VECTOR: u16 = 0xFFFE;

/// A decoded instruction: its descriptor plus the resolved operand.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Instr {
    pub op: &'static Opcode,
    pub operand: Operand,
}

/// Execute one CPU step and return the cycles it consumed.
pub(crate) fn step<C: CpuRegs, B: CpuBus>(
    cpu: &mut C,
    bus: &mut B,
    nmi: &NmiLine,
    pending: &mut PendingCycles,
) -> u32 {
    if nmi.take() {
        interrupt(cpu, bus, NMI_VECTOR, false);
        pending.settle();
        return INTERRUPT_CYCLES;
    }

    let pc = cpu.pc();
    let code = bus.read(pc);
    cpu.advance_pc(1);
    let op = lookup(code);
    let operand = resolve(op.mode, cpu, bus, pending);
    let instr = Instr { op, operand };

    let mut cycles = op.cycles as u32;
    let handled = load_store::handle(instr, cpu, bus, pending)
        || logical::handle(instr, cpu, bus, pending)
        || arithmetic::handle(instr, cpu, bus, pending)
        || compare::handle(instr, cpu, bus, pending)
        || rmw::handle(instr, cpu, bus)
        || branches::handle(instr, cpu, &mut cycles)
        || control_flow::handle(instr, cpu, bus)
        || misc::handle(instr, cpu, bus);
    if !handled {
        illegal(instr, pc);
    }

    cycles + pending.settle()
}

fn illegal(instr: Instr, pc: u16) {
    log::warn!(
        "illegal opcode {:#04X} at {:#06X}; executing as no-op",
        instr.op.code,
        pc
    );
}
