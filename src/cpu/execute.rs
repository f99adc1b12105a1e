/*!
execute.rs - 6502 instruction semantic helpers (ALU, stack, RMW, branch,
interrupt sequence).

Purpose
=======
The dispatch family modules decide *which* helper an opcode needs; this module
holds *what* each helper does. Helpers are generic over `CpuRegs` and, where
memory is involved, over `CpuBus`. None of them touch cycle counts except
`branch`, which reports its extra cycles to the caller.

Inventory
---------
Stack:       push, pull, push_word, pull_word
ALU:         adc, sbc, compare, bit
Shift/rot:   asl, lsr, rol, ror (value transforms) + modify (A or memory)
Inc/dec:     increment, decrement (value transforms)
Control:     branch, interrupt

Shift/rotate and INC/DEC go through `modify`, which performs the 6502
read / write-old / write-new sequence for memory targets and writes the
accumulator directly for `Operand::Accumulator`.
*/

use crate::cpu::addressing::Operand;
use crate::cpu::cycles::crosses_page;
use crate::cpu::regs::CpuRegs;
use crate::cpu::state::{STACK_PAGE, Status};
use crate::cpu_bus::CpuBus;

// ---------------------------------------------------------------------------
// Stack
// ---------------------------------------------------------------------------
//
// Push: write at 0x0100 | SP, then SP -= 1
// Pull: SP += 1, then read at 0x0100 | SP

#[inline]
pub(crate) fn push<C: CpuRegs, B: CpuBus>(cpu: &mut C, bus: &mut B, value: u8) {
    bus.write(STACK_PAGE | cpu.sp() as u16, value);
    cpu.set_sp(cpu.sp().wrapping_sub(1));
}

#[inline]
pub(crate) fn pull<C: CpuRegs, B: CpuBus>(cpu: &mut C, bus: &mut B) -> u8 {
    cpu.set_sp(cpu.sp().wrapping_add(1));
    bus.read(STACK_PAGE | cpu.sp() as u16)
}

/// High byte first, so the word sits little-endian in memory.
#[inline]
pub(crate) fn push_word<C: CpuRegs, B: CpuBus>(cpu: &mut C, bus: &mut B, value: u16) {
    push(cpu, bus, (value >> 8) as u8);
    push(cpu, bus, value as u8);
}

#[inline]
pub(crate) fn pull_word<C: CpuRegs, B: CpuBus>(cpu: &mut C, bus: &mut B) -> u16 {
    let lo = pull(cpu, bus) as u16;
    let hi = pull(cpu, bus) as u16;
    (hi << 8) | lo
}

// ---------------------------------------------------------------------------
// ALU
// ---------------------------------------------------------------------------

pub(crate) fn adc<C: CpuRegs>(cpu: &mut C, v: u8) {
    let a = cpu.a();
    let carry_in = u16::from(cpu.test_flag(Status::CARRY));
    let sum = a as u16 + v as u16 + carry_in;
    let result = sum as u8;

    cpu.assign_flag(Status::CARRY, sum > 0xFF);
    // Operands share a sign and the result's sign differs.
    cpu.assign_flag(Status::OVERFLOW, (!(a ^ v) & (a ^ result) & 0x80) != 0);
    cpu.set_a(result);
    cpu.update_zn(result);
}

/// A + !M + C; with C set this is A - M.
#[inline]
pub(crate) fn sbc<C: CpuRegs>(cpu: &mut C, v: u8) {
    adc(cpu, v ^ 0xFF);
}

/// CMP/CPX/CPY: C = reg >= v, Z = reg == v, N = bit 7 of reg - v.
#[inline]
pub(crate) fn compare<C: CpuRegs>(cpu: &mut C, reg: u8, v: u8) {
    cpu.assign_flag(Status::CARRY, reg >= v);
    cpu.update_zn(reg.wrapping_sub(v));
}

#[inline]
pub(crate) fn bit<C: CpuRegs>(cpu: &mut C, v: u8) {
    cpu.update_zero(cpu.a() & v);
    cpu.assign_flag(Status::NEGATIVE, v & 0x80 != 0);
    cpu.assign_flag(Status::OVERFLOW, v & 0x40 != 0);
}

// ---------------------------------------------------------------------------
// Shifts / rotates / inc / dec (value transforms; Z and N always updated)
// ---------------------------------------------------------------------------

pub(crate) fn asl<C: CpuRegs>(cpu: &mut C, v: u8) -> u8 {
    cpu.assign_flag(Status::CARRY, v & 0x80 != 0);
    let r = v << 1;
    cpu.update_zn(r);
    r
}

pub(crate) fn lsr<C: CpuRegs>(cpu: &mut C, v: u8) -> u8 {
    cpu.assign_flag(Status::CARRY, v & 0x01 != 0);
    let r = v >> 1;
    cpu.update_zn(r);
    r
}

pub(crate) fn rol<C: CpuRegs>(cpu: &mut C, v: u8) -> u8 {
    let carry_in = u8::from(cpu.test_flag(Status::CARRY));
    cpu.assign_flag(Status::CARRY, v & 0x80 != 0);
    let r = (v << 1) | carry_in;
    cpu.update_zn(r);
    r
}

pub(crate) fn ror<C: CpuRegs>(cpu: &mut C, v: u8) -> u8 {
    let carry_in = if cpu.test_flag(Status::CARRY) { 0x80 } else { 0 };
    cpu.assign_flag(Status::CARRY, v & 0x01 != 0);
    let r = (v >> 1) | carry_in;
    cpu.update_zn(r);
    r
}

pub(crate) fn increment<C: CpuRegs>(cpu: &mut C, v: u8) -> u8 {
    let r = v.wrapping_add(1);
    cpu.update_zn(r);
    r
}

pub(crate) fn decrement<C: CpuRegs>(cpu: &mut C, v: u8) -> u8 {
    let r = v.wrapping_sub(1);
    cpu.update_zn(r);
    r
}

/// Apply `transform` to the accumulator or to the memory cell behind
/// `operand`. Memory targets see read, dummy write of the old value, then
/// the final write. Returns the new value.
pub(crate) fn modify<C, B, F>(cpu: &mut C, bus: &mut B, operand: Operand, transform: F) -> u8
where
    C: CpuRegs,
    B: CpuBus,
    F: FnOnce(&mut C, u8) -> u8,
{
    match operand {
        Operand::Accumulator(_) => {
            let a = cpu.a();
            let r = transform(cpu, a);
            cpu.set_a(r);
            r
        }
        Operand::Address(addr) | Operand::Immediate(addr) => {
            let old = bus.read(addr);
            bus.write(addr, old);
            let r = transform(cpu, old);
            bus.write(addr, r);
            r
        }
        Operand::Implied => {
            log::warn!("read-modify-write without an operand at PC {:#06X}", cpu.pc());
            0
        }
    }
}

// ---------------------------------------------------------------------------
// Control flow
// ---------------------------------------------------------------------------

/// Take the branch to `target` when `take` is true. Returns extra cycles:
/// 0 not taken, 1 taken, 2 taken onto another page.
pub(crate) fn branch<C: CpuRegs>(cpu: &mut C, take: bool, target: u16) -> u32 {
    if !take {
        return 0;
    }
    let from = cpu.pc();
    cpu.set_pc(target);
    if crosses_page(from, target) { 2 } else { 1 }
}

/// Interrupt entry shared by BRK and NMI: push PC (high, low) and status,
/// set I, load PC from `vector`.
pub(crate) fn interrupt<C: CpuRegs, B: CpuBus>(cpu: &mut C, bus: &mut B, vector: u16, brk: bool) {
    let pc = cpu.pc();
    push_word(cpu, bus, pc);
    let p = cpu.status_for_push(brk);
    push(cpu, bus, p);
    cpu.set_flag(Status::INTERRUPT_DISABLE);
    cpu.set_pc(bus.read_word(vector));
}
