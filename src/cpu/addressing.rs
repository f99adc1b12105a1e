/*!
addressing.rs - 6502 addressing modes and operand resolution.

Overview
========
`resolve` turns the bytes following an opcode into an `Operand` and advances
PC by the mode's operand width:

```text
    Mode          Width  Result
    ------------  -----  -------------------------------------------------
    Implicit      0      Operand::Implied
    Accumulator   0      Operand::Accumulator(A)
    Immediate     1      Operand::Immediate(PC of the operand byte)
    ZeroPage      1      Address(zp)
    ZeroPageX/Y   1      Address((zp + X/Y) & 0xFF)
    Absolute      2      Address(word)
    AbsoluteX/Y   2      Address(word + X/Y)            page cross noted
    Indirect      2      Address(word at ptr, JMP page-wrap quirk)
    IndirectX     1      Address(word at (zp + X) & 0xFF, zero-page wrap)
    IndirectY     1      Address(word at zp, zero-page wrap, + Y)  page cross noted
    Relative      1      Address(PC after offset + signed offset)
```

Each arm of the `match` in `resolve` is the single exit for its mode. Page
crossings are reported to `PendingCycles`; whether they cost a cycle is the
handler's call.

Caller Assumptions
==================
- PC points at the first operand byte (the opcode has already been consumed).
- No bus ticking happens here; timing is settled by the step driver.
*/

use std::fmt;

use crate::cpu::cycles::{PendingCycles, crosses_page};
use crate::cpu::regs::CpuRegs;
use crate::cpu_bus::CpuBus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    Implicit,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Indirect,
    IndirectX,
    IndirectY,
    Relative,
}

impl AddressingMode {
    /// Operand bytes following the opcode.
    pub const fn operand_len(self) -> u16 {
        match self {
            AddressingMode::Implicit | AddressingMode::Accumulator => 0,
            AddressingMode::Immediate
            | AddressingMode::ZeroPage
            | AddressingMode::ZeroPageX
            | AddressingMode::ZeroPageY
            | AddressingMode::IndirectX
            | AddressingMode::IndirectY
            | AddressingMode::Relative => 1,
            AddressingMode::Absolute
            | AddressingMode::AbsoluteX
            | AddressingMode::AbsoluteY
            | AddressingMode::Indirect => 2,
        }
    }

    /// Three-letter tag used in listings.
    pub const fn short_name(self) -> &'static str {
        match self {
            AddressingMode::Implicit => "IMP",
            AddressingMode::Accumulator => "ACC",
            AddressingMode::Immediate => "IMM",
            AddressingMode::ZeroPage => "ZPG",
            AddressingMode::ZeroPageX => "ZPX",
            AddressingMode::ZeroPageY => "ZPY",
            AddressingMode::Absolute => "ABS",
            AddressingMode::AbsoluteX => "ABX",
            AddressingMode::AbsoluteY => "ABY",
            AddressingMode::Indirect => "IND",
            AddressingMode::IndirectX => "INX",
            AddressingMode::IndirectY => "INY",
            AddressingMode::Relative => "REL",
        }
    }
}

impl fmt::Display for AddressingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Resolved operand for one instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// No operand (Implicit).
    Implied,
    /// Accumulator-targeted shift/rotate; carries A at resolve time.
    Accumulator(u8),
    /// Address of the immediate byte inside the instruction stream.
    Immediate(u16),
    /// Effective memory address (or branch target).
    Address(u16),
}

impl Operand {
    /// Effective address, if the operand has one.
    #[inline]
    pub fn address(self) -> Option<u16> {
        match self {
            Operand::Immediate(addr) | Operand::Address(addr) => Some(addr),
            Operand::Implied | Operand::Accumulator(_) => None,
        }
    }

    /// Read the operand value. Implied operands read as 0.
    #[inline]
    pub fn read<B: CpuBus>(self, bus: &mut B) -> u8 {
        match self {
            Operand::Immediate(addr) | Operand::Address(addr) => bus.read(addr),
            Operand::Accumulator(a) => a,
            Operand::Implied => 0,
        }
    }
}

/// Fetch next byte from the instruction stream, incrementing PC.
#[inline]
pub(crate) fn fetch_byte<C: CpuRegs, B: CpuBus>(cpu: &mut C, bus: &mut B) -> u8 {
    let v = bus.read(cpu.pc());
    cpu.advance_pc(1);
    v
}

/// Fetch next little-endian word (low, then high), incrementing PC twice.
#[inline]
pub(crate) fn fetch_word<C: CpuRegs, B: CpuBus>(cpu: &mut C, bus: &mut B) -> u16 {
    let lo = fetch_byte(cpu, bus) as u16;
    let hi = fetch_byte(cpu, bus) as u16;
    (hi << 8) | lo
}

/// Resolve `mode` at the current PC.
pub(crate) fn resolve<C: CpuRegs, B: CpuBus>(
    mode: AddressingMode,
    cpu: &mut C,
    bus: &mut B,
    pending: &mut PendingCycles,
) -> Operand {
    match mode {
        AddressingMode::Implicit => Operand::Implied,
        AddressingMode::Accumulator => Operand::Accumulator(cpu.a()),
        AddressingMode::Immediate => {
            let addr = cpu.pc();
            cpu.advance_pc(1);
            Operand::Immediate(addr)
        }
        AddressingMode::ZeroPage => Operand::Address(fetch_byte(cpu, bus) as u16),
        AddressingMode::ZeroPageX => {
            Operand::Address(fetch_byte(cpu, bus).wrapping_add(cpu.x()) as u16)
        }
        AddressingMode::ZeroPageY => {
            Operand::Address(fetch_byte(cpu, bus).wrapping_add(cpu.y()) as u16)
        }
        AddressingMode::Absolute => Operand::Address(fetch_word(cpu, bus)),
        AddressingMode::AbsoluteX => {
            let base = fetch_word(cpu, bus);
            let addr = base.wrapping_add(cpu.x() as u16);
            pending.note_page_cross(crosses_page(base, addr));
            Operand::Address(addr)
        }
        AddressingMode::AbsoluteY => {
            let base = fetch_word(cpu, bus);
            let addr = base.wrapping_add(cpu.y() as u16);
            pending.note_page_cross(crosses_page(base, addr));
            Operand::Address(addr)
        }
        AddressingMode::Indirect => {
            let ptr = fetch_word(cpu, bus);
            Operand::Address(read_word_indirect_bug(bus, ptr))
        }
        AddressingMode::IndirectX => {
            let zp = fetch_byte(cpu, bus).wrapping_add(cpu.x());
            Operand::Address(read_word_zp(bus, zp))
        }
        AddressingMode::IndirectY => {
            let zp = fetch_byte(cpu, bus);
            let base = read_word_zp(bus, zp);
            let addr = base.wrapping_add(cpu.y() as u16);
            pending.note_page_cross(crosses_page(base, addr));
            Operand::Address(addr)
        }
        AddressingMode::Relative => {
            let offset = fetch_byte(cpu, bus) as i8;
            Operand::Address(cpu.pc().wrapping_add(offset as u16))
        }
    }
}

/// Read a 16-bit pointer from zero page; the high byte fetch wraps to 0x00.
#[inline]
pub(crate) fn read_word_zp<B: CpuBus>(bus: &mut B, base: u8) -> u16 {
    let lo = bus.read(base as u16) as u16;
    let hi = bus.read(base.wrapping_add(1) as u16) as u16;
    (hi << 8) | lo
}

/// JMP (indirect) pointer read: the high byte comes from the same page as
/// the low byte, so a pointer at $xxFF takes its high byte from $xx00.
#[inline]
pub(crate) fn read_word_indirect_bug<B: CpuBus>(bus: &mut B, ptr: u16) -> u16 {
    let lo = bus.read(ptr) as u16;
    let hi_addr = (ptr & 0xFF00) | (ptr.wrapping_add(1) & 0x00FF);
    let hi = bus.read(hi_addr) as u16;
    (hi << 8) | lo
}
