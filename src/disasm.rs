/*!
disasm - 6502 disassembler and trace-line formatter.

Reads through `CpuBus::peek` only, so listing memory never disturbs PPU
registers or the invalid-access log. Descriptors come from the same static
opcode table the CPU executes from.

Syntax:
    LDA #$10      STA $0200,X    LDA ($20),Y    LDA ($20,X)
    JMP ($FFFC)   ASL A          BNE $8010      .DB $02
Branch targets are printed as absolute addresses.
*/

use std::fmt;

use crate::cpu::Cpu;
use crate::cpu::addressing::AddressingMode;
use crate::cpu::table::{Opcode, lookup};
use crate::cpu_bus::CpuBus;

/// One decoded instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub addr: u16,
    pub opcode: &'static Opcode,
    /// Raw bytes; only the first `len()` are meaningful.
    pub bytes: [u8; 3],
    pub text: String,
}

impl Instruction {
    /// Encoded length in bytes (1 for illegal opcodes).
    pub fn len(&self) -> u16 {
        self.opcode.len()
    }

    /// Address of the following instruction.
    pub fn next_addr(&self) -> u16 {
        self.addr.wrapping_add(self.len())
    }

    fn hex_bytes(&self) -> String {
        self.bytes[..self.len() as usize]
            .iter()
            .map(|b| format!("{b:02X}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}  {:<8}  {}", self.addr, self.hex_bytes(), self.text)
    }
}

/// Decode the instruction at `addr`.
pub fn disassemble<B: CpuBus>(bus: &B, addr: u16) -> Instruction {
    let opcode = lookup(bus.peek(addr));
    let bytes = [
        opcode.code,
        bus.peek(addr.wrapping_add(1)),
        bus.peek(addr.wrapping_add(2)),
    ];
    let text = if opcode.is_illegal() {
        format!(".DB ${:02X}", opcode.code)
    } else {
        let operand = format_operand(opcode.mode, addr, bytes[1], bytes[2]);
        if operand.is_empty() {
            opcode.mnemonic.to_string()
        } else {
            format!("{} {}", opcode.mnemonic, operand)
        }
    };
    Instruction {
        addr,
        opcode,
        bytes,
        text,
    }
}

fn format_operand(mode: AddressingMode, addr: u16, lo: u8, hi: u8) -> String {
    let word = u16::from_le_bytes([lo, hi]);
    match mode {
        AddressingMode::Implicit => String::new(),
        AddressingMode::Accumulator => "A".to_string(),
        AddressingMode::Immediate => format!("#${lo:02X}"),
        AddressingMode::ZeroPage => format!("${lo:02X}"),
        AddressingMode::ZeroPageX => format!("${lo:02X},X"),
        AddressingMode::ZeroPageY => format!("${lo:02X},Y"),
        AddressingMode::Absolute => format!("${word:04X}"),
        AddressingMode::AbsoluteX => format!("${word:04X},X"),
        AddressingMode::AbsoluteY => format!("${word:04X},Y"),
        AddressingMode::Indirect => format!("(${word:04X})"),
        AddressingMode::IndirectX => format!("(${lo:02X},X)"),
        AddressingMode::IndirectY => format!("(${lo:02X}),Y"),
        AddressingMode::Relative => {
            let target = addr.wrapping_add(2).wrapping_add(lo as i8 as u16);
            format!("${target:04X}")
        }
    }
}

/// Lazily decode `count` consecutive instructions starting at `start`.
pub fn disassemble_range<B: CpuBus>(
    bus: &B,
    start: u16,
    count: usize,
) -> impl Iterator<Item = Instruction> + '_ {
    let mut addr = start;
    (0..count).map(move |_| {
        let ins = disassemble(bus, addr);
        addr = ins.next_addr();
        ins
    })
}

/// One trace line for the instruction about to execute:
/// `PC  bytes  text  A:.. X:.. Y:.. P:.. SP:.. CYC:..`
pub fn trace_line<B: CpuBus>(cpu: &Cpu, bus: &B) -> String {
    let ins = disassemble(bus, cpu.pc());
    format!(
        "{:<36}A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} CYC:{}",
        ins.to_string(),
        cpu.a(),
        cpu.x(),
        cpu.y(),
        cpu.status().bits(),
        cpu.sp(),
        cpu.cycles()
    )
}
