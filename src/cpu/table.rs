/*!
table.rs - Static 256-entry opcode descriptor table.

Purpose
=======
Maps every opcode byte to an immutable `Opcode` descriptor:
{code, mnemonic, base cycles, addressing mode}. The table is a `static`
built by a `const fn` at compile time, so it is process-wide read-only data
with no lazy initialisation.

Design
------
- `ENTRIES` lists the 151 documented NMOS 6502 opcodes.
- `build_table` first fills all 256 slots with the illegal sentinel
  {Illegal, 0 cycles, Implicit} (carrying its own code byte), then places the
  documented entries. `lookup` therefore never fails.
- Base cycles exclude the conditional +1 for page-crossing reads and the
  branch-taken extras; those are settled by the step driver.
*/

use std::fmt;

use crate::cpu::addressing::AddressingMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mnemonic {
    Adc,
    And,
    Asl,
    Bcc,
    Bcs,
    Beq,
    Bit,
    Bmi,
    Bne,
    Bpl,
    Brk,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Cli,
    Clv,
    Cmp,
    Cpx,
    Cpy,
    Dec,
    Dex,
    Dey,
    Eor,
    Inc,
    Inx,
    Iny,
    Jmp,
    Jsr,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    Nop,
    Ora,
    Pha,
    Php,
    Pla,
    Plp,
    Rol,
    Ror,
    Rti,
    Rts,
    Sbc,
    Sec,
    Sed,
    Sei,
    Sta,
    Stx,
    Sty,
    Tax,
    Tay,
    Tsx,
    Txa,
    Txs,
    Tya,
    /// Unassigned opcode; executes as a no-op.
    Illegal,
}

impl Mnemonic {
    pub const fn label(self) -> &'static str {
        use Mnemonic::*;
        match self {
            Adc => "ADC",
            And => "AND",
            Asl => "ASL",
            Bcc => "BCC",
            Bcs => "BCS",
            Beq => "BEQ",
            Bit => "BIT",
            Bmi => "BMI",
            Bne => "BNE",
            Bpl => "BPL",
            Brk => "BRK",
            Bvc => "BVC",
            Bvs => "BVS",
            Clc => "CLC",
            Cld => "CLD",
            Cli => "CLI",
            Clv => "CLV",
            Cmp => "CMP",
            Cpx => "CPX",
            Cpy => "CPY",
            Dec => "DEC",
            Dex => "DEX",
            Dey => "DEY",
            Eor => "EOR",
            Inc => "INC",
            Inx => "INX",
            Iny => "INY",
            Jmp => "JMP",
            Jsr => "JSR",
            Lda => "LDA",
            Ldx => "LDX",
            Ldy => "LDY",
            Lsr => "LSR",
            Nop => "NOP",
            Ora => "ORA",
            Pha => "PHA",
            Php => "PHP",
            Pla => "PLA",
            Plp => "PLP",
            Rol => "ROL",
            Ror => "ROR",
            Rti => "RTI",
            Rts => "RTS",
            Sbc => "SBC",
            Sec => "SEC",
            Sed => "SED",
            Sei => "SEI",
            Sta => "STA",
            Stx => "STX",
            Sty => "STY",
            Tax => "TAX",
            Tay => "TAY",
            Tsx => "TSX",
            Txa => "TXA",
            Txs => "TXS",
            Tya => "TYA",
            Illegal => "???",
        }
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Immutable descriptor for one opcode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub code: u8,
    pub mnemonic: Mnemonic,
    pub cycles: u8,
    pub mode: AddressingMode,
}

impl Opcode {
    const fn new(code: u8, mnemonic: Mnemonic, cycles: u8, mode: AddressingMode) -> Self {
        Self {
            code,
            mnemonic,
            cycles,
            mode,
        }
    }

    /// Sentinel for an unassigned slot.
    pub const fn illegal(code: u8) -> Self {
        Self::new(code, Mnemonic::Illegal, 0, AddressingMode::Implicit)
    }

    #[inline]
    pub fn is_illegal(&self) -> bool {
        self.mnemonic == Mnemonic::Illegal
    }

    /// Total instruction length in bytes, opcode included.
    #[inline]
    pub fn len(&self) -> u16 {
        1 + self.mode.operand_len()
    }
}

/// Descriptor for `code`. Unassigned codes yield the illegal sentinel.
#[inline]
pub fn lookup(code: u8) -> &'static Opcode {
    &OPCODES[code as usize]
}

pub static OPCODES: [Opcode; 256] = build_table();

const fn build_table() -> [Opcode; 256] {
    let mut table = [Opcode::illegal(0); 256];
    let mut i = 0;
    while i < 256 {
        table[i] = Opcode::illegal(i as u8);
        i += 1;
    }
    let mut j = 0;
    while j < ENTRIES.len() {
        let e = ENTRIES[j];
        table[e.code as usize] = e;
        j += 1;
    }
    table
}

const ENTRIES: &[Opcode] = {
    use AddressingMode::*;
    use Mnemonic::*;
    const fn op(code: u8, m: Mnemonic, cycles: u8, mode: AddressingMode) -> Opcode {
        Opcode::new(code, m, cycles, mode)
    }
    &[
        // ADC
        op(0x69, Adc, 2, Immediate),
        op(0x65, Adc, 3, ZeroPage),
        op(0x75, Adc, 4, ZeroPageX),
        op(0x6D, Adc, 4, Absolute),
        op(0x7D, Adc, 4, AbsoluteX),
        op(0x79, Adc, 4, AbsoluteY),
        op(0x61, Adc, 6, IndirectX),
        op(0x71, Adc, 5, IndirectY),
        // AND
        op(0x29, And, 2, Immediate),
        op(0x25, And, 3, ZeroPage),
        op(0x35, And, 4, ZeroPageX),
        op(0x2D, And, 4, Absolute),
        op(0x3D, And, 4, AbsoluteX),
        op(0x39, And, 4, AbsoluteY),
        op(0x21, And, 6, IndirectX),
        op(0x31, And, 5, IndirectY),
        // ASL
        op(0x0A, Asl, 2, Accumulator),
        op(0x06, Asl, 5, ZeroPage),
        op(0x16, Asl, 6, ZeroPageX),
        op(0x0E, Asl, 6, Absolute),
        op(0x1E, Asl, 7, AbsoluteX),
        // Branches
        op(0x90, Bcc, 2, Relative),
        op(0xB0, Bcs, 2, Relative),
        op(0xF0, Beq, 2, Relative),
        op(0x30, Bmi, 2, Relative),
        op(0xD0, Bne, 2, Relative),
        op(0x10, Bpl, 2, Relative),
        op(0x50, Bvc, 2, Relative),
        op(0x70, Bvs, 2, Relative),
        // BIT
        op(0x24, Bit, 3, ZeroPage),
        op(0x2C, Bit, 4, Absolute),
        // BRK
        op(0x00, Brk, 7, Implicit),
        // Flag clears
        op(0x18, Clc, 2, Implicit),
        op(0xD8, Cld, 2, Implicit),
        op(0x58, Cli, 2, Implicit),
        op(0xB8, Clv, 2, Implicit),
        // CMP
        op(0xC9, Cmp, 2, Immediate),
        op(0xC5, Cmp, 3, ZeroPage),
        op(0xD5, Cmp, 4, ZeroPageX),
        op(0xCD, Cmp, 4, Absolute),
        op(0xDD, Cmp, 4, AbsoluteX),
        op(0xD9, Cmp, 4, AbsoluteY),
        op(0xC1, Cmp, 6, IndirectX),
        op(0xD1, Cmp, 5, IndirectY),
        // CPX / CPY
        op(0xE0, Cpx, 2, Immediate),
        op(0xE4, Cpx, 3, ZeroPage),
        op(0xEC, Cpx, 4, Absolute),
        op(0xC0, Cpy, 2, Immediate),
        op(0xC4, Cpy, 3, ZeroPage),
        op(0xCC, Cpy, 4, Absolute),
        // DEC / DEX / DEY
        op(0xC6, Dec, 5, ZeroPage),
        op(0xD6, Dec, 6, ZeroPageX),
        op(0xCE, Dec, 6, Absolute),
        op(0xDE, Dec, 7, AbsoluteX),
        op(0xCA, Dex, 2, Implicit),
        op(0x88, Dey, 2, Implicit),
        // EOR
        op(0x49, Eor, 2, Immediate),
        op(0x45, Eor, 3, ZeroPage),
        op(0x55, Eor, 4, ZeroPageX),
        op(0x4D, Eor, 4, Absolute),
        op(0x5D, Eor, 4, AbsoluteX),
        op(0x59, Eor, 4, AbsoluteY),
        op(0x41, Eor, 6, IndirectX),
        op(0x51, Eor, 5, IndirectY),
        // INC / INX / INY
        op(0xE6, Inc, 5, ZeroPage),
        op(0xF6, Inc, 6, ZeroPageX),
        op(0xEE, Inc, 6, Absolute),
        op(0xFE, Inc, 7, AbsoluteX),
        op(0xE8, Inx, 2, Implicit),
        op(0xC8, Iny, 2, Implicit),
        // JMP / JSR
        op(0x4C, Jmp, 3, Absolute),
        op(0x6C, Jmp, 5, Indirect),
        op(0x20, Jsr, 6, Absolute),
        // LDA
        op(0xA9, Lda, 2, Immediate),
        op(0xA5, Lda, 3, ZeroPage),
        op(0xB5, Lda, 4, ZeroPageX),
        op(0xAD, Lda, 4, Absolute),
        op(0xBD, Lda, 4, AbsoluteX),
        op(0xB9, Lda, 4, AbsoluteY),
        op(0xA1, Lda, 6, IndirectX),
        op(0xB1, Lda, 5, IndirectY),
        // LDX
        op(0xA2, Ldx, 2, Immediate),
        op(0xA6, Ldx, 3, ZeroPage),
        op(0xB6, Ldx, 4, ZeroPageY),
        op(0xAE, Ldx, 4, Absolute),
        op(0xBE, Ldx, 4, AbsoluteY),
        // LDY
        op(0xA0, Ldy, 2, Immediate),
        op(0xA4, Ldy, 3, ZeroPage),
        op(0xB4, Ldy, 4, ZeroPageX),
        op(0xAC, Ldy, 4, Absolute),
        op(0xBC, Ldy, 4, AbsoluteX),
        // LSR
        op(0x4A, Lsr, 2, Accumulator),
        op(0x46, Lsr, 5, ZeroPage),
        op(0x56, Lsr, 6, ZeroPageX),
        op(0x4E, Lsr, 6, Absolute),
        op(0x5E, Lsr, 7, AbsoluteX),
        // NOP
        op(0xEA, Nop, 2, Implicit),
        // ORA
        op(0x09, Ora, 2, Immediate),
        op(0x05, Ora, 3, ZeroPage),
        op(0x15, Ora, 4, ZeroPageX),
        op(0x0D, Ora, 4, Absolute),
        op(0x1D, Ora, 4, AbsoluteX),
        op(0x19, Ora, 4, AbsoluteY),
        op(0x01, Ora, 6, IndirectX),
        op(0x11, Ora, 5, IndirectY),
        // Stack
        op(0x48, Pha, 3, Implicit),
        op(0x08, Php, 3, Implicit),
        op(0x68, Pla, 4, Implicit),
        op(0x28, Plp, 4, Implicit),
        // ROL
        op(0x2A, Rol, 2, Accumulator),
        op(0x26, Rol, 5, ZeroPage),
        op(0x36, Rol, 6, ZeroPageX),
        op(0x2E, Rol, 6, Absolute),
        op(0x3E, Rol, 7, AbsoluteX),
        // ROR
        op(0x6A, Ror, 2, Accumulator),
        op(0x66, Ror, 5, ZeroPage),
        op(0x76, Ror, 6, ZeroPageX),
        op(0x6E, Ror, 6, Absolute),
        op(0x7E, Ror, 7, AbsoluteX),
        // RTI / RTS
        op(0x40, Rti, 6, Implicit),
        op(0x60, Rts, 6, Implicit),
        // SBC
        op(0xE9, Sbc, 2, Immediate),
        op(0xE5, Sbc, 3, ZeroPage),
        op(0xF5, Sbc, 4, ZeroPageX),
        op(0xED, Sbc, 4, Absolute),
        op(0xFD, Sbc, 4, AbsoluteX),
        op(0xF9, Sbc, 4, AbsoluteY),
        op(0xE1, Sbc, 6, IndirectX),
        op(0xF1, Sbc, 5, IndirectY),
        // Flag sets
        op(0x38, Sec, 2, Implicit),
        op(0xF8, Sed, 2, Implicit),
        op(0x78, Sei, 2, Implicit),
        // STA
        op(0x85, Sta, 3, ZeroPage),
        op(0x95, Sta, 4, ZeroPageX),
        op(0x8D, Sta, 4, Absolute),
        op(0x9D, Sta, 5, AbsoluteX),
        op(0x99, Sta, 5, AbsoluteY),
        op(0x81, Sta, 6, IndirectX),
        op(0x91, Sta, 6, IndirectY),
        // STX / STY
        op(0x86, Stx, 3, ZeroPage),
        op(0x96, Stx, 4, ZeroPageY),
        op(0x8E, Stx, 4, Absolute),
        op(0x84, Sty, 3, ZeroPage),
        op(0x94, Sty, 4, ZeroPageX),
        op(0x8C, Sty, 4, Absolute),
        // Transfers
        op(0xAA, Tax, 2, Implicit),
        op(0xA8, Tay, 2, Implicit),
        op(0xBA, Tsx, 2, Implicit),
        op(0x8A, Txa, 2, Implicit),
        op(0x9A, Txs, 2, Implicit),
        op(0x98, Tya, 2, Implicit),
    ]
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_slot_carries_its_own_code() {
        for code in 0..=255u8 {
            assert_eq!(lookup(code).code, code);
        }
    }

    #[test]
    fn documented_opcode_count() {
        let documented = OPCODES.iter().filter(|o| !o.is_illegal()).count();
        assert_eq!(documented, 151);
        assert_eq!(ENTRIES.len(), 151);
    }

    #[test]
    fn no_duplicate_entries() {
        let mut seen = [false; 256];
        for e in ENTRIES {
            assert!(!seen[e.code as usize], "duplicate {:#04X}", e.code);
            seen[e.code as usize] = true;
        }
    }

    #[test]
    fn unassigned_codes_are_zero_cost_implicit_sentinels() {
        for code in [0x02u8, 0x1A, 0x80, 0xEB, 0xFF] {
            let op = lookup(code);
            assert_eq!(op.mnemonic, Mnemonic::Illegal);
            assert_eq!(op.cycles, 0);
            assert_eq!(op.mode, AddressingMode::Implicit);
        }
    }

    #[test]
    fn documented_entries_have_nonzero_cost() {
        for op in OPCODES.iter().filter(|o| !o.is_illegal()) {
            assert!(op.cycles >= 2, "{:#04X} {}", op.code, op.mnemonic);
        }
    }

    #[test]
    fn spot_check_descriptors() {
        let jmp_ind = lookup(0x6C);
        assert_eq!(jmp_ind.mnemonic, Mnemonic::Jmp);
        assert_eq!(jmp_ind.mode, AddressingMode::Indirect);
        assert_eq!(jmp_ind.cycles, 5);

        let ldx_aby = lookup(0xBE);
        assert_eq!(ldx_aby.mnemonic, Mnemonic::Ldx);
        assert_eq!(ldx_aby.mode, AddressingMode::AbsoluteY);

        let sta_iny = lookup(0x91);
        assert_eq!(sta_iny.cycles, 6);

        assert_eq!(lookup(0x0A).mode, AddressingMode::Accumulator);
        assert_eq!(lookup(0x00).len(), 1);
        assert_eq!(lookup(0x20).len(), 3);
    }
}
