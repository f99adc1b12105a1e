//! Shared test utilities for building minimal iNES ROM images and booting a
//! CPU on them.
//!
//! Header fields written here:
//! - bytes[0..4] = b"NES\x1A"
//! - byte 4 = PRG ROM size in 16 KiB units
//! - byte 5 = CHR ROM size in 8 KiB units (0 => loader allocates CHR RAM)
//! - byte 6 = Flags 6 (mirroring, battery, trainer, mapper low nibble)
//! - byte 7 = Flags 7 (NES 2.0 indicator, mapper high nibble)
//! - byte 8 = PRG RAM size in 8 KiB units
//!
//! Vectors sit in the last six bytes of the PRG image: 0x3FFA.. for one bank,
//! 0x7FFA.. for two.

#![allow(dead_code)]

use crate::bus::Bus;
use crate::cartridge::Cartridge;
use crate::cpu::core::Cpu;

const PRG_BANK: usize = 16 * 1024;
const CHR_BANK: usize = 8 * 1024;

/// Fill byte for PRG payloads (TAX, harmless if a test runs past its program).
pub const PRG_FILL: u8 = 0xAA;
/// Fill byte for CHR payloads.
pub const CHR_FILL: u8 = 0xCC;

/// Build a minimal iNES image with configurable PRG/CHR sizes and flags.
/// PRG is filled with `PRG_FILL`, CHR with `CHR_FILL`.
pub fn build_ines(
    prg_16k: usize,
    chr_8k: usize,
    flags6: u8,
    flags7: u8,
    prg_ram_8k: u8,
    trainer: Option<&[u8; 512]>,
) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(
        16 + trainer.map_or(0, |t| t.len()) + prg_16k * PRG_BANK + chr_8k * CHR_BANK,
    );

    bytes.extend_from_slice(b"NES\x1A");
    bytes.extend_from_slice(&[prg_16k as u8, chr_8k as u8, flags6, flags7, prg_ram_8k]);
    bytes.extend_from_slice(&[0u8; 7]);

    if let Some(t) = trainer {
        bytes.extend_from_slice(t);
    }
    bytes.resize(bytes.len() + prg_16k * PRG_BANK, PRG_FILL);
    bytes.resize(bytes.len() + chr_8k * CHR_BANK, CHR_FILL);
    bytes
}

/// Build a one-bank NROM image with `prg` at 0x8000 and the given
/// (reset, nmi, irq) vectors, all 0x8000 by default.
pub fn build_nrom_with_prg(
    prg: &[u8],
    chr_8k: usize,
    prg_ram_8k: u8,
    vectors: Option<(u16, u16, u16)>,
) -> Vec<u8> {
    assert!(prg.len() <= PRG_BANK, "program must fit within a 16 KiB PRG bank");

    let mut rom = build_ines(1, chr_8k, 0, 0, prg_ram_8k, None);
    let bank = &mut rom[16..16 + PRG_BANK];
    bank[..prg.len()].copy_from_slice(prg);

    let (reset, nmi, irq) = vectors.unwrap_or((0x8000, 0x8000, 0x8000));
    set_vectors_in_prg(bank, reset, nmi, irq);
    rom
}

/// Write NMI, RESET and IRQ/BRK vectors into a 16 KiB or 32 KiB PRG slice.
pub fn set_vectors_in_prg(prg: &mut [u8], reset: u16, nmi: u16, irq: u16) {
    assert!(
        prg.len() == PRG_BANK || prg.len() == 2 * PRG_BANK,
        "unsupported PRG length for vector placement: {} bytes",
        prg.len()
    );
    let base = prg.len() - 6;
    for (i, v) in [nmi, reset, irq].into_iter().enumerate() {
        prg[base + 2 * i..base + 2 * i + 2].copy_from_slice(&v.to_le_bytes());
    }
}

/// Boot a CPU on a one-bank NROM image holding `prg`.
pub fn boot_nrom(prg: &[u8], vectors: Option<(u16, u16, u16)>) -> (Cpu, Bus) {
    let rom = build_nrom_with_prg(prg, 1, 1, vectors);
    let cart = Cartridge::from_ines_bytes(&rom).expect("parse");
    let mut cpu = Cpu::new();
    let mut bus = Bus::new(cpu.nmi_line());
    bus.attach_cartridge(cart);
    cpu.reset(&mut bus);
    (cpu, bus)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_basic_ines() {
        let rom = build_ines(2, 1, 0x01, 0x00, 1, None);
        assert_eq!(&rom[0..4], b"NES\x1A");
        assert_eq!(&rom[4..9], &[2, 1, 0x01, 0x00, 1]);
        assert_eq!(rom.len(), 16 + 2 * PRG_BANK + CHR_BANK);
        assert_eq!(rom[16], PRG_FILL);
        assert_eq!(rom[rom.len() - 1], CHR_FILL);
    }

    #[test]
    fn writes_vectors_for_16k_prg() {
        let mut prg = vec![0u8; PRG_BANK];
        set_vectors_in_prg(&mut prg, 0x8123, 0x8456, 0x8ABC);
        assert_eq!(&prg[0x3FFA..], &[0x56, 0x84, 0x23, 0x81, 0xBC, 0x8A]);
    }

    #[test]
    fn writes_vectors_for_32k_prg() {
        let mut prg = vec![0u8; 2 * PRG_BANK];
        set_vectors_in_prg(&mut prg, 0x8123, 0x8456, 0x8ABC);
        assert_eq!(&prg[0x7FFA..], &[0x56, 0x84, 0x23, 0x81, 0xBC, 0x8A]);
    }

    #[test]
    fn boot_starts_at_reset_vector() {
        let (cpu, _) = boot_nrom(&[0xEA], Some((0x8000, 0x9000, 0xA000)));
        assert_eq!(cpu.pc(), 0x8000);
        assert_eq!(cpu.cycles(), 7);
    }
}
