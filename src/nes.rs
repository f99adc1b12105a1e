/*!
Nes - system driver tying the CPU, bus, PPU and cartridge together.

Wiring
======
`Nes::new` builds the `Cpu` first, hands a clone of its NMI line to the
`Bus` (which gives it to the `Ppu`), inserts the cartridge and resets the CPU
from the reset vector. Nothing is global; the `Nes` value owns everything.

Stepping
========
`step` runs one CPU step, collects any OAM-DMA stall that step triggered,
and then ticks the bus for all of those cycles (3 PPU dots each). An NMI the
PPU raises during the tick is serviced at the start of the next step.
*/

use std::path::Path;

use crate::bus::Bus;
use crate::cartridge::{Cartridge, CartridgeError};
use crate::cpu::Cpu;
use crate::cpu_bus::CpuBus;

/// Upper bound on steps `run_frame` will take before giving up. A full frame
/// is roughly 30k CPU cycles, so this only trips on code that burns no
/// cycles (a run of illegal opcodes).
pub const MAX_STEPS_PER_FRAME: usize = 200_000;

pub struct Nes {
    cpu: Cpu,
    bus: Bus,
    stall_cycles: u64,
}

impl Nes {
    /// Wire a console around `cart` and reset it.
    pub fn new(cart: Cartridge) -> Self {
        let mut cpu = Cpu::new();
        let mut bus = Bus::new(cpu.nmi_line());
        bus.attach_cartridge(cart);
        cpu.reset(&mut bus);
        Self {
            cpu,
            bus,
            stall_cycles: 0,
        }
    }

    /// Load an iNES file and wire a console around it.
    pub fn from_ines_file<P: AsRef<Path>>(path: P) -> Result<Self, CartridgeError> {
        Ok(Self::new(Cartridge::from_ines_file(path)?))
    }

    /// Reset the bus and the CPU. The cartridge stays inserted.
    pub fn reset(&mut self) {
        self.bus.reset();
        self.cpu.reset(&mut self.bus);
        self.stall_cycles = 0;
    }

    /// One CPU step plus any DMA stall; returns the CPU cycles consumed.
    pub fn step(&mut self) -> u32 {
        let cycles = self.cpu.step(&mut self.bus);
        let stall = self.bus.take_dma_stall();
        self.stall_cycles += u64::from(stall);
        self.bus.tick(cycles + stall);
        cycles + stall
    }

    /// Step until the PPU completes a frame. Returns the cycles spent.
    pub fn run_frame(&mut self) -> u64 {
        let mut spent = 0u64;
        for _ in 0..MAX_STEPS_PER_FRAME {
            spent += u64::from(self.step());
            if self.bus.ppu_mut().take_frame_complete() {
                return spent;
            }
        }
        log::warn!(
            "frame did not complete within {MAX_STEPS_PER_FRAME} steps (PC={:#06X})",
            self.cpu.pc()
        );
        spent
    }

    /// Total cycles since reset, DMA stalls included.
    pub fn cycles(&self) -> u64 {
        self.cpu.cycles() + self.stall_cycles
    }

    pub fn peek(&self, addr: u16) -> u8 {
        self.cpu.peek(&self.bus, addr)
    }

    pub fn poke(&mut self, addr: u16, value: u8) {
        self.cpu.poke(&mut self.bus, addr, value);
    }

    pub fn request_nmi(&self) {
        self.cpu.request_nmi();
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut Bus {
        &mut self.bus
    }

    /// Read a little-endian word without side effects.
    pub fn peek_word(&self, addr: u16) -> u16 {
        self.bus.peek_word(addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{build_ines, build_nrom_with_prg};

    fn nes(prg: &[u8], vectors: Option<(u16, u16, u16)>) -> Nes {
        let rom = build_nrom_with_prg(prg, 1, 1, vectors);
        Nes::new(Cartridge::from_ines_bytes(&rom).expect("parse"))
    }

    #[test]
    fn one_bank_image_runs_from_mirrored_vector() {
        let mut rom = build_ines(1, 1, 0, 0, 1, None);
        rom[16] = 0xA9; // LDA #$77 at $8000 (and $C000)
        rom[17] = 0x77;
        // Reset vector -> $C000, read through the mirror of $BFFC.
        rom[16 + 0x3FFC] = 0x00;
        rom[16 + 0x3FFD] = 0xC0;
        let mut nes = Nes::new(Cartridge::from_ines_bytes(&rom).expect("parse"));

        assert_eq!(nes.peek(0x8000), rom[16]);
        assert_eq!(nes.peek(0xC000), rom[16]);
        assert_eq!(nes.cpu().pc(), 0xC000);
        assert_eq!(nes.step(), 2);
        assert_eq!(nes.cpu().a(), 0x77);
    }

    #[test]
    fn step_ticks_ppu_three_dots_per_cycle() {
        let mut nes = nes(&[0xEA, 0xEA], None);
        assert_eq!(nes.step(), 2);
        assert_eq!(nes.bus().total_ticks(), 2);
        assert_eq!(nes.bus().ppu().dot(), 6);
        assert_eq!(nes.cycles(), 9);
    }

    #[test]
    fn oam_dma_stall_is_charged() {
        // LDA #$02; STA $4014
        let mut nes = nes(&[0xA9, 0x02, 0x8D, 0x14, 0x40], None);
        nes.poke(0x0200, 0x9A);
        nes.step();
        let spent = nes.step();
        // DMA starts on an even bus cycle (2), so no alignment cycle.
        assert_eq!(spent, 4 + 513);
        assert_eq!(nes.bus().ppu().peek_oam(0), 0x9A);
        assert_eq!(nes.bus().total_ticks(), u64::from(2 + spent));
    }

    #[test]
    fn vblank_nmi_reaches_handler() {
        // $8000: LDA #$80; STA $2000; loop: JMP loop
        // NMI handler at $8010: LDX #$01; RTI
        let mut prg = vec![0xEA; 0x20];
        prg[..8].copy_from_slice(&[0xA9, 0x80, 0x8D, 0x00, 0x20, 0x4C, 0x05, 0x80]);
        prg[0x10..0x13].copy_from_slice(&[0xA2, 0x01, 0x40]);
        let mut nes = nes(&prg, Some((0x8000, 0x8010, 0x8000)));

        nes.run_frame();
        assert_eq!(nes.cpu().x(), 0x01);
        assert!(nes.bus().ppu().frame() >= 1);
    }

    #[test]
    fn run_frame_spends_one_frame_of_cycles() {
        // loop: JMP loop
        let mut nes = nes(&[0x4C, 0x00, 0x80], None);
        let spent = nes.run_frame();
        // 262 * 341 dots / 3 dots per cycle, rounded up to a whole JMP.
        assert!((29_781..=29_784).contains(&spent), "spent {spent}");
        assert_eq!(nes.bus().ppu().frame(), 1);
    }

    #[test]
    fn reset_returns_to_vector_and_clears_ram() {
        let mut nes = nes(&[0xA9, 0x01, 0x85, 0x10], None);
        nes.step();
        nes.step();
        assert_eq!(nes.peek(0x0010), 0x01);
        nes.reset();
        assert_eq!(nes.cpu().pc(), 0x8000);
        assert_eq!(nes.peek(0x0010), 0x00);
        assert_eq!(nes.cycles(), 7);
    }

    #[test]
    fn missing_rom_file_is_reported() {
        assert!(matches!(
            Nes::from_ines_file("/nonexistent/rom.nes"),
            Err(CartridgeError::Io(_))
        ));
    }
}
