#![doc = r#"
nescore library crate.

A 6502 CPU core for an NES emulator, plus the minimum of the console it
needs to run cartridge code: the CPU bus, an NROM cartridge loader, a PPU
register shadow that raises NMI at vblank, and a disassembler.

Modules:
- bus: CPU address space (RAM, PPU registers, OAM DMA, cartridge) and timing
- cartridge: iNES loader for mapper 0 images
- cpu: 6502 CPU core (facade + state + table + dispatch + execute modules)
- cpu_bus: the `CpuBus` trait the CPU is generic over, and a flat 64 KiB memory
- disasm: instruction listing and trace lines
- nes: system driver owning the CPU and the bus
- ppu: PPU registers, OAM, frame timing and the vblank NMI

In tests, shared iNES builders are available under `crate::test_utils`.
"#]

pub mod bus;
pub mod cartridge;
pub mod cpu;
pub mod cpu_bus;
pub mod disasm;
pub mod nes;
pub mod ppu;

// Re-export commonly used types at the crate root for convenience.
pub use bus::Bus;
pub use cartridge::{Cartridge, CartridgeError};
pub use cpu::Cpu;
pub use cpu_bus::{CpuBus, FlatMemory};
pub use nes::Nes;

// Shared test utilities (only compiled for tests)
#[cfg(test)]
pub mod test_utils;
