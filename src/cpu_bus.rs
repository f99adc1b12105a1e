/*!
cpu_bus: Trait abstraction decoupling the 6502 core from the concrete NES `Bus`.

Rationale:
- Every CPU memory access (operand fetch, stack, vectors, RMW) goes through
  this trait, so the core can run against the full console bus or against a
  flat 64 KiB image in tests and tooling.
- Debug tooling (disassembler, trace lines, `Cpu::peek`) needs reads that do
  not disturb hardware state such as the PPUSTATUS vblank latch; `peek` is the
  side-effect free counterpart of `read`.

Address Space Expectations (routing left to the implementor):
- 0x0000-0x01FF : Zero page and stack page (must be plain RAM)
- 0xFFFA-0xFFFF : NMI / RESET / IRQ-BRK vectors, read little-endian

`FlatMemory` is the trivial implementor: a 64 KiB array with no mirroring
and no side effects.
*/

/// Byte-addressable surface the CPU core reads and writes through.
pub trait CpuBus {
    /// CPU-visible read. May have side effects (register latches).
    fn read(&mut self, addr: u16) -> u8;

    /// CPU-visible write.
    fn write(&mut self, addr: u16, value: u8);

    /// Read without side effects, for debuggers and disassembly.
    fn peek(&self, addr: u16) -> u8;

    /// Little-endian 16-bit read: low byte at `addr`, high byte at `addr + 1`.
    #[inline]
    fn read_word(&mut self, addr: u16) -> u16 {
        let lo = self.read(addr) as u16;
        let hi = self.read(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    /// Side-effect free 16-bit read.
    #[inline]
    fn peek_word(&self, addr: u16) -> u16 {
        let lo = self.peek(addr) as u16;
        let hi = self.peek(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }
}

/// Flat, fully writable 64 KiB memory image.
#[derive(Clone)]
pub struct FlatMemory {
    bytes: Box<[u8; 0x10000]>,
}

impl Default for FlatMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FlatMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlatMemory").finish_non_exhaustive()
    }
}

impl FlatMemory {
    pub fn new() -> Self {
        Self {
            bytes: Box::new([0; 0x10000]),
        }
    }

    /// Copy `data` into memory starting at `origin`, wrapping past 0xFFFF.
    pub fn load(&mut self, origin: u16, data: &[u8]) {
        let mut addr = origin;
        for &b in data {
            self.bytes[addr as usize] = b;
            addr = addr.wrapping_add(1);
        }
    }

    /// Store a little-endian word (vector setup in tests).
    pub fn set_word(&mut self, addr: u16, value: u16) {
        self.bytes[addr as usize] = value as u8;
        self.bytes[addr.wrapping_add(1) as usize] = (value >> 8) as u8;
    }
}

impl CpuBus for FlatMemory {
    #[inline]
    fn read(&mut self, addr: u16) -> u8 {
        self.bytes[addr as usize]
    }

    #[inline]
    fn write(&mut self, addr: u16, value: u8) {
        self.bytes[addr as usize] = value;
    }

    #[inline]
    fn peek(&self, addr: u16) -> u8 {
        self.bytes[addr as usize]
    }
}
