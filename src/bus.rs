/*!
Bus mapping the CPU address space to RAM, the PPU registers and the cartridge.

Address map (CPU):
- $0000-$07FF: 2KB internal RAM
- $0800-$1FFF: Mirrors of $0000-$07FF (mask with & 0x07FF)
- $2000-$2007: PPU registers
- $2008-$3FFF: Mirrors of $2000-$2007 (mask with & 0x0007)
- $4014: OAM DMA (write-only; reads return 0)
- $4020-$5FFF: Expansion area (read 0, ignore writes)
- $6000-$7FFF: Cartridge PRG RAM
- $8000-$FFFF: Cartridge PRG ROM (NROM; one bank mirrors into $C000)

Everything else ($4000-$4013, $4015-$401F) is an invalid access: the first
touch of each address is logged at warn, later ones at trace, and the access
is counted. Reads return 0 and writes are dropped.

Notes:
- Bus advances time via tick(), stepping the PPU 3x per CPU cycle.
- OAM DMA copies the page immediately and leaves a stall of 513 CPU cycles
  (514 when started on an odd cycle) for the system driver to collect with
  `take_dma_stall`.
*/

use crate::cartridge::Cartridge;
use crate::cpu::nmi::NmiLine;
use crate::cpu_bus::CpuBus;
use crate::ppu::Ppu;

const OAM_DMA: u16 = 0x4014;
const OAM_DMA_CYCLES: u32 = 513;

pub struct Bus {
    // 2KB CPU RAM
    ram: [u8; 0x0800],

    ppu: Ppu,
    cartridge: Option<Cartridge>,

    // Timing
    cpu_cycle: u64,
    dma_stall: u32,

    // Invalid-access bookkeeping: one bit per $4000-$401F address
    invalid_seen: u32,
    invalid_count: u64,
}

impl Bus {
    /// Build a bus whose PPU drives `nmi` (the CPU's line).
    pub fn new(nmi: NmiLine) -> Self {
        Self {
            ram: [0; 0x0800],
            ppu: Ppu::new(nmi),
            cartridge: None,
            cpu_cycle: 0,
            dma_stall: 0,
            invalid_seen: 0,
            invalid_count: 0,
        }
    }

    /// Clear RAM, reset the PPU and drop pending DMA. The cartridge stays.
    pub fn reset(&mut self) {
        self.ram.fill(0);
        self.ppu.reset();
        self.cpu_cycle = 0;
        self.dma_stall = 0;
    }

    /// Insert a cartridge; its CHR data is handed to the PPU.
    pub fn attach_cartridge(&mut self, cart: Cartridge) {
        self.ppu.load_chr(cart.chr());
        self.cartridge = Some(cart);
    }

    fn invalid_access(&mut self, addr: u16, kind: &str) {
        self.invalid_count += 1;
        let bit = 1u32 << (addr & 0x1F);
        if self.invalid_seen & bit == 0 {
            self.invalid_seen |= bit;
            log::warn!("invalid {kind} at {addr:#06X}");
        } else {
            log::trace!("invalid {kind} at {addr:#06X}");
        }
    }

    fn start_oam_dma(&mut self, page: u8) {
        let base = u16::from(page) << 8;
        let mut data = [0u8; 256];
        for (i, slot) in data.iter_mut().enumerate() {
            *slot = self.read(base | i as u16);
        }
        self.ppu.oam_dma(&data);
        self.dma_stall = OAM_DMA_CYCLES + (self.cpu_cycle & 1) as u32;
        log::trace!("OAM DMA from {base:#06X}, stall {}", self.dma_stall);
    }

    /// Take the CPU stall left by the last OAM DMA (0 if none).
    pub fn take_dma_stall(&mut self) -> u32 {
        std::mem::take(&mut self.dma_stall)
    }

    /// Advance bus time by `cycles` CPU cycles, stepping the PPU 3x per cycle.
    pub fn tick(&mut self, cycles: u32) {
        for _ in 0..cycles {
            self.cpu_cycle = self.cpu_cycle.wrapping_add(1);
            for _ in 0..3 {
                self.ppu.tick();
            }
        }
    }

    /// Total CPU cycles the bus has been ticked.
    pub fn total_ticks(&self) -> u64 {
        self.cpu_cycle
    }

    /// Number of invalid accesses seen so far.
    pub fn invalid_accesses(&self) -> u64 {
        self.invalid_count
    }

    pub fn ppu(&self) -> &Ppu {
        &self.ppu
    }

    pub fn ppu_mut(&mut self) -> &mut Ppu {
        &mut self.ppu
    }

    pub fn cartridge(&self) -> Option<&Cartridge> {
        self.cartridge.as_ref()
    }
}

impl CpuBus for Bus {
    fn read(&mut self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.ram[(addr & 0x07FF) as usize],
            0x2000..=0x3FFF => self.ppu.read_reg(addr),
            OAM_DMA => 0,
            0x4000..=0x401F => {
                self.invalid_access(addr, "read");
                0
            }
            0x4020..=0x5FFF => 0,
            0x6000..=0x7FFF => self
                .cartridge
                .as_ref()
                .map_or(0, |c| c.cpu_read_prg_ram(addr)),
            0x8000..=0xFFFF => self
                .cartridge
                .as_ref()
                .map_or(0xFF, |c| c.cpu_read_prg_rom(addr)),
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => self.ram[(addr & 0x07FF) as usize] = value,
            0x2000..=0x3FFF => self.ppu.write_reg(addr, value),
            OAM_DMA => self.start_oam_dma(value),
            0x4000..=0x401F => self.invalid_access(addr, "write"),
            0x4020..=0x5FFF => {}
            0x6000..=0x7FFF => {
                if let Some(cart) = self.cartridge.as_mut() {
                    cart.cpu_write_prg_ram(addr, value);
                }
            }
            0x8000..=0xFFFF => {
                log::trace!("ignored write {value:#04X} to PRG ROM {addr:#06X}");
            }
        }
    }

    fn peek(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.ram[(addr & 0x07FF) as usize],
            0x2000..=0x3FFF => self.ppu.peek_register(addr),
            0x4000..=0x5FFF => 0,
            0x6000..=0x7FFF => self
                .cartridge
                .as_ref()
                .map_or(0, |c| c.cpu_read_prg_ram(addr)),
            0x8000..=0xFFFF => self
                .cartridge
                .as_ref()
                .map_or(0xFF, |c| c.cpu_read_prg_rom(addr)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{PRG_FILL, build_ines};

    fn bus() -> Bus {
        Bus::new(NmiLine::new())
    }

    fn bus_with_cart(rom: &[u8]) -> Bus {
        let mut bus = bus();
        bus.attach_cartridge(Cartridge::from_ines_bytes(rom).expect("parse"));
        bus
    }

    #[test]
    fn ram_mirroring() {
        let mut bus = bus();
        bus.write(0x0001, 0xAA);
        assert_eq!(bus.read(0x0001), 0xAA);
        assert_eq!(bus.read(0x0801), 0xAA);
        assert_eq!(bus.read(0x1001), 0xAA);
        assert_eq!(bus.read(0x1801), 0xAA);
        bus.write(0x1FFF, 0x5C);
        assert_eq!(bus.read(0x07FF), 0x5C);
    }

    #[test]
    fn ppu_reg_mirror() {
        let mut bus = bus();
        // OAMADDR via mirror $200B, then read it back through $2003.
        bus.write(0x200B, 0x40);
        assert_eq!(bus.peek(0x2003), 0x40);
        assert_eq!(bus.peek(0x3FFB), 0x40);
    }

    #[test]
    fn word_reads_are_little_endian() {
        let mut bus = bus();
        bus.write(0x0010, 0x34);
        bus.write(0x0011, 0x12);
        assert_eq!(bus.read_word(0x0010), 0x1234);
        assert_eq!(bus.peek_word(0x0810), 0x1234);
    }

    #[test]
    fn one_bank_image_mirrors_into_c000() {
        let mut rom = build_ines(1, 1, 0, 0, 1, None);
        rom[16] = 0x42;
        let mut bus = bus_with_cart(&rom);
        assert_eq!(bus.read(0x8000), 0x42);
        assert_eq!(bus.read(0xC000), 0x42);
        assert_eq!(bus.read(0x8001), PRG_FILL);
    }

    #[test]
    fn prg_rom_writes_are_ignored() {
        let rom = build_ines(1, 1, 0, 0, 1, None);
        let mut bus = bus_with_cart(&rom);
        bus.write(0x8000, 0x00);
        assert_eq!(bus.read(0x8000), PRG_FILL);
    }

    #[test]
    fn prg_ram_basic() {
        let rom = build_ines(1, 1, 0, 0, 1, None);
        let mut bus = bus_with_cart(&rom);
        bus.write(0x6000, 0x42);
        bus.write(0x7FFF, 0x24);
        assert_eq!(bus.read(0x6000), 0x42);
        assert_eq!(bus.read(0x7FFF), 0x24);
    }

    #[test]
    fn expansion_area_reads_zero() {
        let mut bus = bus();
        bus.write(0x4020, 0x99);
        assert_eq!(bus.read(0x4020), 0);
        assert_eq!(bus.read(0x5FFF), 0);
        assert_eq!(bus.invalid_accesses(), 0);
    }

    #[test]
    fn invalid_addresses_read_zero_and_are_counted() {
        let mut bus = bus();
        bus.write(0x4000, 0xFF);
        assert_eq!(bus.read(0x4000), 0);
        assert_eq!(bus.read(0x4015), 0);
        assert_eq!(bus.read(0x401F), 0);
        assert_eq!(bus.invalid_accesses(), 4);
        assert_eq!(bus.invalid_seen.count_ones(), 3);
    }

    #[test]
    fn peek_does_not_count_or_clear() {
        let mut bus = bus();
        assert_eq!(bus.peek(0x4000), 0);
        assert_eq!(bus.invalid_accesses(), 0);
        bus.tick(241 * 341 / 3 + 200);
        assert!(bus.ppu().vblank());
        let _ = bus.peek(0x2002);
        assert!(bus.ppu().vblank());
        let _ = bus.read(0x2002);
        assert!(!bus.ppu().vblank());
    }

    #[test]
    fn no_cartridge_reads_open_values() {
        let mut bus = bus();
        assert_eq!(bus.read(0x8000), 0xFF);
        assert_eq!(bus.read(0x6000), 0);
    }

    #[test]
    fn oam_dma_copies_page_and_stalls() {
        let mut bus = bus();
        for i in 0..256u16 {
            bus.write(0x0200 + i, i as u8);
        }
        bus.write(0x2003, 0xFE);
        bus.write(0x4014, 0x02);

        let ppu = bus.ppu();
        assert_eq!(ppu.peek_oam(0xFE), 0x00);
        assert_eq!(ppu.peek_oam(0xFF), 0x01);
        assert_eq!(ppu.peek_oam(0x00), 0x02);
        assert_eq!(bus.take_dma_stall(), 513);
        assert_eq!(bus.take_dma_stall(), 0);

        bus.tick(1);
        bus.write(0x4014, 0x02);
        assert_eq!(bus.take_dma_stall(), 514);
    }

    #[test]
    fn tick_runs_three_ppu_dots_per_cycle() {
        let mut bus = bus();
        bus.tick(10);
        assert_eq!(bus.total_ticks(), 10);
        assert_eq!(bus.ppu().dot(), 30);
    }

    #[test]
    fn chr_is_loaded_into_ppu() {
        let rom = build_ines(1, 1, 0, 0, 1, None);
        let bus = bus_with_cart(&rom);
        assert_eq!(bus.ppu().peek_vram(0x0000), 0xCC);
        assert_eq!(bus.ppu().peek_vram(0x1FFF), 0xCC);
    }
}
