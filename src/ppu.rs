/*!
PPU register shadow with frame timing and vblank NMI signaling.

Scope:
- The CPU-visible register interface ($2000..$2007):
  * $2000 PPUCTRL: control flags (VRAM increment in bit 2, NMI enable in bit 7)
  * $2001 PPUMASK: stored only
  * $2002 PPUSTATUS: vblank in bit 7; a read clears vblank and the write toggle
  * $2003 OAMADDR: OAM address pointer for $2004
  * $2004 OAMDATA: read/write OAM at OAMADDR (writes increment OAMADDR)
  * $2005 PPUSCROLL: two writes form x/y scroll
  * $2006 PPUADDR: two writes (high, low) set the VRAM address
  * $2007 PPUDATA: VRAM access with buffered reads below $3F00; the address
    advances by 1 or 32 per PPUCTRL bit 2
- A flat 16 KiB VRAM (pattern tables loaded from the cartridge at $0000) and
  256 bytes of OAM.
- Dot / scanline timing: 341 dots x 262 lines, the pre-render line numbered -1.
  At scanline 241 dot 1 vblank begins and, with PPUCTRL bit 7 set, the NMI
  line is raised. The pre-render line clears vblank. Wrapping back to the
  pre-render line completes a frame.

Rendering, nametable mirroring and sprite evaluation are not modeled.
*/

use crate::cpu::nmi::NmiLine;

const DOTS_PER_LINE: u16 = 341;
const PRE_RENDER_LINE: i16 = -1;
const VBLANK_LINE: i16 = 241;
const LAST_LINE: i16 = 260;

const CTRL_INCREMENT_32: u8 = 0x04;
const CTRL_NMI_ENABLE: u8 = 0x80;
const STATUS_VBLANK: u8 = 0x80;

#[derive(Clone, Debug)]
pub struct Ppu {
    // Registers (CPU visible)
    ctrl: u8,     // $2000 PPUCTRL
    mask: u8,     // $2001 PPUMASK
    status: u8,   // $2002 PPUSTATUS (bit7=vblank)
    oam_addr: u8, // $2003 OAMADDR

    // Internal latches and toggles
    write_toggle: bool, // toggles on $2005/$2006 writes; reset on $2002 read
    scroll_x: u8,
    scroll_y: u8,

    // VRAM addressing
    vram_addr: u16,
    vram_buffer: u8,
    vram: Box<[u8; 0x4000]>,

    oam: [u8; 256],

    // Timing
    dot: u16,      // 0..=340
    scanline: i16, // -1 (pre-render), 0..=260
    frame: u64,
    frame_complete: bool,

    nmi: NmiLine,
}

impl Ppu {
    /// Create a PPU that raises `nmi` at the start of vblank.
    pub fn new(nmi: NmiLine) -> Self {
        Self {
            ctrl: 0,
            mask: 0,
            status: 0,
            oam_addr: 0,
            write_toggle: false,
            scroll_x: 0,
            scroll_y: 0,
            vram_addr: 0,
            vram_buffer: 0,
            vram: Box::new([0; 0x4000]),
            oam: [0; 256],
            dot: 0,
            scanline: PRE_RENDER_LINE,
            frame: 0,
            frame_complete: false,
            nmi,
        }
    }

    /// Return registers and timing to power-on values. VRAM and OAM are kept.
    pub fn reset(&mut self) {
        self.ctrl = 0;
        self.mask = 0;
        self.status = 0;
        self.oam_addr = 0;
        self.write_toggle = false;
        self.scroll_x = 0;
        self.scroll_y = 0;
        self.vram_addr = 0;
        self.vram_buffer = 0;
        self.dot = 0;
        self.scanline = PRE_RENDER_LINE;
        self.frame = 0;
        self.frame_complete = false;
    }

    /// Copy pattern data into VRAM starting at $0000.
    pub fn load_chr(&mut self, chr: &[u8]) {
        let n = chr.len().min(0x2000);
        self.vram[..n].copy_from_slice(&chr[..n]);
    }

    /// Advance one dot. The system driver calls this 3x per CPU cycle.
    pub fn tick(&mut self) {
        self.dot += 1;

        if self.dot == 1 {
            if self.scanline == VBLANK_LINE {
                self.status |= STATUS_VBLANK;
                if self.nmi_enabled() {
                    log::trace!("ppu: vblank NMI (frame {})", self.frame);
                    self.nmi.raise();
                }
            } else if self.scanline == PRE_RENDER_LINE {
                self.status = 0;
            }
        }

        if self.dot >= DOTS_PER_LINE {
            self.dot = 0;
            self.scanline += 1;
            if self.scanline > LAST_LINE {
                self.scanline = PRE_RENDER_LINE;
                self.frame += 1;
                self.frame_complete = true;
            }
        }
    }

    /// CPU write to a PPU register in $2000..$3FFF (mirrored every 8 bytes).
    pub fn write_reg(&mut self, addr: u16, value: u8) {
        match addr & 0x0007 {
            0 => {
                // Enabling NMI during vblank fires one immediately.
                let was_enabled = self.nmi_enabled();
                self.ctrl = value;
                if !was_enabled && self.nmi_enabled() && self.vblank() {
                    self.nmi.raise();
                }
            }
            1 => self.mask = value,
            2 => {} // PPUSTATUS is read-only
            3 => self.oam_addr = value,
            4 => {
                self.oam[self.oam_addr as usize] = value;
                self.oam_addr = self.oam_addr.wrapping_add(1);
            }
            5 => {
                if !self.write_toggle {
                    self.scroll_x = value;
                } else {
                    self.scroll_y = value;
                }
                self.write_toggle = !self.write_toggle;
            }
            6 => {
                if !self.write_toggle {
                    self.vram_addr = (self.vram_addr & 0x00FF) | (u16::from(value & 0x3F) << 8);
                } else {
                    self.vram_addr = (self.vram_addr & 0x3F00) | u16::from(value);
                }
                self.write_toggle = !self.write_toggle;
            }
            _ => {
                self.vram[self.vram_addr as usize] = value;
                self.advance_vram_addr();
            }
        }
    }

    /// CPU read from a PPU register. PPUSTATUS and PPUDATA reads have side effects.
    pub fn read_reg(&mut self, addr: u16) -> u8 {
        match addr & 0x0007 {
            2 => {
                let result = self.status;
                self.status &= !STATUS_VBLANK;
                self.write_toggle = false;
                result
            }
            4 => self.oam[self.oam_addr as usize],
            7 => {
                let addr = self.vram_addr;
                let value = self.vram[addr as usize];
                let ret = if addr < 0x3F00 {
                    std::mem::replace(&mut self.vram_buffer, value)
                } else {
                    value
                };
                self.advance_vram_addr();
                ret
            }
            _ => self.peek_register(addr),
        }
    }

    /// Register contents as the CPU would see them, without side effects.
    /// Write-only registers show their latched state.
    pub fn peek_register(&self, addr: u16) -> u8 {
        match addr & 0x0007 {
            0 => self.ctrl,
            1 => self.mask,
            2 => self.status,
            3 => self.oam_addr,
            4 => self.oam[self.oam_addr as usize],
            5 => self.scroll_x,
            6 => (self.vram_addr >> 8) as u8,
            _ => {
                if self.vram_addr < 0x3F00 {
                    self.vram_buffer
                } else {
                    self.vram[self.vram_addr as usize]
                }
            }
        }
    }

    /// OAM DMA: copy a 256-byte page into OAM starting at OAMADDR, wrapping.
    pub fn oam_dma(&mut self, page: &[u8; 256]) {
        for &byte in page {
            self.oam[self.oam_addr as usize] = byte;
            self.oam_addr = self.oam_addr.wrapping_add(1);
        }
    }

    fn advance_vram_addr(&mut self) {
        let step = if self.ctrl & CTRL_INCREMENT_32 != 0 { 32 } else { 1 };
        self.vram_addr = self.vram_addr.wrapping_add(step) & 0x3FFF;
    }

    pub fn vblank(&self) -> bool {
        self.status & STATUS_VBLANK != 0
    }

    /// Whether NMI on vblank is enabled (PPUCTRL bit 7).
    pub fn nmi_enabled(&self) -> bool {
        self.ctrl & CTRL_NMI_ENABLE != 0
    }

    pub fn scroll(&self) -> (u8, u8) {
        (self.scroll_x, self.scroll_y)
    }

    pub fn peek_vram(&self, addr: u16) -> u8 {
        self.vram[(addr & 0x3FFF) as usize]
    }

    pub fn peek_oam(&self, idx: u8) -> u8 {
        self.oam[idx as usize]
    }

    pub fn scanline(&self) -> i16 {
        self.scanline
    }

    pub fn dot(&self) -> u16 {
        self.dot
    }

    /// Frames completed since reset.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn take_frame_complete(&mut self) -> bool {
        std::mem::take(&mut self.frame_complete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOTS_PER_FRAME: u32 = 341 * 262;

    fn ppu() -> (Ppu, NmiLine) {
        let nmi = NmiLine::new();
        (Ppu::new(nmi.clone()), nmi)
    }

    /// Ticks from power-on until scanline 241 dot 1 has been processed.
    fn ticks_to_vblank() -> u32 {
        (VBLANK_LINE - PRE_RENDER_LINE) as u32 * 341 + 1
    }

    #[test]
    fn status_read_clears_vblank_and_write_toggle() {
        let (mut ppu, _) = ppu();
        ppu.status |= STATUS_VBLANK;
        ppu.write_toggle = true;

        let s = ppu.read_reg(0x2002);
        assert_ne!(s & 0x80, 0);
        assert!(!ppu.vblank());
        assert!(!ppu.write_toggle);
    }

    #[test]
    fn ppudata_buffered_read_and_increment() {
        let (mut ppu, _) = ppu();
        ppu.load_chr(&[0x11, 0x22]);

        ppu.write_reg(0x2006, 0x00);
        ppu.write_reg(0x2006, 0x00);

        assert_eq!(ppu.read_reg(0x2007), 0x00);
        assert_eq!(ppu.read_reg(0x2007), 0x11);
        assert_eq!(ppu.read_reg(0x2007), 0x22);
    }

    #[test]
    fn ppudata_write_increments_by_32() {
        let (mut ppu, _) = ppu();
        ppu.write_reg(0x2000, CTRL_INCREMENT_32);
        ppu.write_reg(0x2006, 0x20);
        ppu.write_reg(0x2006, 0x00);
        ppu.write_reg(0x2007, 0xAB);
        ppu.write_reg(0x2007, 0xCD);
        assert_eq!(ppu.peek_vram(0x2000), 0xAB);
        assert_eq!(ppu.peek_vram(0x2020), 0xCD);
    }

    #[test]
    fn palette_reads_are_not_buffered() {
        let (mut ppu, _) = ppu();
        ppu.write_reg(0x2006, 0x3F);
        ppu.write_reg(0x2006, 0x00);
        ppu.write_reg(0x2007, 0x0F);
        ppu.write_reg(0x2006, 0x3F);
        ppu.write_reg(0x2006, 0x00);
        assert_eq!(ppu.read_reg(0x2007), 0x0F);
    }

    #[test]
    fn oam_dma_wraps_from_oamaddr() {
        let (mut ppu, _) = ppu();
        ppu.write_reg(0x2003, 0xFE);
        let mut page = [0u8; 256];
        for (i, b) in page.iter_mut().enumerate() {
            *b = i as u8;
        }
        ppu.oam_dma(&page);

        assert_eq!(ppu.peek_oam(0xFE), 0x00);
        assert_eq!(ppu.peek_oam(0xFF), 0x01);
        assert_eq!(ppu.peek_oam(0x00), 0x02);
        assert_eq!(ppu.peek_register(0x2003), 0xFE);
    }

    #[test]
    fn peek_register_has_no_side_effects() {
        let (mut ppu, _) = ppu();
        ppu.status |= STATUS_VBLANK;
        ppu.write_toggle = true;
        assert_eq!(ppu.peek_register(0x2002) & 0x80, 0x80);
        assert_eq!(ppu.peek_register(0x3FFA) & 0x80, 0x80);
        assert!(ppu.vblank());
        assert!(ppu.write_toggle);
    }

    #[test]
    fn vblank_raises_nmi_when_enabled() {
        let (mut ppu, nmi) = ppu();
        ppu.write_reg(0x2000, CTRL_NMI_ENABLE);
        for _ in 0..ticks_to_vblank() - 1 {
            ppu.tick();
        }
        assert!(!ppu.vblank());
        assert!(!nmi.is_raised());
        ppu.tick();
        assert!(ppu.vblank());
        assert!(nmi.is_raised());
    }

    #[test]
    fn vblank_without_nmi_enable_stays_quiet() {
        let (mut ppu, nmi) = ppu();
        for _ in 0..ticks_to_vblank() {
            ppu.tick();
        }
        assert!(ppu.vblank());
        assert!(!nmi.is_raised());
    }

    #[test]
    fn enabling_nmi_inside_vblank_fires_immediately() {
        let (mut ppu, nmi) = ppu();
        for _ in 0..ticks_to_vblank() {
            ppu.tick();
        }
        ppu.write_reg(0x2000, CTRL_NMI_ENABLE);
        assert!(nmi.is_raised());
    }

    #[test]
    fn frame_completes_and_pre_render_clears_vblank() {
        let (mut ppu, _) = ppu();
        for _ in 0..DOTS_PER_FRAME {
            ppu.tick();
        }
        assert!(ppu.take_frame_complete());
        assert!(!ppu.take_frame_complete());
        assert_eq!(ppu.frame(), 1);
        assert_eq!(ppu.scanline(), PRE_RENDER_LINE);
        assert!(ppu.vblank());
        ppu.tick();
        assert!(!ppu.vblank());
    }
}
