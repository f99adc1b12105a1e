/*!
Cartridge with iNES loader for NROM (mapper 0) images.

Features:
- Parse the iNES header from bytes or a file path
- Skip an optional 512-byte trainer
- Extract PRG ROM, CHR (ROM, or 8 KiB of CHR RAM when the header says 0 units)
- Determine mirroring, battery-backed RAM and mapper id

Notes:
- NES 2.0 headers are detected and parsed with the iNES 1 field layout.
- Only mapper 0 is accepted. PRG must be one or two 16 KiB banks.
- PRG RAM allocation policy:
  - If header byte 8 (PRG-RAM size in 8 KiB units) is 0, allocate 8 KiB by convention.
  - Otherwise allocate size_in_units * 8 KiB; the $6000-$7FFF window wraps over it.
- NROM mapping rules:
  - 16 KiB PRG (NROM-128): $8000-$BFFF maps to the single bank; $C000-$FFFF mirrors it.
  - 32 KiB PRG (NROM-256): $8000-$FFFF maps directly to 32 KiB.
*/

use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;

const HEADER_LEN: usize = 16;
const TRAINER_LEN: usize = 512;
const PRG_BANK_LEN: usize = 16 * 1024;
const CHR_BANK_LEN: usize = 8 * 1024;
const PRG_RAM_UNIT: usize = 8 * 1024;

/// Reasons an iNES image is refused. Raised before any CPU state exists.
#[derive(Debug, Error)]
pub enum CartridgeError {
    #[error("failed to read iNES file: {0}")]
    Io(#[from] io::Error),
    #[error("image is {0} bytes, too small for an iNES header")]
    TooSmall(usize),
    #[error("invalid iNES header magic (expected NES<1A>)")]
    InvalidMagic,
    #[error("image declares no PRG ROM")]
    NoProgramRom,
    #[error("unsupported mapper id {0}")]
    UnsupportedMapper(u16),
    #[error("unsupported PRG ROM size: {0} x 16 KiB banks")]
    UnsupportedPrgSize(usize),
    #[error("image truncated in {section}: need {needed} bytes, have {available}")]
    Truncated {
        section: &'static str,
        needed: usize,
        available: usize,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mirroring {
    Horizontal,
    Vertical,
    FourScreen,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InesVersion {
    Ines1,
    Ines2,
}

pub struct Cartridge {
    prg_rom: Vec<u8>,
    chr: Vec<u8>,
    prg_ram: Vec<u8>,

    // Metadata
    mapper_id: u16,
    mirroring: Mirroring,
    battery: bool,
    has_trainer: bool,
    chr_is_ram: bool,
    pub ines_version: InesVersion,
}

// Debug implemented manually to keep ROM bytes out of the output
impl std::fmt::Debug for Cartridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cartridge")
            .field("mapper_id", &self.mapper_id)
            .field("mirroring", &self.mirroring)
            .field("battery", &self.battery)
            .field("has_trainer", &self.has_trainer)
            .field("ines_version", &self.ines_version)
            .field("prg_rom_len", &self.prg_rom.len())
            .field("chr_len", &self.chr.len())
            .field("prg_ram_len", &self.prg_ram.len())
            .field("chr_is_ram", &self.chr_is_ram)
            .finish()
    }
}

/// Borrow `len` bytes at `offset`, or report which section ran short.
fn section<'a>(
    data: &'a [u8],
    offset: usize,
    len: usize,
    name: &'static str,
) -> Result<&'a [u8], CartridgeError> {
    data.get(offset..offset + len)
        .ok_or(CartridgeError::Truncated {
            section: name,
            needed: offset + len,
            available: data.len(),
        })
}

impl Cartridge {
    // -------------- Construction --------------

    /// Load a cartridge from raw iNES bytes.
    pub fn from_ines_bytes(data: &[u8]) -> Result<Self, CartridgeError> {
        if data.len() < HEADER_LEN {
            return Err(CartridgeError::TooSmall(data.len()));
        }
        if &data[0..4] != b"NES\x1A" {
            return Err(CartridgeError::InvalidMagic);
        }

        let prg_banks = data[4] as usize;
        let chr_banks = data[5] as usize;
        let flags6 = data[6];
        let flags7 = data[7];
        let prg_ram_units = data[8] as usize;

        // NES 2.0 if (flags7 & 0x0C) == 0x08
        let ines_version = if (flags7 & 0x0C) == 0x08 {
            InesVersion::Ines2
        } else {
            InesVersion::Ines1
        };

        // Mapper ID: high nibble from flags7 and low nibble from flags6
        let mapper_id = u16::from(flags7 & 0xF0) | u16::from(flags6 >> 4);
        if mapper_id != 0 {
            return Err(CartridgeError::UnsupportedMapper(mapper_id));
        }
        match prg_banks {
            0 => return Err(CartridgeError::NoProgramRom),
            1 | 2 => {}
            n => return Err(CartridgeError::UnsupportedPrgSize(n)),
        }

        let mirroring = if flags6 & 0b0000_1000 != 0 {
            Mirroring::FourScreen
        } else if flags6 & 0b0000_0001 != 0 {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        };
        let battery = flags6 & 0b0000_0010 != 0;
        let has_trainer = flags6 & 0b0000_0100 != 0;

        let mut offset = HEADER_LEN;
        if has_trainer {
            section(data, offset, TRAINER_LEN, "trainer")?;
            offset += TRAINER_LEN;
        }

        let prg_len = prg_banks * PRG_BANK_LEN;
        let prg_rom = section(data, offset, prg_len, "PRG ROM")?.to_vec();
        offset += prg_len;

        let chr_is_ram = chr_banks == 0;
        let chr = if chr_is_ram {
            vec![0; CHR_BANK_LEN]
        } else {
            section(data, offset, chr_banks * CHR_BANK_LEN, "CHR ROM")?.to_vec()
        };

        let prg_ram_len = prg_ram_units.max(1) * PRG_RAM_UNIT;

        log::debug!(
            "cartridge: {:?} mapper {} PRG {} KiB CHR {} KiB{} mirroring {:?}{}",
            ines_version,
            mapper_id,
            prg_rom.len() / 1024,
            chr.len() / 1024,
            if chr_is_ram { " (RAM)" } else { "" },
            mirroring,
            if has_trainer { " +trainer" } else { "" },
        );

        Ok(Self {
            prg_rom,
            chr,
            prg_ram: vec![0; prg_ram_len],
            mapper_id,
            mirroring,
            battery,
            has_trainer,
            chr_is_ram,
            ines_version,
        })
    }

    /// Load a cartridge from an iNES file (.nes).
    pub fn from_ines_file<P: AsRef<Path>>(path: P) -> Result<Self, CartridgeError> {
        let bytes = fs::read(path)?;
        Self::from_ines_bytes(&bytes)
    }

    // -------------- CPU PRG mapping --------------

    /// Read a byte from PRG ROM space ($8000..=$FFFF). One bank mirrors into both halves.
    pub fn cpu_read_prg_rom(&self, addr: u16) -> u8 {
        let idx = (addr as usize - 0x8000) % self.prg_rom.len();
        self.prg_rom[idx]
    }

    /// Read a byte from PRG RAM space ($6000..=$7FFF).
    pub fn cpu_read_prg_ram(&self, addr: u16) -> u8 {
        self.prg_ram[self.prg_ram_index(addr)]
    }

    /// Write a byte to PRG RAM space ($6000..=$7FFF).
    pub fn cpu_write_prg_ram(&mut self, addr: u16, value: u8) {
        let idx = self.prg_ram_index(addr);
        self.prg_ram[idx] = value;
    }

    fn prg_ram_index(&self, addr: u16) -> usize {
        (addr as usize).saturating_sub(0x6000) % self.prg_ram.len()
    }

    // -------------- Accessors --------------

    /// Pattern table data (CHR ROM, or zeroed CHR RAM).
    pub fn chr(&self) -> &[u8] {
        &self.chr
    }

    pub fn mapper_id(&self) -> u16 {
        self.mapper_id
    }

    pub fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    pub fn battery_backed(&self) -> bool {
        self.battery
    }

    pub fn has_trainer(&self) -> bool {
        self.has_trainer
    }

    pub fn chr_is_ram(&self) -> bool {
        self.chr_is_ram
    }

    pub fn prg_rom_len(&self) -> usize {
        self.prg_rom.len()
    }

    pub fn chr_len(&self) -> usize {
        self.chr.len()
    }

    pub fn prg_ram_len(&self) -> usize {
        self.prg_ram.len()
    }
}
