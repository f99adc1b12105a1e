/*!
core::Cpu - Canonical 6502 CPU façade wrapping `CpuState`.

Design
======
- `Cpu` owns the register file (`CpuState`), the running cycle counter, the
  NMI line and the per-step page-cross bookkeeping.
- It is generic over any `CpuBus`; the CPU never holds a reference to the
  bus. The bus (and through it the PPU) only sees a clone of the NMI line,
  handed out by `nmi_line()` when the system is wired together.
- `step` either services a pending NMI or executes one instruction and
  returns the cycles spent. The counter is kept as a `u64` so a long run can
  never wrap it.

Reset
=====
`reset` restores the power-on register values (SP = 0xFD, P = 0x24), loads
PC from 0xFFFC, lowers the NMI line and sets the cycle counter to 7.
*/

use crate::cpu::cycles::{PendingCycles, RESET_CYCLES};
use crate::cpu::dispatch::{self, RESET_VECTOR};
use crate::cpu::nmi::NmiLine;
use crate::cpu::regs::CpuRegs;
use crate::cpu::state::{CpuState, Status};
use crate::cpu_bus::CpuBus;

#[derive(Debug, Clone, Default)]
pub struct Cpu {
    state: CpuState,
    cycles: u64,
    nmi: NmiLine,
    pending: PendingCycles,
}

impl Cpu {
    /// Construct a new CPU with power‑up defaults. PC stays 0 until `reset`.
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle on the NMI line for whoever drives it (the PPU).
    pub fn nmi_line(&self) -> NmiLine {
        self.nmi.clone()
    }

    /// Raise the NMI line directly.
    pub fn request_nmi(&self) {
        self.nmi.raise();
    }

    /// True while an NMI is waiting for the next `step`.
    pub fn nmi_pending(&self) -> bool {
        self.nmi.is_raised()
    }

    /// Return immutable reference to internal state (for inspection / testing).
    pub fn state(&self) -> &CpuState {
        &self.state
    }

    /// Return mutable reference to internal state.
    pub fn state_mut(&mut self) -> &mut CpuState {
        &mut self.state
    }

    /// Total cycles since reset, including the 7 reset cycles.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Reset internal state and load PC from the reset vector.
    pub fn reset<B: CpuBus>(&mut self, bus: &mut B) {
        self.state = CpuState::default();
        self.state.pc = bus.read_word(RESET_VECTOR);
        self.cycles = RESET_CYCLES;
        self.nmi.clear();
        self.pending = PendingCycles::default();
        log::debug!("cpu reset: PC={:#06X}", self.state.pc);
    }

    /// Execute one step (NMI entry or one instruction). Returns cycles spent.
    pub fn step<B: CpuBus>(&mut self, bus: &mut B) -> u32 {
        let spent = dispatch::step(&mut self.state, bus, &self.nmi, &mut self.pending);
        self.cycles += u64::from(spent);
        spent
    }

    /// Execute up to `max_steps` steps; returns the cycles spent.
    pub fn run<B: CpuBus>(&mut self, bus: &mut B, max_steps: usize) -> u64 {
        (0..max_steps).map(|_| u64::from(self.step(bus))).sum()
    }

    /// Read memory through the bus without side effects.
    pub fn peek<B: CpuBus>(&self, bus: &B, addr: u16) -> u8 {
        bus.peek(addr)
    }

    /// Write memory through the bus (same path as a CPU store).
    pub fn poke<B: CpuBus>(&self, bus: &mut B, addr: u16, value: u8) {
        bus.write(addr, value);
    }

    // ---------------------------------------------------------------------
    // Register accessors (read)
    // ---------------------------------------------------------------------
    pub fn a(&self) -> u8 {
        self.state.a
    }
    pub fn x(&self) -> u8 {
        self.state.x
    }
    pub fn y(&self) -> u8 {
        self.state.y
    }
    pub fn sp(&self) -> u8 {
        self.state.sp
    }
    pub fn pc(&self) -> u16 {
        self.state.pc
    }
    pub fn status(&self) -> Status {
        self.state.status
    }

    // ---------------------------------------------------------------------
    // Register mutators (write)
    // ---------------------------------------------------------------------
    pub fn set_a(&mut self, v: u8) {
        self.state.a = v;
    }
    pub fn set_x(&mut self, v: u8) {
        self.state.x = v;
    }
    pub fn set_y(&mut self, v: u8) {
        self.state.y = v;
    }
    pub fn set_sp(&mut self, v: u8) {
        self.state.sp = v;
    }
    pub fn set_pc(&mut self, v: u16) {
        self.state.pc = v;
    }
    pub fn set_status(&mut self, v: Status) {
        self.state.status = v;
    }

    /// Test a single status flag.
    pub fn flag(&self, flag: Status) -> bool {
        self.state.test_flag(flag)
    }
}
