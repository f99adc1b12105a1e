/*!
cpu::mod - Public façade for the 6502 CPU core.

```text
    state.rs        - Register file and status flags.
    regs.rs         - `CpuRegs` accessor trait the handlers are generic over.
    addressing.rs   - Addressing modes and operand resolution.
    table.rs        - The 256-entry opcode descriptor table.
    cycles.rs       - Cycle constants and page-cross bookkeeping.
    execute.rs      - Instruction semantic helpers (ALU, stack, RMW, branch).
    nmi.rs          - Shared NMI line.
    dispatch/       - One CPU step: NMI entry or decode + family handlers.
    core/           - The `Cpu` facade.
```

The public surface is the `Cpu` facade. Downstream code should not rely on
the internal module layout.

Usage:
```rust
use nescore::cpu::Cpu;
use nescore::cpu_bus::{CpuBus, FlatMemory};

let mut mem = FlatMemory::new();
mem.load(0x0600, &[0xA9, 0x01]); // LDA #$01
mem.set_word(0xFFFC, 0x0600);

let mut cpu = Cpu::new();
cpu.reset(&mut mem);
assert_eq!(cpu.step(&mut mem), 2);
assert_eq!(cpu.a(), 0x01);
```
*/

pub mod addressing;
pub mod core;
pub mod cycles;
pub mod dispatch;
pub mod execute;
pub mod nmi;
pub mod regs;
pub mod state;
pub mod table;

pub use crate::cpu::core::Cpu;
pub use crate::cpu::nmi::NmiLine;
pub use crate::cpu::regs::CpuRegs;
pub use crate::cpu::state::{CpuState, Status};
