/*!
cycles.rs - Per-step cycle bookkeeping.

Base costs live in the opcode table (`table::OPCODES`). This module owns the
two transient flags that decide the conditional +1 for indexed reads:

- `page_crossed`   : set by the addressing resolver (Absolute,X / Absolute,Y /
                     (Indirect),Y) when the index addition changes the high byte.
- `extra_eligible` : set by handlers whose timing depends on the crossing
                     (loads, ALU reads, compares). Stores and RMW instructions
                     never set it; their table cost already includes the fixup.

The +1 applies only when both are set. `settle` folds them into the total and
clears both, every step, whether or not they were consumed.
*/

/// Cycles charged for servicing NMI (and BRK's base cost).
pub const INTERRUPT_CYCLES: u32 = 7;

/// Cycle counter value right after power-on / reset.
pub const RESET_CYCLES: u64 = 7;

/// Transient pending-cycle flags for the instruction currently executing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PendingCycles {
    page_crossed: bool,
    extra_eligible: bool,
}

impl PendingCycles {
    /// Record the resolver's page-cross result. Never clears an earlier crossing.
    #[inline]
    pub fn note_page_cross(&mut self, crossed: bool) {
        self.page_crossed |= crossed;
    }

    /// Called by handlers that pay for a page crossing.
    #[inline]
    pub fn mark_eligible(&mut self) {
        self.extra_eligible = true;
    }

    #[inline]
    pub fn page_crossed(&self) -> bool {
        self.page_crossed
    }

    #[inline]
    pub fn extra_eligible(&self) -> bool {
        self.extra_eligible
    }

    /// Penalty owed (0 or 1) and reset both flags.
    #[inline]
    pub fn settle(&mut self) -> u32 {
        let extra = u32::from(self.page_crossed && self.extra_eligible);
        *self = Self::default();
        extra
    }
}

/// True when `a` and `b` lie on different 256-byte pages.
#[inline]
pub fn crosses_page(a: u16, b: u16) -> bool {
    (a & 0xFF00) != (b & 0xFF00)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn penalty_needs_both_flags() {
        let mut p = PendingCycles::default();
        p.note_page_cross(true);
        assert_eq!(p.settle(), 0);

        p.mark_eligible();
        assert_eq!(p.settle(), 0);

        p.note_page_cross(true);
        p.mark_eligible();
        assert_eq!(p.settle(), 1);
    }

    #[test]
    fn settle_clears_flags() {
        let mut p = PendingCycles::default();
        p.note_page_cross(true);
        p.mark_eligible();
        p.settle();
        assert!(!p.page_crossed());
        assert!(!p.extra_eligible());
        assert_eq!(p.settle(), 0);
    }

    #[test]
    fn page_compare() {
        assert!(!crosses_page(0x80F0, 0x80FF));
        assert!(crosses_page(0x80FF, 0x8100));
        assert!(crosses_page(0xFFFF, 0x0000));
    }
}
