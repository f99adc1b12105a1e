//! NMI request line shared between the CPU and the PPU.
//!
//! The CPU owns the line; collaborators receive clones of the handle at
//! construction time. A single `AtomicBool` backs every clone, so a PPU
//! stepped on a different cadence (or thread) can raise it without locking.
//! Only the CPU lowers it, when the interrupt is serviced.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, Default)]
pub struct NmiLine(Arc<AtomicBool>);

impl NmiLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request an NMI before the next instruction.
    #[inline]
    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Lower the line, returning whether it was raised.
    #[inline]
    pub(crate) fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }

    /// Drop any request without servicing it (reset).
    #[inline]
    pub(crate) fn clear(&self) {
        self.0.store(false, Ordering::Release);
    }
}
