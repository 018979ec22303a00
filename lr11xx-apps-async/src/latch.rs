//! The interrupt flag shared between the radio ISR and the main loop.

use core::sync::atomic::{AtomicBool, Ordering};

/// A single "the radio raised its IRQ line" flag.
///
/// The interrupt handler is the only writer ([`IrqLatch::fire`]), the dispatcher
/// the only reader and clearer ([`IrqLatch::take`]). Edges are not queued: any
/// number of edges between two dispatch passes collapse into one pass, which is
/// enough because the chip accumulates its interrupt flags until they are cleared.
pub struct IrqLatch {
    fired: AtomicBool,
}

impl IrqLatch {
    /// Creates a cleared latch. Usable in a `static`.
    pub const fn new() -> Self {
        Self {
            fired: AtomicBool::new(false),
        }
    }

    /// Sets the latch. Call from the DIO rising edge interrupt.
    pub fn fire(&self) {
        self.fired.store(true, Ordering::Release);
    }

    /// Clears the latch and returns whether it was set.
    pub fn take(&self) -> bool {
        self.fired.swap(false, Ordering::AcqRel)
    }

    /// Returns whether the latch is set, without clearing it.
    pub fn is_set(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }
}

impl Default for IrqLatch {
    fn default() -> Self {
        Self::new()
    }
}
