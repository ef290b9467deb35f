//! Detection submission gate.
//!
//! The detector accepts one frame at a time. The submission loop asks the
//! gate before each send and before scheduling the next animation callback;
//! tearing the app down flips the shared cancellation flag so both loops
//! wind down on their next check.

use std::cell::Cell;
use std::rc::Rc;

#[derive(Clone, Debug, Default)]
pub struct DetectionGate {
    cancelled: Rc<Cell<bool>>,
    in_flight: Rc<Cell<bool>>,
    submitted: Rc<Cell<u64>>,
    skipped: Rc<Cell<u64>>,
}

impl DetectionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the single in-flight slot. Returns false when cancelled or when
    /// a previous submission has not completed yet.
    pub fn try_begin(&self) -> bool {
        if self.cancelled.get() {
            return false;
        }
        if self.in_flight.get() {
            self.skipped.set(self.skipped.get() + 1);
            return false;
        }
        self.in_flight.set(true);
        self.submitted.set(self.submitted.get() + 1);
        true
    }

    /// Release the slot once the detector has answered (or failed).
    pub fn finish(&self) {
        self.in_flight.set(false);
    }

    pub fn cancel(&self) {
        if !self.cancelled.replace(true) {
            log::info!(
                "[detect] cancelled after {} submissions ({} skipped)",
                self.submitted.get(),
                self.skipped.get()
            );
        }
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }

    /// Whether the loop should schedule another animation callback.
    #[inline]
    pub fn should_continue(&self) -> bool {
        !self.cancelled.get()
    }

    #[inline]
    pub fn in_flight(&self) -> bool {
        self.in_flight.get()
    }

    #[inline]
    pub fn submitted(&self) -> u64 {
        self.submitted.get()
    }

    #[inline]
    pub fn skipped(&self) -> u64 {
        self.skipped.get()
    }
}
