//! Shared stop flag with a single-winner claim.

use std::sync::atomic::{AtomicBool, Ordering};

/// Broadcast cancellation for the workers of one search instance.
///
/// The flag starts `false` and flips to `true` once, by either
/// [`try_claim`](Self::try_claim) or [`cancel`](Self::cancel). Every worker
/// re-reads it on each iteration, so all of them see the flip on their next
/// poll; nothing is consumed by the first reader.
#[derive(Debug, Default)]
pub struct StopSignal {
    stopped: AtomicBool,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true once the search has been won or cancelled.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Claims the right to persist a match.
    ///
    /// Returns true to exactly one caller over the lifetime of the signal.
    /// Every other caller, concurrent or later, gets false, as does every
    /// caller after [`cancel`](Self::cancel).
    #[inline]
    pub fn try_claim(&self) -> bool {
        self.stopped
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Stops the search without claiming it. Returns true if this call did
    /// the flip.
    pub fn cancel(&self) -> bool {
        !self.stopped.swap(true, Ordering::AcqRel)
    }
}
