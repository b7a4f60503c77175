use std::hint;
use std::thread;

/// Progressive wait policy for the ring's spin points.
///
/// The ring has exactly two kinds of waits: the commit turn inside a
/// publish (unbounded, driven through [`wait_until`](Self::wait_until))
/// and caller-side retry loops layered on top of the non-blocking
/// operations. Both start with short bursts of PAUSE hints, doubling each
/// step, and degrade to OS yields once spinning stops paying off. Callers
/// that would rather fail than occupy the scheduler can stop at
/// [`is_yielding`](Self::is_yielding).
#[derive(Debug, Default)]
pub struct Backoff {
    attempt: u32,
}

impl Backoff {
    /// Spin steps before degrading to yields; the last one issues
    /// `2^(SPIN_STEPS - 1)` PAUSE hints.
    const SPIN_STEPS: u32 = 7;

    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { attempt: 0 }
    }

    /// One wait step: a doubling burst of spin hints while spinning is
    /// still cheap, a scheduler yield afterwards.
    #[inline]
    pub fn wait(&mut self) {
        if self.attempt < Self::SPIN_STEPS {
            for _ in 0..(1u32 << self.attempt) {
                hint::spin_loop();
            }
            self.attempt += 1;
        } else {
            thread::yield_now();
        }
    }

    /// True once waiting has degraded to yielding. A retry loop that
    /// reaches this point is contending with a stalled or descheduled
    /// claimant and may prefer to give up or park.
    #[inline]
    #[must_use]
    pub fn is_yielding(&self) -> bool {
        self.attempt >= Self::SPIN_STEPS
    }

    /// Waits until `ready` reports true.
    ///
    /// This is the commit-turn wait: a claimed range must eventually
    /// publish and cannot be abandoned, so the wait is unbounded.
    #[inline]
    pub(crate) fn wait_until(mut ready: impl FnMut() -> bool) {
        let mut backoff = Self::new();
        while !ready() {
            backoff.wait();
        }
    }
}
