use crate::backoff::Backoff;
use crate::config::SyncMode;
use crate::invariants::{debug_assert_commit_turn, debug_assert_monotonic};
use std::sync::atomic::{AtomicU32, Ordering};

/// Head/tail counter pair for one side of the ring.
///
/// `head` is the next index to be claimed, `tail` the next index whose claim
/// has been published. Both increase monotonically modulo `2^32`; occupancy
/// math uses wrapping subtraction against the opposing side's `tail`.
///
/// The two pairs of a ring are wrapped in `CachePadded` by the composition
/// layer, so producer and consumer traffic never shares a cache line.
#[derive(Debug)]
pub(crate) struct CursorPair {
    head: AtomicU32,
    tail: AtomicU32,
}

impl CursorPair {
    pub const fn new() -> Self {
        Self {
            head: AtomicU32::new(0),
            tail: AtomicU32::new(0),
        }
    }

    /// Snapshot of the claim cursor.
    #[inline]
    pub fn head(&self) -> u32 {
        self.head.load(Ordering::Acquire)
    }

    /// Published position of this side. The Acquire pairs with the Release
    /// in [`publish`](Self::publish), so data written before the opposing
    /// commit is visible after this load.
    #[inline]
    pub fn tail(&self) -> u32 {
        self.tail.load(Ordering::Acquire)
    }

    #[inline]
    pub fn tail_relaxed(&self) -> u32 {
        self.tail.load(Ordering::Relaxed)
    }

    /// Single-mode head advance; the caller guarantees no concurrent claimer.
    #[inline]
    pub fn set_head(&self, new: u32) {
        self.head.store(new, Ordering::Relaxed);
    }

    /// Multi-mode head advance. On success the caller owns `[old, new)`;
    /// on failure the freshly observed head is returned for the retry.
    #[inline]
    pub fn try_advance_head(&self, old: u32, new: u32) -> Result<u32, u32> {
        self.head
            .compare_exchange_weak(old, new, Ordering::AcqRel, Ordering::Acquire)
    }

    /// Publishes the claim `[start, new_tail)`, making it visible to the
    /// opposing side.
    ///
    /// In `Multi` mode the call waits until every earlier claim on this side
    /// has published (`tail == start`), so commit order always equals claim
    /// order and `tail` never skips an unwritten slot. The wait loads with
    /// Acquire: each publish thereby carries the slot writes of every
    /// earlier claim, and an observer of the final tail sees them all even
    /// though only the last claimant stored it. The wait is the one
    /// blocking-adjacent point of the protocol: unbounded, spinning first
    /// and degrading to `yield_now`. In `Single` mode no other claim can be
    /// in flight and the store is unconditional.
    pub fn publish(&self, start: u32, new_tail: u32, mode: SyncMode) {
        if mode == SyncMode::Multi {
            Backoff::wait_until(|| self.tail.load(Ordering::Acquire) == start);
        }

        debug_assert_commit_turn!(self.tail.load(Ordering::Relaxed), start);
        debug_assert_monotonic!("tail", start, new_tail);

        self.tail.store(new_tail, Ordering::Release);
    }
}
