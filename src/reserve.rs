//! Reservation protocol: atomic claim of a contiguous index range.
//!
//! A claim moves one side's `head` forward by up to `n`, bounded by what the
//! opposing side has published. The granted range belongs exclusively to the
//! claiming call until it publishes; overlapping claims are impossible
//! because every advance goes through a single compare-and-swap point (or a
//! plain store under a caller-provided exclusivity guarantee).

use crate::config::{OpBehavior, SyncMode};
use crate::cursor::CursorPair;
use crate::invariants::debug_assert_bounded_claim;

/// Exclusive claim on the index range `[start, start + count)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Claim {
    pub start: u32,
    pub count: u32,
}

impl Claim {
    #[inline]
    pub fn end(&self) -> u32 {
        self.start.wrapping_add(self.count)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Claims up to `n` free slots on the enqueue side, advancing the producer
/// head. Free space is what the consumer has published back:
/// `capacity - (prod.head - cons.tail)` in wrapping arithmetic.
pub(crate) fn claim_enqueue(
    prod: &CursorPair,
    cons: &CursorPair,
    capacity: u32,
    mode: SyncMode,
    behavior: OpBehavior,
    n: u32,
) -> Claim {
    claim(prod, mode, behavior, n, |old_head| {
        capacity.wrapping_sub(old_head.wrapping_sub(cons.tail()))
    })
}

/// Claims up to `n` published items on the dequeue side, advancing the
/// consumer head. The bound is the producer's tail: data not yet committed
/// is invisible.
pub(crate) fn claim_dequeue(
    cons: &CursorPair,
    prod: &CursorPair,
    mode: SyncMode,
    behavior: OpBehavior,
    n: u32,
) -> Claim {
    claim(cons, mode, behavior, n, |old_head| {
        prod.tail().wrapping_sub(old_head)
    })
}

/// Shared claim loop. `entries_at` computes, for a head snapshot, how many
/// entries this side may take; it reloads the opposing tail on every retry.
///
/// A failed attempt performs no state change. Zero-count outcomes (burst
/// with nothing available, or a fixed request that cannot be met) return
/// without touching the head. The CAS loop has no retry bound: progress is
/// guaranteed in aggregate, not per caller.
fn claim<F>(own: &CursorPair, mode: SyncMode, behavior: OpBehavior, requested: u32, entries_at: F) -> Claim
where
    F: Fn(u32) -> u32,
{
    let mut old_head = own.head();
    loop {
        let entries = entries_at(old_head);
        let count = match behavior {
            OpBehavior::Fixed if entries < requested => {
                return Claim { start: old_head, count: 0 }
            }
            OpBehavior::Fixed => requested,
            OpBehavior::Variable => requested.min(entries),
        };
        if count == 0 {
            return Claim { start: old_head, count: 0 };
        }
        debug_assert_bounded_claim!(count, entries);

        let new_head = old_head.wrapping_add(count);
        match mode {
            SyncMode::Single => {
                own.set_head(new_head);
                return Claim { start: old_head, count };
            }
            SyncMode::Multi => match own.try_advance_head(old_head, new_head) {
                Ok(_) => return Claim { start: old_head, count },
                Err(current) => old_head = current,
            },
        }
    }
}
