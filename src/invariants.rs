//! Debug assertion macros for the reserve/commit protocol invariants.
//!
//! Active only in debug builds, so there is zero overhead in release builds.

/// Assert that a claim never exceeds the entries available to its side.
///
/// **Invariant**: a producer claim is bounded by free space, a consumer
/// claim by published items.
macro_rules! debug_assert_bounded_claim {
    ($n:expr, $entries:expr) => {
        debug_assert!(
            $n <= $entries,
            "claim of {} slots exceeds the {} available",
            $n,
            $entries
        )
    };
}

/// Assert that a counter only moves forward (wrapping `u32` comparison).
///
/// **Invariant**: `head` and `tail` are monotonic; any backward step means a
/// protocol bug, not legitimate wraparound.
macro_rules! debug_assert_monotonic {
    ($name:literal, $old:expr, $new:expr) => {
        debug_assert!(
            $new.wrapping_sub($old) < (1u32 << 31),
            "{} moved backwards from {} to {}",
            $name,
            $old,
            $new
        )
    };
}

/// Assert that a publish happens exactly at its claim's turn.
///
/// **Invariant**: `tail` equals the claim's start when the commit lands, so
/// publication order equals claim order and `tail` never skips a slot.
macro_rules! debug_assert_commit_turn {
    ($tail:expr, $start:expr) => {
        debug_assert!(
            $tail == $start,
            "publishing out of claim order: tail {} != claim start {}",
            $tail,
            $start
        )
    };
}

pub(crate) use debug_assert_bounded_claim;
pub(crate) use debug_assert_commit_turn;
pub(crate) use debug_assert_monotonic;
