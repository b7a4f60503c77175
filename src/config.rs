/// Construction flags for a [`Ring`](crate::Ring).
///
/// The defaults give a multi-producer, multi-consumer ring whose usable
/// capacity is one less than the (power-of-two) slot count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RingFlags {
    /// Only one thread enqueues at a time (caller-guaranteed). Claims on the
    /// producer head become plain stores instead of compare-and-swap loops.
    pub single_producer: bool,
    /// Only one thread dequeues at a time (caller-guaranteed).
    pub single_consumer: bool,
    /// Usable capacity equals the requested count exactly; the backing array
    /// rounds up to the next power of two past it.
    pub exact_size: bool,
}

impl RingFlags {
    /// Creates flags with explicit settings.
    pub const fn new(single_producer: bool, single_consumer: bool, exact_size: bool) -> Self {
        Self {
            single_producer,
            single_consumer,
            exact_size,
        }
    }
}

/// Claim strategy for one side of the ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SyncMode {
    /// Mutual exclusion guaranteed externally; plain read-modify-store.
    Single,
    /// Arbitrary concurrent callers; compare-and-swap loop.
    Multi,
}

/// Whether a transfer is all-or-nothing or clamps to what is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OpBehavior {
    /// Transfer exactly the requested count or nothing at all.
    Fixed,
    /// Transfer as many as possible; zero is a valid outcome.
    Variable,
}
