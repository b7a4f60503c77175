use thiserror::Error;

/// Error types for ring construction and fixed-count transfers.
///
/// Every failure is reported through a return value; no operation panics or
/// leaves the cursors in an inconsistent state. Burst operations signal a
/// shortfall through their returned count instead of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RingError {
    /// Requested slot count is not a power of two (without exact-size mode)
    /// or exceeds [`MAX_CAPACITY`](crate::MAX_CAPACITY).
    #[error("invalid ring size {count}: must be a power of two (or use exact-size mode) and within the size mask")]
    InvalidSize {
        /// The rejected slot count.
        count: u32,
    },
    /// The allocator could not provide the backing block.
    #[error("allocator failed to provide {bytes} bytes for the ring")]
    OutOfMemory {
        /// Size of the block that was requested.
        bytes: usize,
    },
    /// Not enough free slots for an all-or-nothing enqueue.
    #[error("ring full")]
    Full,
    /// Not enough published items for an all-or-nothing dequeue.
    #[error("ring empty")]
    Empty,
}
