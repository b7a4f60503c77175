//! ringmpmc - Bounded Lock-Free Multi-Producer Multi-Consumer Ring
//!
//! A fixed-capacity FIFO queue of `Copy` handles shared between threads
//! without mutexes, built around a two-phase reserve/commit protocol:
//! producers and consumers atomically claim a disjoint index range, move
//! data through exclusively-owned slots with no further synchronization,
//! then publish the range in claim order.
//!
//! # Key Features
//!
//! - Cache-line separated producer/consumer cursors (no false sharing)
//! - Bulk (all-or-nothing) and burst (best-effort) transfer in one call
//! - Single- and multi-actor modes per side, selected at construction
//! - Exact-size capacity mode (usable capacity equals the requested count)
//! - Injectable allocator capability; the core never touches the heap itself
//!
//! The base operations never block: a transfer either succeeds, partially
//! succeeds (burst), or fails immediately with [`RingError::Full`] /
//! [`RingError::Empty`]. Retry and backoff are policies for the caller,
//! with [`Backoff`] provided as a building block.
//!
//! # Example
//!
//! ```
//! use ringmpmc::{Ring, RingFlags};
//!
//! let ring = Ring::<u64>::new(8, RingFlags::default()).unwrap();
//!
//! // All-or-nothing enqueue, then best-effort dequeue.
//! ring.enqueue_bulk(&[1, 2, 3, 4]).unwrap();
//!
//! let mut out = [0u64; 8];
//! let n = ring.dequeue_burst(&mut out);
//! assert_eq!(&out[..n], &[1, 2, 3, 4]);
//! ```

mod alloc;
mod backoff;
mod config;
mod cursor;
mod error;
mod invariants;
mod reserve;
mod ring;
mod storage;

pub use alloc::{GlobalRingAllocator, RingAllocator};
pub use backoff::Backoff;
pub use config::RingFlags;
pub use error::RingError;
pub use ring::Ring;
pub use storage::{size_for, CACHE_LINE, MAX_CAPACITY};
