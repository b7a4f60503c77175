use crate::error::RingError;
use std::alloc::{alloc_zeroed, dealloc, Layout};
use std::ptr::NonNull;

/// Memory capability injected into the ring.
///
/// The ring core never calls an allocator directly; it asks this capability
/// for one zeroed, cache-line-aligned block at construction and returns it
/// on drop. Implementations can route to arenas, pinned pages or NUMA-local
/// pools without the core knowing.
pub trait RingAllocator {
    /// Provides a zeroed block for the given layout.
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, RingError>;

    /// Returns a block previously handed out by [`allocate`](Self::allocate).
    ///
    /// # Safety
    ///
    /// `ptr` must come from a call to `allocate` on this same value with the
    /// identical `layout`, and must not be used afterwards.
    unsafe fn release(&self, ptr: NonNull<u8>, layout: Layout);
}

/// Default capability backed by the global allocator.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalRingAllocator;

impl RingAllocator for GlobalRingAllocator {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, RingError> {
        // SAFETY: storage never requests a zero-size layout.
        let ptr = unsafe { alloc_zeroed(layout) };
        NonNull::new(ptr).ok_or(RingError::OutOfMemory {
            bytes: layout.size(),
        })
    }

    unsafe fn release(&self, ptr: NonNull<u8>, layout: Layout) {
        dealloc(ptr.as_ptr(), layout);
    }
}
