use crate::alloc::RingAllocator;
use crate::error::RingError;
use std::alloc::Layout;
use std::cell::UnsafeCell;
use std::marker::PhantomData;
use std::mem::MaybeUninit;
use std::ptr::NonNull;

/// Alignment of the slot array, and the granularity `size_for` rounds to.
pub const CACHE_LINE: usize = 64;

/// Largest usable slot count.
///
/// Counters are `u32` and occupancy is computed with wrapping subtraction,
/// which stays unambiguous only while the outstanding distance between any
/// head and the opposing tail is below `2^31`.
pub const MAX_CAPACITY: u32 = 0x7FFF_FFFF;

/// Derived size metadata for a ring.
///
/// `size` is the backing array length (always a power of two), `mask` wraps
/// counters into it, `capacity` is the usable slot count visible to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Geometry {
    pub size: u32,
    pub mask: u32,
    pub capacity: u32,
}

pub(crate) fn geometry(count: u32, exact_size: bool) -> Result<Geometry, RingError> {
    if exact_size {
        if count == 0 || count > MAX_CAPACITY {
            return Err(RingError::InvalidSize { count });
        }
        // Round past the requested count so the tail sentinel slot is never
        // addressable as a valid entry and capacity stays exact.
        let size = (count + 1).next_power_of_two();
        Ok(Geometry {
            size,
            mask: size - 1,
            capacity: count,
        })
    } else {
        if !count.is_power_of_two() || count > MAX_CAPACITY {
            return Err(RingError::InvalidSize { count });
        }
        Ok(Geometry {
            size: count,
            mask: count - 1,
            capacity: count - 1,
        })
    }
}

/// Returns the number of bytes of slot storage a ring of `count` entries
/// needs, rounded up to a cache-line multiple.
///
/// Fails with [`RingError::InvalidSize`] when `count` is not a power of two
/// (without `exact_size`) or exceeds [`MAX_CAPACITY`].
pub fn size_for<T>(count: u32, exact_size: bool) -> Result<usize, RingError> {
    let geo = geometry(count, exact_size)?;
    slot_bytes::<T>(geo.size, count)
}

fn slot_bytes<T>(size: u32, count: u32) -> Result<usize, RingError> {
    let bytes = (size as usize)
        .checked_mul(std::mem::size_of::<T>())
        .ok_or(RingError::InvalidSize { count })?;
    // Round up to a whole number of cache lines; never hand out zero bytes.
    let aligned = bytes
        .checked_add(CACHE_LINE - 1)
        .ok_or(RingError::InvalidSize { count })?
        & !(CACHE_LINE - 1);
    Ok(aligned.max(CACHE_LINE))
}

/// Fixed-capacity slot array plus its geometry.
///
/// Storage validates parameters and lays slots out in a block obtained from
/// the injected allocator; it knows nothing about cursors or claims. Slot
/// accesses are `unsafe` because their exclusivity comes from the claim
/// protocol, not from anything storage can check.
pub(crate) struct RingStorage<T, A: RingAllocator> {
    slots: NonNull<UnsafeCell<MaybeUninit<T>>>,
    layout: Layout,
    geo: Geometry,
    alloc: A,
    _marker: PhantomData<T>,
}

impl<T, A: RingAllocator> RingStorage<T, A> {
    /// Validates `count`, sizes the slot array and obtains its block from
    /// `alloc`. Performs no other work.
    pub fn allocate(count: u32, exact_size: bool, alloc: A) -> Result<Self, RingError> {
        let geo = geometry(count, exact_size)?;
        let bytes = slot_bytes::<T>(geo.size, count)?;
        let layout = Layout::from_size_align(bytes, CACHE_LINE)
            .map_err(|_| RingError::InvalidSize { count })?;
        let block = alloc.allocate(layout)?;

        Ok(Self {
            slots: block.cast(),
            layout,
            geo,
            alloc,
            _marker: PhantomData,
        })
    }

    #[inline]
    pub fn capacity(&self) -> u32 {
        self.geo.capacity
    }

    #[inline]
    fn slot(&self, counter: u32) -> *mut MaybeUninit<T> {
        let idx = (counter & self.geo.mask) as usize;
        // SAFETY: idx < size by construction of the mask.
        unsafe { (*self.slots.as_ptr().add(idx)).get() }
    }

    /// Writes `value` into the slot addressed by `counter`.
    ///
    /// # Safety
    ///
    /// `counter` must lie inside an index range the calling side has claimed
    /// and not yet published; that exclusivity is what makes the plain write
    /// race-free.
    #[inline]
    pub unsafe fn write(&self, counter: u32, value: T) {
        (*self.slot(counter)).write(value);
    }

    /// Reads the slot addressed by `counter`.
    ///
    /// # Safety
    ///
    /// `counter` must lie inside a claimed, unpublished range on the consumer
    /// side, so the slot holds a value published by a producer commit.
    #[inline]
    pub unsafe fn read(&self, counter: u32) -> T
    where
        T: Copy,
    {
        (*self.slot(counter)).assume_init_read()
    }
}

impl<T, A: RingAllocator> Drop for RingStorage<T, A> {
    fn drop(&mut self) {
        // Handles are Copy at every insertion point, so there is nothing to
        // drop in the slots themselves.
        unsafe { self.alloc.release(self.slots.cast(), self.layout) };
    }
}
