use crate::alloc::{GlobalRingAllocator, RingAllocator};
use crate::config::{OpBehavior, RingFlags, SyncMode};
use crate::cursor::CursorPair;
use crate::error::RingError;
use crate::reserve::{claim_dequeue, claim_enqueue};
use crate::storage::RingStorage;
use crossbeam_utils::CachePadded;

/// Bounded lock-free FIFO ring of fixed-size handles.
///
/// Every transfer runs the same three phases on one side's cursors:
///
/// 1. **Claim** — atomically move `head` forward, granting this call
///    exclusive ownership of a contiguous index range.
/// 2. **Transfer** — copy handles into/out of the claimed slots with no
///    synchronization; no other claim can overlap the range.
/// 3. **Publish** — advance `tail` once every earlier claim on the same
///    side has published, making the range visible to the opposite side.
///
/// Items become visible strictly in claim order, so dequeue order matches
/// enqueue claim order regardless of which thread's transfer finishes
/// first. Teardown is the caller's job: dropping the ring while a thread
/// still holds a claim is prevented by the borrow checker (operations
/// borrow the ring), so no runtime accounting is needed.
///
/// `T` is a fixed-width handle: one slot holds exactly one `T`, and the
/// transfer phase copies it, so `T: Copy` is required on all operations.
pub struct Ring<T, A: RingAllocator = GlobalRingAllocator> {
    prod: CachePadded<CursorPair>,
    cons: CachePadded<CursorPair>,
    prod_mode: SyncMode,
    cons_mode: SyncMode,
    flags: RingFlags,
    storage: RingStorage<T, A>,
}

// SAFETY: slot contents only move between threads through the claim/publish
// protocol, whose acquire/release pairs order the data accesses.
unsafe impl<T: Send, A: RingAllocator + Send> Send for Ring<T, A> {}
unsafe impl<T: Send, A: RingAllocator + Sync> Sync for Ring<T, A> {}

impl<T> Ring<T> {
    /// Creates a ring backed by the global allocator.
    ///
    /// Without `exact_size`, `count` must be a power of two and the usable
    /// capacity is `count - 1`. With `exact_size`, capacity is `count` and
    /// the backing array rounds up past it.
    pub fn new(count: u32, flags: RingFlags) -> Result<Self, RingError> {
        Self::with_allocator(count, flags, GlobalRingAllocator)
    }
}

impl<T, A: RingAllocator> Ring<T, A> {
    /// Creates a ring whose backing block comes from `alloc`.
    ///
    /// Validation happens before any allocation; `InvalidSize` and
    /// `OutOfMemory` are returned synchronously, and the caller may retry
    /// with corrected parameters.
    pub fn with_allocator(count: u32, flags: RingFlags, alloc: A) -> Result<Self, RingError> {
        let storage = RingStorage::allocate(count, flags.exact_size, alloc)?;
        let mode = |single| if single { SyncMode::Single } else { SyncMode::Multi };

        Ok(Self {
            prod: CachePadded::new(CursorPair::new()),
            cons: CachePadded::new(CursorPair::new()),
            prod_mode: mode(flags.single_producer),
            cons_mode: mode(flags.single_consumer),
            flags,
            storage,
        })
    }

    /// Usable slot count.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.capacity() as usize
    }

    /// Flags the ring was constructed with.
    #[inline]
    pub fn flags(&self) -> RingFlags {
        self.flags
    }

    /// Number of published items currently in the ring.
    ///
    /// A snapshot only: concurrent transfers can change it immediately.
    #[inline]
    pub fn len(&self) -> usize {
        let count = self
            .prod
            .tail_relaxed()
            .wrapping_sub(self.cons.tail_relaxed());
        (count as usize).min(self.capacity())
    }

    /// Free slots available to producers.
    #[inline]
    pub fn free_space(&self) -> usize {
        self.capacity() - self.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.free_space() == 0
    }
}

impl<T: Copy, A: RingAllocator> Ring<T, A> {
    /// Enqueues all of `items` or nothing.
    ///
    /// On `Full` no cursor moves and nothing is written.
    pub fn enqueue_bulk(&self, items: &[T]) -> Result<(), RingError> {
        if self.do_enqueue(items, OpBehavior::Fixed) == items.len() {
            Ok(())
        } else {
            Err(RingError::Full)
        }
    }

    /// Enqueues as many of `items` as fit, returning the count (possibly 0).
    pub fn enqueue_burst(&self, items: &[T]) -> usize {
        self.do_enqueue(items, OpBehavior::Variable)
    }

    /// Enqueues a single handle.
    pub fn push(&self, item: T) -> Result<(), RingError> {
        self.enqueue_bulk(std::slice::from_ref(&item))
    }

    /// Fills all of `out` or fails `Empty` with no effect.
    pub fn dequeue_bulk(&self, out: &mut [T]) -> Result<(), RingError> {
        if self.do_dequeue(out, OpBehavior::Fixed) == out.len() {
            Ok(())
        } else {
            Err(RingError::Empty)
        }
    }

    /// Dequeues up to `out.len()` items, returning the count (possibly 0).
    pub fn dequeue_burst(&self, out: &mut [T]) -> usize {
        self.do_dequeue(out, OpBehavior::Variable)
    }

    /// Dequeues a single handle.
    pub fn pop(&self) -> Result<T, RingError> {
        let claim = claim_dequeue(&self.cons, &self.prod, self.cons_mode, OpBehavior::Fixed, 1);
        if claim.is_empty() {
            return Err(RingError::Empty);
        }
        // SAFETY: the claim grants exclusive read access to this published slot.
        let value = unsafe { self.storage.read(claim.start) };
        self.cons.publish(claim.start, claim.end(), self.cons_mode);
        Ok(value)
    }

    fn do_enqueue(&self, items: &[T], behavior: OpBehavior) -> usize {
        let capacity = self.capacity();
        let items = match behavior {
            // A fixed request larger than the ring can never succeed.
            OpBehavior::Fixed if items.len() > capacity => return 0,
            OpBehavior::Fixed => items,
            OpBehavior::Variable => &items[..items.len().min(capacity)],
        };

        let claim = claim_enqueue(
            &self.prod,
            &self.cons,
            self.storage.capacity(),
            self.prod_mode,
            behavior,
            items.len() as u32,
        );
        if claim.is_empty() {
            return 0;
        }

        for (k, &item) in items[..claim.count as usize].iter().enumerate() {
            // SAFETY: `[start, start + count)` is exclusively owned by this
            // call until the publish below.
            unsafe { self.storage.write(claim.start.wrapping_add(k as u32), item) };
        }

        self.prod.publish(claim.start, claim.end(), self.prod_mode);
        claim.count as usize
    }

    fn do_dequeue(&self, out: &mut [T], behavior: OpBehavior) -> usize {
        let capacity = self.capacity();
        let out = match behavior {
            OpBehavior::Fixed if out.len() > capacity => return 0,
            OpBehavior::Fixed => out,
            OpBehavior::Variable => {
                let n = out.len().min(capacity);
                &mut out[..n]
            }
        };

        let claim = claim_dequeue(
            &self.cons,
            &self.prod,
            self.cons_mode,
            behavior,
            out.len() as u32,
        );
        if claim.is_empty() {
            return 0;
        }

        for (k, slot) in out[..claim.count as usize].iter_mut().enumerate() {
            // SAFETY: the claim covers only published slots, and no other
            // consumer claim overlaps it.
            *slot = unsafe { self.storage.read(claim.start.wrapping_add(k as u32)) };
        }

        self.cons.publish(claim.start, claim.end(), self.cons_mode);
        claim.count as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mpmc(count: u32) -> Ring<u64> {
        Ring::new(count, RingFlags::default()).unwrap()
    }

    #[test]
    fn test_sequential_fifo_order() {
        let ring = mpmc(8);
        ring.enqueue_bulk(&[1, 2, 3, 4]).unwrap();

        let mut out = [0u64; 4];
        ring.dequeue_bulk(&mut out).unwrap();
        assert_eq!(out, [1, 2, 3, 4]);
    }

    #[test]
    fn test_exact_size_capacity() {
        let ring = Ring::<u64>::new(100, RingFlags::new(false, false, true)).unwrap();
        assert_eq!(ring.capacity(), 100);

        // All 100 slots are usable.
        let items: Vec<u64> = (0..100).collect();
        ring.enqueue_bulk(&items).unwrap();
        assert!(ring.is_full());
        assert_eq!(ring.push(100), Err(RingError::Full));
    }

    #[test]
    fn test_invalid_size_without_exact_flag() {
        assert_eq!(
            Ring::<u64>::new(100, RingFlags::default()).err(),
            Some(RingError::InvalidSize { count: 100 })
        );
    }

    #[test]
    fn test_full_and_empty_leave_cursors_unchanged() {
        // Exact-size 4 so the usable capacity is exactly 4.
        let ring = Ring::<u64>::new(4, RingFlags::new(false, false, true)).unwrap();

        ring.enqueue_bulk(&[10, 20, 30, 40]).unwrap();
        assert_eq!(ring.push(50), Err(RingError::Full));
        assert_eq!(ring.len(), 4);

        let mut out = [0u64; 4];
        ring.dequeue_bulk(&mut out).unwrap();
        assert_eq!(out, [10, 20, 30, 40]);

        assert_eq!(ring.pop(), Err(RingError::Empty));
        assert!(ring.is_empty());
    }

    #[test]
    fn test_burst_clamps_to_available() {
        let ring = mpmc(8); // capacity 7

        let items: Vec<u64> = (0..10).collect();
        assert_eq!(ring.enqueue_burst(&items), 7);
        assert_eq!(ring.enqueue_burst(&items), 0);

        let mut out = [0u64; 10];
        assert_eq!(ring.dequeue_burst(&mut out), 7);
        assert_eq!(&out[..7], &[0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(ring.dequeue_burst(&mut out), 0);
    }

    #[test]
    fn test_fixed_larger_than_ring_fails_fast() {
        let ring = mpmc(8);
        let items = [0u64; 32];
        assert_eq!(ring.enqueue_bulk(&items), Err(RingError::Full));

        let mut out = [0u64; 32];
        assert_eq!(ring.dequeue_bulk(&mut out), Err(RingError::Empty));
    }

    #[test]
    fn test_wrap_around_reuse() {
        let ring = mpmc(4); // capacity 3

        // Many fill/drain rounds exercise index wrap through the mask.
        for round in 0..64u64 {
            let base = round * 10;
            ring.enqueue_bulk(&[base, base + 1, base + 2]).unwrap();

            let mut out = [0u64; 3];
            ring.dequeue_bulk(&mut out).unwrap();
            assert_eq!(out, [base, base + 1, base + 2]);
        }
        assert!(ring.is_empty());
    }

    #[test]
    fn test_empty_slices_are_noops() {
        let ring = mpmc(8);
        ring.enqueue_bulk(&[]).unwrap();
        assert_eq!(ring.enqueue_burst(&[]), 0);

        let mut out = [0u64; 0];
        ring.dequeue_bulk(&mut out).unwrap();
        assert_eq!(ring.dequeue_burst(&mut out), 0);
        assert!(ring.is_empty());
    }

    #[test]
    fn test_observers_track_occupancy() {
        let ring = mpmc(8);
        assert_eq!(ring.capacity(), 7);
        assert_eq!(ring.free_space(), 7);

        ring.enqueue_bulk(&[1, 2, 3]).unwrap();
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.free_space(), 4);
        assert!(!ring.is_empty());
        assert!(!ring.is_full());

        assert_eq!(ring.pop(), Ok(1));
        assert_eq!(ring.len(), 2);
    }

    #[test]
    fn test_single_mode_flags() {
        let ring = Ring::<u64>::new(8, RingFlags::new(true, true, false)).unwrap();
        ring.enqueue_bulk(&[7, 8, 9]).unwrap();
        assert_eq!(ring.pop(), Ok(7));

        let mut out = [0u64; 2];
        ring.dequeue_bulk(&mut out).unwrap();
        assert_eq!(out, [8, 9]);
    }

    #[test]
    fn test_handles_can_be_pointers() {
        let values = [10u32, 20, 30];
        let ring = Ring::<*const u32>::new(4, RingFlags::default()).unwrap();

        for v in &values {
            ring.push(v as *const u32).unwrap();
        }
        for v in &values {
            let p = ring.pop().unwrap();
            assert_eq!(unsafe { *p }, *v);
        }
    }
}
