//! Fixed-capacity circular queue.
//!
//! The backing storage holds `2^bound` slots, so every index reduction is a
//! bitwise AND with `capacity - 1`. The queue never resizes; callers that
//! need more room catch [`QueueFull`] and move the contents into a larger
//! queue (see [`TokenBuffer`](crate::TokenBuffer)).
//!
//! Invariants
//! - `0 <= len <= capacity`.
//! - Live elements occupy `(start + i) & mask` for `i in 0..len`; every other
//!   slot is `None`.

use alloc::{boxed::Box, vec::Vec};
use core::iter::FusedIterator;

use crate::error::QueueFull;

/// Bounded FIFO queue over `2^bound` slots.
///
/// ```rust
/// use retrace::RingQueue;
///
/// let mut q = RingQueue::new(2);
/// for x in 0..4 {
///     q.enqueue(x).unwrap();
/// }
/// assert!(q.enqueue(4).is_err());
/// assert_eq!(q.dequeue(), Some(0));
/// q.enqueue(4).unwrap();
/// assert_eq!(q.iter().copied().collect::<Vec<_>>(), [1, 2, 3, 4]);
/// ```
#[derive(Debug, Clone)]
pub struct RingQueue<T> {
    slots: Box<[Option<T>]>,
    mask: usize,
    start: usize,
    len: usize,
}

impl<T> RingQueue<T> {
    /// Largest accepted `bound`; keeps `capacity` addressable on every
    /// target.
    pub const MAX_BOUND: u32 = usize::BITS - 2;

    /// Creates an empty queue with room for `2^bound` elements.
    ///
    /// # Panics
    ///
    /// Panics if `bound` exceeds [`RingQueue::MAX_BOUND`].
    #[must_use]
    pub fn new(bound: u32) -> Self {
        assert!(
            bound <= Self::MAX_BOUND,
            "ring bound {bound} exceeds {}",
            Self::MAX_BOUND
        );
        let capacity = 1usize << bound;
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self {
            slots: slots.into_boxed_slice(),
            mask: capacity - 1,
            start: 0,
            len: 0,
        }
    }

    /// `log2` of the capacity.
    #[inline]
    #[must_use]
    pub fn bound(&self) -> u32 {
        self.slots.len().trailing_zeros()
    }

    /// Maximum number of live elements.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of live elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` when no elements are live.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// `true` when [`enqueue`](Self::enqueue) would fail.
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len == self.slots.len()
    }

    #[inline]
    fn slot(&self, offset: usize) -> usize {
        self.start.wrapping_add(offset) & self.mask
    }

    /// Appends `x` behind the newest element.
    ///
    /// # Errors
    ///
    /// Returns [`QueueFull`] holding `x` when the queue is at capacity. The
    /// queue is left untouched.
    pub fn enqueue(&mut self, x: T) -> Result<&mut Self, QueueFull<T>> {
        if self.is_full() {
            return Err(QueueFull {
                capacity: self.capacity(),
                rejected: x,
            });
        }
        let slot = self.slot(self.len);
        self.slots[slot] = Some(x);
        self.len += 1;
        Ok(self)
    }

    /// Removes and returns the oldest element.
    pub fn dequeue(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let x = self.slots[self.start].take();
        self.start = self.slot(1);
        self.len -= 1;
        x
    }

    /// Returns the element `n` positions behind the oldest one.
    #[must_use]
    pub fn peek(&self, n: usize) -> Option<&T> {
        if n >= self.len {
            return None;
        }
        self.slots[self.slot(n)].as_ref()
    }

    /// Drops the `n` oldest elements (fewer if the queue runs out) and
    /// returns how many were dropped.
    pub fn skip(&mut self, n: usize) -> usize {
        let n = n.min(self.len);
        for offset in 0..n {
            let slot = self.slot(offset);
            self.slots[slot] = None;
        }
        self.start = self.slot(n);
        self.len -= n;
        n
    }

    /// Drops every element and rewinds to slot zero.
    pub fn clear(&mut self) {
        self.skip(self.len);
        self.start = 0;
    }

    /// Iterates from the oldest to the newest element.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            queue: self,
            front: 0,
            back: self.len,
        }
    }
}

/// Iterator returned by [`RingQueue::iter`].
#[derive(Debug, Clone)]
pub struct Iter<'a, T> {
    queue: &'a RingQueue<T>,
    front: usize,
    back: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let item = self.queue.peek(self.front);
        self.front += 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        self.queue.peek(self.back)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a RingQueue<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
