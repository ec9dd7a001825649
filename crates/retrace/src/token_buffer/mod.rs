//! Growable lookahead buffer with checkpoint/restore.
//!
//! Overview
//! - Units pulled from a source are appended at the tail and handed out from
//!   a cursor. Dequeuing only moves the cursor; the unit stays retained so a
//!   later [`restore`](TokenBuffer::restore) can replay it.
//! - Positions are absolute: the n-th unit ever enqueued has index `n`, no
//!   matter how much has been released. A checkpoint is simply the cursor
//!   index.
//! - Storage is a [`RingQueue`] holding the retained window
//!   `base..base + ring.len()`. When it fills up it is replaced by a ring of
//!   twice the capacity. [`commit`](TokenBuffer::commit) releases everything
//!   before the cursor by skipping the ring front, so released slots are
//!   reused without shifting the remaining units.
//!
//! Invariants
//! - `base <= start <= base + ring.len()`.
//! - `len() == base + ring.len() - start`.
//! - Without a commit, every checkpoint ever returned stays restorable.

use crate::{error::CheckpointError, ring::RingQueue, trace::trace};

/// Ordered buffer of units that have been pulled but not permanently
/// consumed.
///
/// ```rust
/// use retrace::TokenBuffer;
///
/// let mut buf = TokenBuffer::new();
/// buf.enqueue('a');
/// buf.enqueue('b');
/// let cp = buf.checkpoint();
/// assert_eq!(buf.dequeue(), Some(&'a'));
/// assert_eq!(buf.dequeue(), Some(&'b'));
/// buf.restore(cp).unwrap();
/// assert_eq!(buf.peek(1), Some(&'b'));
/// ```
#[derive(Debug, Clone)]
pub struct TokenBuffer<T> {
    ring: RingQueue<T>,
    /// Absolute index of the oldest retained unit.
    base: usize,
    /// Absolute index of the next unit to dequeue.
    start: usize,
}

impl<T> Default for TokenBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TokenBuffer<T> {
    /// `log2` of the initial ring capacity.
    pub const INITIAL_BOUND: u32 = 6;

    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::with_bound(Self::INITIAL_BOUND)
    }

    /// Creates an empty buffer whose first ring holds `2^bound` units.
    #[must_use]
    pub fn with_bound(bound: u32) -> Self {
        Self {
            ring: RingQueue::new(bound),
            base: 0,
            start: 0,
        }
    }

    /// Units available for [`dequeue`](Self::dequeue) right now.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.end() - self.start
    }

    /// `true` when nothing is available to dequeue.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Units held in memory, including ones before the cursor that are kept
    /// for restoring.
    #[inline]
    #[must_use]
    pub fn retained(&self) -> usize {
        self.ring.len()
    }

    /// Absolute index one past the newest unit.
    #[inline]
    fn end(&self) -> usize {
        self.base + self.ring.len()
    }

    /// Appends `x` to the tail.
    pub fn enqueue(&mut self, x: T) -> &mut Self {
        if let Err(full) = self.ring.enqueue(x) {
            self.grow();
            if self.ring.enqueue(full.rejected).is_err() {
                unreachable!("a freshly grown ring has a free slot");
            }
        }
        self
    }

    /// Moves the retained units into a ring of twice the capacity.
    fn grow(&mut self) {
        let bound = self.ring.bound() + 1;
        let mut ring = RingQueue::new(bound);
        while let Some(x) = self.ring.dequeue() {
            if ring.enqueue(x).is_err() {
                unreachable!("a ring of twice the capacity holds every retained unit");
            }
        }
        trace!(
            debug,
            "token buffer grew to {} slots ({} retained)",
            ring.capacity(),
            ring.len()
        );
        self.ring = ring;
    }

    /// Returns the unit at the cursor and advances past it.
    ///
    /// The unit stays retained until the next [`commit`](Self::commit).
    pub fn dequeue(&mut self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        let at = self.start - self.base;
        self.start += 1;
        self.ring.peek(at)
    }

    /// Returns the unit `n` positions past the cursor without moving it.
    /// `peek(0)` is what [`dequeue`](Self::dequeue) would return.
    #[must_use]
    pub fn peek(&self, n: usize) -> Option<&T> {
        if n >= self.len() {
            return None;
        }
        self.ring.peek(self.start - self.base + n)
    }

    /// Returns the retained unit with absolute index `index`, whether it is
    /// before or after the cursor.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.ring.peek(index.checked_sub(self.base)?)
    }

    /// Advances the cursor by `n` units (fewer if the buffer runs out) and
    /// returns how many were skipped.
    pub fn skip(&mut self, n: usize) -> usize {
        let n = n.min(self.len());
        self.start += n;
        n
    }

    /// Iterates over the units available for dequeue, cursor first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.ring.iter().skip(self.start - self.base)
    }

    /// Returns a value that [`restore`](Self::restore) can later rewind to.
    #[inline]
    #[must_use]
    pub fn checkpoint(&self) -> usize {
        self.start
    }

    /// Rewinds (or fast-forwards) the cursor to `checkpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckpointError::OutOfRange`] when `checkpoint` precedes the
    /// oldest retained unit or lies past the newest one. The cursor is left
    /// unchanged.
    pub fn restore(&mut self, checkpoint: usize) -> Result<(), CheckpointError> {
        self.check(checkpoint)?;
        trace!(trace, "token buffer restored {} -> {}", self.start, checkpoint);
        self.start = checkpoint;
        Ok(())
    }

    /// Succeeds exactly when [`restore`](Self::restore) would accept
    /// `checkpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckpointError::OutOfRange`] when `checkpoint` lies outside
    /// `oldest retained..=newest buffered`.
    pub fn check(&self, checkpoint: usize) -> Result<(), CheckpointError> {
        let (low, high) = (self.base, self.end());
        if (low..=high).contains(&checkpoint) {
            Ok(())
        } else {
            Err(CheckpointError::OutOfRange {
                checkpoint,
                low,
                high,
            })
        }
    }

    /// Releases every unit before the cursor.
    ///
    /// Checkpoints taken before the current cursor become invalid. Returns
    /// the number of units released.
    pub fn commit(&mut self) -> usize {
        let released = self.ring.skip(self.start - self.base);
        self.base = self.start;
        if released > 0 {
            trace!(trace, "token buffer released {released} units");
        }
        released
    }
}

#[cfg(test)]
mod tests;
