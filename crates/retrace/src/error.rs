use alloc::string::String;

use thiserror::Error;

/// Enqueue attempted on a [`RingQueue`](crate::RingQueue) at capacity.
///
/// The rejected element is handed back so the caller can retry against a
/// larger queue.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("ring queue is full (capacity {capacity})")]
pub struct QueueFull<T> {
    /// Capacity of the queue that refused the element.
    pub capacity: usize,
    /// The element that was not enqueued.
    pub rejected: T,
}

/// A checkpoint that does not name a retained position.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckpointError {
    /// The checkpoint lies before the oldest retained unit (it was released
    /// by a commit) or after the newest unit ever buffered.
    #[error("checkpoint {checkpoint} is outside the retained range {low}..={high}")]
    OutOfRange {
        /// The rejected checkpoint index.
        checkpoint: usize,
        /// Oldest index that can still be restored.
        low: usize,
        /// One past the newest buffered index.
        high: usize,
    },
    /// The checkpoint names a retained unit, but its byte offset is not the
    /// offset of that unit in this reader's text. It was taken from another
    /// reader or built by hand.
    #[error("checkpoint {checkpoint} claims byte offset {offset}, but that unit starts at {expected}")]
    Mismatch {
        /// The rejected checkpoint index.
        checkpoint: usize,
        /// Byte offset carried by the checkpoint.
        offset: usize,
        /// Byte offset of that unit in the text being read.
        expected: usize,
    },
}

/// A pattern that could not be compiled.
#[derive(Error, Debug, Clone)]
pub enum PatternError {
    /// The regular expression engine rejected the pattern.
    #[error("invalid pattern: {0}")]
    Build(regex_automata::meta::BuildError),
    /// A flag string contained a letter with no meaning.
    #[error("unknown pattern flag '{0}'")]
    UnknownFlag(char),
    /// A flag letter appeared twice.
    #[error("duplicate pattern flag '{0}' in {1:?}")]
    DuplicateFlag(char, String),
}

impl From<regex_automata::meta::BuildError> for PatternError {
    fn from(err: regex_automata::meta::BuildError) -> Self {
        PatternError::Build(err)
    }
}

/// Any failure surfaced by this crate.
///
/// Failed matches and end of input are never errors; they come back as
/// `None` or `false` from the matching primitives.
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// See [`CheckpointError`].
    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
    /// See [`PatternError`].
    #[error(transparent)]
    Pattern(#[from] PatternError),
}
