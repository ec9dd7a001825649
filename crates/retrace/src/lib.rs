//! Backtracking unit scanner for hand-written lexers and recursive-descent
//! parsers: unbounded lookahead, checkpoint/restore, literal and delimited
//! matching, and regular expressions anchored at the current position.

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod delimiter;
mod error;
mod options;
mod pattern;
mod reader;
mod ring;
mod token_buffer;
mod trace;

pub use delimiter::Delimiter;
pub use error::{CheckpointError, Error, PatternError, QueueFull};
pub use options::{DEFAULT_WHITESPACE_PATTERN, DEFAULT_WORD_PATTERN, ReaderOptions};
pub use pattern::{Pattern, PatternFlags, RegexMatch};
pub use reader::{Checkpoint, Reader};
pub use ring::{Iter as RingIter, RingQueue};
pub use token_buffer::TokenBuffer;
