//! Reader: backtracking scanner over a resident text.
//!
//! What it does
//! - Pulls units (`char`s) from a one-shot iterator over the text, but only
//!   on demand. Every pulled unit goes into a [`TokenBuffer`] first, so it
//!   can be peeked, consumed, and replayed after a restore without touching
//!   the iterator again.
//! - Tracks `offset`: the byte offset just past the last consumed unit. The
//!   regex bridge anchors at this offset, so it must stay exact whether a
//!   unit came out of the buffer or straight from the iterator.
//!
//! Three regions of the text at any moment:
//!
//! ```text
//!   consumed          buffered, unconsumed     not yet pulled
//! |-----------------|------------------------|------------------|
//! 0              offset                 iterator position     len
//! ```
//!
//! Invariants
//! - `offset == sum(len_utf8)` of every unit consumed since the start (or
//!   since the restored checkpoint), so `&text[offset..]` is exactly the
//!   unconsumed remainder.
//! - A unit is pulled from the iterator at most once.
//! - Checkpoints carry both the buffer cursor and `offset`; restoring rolls
//!   back both.
//!
//! Grammar rules
//! - A rule is any function taking `&mut Reader` and returning `Option<T>`.
//!   A failing rule must leave the reader where it started; the reader does
//!   not do this on its own except inside [`Reader::attempt`].

use core::str::Chars;

use crate::{
    delimiter::Delimiter,
    error::CheckpointError,
    options::ReaderOptions,
    pattern::{Pattern, RegexMatch},
    token_buffer::TokenBuffer,
    trace::trace,
};

/// A reader position that [`Reader::restore`] can return to.
///
/// Only meaningful for the reader that produced it. Another reader rejects
/// it with [`CheckpointError::Mismatch`] unless the offsets happen to agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Checkpoint {
    cursor: usize,
    offset: usize,
}

impl Checkpoint {
    /// Number of units consumed when the checkpoint was taken.
    #[must_use]
    pub fn units(&self) -> usize {
        self.cursor
    }

    /// Byte offset into the text when the checkpoint was taken.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// Backtracking unit scanner for hand-written lexers and parsers.
///
/// ```rust
/// use retrace::Reader;
///
/// let mut reader = Reader::new("fetch http://x");
/// assert!(reader.match_string("fetch"));
/// assert_eq!(reader.offset(), 5);
/// assert_eq!(reader.skip_whitespace(), " ");
/// assert_eq!(reader.eat_until(char::is_whitespace), "http://x");
/// assert!(reader.is_at_end());
/// ```
#[derive(Debug, Clone)]
pub struct Reader<'src> {
    text: &'src str,
    units: Chars<'src>,
    buffer: TokenBuffer<char>,
    offset: usize,
    options: ReaderOptions,
}

impl<'src> Reader<'src> {
    /// Creates a reader with the default unit classes.
    #[must_use]
    pub fn new(text: &'src str) -> Self {
        Self::with_options(text, ReaderOptions::default())
    }

    /// Creates a reader with custom unit classes.
    #[must_use]
    pub fn with_options(text: &'src str, options: ReaderOptions) -> Self {
        Self {
            text,
            units: text.chars(),
            buffer: TokenBuffer::new(),
            offset: 0,
            options,
        }
    }

    /// The unit classes in use.
    #[must_use]
    pub fn options(&self) -> &ReaderOptions {
        &self.options
    }

    /// The whole text, consumed or not.
    #[must_use]
    pub fn text(&self) -> &'src str {
        self.text
    }

    /// Byte offset just past the last consumed unit.
    #[inline]
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The unconsumed remainder of the text.
    #[must_use]
    pub fn rest(&self) -> &'src str {
        &self.text[self.offset..]
    }

    /// `true` once every unit has been consumed.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.offset == self.text.len()
    }

    /// Units pulled from the text and held for lookahead or restoring.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.buffer.retained()
    }

    /// Moves one unit from the iterator into the buffer.
    fn pull(&mut self) -> bool {
        match self.units.next() {
            Some(ch) => {
                self.buffer.enqueue(ch);
                true
            }
            None => false,
        }
    }

    /// Consumes and returns the next unit, or `None` at end of text.
    pub fn eat(&mut self) -> Option<char> {
        if self.buffer.is_empty() && !self.pull() {
            return None;
        }
        let ch = *self.buffer.dequeue()?;
        self.offset += ch.len_utf8();
        Some(ch)
    }

    /// Returns the next unit without consuming it.
    #[inline]
    pub fn peek(&mut self) -> Option<char> {
        self.peek_nth(0)
    }

    /// Returns the unit `n` positions ahead without consuming anything.
    /// `peek_nth(0)` is what [`eat`](Self::eat) would return.
    pub fn peek_nth(&mut self, n: usize) -> Option<char> {
        while self.buffer.len() <= n {
            if !self.pull() {
                return None;
            }
        }
        self.buffer.peek(n).copied()
    }

    /// Consumes up to `n` units and returns how many were consumed.
    pub fn skip(&mut self, n: usize) -> usize {
        let buffered = n.min(self.buffer.len());
        let bytes: usize = self
            .buffer
            .iter()
            .take(buffered)
            .map(|ch| ch.len_utf8())
            .sum();
        self.buffer.skip(buffered);
        self.offset += bytes;

        let mut skipped = buffered;
        while skipped < n && self.eat().is_some() {
            skipped += 1;
        }
        skipped
    }

    /// Consumes the next unit if it is `ch`.
    pub fn match_char(&mut self, ch: char) -> Option<char> {
        if self.peek() == Some(ch) {
            return self.eat();
        }
        None
    }

    /// Consumes units while `delimiter` holds for the next one and returns
    /// them as a slice of the text.
    pub fn eat_while(&mut self, delimiter: impl Delimiter) -> &'src str {
        let start = self.offset;
        while self.peek().is_some_and(|ch| delimiter.is_delimiter(ch)) {
            self.eat();
        }
        &self.text[start..self.offset]
    }

    /// Consumes units up to (not including) the first one that satisfies
    /// `delimiter`, or to the end of text, and returns them.
    pub fn eat_until(&mut self, delimiter: impl Delimiter) -> &'src str {
        let start = self.offset;
        while self.peek().is_some_and(|ch| !delimiter.is_delimiter(ch)) {
            self.eat();
        }
        &self.text[start..self.offset]
    }

    /// Checks whether the upcoming units spell `s`, without consuming.
    ///
    /// Returns the number of units in `s` on a match.
    pub fn has_string(&mut self, s: &str) -> Option<usize> {
        let mut count = 0;
        for ch in s.chars() {
            if self.peek_nth(count) != Some(ch) {
                return None;
            }
            count += 1;
        }
        Some(count)
    }

    /// Consumes `s` if the upcoming units spell it.
    pub fn match_string(&mut self, s: &str) -> bool {
        match self.has_string(s) {
            Some(n) => {
                self.skip(n);
                true
            }
            None => false,
        }
    }

    /// Consumes `s` if the upcoming units spell it and the unit right after
    /// it satisfies `delimiter`. The delimiter itself is left unconsumed.
    ///
    /// End of text does not count as a delimiter; see
    /// [`match_word`](Self::match_word) for keyword matching that accepts
    /// it.
    ///
    /// ```rust
    /// use retrace::Reader;
    ///
    /// let mut reader = Reader::new("ifx then");
    /// assert!(!reader.match_delimited("if", [' ', '(']));
    /// assert_eq!(reader.offset(), 0);
    ///
    /// let mut reader = Reader::new("if (x)");
    /// assert!(reader.match_delimited("if", [' ', '(']));
    /// assert_eq!(reader.peek(), Some(' '));
    /// ```
    pub fn match_delimited(&mut self, s: &str, delimiter: impl Delimiter) -> bool {
        let Some(n) = self.has_string(s) else {
            return false;
        };
        match self.peek_nth(n) {
            Some(after) if delimiter.is_delimiter(after) => {
                self.skip(n);
                true
            }
            _ => false,
        }
    }

    /// Consumes `keyword` if it is not immediately followed by a word unit.
    ///
    /// Unlike [`match_delimited`](Self::match_delimited), end of text counts
    /// as a boundary.
    pub fn match_word(&mut self, keyword: &str) -> bool {
        let Some(n) = self.has_string(keyword) else {
            return false;
        };
        if self.peek_nth(n).is_some_and(|after| self.is_word(after)) {
            return false;
        }
        self.skip(n);
        true
    }

    /// Matches `pattern` starting exactly at the current offset and consumes
    /// the matched text.
    ///
    /// The pattern never searches forward: if it cannot match right here the
    /// result is `None` and nothing is consumed. Offsets in the returned
    /// match refer to the whole text.
    ///
    /// ```rust
    /// use retrace::{Pattern, Reader};
    ///
    /// let number = Pattern::new(r"(\d+)(?:\.(\d+))?").unwrap();
    /// let mut reader = Reader::new("x 3.14");
    /// assert!(reader.match_regex(&number).is_none());
    /// reader.skip(2);
    /// let m = reader.match_regex(&number).unwrap();
    /// assert_eq!(m.get(2), Some("14"));
    /// assert_eq!(reader.offset(), 6);
    /// ```
    pub fn match_regex(&mut self, pattern: &Pattern) -> Option<RegexMatch<'src>> {
        let found = pattern.match_at(self.text, self.offset)?;
        let end = found.end();
        while self.offset < end && self.eat().is_some() {}
        debug_assert_eq!(self.offset, end, "match ended inside a unit");
        Some(found)
    }

    /// Returns the current position for a later [`restore`](Self::restore).
    #[must_use]
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            cursor: self.buffer.checkpoint(),
            offset: self.offset,
        }
    }

    /// Returns to a position taken with [`checkpoint`](Self::checkpoint).
    ///
    /// # Errors
    ///
    /// Returns [`CheckpointError::OutOfRange`] if the checkpoint was released
    /// by [`commit`](Self::commit) or lies past the buffered units, and
    /// [`CheckpointError::Mismatch`] if its byte offset disagrees with this
    /// reader's text (a checkpoint from another reader, or a forged one).
    /// The position is left unchanged either way.
    pub fn restore(&mut self, checkpoint: Checkpoint) -> Result<(), CheckpointError> {
        let Checkpoint { cursor, offset } = checkpoint;
        self.buffer.check(cursor)?;
        let expected = self.offset_of(cursor);
        if offset != expected {
            return Err(CheckpointError::Mismatch {
                checkpoint: cursor,
                offset,
                expected,
            });
        }
        self.buffer.restore(cursor)?;
        trace!(trace, "reader offset restored {} -> {offset}", self.offset);
        self.offset = offset;
        Ok(())
    }

    /// Byte offset of the retained unit with index `cursor`, measured from
    /// the current position. `cursor` must pass `TokenBuffer::check`.
    fn offset_of(&self, cursor: usize) -> usize {
        let here = self.buffer.checkpoint();
        let width = |from: usize, to: usize| -> usize {
            (from..to)
                .filter_map(|i| self.buffer.get(i))
                .map(|ch| ch.len_utf8())
                .sum()
        };
        if cursor <= here {
            self.offset - width(cursor, here)
        } else {
            self.offset + width(here, cursor)
        }
    }

    /// Releases buffered units before the current position.
    ///
    /// Every checkpoint taken before this point becomes invalid. Returns the
    /// number of units released.
    pub fn commit(&mut self) -> usize {
        self.buffer.commit()
    }

    /// Runs `rule` and rewinds to where it started if it returns `None`.
    ///
    /// `rule` must not [`commit`](Self::commit) past its own start, since
    /// that releases the position to rewind to.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `rule` fails after committing past its
    /// start. Release builds do not panic; the reader then stays wherever
    /// `rule` left it.
    ///
    /// ```rust
    /// use retrace::Reader;
    ///
    /// let mut reader = Reader::new("let x");
    /// let parsed = reader.attempt(|r| {
    ///     r.match_word("let").then_some(())?;
    ///     r.skip_whitespace();
    ///     r.match_word("mut").then_some("mutable")
    /// });
    /// assert_eq!(parsed, None);
    /// assert_eq!(reader.offset(), 0);
    /// ```
    pub fn attempt<T>(&mut self, rule: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let start = self.checkpoint();
        let result = rule(self);
        if result.is_none() {
            let restored = self.restore(start);
            debug_assert!(restored.is_ok(), "rule committed past its own start");
        }
        result
    }

    /// Whether `ch` belongs to the word class.
    #[must_use]
    pub fn is_word(&self, ch: char) -> bool {
        self.options.word_pattern.matches_unit(ch)
    }

    /// Whether `ch` belongs to the whitespace class.
    #[must_use]
    pub fn is_whitespace(&self, ch: char) -> bool {
        self.options.whitespace_pattern.matches_unit(ch)
    }

    /// Consumes a run of whitespace units and returns it.
    pub fn skip_whitespace(&mut self) -> &'src str {
        let whitespace = self.options.whitespace_pattern.clone();
        self.eat_while(&whitespace)
    }

    /// Consumes a run of word units and returns it.
    pub fn eat_word(&mut self) -> &'src str {
        let word = self.options.word_pattern.clone();
        self.eat_while(&word)
    }

    /// Panics unless the consumed prefix, the buffered lookahead and the
    /// unread source together cover the text exactly.
    #[cfg(any(test, feature = "fuzzing"))]
    #[doc(hidden)]
    pub fn assert_consistent(&self) {
        let pending: usize = self.buffer.iter().map(|ch| ch.len_utf8()).sum();
        assert!(self.text.is_char_boundary(self.offset));
        assert_eq!(
            self.offset + pending + self.units.as_str().len(),
            self.text.len(),
            "offset {} with {pending} buffered bytes",
            self.offset,
        );
        assert!(
            self.rest()
                .chars()
                .zip(self.buffer.iter())
                .all(|(ch, buffered)| ch == *buffered)
        );
    }
}
