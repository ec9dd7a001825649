//! Regular-expression bridge.
//!
//! A [`Pattern`] is compiled once and can be matched at any byte offset of a
//! text. Reader matches are always anchored ("sticky"): the engine is told to
//! match starting exactly at the offset and never searches forward. Anchoring
//! is a per-search setting, so the compiled pattern and its flags are never
//! rewritten.
//!
//! The engine sees the whole text, so look-around assertions such as `^`,
//! `\b` or `(?m:^)` observe the characters before the offset.

use alloc::{borrow::ToOwned, string::String};
use core::{fmt, ops::Range, str::FromStr};

use regex_automata::{
    Anchored, Input,
    meta::Regex,
    util::{captures::Captures, syntax},
};

use crate::error::PatternError;

/// Compilation flags for a [`Pattern`].
///
/// Parses from a string of flag letters:
///
/// | letter | flag |
/// |--------|------|
/// | `i` | `case_insensitive` |
/// | `m` | `multi_line` |
/// | `s` | `dot_matches_new_line` |
/// | `x` | `ignore_whitespace` |
/// | `R` | `crlf` |
/// | `U` | `swap_greed` |
/// | `u` | `unicode` (already the default) |
///
/// `g` and `y` select scanning modes rather than syntax. They are accepted
/// and ignored since every reader match is single-shot and anchored.
///
/// ```rust
/// use retrace::PatternFlags;
///
/// let flags: PatternFlags = "giy".parse().unwrap();
/// assert!(flags.case_insensitive);
/// assert!(!flags.multi_line);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[allow(clippy::struct_excessive_bools)]
pub struct PatternFlags {
    /// Letters match regardless of case.
    pub case_insensitive: bool,
    /// `^` and `$` also match at line boundaries.
    pub multi_line: bool,
    /// `.` also matches `\n`.
    pub dot_matches_new_line: bool,
    /// Whitespace and `#` comments in the pattern are ignored.
    pub ignore_whitespace: bool,
    /// Line anchors in multi-line mode treat `\r` as a terminator too.
    pub crlf: bool,
    /// `*` is lazy and `*?` is greedy.
    pub swap_greed: bool,
    /// Classes such as `\w` and `\s` are Unicode-aware.
    ///
    /// # Default
    ///
    /// `true`
    pub unicode: bool,
}

impl Default for PatternFlags {
    fn default() -> Self {
        Self {
            case_insensitive: false,
            multi_line: false,
            dot_matches_new_line: false,
            ignore_whitespace: false,
            crlf: false,
            swap_greed: false,
            unicode: true,
        }
    }
}

impl PatternFlags {
    fn syntax(self) -> syntax::Config {
        syntax::Config::new()
            .case_insensitive(self.case_insensitive)
            .multi_line(self.multi_line)
            .dot_matches_new_line(self.dot_matches_new_line)
            .ignore_whitespace(self.ignore_whitespace)
            .crlf(self.crlf)
            .swap_greed(self.swap_greed)
            .unicode(self.unicode)
    }
}

impl FromStr for PatternFlags {
    type Err = PatternError;

    fn from_str(letters: &str) -> Result<Self, Self::Err> {
        let mut flags = PatternFlags::default();
        let mut seen = String::new();
        for letter in letters.chars() {
            if seen.contains(letter) {
                return Err(PatternError::DuplicateFlag(letter, letters.to_owned()));
            }
            seen.push(letter);
            match letter {
                'i' => flags.case_insensitive = true,
                'm' => flags.multi_line = true,
                's' => flags.dot_matches_new_line = true,
                'x' => flags.ignore_whitespace = true,
                'R' => flags.crlf = true,
                'U' => flags.swap_greed = true,
                'u' => flags.unicode = true,
                'g' | 'y' => {}
                other => return Err(PatternError::UnknownFlag(other)),
            }
        }
        Ok(flags)
    }
}

/// A compiled regular expression usable with
/// [`Reader::match_regex`](crate::Reader::match_regex) and as a
/// [`Delimiter`](crate::Delimiter).
///
/// Cloning is cheap; the compiled program is shared.
#[derive(Clone)]
pub struct Pattern {
    regex: Regex,
    source: String,
    flags: PatternFlags,
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("source", &self.source)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Pattern {
    /// Compiles `source` with default flags.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::Build`] if the expression is invalid.
    pub fn new(source: &str) -> Result<Self, PatternError> {
        Self::with_flags(source, PatternFlags::default())
    }

    /// Compiles `source` with the given flags.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::Build`] if the expression is invalid.
    pub fn with_flags(source: &str, flags: PatternFlags) -> Result<Self, PatternError> {
        let regex = Regex::builder().syntax(flags.syntax()).build(source)?;
        Ok(Self {
            regex,
            source: source.to_owned(),
            flags,
        })
    }

    /// Compiles `source` with flags given as letters (see [`PatternFlags`]).
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] for an invalid expression or flag string.
    pub fn with_flag_letters(source: &str, letters: &str) -> Result<Self, PatternError> {
        Self::with_flags(source, letters.parse()?)
    }

    /// The expression as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// The flags the expression was compiled with.
    #[must_use]
    pub fn flags(&self) -> PatternFlags {
        self.flags
    }

    /// Number of capture groups, including the implicit group 0.
    #[must_use]
    pub fn group_len(&self) -> usize {
        self.regex.group_info().group_len(regex_automata::PatternID::ZERO)
    }

    /// Matches starting exactly at byte `offset` of `text`.
    ///
    /// Returns `None` if the pattern does not match there; it never looks
    /// for a match further along.
    ///
    /// # Panics
    ///
    /// Panics if `offset > text.len()`.
    #[must_use]
    pub fn match_at<'t>(&self, text: &'t str, offset: usize) -> Option<RegexMatch<'t>> {
        let input = Input::new(text).range(offset..).anchored(Anchored::Yes);
        let mut captures = self.regex.create_captures();
        self.regex.search_captures(&input, &mut captures);
        if !captures.is_match() {
            return None;
        }
        Some(RegexMatch { text, captures })
    }

    /// `true` when the pattern matches all of `ch` and nothing else.
    #[must_use]
    pub fn matches_unit(&self, ch: char) -> bool {
        let mut buf = [0u8; 4];
        let unit = ch.encode_utf8(&mut buf);
        let input = Input::new(unit.as_bytes()).anchored(Anchored::Yes);
        self.regex
            .search(&input)
            .is_some_and(|m| m.end() == unit.len())
    }
}

/// A successful anchored match: the matched text plus its capture groups.
///
/// Offsets are byte offsets into the whole text, not into the remainder.
#[derive(Clone)]
pub struct RegexMatch<'t> {
    text: &'t str,
    captures: Captures,
}

impl fmt::Debug for RegexMatch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for i in 0..self.len() {
            list.entry(&self.get(i));
        }
        list.finish()
    }
}

impl<'t> RegexMatch<'t> {
    /// Byte range of the whole match.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.span(0).unwrap_or(0..0)
    }

    /// Byte offset where the match starts.
    #[must_use]
    pub fn start(&self) -> usize {
        self.range().start
    }

    /// Byte offset one past the end of the match.
    #[must_use]
    pub fn end(&self) -> usize {
        self.range().end
    }

    /// The matched text.
    #[must_use]
    pub fn as_str(&self) -> &'t str {
        &self.text[self.range()]
    }

    /// Number of groups, including group 0 (the whole match).
    #[must_use]
    pub fn len(&self) -> usize {
        self.captures.group_len()
    }

    /// Always `false`; group 0 is present in every match.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    fn span(&self, index: usize) -> Option<Range<usize>> {
        self.captures.get_group(index).map(|span| span.range())
    }

    /// Text of group `index`, or `None` if that group did not participate.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&'t str> {
        self.span(index).map(|r| &self.text[r])
    }

    /// Text of the group called `name`, or `None` if there is no such group
    /// or it did not participate.
    #[must_use]
    pub fn name(&self, name: &str) -> Option<&'t str> {
        self.captures
            .get_group_by_name(name)
            .map(|span| &self.text[span.range()])
    }

    /// Byte range of group `index`.
    #[must_use]
    pub fn group_range(&self, index: usize) -> Option<Range<usize>> {
        self.span(index)
    }
}

#[cfg(test)]
mod tests;
