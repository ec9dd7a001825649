use crate::{error::PatternError, pattern::Pattern};

/// Default class of units that make up a word: letters, decimal digits, `_`
/// and `$`.
pub const DEFAULT_WORD_PATTERN: &str = r"[\p{L}\p{Nd}_$]";

/// Default class of whitespace units.
pub const DEFAULT_WHITESPACE_PATTERN: &str = r"\s";

/// Unit classification used by a [`Reader`](crate::Reader).
///
/// Each pattern is matched against a single unit and must consume all of
/// it. Only the word and whitespace classes are configurable; everything
/// else a grammar needs is expressed through the matching primitives. The
/// non-word class is always the complement of `word_pattern`.
///
/// # Examples
///
/// ```rust
/// use retrace::{Pattern, Reader, ReaderOptions};
///
/// let options = ReaderOptions::default()
///     .with_word_pattern(Pattern::new(r"[a-z-]").unwrap());
/// let mut reader = Reader::with_options("kebab-case rest", options);
/// assert_eq!(reader.eat_word(), "kebab-case");
/// ```
#[derive(Debug, Clone)]
pub struct ReaderOptions {
    /// Matches one word unit.
    ///
    /// # Default
    ///
    /// [`DEFAULT_WORD_PATTERN`]
    pub word_pattern: Pattern,

    /// Matches one whitespace unit.
    ///
    /// # Default
    ///
    /// [`DEFAULT_WHITESPACE_PATTERN`]
    pub whitespace_pattern: Pattern,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            word_pattern: builtin(DEFAULT_WORD_PATTERN),
            whitespace_pattern: builtin(DEFAULT_WHITESPACE_PATTERN),
        }
    }
}

/// Compiles one of the default classes.
fn builtin(source: &str) -> Pattern {
    match Pattern::new(source) {
        Ok(pattern) => pattern,
        Err(err) => unreachable!("built-in pattern {source:?} is invalid: {err}"),
    }
}

impl ReaderOptions {
    /// Builds options from pattern sources, compiling both.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if either source fails to compile.
    pub fn from_sources(word: &str, whitespace: &str) -> Result<Self, PatternError> {
        Ok(Self {
            word_pattern: Pattern::new(word)?,
            whitespace_pattern: Pattern::new(whitespace)?,
        })
    }

    /// Replaces the word class.
    #[must_use]
    pub fn with_word_pattern(mut self, pattern: Pattern) -> Self {
        self.word_pattern = pattern;
        self
    }

    /// Replaces the whitespace class.
    #[must_use]
    pub fn with_whitespace_pattern(mut self, pattern: Pattern) -> Self {
        self.whitespace_pattern = pattern;
        self
    }
}
