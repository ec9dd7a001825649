use crate::pattern::Pattern;

/// A predicate over a single unit.
///
/// Used by [`Reader::eat_while`](crate::Reader::eat_while),
/// [`Reader::eat_until`](crate::Reader::eat_until) and
/// [`Reader::match_delimited`](crate::Reader::match_delimited) to decide
/// where a run of units stops.
///
/// ```rust
/// use retrace::Delimiter;
///
/// assert!(' '.is_delimiter(' '));
/// assert!([' ', '('].is_delimiter('('));
/// assert!(" \t".is_delimiter('\t'));
/// assert!((|c: char| c.is_ascii_digit()).is_delimiter('7'));
/// ```
pub trait Delimiter {
    /// Whether `ch` satisfies the predicate.
    fn is_delimiter(&self, ch: char) -> bool;
}

impl Delimiter for char {
    #[inline]
    fn is_delimiter(&self, ch: char) -> bool {
        *self == ch
    }
}

/// Any of the listed units.
impl Delimiter for [char] {
    #[inline]
    fn is_delimiter(&self, ch: char) -> bool {
        self.contains(&ch)
    }
}

impl<const N: usize> Delimiter for [char; N] {
    #[inline]
    fn is_delimiter(&self, ch: char) -> bool {
        self.contains(&ch)
    }
}

/// Any character of the string.
impl Delimiter for str {
    #[inline]
    fn is_delimiter(&self, ch: char) -> bool {
        self.contains(ch)
    }
}

/// The pattern must match the unit entirely.
impl Delimiter for Pattern {
    #[inline]
    fn is_delimiter(&self, ch: char) -> bool {
        self.matches_unit(ch)
    }
}

impl<F> Delimiter for F
where
    F: Fn(char) -> bool,
{
    #[inline]
    fn is_delimiter(&self, ch: char) -> bool {
        self(ch)
    }
}

macro_rules! delimiter_by_ref {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Delimiter for &$ty {
                #[inline]
                fn is_delimiter(&self, ch: char) -> bool {
                    (**self).is_delimiter(ch)
                }
            }
        )*
    };
}

delimiter_by_ref!(char, [char], str, Pattern);

impl<const N: usize> Delimiter for &[char; N] {
    #[inline]
    fn is_delimiter(&self, ch: char) -> bool {
        self.contains(&ch)
    }
}
