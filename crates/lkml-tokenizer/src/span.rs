//! Byte ranges into the source text.

use std::fmt;

/// A half-open byte range `start..end` in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Byte offset of the start (inclusive)
    pub start: u32,
    /// Byte offset of the end (exclusive)
    pub end: u32,
}

impl Span {
    #[inline]
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// An empty span at `pos`.
    #[inline]
    pub fn empty(pos: u32) -> Self {
        Self::new(pos, pos)
    }

    #[inline]
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Smallest span covering both `self` and `other`.
    #[inline]
    pub fn to(&self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// The text this span covers.
    #[inline]
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start as usize..self.end as usize]
    }

    /// 1-based line and column of the span start.
    pub fn line_col(&self, source: &str) -> (usize, usize) {
        let before = &source[..(self.start as usize).min(source.len())];
        let line = before.matches('\n').count() + 1;
        let col = before.rfind('\n').map_or(before.len(), |nl| before.len() - nl - 1) + 1;
        (line, col)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl From<Span> for std::ops::Range<usize> {
    fn from(span: Span) -> Self {
        span.start as usize..span.end as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col() {
        let source = "a: 1\nbb: 2\n";
        assert_eq!(Span::new(0, 1).line_col(source), (1, 1));
        assert_eq!(Span::new(5, 7).line_col(source), (2, 1));
        assert_eq!(Span::new(9, 10).line_col(source), (2, 5));
    }

    #[test]
    fn test_to_covers_both() {
        let span = Span::new(4, 6).to(Span::new(1, 2));
        assert_eq!(span, Span::new(1, 6));
        assert_eq!(span.len(), 5);
    }
}
