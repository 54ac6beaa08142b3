use serde::Deserialize;
use serde::Serialize;

/// A half-open byte range `[start, start + length)` within a text document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
    start: u32,
    length: u32,
}

impl Span {
    #[must_use]
    pub fn new(start: u32, length: u32) -> Self {
        Self { start, length }
    }

    #[must_use]
    pub fn from_parts(start: usize, length: usize) -> Self {
        let start_u32 = u32::try_from(start).unwrap_or(u32::MAX);
        let length_u32 = u32::try_from(length).unwrap_or(u32::MAX.saturating_sub(start_u32));
        Span::new(start_u32, length_u32)
    }

    /// Construct a span from integer bounds expressed as byte offsets.
    #[must_use]
    pub fn from_bounds(start: usize, end: usize) -> Self {
        Self::from_parts(start, end.saturating_sub(start))
    }

    /// An empty span positioned at `offset`.
    #[must_use]
    pub fn empty(offset: usize) -> Self {
        Self::from_parts(offset, 0)
    }

    #[must_use]
    pub fn start(self) -> u32 {
        self.start
    }

    #[must_use]
    pub fn start_usize(self) -> usize {
        self.start as usize
    }

    #[must_use]
    pub fn end(self) -> u32 {
        self.start + self.length
    }

    #[must_use]
    pub fn end_usize(self) -> usize {
        self.end() as usize
    }

    #[must_use]
    pub fn length(self) -> u32 {
        self.length
    }

    #[must_use]
    pub fn length_usize(self) -> usize {
        self.length as usize
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.length == 0
    }

    #[must_use]
    pub fn as_range(self) -> std::ops::Range<usize> {
        self.start_usize()..self.end_usize()
    }

    /// Whether `offset` lies inside the span. The end offset is exclusive.
    #[must_use]
    pub fn contains(self, offset: u32) -> bool {
        offset >= self.start && offset < self.end()
    }

    /// Whether `other` lies entirely within this span.
    #[must_use]
    pub fn contains_span(self, other: Span) -> bool {
        other.start >= self.start && other.end() <= self.end()
    }

    /// Whether the two spans share at least one byte.
    #[must_use]
    pub fn overlaps(self, other: Span) -> bool {
        self.start < other.end() && other.start < self.end()
    }

    /// Like [`Span::overlaps`], but spans that merely touch also count.
    ///
    /// Empty spans (insertions) touch a span when they sit on either boundary.
    #[must_use]
    pub fn intersects_or_touches(self, other: Span) -> bool {
        self.start <= other.end() && other.start <= self.end()
    }

    /// Smallest span covering both spans.
    #[must_use]
    pub fn cover(self, other: Span) -> Span {
        let start = self.start.min(other.start);
        let end = self.end().max(other.end());
        Span::new(start, end - start)
    }

    #[must_use]
    pub fn shift(self, delta: i64) -> Span {
        let start = i64::from(self.start).saturating_add(delta).max(0);
        Span::new(u32::try_from(start).unwrap_or(u32::MAX), self.length)
    }

    #[must_use]
    pub fn with_length(self, length: u32) -> Span {
        Span::new(self.start, length)
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Self {
        Span::from_bounds(range.start, range.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_end_exclusive() {
        let span = Span::new(4, 3);
        assert!(span.contains(4));
        assert!(span.contains(6));
        assert!(!span.contains(7));
    }

    #[test]
    fn insertion_touches_neighbour() {
        let insertion = Span::empty(10);
        let block = Span::new(4, 6);
        assert!(!block.overlaps(insertion));
        assert!(block.intersects_or_touches(insertion));
    }

    #[test]
    fn cover_spans_both() {
        let a = Span::new(2, 3);
        let b = Span::new(10, 1);
        assert_eq!(a.cover(b), Span::new(2, 9));
    }

    #[test]
    fn shift_saturates_at_zero() {
        assert_eq!(Span::new(3, 2).shift(-10), Span::new(0, 2));
        assert_eq!(Span::new(3, 2).shift(4), Span::new(7, 2));
    }
}
