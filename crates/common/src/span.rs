//! Spans and span related accessories.

use std::ops::Range;

/// A byte range into a source text, attached to syntax nodes for diagnostics.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash, Default)]
pub struct Span {
    /// The offset into the source text.
    offset: u32,
    /// The size of the span from the offset.
    size: u32,
}

impl Span {
    pub fn new(offset: usize, size: usize) -> Span {
        let offset = offset.try_into().expect("offset did not fit into u32");
        let size = size.try_into().expect("size did not fit into u32");

        Span { offset, size }
    }

    pub fn from_range(range: Range<usize>) -> Span {
        Self::new(range.start, range.end - range.start)
    }

    pub fn offset(&self) -> usize {
        self.offset as usize
    }

    pub fn size(&self) -> usize {
        self.size as usize
    }

    /// Checks whether the span contains the given offset.
    pub fn contains_offset(&self, offset: usize) -> bool {
        self.offset() <= offset && offset <= self.offset() + self.size()
    }

    /// Checks whether a span contains an other span.
    pub fn contains(&self, other: &Self) -> bool {
        self.offset <= other.offset
            && (self.offset as usize + self.size as usize)
                >= (other.offset as usize + other.size as usize)
    }

    /// Create a span that covers both spans.
    pub fn covers(&self, other: &Self) -> Self {
        if self.offset < other.offset {
            let diff = other.offset - self.offset;
            let size = (diff + other.size).max(self.size);
            Self {
                offset: self.offset,
                size,
            }
        } else {
            let diff = self.offset - other.offset;
            let size = (diff + self.size).max(other.size);
            Self {
                offset: other.offset,
                size,
            }
        }
    }
}

impl From<Range<usize>> for Span {
    fn from(value: Range<usize>) -> Self {
        Span::from_range(value)
    }
}
