//! Source text bookkeeping for diagnostics.

use core::fmt;
use std::cell::RefCell;

use crate::span::Span;

#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct SpanLocation {
    /// Where the span starts,
    pub start: Location,
    /// Where the span ends,
    pub end: Location,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

struct SourceInfo {
    lines: Vec<Span>,
}

impl SourceInfo {
    fn new(source: &str) -> Self {
        let mut lines = Vec::new();
        let mut iter = source.char_indices().peekable();
        let mut offset = 0;
        while let Some((idx, c)) = iter.next() {
            match c {
                '\n' => {
                    lines.push(Span::from(offset..idx));
                    offset = idx + 1;
                }
                '\r' => {
                    lines.push(Span::from(offset..idx));
                    if let Some((_, '\n')) = iter.peek() {
                        iter.next();
                        offset = idx + 2;
                    } else {
                        offset = idx + 1;
                    }
                }
                _ => {}
            }
        }
        if offset < source.len() {
            lines.push(Span::from(offset..source.len()));
        }

        Self { lines }
    }
}

/// A source file with its name, used to resolve spans to human readable
/// locations.
pub struct Source {
    name: Option<String>,
    text: String,
    info: RefCell<Option<Box<SourceInfo>>>,
}

impl Source {
    pub fn new<N: Into<String>, S: Into<String>>(text: S, name: Option<N>) -> Self {
        Source {
            name: name.map(|x| x.into()),
            text: text.into(),
            info: RefCell::new(None),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the span for a given line.
    pub fn line_span(&self, line: usize) -> Option<Span> {
        let mut info = self.info.borrow_mut();
        let info = info.get_or_insert_with(|| Box::new(SourceInfo::new(&self.text)));
        info.lines.get(line).cloned()
    }

    /// Returns the start and end location for a given span.
    pub fn locate_span(&self, span: Span) -> Option<SpanLocation> {
        let mut info = self.info.borrow_mut();
        let info = info.get_or_insert_with(|| Box::new(SourceInfo::new(&self.text)));

        let locate = |offset: usize| -> Option<Location> {
            let (line, line_span) = info
                .lines
                .iter()
                .enumerate()
                .find(|(_, x)| x.contains_offset(offset))?;
            let column = self.text[line_span.offset()..offset].chars().count();
            Some(Location {
                line: line.try_into().ok()?,
                column: column.try_into().ok()?,
            })
        };

        Some(SpanLocation {
            start: locate(span.offset())?,
            end: locate(span.offset() + span.size())?,
        })
    }

    /// Renders `name:line:column` for the start of the given span.
    pub fn render_location(&self, span: Span) -> RenderLocation<'_> {
        RenderLocation { source: self, span }
    }
}

pub struct RenderLocation<'a> {
    source: &'a Source,
    span: Span,
}

impl fmt::Display for RenderLocation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.source.name().unwrap_or("<anonymous>");
        if let Some(loc) = self.source.locate_span(self.span) {
            write!(f, "{}:{}", name, loc.start)
        } else {
            write!(f, "{}", name)
        }
    }
}
