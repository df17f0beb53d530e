use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Pos {
    pub lineno: usize,
    pub col: usize,
    pub offset: usize,
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

/// Where a symbol is declared. `None` is the sentinel written for symbols
/// that have no declaration site (metadata, synthesized members).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    #[default]
    None,
    Source { path: String, span: Span },
}

impl Location {
    pub fn source(path: impl Into<String>, span: Span) -> Location {
        Location::Source {
            path: path.into(),
            span,
        }
    }

    pub fn path(&self) -> Option<&str> {
        match self {
            Location::Source { path, .. } => Some(path),
            Location::None => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Location::None)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Location::None => write!(f, "<no location>"),
            Location::Source { path, span } => write!(f, "{}:{}", path, span),
        }
    }
}

impl Span {
    pub fn new(start: Pos, end: Pos) -> Span {
        Span { start, end }
    }

    /// A span covering `len` bytes of a single line.
    pub fn on_line(lineno: usize, col: usize, offset: usize, len: usize) -> Span {
        Span {
            start: Pos {
                lineno,
                col,
                offset,
            },
            end: Pos {
                lineno,
                col: col + len,
                offset: offset + len,
            },
        }
    }

    pub fn lines(&self) -> usize {
        (self.end.lineno - self.start.lineno) + 1
    }

    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Create a new span with the start of this one and end of another one
    pub fn extend_to(&self, other: &Span) -> Span {
        Span {
            start: self.start,
            end: other.end,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.start)
    }
}

impl From<Pos> for Span {
    fn from(p: Pos) -> Span {
        Span { start: p, end: p }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.lineno + 1, self.col + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_one_based_positions() {
        let loc = Location::source("src/point.ray", Span::on_line(2, 4, 40, 3));
        assert_eq!(loc.to_string(), "src/point.ray:3:5");
        assert_eq!(Location::None.to_string(), "<no location>");
    }

    #[test]
    fn single_line_span_measures() {
        let span = Span::on_line(0, 0, 10, 5);
        assert_eq!(span.len(), 5);
        assert_eq!(span.lines(), 1);
        assert!(!span.is_empty());
    }
}
