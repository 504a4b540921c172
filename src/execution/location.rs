// Source spans highlighted by the program counter

use std::fmt;

/// A highlighted span of source code: one line, from `start` up to `end`
/// (exclusive). `end == None` runs to the end of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    pub line: usize,
    pub start: usize,
    pub end: Option<usize>,
}

impl Location {
    pub fn new(line: usize, start: usize, end: Option<usize>) -> Self {
        Self { line, start, end }
    }

    /// The whole of `line` from `start`
    pub fn line(line: usize, start: usize) -> Self {
        Self::new(line, start, None)
    }

    /// Column range this span covers within a line of `line_len` characters
    pub fn columns(&self, line_len: usize) -> (usize, usize) {
        let end = self.end.unwrap_or(line_len).min(line_len);
        (self.start.min(end), end)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) => write!(f, "{}:{}..{}", self.line, self.start, end),
            None => write!(f, "{}:{}..", self.line, self.start),
        }
    }
}
