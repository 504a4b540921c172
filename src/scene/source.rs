//! Source listing shown next to a scene
//!
//! Scenes assemble their listing block by block and keep the 1-based line
//! number of each block, so locations can be computed from the text instead
//! of hard-coded column numbers.

use super::errors::TraceError;
use crate::execution::location::Location;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceText {
    lines: Vec<String>,
}

impl SourceText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a block of lines, returning the line number of its first line
    pub fn push_block<S: AsRef<str>>(&mut self, block: &[S]) -> usize {
        let first = self.lines.len() + 1;
        self.lines
            .extend(block.iter().map(|line| line.as_ref().to_string()));
        first
    }

    /// Append a single line, returning its line number
    pub fn push_line(&mut self, line: impl Into<String>) -> usize {
        self.lines.push(line.into());
        self.lines.len()
    }

    pub fn blank_line(&mut self) {
        self.lines.push(String::new());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Text of a 1-based line
    pub fn line(&self, line: usize) -> Option<&str> {
        line.checked_sub(1)
            .and_then(|i| self.lines.get(i))
            .map(|s| s.as_str())
    }

    /// Span of the first occurrence of `needle` on `line`
    pub fn locate(&self, line: usize, needle: &str) -> Result<Location, TraceError> {
        let text = self.line_or_err(line)?;
        let start = text.find(needle).ok_or_else(|| TraceError::InvalidConfig {
            message: format!("'{}' does not occur on line {}: {:?}", needle, line, text),
        })?;
        Ok(Location::new(line, start, Some(start + needle.len())))
    }

    /// The statement on `line`, from its first non-blank column to the end of the line
    pub fn statement(&self, line: usize) -> Result<Location, TraceError> {
        let text = self.line_or_err(line)?;
        let indent = text.len() - text.trim_start().len();
        Ok(Location::line(line, indent))
    }

    fn line_or_err(&self, line: usize) -> Result<&str, TraceError> {
        self.line(line).ok_or_else(|| TraceError::InvalidConfig {
            message: format!("line {} is outside the {}-line listing", line, self.len()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_line_numbers() {
        let mut src = SourceText::new();
        let def = src.push_block(&["def f(x):", "  return x"]);
        src.blank_line();
        let call = src.push_line("y = f(1)");
        assert_eq!(def, 1);
        assert_eq!(call, 4);
        assert_eq!(src.line(2), Some("  return x"));
        assert_eq!(src.line(0), None);
    }

    #[test]
    fn test_locate_and_statement() {
        let mut src = SourceText::new();
        src.push_block(&["def f(x):", "  return x"]);
        assert_eq!(src.locate(1, "f(x)").unwrap(), Location::new(1, 4, Some(8)));
        assert_eq!(src.statement(2).unwrap(), Location::line(2, 2));
        assert!(matches!(
            src.locate(2, "yield"),
            Err(TraceError::InvalidConfig { .. })
        ));
        assert!(src.statement(3).is_err());
    }
}
