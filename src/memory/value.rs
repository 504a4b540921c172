//! Runtime value representation
//!
//! This module defines the [`Value`] enum, which represents every value a
//! variable slot or list cell can hold in the modelled program. Values are
//! tagged, so a list can never be mistaken for a scalar at a consumption site.
//!
//! # Value Types
//!
//! - [`Value::Int`]: signed integer
//! - [`Value::Str`]: string (board tokens such as `"G"` and the blank `" "`)
//! - [`Value::Bool`]: boolean
//! - [`Value::Empty`]: placeholder for "no value" (a function that returns nothing)
//! - [`Value::Container`]: reference to a heap list by identity

use super::ContainerId;
use std::fmt;

/// Values held by variable slots and list cells
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Value {
    Int(i64),
    Str(String),
    Bool(bool),
    #[default]
    Empty,
    Container(ContainerId),
}

impl Value {
    /// Shorthand for building a string value
    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    /// Get the integer value, returns None if not an Int
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the string value, returns None if not a Str
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get the referenced container, returns None for scalars
    pub fn as_container(&self) -> Option<ContainerId> {
        match self {
            Value::Container(id) => Some(*id),
            _ => None,
        }
    }

    /// Check if this value references a heap list
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Container(_))
    }

    /// Name of the variant, used in type mismatch diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Str(_) => "str",
            Value::Bool(_) => "bool",
            Value::Empty => "empty",
            Value::Container(_) => "list",
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// Formats values the way the tutorial's variable boxes show them: strings
/// quoted, lists as `<list>`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "\"{}\"", s),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Empty => write!(f, "None"),
            Value::Container(_) => write!(f, "<list>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_variable_boxes() {
        assert_eq!(Value::Int(7).to_string(), "7");
        assert_eq!(Value::str("G").to_string(), "\"G\"");
        assert_eq!(Value::str(" ").to_string(), "\" \"");
        assert_eq!(Value::Container(ContainerId(3)).to_string(), "<list>");
        assert_eq!(Value::Bool(false).to_string(), "False");
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::Int(4).as_int(), Some(4));
        assert_eq!(Value::str("B").as_int(), None);
        assert_eq!(Value::Container(ContainerId(1)).as_container(), Some(ContainerId(1)));
        assert!(!Value::Empty.is_container());
    }
}
