//! Declarative trace vocabulary
//!
//! A scene is a flat list of [`Intent`]s, one per visual step of the
//! tutorial. Intents name *what the modelled statement does*; the driver
//! turns each one into model operations. Control flow is already resolved
//! by the scene builder: a loop is spelled out iteration by iteration and a
//! branch is a [`Intent::Check`] carrying the outcome the builder expects,
//! which the driver re-evaluates against the model.

use crate::execution::location::Location;
use crate::memory::value::Value;
use std::fmt;

/// An expression evaluated against the top scope and the heap
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Lit(Value),
    Var(String),
    /// `base[index]`
    Index(Box<Operand>, Box<Operand>),
    /// `base + k`
    Offset(Box<Operand>, i64),
    /// `len(base)`
    Len(Box<Operand>),
    /// `[a, b, ...]`, allocates a list
    List(Vec<Operand>),
    /// `[item] * count`, allocates a list
    Repeat(Box<Operand>, Box<Operand>),
    /// The value of the last returned call
    Returned,
}

impl Operand {
    pub fn int(n: i64) -> Self {
        Operand::Lit(Value::Int(n))
    }

    pub fn str(s: &str) -> Self {
        Operand::Lit(Value::str(s))
    }

    pub fn var(name: &str) -> Self {
        Operand::Var(name.to_string())
    }

    pub fn index(self, index: Operand) -> Self {
        Operand::Index(Box::new(self), Box::new(index))
    }

    pub fn offset(self, k: i64) -> Self {
        if k == 0 {
            self
        } else {
            Operand::Offset(Box::new(self), k)
        }
    }

    pub fn len(self) -> Self {
        Operand::Len(Box::new(self))
    }

    pub fn repeat(item: Operand, count: Operand) -> Self {
        Operand::Repeat(Box::new(item), Box::new(count))
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Lit(v) => write!(f, "{}", v),
            Operand::Var(name) => write!(f, "{}", name),
            Operand::Index(base, index) => write!(f, "{}[{}]", base, index),
            Operand::Offset(base, k) if *k < 0 => write!(f, "{} - {}", base, -k),
            Operand::Offset(base, k) => write!(f, "{} + {}", base, k),
            Operand::Len(base) => write!(f, "len({})", base),
            Operand::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Operand::Repeat(item, count) => write!(f, "[{}] * {}", item, count),
            Operand::Returned => write!(f, "<returned>"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Ne,
}

/// `lhs == rhs` or `lhs != rhs`
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub lhs: Operand,
    pub op: Comparison,
    pub rhs: Operand,
}

impl Condition {
    pub fn eq(lhs: Operand, rhs: Operand) -> Self {
        Condition {
            lhs,
            op: Comparison::Eq,
            rhs,
        }
    }

    pub fn ne(lhs: Operand, rhs: Operand) -> Self {
        Condition {
            lhs,
            op: Comparison::Ne,
            rhs,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self.op {
            Comparison::Eq => "==",
            Comparison::Ne => "!=",
        };
        write!(f, "{} {} {}", self.lhs, op, self.rhs)
    }
}

/// One statement-level step of a scene
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Move the program counter within the current frame
    Goto(Location),
    /// `name = value` in the top scope
    Assign { name: String, value: Operand },
    /// `list.append(item)`
    Append { list: Operand, item: Operand },
    /// `list[index] = value`
    Store {
        list: Operand,
        index: Operand,
        value: Operand,
    },
    /// Call a user function: evaluate `params` in the caller, then bind them in a new frame
    Call {
        function: String,
        entry: Location,
        params: Vec<(String, Operand)>,
        slots_per_row: usize,
    },
    /// Leave the current frame
    Return { value: Option<Operand> },
    /// `for var in range(start, stop, step)`: expand the range
    LoopStart {
        var: String,
        start: Operand,
        stop: Operand,
        step: i64,
    },
    /// Next iteration; the range must not be exhausted
    LoopNext,
    /// The range must be exhausted; the loop ends normally
    LoopExit,
    /// `break`
    Break,
    /// Evaluate a condition the builder expects to come out as `expect`
    Check { condition: Condition, expect: bool },
    /// The outermost program is done
    Finish,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::Goto(loc) => write!(f, "goto {}", loc),
            Intent::Assign { name, value } => write!(f, "{} = {}", name, value),
            Intent::Append { list, item } => write!(f, "{}.append({})", list, item),
            Intent::Store { list, index, value } => {
                write!(f, "{}[{}] = {}", list, index, value)
            }
            Intent::Call {
                function, params, ..
            } => {
                write!(f, "{}(", function)?;
                for (i, (_, arg)) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            Intent::Return { value: Some(v) } => write!(f, "return {}", v),
            Intent::Return { value: None } => write!(f, "return"),
            Intent::LoopStart {
                var,
                start,
                stop,
                step,
            } => write!(f, "for {} in range({}, {}, {})", var, start, stop, step),
            Intent::LoopNext => write!(f, "next iteration"),
            Intent::LoopExit => write!(f, "loop exit"),
            Intent::Break => write!(f, "break"),
            Intent::Check { condition, .. } => write!(f, "check {}", condition),
            Intent::Finish => write!(f, "finish"),
        }
    }
}
