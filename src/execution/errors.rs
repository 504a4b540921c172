//! Model error types
//!
//! This module defines [`ModelError`], which represents every precondition a
//! trace can violate while it drives the memory model, the scope stack, the
//! execution tracker or a range iterator.
//!
//! A scene's trace is hand-authored and assumed correct by construction, so
//! all of these are programmer errors: they are fatal, never retried, and
//! each one names the model object it was raised against.

use crate::memory::{ContainerId, PointerId, ScopeId};
use std::fmt;

/// Errors raised by model operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Index outside a list's current length
    OutOfBounds {
        container: ContainerId,
        index: i64,
        len: usize,
    },

    /// List id was never allocated
    UnknownContainer { container: ContainerId },

    /// List has been released and can no longer be read, written or targeted
    ReleasedContainer { container: ContainerId },

    /// Pointer id was never created or has been removed
    UnknownPointer { pointer: PointerId },

    /// Scope id is not on the scope stack
    UnknownScope { scope: ScopeId },

    /// Name already bound in this scope
    DuplicateName { scope: ScopeId, name: String },

    /// Name not bound in this scope
    UnknownName { scope: ScopeId, name: String },

    /// `advance()` after `break_early()`
    IteratorTerminated { var: Option<String> },

    /// Operand evaluated to the wrong kind of value
    TypeMismatch { expected: &'static str, got: String },

    /// Stack depth mismatch, popping an empty stack, illegal state transition
    PreconditionViolation { message: String },
}

impl ModelError {
    pub(crate) fn precondition(message: impl Into<String>) -> Self {
        ModelError::PreconditionViolation {
            message: message.into(),
        }
    }
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::OutOfBounds {
                container,
                index,
                len,
            } => {
                write!(
                    f,
                    "Index {} out of bounds for list {} of length {}",
                    index, container, len
                )
            }
            ModelError::UnknownContainer { container } => {
                write!(f, "List {} was never allocated", container)
            }
            ModelError::ReleasedContainer { container } => {
                write!(f, "List {} has been released", container)
            }
            ModelError::UnknownPointer { pointer } => {
                write!(f, "Pointer {} does not exist", pointer)
            }
            ModelError::UnknownScope { scope } => {
                write!(f, "Scope {} is not on the scope stack", scope)
            }
            ModelError::DuplicateName { scope, name } => {
                write!(f, "Name '{}' is already bound in {}", name, scope)
            }
            ModelError::UnknownName { scope, name } => {
                write!(f, "Name '{}' is not bound in {}", name, scope)
            }
            ModelError::IteratorTerminated { var } => match var {
                Some(var) => write!(f, "Loop over '{}' was terminated by break", var),
                None => write!(f, "Loop was terminated by break"),
            },
            ModelError::TypeMismatch { expected, got } => {
                write!(f, "Type error: expected {}, got {}", expected, got)
            }
            ModelError::PreconditionViolation { message } => {
                write!(f, "Precondition violated: {}", message)
            }
        }
    }
}

impl std::error::Error for ModelError {}
