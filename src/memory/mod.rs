//! Memory model for the visual execution trace
//!
//! This module provides the core abstractions the renderer draws:
//! - [`value`]: Tagged runtime values (Int, Str, Bool, Empty, Container)
//! - [`heap`]: Heap lists with stable identity and the pointers that reference them
//! - [`scope`]: Stack of variable scopes with a deterministic slot layout
//!
//! # Identity
//!
//! Every heap list, pointer and scope is addressed by a small integer id that
//! is never reused within one scene, so a renderer can key its own objects
//! on them:
//! - [`ContainerId`]: a heap list, shown as `#N`
//! - [`PointerId`]: an arrow from a slot or list cell to a heap list
//! - [`ScopeId`]: a variable shelf, `0` being the global scope
//!
//! # Aliasing
//!
//! Sharing is never implicit. When two variables refer to the same list each
//! one owns its own [`heap::Pointer`] record targeting that list, so
//! "two names point to the same list" can be queried with
//! [`heap::Heap::pointers_to`].

pub mod heap;
pub mod scope;
pub mod value;

use std::fmt;

/// Identity of a heap list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(pub u32);

/// Identity of a pointer (an arrow in the rendered scene)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerId(pub u32);

/// Identity of a variable scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub u32);

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for PointerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ptr{}", self.0)
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope{}", self.0)
    }
}
