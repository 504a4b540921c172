//! Execution state of the modelled program
//!
//! This module provides everything except memory:
//! - [`tracker`]: the program counter and the stack of call sites
//! - [`loops`]: range iterators for counting loops
//! - [`location`]: highlighted source spans
//! - [`errors`]: the [`errors::ModelError`] taxonomy shared with [`crate::memory`]
//!
//! All state here is owned by a single scene driver; nothing is shared
//! between scenes.

pub mod constants;
pub mod errors;
pub mod location;
pub mod loops;
pub mod tracker;
