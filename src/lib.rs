//! # Introduction
//!
//! codereel is the execution model behind an animated coding tutorial. A
//! short program (building and playing a Connect Four board) is described as a
//! declarative trace of intents. The trace is played against a small model of
//! scopes, heap lists and pointers, and each intent is turned into one visual
//! step that a renderer turns into animation.
//!
//! ## Pipeline
//!
//! ```text
//! SceneConfig → Scene (listing + intents) → SceneDriver → Steps → Renderer
//!                                                                   │
//!                                          SnapshotRenderer → Snapshots → TUI
//! ```
//!
//! 1. [`memory`]: values, the heap of lists, pointer arrows and the stack of
//!    variable shelves.
//! 2. [`execution`]: the program counter with its call-site stack, and
//!    stepwise loop iterators.
//! 3. [`scene`]: the intent vocabulary, the Connect Four scene builders, and
//!    the [`scene::driver::SceneDriver`] that turns intents into
//!    [`scene::step::Step`]s.
//! 4. [`snapshot`]: a renderer that rebuilds the picture from step
//!    descriptors alone and keeps one snapshot per step under a memory limit.
//! 5. [`ui`]: ratatui-based viewer; not part of the stable library API.

pub mod execution;
pub mod memory;
pub mod scene;
pub mod snapshot;
pub mod ui;
