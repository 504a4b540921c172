//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`source`]: Scene listing with syntax highlighting and the highlighted span
//! - [`stack`]: Variable shelves, the call chain, and running loops
//! - [`heap`]: Heap lists and the arrows that point at them
//! - [`trace`]: The scene's steps, with the current step's descriptors
//! - [`status`]: Status bar with keybindings and playback state
//! - `utils`: Shared value formatting
//!
//! Each pane module exports a primary `render_*_pane()` function plus its
//! scroll state type. Panes only read a [`crate::snapshot::VisualState`];
//! they never see the model.

mod utils;

pub mod heap;
pub mod source;
pub mod stack;
pub mod status;
pub mod trace;

pub use heap::{render_heap_pane, HeapScrollState};
pub use source::{render_source_pane, SourceScrollState};
pub use stack::{render_stack_pane, StackScrollState};
pub use status::render_status_bar;
pub use trace::render_trace_pane;
