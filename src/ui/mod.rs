//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The viewer is one [`crate::scene::step::Renderer`] among possible others:
//! it never touches the model, only the snapshots a
//! [`crate::snapshot::SnapshotRenderer`] recorded while the scene ran.
//!
//! - **[`app`]**: application state, keyboard event loop, pane focus, auto-play
//! - **[`panes`]**: stateless render functions for each visible pane (source,
//!   variables, heap, trace, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with a snapshot
//! history and call [`App::run`] to start the event loop.
//!
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
