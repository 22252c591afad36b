//! Terminal player built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! - **[`app`]**: player state, keyboard event loop, pane focus, auto-play timer
//! - **[`panes`]**: stateless render functions for each visible pane (pseudocode,
//!   state, info, narration, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! Construct an [`App`] with any boxed [`Stepper`] and call [`App::run`].
//!
//! [`Stepper`]: crate::snapshot::Stepper
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
