//! # Introduction
//!
//! AlgoTTY turns a problem instance into an ordered list of immutable
//! snapshots and lets you scrub through them forward and backward in a
//! terminal player built with [ratatui](https://docs.rs/ratatui).
//!
//! ## Pipeline
//!
//! ```text
//! GeneratorInput → generator → Vec<Step> → Playback → TUI
//! ```
//!
//! 1. [`generators`]: sorting, number theory, graph, string and grid
//!    algorithms, each emitting a trace of [`snapshot::Step`]s.
//! 2. [`interactive`]: engines that advance one step at a time (BFS with
//!    editing and undo) and trees whose operations emit animation frames
//!    over copy-on-write nodes (B-Tree, binary heap, trie).
//! 3. [`snapshot`]: the step model, the trace recorder with its memory budget,
//!    and the [`snapshot::Stepper`] seam the player drives.
//! 4. [`config`]: input limits and player settings.
//! 5. [`ui`]: ratatui-based player; not part of the stable library API.

pub mod config;
pub mod errors;
pub mod generators;
pub mod interactive;
pub mod snapshot;
pub mod ui;
