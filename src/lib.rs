//! # Introduction
//!
//! algotty plays back algorithm walkthroughs in the terminal. A walkthrough
//! is an animation script: an initial data structure snapshot, a variable
//! table and an ordered list of steps (highlight, swap, compare, pointer
//! moves, code line marks, ...). The player applies steps one at a time,
//! automatically or by hand, and can step backwards by replaying from the
//! start.
//!
//! ## Playback pipeline
//!
//! ```text
//! Problem JSON → AnimationScript → Renderer → View ⇄ StepExecutor ← PlaybackController → TUI
//! ```
//!
//! 1. [`script`]: the script schema, read from problem documents with
//!    [serde](https://docs.rs/serde).
//! 2. [`view`]: visual elements keyed by stable ids, pointer markers, the
//!    variable tracker, and the [`view::Renderer`] that lays out step 0.
//! 3. [`engine`]: the [`engine::StepExecutor`] applying one step, and the
//!    [`engine::PlaybackController`] state machine driven by a virtual clock.
//! 4. [`config`]: TOML configuration for timings and layout.
//! 5. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! ## Supported structures
//!
//! Arrays, linked lists, stacks, queues, binary trees and graphs. Anything
//! else falls back to a numbered listing of the step descriptions.

pub mod config;
pub mod engine;
pub mod error;
pub mod script;
pub mod ui;
pub mod view;
