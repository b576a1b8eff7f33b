//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`structure`]: the animated data structure, step listing or placeholder
//! - [`narration`]: description of the last applied step and the solution's complexity
//! - [`source`]: solution code with syntax highlighting and current line indicator
//! - [`tracker`]: live variable values with change cues
//! - [`status`]: status bar with keybindings and playback state
//!
//! # Architecture
//!
//! Each pane module exports a `render_*` function that draws straight from
//! borrowed view state. Panes that take several inputs bundle them in a
//! `*RenderData` struct; scroll offsets are owned by the app and passed in
//! mutably so each pane can clamp them.

pub mod narration;
pub mod source;
pub mod status;
pub mod structure;
pub mod tracker;

pub use narration::{render_narration_pane, NarrationRenderData};
pub use source::{render_source_pane, SourceScrollState};
pub use status::{render_status_bar, StatusRenderData};
pub use structure::{render_structure_pane, StructureRenderData};
pub use tracker::render_tracker_pane;
