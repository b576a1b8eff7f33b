//! Playback engine
//!
//! - [`timer`]: the virtual-clock [`TimerQueue`]
//! - [`executor`]: [`StepExecutor`], which applies one step to a view
//! - [`controller`]: [`PlaybackController`], the play/pause/step state machine
//!
//! Nothing in here blocks or sleeps. Time only moves when the owner calls
//! [`PlaybackController::tick`].

pub mod controller;
pub mod executor;
pub mod timer;

pub use controller::PlaybackController;
pub use executor::{CueTimings, FollowUp, StepExecutor};
pub use timer::{TimerHandle, TimerQueue};

use crate::script::{ElementId, HighlightStyle};
use std::fmt;

/// Work scheduled on the controller's timer queue
#[derive(Debug, Clone, PartialEq)]
pub enum TimerTask {
    /// Apply the next step while playing
    Advance,
    /// Remove a transient style from an element
    ClearStyle {
        element: ElementId,
        style: HighlightStyle,
    },
    /// End the change cue on a tracker row
    ClearVariableCue(String),
    /// End the narration update cue
    ClearNarrationCue,
}

/// Playback state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Stopped => write!(f, "stopped"),
            RunMode::Playing => write!(f, "playing"),
            RunMode::Paused => write!(f, "paused"),
        }
    }
}
