//! Playback controller
//!
//! Owns the loaded script, the live variable table, the view and the timer
//! queue. Every transition goes through here.
//!
//! # Timers
//!
//! At most one advance is pending at a time; its handle is kept in
//! `advance`. Every transition that leaves the Playing state cancels it
//! through `cancel_advance`. Transient clears are
//! scheduled on the same queue and are only dropped wholesale when the view
//! is rebuilt from scratch.
//!
//! # Going backwards
//!
//! There is no undo. Stepping back resets to the initial snapshot and
//! replays every step up to the new index. Rendering is deterministic, so
//! the replay lands on the same state. Transient cues of replayed steps are
//! settled on the spot, except those of the last one, which run as if it
//! had just been applied.

use super::executor::{CueTimings, FollowUp, StepExecutor};
use super::timer::{TimerHandle, TimerQueue};
use super::{RunMode, TimerTask};
use crate::config::Config;
use crate::script::{AnimationScript, DataStructureKind, VariableMap};
use crate::view::{Renderer, Surface, View};
use std::time::Duration;

pub struct PlaybackController {
    renderer: Renderer,
    executor: StepExecutor,
    base_delay: Duration,

    script: Option<AnimationScript>,
    kind: DataStructureKind,
    surface: Surface,
    view: View,
    variables: VariableMap,

    index: usize,
    mode: RunMode,
    speed: f64,
    timers: TimerQueue<TimerTask>,
    advance: Option<TimerHandle>,
}

impl PlaybackController {
    /// A controller with nothing loaded; the view shows the placeholder
    pub fn new(config: &Config) -> Self {
        let surface = Surface::new(config.layout.surface_width, config.layout.surface_height);
        PlaybackController {
            renderer: Renderer::new(config.layout.clone()),
            executor: StepExecutor::new(CueTimings::from(&config.playback)),
            base_delay: config.playback.base_delay(),
            script: None,
            kind: DataStructureKind::default(),
            surface,
            view: View::unavailable(surface),
            variables: VariableMap::new(),
            index: 0,
            mode: RunMode::Stopped,
            speed: config.playback.default_speed,
            timers: TimerQueue::new(),
            advance: None,
        }
    }

    /// Load `script` for drawing on `surface`. Anything pending from the
    /// previous script is dropped.
    pub fn initialize(
        &mut self,
        surface: Surface,
        script: Option<AnimationScript>,
        kind: DataStructureKind,
    ) {
        match &script {
            Some(s) => log::info!("loaded {} script with {} step(s)", kind, s.len()),
            None => log::info!("no script for this selection; showing placeholder"),
        }
        self.timers = TimerQueue::new();
        self.advance = None;
        self.surface = surface;
        self.script = script;
        self.kind = kind;
        self.mode = RunMode::Stopped;
        self.rebuild();
    }

    /// Replace the script, keeping the current surface
    pub fn load(&mut self, script: Option<AnimationScript>, kind: DataStructureKind) {
        self.initialize(self.surface, script, kind);
    }

    /// Start automatic playback. The first step is applied on the next tick.
    pub fn play(&mut self) {
        if self.mode == RunMode::Playing {
            return;
        }
        if self.is_at_end() {
            self.reset_state();
        }
        if self.is_at_end() {
            log::debug!("nothing to play");
            return;
        }
        self.set_mode(RunMode::Playing);
        self.schedule_advance(Duration::ZERO);
    }

    pub fn pause(&mut self) {
        if self.mode != RunMode::Playing {
            return;
        }
        self.cancel_advance();
        self.set_mode(RunMode::Paused);
    }

    /// Back to step 0 with the initial snapshot and variables
    pub fn reset(&mut self) {
        self.reset_state();
        self.set_mode(RunMode::Stopped);
    }

    pub fn stop(&mut self) {
        self.pause();
        self.reset();
    }

    /// Apply the step at the current index, if any
    pub fn next_step(&mut self) {
        if self.is_at_end() {
            return;
        }
        self.force_pause();
        self.apply_step(self.index);
        self.index += 1;
    }

    /// Go back one step by replaying from the start
    pub fn previous_step(&mut self) {
        if self.index == 0 {
            return;
        }
        self.force_pause();
        self.timers.clear();
        self.replay(self.index - 1);
    }

    /// Pause and move to `index` (clamped to the end), replaying if it lies
    /// behind the current index
    pub fn seek(&mut self, index: usize) {
        self.force_pause();
        let index = index.min(self.len());
        if index < self.index {
            self.timers.clear();
            self.replay(index);
        } else {
            while self.index < index {
                self.apply_step(self.index);
                self.index += 1;
            }
        }
    }

    /// Apply up to `count` steps. Returns how many were applied.
    pub fn step_forward_by(&mut self, count: usize) -> usize {
        let start = self.index;
        self.seek(start.saturating_add(count));
        self.index - start
    }

    pub fn jump_to_end(&mut self) {
        self.seek(self.len());
    }

    /// Change the playback speed multiplier. Applies from the next
    /// scheduled advance on.
    pub fn set_speed(&mut self, multiplier: f64) {
        if !multiplier.is_finite() || multiplier <= 0.0 {
            log::warn!("ignoring invalid speed {}", multiplier);
            return;
        }
        self.speed = multiplier;
    }

    /// Lay the view out for a new surface, keeping the current step and
    /// whatever cues are showing. Pending timers keep running.
    pub fn resize(&mut self, surface: Surface) {
        if surface == self.surface {
            return;
        }
        self.surface = surface;
        let previous = std::mem::replace(&mut self.view, View::unavailable(surface));
        self.replay_settled(self.index);
        self.view.carry_cues_from(&previous);
    }

    /// Let `elapsed` time pass, firing every task that falls due, in order
    pub fn tick(&mut self, elapsed: Duration) {
        let until = self.timers.now().saturating_add(elapsed);
        while let Some((handle, task)) = self.timers.pop_due(until) {
            match task {
                TimerTask::Advance => {
                    if self.advance == Some(handle) {
                        self.advance = None;
                        self.auto_advance();
                    }
                }
                other => self.executor.expire(&other, &mut self.view),
            }
        }
        self.timers.advance_to(until);
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn variables(&self) -> &VariableMap {
        &self.variables
    }

    pub fn script(&self) -> Option<&AnimationScript> {
        self.script.as_ref()
    }

    pub fn kind(&self) -> DataStructureKind {
        self.kind
    }

    /// Number of steps already applied
    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.script.as_ref().map_or(0, AnimationScript::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_at_end(&self) -> bool {
        self.index >= self.len()
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }

    pub fn is_playing(&self) -> bool {
        self.mode == RunMode::Playing
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Delay between automatic advances at the current speed
    pub fn step_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.base_delay.as_secs_f64() / self.speed)
            .unwrap_or(Duration::MAX)
    }

    /// Time until the pending advance fires
    pub fn next_advance_in(&self) -> Option<Duration> {
        let deadline = self.timers.deadline(self.advance?)?;
        Some(deadline.saturating_sub(self.timers.now()))
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    /// One automatic step
    fn auto_advance(&mut self) {
        if self.mode != RunMode::Playing {
            return;
        }
        if self.index < self.len() {
            self.apply_step(self.index);
            self.index += 1;
        }
        if self.index < self.len() {
            self.schedule_advance(self.step_delay());
        } else {
            log::info!("playback reached the last step");
            self.set_mode(RunMode::Stopped);
        }
    }

    /// Apply one step and schedule its follow-ups
    fn apply_step(&mut self, index: usize) {
        for follow_up in self.run_step(index) {
            self.timers.schedule(follow_up.delay, follow_up.task);
        }
    }

    /// Apply one step as if its cues had long since run out
    fn settle_step(&mut self, index: usize) {
        for follow_up in self.run_step(index) {
            self.executor.expire(&follow_up.task, &mut self.view);
        }
    }

    fn run_step(&mut self, index: usize) -> Vec<FollowUp> {
        let Some(step) = self.script.as_ref().and_then(|s| s.steps.get(index)) else {
            return Vec::new();
        };
        log::debug!("step {}: {}", index + 1, step.action.type_name());
        self.executor.apply(step, &mut self.variables, &mut self.view)
    }

    /// Fresh view and variables for step 0; timers untouched
    fn rebuild(&mut self) {
        self.index = 0;
        self.variables = self
            .script
            .as_ref()
            .map(|s| s.initial_variables.clone())
            .unwrap_or_default();
        self.view = self
            .renderer
            .render(self.surface, self.script.as_ref(), self.kind);
    }

    /// Rebuild, then apply steps `[0, index)`. Only the last one keeps
    /// live cues.
    fn replay(&mut self, index: usize) {
        let index = index.min(self.len());
        self.replay_settled(index.saturating_sub(1));
        if self.index < index {
            self.apply_step(self.index);
            self.index += 1;
        }
    }

    /// Rebuild, then apply steps `[0, index)` with every cue settled
    fn replay_settled(&mut self, index: usize) {
        self.rebuild();
        let index = index.min(self.len());
        while self.index < index {
            self.settle_step(self.index);
            self.index += 1;
        }
    }

    fn reset_state(&mut self) {
        self.cancel_advance();
        self.timers.clear();
        self.rebuild();
    }

    fn schedule_advance(&mut self, delay: Duration) {
        self.cancel_advance();
        self.advance = Some(self.timers.schedule(delay, TimerTask::Advance));
    }

    fn cancel_advance(&mut self) {
        if let Some(handle) = self.advance.take() {
            self.timers.cancel(handle);
        }
    }

    fn force_pause(&mut self) {
        self.cancel_advance();
        self.set_mode(RunMode::Paused);
    }

    fn set_mode(&mut self, mode: RunMode) {
        if self.mode != mode {
            log::info!("playback {} -> {}", self.mode, mode);
            self.mode = mode;
        }
    }
}
