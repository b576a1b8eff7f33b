//! Main TUI application state and logic

use super::panes::{
    self, NarrationRenderData, SourceScrollState, StatusRenderData, StructureRenderData,
};
use crate::config::{Config, PlaybackConfig};
use crate::engine::PlaybackController;
use crate::script::{AnimationScript, ProblemDocument, SessionContext, Solution};
use crate::view::Surface;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Structure,
    Narration,
    Source,
    Variables,
}

impl FocusedPane {
    /// Move focus to the next pane (clockwise: structure -> source -> variables -> narration)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Structure => FocusedPane::Source,
            FocusedPane::Source => FocusedPane::Variables,
            FocusedPane::Variables => FocusedPane::Narration,
            FocusedPane::Narration => FocusedPane::Structure,
        }
    }

    /// Move focus to the previous pane (counter-clockwise)
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Structure => FocusedPane::Narration,
            FocusedPane::Narration => FocusedPane::Variables,
            FocusedPane::Variables => FocusedPane::Source,
            FocusedPane::Source => FocusedPane::Structure,
        }
    }
}

/// The main application state
pub struct App {
    pub controller: PlaybackController,

    /// The loaded problem and the current language selection
    pub document: ProblemDocument,
    pub session: SessionContext,

    playback: PlaybackConfig,
    node_radius: f32,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub structure_scroll: usize,
    pub narration_scroll: usize,
    pub variables_scroll: usize,
    pub source_scroll: SourceScrollState,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Wall-clock time of the last controller tick
    last_tick: Instant,

    /// Last time space was pressed (for debouncing)
    last_space_press: Instant,
}

impl App {
    /// Create a new app showing the session's selected solution
    pub fn new(document: ProblemDocument, session: SessionContext, config: &Config) -> Self {
        let mut controller = PlaybackController::new(config);
        controller.load(script_for(&document, &session), session.kind);

        App {
            controller,
            document,
            session,
            playback: config.playback.clone(),
            node_radius: config.layout.graph_node_radius,
            focused_pane: FocusedPane::Structure,
            structure_scroll: 0,
            narration_scroll: 0,
            variables_scroll: 0,
            source_scroll: SourceScrollState::default(),
            should_quit: false,
            status_message: String::from("Ready!"),
            last_tick: Instant::now(),
            last_space_press: Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or_else(Instant::now),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            self.tick();

            // Poll with a timeout so the controller keeps ticking while idle
            if event::poll(Duration::from_millis(50))? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        self.handle_key_event(key);
                    }
                    // The next draw lays the view out for the new size
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }
        }

        Ok(())
    }

    /// Feed the wall-clock time since the last tick to the controller
    fn tick(&mut self) {
        let now = Instant::now();
        let was_playing = self.controller.is_playing();
        self.controller.tick(now.duration_since(self.last_tick));
        self.last_tick = now;

        if was_playing && !self.controller.is_playing() {
            self.status_message = "Playback complete".to_string();
        }
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // 4 panes in 2 columns, plus status bar at bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let pane_area = main_chunks[0];
        let status_area = main_chunks[1];

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(pane_area);

        // Left column: Structure (top) | Narration (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(columns[0]);

        // Right column: Source (top) | Variables (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(columns[1]);

        self.fit_surface(left_rows[0]);

        let view = self.controller.view();
        let script = self.controller.script();

        panes::render_structure_pane(
            frame,
            left_rows[0],
            StructureRenderData {
                view,
                kind: self.controller.kind(),
                current_index: self.controller.current_index(),
                node_radius: self.node_radius,
            },
            self.focused_pane == FocusedPane::Structure,
            &mut self.structure_scroll,
        );

        panes::render_narration_pane(
            frame,
            left_rows[1],
            NarrationRenderData {
                narration: view.narration.as_deref(),
                fresh: view.narration_fresh,
                time_complexity: script.and_then(|s| s.time_complexity.as_deref()),
                space_complexity: script.and_then(|s| s.space_complexity.as_deref()),
            },
            self.focused_pane == FocusedPane::Narration,
            &mut self.narration_scroll,
        );

        panes::render_source_pane(
            frame,
            right_rows[0],
            self.document
                .solution(&self.session.language)
                .and_then(|solution| solution.code.as_deref()),
            view.code_line,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        panes::render_tracker_pane(
            frame,
            right_rows[1],
            &view.tracker,
            self.focused_pane == FocusedPane::Variables,
            &mut self.variables_scroll,
        );

        panes::render_status_bar(
            frame,
            status_area,
            StatusRenderData {
                message: &self.status_message,
                current_step: self.controller.current_index(),
                total_steps: self.controller.len(),
                mode: self.controller.mode(),
                speed: self.controller.speed(),
                language: &self.session.language,
            },
        );
    }

    /// Lay the view out for the structure pane's inner area
    fn fit_surface(&mut self, area: Rect) {
        let surface = Surface::from_cells(area.width.saturating_sub(2), area.height.saturating_sub(2));
        self.controller.resize(surface);
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            // Number keys step forward N times directly
            KeyCode::Char(c @ '1'..='9') => {
                let n = c.to_digit(10).unwrap_or(1) as usize;
                let stepped = self.controller.step_forward_by(n);
                self.status_message = format!("Stepped forward {} step(s)", stepped);
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Left => self.step_backward(),
            KeyCode::Right => self.step_forward(),
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Source => {
                    // Scrolling up makes the current line move down visually
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_add(1));
                    }
                }
                FocusedPane::Structure => {
                    self.structure_scroll = self.structure_scroll.saturating_sub(1);
                }
                FocusedPane::Narration => {
                    self.narration_scroll = self.narration_scroll.saturating_sub(1);
                }
                FocusedPane::Variables => {
                    self.variables_scroll = self.variables_scroll.saturating_sub(1);
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Source => {
                    // Scrolling down makes the current line move up visually
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_sub(1));
                    }
                }
                FocusedPane::Structure => {
                    self.structure_scroll = self.structure_scroll.saturating_add(1);
                }
                FocusedPane::Narration => {
                    self.narration_scroll = self.narration_scroll.saturating_add(1);
                }
                FocusedPane::Variables => {
                    self.variables_scroll = self.variables_scroll.saturating_add(1);
                }
            },
            KeyCode::Char(' ') => {
                // Toggle auto-play (with 200ms debounce to prevent key repeat spam)
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.toggle_play();
                }
            }
            KeyCode::Enter => {
                self.controller.jump_to_end();
                self.status_message = "Jumped to end".to_string();
            }
            KeyCode::Backspace => {
                self.controller.reset();
                self.status_message = "Jumped to start".to_string();
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                self.controller.stop();
                self.status_message = "Stopped".to_string();
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.change_speed(self.playback.speed_step);
            }
            KeyCode::Char('-') | KeyCode::Char('_') => {
                self.change_speed(-self.playback.speed_step);
            }
            KeyCode::Char('l') | KeyCode::Char('L') => self.cycle_language(),
            _ => {}
        }
    }

    fn toggle_play(&mut self) {
        if self.controller.is_playing() {
            self.controller.pause();
            self.status_message = "Paused".to_string();
        } else if !self.controller.view().is_available() {
            self.status_message = "No animation for this language".to_string();
        } else {
            self.controller.play();
            self.status_message = if self.controller.is_playing() {
                "Playing...".to_string()
            } else {
                "Nothing to play".to_string()
            };
        }
    }

    fn step_forward(&mut self) {
        let before = self.controller.current_index();
        self.controller.next_step();
        self.status_message = if self.controller.current_index() > before {
            "Stepped forward".to_string()
        } else {
            "Cannot step forward: at the last step".to_string()
        };
    }

    fn step_backward(&mut self) {
        let before = self.controller.current_index();
        self.controller.previous_step();
        self.status_message = if self.controller.current_index() < before {
            "Stepped backward".to_string()
        } else {
            "Cannot step backward: at the first step".to_string()
        };
    }

    fn change_speed(&mut self, delta: f64) {
        let speed = self.playback.clamp_speed(self.controller.speed() + delta);
        self.controller.set_speed(speed);
        self.status_message = format!("Speed {}x", speed);
    }

    /// Switch to the next solution language and load its script
    fn cycle_language(&mut self) {
        if self.session.languages.len() < 2 {
            self.status_message = "No other language available".to_string();
            return;
        }
        let language = self.session.cycle_language().to_string();
        self.controller
            .load(script_for(&self.document, &self.session), self.session.kind);
        self.source_scroll = SourceScrollState::default();
        self.variables_scroll = 0;
        self.status_message = format!("Switched to {}", language);
        log::info!("switched solution language to {}", language);
    }
}

/// The script of the session's selected solution, if it has one
fn script_for(document: &ProblemDocument, session: &SessionContext) -> Option<AnimationScript> {
    document
        .solution(&session.language)
        .and_then(Solution::script)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    const DOCUMENT: &str = r#"{
        "title": "Reverse",
        "category": "array",
        "solutions": {
            "python": {
                "code": "def f(a):\n    pass",
                "animationData": {
                    "initialData": [1, 2],
                    "steps": [
                        {"type": "swap", "targets": ["element-0", "element-1"]},
                        {"type": "highlight", "target": "element-0", "style": "sorted"}
                    ]
                }
            },
            "java": {"code": "class A {}"}
        }
    }"#;

    fn app() -> App {
        let document = ProblemDocument::from_json(DOCUMENT).unwrap();
        let session = document.session(Some("python")).unwrap();
        App::new(document, session, &Config::default())
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_step_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Right);
        assert_eq!(app.controller.current_index(), 1);
        press(&mut app, KeyCode::Char('9'));
        assert_eq!(app.controller.current_index(), 2);
        assert_eq!(app.status_message, "Stepped forward 1 step(s)");
        press(&mut app, KeyCode::Left);
        assert_eq!(app.controller.current_index(), 1);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.controller.current_index(), 0);
    }

    #[test]
    fn test_space_without_animation_reports_it() {
        let mut app = app();
        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.status_message, "No animation for this language");
        assert!(!app.controller.is_playing());
    }

    #[test]
    fn test_speed_keys_clamp() {
        let mut app = app();
        for _ in 0..20 {
            press(&mut app, KeyCode::Char('+'));
        }
        assert_eq!(app.controller.speed(), 4.0);
        for _ in 0..20 {
            press(&mut app, KeyCode::Char('-'));
        }
        assert_eq!(app.controller.speed(), 0.25);
    }

    #[test]
    fn test_language_without_script_shows_placeholder() {
        let mut app = app();
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.session.language, "java");
        assert!(!app.controller.view().is_available());
        assert_eq!(app.controller.current_index(), 0);
    }

    #[test]
    fn test_focus_cycles() {
        let mut app = app();
        for _ in 0..4 {
            press(&mut app, KeyCode::Tab);
        }
        assert_eq!(app.focused_pane, FocusedPane::Structure);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focused_pane, FocusedPane::Narration);
    }
}
