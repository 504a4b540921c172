//! Main TUI application state and logic

use crate::snapshot::{Snapshot, SnapshotManager};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

use super::panes::{HeapScrollState, SourceScrollState, StackScrollState};

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Trace,
    Stack,
    Heap,
}

impl FocusedPane {
    /// Move focus to the next pane (clockwise: source -> trace -> stack -> heap)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Trace,
            FocusedPane::Trace => FocusedPane::Stack,
            FocusedPane::Stack => FocusedPane::Heap,
            FocusedPane::Heap => FocusedPane::Source,
        }
    }
}

/// The main application state
pub struct App {
    pub scene_name: String,

    /// Listing of the scene, one entry per line
    pub source_lines: Vec<String>,

    /// One snapshot per step, plus the empty scene at index 0
    pub history: SnapshotManager,

    /// Index into `history`
    pub position: usize,

    /// Why the trace stopped early, if it did
    pub failure: Option<String>,

    pub focused_pane: FocusedPane,

    /// Per-pane scroll state
    pub source_scroll: SourceScrollState,
    pub stack_scroll: StackScrollState,
    pub heap_scroll: HeapScrollState,
    pub trace_scroll: usize,

    pub should_quit: bool,
    pub status_message: String,

    pub is_playing: bool,
    pub play_interval: Duration,
    pub last_play_time: Instant,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl App {
    pub fn new(
        scene_name: &str,
        source_lines: Vec<String>,
        history: SnapshotManager,
        failure: Option<String>,
    ) -> Self {
        let status_message = match &failure {
            Some(reason) => format!("Trace stopped early: {}", reason),
            None => String::from("Ready!"),
        };

        App {
            scene_name: scene_name.to_string(),
            source_lines,
            history,
            position: 0,
            failure,
            focused_pane: FocusedPane::Source,
            source_scroll: SourceScrollState {
                offset: 0,
                target_line_row: None, // Centered on first render
            },
            stack_scroll: StackScrollState {
                offset: 0,
                prev_item_count: 0,
            },
            heap_scroll: HeapScrollState {
                offset: 0,
                prev_item_count: 0,
            },
            trace_scroll: usize::MAX,
            should_quit: false,
            status_message,
            is_playing: false,
            play_interval: Duration::from_millis(400),
            last_play_time: Instant::now(),
            last_space_press: Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or(Instant::now()),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.is_playing && self.last_play_time.elapsed() >= self.play_interval {
                if self.step_forward() {
                    self.status_message = "Playing...".to_string();
                } else {
                    self.is_playing = false;
                    self.status_message = "Playback complete".to_string();
                }
                self.last_play_time = Instant::now();
            }

            // Use poll with timeout to allow auto-play to work
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    pub fn current(&self) -> Option<&Snapshot> {
        self.history.get(self.position)
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let Some(snapshot) = self.history.get(self.position) else {
            return;
        };
        let state = &snapshot.state;
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(main_chunks[0]);

        // Left column: Source (top) | Trace (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(columns[0]);

        // Right column: Variables (top) | Heap (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(columns[1]);

        super::panes::render_source_pane(
            frame,
            left_rows[0],
            &self.scene_name,
            &self.source_lines,
            state.pc,
            state.last_condition,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        super::panes::render_trace_pane(
            frame,
            left_rows[1],
            &self.history,
            self.position,
            self.focused_pane == FocusedPane::Trace,
            &mut self.trace_scroll,
        );

        super::panes::render_stack_pane(
            frame,
            right_rows[0],
            state,
            &self.source_lines,
            self.focused_pane == FocusedPane::Stack,
            &mut self.stack_scroll,
        );

        super::panes::render_heap_pane(
            frame,
            right_rows[1],
            state,
            self.focused_pane == FocusedPane::Heap,
            &mut self.heap_scroll,
        );

        super::panes::render_status_bar(
            frame,
            main_chunks[1],
            &self.status_message,
            self.position,
            self.history.len(),
            self.failure.is_some(),
            self.is_playing,
        );
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            // Number keys step forward N times directly
            KeyCode::Char(c @ '1'..='9') => {
                self.is_playing = false;
                let n = c.to_digit(10).unwrap_or(1) as usize;
                let mut stepped = 0;
                while stepped < n && self.step_forward() {
                    stepped += 1;
                }
                self.status_message = format!("Stepped forward {} step(s)", stepped);
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Left => {
                self.is_playing = false;
                self.status_message = if self.step_backward() {
                    "Stepped backward".to_string()
                } else {
                    "Cannot step backward: already at the start".to_string()
                };
            }
            KeyCode::Right => {
                self.is_playing = false;
                self.status_message = if self.step_forward() {
                    "Stepped forward".to_string()
                } else {
                    self.end_message()
                };
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Source => {
                    // Scrolling up makes the current line move down visually
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_add(1));
                    }
                }
                FocusedPane::Trace => {
                    self.trace_scroll = self.trace_scroll.saturating_sub(1);
                }
                FocusedPane::Stack => {
                    self.stack_scroll.offset = self.stack_scroll.offset.saturating_sub(1);
                }
                FocusedPane::Heap => {
                    self.heap_scroll.offset = self.heap_scroll.offset.saturating_sub(1);
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Source => {
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_sub(1));
                    }
                }
                FocusedPane::Trace => {
                    self.trace_scroll = self.trace_scroll.saturating_add(1);
                }
                FocusedPane::Stack => {
                    self.stack_scroll.offset = self.stack_scroll.offset.saturating_add(1);
                }
                FocusedPane::Heap => {
                    self.heap_scroll.offset = self.heap_scroll.offset.saturating_add(1);
                }
            },
            KeyCode::Char(' ') => {
                // Toggle auto-play mode (with 200ms debounce to prevent key repeat spam)
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.is_playing = !self.is_playing;
                    if self.is_playing {
                        self.last_play_time = Instant::now()
                            .checked_sub(self.play_interval)
                            .unwrap_or(Instant::now());
                        self.status_message = "Playing...".to_string();
                    } else {
                        self.status_message = "Paused".to_string();
                    }
                }
            }
            KeyCode::Enter => {
                self.is_playing = false;
                self.jump_to(self.history.len().saturating_sub(1));
                self.status_message = self.end_message();
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                self.jump_to(0);
                self.status_message = "Jumped to start".to_string();
            }
            _ => {}
        }
    }

    fn end_message(&self) -> String {
        match &self.failure {
            Some(reason) => format!("Trace stopped early: {}", reason),
            None => "Reached the end of the scene".to_string(),
        }
    }

    /// Move to the next snapshot; false at the end
    pub fn step_forward(&mut self) -> bool {
        if self.position + 1 < self.history.len() {
            self.jump_to(self.position + 1);
            true
        } else {
            false
        }
    }

    /// Move to the previous snapshot; false at the start
    pub fn step_backward(&mut self) -> bool {
        if self.position > 0 {
            self.jump_to(self.position - 1);
            true
        } else {
            false
        }
    }

    fn jump_to(&mut self, position: usize) {
        self.position = position.min(self.history.len().saturating_sub(1));
        // Follow the current step in the trace pane
        self.trace_scroll = usize::MAX;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::config::SceneConfig;
    use crate::scene::driver::SceneDriver;
    use crate::scene::{build_scene, Scene};
    use crate::snapshot::SnapshotRenderer;

    fn app_for(scene: &Scene) -> App {
        let mut renderer = SnapshotRenderer::new(64 * 1024 * 1024).unwrap();
        SceneDriver::run(scene, &mut renderer).unwrap();
        App::new(
            &scene.name,
            scene.source.lines().to_vec(),
            renderer.into_history(),
            None,
        )
    }

    #[test]
    fn test_stepping_stays_in_bounds() {
        let scene = build_scene("make-board", &SceneConfig::connect_four()).unwrap();
        let mut app = app_for(&scene);
        assert!(!app.step_backward());
        assert!(app.step_forward());
        assert_eq!(app.position, 1);

        app.jump_to(usize::MAX);
        assert_eq!(app.position, scene.intents.len());
        assert!(!app.step_forward());
        assert!(app.current().is_some_and(|s| s.state.finished));
    }

    #[test]
    fn test_focus_cycles_through_all_panes() {
        let mut pane = FocusedPane::Source;
        for _ in 0..4 {
            pane = pane.next();
        }
        assert_eq!(pane, FocusedPane::Source);
    }
}
