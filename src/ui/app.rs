//! Player state and event loop

use crate::config::PlayerConfig;
use crate::errors::PlaybackError;
use crate::snapshot::Stepper;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Upper bound on steps taken by "jump to end" for engines without a known total
const JUMP_LIMIT: usize = 1000;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Code,
    Array,
    Info,
    Narration,
}

impl FocusedPane {
    /// Move focus clockwise: code -> narration -> array -> info
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Code => FocusedPane::Narration,
            FocusedPane::Narration => FocusedPane::Array,
            FocusedPane::Array => FocusedPane::Info,
            FocusedPane::Info => FocusedPane::Code,
        }
    }
}

/// The player: any [`Stepper`] plus the listing of the algorithm it runs
pub struct App {
    pub stepper: Box<dyn Stepper>,
    pub pseudocode: &'static [&'static str],
    pub config: PlayerConfig,

    pub focused_pane: FocusedPane,

    pub code_scroll: super::panes::code::CodeScrollState,
    pub array_scroll: usize,
    pub info_scroll: usize,
    /// Lines scrolled up from the newest narration entry
    pub narration_scroll: usize,

    pub should_quit: bool,
    pub status_message: String,
    pub is_playing: bool,
    pub last_play_time: Instant,
    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl App {
    pub fn new(
        stepper: Box<dyn Stepper>,
        pseudocode: &'static [&'static str],
        config: PlayerConfig,
    ) -> Self {
        App {
            stepper,
            pseudocode,
            config,
            focused_pane: FocusedPane::Code,
            code_scroll: Default::default(),
            array_scroll: 0,
            info_scroll: 0,
            narration_scroll: 0,
            should_quit: false,
            status_message: String::from("Ready!"),
            is_playing: false,
            last_play_time: Instant::now(),
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

            if self.is_playing && self.last_play_time.elapsed() >= self.config.play_interval {
                self.tick();
            }

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

    /// One auto-play advance; stops playing at the end of the trace
    pub fn tick(&mut self) {
        match self.stepper.step_forward() {
            Ok(()) => {
                self.status_message = "Playing...".to_string();
                self.narration_scroll = 0;
            }
            Err(e) => {
                self.is_playing = false;
                self.status_message = match e {
                    PlaybackError::AtEnd => "Playback complete".to_string(),
                    other => format!("Stopped: {}", other),
                };
            }
        }
        self.last_play_time = Instant::now();
    }

    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(main_chunks[0]);

        // Left column: pseudocode (top) | narration (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(columns[0]);

        // Right column: state (top) | info (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(columns[1]);

        let step = self.stepper.current();

        super::panes::render_code_pane(
            frame,
            left_rows[0],
            &self.config.title,
            self.pseudocode,
            step.code_line,
            self.focused_pane == FocusedPane::Code,
            &mut self.code_scroll,
        );

        super::panes::render_narration_pane(
            frame,
            left_rows[1],
            &self.stepper.narration(),
            self.focused_pane == FocusedPane::Narration,
            &mut self.narration_scroll,
        );

        super::panes::render_array_pane(
            frame,
            right_rows[0],
            &step,
            self.focused_pane == FocusedPane::Array,
            &mut self.array_scroll,
        );

        super::panes::render_info_pane(
            frame,
            right_rows[1],
            &step,
            self.focused_pane == FocusedPane::Info,
            &mut self.info_scroll,
        );

        super::panes::render_status_bar(
            frame,
            main_chunks[1],
            super::panes::StatusRenderData {
                message: &self.status_message,
                current_step: self.stepper.position(),
                total_steps: self.stepper.total(),
                is_playing: self.is_playing,
                is_error: step.is_error(),
            },
        );
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            // Number keys step forward N times directly
            KeyCode::Char(c @ '1'..='9') => {
                self.is_playing = false;
                let n = c.to_digit(10).unwrap_or(1) as usize;
                let stepped = (0..n)
                    .take_while(|_| self.stepper.step_forward().is_ok())
                    .count();
                self.status_message = format!("Stepped forward {} step(s)", stepped);
                self.narration_scroll = 0;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Left => {
                self.is_playing = false;
                self.step_backward();
            }
            KeyCode::Right => {
                self.is_playing = false;
                self.step_forward();
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Code => {
                    // the current line moves down visually
                    if let Some(row) = self.code_scroll.target_line_row {
                        self.code_scroll.target_line_row = Some(row.saturating_add(1));
                    }
                }
                FocusedPane::Array => self.array_scroll = self.array_scroll.saturating_sub(1),
                FocusedPane::Info => self.info_scroll = self.info_scroll.saturating_sub(1),
                FocusedPane::Narration => {
                    self.narration_scroll = self.narration_scroll.saturating_add(1)
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Code => {
                    if let Some(row) = self.code_scroll.target_line_row {
                        self.code_scroll.target_line_row = Some(row.saturating_sub(1));
                    }
                }
                FocusedPane::Array => self.array_scroll = self.array_scroll.saturating_add(1),
                FocusedPane::Info => self.info_scroll = self.info_scroll.saturating_add(1),
                FocusedPane::Narration => {
                    self.narration_scroll = self.narration_scroll.saturating_sub(1)
                }
            },
            KeyCode::Char(' ') => {
                // 200ms debounce against key repeat
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.is_playing = !self.is_playing;
                    if self.is_playing {
                        self.last_play_time = Instant::now()
                            .checked_sub(self.config.play_interval)
                            .unwrap_or_else(Instant::now);
                        self.status_message = "Playing...".to_string();
                    } else {
                        self.status_message = "Paused".to_string();
                    }
                }
            }
            KeyCode::Enter => {
                self.is_playing = false;
                self.jump_to_end();
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                self.status_message = match self.stepper.rewind_to_start() {
                    Ok(()) => "Jumped to start".to_string(),
                    Err(e) => format!("Cannot rewind: {}", e),
                };
                self.narration_scroll = 0;
            }
            _ => {}
        }
    }

    fn jump_to_end(&mut self) {
        let limit = self.stepper.total().unwrap_or(JUMP_LIMIT);
        while self.stepper.position() + 1 < limit {
            if self.stepper.step_forward().is_err() {
                break;
            }
        }
        self.status_message = "Jumped to end".to_string();
        self.narration_scroll = 0;
    }

    fn step_forward(&mut self) {
        match self.stepper.step_forward() {
            Ok(()) => {
                self.status_message = "Stepped forward".to_string();
                self.narration_scroll = 0;
            }
            Err(e) => {
                self.status_message = format!("Cannot step forward: {}", e);
            }
        }
    }

    fn step_backward(&mut self) {
        match self.stepper.step_backward() {
            Ok(()) => {
                self.status_message = "Stepped backward".to_string();
                self.narration_scroll = 0;
            }
            Err(e) => {
                self.status_message = format!("Cannot step backward: {}", e);
            }
        }
    }
}
