//! Main TUI application loop.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::info;

use crate::engine::{GridEngine, Notice};

use super::event::{Event, EventHandler};
use super::input::{KeyAction, handle_key, handle_mouse};
use super::render::render;
use super::state::AppState;

/// Main TUI application.
pub struct App {
    state: AppState,
    should_quit: bool,
}

impl App {
    pub fn new(engine: GridEngine, export_path: PathBuf) -> Self {
        Self {
            state: AppState::new(engine, export_path),
            should_quit: false,
        }
    }

    /// Runs the TUI until quit.
    pub fn run(mut self, tick_rate: Duration) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let events = EventHandler::new(tick_rate);

        loop {
            terminal.draw(|frame| render(frame, &mut self.state))?;

            match events.next() {
                Ok(Event::Tick) | Ok(Event::Resize(_)) => {}
                Ok(Event::Key(key)) => match handle_key(&mut self.state, key) {
                    KeyAction::Quit => self.should_quit = true,
                    KeyAction::Export => self.export(),
                    KeyAction::None => {}
                },
                Ok(Event::Mouse(mouse)) => {
                    let _ = handle_mouse(&mut self.state, mouse);
                }
                Err(_) => self.should_quit = true,
            }

            if self.should_quit {
                break;
            }
        }

        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
        Ok(())
    }

    /// Export sink: writes the filtered set to the configured path.
    fn export(&mut self) {
        match self.state.engine.export_rows() {
            Ok(csv) => {
                let rows = csv.lines().count().saturating_sub(1);
                match std::fs::write(&self.state.export_path, &csv) {
                    Ok(()) => {
                        info!(rows, path = %self.state.export_path.display(), "exported CSV");
                        self.state.notify(Notice::Exported(rows).to_string());
                    }
                    Err(err) => self.state.notify(format!("Export failed: {err}")),
                }
            }
            Err(err) => self.state.notify(format!("Export failed: {err}")),
        }
    }
}
