//! Application controller.
//!
//! This module orchestrates the main application loop:
//! - Terminal initialization and cleanup
//! - Initial load of the acronym file
//! - Event polling and handling
//! - State updates and rendering

use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use crate::config::Config;
use crate::event::{apply_action, handle_event, poll_event, Action};
use crate::model::AppState;
use crate::ui::{calculate_visible_rows, render};

/// The main application controller.
pub struct App {
    /// Terminal backend
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Application state
    state: AppState,
    /// Event poll timeout
    tick_rate: Duration,
}

impl App {
    /// Creates a new application with the given state.
    pub fn new(state: AppState) -> Result<Self> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            state,
            tick_rate: Duration::from_millis(50),
        })
    }

    /// Runs the main application loop.
    pub fn run(&mut self) -> Result<()> {
        self.update_viewport_size()?;

        loop {
            self.terminal.draw(|frame| {
                render(frame, &self.state);
            })?;

            match poll_event(self.tick_rate) {
                Some(event) => {
                    let action = handle_event(event, &self.state.mode);

                    // Handle resize specially to update viewport
                    if let Action::Resize(_, _) = action {
                        self.update_viewport_size()?;
                    }

                    if !apply_action(&mut self.state, action) {
                        break;
                    }
                }
                None => self.state.tick(),
            }
        }

        info!(count = self.state.store.len(), "session ended");
        Ok(())
    }

    /// Updates the viewport size based on terminal dimensions.
    fn update_viewport_size(&mut self) -> Result<()> {
        let size = self.terminal.size()?;
        self.state.update_viewport_size(calculate_visible_rows(size.height));
        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        // Restore terminal
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Builds the initial state: configured store, loaded once.
///
/// A load failure does not stop startup; it shows up as a notification.
pub fn initial_state(config: &Config) -> AppState {
    let mut state = AppState::new(config.open_store(), config.export_dir.clone())
        .with_glyphs(config.glyphs());
    state.load_initial();
    state
}

/// Convenience function to run the application with a configuration.
pub fn run_app(config: &Config) -> Result<()> {
    info!(source = %config.source.display(), write_back = config.write_back, "starting");
    let state = initial_state(config);
    let mut app = App::new(state)?;
    app.run()
}
