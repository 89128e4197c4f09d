//! Keyboard event handling.
//!
//! In normal mode:
//! - `j`/`k` or arrows: move selection down/up
//! - `g`/`Home`, `G`/`End`: first/last row
//! - `PageUp`/`PageDown`: scroll one page
//! - `/`: search (Enter keeps the term, Esc clears it)
//! - `a`: add, `e`/Enter: edit, `d`/Delete: delete (with confirmation)
//! - `x`: export
//! - `?`: help
//! - `q` or Ctrl+C: quit
//!
//! In the form, Tab/Shift+Tab/arrows switch fields, Enter submits and Esc
//! cancels. In the delete confirmation, `y` or Enter deletes and any other
//! key cancels.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use crate::model::{AppMode, AppState};

/// Actions that can be triggered by keyboard input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No action (key not recognized)
    None,
    /// Quit the application
    Quit,
    /// Move selection up
    MoveUp,
    /// Move selection down
    MoveDown,
    /// Select the first row
    GotoFirst,
    /// Select the last row
    GotoLast,
    /// Move one page up
    PageUp,
    /// Move one page down
    PageDown,
    /// Resize event (terminal resized)
    Resize(u16, u16),
    /// Focus the search bar
    EnterSearchMode,
    /// Add character to the search term
    SearchChar(char),
    /// Backspace in search mode
    SearchBackspace,
    /// Keep the search term and leave search mode
    ConfirmSearch,
    /// Clear the search term and leave search mode
    CancelSearch,
    /// Open the empty add form
    OpenAddForm,
    /// Open the edit form for the selected record
    OpenEditForm,
    /// Add character to the focused form field
    FormChar(char),
    /// Backspace in the focused form field
    FormBackspace,
    /// Move focus to the other form field
    FormSwitchField,
    /// Submit the form
    SubmitForm,
    /// Close the form without changes
    CancelForm,
    /// Ask to delete the selected record
    RequestDelete,
    /// Delete after confirmation
    ConfirmDelete,
    /// Keep the record
    CancelDelete,
    /// Export the list
    Export,
    /// Show the help overlay
    ShowHelp,
    /// Dismiss the help overlay
    DismissHelp,
}

/// Polls for keyboard events with a timeout.
///
/// Returns `None` if no event occurred within the timeout.
pub fn poll_event(timeout: Duration) -> Option<Event> {
    if event::poll(timeout).ok()? {
        event::read().ok()
    } else {
        None
    }
}

/// Converts a crossterm event to an Action based on current app mode.
pub fn handle_event(event: Event, mode: &AppMode) -> Action {
    match event {
        Event::Key(key_event) if key_event.kind != KeyEventKind::Release => {
            handle_key_event(key_event, mode)
        }
        Event::Resize(width, height) => Action::Resize(width, height),
        _ => Action::None,
    }
}

/// Handles a key event based on the current application mode.
fn handle_key_event(key: KeyEvent, mode: &AppMode) -> Action {
    // Ctrl+C quits from anywhere
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::Quit;
    }

    match mode {
        AppMode::Normal => handle_normal_mode(key),
        AppMode::Search => handle_search_mode(key),
        AppMode::Form(_) => handle_form_mode(key),
        AppMode::ConfirmDelete(_) => handle_confirm_mode(key),
        AppMode::Help => Action::DismissHelp,
    }
}

/// Handles key events in normal mode.
fn handle_normal_mode(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => Action::MoveDown,
        KeyCode::Char('k') | KeyCode::Up => Action::MoveUp,
        KeyCode::Char('g') | KeyCode::Home => Action::GotoFirst,
        KeyCode::Char('G') | KeyCode::End => Action::GotoLast,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::PageDown => Action::PageDown,

        KeyCode::Char('/') => Action::EnterSearchMode,
        KeyCode::Char('a') => Action::OpenAddForm,
        KeyCode::Char('e') | KeyCode::Enter => Action::OpenEditForm,
        KeyCode::Char('d') | KeyCode::Delete => Action::RequestDelete,
        KeyCode::Char('x') => Action::Export,
        KeyCode::Char('?') => Action::ShowHelp,
        KeyCode::Char('q') => Action::Quit,

        _ => Action::None,
    }
}

/// Handles key events while typing a search term.
fn handle_search_mode(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Enter => Action::ConfirmSearch,
        KeyCode::Esc => Action::CancelSearch,
        KeyCode::Backspace => Action::SearchBackspace,
        KeyCode::Char(c) => Action::SearchChar(c),
        _ => Action::None,
    }
}

/// Handles key events in the add/edit form.
fn handle_form_mode(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Enter => Action::SubmitForm,
        KeyCode::Esc => Action::CancelForm,
        KeyCode::Backspace => Action::FormBackspace,
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => Action::FormSwitchField,
        KeyCode::Char(c) => Action::FormChar(c),
        _ => Action::None,
    }
}

/// Handles key events in the delete confirmation.
fn handle_confirm_mode(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Action::ConfirmDelete,
        _ => Action::CancelDelete,
    }
}

/// Applies an action to the application state.
///
/// Returns `true` if the application should continue, `false` if it should quit.
pub fn apply_action(state: &mut AppState, action: Action) -> bool {
    match action {
        Action::None => {}
        Action::Quit => {
            state.should_quit = true;
        }
        Action::MoveUp => {
            state.move_up();
        }
        Action::MoveDown => {
            state.move_down();
        }
        Action::GotoFirst => {
            state.goto_first();
        }
        Action::GotoLast => {
            state.goto_last();
        }
        Action::PageUp => {
            state.page_up();
        }
        Action::PageDown => {
            state.page_down();
        }
        Action::Resize(_, _) => {
            // Resize is handled in the main loop with actual terminal dimensions
        }
        Action::EnterSearchMode => {
            state.enter_search_mode();
        }
        Action::SearchChar(c) => {
            state.search_input(c);
        }
        Action::SearchBackspace => {
            state.search_backspace();
        }
        Action::ConfirmSearch => {
            state.confirm_search();
        }
        Action::CancelSearch => {
            state.cancel_search();
        }
        Action::OpenAddForm => {
            state.open_add_form();
        }
        Action::OpenEditForm => {
            state.open_edit_form();
        }
        Action::FormChar(c) => {
            state.form_input(c);
        }
        Action::FormBackspace => {
            state.form_backspace();
        }
        Action::FormSwitchField => {
            state.form_switch_field();
        }
        Action::SubmitForm => {
            state.submit_form();
        }
        Action::CancelForm => {
            state.cancel_form();
        }
        Action::RequestDelete => {
            state.request_delete();
        }
        Action::ConfirmDelete => {
            state.confirm_delete();
        }
        Action::CancelDelete => {
            state.cancel_delete();
        }
        Action::Export => {
            state.export();
        }
        Action::ShowHelp => {
            state.show_help();
        }
        Action::DismissHelp => {
            state.dismiss_help();
        }
    }

    !state.should_quit
}
