//! Data model for the acronym manager.
//!
//! This module contains all data structures for representing:
//! - Acronym records and their validation rules
//! - The add/edit form
//! - Notifications shown in the status bar
//! - Application state
//!
//! The store itself lives in [`crate::store`]. `AppState` owns it and is
//! the only place it is mutated from.

use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::codec::DELIMITER;
use crate::export;
use crate::store::{RecordStore, StoreError};
use crate::ui::glyphs::{self, Glyphs};

/// A single acronym and its description.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AcronymRecord {
    /// The acronym itself, used as the record key
    pub acronym: String,
    /// Free text expansion or explanation
    pub description: String,
}

/// Reasons a record cannot be stored.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("Acronym is required")]
    EmptyAcronym,

    #[error("Description is required")]
    EmptyDescription,

    #[error("Acronym cannot contain '|'")]
    DelimiterInAcronym,

    #[error("Acronym and description must be a single line")]
    LineBreak,
}

impl AcronymRecord {
    /// Creates a new record.
    pub fn new(acronym: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            acronym: acronym.into(),
            description: description.into(),
        }
    }

    /// Checks that the record survives an encode/decode round trip.
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.acronym.trim().is_empty() {
            return Err(RecordError::EmptyAcronym);
        }
        if self.description.trim().is_empty() {
            return Err(RecordError::EmptyDescription);
        }
        if self.acronym.contains(DELIMITER) {
            return Err(RecordError::DelimiterInAcronym);
        }
        let has_break = |s: &str| s.contains('\n') || s.contains('\r');
        if has_break(&self.acronym) || has_break(&self.description) {
            return Err(RecordError::LineBreak);
        }
        Ok(())
    }

    /// Case-insensitive substring match against acronym or description.
    ///
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.acronym.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

/// Which form field has input focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Acronym,
    Description,
}

/// Whether the form creates a record or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormKind {
    Add,
    /// Editing the record currently stored under `original`
    Edit { original: String },
}

/// State of the add/edit dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub kind: FormKind,
    pub acronym: String,
    pub description: String,
    pub focus: FormField,
}

impl FormState {
    /// An empty form for a new record.
    pub fn add() -> Self {
        Self {
            kind: FormKind::Add,
            acronym: String::new(),
            description: String::new(),
            focus: FormField::Acronym,
        }
    }

    /// A form pre-filled with an existing record.
    pub fn edit(record: &AcronymRecord) -> Self {
        Self {
            kind: FormKind::Edit {
                original: record.acronym.clone(),
            },
            acronym: record.acronym.clone(),
            description: record.description.clone(),
            focus: FormField::Acronym,
        }
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            FormKind::Add => "Add New Acronym",
            FormKind::Edit { .. } => "Edit Acronym",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self.kind {
            FormKind::Add => "Add",
            FormKind::Edit { .. } => "Update",
        }
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            FormField::Acronym => &mut self.acronym,
            FormField::Description => &mut self.description,
        }
    }

    pub fn input(&mut self, c: char) {
        self.focused_mut().push(c);
    }

    pub fn backspace(&mut self) {
        self.focused_mut().pop();
    }

    /// Toggles focus. With two fields, next and previous are the same move.
    pub fn switch_field(&mut self) {
        self.focus = match self.focus {
            FormField::Acronym => FormField::Description,
            FormField::Description => FormField::Acronym,
        };
    }

    /// The record the form would submit, with surrounding whitespace trimmed.
    pub fn to_record(&self) -> AcronymRecord {
        AcronymRecord::new(self.acronym.trim(), self.description.trim())
    }
}

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// Number of controller ticks a notification stays visible.
pub const NOTIFICATION_TICKS: u16 = 80;

/// A transient message shown in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    /// Remaining ticks before the notification disappears
    pub ttl: u16,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: "Success".to_string(),
            message: message.into(),
            ttl: NOTIFICATION_TICKS,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            title: "Error".to_string(),
            message: message.into(),
            ttl: NOTIFICATION_TICKS,
        }
    }
}

/// Application mode for handling different input states.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppMode {
    /// Table navigation
    #[default]
    Normal,
    /// Typing into the search bar (after pressing '/')
    Search,
    /// Add or edit dialog is open
    Form(FormState),
    /// Waiting for confirmation before deleting the given acronym
    ConfirmDelete(String),
    /// Help overlay
    Help,
}

/// The complete application state.
#[derive(Debug)]
pub struct AppState {
    /// All records for this session
    pub store: RecordStore,
    /// Live search term applied to the table
    pub search: String,
    /// Index of the selected row in the filtered view
    pub selected: usize,
    /// Index of the first visible row in the filtered view
    pub offset: usize,
    /// Number of table rows that fit on screen
    pub visible_rows: usize,
    /// Current application mode
    pub mode: AppMode,
    /// Notification currently displayed, if any
    pub notification: Option<Notification>,
    /// Directory export artifacts are written to
    pub export_dir: PathBuf,
    /// Glyph set used by the renderer
    pub glyphs: Glyphs,
    /// Whether the application should quit
    pub should_quit: bool,
}

impl AppState {
    /// Creates a new application state around a store.
    pub fn new(store: RecordStore, export_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            search: String::new(),
            selected: 0,
            offset: 0,
            visible_rows: 0,
            mode: AppMode::Normal,
            notification: None,
            export_dir: export_dir.into(),
            glyphs: glyphs::select(false),
            should_quit: false,
        }
    }

    /// Replaces the glyph set.
    pub fn with_glyphs(mut self, glyphs: Glyphs) -> Self {
        self.glyphs = glyphs;
        self
    }

    /// Loads records from the store's storage.
    ///
    /// Failure is reported as a notification and leaves the list as it was.
    pub fn load_initial(&mut self) {
        match self.store.load_initial() {
            Ok(count) => {
                info!(count, "loaded acronyms");
            }
            Err(e) => {
                error!(error = %e, "failed to load acronyms");
                self.notify(Notification::error("Failed to load acronyms"));
            }
        }
        self.clamp_selection();
    }

    // ---- Read-only projections ----

    /// Records matching the current search term, in canonical order.
    pub fn visible_records(&self) -> Vec<&AcronymRecord> {
        self.store.filtered(&self.search)
    }

    /// The record under the selection, if any.
    pub fn selected_record(&self) -> Option<&AcronymRecord> {
        self.visible_records().get(self.selected).copied()
    }

    // ---- Notifications ----

    pub fn notify(&mut self, notification: Notification) {
        self.notification = Some(notification);
    }

    /// Advances notification expiry by one controller tick.
    pub fn tick(&mut self) {
        if let Some(n) = self.notification.as_mut() {
            n.ttl = n.ttl.saturating_sub(1);
            if n.ttl == 0 {
                self.notification = None;
            }
        }
    }

    // ---- Navigation ----

    /// Updates the number of visible table rows.
    pub fn update_viewport_size(&mut self, rows: usize) {
        self.visible_rows = rows;
        self.ensure_selection_visible();
    }

    pub fn move_up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.ensure_selection_visible();
        }
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.visible_records().len() {
            self.selected += 1;
            self.ensure_selection_visible();
        }
    }

    pub fn goto_first(&mut self) {
        self.selected = 0;
        self.ensure_selection_visible();
    }

    pub fn goto_last(&mut self) {
        self.selected = self.visible_records().len().saturating_sub(1);
        self.ensure_selection_visible();
    }

    pub fn page_up(&mut self) {
        self.selected = self.selected.saturating_sub(self.visible_rows.max(1));
        self.ensure_selection_visible();
    }

    pub fn page_down(&mut self) {
        self.selected += self.visible_rows.max(1);
        self.clamp_selection();
    }

    /// Moves the selection onto `acronym` if it is in the filtered view.
    fn select_acronym(&mut self, acronym: &str) {
        if let Some(idx) = self
            .visible_records()
            .iter()
            .position(|r| r.acronym == acronym)
        {
            self.selected = idx;
        }
        self.clamp_selection();
    }

    /// Clamps the selection to the filtered view and scrolls to it.
    fn clamp_selection(&mut self) {
        let len = self.visible_records().len();
        self.selected = self.selected.min(len.saturating_sub(1));
        self.ensure_selection_visible();
    }

    /// Keeps the selected row inside the visible window.
    fn ensure_selection_visible(&mut self) {
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.visible_rows > 0 && self.selected >= self.offset + self.visible_rows {
            self.offset = self.selected + 1 - self.visible_rows;
        }

        // Don't leave empty rows at the bottom when the list shrinks
        let len = self.visible_records().len();
        if self.offset + self.visible_rows > len {
            self.offset = len.saturating_sub(self.visible_rows);
        }
    }

    // ---- Search ----

    pub fn enter_search_mode(&mut self) {
        self.mode = AppMode::Search;
    }

    pub fn search_input(&mut self, c: char) {
        self.search.push(c);
        self.selected = 0;
        self.clamp_selection();
    }

    pub fn search_backspace(&mut self) {
        self.search.pop();
        self.clamp_selection();
    }

    /// Keeps the current term and returns to the table.
    pub fn confirm_search(&mut self) {
        self.mode = AppMode::Normal;
    }

    /// Clears the term and returns to the table.
    pub fn cancel_search(&mut self) {
        self.search.clear();
        self.mode = AppMode::Normal;
        self.clamp_selection();
    }

    // ---- Add / edit form ----

    pub fn open_add_form(&mut self) {
        self.mode = AppMode::Form(FormState::add());
    }

    pub fn open_edit_form(&mut self) {
        if let Some(record) = self.selected_record() {
            let form = FormState::edit(record);
            self.mode = AppMode::Form(form);
        }
    }

    pub fn form_input(&mut self, c: char) {
        if let AppMode::Form(ref mut form) = self.mode {
            form.input(c);
        }
    }

    pub fn form_backspace(&mut self) {
        if let AppMode::Form(ref mut form) = self.mode {
            form.backspace();
        }
    }

    pub fn form_switch_field(&mut self) {
        if let AppMode::Form(ref mut form) = self.mode {
            form.switch_field();
        }
    }

    pub fn cancel_form(&mut self) {
        self.mode = AppMode::Normal;
    }

    /// Submits the open form to the store.
    ///
    /// The form stays open when the store rejects the record.
    pub fn submit_form(&mut self) {
        let AppMode::Form(ref form) = self.mode else {
            return;
        };
        let record = form.to_record();
        let result = match &form.kind {
            FormKind::Add => self.store.add(record.clone()),
            FormKind::Edit { original } => {
                let original = original.clone();
                self.store.update(&original, record.clone())
            }
        };

        match result {
            Ok(()) => {
                self.mode = AppMode::Normal;
                self.notify(Notification::success("Acronyms updated successfully"));
                self.select_acronym(&record.acronym);
            }
            Err(e) => {
                warn!(error = %e, acronym = %record.acronym, "form submission rejected");
                self.notify(Notification::error(store_error_message(&e)));
            }
        }
    }

    // ---- Delete ----

    /// Asks for confirmation before deleting the selected record.
    pub fn request_delete(&mut self) {
        if let Some(record) = self.selected_record() {
            let key = record.acronym.clone();
            self.mode = AppMode::ConfirmDelete(key);
        }
    }

    pub fn confirm_delete(&mut self) {
        let AppMode::ConfirmDelete(ref key) = self.mode else {
            return;
        };
        let key = key.clone();
        self.mode = AppMode::Normal;
        match self.store.delete(&key) {
            Ok(()) => {
                self.notify(Notification::success("Acronyms updated successfully"));
            }
            Err(e) => {
                warn!(error = %e, acronym = %key, "delete rejected");
                self.notify(Notification::error(store_error_message(&e)));
            }
        }
        self.clamp_selection();
    }

    pub fn cancel_delete(&mut self) {
        self.mode = AppMode::Normal;
    }

    // ---- Export ----

    /// Writes the whole collection to the export directory.
    pub fn export(&mut self) {
        let records = self.store.records();
        match export::export(&records, &self.export_dir) {
            Ok(path) => {
                self.notify(Notification::success(format!(
                    "Exported {} acronyms to {}",
                    records.len(),
                    path.display()
                )));
            }
            Err(e) => {
                error!(error = %e, "export failed");
                self.notify(Notification::error("Failed to export acronyms"));
            }
        }
    }

    // ---- Help ----

    pub fn show_help(&mut self) {
        self.mode = AppMode::Help;
    }

    pub fn dismiss_help(&mut self) {
        debug!("help dismissed");
        self.mode = AppMode::Normal;
    }
}

/// User-facing text for a store error.
fn store_error_message(e: &StoreError) -> String {
    match e {
        StoreError::SaveFailure(_) => "Failed to save acronyms".to_string(),
        StoreError::LoadFailure(_) => "Failed to load acronyms".to_string(),
        other => other.to_string(),
    }
}
