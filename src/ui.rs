//! TUI rendering module.
//!
//! This module handles all visual rendering using ratatui:
//! - Search bar at the top
//! - Acronym table (read-only projection of the filtered records)
//! - Status bar with mode, notification and position
//! - Overlays for the add/edit form, delete confirmation and help

pub mod glyphs;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

use crate::model::{AppMode, AppState, FormField, FormKind, FormState, NotificationKind};

/// Height of the search bar (including borders).
const SEARCH_BAR_HEIGHT: u16 = 3;
/// Height of the status bar.
const STATUS_BAR_HEIGHT: u16 = 1;
/// Table borders plus header row.
const TABLE_CHROME_HEIGHT: u16 = 3;
/// Bounds for the acronym column width (without the selection marker).
const MIN_ACRONYM_WIDTH: usize = 7;
const MAX_ACRONYM_WIDTH: usize = 24;
/// Width of the form overlay.
const FORM_WIDTH: u16 = 64;

const HELP_LINES: &[(&str, &str)] = &[
    ("j / Down, k / Up", "Move selection"),
    ("g / Home, G / End", "First / last acronym"),
    ("PageUp / PageDown", "Scroll one page"),
    ("/", "Search acronyms and descriptions (Enter keeps, Esc clears)"),
    ("a", "Add a new acronym"),
    ("e / Enter", "Edit the selected acronym"),
    ("d / Delete", "Delete the selected acronym (asks first)"),
    ("x", "Export the whole list to MasterAcronym.txt"),
    ("?", "Show this help"),
    ("q / Ctrl+C", "Quit"),
];

/// Renders the complete UI.
pub fn render(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(SEARCH_BAR_HEIGHT),
            Constraint::Min(TABLE_CHROME_HEIGHT),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .split(area);

    render_search_bar(frame, state, main_layout[0]);
    render_table(frame, state, main_layout[1]);
    render_status_bar(frame, state, main_layout[2]);

    match &state.mode {
        AppMode::Form(form) => render_form(frame, state, form, area),
        AppMode::ConfirmDelete(key) => render_confirm_delete(frame, key, area),
        AppMode::Help => render_help(frame, area),
        AppMode::Normal | AppMode::Search => {}
    }
}

/// Renders the search input.
fn render_search_bar(frame: &mut Frame, state: &AppState, area: Rect) {
    let searching = state.mode == AppMode::Search;
    let mut spans = vec![Span::styled(
        format!("{} ", state.glyphs.search),
        Style::default().fg(Color::DarkGray),
    )];

    if state.search.is_empty() && !searching {
        spans.push(Span::styled(
            "Search acronyms...",
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        spans.push(Span::raw(state.search.clone()));
        if searching {
            spans.push(Span::raw(state.glyphs.cursor));
        }
    }

    let border_style = if searching {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title("Acronym Management System");

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

/// Truncates `s` to `width` characters, marking the cut with `ellipsis`.
fn truncate(s: &str, width: usize, ellipsis: &str) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let kept: String = s.chars().take(width.saturating_sub(1)).collect();
    format!("{}{}", kept, ellipsis)
}

/// Renders the acronym table.
fn render_table(frame: &mut Frame, state: &AppState, area: Rect) {
    let records = state.visible_records();
    let glyphs = &state.glyphs;

    let acronym_width = records
        .iter()
        .map(|r| r.acronym.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(MIN_ACRONYM_WIDTH, MAX_ACRONYM_WIDTH);
    let marker_width = glyphs.selected.chars().count();

    let start = state.offset.min(records.len());
    let end = (start + state.visible_rows).min(records.len());

    let rows: Vec<Row> = records[start..end]
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let is_selected = start + i == state.selected;
            let marker = if is_selected { glyphs.selected } else { glyphs.unselected };
            let acronym = truncate(&record.acronym, acronym_width, glyphs.ellipsis);
            let style = if is_selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(format!("{}{}", marker, acronym)),
                Cell::from(record.description.clone()),
            ])
            .style(style)
        })
        .collect();

    let header = Row::new(vec![
        Cell::from(format!("{}Acronym", " ".repeat(marker_width))),
        Cell::from("Description"),
    ])
    .style(Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED));

    // Scroll indicators
    let more_above = if start > 0 { glyphs.arrow_up } else { " " };
    let more_below = if end < records.len() { glyphs.arrow_down } else { " " };
    let title = format!(
        "Acronyms [{}/{}] {}{}",
        records.len(),
        state.store.len(),
        more_above,
        more_below
    );

    let widths = [
        Constraint::Length((acronym_width + marker_width) as u16),
        Constraint::Min(10),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(2)
        .block(Block::default().borders(Borders::ALL).title(title));

    frame.render_widget(table, area);

    if records.is_empty() {
        let message = if state.store.is_empty() {
            "No acronyms yet. Press 'a' to add one."
        } else {
            "No acronyms match the search."
        };
        let inner = Rect {
            x: area.x + 2,
            y: area.y + 2,
            width: area.width.saturating_sub(4),
            height: area.height.saturating_sub(3).min(1),
        };
        frame.render_widget(
            Paragraph::new(Span::styled(message, Style::default().fg(Color::DarkGray))),
            inner,
        );
    }
}

/// Renders the status bar at the bottom.
fn render_status_bar(frame: &mut Frame, state: &AppState, area: Rect) {
    let mode_str = match &state.mode {
        AppMode::Normal => "NORMAL",
        AppMode::Search => "SEARCH",
        AppMode::Form(form) => match form.kind {
            FormKind::Add => "ADD",
            FormKind::Edit { .. } => "EDIT",
        },
        AppMode::ConfirmDelete(_) => "DELETE",
        AppMode::Help => "HELP",
    };

    let (message, bg) = match &state.notification {
        Some(n) => {
            let color = match n.kind {
                NotificationKind::Success => Color::Green,
                NotificationKind::Error => Color::Red,
            };
            (format!("{}: {}", n.title, n.message), color)
        }
        None => (state.store.storage_description(), Color::Cyan),
    };

    let total = state.visible_records().len();
    let position_info = if total == 0 {
        "Row 0/0 ".to_string()
    } else {
        format!("Row {}/{} ", state.selected + 1, total)
    };

    let left_content = format!(" {} | {} ", mode_str, message);
    let left_len = left_content.chars().count();

    let status_line = Line::from(vec![
        Span::styled(left_content, Style::default().fg(Color::Black).bg(bg)),
        Span::styled(
            " ".repeat((area.width as usize).saturating_sub(left_len + position_info.len())),
            Style::default().bg(bg),
        ),
        Span::styled(
            position_info,
            Style::default()
                .fg(Color::Black)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
    ]);

    frame.render_widget(Paragraph::new(status_line), area);
}

/// A rectangle of at most `width` x `height` centered in `area`.
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Renders the add/edit dialog.
fn render_form(frame: &mut Frame, state: &AppState, form: &FormState, area: Rect) {
    let glyphs = &state.glyphs;
    let inner_width = FORM_WIDTH.min(area.width).saturating_sub(4).max(1) as usize;

    let label_style = |field: FormField| {
        if form.focus == field {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        }
    };
    let with_cursor = |value: &str, field: FormField| {
        if form.focus == field {
            format!("{}{}", value, glyphs.cursor)
        } else {
            value.to_string()
        }
    };

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled("Acronym", label_style(FormField::Acronym))));
    let acronym = with_cursor(&form.acronym, FormField::Acronym);
    lines.push(Line::from(truncate(&acronym, inner_width, glyphs.ellipsis)));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(
        "Description",
        label_style(FormField::Description),
    )));
    let description = with_cursor(&form.description, FormField::Description);
    let wrapped = textwrap::wrap(&description, inner_width);
    if wrapped.is_empty() {
        lines.push(Line::from(""));
    }
    for segment in wrapped {
        lines.push(Line::from(segment.into_owned()));
    }
    lines.push(Line::from(""));

    lines.push(Line::from(glyphs.h_separator.repeat(inner_width)));
    lines.push(Line::from(Span::styled(
        format!("[Enter] {}  [Tab] Switch field  [Esc] Cancel", form.submit_label()),
        Style::default().fg(Color::DarkGray),
    )));

    let height = lines.len() as u16 + 2;
    let popup = centered_rect(area, FORM_WIDTH, height);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(form.title());

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

/// Renders the delete confirmation dialog.
fn render_confirm_delete(frame: &mut Frame, key: &str, area: Rect) {
    let lines = vec![
        Line::from(format!("Delete acronym '{}'?", key)),
        Line::from(""),
        Line::from(Span::styled(
            "[y/Enter] Delete  [any other key] Cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let width = lines
        .iter()
        .map(|l| l.width() as u16)
        .max()
        .unwrap_or(0)
        + 4;
    let popup = centered_rect(area, width, lines.len() as u16 + 2);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title("Confirm");

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

/// Builds the help text wrapped to `width` columns.
pub fn help_lines(width: usize) -> Vec<String> {
    let key_width = HELP_LINES.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    let text_width = width.saturating_sub(key_width + 2).max(10);
    let indent = " ".repeat(key_width + 2);

    let mut out = Vec::new();
    for (keys, text) in HELP_LINES {
        for (i, segment) in textwrap::wrap(text, text_width).iter().enumerate() {
            if i == 0 {
                out.push(format!("{:<kw$}  {}", keys, segment, kw = key_width));
            } else {
                out.push(format!("{}{}", indent, segment));
            }
        }
    }
    out.push(String::new());
    out.push("Press any key to close".to_string());
    out
}

/// Renders the help overlay.
fn render_help(frame: &mut Frame, area: Rect) {
    let width = area.width.saturating_sub(4).min(76);
    let lines: Vec<Line> = help_lines(width.saturating_sub(2) as usize)
        .into_iter()
        .map(Line::from)
        .collect();
    let popup = centered_rect(area, width, lines.len() as u16 + 2);
    let block = Block::default().borders(Borders::ALL).title("Help");

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

/// Calculates the number of table rows that fit in the terminal.
pub fn calculate_visible_rows(terminal_height: u16) -> usize {
    terminal_height.saturating_sub(SEARCH_BAR_HEIGHT + STATUS_BAR_HEIGHT + TABLE_CHROME_HEIGHT) as usize
}
