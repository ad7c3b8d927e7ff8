pub mod footer;
pub mod format_entry;
pub mod help;
pub mod strip;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::app::{App, AppMode};

/// Blank columns kept around the widest expected label.
const STRIP_PADDING: usize = 4;
const MIN_STRIP_WIDTH: usize = 24;

/// Strip width: sized to the widest label slot, capped by the terminal.
pub fn strip_width(app: &App, terminal_width: u16) -> u16 {
    let widest = app.sampler.labels().iter().map(|l| l.width_hint).max().unwrap_or(0);
    let wanted = (widest + STRIP_PADDING + 2).max(MIN_STRIP_WIDTH); // + borders
    wanted.min(terminal_width as usize) as u16
}

/// Columns inside the strip borders available to labels.
pub fn strip_inner_width(app: &App, terminal_width: u16) -> usize {
    strip_width(app, terminal_width).saturating_sub(2) as usize
}

/// Render the complete UI
pub fn draw(f: &mut Frame, app: &App) {
    let size = f.area();
    let strip_height = (app.sampler.rows_needed(&app.config).max(1) + 2) as u16;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(strip_height), // labels + borders
            Constraint::Min(0),
            Constraint::Length(1),            // footer (F-key bar)
        ])
        .split(size);

    let strip_area = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(strip_width(app, size.width)),
            Constraint::Min(0),
        ])
        .split(chunks[0])[0];

    strip::draw_strip(f, app, strip_area);
    footer::draw_footer(f, app, chunks[2]);

    // Overlay popups
    match app.mode {
        AppMode::Help => help::draw_help(f),
        AppMode::EditFormat => format_entry::draw_format_entry(f, app),
        AppMode::Normal => {}
    }
}
