use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{App, AppMode};

/// F-key definitions: (key_label, description)
const FKEYS_NORMAL: &[(&str, &str)] = &[
    ("F1", "Help  "),
    ("F2", "Format"),
    ("r", "Rescan"),
    ("s", "Save  "),
    ("z", "Pause "),
    ("F10", "Quit "),
];

const FKEYS_EDIT: &[(&str, &str)] = &[
    ("Esc", "Cancel"),
    ("Enter", "Apply "),
    ("F10", "Quit "),
];

/// Draw the bottom F-key bar, followed by status and last sample time.
pub fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    // Full-width dark background first
    let bg_fill = " ".repeat(area.width as usize);
    f.render_widget(
        Paragraph::new(bg_fill).style(Style::default().bg(Color::Indexed(234))),
        area,
    );

    let fkeys = match app.mode {
        AppMode::EditFormat => FKEYS_EDIT,
        _ => FKEYS_NORMAL,
    };

    let desc_style = Style::default()
        .fg(Color::Indexed(252))  // light gray
        .bg(Color::Indexed(234)); // very dark gray

    let mut spans: Vec<Span> = Vec::new();
    for (key, desc) in fkeys {
        // Key label: black text on cyan background (htop style)
        spans.push(Span::styled(
            key.to_string(),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(desc.to_string(), desc_style));
    }

    if app.paused {
        spans.push(Span::styled(
            " PAUSED ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        ));
    }
    if let Some(ts) = app.last_sample {
        spans.push(Span::styled(format!(" {}", ts.format("%H:%M:%S")), desc_style));
    }
    if let Some(status) = &app.status {
        spans.push(Span::styled(format!(" {}", status), desc_style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
