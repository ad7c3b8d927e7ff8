use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::App;
use crate::format::{format_label, FormatTemplate};
use crate::system::frequency::FrequencySample;

use super::help::{centered_rect, directive_lines};

/// Draw the format entry popup (F2): the edited template, a live preview
/// against a sample reading, and the directive reference.
pub fn draw_format_entry(f: &mut Frame, app: &App) {
    let area = centered_rect(60, 60, f.area());
    f.render_widget(Clear, area);

    let preview = format_label(
        0,
        FrequencySample::Khz(2_400_000),
        &FormatTemplate::new(app.format_input.as_str()),
        app.config.label_len,
    );

    let mut lines = vec![
        Line::from(vec![
            Span::styled(" Format: ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::styled(app.format_input.clone(), Style::default().fg(Color::White)),
            Span::styled("_", Style::default().fg(Color::Cyan).add_modifier(Modifier::SLOW_BLINK)),
        ]),
        Line::from(vec![
            Span::styled(" Preview: ", Style::default().fg(Color::DarkGray)),
            Span::styled(preview, Style::default().fg(Color::Green)),
        ]),
        Line::from(""),
    ];
    lines.extend(directive_lines());

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Label format ")
                .title_alignment(Alignment::Center)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().bg(Color::Black));

    f.render_widget(paragraph, area);
}
