use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::format::DIRECTIVE_HELP;

fn section(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!(" {} ", title),
        Style::default().add_modifier(Modifier::BOLD).fg(Color::Yellow),
    ))
}

/// Lines listing every template directive.
pub fn directive_lines() -> Vec<Line<'static>> {
    DIRECTIVE_HELP
        .iter()
        .map(|(d, desc)| {
            Line::from(vec![
                Span::styled(format!("  {:<4}", d), Style::default().fg(Color::Cyan)),
                Span::raw(desc.to_string()),
            ])
        })
        .collect()
}

/// Draw the Help popup (F1)
pub fn draw_help(f: &mut Frame) {
    let area = centered_rect(70, 85, f.area());
    f.render_widget(Clear, area);

    let mut help_text = vec![
        Line::from(Span::styled(
            " freqstrip - per-core CPU frequency strip ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section("Keys"),
        Line::from("  F1/?        Show this help"),
        Line::from("  F2/f        Edit label format"),
        Line::from("  r           Rescan online CPUs"),
        Line::from("  s           Save configuration"),
        Line::from("  z           Pause/resume sampling"),
        Line::from("  F10/q       Quit"),
        Line::from("  Ctrl+C      Quit"),
        Line::from(""),
        section("Label format"),
    ];
    help_text.extend(directive_lines());
    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(
        " Press Esc or F1 to close ",
        Style::default().fg(Color::DarkGray),
    )));

    let paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help ")
                .title_alignment(Alignment::Center)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White).bg(Color::Black))
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}

/// Create a centered rectangle with percentage width/height
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
