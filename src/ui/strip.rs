use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::app::App;
use crate::system::sampler::{CpuLabel, Placement};

/// Draw the frequency strip: one bordered block, one label slot per online CPU.
///
///   ┌ Intel(R) Core(TM) i7 ┐
///   │    CPU0: 2.40 GHz    │
///   │    CPU1: 800 MHz     │
///   └──────────────────────┘
pub fn draw_strip(f: &mut Frame, app: &App, area: Rect) {
    let title = if app.cpu_brand.is_empty() {
        " freqstrip ".to_string()
    } else {
        format!(" {} ", app.cpu_brand.trim())
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let labels = app.sampler.labels();
    if labels.is_empty() {
        let msg = if app.sampler.is_active() {
            "no CPUs to display"
        } else {
            "starting..."
        };
        f.render_widget(
            Paragraph::new(Span::styled(msg, Style::default().fg(Color::DarkGray))),
            inner,
        );
        return;
    }

    for label in labels {
        let row = inner.y as usize + label.row;
        if row >= (inner.y + inner.height) as usize {
            break;
        }
        draw_label(f, label, Rect {
            x: inner.x,
            y: row as u16,
            width: inner.width,
            height: 1,
        });
    }
}

fn draw_label(f: &mut Frame, label: &CpuLabel, area: Rect) {
    let x = match label.placement {
        Placement::Centered { x } => x as isize,
        Placement::Scrolling { x } => x,
    };
    let Some((col, visible)) = visible_slice(&label.text, x, area.width as usize) else {
        return;
    };

    let style = if label.text.contains("N/A") {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    };
    let cell = Rect {
        x: area.x + col as u16,
        width: area.width - col as u16,
        ..area
    };
    f.render_widget(Paragraph::new(Line::from(Span::styled(visible, style))), cell);
}

/// Clip `text` drawn at column `x` (possibly negative) to `0..width`.
/// Returns the start column and the visible part, or `None` if nothing shows.
pub fn visible_slice(text: &str, x: isize, width: usize) -> Option<(usize, String)> {
    if x >= width as isize {
        return None;
    }
    let mut skip = if x < 0 { x.unsigned_abs() } else { 0 };
    let col = x.max(0) as usize;
    let room = width - col;

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if skip > 0 {
            // A wide char straddling the left edge is dropped whole.
            skip = skip.saturating_sub(w);
            continue;
        }
        if used + w > room {
            break;
        }
        out.push(c);
        used += w;
    }

    if out.is_empty() {
        None
    } else {
        Some((col, out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_slice_inside() {
        assert_eq!(visible_slice("CPU0", 2, 10), Some((2, "CPU0".to_string())));
    }

    #[test]
    fn test_visible_slice_clips_right_edge() {
        assert_eq!(visible_slice("CPU0: 1.00 GHz", 6, 10), Some((6, "CPU0".to_string())));
    }

    #[test]
    fn test_visible_slice_negative_offset() {
        assert_eq!(visible_slice("CPU0: 1.00 GHz", -6, 5), Some((0, "1.00 ".to_string())));
    }

    #[test]
    fn test_visible_slice_fully_off_screen() {
        assert_eq!(visible_slice("CPU0", 10, 10), None);
        assert_eq!(visible_slice("CPU0", -4, 10), None);
    }
}
