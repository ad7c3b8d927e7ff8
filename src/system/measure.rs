use unicode_width::UnicodeWidthStr;

/// Width query supplied by the display layer: how many columns a label
/// will occupy once rendered.
pub trait TextMeasure {
    fn text_width(&self, text: &str) -> usize;
}

/// Terminal cell width, as ratatui lays text out.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalMeasure;

impl TextMeasure for TerminalMeasure {
    fn text_width(&self, text: &str) -> usize {
        UnicodeWidthStr::width(text)
    }
}
