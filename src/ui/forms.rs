use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

/// Label rendered in front of the name input.
pub(crate) const NAME_PREFIX: &str = "Name: ";

/// State of the "add player" modal. The raw text is kept untrimmed; the
/// roster decides whether it is acceptable.
#[derive(Default, Clone)]
pub(crate) struct AddPlayerForm {
    pub(crate) name: String,
    pub(crate) error: Option<String>,
}

impl AddPlayerForm {
    /// Append a printable character. Control characters are ignored.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.name.push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.name.pop();
    }

    /// Render the input line, dimming the placeholder while empty.
    pub(crate) fn build_line(&self) -> Line<'static> {
        let (display, style) = if self.name.is_empty() {
            ("<required>".to_string(), Style::default().fg(Color::DarkGray))
        } else {
            (self.name.clone(), Style::default().fg(Color::Yellow))
        };

        Line::from(vec![Span::raw(NAME_PREFIX), Span::styled(display, style)])
    }

    /// Cursor column relative to the start of the input line.
    pub(crate) fn cursor_offset(&self) -> u16 {
        (NAME_PREFIX.len() + self.name.chars().count()) as u16
    }
}
