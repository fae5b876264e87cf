//! Compose box: single-line message input with a hint line and @-mention
//! completion.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::ui::Palette;

/// State for the compose box.
#[derive(Debug, Default)]
pub struct ComposeState {
    chars: Vec<char>,
    /// Cursor position (character offset).
    cursor: usize,
    /// Last sent text, recalled with Up on an empty box.
    last_sent: Option<String>,
}

impl ComposeState {
    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn insert_char(&mut self, c: char) {
        self.chars.insert(self.cursor, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.chars.remove(self.cursor);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.chars.len() {
            self.chars.remove(self.cursor);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.chars.len());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.chars.len();
    }

    /// Clear all input text (Ctrl+U).
    pub fn clear(&mut self) {
        self.chars.clear();
        self.cursor = 0;
    }

    /// Take the trimmed text and clear the box. `None` for blank input.
    pub fn send(&mut self) -> Option<String> {
        let text = self.text().trim().to_string();
        if text.is_empty() {
            return None;
        }
        self.clear();
        self.last_sent = Some(text.clone());
        Some(text)
    }

    /// Put the last sent text back into an empty box.
    pub fn recall(&mut self) -> bool {
        match (&self.last_sent, self.chars.is_empty()) {
            (Some(last), true) => {
                self.chars = last.chars().collect();
                self.cursor = self.chars.len();
                true
            }
            _ => false,
        }
    }

    /// Complete the `@prefix` before the cursor against `names`
    /// (case-insensitive). Completes only on a unique match.
    pub fn complete_mention(&mut self, names: &[&str]) -> bool {
        let before: String = self.chars[..self.cursor].iter().collect();
        let Some(at) = before.rfind('@') else {
            return false;
        };
        let partial = before[at + 1..].to_lowercase();
        let matches: Vec<&&str> = names
            .iter()
            .filter(|n| n.to_lowercase().starts_with(&partial))
            .collect();
        let [name] = matches.as_slice() else {
            return false;
        };
        let start = before[..at].chars().count() + 1;
        let replacement: Vec<char> = format!("{name} ").chars().collect();
        let added = replacement.len();
        self.chars.splice(start..self.cursor, replacement);
        self.cursor = start + added;
        true
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Height of the compose box: 2 borders + input + hint line.
pub const COMPOSE_HEIGHT: u16 = 4;

/// Render the compose box. Takes the `Frame` to place the terminal cursor.
pub fn render(
    area: Rect,
    frame: &mut Frame,
    state: &ComposeState,
    target: &str,
    assistant: &str,
    palette: &Palette,
    focused: bool,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(if focused {
            BorderType::Rounded
        } else {
            BorderType::Plain
        })
        .border_style(Style::default().fg(if focused {
            palette.compose_focus
        } else {
            palette.compose_border
        }));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let input_area = Rect::new(inner.x, inner.y, inner.width, 1);
    let avail = (inner.width as usize).saturating_sub(1);
    if state.is_empty() {
        let placeholder = Line::from(Span::styled(
            format!(" Message {target}"),
            Style::default().fg(palette.muted),
        ));
        frame.render_widget(Paragraph::new(placeholder), input_area);
        if focused {
            frame.set_cursor_position((input_area.x + 1, input_area.y));
        }
    } else {
        let view = visible_window(&state.chars, state.cursor, avail);
        let line = Line::from(Span::styled(
            format!(" {}", view.text),
            Style::default().fg(palette.text),
        ));
        frame.render_widget(Paragraph::new(line), input_area);
        if focused {
            frame.set_cursor_position((input_area.x + 1 + view.cursor_col as u16, input_area.y));
        }
    }

    if inner.height >= 2 {
        let hint_area = Rect::new(inner.x, inner.y + 1, inner.width, 1);
        let key = Style::default()
            .fg(palette.muted)
            .add_modifier(Modifier::BOLD);
        let dim = Style::default().fg(palette.muted);
        let hint = Line::from(vec![
            Span::styled(" Enter", key),
            Span::styled(" send  ", dim),
            Span::styled("Tab", key),
            Span::styled(" complete @name  ", dim),
            Span::styled(format!("@{assistant}"), key),
            Span::styled(" to ask the assistant", dim),
        ]);
        frame.render_widget(Paragraph::new(hint), hint_area);
    }
}

/// Visible slice of the input and the cursor column inside it.
struct Window {
    text: String,
    cursor_col: usize,
}

/// Scroll horizontally (by display width) so the cursor stays visible.
fn visible_window(chars: &[char], cursor: usize, width: usize) -> Window {
    if width == 0 {
        return Window {
            text: String::new(),
            cursor_col: 0,
        };
    }
    let col = |c: &char| c.width().unwrap_or(0);
    let mut start = 0;
    let mut cursor_col: usize = chars[..cursor].iter().map(col).sum();
    while cursor_col >= width && start < cursor {
        cursor_col -= col(&chars[start]);
        start += 1;
    }

    let mut text = String::new();
    for ch in &chars[start..] {
        if text.width() + col(ch) > width {
            break;
        }
        text.push(*ch);
    }
    Window { text, cursor_col }
}
