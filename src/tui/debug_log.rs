//! Debug pane showing captured tracing output (Ctrl+D).

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use super::log_capture::LogBuffer;
use super::ui::Palette;

/// Scroll-back kept by the pane, beyond what the buffer holds between drains.
const HISTORY_LINES: usize = 1000;

/// Height of the pane when open.
pub const PANE_HEIGHT: u16 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Error,
    Warn,
    Info,
    Debug,
    Other,
}

/// Level of a fmt-layer line (`2024-03-13T15:00:00Z  INFO Workspace ready`).
fn level_of(line: &str) -> Level {
    match line.split_whitespace().nth(1) {
        Some("ERROR") => Level::Error,
        Some("WARN") => Level::Warn,
        Some("INFO") => Level::Info,
        Some("DEBUG" | "TRACE") => Level::Debug,
        _ => Level::Other,
    }
}

pub struct DebugLogState {
    source: LogBuffer,
    lines: Vec<String>,
    pub visible: bool,
    /// Lines hidden below the bottom edge (0 follows the tail).
    offset: usize,
}

impl DebugLogState {
    pub fn new(source: LogBuffer) -> Self {
        Self {
            source,
            lines: Vec::new(),
            visible: false,
            offset: 0,
        }
    }

    /// Pull newly captured lines. Called every frame so the buffer stays short.
    pub fn refresh(&mut self) {
        let fresh = self.source.drain();
        if fresh.is_empty() {
            return;
        }
        if self.offset > 0 {
            self.offset += fresh.len();
        }
        self.lines.extend(fresh);
        let excess = self.lines.len().saturating_sub(HISTORY_LINES);
        self.lines.drain(..excess);
        self.offset = self.offset.min(self.lines.len().saturating_sub(1));
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        self.offset = 0;
    }

    pub fn scroll_up(&mut self, n: usize) {
        self.offset = (self.offset + n).min(self.lines.len().saturating_sub(1));
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
    }

    fn window(&self, height: usize) -> &[String] {
        let end = self.lines.len().saturating_sub(self.offset);
        &self.lines[end.saturating_sub(height)..end]
    }
}

pub fn render(area: Rect, buf: &mut Buffer, state: &DebugLogState, palette: &Palette) {
    let mut title = vec![Span::styled(
        " Debug log ",
        Style::default()
            .fg(palette.focus)
            .add_modifier(Modifier::BOLD),
    )];
    let dropped = state.source.dropped();
    if dropped > 0 {
        title.push(Span::styled(
            format!("({dropped} dropped) "),
            Style::default().fg(palette.muted),
        ));
    }
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(palette.border))
        .title(Line::from(title));
    let inner = block.inner(area);
    block.render(area, buf);
    if inner.height == 0 {
        return;
    }

    let lines: Vec<Line> = state
        .window(inner.height as usize)
        .iter()
        .map(|line| {
            let style = match level_of(line) {
                Level::Error => Style::default().fg(palette.pill),
                Level::Warn => Style::default().fg(ratatui::style::Color::Yellow),
                Level::Info => Style::default().fg(palette.online),
                Level::Debug => Style::default().fg(palette.muted),
                Level::Other => Style::default().fg(palette.text),
            };
            Line::from(Span::styled(line.clone(), style))
        })
        .collect();
    Paragraph::new(lines).render(inner, buf);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(n: usize) -> DebugLogState {
        let buffer = LogBuffer::default();
        for i in 0..n {
            buffer.push(format!("2024-03-13T15:00:00Z DEBUG line {i}"));
        }
        let mut state = DebugLogState::new(buffer);
        state.refresh();
        state
    }

    #[test]
    fn test_level_parsing() {
        assert_eq!(level_of("2024-03-13T15:00:00Z  INFO Workspace ready"), Level::Info);
        assert_eq!(level_of("2024-03-13T15:00:00Z  WARN No DM with X"), Level::Warn);
        assert_eq!(level_of("2024-03-13T15:00:00Z ERROR Engine channel closed"), Level::Error);
        assert_eq!(level_of("continuation"), Level::Other);
    }

    #[test]
    fn test_window_follows_tail() {
        let state = filled(20);
        let window = state.window(3);
        assert_eq!(window.len(), 3);
        assert!(window[2].ends_with("line 19"));
    }

    #[test]
    fn test_scroll_clamps_and_pins_while_reading() {
        let mut state = filled(5);
        state.scroll_up(100);
        assert_eq!(state.offset, 4);
        state.scroll_down(2);
        assert_eq!(state.offset, 2);

        state.source.push("2024-03-13T15:00:01Z  INFO newer");
        state.refresh();
        // Still looking at the same lines.
        assert_eq!(state.offset, 3);
        assert!(state.window(1)[0].ends_with("line 2"));
    }

    #[test]
    fn test_toggle_resets_to_tail() {
        let mut state = filled(10);
        state.scroll_up(4);
        state.toggle();
        assert!(state.visible);
        assert_eq!(state.offset, 0);
    }
}
