//! Help popup overlay: keyboard shortcuts grouped by what they act on.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use super::ui::Palette;

const POPUP_WIDTH: u16 = 76;
const POPUP_HEIGHT: u16 = 26;
const KEY_COLUMN: usize = 12;

/// (key, description) pairs under a heading.
type Group = (&'static str, &'static [(&'static str, &'static str)]);

const WORKSPACE: &[Group] = &[
    (
        "NAVIGATION",
        &[
            ("Tab", "Next pane"),
            ("Shift+Tab", "Previous pane"),
            ("Up/Down", "Move within pane"),
            ("Enter", "Open conversation"),
            ("n", "Next unread conversation"),
            ("PgUp/PgDn", "Scroll messages"),
            ("End", "Back to latest"),
        ],
    ),
    (
        "COMPOSE",
        &[
            ("i", "Start typing"),
            ("Enter", "Send"),
            ("Tab", "Complete @mention"),
            ("Up", "Recall last message"),
            ("Ctrl+U", "Clear"),
            ("Esc", "Leave compose"),
        ],
    ),
];

const MESSAGE: &[Group] = &[
    (
        "SELECTED MESSAGE",
        &[
            ("r", "Toggle 👍"),
            ("+", "Add 🎉"),
            ("a", "Primary action"),
            ("x", "Secondary action"),
        ],
    ),
    (
        "ASSISTANT DM",
        &[("P", "Simulate a leave request"), ("Q", "Simulate a tool request")],
    ),
    (
        "MISC",
        &[
            ("t", "Next theme"),
            ("Ctrl+D", "Toggle debug log"),
            ("?", "Toggle this help"),
            ("q", "Quit"),
        ],
    ),
];

/// Render the help popup centered on screen.
pub fn render_help_popup(frame: &mut Frame, palette: &Palette) {
    let area = frame.area();
    let popup = centered_rect(
        POPUP_WIDTH.min(area.width.saturating_sub(2)),
        POPUP_HEIGHT.min(area.height.saturating_sub(2)),
        area,
    );
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.focus))
        .title(Span::styled(
            " Keyboard shortcuts ",
            Style::default()
                .fg(palette.text)
                .add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Span::styled(
            " any key closes ",
            Style::default().fg(palette.muted),
        ))
        .style(Style::default().bg(palette.sidebar_bg));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let [left, right] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(inner);
    frame.render_widget(Paragraph::new(column(WORKSPACE, palette)), inset(left, 1));
    frame.render_widget(Paragraph::new(column(MESSAGE, palette)), inset(right, 1));
}

fn column(groups: &[Group], palette: &Palette) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (i, (title, keys)) in groups.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            *title,
            Style::default()
                .fg(palette.text)
                .add_modifier(Modifier::BOLD),
        )));
        for (key, desc) in keys.iter() {
            lines.push(Line::from(vec![
                Span::styled(format!("{key:<width$}", width = KEY_COLUMN), Style::default().fg(palette.focus)),
                Span::styled(*desc, Style::default().fg(palette.muted)),
            ]));
        }
    }
    lines
}

/// A `width` x `height` rect centered in `area`.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    )
}

fn inset(area: Rect, margin: u16) -> Rect {
    Rect::new(
        area.x + margin,
        area.y + margin,
        area.width.saturating_sub(margin * 2),
        area.height.saturating_sub(margin * 2),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_columns_fit_popup() {
        for groups in [WORKSPACE, MESSAGE] {
            let rows: usize = groups.iter().map(|(_, keys)| keys.len() + 2).sum();
            assert!(rows < POPUP_HEIGHT as usize - 2);
            for (_, keys) in groups {
                assert!(keys.iter().all(|(k, _)| k.len() < KEY_COLUMN));
            }
        }
    }

    #[test]
    fn test_centered_rect_clamps_to_area() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(centered_rect(76, 26, area), Rect::new(12, 7, 76, 26));
    }
}
