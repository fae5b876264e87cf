//! Sidebar widget: starred channels, channels and direct messages, with
//! unread pills and presence dots.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use super::ui::Palette;
use crate::models::ConversationKind;
use crate::sim::ConversationStore;

// ---------------------------------------------------------------------------
// Data model
// ---------------------------------------------------------------------------

/// Sidebar section, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Starred,
    Channels,
    DirectMessages,
}

impl Section {
    fn title(self) -> &'static str {
        match self {
            Self::Starred => "STARRED",
            Self::Channels => "CHANNELS",
            Self::DirectMessages => "DIRECT MESSAGES",
        }
    }

    fn of(kind: ConversationKind) -> Self {
        match kind {
            ConversationKind::StarredChannel => Self::Starred,
            ConversationKind::Channel => Self::Channels,
            ConversationKind::DirectMessage | ConversationKind::GroupMessage => {
                Self::DirectMessages
            }
        }
    }
}

/// One conversation row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: String,
    pub label: String,
    pub kind: ConversationKind,
    pub private: bool,
    pub unread: u32,
    /// Presence of the peer for 1:1 DMs.
    pub online: Option<bool>,
}

/// One line in the sidebar's flat list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarItem {
    /// Section header (not selectable, but occupies a row)
    Header(Section),
    Conversation(Row),
}

impl SidebarItem {
    fn is_header(&self) -> bool {
        matches!(self, Self::Header(_))
    }
}

/// Sidebar state: rows mirrored from the latest snapshot plus the cursor.
#[derive(Debug, Default)]
pub struct SidebarState {
    items: Vec<SidebarItem>,
    /// Index into the flat item list (0-based)
    pub selected: usize,
    /// Conversation currently open in the message pane.
    pub open: Option<String>,
}

impl SidebarState {
    /// Rebuild rows from a snapshot, keeping the cursor on the same conversation.
    pub fn update(&mut self, store: &ConversationStore) {
        let keep = self.selected_id().map(str::to_string);
        let mut items = Vec::new();

        for section in [Section::Starred, Section::Channels, Section::DirectMessages] {
            let rows: Vec<SidebarItem> = store
                .conversations()
                .iter()
                .filter(|c| Section::of(c.kind) == section)
                .map(|c| {
                    let online = if c.assistant {
                        Some(true)
                    } else {
                        c.peer().map(|p| store.is_online(p))
                    };
                    SidebarItem::Conversation(Row {
                        id: c.id.clone(),
                        label: c.display_name(),
                        kind: c.kind,
                        private: c.private,
                        unread: store.unread(&c.id),
                        online,
                    })
                })
                .collect();
            if rows.is_empty() {
                continue;
            }
            items.push(SidebarItem::Header(section));
            items.extend(rows);
        }

        self.items = items;
        self.open = store.selected().map(str::to_string);
        match keep {
            Some(id) => self.select_id(&id),
            None => self.clamp_selection(),
        }
    }

    pub fn items(&self) -> &[SidebarItem] {
        &self.items
    }

    /// Conversation id under the cursor.
    pub fn selected_id(&self) -> Option<&str> {
        match self.items.get(self.selected)? {
            SidebarItem::Conversation(row) => Some(&row.id),
            SidebarItem::Header(_) => None,
        }
    }

    /// Put the cursor on `id` if it is listed.
    pub fn select_id(&mut self, id: &str) {
        if let Some(idx) = self
            .items
            .iter()
            .position(|i| matches!(i, SidebarItem::Conversation(r) if r.id == id))
        {
            self.selected = idx;
        } else {
            self.clamp_selection();
        }
    }

    pub fn move_up(&mut self) {
        if let Some(idx) = (0..self.selected)
            .rev()
            .find(|&i| !self.items[i].is_header())
        {
            self.selected = idx;
        }
    }

    pub fn move_down(&mut self) {
        if let Some(idx) = (self.selected + 1..self.items.len()).find(|&i| !self.items[i].is_header())
        {
            self.selected = idx;
        }
    }

    /// Jump to the next conversation with unread messages, wrapping around.
    pub fn next_unread(&mut self) -> bool {
        let n = self.items.len();
        for step in 1..=n {
            let idx = (self.selected + step) % n;
            if matches!(&self.items[idx], SidebarItem::Conversation(r) if r.unread > 0) {
                self.selected = idx;
                return true;
            }
        }
        false
    }

    /// Clamp the cursor after structural changes and step off headers.
    fn clamp_selection(&mut self) {
        if self.items.is_empty() {
            self.selected = 0;
            return;
        }
        self.selected = self.selected.min(self.items.len() - 1);
        if self.items[self.selected].is_header() {
            self.move_down();
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render the sidebar into the given area.
pub fn render(area: Rect, buf: &mut Buffer, state: &SidebarState, palette: &Palette, focused: bool) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(if focused {
            BorderType::Double
        } else {
            BorderType::Plain
        })
        .border_style(Style::default().fg(if focused {
            palette.focus
        } else {
            palette.border
        }))
        .style(Style::default().bg(palette.sidebar_bg));

    let inner = block.inner(area);
    block.render(area, buf);

    let height = inner.height as usize;
    if height == 0 || inner.width == 0 || state.items.is_empty() {
        return;
    }

    let offset = compute_scroll_offset(state.selected, height, state.items.len());
    for (row, idx) in (offset..state.items.len()).take(height).enumerate() {
        let line_area = Rect::new(inner.x, inner.y + row as u16, inner.width, 1);
        let ctx = RowCtx {
            cursor: idx == state.selected,
            focused,
        };
        render_item(buf, line_area, &ctx, &state.items[idx], state, palette);
    }
}

/// Keep the cursor row visible.
fn compute_scroll_offset(selected: usize, height: usize, total: usize) -> usize {
    if total <= height || selected < height {
        return 0;
    }
    selected
        .saturating_sub(height - 1)
        .min(total.saturating_sub(height))
}

struct RowCtx {
    cursor: bool,
    focused: bool,
}

fn render_item(
    buf: &mut Buffer,
    area: Rect,
    ctx: &RowCtx,
    item: &SidebarItem,
    state: &SidebarState,
    palette: &Palette,
) {
    match item {
        SidebarItem::Header(section) => {
            let style = Style::default()
                .fg(palette.muted)
                .add_modifier(Modifier::BOLD);
            let line = Line::from(Span::styled(format!(" {}", section.title()), style));
            Paragraph::new(line).render(area, buf);
        }
        SidebarItem::Conversation(row) => {
            let open = state.open.as_deref() == Some(row.id.as_str());
            let mut style = if row.unread > 0 {
                Style::default()
                    .fg(palette.text)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(palette.muted)
            };
            if open {
                style = style.bg(palette.active_bg).fg(palette.text);
            } else if ctx.cursor && ctx.focused {
                style = style.bg(palette.hover_bg);
            }

            let marker = match (row.kind, row.online) {
                (ConversationKind::DirectMessage, Some(true)) => Span::styled("● ", style.fg(palette.online)),
                (ConversationKind::DirectMessage, _) => Span::styled("○ ", style.fg(palette.offline)),
                (ConversationKind::GroupMessage, _) => Span::styled("◆ ", style),
                _ if row.private => Span::styled("🔒", style),
                _ => Span::styled("  ", style),
            };
            let cursor = if ctx.cursor { "▸" } else { " " };
            let label = if row.kind.is_channel() {
                row.label.trim_start_matches("# ").to_string()
            } else {
                row.label.clone()
            };
            let prefix = if row.kind.is_channel() && !row.private {
                "# "
            } else {
                ""
            };

            let badge = if row.unread > 0 && !open {
                format!(" {} ", row.unread)
            } else {
                String::new()
            };
            let pill = Style::default()
                .fg(palette.pill_text)
                .bg(palette.pill)
                .add_modifier(Modifier::BOLD);

            render_row(
                buf,
                area,
                vec![
                    Span::styled(cursor, style),
                    marker,
                    Span::styled(format!("{prefix}{label}"), style),
                ],
                Span::styled(badge, pill),
                style,
            );
        }
    }
}

/// Left-aligned spans plus a right-aligned badge, truncating the last left
/// span to fit.
fn render_row<'a>(buf: &mut Buffer, area: Rect, mut left: Vec<Span<'a>>, badge: Span<'a>, fill: Style) {
    let width = area.width as usize;
    if width == 0 {
        return;
    }
    let badge_w = badge.content.width();
    let budget = width.saturating_sub(badge_w + usize::from(badge_w > 0));

    let mut used = 0;
    for span in left.iter_mut() {
        let w = span.content.width();
        if used + w > budget {
            let room = budget.saturating_sub(used);
            let mut cut = String::new();
            for ch in span.content.chars() {
                if cut.width() + unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0) > room {
                    break;
                }
                cut.push(ch);
            }
            span.content = cut.into();
        }
        used += span.content.width();
    }

    let pad = width.saturating_sub(used + badge_w);
    left.push(Span::styled(" ".repeat(pad), fill));
    left.push(badge);
    Paragraph::new(Line::from(left)).render(area, buf);
}
