//! Messages pane: grouped messages with reactions, embed cards and action
//! buttons for the open conversation.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::ui::Palette;
use crate::content::EmbedCatalog;
use crate::models::{ActionKind, Conversation, EmbedDescriptor, Message};
use crate::sim::ConversationStore;
use crate::view::{
    extract_embeds, plain_text, scroll_intent, should_show_header, Restore, ScrollAnchor,
    ScrollIntent, Viewport,
};

/// Body indent under a sender header.
const GUTTER: usize = 2;

/// State for the messages pane.
#[derive(Debug, Default)]
pub struct MessagesState {
    /// Conversation the pane last rendered.
    conversation: Option<String>,
    /// Message count seen in the last snapshot.
    known_len: usize,
    /// Newest message id seen in the last snapshot.
    last_id: Option<String>,
    /// Index of the highlighted message; `None` follows the bottom.
    pub selected: Option<usize>,
    /// First visible line.
    scroll_top: u32,
    /// Metrics from the last render.
    viewport: Viewport,
    anchor: ScrollAnchor,
    intent: Option<ScrollIntent>,
    reveal_selected: bool,
}

impl MessagesState {
    /// React to a fresh snapshot: decide whether to jump, glide or hold.
    pub fn on_snapshot(&mut self, store: &ConversationStore) {
        let open = store.selected().map(str::to_string);
        let messages = open.as_deref().map_or(&[][..], |id| store.messages(id));
        let len = messages.len();
        let last_id = messages.last().map(|m| m.id.clone());
        let changed = open != self.conversation;
        // At the cap an append is paired with a trim, so compare tails.
        let grew = last_id.is_some() && last_id != self.last_id;
        let near_bottom = self.viewport.distance_from_bottom() <= crate::view::DEFAULT_ANCHOR_THRESHOLD;

        if changed {
            self.selected = None;
            self.anchor.cancel();
        } else if near_bottom {
            self.anchor.capture(self.viewport);
        }
        if let Some(sel) = self.selected {
            // Trimming shifts indices; follow the previous tail to its new slot.
            let dropped = self
                .last_id
                .as_deref()
                .and_then(|old| messages.iter().rposition(|m| m.id == old))
                .map(|pos| self.known_len.saturating_sub(1).saturating_sub(pos));
            self.selected = dropped
                .and_then(|d| sel.checked_sub(d))
                .filter(|&i| i < len);
        }

        match scroll_intent(changed, grew, near_bottom) {
            ScrollIntent::Hold => {}
            intent => {
                self.anchor.cancel();
                self.intent = Some(intent);
            }
        }
        self.conversation = open;
        self.known_len = len;
        self.last_id = last_id;
    }

    pub fn select_previous(&mut self) {
        self.selected = match self.selected {
            Some(0) => Some(0),
            Some(i) => Some(i - 1),
            None if self.known_len > 0 => Some(self.known_len - 1),
            None => None,
        };
        self.reveal_selected = true;
    }

    pub fn select_next(&mut self) {
        self.selected = match self.selected {
            Some(i) if i + 1 < self.known_len => Some(i + 1),
            // Past the last message: back to following the bottom.
            Some(_) => {
                self.intent = Some(ScrollIntent::Smooth);
                None
            }
            None => None,
        };
        self.reveal_selected = true;
    }

    pub fn scroll_up(&mut self, rows: u32) {
        self.scroll_top = self.scroll_top.saturating_sub(rows);
        self.intent = None;
        self.anchor.cancel();
    }

    pub fn scroll_down(&mut self, rows: u32) {
        self.scroll_top = (self.scroll_top + rows).min(self.viewport.max_top());
        self.intent = None;
    }

    pub fn jump_to_bottom(&mut self) {
        self.selected = None;
        self.intent = Some(ScrollIntent::Jump);
    }

    /// The highlighted message in the open conversation.
    pub fn selected_message<'a>(&self, store: &'a ConversationStore) -> Option<&'a Message> {
        let id = self.conversation.as_deref()?;
        store.messages(id).get(self.selected?)
    }

    /// Place the viewport for a buffer of `total` lines in `height` rows.
    fn settle(&mut self, total: u32, height: u32, selected_range: Option<(usize, usize)>) {
        let current = Viewport {
            scroll_height: total,
            scroll_top: self.scroll_top,
            client_height: height,
        };
        let bottom = current.max_top();

        match self.intent {
            Some(ScrollIntent::Jump) => {
                self.scroll_top = bottom;
                self.intent = None;
            }
            Some(ScrollIntent::Smooth) => {
                // Glide: close half the gap per frame.
                let gap = bottom.saturating_sub(self.scroll_top);
                self.scroll_top += gap.div_ceil(2);
                if self.scroll_top >= bottom {
                    self.intent = None;
                }
            }
            Some(ScrollIntent::Hold) | None => {
                if let Restore::Adjusted(top) = self.anchor.restore(current) {
                    self.scroll_top = top;
                }
            }
        }

        if self.reveal_selected {
            if let Some((start, end)) = selected_range {
                self.scroll_top = reveal(self.scroll_top, start as u32, end as u32, height);
            }
            self.reveal_selected = false;
        }

        self.scroll_top = self.scroll_top.min(bottom);
        self.viewport = Viewport {
            scroll_top: self.scroll_top,
            ..current
        };
    }
}

/// Scroll just enough to show lines `start..end`.
fn reveal(top: u32, start: u32, end: u32, height: u32) -> u32 {
    if end.saturating_sub(start) >= height || start < top {
        start
    } else if end > top + height {
        end - height
    } else {
        top
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Everything the pane needs from outside its own state.
pub struct PaneCtx<'a> {
    pub store: &'a ConversationStore,
    pub embeds: &'a EmbedCatalog,
    pub me: &'a str,
    pub palette: &'a Palette,
    pub focused: bool,
}

/// Render the messages pane into the given area.
pub fn render(area: Rect, buf: &mut Buffer, state: &mut MessagesState, ctx: &PaneCtx<'_>) {
    let palette = ctx.palette;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(if ctx.focused {
            BorderType::Double
        } else {
            BorderType::Plain
        })
        .border_style(Style::default().fg(if ctx.focused {
            palette.focus
        } else {
            palette.border
        }))
        .style(Style::default().bg(palette.chat_bg));

    let inner = block.inner(area);
    block.render(area, buf);
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let Some(conv) = ctx.store.selected().and_then(|id| ctx.store.conversation(id)) else {
        let hint = Line::from(Span::styled(
            " Pick a conversation in the sidebar and press Enter",
            Style::default().fg(palette.muted),
        ));
        Paragraph::new(hint).render(inner, buf);
        return;
    };

    let header_area = Rect::new(inner.x, inner.y, inner.width, 1);
    render_conversation_header(header_area, buf, conv, ctx);

    let list = Rect::new(
        inner.x,
        inner.y + 1,
        inner.width,
        inner.height.saturating_sub(1),
    );
    if list.height == 0 {
        return;
    }

    let messages = ctx.store.messages(&conv.id);
    let (lines, ranges) = build_message_lines(messages, state.selected, list.width as usize, ctx);
    let total = lines.len();
    let height = list.height as usize;
    let selected_range = state.selected.and_then(|i| ranges.get(i).copied());
    state.settle(total as u32, list.height as u32, selected_range);

    let top = state.scroll_top as usize;
    for (row, line) in lines.into_iter().skip(top).take(height).enumerate() {
        let line_area = Rect::new(list.x, list.y + row as u16, list.width, 1);
        Paragraph::new(line).render(line_area, buf);
    }

    if total > height {
        let x = list.x + list.width.saturating_sub(1);
        let dim = Style::default().fg(palette.muted);
        if top > 0 {
            buf[(x, list.y)].set_char('▲').set_style(dim);
        }
        if top + height < total {
            buf[(x, list.y + list.height - 1)].set_char('▼').set_style(dim);
        }
    }
}

fn render_conversation_header(area: Rect, buf: &mut Buffer, conv: &Conversation, ctx: &PaneCtx<'_>) {
    let palette = ctx.palette;
    let mut spans = vec![Span::styled(
        format!(" {} ", conv.display_name()),
        Style::default()
            .fg(palette.text)
            .add_modifier(Modifier::BOLD),
    )];
    let detail = match conv.peer() {
        Some(peer) if ctx.store.is_online(peer) => "● active".to_string(),
        Some(_) => "○ away".to_string(),
        None if conv.kind.is_channel() => format!("{} members", conv.member_count),
        None => conv.members.join(", "),
    };
    spans.push(Span::styled(detail, Style::default().fg(palette.muted)));
    Paragraph::new(Line::from(spans))
        .style(Style::default().bg(palette.separator))
        .render(area, buf);
}

/// Build the flat line buffer and per-message line ranges in a single pass.
fn build_message_lines(
    messages: &[Message],
    selected: Option<usize>,
    width: usize,
    ctx: &PaneCtx<'_>,
) -> (Vec<Line<'static>>, Vec<(usize, usize)>) {
    let palette = ctx.palette;
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut ranges = Vec::with_capacity(messages.len());
    let content_width = width.saturating_sub(GUTTER + 1);

    for (idx, msg) in messages.iter().enumerate() {
        let start = lines.len();
        let prev = idx.checked_sub(1).map(|p| &messages[p]);
        let marker = if Some(idx) == selected {
            Span::styled("▌", Style::default().fg(palette.focus))
        } else {
            Span::raw(" ")
        };

        if should_show_header(msg, prev) {
            if prev.is_some() {
                lines.push(Line::from(""));
            }
            let name_style = if msg.sender == ctx.me {
                Style::default()
                    .fg(palette.focus)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
                    .fg(palette.text)
                    .add_modifier(Modifier::BOLD)
            };
            lines.push(Line::from(vec![
                marker.clone(),
                Span::styled(msg.sender.clone(), name_style),
                Span::styled(format!("  {}", msg.when()), Style::default().fg(palette.muted)),
            ]));
        }

        let body = plain_text(&msg.body);
        for text in wrap_text(&body, content_width) {
            lines.push(Line::from(vec![
                marker.clone(),
                Span::raw(" ".repeat(GUTTER - 1)),
                Span::styled(text, Style::default().fg(palette.text)),
            ]));
        }

        for embed in extract_embeds(ctx.embeds, &msg.body) {
            push_embed_card(&mut lines, &embed, content_width, palette);
        }

        if !msg.reactions.is_empty() {
            let mut spans = vec![Span::raw(" ".repeat(GUTTER))];
            for (emoji, count) in msg.reactions.iter() {
                let mine = ctx.store.user_reacted(&msg.id, emoji);
                let style = if mine {
                    Style::default()
                        .fg(palette.text)
                        .bg(palette.active_bg)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(palette.muted).bg(palette.hover_bg)
                };
                spans.push(Span::styled(format!(" {emoji} {count} "), style));
                spans.push(Span::raw(" "));
            }
            lines.push(Line::from(spans));
        }

        if msg.has_actions() {
            lines.push(action_line(msg, ctx));
        }

        ranges.push((start, lines.len()));
    }

    (lines, ranges)
}

/// Buttons, or the confirmation once one of them has been used.
fn action_line(msg: &Message, ctx: &PaneCtx<'_>) -> Line<'static> {
    let palette = ctx.palette;
    let mut spans = vec![Span::raw(" ".repeat(GUTTER))];
    if let Some(done) = ctx.store.completed_action(&msg.id) {
        let text = msg
            .actions
            .iter()
            .find(|a| a.id == done)
            .map(|a| a.confirmation.clone())
            .unwrap_or_else(|| "Done.".to_string());
        spans.push(Span::styled(
            format!("✓ {text}"),
            Style::default()
                .fg(palette.online)
                .add_modifier(Modifier::ITALIC),
        ));
        return Line::from(spans);
    }

    for (i, action) in msg.actions.iter().enumerate() {
        let key = if i == 0 { "a" } else { "x" };
        let label = match &action.emoji {
            Some(emoji) => format!("[{key}] {emoji} {}", action.label),
            None => format!("[{key}] {}", action.label),
        };
        let style = match action.kind {
            ActionKind::Primary => Style::default()
                .fg(palette.pill_text)
                .bg(palette.button_primary)
                .add_modifier(Modifier::BOLD),
            _ => Style::default().fg(palette.text).bg(palette.hover_bg),
        };
        spans.push(Span::styled(format!(" {label} "), style));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

/// Link preview: app line, title, owner.
fn push_embed_card(lines: &mut Vec<Line<'static>>, embed: &EmbedDescriptor, width: usize, palette: &Palette) {
    let app = embed.kind.app_info();
    let bar = Span::styled("┃ ", Style::default().fg(palette.border));
    let indent = Span::raw(" ".repeat(GUTTER));
    let room = width.saturating_sub(2);

    lines.push(Line::from(vec![
        indent.clone(),
        bar.clone(),
        Span::styled(
            format!("{} {}", app.icon, app.name),
            Style::default().fg(palette.muted),
        ),
    ]));
    for title in wrap_text(&embed.title, room) {
        lines.push(Line::from(vec![
            indent.clone(),
            bar.clone(),
            Span::styled(
                title,
                Style::default()
                    .fg(palette.focus)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
    }
    lines.push(Line::from(vec![
        indent,
        bar,
        Span::styled(
            truncate(&format!("{} · {}", embed.owner, embed.url), room),
            Style::default().fg(palette.muted),
        ),
    ]));
}

fn truncate(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let mut out = String::new();
    for ch in text.chars() {
        if out.width() + ch.width().unwrap_or(0) + 1 > max_width {
            break;
        }
        out.push(ch);
    }
    out.push('…');
    out
}

/// Word-wrap by display width; words longer than a line are split.
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return vec![];
    }
    let mut result = Vec::new();
    for line in text.lines() {
        if line.width() <= max_width {
            result.push(line.to_string());
            continue;
        }
        let mut current = String::new();
        for word in line.split_whitespace() {
            let sep = usize::from(!current.is_empty());
            if current.width() + sep + word.width() <= max_width {
                if sep == 1 {
                    current.push(' ');
                }
                current.push_str(word);
                continue;
            }
            if !current.is_empty() {
                result.push(std::mem::take(&mut current));
            }
            for ch in word.chars() {
                if current.width() + ch.width().unwrap_or(0) > max_width {
                    result.push(std::mem::take(&mut current));
                }
                current.push(ch);
            }
        }
        if !current.is_empty() {
            result.push(current);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConversationKind;
    use chrono::NaiveDate;

    fn store_with(n: usize) -> ConversationStore {
        let conv = Conversation {
            id: "backend".into(),
            name: "backend".into(),
            kind: ConversationKind::Channel,
            members: vec![],
            member_count: 12,
            private: false,
            assistant: false,
        };
        let mut store = ConversationStore::new(vec![conv], "midnight-express");
        let day = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let history = (0..n)
            .map(|i| {
                let at = day.and_hms_opt(9, i as u32 % 60, 0).unwrap();
                Message::new(format!("m{i}"), "Anna", format!("message {i}"), at)
            })
            .collect();
        store.load_history("backend", history).unwrap();
        store.select("backend").unwrap();
        store
    }

    #[test]
    fn test_wrap_text_by_width() {
        assert_eq!(
            wrap_text("the quick brown fox", 9),
            vec!["the quick", "brown fox"]
        );
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert!(wrap_text("anything", 0).is_empty());
    }

    #[test]
    fn test_reveal_scrolls_minimally() {
        assert_eq!(reveal(10, 12, 14, 5), 10);
        assert_eq!(reveal(10, 4, 6, 5), 4);
        assert_eq!(reveal(10, 14, 18, 5), 13);
    }

    #[test]
    fn test_switch_jumps_to_bottom() {
        let store = store_with(30);
        let mut state = MessagesState::default();
        state.on_snapshot(&store);
        state.settle(100, 20, None);
        assert_eq!(state.scroll_top, 80);
    }

    #[test]
    fn test_growth_near_bottom_glides() {
        let mut store = store_with(30);
        let mut state = MessagesState::default();
        state.on_snapshot(&store);
        state.settle(100, 20, None);

        let at = NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(11, 0, 0)
            .unwrap();
        store
            .append("backend", Message::new("new", "Marco", "hello", at))
            .unwrap();
        state.on_snapshot(&store);
        state.settle(110, 20, None);
        assert_eq!(state.scroll_top, 85);
        state.settle(110, 20, None);
        state.settle(110, 20, None);
        state.settle(110, 20, None);
        state.settle(110, 20, None);
        assert_eq!(state.scroll_top, 90);
    }

    #[test]
    fn test_growth_far_from_bottom_holds() {
        let mut store = store_with(30);
        let mut state = MessagesState::default();
        state.on_snapshot(&store);
        state.settle(200, 20, None);
        state.scroll_up(150);
        state.settle(200, 20, None);
        assert_eq!(state.scroll_top, 30);

        let at = NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(11, 0, 0)
            .unwrap();
        store
            .append("backend", Message::new("new", "Marco", "hello", at))
            .unwrap();
        state.on_snapshot(&store);
        state.settle(210, 20, None);
        assert_eq!(state.scroll_top, 30);
    }

    #[test]
    fn test_append_at_cap_glides_and_keeps_selection() {
        let mut store = store_with(30);
        let mut state = MessagesState::default();
        state.on_snapshot(&store);
        state.settle(100, 20, None);
        state.select_previous();
        state.select_previous();
        assert_eq!(state.selected_message(&store).map(|m| m.id.as_str()), Some("m28"));

        let at = NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(11, 0, 0)
            .unwrap();
        store
            .append("backend", Message::new("new", "Marco", "hello", at))
            .unwrap();
        assert_eq!(store.trim("backend", 30).unwrap(), 1);
        state.on_snapshot(&store);

        assert_eq!(state.intent, Some(ScrollIntent::Smooth));
        assert_eq!(state.selected_message(&store).map(|m| m.id.as_str()), Some("m28"));
    }

    #[test]
    fn test_unchanged_snapshot_holds() {
        let store = store_with(30);
        let mut state = MessagesState::default();
        state.on_snapshot(&store);
        state.settle(100, 20, None);
        state.on_snapshot(&store);
        assert_eq!(state.intent, None);
    }

    #[test]
    fn test_selection_walks_messages() {
        let store = store_with(3);
        let mut state = MessagesState::default();
        state.on_snapshot(&store);
        state.select_previous();
        assert_eq!(state.selected_message(&store).map(|m| m.id.as_str()), Some("m2"));
        state.select_previous();
        state.select_previous();
        state.select_previous();
        assert_eq!(state.selected, Some(0));
        state.select_next();
        state.select_next();
        state.select_next();
        assert_eq!(state.selected, None);
    }
}
