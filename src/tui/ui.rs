//! Frame layout, header and status bar, and the theme palette every widget
//! draws with.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use super::app::{App, Pane};
use super::messages::PaneCtx;
use super::{compose, debug_log, help, messages, sidebar};
use crate::profile::{Theme, ThemeKind};

const SIDEBAR_WIDTH: u16 = 30;

/// Terminal colours resolved from the active theme's tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub sidebar_bg: Color,
    pub chat_bg: Color,
    pub active_bg: Color,
    pub hover_bg: Color,
    pub border: Color,
    pub separator: Color,
    pub pill: Color,
    pub pill_text: Color,
    pub online: Color,
    pub offline: Color,
    pub button_primary: Color,
    pub compose_border: Color,
    pub compose_focus: Color,
    /// Focused borders, links and the viewer's own name.
    pub focus: Color,
    pub text: Color,
    pub muted: Color,
}

impl Palette {
    pub fn from_theme(theme: &Theme) -> Self {
        let token = |name: &str, fallback: Color| {
            theme
                .rgb(name)
                .map_or(fallback, |(r, g, b)| Color::Rgb(r, g, b))
        };
        let (text, muted) = match theme.kind {
            ThemeKind::Dark => (Color::Rgb(0xd1, 0xd2, 0xd3), Color::Rgb(0x8a, 0x8a, 0x8a)),
            ThemeKind::Light => (Color::Rgb(0x1d, 0x1c, 0x1d), Color::Rgb(0x61, 0x60, 0x61)),
        };
        let compose_focus = token("composeBorderFocus", Color::Cyan);
        Self {
            sidebar_bg: token("sidebarBackground", Color::Reset),
            chat_bg: token("chatBackground", Color::Reset),
            active_bg: token("activeBackground", Color::Blue),
            hover_bg: token("hoverBackground", Color::DarkGray),
            border: token("border", Color::DarkGray),
            separator: token("separator", Color::DarkGray),
            pill: token("unreadPill", Color::Red),
            pill_text: token("unreadPillText", Color::White),
            online: token("onlineStatus", Color::Green),
            offline: token("offlineStatus", Color::Gray),
            button_primary: token("buttonPrimary", Color::Green),
            compose_border: token("composeBorder", Color::DarkGray),
            compose_focus,
            focus: compose_focus,
            text,
            muted,
        }
    }
}

/// Main render function
pub fn render(frame: &mut Frame, app: &mut App) {
    let palette = app.palette();
    let area = frame.area();

    let debug_height = if app.debug_log.visible {
        debug_log::PANE_HEIGHT
    } else {
        0
    };
    let [header_area, main_area, debug_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(debug_height),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(header_area, frame.buffer_mut(), app, &palette);

    let [sidebar_area, content_area] =
        Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Fill(1)]).areas(main_area);
    sidebar::render(
        sidebar_area,
        frame.buffer_mut(),
        &app.sidebar,
        &palette,
        app.active_pane == Pane::Sidebar,
    );

    let [messages_area, compose_area] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(compose::COMPOSE_HEIGHT),
    ])
    .areas(content_area);

    let snapshot = app.snapshot.clone();
    let library = app.library.clone();
    let ctx = PaneCtx {
        store: &snapshot,
        embeds: library.embeds(),
        me: library.me(),
        palette: &palette,
        focused: app.active_pane == Pane::Messages,
    };
    messages::render(messages_area, frame.buffer_mut(), &mut app.messages, &ctx);

    let target = snapshot
        .selected()
        .and_then(|id| snapshot.conversation(id))
        .map(|c| c.display_name())
        .unwrap_or_else(|| "nobody yet".to_string());
    compose::render(
        compose_area,
        frame,
        &app.compose,
        &target,
        library.assistant(),
        &palette,
        app.active_pane == Pane::Compose,
    );

    if app.debug_log.visible {
        debug_log::render(debug_area, frame.buffer_mut(), &app.debug_log, &palette);
    }
    render_status(status_area, frame.buffer_mut(), app, &palette);

    if app.show_help {
        help::render_help_popup(frame, &palette);
    }
}

/// Company name on the left, viewer and presence on the right.
fn render_header(area: Rect, buf: &mut Buffer, app: &App, palette: &Palette) {
    let profile = app.library.profile();
    let title = format!(" {} ", profile.company.name);
    let me = app.library.me();
    let online = app.snapshot.is_online(me);
    let (dot, dot_color) = if online {
        ("●", palette.online)
    } else {
        ("○", palette.offline)
    };
    let unread = app.snapshot.total_unread();
    let right = format!(" {unread} unread  {dot} {me} ");
    let pad = (area.width as usize).saturating_sub(title.width() + right.width());

    let line = Line::from(vec![
        Span::styled(
            title,
            Style::default()
                .fg(palette.text)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" ".repeat(pad)),
        Span::styled(format!(" {unread} unread  "), Style::default().fg(palette.muted)),
        Span::styled(dot, Style::default().fg(dot_color)),
        Span::styled(format!(" {me} "), Style::default().fg(palette.text)),
    ]);
    Paragraph::new(line)
        .style(Style::default().bg(palette.sidebar_bg))
        .render(area, buf);
}

/// Status line: the latest notice, else pane, theme and key hints.
fn render_status(area: Rect, buf: &mut Buffer, app: &App, palette: &Palette) {
    let bar = Style::default().bg(palette.separator);
    if let Some(status) = &app.status {
        let color = if status.is_error {
            palette.pill
        } else {
            palette.online
        };
        Paragraph::new(Line::from(Span::styled(
            format!(" {} ", status.text),
            Style::default().fg(color),
        )))
        .style(bar)
        .render(area, buf);
        return;
    }

    let sep = Span::styled(" │ ", Style::default().fg(palette.muted));
    let theme = app
        .library
        .profile()
        .themes
        .resolve(app.snapshot.theme_id())
        .name
        .clone();
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", app.active_pane.as_str()),
            Style::default()
                .fg(palette.pill_text)
                .bg(palette.active_bg),
        ),
        sep.clone(),
        Span::styled(theme, Style::default().fg(palette.text)),
        sep.clone(),
        Span::styled("Tab: pane  i: type  t: theme", Style::default().fg(palette.muted)),
        sep,
        Span::styled("?: help  q: quit", Style::default().fg(palette.muted)),
    ]);
    Paragraph::new(line).style(bar).render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Profile;

    #[test]
    fn test_palette_reads_theme_tokens() {
        let profile = Profile::embedded().unwrap();
        let palette = Palette::from_theme(profile.themes.resolve("midnight-express"));
        assert_eq!(palette.pill, Color::Rgb(0xcd, 0x25, 0x53));
        assert_eq!(palette.sidebar_bg, Color::Rgb(0x11, 0x18, 0x27));
        assert_eq!(palette.focus, Color::Rgb(0x1d, 0x9b, 0xd1));
    }

    #[test]
    fn test_palette_falls_back_for_missing_tokens() {
        let theme = Theme {
            name: "Bare".into(),
            kind: ThemeKind::Light,
            colors: Default::default(),
        };
        let palette = Palette::from_theme(&theme);
        assert_eq!(palette.pill, Color::Red);
        assert_eq!(palette.text, Color::Rgb(0x1d, 0x1c, 0x1d));
    }
}
