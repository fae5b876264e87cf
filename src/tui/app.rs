//! TUI application state and main event loop

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::DefaultTerminal;

use super::compose::ComposeState;
use super::debug_log::DebugLogState;
use super::log_capture::LogBuffer;
use super::messages::MessagesState;
use super::sidebar::SidebarState;
use super::ui::{self, Palette};
use crate::content::ContentLibrary;
use crate::sim::{ConversationStore, Engine, EngineCommand, EngineEvent};

/// Target frame rate for UI updates (~30 fps)
const FRAME_DURATION_MS: u64 = 33;
/// How long a notice stays in the status bar.
const STATUS_TTL: Duration = Duration::from_secs(4);
const PAGE_ROWS: u32 = 10;

/// Active pane in the TUI
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    #[default]
    Sidebar,
    Messages,
    Compose,
}

impl Pane {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pane::Sidebar => "sidebar",
            Pane::Messages => "messages",
            Pane::Compose => "compose",
        }
    }

    fn next(self) -> Self {
        match self {
            Pane::Sidebar => Pane::Messages,
            Pane::Messages => Pane::Compose,
            Pane::Compose => Pane::Sidebar,
        }
    }

    fn prev(self) -> Self {
        match self {
            Pane::Sidebar => Pane::Compose,
            Pane::Messages => Pane::Sidebar,
            Pane::Compose => Pane::Messages,
        }
    }
}

/// One-line notice in the status bar.
#[derive(Debug, Clone)]
pub struct Status {
    pub text: String,
    pub is_error: bool,
    shown_at: Instant,
}

/// Application state
pub struct App {
    engine: Engine,
    pub library: Arc<ContentLibrary>,
    /// Latest store published by the engine.
    pub snapshot: Arc<ConversationStore>,
    pub sidebar: SidebarState,
    pub messages: MessagesState,
    pub compose: ComposeState,
    pub debug_log: DebugLogState,
    pub active_pane: Pane,
    pub show_help: bool,
    pub status: Option<Status>,
    pub should_exit: bool,
}

impl App {
    pub fn new(engine: Engine, library: Arc<ContentLibrary>, logs: LogBuffer) -> Self {
        Self {
            engine,
            library,
            snapshot: Arc::default(),
            sidebar: SidebarState::default(),
            messages: MessagesState::default(),
            compose: ComposeState::default(),
            debug_log: DebugLogState::new(logs),
            active_pane: Pane::default(),
            show_help: false,
            status: None,
            should_exit: false,
        }
    }

    pub fn palette(&self) -> Palette {
        Palette::from_theme(self.library.profile().themes.resolve(self.snapshot.theme_id()))
    }

    /// Per-frame housekeeping: pull captured logs, expire the notice.
    pub fn tick(&mut self) {
        self.debug_log.refresh();
        if self
            .status
            .as_ref()
            .is_some_and(|s| s.shown_at.elapsed() >= STATUS_TTL)
        {
            self.status = None;
        }
    }

    pub fn apply(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Snapshot(store) => {
                self.snapshot = store;
                self.sidebar.update(&self.snapshot);
                self.messages.on_snapshot(&self.snapshot);
            }
            EngineEvent::Notice(text) => self.notify(text, false),
        }
    }

    fn notify(&mut self, text: impl Into<String>, is_error: bool) {
        self.status = Some(Status {
            text: text.into(),
            is_error,
            shown_at: Instant::now(),
        });
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if self.show_help {
            self.show_help = false;
            return;
        }
        if ctrl && key.code == KeyCode::Char('d') {
            self.debug_log.toggle();
            return;
        }
        if ctrl && key.code == KeyCode::Char('c') {
            self.quit();
            return;
        }
        if self.active_pane == Pane::Compose {
            self.handle_compose_key(key, ctrl);
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.quit(),
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Tab => self.active_pane = self.active_pane.next(),
            KeyCode::BackTab => self.active_pane = self.active_pane.prev(),
            KeyCode::Char('i') => self.active_pane = Pane::Compose,
            KeyCode::Char('t') => self.cycle_theme(),
            KeyCode::Char('n') => {
                if self.sidebar.next_unread() {
                    self.open_selected();
                }
            }
            KeyCode::Char('P') => self.request_approval(EngineCommand::RequestLeaveApproval),
            KeyCode::Char('Q') => self.request_approval(EngineCommand::RequestToolAccessApproval),
            KeyCode::Char('[') if self.debug_log.visible => self.debug_log.scroll_up(5),
            KeyCode::Char(']') if self.debug_log.visible => self.debug_log.scroll_down(5),
            _ => match self.active_pane {
                Pane::Sidebar => self.handle_sidebar_key(key.code),
                Pane::Messages => self.handle_messages_key(key.code),
                Pane::Compose => {}
            },
        }
    }

    fn handle_sidebar_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.sidebar.move_up(),
            KeyCode::Down | KeyCode::Char('j') => self.sidebar.move_down(),
            KeyCode::Enter | KeyCode::Right => self.open_selected(),
            _ => {}
        }
    }

    fn handle_messages_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.messages.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.messages.select_next(),
            KeyCode::PageUp => self.messages.scroll_up(PAGE_ROWS),
            KeyCode::PageDown => self.messages.scroll_down(PAGE_ROWS),
            KeyCode::End | KeyCode::Char('G') => self.messages.jump_to_bottom(),
            KeyCode::Left => self.active_pane = Pane::Sidebar,
            KeyCode::Char('r') => self.react(true, "👍"),
            KeyCode::Char('+') => self.react(false, "🎉"),
            KeyCode::Char('a') => self.complete_action(0),
            KeyCode::Char('x') => self.complete_action(1),
            _ => {}
        }
    }

    fn handle_compose_key(&mut self, key: KeyEvent, ctrl: bool) {
        match key.code {
            KeyCode::Esc => self.active_pane = Pane::Messages,
            KeyCode::Enter => self.send_compose(),
            KeyCode::Tab => {
                let names: Vec<&str> = self
                    .library
                    .profile()
                    .people()
                    .iter()
                    .map(|p| p.name.as_str())
                    .collect();
                self.compose.complete_mention(&names);
            }
            KeyCode::Char('u') if ctrl => self.compose.clear(),
            KeyCode::Char(c) if !ctrl => self.compose.insert_char(c),
            KeyCode::Backspace => self.compose.backspace(),
            KeyCode::Delete => self.compose.delete(),
            KeyCode::Left => self.compose.move_left(),
            KeyCode::Right => self.compose.move_right(),
            KeyCode::Home => self.compose.move_home(),
            KeyCode::End => self.compose.move_end(),
            KeyCode::Up => {
                self.compose.recall();
            }
            _ => {}
        }
    }

    fn quit(&mut self) {
        self.engine.send(EngineCommand::Shutdown);
        self.should_exit = true;
    }

    fn open_selected(&mut self) {
        if let Some(id) = self.sidebar.selected_id() {
            tracing::debug!("Opening {}", id);
            self.engine
                .send(EngineCommand::SelectConversation(id.to_string()));
        }
    }

    fn send_compose(&mut self) {
        let Some(conversation_id) = self.snapshot.selected().map(str::to_string) else {
            self.notify("Open a conversation first", true);
            return;
        };
        if let Some(text) = self.compose.send() {
            self.engine.send(EngineCommand::SendMessage {
                conversation_id,
                text,
            });
        }
    }

    fn react(&mut self, toggle: bool, emoji: &str) {
        let Some(message_id) = self
            .messages
            .selected_message(&self.snapshot)
            .map(|m| m.id.clone())
        else {
            self.notify("Select a message with Up/Down first", true);
            return;
        };
        let emoji = emoji.to_string();
        self.engine.send(if toggle {
            EngineCommand::ToggleReaction { message_id, emoji }
        } else {
            EngineCommand::AddReaction { message_id, emoji }
        });
    }

    fn complete_action(&mut self, index: usize) {
        let Some(msg) = self.messages.selected_message(&self.snapshot) else {
            return;
        };
        if self.snapshot.completed_action(&msg.id).is_some() {
            return;
        }
        if let Some(action) = msg.actions.get(index) {
            self.engine.send(EngineCommand::CompleteAction {
                message_id: msg.id.clone(),
                action_id: action.id.clone(),
            });
        }
    }

    fn request_approval(&mut self, cmd: EngineCommand) {
        let in_assistant_dm = self
            .snapshot
            .assistant_conversation()
            .is_some_and(|c| self.snapshot.selected() == Some(c.id.as_str()));
        if in_assistant_dm {
            self.engine.send(cmd);
        } else {
            let text = format!("Open the {} DM to simulate requests", self.library.assistant());
            self.notify(text, true);
        }
    }

    fn cycle_theme(&mut self) {
        let ids = self.library.profile().themes.ids();
        if ids.is_empty() {
            return;
        }
        let current = ids.iter().position(|id| id == self.snapshot.theme_id());
        let next = current.map_or(0, |i| (i + 1) % ids.len());
        self.engine
            .send(EngineCommand::ChangeTheme(ids[next].clone()));
    }
}

/// Run the TUI until the user quits. `ratatui::init` installs a panic
/// hook that restores the terminal.
pub async fn run(engine: Engine, library: Arc<ContentLibrary>, logs: LogBuffer) -> Result<()> {
    let mut app = App::new(engine, library, logs);
    let mut terminal = ratatui::init();
    let result = run_app(&mut terminal, &mut app).await;
    ratatui::restore();
    result
}

async fn run_app(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    let mut input = EventStream::new();
    let mut frames = tokio::time::interval(Duration::from_millis(FRAME_DURATION_MS));

    while !app.should_exit {
        tokio::select! {
            Some(event) = app.engine.recv() => app.apply(event),
            event = input.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            _ = frames.tick() => {
                app.tick();
                terminal.draw(|frame| ui::render(frame, app))?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::content::{Picker, ReactionPolicy};
    use crate::profile::Profile;
    use crate::sim::{bootstrap, ActivitySimulator};
    use chrono::Local;

    fn app() -> App {
        let library = Arc::new(ContentLibrary::new(
            Arc::new(Profile::embedded().unwrap()),
            ReactionPolicy::default(),
        ));
        let config = SimulationConfig::default();
        let mut picker = Picker::seeded(5);
        let store = bootstrap(&library, &config, &mut picker, Local::now().naive_local());
        let engine = Engine::start(
            ActivitySimulator::new(library.clone(), config),
            store,
            picker,
        );
        App::new(engine, library, LogBuffer::default())
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    /// Apply engine events until `done` holds for the snapshot.
    async fn wait_for(app: &mut App, done: impl Fn(&ConversationStore) -> bool) {
        loop {
            let event = app.engine.recv().await.expect("engine running");
            app.apply(event);
            if done(&app.snapshot) {
                return;
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_opens_conversation() {
        let mut app = app();
        wait_for(&mut app, |s| !s.conversations().is_empty()).await;
        let first = app.sidebar.selected_id().unwrap().to_string();

        press(&mut app, KeyCode::Enter);
        wait_for(&mut app, |s| s.selected() == Some(first.as_str())).await;

        assert_eq!(app.sidebar.open.as_deref(), Some(first.as_str()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_compose_sends_to_open_conversation() {
        let mut app = app();
        wait_for(&mut app, |s| !s.conversations().is_empty()).await;
        press(&mut app, KeyCode::Enter);
        wait_for(&mut app, |s| s.selected().is_some()).await;
        let open = app.snapshot.selected().unwrap().to_string();

        press(&mut app, KeyCode::Char('i'));
        assert_eq!(app.active_pane, Pane::Compose);
        for c in "deploy done".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        assert!(app.compose.is_empty());

        wait_for(&mut app, |s| {
            s.messages(&open)
                .iter()
                .any(|m| m.body == "deploy done" && m.sender == "Klaus Müller")
        })
        .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_approval_keys_need_assistant_dm() {
        let mut app = app();
        wait_for(&mut app, |s| !s.conversations().is_empty()).await;
        press(&mut app, KeyCode::Char('P'));
        assert!(app.status.as_ref().is_some_and(|s| s.is_error));

        app.sidebar.select_id("juspay-ai");
        press(&mut app, KeyCode::Enter);
        wait_for(&mut app, |s| s.selected() == Some("juspay-ai")).await;
        let before = app.snapshot.messages("juspay-ai").len();
        press(&mut app, KeyCode::Char('P'));
        wait_for(&mut app, |s| s.messages("juspay-ai").len() > before).await;
        let last = app.snapshot.messages("juspay-ai").last().unwrap();
        assert!(last.has_actions());
    }

    #[tokio::test(start_paused = true)]
    async fn test_theme_key_cycles() {
        let mut app = app();
        wait_for(&mut app, |s| !s.conversations().is_empty()).await;
        let start = app.snapshot.theme_id().to_string();
        press(&mut app, KeyCode::Char('t'));
        wait_for(&mut app, |s| s.theme_id() != start).await;
        assert!(app.library.profile().themes.contains(app.snapshot.theme_id()));
    }

    #[test]
    fn test_pane_cycle_round_trips() {
        let mut pane = Pane::Sidebar;
        for _ in 0..3 {
            pane = pane.next();
        }
        assert_eq!(pane, Pane::Sidebar);
        assert_eq!(Pane::Sidebar.prev(), Pane::Compose);
    }
}
