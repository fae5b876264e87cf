//! Engine task: the single owner of workspace state.
//!
//! The UI sends `EngineCommand` values over an mpsc channel. A background
//! tokio task applies them, runs the ambient, foreground and presence
//! timers, and sends `EngineEvent` values back, usually a fresh snapshot of
//! the store.

use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{sleep, sleep_until, Instant};

use super::activity::{ActivitySimulator, TickOutcome};
use super::store::ConversationStore;
use crate::content::{ContentLibrary, Picker};

/// Commands sent from the UI to the engine.
#[derive(Debug, Clone)]
pub enum EngineCommand {
    SelectConversation(String),
    SendMessage { conversation_id: String, text: String },
    ToggleReaction { message_id: String, emoji: String },
    AddReaction { message_id: String, emoji: String },
    CompleteAction { message_id: String, action_id: String },
    ChangeTheme(String),
    RequestLeaveApproval,
    RequestToolAccessApproval,
    Shutdown,
}

/// Events sent from the engine to the UI.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// The store after a mutation.
    Snapshot(Arc<ConversationStore>),
    /// One-line status for the user (action confirmations and the like).
    Notice(String),
}

/// Deferred work scheduled on the engine's join set.
#[derive(Debug)]
enum Job {
    MentionReply(String),
    ClearUnread(String),
    ThankYou(String),
}

/// Handle for interacting with the engine. Dropping it stops the task and
/// every pending timer.
pub struct Engine {
    cmd_tx: mpsc::UnboundedSender<EngineCommand>,
    event_rx: mpsc::UnboundedReceiver<EngineEvent>,
    task: JoinHandle<()>,
}

impl Engine {
    /// Spawn the engine task around an already bootstrapped store.
    pub fn start(activity: ActivitySimulator, store: ConversationStore, picker: Picker) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let actor = Actor {
            activity,
            store,
            picker,
            events: event_tx,
            jobs: JoinSet::new(),
            pending_thanks: HashMap::new(),
        };
        let task = tokio::spawn(actor.run(cmd_rx));

        Self {
            cmd_tx,
            event_rx,
            task,
        }
    }

    /// Send a command to the engine (non-blocking).
    pub fn send(&self, cmd: EngineCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            tracing::error!("Engine channel closed -- command dropped");
        }
    }

    /// Receive the next event. Returns `None` once the engine has stopped.
    pub async fn recv(&mut self) -> Option<EngineEvent> {
        self.event_rx.recv().await
    }

    /// Next event if one is already queued.
    #[cfg(test)]
    pub fn try_recv(&mut self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.task.abort();
    }
}

struct Actor {
    activity: ActivitySimulator,
    store: ConversationStore,
    picker: Picker,
    events: mpsc::UnboundedSender<EngineEvent>,
    jobs: JoinSet<Job>,
    /// Leave-request message id -> requester, for the thank-you.
    pending_thanks: HashMap<String, String>,
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

async fn sleep_until_some(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

impl Actor {
    fn jitter(&mut self, range: RangeInclusive<u64>) -> Instant {
        let secs = self.picker.between(
            u32::try_from(*range.start()).unwrap_or(u32::MAX),
            u32::try_from(*range.end()).unwrap_or(u32::MAX),
        );
        Instant::now() + Duration::from_secs(u64::from(secs))
    }

    async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<EngineCommand>) {
        let config = self.activity.config().clone();
        let mut ambient_at = self.jitter(config.ambient());
        let mut presence_at = self.jitter(config.presence_first());
        let mut foreground_at = self
            .store
            .selected()
            .is_some()
            .then(|| Instant::now() + Duration::from_secs(*config.foreground().start()));

        tracing::info!("Simulation engine started");
        self.publish();

        loop {
            tokio::select! {
                cmd = cmd_rx.recv() => {
                    let Some(cmd) = cmd else { break };
                    if matches!(cmd, EngineCommand::Shutdown) {
                        break;
                    }
                    let selecting = matches!(cmd, EngineCommand::SelectConversation(_));
                    if self.handle(cmd) && selecting {
                        foreground_at = Some(self.jitter(config.foreground()));
                    }
                }
                _ = sleep_until(ambient_at) => {
                    ambient_at = self.jitter(config.ambient());
                    match self.activity.ambient_tick(&mut self.store, now(), &mut self.picker) {
                        Ok(outcome) => self.after_tick(outcome),
                        Err(e) => tracing::warn!("Ambient tick failed: {}", e),
                    }
                }
                _ = sleep_until_some(foreground_at), if foreground_at.is_some() => {
                    foreground_at = Some(self.jitter(config.foreground()));
                    match self.activity.foreground_tick(&mut self.store, now(), &mut self.picker) {
                        Ok(outcome) => self.after_tick(outcome),
                        Err(e) => tracing::warn!("Foreground tick failed: {}", e),
                    }
                }
                _ = sleep_until(presence_at) => {
                    presence_at = self.jitter(config.presence());
                    let changed = self.activity.presence_tick(&mut self.store, &mut self.picker);
                    if !changed.is_empty() {
                        self.publish();
                    }
                }
                Some(done) = self.jobs.join_next(), if !self.jobs.is_empty() => {
                    match done {
                        Ok(job) => self.run_job(job),
                        Err(e) => tracing::warn!("Deferred job failed: {}", e),
                    }
                }
            }
        }

        self.jobs.abort_all();
        tracing::info!("Simulation engine stopped");
    }

    fn publish(&self) {
        if self
            .events
            .send(EngineEvent::Snapshot(Arc::new(self.store.clone())))
            .is_err()
        {
            tracing::debug!("No UI listening for snapshots");
        }
    }

    fn notice(&self, text: impl Into<String>) {
        let _ = self.events.send(EngineEvent::Notice(text.into()));
    }

    fn schedule(&mut self, delay: Duration, job: Job) {
        tracing::debug!("Scheduling {:?} in {:?}", job, delay);
        self.jobs.spawn(async move {
            sleep(delay).await;
            job
        });
    }

    /// Forget approval requests that have been trimmed out of the store.
    fn prune_pending(&mut self) {
        self.pending_thanks
            .retain(|message_id, _| self.store.message(message_id).is_some());
    }

    fn after_tick(&mut self, outcome: TickOutcome) {
        match outcome {
            TickOutcome::Posted {
                conversation_id,
                mention,
                ..
            } => {
                if mention {
                    let delay = self.activity.config().mention_reply_delay();
                    self.schedule(delay, Job::MentionReply(conversation_id));
                }
                self.prune_pending();
                self.publish();
            }
            TickOutcome::Throttled | TickOutcome::Idle => {}
        }
    }

    fn run_job(&mut self, job: Job) {
        let result = match job {
            Job::MentionReply(conversation_id) => self
                .activity
                .reply_to_mention(&mut self.store, &conversation_id, now(), &mut self.picker)
                .map(|_| ()),
            Job::ClearUnread(conversation_id) => {
                // Only if the viewer is still looking at it.
                if self.store.selected() == Some(conversation_id.as_str()) {
                    self.store.clear_unread(&conversation_id)
                } else {
                    Ok(())
                }
            }
            Job::ThankYou(requester) => self
                .activity
                .thank_requester(&mut self.store, &requester, now())
                .map(|_| ()),
        };
        match result {
            Ok(()) => {
                self.prune_pending();
                self.publish();
            }
            Err(e) => tracing::warn!("Deferred job dropped: {}", e),
        }
    }

    /// Apply a command. Returns whether it took effect.
    fn handle(&mut self, cmd: EngineCommand) -> bool {
        let config = self.activity.config().clone();
        let result = match cmd {
            EngineCommand::SelectConversation(id) => self.store.select(&id).map(|()| {
                self.schedule(config.unread_clear_delay(), Job::ClearUnread(id));
            }),
            EngineCommand::SendMessage {
                conversation_id,
                text,
            } => {
                if text.trim().is_empty() {
                    return false;
                }
                self.activity
                    .send_user_message(&mut self.store, &conversation_id, &text, now())
                    .map(|(_, mention)| {
                        if mention {
                            self.schedule(
                                config.mention_reply_delay(),
                                Job::MentionReply(conversation_id),
                            );
                        }
                    })
            }
            EngineCommand::ToggleReaction { message_id, emoji } => self
                .store
                .toggle_user_reaction(&message_id, &emoji)
                .map(|_| ()),
            EngineCommand::AddReaction { message_id, emoji } => self
                .store
                .add_user_reaction(&message_id, &emoji)
                .map(|_| ()),
            EngineCommand::CompleteAction {
                message_id,
                action_id,
            } => self.complete_action(&message_id, &action_id),
            EngineCommand::ChangeTheme(theme_id) => {
                let themes = self.activity.library().profile().themes.clone();
                self.store.change_theme(&themes, &theme_id);
                Ok(())
            }
            EngineCommand::RequestLeaveApproval => self
                .activity
                .request_leave_approval(&mut self.store, now(), &mut self.picker)
                .map(|posted| match posted {
                    Some((message_id, requester)) => {
                        self.pending_thanks.insert(message_id, requester);
                    }
                    None => self.notice("Nobody available to request leave"),
                }),
            EngineCommand::RequestToolAccessApproval => self
                .activity
                .request_tool_access_approval(&mut self.store, now(), &mut self.picker)
                .map(|posted| {
                    if posted.is_none() {
                        self.notice("Nobody available to request tool access");
                    }
                }),
            EngineCommand::Shutdown => return false,
        };
        match result {
            Ok(()) => {
                self.prune_pending();
                self.publish();
                true
            }
            Err(e) => {
                tracing::warn!("Ignoring command: {}", e);
                false
            }
        }
    }

    fn complete_action(&mut self, message_id: &str, action_id: &str) -> Result<(), super::StoreError> {
        if !self.store.mark_action_completed(message_id, action_id)? {
            tracing::debug!("Action on {} already completed", message_id);
            return Ok(());
        }
        let confirmation = self
            .store
            .message(message_id)
            .and_then(|m| m.actions.iter().find(|a| a.id == action_id))
            .map(|a| a.confirmation.clone());
        if let Some(confirmation) = confirmation {
            self.notice(confirmation);
        }
        if let Some(requester) = self.pending_thanks.remove(message_id) {
            if action_id == "approve-leave" {
                let delay = self.activity.config().thank_you_delay();
                self.schedule(delay, Job::ThankYou(requester));
            }
        }
        Ok(())
    }
}
