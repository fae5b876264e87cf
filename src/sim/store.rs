//! Single owner of all mutable workspace state.

use std::collections::{BTreeMap, HashMap, HashSet};

use thiserror::Error;

use crate::models::{Conversation, Message};
use crate::profile::ThemeSet;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("unknown conversation: {0}")]
    UnknownConversation(String),
    #[error("unknown message: {0}")]
    UnknownMessage(String),
    #[error("message {message} has no action {action}")]
    UnknownAction { message: String, action: String },
}

/// Messages, unread counters, presence and the viewer's own reactions.
///
/// The conversation set is fixed at construction. Message lists only grow
/// by `append` and shrink by `trim`.
#[derive(Debug, Clone, Default)]
pub struct ConversationStore {
    conversations: Vec<Conversation>,
    messages: HashMap<String, Vec<Message>>,
    unread: HashMap<String, u32>,
    /// Person name -> online.
    presence: BTreeMap<String, bool>,
    user_reactions: HashMap<String, HashSet<String>>,
    /// Message id -> the action that was taken.
    completed_actions: HashMap<String, String>,
    /// Message id -> owning conversation id.
    message_index: HashMap<String, String>,
    selected: Option<String>,
    theme_id: String,
}

impl ConversationStore {
    pub fn new(conversations: Vec<Conversation>, theme_id: impl Into<String>) -> Self {
        let messages = conversations
            .iter()
            .map(|c| (c.id.clone(), Vec::new()))
            .collect();
        let unread = conversations.iter().map(|c| (c.id.clone(), 0)).collect();
        Self {
            conversations,
            messages,
            unread,
            theme_id: theme_id.into(),
            ..Self::default()
        }
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn conversation(&self, id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    pub fn assistant_conversation(&self) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.assistant)
    }

    pub fn messages(&self, id: &str) -> &[Message] {
        self.messages.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn message(&self, message_id: &str) -> Option<&Message> {
        let conv = self.message_index.get(message_id)?;
        self.messages
            .get(conv)?
            .iter()
            .find(|m| m.id == message_id)
    }

    pub fn conversation_of(&self, message_id: &str) -> Option<&str> {
        self.message_index.get(message_id).map(String::as_str)
    }

    pub fn unread(&self, id: &str) -> u32 {
        self.unread.get(id).copied().unwrap_or(0)
    }

    pub fn total_unread(&self) -> u32 {
        self.unread.values().sum()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn theme_id(&self) -> &str {
        &self.theme_id
    }

    pub fn is_online(&self, name: &str) -> bool {
        self.presence.get(name).copied().unwrap_or(false)
    }

    pub fn presence(&self) -> impl Iterator<Item = (&str, bool)> {
        self.presence.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn user_reacted(&self, message_id: &str, emoji: &str) -> bool {
        self.user_reactions
            .get(message_id)
            .is_some_and(|set| set.contains(emoji))
    }

    /// The action taken on a message, if any.
    pub fn completed_action(&self, message_id: &str) -> Option<&str> {
        self.completed_actions.get(message_id).map(String::as_str)
    }

    fn ensure_conversation(&self, id: &str) -> Result<(), StoreError> {
        if self.messages.contains_key(id) {
            Ok(())
        } else {
            Err(StoreError::UnknownConversation(id.to_string()))
        }
    }

    fn message_mut(&mut self, message_id: &str) -> Result<&mut Message, StoreError> {
        let unknown = || StoreError::UnknownMessage(message_id.to_string());
        let conv = self.message_index.get(message_id).ok_or_else(unknown)?;
        self.messages
            .get_mut(conv)
            .and_then(|list| list.iter_mut().find(|m| m.id == message_id))
            .ok_or_else(unknown)
    }

    /// Replace a conversation's messages with a synthesized history.
    pub fn load_history(&mut self, id: &str, history: Vec<Message>) -> Result<(), StoreError> {
        self.ensure_conversation(id)?;
        if let Some(old) = self.messages.get(id) {
            for msg in old {
                self.message_index.remove(&msg.id);
            }
        }
        for msg in &history {
            self.message_index.insert(msg.id.clone(), id.to_string());
        }
        self.messages.insert(id.to_string(), history);
        Ok(())
    }

    /// Append a message, keeping timestamps non-decreasing within the
    /// conversation.
    pub fn append(&mut self, id: &str, mut message: Message) -> Result<(), StoreError> {
        let list = self
            .messages
            .get_mut(id)
            .ok_or_else(|| StoreError::UnknownConversation(id.to_string()))?;
        if let Some(last) = list.last() {
            if message.sent_at < last.sent_at {
                tracing::debug!("{}: clamping out-of-order timestamp for {}", id, message.id);
                message.sent_at = last.sent_at;
            }
        }
        self.message_index.insert(message.id.clone(), id.to_string());
        list.push(message);
        Ok(())
    }

    /// Drop the oldest messages beyond `max_len`.
    pub fn trim(&mut self, id: &str, max_len: usize) -> Result<usize, StoreError> {
        let list = self
            .messages
            .get_mut(id)
            .ok_or_else(|| StoreError::UnknownConversation(id.to_string()))?;
        if list.len() <= max_len {
            return Ok(0);
        }
        let excess = list.len() - max_len;
        for old in list.drain(..excess) {
            self.message_index.remove(&old.id);
            self.user_reactions.remove(&old.id);
            self.completed_actions.remove(&old.id);
        }
        Ok(excess)
    }

    /// Adjust an emoji count; a count reaching zero removes the emoji.
    pub fn set_reaction(&mut self, message_id: &str, emoji: &str, delta: i32) -> Result<u32, StoreError> {
        let message = self.message_mut(message_id)?;
        Ok(message.reactions.adjust(emoji, delta))
    }

    /// Flip the viewer's reaction. Returns whether the viewer now has it.
    pub fn toggle_user_reaction(&mut self, message_id: &str, emoji: &str) -> Result<bool, StoreError> {
        let reacted = self.user_reacted(message_id, emoji);
        self.set_reaction(message_id, emoji, if reacted { -1 } else { 1 })?;
        let set = self.user_reactions.entry(message_id.to_string()).or_default();
        if reacted {
            set.remove(emoji);
            if set.is_empty() {
                self.user_reactions.remove(message_id);
            }
        } else {
            set.insert(emoji.to_string());
        }
        Ok(!reacted)
    }

    /// Add the viewer's reaction. No-op if already present; returns whether
    /// anything changed.
    pub fn add_user_reaction(&mut self, message_id: &str, emoji: &str) -> Result<bool, StoreError> {
        if self.user_reacted(message_id, emoji) {
            if self.message_index.contains_key(message_id) {
                return Ok(false);
            }
            return Err(StoreError::UnknownMessage(message_id.to_string()));
        }
        self.toggle_user_reaction(message_id, emoji)
    }

    /// Record an action on a message. The first completion wins and disables
    /// every other action of that message; later calls return `Ok(false)`.
    pub fn mark_action_completed(&mut self, message_id: &str, action_id: &str) -> Result<bool, StoreError> {
        let message = self
            .message(message_id)
            .ok_or_else(|| StoreError::UnknownMessage(message_id.to_string()))?;
        if !message.actions.iter().any(|a| a.id == action_id) {
            return Err(StoreError::UnknownAction {
                message: message_id.to_string(),
                action: action_id.to_string(),
            });
        }
        if self.completed_actions.contains_key(message_id) {
            return Ok(false);
        }
        self.completed_actions
            .insert(message_id.to_string(), action_id.to_string());
        Ok(true)
    }

    pub fn select(&mut self, id: &str) -> Result<(), StoreError> {
        self.ensure_conversation(id)?;
        self.selected = Some(id.to_string());
        Ok(())
    }

    pub fn clear_unread(&mut self, id: &str) -> Result<(), StoreError> {
        self.ensure_conversation(id)?;
        self.unread.insert(id.to_string(), 0);
        Ok(())
    }

    pub fn increment_unread(&mut self, id: &str) -> Result<u32, StoreError> {
        self.ensure_conversation(id)?;
        let count = self.unread.entry(id.to_string()).or_insert(0);
        *count += 1;
        Ok(*count)
    }

    pub fn set_unread(&mut self, id: &str, count: u32) -> Result<(), StoreError> {
        self.ensure_conversation(id)?;
        self.unread.insert(id.to_string(), count);
        Ok(())
    }

    /// Share of `ids` with a nonzero unread counter. Zero for an empty set.
    pub fn unread_share<'a>(&self, ids: impl IntoIterator<Item = &'a str>) -> f64 {
        let (total, unread) = ids.into_iter().fold((0usize, 0usize), |(t, u), id| {
            (t + 1, u + usize::from(self.unread(id) > 0))
        });
        if total == 0 {
            0.0
        } else {
            unread as f64 / total as f64
        }
    }

    pub fn set_presence(&mut self, name: &str, online: bool) {
        self.presence.insert(name.to_string(), online);
    }

    /// Flip a person's presence. Returns the new state.
    pub fn toggle_presence(&mut self, name: &str) -> bool {
        let online = self.presence.entry(name.to_string()).or_insert(false);
        *online = !*online;
        *online
    }

    /// Switch the active theme. Unknown ids leave the theme unchanged.
    pub fn change_theme(&mut self, themes: &ThemeSet, theme_id: &str) -> bool {
        if !themes.contains(theme_id) {
            tracing::warn!("Ignoring unknown theme {}", theme_id);
            return false;
        }
        self.theme_id = theme_id.to_string();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActionKind, ConversationKind, MessageAction};
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn conv(id: &str, kind: ConversationKind) -> Conversation {
        Conversation {
            id: id.to_string(),
            name: id.to_string(),
            kind,
            members: Vec::new(),
            member_count: 3,
            private: false,
            assistant: false,
        }
    }

    fn store() -> ConversationStore {
        let mut store = ConversationStore::new(
            vec![
                conv("general", ConversationKind::Channel),
                conv("random", ConversationKind::Channel),
                conv("group-1", ConversationKind::GroupMessage),
            ],
            "midnight-express",
        );
        let mut first = Message::new("general-1", "Anna Becker", "Hello", at(9, 0));
        first.reactions.insert("👍", 2);
        store.load_history("general", vec![first]).unwrap();
        store
    }

    fn actionable(id: &str) -> Message {
        let mut msg = Message::new(id, "Juspay AI", "Leave request", at(10, 0));
        msg.actions = ["approve-leave", "reject-leave"]
            .iter()
            .map(|a| MessageAction {
                id: a.to_string(),
                label: a.to_string(),
                kind: ActionKind::Primary,
                emoji: None,
                confirmation: "done".to_string(),
            })
            .collect();
        msg
    }

    #[test]
    fn test_append_unknown_conversation() {
        let mut store = store();
        let err = store
            .append("nope", Message::new("x", "A", "b", at(9, 0)))
            .unwrap_err();
        assert_eq!(err, StoreError::UnknownConversation("nope".into()));
    }

    #[test]
    fn test_append_clamps_timestamps() {
        let mut store = store();
        store
            .append("general", Message::new("general-2", "A", "late", at(8, 0)))
            .unwrap();
        let msgs = store.messages("general");
        assert_eq!(msgs[1].sent_at, at(9, 0));
        assert!(msgs.windows(2).all(|w| w[0].sent_at <= w[1].sent_at));
    }

    #[test]
    fn test_trim_drops_oldest() {
        let mut store = store();
        for i in 2..=6 {
            store
                .append("general", Message::new(format!("general-{i}"), "A", "x", at(9, i)))
                .unwrap();
        }
        assert_eq!(store.trim("general", 3).unwrap(), 3);
        let ids: Vec<_> = store.messages("general").iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["general-4", "general-5", "general-6"]);
        assert!(store.message("general-1").is_none());
        assert_eq!(store.trim("general", 10).unwrap(), 0);
    }

    #[test]
    fn test_set_reaction_removes_at_zero() {
        let mut store = store();
        assert_eq!(store.set_reaction("general-1", "👍", -1).unwrap(), 1);
        assert_eq!(store.set_reaction("general-1", "👍", -1).unwrap(), 0);
        let msg = store.message("general-1").unwrap();
        assert!(msg.reactions.is_empty());
        assert!(msg.reactions.iter().all(|(_, n)| n > 0));
    }

    #[test]
    fn test_toggle_user_reaction_round_trip() {
        let mut store = store();
        assert!(store.toggle_user_reaction("general-1", "👍").unwrap());
        assert_eq!(store.message("general-1").unwrap().reactions.get("👍"), 3);
        assert!(!store.toggle_user_reaction("general-1", "👍").unwrap());
        assert_eq!(store.message("general-1").unwrap().reactions.get("👍"), 2);
        assert!(!store.user_reacted("general-1", "👍"));
    }

    #[test]
    fn test_toggle_new_emoji_removes_key() {
        let mut store = store();
        store.toggle_user_reaction("general-1", "🎉").unwrap();
        assert_eq!(store.message("general-1").unwrap().reactions.get("🎉"), 1);
        store.toggle_user_reaction("general-1", "🎉").unwrap();
        let reactions = &store.message("general-1").unwrap().reactions;
        assert_eq!(reactions.len(), 1);
        assert_eq!(reactions.get("🎉"), 0);
    }

    #[test]
    fn test_add_user_reaction_is_noop_when_present() {
        let mut store = store();
        assert!(store.add_user_reaction("general-1", "🎉").unwrap());
        assert!(!store.add_user_reaction("general-1", "🎉").unwrap());
        assert_eq!(store.message("general-1").unwrap().reactions.get("🎉"), 1);
        assert!(store.add_user_reaction("missing", "🎉").is_err());
    }

    #[test]
    fn test_mark_action_completed_idempotent() {
        let mut store = store();
        store.append("general", actionable("general-2")).unwrap();
        assert!(store.mark_action_completed("general-2", "approve-leave").unwrap());
        assert!(!store.mark_action_completed("general-2", "approve-leave").unwrap());
        assert!(!store.mark_action_completed("general-2", "reject-leave").unwrap());
        assert_eq!(store.completed_action("general-2"), Some("approve-leave"));
        assert!(matches!(
            store.mark_action_completed("general-2", "bogus"),
            Err(StoreError::UnknownAction { .. })
        ));
    }

    #[test]
    fn test_unread_share() {
        let mut store = store();
        store.increment_unread("general").unwrap();
        assert_eq!(store.unread_share(["general", "random"]), 0.5);
        store.clear_unread("general").unwrap();
        assert_eq!(store.unread_share(["general", "random"]), 0.0);
        assert_eq!(store.unread_share(std::iter::empty()), 0.0);
    }

    #[test]
    fn test_toggle_presence() {
        let mut store = store();
        store.set_presence("Anna Becker", true);
        assert!(!store.toggle_presence("Anna Becker"));
        assert!(!store.is_online("Anna Becker"));
        assert!(store.toggle_presence("Anna Becker"));
    }

    #[test]
    fn test_select_unknown_is_error() {
        let mut store = store();
        assert!(store.select("missing").is_err());
        assert!(store.select("random").is_ok());
        assert_eq!(store.selected(), Some("random"));
    }
}
