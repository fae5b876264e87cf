//! Incremental live activity: ambient and foreground messages, mention
//! replies, approvals and presence flicker.

use std::sync::Arc;

use chrono::NaiveDateTime;
use uuid::Uuid;

use super::store::{ConversationStore, StoreError};
use crate::config::SimulationConfig;
use crate::content::{ContentLibrary, Draft, Picker};
use crate::models::{Conversation, ConversationKind, Message};

/// Result of one activity tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Too many conversations already have unread messages.
    Throttled,
    /// Nothing eligible to post into.
    Idle,
    Posted {
        conversation_id: String,
        message_id: String,
        /// The new message references the assistant.
        mention: bool,
    },
}

/// Generates one message per tick into the shared store.
pub struct ActivitySimulator {
    library: Arc<ContentLibrary>,
    config: SimulationConfig,
    seq: usize,
}

impl ActivitySimulator {
    pub fn new(library: Arc<ContentLibrary>, config: SimulationConfig) -> Self {
        Self {
            library,
            config,
            seq: 0,
        }
    }

    pub fn library(&self) -> &ContentLibrary {
        &self.library
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Conversations subject to back-pressure: everything but the assistant DM.
    pub fn tracked(store: &ConversationStore) -> Vec<&Conversation> {
        store
            .conversations()
            .iter()
            .filter(|c| !c.assistant)
            .collect()
    }

    /// Post into a random conversation the viewer is not looking at.
    pub fn ambient_tick(
        &mut self,
        store: &mut ConversationStore,
        now: NaiveDateTime,
        picker: &mut Picker,
    ) -> Result<TickOutcome, StoreError> {
        let tracked = Self::tracked(store);
        let share = store.unread_share(tracked.iter().map(|c| c.id.as_str()));
        if share >= self.config.backpressure_ratio {
            tracing::debug!("Ambient tick throttled, {:.0}% unread", share * 100.0);
            return Ok(TickOutcome::Throttled);
        }
        let candidates: Vec<Conversation> = tracked
            .into_iter()
            .filter(|c| Some(c.id.as_str()) != store.selected())
            .cloned()
            .collect();
        if candidates.is_empty() {
            return Ok(TickOutcome::Idle);
        }
        let conv = picker.pick(&candidates);
        let outcome = self.post_generated(store, conv, now, picker, self.config.live_cap)?;
        store.increment_unread(&conv.id)?;
        Ok(outcome)
    }

    /// Post into the open conversation.
    pub fn foreground_tick(
        &mut self,
        store: &mut ConversationStore,
        now: NaiveDateTime,
        picker: &mut Picker,
    ) -> Result<TickOutcome, StoreError> {
        let Some(conv) = store
            .selected()
            .and_then(|id| store.conversation(id))
            .cloned()
        else {
            return Ok(TickOutcome::Idle);
        };
        self.post_generated(store, &conv, now, picker, self.config.history_cap)
    }

    fn post_generated(
        &mut self,
        store: &mut ConversationStore,
        conv: &Conversation,
        now: NaiveDateTime,
        picker: &mut Picker,
        cap: usize,
    ) -> Result<TickOutcome, StoreError> {
        self.seq += 1;
        let draft = self.library.draft(conv, self.seq, picker);
        let mention = draft.sender != self.library.assistant()
            && self.library.mentions_assistant(&draft.text);
        let message_id = self.post(store, conv, draft, now, picker, cap)?;
        tracing::debug!("Posted {} into {}", message_id, conv.id);
        Ok(TickOutcome::Posted {
            conversation_id: conv.id.clone(),
            message_id,
            mention,
        })
    }

    fn post(
        &self,
        store: &mut ConversationStore,
        conv: &Conversation,
        draft: Draft,
        now: NaiveDateTime,
        picker: &mut Picker,
        cap: usize,
    ) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        let message = self.library.finish(conv, draft, id.clone(), now, picker);
        store.append(&conv.id, message)?;
        store.trim(&conv.id, cap)?;
        Ok(id)
    }

    /// Append a draft verbatim, counting it unread unless the conversation is open.
    fn deliver(
        &self,
        store: &mut ConversationStore,
        conversation_id: &str,
        draft: Draft,
        now: NaiveDateTime,
    ) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        let mut message = Message::new(id.clone(), draft.sender, draft.text, now);
        message.actions = draft.actions;
        store.append(conversation_id, message)?;
        store.trim(conversation_id, self.config.history_cap)?;
        if store.selected() != Some(conversation_id) {
            store.increment_unread(conversation_id)?;
        }
        Ok(id)
    }

    /// The viewer sends `text`. Returns the message id and whether the
    /// assistant was mentioned.
    pub fn send_user_message(
        &self,
        store: &mut ConversationStore,
        conversation_id: &str,
        text: &str,
        now: NaiveDateTime,
    ) -> Result<(String, bool), StoreError> {
        let id = Uuid::new_v4().to_string();
        let message = Message::new(id.clone(), self.library.me(), text.trim(), now);
        store.append(conversation_id, message)?;
        store.trim(conversation_id, self.config.history_cap)?;
        Ok((id, self.library.mentions_assistant(text)))
    }

    /// The assistant's one-shot answer to a mention. The reply is never
    /// scanned for further mentions.
    pub fn reply_to_mention(
        &self,
        store: &mut ConversationStore,
        conversation_id: &str,
        now: NaiveDateTime,
        picker: &mut Picker,
    ) -> Result<String, StoreError> {
        let conv = store
            .conversation(conversation_id)
            .cloned()
            .ok_or_else(|| StoreError::UnknownConversation(conversation_id.to_string()))?;
        let reply = self.library.assistant_reply(&conv, picker);
        self.deliver(store, conversation_id, reply, now)
    }

    /// DM peers that may file approval requests.
    fn requesters(store: &ConversationStore) -> Vec<String> {
        store
            .conversations()
            .iter()
            .filter(|c| c.kind == ConversationKind::DirectMessage && !c.assistant)
            .filter_map(|c| c.peer().map(str::to_string))
            .collect()
    }

    /// Post a leave request into the assistant DM. Returns the message id and
    /// the requester.
    pub fn request_leave_approval(
        &self,
        store: &mut ConversationStore,
        now: NaiveDateTime,
        picker: &mut Picker,
    ) -> Result<Option<(String, String)>, StoreError> {
        let requesters = Self::requesters(store);
        let Some(assistant) = store.assistant_conversation().map(|c| c.id.clone()) else {
            return Ok(None);
        };
        if requesters.is_empty() {
            return Ok(None);
        }
        let requester = picker.pick(&requesters).clone();
        let draft = self.library.leave_request(&requester, now.date());
        let id = self.deliver(store, &assistant, draft, now)?;
        Ok(Some((id, requester)))
    }

    /// Post a tool-access request into the assistant DM.
    pub fn request_tool_access_approval(
        &self,
        store: &mut ConversationStore,
        now: NaiveDateTime,
        picker: &mut Picker,
    ) -> Result<Option<(String, String)>, StoreError> {
        let requesters = Self::requesters(store);
        let Some(assistant) = store.assistant_conversation().map(|c| c.id.clone()) else {
            return Ok(None);
        };
        if requesters.is_empty() {
            return Ok(None);
        }
        let requester = picker.pick(&requesters).clone();
        let draft = self.library.tool_request(&requester, picker);
        let id = self.deliver(store, &assistant, draft, now)?;
        Ok(Some((id, requester)))
    }

    /// Thank-you from an approved requester, in their DM.
    pub fn thank_requester(
        &self,
        store: &mut ConversationStore,
        requester: &str,
        now: NaiveDateTime,
    ) -> Result<Option<String>, StoreError> {
        let Some(dm) = store
            .conversations()
            .iter()
            .find(|c| !c.assistant && c.peer() == Some(requester))
            .map(|c| c.id.clone())
        else {
            tracing::warn!("No DM with {}, dropping thank-you", requester);
            return Ok(None);
        };
        let id = self.deliver(store, &dm, self.library.thank_you(requester), now)?;
        Ok(Some(id))
    }

    /// Flip one person's presence (sometimes two). Returns who changed.
    pub fn presence_tick(&self, store: &mut ConversationStore, picker: &mut Picker) -> Vec<(String, bool)> {
        let people: Vec<&str> = self
            .library
            .colleagues()
            .iter()
            .map(String::as_str)
            .collect();
        let count = if picker.chance(0.7) { 1 } else { 2 };
        picker
            .sample(&people, count)
            .into_iter()
            .map(|name| {
                let online = store.toggle_presence(name);
                tracing::debug!("{} is now {}", name, if online { "online" } else { "away" });
                (name.to_string(), online)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ReactionPolicy;
    use crate::profile::Profile;
    use crate::sim::bootstrap;
    use chrono::NaiveDate;

    fn setup() -> (ActivitySimulator, ConversationStore, Picker) {
        let library = Arc::new(ContentLibrary::new(
            Arc::new(Profile::embedded().unwrap()),
            ReactionPolicy::default(),
        ));
        let mut picker = Picker::seeded(21);
        let config = SimulationConfig::default();
        let mut store = bootstrap(&library, &config, &mut picker, now());
        for conv in store.conversations().to_vec() {
            store.clear_unread(&conv.id).unwrap();
        }
        (ActivitySimulator::new(library, config), store, picker)
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 13)
            .unwrap()
            .and_hms_opt(15, 0, 0)
            .unwrap()
    }

    fn unread_snapshot(store: &ConversationStore) -> Vec<(String, u32)> {
        store
            .conversations()
            .iter()
            .map(|c| (c.id.clone(), store.unread(&c.id)))
            .collect()
    }

    #[test]
    fn test_ambient_throttled_at_ratio() {
        let (mut sim, mut store, mut picker) = setup();
        let tracked: Vec<String> = ActivitySimulator::tracked(&store)
            .iter()
            .map(|c| c.id.clone())
            .collect();
        let needed = (tracked.len() * 2 + 4) / 5;
        for id in tracked.iter().take(needed) {
            store.increment_unread(id).unwrap();
        }
        let before = unread_snapshot(&store);
        let lengths: Vec<usize> = tracked.iter().map(|id| store.messages(id).len()).collect();

        let outcome = sim.ambient_tick(&mut store, now(), &mut picker).unwrap();

        assert_eq!(outcome, TickOutcome::Throttled);
        assert_eq!(unread_snapshot(&store), before);
        let after: Vec<usize> = tracked.iter().map(|id| store.messages(id).len()).collect();
        assert_eq!(after, lengths);
    }

    #[test]
    fn test_ambient_posts_below_ratio() {
        let (mut sim, mut store, mut picker) = setup();
        store.select("general").unwrap();
        let outcome = sim.ambient_tick(&mut store, now(), &mut picker).unwrap();
        let TickOutcome::Posted {
            conversation_id,
            message_id,
            ..
        } = outcome
        else {
            panic!("expected a post, got {outcome:?}");
        };
        assert_ne!(conversation_id, "general");
        assert_ne!(conversation_id, "juspay-ai");
        assert_eq!(store.unread(&conversation_id), 1);
        assert!(store.messages(&conversation_id).len() <= 40);
        assert_eq!(
            store.messages(&conversation_id).last().unwrap().id,
            message_id
        );
    }

    #[test]
    fn test_ambient_never_posts_as_self_in_shared_rooms() {
        let (mut sim, mut store, mut picker) = setup();
        for _ in 0..200 {
            if let TickOutcome::Posted {
                conversation_id,
                message_id,
                ..
            } = sim.ambient_tick(&mut store, now(), &mut picker).unwrap()
            {
                let kind = store.conversation(&conversation_id).unwrap().kind;
                let msg = store.message(&message_id).unwrap();
                if kind != ConversationKind::DirectMessage {
                    assert_ne!(msg.sender, "Klaus Müller");
                }
            }
            for conv in store.conversations().to_vec() {
                store.clear_unread(&conv.id).unwrap();
            }
        }
    }

    #[test]
    fn test_foreground_appends_to_selected_without_unread() {
        let (mut sim, mut store, mut picker) = setup();
        assert_eq!(
            sim.foreground_tick(&mut store, now(), &mut picker).unwrap(),
            TickOutcome::Idle
        );
        store.select("backend").unwrap();
        let before = store.messages("backend").len();
        let outcome = sim.foreground_tick(&mut store, now(), &mut picker).unwrap();
        assert!(matches!(outcome, TickOutcome::Posted { ref conversation_id, .. } if conversation_id == "backend"));
        assert_eq!(store.messages("backend").len(), (before + 1).min(200));
        assert_eq!(store.unread("backend"), 0);
    }

    #[test]
    fn test_send_detects_mention() {
        let (sim, mut store, _) = setup();
        let (id, mention) = sim
            .send_user_message(&mut store, "backend", "cc @Juspay AI please check", now())
            .unwrap();
        assert!(mention);
        assert_eq!(store.message(&id).unwrap().sender, "Klaus Müller");
        let (_, mention) = sim
            .send_user_message(&mut store, "backend", "no mention here", now())
            .unwrap();
        assert!(!mention);
    }

    #[test]
    fn test_mention_reply_from_assistant() {
        let (sim, mut store, mut picker) = setup();
        let id = sim
            .reply_to_mention(&mut store, "backend", now(), &mut picker)
            .unwrap();
        assert_eq!(store.message(&id).unwrap().sender, "Juspay AI");
        assert_eq!(store.unread("backend"), 1);
        assert!(sim
            .reply_to_mention(&mut store, "nope", now(), &mut picker)
            .is_err());
    }

    #[test]
    fn test_leave_approval_and_thanks() {
        let (sim, mut store, mut picker) = setup();
        let (id, requester) = sim
            .request_leave_approval(&mut store, now(), &mut picker)
            .unwrap()
            .unwrap();
        assert_eq!(store.conversation_of(&id), Some("juspay-ai"));
        assert!(store.message(&id).unwrap().has_actions());
        assert_eq!(store.unread("juspay-ai"), 1);

        let thanks = sim
            .thank_requester(&mut store, &requester, now())
            .unwrap()
            .unwrap();
        let dm = store.conversation_of(&thanks).unwrap().to_string();
        assert_eq!(store.conversation(&dm).unwrap().peer(), Some(requester.as_str()));
        assert_eq!(store.message(&thanks).unwrap().sender, requester);
        assert_eq!(store.unread(&dm), 1);
    }

    #[test]
    fn test_presence_flips_one_or_two() {
        let (sim, mut store, mut picker) = setup();
        for _ in 0..20 {
            let before: Vec<(String, bool)> =
                store.presence().map(|(n, o)| (n.to_string(), o)).collect();
            let changed = sim.presence_tick(&mut store, &mut picker);
            assert!((1..=2).contains(&changed.len()));
            for (name, online) in &changed {
                let was = before
                    .iter()
                    .find(|(n, _)| n == name)
                    .map_or(false, |(_, o)| *o);
                assert_eq!(*online, !was);
            }
        }
    }
}
