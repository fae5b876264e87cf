//! Content library: scenario pools, reaction heuristics, text enhancement
//! and embed titles, parameterized by the company profile.

mod embeds;
mod enhance;
mod industry;
mod picker;
mod reactions;
mod scenarios;
mod titles;

pub use embeds::{random_embed_url, EmbedCatalog};
pub use enhance::{anchor, enhance};
pub use industry::{CompanyOutline, Industry};
pub use picker::{seeded_index, url_seed, Picker};
pub use reactions::{classify, ReactionPolicy, ReactionScope, Signal};
pub use scenarios::ConversationCategory;

use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::models::{ActionKind, Conversation, ConversationKind, Message, MessageAction};
use crate::profile::{first_name, slugify, Profile};
use scenarios::{
    ANNOUNCEMENTS, ASSISTANT_DM_SCRIPT, DM_CLOSERS, DM_OPENERS, DM_REPLIES,
    GENERIC_ASSISTANT_POSTS, GENERIC_ASSISTANT_REPLIES, GROUP_ASSISTANT_REPLIES, GROUP_LINES,
    HR_NUDGES, THANK_YOU, TOOLS, TOOL_REASONS,
};

/// Attempts at drawing a non-self sender before falling back.
pub const MAX_SENDER_ATTEMPTS: usize = 5;

const GENERAL_ASSISTANT_CHANCE: f64 = 0.10;
const CHANNEL_ASSISTANT_CHANCE: f64 = 0.15;
const GROUP_ASSISTANT_CHANCE: f64 = 0.10;

/// Generated message content before it gets an id and a timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub sender: String,
    pub text: String,
    pub actions: Vec<MessageAction>,
}

impl Draft {
    pub fn new(sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            text: text.into(),
            actions: Vec::new(),
        }
    }
}

/// One exchange of the hand-authored assistant DM.
#[derive(Debug, Clone)]
pub struct ScriptTurn {
    pub days_ago: i64,
    pub hour: u32,
    pub minute: u32,
    pub prompt: String,
    pub answer: String,
}

/// Per-fill slot values. Topics and names are shuffled once so `{topic}` and
/// `{topic2}` differ within one message.
struct Slots<'a> {
    company: &'a str,
    hq: &'a str,
    me: &'a str,
    assistant: &'a str,
    topics: Vec<&'a str>,
    names: Vec<&'a str>,
    countries: &'a [String],
}

impl Slots<'_> {
    fn topic(&self, i: usize) -> String {
        self.topics
            .get(i % self.topics.len().max(1))
            .map_or_else(|| "our roadmap".to_string(), |t| t.to_string())
    }

    fn name(&self, i: usize) -> String {
        self.names
            .get(i % self.names.len().max(1))
            .map_or_else(|| "the team".to_string(), |n| n.to_string())
    }
}

/// Templates, scenario generators and decorators for one workspace.
pub struct ContentLibrary {
    profile: Arc<Profile>,
    outline: CompanyOutline,
    embeds: EmbedCatalog,
    policy: ReactionPolicy,
    /// Humans who may speak in channels, the viewer included.
    speakers: Vec<String>,
    colleagues: Vec<String>,
    assistant_slug: String,
}

impl ContentLibrary {
    pub fn new(profile: Arc<Profile>, policy: ReactionPolicy) -> Self {
        let outline = CompanyOutline::derive(&profile.company.industry, &profile.company.description);
        let embeds = EmbedCatalog::new(&profile);
        let speakers = profile
            .people()
            .iter()
            .filter(|p| !p.bot)
            .map(|p| p.name.clone())
            .collect();
        let colleagues = profile.colleagues().map(|p| p.name.clone()).collect();
        let assistant_slug = slugify(&profile.assistant().name);
        Self {
            profile,
            outline,
            embeds,
            policy,
            speakers,
            colleagues,
            assistant_slug,
        }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn outline(&self) -> &CompanyOutline {
        &self.outline
    }

    pub fn embeds(&self) -> &EmbedCatalog {
        &self.embeds
    }

    pub fn policy(&self) -> &ReactionPolicy {
        &self.policy
    }

    pub fn assistant(&self) -> &str {
        &self.profile.assistant().name
    }

    pub fn me(&self) -> &str {
        &self.profile.me().name
    }

    pub fn colleagues(&self) -> &[String] {
        &self.colleagues
    }

    /// Expand `{slot}` placeholders and `{a|b}` alternations.
    pub fn fill(&self, template: &str, picker: &mut Picker) -> String {
        let mut topics: Vec<&str> = self.outline.topics.iter().map(String::as_str).collect();
        picker.shuffle(&mut topics);
        let mut names: Vec<&str> = self.colleagues.iter().map(|n| first_name(n)).collect();
        picker.shuffle(&mut names);
        let company = &self.profile.company;
        let slots = Slots {
            company: &company.name,
            hq: if company.headquarters.is_empty() {
                "the main office"
            } else {
                &company.headquarters
            },
            me: self.profile.me().first_name(),
            assistant: self.assistant(),
            topics,
            names,
            countries: &company.countries,
        };
        expand(template, &slots, picker)
    }

    /// Case-insensitive reference to the assistant by name or handle.
    pub fn mentions_assistant(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        let name = self.assistant().to_lowercase();
        lower.contains(&format!("@{}", self.assistant_slug)) || lower.contains(&name)
    }

    /// Next message for a conversation, shared by history and live activity.
    ///
    /// `seq` rotates the general channel's announcements.
    pub fn draft(&self, conv: &Conversation, seq: usize, picker: &mut Picker) -> Draft {
        if conv.assistant {
            return self.assistant_nudge(picker);
        }
        match conv.kind {
            ConversationKind::StarredChannel | ConversationKind::Channel => {
                self.channel_draft(conv, seq, picker)
            }
            ConversationKind::GroupMessage => self.group_draft(conv, picker),
            ConversationKind::DirectMessage => self.dm_draft(conv, picker),
        }
    }

    fn channel_draft(&self, conv: &Conversation, seq: usize, picker: &mut Picker) -> Draft {
        let category = ConversationCategory::of(&conv.id);
        let general = category == ConversationCategory::General;
        let assistant_chance = if general {
            GENERAL_ASSISTANT_CHANCE
        } else {
            CHANNEL_ASSISTANT_CHANCE
        };
        if picker.chance(assistant_chance) {
            let text = self.fill(*picker.pick(category.assistant_posts()), picker);
            return Draft::new(self.assistant(), text);
        }

        self.ensure_not_self(conv, picker, |picker, attempt| {
            let sender = picker.pick(&self.speakers).clone();
            let template = if general {
                ANNOUNCEMENTS[(seq + attempt) % ANNOUNCEMENTS.len()]
            } else {
                *picker.pick(category.lines())
            };
            Draft::new(sender, self.fill(template, picker))
        })
    }

    fn group_draft(&self, conv: &Conversation, picker: &mut Picker) -> Draft {
        if picker.chance(GROUP_ASSISTANT_CHANCE) {
            let text = self.fill(*picker.pick(GENERIC_ASSISTANT_POSTS), picker);
            return Draft::new(self.assistant(), text);
        }
        let members: Vec<String> = if conv.members.is_empty() {
            self.colleagues.clone()
        } else {
            conv.members.clone()
        };
        self.ensure_not_self(conv, picker, |picker, _| {
            let sender = picker.pick(&members).clone();
            Draft::new(sender, self.fill(*picker.pick(GROUP_LINES), picker))
        })
    }

    /// Three-stage 1:1 exchange: colleague opens, viewer replies, colleague closes.
    fn dm_draft(&self, conv: &Conversation, picker: &mut Picker) -> Draft {
        let peer = conv
            .peer()
            .map(str::to_string)
            .unwrap_or_else(|| picker.pick(&self.colleagues).clone());
        match picker.between(0, 2) {
            0 => Draft::new(peer, self.fill(*picker.pick(DM_OPENERS), picker)),
            1 => Draft::new(self.me(), self.fill(*picker.pick(DM_REPLIES), picker)),
            _ => Draft::new(peer, self.fill(*picker.pick(DM_CLOSERS), picker)),
        }
    }

    /// Retry a generator until it yields a non-self sender, then fall back
    /// to a generic update from a colleague.
    pub(crate) fn ensure_not_self<F>(&self, conv: &Conversation, picker: &mut Picker, mut generate: F) -> Draft
    where
        F: FnMut(&mut Picker, usize) -> Draft,
    {
        for attempt in 0..MAX_SENDER_ATTEMPTS {
            let draft = generate(picker, attempt);
            if !self.profile.is_me(&draft.sender) {
                return draft;
            }
            tracing::trace!("{}: drew the viewer as sender, retrying", conv.id);
        }
        tracing::debug!("{}: falling back to generic update", conv.id);
        let sender = picker.pick(&self.colleagues).clone();
        Draft::new(sender, format!("Update on {}.", conv.display_name()))
    }

    /// Canned assistant answer to an @mention.
    pub fn assistant_reply(&self, conv: &Conversation, picker: &mut Picker) -> Draft {
        let pool = match conv.kind {
            ConversationKind::GroupMessage => GROUP_ASSISTANT_REPLIES,
            ConversationKind::DirectMessage => GENERIC_ASSISTANT_REPLIES,
            ConversationKind::StarredChannel | ConversationKind::Channel => {
                ConversationCategory::of(&conv.id).assistant_replies()
            }
        };
        Draft::new(self.assistant(), self.fill(*picker.pick(pool), picker))
    }

    /// HR-style reminder posted in the assistant DM.
    pub fn assistant_nudge(&self, picker: &mut Picker) -> Draft {
        Draft::new(self.assistant(), self.fill(*picker.pick(HR_NUDGES), picker))
    }

    /// Hand-authored assistant DM, oldest exchange first.
    pub fn assistant_script(&self, picker: &mut Picker) -> Vec<ScriptTurn> {
        ASSISTANT_DM_SCRIPT
            .iter()
            .map(|(days_ago, hour, minute, prompt, answer)| {
                // Both sides of an exchange share one topic draw.
                let mut topics: Vec<&str> = self.outline.topics.iter().map(String::as_str).collect();
                picker.shuffle(&mut topics);
                let pinned = |t: &str| {
                    t.replace("{topic}", topics.first().copied().unwrap_or("our"))
                        .replace("{topic2}", topics.get(1).copied().unwrap_or("Platform"))
                };
                ScriptTurn {
                    days_ago: *days_ago,
                    hour: *hour,
                    minute: *minute,
                    prompt: self.fill(&pinned(prompt), picker),
                    answer: self.fill(&pinned(answer), picker),
                }
            })
            .collect()
    }

    /// Actionable leave-approval request on behalf of `requester`.
    pub fn leave_request(&self, requester: &str, today: NaiveDate) -> Draft {
        let start = today + Duration::days(7);
        let end = start + Duration::days(3);
        let first = first_name(requester);
        let text = format!(
            "<strong>Leave request</strong><br><br>{} has requested 4 days of vacation from {} to {}.<br>Please review and respond.",
            requester,
            start.format("%b %-d"),
            end.format("%b %-d"),
        );
        Draft {
            sender: self.assistant().to_string(),
            text,
            actions: vec![
                MessageAction {
                    id: "approve-leave".to_string(),
                    label: "Approve Leave".to_string(),
                    kind: ActionKind::Primary,
                    emoji: Some("✅".to_string()),
                    confirmation: format!(
                        "You have approved the leave request. {} has been notified.",
                        first
                    ),
                },
                MessageAction {
                    id: "reject-leave".to_string(),
                    label: "Reject".to_string(),
                    kind: ActionKind::Secondary,
                    emoji: None,
                    confirmation: format!(
                        "You have rejected the leave request. {} has been notified.",
                        first
                    ),
                },
            ],
        }
    }

    /// Actionable tool-access request with a random tool and reason.
    pub fn tool_request(&self, requester: &str, picker: &mut Picker) -> Draft {
        let tool = *picker.pick(TOOLS);
        let reason = *picker.pick(TOOL_REASONS);
        let first = first_name(requester);
        let text = format!(
            "<strong>Tool access request</strong><br><br>{} is requesting access to <strong>{}</strong>.<br>Reason: {}",
            requester, tool, reason
        );
        Draft {
            sender: self.assistant().to_string(),
            text,
            actions: vec![
                MessageAction {
                    id: "approve-tool".to_string(),
                    label: "Approve Access".to_string(),
                    kind: ActionKind::Primary,
                    emoji: Some("✅".to_string()),
                    confirmation: format!("Access to {} has been granted to {}.", tool, first),
                },
                MessageAction {
                    id: "reject-tool".to_string(),
                    label: "Reject".to_string(),
                    kind: ActionKind::Secondary,
                    emoji: None,
                    confirmation: format!("Access request declined. {} has been notified.", first),
                },
            ],
        }
    }

    pub fn thank_you(&self, requester: &str) -> Draft {
        Draft::new(requester, THANK_YOU)
    }

    /// Reaction scope of a conversation.
    pub fn scope_of(conv: &Conversation) -> ReactionScope {
        match conv.kind {
            _ if conv.id == "general" => ReactionScope::General,
            ConversationKind::StarredChannel | ConversationKind::Channel => ReactionScope::Channel,
            ConversationKind::GroupMessage => ReactionScope::Group,
            ConversationKind::DirectMessage => ReactionScope::DirectMessage,
        }
    }

    /// Turn a draft into a message: enhance the text (unless actionable) and
    /// maybe attach reactions.
    pub fn finish(
        &self,
        conv: &Conversation,
        draft: Draft,
        id: String,
        at: NaiveDateTime,
        picker: &mut Picker,
    ) -> Message {
        let body = if draft.actions.is_empty() {
            enhance(&draft.text, self.profile.person(&draft.sender), picker)
        } else {
            draft.text
        };
        let reactions = if draft.actions.is_empty() {
            self.policy
                .sample(&body, Self::scope_of(conv), self.profile.industry(), picker)
        } else {
            Default::default()
        };
        let mut msg = Message::new(id, draft.sender, body, at);
        msg.reactions = reactions;
        msg.actions = draft.actions;
        msg
    }
}

fn expand(template: &str, slots: &Slots<'_>, picker: &mut Picker) -> String {
    let mut out = String::with_capacity(template.len() + 32);
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match matching_brace(after) {
            Some(close) => {
                out.push_str(&resolve(&after[..close], slots, picker));
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Byte offset of the `}` closing an already-opened brace.
fn matching_brace(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '{' => depth += 1,
            '}' if depth == 0 => return Some(i),
            '}' => depth -= 1,
            _ => {}
        }
    }
    None
}

fn split_alternatives(inner: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in inner.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            '|' if depth == 0 => {
                parts.push(&inner[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&inner[start..]);
    parts
}

fn resolve(inner: &str, slots: &Slots<'_>, picker: &mut Picker) -> String {
    let options = split_alternatives(inner);
    if options.len() > 1 {
        let choice = *picker.pick(&options);
        return expand(choice, slots, picker);
    }
    match inner {
        "company" => slots.company.to_string(),
        "hq" => slots.hq.to_string(),
        "me" => slots.me.to_string(),
        "assistant" => slots.assistant.to_string(),
        "topic" => slots.topic(0),
        "topic2" => slots.topic(1),
        "topic3" => slots.topic(2),
        "name" => slots.name(0),
        "name2" => slots.name(1),
        "country" => {
            if slots.countries.is_empty() {
                "global".to_string()
            } else {
                picker.pick(slots.countries).clone()
            }
        }
        "pct" => picker.between(5, 45).to_string(),
        "num" => picker.between(1200, 98000).to_string(),
        "ticket" => format!(
            "{}-{}",
            picker.pick(&["ENG", "OPS", "DEV"]),
            picker.between(1000, 5999)
        ),
        other => format!("{{{}}}", other),
    }
}
