//! Multi-week message history for one conversation.

use std::sync::OnceLock;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use regex::{Captures, Regex};

use crate::content::{anchor, random_embed_url, ContentLibrary, EmbedCatalog, Picker};
use crate::models::{Conversation, ConversationKind, EmbedType, Message};

/// Seconds between a mention and the assistant's reply in history.
const HISTORY_MENTION_DELAY_SECS: i64 = 30;
/// Minutes between a scripted prompt and the assistant's answer.
const SCRIPT_ANSWER_DELAY_MINS: i64 = 2;
const WORKDAY_END_HOUR: u32 = 17;

/// Per-conversation embed bookkeeping: a target count and a usage tally per
/// embed type so the least-used types are preferred. Links that text
/// enhancement already put into a body count against the same target.
struct EmbedBudget {
    chance: f64,
    target: usize,
    placed: usize,
    used: [usize; 5],
}

impl EmbedBudget {
    fn for_conversation(conv: &Conversation, picker: &mut Picker) -> Self {
        let (chance, lo, hi) = match conv.kind {
            ConversationKind::StarredChannel | ConversationKind::Channel => (0.5, 4, 7),
            ConversationKind::GroupMessage => (0.4, 3, 5),
            ConversationKind::DirectMessage => (0.35, 2, 4),
        };
        Self {
            chance,
            target: picker.between(lo, hi) as usize,
            placed: 0,
            used: [0; 5],
        }
    }

    fn remaining(&self) -> usize {
        self.target.saturating_sub(self.placed)
    }

    /// Maybe choose an embed type for the next message.
    fn next(&mut self, picker: &mut Picker) -> Option<EmbedType> {
        if self.remaining() == 0 || !picker.chance(self.chance) {
            return None;
        }
        Some(self.take(picker))
    }

    /// Least-used embed type, recorded as placed.
    fn take(&mut self, picker: &mut Picker) -> EmbedType {
        let fewest = self.used.iter().copied().min().unwrap_or(0);
        let candidates: Vec<EmbedType> = EmbedType::ALL
            .iter()
            .copied()
            .filter(|kind| self.used[*kind as usize] == fewest)
            .collect();
        let kind = *picker.pick(&candidates);
        self.record(kind);
        kind
    }

    fn record(&mut self, kind: EmbedType) {
        self.used[kind as usize] += 1;
        self.placed += 1;
    }

    /// Count embeds that arrived with a body. False if they do not fit.
    fn absorb(&mut self, kinds: &[EmbedType]) -> bool {
        if kinds.len() > self.remaining() {
            return false;
        }
        for kind in kinds {
            self.record(*kind);
        }
        true
    }
}

fn anchor_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"<a href="([^"]*)">(.*?)</a>"#).expect("valid regex"))
}

/// Replace anchors pointing at embeddable URLs with their label.
fn unlink_embeds(catalog: &EmbedCatalog, body: &str) -> String {
    anchor_re()
        .replace_all(body, |caps: &Captures<'_>| {
            if catalog.extract(&caps[1]).is_empty() {
                caps[0].to_string()
            } else {
                caps[2].to_string()
            }
        })
        .into_owned()
}

fn append_embed(message: &mut Message, kind: EmbedType, picker: &mut Picker) {
    let url = random_embed_url(kind, picker);
    message.body.push(' ');
    message.body.push_str(&anchor(&url, &url));
}

pub struct HistorySynthesizer<'a> {
    library: &'a ContentLibrary,
    cap: usize,
}

impl<'a> HistorySynthesizer<'a> {
    pub fn new(library: &'a ContentLibrary, cap: usize) -> Self {
        Self { library, cap }
    }

    /// Chronologically ascending history ending at `now`, at most `cap` long.
    pub fn synthesize(&self, conv: &Conversation, now: NaiveDateTime, picker: &mut Picker) -> Vec<Message> {
        let mut history = if conv.assistant {
            self.scripted(conv, now, picker)
        } else {
            self.generated(conv, now, picker)
        };
        history.sort_by_key(|m| m.sent_at);
        if history.len() > self.cap {
            history.drain(..history.len() - self.cap);
        }
        tracing::debug!("{}: synthesized {} messages", conv.id, history.len());
        history
    }

    /// The assistant DM replays a fixed script anchored to `now`.
    fn scripted(&self, conv: &Conversation, now: NaiveDateTime, picker: &mut Picker) -> Vec<Message> {
        let mut out = Vec::new();
        let today = now.date();
        for (i, turn) in self.library.assistant_script(picker).into_iter().enumerate() {
            let day = today - Duration::days(turn.days_ago);
            let Some(asked) = day.and_hms_opt(turn.hour, turn.minute, 0) else {
                continue;
            };
            if asked > now {
                continue;
            }
            out.push(Message::new(
                format!("{}-user-{}", conv.id, i),
                self.library.me(),
                turn.prompt,
                asked,
            ));
            let answered = asked + Duration::minutes(SCRIPT_ANSWER_DELAY_MINS);
            if answered <= now {
                out.push(Message::new(
                    format!("{}-ai-{}", conv.id, i),
                    self.library.assistant(),
                    turn.answer,
                    answered,
                ));
            }
        }
        out
    }

    fn generated(&self, conv: &Conversation, now: NaiveDateTime, picker: &mut Picker) -> Vec<Message> {
        let today = now.date();
        let weeks = i64::from(picker.between(2, 4));
        let mut day = next_weekday(today - Duration::weeks(weeks));
        let embeds = self.library.embeds();
        let mut budget = EmbedBudget::for_conversation(conv, picker);
        let mut out = Vec::new();
        let mut seq = 0usize;

        while day <= today {
            if is_weekend(day) {
                day += Duration::days(1);
                continue;
            }
            let count = messages_per_day(conv, picker);
            let start_hour = picker.between(8, 9);
            for slot in 0..count {
                let hour = start_hour + (WORKDAY_END_HOUR - start_hour) * slot / count;
                let minute = picker.between(0, 59);
                let Some(at) = day.and_hms_opt(hour, minute, 0) else {
                    continue;
                };
                if at > now {
                    continue;
                }
                seq += 1;
                let draft = self.library.draft(conv, seq, picker);
                let mentions = conv.kind != ConversationKind::DirectMessage
                    && draft.sender != self.library.assistant()
                    && self.library.mentions_assistant(&draft.text);
                let mut message = self
                    .library
                    .finish(conv, draft, format!("{}-{}", conv.id, seq), at, picker);
                let linked: Vec<EmbedType> = embeds
                    .extract(&message.body)
                    .into_iter()
                    .map(|e| e.kind)
                    .collect();
                if linked.is_empty() {
                    if let Some(kind) = budget.next(picker) {
                        append_embed(&mut message, kind, picker);
                    }
                } else if !budget.absorb(&linked) {
                    message.body = unlink_embeds(embeds, &message.body);
                }
                out.push(message);

                if mentions {
                    seq += 1;
                    let reply = self.library.assistant_reply(conv, picker);
                    let reply_at = at + Duration::seconds(HISTORY_MENTION_DELAY_SECS);
                    out.push(Message::new(
                        format!("{}-{}", conv.id, seq),
                        reply.sender,
                        reply.text,
                        reply_at,
                    ));
                }
            }
            day += Duration::days(1);
        }

        out.sort_by_key(|m| m.sent_at);
        if out.len() > self.cap {
            out.drain(..out.len() - self.cap);
        }
        self.top_up_embeds(&mut out, budget, picker);
        out
    }

    /// Attach embeds to random plain messages until the conversation holds
    /// its target count. Embeds lost to the cap are made up here too.
    fn top_up_embeds(&self, history: &mut [Message], mut budget: EmbedBudget, picker: &mut Picker) {
        let embeds = self.library.embeds();
        let mut present = 0;
        let mut plain = Vec::new();
        for (i, msg) in history.iter().enumerate() {
            match embeds.extract(&msg.body).len() {
                0 if !msg.has_actions() => plain.push(i),
                n => present += n,
            }
        }
        let missing = budget.target.saturating_sub(present);
        if missing == 0 {
            return;
        }
        picker.shuffle(&mut plain);
        for i in plain.into_iter().take(missing) {
            let kind = budget.take(picker);
            append_embed(&mut history[i], kind, picker);
        }
        tracing::trace!("topped up {} embeds", missing);
    }
}

fn is_weekend(day: NaiveDate) -> bool {
    matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}

fn next_weekday(mut day: NaiveDate) -> NaiveDate {
    while is_weekend(day) {
        day += Duration::days(1);
    }
    day
}

fn messages_per_day(conv: &Conversation, picker: &mut Picker) -> u32 {
    match conv.kind {
        _ if conv.id == "general" => picker.between(1, 3),
        ConversationKind::StarredChannel | ConversationKind::Channel => picker.between(3, 8),
        ConversationKind::DirectMessage | ConversationKind::GroupMessage => picker.between(2, 5),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ReactionPolicy;
    use crate::models::ConversationKind;
    use crate::profile::{build_catalogue, Profile};
    use chrono::Timelike;
    use std::collections::{HashMap, HashSet};
    use std::sync::Arc;

    fn library() -> ContentLibrary {
        ContentLibrary::new(Arc::new(Profile::embedded().unwrap()), ReactionPolicy::default())
    }

    fn now() -> NaiveDateTime {
        // A Wednesday afternoon.
        NaiveDate::from_ymd_opt(2024, 3, 13)
            .unwrap()
            .and_hms_opt(15, 0, 0)
            .unwrap()
    }

    fn find(lib: &ContentLibrary, id: &str) -> Conversation {
        build_catalogue(lib.profile())
            .into_iter()
            .find(|c| c.id == id)
            .unwrap()
    }

    #[test]
    fn test_history_is_ordered_and_capped() {
        let lib = library();
        let synth = HistorySynthesizer::new(&lib, 200);
        for seed in 0..5 {
            let mut picker = Picker::seeded(seed);
            for conv in build_catalogue(lib.profile()) {
                let history = synth.synthesize(&conv, now(), &mut picker);
                assert!(history.len() <= 200);
                assert!(history.windows(2).all(|w| w[0].sent_at <= w[1].sent_at));
                assert!(history.iter().all(|m| m.sent_at <= now()));
                let ids: HashSet<_> = history.iter().map(|m| &m.id).collect();
                assert_eq!(ids.len(), history.len());
            }
        }
    }

    #[test]
    fn test_history_never_from_self_in_shared_conversations() {
        let lib = library();
        let synth = HistorySynthesizer::new(&lib, 200);
        let mut picker = Picker::seeded(11);
        for conv in build_catalogue(lib.profile()) {
            if conv.kind == ConversationKind::DirectMessage {
                continue;
            }
            for msg in synth.synthesize(&conv, now(), &mut picker) {
                assert_ne!(msg.sender, lib.me(), "{}", conv.id);
            }
        }
    }

    #[test]
    fn test_history_skips_weekends() {
        let lib = library();
        let synth = HistorySynthesizer::new(&lib, 200);
        let mut picker = Picker::seeded(12);
        let history = synth.synthesize(&find(&lib, "engineering"), now(), &mut picker);
        assert!(!history.is_empty());
        assert!(history.iter().all(|m| !is_weekend(m.sent_at.date())));
    }

    /// Drafted messages per weekday, leaving out assistant replies (which
    /// land 30 s after a slot) and today, whose later slots are still ahead.
    fn drafted_per_day(history: &[Message]) -> HashMap<NaiveDate, u32> {
        let mut per_day = HashMap::new();
        for msg in history {
            let date = msg.sent_at.date();
            if msg.sent_at.second() == 0 && date < now().date() {
                *per_day.entry(date).or_insert(0) += 1;
            }
        }
        per_day
    }

    #[test]
    fn test_general_volume_per_weekday() {
        let lib = library();
        let synth = HistorySynthesizer::new(&lib, 1000);
        let general = find(&lib, "general");
        for seed in 0..10 {
            let mut picker = Picker::seeded(seed);
            let history = synth.synthesize(&general, now(), &mut picker);
            let per_day = drafted_per_day(&history);
            // 2 to 4 weeks of weekdays before today.
            assert!((8..=20).contains(&per_day.len()), "{}", per_day.len());
            assert!(per_day.values().all(|n| (1..=3).contains(n)), "{per_day:?}");
            let earliest = per_day.keys().min().unwrap();
            assert!(*earliest >= now().date() - Duration::weeks(4));
        }
    }

    #[test]
    fn test_volume_per_weekday_by_kind() {
        let lib = library();
        let synth = HistorySynthesizer::new(&lib, 1000);
        for seed in 0..5 {
            let mut picker = Picker::seeded(seed);
            for conv in build_catalogue(lib.profile()) {
                if conv.assistant || conv.id == "general" {
                    continue;
                }
                let range = match conv.kind {
                    ConversationKind::StarredChannel | ConversationKind::Channel => 3..=8,
                    ConversationKind::DirectMessage | ConversationKind::GroupMessage => 2..=5,
                };
                let per_day = drafted_per_day(&synth.synthesize(&conv, now(), &mut picker));
                assert!(!per_day.is_empty(), "{}", conv.id);
                for (day, n) in per_day {
                    assert!(range.contains(&n), "{} on {day}: {n}", conv.id);
                }
            }
        }
    }

    #[test]
    fn test_embeds_per_conversation_within_budget() {
        let lib = library();
        let synth = HistorySynthesizer::new(&lib, 200);
        for seed in 0..30 {
            let mut picker = Picker::seeded(seed);
            for conv in build_catalogue(lib.profile()) {
                if conv.assistant {
                    continue;
                }
                let history = synth.synthesize(&conv, now(), &mut picker);
                let count: usize = history
                    .iter()
                    .map(|m| lib.embeds().extract(&m.body).len())
                    .sum();
                assert!((2..=7).contains(&count), "{} seed {seed}: {count}", conv.id);
            }
        }
    }

    #[test]
    fn test_no_assistant_replies_in_direct_messages() {
        let lib = library();
        let synth = HistorySynthesizer::new(&lib, 200);
        let mut picker = Picker::seeded(21);
        for conv in build_catalogue(lib.profile()) {
            if conv.assistant || conv.kind != ConversationKind::DirectMessage {
                continue;
            }
            let history = synth.synthesize(&conv, now(), &mut picker);
            assert!(history.iter().all(|m| m.sent_at.second() == 0), "{}", conv.id);
        }
    }

    #[test]
    fn test_unlink_embeds_keeps_other_links() {
        let lib = library();
        let body = format!(
            "See the {} and {}",
            anchor("https://jira.company.com/browse/ENG-1234", "JIRA ticket"),
            anchor("https://github.com/company/repo/pull/77", "PR #77"),
        );
        let out = unlink_embeds(lib.embeds(), &body);
        assert!(out.starts_with("See the JIRA ticket and <a href="));
        assert!(lib.embeds().extract(&out).is_empty());
    }

    #[test]
    fn test_small_cap_keeps_newest() {
        let lib = library();
        let full = HistorySynthesizer::new(&lib, 200)
            .synthesize(&find(&lib, "backend"), now(), &mut Picker::seeded(3));
        let capped = HistorySynthesizer::new(&lib, 10)
            .synthesize(&find(&lib, "backend"), now(), &mut Picker::seeded(3));
        assert_eq!(capped.len(), 10);
        assert_eq!(capped.last().unwrap().id, full.last().unwrap().id);
    }

    #[test]
    fn test_assistant_script_anchored_to_now() {
        let lib = library();
        let synth = HistorySynthesizer::new(&lib, 200);
        let conv = find(&lib, "juspay-ai");
        let history = synth.synthesize(&conv, now(), &mut Picker::seeded(4));
        assert_eq!(history.len(), 8);
        assert_eq!(history[0].id, "juspay-ai-user-0");
        assert_eq!(history[0].sender, "Klaus Müller");
        assert_eq!(
            history[0].sent_at,
            NaiveDate::from_ymd_opt(2024, 3, 10).unwrap().and_hms_opt(10, 30, 0).unwrap()
        );
        assert_eq!(history[1].id, "juspay-ai-ai-0");
        assert_eq!(history[1].sender, "Juspay AI");
        assert_eq!(history[1].sent_at - history[0].sent_at, Duration::minutes(2));
    }

    #[test]
    fn test_assistant_script_skips_future_slots() {
        let lib = library();
        let synth = HistorySynthesizer::new(&lib, 200);
        let conv = find(&lib, "juspay-ai");
        let early = NaiveDate::from_ymd_opt(2024, 3, 13).unwrap().and_hms_opt(8, 0, 0).unwrap();
        let history = synth.synthesize(&conv, early, &mut Picker::seeded(4));
        assert_eq!(history.len(), 6);
    }

    #[test]
    fn test_embed_budget_round_robin() {
        let mut picker = Picker::seeded(5);
        let mut budget = EmbedBudget {
            chance: 1.0,
            target: 10,
            placed: 0,
            used: [0; 5],
        };
        let kinds: Vec<EmbedType> = (0..15).filter_map(|_| budget.next(&mut picker)).collect();
        assert_eq!(kinds.len(), 10);
        let first: HashSet<_> = kinds[..5].iter().map(|k| k.as_str()).collect();
        assert_eq!(first.len(), 5);
        for kind in EmbedType::ALL {
            assert_eq!(kinds.iter().filter(|k| **k == kind).count(), 2);
        }
    }

    #[test]
    fn test_embed_budget_targets_by_kind() {
        let lib = library();
        let mut picker = Picker::seeded(6);
        for _ in 0..20 {
            let channel = EmbedBudget::for_conversation(&find(&lib, "engineering"), &mut picker);
            assert!((4..=7).contains(&channel.target));
            let group = EmbedBudget::for_conversation(&find(&lib, "group-1"), &mut picker);
            assert!((3..=5).contains(&group.target));
            let dm = EmbedBudget::for_conversation(&find(&lib, "sophie-dubois"), &mut picker);
            assert!((2..=4).contains(&dm.target));
        }
    }
}
