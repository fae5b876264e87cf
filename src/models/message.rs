//! Message-related models

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub sender: String,
    /// Rich text with limited inline markup (`<em>`, `<strong>`, `<br>`, `<a>`).
    pub body: String,
    pub sent_at: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Reactions::is_empty")]
    pub reactions: Reactions,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<MessageAction>,
}

impl Message {
    pub fn new(
        id: impl Into<String>,
        sender: impl Into<String>,
        body: impl Into<String>,
        sent_at: NaiveDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            sender: sender.into(),
            body: body.into(),
            sent_at,
            reactions: Reactions::default(),
            actions: Vec::new(),
        }
    }

    /// Locale-style time string, e.g. `9:05 AM`.
    pub fn when(&self) -> String {
        self.sent_at.format("%-I:%M %p").to_string()
    }

    pub fn has_actions(&self) -> bool {
        !self.actions.is_empty()
    }
}

/// Visual weight of an action button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Primary,
    Secondary,
}

/// A button attached to an actionable assistant message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageAction {
    pub id: String,
    pub label: String,
    pub kind: ActionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    /// Text shown once the action has been completed.
    pub confirmation: String,
}

/// Aggregate emoji reaction counts in first-reacted order.
///
/// Every stored count is strictly positive: an emoji whose count drops to
/// zero is removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reactions(Vec<(String, u32)>);

impl Reactions {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, emoji: &str) -> u32 {
        self.0
            .iter()
            .find(|(e, _)| e == emoji)
            .map_or(0, |(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(e, c)| (e.as_str(), *c))
    }

    /// Set an emoji's count outright. Zero removes it.
    pub fn insert(&mut self, emoji: &str, count: u32) {
        match self.0.iter().position(|(e, _)| e == emoji) {
            Some(i) if count == 0 => {
                self.0.remove(i);
            }
            Some(i) => self.0[i].1 = count,
            None if count == 0 => {}
            None => self.0.push((emoji.to_string(), count)),
        }
    }

    /// Apply a signed delta and return the resulting count.
    pub fn adjust(&mut self, emoji: &str, delta: i32) -> u32 {
        let current = i64::from(self.get(emoji));
        let next = (current + i64::from(delta)).max(0);
        let next = u32::try_from(next).unwrap_or(u32::MAX);
        self.insert(emoji, next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_message_when_format() {
        assert_eq!(Message::new("a", "b", "c", at(9, 5)).when(), "9:05 AM");
        assert_eq!(Message::new("a", "b", "c", at(14, 30)).when(), "2:30 PM");
        assert_eq!(Message::new("a", "b", "c", at(0, 0)).when(), "12:00 AM");
    }

    #[test]
    fn test_reactions_adjust_removes_at_zero() {
        let mut r = Reactions::default();
        assert_eq!(r.adjust("👍", 1), 1);
        assert_eq!(r.adjust("👍", 1), 2);
        assert_eq!(r.adjust("👍", -1), 1);
        assert_eq!(r.adjust("👍", -1), 0);
        assert!(r.is_empty());
        assert_eq!(r.get("👍"), 0);
    }

    #[test]
    fn test_reactions_never_store_zero() {
        let mut r = Reactions::default();
        r.insert("🎉", 0);
        assert!(r.is_empty());
        r.adjust("🔥", -3);
        assert!(r.is_empty());
    }

    #[test]
    fn test_reactions_keep_insertion_order() {
        let mut r = Reactions::default();
        r.insert("🎉", 2);
        r.insert("👍", 1);
        r.adjust("🎉", 1);
        let order: Vec<_> = r.iter().collect();
        assert_eq!(order, vec![("🎉", 3), ("👍", 1)]);
    }

    #[test]
    fn test_message_serialization_skips_empty() {
        let msg = Message::new("general-1", "Anna", "hi", at(10, 0));
        let json = serde_json::to_string(&msg).unwrap();
        assert!(!json.contains("reactions"));
        assert!(!json.contains("actions"));
        assert!(json.contains("sentAt"));
    }
}
