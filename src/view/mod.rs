//! Pure helpers between the store and the rendered message list: header
//! grouping, embed extraction, markup flattening and scroll anchoring.

use std::sync::OnceLock;

use chrono::{Duration, Timelike};
use regex::Regex;

use crate::content::EmbedCatalog;
use crate::models::{EmbedDescriptor, Message};

/// Minimum gap between two messages of one sender that starts a new group.
const HEADER_GAP_HOURS: i64 = 2;
pub const DEFAULT_ANCHOR_THRESHOLD: u32 = 50;
/// Frames to wait for a height change before dropping a captured anchor.
const MAX_RESTORE_RETRIES: u8 = 3;

/// Whether `msg` starts a new avatar/timestamp group after `prev`.
pub fn should_show_header(msg: &Message, prev: Option<&Message>) -> bool {
    let Some(prev) = prev else {
        return true;
    };
    if msg.has_actions() || msg.sender != prev.sender {
        return true;
    }
    let gap = (msg.sent_at - prev.sent_at).abs();
    let pm = |m: &Message| m.sent_at.hour() >= 12;
    gap >= Duration::hours(HEADER_GAP_HOURS) || pm(msg) != pm(prev)
}

/// Embeds for a message body, recomputed on every render.
pub fn extract_embeds(catalog: &EmbedCatalog, body: &str) -> Vec<EmbedDescriptor> {
    catalog.extract(body)
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid regex"))
}

fn break_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<br\s*/?>|</p>|</li>|<ul[^>]*>|</ul>").expect("valid regex"))
}

fn bullet_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<li[^>]*>").expect("valid regex"))
}

/// Flatten message markup to terminal text.
pub fn plain_text(html: &str) -> String {
    let text = break_re().replace_all(html, "\n");
    let text = bullet_re().replace_all(&text, "• ");
    let text = tag_re().replace_all(&text, "");
    let text = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    let mut lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

/// Scroll metrics of a message list, in rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub scroll_height: u32,
    pub scroll_top: u32,
    pub client_height: u32,
}

impl Viewport {
    pub fn max_top(&self) -> u32 {
        self.scroll_height.saturating_sub(self.client_height)
    }

    pub fn distance_from_bottom(&self) -> u32 {
        self.max_top().saturating_sub(self.scroll_top)
    }
}

/// Outcome of `ScrollAnchor::restore`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Restore {
    /// Set the scroll top to this value.
    Adjusted(u32),
    /// Content height has not changed yet; try again next frame.
    Retry,
    /// Nothing captured.
    Idle,
}

/// Keeps the visual position stable when content grows under a viewport
/// sitting near the bottom.
#[derive(Debug, Clone)]
pub struct ScrollAnchor {
    threshold: u32,
    captured: Option<Viewport>,
    retries: u8,
}

impl Default for ScrollAnchor {
    fn default() -> Self {
        Self::new(DEFAULT_ANCHOR_THRESHOLD)
    }
}

impl ScrollAnchor {
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold,
            captured: None,
            retries: 0,
        }
    }

    /// Record metrics before a mutation. Only captures within the threshold
    /// of the bottom; returns whether it did.
    pub fn capture(&mut self, viewport: Viewport) -> bool {
        if viewport.distance_from_bottom() > self.threshold {
            return false;
        }
        self.captured = Some(viewport);
        self.retries = 0;
        true
    }

    pub fn is_armed(&self) -> bool {
        self.captured.is_some()
    }

    pub fn cancel(&mut self) {
        self.captured = None;
        self.retries = 0;
    }

    /// Shift the captured scroll top by the height delta.
    pub fn restore(&mut self, current: Viewport) -> Restore {
        let Some(before) = self.captured else {
            return Restore::Idle;
        };
        let delta = i64::from(current.scroll_height) - i64::from(before.scroll_height);
        if delta == 0 {
            self.retries += 1;
            if self.retries > MAX_RESTORE_RETRIES {
                self.cancel();
                return Restore::Idle;
            }
            return Restore::Retry;
        }
        self.cancel();
        let top = (i64::from(before.scroll_top) + delta).clamp(0, i64::from(current.max_top()));
        Restore::Adjusted(u32::try_from(top).unwrap_or(0))
    }
}

/// How the message list should move after a store update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollIntent {
    /// Conversation switched: go to the bottom instantly.
    Jump,
    /// New messages in the open conversation: glide to the bottom.
    Smooth,
    /// Leave the viewport where it is.
    Hold,
}

/// Decide the scroll reaction to an update.
pub fn scroll_intent(conversation_changed: bool, grew: bool, near_bottom: bool) -> ScrollIntent {
    if conversation_changed {
        ScrollIntent::Jump
    } else if grew && near_bottom {
        ScrollIntent::Smooth
    } else {
        ScrollIntent::Hold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActionKind, MessageAction};
    use chrono::NaiveDate;

    fn msg(sender: &str, h: u32, m: u32) -> Message {
        let at = NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap();
        Message::new(format!("{sender}-{h}-{m}"), sender, "hi", at)
    }

    #[test]
    fn test_header_for_first_and_new_sender() {
        let a = msg("Anna", 9, 0);
        let b = msg("Marco", 9, 1);
        assert!(should_show_header(&a, None));
        assert!(should_show_header(&b, Some(&a)));
    }

    #[test]
    fn test_header_grouping_same_sender() {
        let a = msg("Anna", 9, 0);
        assert!(!should_show_header(&msg("Anna", 10, 59), Some(&a)));
        assert!(should_show_header(&msg("Anna", 11, 0), Some(&a)));
    }

    #[test]
    fn test_header_on_meridiem_change() {
        let a = msg("Anna", 11, 50);
        assert!(should_show_header(&msg("Anna", 12, 5), Some(&a)));
    }

    #[test]
    fn test_header_for_actionable() {
        let a = msg("Juspay AI", 9, 0);
        let mut b = msg("Juspay AI", 9, 1);
        b.actions.push(MessageAction {
            id: "approve-leave".into(),
            label: "Approve Leave".into(),
            kind: ActionKind::Primary,
            emoji: None,
            confirmation: String::new(),
        });
        assert!(should_show_header(&b, Some(&a)));
    }

    #[test]
    fn test_plain_text_flattens_markup() {
        let html = "<strong>Q3 results</strong><br>Revenue &amp; margin:<ul><li>up 12%</li><li>on plan</li></ul>";
        assert_eq!(plain_text(html), "Q3 results\nRevenue & margin:\n• up 12%\n• on plan");
        assert_eq!(
            plain_text("see <a href=\"https://x.io\">the doc</a> <em>now</em>"),
            "see the doc now"
        );
    }

    #[test]
    fn test_anchor_ignores_far_from_bottom() {
        let mut anchor = ScrollAnchor::default();
        let vp = Viewport {
            scroll_height: 1000,
            scroll_top: 100,
            client_height: 400,
        };
        assert!(!anchor.capture(vp));
        assert_eq!(anchor.restore(vp), Restore::Idle);
    }

    #[test]
    fn test_anchor_adjusts_by_delta() {
        let mut anchor = ScrollAnchor::default();
        let before = Viewport {
            scroll_height: 1000,
            scroll_top: 570,
            client_height: 400,
        };
        assert!(anchor.capture(before));
        let grown = Viewport {
            scroll_height: 1120,
            ..before
        };
        assert_eq!(anchor.restore(grown), Restore::Adjusted(690));
        assert!(!anchor.is_armed());
    }

    #[test]
    fn test_anchor_retries_until_height_changes() {
        let mut anchor = ScrollAnchor::default();
        let before = Viewport {
            scroll_height: 500,
            scroll_top: 100,
            client_height: 400,
        };
        anchor.capture(before);
        assert_eq!(anchor.restore(before), Restore::Retry);
        let grown = Viewport {
            scroll_height: 530,
            ..before
        };
        assert_eq!(anchor.restore(grown), Restore::Adjusted(130));
    }

    #[test]
    fn test_anchor_gives_up_after_retries() {
        let mut anchor = ScrollAnchor::default();
        let vp = Viewport {
            scroll_height: 500,
            scroll_top: 100,
            client_height: 400,
        };
        anchor.capture(vp);
        for _ in 0..3 {
            assert_eq!(anchor.restore(vp), Restore::Retry);
        }
        assert_eq!(anchor.restore(vp), Restore::Idle);
        assert!(!anchor.is_armed());
    }

    #[test]
    fn test_scroll_intent() {
        assert_eq!(scroll_intent(true, false, false), ScrollIntent::Jump);
        assert_eq!(scroll_intent(false, true, true), ScrollIntent::Smooth);
        assert_eq!(scroll_intent(false, true, false), ScrollIntent::Hold);
    }
}
