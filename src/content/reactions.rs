//! Reaction-worthiness classification and reaction sampling.
//!
//! Classification is a pure function of message text and context. Sampling
//! takes the classification and flips the coins.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::industry::Industry;
use super::picker::Picker;
use crate::models::Reactions;

/// Noteworthy lexical signal, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    MajorAnnouncement,
    Celebratory,
    Launch,
    Metrics,
    Thanks,
    CelebratoryEmoji,
    IndustryMilestone,
    RichFormatting,
    Success,
}

/// Where a message was posted; scales the base chance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReactionScope {
    General,
    Channel,
    Group,
    DirectMessage,
}

/// Reaction-emoji palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    Announcement,
    Launch,
    Congrats,
    Thanks,
    Milestone,
    Default,
}

impl Palette {
    pub fn emojis(self) -> &'static [&'static str] {
        match self {
            Self::Announcement => &["👍", "❤️", "🎉", "🔥", "👏", "🚀", "💯", "🙌"],
            Self::Launch => &["🚀", "🎉", "🔥", "👏", "💯"],
            Self::Congrats => &["🎉", "👏", "🙌", "❤️", "🔥"],
            Self::Thanks => &["👍", "❤️", "🙏"],
            Self::Milestone => &["🏆", "🎉", "🔥", "💯", "👏"],
            Self::Default => &["👍", "🔥", "👏", "💯"],
        }
    }
}

/// Result of classifying a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eligibility {
    /// Matched signals in priority order. Empty means not reaction-worthy.
    pub signals: Vec<Signal>,
    pub palette: Palette,
    /// Major messages draw more distinct emoji and higher counts.
    pub major: bool,
}

impl Eligibility {
    pub fn is_candidate(&self) -> bool {
        !self.signals.is_empty()
    }
}

const MAJOR: &[&str] = &[
    "announce",
    "milestone",
    "achievement",
    "breakthrough",
    "major",
    "strategic initiative",
    "company-wide",
    "exciting news",
    "thrilled to",
    "proud to",
];
const CELEBRATORY: &[&str] = &[
    "congratulations",
    "congrats",
    "celebrate",
    "amazing work",
    "incredible",
    "fantastic",
    "outstanding",
    "well done",
    "great job",
    "excellent work",
    "awesome",
    "nice work",
    "good job",
];
const LAUNCH: &[&str] = &[
    "launch",
    "released",
    "shipping",
    "available now",
    "go live",
    "live now",
    "deployed",
    "complete",
    "finished",
];
const METRIC_WORDS: &[&str] = &["million", "exceeded", "record", "all-time high"];
const METRIC_CONTEXT: &[&str] = &[
    "sales",
    "revenue",
    "users",
    "customers",
    "units",
    "delivered",
];
const THANKS: &[&str] = &["thank you", "thanks everyone", "appreciate", "thanks"];
const CELEBRATORY_EMOJI: &[&str] = &["🚀", "🎉", "🏆", "💡", "📢", "🔥"];
const SUCCESS: &[&str] = &[
    "success",
    "completed",
    "resolved",
    "fixed",
    "improved",
    "ready",
];

fn industry_keywords(industry: Industry) -> &'static [&'static str] {
    match industry {
        Industry::Automotive => &[
            "production", "delivered", "safety", "test", "vehicle", "launch",
        ],
        Industry::Finance => &["compliance", "regulatory", "approved", "passed"],
        Industry::Healthcare => &["clinical", "fda", "patient", "trial"],
        _ => &[],
    }
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid regex"))
}

fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+%|\d{4,}").expect("valid regex"))
}

/// Lowercased text with tags replaced by spaces and whitespace collapsed.
pub fn plain_lower(html: &str) -> String {
    let stripped = tag_re().replace_all(html, " ");
    stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Deterministic reaction-worthiness classification.
pub fn classify(body: &str, scope: ReactionScope, industry: Industry) -> Eligibility {
    let text = plain_lower(body);
    let has = |keys: &[&str]| keys.iter().any(|k| text.contains(k));

    let mut signals = Vec::new();
    if has(MAJOR) {
        signals.push(Signal::MajorAnnouncement);
    }
    if has(CELEBRATORY) {
        signals.push(Signal::Celebratory);
    }
    if has(LAUNCH) {
        signals.push(Signal::Launch);
    }
    if (has(METRIC_WORDS) || number_re().is_match(&text)) && has(METRIC_CONTEXT) {
        signals.push(Signal::Metrics);
    }
    if scope != ReactionScope::DirectMessage && has(THANKS) {
        signals.push(Signal::Thanks);
    }
    if CELEBRATORY_EMOJI.iter().any(|e| body.contains(e)) {
        signals.push(Signal::CelebratoryEmoji);
    }
    if has(industry_keywords(industry)) {
        signals.push(Signal::IndustryMilestone);
    }
    if body.contains("<strong>") || body.contains("<br><br>") {
        signals.push(Signal::RichFormatting);
    }
    if has(SUCCESS) {
        signals.push(Signal::Success);
    }

    let major = scope == ReactionScope::General
        || has(&["announce", "milestone", "company-wide"]);

    let palette = match signals.first() {
        _ if scope == ReactionScope::General => Palette::Announcement,
        Some(Signal::MajorAnnouncement) => {
            if has(&["announce", "welcome"]) {
                Palette::Announcement
            } else if has(&["milestone", "achievement"]) {
                Palette::Milestone
            } else {
                Palette::Default
            }
        }
        Some(Signal::Celebratory) => Palette::Congrats,
        Some(Signal::Launch) => Palette::Launch,
        Some(Signal::Thanks) => Palette::Thanks,
        _ => Palette::Default,
    };

    Eligibility {
        signals,
        palette,
        major,
    }
}

/// Tunable probabilities for attaching reactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactionPolicy {
    pub base_general: f64,
    pub base_channel: f64,
    pub base_group: f64,
    pub base_direct: f64,
    pub major_announcement: f64,
    pub celebratory: f64,
    pub launch: f64,
    pub metrics: f64,
    pub thanks: f64,
    pub celebratory_emoji: f64,
    pub industry_milestone: f64,
    pub rich_formatting: f64,
    pub success: f64,
}

impl Default for ReactionPolicy {
    fn default() -> Self {
        Self {
            base_general: 0.40,
            base_channel: 0.30,
            base_group: 0.20,
            base_direct: 0.15,
            major_announcement: 0.90,
            celebratory: 0.75,
            launch: 0.70,
            metrics: 0.75,
            thanks: 0.50,
            celebratory_emoji: 0.65,
            industry_milestone: 0.60,
            rich_formatting: 0.85,
            success: 0.50,
        }
    }
}

impl ReactionPolicy {
    pub fn base(&self, scope: ReactionScope) -> f64 {
        match scope {
            ReactionScope::General => self.base_general,
            ReactionScope::Channel => self.base_channel,
            ReactionScope::Group => self.base_group,
            ReactionScope::DirectMessage => self.base_direct,
        }
    }

    pub fn signal(&self, signal: Signal) -> f64 {
        match signal {
            Signal::MajorAnnouncement => self.major_announcement,
            Signal::Celebratory => self.celebratory,
            Signal::Launch => self.launch,
            Signal::Metrics => self.metrics,
            Signal::Thanks => self.thanks,
            Signal::CelebratoryEmoji => self.celebratory_emoji,
            Signal::IndustryMilestone => self.industry_milestone,
            Signal::RichFormatting => self.rich_formatting,
            Signal::Success => self.success,
        }
    }

    /// Coin flips only: the base chance for the scope, then any matched
    /// signal passing its own band.
    pub fn passes(&self, eligibility: &Eligibility, scope: ReactionScope, picker: &mut Picker) -> bool {
        if !eligibility.is_candidate() || !picker.chance(self.base(scope)) {
            return false;
        }
        let mut passed = false;
        for signal in &eligibility.signals {
            // Every band is flipped so the number of draws does not depend on order.
            passed |= picker.chance(self.signal(*signal));
        }
        passed
    }

    /// Classify and sample in one step. Returns empty reactions when the
    /// message is not a candidate or the coins say no.
    pub fn sample(
        &self,
        body: &str,
        scope: ReactionScope,
        industry: Industry,
        picker: &mut Picker,
    ) -> Reactions {
        let eligibility = classify(body, scope, industry);
        if !self.passes(&eligibility, scope, picker) {
            return Reactions::default();
        }
        draw_reactions(&eligibility, scope, picker)
    }
}

/// Pick distinct emoji from the palette and a count for each.
pub fn draw_reactions(eligibility: &Eligibility, scope: ReactionScope, picker: &mut Picker) -> Reactions {
    let palette = eligibility.palette.emojis();
    let wanted = if eligibility.major {
        picker.between(2, 4)
    } else {
        picker.between(1, 2)
    } as usize;

    let mut reactions = Reactions::default();
    for emoji in picker.sample(palette, wanted) {
        let count = if scope == ReactionScope::DirectMessage {
            if picker.chance(0.85) {
                1
            } else {
                2
            }
        } else if eligibility.major {
            picker.between(2, 5)
        } else {
            picker.between(1, 3)
        };
        reactions.insert(emoji, count);
    }
    reactions
}
