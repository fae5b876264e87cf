//! Post-processing that makes generated text look hand-written.

use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};

use super::picker::Picker;
use crate::profile::Person;

const ITALIC_CHANCE: f64 = 0.20;
const LINK_CHANCE: f64 = 0.15;
const VERBOSE_CHANCE: f64 = 0.15;
const VERBOSE_PERSON_CHANCE: f64 = 0.70;

/// Informal phrases that may be emphasised.
const EMPHASIS_PHRASES: &[&str] = &[
    "really important",
    "super critical",
    "just a heads up",
    "FYI",
    "quick note",
    "important",
    "critical",
    "urgent",
    "just so you know",
    "by the way",
    "fyi",
    "heads up",
    "quick update",
    "side note",
    "btw",
];

const VERBOSE_ADDITIONS: &[&str] = &[
    " Let me provide some additional context here.",
    " I wanted to make sure we're all on the same page.",
    " This is important for our overall strategy.",
    " I think it's worth discussing in more detail.",
    " There are a few nuances we should consider.",
    " Let me break this down for clarity.",
    " I've been thinking about this quite a bit.",
    " This aligns with our broader objectives.",
    " We should definitely keep this in mind going forward.",
    " I'd love to hear your thoughts on this as well.",
];

const EXPRESSIVE_EMOJI: &[&str] = &[
    "😊", "👍", "🎉", "🚀", "✨", "💯", "🔥", "⭐", "💪", "🙌", "👏", "🎯", "💡", "🌟", "😎",
    "🤩", "💫", "🎊", "🏆", "✅",
];

const CHANNEL_REFS: &[&str] = &["C12345", "C67890", "C11111"];

/// Contextual link: URL template, anchor text and whether the anchor is bold.
struct LinkTemplate {
    url: &'static str,
    text: &'static str,
    bold: bool,
}

const LINKS: &[LinkTemplate] = &[
    LinkTemplate { url: "https://wiki.company.com/postmortems/{id}", text: "post-mortem doc", bold: false },
    LinkTemplate { url: "https://github.com/company/repo/pull/{id}", text: "PR #{id}", bold: false },
    LinkTemplate { url: "https://docs.company.com/api/v2", text: "API docs", bold: false },
    LinkTemplate { url: "https://dashboard.company.com/incidents/{id}", text: "incident dashboard", bold: false },
    LinkTemplate { url: "https://monitoring.company.com/metrics/payment-api", text: "monitoring dashboard", bold: false },
    LinkTemplate { url: "https://jira.company.com/browse/ENG-{id}", text: "JIRA ticket", bold: false },
    LinkTemplate { url: "https://confluence.company.com/engineering/playbooks", text: "playbook", bold: false },
    LinkTemplate { url: "https://grafana.company.com/d/{id}", text: "Grafana dashboard", bold: false },
    LinkTemplate { url: "https://datadog.company.com/apm/trace/{id}", text: "Datadog trace", bold: false },
    LinkTemplate { url: "https://slack.company.com/archives/{channel}", text: "Slack thread", bold: false },
    LinkTemplate { url: "https://wiki.company.com/runbooks/db-scaling", text: "runbook", bold: true },
    LinkTemplate { url: "https://docs.company.com/deployment-guide", text: "deployment guide", bold: true },
];

fn ci(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .expect("valid regex")
}

fn postmortem_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| ci(r"post-mortem doc|postmortem"))
}

fn pull_request_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| ci(r"PR #?\d+|pull request"))
}

fn dashboard_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| ci(r"dashboard"))
}

/// Anchor markup used for every generated link.
pub fn anchor(url: &str, text: &str) -> String {
    format!("<a href=\"{}\">{}</a>", url, text)
}

/// True if the text already carries block markup that must not be rewritten.
fn is_rich(text: &str) -> bool {
    ["<strong>", "<br>", "<ul>", "<li>"]
        .iter()
        .any(|tag| text.contains(tag))
}

/// Apply emphasis, links and verbosity to a message body, then the sender's
/// personality traits.
pub fn enhance(text: &str, sender: Option<&Person>, picker: &mut Picker) -> String {
    if is_rich(text) {
        return text.to_string();
    }
    let mut out = text.to_string();

    if picker.chance(ITALIC_CHANCE) {
        out = emphasize(&out, picker);
    }
    if picker.chance(LINK_CHANCE) {
        out = add_link(&out, picker);
    }
    if picker.chance(VERBOSE_CHANCE) {
        out = lengthen(&out, picker);
    }
    if let Some(person) = sender {
        if person.emoji_heavy {
            out = add_emojis(&out, picker);
        }
        if person.verbose && picker.chance(VERBOSE_PERSON_CHANCE) {
            out = lengthen(&out, picker);
        }
    }
    out
}

/// Wrap one randomly chosen informal phrase in `<em>` if the text contains it.
pub fn emphasize(text: &str, picker: &mut Picker) -> String {
    let phrase = picker.pick(EMPHASIS_PHRASES);
    let re = ci(&format!("({})", regex::escape(phrase)));
    re.replace_all(text, "<em>$1</em>").into_owned()
}

/// Insert a contextual hyperlink where the text already talks about one,
/// otherwise append it.
pub fn add_link(text: &str, picker: &mut Picker) -> String {
    let template = picker.pick(LINKS);
    let id = picker.between(1000, 5999).to_string();
    let channel = *picker.pick(CHANNEL_REFS);
    let url = template.url.replace("{id}", &id).replace("{channel}", channel);
    let label = template.text.replace("{id}", &id);
    let label = if template.bold {
        format!("<strong>{}</strong>", label)
    } else {
        label
    };
    let link = anchor(&url, &label);

    for re in [postmortem_re(), pull_request_re(), dashboard_re()] {
        if re.is_match(text) {
            return re.replace_all(text, link.as_str()).into_owned();
        }
    }
    format!("{} - {}", text, link)
}

/// Append 1 to 3 distinct filler sentences.
pub fn lengthen(text: &str, picker: &mut Picker) -> String {
    let n = picker.between(1, 3) as usize;
    let mut out = text.to_string();
    for addition in picker.sample(VERBOSE_ADDITIONS, n) {
        out.push_str(addition);
    }
    out
}

/// Sprinkle 2 to 5 emoji: all at the end, or the first mid-sentence and the
/// rest at the end.
pub fn add_emojis(text: &str, picker: &mut Picker) -> String {
    let n = picker.between(2, 5) as usize;
    let chosen: Vec<&str> = picker.sample(EXPRESSIVE_EMOJI, n).into_iter().copied().collect();
    if picker.chance(0.5) {
        return format!("{} {}", text, chosen.join(" "));
    }

    let words: Vec<&str> = text.split(' ').collect();
    let mid = words.len() / 2;
    let mut out = Vec::with_capacity(words.len() + chosen.len());
    out.extend_from_slice(&words[..mid]);
    out.push(chosen[0]);
    out.extend_from_slice(&words[mid..]);
    out.extend_from_slice(&chosen[1..]);
    out.join(" ")
}
