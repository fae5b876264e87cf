//! Fixed conversation set derived from the profile.

use crate::content::seeded_index;
use crate::models::{Conversation, ConversationKind};

use super::Profile;

/// Channels every workspace has: (id, member count, private).
const BASE_CHANNELS: &[(&str, u32, bool)] = &[
    ("general", 750, false),
    ("random", 214, false),
    ("engineering", 86, false),
    ("backend", 41, false),
    ("frontend", 37, false),
    ("devops", 24, false),
    ("incidents", 58, false),
    ("on-call", 19, false),
    ("product-planning", 18, true),
    ("design-studio", 20, false),
    ("marketing-campaigns", 32, false),
    ("customer-support", 35, false),
    ("sales-updates", 55, false),
];

const MAX_DIRECT_MESSAGES: usize = 8;
const MAX_GROUPS: usize = 4;

/// Lowercase, hyphen-separated identifier.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

fn channel(id: &str, kind: ConversationKind, members: u32, private: bool) -> Conversation {
    Conversation {
        id: id.to_string(),
        name: id.to_string(),
        kind,
        members: Vec::new(),
        member_count: members,
        private,
        assistant: false,
    }
}

/// Build the fixed conversation set: starred, channels, assistant DM, DMs, groups.
///
/// Ids are unique; a later entry whose id collides with an earlier one is dropped.
pub fn build_catalogue(profile: &Profile) -> Vec<Conversation> {
    let company = slugify(&profile.company.name);
    let company = if company.is_empty() {
        "team".to_string()
    } else {
        company
    };
    let industry_channels = profile.industry().channels();

    let mut out = Vec::new();

    // Starred: the company's core and growth rooms plus its busiest industry channel.
    out.push(channel(
        &format!("{}-core", company),
        ConversationKind::StarredChannel,
        60 + seeded_index(&company, 40) as u32,
        false,
    ));
    out.push(channel(
        &format!("{}-growth", company),
        ConversationKind::StarredChannel,
        12 + seeded_index(&format!("{}-growth", company), 20) as u32,
        true,
    ));
    if let Some((id, members)) = industry_channels.first() {
        out.push(channel(id, ConversationKind::StarredChannel, *members, false));
    }

    for (id, members, private) in BASE_CHANNELS {
        out.push(channel(id, ConversationKind::Channel, *members, *private));
    }
    for (id, members) in industry_channels.iter().skip(1) {
        out.push(channel(id, ConversationKind::Channel, *members, false));
    }

    let me = profile.me();
    let assistant = profile.assistant();
    out.push(Conversation {
        id: slugify(&assistant.name),
        name: assistant.name.clone(),
        kind: ConversationKind::DirectMessage,
        members: vec![assistant.name.clone()],
        member_count: 2,
        private: true,
        assistant: true,
    });

    let colleagues: Vec<&str> = profile.colleagues().map(|p| p.name.as_str()).collect();
    for name in colleagues.iter().take(MAX_DIRECT_MESSAGES) {
        out.push(Conversation {
            id: slugify(name),
            name: name.to_string(),
            kind: ConversationKind::DirectMessage,
            members: vec![name.to_string()],
            member_count: 2,
            private: true,
            assistant: false,
        });
    }

    // Groups come from overlapping roster windows so membership looks organic.
    let group_sizes = [2usize, 3, 3, 2];
    let mut start = 0;
    for (i, size) in group_sizes.iter().take(MAX_GROUPS).enumerate() {
        if colleagues.len() < *size {
            break;
        }
        let members: Vec<String> = (0..*size)
            .map(|k| colleagues[(start + k) % colleagues.len()].to_string())
            .collect();
        start += size + 1;
        out.push(Conversation {
            id: format!("group-{}", i + 1),
            name: members.join(", "),
            kind: ConversationKind::GroupMessage,
            member_count: members.len() as u32 + 1,
            members,
            private: true,
            assistant: false,
        });
    }

    let mut seen = std::collections::HashSet::new();
    out.retain(|c| {
        let fresh = seen.insert(c.id.clone());
        if !fresh {
            tracing::debug!("dropping duplicate conversation id {}", c.id);
        }
        fresh
    });
    out.retain(|c| c.id != slugify(&me.name));
    out
}
