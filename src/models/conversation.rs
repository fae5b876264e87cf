//! Conversation-related models

use serde::{Deserialize, Serialize};

/// Conversation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConversationKind {
    StarredChannel,
    Channel,
    DirectMessage,
    GroupMessage,
}

impl ConversationKind {
    pub fn is_channel(self) -> bool {
        matches!(self, Self::StarredChannel | Self::Channel)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::StarredChannel => "starred",
            Self::Channel => "channel",
            Self::DirectMessage => "dm",
            Self::GroupMessage => "group",
        }
    }
}

/// A channel, 1:1 DM or group DM with its own message history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub name: String,
    pub kind: ConversationKind,
    /// Resolved participants (self excluded) for DMs and groups; empty for channels.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<String>,
    /// Approximate member count shown for channels.
    pub member_count: u32,
    #[serde(default)]
    pub private: bool,
    /// True for the assistant DM, which has a hand-authored history.
    #[serde(default)]
    pub assistant: bool,
}

impl Conversation {
    /// The other participant of a 1:1 DM.
    pub fn peer(&self) -> Option<&str> {
        match self.kind {
            ConversationKind::DirectMessage => self.members.first().map(String::as_str),
            _ => None,
        }
    }

    /// Sidebar label: channels get a `#` prefix.
    pub fn display_name(&self) -> String {
        if self.kind.is_channel() {
            format!("# {}", self.name)
        } else {
            self.name.clone()
        }
    }
}
