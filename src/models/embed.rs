//! Embed-related models

use serde::{Deserialize, Serialize};

/// Recognised link-preview sources, in detection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedType {
    Notion,
    Figma,
    Jira,
    Confluence,
    Loom,
}

impl EmbedType {
    pub const ALL: [EmbedType; 5] = [
        EmbedType::Notion,
        EmbedType::Figma,
        EmbedType::Jira,
        EmbedType::Confluence,
        EmbedType::Loom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Notion => "notion",
            Self::Figma => "figma",
            Self::Jira => "jira",
            Self::Confluence => "confluence",
            Self::Loom => "loom",
        }
    }

    /// App name and icon shown on the preview card.
    pub fn app_info(self) -> AppInfo {
        let (name, icon) = match self {
            Self::Notion => ("Notion", "📝"),
            Self::Figma => ("Figma", "🎨"),
            Self::Jira => ("Jira", "🎫"),
            Self::Confluence => ("Confluence", "📚"),
            Self::Loom => ("Loom", "🎥"),
        };
        AppInfo { name, icon }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

/// App presentation for an embed card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppInfo {
    pub name: &'static str,
    pub icon: &'static str,
}

impl AppInfo {
    /// Presentation for links whose type is not recognised.
    pub const LINK: AppInfo = AppInfo {
        name: "Link",
        icon: "🔗",
    };
}

/// Preview card derived from a URL in a message body. Never stored on the message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedDescriptor {
    pub kind: EmbedType,
    pub url: String,
    pub title: String,
    pub owner: String,
}
