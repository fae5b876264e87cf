//! Embed detection, titles and owners for link previews.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};

use super::picker::{seeded_index, url_seed, Picker};
use super::titles::TitleSet;
use crate::models::{EmbedDescriptor, EmbedType};
use crate::profile::Profile;

/// Owner shown when the roster is empty.
const FALLBACK_OWNER: &str = "James McGill";

fn ci(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .expect("valid regex")
}

fn detector(kind: EmbedType) -> &'static Regex {
    static RES: OnceLock<[Regex; 5]> = OnceLock::new();
    let res = RES.get_or_init(|| {
        [
            ci(r#"https?://(?:www\.)?(?:notion\.so|notion\.site)/[^\s<>"']+"#),
            ci(r#"https?://(?:www\.)?figma\.com/[^\s<>"']+"#),
            ci(r#"https?://[^\s<>"']*jira[^\s<>"']*/[^\s<>"']+"#),
            ci(r#"https?://[^\s<>"']*confluence[^\s<>"']*/[^\s<>"']+"#),
            ci(r#"https?://(?:www\.)?loom\.com/[^\s<>"']+"#),
        ]
    });
    &res[kind as usize]
}

fn slug_re(kind: EmbedType) -> Option<&'static Regex> {
    static NOTION: OnceLock<Regex> = OnceLock::new();
    static FIGMA: OnceLock<Regex> = OnceLock::new();
    static CONFLUENCE: OnceLock<Regex> = OnceLock::new();
    match kind {
        EmbedType::Notion => {
            Some(NOTION.get_or_init(|| ci(r"notion\.(?:so|site)/(?:[^/]+/)?([^/?#]+)")))
        }
        EmbedType::Figma => Some(FIGMA.get_or_init(|| ci(r"figma\.com/file/[^/]+/([^/?#]+)"))),
        EmbedType::Confluence => Some(CONFLUENCE.get_or_init(|| {
            ci(r"pages/viewpage\.action\?pageId=\d+|spaces/[^/]+/pages/([^/?#]+)")
        })),
        EmbedType::Jira | EmbedType::Loom => None,
    }
}

fn issue_in_path_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| ci(r"browse/([A-Z]+-\d+)|selectedIssue=([A-Z]+-\d+)"))
}

fn issue_anywhere_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| ci(r"([A-Z]+-\d+)"))
}

fn title_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z]+-\d+:").expect("valid regex"))
}

/// Turn a URL slug into a sentence-case title, if it is long enough to read.
fn humanize_slug(raw: &str) -> Option<String> {
    let spaced = raw.replace('-', " ").replace("%20", " ");
    let decoded = match urlencoding::decode(&spaced) {
        Ok(text) => text.into_owned(),
        Err(_) => spaced,
    };
    let trimmed = decoded.split(['?', '#']).next().unwrap_or_default();
    if trimmed.chars().count() < 5 {
        return None;
    }
    let mut chars = trimmed.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().chain(chars).collect())
}

/// Title and owner resolution for embeds, parameterized by the profile's
/// industry and roster.
#[derive(Debug, Clone)]
pub struct EmbedCatalog {
    titles: &'static TitleSet,
    people: Vec<String>,
}

impl EmbedCatalog {
    pub fn new(profile: &Profile) -> Self {
        Self {
            titles: TitleSet::for_industry(profile.industry()),
            people: profile.people().iter().map(|p| p.name.clone()).collect(),
        }
    }

    /// Detect every recognised link in a message body, one descriptor per URL.
    pub fn extract(&self, body: &str) -> Vec<EmbedDescriptor> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for kind in EmbedType::ALL {
            for m in detector(kind).find_iter(body) {
                let url = m.as_str();
                if !seen.insert(url.to_string()) {
                    continue;
                }
                out.push(EmbedDescriptor {
                    kind,
                    url: url.to_string(),
                    title: self.title(kind, url),
                    owner: self.owner(url),
                });
            }
        }
        out
    }

    /// Deterministic title: slug from the URL where possible, else a canned
    /// industry title chosen by the URL's seed.
    pub fn title(&self, kind: EmbedType, url: &str) -> String {
        let canned = self.titles.titles(kind);
        let seeded = canned[seeded_index(url, canned.len())];

        if let Some(re) = slug_re(kind) {
            let slug = re
                .captures(url)
                .and_then(|c| c.get(1))
                .and_then(|m| humanize_slug(m.as_str()));
            return slug.unwrap_or_else(|| seeded.to_string());
        }

        match kind {
            EmbedType::Jira => {
                let issue = issue_in_path_re()
                    .captures(url)
                    .and_then(|c| c.get(1).or_else(|| c.get(2)))
                    .or_else(|| issue_anywhere_re().captures(url).and_then(|c| c.get(1)))
                    .map(|m| m.as_str().to_string());
                match issue {
                    Some(id) => title_prefix_re()
                        .replace(seeded, format!("{}:", id).as_str())
                        .into_owned(),
                    None => title_prefix_re()
                        .replace(canned[0], "ENG-123:")
                        .into_owned(),
                }
            }
            _ => seeded.to_string(),
        }
    }

    /// Deterministic owner drawn from the whole roster.
    pub fn owner(&self, url: &str) -> String {
        if self.people.is_empty() {
            return FALLBACK_OWNER.to_string();
        }
        self.people[(url_seed(url) % self.people.len() as u64) as usize].clone()
    }
}

/// A plausible link of the given type for synthesized history.
pub fn random_embed_url(kind: EmbedType, picker: &mut Picker) -> String {
    match kind {
        EmbedType::Notion => {
            let slug = picker.pick(&[
                "product-roadmap-q2",
                "engineering-design-doc",
                "api-architecture-overview",
                "database-migration-plan",
                "user-onboarding-flow",
                "incident-response-procedures",
                "feature-prioritization-framework",
                "service-architecture-guide",
                "user-behavior-analytics",
                "deployment-best-practices",
            ]);
            format!("https://notion.so/{}", slug)
        }
        EmbedType::Figma => {
            let key = picker.pick(&["abc123", "def456", "ghi789", "jkl012", "mno345"]);
            let slug = picker.pick(&[
                "design-system-components",
                "mobile-app-ui",
                "web-dashboard",
                "color-palette",
                "onboarding-flow",
                "button-library",
                "icon-set",
                "navigation-patterns",
                "dashboard-views",
                "card-patterns",
            ]);
            format!("https://figma.com/file/{}/{}", key, slug)
        }
        EmbedType::Loom => {
            let id = picker.pick(&[
                "a1b2c3d4", "e5f6g7h8", "i9j0k1l2", "m3n4o5p6", "q7r8s9t0", "u1v2w3x4", "y5z6a7b8",
                "c9d0e1f2",
            ]);
            format!("https://loom.com/share/{}", id)
        }
        EmbedType::Jira => {
            let project = picker.pick(&["ENG", "PROD", "DEV", "OPS", "SEC"]);
            format!(
                "https://jira.company.com/browse/{}-{}",
                project,
                picker.between(1000, 5999)
            )
        }
        EmbedType::Confluence => format!(
            "https://confluence.company.com/pages/viewpage.action?pageId={}",
            picker.between(10000, 99999)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::enhance::anchor;

    fn catalog() -> EmbedCatalog {
        EmbedCatalog::new(&Profile::embedded().unwrap())
    }

    #[test]
    fn test_notion_slug_title_and_stable_owner() {
        let cat = catalog();
        let url = "https://notion.so/product-roadmap-q2";
        let first = cat.extract(url);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].kind, EmbedType::Notion);
        assert_eq!(first[0].title, "Product roadmap q2");
        for _ in 0..5 {
            let again = cat.extract(url);
            assert_eq!(again[0].title, first[0].title);
            assert_eq!(again[0].owner, first[0].owner);
        }
        let roster: Vec<_> = Profile::embedded()
            .unwrap()
            .people()
            .iter()
            .map(|p| p.name.clone())
            .collect();
        assert!(roster.contains(&first[0].owner));
    }

    #[test]
    fn test_short_slug_uses_canned_title() {
        let cat = catalog();
        let url = "https://notion.so/abc";
        let title = cat.title(EmbedType::Notion, url);
        assert!(TitleSet::for_industry(crate::content::Industry::Automotive)
            .titles(EmbedType::Notion)
            .contains(&title.as_str()));
    }

    #[test]
    fn test_percent_encoded_slug_decodes() {
        let cat = catalog();
        let title = cat.title(
            EmbedType::Figma,
            "https://figma.com/file/abc123/Caf%C3%A9-menu-board",
        );
        assert_eq!(title, "Café menu board");
    }

    #[test]
    fn test_invalid_percent_encoding_keeps_raw() {
        let cat = catalog();
        let title = cat.title(EmbedType::Figma, "https://figma.com/file/abc123/bad%FFslug-name");
        assert_eq!(title, "Bad%FFslug name");
    }

    #[test]
    fn test_jira_splices_issue_id() {
        let cat = catalog();
        let title = cat.title(EmbedType::Jira, "https://jira.company.com/browse/ENG-4242");
        assert!(title.starts_with("ENG-4242: "), "{title}");

        let fallback = cat.title(EmbedType::Jira, "https://jira.company.com/secure/Dashboard");
        assert!(fallback.starts_with("ENG-123: "), "{fallback}");
    }

    #[test]
    fn test_confluence_page_id_uses_canned_title() {
        let cat = catalog();
        let url = "https://confluence.company.com/pages/viewpage.action?pageId=48213";
        let title = cat.title(EmbedType::Confluence, url);
        assert_eq!(title, cat.title(EmbedType::Confluence, url));
        assert!(TitleSet::for_industry(crate::content::Industry::Automotive)
            .titles(EmbedType::Confluence)
            .contains(&title.as_str()));

        let slugged = cat.title(
            EmbedType::Confluence,
            "https://confluence.company.com/spaces/ENG/pages/release-checklist",
        );
        assert_eq!(slugged, "Release checklist");
    }

    #[test]
    fn test_extract_dedupes_anchor_href_and_text() {
        let cat = catalog();
        let url = "https://loom.com/share/a1b2c3d4";
        let body = format!("Walkthrough here {}", anchor(url, url));
        let embeds = cat.extract(&body);
        assert_eq!(embeds.len(), 1);
        assert_eq!(embeds[0].kind, EmbedType::Loom);
        assert_eq!(embeds[0].url, url);
    }

    #[test]
    fn test_extract_multiple_types() {
        let cat = catalog();
        let body = "See https://figma.com/file/abc123/icon-set and https://jira.company.com/browse/OPS-1001 please";
        let kinds: Vec<_> = cat.extract(body).into_iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EmbedType::Figma, EmbedType::Jira]);
    }

    #[test]
    fn test_extract_ignores_plain_text() {
        assert!(catalog().extract("no links here, just notion and figma words").is_empty());
    }

    #[test]
    fn test_random_urls_are_detected_as_their_type() {
        let cat = catalog();
        let mut picker = Picker::seeded(21);
        for kind in EmbedType::ALL {
            for _ in 0..10 {
                let url = random_embed_url(kind, &mut picker);
                let found = cat.extract(&url);
                assert_eq!(found.len(), 1, "{url}");
                assert_eq!(found[0].kind, kind, "{url}");
            }
        }
    }

    #[test]
    fn test_owner_fallback_when_roster_empty() {
        let cat = EmbedCatalog {
            titles: TitleSet::for_industry(crate::content::Industry::Technology),
            people: Vec::new(),
        };
        assert_eq!(cat.owner("https://notion.so/x"), FALLBACK_OWNER);
    }
}
