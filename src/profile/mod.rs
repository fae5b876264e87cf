//! Company profile: company descriptor, roster and theme set.
//!
//! Loaded once at startup from `company.json`, `people.json` and
//! `theme.json`. Each file falls back to the embedded default independently,
//! so a missing or malformed profile never stops the workspace from starting.

mod catalogue;

pub use catalogue::{build_catalogue, slugify};

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::content::Industry;

const DEFAULT_COMPANY: &str = include_str!("default/company.json");
const DEFAULT_PEOPLE: &str = include_str!("default/people.json");
const DEFAULT_THEME: &str = include_str!("default/theme.json");

/// Theme used when neither the requested nor the default theme exists.
pub const FALLBACK_THEME_ID: &str = "midnight-express";

/// Name given to the assistant when the roster has none.
const SYNTHETIC_ASSISTANT: &str = "Workspace AI";

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid profile: {0}")]
    Invalid(String),
}

/// Company descriptor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Company {
    pub name: String,
    pub logo: Option<String>,
    pub description: String,
    pub industry: String,
    pub company_size: String,
    pub headquarters: String,
    #[serde(alias = "nationalities")]
    pub countries: Vec<String>,
}

/// Roster entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    /// Marks the viewing user.
    #[serde(default)]
    pub me: bool,
    #[serde(default, rename = "emoji-heavy")]
    pub emoji_heavy: bool,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub bot: bool,
}

impl Person {
    pub fn first_name(&self) -> &str {
        first_name(&self.name)
    }
}

pub fn first_name(name: &str) -> &str {
    name.split_whitespace().next().unwrap_or(name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKind {
    Dark,
    Light,
}

/// Named colour-token map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ThemeKind,
    #[serde(default)]
    pub colors: BTreeMap<String, String>,
}

impl Theme {
    /// Parse a `#rrggbb` token into RGB components.
    pub fn rgb(&self, token: &str) -> Option<(u8, u8, u8)> {
        let hex = self.colors.get(token)?.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        Some((channel(0)?, channel(2)?, channel(4)?))
    }
}

/// Theme descriptor: default theme id plus every available theme.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeSet {
    #[serde(default)]
    pub default_theme: String,
    #[serde(default)]
    pub themes: BTreeMap<String, Theme>,
}

impl ThemeSet {
    pub fn contains(&self, id: &str) -> bool {
        self.themes.contains_key(id)
    }

    /// Resolve a theme id: requested, then default, then the fallback id,
    /// then the first available theme, then the built-in palette.
    pub fn resolve(&self, id: &str) -> &Theme {
        [id, self.default_theme.as_str(), FALLBACK_THEME_ID]
            .into_iter()
            .find_map(|key| self.themes.get(key))
            .or_else(|| self.themes.values().next())
            .unwrap_or_else(|| builtin_theme())
    }

    /// Id of the theme `resolve("")` lands on.
    pub fn default_id(&self) -> String {
        [self.default_theme.as_str(), FALLBACK_THEME_ID]
            .into_iter()
            .find(|key| self.themes.contains_key(*key))
            .map(str::to_string)
            .or_else(|| self.themes.keys().next().cloned())
            .unwrap_or_else(|| FALLBACK_THEME_ID.to_string())
    }

    /// Theme ids in cycling order.
    pub fn ids(&self) -> Vec<String> {
        self.themes.keys().cloned().collect()
    }
}

fn builtin_theme() -> &'static Theme {
    static BUILTIN: OnceLock<Theme> = OnceLock::new();
    BUILTIN.get_or_init(|| Theme {
        name: "Midnight Express".to_string(),
        kind: ThemeKind::Dark,
        colors: BTreeMap::new(),
    })
}

/// Normalised, read-only workspace profile.
#[derive(Debug, Clone)]
pub struct Profile {
    pub company: Company,
    pub themes: ThemeSet,
    people: Vec<Person>,
    self_idx: usize,
    assistant_idx: usize,
    industry: Industry,
}

impl Profile {
    /// The embedded default profile.
    pub fn embedded() -> Result<Self, ProfileError> {
        Self::from_parts(
            parse_json("company.json", DEFAULT_COMPANY)?,
            parse_json("people.json", DEFAULT_PEOPLE)?,
            parse_json("theme.json", DEFAULT_THEME)?,
        )
    }

    /// Load from `dir`, falling back to embedded defaults file by file.
    ///
    /// Only fails if the embedded defaults themselves are broken.
    pub fn load(dir: Option<&Path>) -> Result<Self, ProfileError> {
        let company: Company = read_or_default(dir, "company.json", DEFAULT_COMPANY)?;
        let people: Vec<Person> = read_or_default(dir, "people.json", DEFAULT_PEOPLE)?;
        let themes: ThemeSet = read_or_default(dir, "theme.json", DEFAULT_THEME)?;

        match Self::from_parts(company.clone(), people, themes.clone()) {
            Ok(profile) => Ok(profile),
            Err(e) => {
                tracing::warn!("{}; using embedded roster", e);
                Self::from_parts(company, parse_json("people.json", DEFAULT_PEOPLE)?, themes)
            }
        }
    }

    /// Build a profile, enforcing exactly one self-person and one assistant.
    pub fn from_parts(
        mut company: Company,
        people: Vec<Person>,
        mut themes: ThemeSet,
    ) -> Result<Self, ProfileError> {
        if company.name.trim().is_empty() {
            company.name = "Acme".to_string();
        }

        let mut seen = HashSet::new();
        let mut people: Vec<Person> = people
            .into_iter()
            .filter(|p| !p.name.trim().is_empty())
            .filter(|p| seen.insert(p.name.clone()))
            .collect();

        let self_idx = people
            .iter()
            .position(|p| p.me)
            .or_else(|| people.iter().position(|p| !p.bot))
            .ok_or_else(|| ProfileError::Invalid("roster has no human members".to_string()))?;
        for (i, person) in people.iter_mut().enumerate() {
            person.me = i == self_idx;
        }

        let assistant_idx = people
            .iter()
            .position(|p| p.bot && !p.me)
            .or_else(|| {
                people
                    .iter()
                    .position(|p| !p.me && p.gender.as_deref() == Some("neutral"))
            });
        let assistant_idx = match assistant_idx {
            Some(i) => i,
            None => {
                tracing::debug!("no assistant in roster, adding {}", SYNTHETIC_ASSISTANT);
                people.push(Person {
                    name: SYNTHETIC_ASSISTANT.to_string(),
                    gender: Some("neutral".to_string()),
                    ..Person::default()
                });
                people.len() - 1
            }
        };
        people[assistant_idx].bot = true;

        if !people.iter().any(|p| !p.me && !p.bot) {
            return Err(ProfileError::Invalid(
                "roster has nobody besides the viewer".to_string(),
            ));
        }

        if themes.default_theme.is_empty() || !themes.contains(&themes.default_theme) {
            themes.default_theme = themes.default_id();
        }

        let industry = Industry::detect(&company.industry, &company.description);
        Ok(Self {
            company,
            themes,
            people,
            self_idx,
            assistant_idx,
            industry,
        })
    }

    /// Every roster entry, including the viewer and the assistant.
    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn me(&self) -> &Person {
        &self.people[self.self_idx]
    }

    pub fn assistant(&self) -> &Person {
        &self.people[self.assistant_idx]
    }

    /// Humans other than the viewer.
    pub fn colleagues(&self) -> impl Iterator<Item = &Person> {
        self.people.iter().filter(|p| !p.me && !p.bot)
    }

    pub fn person(&self, name: &str) -> Option<&Person> {
        self.people.iter().find(|p| p.name == name)
    }

    pub fn is_me(&self, name: &str) -> bool {
        self.me().name == name
    }

    pub fn industry(&self) -> Industry {
        self.industry
    }
}

fn parse_json<T: DeserializeOwned>(file: &str, text: &str) -> Result<T, ProfileError> {
    serde_json::from_str(text).map_err(|source| ProfileError::Parse {
        file: file.to_string(),
        source,
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ProfileError> {
    let text = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_json(&path.display().to_string(), &text)
}

fn read_or_default<T: DeserializeOwned>(
    dir: Option<&Path>,
    file: &str,
    embedded: &str,
) -> Result<T, ProfileError> {
    if let Some(dir) = dir {
        let path = dir.join(file);
        if path.exists() {
            match read_json(&path) {
                Ok(value) => return Ok(value),
                Err(e) => tracing::warn!("{}; using embedded {}", e, file),
            }
        } else {
            tracing::debug!("{} not found; using embedded default", path.display());
        }
    }
    parse_json(file, embedded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(name: &str) -> Person {
        Person {
            name: name.to_string(),
            ..Person::default()
        }
    }

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("slack-sim-{}-{}", tag, uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_embedded_profile_parses() {
        let profile = Profile::embedded().unwrap();
        assert_eq!(profile.company.name, "Mercedes-Benz");
        assert_eq!(profile.me().name, "Klaus Müller");
        assert_eq!(profile.assistant().name, "Juspay AI");
        assert_eq!(profile.industry(), Industry::Automotive);
        assert_eq!(profile.colleagues().count(), 14);
        assert_eq!(profile.people().iter().filter(|p| p.me).count(), 1);
    }

    #[test]
    fn test_profile_first_me_wins() {
        let mut a = person("A");
        a.me = true;
        let mut b = person("B");
        b.me = true;
        let profile =
            Profile::from_parts(Company::default(), vec![a, b, person("C")], ThemeSet::default_empty())
                .unwrap();
        assert_eq!(profile.me().name, "A");
        assert_eq!(profile.people().iter().filter(|p| p.me).count(), 1);
    }

    #[test]
    fn test_profile_without_me_picks_first_human() {
        let mut bot = person("Bot");
        bot.bot = true;
        let profile = Profile::from_parts(
            Company::default(),
            vec![bot, person("Ann"), person("Ben")],
            ThemeSet::default_empty(),
        )
        .unwrap();
        assert_eq!(profile.me().name, "Ann");
        assert_eq!(profile.assistant().name, "Bot");
    }

    #[test]
    fn test_profile_synthesizes_assistant() {
        let profile = Profile::from_parts(
            Company::default(),
            vec![person("Ann"), person("Ben")],
            ThemeSet::default_empty(),
        )
        .unwrap();
        assert_eq!(profile.assistant().name, SYNTHETIC_ASSISTANT);
        assert!(profile.assistant().bot);
        assert_eq!(profile.company.name, "Acme");
    }

    #[test]
    fn test_profile_rejects_solo_roster() {
        let result = Profile::from_parts(
            Company::default(),
            vec![person("Ann")],
            ThemeSet::default_empty(),
        );
        assert!(matches!(result, Err(ProfileError::Invalid(_))));
    }

    #[test]
    fn test_profile_dedupes_names() {
        let profile = Profile::from_parts(
            Company::default(),
            vec![person("Ann"), person("Ben"), person("Ann")],
            ThemeSet::default_empty(),
        )
        .unwrap();
        assert_eq!(
            profile.people().iter().filter(|p| p.name == "Ann").count(),
            1
        );
    }

    #[test]
    fn test_load_missing_dir_falls_back() {
        let dir = temp_dir("missing");
        let profile = Profile::load(Some(&dir)).unwrap();
        assert_eq!(profile.company.name, "Mercedes-Benz");
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_load_malformed_file_falls_back_per_file() {
        let dir = temp_dir("malformed");
        std::fs::write(dir.join("people.json"), "{ not json").unwrap();
        std::fs::write(
            dir.join("company.json"),
            r#"{"name":"Globex","industry":"Banking","nationalities":["Swiss"]}"#,
        )
        .unwrap();
        let profile = Profile::load(Some(&dir)).unwrap();
        assert_eq!(profile.company.name, "Globex");
        assert_eq!(profile.company.countries, vec!["Swiss"]);
        assert_eq!(profile.industry(), Industry::Finance);
        assert_eq!(profile.me().name, "Klaus Müller");
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_load_solo_roster_uses_embedded_people() {
        let dir = temp_dir("solo");
        std::fs::write(dir.join("people.json"), r#"[{"name":"Only Me","me":true}]"#).unwrap();
        let profile = Profile::load(Some(&dir)).unwrap();
        assert_eq!(profile.me().name, "Klaus Müller");
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_theme_resolution_order() {
        let profile = Profile::embedded().unwrap();
        let themes = &profile.themes;
        assert_eq!(themes.resolve("aubergine").name, "Aubergine");
        assert_eq!(themes.resolve("nope").name, "Midnight Express");
        assert_eq!(themes.default_id(), "midnight-express");

        let empty = ThemeSet::default_empty();
        assert_eq!(empty.resolve("anything").name, "Midnight Express");
    }

    #[test]
    fn test_theme_rgb() {
        let profile = Profile::embedded().unwrap();
        let theme = profile.themes.resolve("midnight-express");
        assert_eq!(theme.rgb("unreadPillText"), Some((255, 255, 255)));
        assert_eq!(theme.rgb("missing"), None);
    }

    impl ThemeSet {
        fn default_empty() -> Self {
            ThemeSet {
                default_theme: String::new(),
                themes: BTreeMap::new(),
            }
        }
    }
}
