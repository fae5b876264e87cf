//! Configuration storage

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::content::ReactionPolicy;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding company.json, people.json and theme.json
    pub profile_dir: Option<PathBuf>,
    pub simulation: SimulationConfig,
    pub reactions: ReactionPolicy,
}

/// Timings and caps of the live simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub ambient_min_secs: u64,
    pub ambient_max_secs: u64,
    pub foreground_min_secs: u64,
    pub foreground_max_secs: u64,
    pub presence_first_min_secs: u64,
    pub presence_first_max_secs: u64,
    pub presence_min_secs: u64,
    pub presence_max_secs: u64,
    pub mention_reply_ms: u64,
    pub unread_clear_ms: u64,
    pub thank_you_ms: u64,
    /// Share of tracked conversations with unread messages above which
    /// ambient ticks are skipped.
    pub backpressure_ratio: f64,
    /// Per-conversation cap for ambient appends.
    pub live_cap: usize,
    /// Per-conversation cap for synthesized history and foreground appends.
    pub history_cap: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ambient_min_secs: 5,
            ambient_max_secs: 10,
            foreground_min_secs: 8,
            foreground_max_secs: 12,
            presence_first_min_secs: 180,
            presence_first_max_secs: 300,
            presence_min_secs: 240,
            presence_max_secs: 420,
            mention_reply_ms: 2000,
            unread_clear_ms: 300,
            thank_you_ms: 1500,
            backpressure_ratio: 0.4,
            live_cap: 40,
            history_cap: 200,
        }
    }
}

impl SimulationConfig {
    pub fn ambient(&self) -> RangeInclusive<u64> {
        ordered(self.ambient_min_secs, self.ambient_max_secs)
    }

    pub fn foreground(&self) -> RangeInclusive<u64> {
        ordered(self.foreground_min_secs, self.foreground_max_secs)
    }

    pub fn presence_first(&self) -> RangeInclusive<u64> {
        ordered(self.presence_first_min_secs, self.presence_first_max_secs)
    }

    pub fn presence(&self) -> RangeInclusive<u64> {
        ordered(self.presence_min_secs, self.presence_max_secs)
    }

    pub fn mention_reply_delay(&self) -> Duration {
        Duration::from_millis(self.mention_reply_ms)
    }

    pub fn unread_clear_delay(&self) -> Duration {
        Duration::from_millis(self.unread_clear_ms)
    }

    pub fn thank_you_delay(&self) -> Duration {
        Duration::from_millis(self.thank_you_ms)
    }
}

fn ordered(a: u64, b: u64) -> RangeInclusive<u64> {
    a.min(b)..=a.max(b)
}

impl Config {
    /// Get config directory path
    fn config_dir() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "slack-sim", "slack-sim")
            .context("Could not determine config directory")?;
        Ok(proj_dirs.config_dir().to_path_buf())
    }

    /// Get config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from the platform config directory
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    /// Save configuration to the platform config directory
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).context("Failed to create config directory")?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("slack-sim-config-{}", uuid::Uuid::new_v4()))
            .join(name)
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let config = Config::load_from(&temp_path("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.simulation.live_cap, 40);
        assert_eq!(config.simulation.history_cap, 200);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let path = temp_path("config.toml");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            "profile_dir = \"/tmp/acme\"\n[simulation]\nlive_cap = 10\n[reactions]\nbase_general = 1.0\n",
        )
        .unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.profile_dir, Some(PathBuf::from("/tmp/acme")));
        assert_eq!(config.simulation.live_cap, 10);
        assert_eq!(config.simulation.mention_reply_ms, 2000);
        assert_eq!(config.reactions.base_general, 1.0);
        assert_eq!(config.reactions.base_channel, ReactionPolicy::default().base_channel);
        fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let path = temp_path("config.toml");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[simulation\nlive_cap = ").unwrap();
        assert!(Config::load_from(&path).is_err());
        fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("nested/config.toml");
        let mut config = Config::default();
        config.simulation.ambient_min_secs = 1;
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
        fs::remove_dir_all(path.parent().unwrap().parent().unwrap()).ok();
    }

    #[test]
    fn test_ranges_are_ordered() {
        let sim = SimulationConfig {
            ambient_min_secs: 9,
            ambient_max_secs: 3,
            ..SimulationConfig::default()
        };
        assert_eq!(sim.ambient(), 3..=9);
        assert_eq!(sim.unread_clear_delay(), Duration::from_millis(300));
    }
}
