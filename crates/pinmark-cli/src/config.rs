use pinmark_core::{EngineSettings, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Pinboard API token, `user:HEX`
    pub token: Option<String>,
    /// Launcher keyword that precedes every query (default: pb)
    pub keyword: Option<String>,
    /// Minutes before cached API responses are refetched (default: 5)
    pub cache_ttl_minutes: Option<u64>,
    /// Maximum data items per list (default: 50)
    pub max_results: Option<usize>,
    /// How many bookmarks the recent view asks for (default: 20)
    pub recent_count: Option<usize>,
    /// Per-request timeout in seconds (default: 10)
    pub timeout_secs: Option<u64>,
    /// API root; only useful for testing against a local stub
    pub base_url: Option<String>,
    pub theme: Option<ThemeSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ThemeSettings {
    pub highlight_fg: Option<String>,
    pub highlight_bg: Option<String>,
    pub border_fg: Option<String>,
    pub help_fg: Option<String>,
}

impl Settings {
    pub fn engine_settings(&self) -> EngineSettings {
        let defaults = EngineSettings::default();
        EngineSettings {
            token: self.token.clone().filter(|t| !t.trim().is_empty()),
            keyword: self
                .keyword
                .clone()
                .filter(|k| !k.trim().is_empty())
                .unwrap_or(defaults.keyword),
            cache_ttl: self
                .cache_ttl_minutes
                .map(|m| Duration::from_secs(m.saturating_mul(60)))
                .unwrap_or(defaults.cache_ttl),
            max_results: self.max_results.unwrap_or(defaults.max_results).max(1),
            recent_count: self.recent_count.unwrap_or(defaults.recent_count),
        }
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(10))
    }

    /// Copy safe to print: the token secret is reduced to its user part.
    pub fn redacted(&self) -> Settings {
        let mut s = self.clone();
        s.token = s.token.map(|t| match t.split_once(':') {
            Some((user, _)) => format!("{user}:********"),
            None => "********".into(),
        });
        s
    }
}

pub fn config_dir() -> PathBuf {
    if let Some(bd) = directories::BaseDirs::new() {
        bd.config_dir().join("pinmark")
    } else {
        PathBuf::from("./.config/pinmark")
    }
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.toml")
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    match std::fs::read_to_string(&path) {
        Ok(s) => toml::from_str(&s).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed settings");
            Settings::default()
        }),
        Err(_) => Settings::default(),
    }
}
