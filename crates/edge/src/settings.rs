// crates/edge/src/settings.rs

use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Connection settings for the search engine, read from the `[search]`
/// table of a TOML settings file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchSettings {
    /// Base URL, e.g. `http://localhost:9200`.
    pub url: String,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Ask the engine to make writes visible to search before returning.
    #[serde(default = "default_refresh")]
    pub refresh: bool,

    /// Upper bound on hits returned by one read.
    #[serde(default = "default_max_hits")]
    pub max_hits: usize,
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_refresh() -> bool {
    true
}

fn default_max_hits() -> usize {
    10_000
}

#[derive(Deserialize)]
struct SettingsFile {
    search: SearchSettings,
}

impl SearchSettings {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: None,
            password: None,
            timeout_ms: default_timeout_ms(),
            refresh: default_refresh(),
            max_hits: default_max_hits(),
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: SettingsFile = toml::from_str(text)
            .map_err(|err| Error::config(format!("Invalid search settings: {err}")))?;
        Ok(file.search)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::config(format!(
                "settings file not found at {}",
                path.display()
            )));
        }

        let text = std::fs::read_to_string(path)
            .map_err(|err| Error::config(format!("Failed reading {}: {err}", path.display())))?;

        toml::from_str::<SettingsFile>(&text)
            .map(|file| file.search)
            .map_err(|err| Error::config(format!("Invalid {}: {err}", path.display())))
    }
}
