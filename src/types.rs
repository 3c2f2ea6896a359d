use std::{
    collections::BTreeMap,
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::composer::ComposerOptions;

/// Overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "SETLIST_CONFIG";

pub const DEFAULT_DB_PATH: &str = "./setlist.db";
pub const DEFAULT_OWNER: &str = "local";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFmt {
    Text,
    Json,
}

impl OutputFmt {
    pub fn from_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }
}

/// Print `value` as pretty JSON, or run `text` for the human-readable form.
pub fn emit<T: Serialize>(fmt: OutputFmt, value: &T, text: impl FnOnce()) -> Result<()> {
    match fmt {
        OutputFmt::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFmt::Text => text(),
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    Sqlite,
    Rest,
}

/// Flat key/value settings persisted as TOML.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config {
    pub map: BTreeMap<String, String>,
}

impl Config {
    /// Missing file means empty config.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let content = toml::to_string(self)?;
        fs::write(path, content).with_context(|| format!("Failed to save config to {}", path.display()))
    }

    /// `$SETLIST_CONFIG`, else `<config_dir>/setlist/config`.
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Ok(PathBuf::from(trimmed));
            }
        }

        dirs::config_dir()
            .map(|d| d.join("setlist").join("config"))
            .context("Could not determine config directory")
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
    }

    pub fn backend(&self) -> Result<BackendKind> {
        match self.get("backend").map(|v| v.to_ascii_lowercase()).as_deref() {
            None | Some("sqlite") => Ok(BackendKind::Sqlite),
            Some("rest") => Ok(BackendKind::Rest),
            Some(other) => bail!("unknown backend `{other}` (expected `sqlite` or `rest`)"),
        }
    }

    pub fn db_path(&self) -> &str {
        self.get("db_path").unwrap_or(DEFAULT_DB_PATH)
    }

    pub fn owner_id(&self) -> &str {
        self.get("owner_id").unwrap_or(DEFAULT_OWNER)
    }

    pub fn rest_url(&self) -> Result<&str> {
        self.get("rest_url")
            .context("`rest_url` must be set to use the rest backend")
    }

    pub fn rest_key(&self) -> Result<&str> {
        self.get("rest_key")
            .context("`rest_key` must be set to use the rest backend")
    }

    pub fn access_token(&self) -> Option<&str> {
        self.get("access_token")
    }

    pub fn composer_options(&self) -> Result<ComposerOptions> {
        let rollback_orphans = match self.get("rollback_orphans") {
            None => false,
            Some(v) => v
                .parse::<bool>()
                .with_context(|| format!("`rollback_orphans` must be true or false, got `{v}`"))?,
        };
        Ok(ComposerOptions { rollback_orphans })
    }
}
