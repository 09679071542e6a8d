use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{fs, io::Write};

use anyhow::{Context, Result};
use toml_edit::{DocumentMut, Item};
use tracing::{debug, warn};

use crate::errors::Error;
use crate::fetcher::Fetcher;
use crate::provider::{BASE_URL, Ttl};

const TABLE_NAME: &str = "desidub";

/// Keys accepted in the `[desidub]` table.
pub const KEYS: [&str; 7] = [
    "base_url",
    "user_agent",
    "timeout",
    "ttl_home",
    "ttl_search",
    "ttl_info",
    "ttl_watch",
];

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub user_agent: String,
    /// `None` when requests never time out.
    pub timeout: Option<Duration>,
    pub ttl: Ttl,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            user_agent: Fetcher::USER_AGENT.to_string(),
            timeout: Some(DEFAULT_TIMEOUT),
            ttl: Ttl::default(),
        }
    }
}

impl Settings {
    /// Reads the configuration file, any missing or invalid key keeps its default
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    fn load_from(path: &Path) -> Self {
        let mut settings = Self::default();

        let toml = match load_toml(path) {
            Ok(t) => t,
            Err(err) => {
                debug!(path = %path.display(), error = %err, "Using default settings");
                return settings;
            }
        };

        let Some(table) = toml.get(TABLE_NAME).and_then(Item::as_table_like) else {
            return settings;
        };

        for key in KEYS {
            let Some(value) = table.get(key).and_then(raw_value) else {
                continue;
            };

            if let Err(err) = settings.set(key, &value) {
                warn!(key, error = %err, "Ignoring invalid setting");
            }
        }

        settings
    }

    fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), Error> {
        match key {
            "base_url" => {
                let url = value.trim().trim_end_matches('/');
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(Error::Config(format!("`{value}` is not an http(s) url")));
                }
                self.base_url = url.to_string();
            }
            "user_agent" => self.user_agent = value.trim().to_string(),
            "timeout" => {
                self.timeout = match seconds(key, value)? {
                    0 => None,
                    s => Some(Duration::from_secs(s)),
                }
            }
            "ttl_home" => self.ttl.home = Duration::from_secs(seconds(key, value)?),
            "ttl_search" => self.ttl.search = Duration::from_secs(seconds(key, value)?),
            "ttl_info" => self.ttl.info = Duration::from_secs(seconds(key, value)?),
            "ttl_watch" => self.ttl.watch = Duration::from_secs(seconds(key, value)?),
            _ => {
                return Err(Error::Config(format!(
                    "unknown key `{key}`, expected one of: {}",
                    KEYS.join(", ")
                )));
            }
        }

        Ok(())
    }

    /// Effective value of every key, in file order
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let secs = |d: Duration| d.as_secs().to_string();

        vec![
            ("base_url", self.base_url.clone()),
            ("user_agent", self.user_agent.clone()),
            ("timeout", self.timeout.map(secs).unwrap_or_else(|| "0".into())),
            ("ttl_home", secs(self.ttl.home)),
            ("ttl_search", secs(self.ttl.search)),
            ("ttl_info", secs(self.ttl.info)),
            ("ttl_watch", secs(self.ttl.watch)),
        ]
    }
}

fn seconds(key: &str, value: &str) -> std::result::Result<u64, Error> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("`{key}` expects seconds, got `{value}`")))
}

fn raw_value(item: &Item) -> Option<String> {
    item.as_str()
        .map(str::to_string)
        .or_else(|| item.as_integer().map(|n| n.to_string()))
}

/// Validates and saves a value to the configuration
pub fn save(key: &str, value: &str) -> Result<()> {
    save_to(&config_path(), key, value)
}

fn save_to(path: &Path, key: &str, value: &str) -> Result<()> {
    Settings::default().set(key, value)?;

    let mut doc = match load_toml(path) {
        Ok(t) => t,
        Err(_) => {
            if let Some(p) = path.parent() {
                fs::create_dir_all(p)?;
            }

            DocumentMut::new()
        }
    };

    if !doc.contains_table(TABLE_NAME) {
        doc[TABLE_NAME] = toml_edit::table();
    }
    doc[TABLE_NAME][key] = match key {
        "base_url" | "user_agent" => toml_edit::value(value.trim()),
        _ => toml_edit::value(seconds(key, value)? as i64),
    };

    safe_save(&doc.to_string(), path)
}

/// Loads and parses the TOML configuration file
fn load_toml(path: &Path) -> Result<DocumentMut> {
    let content = fs::read_to_string(path)?;
    let toml = content.parse::<DocumentMut>()?;

    Ok(toml)
}

/// Saves content through a temporary file so a crash never leaves half a config
fn safe_save(content: &str, path: &Path) -> Result<()> {
    let tmp_path = path.with_extension("toml.tmp");

    {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }

    fs::rename(&tmp_path, path)
        .with_context(|| format!("Unable to write {}", path.display()))?;

    Ok(())
}

/// Deletes the configuration file
pub fn clean() -> Result<()> {
    clean_at(&config_path())
}

fn clean_at(path: &Path) -> Result<()> {
    fs::remove_file(path).context("Unable to delete configuration")
}

#[cfg(not(windows))]
const CONFIG_PATH: &str = ".config/desidub/config.toml";

#[cfg(windows)]
const CONFIG_PATH: &str = r"desidub\config.toml";

/// Returns the configuration file path for the current OS
pub fn config_path() -> PathBuf {
    #[cfg(windows)]
    let root = std::env::var("APPDATA").ok();

    #[cfg(not(windows))]
    let root = std::env::var("HOME").ok();

    let mut path = PathBuf::new();
    if let Some(r) = root {
        path.push(PathBuf::from(r));
    }
    path.push(CONFIG_PATH);

    path
}
