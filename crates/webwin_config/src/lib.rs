use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::fs;
use tracing::debug;

use crate::{logger::LoggerConfig, window::WindowConfig};

pub mod args_file;
pub(crate) mod defaults;
pub mod logger;
pub mod paths;
pub mod window;


pub use window::{BrowserKind, WindowSize};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error(
        "invalid \"browser\" type: \"{0}\" (valid: {valid})",
        valid = BrowserKind::valid_names()
    )]
    InvalidBrowser(String),
    #[error("invalid \"size\" value: \"{0}\"")]
    InvalidSize(String),
    #[error("Unbalanced quoting in args file: {0}")]
    ArgsFile(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip_serializing)]
    path: Option<Utf8PathBuf>,

    /// Name of the app, defaults to the program name
    #[serde(default)]
    pub name: String,

    /// Version of the app
    #[serde(default = "default_version")]
    pub version: String,

    /// Description of the app, shown on message pages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Window & rendering surface settings
    #[serde(default)]
    pub window: WindowConfig,

    /// Script file URLs (or URL suffixes) the main page must not load
    #[serde(default)]
    pub del_js: Vec<String>,

    /// Script files to run once the main page is shown
    #[serde(default)]
    pub run_js: Vec<Utf8PathBuf>,

    /// Logger configuration
    #[serde(default)]
    pub logger: LoggerConfig,
}

fn default_version() -> String {
    "1.0.0".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: None,
            name: String::new(),
            version: default_version(),
            description: None,
            window: WindowConfig::default(),
            del_js: vec![],
            run_js: vec![],
            logger: LoggerConfig::default(),
        }
    }
}

impl Config {
    /// Binds the config to `path`, used by [`Config::save`]
    #[must_use]
    pub fn at(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// File the config was read from, or `./webwin.json`
    pub fn file(&self) -> Utf8PathBuf {
        self.path.clone().unwrap_or_else(Self::default_path)
    }

    /// Reads a JSON config file.
    ///
    /// # Errors
    ///
    /// Fails when `path` is missing, unreadable or not a valid config document.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        debug!(%path, "reading webwin config");
        anyhow::ensure!(path.is_file(), "no config file at {path}");

        let raw = fs::read_to_string(path).with_context(|| format!("cannot read {path}"))?;
        let mut cfg: Self =
            serde_json::from_str(&raw).with_context(|| format!("invalid config in {path}"))?;
        cfg.path = Some(path.to_owned());
        Ok(cfg)
    }

    /// Like [`Config::load`], but a missing file yields the defaults bound to `path`.
    ///
    /// # Errors
    ///
    /// Fails when the file exists but cannot be loaded.
    pub fn load_or_default(path: &Utf8Path) -> Result<Self> {
        if path.exists() {
            return Self::load(path);
        }
        debug!(%path, "config file absent, using defaults");
        Ok(Self::default().at(path.to_owned()))
    }

    /// Writes the config as pretty JSON to [`Config::file`].
    ///
    /// # Errors
    ///
    /// Fails when serializing or writing the file fails.
    pub fn save(&self) -> Result<()> {
        let dest = self.file();
        debug!(%dest, "writing webwin config");
        let text = serde_json::to_string_pretty(self).context("cannot serialize config")?;
        fs::write(&dest, text).with_context(|| format!("cannot write {dest}"))
    }

    pub fn default_path() -> Utf8PathBuf {
        Utf8PathBuf::from("webwin.json")
    }
}
