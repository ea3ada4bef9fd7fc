use std::{fmt::Display, str::FromStr};

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Browsers the rendering surface knows how to launch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    #[default]
    Any,
    Chrome,
    Firefox,
    Edge,
    Safari,
    Chromium,
    Opera,
    Brave,
    Vivaldi,
    Epic,
    Yandex,
}

impl BrowserKind {
    pub const ALL: [BrowserKind; 11] = [
        BrowserKind::Any,
        BrowserKind::Chrome,
        BrowserKind::Firefox,
        BrowserKind::Edge,
        BrowserKind::Safari,
        BrowserKind::Chromium,
        BrowserKind::Opera,
        BrowserKind::Brave,
        BrowserKind::Vivaldi,
        BrowserKind::Epic,
        BrowserKind::Yandex,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserKind::Any => "any",
            BrowserKind::Chrome => "chrome",
            BrowserKind::Firefox => "firefox",
            BrowserKind::Edge => "edge",
            BrowserKind::Safari => "safari",
            BrowserKind::Chromium => "chromium",
            BrowserKind::Opera => "opera",
            BrowserKind::Brave => "brave",
            BrowserKind::Vivaldi => "vivaldi",
            BrowserKind::Epic => "epic",
            BrowserKind::Yandex => "yandex",
        }
    }

    /// Comma separated list of every valid browser identifier
    pub fn valid_names() -> String {
        Self::ALL
            .iter()
            .map(BrowserKind::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Display for BrowserKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BrowserKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| ConfigError::InvalidBrowser(s.into()))
    }
}

/// Window size in pixels, `0,0` keeps whatever size the browser picks.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl WindowSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Display for WindowSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.width, self.height)
    }
}

impl FromStr for WindowSize {
    type Err = ConfigError;

    /// Accepts `WIDTH,HEIGHT` or a single `N` meaning `N,N`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ConfigError::InvalidSize(s.into()))?;

        match parts.as_slice() {
            [n] => Ok(Self::new(*n, *n)),
            [w, h] => Ok(Self::new(*w, *h)),
            _ => Err(ConfigError::InvalidSize(s.into())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WindowConfig {
    /// Document root directory, relative paths resolve against the current directory
    #[serde(default = "crate::defaults::default_webroot")]
    pub webroot: Utf8PathBuf,

    /// Main page of the app, relative to the webroot
    #[serde(default = "crate::defaults::default_mainpage")]
    pub mainpage: String,

    /// Port the rendering surface serves on, 0 picks a random one
    #[serde(default)]
    pub port: u16,

    #[serde(default)]
    pub browser: BrowserKind,

    #[serde(default)]
    pub size: WindowSize,

    /// Resolve the webroot against the bundle directory instead of the current directory
    #[serde(default)]
    pub webroot_bundled: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            webroot: crate::defaults::default_webroot(),
            mainpage: crate::defaults::default_mainpage(),
            port: 0,
            browser: BrowserKind::Any,
            size: WindowSize::default(),
            webroot_bundled: false,
        }
    }
}

impl WindowConfig {
    /// Path of the main page inside the webroot
    pub fn mainpage_path(&self) -> Utf8PathBuf {
        self.webroot.join(&self.mainpage)
    }
}
