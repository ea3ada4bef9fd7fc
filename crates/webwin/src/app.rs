use std::{fmt, net::TcpListener, sync::Arc};

use anyhow::{Context, Result};
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use tracing::{error, info, warn};
use webwin_codegen::document::comment_out_script_tag;
use webwin_config::{Config, paths::ProgramPaths, window::WindowConfig};
use webwin_runtime::{Bridge, BridgeBuilder, Channel, ShowOptions, Window};

use crate::fs::FileSystem;

/// Extra exposures added to the app's bridge
pub type BindHook = Box<dyn Fn(&mut BridgeBuilder) -> webwin_runtime::Result<()>>;

/// What the app ended up showing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchStatus {
    MainPage,
    PortInUse(u16),
    PrivilegedPort(u16),
    MainPageMissing {
        webroot: Utf8PathBuf,
        mainpage: Utf8PathBuf,
    },
}

impl fmt::Display for LaunchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MainPage => f.write_str("main page shown"),
            Self::PortInUse(port) => write!(f, "port {port} is already in use"),
            Self::PrivilegedPort(port) => {
                write!(f, "privileged port {port} cannot be used (ports below 1024)")
            }
            Self::MainPageMissing { mainpage, .. } => write!(f, "main page not found: {mainpage}"),
        }
    }
}

impl LaunchStatus {
    fn message(&self) -> String {
        match self {
            Self::MainPage => String::new(),
            Self::PortInUse(port) => format!("<h1>Port already in use!</h1>[port] {port}"),
            Self::PrivilegedPort(port) => {
                format!("<h1>Privileged ports below 1024 cannot be used!</h1>[port] {port}")
            }
            Self::MainPageMissing { webroot, mainpage } => format!(
                "<h1>Main page not found!</h1>[webroot] {}<br />[main page] {}",
                escape_html(webroot.as_str()),
                escape_html(mainpage.as_str())
            ),
        }
    }
}

/// Window shown by [`WebWinApp::run`]
pub struct Launched<C: Channel> {
    pub window: Window<C>,
    pub status: LaunchStatus,
}

impl<C: Channel + fmt::Debug> fmt::Debug for Launched<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Launched")
            .field("window", &self.window)
            .field("status", &self.status)
            .finish()
    }
}

/// A webwin application: one main page served from a webroot, with the
/// built-in `fs` object and any extra exposures.
pub struct WebWinApp {
    config: Config,
    paths: ProgramPaths,
    help: String,
    bind_fs: bool,
    hooks: Vec<BindHook>,
}

impl fmt::Debug for WebWinApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebWinApp")
            .field("config", &self.config)
            .field("paths", &self.paths)
            .field("bind_fs", &self.bind_fs)
            .field("hooks", &self.hooks.len())
            .finish_non_exhaustive()
    }
}

impl WebWinApp {
    pub fn new(config: Config, paths: ProgramPaths) -> Self {
        Self {
            help: config.description.clone().unwrap_or_default(),
            config,
            paths,
            bind_fs: true,
            hooks: vec![],
        }
    }

    /// Text shown under message pages, usually the command line help
    #[must_use]
    pub fn with_help(mut self, help: &str) -> Self {
        self.help = help.into();
        self
    }

    /// Whether the built-in `fs` object is exposed, it is by default
    #[must_use]
    pub fn with_fs(mut self, bind_fs: bool) -> Self {
        self.bind_fs = bind_fs;
        self
    }

    /// Adds exposures made after the built-in ones
    #[must_use]
    pub fn with_binding<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut BridgeBuilder) -> webwin_runtime::Result<()> + 'static,
    {
        self.hooks.push(Box::new(hook));
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn name(&self) -> &str {
        if self.config.name.is_empty() {
            &self.paths.prog_name
        } else {
            &self.config.name
        }
    }

    /// Window settings with the webroot resolved against the current
    /// directory, or the bundle directory for bundled webroots
    pub fn settings(&self) -> WindowConfig {
        let base = if self.config.window.webroot_bundled {
            &self.paths.bundle_dir
        } else {
            &self.paths.cur_dir
        };

        let mut settings = self.config.window.clone();
        settings.webroot = normalize(&base.join(&settings.webroot));
        settings
    }

    /// Checks the settings, returns the message to show instead of the main page
    pub fn check(&self, settings: &WindowConfig) -> LaunchStatus {
        let port = settings.port;
        if port != 0 && !is_port_free(port) {
            return LaunchStatus::PortInUse(port);
        }
        if port != 0 && port < 1024 {
            return LaunchStatus::PrivilegedPort(port);
        }

        let mainpage = normalize(&settings.mainpage_path());
        if !mainpage.is_file() {
            return LaunchStatus::MainPageMissing {
                webroot: settings.webroot.clone(),
                mainpage,
            };
        }

        LaunchStatus::MainPage
    }

    /// Bridge holding every exposure of the app
    ///
    /// # Errors
    ///
    /// Returns an error if an exposure is invalid
    pub fn bridge(&self) -> Result<Bridge> {
        let mut builder = Bridge::builder().with_version(&self.config.version);
        if self.bind_fs {
            builder.expose_object(Arc::new(FileSystem), Some("fs"))?;
        }
        for hook in &self.hooks {
            hook(&mut builder)?;
        }
        Ok(builder.build()?)
    }

    /// Main page text with the script tags listed in `del_js` commented out
    ///
    /// # Errors
    ///
    /// Returns an error if the main page cannot be read
    pub fn main_page(&self, settings: &WindowConfig) -> Result<String> {
        let path = normalize(&settings.mainpage_path());
        let mut html =
            std::fs::read_to_string(&path).with_context(|| format!("Failed reading {path}"))?;

        for js in &self.config.del_js {
            html = comment_out_script_tag(&html, js)
                .with_context(|| format!("Failed removing script {js}"))?;
        }
        Ok(html)
    }

    /// Shows the main page on `channel`, or a message page when the
    /// settings are unusable. Failures of `run_js` scripts are logged.
    ///
    /// # Errors
    ///
    /// Returns an error if the bridge cannot be built or a page cannot be shown
    pub fn run<C: Channel>(&self, channel: C) -> Result<Launched<C>> {
        let settings = self.settings();
        let status = self.check(&settings);

        if status != LaunchStatus::MainPage {
            warn!(status =? status, "Showing message page");
            let window = self.show_message(channel, settings, &status.message())?;
            return Ok(Launched { window, status });
        }

        let html = self.main_page(&settings)?;
        let mut window = Window::new(channel, settings, self.bridge()?);
        window.show_html(&html, ShowOptions::default())?;
        info!("{} v{} started", self.name(), self.config.version);

        for js in &self.config.run_js {
            let path = normalize(&self.paths.cur_dir.join(js));
            if let Err(e) = window.run_js_file(&path) {
                error!("Failed running {path}: {e}");
            }
        }

        Ok(Launched { window, status })
    }

    fn show_message<C: Channel>(
        &self,
        channel: C,
        mut settings: WindowConfig,
        msg: &str,
    ) -> Result<Window<C>> {
        settings.port = 0;
        let bridge = Bridge::builder().with_version(&self.config.version).build()?;
        let mut window = Window::new(channel, settings, bridge);
        window.show_html(&self.message_page(msg), ShowOptions::default())?;
        Ok(window)
    }

    /// Standalone page carrying `msg` and the help text
    pub fn message_page(&self, msg: &str) -> String {
        format!(
            r#"<html>
<head><meta charset="UTF-8" /><title>{name} v{version}</title></head>
<body style="background:#fdf3df;">{msg}<hr>
<pre style="font-size:1rem;color:gray">{help}</pre></body>
</html>"#,
            name = escape_html(self.name()),
            version = escape_html(&self.config.version),
            help = escape_html(&self.help),
        )
    }
}

/// Whether `port` can be bound on the loopback interface
pub fn is_port_free(port: u16) -> bool {
    TcpListener::bind(("127.0.0.1", port)).is_ok()
}

/// Lexically removes `.` and resolves `..` components
pub fn normalize(path: &Utf8Path) -> Utf8PathBuf {
    let mut parts: Vec<Utf8Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => match parts.last().copied() {
                Some(Utf8Component::Normal(_)) => {
                    parts.pop();
                }
                // nothing above the root
                Some(Utf8Component::RootDir | Utf8Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    parts.iter().map(Utf8Component::as_str).collect()
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
