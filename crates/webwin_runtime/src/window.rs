use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info};
use webwin_codegen::{PreparedDocument, stubs::TRANSPORT_SCRIPT_URL};
use webwin_config::window::WindowConfig;

use crate::{
    bridge::Bridge,
    channel::Channel,
    error::{BridgeError, Result},
};

/// Script run once the document is shown, calls the page's hook if it has one
pub const LOADED_HOOK_JS: &str =
    r#"if ("on_webwin_loaded" in window && window.on_webwin_loaded) { window.on_webwin_loaded(); }"#;

/// Preparation steps applied before a document is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShowOptions {
    pub charset_meta: bool,
    pub transport_script: bool,
    pub stub_bundle: bool,
}

impl Default for ShowOptions {
    fn default() -> Self {
        Self {
            charset_meta: true,
            transport_script: true,
            stub_bundle: true,
        }
    }
}

/// One rendering surface together with the exposures reachable from it
#[derive(Debug)]
pub struct Window<C: Channel> {
    channel: C,
    settings: WindowConfig,
    bridge: Bridge,
}

impl<C: Channel> Window<C> {
    /// Binds every exposed name of `bridge` to `channel`
    pub fn new(mut channel: C, settings: WindowConfig, bridge: Bridge) -> Self {
        bridge.bind_to(&mut channel);
        Self {
            channel,
            settings,
            bridge,
        }
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    pub fn settings(&self) -> &WindowConfig {
        &self.settings
    }

    pub fn bridge(&self) -> &Bridge {
        &self.bridge
    }

    /// Applies the preparation steps to `html` without showing it
    pub fn prepare(&self, html: &str, opts: ShowOptions) -> String {
        let mut doc = PreparedDocument::new(html);
        if opts.charset_meta {
            doc = doc.with_charset_meta();
        }
        if opts.transport_script {
            doc = doc.with_transport_script(TRANSPORT_SCRIPT_URL);
        }
        if opts.stub_bundle {
            doc = doc.with_stub_bundle(self.bridge.bundle());
        }
        doc.ready()
    }

    /// Prepares and shows `html`, then runs the page's loaded hook
    ///
    /// # Errors
    ///
    /// Returns an error if the channel cannot show the document or the hook fails
    pub fn show_html(&mut self, html: &str, opts: ShowOptions) -> Result<()> {
        let document = self.prepare(html, opts);

        self.channel.configure(&self.settings);
        self.channel.show(&document, self.settings.browser)?;
        info!(
            browser = %self.settings.browser,
            port = self.settings.port,
            "Document shown"
        );

        self.run_js(LOADED_HOOK_JS)?;
        Ok(())
    }

    /// Reads `path` relative to the webroot, absolute paths are used as is
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or shown
    pub fn show_file(&mut self, path: impl AsRef<Utf8Path>, opts: ShowOptions) -> Result<()> {
        let path = self.settings.webroot.join(path.as_ref());
        debug!("Showing file {path}");
        let html = std::fs::read_to_string(&path)?;
        self.show_html(&html, opts)
    }

    /// Runs `js` in the shown document and returns the data it produced
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Script`] with the surface's error data
    pub fn run_js(&mut self, js: &str) -> Result<String> {
        let res = self.channel.evaluate_script(js);
        if res.error {
            return Err(BridgeError::Script(res.data));
        }
        Ok(res.data)
    }

    /// Runs a script file, relative paths resolve against the current directory
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file is missing or unreadable and
    /// [`BridgeError::Script`] if running it fails
    pub fn run_js_file(&mut self, path: impl AsRef<Utf8Path>) -> Result<String> {
        let path: Utf8PathBuf = path.as_ref().into();
        if !path.exists() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("script file not found: {path}"),
            )
            .into());
        }

        let js = std::fs::read_to_string(&path)?;
        info!("webui run js: {path}");
        let data = self.run_js(&js)?;

        let loaded = format!("{} loaded.", path.file_name().unwrap_or(path.as_str()));
        let loaded = serde_json::to_string(&loaded)
            .map_err(|e| BridgeError::Script(e.to_string()))?;
        self.run_js(&format!("console.log({loaded});"))?;

        Ok(data)
    }

    /// Closes the surface, it can be shown again
    pub fn close(&mut self) {
        self.channel.close();
    }

    /// Releases the surface, consuming the window
    pub fn destroy(self) {
        self.channel.destroy();
    }
}
