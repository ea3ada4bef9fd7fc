//! The rendering surface seen from the bridge.
//!
//! Implementations wrap whatever actually shows documents and carries
//! messages. [`MemoryChannel`] keeps everything in memory and is used for
//! headless runs and tests.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, error};
use webwin_config::{BrowserKind, window::WindowConfig};

use crate::error::{BridgeError, Result};

/// Synchronous callback invoked with the request payload, returns the
/// encoded response
pub type ChannelHandler = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Outcome of evaluating a script in the shown document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptResult {
    pub error: bool,
    pub data: String,
}

impl ScriptResult {
    pub fn ok(data: impl Into<String>) -> Self {
        Self {
            error: false,
            data: data.into(),
        }
    }

    pub fn err(data: impl Into<String>) -> Self {
        Self {
            error: true,
            data: data.into(),
        }
    }
}

pub trait Channel {
    /// Registers the callback for calls of `name` from the front end
    fn bind(&mut self, name: &str, handler: ChannelHandler);

    /// Applies port, root folder and size before a document is shown
    fn configure(&mut self, settings: &WindowConfig);

    /// Renders prepared document text
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Channel`] if the document cannot be shown
    fn show(&mut self, document: &str, browser: BrowserKind) -> Result<()>;

    /// Runs a script in the active document
    fn evaluate_script(&mut self, js: &str) -> ScriptResult;

    /// Closes the surface, it can be shown again later
    fn close(&mut self);

    /// Releases the surface for good
    fn destroy(self)
    where
        Self: Sized;
}

type ScriptResponder = Box<dyn FnMut(&str) -> ScriptResult + Send>;

/// In-memory channel recording everything it is asked to do
#[derive(Default)]
pub struct MemoryChannel {
    handlers: IndexMap<String, ChannelHandler>,
    settings: Option<WindowConfig>,
    shown: Vec<(String, BrowserKind)>,
    scripts: Vec<String>,
    responder: Option<ScriptResponder>,
    open: bool,
}

impl std::fmt::Debug for MemoryChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryChannel")
            .field("bound", &self.handlers.keys().collect::<Vec<_>>())
            .field("shown", &self.shown.len())
            .field("scripts", &self.scripts.len())
            .field("open", &self.open)
            .finish_non_exhaustive()
    }
}

impl MemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers evaluated scripts with `responder` instead of an empty success
    #[must_use]
    pub fn with_script_responder<F>(mut self, responder: F) -> Self
    where
        F: FnMut(&str) -> ScriptResult + Send + 'static,
    {
        self.responder = Some(Box::new(responder));
        self
    }

    /// Delivers a front-end call the way the rendering surface would
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ChannelMisuse`] if nothing is bound to `name`
    pub fn invoke(&self, name: &str, payload: &str) -> Result<String> {
        let handler = self.handlers.get(name).ok_or_else(|| {
            error!(name = %name, "Front end called a name without handler");
            BridgeError::ChannelMisuse(name.into())
        })?;
        Ok(handler(payload))
    }

    pub fn bound_names(&self) -> Vec<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }

    pub fn settings(&self) -> Option<&WindowConfig> {
        self.settings.as_ref()
    }

    /// Documents shown so far with the browser requested for each
    pub fn shown(&self) -> &[(String, BrowserKind)] {
        &self.shown
    }

    pub fn last_document(&self) -> Option<&str> {
        self.shown.last().map(|(doc, _)| doc.as_str())
    }

    pub fn scripts(&self) -> &[String] {
        &self.scripts
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}

impl Channel for MemoryChannel {
    fn bind(&mut self, name: &str, handler: ChannelHandler) {
        debug!("Binding {name}");
        self.handlers.insert(name.into(), handler);
    }

    fn configure(&mut self, settings: &WindowConfig) {
        self.settings = Some(settings.clone());
    }

    fn show(&mut self, document: &str, browser: BrowserKind) -> Result<()> {
        debug!(browser = %browser, "Showing document of {} bytes", document.len());
        self.shown.push((document.into(), browser));
        self.open = true;
        Ok(())
    }

    fn evaluate_script(&mut self, js: &str) -> ScriptResult {
        self.scripts.push(js.into());
        if !self.open {
            return ScriptResult::err("no document is shown");
        }
        match self.responder.as_mut() {
            Some(responder) => responder(js),
            None => ScriptResult::ok(""),
        }
    }

    fn close(&mut self) {
        self.open = false;
    }

    fn destroy(self) {
        debug!("Destroying memory channel with {} handlers", self.handlers.len());
    }
}
