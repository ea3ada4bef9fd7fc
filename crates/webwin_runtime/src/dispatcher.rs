use std::sync::Arc;

use tracing::{debug, error};

use crate::{
    error::{BridgeError, Result},
    registry::{Handler, NameRegistry},
};

/// Finalized, read-only dispatch table of a bridge
#[derive(Clone, Debug, Default)]
pub struct Dispatcher {
    registry: Arc<NameRegistry>,
}

impl Dispatcher {
    pub(crate) fn new(registry: NameRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Exposed names in exposure order
    pub fn names(&self) -> Vec<String> {
        self.registry.ids()
    }

    pub fn has(&self, name: &str) -> bool {
        self.registry.has(name)
    }

    pub fn handler(&self, name: &str) -> Option<Arc<Handler>> {
        self.registry.get(name)
    }

    pub fn handlers(&self) -> impl Iterator<Item = &Arc<Handler>> {
        self.registry.iter()
    }

    /// Runs the handler bound to `name` and returns the encoded response
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ChannelMisuse`] if nothing is bound to `name`,
    /// the stub bundle and the dispatch table have diverged
    pub fn dispatch(&self, name: &str, payload: &str) -> Result<String> {
        let Some(handler) = self.registry.get(name) else {
            error!(name = %name, "Channel invoked a name without handler");
            return Err(BridgeError::ChannelMisuse(name.into()));
        };

        debug!(name = %name, payload_len = payload.len(), "Dispatching call");
        Ok(handler.invoke(payload))
    }
}
