use std::{
    panic::{AssertUnwindSafe, catch_unwind},
    sync::Arc,
};

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    callable::CallableFn,
    envelope::{CallRequest, CallResponse},
    error::CallError,
};

/// An exposed name bound to its callable
#[derive(Clone)]
pub struct Handler {
    name: String,
    callable: CallableFn,
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handler").field("name", &self.name).finish()
    }
}

impl Handler {
    pub fn new(name: &str, callable: CallableFn) -> Self {
        Self {
            name: name.into(),
            callable,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Calls the callable with already decoded arguments. Panics of the
    /// callable are caught and reported as call failures.
    ///
    /// # Errors
    ///
    /// Returns the [`CallError`] of a failed decode, call or encode
    pub fn call(&self, args: Vec<Value>) -> Result<Value, CallError> {
        match catch_unwind(AssertUnwindSafe(|| (self.callable)(args))) {
            Ok(res) => res,
            Err(panic) => {
                let detail = panic
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".into());
                Err(CallError::Call(format!("panicked: {detail}")))
            }
        }
    }

    /// Decodes `payload`, calls the callable and encodes the response.
    /// Never fails, every failure becomes a `fail` response.
    pub fn invoke(&self, payload: &str) -> String {
        let res = CallRequest::decode(payload).and_then(|req| self.call(req.into_args()));

        match &res {
            Ok(_) => debug!(name = %self.name, "Call succeeded"),
            Err(e) => warn!(name = %self.name, err = %e, "Call failed"),
        }

        CallResponse::from(res).encode()
    }
}

/// Handlers by exposed name, in exposure order
#[derive(Clone, Default, Debug)]
pub struct NameRegistry {
    handlers: IndexMap<String, Arc<Handler>>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the exposed names of this [`NameRegistry`].
    pub fn ids(&self) -> Vec<String> {
        self.handlers.keys().map(String::from).collect()
    }

    /// Binds a handler under its name, returning the handler it evicted
    pub fn reserve(&mut self, handler: Handler) -> Option<Arc<Handler>> {
        let name = handler.name.clone();
        // shift_remove keeps exposure order, the new binding goes last
        let previous = self.handlers.shift_remove(&name);
        if previous.is_some() {
            debug!("Replacing handler for \"{name}\"");
        }
        self.handlers.insert(name, Arc::new(handler));
        previous
    }

    /// Remove a handler from the registry by name
    pub fn remove(&mut self, name: &str) -> Option<Arc<Handler>> {
        self.handlers.shift_remove(name)
    }

    pub fn get(&self, name: &str) -> Option<Arc<Handler>> {
        self.handlers.get(name).cloned()
    }

    /// Confirms the registry contains a given name
    pub fn has(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Handler>> {
        self.handlers.values()
    }
}
