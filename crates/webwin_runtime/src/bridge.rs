use std::{any::type_name, sync::Arc};

use serde_json::Value;
use tracing::{debug, info};
use webwin_codegen::{
    StubBundle, StubEmitter, StubEntry,
    ident::{is_reserved, simple_type_name, validate_name},
};

use crate::{
    callable::{CallableFn, IntoCallable, raw_callable},
    channel::Channel,
    dispatcher::Dispatcher,
    error::{BridgeError, CallError, Result},
    registry::{Handler, NameRegistry},
};

/// A function waiting to be exposed
pub struct Function {
    name: String,
    doc: Option<String>,
    callable: CallableFn,
}

impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("doc", &self.doc)
            .finish_non_exhaustive()
    }
}

impl Function {
    /// Wraps a function, its front-end name is the name of the fn item
    /// (`my_app::swap` -> `swap`)
    pub fn new<F, Args>(f: F) -> Self
    where
        F: IntoCallable<Args>,
    {
        Self {
            name: simple_type_name(type_name::<F>()),
            doc: None,
            callable: f.into_callable(),
        }
    }

    /// Wraps a function under an explicit name, required for closures
    pub fn named<F, Args>(name: &str, f: F) -> Self
    where
        F: IntoCallable<Args>,
    {
        Self::new(f).with_name(name)
    }

    /// Wraps an untyped function receiving the raw positional arguments
    pub fn raw<F>(name: &str, f: F) -> Self
    where
        F: Fn(Vec<Value>) -> std::result::Result<Value, CallError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            doc: None,
            callable: raw_callable(f),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        name.clone_into(&mut self.name);
        self
    }

    /// Text placed in a comment above the generated stub
    #[must_use]
    pub fn with_doc(mut self, doc: &str) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }
}

/// Objects whose methods can be exposed as a namespace.
///
/// The returned table is exhaustive: only the listed methods are visible to
/// the front end. Entries whose name starts with `_` are private and skipped.
pub trait Exposable: Send + Sync + 'static {
    fn methods(self: Arc<Self>) -> Vec<Function>;
}

/// Accumulates exposures, then finalizes them into a [`Bridge`].
///
/// Exposing a name again replaces both its handler and its stub; exposing an
/// alias again replaces the whole namespace.
#[derive(Debug)]
pub struct BridgeBuilder {
    registry: NameRegistry,
    emitter: StubEmitter,
    version: String,
}

impl Default for BridgeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BridgeBuilder {
    pub fn new() -> Self {
        Self {
            registry: NameRegistry::new(),
            emitter: StubEmitter::new(),
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }

    /// Version published in the stub bundle as `webwin._version_`
    #[must_use]
    pub fn with_version(mut self, version: &str) -> Self {
        self.version = version.into();
        self
    }

    /// Exposes a function as a top level entry of the bundle
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidTarget`] if the function has no usable name
    pub fn expose(&mut self, function: Function) -> Result<&mut Self> {
        let Function {
            name,
            doc,
            callable,
        } = function;

        if name.contains("{{closure}}") {
            return Err(BridgeError::invalid_target(
                &name,
                "closures have no name, expose them under an explicit name",
            ));
        }
        validate_name(&name)?;

        let replaced = self.emitter.emit_function_stub(&name, &name, doc.as_deref())?;
        self.evict(replaced, &name);
        self.registry.reserve(Handler::new(&name, callable));

        info!("webwin exposed func: {name}");
        Ok(self)
    }

    /// Exposes `f` under `name`, or under its own name when `None`
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidTarget`] if the resulting name is not usable
    pub fn expose_function<F, Args>(&mut self, f: F, name: Option<&str>) -> Result<&mut Self>
    where
        F: IntoCallable<Args>,
    {
        let function = Function::new(f);
        let function = match name {
            Some(name) => function.with_name(name),
            None => function,
        };
        self.expose(function)
    }

    /// Exposes the method table of `instance` as the namespace `alias`, which
    /// defaults to the lower-cased type name. Methods are bound as
    /// `<alias>.<method>`.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidTarget`] if the alias or a public method name
    /// is not usable, nothing is exposed in that case
    pub fn expose_object<T: Exposable>(
        &mut self,
        instance: Arc<T>,
        alias: Option<&str>,
    ) -> Result<&mut Self> {
        let alias = alias.map_or_else(
            || simple_type_name(type_name::<T>()).to_lowercase(),
            String::from,
        );
        validate_name(&alias)?;

        let methods: Vec<Function> = instance
            .methods()
            .into_iter()
            .filter(|m| {
                let public = !is_reserved(&m.name);
                if !public {
                    debug!(namespace = %alias, "Skipping private method {}", m.name);
                }
                public
            })
            .collect();

        for method in &methods {
            validate_name(&method.name).map_err(|e| {
                BridgeError::invalid_target(&format!("{alias}.{}", method.name), e.to_string())
            })?;
        }

        let replaced = self.emitter.emit_namespace_open(&alias)?;
        self.evict(replaced, "");

        for method in methods {
            let bind_name = format!("{alias}.{}", method.name);
            self.emitter
                .emit_function_stub(&method.name, &bind_name, method.doc.as_deref())?;
            self.registry.reserve(Handler::new(&bind_name, method.callable));
            info!("webwin exposed func: {bind_name}");
        }
        self.emitter.emit_namespace_close()?;

        info!("webwin exposed object: {alias}");
        Ok(self)
    }

    /// Names exposed so far, in exposure order
    pub fn names(&self) -> Vec<String> {
        self.registry.ids()
    }

    /// Finalizes the stub bundle and the dispatch table
    ///
    /// # Errors
    ///
    /// Returns an error if the stub bundle cannot be finished
    pub fn build(self) -> Result<Bridge> {
        let bundle = self.emitter.finish(&self.version)?;
        debug!(
            names =? self.registry.ids(),
            "Built bridge with {} handlers",
            self.registry.len()
        );

        Ok(Bridge {
            dispatcher: Dispatcher::new(self.registry),
            bundle,
        })
    }

    fn evict(&mut self, replaced: Option<StubEntry>, keep: &str) {
        let Some(entry) = replaced else {
            return;
        };

        for name in entry.bind_names() {
            if name != keep && self.registry.remove(&name).is_some() {
                debug!("Evicted handler \"{name}\" replaced by \"{}\"", entry.key());
            }
        }
    }
}

/// Finalized exposures of one window: the stub bundle for the front end and
/// the dispatch table for the channel
#[derive(Clone, Debug)]
pub struct Bridge {
    dispatcher: Dispatcher,
    bundle: StubBundle,
}

impl Bridge {
    pub fn builder() -> BridgeBuilder {
        BridgeBuilder::new()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn bundle(&self) -> &StubBundle {
        &self.bundle
    }

    /// # Errors
    ///
    /// Returns [`BridgeError::ChannelMisuse`] if `name` is not exposed
    pub fn dispatch(&self, name: &str, payload: &str) -> Result<String> {
        self.dispatcher.dispatch(name, payload)
    }

    /// Binds one channel handler per exposed name
    pub fn bind_to<C: Channel + ?Sized>(&self, channel: &mut C) {
        for handler in self.dispatcher.handlers() {
            let h = Arc::clone(handler);
            channel.bind(handler.name(), Arc::new(move |payload: &str| h.invoke(payload)));
        }
    }
}
