use tracing::debug;

use crate::{CodegenError, CodegenResult, generate_docstring, ident::validate_name, js_string};

/// Marker closing the exposed entries of the bundle, always the last entry
pub const EXPOSE_END_MARKER: &str = "/*_WEBWIN_EXPOSE_END_*/";

/// URL of the transport loader served by the rendering surface
pub const TRANSPORT_SCRIPT_URL: &str = "/webui.js";

/// Everything before the exposed entries: the `webwin` object and its
/// call/parse/throw transport helper.
const BUNDLE_PREAMBLE: &str = r#"
/**
* WebWin js
*
*/
var webwin = {
async _call_(fname, ...args) {
    try {
        let ret = JSON.parse(await webui.call(fname, JSON.stringify(args)));
        if (ret.status == "succ") { return ret.retval; }
        else { throw Error("Backend-Error: " + ret.msg); }
    } catch (e) {
        throw e;
    }
},
/* Back-end exported objects and functions */
"#;

const BUNDLE_EPILOGUE: &str = "
};
console.log('webwin.js loaded.');
";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionStub {
    /// Method name inside the generated object literal
    pub js_name: String,
    /// Name the backend handler is bound under
    pub bind_name: String,
    pub doc: Option<String>,
}

impl FunctionStub {
    pub fn new(js_name: &str, bind_name: &str, doc: Option<&str>) -> Self {
        Self {
            js_name: js_name.into(),
            bind_name: bind_name.into(),
            doc: doc.map(String::from),
        }
    }

    pub fn fn_impl(&self) -> String {
        let docstring = self
            .doc
            .as_deref()
            .and_then(generate_docstring)
            .map(|d| format!("{d}\n"))
            .unwrap_or_default();

        format!(
            "{docstring}async {js_name}(...args) {{
    return await webwin._call_({bind_name}, ...args);
}},",
            js_name = &self.js_name,
            bind_name = js_string(&self.bind_name),
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamespaceStub {
    pub alias: String,
    pub methods: Vec<FunctionStub>,
}

impl NamespaceStub {
    pub fn new(alias: &str) -> Self {
        Self {
            alias: alias.into(),
            methods: vec![],
        }
    }

    /// Bind names of every method in the block
    pub fn bind_names(&self) -> Vec<String> {
        self.methods.iter().map(|m| m.bind_name.clone()).collect()
    }

    pub fn block(&self) -> String {
        let mut out = format!("{}: {{\n", self.alias);
        for method in &self.methods {
            out.push_str(&method.fn_impl());
            out.push('\n');
        }
        out.push_str("},");
        out
    }

    fn push(&mut self, stub: FunctionStub) {
        // last writer wins inside a block as well
        self.methods.retain(|m| m.js_name != stub.js_name);
        self.methods.push(stub);
    }
}

/// A top level entry of the bundle
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StubEntry {
    Function(FunctionStub),
    Namespace(NamespaceStub),
}

impl StubEntry {
    /// Key of the entry inside the `webwin` object
    pub fn key(&self) -> &str {
        match self {
            StubEntry::Function(f) => &f.js_name,
            StubEntry::Namespace(n) => &n.alias,
        }
    }

    /// Backend names the entry forwards to
    pub fn bind_names(&self) -> Vec<String> {
        match self {
            StubEntry::Function(f) => vec![f.bind_name.clone()],
            StubEntry::Namespace(n) => n.bind_names(),
        }
    }

    pub fn render(&self) -> String {
        match self {
            StubEntry::Function(f) => f.fn_impl(),
            StubEntry::Namespace(n) => n.block(),
        }
    }
}

/// Accumulates stub descriptors in exposure order.
///
/// Re-emitting a key replaces the previous entry, the replacement takes the
/// position of the latest emission.
#[derive(Clone, Debug, Default)]
pub struct StubEmitter {
    entries: Vec<StubEntry>,
    open: Option<NamespaceStub>,
}

impl StubEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits a function stub, into the open namespace if there is one.
    /// Returns the top level entry it replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if `js_name` is not a usable front-end name
    pub fn emit_function_stub(
        &mut self,
        js_name: &str,
        bind_name: &str,
        doc: Option<&str>,
    ) -> CodegenResult<Option<StubEntry>> {
        validate_name(js_name)?;
        let stub = FunctionStub::new(js_name, bind_name, doc);

        if let Some(ns) = self.open.as_mut() {
            debug!(namespace = %ns.alias, "Emitting stub {js_name} -> {bind_name}");
            ns.push(stub);
            return Ok(None);
        }

        debug!("Emitting stub {js_name} -> {bind_name}");
        let replaced = self.take_entry(js_name);
        self.entries.push(StubEntry::Function(stub));
        Ok(replaced)
    }

    /// Opens a namespace block, replacing any top level entry under the same alias.
    ///
    /// # Errors
    ///
    /// Returns an error if the alias is invalid or another namespace is still open
    pub fn emit_namespace_open(&mut self, alias: &str) -> CodegenResult<Option<StubEntry>> {
        if let Some(ns) = &self.open {
            return Err(CodegenError::NamespaceOpen(ns.alias.clone()));
        }
        validate_name(alias)?;

        let replaced = self.take_entry(alias);
        self.open = Some(NamespaceStub::new(alias));
        Ok(replaced)
    }

    /// Closes the open namespace block
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::NamespaceNotOpen`] if no block is open
    pub fn emit_namespace_close(&mut self) -> CodegenResult<()> {
        let ns = self.open.take().ok_or(CodegenError::NamespaceNotOpen)?;
        debug!(
            namespace = %ns.alias,
            "Closing namespace with {} methods",
            ns.methods.len()
        );
        self.entries.push(StubEntry::Namespace(ns));
        Ok(())
    }

    pub fn entries(&self) -> &[StubEntry] {
        &self.entries
    }

    /// Serializes the accumulated entries into the bundle text
    ///
    /// # Errors
    ///
    /// Returns an error if a namespace block was left open
    pub fn finish(self, version: &str) -> CodegenResult<StubBundle> {
        if let Some(ns) = self.open {
            return Err(CodegenError::NamespaceOpen(ns.alias));
        }

        Ok(StubBundle::new(version, self.entries))
    }

    fn take_entry(&mut self, key: &str) -> Option<StubEntry> {
        let idx = self.entries.iter().position(|e| e.key() == key)?;
        Some(self.entries.remove(idx))
    }
}

/// Finished, immutable front-end script
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StubBundle {
    entries: Vec<StubEntry>,
    text: String,
}

impl StubBundle {
    fn new(version: &str, entries: Vec<StubEntry>) -> Self {
        let mut text = String::from(BUNDLE_PREAMBLE);
        text.push_str(&format!("_version_: {},\n", js_string(version)));
        for entry in &entries {
            text.push_str(&entry.render());
            text.push('\n');
        }
        text.push_str(EXPOSE_END_MARKER);
        text.push_str(BUNDLE_EPILOGUE);

        Self { entries, text }
    }

    pub fn entries(&self) -> &[StubEntry] {
        &self.entries
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl std::fmt::Display for StubBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
