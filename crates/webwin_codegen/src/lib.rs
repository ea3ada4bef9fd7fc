pub mod document;
pub mod ident;
pub mod stubs;

#[cfg(test)]
mod tests;

use thiserror::Error;

pub use document::PreparedDocument;
pub use stubs::{FunctionStub, NamespaceStub, StubBundle, StubEmitter, StubEntry};

pub type CodegenResult<T> = Result<T, CodegenError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodegenError {
    #[error("Invalid front-end name `{name}`: {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Namespace `{0}` is still open")]
    NamespaceOpen(String),

    #[error("No namespace is open")]
    NamespaceNotOpen,

    #[error("Invalid script tag pattern: {0}")]
    Pattern(String),
}

/// Block comment placed above a generated stub, `None` when there is nothing to document
pub fn generate_docstring(content: &str) -> Option<String> {
    let content = content.trim_matches('\n');
    if content.trim().is_empty() {
        return None;
    }

    // `*/` would end the comment and `</script>` the enclosing block
    let content = content.replace("*/", "*\\/").replace("</", "<\\/");
    Some(format!("/*\n{content}\n */"))
}

/// JSON string literal that is also safe inside an inline `<script>` block
pub fn js_string(text: &str) -> String {
    serde_json::Value::from(text)
        .to_string()
        .replace("</", "<\\/")
}
