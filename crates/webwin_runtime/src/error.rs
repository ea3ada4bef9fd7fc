use thiserror::Error;

use webwin_codegen::CodegenError;

pub type Result<T> = std::result::Result<T, BridgeError>;

/// Failures surfaced to the embedding application
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Invalid exposure target `{target}`: {reason}")]
    InvalidTarget { target: String, reason: String },

    #[error("Channel invoked unbound name \"{0}\"")]
    ChannelMisuse(String),

    #[error("webui run js error: {0:?}")]
    Script(String),

    #[error("Rendering surface error: {0}")]
    Channel(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    pub(crate) fn invalid_target(target: &str, reason: impl Into<String>) -> Self {
        Self::InvalidTarget {
            target: target.into(),
            reason: reason.into(),
        }
    }
}

impl From<CodegenError> for BridgeError {
    fn from(err: CodegenError) -> Self {
        match err {
            CodegenError::InvalidName { name, reason } => Self::InvalidTarget {
                target: name,
                reason,
            },
            other => Self::InvalidTarget {
                target: String::new(),
                reason: other.to_string(),
            },
        }
    }
}

/// Failures of a single call, always converted into a `fail` response
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CallError {
    #[error("DecodeError: {0}")]
    Decode(String),

    #[error("{0}")]
    Call(String),

    #[error("EncodeError: {0}")]
    Encode(String),
}
