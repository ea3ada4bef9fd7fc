//! Wire encoding of calls between the front end and the backend.
//!
//! Request: a JSON array of positional arguments, an empty payload means no
//! arguments. Response: `{"status":"succ","retval":...}` or
//! `{"status":"fail","msg":"..."}`.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::CallError;

/// Positional arguments of one call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallRequest(pub Vec<Value>);

impl CallRequest {
    /// Decodes a request payload
    ///
    /// # Errors
    ///
    /// Returns [`CallError::Decode`] if the payload is neither empty nor a JSON array
    pub fn decode(payload: &str) -> Result<Self, CallError> {
        if payload.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_json::from_str(payload)
            .map(Self)
            .map_err(|e| CallError::Decode(format!("call payload is not a JSON array: {e}")))
    }

    pub fn encode(&self) -> String {
        json!(self.0).to_string()
    }

    pub fn into_args(self) -> Vec<Value> {
        self.0
    }
}

impl From<Vec<Value>> for CallRequest {
    fn from(args: Vec<Value>) -> Self {
        Self(args)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum CallResponse {
    #[serde(rename = "succ")]
    Success { retval: Value },
    #[serde(rename = "fail")]
    Failure { msg: String },
}

impl CallResponse {
    pub fn success(retval: Value) -> Self {
        Self::Success { retval }
    }

    /// Failure response, an empty message is replaced so the front end
    /// always has something to show
    pub fn failure(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        let msg = if msg.trim().is_empty() {
            "backend call failed".to_string()
        } else {
            msg
        };
        Self::Failure { msg }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn encode(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            json!({ "status": "fail", "msg": format!("EncodeError: {e}") }).to_string()
        })
    }

    /// Decodes an encoded response, mostly useful to inspect what a handler returned
    ///
    /// # Errors
    ///
    /// Returns [`CallError::Decode`] if the text is not a response envelope
    pub fn decode(text: &str) -> Result<Self, CallError> {
        serde_json::from_str(text).map_err(|e| CallError::Decode(e.to_string()))
    }
}

impl From<Result<Value, CallError>> for CallResponse {
    fn from(res: Result<Value, CallError>) -> Self {
        match res {
            Ok(retval) => Self::success(retval),
            Err(e) => Self::failure(e.to_string()),
        }
    }
}
