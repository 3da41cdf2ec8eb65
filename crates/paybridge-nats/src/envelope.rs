//! Request/reply envelopes.
//!
//! Callers built on NestJS microservices wrap every request as
//! `{"pattern": ..., "data": ..., "id": ...}` and expect the reply as
//! `{"id": ..., "response" | "err": ..., "isDisposed": true}`. Plain requests
//! without the wrapper are accepted as well.

use paybridge_core::{CheckoutSession, Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A decoded request, before the payload itself is interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestEnvelope {
    /// Correlation id to echo in the reply.
    pub id: Option<String>,
    /// Pattern the caller addressed; `None` for unwrapped requests.
    pub pattern: Option<Value>,
    pub data: Value,
}

impl RequestEnvelope {
    pub fn decode(payload: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(payload)?;

        match value {
            Value::Object(mut obj) if obj.contains_key("pattern") && obj.contains_key("data") => {
                let id = match obj.remove("id") {
                    Some(Value::String(id)) => Some(id),
                    Some(Value::Null) | None => None,
                    Some(other) => Some(other.to_string()),
                };
                Ok(Self {
                    id,
                    pattern: obj.remove("pattern"),
                    data: obj.remove("data").unwrap_or(Value::Null),
                })
            }
            data => Ok(Self {
                id: None,
                pattern: None,
                data,
            }),
        }
    }

    /// Whether the envelope addresses `subject`. Unwrapped requests match
    /// any subject they were delivered on.
    pub fn matches(&self, subject: &str) -> bool {
        match &self.pattern {
            None => true,
            Some(Value::String(pattern)) => pattern == subject,
            Some(_) => false,
        }
    }
}

/// Error carried in a failed reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyError {
    pub status: u16,
    pub message: String,
}

impl From<&Error> for ReplyError {
    fn from(err: &Error) -> Self {
        Self {
            status: err.status(),
            message: err.to_string(),
        }
    }
}

/// Reply sent back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<CheckoutSession>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err: Option<ReplyError>,
    pub is_disposed: bool,
}

impl Reply {
    pub fn success(id: Option<String>, session: CheckoutSession) -> Self {
        Self {
            id,
            response: Some(session),
            err: None,
            is_disposed: true,
        }
    }

    pub fn failure(id: Option<String>, err: ReplyError) -> Self {
        Self {
            id,
            response: None,
            err: Some(err),
            is_disposed: true,
        }
    }

    pub fn is_success(&self) -> bool {
        self.err.is_none()
    }
}
