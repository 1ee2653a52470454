//! Error types for the Zonos API client.
//!
//! # Design
//! Local validation failures, transport failures and upstream HTTP errors
//! each get their own variant so callers can branch on the failure without
//! sniffing the shape of a JSON body. Upstream error payloads that arrive
//! with a 2xx status are not errors at this layer: they are returned to the
//! caller verbatim.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors returned by `ZonosClient`, the transports and the `ZonosApi` facade.
#[derive(Debug, Error)]
pub enum ApiError {
    /// `get_order` was called with a blank order or reference id. No request
    /// is produced.
    #[error("orderId or referenceId is required")]
    MissingOrderId,

    /// The caller-supplied body did not serialize to a JSON object, so the
    /// credentials could not be merged into it.
    #[error("request body must be a JSON object, got {0}")]
    InvalidBody(&'static str),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body could not be parsed as JSON.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request never produced a response (DNS, connect, TLS, timeout).
    #[error("transport failed: {0}")]
    Transport(String),

    /// Client configuration is incomplete or malformed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Deserialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_order_id_message_matches_upstream_wording() {
        assert_eq!(
            ApiError::MissingOrderId.to_string(),
            "orderId or referenceId is required"
        );
    }

    #[test]
    fn status_only_for_http_errors() {
        let err = ApiError::Http {
            status: 502,
            body: "bad gateway".to_string(),
        };
        assert_eq!(err.status(), Some(502));
        assert_eq!(err.to_string(), "HTTP 502: bad gateway");
        assert_eq!(ApiError::Transport("refused".into()).status(), None);
    }
}
