//! Client error types.
//!
//! Errors surfaced by remote service calls, with transient/permanent
//! classification so callers can decide whether retrying a whole operation
//! makes sense. The engine itself never retries individual calls.

use thiserror::Error;

/// Error returned by a remote service call.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The remote API rejected or failed the call.
    #[error("api error: {message}")]
    Api {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The call was throttled by the remote side.
    #[error("throttled: {message}")]
    Throttled { message: String },

    /// The transport timed out before the remote side answered.
    #[error("request timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// The addressed resource does not exist remotely.
    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    /// The caller lacks permission for this call.
    #[error("access denied: {message}")]
    AccessDenied { message: String },

    /// The remote response was missing required fields.
    #[error("invalid response: {message}")]
    InvalidResponse { message: String },
}

impl ClientError {
    /// Create an API error without an underlying source.
    pub fn api(message: impl Into<String>) -> Self {
        ClientError::Api {
            message: message.into(),
            source: None,
        }
    }

    /// Create an API error with an underlying source.
    pub fn api_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ClientError::Api {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a throttled error.
    pub fn throttled(message: impl Into<String>) -> Self {
        ClientError::Throttled {
            message: message.into(),
        }
    }

    /// Create a not-found error.
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        ClientError::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// Create an access-denied error.
    pub fn access_denied(message: impl Into<String>) -> Self {
        ClientError::AccessDenied {
            message: message.into(),
        }
    }

    /// Create an invalid-response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        ClientError::InvalidResponse {
            message: message.into(),
        }
    }

    /// Check if this error is transient and a full-operation retry may help.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ClientError::Throttled { .. } | ClientError::Timeout { .. }
        )
    }

    /// Check if this error means the addressed resource is gone.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound { .. })
    }
}

/// Result type for remote service calls.
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClientError::not_found("provisioned product", "pp-abc123");
        assert_eq!(err.to_string(), "provisioned product not found: pp-abc123");

        let err = ClientError::Timeout { timeout_secs: 30 };
        assert_eq!(err.to_string(), "request timed out after 30 seconds");
    }

    #[test]
    fn test_is_transient() {
        assert!(ClientError::throttled("slow down").is_transient());
        assert!(ClientError::Timeout { timeout_secs: 10 }.is_transient());
        assert!(!ClientError::api("boom").is_transient());
        assert!(!ClientError::not_found("record", "rec-1").is_transient());
    }

    #[test]
    fn test_is_not_found() {
        assert!(ClientError::not_found("account", "123").is_not_found());
        assert!(!ClientError::access_denied("nope").is_not_found());
    }

    #[test]
    fn test_api_error_with_source() {
        let source = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let err = ClientError::api_with_source("request failed", source);
        if let ClientError::Api { source, .. } = &err {
            assert!(source.is_some());
        } else {
            panic!("expected Api variant");
        }
    }
}
