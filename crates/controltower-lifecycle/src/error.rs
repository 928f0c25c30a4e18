//! Lifecycle engine error types.
//!
//! Every remote-call failure is wrapped with the operation verb and the
//! subject (account or resource name) before it propagates. Resource
//! disappearance during Read is deliberately *not* an error; see
//! [`ReadOutcome::Absent`](crate::engine::ReadOutcome).

use thiserror::Error;

use controltower_client::error::ClientError;
use controltower_client::ids::ProductId;

/// Errors produced by the account lifecycle engine.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// The desired state failed boundary validation.
    #[error("invalid desired state: {field}: {message}")]
    Validation { field: &'static str, message: String },

    /// Product search returned zero or more than one match.
    ///
    /// The fixed product name is expected to match exactly one real product;
    /// anything else is unrecoverable within the operation.
    #[error("expected exactly one account factory product, search returned {matches}")]
    AmbiguousProduct { matches: usize },

    /// No provisioning artifact is flagged active for the product.
    #[error("no active provisioning artifact for product {product_id}")]
    NoActiveArtifact { product_id: ProductId },

    /// A remote call failed at the transport/API level.
    #[error("error {operation} {subject}: {source}")]
    Transport {
        operation: &'static str,
        subject: String,
        #[source]
        source: ClientError,
    },

    /// The remote side reported a terminal provisioning failure.
    #[error("provisioning account {account} failed: {message}")]
    ProvisioningFailed { account: String, message: String },

    /// The caller's deadline or cancellation fired while waiting.
    ///
    /// The remote operation may still be running; a later Read will show
    /// where it landed.
    #[error("timed out waiting for {operation} of account {account}")]
    Timeout {
        account: String,
        operation: &'static str,
    },

    /// A required output key was absent from a successful record.
    #[error("provisioning record is missing required output {key}")]
    MissingOutput { key: &'static str },

    /// No organizational-unit parent was found for an account.
    #[error("no OU parent found for {account_id}")]
    NoParentOu { account_id: String },

    /// No organization-root parent was found for an account.
    #[error("no organization root parent found for {account_id}")]
    NoRootParent { account_id: String },

    /// A compensating action failed after the primary action succeeded.
    ///
    /// The primary outcome stands; the unfinished compensation needs
    /// follow-up.
    #[error("auxiliary action {action} failed for {subject}: {source}")]
    Auxiliary {
        action: &'static str,
        subject: String,
        #[source]
        source: Box<LifecycleError>,
    },
}

impl LifecycleError {
    /// Wrap a remote-call failure with the operation verb and subject.
    pub fn transport(
        operation: &'static str,
        subject: impl Into<String>,
        source: ClientError,
    ) -> Self {
        LifecycleError::Transport {
            operation,
            subject: subject.into(),
            source,
        }
    }

    /// Create a validation error.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        LifecycleError::Validation {
            field,
            message: message.into(),
        }
    }

    /// Create a timeout error.
    pub fn timeout(account: impl Into<String>, operation: &'static str) -> Self {
        LifecycleError::Timeout {
            account: account.into(),
            operation,
        }
    }

    /// Wrap an error as a failed compensating action.
    pub fn auxiliary(action: &'static str, subject: impl Into<String>, source: Self) -> Self {
        LifecycleError::Auxiliary {
            action,
            subject: subject.into(),
            source: Box::new(source),
        }
    }

    /// Whether this is the deadline/cancellation case, distinct from a
    /// remote-side provisioning failure.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, LifecycleError::Timeout { .. })
    }

    /// Whether this is a product/artifact resolution failure.
    #[must_use]
    pub fn is_resolution(&self) -> bool {
        matches!(
            self,
            LifecycleError::AmbiguousProduct { .. } | LifecycleError::NoActiveArtifact { .. }
        )
    }

    /// Whether this is a failed compensating action.
    #[must_use]
    pub fn is_auxiliary(&self) -> bool {
        matches!(self, LifecycleError::Auxiliary { .. })
    }
}

/// Result type for lifecycle operations.
pub type LifecycleResult<T> = Result<T, LifecycleError>;
