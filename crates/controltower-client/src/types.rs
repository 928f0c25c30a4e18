//! Data types exchanged with the remote services.
//!
//! These mirror the shapes the provisioning and directory services return,
//! reduced to the fields the lifecycle engine actually consumes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::ids::{AccountId, ArtifactId, ProductId, ProvisionedProductId, RecordId};

/// Key-value resource tags. Keys are case-sensitive and unordered.
pub type TagMap = HashMap<String, String>;

/// One product returned by a catalog search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    /// Product identifier.
    pub id: ProductId,
    /// Display name of the product.
    pub name: String,
}

/// One versioned artifact of a catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningArtifact {
    /// Artifact identifier.
    pub id: ArtifactId,
    /// Whether this artifact is the active version.
    pub active: bool,
}

/// Status of an asynchronous provisioning record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordStatus {
    /// The record was created but work has not started.
    Created,
    /// The operation is running.
    InProgress,
    /// The operation is running but has encountered errors.
    InProgressInError,
    /// The operation completed successfully.
    Succeeded,
    /// The operation failed.
    Failed,
}

impl RecordStatus {
    /// Whether this status ends the polling loop.
    ///
    /// Only `Succeeded` and `Failed` are terminal; every other status keeps
    /// the poller waiting.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, RecordStatus::Succeeded | RecordStatus::Failed)
    }

    /// Convert to string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Created => "CREATED",
            RecordStatus::InProgress => "IN_PROGRESS",
            RecordStatus::InProgressInError => "IN_PROGRESS_IN_ERROR",
            RecordStatus::Succeeded => "SUCCEEDED",
            RecordStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One output key/value pair on a provisioning record.
///
/// Outputs form a sparse, order-independent map; consumers must match by
/// key and ignore keys they do not know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordOutput {
    /// Output key.
    pub key: String,
    /// Output value, if the remote side populated one.
    pub value: Option<String>,
}

impl RecordOutput {
    /// Build an output pair.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
        }
    }
}

/// One error description on a failed provisioning record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordError {
    /// Remote error code, if any.
    pub code: Option<String>,
    /// Human-readable description, if any.
    pub description: Option<String>,
}

/// One asynchronous operation attempt tracked by the provisioning service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningRecord {
    /// Record identifier.
    pub id: RecordId,
    /// Current status.
    pub status: RecordStatus,
    /// Launch path the operation ran through, if any.
    pub path_id: Option<String>,
    /// Ordered output key/value pairs (populated on success).
    pub outputs: Vec<RecordOutput>,
    /// Ordered error descriptions (populated on failure).
    pub errors: Vec<RecordError>,
    /// When the record was created.
    pub created_at: Option<DateTime<Utc>>,
}

/// One entry in the record history listing.
///
/// A condensed view of a [`ProvisioningRecord`]: enough to locate the
/// record and its product instance without the outputs and errors a full
/// describe carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSummary {
    /// Record identifier.
    pub id: RecordId,
    /// Product instance the record belongs to.
    pub provisioned_product_id: ProvisionedProductId,
    /// Status of the record at listing time.
    pub status: RecordStatus,
    /// When the record was created.
    pub created_at: Option<DateTime<Utc>>,
}

/// The remote system's materialized resource for one launched product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionedProduct {
    /// Provisioned product identifier (the external state key).
    pub id: ProvisionedProductId,
    /// Display name of the provisioned product.
    pub name: String,
    /// Most recent provisioning record of any status.
    pub last_record_id: Option<RecordId>,
    /// Most recent successful provisioning record.
    pub last_successful_record_id: Option<RecordId>,
    /// When the product was provisioned.
    pub created_at: Option<DateTime<Utc>>,
}

impl ProvisionedProduct {
    /// The record to replay when deriving observed state.
    ///
    /// Prefers the latest successful record; falls back to the latest record
    /// of any status when no success exists yet.
    #[must_use]
    pub fn latest_record_id(&self) -> Option<&RecordId> {
        self.last_successful_record_id
            .as_ref()
            .or(self.last_record_id.as_ref())
    }

    /// Whether this product ever completed a successful provisioning run.
    #[must_use]
    pub fn ever_provisioned(&self) -> bool {
        self.last_successful_record_id.is_some()
    }
}

/// Request to provision a new product instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionRequest {
    /// Product to launch.
    pub product_id: ProductId,
    /// Artifact version to launch.
    pub artifact_id: ArtifactId,
    /// Name for the provisioned product instance.
    pub provisioned_product_name: String,
    /// Ordered provisioning parameters. Key names are a wire-format
    /// contract with the remote product and must not be altered.
    pub parameters: Vec<(String, String)>,
    /// Launch path, when the product has more than one.
    pub path_id: Option<String>,
}

/// Request to update an existing product instance in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProvisionRequest {
    /// Product instance to update.
    pub provisioned_product_id: ProvisionedProductId,
    /// Product the instance belongs to.
    pub product_id: ProductId,
    /// Artifact version to move to.
    pub artifact_id: ArtifactId,
    /// Ordered provisioning parameters (same contract as provision).
    pub parameters: Vec<(String, String)>,
    /// Launch path, when explicitly configured.
    pub path_id: Option<String>,
}

/// Immediate response to a mutating provisioning call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionResponse {
    /// The provisioned product the operation targets.
    pub provisioned_product_id: ProvisionedProductId,
    /// Tracking record for the asynchronous operation.
    pub record_id: RecordId,
}

/// The kind of node a directory parent link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParentType {
    /// An organizational unit.
    OrganizationalUnit,
    /// The organization root.
    Root,
}

/// One parent link of a directory node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parent {
    /// Identifier of the parent node.
    pub id: String,
    /// Kind of the parent node.
    pub parent_type: ParentType,
}

/// One page of a paginated parent listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentPage {
    /// Parents on this page.
    pub parents: Vec<Parent>,
    /// Continuation token for the next page, if any.
    pub next_token: Option<String>,
}

/// A directory account as returned by describe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    /// Account identifier.
    pub id: AccountId,
    /// Account name.
    pub name: String,
}

/// An organizational unit as returned by describe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationalUnit {
    /// OU identifier.
    pub id: String,
    /// OU display name.
    pub name: String,
}

/// An SSO instance, as listed by the identity service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SsoInstance {
    /// ARN of the SSO instance.
    pub instance_arn: String,
    /// Identity store backing the instance.
    pub identity_store_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_status_terminal() {
        assert!(RecordStatus::Succeeded.is_terminal());
        assert!(RecordStatus::Failed.is_terminal());
        assert!(!RecordStatus::Created.is_terminal());
        assert!(!RecordStatus::InProgress.is_terminal());
        assert!(!RecordStatus::InProgressInError.is_terminal());
    }

    #[test]
    fn test_record_status_display() {
        assert_eq!(RecordStatus::InProgress.to_string(), "IN_PROGRESS");
        assert_eq!(RecordStatus::Succeeded.to_string(), "SUCCEEDED");
    }

    #[test]
    fn test_latest_record_prefers_successful() {
        let product = ProvisionedProduct {
            id: ProvisionedProductId::new("pp-1"),
            name: "acme-sandbox".to_string(),
            last_record_id: Some(RecordId::new("rec-9")),
            last_successful_record_id: Some(RecordId::new("rec-7")),
            created_at: None,
        };
        assert_eq!(product.latest_record_id().unwrap().as_str(), "rec-7");
        assert!(product.ever_provisioned());
    }

    #[test]
    fn test_latest_record_falls_back_to_any_status() {
        let product = ProvisionedProduct {
            id: ProvisionedProductId::new("pp-1"),
            name: "acme-sandbox".to_string(),
            last_record_id: Some(RecordId::new("rec-9")),
            last_successful_record_id: None,
            created_at: None,
        };
        assert_eq!(product.latest_record_id().unwrap().as_str(), "rec-9");
        assert!(!product.ever_provisioned());
    }
}
