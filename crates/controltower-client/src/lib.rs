//! # Control Tower Client Abstractions
//!
//! Remote service interfaces consumed by the account lifecycle engine.
//!
//! AWS Control Tower provisions accounts through a Service Catalog product
//! (the "Account Factory") and places them in AWS Organizations. The engine
//! never constructs service clients itself; it is handed implementations of
//! the traits in this crate:
//!
//! - [`CatalogClient`] - product search, provisioning, record polling and
//!   termination against the provisioning service
//! - [`DirectoryClient`] - account lookup, parent/OU navigation, moves,
//!   closure and tag mutation against the organization directory
//! - [`IdentityClient`] - SSO instance, principal and permission-set lookups
//!   plus account-assignment removal
//!
//! Production implementations wrap the AWS SDK; tests substitute hand-rolled
//! mocks. All identifiers are opaque strings issued by the remote side and
//! are wrapped in newtypes (see [`ids`]).

pub mod catalog;
pub mod directory;
pub mod error;
pub mod identity;
pub mod ids;
pub mod types;

/// Prelude module for convenient imports.
///
/// ```
/// use controltower_client::prelude::*;
/// ```
pub mod prelude {
    pub use crate::catalog::CatalogClient;
    pub use crate::directory::DirectoryClient;
    pub use crate::error::{ClientError, ClientResult};
    pub use crate::identity::IdentityClient;
    pub use crate::ids::{AccountId, ArtifactId, ProductId, ProvisionedProductId, RecordId};
    pub use crate::types::{
        AccountSummary, OrganizationalUnit, Parent, ParentPage, ParentType, ProductSummary,
        ProvisionedProduct, ProvisioningArtifact, ProvisioningRecord, ProvisionRequest,
        ProvisionResponse, RecordError, RecordOutput, RecordStatus, RecordSummary, SsoInstance,
        TagMap, UpdateProvisionRequest,
    };
}
