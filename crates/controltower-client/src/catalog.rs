//! Provisioning catalog client trait.

use async_trait::async_trait;

use crate::error::ClientResult;
use crate::ids::{ProductId, ProvisionedProductId, RecordId};
use crate::types::{
    ProductSummary, ProvisionedProduct, ProvisioningArtifact, ProvisioningRecord,
    ProvisionRequest, ProvisionResponse, RecordSummary, UpdateProvisionRequest,
};

/// Client for the product-provisioning service.
///
/// Implementations wrap the remote catalog API. All calls are one-shot; the
/// engine owns sequencing, polling and retry decisions.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Search products by full-text filter.
    async fn search_products(&self, full_text_filter: &str)
        -> ClientResult<Vec<ProductSummary>>;

    /// List the provisioning artifacts (versions) of a product.
    async fn list_provisioning_artifacts(
        &self,
        product_id: &ProductId,
    ) -> ClientResult<Vec<ProvisioningArtifact>>;

    /// Begin provisioning a new product instance.
    ///
    /// Returns immediately with the new instance id and the tracking record
    /// for the asynchronous operation.
    async fn provision_product(&self, request: ProvisionRequest)
        -> ClientResult<ProvisionResponse>;

    /// Begin updating an existing product instance in place.
    async fn update_provisioned_product(
        &self,
        request: UpdateProvisionRequest,
    ) -> ClientResult<ProvisionResponse>;

    /// Begin terminating a product instance.
    async fn terminate_provisioned_product(
        &self,
        provisioned_product_id: &ProvisionedProductId,
    ) -> ClientResult<ProvisionResponse>;

    /// Describe a provisioned product instance.
    ///
    /// Must surface a vanished instance as [`ClientError::NotFound`]
    /// (`ClientError::is_not_found`); the engine's drift handling depends on
    /// that classification.
    ///
    /// [`ClientError::NotFound`]: crate::error::ClientError::NotFound
    async fn describe_provisioned_product(
        &self,
        provisioned_product_id: &ProvisionedProductId,
    ) -> ClientResult<ProvisionedProduct>;

    /// Describe one asynchronous operation record.
    async fn describe_record(&self, record_id: &RecordId) -> ClientResult<ProvisioningRecord>;

    /// List past operation records matching a search filter.
    ///
    /// The filter follows the same full-text convention as
    /// [`search_products`](Self::search_products), e.g.
    /// `"provisionedproduct:pp-abc123"`. Returns newest first.
    async fn list_record_history(&self, filter: &str) -> ClientResult<Vec<RecordSummary>>;
}
