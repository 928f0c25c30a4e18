//! Product resolution.
//!
//! Locates the account factory product and its single active artifact. Pure
//! lookup with a strict cardinality invariant; no caching across operations,
//! since artifacts can be revised between calls.

use tracing::{debug, instrument};

use controltower_client::catalog::CatalogClient;
use controltower_client::ids::{ArtifactId, ProductId};

use crate::error::{LifecycleError, LifecycleResult};

/// Fixed full-text search filter for the account provisioning product.
pub const ACCOUNT_FACTORY_PRODUCT_NAME: &str = "AWS Control Tower Account Factory";

/// The resolved product and artifact to provision with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCoordinates {
    /// The account factory product.
    pub product_id: ProductId,
    /// Its active artifact version.
    pub artifact_id: ArtifactId,
}

/// Find the account factory product and its active artifact.
///
/// Fails with [`LifecycleError::AmbiguousProduct`] unless the search matches
/// exactly one product, and with [`LifecycleError::NoActiveArtifact`] when
/// no artifact is flagged active.
#[instrument(skip(catalog))]
pub async fn resolve_account_factory_product(
    catalog: &dyn CatalogClient,
) -> LifecycleResult<ProductCoordinates> {
    let products = catalog
        .search_products(ACCOUNT_FACTORY_PRODUCT_NAME)
        .await
        .map_err(|e| {
            LifecycleError::transport("searching for", "the account factory product", e)
        })?;

    if products.len() != 1 {
        return Err(LifecycleError::AmbiguousProduct {
            matches: products.len(),
        });
    }
    let Some(product) = products.into_iter().next() else {
        return Err(LifecycleError::AmbiguousProduct { matches: 0 });
    };
    let product_id = product.id;

    let artifacts = catalog
        .list_provisioning_artifacts(&product_id)
        .await
        .map_err(|e| {
            LifecycleError::transport("listing artifacts of", product_id.as_str().to_string(), e)
        })?;

    let artifact_id = artifacts
        .into_iter()
        .find(|a| a.active)
        .map(|a| a.id)
        .ok_or_else(|| LifecycleError::NoActiveArtifact {
            product_id: product_id.clone(),
        })?;

    debug!(
        product_id = %product_id,
        artifact_id = %artifact_id,
        "Resolved account factory product"
    );

    Ok(ProductCoordinates {
        product_id,
        artifact_id,
    })
}
