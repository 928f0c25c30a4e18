//! Provisioning driver.
//!
//! Issues the three mutating provisioning calls and owns their
//! serialization. The remote provisioning service rejects overlapping
//! operations against the same launch path, so every mutating call acquires
//! a process-wide lock for the duration of the call itself. The lock scope
//! deliberately excludes the poll wait: unrelated accounts' poll loops must
//! not serialize behind each other.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, instrument};

use controltower_client::catalog::CatalogClient;
use controltower_client::ids::{ProvisionedProductId, RecordId};
use controltower_client::types::{ProvisionRequest, ProvisionResponse, UpdateProvisionRequest};

use crate::error::{LifecycleError, LifecycleResult};
use crate::resolver::ProductCoordinates;
use crate::state::AccountDesiredState;

/// Process-wide mutual exclusion for mutating provisioning calls.
///
/// Injectable so tests can assert serialization with an instrumented lock.
/// This is a global rate limit, not a per-resource lock: the launch-path
/// mechanism behind the provisioning service is shared.
pub type LaunchLock = Arc<Mutex<()>>;

/// Create a fresh launch lock.
#[must_use]
pub fn launch_lock() -> LaunchLock {
    Arc::new(Mutex::new(()))
}

/// Replace every character outside `[A-Za-z0-9._-]` with `_`.
///
/// Used to derive a provisioned product name from the account name when
/// none is configured. Idempotent.
#[must_use]
pub fn sanitize_product_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Map the desired state onto the product's provisioning parameters.
///
/// The key names are a wire-format contract with the remote product and
/// must not be altered.
fn provisioning_parameters(desired: &AccountDesiredState) -> Vec<(String, String)> {
    vec![
        ("AccountName".to_string(), desired.name.clone()),
        ("AccountEmail".to_string(), desired.email.clone()),
        ("SSOUserFirstName".to_string(), desired.sso.first_name.clone()),
        ("SSOUserLastName".to_string(), desired.sso.last_name.clone()),
        ("SSOUserEmail".to_string(), desired.sso.email.clone()),
        (
            "ManagedOrganizationalUnit".to_string(),
            desired.organizational_unit.clone(),
        ),
    ]
}

/// Driver for the three mutating provisioning operations.
///
/// Each call begins one remote asynchronous operation and returns its
/// tracking record id; completion is the poller's job. Transport errors are
/// wrapped with the account name and verb and surfaced without retry.
pub struct ProvisioningDriver {
    catalog: Arc<dyn CatalogClient>,
    launch_lock: LaunchLock,
}

impl ProvisioningDriver {
    /// Create a driver over a catalog client and a shared launch lock.
    pub fn new(catalog: Arc<dyn CatalogClient>, launch_lock: LaunchLock) -> Self {
        Self {
            catalog,
            launch_lock,
        }
    }

    /// Begin provisioning a new account.
    ///
    /// Returns the new provisioned product id and the tracking record.
    #[instrument(skip(self, desired, coordinates), fields(account = %desired.name))]
    pub async fn provision(
        &self,
        desired: &AccountDesiredState,
        coordinates: &ProductCoordinates,
    ) -> LifecycleResult<ProvisionResponse> {
        let provisioned_product_name = desired
            .provisioned_product_name
            .clone()
            .unwrap_or_else(|| sanitize_product_name(&desired.name));

        let request = ProvisionRequest {
            product_id: coordinates.product_id.clone(),
            artifact_id: coordinates.artifact_id.clone(),
            provisioned_product_name,
            parameters: provisioning_parameters(desired),
            path_id: desired.path_id.clone(),
        };

        let response = {
            let _guard = self.launch_lock.lock().await;
            self.catalog.provision_product(request).await
        }
        .map_err(|e| LifecycleError::transport("provisioning account", desired.name.clone(), e))?;

        debug!(
            provisioned_product_id = %response.provisioned_product_id,
            record_id = %response.record_id,
            "Provisioning started"
        );
        Ok(response)
    }

    /// Begin updating an existing account's provisioned product in place.
    #[instrument(skip(self, desired, coordinates), fields(account = %desired.name))]
    pub async fn reprovision(
        &self,
        provisioned_product_id: &ProvisionedProductId,
        desired: &AccountDesiredState,
        coordinates: &ProductCoordinates,
    ) -> LifecycleResult<RecordId> {
        let request = UpdateProvisionRequest {
            provisioned_product_id: provisioned_product_id.clone(),
            product_id: coordinates.product_id.clone(),
            artifact_id: coordinates.artifact_id.clone(),
            parameters: provisioning_parameters(desired),
            path_id: desired.path_id.clone(),
        };

        let response = {
            let _guard = self.launch_lock.lock().await;
            self.catalog.update_provisioned_product(request).await
        }
        .map_err(|e| {
            LifecycleError::transport("updating provisioned account", desired.name.clone(), e)
        })?;

        debug!(record_id = %response.record_id, "Reprovisioning started");
        Ok(response.record_id)
    }

    /// Begin terminating an account's provisioned product.
    #[instrument(skip(self), fields(account = %account_name))]
    pub async fn terminate(
        &self,
        provisioned_product_id: &ProvisionedProductId,
        account_name: &str,
    ) -> LifecycleResult<RecordId> {
        let response = {
            let _guard = self.launch_lock.lock().await;
            self.catalog
                .terminate_provisioned_product(provisioned_product_id)
                .await
        }
        .map_err(|e| {
            LifecycleError::transport("deleting provisioned account", account_name.to_string(), e)
        })?;

        debug!(record_id = %response.record_id, "Termination started");
        Ok(response.record_id)
    }
}
