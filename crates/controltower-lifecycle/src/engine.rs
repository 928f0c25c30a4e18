//! Lifecycle orchestration.
//!
//! The four entry points the configuration/transport layer calls. Each
//! operation is one independent sequential pass: resolve, mutate, poll,
//! compensate, observe. Operations for different accounts may run
//! concurrently; only the mutating provisioning calls themselves serialize
//! behind the shared [`LaunchLock`].

use std::sync::Arc;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use controltower_client::catalog::CatalogClient;
use controltower_client::directory::DirectoryClient;
use controltower_client::error::ClientError;
use controltower_client::identity::IdentityClient;
use controltower_client::ids::ProvisionedProductId;
use controltower_client::types::TagMap;

use crate::driver::{launch_lock, LaunchLock, ProvisioningDriver};
use crate::error::{LifecycleError, LifecycleResult};
use crate::navigator::{find_organization_root_id, find_parent_organizational_unit};
use crate::outputs::RecordOutputs;
use crate::poller::{PollConfig, RecordPoller};
use crate::resolver::resolve_account_factory_product;
use crate::sso::remove_previous_assignment;
use crate::state::{AccountDesiredState, AccountObservedState};
use crate::tags::reconcile_tags;

/// Result of a successful Create.
#[derive(Debug, Clone)]
pub struct CreateOutcome {
    /// The permanent external state key for this account's lifecycle.
    pub external_id: ProvisionedProductId,
    /// The observed state right after creation.
    pub observed: AccountObservedState,
}

/// A failed Create, retaining the external identifier when one was already
/// assigned.
///
/// The identifier is set as soon as the provisioning call returns, before
/// polling. When polling later fails, the caller keeps a reference to the
/// tainted remote resource and can clean it up with a subsequent Delete.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct CreateError {
    /// External identifier of the partially created resource, if assigned.
    pub external_id: Option<ProvisionedProductId>,
    /// The underlying failure.
    #[source]
    pub source: LifecycleError,
}

/// Result of a Read.
#[derive(Debug, Clone)]
pub enum ReadOutcome {
    /// The resource exists; every observed field was refreshed.
    Present(AccountObservedState),
    /// The resource vanished remotely (drift). Not an error: the caller
    /// should clear the stored external identifier and treat the account
    /// as gone.
    Absent,
}

/// The account lifecycle engine.
///
/// Holds the injected remote clients and exposes exactly four operations:
/// [`create`](Self::create), [`read`](Self::read), [`update`](Self::update)
/// and [`delete`](Self::delete).
pub struct AccountLifecycle {
    catalog: Arc<dyn CatalogClient>,
    directory: Arc<dyn DirectoryClient>,
    identity: Option<Arc<dyn IdentityClient>>,
    driver: ProvisioningDriver,
    poller: RecordPoller,
}

impl AccountLifecycle {
    /// Create an engine with a fresh launch lock and default polling.
    pub fn new(catalog: Arc<dyn CatalogClient>, directory: Arc<dyn DirectoryClient>) -> Self {
        let lock = launch_lock();
        Self {
            driver: ProvisioningDriver::new(catalog.clone(), lock),
            poller: RecordPoller::new(catalog.clone(), PollConfig::default()),
            catalog,
            directory,
            identity: None,
        }
    }

    /// Share a launch lock with other engine instances in this process.
    ///
    /// The serialization of mutating provisioning calls is process-wide;
    /// callers running one engine per resource must pass the same lock to
    /// all of them.
    #[must_use]
    pub fn with_launch_lock(mut self, lock: LaunchLock) -> Self {
        self.driver = ProvisioningDriver::new(self.catalog.clone(), lock);
        self
    }

    /// Override the polling interval and per-operation deadline.
    #[must_use]
    pub fn with_poll_config(mut self, config: PollConfig) -> Self {
        self.poller = RecordPoller::new(self.catalog.clone(), config);
        self
    }

    /// Attach an identity client, enabling SSO assignment cleanup on Update.
    #[must_use]
    pub fn with_identity(mut self, identity: Arc<dyn IdentityClient>) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Provision a new account and drive it to a terminal state.
    ///
    /// On failure after the provisioning call returned, the error carries
    /// the already-assigned external identifier so the caller can track the
    /// tainted remote resource.
    #[instrument(skip(self, desired, cancel), fields(account = %desired.name))]
    pub async fn create(
        &self,
        desired: &AccountDesiredState,
        cancel: &CancellationToken,
    ) -> Result<CreateOutcome, CreateError> {
        desired.validate().map_err(|e| CreateError {
            external_id: None,
            source: e,
        })?;

        let coordinates = resolve_account_factory_product(self.catalog.as_ref())
            .await
            .map_err(|e| CreateError {
                external_id: None,
                source: e,
            })?;

        let response = self
            .driver
            .provision(desired, &coordinates)
            .await
            .map_err(|e| CreateError {
                external_id: None,
                source: e,
            })?;

        // From here on the remote resource exists; every failure must hand
        // the identifier back for cleanup.
        let external_id = response.provisioned_product_id;
        let fail = |source: LifecycleError| CreateError {
            external_id: Some(external_id.clone()),
            source,
        };

        let record = self
            .poller
            .wait_for_completion(&response.record_id, &desired.name, "creation", cancel)
            .await
            .map_err(&fail)?;

        let outputs = RecordOutputs::from_outputs(&record.outputs);
        let account_id = outputs.require_account_id().map_err(&fail)?.clone();

        if !desired.tags.is_empty() {
            reconcile_tags(
                self.directory.as_ref(),
                &account_id,
                &TagMap::new(),
                &desired.tags,
            )
            .await
            .map_err(&fail)?;
        }

        let observed = self.observe(&external_id).await.map_err(&fail)?;

        info!(
            external_id = %external_id,
            account_id = %observed.account_id,
            "Account created"
        );
        Ok(CreateOutcome {
            external_id,
            observed,
        })
    }

    /// Refresh every observed field from the remote side.
    ///
    /// Pass `last_known` for a previously established resource; when the
    /// provisioned product is gone remotely this then reports
    /// [`ReadOutcome::Absent`] instead of an error. A fresh resource
    /// (`last_known = None`) surfaces the not-found as a transport error.
    /// Read never mutates the remote system.
    #[instrument(skip(self, last_known), fields(external_id = %external_id))]
    pub async fn read(
        &self,
        external_id: &ProvisionedProductId,
        last_known: Option<&AccountObservedState>,
    ) -> LifecycleResult<ReadOutcome> {
        match self.observe(external_id).await {
            Ok(observed) => Ok(ReadOutcome::Present(observed)),
            Err(LifecycleError::Transport { source, .. })
                if source.is_not_found() && last_known.is_some() =>
            {
                info!("Provisioned product vanished remotely, reporting drift to absent");
                Ok(ReadOutcome::Absent)
            }
            Err(e) => Err(e),
        }
    }

    /// Reconcile the desired state against the remote side.
    ///
    /// Reprovisions when any field other than tags and the on-delete knobs
    /// changed; otherwise only the tag diff is applied. Optionally removes
    /// the previous SSO user's account assignment. Always finishes with a
    /// fresh Read.
    #[instrument(skip(self, desired, prior, observed, cancel), fields(account = %desired.name))]
    pub async fn update(
        &self,
        external_id: &ProvisionedProductId,
        desired: &AccountDesiredState,
        prior: &AccountDesiredState,
        observed: &AccountObservedState,
        cancel: &CancellationToken,
    ) -> LifecycleResult<AccountObservedState> {
        desired.validate()?;

        if desired.requires_reprovision(prior) {
            // Artifacts may have been revised since creation; resolve again.
            let coordinates = resolve_account_factory_product(self.catalog.as_ref()).await?;
            let record_id = self
                .driver
                .reprovision(external_id, desired, &coordinates)
                .await?;
            self.poller
                .wait_for_completion(&record_id, &desired.name, "update", cancel)
                .await?;
        }

        if desired.tags != prior.tags {
            reconcile_tags(
                self.directory.as_ref(),
                &observed.account_id,
                &prior.tags,
                &desired.tags,
            )
            .await?;
        }

        if desired.sso.remove_account_assignment_on_update && desired.sso != prior.sso {
            match &self.identity {
                Some(identity) => {
                    remove_previous_assignment(
                        identity.as_ref(),
                        &observed.account_id,
                        &desired.sso.permission_set_name,
                        &prior.sso.email,
                        &desired.sso.email,
                    )
                    .await
                    .map_err(|e| {
                        LifecycleError::auxiliary(
                            "sso-unassign",
                            observed.account_id.as_str().to_string(),
                            e,
                        )
                    })?;
                }
                None => {
                    warn!("SSO assignment cleanup requested but no identity client configured");
                }
            }
        }

        self.observe(external_id).await
    }

    /// Terminate the account's provisioned product and run the configured
    /// compensations.
    ///
    /// The post-delete OU move runs before account closure: a closed
    /// account needs no further placement, while the reverse order could
    /// leave a closing account incorrectly parented. Both compensations
    /// fail loud as [`LifecycleError::Auxiliary`]; the termination itself
    /// is never undone.
    #[instrument(skip(self, desired, last_observed, cancel), fields(account = %desired.name))]
    pub async fn delete(
        &self,
        external_id: &ProvisionedProductId,
        desired: &AccountDesiredState,
        last_observed: Option<&AccountObservedState>,
        cancel: &CancellationToken,
    ) -> LifecycleResult<()> {
        // Captured before termination: whether the product ever provisioned
        // successfully decides if the compensations apply.
        let product = self
            .catalog
            .describe_provisioned_product(external_id)
            .await
            .map_err(|e| {
                LifecycleError::transport(
                    "describing provisioned product of",
                    desired.name.clone(),
                    e,
                )
            })?;
        let ever_provisioned = product.ever_provisioned();

        let record_id = self.driver.terminate(external_id, &desired.name).await?;
        self.poller
            .wait_for_completion(&record_id, &desired.name, "deletion", cancel)
            .await?;

        let account_id = last_observed.map(|o| &o.account_id);

        if let (Some(target_ou), Some(account_id)) =
            (&desired.organizational_unit_id_on_delete, account_id)
        {
            if ever_provisioned {
                let subject = account_id.as_str().to_string();
                let root_id = find_organization_root_id(self.directory.as_ref(), account_id)
                    .await
                    .map_err(|e| LifecycleError::auxiliary("move-to-ou", subject.clone(), e))?;
                self.directory
                    .move_account(account_id, &root_id, target_ou)
                    .await
                    .map_err(|e| {
                        LifecycleError::auxiliary(
                            "move-to-ou",
                            subject.clone(),
                            LifecycleError::transport("moving account", subject.clone(), e),
                        )
                    })?;
                info!(target_ou = %target_ou, "Moved account to post-delete OU");
            }
        }

        if desired.close_account_on_delete && ever_provisioned {
            if let Some(account_id) = account_id {
                let subject = account_id.as_str().to_string();
                self.directory
                    .close_account(account_id)
                    .await
                    .map_err(|e| {
                        LifecycleError::auxiliary(
                            "close-account",
                            subject.clone(),
                            LifecycleError::transport("closing account", subject.clone(), e),
                        )
                    })?;
                info!("Account closure initiated");
            }
        }

        info!(external_id = %external_id, "Account deleted");
        Ok(())
    }

    /// Derive the observed state by replaying the latest successful record
    /// and cross-referencing the directory.
    async fn observe(
        &self,
        external_id: &ProvisionedProductId,
    ) -> LifecycleResult<AccountObservedState> {
        let product = self
            .catalog
            .describe_provisioned_product(external_id)
            .await
            .map_err(|e| {
                LifecycleError::transport(
                    "reading configuration of provisioned product",
                    external_id.as_str().to_string(),
                    e,
                )
            })?;

        let record_id = product.latest_record_id().ok_or_else(|| {
            LifecycleError::transport(
                "reading records of provisioned product",
                external_id.as_str().to_string(),
                ClientError::invalid_response("provisioned product has no provisioning records"),
            )
        })?;

        let record = self.catalog.describe_record(record_id).await.map_err(|e| {
            LifecycleError::transport(
                "reading last record of provisioned product",
                external_id.as_str().to_string(),
                e,
            )
        })?;

        let outputs = RecordOutputs::from_outputs(&record.outputs);
        let account_id = outputs.require_account_id()?.clone();

        let account = self
            .directory
            .describe_account(&account_id)
            .await
            .map_err(|e| {
                LifecycleError::transport(
                    "reading account information for",
                    account_id.as_str().to_string(),
                    e,
                )
            })?;

        let ou = find_parent_organizational_unit(self.directory.as_ref(), &account_id).await?;

        let tags = self
            .directory
            .list_tags_for_resource(&account_id)
            .await
            .map_err(|e| {
                LifecycleError::transport(
                    "listing tags for",
                    account_id.as_str().to_string(),
                    e,
                )
            })?;

        Ok(AccountObservedState {
            account_id,
            name: account.name,
            email: outputs.account_email,
            sso_email: outputs.sso_email,
            organizational_unit: ou.name,
            tags,
            provisioned_product_name: product.name,
            path_id: record.path_id,
        })
    }
}
