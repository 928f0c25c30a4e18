//! SSO account-assignment cleanup.
//!
//! When the configured SSO user changes and the desired state opts in, the
//! old user's account assignment is removed so stale access does not
//! accumulate. This is an auxiliary step scoped apart from the core
//! lifecycle: its failures are surfaced but never undo the primary update.

use tracing::{debug, instrument};

use controltower_client::error::ClientError;
use controltower_client::identity::IdentityClient;
use controltower_client::ids::AccountId;

use crate::error::{LifecycleError, LifecycleResult};

/// Remove the previous SSO user's account assignment.
///
/// No-op when the email did not actually change. Resolves the SSO instance,
/// the old principal and the permission set before deleting the assignment.
#[instrument(skip(identity), fields(account_id = %account_id))]
pub async fn remove_previous_assignment(
    identity: &dyn IdentityClient,
    account_id: &AccountId,
    permission_set_name: &str,
    old_email: &str,
    new_email: &str,
) -> LifecycleResult<()> {
    if old_email == new_email {
        return Ok(());
    }

    let subject = account_id.as_str();

    let instances = identity.list_sso_instances().await.map_err(|e| {
        LifecycleError::transport("listing SSO instances for", subject.to_string(), e)
    })?;
    let Some(instance) = instances.into_iter().next() else {
        return Err(LifecycleError::transport(
            "listing SSO instances for",
            subject.to_string(),
            ClientError::invalid_response("no SSO instances available"),
        ));
    };

    let principal_user_id = identity
        .find_user_id_by_email(&instance.identity_store_id, old_email)
        .await
        .map_err(|e| {
            LifecycleError::transport("resolving previous SSO user for", subject.to_string(), e)
        })?;

    let permission_set_arn = identity
        .find_permission_set_arn(&instance.instance_arn, permission_set_name)
        .await
        .map_err(|e| {
            LifecycleError::transport("resolving permission set for", subject.to_string(), e)
        })?;

    identity
        .delete_account_assignment(
            &instance.instance_arn,
            account_id,
            &permission_set_arn,
            &principal_user_id,
        )
        .await
        .map_err(|e| {
            LifecycleError::transport(
                "unassigning previous SSO user from",
                subject.to_string(),
                e,
            )
        })?;

    debug!(old_email, "Removed previous SSO account assignment");
    Ok(())
}
