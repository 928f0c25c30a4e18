//! SSO identity client trait.

use async_trait::async_trait;

use crate::error::ClientResult;
use crate::ids::AccountId;
use crate::types::SsoInstance;

/// Client for the SSO admin and identity store services.
///
/// Used only by the best-effort account-assignment cleanup during updates;
/// the primary lifecycle never depends on it.
#[async_trait]
pub trait IdentityClient: Send + Sync {
    /// List the SSO instances visible to the caller.
    async fn list_sso_instances(&self) -> ClientResult<Vec<SsoInstance>>;

    /// Resolve a principal user id by email.
    async fn find_user_id_by_email(
        &self,
        identity_store_id: &str,
        email: &str,
    ) -> ClientResult<String>;

    /// Resolve a permission set ARN by display name.
    ///
    /// Implementations walk the (paginated) permission-set listing and
    /// describe each candidate until the name matches.
    async fn find_permission_set_arn(
        &self,
        instance_arn: &str,
        permission_set_name: &str,
    ) -> ClientResult<String>;

    /// Remove a user's account assignment for one permission set.
    async fn delete_account_assignment(
        &self,
        instance_arn: &str,
        account_id: &AccountId,
        permission_set_arn: &str,
        principal_user_id: &str,
    ) -> ClientResult<()>;
}
