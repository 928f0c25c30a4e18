//! Organization directory client trait.

use async_trait::async_trait;

use crate::error::ClientResult;
use crate::ids::AccountId;
use crate::types::{AccountSummary, OrganizationalUnit, ParentPage, TagMap};

/// Client for the organization directory service.
///
/// Covers account lookup, parent navigation, account moves and closure, and
/// tag mutation. Read calls are safe to run concurrently; the engine never
/// serializes them.
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Describe an account.
    async fn describe_account(&self, account_id: &AccountId) -> ClientResult<AccountSummary>;

    /// List the parents of a node, one page at a time.
    ///
    /// Pass the `next_token` from the previous page to continue; `None`
    /// starts from the beginning.
    async fn list_parents(
        &self,
        child_id: &str,
        next_token: Option<&str>,
    ) -> ClientResult<ParentPage>;

    /// Describe an organizational unit.
    async fn describe_organizational_unit(
        &self,
        ou_id: &str,
    ) -> ClientResult<OrganizationalUnit>;

    /// Move an account from one parent to another.
    async fn move_account(
        &self,
        account_id: &AccountId,
        source_parent_id: &str,
        destination_parent_id: &str,
    ) -> ClientResult<()>;

    /// Close an account, beginning its suspension period.
    async fn close_account(&self, account_id: &AccountId) -> ClientResult<()>;

    /// Add or overwrite tags on a resource.
    async fn tag_resource(&self, account_id: &AccountId, tags: TagMap) -> ClientResult<()>;

    /// Remove tags from a resource by key.
    async fn untag_resource(&self, account_id: &AccountId, keys: Vec<String>)
        -> ClientResult<()>;

    /// List the tags on a resource.
    async fn list_tags_for_resource(&self, account_id: &AccountId) -> ClientResult<TagMap>;
}
