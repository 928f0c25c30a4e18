//! Directory navigation.
//!
//! Resolves an account's current parent OU and organization root by walking
//! the paginated parent-link listing. Both walks run fresh on every call:
//! OU membership can change outside this resource's own update path, so
//! nothing here is cached.

use tracing::instrument;

use controltower_client::directory::DirectoryClient;
use controltower_client::ids::AccountId;
use controltower_client::types::{OrganizationalUnit, ParentType};

use crate::error::{LifecycleError, LifecycleResult};

/// Walk the parent listing for the first parent of the wanted type.
async fn find_parent_of_type(
    directory: &dyn DirectoryClient,
    account_id: &AccountId,
    wanted: ParentType,
) -> LifecycleResult<Option<String>> {
    let mut next_token: Option<String> = None;
    loop {
        let page = directory
            .list_parents(account_id.as_str(), next_token.as_deref())
            .await
            .map_err(|e| {
                LifecycleError::transport(
                    "reading parents for",
                    account_id.as_str().to_string(),
                    e,
                )
            })?;

        if let Some(parent) = page.parents.into_iter().find(|p| p.parent_type == wanted) {
            return Ok(Some(parent.id));
        }

        match page.next_token {
            Some(token) => next_token = Some(token),
            None => return Ok(None),
        }
    }
}

/// Resolve the organizational unit currently parenting an account.
#[instrument(skip(directory))]
pub async fn find_parent_organizational_unit(
    directory: &dyn DirectoryClient,
    account_id: &AccountId,
) -> LifecycleResult<OrganizationalUnit> {
    let ou_id = find_parent_of_type(directory, account_id, ParentType::OrganizationalUnit)
        .await?
        .ok_or_else(|| LifecycleError::NoParentOu {
            account_id: account_id.as_str().to_string(),
        })?;

    directory
        .describe_organizational_unit(&ou_id)
        .await
        .map_err(|e| LifecycleError::transport("describing parent OU", ou_id, e))
}

/// Resolve the organization root currently parenting an account.
#[instrument(skip(directory))]
pub async fn find_organization_root_id(
    directory: &dyn DirectoryClient,
    account_id: &AccountId,
) -> LifecycleResult<String> {
    find_parent_of_type(directory, account_id, ParentType::Root)
        .await?
        .ok_or_else(|| LifecycleError::NoRootParent {
            account_id: account_id.as_str().to_string(),
        })
}
