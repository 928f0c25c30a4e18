//! Desired and observed account state.
//!
//! The desired state arrives from the configuration layer once per
//! operation; the engine never persists it. `name`, `email`,
//! `provisioned_product_name` and `path_id` are fixed at creation: changing
//! any of them invalidates the resource identity and requires a full
//! recreation, which the caller enforces before invoking the engine.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use controltower_client::ids::AccountId;
use controltower_client::types::TagMap;

use crate::error::{LifecycleError, LifecycleResult};

/// Permission set assigned when none is configured.
pub const DEFAULT_PERMISSION_SET: &str = "AWSAdministratorAccess";

/// Loose email shape check: one `@`, non-empty local part, dotted domain.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("EMAIL_REGEX is a valid pattern")
});

/// Launch path ids are alphanumeric with underscores and hyphens.
static PATH_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]*$").expect("PATH_ID_REGEX is a valid pattern"));

/// Provisioned product names start alphanumeric and stay in a safe charset.
static PRODUCT_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9._-]*$").expect("PRODUCT_NAME_REGEX is a valid pattern")
});

/// Destination OU ids follow the directory service's `ou-` format.
static OU_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ou-[0-9a-z]{4,32}-[a-z0-9]{8,32}$").expect("OU_ID_REGEX is a valid pattern")
});

/// SSO user profile assigned to the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SsoUserAssignment {
    /// First name of the user.
    pub first_name: String,
    /// Last name of the user.
    pub last_name: String,
    /// Email address of the user.
    pub email: String,
    /// Permission set granted to the user.
    #[serde(default = "default_permission_set")]
    pub permission_set_name: String,
    /// Remove the old user's account assignment when the SSO user changes.
    #[serde(default)]
    pub remove_account_assignment_on_update: bool,
}

fn default_permission_set() -> String {
    DEFAULT_PERMISSION_SET.to_string()
}

/// The declared configuration for one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountDesiredState {
    /// Name of the account. Fixed at creation.
    pub name: String,
    /// Root email of the account. Fixed at creation.
    pub email: String,
    /// Assigned SSO user.
    pub sso: SsoUserAssignment,
    /// Name of the organizational unit the account lives under.
    pub organizational_unit: String,
    /// Resource tags for the account.
    #[serde(default)]
    pub tags: TagMap,
    /// Launch path id. Fixed at creation; required only when the product
    /// has more than one path.
    #[serde(default)]
    pub path_id: Option<String>,
    /// Explicit provisioned product name. Fixed at creation; defaults to a
    /// sanitized version of the account name.
    #[serde(default)]
    pub provisioned_product_name: Option<String>,
    /// OU the account is moved to when the resource is deleted.
    #[serde(default)]
    pub organizational_unit_id_on_delete: Option<String>,
    /// Close the account on deletion instead of only unenrolling it.
    #[serde(default)]
    pub close_account_on_delete: bool,
}

impl AccountDesiredState {
    /// Validate the declared configuration at the engine boundary.
    pub fn validate(&self) -> LifecycleResult<()> {
        if self.name.is_empty() || !self.name.bytes().all(|b| (0x20..=0x7e).contains(&b)) {
            return Err(LifecycleError::validation(
                "name",
                "must be non-empty printable ASCII (space through tilde)",
            ));
        }
        if !EMAIL_REGEX.is_match(&self.email) {
            return Err(LifecycleError::validation(
                "email",
                format!("{:?} is not a valid email address", self.email),
            ));
        }
        if !EMAIL_REGEX.is_match(&self.sso.email) {
            return Err(LifecycleError::validation(
                "sso.email",
                format!("{:?} is not a valid email address", self.sso.email),
            ));
        }
        if let Some(path_id) = &self.path_id {
            if !PATH_ID_REGEX.is_match(path_id) {
                return Err(LifecycleError::validation(
                    "path_id",
                    "must only contain alphanumeric characters, underscores and hyphens",
                ));
            }
        }
        if let Some(name) = &self.provisioned_product_name {
            if !PRODUCT_NAME_REGEX.is_match(name) {
                return Err(LifecycleError::validation(
                    "provisioned_product_name",
                    "must start alphanumeric and only contain alphanumeric characters, \
                     dots, underscores and hyphens",
                ));
            }
        }
        if let Some(ou_id) = &self.organizational_unit_id_on_delete {
            if !OU_ID_REGEX.is_match(ou_id) {
                return Err(LifecycleError::validation(
                    "organizational_unit_id_on_delete",
                    format!("{ou_id:?} is not a valid organizational unit id"),
                ));
            }
        }
        Ok(())
    }

    /// Whether moving from `prior` to this state needs a reprovisioning
    /// call.
    ///
    /// Tags and the two on-delete knobs are reconciled without touching the
    /// provisioning service; any other change goes through it.
    #[must_use]
    pub fn requires_reprovision(&self, prior: &AccountDesiredState) -> bool {
        let mut a = self.clone();
        let mut b = prior.clone();
        a.tags = TagMap::new();
        b.tags = TagMap::new();
        a.organizational_unit_id_on_delete = None;
        b.organizational_unit_id_on_delete = None;
        a.close_account_on_delete = false;
        b.close_account_on_delete = false;
        a != b
    }
}

/// The authoritative actual state, derived by replaying the latest
/// successful provisioning record and cross-referencing the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountObservedState {
    /// Directory account id.
    pub account_id: AccountId,
    /// Account name as the directory reports it.
    pub name: String,
    /// Root email as the provisioning outputs report it.
    pub email: Option<String>,
    /// SSO user email as the provisioning outputs report it.
    pub sso_email: Option<String>,
    /// Name of the OU currently parenting the account.
    pub organizational_unit: String,
    /// Tags currently on the account.
    pub tags: TagMap,
    /// Name of the provisioned product instance.
    pub provisioned_product_name: String,
    /// Launch path the last record ran through.
    pub path_id: Option<String>,
}
