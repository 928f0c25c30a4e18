//! Output extraction.
//!
//! Provisioning records carry their results as an ordered list of generic
//! key/value pairs. Extraction is sparse and order-independent: known keys
//! are matched by name, unknown keys are ignored for forward compatibility,
//! and absence is explicit.

use controltower_client::ids::AccountId;
use controltower_client::types::RecordOutput;

use crate::error::{LifecycleError, LifecycleResult};

/// Output key carrying the directory account id.
pub const OUTPUT_ACCOUNT_ID: &str = "AccountId";
/// Output key carrying the account root email.
pub const OUTPUT_ACCOUNT_EMAIL: &str = "AccountEmail";
/// Output key carrying the SSO user email.
pub const OUTPUT_SSO_USER_EMAIL: &str = "SSOUserEmail";

/// The structured result extracted from a successful record's outputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordOutputs {
    /// Directory account id, when present.
    pub account_id: Option<AccountId>,
    /// Account root email, when present.
    pub account_email: Option<String>,
    /// SSO user email, when present.
    pub sso_email: Option<String>,
}

impl RecordOutputs {
    /// Extract the known keys from a record's output list.
    #[must_use]
    pub fn from_outputs(outputs: &[RecordOutput]) -> Self {
        let mut extracted = Self::default();
        for output in outputs {
            let Some(value) = &output.value else {
                continue;
            };
            match output.key.as_str() {
                OUTPUT_ACCOUNT_ID => extracted.account_id = Some(AccountId::new(value.clone())),
                OUTPUT_ACCOUNT_EMAIL => extracted.account_email = Some(value.clone()),
                OUTPUT_SSO_USER_EMAIL => extracted.sso_email = Some(value.clone()),
                _ => {}
            }
        }
        extracted
    }

    /// The account id, or a hard failure when the record never produced one.
    ///
    /// Without the account id the account cannot be resolved in the
    /// directory, so both Create and Read treat its absence as fatal.
    pub fn require_account_id(&self) -> LifecycleResult<&AccountId> {
        self.account_id.as_ref().ok_or(LifecycleError::MissingOutput {
            key: OUTPUT_ACCOUNT_ID,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_known_keys_ignores_unknown() {
        let outputs = vec![
            RecordOutput::new("SomethingNew", "ignored"),
            RecordOutput::new(OUTPUT_ACCOUNT_ID, "123456789012"),
            RecordOutput::new(OUTPUT_SSO_USER_EMAIL, "ada@acme.example"),
        ];
        let extracted = RecordOutputs::from_outputs(&outputs);
        assert_eq!(extracted.account_id.unwrap().as_str(), "123456789012");
        assert_eq!(extracted.sso_email.as_deref(), Some("ada@acme.example"));
        assert_eq!(extracted.account_email, None);
    }

    #[test]
    fn test_order_independent() {
        let forward = vec![
            RecordOutput::new(OUTPUT_ACCOUNT_ID, "1"),
            RecordOutput::new(OUTPUT_ACCOUNT_EMAIL, "a@b.c"),
        ];
        let backward = vec![
            RecordOutput::new(OUTPUT_ACCOUNT_EMAIL, "a@b.c"),
            RecordOutput::new(OUTPUT_ACCOUNT_ID, "1"),
        ];
        assert_eq!(
            RecordOutputs::from_outputs(&forward),
            RecordOutputs::from_outputs(&backward)
        );
    }

    #[test]
    fn test_missing_value_is_absent() {
        let outputs = vec![RecordOutput {
            key: OUTPUT_ACCOUNT_ID.to_string(),
            value: None,
        }];
        let extracted = RecordOutputs::from_outputs(&outputs);
        assert!(extracted.require_account_id().is_err());
    }

    #[test]
    fn test_require_account_id_error_names_key() {
        let err = RecordOutputs::default().require_account_id().unwrap_err();
        assert!(err.to_string().contains(OUTPUT_ACCOUNT_ID));
    }
}
