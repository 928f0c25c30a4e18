//! Type-safe identifiers for remote resources.
//!
//! Newtype wrappers over the opaque string identifiers issued by the
//! provisioning and directory services. Unlike internal identifiers these
//! are not UUIDs; the remote side owns their format (`prod-…`, `pa-…`,
//! `pp-…`, `rec-…`, twelve-digit account numbers) and we treat them as
//! opaque.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier string.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Get the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the raw string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id! {
    /// Identifier of a catalog product.
    ProductId
}

string_id! {
    /// Identifier of a provisioning artifact (a product version).
    ArtifactId
}

string_id! {
    /// Identifier of a provisioned product instance.
    ///
    /// Assigned once at creation, this is the permanent external state key
    /// for an account's lifecycle; it never changes across updates.
    ProvisionedProductId
}

string_id! {
    /// Identifier of one asynchronous provisioning record.
    RecordId
}

string_id! {
    /// Identifier of a directory account.
    AccountId
}
