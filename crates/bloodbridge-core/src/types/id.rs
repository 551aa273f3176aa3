//! Newtype wrappers for server-assigned identifiers.
//!
//! The backend hands out opaque identifiers (integers on the current
//! deployment). They are kept as strings so the client never does arithmetic
//! on them, and distinct types prevent passing a `DonorId` where a
//! `RequestId` is expected.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Accepts either a JSON string or a JSON integer.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

/// Macro to define an opaque identifier newtype.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an identifier from its textual form.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Return the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                Ok(match RawId::deserialize(deserializer)? {
                    RawId::Text(s) => Self(s),
                    RawId::Number(n) => Self(n.to_string()),
                })
            }
        }
    };
}

define_id!(
    /// Identifier of a blood request.
    RequestId
);

define_id!(
    /// Identifier of a registered donor.
    DonorId
);

define_id!(
    /// Identifier of a recorded donation.
    DonationId
);
