//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `DocumentId` where a
//! `FinancialTitleId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(OrganizationId, "Unique identifier for an organization (legal entity).");
typed_id!(ActorId, "Unique identifier for a human or system actor.");
typed_id!(DocumentId, "Unique identifier for a fiscal document.");
typed_id!(FinancialTitleId, "Unique identifier for a financial title (payable or receivable).");
typed_id!(BankTransactionId, "Unique identifier for an imported bank statement line.");
typed_id!(ApprovalRequestId, "Unique identifier for an approval request.");
typed_id!(AllocationEntryId, "Unique identifier for an allocation entry.");
typed_id!(CostCenterId, "Unique identifier for a cost center.");
typed_id!(BankAccountId, "Unique identifier for a bank account.");

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_typed_id_roundtrip() {
        let uuid = Uuid::new_v4();
        let id = DocumentId::from_uuid(uuid);
        assert_eq!(id.into_inner(), uuid);
        assert_eq!(DocumentId::from_str(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn test_typed_id_new_is_unique() {
        assert_ne!(FinancialTitleId::new(), FinancialTitleId::new());
    }

    #[test]
    fn test_typed_id_from_str_error() {
        assert!(ActorId::from_str("not-a-uuid").is_err());
    }

    #[test]
    fn test_typed_id_serde_transparent() {
        let id = BankTransactionId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
    }
}
