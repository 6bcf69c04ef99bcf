//! Property-based tests for the document state machine.

use chrono::Utc;
use proptest::prelude::*;

use fiscus_shared::config::DocumentConfig;

use crate::document::machine::DocumentMachine;
use crate::document::types::DocumentStatus;

fn arb_status() -> impl Strategy<Value = DocumentStatus> {
    prop_oneof![
        Just(DocumentStatus::Draft),
        Just(DocumentStatus::Pending),
        Just(DocumentStatus::Authorized),
        Just(DocumentStatus::Cancelled),
    ]
}

fn arb_justification() -> impl Strategy<Value = String> {
    "[a-z ]{15,80}".prop_map(|s| s.trim().to_string())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Authorization never succeeds with an empty or blank protocol,
    /// whatever the current status.
    #[test]
    fn prop_authorized_requires_protocol(
        status in arb_status(),
        blanks in " {0,5}",
    ) {
        let result = DocumentMachine::authorize(status, blanks, Utc::now());
        prop_assert!(result.is_err());
    }

    /// Successful authorization happens only from Pending and always
    /// carries the protocol through.
    #[test]
    fn prop_authorize_only_from_pending(status in arb_status()) {
        let result = DocumentMachine::authorize(status, "135240000012345".to_string(), Utc::now());
        if status == DocumentStatus::Pending {
            prop_assert!(result.is_ok());
        } else {
            prop_assert!(result.is_err());
        }
    }

    /// Cancellation from Draft succeeds only on the override path; from
    /// Cancelled it never succeeds; Pending/Authorized need a protocol or
    /// the override flag.
    #[test]
    fn prop_cancel_paths(
        status in arb_status(),
        manual_override in any::<bool>(),
        with_protocol in any::<bool>(),
        justification in arb_justification(),
    ) {
        prop_assume!(justification.chars().count() >= 15);
        let protocol = with_protocol.then(|| "135240000099999".to_string());
        let result = DocumentMachine::cancel(
            status,
            protocol,
            justification,
            manual_override,
            &DocumentConfig::default(),
            Utc::now(),
        );

        let expect_ok = match status {
            DocumentStatus::Pending | DocumentStatus::Authorized => {
                with_protocol || manual_override
            }
            DocumentStatus::Draft => manual_override,
            DocumentStatus::Cancelled => false,
        };
        prop_assert_eq!(result.is_ok(), expect_ok);
    }

    /// Too-short justifications always fail before any transition check.
    #[test]
    fn prop_short_justification_always_fails(
        status in arb_status(),
        justification in "[a-z]{0,14}",
    ) {
        let result = DocumentMachine::cancel(
            status,
            Some("135240000099999".to_string()),
            justification,
            true,
            &DocumentConfig::default(),
            Utc::now(),
        );
        prop_assert!(result.is_err());
    }
}
