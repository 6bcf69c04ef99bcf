//! Property-based tests for CFOP determination.

use proptest::prelude::*;

use crate::cfop::rules::{brazil_default_rules, determine};
use crate::cfop::types::{OperationNature, TaxpayerType, Uf};

const DOMESTIC_UFS: [&str; 8] = ["SP", "RJ", "MG", "RS", "BA", "PR", "SC", "PE"];

fn arb_uf() -> impl Strategy<Value = Uf> {
    prop::sample::select(DOMESTIC_UFS.as_slice()).prop_map(|code| Uf::new(code).unwrap())
}

fn arb_nature() -> impl Strategy<Value = OperationNature> {
    prop_oneof![
        Just(OperationNature::Sale),
        Just(OperationNature::Return),
        Just(OperationNature::Transfer),
        Just(OperationNature::Shipment),
        Just(OperationNature::SymbolicReturn),
    ]
}

fn arb_taxpayer() -> impl Strategy<Value = TaxpayerType> {
    prop_oneof![
        Just(TaxpayerType::IcmsTaxpayer),
        Just(TaxpayerType::NonTaxpayer),
        Just(TaxpayerType::ForeignEntity),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Determination is a pure function: repeated calls with identical
    /// inputs always resolve the same code and justification.
    #[test]
    fn prop_determination_is_deterministic(
        origin in arb_uf(),
        destination in arb_uf(),
        nature in arb_nature(),
        taxpayer in arb_taxpayer(),
    ) {
        let rules = brazil_default_rules();
        let first = determine(origin, destination, nature, taxpayer, &rules);
        let second = determine(origin, destination, nature, taxpayer, &rules);
        match (first, second) {
            (Ok(a), Ok(b)) => {
                prop_assert_eq!(a.code, b.code);
                prop_assert_eq!(a.justification.rule_description, b.justification.rule_description);
            }
            (Err(_), Err(_)) => {}
            _ => prop_assert!(false, "determinism violated"),
        }
    }

    /// Domestic pairs always resolve: the intra/interstate fallbacks
    /// guarantee coverage for any nature and taxpayer type.
    #[test]
    fn prop_domestic_pairs_always_resolve(
        origin in arb_uf(),
        destination in arb_uf(),
        nature in arb_nature(),
        taxpayer in arb_taxpayer(),
    ) {
        let rules = brazil_default_rules();
        let result = determine(origin, destination, nature, taxpayer, &rules);
        prop_assert!(result.is_ok());
        let determination = result.unwrap();
        // Domestic resolutions never produce a foreign-group code.
        prop_assert_ne!(determination.code.first_digit(), 3);
        prop_assert_ne!(determination.code.first_digit(), 7);
    }

    /// Rule-order shuffling never changes the winner.
    #[test]
    fn prop_rule_order_is_irrelevant(
        origin in arb_uf(),
        destination in arb_uf(),
        nature in arb_nature(),
        taxpayer in arb_taxpayer(),
        seed in any::<u64>(),
    ) {
        let rules = brazil_default_rules();
        let mut shuffled = rules.clone();
        // Deterministic rotation keyed by the seed stands in for a shuffle.
        let split = (seed as usize) % shuffled.len();
        shuffled.rotate_left(split);

        let a = determine(origin, destination, nature, taxpayer, &rules).unwrap();
        let b = determine(origin, destination, nature, taxpayer, &shuffled).unwrap();
        prop_assert_eq!(a.code, b.code);
    }
}
