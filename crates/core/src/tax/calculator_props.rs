//! Property-based tests for the withholding calculator.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use fiscus_shared::config::TaxConfig;

use crate::cfop::Uf;
use crate::tax::calculator::WithholdingCalculator;
use crate::tax::tables::RateTable;
use crate::tax::types::{ServiceCategory, TaxRegime, TaxableTransaction};

/// Strategy for amounts between 0.00 and 1,000,000.00 BRL.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0i64..=100_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn arb_category() -> impl Strategy<Value = ServiceCategory> {
    prop_oneof![
        Just(ServiceCategory::ProfessionalServices),
        Just(ServiceCategory::TechnicalServices),
        Just(ServiceCategory::CleaningServices),
        Just(ServiceCategory::SecurityServices),
        Just(ServiceCategory::ConstructionLabor),
        Just(ServiceCategory::FreightTransport),
    ]
}

fn arb_regime() -> impl Strategy<Value = TaxRegime> {
    prop_oneof![
        Just(TaxRegime::SimplesNacional),
        Just(TaxRegime::LucroPresumido),
        Just(TaxRegime::LucroReal),
    ]
}

fn arb_date_2024() -> impl Strategy<Value = NaiveDate> {
    (1u32..=365).prop_map(|ordinal| {
        NaiveDate::from_yo_opt(2024, ordinal).expect("valid 2024 ordinal")
    })
}

fn arb_uf() -> impl Strategy<Value = Uf> {
    prop::sample::select(["SP", "RJ", "MG", "RS"].as_slice())
        .prop_map(|code| Uf::new(code).unwrap())
}

fn arb_transaction() -> impl Strategy<Value = TaxableTransaction> {
    (arb_amount(), arb_category(), arb_regime(), arb_date_2024(), arb_amount(), arb_uf()).prop_map(
        |(amount, category, regime, date, reimbursements, uf)| TaxableTransaction {
            amount,
            category,
            uf,
            municipality: "São Paulo".to_string(),
            is_service: true,
            counterparty_regime: regime,
            reimbursements,
            operation_date: date,
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The sum of withheld amounts never exceeds the transaction amount.
    #[test]
    fn prop_total_withheld_never_exceeds_amount(txn in arb_transaction()) {
        let breakdown = WithholdingCalculator::compute(
            &txn,
            &RateTable::brazil_2024(),
            &TaxConfig::default(),
        ).unwrap();

        prop_assert!(breakdown.total_withheld <= txn.amount);
        prop_assert_eq!(breakdown.net_payable, txn.amount - breakdown.total_withheld);
    }

    /// Recomputation of a historical transaction is idempotent: identical
    /// inputs always produce identical breakdowns.
    #[test]
    fn prop_recomputation_is_deterministic(txn in arb_transaction()) {
        let table = RateTable::brazil_2024();
        let config = TaxConfig::default();
        let first = WithholdingCalculator::compute(&txn, &table, &config).unwrap();
        let second = WithholdingCalculator::compute(&txn, &table, &config).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Every line pins a legal basis and keeps its base within bounds.
    #[test]
    fn prop_lines_pin_legal_basis_and_bound_bases(txn in arb_transaction()) {
        let breakdown = WithholdingCalculator::compute(
            &txn,
            &RateTable::brazil_2024(),
            &TaxConfig::default(),
        ).unwrap();

        for line in &breakdown.lines {
            prop_assert!(!line.legal_basis.is_empty());
            prop_assert!(line.base >= Decimal::ZERO);
            prop_assert!(line.base <= txn.amount);
            prop_assert!(line.withheld >= Decimal::ZERO);
        }
    }

    /// Goods transactions never retain anything, whatever the other fields.
    #[test]
    fn prop_goods_retain_nothing(mut txn in arb_transaction()) {
        txn.is_service = false;
        let breakdown = WithholdingCalculator::compute(
            &txn,
            &RateTable::brazil_2024(),
            &TaxConfig::default(),
        ).unwrap();
        prop_assert!(breakdown.lines.is_empty());
        prop_assert_eq!(breakdown.net_payable, txn.amount);
    }
}
