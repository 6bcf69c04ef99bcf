//! Effective-dated withholding rate tables.
//!
//! Rates are selected by the date range they were legally in effect, never
//! by wall-clock lookup. Recomputing a historical transaction therefore
//! always selects the same rules and produces the same breakdown.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::tax::types::{ServiceCategory, TaxKind, TaxRegime};

/// A single rate rule for one tax kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateRule {
    /// The tax kind this rule covers.
    pub kind: TaxKind,
    /// Categories the rule applies to. Empty means all categories.
    pub categories: Vec<ServiceCategory>,
    /// The rate, in percent.
    pub rate: Decimal,
    /// Ceiling on the taxable base, when the law caps it (INSS).
    pub base_cap: Option<Decimal>,
    /// Counterparty regimes exempt from this retention.
    pub exempt_regimes: Vec<TaxRegime>,
    /// First day the rule is in effect (inclusive).
    pub effective_from: NaiveDate,
    /// Last day the rule is in effect (inclusive). None = still in effect.
    pub effective_to: Option<NaiveDate>,
    /// The legal basis pinned onto breakdown lines.
    pub legal_basis: String,
}

impl RateRule {
    /// Returns true when the rule covers the category on the given date.
    #[must_use]
    pub fn applies(&self, category: ServiceCategory, date: NaiveDate) -> bool {
        let covers_category = self.categories.is_empty() || self.categories.contains(&category);
        let in_effect = date >= self.effective_from
            && self.effective_to.is_none_or(|until| date <= until);
        covers_category && in_effect
    }
}

/// An ordered collection of rate rules.
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    rules: Vec<RateRule>,
}

impl RateTable {
    /// Builds a table from explicit rules.
    #[must_use]
    pub fn new(rules: Vec<RateRule>) -> Self {
        Self { rules }
    }

    /// The builtin Brazilian table in effect from 2024-01-01.
    ///
    /// Federal retentions (IRRF/PIS/COFINS/CSLL) exempt Simples Nacional
    /// counterparties. INSS retention is restricted to labor-assignment
    /// categories and its base is capped at the contribution ceiling.
    #[must_use]
    pub fn brazil_2024() -> Self {
        let from = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid builtin date");
        let federal_exempt = vec![TaxRegime::SimplesNacional];

        Self::new(vec![
            RateRule {
                kind: TaxKind::Irrf,
                categories: vec![],
                rate: Decimal::new(15, 1), // 1.5
                base_cap: None,
                exempt_regimes: federal_exempt.clone(),
                effective_from: from,
                effective_to: None,
                legal_basis: "RIR/2018 art. 714".to_string(),
            },
            RateRule {
                kind: TaxKind::Pis,
                categories: vec![],
                rate: Decimal::new(65, 2), // 0.65
                base_cap: None,
                exempt_regimes: federal_exempt.clone(),
                effective_from: from,
                effective_to: None,
                legal_basis: "Lei 10.833/2003 art. 30".to_string(),
            },
            RateRule {
                kind: TaxKind::Cofins,
                categories: vec![],
                rate: Decimal::new(3, 0),
                base_cap: None,
                exempt_regimes: federal_exempt.clone(),
                effective_from: from,
                effective_to: None,
                legal_basis: "Lei 10.833/2003 art. 30".to_string(),
            },
            RateRule {
                kind: TaxKind::Csll,
                categories: vec![],
                rate: Decimal::new(1, 0),
                base_cap: None,
                exempt_regimes: federal_exempt,
                effective_from: from,
                effective_to: None,
                legal_basis: "Lei 10.833/2003 art. 30".to_string(),
            },
            RateRule {
                kind: TaxKind::Iss,
                categories: vec![],
                rate: Decimal::new(5, 0),
                base_cap: None,
                exempt_regimes: vec![],
                effective_from: from,
                effective_to: None,
                legal_basis: "LC 116/2003 art. 8".to_string(),
            },
            RateRule {
                kind: TaxKind::Inss,
                categories: vec![
                    ServiceCategory::CleaningServices,
                    ServiceCategory::SecurityServices,
                    ServiceCategory::ConstructionLabor,
                ],
                rate: Decimal::new(11, 0),
                base_cap: Some(Decimal::new(778_602, 2)), // 7,786.02 ceiling
                exempt_regimes: vec![],
                effective_from: from,
                effective_to: None,
                legal_basis: "Lei 8.212/1991 art. 31".to_string(),
            },
        ])
    }

    /// Selects the rule for a kind, category, and date.
    ///
    /// When several rules for the kind are in effect, the one covering
    /// fewer categories (more specific) wins; a category-restricted rule
    /// outranks a catch-all one.
    #[must_use]
    pub fn rule_for(
        &self,
        kind: TaxKind,
        category: ServiceCategory,
        date: NaiveDate,
    ) -> Option<&RateRule> {
        self.rules
            .iter()
            .filter(|r| r.kind == kind && r.applies(category, date))
            .min_by_key(|r| {
                if r.categories.is_empty() {
                    usize::MAX
                } else {
                    r.categories.len()
                }
            })
    }

    /// Returns true when at least one rule of any kind covers the category
    /// at the date. Used to distinguish "exempt" from "rule-table gap".
    #[must_use]
    pub fn covers(&self, category: ServiceCategory, date: NaiveDate) -> bool {
        self.rules.iter().any(|r| r.applies(category, date))
    }
}
