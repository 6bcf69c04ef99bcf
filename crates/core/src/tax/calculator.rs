//! Withholding breakdown computation.
//!
//! A pure function over the transaction, a rate table, and the tax
//! configuration. No clock, no global state: identical inputs always
//! produce identical breakdowns.

use rust_decimal::{Decimal, RoundingStrategy};

use fiscus_shared::config::TaxConfig;

use crate::tax::error::TaxError;
use crate::tax::tables::{RateRule, RateTable};
use crate::tax::types::{TaxKind, TaxableTransaction, WithholdingBreakdown, WithholdingLine};

/// Stateless withholding calculator.
pub struct WithholdingCalculator;

impl WithholdingCalculator {
    /// Computes the ordered withholding breakdown for a transaction.
    ///
    /// Goods transactions (service flag off) retain nothing. Service
    /// transactions walk the kinds in canonical order, skipping kinds with
    /// no applicable rule or an exempt counterparty regime.
    ///
    /// # Errors
    ///
    /// - `TaxError::InvalidCategory` when no rule of any kind covers the
    ///   category at the transaction date (rule-table gap).
    /// - `TaxError::NegativeBase` when a base would be negative and
    ///   `strict_negative_base` is set; otherwise the base clamps to zero.
    pub fn compute(
        transaction: &TaxableTransaction,
        table: &RateTable,
        config: &TaxConfig,
    ) -> Result<WithholdingBreakdown, TaxError> {
        if !transaction.is_service {
            return Ok(WithholdingBreakdown::empty(transaction.amount));
        }

        if !table.covers(transaction.category, transaction.operation_date) {
            return Err(TaxError::InvalidCategory {
                category: transaction.category,
                date: transaction.operation_date,
            });
        }

        let mut lines = Vec::new();
        for kind in TaxKind::ALL {
            let Some(rule) =
                table.rule_for(kind, transaction.category, transaction.operation_date)
            else {
                continue;
            };
            if rule.exempt_regimes.contains(&transaction.counterparty_regime) {
                continue;
            }

            let base = Self::base_for(kind, transaction, rule, config)?;
            let withheld = (base * rule.rate / Decimal::ONE_HUNDRED)
                .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);

            lines.push(WithholdingLine {
                kind,
                rate: rule.rate,
                base,
                withheld,
                legal_basis: rule.legal_basis.clone(),
            });
        }

        let total_withheld: Decimal = lines.iter().map(|l| l.withheld).sum();
        Ok(WithholdingBreakdown {
            lines,
            total_withheld,
            net_payable: transaction.amount - total_withheld,
        })
    }

    /// Applies the per-kind base rule: ISS excludes reimbursements, INSS
    /// caps at the rule's ceiling, everything else uses the gross amount.
    fn base_for(
        kind: TaxKind,
        transaction: &TaxableTransaction,
        rule: &RateRule,
        config: &TaxConfig,
    ) -> Result<Decimal, TaxError> {
        let raw = match kind {
            TaxKind::Iss => transaction.amount - transaction.reimbursements,
            _ => transaction.amount,
        };

        if raw.is_sign_negative() {
            if config.strict_negative_base {
                return Err(TaxError::NegativeBase { kind, base: raw });
            }
            return Ok(Decimal::ZERO);
        }

        Ok(match rule.base_cap {
            Some(cap) if raw > cap => cap,
            _ => raw,
        })
    }
}
