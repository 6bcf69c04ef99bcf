//! Withholding tax domain types.
//!
//! A [`TaxableTransaction`] is immutable once its tax has been computed;
//! recomputation happens by building a new version of the transaction, never
//! by mutating this input in place.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cfop::Uf;

/// The withholding tax kinds retained at source.
///
/// Declaration order is the canonical order of breakdown lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxKind {
    /// Income tax retained at source.
    Irrf,
    /// Social integration program contribution.
    Pis,
    /// Social security financing contribution.
    Cofins,
    /// Social contribution on net profit.
    Csll,
    /// Municipal service tax.
    Iss,
    /// Social security contribution (labor assignment services).
    Inss,
}

impl TaxKind {
    /// All kinds in canonical breakdown order.
    pub const ALL: [Self; 6] = [
        Self::Irrf,
        Self::Pis,
        Self::Cofins,
        Self::Csll,
        Self::Iss,
        Self::Inss,
    ];

    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Irrf => "irrf",
            Self::Pis => "pis",
            Self::Cofins => "cofins",
            Self::Csll => "csll",
            Self::Iss => "iss",
            Self::Inss => "inss",
        }
    }

    /// Parses a kind from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "irrf" => Some(Self::Irrf),
            "pis" => Some(Self::Pis),
            "cofins" => Some(Self::Cofins),
            "csll" => Some(Self::Csll),
            "iss" => Some(Self::Iss),
            "inss" => Some(Self::Inss),
            _ => None,
        }
    }
}

impl fmt::Display for TaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tax regime of the counterparty (the payee being retained against).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxRegime {
    /// Simplified regime for small companies; exempt from federal retention.
    SimplesNacional,
    /// Presumed-profit regime.
    LucroPresumido,
    /// Real-profit regime.
    LucroReal,
}

impl TaxRegime {
    /// Returns the string representation of the regime.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SimplesNacional => "simples_nacional",
            Self::LucroPresumido => "lucro_presumido",
            Self::LucroReal => "lucro_real",
        }
    }

    /// Parses a regime from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "simples_nacional" => Some(Self::SimplesNacional),
            "lucro_presumido" => Some(Self::LucroPresumido),
            "lucro_real" => Some(Self::LucroReal),
            _ => None,
        }
    }
}

impl fmt::Display for TaxRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Service categories the rate table keys on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
    /// Professional services (consulting, accounting, legal).
    ProfessionalServices,
    /// Technical services (engineering, IT).
    TechnicalServices,
    /// Cleaning and conservation services.
    CleaningServices,
    /// Security and surveillance services.
    SecurityServices,
    /// Construction labor assignment.
    ConstructionLabor,
    /// Freight and transport services.
    FreightTransport,
}

impl ServiceCategory {
    /// Returns the string representation of the category.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ProfessionalServices => "professional_services",
            Self::TechnicalServices => "technical_services",
            Self::CleaningServices => "cleaning_services",
            Self::SecurityServices => "security_services",
            Self::ConstructionLabor => "construction_labor",
            Self::FreightTransport => "freight_transport",
        }
    }

    /// Parses a category from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "professional_services" => Some(Self::ProfessionalServices),
            "technical_services" => Some(Self::TechnicalServices),
            "cleaning_services" => Some(Self::CleaningServices),
            "security_services" => Some(Self::SecurityServices),
            "construction_labor" => Some(Self::ConstructionLabor),
            "freight_transport" => Some(Self::FreightTransport),
            _ => None,
        }
    }
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Input transaction for withholding computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxableTransaction {
    /// Gross transaction amount (BRL, two decimal places).
    pub amount: Decimal,
    /// Service category driving rule selection.
    pub category: ServiceCategory,
    /// Federative unit of service provision.
    pub uf: Uf,
    /// Municipality of service provision (ISS jurisdiction).
    pub municipality: String,
    /// True for service transactions; goods carry no source retention.
    pub is_service: bool,
    /// Tax regime of the counterparty being paid.
    pub counterparty_regime: TaxRegime,
    /// Reimbursements included in the amount; excluded from the ISS base.
    pub reimbursements: Decimal,
    /// The operation date. Rates are selected as of this date.
    pub operation_date: NaiveDate,
}

/// One retained tax line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithholdingLine {
    /// The tax kind.
    pub kind: TaxKind,
    /// The applied rate, in percent.
    pub rate: Decimal,
    /// The taxable base the rate was applied to.
    pub base: Decimal,
    /// The retained amount.
    pub withheld: Decimal,
    /// The legal basis of the rule in effect at the transaction date.
    pub legal_basis: String,
}

/// Ordered withholding breakdown for a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithholdingBreakdown {
    /// Lines in canonical [`TaxKind`] order.
    pub lines: Vec<WithholdingLine>,
    /// Sum of retained amounts. Never exceeds the transaction amount.
    pub total_withheld: Decimal,
    /// Transaction amount minus total withheld.
    pub net_payable: Decimal,
}

impl WithholdingBreakdown {
    /// An empty breakdown (nothing retained) for the given gross amount.
    #[must_use]
    pub fn empty(amount: Decimal) -> Self {
        Self {
            lines: Vec::new(),
            total_withheld: Decimal::ZERO,
            net_payable: amount,
        }
    }

    /// Returns the line for a kind, if retained.
    #[must_use]
    pub fn line(&self, kind: TaxKind) -> Option<&WithholdingLine> {
        self.lines.iter().find(|l| l.kind == kind)
    }
}
