//! CFOP domain types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cfop::error::CfopError;

/// The 27 Brazilian UFs plus EX for operations with other countries.
const UFS: [&str; 28] = [
    "AC", "AL", "AP", "AM", "BA", "CE", "DF", "ES", "GO", "MA", "MT", "MS", "MG", "PA", "PB",
    "PR", "PE", "PI", "RJ", "RN", "RS", "RO", "RR", "SC", "SP", "SE", "TO", "EX",
];

/// A validated federative-unit code ("SP", "RJ", ... or "EX" for abroad).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Uf([u8; 2]);

impl Uf {
    /// Validates and builds a UF from its two-letter code.
    pub fn new(code: &str) -> Result<Self, CfopError> {
        let upper = code.to_uppercase();
        if UFS.contains(&upper.as_str()) {
            let bytes = upper.as_bytes();
            Ok(Self([bytes[0], bytes[1]]))
        } else {
            Err(CfopError::InvalidUf(code.to_string()))
        }
    }

    /// Returns the two-letter code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).expect("UF bytes are ASCII")
    }

    /// Returns true for the EX pseudo-UF (operation with another country).
    #[must_use]
    pub fn is_foreign(&self) -> bool {
        self.0 == *b"EX"
    }
}

impl fmt::Display for Uf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for Uf {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value).map_err(|e| e.to_string())
    }
}

impl From<Uf> for String {
    fn from(uf: Uf) -> Self {
        uf.as_str().to_string()
    }
}

/// A validated 4-digit CFOP code.
///
/// The first digit encodes direction and scope: 1-3 inbound
/// (intra-state, interstate, foreign), 5-7 outbound likewise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct CfopCode(u16);

impl CfopCode {
    /// Validates and builds a code.
    pub fn new(code: u16) -> Result<Self, CfopError> {
        let first_digit = code / 1000;
        if (1000..=7999).contains(&code) && first_digit != 4 {
            Ok(Self(code))
        } else {
            Err(CfopError::InvalidCode(code))
        }
    }

    /// Returns the raw 4-digit value.
    #[must_use]
    pub const fn value(&self) -> u16 {
        self.0
    }

    /// Returns the first digit (direction/scope group).
    #[must_use]
    pub const fn first_digit(&self) -> u16 {
        self.0 / 1000
    }

    /// Returns true for outbound codes (first digit 5-7).
    #[must_use]
    pub const fn is_outbound(&self) -> bool {
        self.first_digit() >= 5
    }
}

impl fmt::Display for CfopCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

impl TryFrom<u16> for CfopCode {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value).map_err(|e| e.to_string())
    }
}

impl From<CfopCode> for u16 {
    fn from(code: CfopCode) -> Self {
        code.0
    }
}

/// The nature of the commercial operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationNature {
    /// Sale of goods or production.
    Sale,
    /// Return of a previous sale.
    Return,
    /// Transfer between establishments of the same owner.
    Transfer,
    /// Shipment without ownership change (demonstration, repair).
    Shipment,
    /// Symbolic return (goods never physically moved back).
    SymbolicReturn,
}

impl OperationNature {
    /// Returns the string representation of the nature.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sale => "sale",
            Self::Return => "return",
            Self::Transfer => "transfer",
            Self::Shipment => "shipment",
            Self::SymbolicReturn => "symbolic_return",
        }
    }
}

impl fmt::Display for OperationNature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// ICMS taxpayer classification of the counterparty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxpayerType {
    /// Registered ICMS taxpayer.
    IcmsTaxpayer,
    /// Final consumer, not an ICMS taxpayer.
    NonTaxpayer,
    /// Entity domiciled abroad.
    ForeignEntity,
}

impl TaxpayerType {
    /// Returns the string representation of the taxpayer type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::IcmsTaxpayer => "icms_taxpayer",
            Self::NonTaxpayer => "non_taxpayer",
            Self::ForeignEntity => "foreign_entity",
        }
    }
}

impl fmt::Display for TaxpayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Jurisdiction scope derived from the origin/destination UF pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JurisdictionScope {
    /// Both UFs are the same state.
    IntraState,
    /// Different states, both domestic.
    Interstate,
    /// Either side is abroad.
    Foreign,
}

impl JurisdictionScope {
    /// Derives the scope from an origin/destination pair.
    #[must_use]
    pub fn of(origin: Uf, destination: Uf) -> Self {
        if origin.is_foreign() || destination.is_foreign() {
            Self::Foreign
        } else if origin == destination {
            Self::IntraState
        } else {
            Self::Interstate
        }
    }

    /// Precedence weight for equal-specificity ties: intra-state rules
    /// outrank interstate ones, which outrank foreign ones.
    #[must_use]
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::IntraState => 0,
            Self::Interstate => 1,
            Self::Foreign => 2,
        }
    }
}

impl fmt::Display for JurisdictionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::IntraState => "intra_state",
            Self::Interstate => "interstate",
            Self::Foreign => "foreign",
        };
        write!(f, "{s}")
    }
}

/// A CFOP determination rule.
///
/// `None` match fields are wildcards; specificity is the number of bound
/// fields, and more specific rules win over general fallbacks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CfopRule {
    /// Scope the rule binds to, or None for any scope.
    pub scope: Option<JurisdictionScope>,
    /// Nature the rule binds to, or None for any nature.
    pub nature: Option<OperationNature>,
    /// Taxpayer type the rule binds to, or None for any type.
    pub taxpayer: Option<TaxpayerType>,
    /// The resolved code.
    pub code: CfopCode,
    /// Official description of the operation.
    pub description: String,
}

impl CfopRule {
    /// Returns true when the rule matches the given attributes.
    #[must_use]
    pub fn matches(
        &self,
        scope: JurisdictionScope,
        nature: OperationNature,
        taxpayer: TaxpayerType,
    ) -> bool {
        self.scope.is_none_or(|s| s == scope)
            && self.nature.is_none_or(|n| n == nature)
            && self.taxpayer.is_none_or(|t| t == taxpayer)
    }

    /// Number of bound (non-wildcard) fields.
    #[must_use]
    pub const fn specificity(&self) -> u8 {
        (self.scope.is_some() as u8)
            + (self.nature.is_some() as u8)
            + (self.taxpayer.is_some() as u8)
    }
}

/// The result of a determination: the code plus why it was chosen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CfopDetermination {
    /// The resolved operation code.
    pub code: CfopCode,
    /// The inputs and rule that justified the resolution.
    pub justification: Justification,
}

/// Justification attached to every determination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Justification {
    /// The derived jurisdiction scope.
    pub scope: JurisdictionScope,
    /// The operation nature submitted.
    pub nature: OperationNature,
    /// The taxpayer type submitted.
    pub taxpayer: TaxpayerType,
    /// Description of the winning rule.
    pub rule_description: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_uf_validation() {
        assert_eq!(Uf::new("SP").unwrap().as_str(), "SP");
        assert_eq!(Uf::new("rj").unwrap().as_str(), "RJ");
        assert!(Uf::new("XX").is_err());
        assert!(Uf::new("").is_err());
    }

    #[test]
    fn test_uf_foreign() {
        assert!(Uf::new("EX").unwrap().is_foreign());
        assert!(!Uf::new("SP").unwrap().is_foreign());
    }

    #[rstest]
    #[case(5102, true)]
    #[case(1202, true)]
    #[case(7102, true)]
    #[case(4000, false)] // group 4 does not exist
    #[case(8102, false)]
    #[case(102, false)] // only 3 digits
    fn test_cfop_code_validation(#[case] raw: u16, #[case] valid: bool) {
        assert_eq!(CfopCode::new(raw).is_ok(), valid);
    }

    #[test]
    fn test_cfop_code_display_pads() {
        assert_eq!(CfopCode::new(5102).unwrap().to_string(), "5102");
        assert!(CfopCode::new(5102).unwrap().is_outbound());
        assert!(!CfopCode::new(1202).unwrap().is_outbound());
    }

    #[test]
    fn test_scope_derivation() {
        let sp = Uf::new("SP").unwrap();
        let rj = Uf::new("RJ").unwrap();
        let ex = Uf::new("EX").unwrap();
        assert_eq!(JurisdictionScope::of(sp, sp), JurisdictionScope::IntraState);
        assert_eq!(JurisdictionScope::of(sp, rj), JurisdictionScope::Interstate);
        assert_eq!(JurisdictionScope::of(sp, ex), JurisdictionScope::Foreign);
        assert_eq!(JurisdictionScope::of(ex, sp), JurisdictionScope::Foreign);
    }

    #[test]
    fn test_rule_specificity_counts_bound_fields() {
        let rule = CfopRule {
            scope: Some(JurisdictionScope::IntraState),
            nature: Some(OperationNature::Sale),
            taxpayer: None,
            code: CfopCode::new(5102).unwrap(),
            description: "sale".to_string(),
        };
        assert_eq!(rule.specificity(), 2);
        assert!(rule.matches(
            JurisdictionScope::IntraState,
            OperationNature::Sale,
            TaxpayerType::NonTaxpayer
        ));
        assert!(!rule.matches(
            JurisdictionScope::Interstate,
            OperationNature::Sale,
            TaxpayerType::NonTaxpayer
        ));
    }
}
