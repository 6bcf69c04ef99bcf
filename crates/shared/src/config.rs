//! Application configuration management.
//!
//! Every tunable the core components consume lives here. Defaults err toward
//! manual review: the matcher auto-apply threshold is conservative and the
//! self-approval exception set starts empty.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Configuration for all core components.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoreConfig {
    /// Bank reconciliation matcher tunables.
    #[serde(default)]
    pub reconciliation: ReconciliationConfig,
    /// Approval workflow tunables.
    #[serde(default)]
    pub approval: ApprovalConfig,
    /// Fiscal document issuance tunables.
    #[serde(default)]
    pub document: DocumentConfig,
    /// Withholding tax calculator tunables.
    #[serde(default)]
    pub tax: TaxConfig,
}

/// Bank reconciliation matcher tunables.
#[derive(Debug, Clone, Deserialize)]
pub struct ReconciliationConfig {
    /// Days either side of the bank posting date a title's due date may fall.
    #[serde(default = "default_date_window_days")]
    pub date_window_days: i64,
    /// Absolute amount difference still considered a match.
    #[serde(default = "default_amount_tolerance")]
    pub amount_tolerance: Decimal,
    /// Minimum confidence for a proposal to be applied without confirmation.
    #[serde(default = "default_auto_apply_threshold")]
    pub auto_apply_threshold: Decimal,
    /// Upper bound on titles combined into a single many-to-one match.
    #[serde(default = "default_max_combination_size")]
    pub max_combination_size: usize,
}

fn default_date_window_days() -> i64 {
    5
}

fn default_amount_tolerance() -> Decimal {
    Decimal::new(1, 2) // 0.01
}

fn default_auto_apply_threshold() -> Decimal {
    Decimal::new(90, 2) // 0.90
}

fn default_max_combination_size() -> usize {
    3
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            date_window_days: default_date_window_days(),
            amount_tolerance: default_amount_tolerance(),
            auto_apply_threshold: default_auto_apply_threshold(),
            max_combination_size: default_max_combination_size(),
        }
    }
}

/// Approval workflow tunables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApprovalConfig {
    /// Role names exempt from the self-approval prohibition. Empty by
    /// default: nobody approves their own submission.
    #[serde(default)]
    pub self_approval_exempt_roles: Vec<String>,
}

/// Fiscal document issuance tunables.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentConfig {
    /// Minimum character count for a cancellation justification.
    #[serde(default = "default_min_cancellation_justification")]
    pub min_cancellation_justification: usize,
}

fn default_min_cancellation_justification() -> usize {
    15
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            min_cancellation_justification: default_min_cancellation_justification(),
        }
    }
}

/// Withholding tax calculator tunables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaxConfig {
    /// When true, a negative taxable base is an error instead of clamping
    /// to zero.
    #[serde(default)]
    pub strict_negative_base: bool,
}

impl CoreConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FISCUS").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
