//! Reconciliation batch orchestration over the title store port.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Duration;

use fiscus_shared::config::ReconciliationConfig;
use fiscus_shared::types::{BankAccountId, BankTransactionId};

use crate::ports::TitleStore;
use crate::reconciliation::error::ReconciliationError;
use crate::reconciliation::matcher::ReconciliationMatcher;
use crate::reconciliation::types::{BankTransaction, BatchOutcome};

/// Runs matcher batches: range-load candidates, match, persist applied
/// matches all-or-nothing.
pub struct ReconciliationService {
    titles: Arc<dyn TitleStore>,
    config: ReconciliationConfig,
}

impl ReconciliationService {
    /// Creates the service with its store wired in.
    #[must_use]
    pub fn new(titles: Arc<dyn TitleStore>, config: ReconciliationConfig) -> Self {
        Self { titles, config }
    }

    /// Processes one imported batch for an account.
    ///
    /// Candidate titles are loaded for the batch's posting-date span widened
    /// by the configured window. Applied matches persist through
    /// [`TitleStore::apply_matches`], which commits the whole batch or
    /// nothing.
    ///
    /// # Errors
    ///
    /// Storage failures surface as `ReconciliationError::Storage`; the
    /// outcome is discarded and nothing is applied.
    pub async fn run_batch(
        &self,
        account: BankAccountId,
        batch: &[BankTransaction],
    ) -> Result<BatchOutcome, ReconciliationError> {
        let Some(first) = batch.first() else {
            return Ok(BatchOutcome::default());
        };

        let mut from = first.posted_at;
        let mut to = first.posted_at;
        for txn in batch {
            from = from.min(txn.posted_at);
            to = to.max(txn.posted_at);
        }
        let window = Duration::days(self.config.date_window_days);
        let titles = self
            .titles
            .open_titles(account, from - window, to + window)
            .await?;

        let ids: Vec<BankTransactionId> = batch.iter().map(|t| t.id).collect();
        let already_linked: HashSet<BankTransactionId> = self
            .titles
            .linked_bank_transactions(&ids)
            .await?
            .into_iter()
            .collect();

        let outcome =
            ReconciliationMatcher::run(batch, &titles, &already_linked, &self.config);

        if !outcome.applied.is_empty() {
            self.titles.apply_matches(&outcome.applied).await?;
        }
        Ok(outcome)
    }
}
