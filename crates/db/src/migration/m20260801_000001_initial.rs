//! Initial schema: fiscal documents, financial titles, bank statement
//! lines, reconciliation links, approval workflow, and allocations.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(INITIAL_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS allocation_targets, allocation_entries, delegations, \
             approval_decisions, approval_requests, reconciliation_links, bank_transactions, \
             financial_titles, fiscal_documents CASCADE;",
        )
        .await?;
        Ok(())
    }
}

const INITIAL_SQL: &str = r"
-- Fiscal documents: mutated only through the state machine, never deleted.
CREATE TABLE fiscal_documents (
    id UUID PRIMARY KEY,
    organization_id UUID NOT NULL,
    number BIGINT NOT NULL,
    series INTEGER NOT NULL,
    kind VARCHAR(16) NOT NULL,
    status VARCHAR(16) NOT NULL,
    authorization_protocol TEXT,
    cancellation_protocol TEXT,
    cancellation_justification TEXT,
    issued_at TIMESTAMPTZ,
    version BIGINT NOT NULL DEFAULT 1,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_documents_number UNIQUE (organization_id, series, number),
    CONSTRAINT chk_document_status
        CHECK (status IN ('draft', 'pending', 'authorized', 'cancelled')),
    -- Authorized rows must carry the authority protocol.
    CONSTRAINT chk_authorized_has_protocol
        CHECK (status <> 'authorized' OR authorization_protocol IS NOT NULL)
);

CREATE INDEX idx_documents_org_status ON fiscal_documents(organization_id, status);

-- Financial titles: internal expected cash movements.
CREATE TABLE financial_titles (
    id UUID PRIMARY KEY,
    account_id UUID NOT NULL,
    kind VARCHAR(16) NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    open_amount NUMERIC(19, 4) NOT NULL,
    due_date DATE NOT NULL,
    descriptor TEXT NOT NULL,
    status VARCHAR(16) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_title_kind CHECK (kind IN ('payable', 'receivable')),
    CONSTRAINT chk_title_status
        CHECK (status IN ('open', 'overdue', 'partial', 'settled', 'cancelled')),
    CONSTRAINT chk_open_within_amount CHECK (open_amount <= amount)
);

-- Range query: open titles for an account within a due-date window.
CREATE INDEX idx_titles_account_due ON financial_titles(account_id, due_date)
    WHERE status IN ('open', 'overdue', 'partial');

-- Bank statement lines: external facts, imported as-is.
CREATE TABLE bank_transactions (
    id UUID PRIMARY KEY,
    account_id UUID NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    posted_at DATE NOT NULL,
    descriptor TEXT NOT NULL,
    imported_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_bank_txns_account_posted ON bank_transactions(account_id, posted_at);

-- Reconciliation links: created by the matcher only. One row per
-- (bank transaction, title) pair an applied match settled.
CREATE TABLE reconciliation_links (
    id UUID PRIMARY KEY,
    bank_transaction_id UUID NOT NULL REFERENCES bank_transactions(id),
    financial_title_id UUID NOT NULL REFERENCES financial_titles(id),
    applied_amount NUMERIC(19, 4) NOT NULL,
    confidence NUMERIC(5, 4) NOT NULL,
    basis VARCHAR(32) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_link_pair UNIQUE (bank_transaction_id, financial_title_id)
);

CREATE INDEX idx_links_bank_txn ON reconciliation_links(bank_transaction_id);
CREATE INDEX idx_links_title ON reconciliation_links(financial_title_id);

-- Approval requests with an append-only decision history.
CREATE TABLE approval_requests (
    id UUID PRIMARY KEY,
    subject_kind VARCHAR(32) NOT NULL,
    subject_id UUID NOT NULL,
    requested_action TEXT NOT NULL,
    submitted_by UUID NOT NULL,
    state VARCHAR(32) NOT NULL,
    version BIGINT NOT NULL DEFAULT 1,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_request_state
        CHECK (state IN ('pending', 'approved', 'rejected', 'changes_requested'))
);

CREATE INDEX idx_requests_subject ON approval_requests(subject_kind, subject_id);
CREATE INDEX idx_requests_state ON approval_requests(state) WHERE state = 'pending';

CREATE TABLE approval_decisions (
    id UUID PRIMARY KEY,
    request_id UUID NOT NULL REFERENCES approval_requests(id) ON DELETE CASCADE,
    seq INTEGER NOT NULL,
    actor UUID NOT NULL,
    decided_at TIMESTAMPTZ NOT NULL,
    decision VARCHAR(32) NOT NULL,
    notes TEXT,
    CONSTRAINT uq_decision_seq UNIQUE (request_id, seq)
);

-- Time-bounded delegations of decision authority.
CREATE TABLE delegations (
    id UUID PRIMARY KEY,
    actor UUID NOT NULL,
    delegate UUID NOT NULL,
    valid_from TIMESTAMPTZ NOT NULL,
    valid_until TIMESTAMPTZ NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_delegation_window CHECK (valid_until >= valid_from),
    CONSTRAINT chk_no_self_delegation CHECK (actor <> delegate)
);

CREATE INDEX idx_delegations_actor ON delegations(actor, valid_from, valid_until);

-- Allocation entries: append-only, reversal stamps reversed_by.
CREATE TABLE allocation_entries (
    id UUID PRIMARY KEY,
    source_cost_center UUID NOT NULL,
    source_amount NUMERIC(19, 4) NOT NULL,
    mode VARCHAR(16) NOT NULL,
    reversal_of UUID REFERENCES allocation_entries(id),
    reversed_by UUID REFERENCES allocation_entries(id),
    entered_at TIMESTAMPTZ NOT NULL,
    version BIGINT NOT NULL DEFAULT 1,
    CONSTRAINT chk_allocation_mode CHECK (mode IN ('percentage', 'fixed'))
);

CREATE INDEX idx_allocations_source ON allocation_entries(source_cost_center);

CREATE TABLE allocation_targets (
    id UUID PRIMARY KEY,
    entry_id UUID NOT NULL REFERENCES allocation_entries(id) ON DELETE CASCADE,
    seq INTEGER NOT NULL,
    cost_center UUID NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    CONSTRAINT uq_target_seq UNIQUE (entry_id, seq)
);
";
