//! Ledger Engine
//!
//! Orchestrates deposits and transfers. Each mutating operation runs inside
//! one explicit unit of work (a `sqlx::Transaction`): validate, lock the
//! wallet rows, re-check balances under the lock, mutate, append the
//! transaction record, commit. Any early return drops the transaction,
//! which rolls everything back.
//!
//! Transfers lock both wallet rows in ascending id order so that two
//! concurrent transfers over the same pair in opposite directions cannot
//! deadlock.

use async_trait::async_trait;
use sqlx::PgPool;

use super::error::LedgerError;
use super::models::{NewTransaction, Transaction};
use super::store::{TransactionLog, WalletStore};

/// Ledger operations exposed to the gateway
#[async_trait]
pub trait LedgerService: Send + Sync {
    /// Atomically credit a wallet and record the deposit.
    async fn deposit(&self, wallet_id: i64, amount: i64) -> Result<(), LedgerError>;

    /// Atomically move `amount` from one wallet to another and record the
    /// transfer. Fails with `InsufficientBalance` rather than overdraw.
    async fn transfer(&self, source: i64, target: i64, amount: i64) -> Result<(), LedgerError>;

    /// Every transaction where the wallet is source or target, oldest first.
    async fn transactions_by_wallet(&self, wallet_id: i64)
    -> Result<Vec<Transaction>, LedgerError>;
}

/// PostgreSQL-backed ledger engine
pub struct LedgerEngine {
    pool: PgPool,
}

impl LedgerEngine {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn validate_amount(amount: i64) -> Result<(), LedgerError> {
    if amount <= 0 {
        return Err(LedgerError::InvalidAmount);
    }
    Ok(())
}

pub(crate) fn validate_transfer_args(
    source: i64,
    target: i64,
    amount: i64,
) -> Result<(), LedgerError> {
    validate_amount(amount)?;
    if source == target {
        return Err(LedgerError::SameWallet);
    }
    Ok(())
}

#[async_trait]
impl LedgerService for LedgerEngine {
    async fn deposit(&self, wallet_id: i64, amount: i64) -> Result<(), LedgerError> {
        validate_amount(amount)?;

        let mut uow = self.pool.begin().await?;

        WalletStore::lock_for_update(&mut uow, wallet_id)
            .await?
            .ok_or(LedgerError::WalletNotFound(wallet_id))?;

        WalletStore::apply_delta(&mut uow, wallet_id, amount).await?;

        let record = NewTransaction::deposit(wallet_id, amount);
        TransactionLog::append(&mut uow, &record).await?;

        uow.commit().await?;

        tracing::info!(
            wallet_id,
            amount,
            reference = %record.reference_number,
            "Deposit committed"
        );
        Ok(())
    }

    async fn transfer(&self, source: i64, target: i64, amount: i64) -> Result<(), LedgerError> {
        validate_transfer_args(source, target, amount)?;

        let mut uow = self.pool.begin().await?;

        // Fixed lock-acquisition order: ascending wallet id.
        let (first, second) = if source < target {
            (source, target)
        } else {
            (target, source)
        };

        let first_row = WalletStore::lock_for_update(&mut uow, first)
            .await?
            .ok_or(LedgerError::WalletNotFound(first))?;
        let second_row = WalletStore::lock_for_update(&mut uow, second)
            .await?
            .ok_or(LedgerError::WalletNotFound(second))?;

        let source_row = if first_row.id == source {
            &first_row
        } else {
            &second_row
        };

        // Balance check must happen under the lock, never before it.
        if source_row.balance < amount {
            return Err(LedgerError::InsufficientBalance {
                available: source_row.balance,
                requested: amount,
            });
        }

        WalletStore::apply_delta(&mut uow, source, -amount).await?;
        WalletStore::apply_delta(&mut uow, target, amount).await?;

        let record = NewTransaction::transfer(source, target, amount);
        TransactionLog::append(&mut uow, &record).await?;

        uow.commit().await?;

        tracing::info!(
            source_wallet_id = source,
            target_wallet_id = target,
            amount,
            reference = %record.reference_number,
            "Transfer committed"
        );
        Ok(())
    }

    async fn transactions_by_wallet(
        &self,
        wallet_id: i64,
    ) -> Result<Vec<Transaction>, LedgerError> {
        Ok(TransactionLog::find_by_wallet(&self.pool, wallet_id).await?)
    }
}
