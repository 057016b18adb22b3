//! Ledger Error Types

use thiserror::Error;

/// Errors raised by the ledger engine.
///
/// Every error leaves the wallet balances and the transaction log untouched:
/// the unit of work is rolled back before the error is returned.
#[derive(Error, Debug)]
pub enum LedgerError {
    // === Validation Errors ===
    #[error("Amount must be greater than zero")]
    InvalidAmount,

    #[error("Source and target wallets cannot be the same")]
    SameWallet,

    // === Business Rule Violations ===
    #[error("Wallet not found: {0}")]
    WalletNotFound(i64),

    #[error("Insufficient balance: available {available}, requested {requested}")]
    InsufficientBalance { available: i64, requested: i64 },

    // === Storage Failures ===
    #[error("Storage failure: {0}")]
    Storage(#[from] sqlx::Error),
}

impl LedgerError {
    /// Whether the caller is at fault (validation / business rule) as opposed
    /// to a server-side storage failure.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, LedgerError::Storage(_))
    }
}
