//! Ledger Engine module
//!
//! Atomic, consistent wallet balance mutations and their append-only
//! transaction records, backed by PostgreSQL row locks.

pub mod engine;
pub mod error;
pub mod models;
pub mod store;

#[cfg(test)]
mod integration_tests;

pub use engine::{LedgerEngine, LedgerService};
pub use error::LedgerError;
pub use models::{NewTransaction, STATUS_COMPLETED, Transaction, TransactionType};
pub use store::{TransactionLog, WalletRow, WalletStore};
