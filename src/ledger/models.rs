//! Transaction data model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Transaction status. Every transaction commits atomically with its balance
/// mutation, so no pending or failed state is ever recorded.
pub const STATUS_COMPLETED: &str = "completed";

/// Money movement type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Deposit,
    Withdraw,
    Transfer,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "deposit",
            TransactionType::Withdraw => "withdraw",
            TransactionType::Transfer => "transfer",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "deposit" => Some(TransactionType::Deposit),
            "withdraw" => Some(TransactionType::Withdraw),
            "transfer" => Some(TransactionType::Transfer),
            _ => None,
        }
    }

    /// Reference number prefix ("DEP-", "WDR-", "TRF-")
    pub fn reference_prefix(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "DEP",
            TransactionType::Withdraw => "WDR",
            TransactionType::Transfer => "TRF",
        }
    }
}

/// A committed money movement. Append-only: rows are written once by the
/// ledger engine and never updated or deleted afterwards.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct Transaction {
    pub id: i64,
    pub source_wallet_id: Option<i64>,
    pub target_wallet_id: i64,
    /// Amount in the smallest currency unit
    pub amount: i64,
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    pub reference_number: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A transaction about to be appended to the log
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub source_wallet_id: Option<i64>,
    pub target_wallet_id: i64,
    pub amount: i64,
    pub tx_type: TransactionType,
    pub reference_number: String,
}

impl NewTransaction {
    pub fn deposit(wallet_id: i64, amount: i64) -> Self {
        Self {
            source_wallet_id: None,
            target_wallet_id: wallet_id,
            amount,
            tx_type: TransactionType::Deposit,
            reference_number: reference_number(TransactionType::Deposit),
        }
    }

    pub fn transfer(source_wallet_id: i64, target_wallet_id: i64, amount: i64) -> Self {
        Self {
            source_wallet_id: Some(source_wallet_id),
            target_wallet_id,
            amount,
            tx_type: TransactionType::Transfer,
            reference_number: reference_number(TransactionType::Transfer),
        }
    }
}

/// Generate a unique-ish correlation token, e.g. `TRF-01JD3A7V9GQZ4M8R2T6XWBKCYE`
pub fn reference_number(tx_type: TransactionType) -> String {
    format!("{}-{}", tx_type.reference_prefix(), Ulid::new())
}
