//! Data models for users and wallets

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A registered user
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An account balance owned by exactly one user.
///
/// The balance is in the smallest currency unit and is only ever mutated
/// through the ledger engine; nothing else writes to it.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct Wallet {
    pub id: i64,
    pub user_id: i64,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
