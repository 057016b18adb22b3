//! Wallet Store and Transaction Log row operations
//!
//! Mutating operations take a `&mut PgConnection` so the engine can pass its
//! open `sqlx::Transaction` down explicitly: locks and writes stay scoped to
//! one unit of work and roll back together if it is dropped uncommitted.

use sqlx::{PgConnection, PgPool, Row};

use super::models::{NewTransaction, STATUS_COMPLETED, Transaction, TransactionType};

/// A wallet row as read under lock
#[derive(Debug, Clone)]
pub struct WalletRow {
    pub id: i64,
    pub user_id: i64,
    pub balance: i64,
}

/// Wallet balance persistence
pub struct WalletStore;

impl WalletStore {
    /// Acquire an exclusive row lock on the wallet and return its current
    /// state. Blocks until any concurrent holder of the lock commits or
    /// rolls back.
    pub async fn lock_for_update(
        conn: &mut PgConnection,
        id: i64,
    ) -> Result<Option<WalletRow>, sqlx::Error> {
        let row = sqlx::query(r#"SELECT id, user_id, balance FROM wallets WHERE id = $1 FOR UPDATE"#)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(row.map(|r| WalletRow {
            id: r.get("id"),
            user_id: r.get("user_id"),
            balance: r.get("balance"),
        }))
    }

    /// Apply a signed balance delta to a wallet already locked in this unit
    /// of work.
    pub async fn apply_delta(
        conn: &mut PgConnection,
        id: i64,
        delta: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"UPDATE wallets SET balance = balance + $2, updated_at = NOW() WHERE id = $1"#,
        )
        .bind(id)
        .bind(delta)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }
}

/// Append-only transaction log
pub struct TransactionLog;

impl TransactionLog {
    /// Insert a transaction row within the current unit of work.
    pub async fn append(conn: &mut PgConnection, tx: &NewTransaction) -> Result<i64, sqlx::Error> {
        let row = sqlx::query(
            r#"
            INSERT INTO transactions
                (source_wallet_id, target_wallet_id, amount, tx_type, reference_number, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(tx.source_wallet_id)
        .bind(tx.target_wallet_id)
        .bind(tx.amount)
        .bind(tx.tx_type.as_str())
        .bind(&tx.reference_number)
        .bind(STATUS_COMPLETED)
        .fetch_one(&mut *conn)
        .await?;

        Ok(row.get("id"))
    }

    /// All transactions where the wallet is source or target, oldest first.
    /// Plain read, no locking.
    pub async fn find_by_wallet(
        pool: &PgPool,
        wallet_id: i64,
    ) -> Result<Vec<Transaction>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT id, source_wallet_id, target_wallet_id, amount, tx_type,
                   reference_number, status, created_at, updated_at
            FROM transactions
            WHERE source_wallet_id = $1 OR target_wallet_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(wallet_id)
        .fetch_all(pool)
        .await?;

        let mut transactions = Vec::with_capacity(rows.len());
        for r in rows {
            let tx_type_str: String = r.get("tx_type");
            let tx_type = TransactionType::from_str(&tx_type_str).ok_or_else(|| {
                sqlx::Error::Decode(format!("unknown transaction type: {}", tx_type_str).into())
            })?;

            transactions.push(Transaction {
                id: r.get("id"),
                source_wallet_id: r.get("source_wallet_id"),
                target_wallet_id: r.get("target_wallet_id"),
                amount: r.get("amount"),
                tx_type,
                reference_number: r.get("reference_number"),
                status: r.get("status"),
                created_at: r.get("created_at"),
                updated_at: r.get("updated_at"),
            });
        }

        Ok(transactions)
    }
}
