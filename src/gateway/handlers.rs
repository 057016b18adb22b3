//! Gateway HTTP handlers
//!
//! Translate HTTP requests into account-directory / ledger-engine calls and
//! serialize the results. Error mapping follows one rule: validation and
//! business-rule failures answer 400, missing resources on lookups answer
//! 404, storage failures answer 500 and are logged, never surfaced verbatim.

use axum::{Json, extract::Path, extract::State, http::StatusCode};
use std::sync::Arc;
use validator::Validate;

use crate::account::{AccountError, User, Wallet};
use crate::ledger::{LedgerError, Transaction};

use super::state::AppState;
use super::types::{
    CreateUserRequest, CreateWalletRequest, DepositRequest, ErrorBody, MessageBody,
    TransferRequest,
};

type ApiError = (StatusCode, Json<ErrorBody>);

fn bad_request(msg: impl ToString) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorBody::new(msg)))
}

fn not_found(msg: impl ToString) -> ApiError {
    (StatusCode::NOT_FOUND, Json(ErrorBody::new(msg)))
}

fn internal_error() -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody::new("internal server error")),
    )
}

/// Map an account error; `is_lookup` decides whether missing resources are
/// 404 (GETs) or 400 (creation referencing an unknown user).
fn map_account_error(err: AccountError, is_lookup: bool) -> ApiError {
    match &err {
        AccountError::Storage(e) => {
            tracing::error!(error = %e, "Account storage failure");
            internal_error()
        }
        _ if is_lookup && err.is_not_found() => not_found(err),
        _ => bad_request(err),
    }
}

fn map_ledger_error(err: LedgerError) -> ApiError {
    match &err {
        LedgerError::Storage(e) => {
            tracing::error!(error = %e, "Ledger storage failure");
            internal_error()
        }
        _ => bad_request(err),
    }
}

/// Register a new user
///
/// POST /api/v1/users
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Invalid input or duplicate email", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "Users"
)]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    req.validate().map_err(bad_request)?;

    let user = state
        .users
        .create(&req.name, &req.email)
        .await
        .map_err(|e| map_account_error(e, false))?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Get a user by id
///
/// GET /api/v1/users/{id}
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 404, description = "User not found", body = ErrorBody)
    ),
    tag = "Users"
)]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<User>, ApiError> {
    let user = state
        .users
        .get(id)
        .await
        .map_err(|e| map_account_error(e, true))?;
    Ok(Json(user))
}

/// List a user's wallets
///
/// GET /api/v1/users/{id}/wallets
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/wallets",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Wallets owned by the user", body = [Wallet]),
        (status = 404, description = "User not found", body = ErrorBody)
    ),
    tag = "Wallets"
)]
pub async fn get_user_wallets(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Wallet>>, ApiError> {
    let wallets = state
        .wallets
        .for_user(id)
        .await
        .map_err(|e| map_account_error(e, true))?;
    Ok(Json(wallets))
}

/// Create an empty wallet for a user
///
/// POST /api/v1/wallets
#[utoipa::path(
    post,
    path = "/api/v1/wallets",
    request_body = CreateWalletRequest,
    responses(
        (status = 201, description = "Wallet created", body = Wallet),
        (status = 400, description = "Missing or unknown user", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "Wallets"
)]
pub async fn create_wallet(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateWalletRequest>,
) -> Result<(StatusCode, Json<Wallet>), ApiError> {
    req.validate().map_err(bad_request)?;

    let wallet = state
        .wallets
        .create(req.user_id)
        .await
        .map_err(|e| map_account_error(e, false))?;

    Ok((StatusCode::CREATED, Json(wallet)))
}

/// Get a wallet by id
///
/// GET /api/v1/wallets/{id}
#[utoipa::path(
    get,
    path = "/api/v1/wallets/{id}",
    params(("id" = i64, Path, description = "Wallet id")),
    responses(
        (status = 200, description = "Wallet found", body = Wallet),
        (status = 404, description = "Wallet not found", body = ErrorBody)
    ),
    tag = "Wallets"
)]
pub async fn get_wallet(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Wallet>, ApiError> {
    let wallet = state
        .wallets
        .get(id)
        .await
        .map_err(|e| map_account_error(e, true))?;
    Ok(Json(wallet))
}

/// Deposit funds into a wallet
///
/// POST /api/v1/deposits
#[utoipa::path(
    post,
    path = "/api/v1/deposits",
    request_body = DepositRequest,
    responses(
        (status = 200, description = "Deposit committed", body = MessageBody),
        (status = 400, description = "Validation or business error", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "Ledger"
)]
pub async fn deposit(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DepositRequest>,
) -> Result<Json<MessageBody>, ApiError> {
    req.validate().map_err(bad_request)?;

    state
        .ledger
        .deposit(req.wallet_id, req.amount)
        .await
        .map_err(map_ledger_error)?;

    Ok(Json(MessageBody {
        message: "deposit successful",
    }))
}

/// Transfer funds between wallets
///
/// POST /api/v1/transfers
#[utoipa::path(
    post,
    path = "/api/v1/transfers",
    request_body = TransferRequest,
    responses(
        (status = 200, description = "Transfer committed", body = MessageBody),
        (status = 400, description = "Validation or business error", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "Ledger"
)]
pub async fn transfer(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TransferRequest>,
) -> Result<Json<MessageBody>, ApiError> {
    req.validate().map_err(bad_request)?;

    state
        .ledger
        .transfer(req.source_wallet_id, req.target_wallet_id, req.amount)
        .await
        .map_err(map_ledger_error)?;

    Ok(Json(MessageBody {
        message: "transfer successful",
    }))
}

/// List every transaction touching a wallet
///
/// GET /api/v1/wallets/{id}/transactions
#[utoipa::path(
    get,
    path = "/api/v1/wallets/{id}/transactions",
    params(("id" = i64, Path, description = "Wallet id")),
    responses(
        (status = 200, description = "Transactions where the wallet is source or target", body = [Transaction]),
        (status = 404, description = "Wallet not found", body = ErrorBody)
    ),
    tag = "Ledger"
)]
pub async fn get_wallet_transactions(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    // 404 for unknown wallets rather than an empty list
    state
        .wallets
        .get(id)
        .await
        .map_err(|e| map_account_error(e, true))?;

    let transactions = state
        .ledger
        .transactions_by_wallet(id)
        .await
        .map_err(map_ledger_error)?;

    Ok(Json(transactions))
}

/// Service and database health
///
/// GET /health
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service healthy"),
        (status = 503, description = "Database unreachable")
    ),
    tag = "Health"
)]
pub async fn health(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let db = state.db.as_ref().ok_or((
        StatusCode::SERVICE_UNAVAILABLE,
        Json(ErrorBody::new("database not configured")),
    ))?;

    match db.health_check().await {
        Ok(()) => Ok(Json(serde_json::json!({"status": "ok"}))),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorBody::new("database unreachable")),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{UserService, WalletService};
    use crate::ledger::{
        LedgerService, NewTransaction, STATUS_COMPLETED, Transaction, TransactionType,
    };
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicI64, Ordering};

    /// In-memory stand-ins for the Pg-backed services, mirroring their
    /// error contracts.
    struct MockDirectory {
        users: Mutex<HashMap<i64, User>>,
        wallets: Mutex<HashMap<i64, Wallet>>,
        next_id: AtomicI64,
    }

    impl MockDirectory {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                users: Mutex::new(HashMap::new()),
                wallets: Mutex::new(HashMap::new()),
                next_id: AtomicI64::new(1),
            })
        }

        fn next(&self) -> i64 {
            self.next_id.fetch_add(1, Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl UserService for MockDirectory {
        async fn create(&self, name: &str, email: &str) -> Result<User, AccountError> {
            let mut users = self.users.lock().unwrap();
            if users.values().any(|u| u.email == email) {
                return Err(AccountError::EmailInUse);
            }
            let user = User {
                id: self.next(),
                name: name.to_string(),
                email: email.to_string(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };
            users.insert(user.id, user.clone());
            Ok(user)
        }

        async fn get(&self, id: i64) -> Result<User, AccountError> {
            self.users
                .lock()
                .unwrap()
                .get(&id)
                .cloned()
                .ok_or(AccountError::UserNotFound(id))
        }
    }

    #[async_trait]
    impl WalletService for MockDirectory {
        async fn create(&self, user_id: i64) -> Result<Wallet, AccountError> {
            if !self.users.lock().unwrap().contains_key(&user_id) {
                return Err(AccountError::UserNotFound(user_id));
            }
            let wallet = Wallet {
                id: self.next(),
                user_id,
                balance: 0,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };
            self.wallets.lock().unwrap().insert(wallet.id, wallet.clone());
            Ok(wallet)
        }

        async fn get(&self, id: i64) -> Result<Wallet, AccountError> {
            self.wallets
                .lock()
                .unwrap()
                .get(&id)
                .cloned()
                .ok_or(AccountError::WalletNotFound(id))
        }

        async fn for_user(&self, user_id: i64) -> Result<Vec<Wallet>, AccountError> {
            if !self.users.lock().unwrap().contains_key(&user_id) {
                return Err(AccountError::UserNotFound(user_id));
            }
            let mut wallets: Vec<Wallet> = self
                .wallets
                .lock()
                .unwrap()
                .values()
                .filter(|w| w.user_id == user_id)
                .cloned()
                .collect();
            wallets.sort_by_key(|w| w.id);
            Ok(wallets)
        }
    }

    /// In-memory ledger enforcing the same rules as the Pg engine.
    struct MockLedger {
        balances: Mutex<HashMap<i64, i64>>,
        log: Mutex<Vec<Transaction>>,
    }

    impl MockLedger {
        fn with_wallets(ids: &[i64]) -> Arc<Self> {
            Arc::new(Self {
                balances: Mutex::new(ids.iter().map(|id| (*id, 0)).collect()),
                log: Mutex::new(Vec::new()),
            })
        }

        fn record(&self, tx: NewTransaction) {
            let mut log = self.log.lock().unwrap();
            let id = log.len() as i64 + 1;
            log.push(Transaction {
                id,
                source_wallet_id: tx.source_wallet_id,
                target_wallet_id: tx.target_wallet_id,
                amount: tx.amount,
                tx_type: tx.tx_type,
                reference_number: tx.reference_number,
                status: STATUS_COMPLETED.to_string(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            });
        }
    }

    #[async_trait]
    impl LedgerService for MockLedger {
        async fn deposit(&self, wallet_id: i64, amount: i64) -> Result<(), LedgerError> {
            if amount <= 0 {
                return Err(LedgerError::InvalidAmount);
            }
            let mut balances = self.balances.lock().unwrap();
            let balance = balances
                .get_mut(&wallet_id)
                .ok_or(LedgerError::WalletNotFound(wallet_id))?;
            *balance += amount;
            drop(balances);
            self.record(NewTransaction::deposit(wallet_id, amount));
            Ok(())
        }

        async fn transfer(&self, source: i64, target: i64, amount: i64) -> Result<(), LedgerError> {
            if amount <= 0 {
                return Err(LedgerError::InvalidAmount);
            }
            if source == target {
                return Err(LedgerError::SameWallet);
            }
            let mut balances = self.balances.lock().unwrap();
            let available = *balances
                .get(&source)
                .ok_or(LedgerError::WalletNotFound(source))?;
            if !balances.contains_key(&target) {
                return Err(LedgerError::WalletNotFound(target));
            }
            if available < amount {
                return Err(LedgerError::InsufficientBalance {
                    available,
                    requested: amount,
                });
            }
            *balances.get_mut(&source).unwrap() -= amount;
            *balances.get_mut(&target).unwrap() += amount;
            drop(balances);
            self.record(NewTransaction::transfer(source, target, amount));
            Ok(())
        }

        async fn transactions_by_wallet(
            &self,
            wallet_id: i64,
        ) -> Result<Vec<Transaction>, LedgerError> {
            Ok(self
                .log
                .lock()
                .unwrap()
                .iter()
                .filter(|t| {
                    t.source_wallet_id == Some(wallet_id) || t.target_wallet_id == wallet_id
                })
                .cloned()
                .collect())
        }
    }

    fn test_state(directory: Arc<MockDirectory>, ledger: Arc<MockLedger>) -> Arc<AppState> {
        Arc::new(AppState {
            db: None,
            users: directory.clone(),
            wallets: directory,
            ledger,
        })
    }

    async fn seeded_state() -> (Arc<AppState>, i64, i64) {
        let directory = MockDirectory::new();
        let alice = UserService::create(&*directory, "Alice", "alice@example.com")
            .await
            .unwrap();
        let w1 = WalletService::create(&*directory, alice.id).await.unwrap();
        let w2 = WalletService::create(&*directory, alice.id).await.unwrap();
        let ledger = MockLedger::with_wallets(&[w1.id, w2.id]);
        (test_state(directory, ledger), w1.id, w2.id)
    }

    #[tokio::test]
    async fn test_create_user_returns_201() {
        let state = test_state(MockDirectory::new(), MockLedger::with_wallets(&[]));
        let req = CreateUserRequest {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
        };

        let (status, Json(user)) = create_user(State(state), Json(req)).await.unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(user.name, "Alice");
    }

    #[tokio::test]
    async fn test_create_user_duplicate_email_is_400() {
        let state = test_state(MockDirectory::new(), MockLedger::with_wallets(&[]));
        let req = || CreateUserRequest {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
        };

        create_user(State(state.clone()), Json(req())).await.unwrap();
        let (status, Json(body)) = create_user(State(state), Json(req())).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Email already in use");
    }

    #[tokio::test]
    async fn test_create_user_invalid_email_is_400() {
        let state = test_state(MockDirectory::new(), MockLedger::with_wallets(&[]));
        let req = CreateUserRequest {
            name: "Alice".to_string(),
            email: "nope".to_string(),
        };

        let (status, _) = create_user(State(state), Json(req)).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_user_not_found_is_404() {
        let state = test_state(MockDirectory::new(), MockLedger::with_wallets(&[]));
        let (status, _) = get_user(State(state), Path(999)).await.unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_wallet_for_unknown_user_is_400() {
        let state = test_state(MockDirectory::new(), MockLedger::with_wallets(&[]));
        let req = CreateWalletRequest { user_id: 999 };

        let (status, Json(body)) = create_wallet(State(state), Json(req)).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.error.contains("User not found"));
    }

    #[tokio::test]
    async fn test_list_wallets_for_unknown_user_is_404() {
        let state = test_state(MockDirectory::new(), MockLedger::with_wallets(&[]));
        let (status, _) = get_user_wallets(State(state), Path(999)).await.unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_deposit_and_transfer_happy_path() {
        let (state, w1, w2) = seeded_state().await;

        let Json(body) = deposit(
            State(state.clone()),
            Json(DepositRequest {
                wallet_id: w1,
                amount: 1000,
            }),
        )
        .await
        .unwrap();
        assert_eq!(body.message, "deposit successful");

        let Json(body) = transfer(
            State(state.clone()),
            Json(TransferRequest {
                source_wallet_id: w1,
                target_wallet_id: w2,
                amount: 500,
            }),
        )
        .await
        .unwrap();
        assert_eq!(body.message, "transfer successful");

        let Json(transactions) = get_wallet_transactions(State(state), Path(w1))
            .await
            .unwrap();
        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].tx_type, TransactionType::Deposit);
        assert_eq!(transactions[1].tx_type, TransactionType::Transfer);
    }

    #[tokio::test]
    async fn test_deposit_non_positive_amount_is_400() {
        let (state, w1, _) = seeded_state().await;
        let (status, _) = deposit(
            State(state),
            Json(DepositRequest {
                wallet_id: w1,
                amount: 0,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_transfer_same_wallet_is_400() {
        let (state, w1, _) = seeded_state().await;
        let (status, Json(body)) = transfer(
            State(state),
            Json(TransferRequest {
                source_wallet_id: w1,
                target_wallet_id: w1,
                amount: 100,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Source and target wallets cannot be the same");
    }

    #[tokio::test]
    async fn test_transfer_insufficient_balance_is_400() {
        let (state, w1, w2) = seeded_state().await;
        let (status, Json(body)) = transfer(
            State(state),
            Json(TransferRequest {
                source_wallet_id: w1,
                target_wallet_id: w2,
                amount: 100,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.error.contains("Insufficient balance"));
    }

    #[tokio::test]
    async fn test_transactions_for_unknown_wallet_is_404() {
        let (state, _, _) = seeded_state().await;
        let (status, _) = get_wallet_transactions(State(state), Path(9999))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
