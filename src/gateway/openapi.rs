//! OpenAPI documentation

use utoipa::OpenApi;

use super::handlers;
use super::types::{
    CreateUserRequest, CreateWalletRequest, DepositRequest, ErrorBody, MessageBody,
    TransferRequest,
};
use crate::account::{User, Wallet};
use crate::ledger::{Transaction, TransactionType};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Wallet API",
        description = "Ledger-style wallet service: users, wallets, atomic deposits and transfers.",
        version = "0.1.0"
    ),
    paths(
        handlers::create_user,
        handlers::get_user,
        handlers::get_user_wallets,
        handlers::create_wallet,
        handlers::get_wallet,
        handlers::deposit,
        handlers::transfer,
        handlers::get_wallet_transactions,
        handlers::health,
    ),
    components(schemas(
        CreateUserRequest,
        CreateWalletRequest,
        DepositRequest,
        TransferRequest,
        ErrorBody,
        MessageBody,
        User,
        Wallet,
        Transaction,
        TransactionType,
    )),
    tags(
        (name = "Users", description = "User registration and lookup"),
        (name = "Wallets", description = "Wallet creation and lookup"),
        (name = "Ledger", description = "Deposits, transfers and the transaction log"),
        (name = "Health", description = "Service health")
    )
)]
pub struct ApiDoc;
