//! Account directory module
//!
//! PostgreSQL-based storage for users and wallets: registration, wallet
//! creation and plain lookups. Balance mutation is the ledger's job.

pub mod models;
pub mod repository;
pub mod service;

pub use models::{User, Wallet};
pub use repository::{UserRepository, WalletRepository};
pub use service::{AccountError, PgUserService, PgWalletService, UserService, WalletService};
