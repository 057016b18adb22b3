use std::sync::Arc;

use crate::account::{UserService, WalletService};
use crate::db::Database;
use crate::ledger::LedgerService;

/// Gateway application state (shared)
pub struct AppState {
    /// Database handle for health checks; `None` in handler tests
    pub db: Option<Arc<Database>>,
    pub users: Arc<dyn UserService>,
    pub wallets: Arc<dyn WalletService>,
    pub ledger: Arc<dyn LedgerService>,
}

impl AppState {
    pub fn new(
        db: Option<Arc<Database>>,
        users: Arc<dyn UserService>,
        wallets: Arc<dyn WalletService>,
        ledger: Arc<dyn LedgerService>,
    ) -> Self {
        Self {
            db,
            users,
            wallets,
            ledger,
        }
    }
}
