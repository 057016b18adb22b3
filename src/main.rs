//! wallet-api entry point
//!
//! Startup order: config → logging → database connect → schema migrate →
//! service wiring → gateway serve.

use std::sync::Arc;

use wallet_api::account::{PgUserService, PgWalletService};
use wallet_api::config::AppConfig;
use wallet_api::db::Database;
use wallet_api::gateway::{self, state::AppState};
use wallet_api::ledger::LedgerEngine;
use wallet_api::logging::init_logging;

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let config = AppConfig::load(&env)?;
    let _log_guard = init_logging(&config);

    tracing::info!("Starting wallet-api (env: {})", env);

    let db = Arc::new(Database::connect(&config.database_url).await?);
    db.migrate().await?;

    let pool = db.pool().clone();
    let state = Arc::new(AppState::new(
        Some(db),
        Arc::new(PgUserService::new(pool.clone())),
        Arc::new(PgWalletService::new(pool.clone())),
        Arc::new(LedgerEngine::new(pool)),
    ));

    gateway::serve(&config.gateway, state).await
}
