//! API gateway
//!
//! Axum HTTP surface over the account directory and the ledger engine.

pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::GatewayConfig;
use state::AppState;

/// Assemble the full route table
pub fn build_router(state: Arc<AppState>) -> Router {
    let api_v1 = Router::new()
        .route("/users", post(handlers::create_user))
        .route("/users/{id}", get(handlers::get_user))
        .route("/users/{id}/wallets", get(handlers::get_user_wallets))
        .route("/wallets", post(handlers::create_wallet))
        .route("/wallets/{id}", get(handlers::get_wallet))
        .route(
            "/wallets/{id}/transactions",
            get(handlers::get_wallet_transactions),
        )
        .route("/deposits", post(handlers::deposit))
        .route("/transfers", post(handlers::transfer));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api/v1", api_v1)
        .with_state(state)
        // Swagger UI is stateless, merged after with_state
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
        )
}

/// Bind the listener and serve until shutdown
pub async fn serve(config: &GatewayConfig, state: Arc<AppState>) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Gateway listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
