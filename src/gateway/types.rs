//! Request and response bodies shared across gateway handlers

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Error body: `{"error": "..."}`
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(msg: impl ToString) -> Self {
        Self {
            error: msg.to_string(),
        }
    }
}

/// Success body for deposits/transfers: `{"message": "..."}`
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageBody {
    pub message: &'static str,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "invalid email format"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateWalletRequest {
    #[validate(range(min = 1, message = "user_id is required"))]
    pub user_id: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DepositRequest {
    pub wallet_id: i64,
    /// Amount in the smallest currency unit, must be positive
    #[validate(range(min = 1, message = "amount must be positive"))]
    pub amount: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TransferRequest {
    pub source_wallet_id: i64,
    pub target_wallet_id: i64,
    /// Amount in the smallest currency unit, must be positive
    #[validate(range(min = 1, message = "amount must be positive"))]
    pub amount: i64,
}
