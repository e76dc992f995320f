use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login payload.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Account must not be empty"))]
    pub account: String,
    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
}

/// Login response payload: the bearer token for subsequent requests.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginData {
    pub token: String,
}
