//! API response envelope and error mapping
//!
//! All responses share one structure: `code` (0 = success), `msg`, and
//! an optional `data` payload. Business failures carry their specific
//! message; infrastructure failures render a generic retry message.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::checkout::CheckoutError;

/// Unified API response wrapper
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response code: 0 for success, non-zero for errors
    #[schema(example = 0)]
    pub code: i32,
    /// Response message
    #[schema(example = "ok")]
    pub msg: String,
    /// Response data (only present when code == 0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create success response
    pub fn success(data: T) -> Self {
        Self {
            code: 0,
            msg: "ok".to_string(),
            data: Some(data),
        }
    }
}

/// Standard API error codes
pub mod error_codes {
    // Success
    pub const SUCCESS: i32 = 0;

    // Client errors (1xxx)
    pub const INVALID_PARAMETER: i32 = 1001;
    pub const EMPTY_CART: i32 = 1002;
    pub const PRODUCT_UNAVAILABLE: i32 = 1003;
    pub const INSUFFICIENT_STOCK: i32 = 1004;

    // Auth errors (2xxx)
    pub const MISSING_AUTH: i32 = 2001;

    // Resource errors (4xxx)
    pub const ORDER_NOT_FOUND: i32 = 4001;

    // Server errors (5xxx)
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const SERVICE_UNAVAILABLE: i32 = 5001;
}

/// Handler result: success envelope or typed error
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Success helper
pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}

/// API error carrying HTTP status, envelope code and message
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: i32,
    pub msg: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: i32, msg: impl Into<String>) -> Self {
        Self {
            status,
            code,
            msg: msg.into(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error_codes::INVALID_PARAMETER, msg)
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, error_codes::MISSING_AUTH, msg)
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, error_codes::ORDER_NOT_FOUND, msg)
    }

    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::INTERNAL_ERROR,
            "Something went wrong, please try again",
        )
    }

    /// Convenience for `return ApiError::...(..).into_err()`
    pub fn into_err<T>(self) -> ApiResult<T> {
        Err(self)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiResponse::<()> {
            code: self.code,
            msg: self.msg,
            data: None,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        match &err {
            CheckoutError::Unauthenticated => ApiError::unauthorized(err.to_string()),
            CheckoutError::EmptyCart => ApiError::new(
                StatusCode::BAD_REQUEST,
                error_codes::EMPTY_CART,
                err.to_string(),
            ),
            CheckoutError::ProductUnavailable => ApiError::new(
                StatusCode::BAD_REQUEST,
                error_codes::PRODUCT_UNAVAILABLE,
                err.to_string(),
            ),
            CheckoutError::InsufficientStock { .. } => ApiError::new(
                StatusCode::BAD_REQUEST,
                error_codes::INSUFFICIENT_STOCK,
                err.to_string(),
            ),
            CheckoutError::InvalidPayment
            | CheckoutError::InvalidCart
            | CheckoutError::InvalidAddress(_) => ApiError::bad_request(err.to_string()),
            // Infrastructure faults never leak details to the buyer
            CheckoutError::Database(e) => {
                tracing::error!("Checkout transaction failed: {}", e);
                ApiError::internal()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_errors_keep_their_message() {
        let api: ApiError = CheckoutError::InsufficientStock {
            product_name: "Brake Pad Set".to_string(),
            available: 2,
        }
        .into();
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.code, error_codes::INSUFFICIENT_STOCK);
        assert!(api.msg.contains("Brake Pad Set"));
        assert!(api.msg.contains('2'));
    }

    #[test]
    fn test_database_errors_render_generic_message() {
        let api: ApiError = CheckoutError::Database(sqlx::Error::PoolTimedOut).into();
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.msg, "Something went wrong, please try again");
    }

    #[test]
    fn test_unauthenticated_maps_to_401() {
        let api: ApiError = CheckoutError::Unauthenticated.into();
        assert_eq!(api.status, StatusCode::UNAUTHORIZED);
        assert_eq!(api.code, error_codes::MISSING_AUTH);
    }
}
