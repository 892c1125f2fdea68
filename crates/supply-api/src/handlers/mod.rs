//! # Request Handlers
//!
//! Axum request handlers for the marketplace API, one module per resource.
//! Every handler returns JSON; failures become `{ "error", "code" }` bodies
//! with the status taken from `MarketError::status_code`.

pub mod admin;
pub mod auth;
pub mod carts;
pub mod catalog;
pub mod dashboard;
pub mod orders;
pub mod payments;
pub mod reviews;
pub mod suppliers;
pub mod users;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use supply_core::MarketError;
use tracing::{debug, error};

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }
}

/// A marketplace error on its way out as an HTTP response
#[derive(Debug)]
pub struct ApiError(pub MarketError);

impl From<MarketError> for ApiError {
    fn from(err: MarketError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.status_code();
        let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(%status, error = %self.0, "request failed");
        } else {
            debug!(%status, error = %self.0, "request rejected");
        }
        (status, Json(ErrorResponse::new(self.0.to_string(), code))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(MarketError::InvalidRequest(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(MarketError::InvalidRequest(rejection.body_text()))
    }
}

/// JSON body extractor whose rejections use the API error body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Query string extractor whose rejections use the API error body
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

pub type ApiResult<T> = Result<Json<T>, ApiError>;

/// `{ "success": true }`
#[derive(Debug, Serialize)]
pub struct Success {
    pub success: bool,
}

impl Success {
    pub fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}

/// Map a false "nothing matched" store result to a 404
pub(crate) fn found(matched: bool, what: &'static str, id: &str) -> Result<Json<Success>, ApiError> {
    if matched {
        Ok(Success::ok())
    } else {
        Err(MarketError::not_found(what, id).into())
    }
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "supplylink",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
