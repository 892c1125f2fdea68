//! # Marketplace Error Types
//!
//! Typed error handling for the SupplyLink marketplace.
//! Store, cart, checkout and payment operations return `Result<T, MarketError>`.

use thiserror::Error;

/// Core error type for all marketplace operations
#[derive(Debug, Error)]
pub enum MarketError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Bad credentials or missing caller identity
    #[error("{0}")]
    Unauthorized(String),

    /// Entity missing from the store
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Email already taken by another user
    #[error("Email already registered")]
    EmailTaken,

    /// Order status change outside the lifecycle
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    /// Payment provider API error
    #[error("Provider error [{provider}]: {message}")]
    ProviderError { provider: String, message: String },

    /// Network/HTTP error communicating with provider
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Webhook signature verification failed
    #[error("Webhook verification failed: {0}")]
    WebhookVerificationFailed(String),

    /// Webhook payload parsing error
    #[error("Webhook parse error: {0}")]
    WebhookParseError(String),

    /// Internal error (poisoned store lock, broken invariant)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl MarketError {
    /// Shorthand for a missing entity
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        MarketError::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            MarketError::Configuration(_) => 500,
            MarketError::InvalidRequest(_) => 400,
            MarketError::Unauthorized(_) => 401,
            MarketError::NotFound { .. } => 404,
            MarketError::EmailTaken => 400,
            MarketError::InvalidTransition { .. } => 400,
            MarketError::ProviderError { .. } => 502,
            MarketError::NetworkError(_) => 503,
            MarketError::WebhookVerificationFailed(_) => 400,
            MarketError::WebhookParseError(_) => 400,
            MarketError::Internal(_) => 500,
            MarketError::Serialization(_) => 500,
        }
    }
}

/// Result type alias for marketplace operations
pub type MarketResult<T> = Result<T, MarketError>;
