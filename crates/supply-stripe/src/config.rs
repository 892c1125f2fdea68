//! # Stripe Configuration
//!
//! Keys come from the environment (`.env` is honored). A missing secret key
//! means online payments are disabled; malformed keys are a startup error.

use std::env;
use supply_core::{MarketError, MarketResult};

const DEFAULT_API_BASE: &str = "https://api.stripe.com";
const DEFAULT_API_VERSION: &str = "2024-12-18.acacia";

/// Stripe API configuration
#[derive(Debug, Clone)]
pub struct StripeConfig {
    /// Secret API key (sk_test_... or sk_live_...)
    pub secret_key: String,

    /// Publishable key handed to the browser (pk_test_... or pk_live_...)
    pub publishable_key: Option<String>,

    /// Webhook signing secret (whsec_...)
    pub webhook_secret: String,

    /// API base URL (overridden in tests)
    pub api_base_url: String,

    pub api_version: String,
}

impl StripeConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `Ok(None)` when `STRIPE_SECRET_KEY` is unset.
    pub fn from_env() -> MarketResult<Option<Self>> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> MarketResult<Option<Self>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(secret_key) = lookup("STRIPE_SECRET_KEY").filter(|k| !k.is_empty()) else {
            return Ok(None);
        };
        let webhook_secret = lookup("STRIPE_WEBHOOK_SECRET").ok_or_else(|| {
            MarketError::Configuration("STRIPE_WEBHOOK_SECRET not set".to_string())
        })?;

        let mut config = Self::new(secret_key, webhook_secret);
        config.publishable_key = lookup("STRIPE_PUBLISHABLE_KEY").filter(|k| !k.is_empty());
        config.validate()?;
        Ok(Some(config))
    }

    /// Create config with explicit values
    pub fn new(secret_key: impl Into<String>, webhook_secret: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            publishable_key: None,
            webhook_secret: webhook_secret.into(),
            api_base_url: DEFAULT_API_BASE.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    /// Check key prefixes
    pub fn validate(&self) -> MarketResult<()> {
        if !self.secret_key.starts_with("sk_test_") && !self.secret_key.starts_with("sk_live_") {
            return Err(MarketError::Configuration(
                "STRIPE_SECRET_KEY must start with sk_test_ or sk_live_".to_string(),
            ));
        }

        if let Some(pk) = &self.publishable_key {
            if !pk.starts_with("pk_test_") && !pk.starts_with("pk_live_") {
                return Err(MarketError::Configuration(
                    "STRIPE_PUBLISHABLE_KEY must start with pk_test_ or pk_live_".to_string(),
                ));
            }
        }

        if !self.webhook_secret.starts_with("whsec_") {
            return Err(MarketError::Configuration(
                "STRIPE_WEBHOOK_SECRET must start with whsec_".to_string(),
            ));
        }
        Ok(())
    }

    /// Check if using test keys
    pub fn is_test_mode(&self) -> bool {
        self.secret_key.starts_with("sk_test_")
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.secret_key)
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}
