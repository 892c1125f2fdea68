//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the marketplace store, payment strategies and configuration.

use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use supply_core::{
    BoxedPaymentStrategy, CheckoutUrls, MarketStore, PaymentStrategySelector, SeedData,
};
use supply_stripe::StripeCheckoutStrategy;
use tracing::{info, warn};

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Public origin of the web app, used for payment redirects
    pub domain: String,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Seed file replacing the bundled demo data
    pub seed_file: Option<String>,
    /// Emit JSON log lines
    pub json_logs: bool,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("PORT").and_then(|p| p.parse().ok()).unwrap_or(5000);
        Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            domain: lookup("DOMAIN").unwrap_or_else(|| format!("http://localhost:{}", port)),
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            seed_file: lookup("SEED_FILE").filter(|s| !s.is_empty()),
            json_logs: lookup("LOG_FORMAT").is_some_and(|f| f.eq_ignore_ascii_case("json")),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.host, self.port))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Read the seed data this configuration points at
    pub fn load_seed(&self) -> anyhow::Result<SeedData> {
        match &self.seed_file {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read seed file {}", path))?;
                let seed = SeedData::from_toml(&content)
                    .with_context(|| format!("failed to parse {}", path))?;
                info!(path = %path, "loaded seed data");
                Ok(seed)
            }
            None => Ok(SeedData::bundled()?),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Marketplace data
    pub store: Arc<MarketStore>,
    /// Payment strategy selector
    pub strategies: PaymentStrategySelector,
    /// Payment redirect URLs
    pub urls: CheckoutUrls,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Build state from the environment: seeded store plus Stripe when configured
    pub fn new() -> anyhow::Result<Self> {
        Self::from_config(AppConfig::from_env())
    }

    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let store = MarketStore::from_seed(config.load_seed()?)?;

        let mut strategies = PaymentStrategySelector::new("stripe");
        match StripeCheckoutStrategy::from_env().context("failed to initialize Stripe")? {
            Some(stripe) => {
                if stripe.config().is_test_mode() {
                    info!("Stripe running in test mode");
                }
                strategies.register(Arc::new(stripe) as BoxedPaymentStrategy);
            }
            None => warn!("STRIPE_SECRET_KEY not set, online payments disabled"),
        }

        Ok(Self::with_parts(config, store, strategies))
    }

    /// Assemble state from already-built parts
    pub fn with_parts(
        config: AppConfig,
        store: MarketStore,
        strategies: PaymentStrategySelector,
    ) -> Self {
        Self {
            store: Arc::new(store),
            strategies,
            urls: CheckoutUrls::new(&config.domain),
            config,
        }
    }

    /// Get the default payment strategy
    pub fn default_strategy(&self) -> Option<&BoxedPaymentStrategy> {
        self.strategies.default_strategy()
    }
}
