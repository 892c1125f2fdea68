//! # Payment Strategy Trait
//!
//! Strategy trait for hosted-payment providers. Online checkout asks the
//! selected strategy for a redirect URL; the provider later calls back
//! through a webhook that the same strategy verifies.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │        PaymentStrategy (trait)           │
//! │  ├── create_checkout()                   │
//! │  ├── verify_webhook()                    │
//! │  └── provider_name()                     │
//! └──────────────────────────────────────────┘
//!                     ▲
//!          ┌──────────┴──────────┐
//!  ┌───────┴────────┐   ┌────────┴───────┐
//!  │ StripeCheckout │   │  test doubles  │
//!  │    Strategy    │   │                │
//!  └────────────────┘   └────────────────┘
//! ```

use crate::error::MarketResult;
use crate::payment::{CheckoutSession, HostedCheckout, WebhookEvent};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// A hosted payment provider.
#[async_trait]
pub trait PaymentStrategy: Send + Sync {
    /// Create a hosted checkout session and return the redirect URL.
    ///
    /// # Arguments
    /// * `checkout` - Line items and metadata built from the cart
    /// * `success_url` - URL to redirect after successful payment
    /// * `cancel_url` - URL to redirect if the vendor cancels
    async fn create_checkout(
        &self,
        checkout: &HostedCheckout,
        success_url: &str,
        cancel_url: &str,
    ) -> MarketResult<CheckoutSession>;

    /// Check the signature over the raw body, then parse the event.
    async fn verify_webhook(&self, payload: &[u8], signature: &str) -> MarketResult<WebhookEvent>;

    /// Name the provider is registered under
    fn provider_name(&self) -> &'static str;
}

/// Shared handle to a provider
pub type BoxedPaymentStrategy = Arc<dyn PaymentStrategy>;

/// Registered providers, keyed by name, with one default
#[derive(Clone)]
pub struct PaymentStrategySelector {
    strategies: HashMap<String, BoxedPaymentStrategy>,
    default_provider: String,
}

impl PaymentStrategySelector {
    /// Empty selector whose default is `default_provider`
    pub fn new(default_provider: impl Into<String>) -> Self {
        Self {
            strategies: HashMap::new(),
            default_provider: default_provider.into(),
        }
    }

    /// Add a provider under its own name
    pub fn register(&mut self, strategy: BoxedPaymentStrategy) {
        let name = strategy.provider_name().to_string();
        self.strategies.insert(name, strategy);
    }

    /// Builder form of `register`
    pub fn with_strategy(mut self, strategy: BoxedPaymentStrategy) -> Self {
        self.register(strategy);
        self
    }

    /// The default provider, if it was registered
    pub fn default_strategy(&self) -> Option<&BoxedPaymentStrategy> {
        self.strategies.get(&self.default_provider)
    }

    /// Strategy registered under `provider`
    pub fn get(&self, provider: &str) -> Option<&BoxedPaymentStrategy> {
        self.strategies.get(provider)
    }

    /// Names of registered providers
    pub fn providers(&self) -> Vec<&str> {
        self.strategies.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for PaymentStrategySelector {
    fn default() -> Self {
        Self::new("stripe")
    }
}

/// Redirect URLs handed to the vendor's browser
#[derive(Debug, Clone)]
pub struct CheckoutUrls {
    /// Public origin of the web app (e.g., "https://supplylink.com")
    pub base_url: String,
}

impl CheckoutUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Where the provider sends the vendor after paying; the provider
    /// substitutes the session id placeholder.
    pub fn success_url(&self) -> String {
        format!(
            "{}/orders?success=true&session_id={{CHECKOUT_SESSION_ID}}",
            self.base_url
        )
    }

    /// Where the provider sends the vendor after abandoning payment
    pub fn cancel_url(&self) -> String {
        format!("{}/cart", self.base_url)
    }

    /// Client-relative page confirming a cash-on-delivery order
    pub fn order_confirmation(order_id: &str) -> String {
        format!("/orders?success=true&order_id={}", order_id)
    }
}

impl Default for CheckoutUrls {
    fn default() -> Self {
        Self::new("http://localhost:5000")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_urls() {
        let urls = CheckoutUrls::new("https://supplylink.com/");

        assert_eq!(
            urls.success_url(),
            "https://supplylink.com/orders?success=true&session_id={CHECKOUT_SESSION_ID}"
        );
        assert_eq!(urls.cancel_url(), "https://supplylink.com/cart");
        assert_eq!(
            CheckoutUrls::order_confirmation("ORD-ABC123"),
            "/orders?success=true&order_id=ORD-ABC123"
        );
    }

    #[test]
    fn test_strategy_selector() {
        let selector = PaymentStrategySelector::new("stripe");

        assert_eq!(selector.providers().len(), 0);
        assert!(selector.default_strategy().is_none());
        assert!(selector.get("stripe").is_none());
    }
}
