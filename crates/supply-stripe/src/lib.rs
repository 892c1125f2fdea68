//! # supply-stripe
//!
//! Stripe Checkout Sessions strategy for SupplyLink online payments.
//!
//! Vendors paying online are redirected to Stripe's hosted page. When the
//! payment completes, Stripe calls the webhook endpoint; the signed event
//! is verified here and handed to a [`WebhookHandler`] that records the
//! order.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use supply_stripe::StripeCheckoutStrategy;
//! use supply_core::{HostedCheckout, PaymentStrategy};
//!
//! // None when STRIPE_SECRET_KEY is unset
//! let strategy = StripeCheckoutStrategy::from_env()?.expect("stripe configured");
//!
//! let hosted = HostedCheckout::from_cart(&cart, "Stall 4, Dadar Market", None)?;
//! let session = strategy.create_checkout(&hosted, &success_url, &cancel_url).await?;
//!
//! // Redirect the vendor to session.checkout_url
//! ```
//!
//! ## Webhook Handling
//!
//! ```rust,ignore
//! use supply_stripe::{dispatch_webhook_event, CheckoutCompletedData, WebhookHandler};
//!
//! struct Fulfillment;
//!
//! impl WebhookHandler for Fulfillment {
//!     fn on_checkout_completed(&self, data: CheckoutCompletedData) -> MarketResult<()> {
//!         let paid = data.to_paid_checkout()?;
//!         // create the order for paid.cart_id
//!         Ok(())
//!     }
//! }
//!
//! let event = strategy.verify_webhook(payload, signature).await?;
//! dispatch_webhook_event(&Fulfillment, event)?;
//! ```

pub mod checkout;
pub mod config;
pub mod webhook;

// Re-exports
pub use checkout::{sign_payload, verify_signature, StripeCheckoutStrategy};
pub use config::StripeConfig;
pub use webhook::{
    dispatch_webhook_event, CheckoutCompletedData, WebhookHandler, REQUIRED_WEBHOOK_EVENTS,
};
