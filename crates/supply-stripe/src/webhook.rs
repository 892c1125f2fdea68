//! # Stripe Webhook Handling
//!
//! Typed access to verified Stripe events and dispatch to a handler.

use std::collections::HashMap;
use supply_core::payment::{META_CART_ID, META_DELIVERY_ADDRESS, META_NOTES};
use supply_core::{
    Currency, MarketError, MarketResult, PaidCheckout, Price, WebhookEvent, WebhookEventType,
};
use tracing::{debug, info, warn};

/// The session object of a `checkout.session.completed` event
#[derive(Debug, Clone)]
pub struct CheckoutCompletedData {
    pub session_id: String,
    pub payment_intent_id: Option<String>,
    pub amount_total: i64,
    pub currency: Currency,
    pub payment_status: String,
    pub metadata: HashMap<String, String>,
}

impl CheckoutCompletedData {
    /// Read the session object carried by the event
    pub fn from_event(event: &WebhookEvent) -> MarketResult<Self> {
        let obj = event
            .raw_data
            .as_ref()
            .and_then(|raw| raw.as_object())
            .ok_or_else(|| MarketError::WebhookParseError("Missing session object".to_string()))?;

        let str_field = |key: &str| obj.get(key).and_then(|v| v.as_str()).map(String::from);

        let session_id = str_field("id")
            .ok_or_else(|| MarketError::WebhookParseError("Missing session id".to_string()))?;

        let currency = str_field("currency")
            .as_deref()
            .and_then(Currency::from_code)
            .unwrap_or_default();

        let metadata = obj
            .get("metadata")
            .and_then(|m| m.as_object())
            .map(|m| {
                m.iter()
                    .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            session_id,
            payment_intent_id: str_field("payment_intent"),
            amount_total: obj.get("amount_total").and_then(|v| v.as_i64()).unwrap_or(0),
            currency,
            payment_status: str_field("payment_status").unwrap_or_else(|| "unknown".to_string()),
            metadata,
        })
    }

    /// Stripe reports the session as paid
    pub fn is_paid(&self) -> bool {
        self.payment_status == "paid"
    }

    /// The cart this session was opened for
    pub fn cart_id(&self) -> Option<&str> {
        self.metadata.get(META_CART_ID).map(|s| s.as_str())
    }

    pub fn delivery_address(&self) -> Option<&str> {
        self.metadata.get(META_DELIVERY_ADDRESS).map(|s| s.as_str())
    }

    /// Vendor notes; empty notes read as none
    pub fn notes(&self) -> Option<&str> {
        self.metadata
            .get(META_NOTES)
            .map(|s| s.as_str())
            .filter(|s| !s.trim().is_empty())
    }

    /// The order-ready view of this session
    pub fn to_paid_checkout(&self) -> MarketResult<PaidCheckout> {
        let cart_id = self.cart_id().ok_or_else(|| {
            MarketError::WebhookParseError(format!("session {} has no cart_id", self.session_id))
        })?;
        Ok(PaidCheckout {
            cart_id: cart_id.to_string(),
            delivery_address: self.delivery_address().unwrap_or_default().to_string(),
            notes: self.notes().map(String::from),
            amount_paid: Price::from_minor(self.amount_total, self.currency),
            payment_intent_id: self.payment_intent_id.clone(),
        })
    }
}

/// Hooks for verified Stripe events. Every hook defaults to logging.
#[allow(unused_variables)]
pub trait WebhookHandler: Send + Sync {
    /// A hosted checkout finished
    fn on_checkout_completed(&self, data: CheckoutCompletedData) -> MarketResult<()> {
        info!(session_id = %data.session_id, amount = data.amount_total, "checkout completed");
        Ok(())
    }

    /// Called when a checkout session expires unpaid
    fn on_checkout_expired(&self, event: &WebhookEvent) -> MarketResult<()> {
        info!("Checkout expired: {:?}", event.session_id);
        Ok(())
    }

    fn on_payment_succeeded(&self, event: &WebhookEvent) -> MarketResult<()> {
        info!("Payment succeeded: {:?}", event.payment_intent_id);
        Ok(())
    }

    fn on_payment_failed(&self, event: &WebhookEvent) -> MarketResult<()> {
        warn!("Payment failed: {:?}", event.payment_intent_id);
        Ok(())
    }

    fn on_refund_issued(&self, event: &WebhookEvent) -> MarketResult<()> {
        info!("Refund issued: {:?}", event.payment_intent_id);
        Ok(())
    }

    /// Events with no dedicated hook
    fn on_unknown_event(&self, event: &WebhookEvent) -> MarketResult<()> {
        debug!("Unhandled webhook event: {:?}", event.event_type);
        Ok(())
    }
}

/// Route a verified event to the matching hook
pub fn dispatch_webhook_event(handler: &dyn WebhookHandler, event: WebhookEvent) -> MarketResult<()> {
    match &event.event_type {
        WebhookEventType::CheckoutCompleted => {
            let data = CheckoutCompletedData::from_event(&event)?;
            handler.on_checkout_completed(data)
        }
        WebhookEventType::CheckoutExpired => handler.on_checkout_expired(&event),
        WebhookEventType::PaymentSucceeded => handler.on_payment_succeeded(&event),
        WebhookEventType::PaymentFailed => handler.on_payment_failed(&event),
        WebhookEventType::RefundIssued => handler.on_refund_issued(&event),
        WebhookEventType::Unknown(_) => handler.on_unknown_event(&event),
    }
}

/// Events to enable on the Stripe webhook endpoint
pub const REQUIRED_WEBHOOK_EVENTS: &[&str] = &[
    "checkout.session.completed",
    "checkout.session.expired",
    "payment_intent.succeeded",
    "payment_intent.payment_failed",
    "charge.refunded",
];
