//! # Webhook Fulfilment
//!
//! Turns verified Stripe events into store changes.

use supply_core::{
    complete_online_checkout, MarketResult, MarketStore, PaymentStatus, PaymentUpdate, WebhookEvent,
};
use supply_stripe::{CheckoutCompletedData, WebhookHandler};
use tracing::{info, warn};

/// Webhook handler backed by the marketplace store
pub struct OrderFulfillment<'a> {
    store: &'a MarketStore,
}

impl<'a> OrderFulfillment<'a> {
    pub fn new(store: &'a MarketStore) -> Self {
        Self { store }
    }
}

impl WebhookHandler for OrderFulfillment<'_> {
    fn on_checkout_completed(&self, data: CheckoutCompletedData) -> MarketResult<()> {
        if !data.is_paid() {
            warn!(session_id = %data.session_id, status = %data.payment_status, "checkout completed unpaid");
            return Ok(());
        }
        let paid = data.to_paid_checkout()?;
        if let Some(order) = complete_online_checkout(self.store, paid)? {
            info!(order_id = %order.id, session_id = %data.session_id, "online order created");
        }
        Ok(())
    }

    fn on_checkout_expired(&self, event: &WebhookEvent) -> MarketResult<()> {
        info!(session_id = ?event.session_id, "checkout session expired, cart kept");
        Ok(())
    }

    fn on_payment_failed(&self, event: &WebhookEvent) -> MarketResult<()> {
        let Some(intent) = event.payment_intent_id.as_deref() else {
            return Ok(());
        };
        match self.store.find_payment_by_transaction(intent)? {
            Some(payment) => {
                self.store.update_payment(
                    &payment.id,
                    PaymentUpdate {
                        status: Some(PaymentStatus::Failed),
                        failure_reason: Some("Payment failed at provider".into()),
                        method: None,
                    },
                )?;
                warn!(payment_id = %payment.id, intent, "payment marked failed");
            }
            None => warn!(intent, "payment failed before any order was created"),
        }
        Ok(())
    }
}
