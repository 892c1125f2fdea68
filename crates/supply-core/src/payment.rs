//! # Payment Types
//!
//! Payment records, hosted checkout requests, provider sessions and
//! parsed webhook events.

use crate::cart::{cart_too_large, CartView};
use crate::error::MarketResult;
use crate::money::{gst_of, Currency, Price, GST_PERCENT};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Metadata key carrying the cart id through the provider
pub const META_CART_ID: &str = "cart_id";
/// Metadata key carrying the delivery address through the provider
pub const META_DELIVERY_ADDRESS: &str = "delivery_address";
/// Metadata key carrying vendor notes through the provider
pub const META_NOTES: &str = "notes";

/// Status of a payment record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Processing,
    Succeeded,
    Failed,
    Canceled,
}

/// A payment made against an order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub order_id: String,
    /// Provider transaction id (Stripe payment intent)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_transaction_id: Option<String>,
    pub amount: Price,
    pub status: PaymentStatus,
    /// Instrument used (card, upi, netbanking, wallet)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A payment about to be recorded; the order id is attached when the
/// order it pays for is created.
#[derive(Debug, Clone)]
pub struct PaymentDraft {
    pub provider_transaction_id: Option<String>,
    pub amount: Price,
    pub status: PaymentStatus,
    pub method: Option<String>,
}

impl PaymentDraft {
    pub fn for_order(self, order_id: impl Into<String>) -> Payment {
        let now = Utc::now();
        Payment {
            id: Uuid::new_v4().to_string(),
            order_id: order_id.into(),
            provider_transaction_id: self.provider_transaction_id,
            amount: self.amount,
            status: self.status,
            method: self.method,
            failure_reason: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial payment update
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentUpdate {
    pub status: Option<PaymentStatus>,
    pub failure_reason: Option<String>,
    pub method: Option<String>,
}

impl PaymentUpdate {
    pub fn apply(self, payment: &mut Payment) {
        if let Some(status) = self.status {
            payment.status = status;
        }
        if let Some(reason) = self.failure_reason {
            payment.failure_reason = Some(reason);
        }
        if let Some(method) = self.method {
            payment.method = Some(method);
        }
        payment.updated_at = Utc::now();
    }
}

/// A line on the hosted payment page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostedLineItem {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub unit_amount: Price,
    pub quantity: u32,
}

/// What a payment provider needs to open a hosted checkout for a cart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostedCheckout {
    /// Internal reference (the cart id)
    pub reference: String,
    pub currency: Currency,
    pub line_items: Vec<HostedLineItem>,
    /// Idempotency key for the provider request
    pub idempotency_key: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

impl HostedCheckout {
    /// One line per cart item plus a GST line, so the charged amount
    /// matches the cash-on-delivery total.
    pub fn from_cart(
        cart: &CartView,
        delivery_address: &str,
        notes: Option<&str>,
    ) -> MarketResult<Self> {
        let mut line_items: Vec<HostedLineItem> = cart
            .items
            .iter()
            .map(|line| HostedLineItem {
                name: line.product_name.clone(),
                description: Some(format!("From {}", line.supplier_name)),
                unit_amount: line.item.price_per_unit,
                quantity: line.item.quantity,
            })
            .collect();

        let gst = gst_of(cart.total_amount).ok_or_else(cart_too_large)?;
        if gst.amount > 0 {
            line_items.push(HostedLineItem {
                name: format!("GST ({}%)", GST_PERCENT),
                description: None,
                unit_amount: gst,
                quantity: 1,
            });
        }

        let mut metadata = HashMap::new();
        metadata.insert(META_CART_ID.to_string(), cart.cart.id.clone());
        metadata.insert(META_DELIVERY_ADDRESS.to_string(), delivery_address.to_string());
        metadata.insert(META_NOTES.to_string(), notes.unwrap_or_default().to_string());

        let checkout = Self {
            reference: cart.cart.id.clone(),
            currency: cart.total_amount.currency,
            line_items,
            idempotency_key: Uuid::new_v4().to_string(),
            metadata,
        };
        checkout.total().ok_or_else(cart_too_large)?;
        Ok(checkout)
    }

    /// Amount the provider will charge
    pub fn total(&self) -> Option<Price> {
        self.line_items
            .iter()
            .try_fold(Price::zero(self.currency), |total, item| {
                total.checked_add(&item.unit_amount.checked_times(item.quantity)?)
            })
    }

    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }
}

/// Status of a checkout session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStatus {
    /// Session created, awaiting payment
    #[default]
    Open,
    /// Payment completed successfully
    Complete,
    /// Session expired
    Expired,
}

/// A checkout session created by a payment provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Provider's session ID
    pub session_id: String,

    /// Our reference (the cart id)
    pub reference: String,

    /// Provider name (e.g., "stripe")
    pub provider: String,

    /// URL to redirect the vendor to for payment
    pub checkout_url: String,

    #[serde(default)]
    pub status: CheckoutStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}

impl CheckoutSession {
    pub fn new(
        session_id: impl Into<String>,
        reference: impl Into<String>,
        provider: impl Into<String>,
        checkout_url: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            reference: reference.into(),
            provider: provider.into(),
            checkout_url: checkout_url.into(),
            status: CheckoutStatus::Open,
            expires_at: None,
            created_at: Utc::now(),
        }
    }

    /// Check if session is still valid
    pub fn is_active(&self) -> bool {
        matches!(self.status, CheckoutStatus::Open)
            && self.expires_at.map(|exp| exp > Utc::now()).unwrap_or(true)
    }
}

/// Webhook event types we care about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookEventType {
    /// Checkout session completed
    CheckoutCompleted,
    /// Checkout session expired without payment
    CheckoutExpired,
    /// Payment succeeded
    PaymentSucceeded,
    /// Payment failed
    PaymentFailed,
    /// Refund issued
    RefundIssued,
    /// Unknown event (passthrough)
    Unknown(String),
}

/// A parsed webhook event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// Event ID from provider
    pub event_id: String,

    pub event_type: WebhookEventType,

    /// Provider name
    pub provider: String,

    /// Related session ID (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// Related payment intent ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_intent_id: Option<String>,

    /// Amount paid (in smallest unit)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_paid: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,

    /// Raw event object
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_data: Option<serde_json::Value>,

    pub timestamp: DateTime<Utc>,
}

/// A completed hosted checkout, ready to be turned into an order
#[derive(Debug, Clone, PartialEq)]
pub struct PaidCheckout {
    pub cart_id: String,
    pub delivery_address: String,
    pub notes: Option<String>,
    pub amount_paid: Price,
    pub payment_intent_id: Option<String>,
}
