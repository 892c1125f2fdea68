//! # Checkout Flow
//!
//! Turns a vendor's cart into an order. Cash-on-delivery orders are created
//! immediately; online payments go through the provider's hosted page and
//! the order is created when the provider reports the payment complete.
//!
//! ```text
//! cod:    cart ──▶ order (pending, total + GST) ──▶ cart cleared
//! online: cart ──▶ HostedCheckout ──▶ provider session ──▶ redirect
//!         webhook ──▶ PaidCheckout ──▶ order (confirmed, paid) + payment
//!                                  ──▶ cart cleared
//! ```

use crate::cart::cart_too_large;
use crate::error::{MarketError, MarketResult};
use crate::money::with_gst;
use crate::order::{NewOrder, Order, OrderPaymentStatus, OrderStatus, PaymentMethod};
use crate::payment::{HostedCheckout, PaidCheckout, PaymentDraft, PaymentStatus};
use crate::store::MarketStore;
use crate::strategy::{CheckoutUrls, PaymentStrategy};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

/// Checkout request from the cart page
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub cart_id: String,
    pub delivery_address: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

/// Where the vendor's browser goes next
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CheckoutOutcome {
    /// Order placed, pay on delivery
    #[serde(rename_all = "camelCase")]
    Cod {
        success: bool,
        order_id: String,
        url: String,
    },
    /// Continue on the provider's hosted payment page
    #[serde(rename_all = "camelCase")]
    Redirect { url: String, session_id: String },
}

/// Check out a cart with the requested payment method
#[instrument(skip_all, fields(cart_id = %request.cart_id))]
pub async fn checkout(
    store: &MarketStore,
    strategy: Option<&dyn PaymentStrategy>,
    request: &CheckoutRequest,
    urls: &CheckoutUrls,
) -> MarketResult<CheckoutOutcome> {
    let cart = store.get_cart(&request.cart_id)?;
    if cart.is_empty() {
        return Err(MarketError::InvalidRequest("Cart is empty".into()));
    }
    let delivery_address = request.delivery_address.trim();
    if delivery_address.is_empty() {
        return Err(MarketError::InvalidRequest("Delivery address is required".into()));
    }

    match request.payment_method {
        PaymentMethod::Cod => {
            let notes = request.notes.clone();
            let (order, _) = store.convert_cart(
                &request.cart_id,
                |cart| {
                    if cart.is_empty() {
                        return Err(MarketError::InvalidRequest("Cart is empty".into()));
                    }
                    Ok(NewOrder {
                        vendor_id: cart.cart.vendor_id.clone(),
                        supplier_id: cart.cart.supplier_id.clone(),
                        status: OrderStatus::Pending,
                        total_amount: with_gst(cart.total_amount).ok_or_else(cart_too_large)?,
                        items: cart.items.iter().map(Into::into).collect(),
                        delivery_address: delivery_address.to_string(),
                        estimated_delivery: None,
                        payment_method: PaymentMethod::Cod,
                        payment_status: OrderPaymentStatus::Pending,
                        notes,
                    })
                },
                None,
            )?;
            info!(order_id = %order.id, "cash-on-delivery order placed");
            Ok(CheckoutOutcome::Cod {
                success: true,
                url: CheckoutUrls::order_confirmation(&order.id),
                order_id: order.id,
            })
        }
        PaymentMethod::Online => {
            let strategy = strategy.ok_or_else(|| {
                MarketError::Configuration("no online payment provider configured".into())
            })?;
            let hosted =
                HostedCheckout::from_cart(&cart, delivery_address, request.notes.as_deref())?;
            let session = strategy
                .create_checkout(&hosted, &urls.success_url(), &urls.cancel_url())
                .await?;
            info!(
                session_id = %session.session_id,
                provider = strategy.provider_name(),
                amount = ?hosted.total().map(|total| total.display()),
                "hosted checkout session created"
            );
            Ok(CheckoutOutcome::Redirect {
                url: session.checkout_url,
                session_id: session.session_id,
            })
        }
    }
}

/// Record an order for a hosted checkout the provider reports as paid.
///
/// Returns `None` when there is nothing to do: the cart is already gone,
/// or this payment intent was recorded by an earlier delivery.
#[instrument(skip_all, fields(cart_id = %paid.cart_id))]
pub fn complete_online_checkout(store: &MarketStore, paid: PaidCheckout) -> MarketResult<Option<Order>> {
    if let Some(intent) = &paid.payment_intent_id {
        if let Some(existing) = store.find_payment_by_transaction(intent)? {
            info!(order_id = %existing.order_id, "payment already recorded, ignoring");
            return Ok(None);
        }
    }

    let payment = PaymentDraft {
        provider_transaction_id: paid.payment_intent_id.clone(),
        amount: paid.amount_paid,
        status: PaymentStatus::Succeeded,
        method: Some("card".to_string()),
    };
    let result = store.convert_cart(
        &paid.cart_id,
        |cart| {
            Ok(NewOrder {
                vendor_id: cart.cart.vendor_id.clone(),
                supplier_id: cart.cart.supplier_id.clone(),
                status: OrderStatus::Confirmed,
                total_amount: paid.amount_paid,
                items: cart.items.iter().map(Into::into).collect(),
                delivery_address: paid.delivery_address.clone(),
                estimated_delivery: None,
                payment_method: PaymentMethod::Online,
                payment_status: OrderPaymentStatus::Paid,
                notes: paid.notes.clone(),
            })
        },
        Some(payment),
    );

    match result {
        Ok((order, _)) => {
            info!(order_id = %order.id, amount = %order.total_amount.display(), "online order recorded");
            Ok(Some(order))
        }
        Err(MarketError::NotFound { entity: "Cart", .. }) => {
            warn!("cart no longer exists, skipping order creation");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
