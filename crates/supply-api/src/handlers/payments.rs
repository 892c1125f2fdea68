//! Payments, hosted checkout and the Stripe webhook

use super::{ApiError, ApiJson, ApiResult};
use crate::fulfillment::OrderFulfillment;
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use serde::Serialize;
use supply_core::{checkout, CheckoutOutcome, CheckoutRequest, MarketError, Payment};
use supply_stripe::dispatch_webhook_event;
use tracing::{error, info, instrument};

const SIGNATURE_HEADER: &str = "stripe-signature";

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

pub async fn get_payment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Payment> {
    Ok(Json(state.store.get_payment(&id)?))
}

/// Place a cash-on-delivery order or start a hosted payment
#[instrument(skip_all, fields(cart_id = %request.cart_id, method = ?request.payment_method))]
pub async fn create_checkout_session(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CheckoutRequest>,
) -> ApiResult<CheckoutOutcome> {
    let strategy = state.default_strategy().map(|s| s.as_ref());
    let outcome = checkout(&state.store, strategy, &request, &state.urls).await?;
    Ok(Json(outcome))
}

/// Stripe webhook handler
///
/// The signature is checked against the raw body before anything is parsed.
/// Once verified, the event is always acknowledged; fulfilment failures are
/// only logged.
#[instrument(skip_all)]
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<WebhookAck> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            MarketError::WebhookVerificationFailed("Missing stripe-signature header".into())
        })?;

    let strategy = state.strategies.get("stripe").ok_or_else(|| {
        ApiError(MarketError::Configuration(
            "Stripe webhooks are not configured".into(),
        ))
    })?;

    let event = strategy.verify_webhook(&body, signature).await?;
    info!(event_id = %event.event_id, event_type = ?event.event_type, "webhook received");

    let handler = OrderFulfillment::new(&state.store);
    if let Err(e) = dispatch_webhook_event(&handler, event) {
        error!(error = %e, "webhook processing failed");
    }

    Ok(Json(WebhookAck { received: true }))
}
