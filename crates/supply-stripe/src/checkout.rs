//! # Stripe Checkout Sessions
//!
//! Opens hosted Checkout Sessions for vendor carts and verifies the
//! signed webhooks Stripe sends back.

use crate::config::StripeConfig;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use supply_core::{
    CheckoutSession, CheckoutStatus, Currency, HostedCheckout, MarketError, MarketResult,
    PaymentStrategy, WebhookEvent, WebhookEventType,
};
use tracing::{debug, error, info, instrument};

const PROVIDER: &str = "stripe";

/// Maximum age of a webhook signature timestamp, in seconds
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

/// Stripe Checkout Session strategy
pub struct StripeCheckoutStrategy {
    config: StripeConfig,
    client: Client,
}

impl StripeCheckoutStrategy {
    pub fn new(config: StripeConfig) -> MarketResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| MarketError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables; `None` when Stripe is not configured
    pub fn from_env() -> MarketResult<Option<Self>> {
        StripeConfig::from_env()?.map(Self::new).transpose()
    }

    pub fn config(&self) -> &StripeConfig {
        &self.config
    }

    /// Form fields for `POST /v1/checkout/sessions`
    fn form_params(
        checkout: &HostedCheckout,
        success_url: &str,
        cancel_url: &str,
    ) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = vec![
            ("payment_method_types[0]".to_string(), "card".to_string()),
            ("mode".to_string(), "payment".to_string()),
            ("success_url".to_string(), success_url.to_string()),
            ("cancel_url".to_string(), cancel_url.to_string()),
            ("client_reference_id".to_string(), checkout.reference.clone()),
        ];

        let currency = checkout.currency.as_str();
        for (i, item) in checkout.line_items.iter().enumerate() {
            params.push((
                format!("line_items[{}][price_data][currency]", i),
                currency.to_string(),
            ));
            params.push((
                format!("line_items[{}][price_data][unit_amount]", i),
                item.unit_amount.amount.to_string(),
            ));
            params.push((
                format!("line_items[{}][price_data][product_data][name]", i),
                item.name.clone(),
            ));
            if let Some(desc) = &item.description {
                params.push((
                    format!("line_items[{}][price_data][product_data][description]", i),
                    desc.clone(),
                ));
            }
            params.push((format!("line_items[{}][quantity]", i), item.quantity.to_string()));
        }

        let mut metadata: Vec<_> = checkout.metadata.iter().collect();
        metadata.sort();
        for (key, value) in metadata {
            params.push((format!("metadata[{}]", key), value.clone()));
        }
        params
    }
}

#[async_trait]
impl PaymentStrategy for StripeCheckoutStrategy {
    #[instrument(skip_all, fields(reference = %checkout.reference))]
    async fn create_checkout(
        &self,
        checkout: &HostedCheckout,
        success_url: &str,
        cancel_url: &str,
    ) -> MarketResult<CheckoutSession> {
        if checkout.is_empty() {
            return Err(MarketError::InvalidRequest("Checkout has no items".to_string()));
        }

        let form_params = Self::form_params(checkout, success_url, cancel_url);
        debug!(
            items = checkout.line_items.len(),
            total = ?checkout.total().map(|total| total.display()),
            "creating Stripe checkout session"
        );

        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);
        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .header("Idempotency-Key", &checkout.idempotency_key)
            .form(&form_params)
            .send()
            .await
            .map_err(|e| MarketError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MarketError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!(%status, %body, "Stripe API error");
            let message = match serde_json::from_str::<StripeErrorResponse>(&body) {
                Ok(err) => err.error.message,
                Err(_) => format!("HTTP {}: {}", status, body),
            };
            return Err(MarketError::ProviderError {
                provider: PROVIDER.to_string(),
                message,
            });
        }

        let session: StripeCheckoutSessionResponse = serde_json::from_str(&body).map_err(|e| {
            MarketError::Serialization(format!("Failed to parse Stripe response: {}", e))
        })?;
        let checkout_url = session.url.ok_or_else(|| MarketError::ProviderError {
            provider: PROVIDER.to_string(),
            message: format!("session {} has no checkout url", session.id),
        })?;

        info!(session_id = %session.id, "created Stripe checkout session");

        Ok(CheckoutSession {
            session_id: session.id,
            reference: checkout.reference.clone(),
            provider: PROVIDER.to_string(),
            checkout_url,
            status: CheckoutStatus::Open,
            expires_at: session.expires_at.and_then(|ts| DateTime::from_timestamp(ts, 0)),
            created_at: Utc::now(),
        })
    }

    #[instrument(skip_all)]
    async fn verify_webhook(&self, payload: &[u8], signature: &str) -> MarketResult<WebhookEvent> {
        verify_signature(
            &self.config.webhook_secret,
            payload,
            signature,
            Utc::now().timestamp(),
        )?;
        parse_event(payload)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeCheckoutSessionResponse {
    id: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    expires_at: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct StripeWebhookEvent {
    id: String,
    #[serde(rename = "type")]
    event_type: String,
    created: i64,
    data: StripeEventData,
}

#[derive(Debug, Deserialize)]
struct StripeEventData {
    object: serde_json::Map<String, serde_json::Value>,
}

fn event_type(name: &str) -> WebhookEventType {
    match name {
        "checkout.session.completed" => WebhookEventType::CheckoutCompleted,
        "checkout.session.expired" => WebhookEventType::CheckoutExpired,
        "payment_intent.succeeded" => WebhookEventType::PaymentSucceeded,
        "payment_intent.payment_failed" => WebhookEventType::PaymentFailed,
        "charge.refunded" => WebhookEventType::RefundIssued,
        other => WebhookEventType::Unknown(other.to_string()),
    }
}

fn parse_event(payload: &[u8]) -> MarketResult<WebhookEvent> {
    let event: StripeWebhookEvent = serde_json::from_slice(payload)
        .map_err(|e| MarketError::WebhookParseError(format!("Failed to parse webhook: {}", e)))?;

    debug!(event_type = %event.event_type, "verified Stripe webhook");

    let object = &event.data.object;
    let str_field = |key: &str| object.get(key).and_then(|v| v.as_str()).map(String::from);

    Ok(WebhookEvent {
        event_id: event.id.clone(),
        event_type: event_type(&event.event_type),
        provider: PROVIDER.to_string(),
        session_id: str_field("id"),
        payment_intent_id: str_field("payment_intent"),
        amount_paid: object.get("amount_total").and_then(|v| v.as_i64()),
        currency: str_field("currency").as_deref().and_then(Currency::from_code),
        raw_data: Some(serde_json::Value::Object(event.data.object.clone())),
        timestamp: DateTime::from_timestamp(event.created, 0).unwrap_or_else(Utc::now),
    })
}

// =============================================================================
// Webhook Signature Verification
// =============================================================================

struct SignatureHeader {
    timestamp: i64,
    signatures: Vec<String>,
}

fn parse_signature_header(header: &str) -> MarketResult<SignatureHeader> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        match key {
            "t" => timestamp = value.parse().ok(),
            "v1" => signatures.push(value.to_string()),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or_else(|| {
        MarketError::WebhookVerificationFailed("Missing timestamp in signature".to_string())
    })?;

    if signatures.is_empty() {
        return Err(MarketError::WebhookVerificationFailed(
            "No v1 signature found".to_string(),
        ));
    }

    Ok(SignatureHeader {
        timestamp,
        signatures,
    })
}

/// Check a `Stripe-Signature` header against the payload at time `now`
pub fn verify_signature(secret: &str, payload: &[u8], header: &str, now: i64) -> MarketResult<()> {
    let parsed = parse_signature_header(header)?;

    let within_tolerance = now
        .checked_sub(parsed.timestamp)
        .map(i64::unsigned_abs)
        .is_some_and(|age| age <= SIGNATURE_TOLERANCE_SECS.unsigned_abs());
    if !within_tolerance {
        return Err(MarketError::WebhookVerificationFailed(
            "Timestamp outside tolerance".to_string(),
        ));
    }

    let expected = sign_payload(secret, parsed.timestamp, payload)?;
    if parsed
        .signatures
        .iter()
        .any(|sig| constant_time_compare(sig, &expected))
    {
        Ok(())
    } else {
        Err(MarketError::WebhookVerificationFailed(
            "Signature mismatch".to_string(),
        ))
    }
}

/// Hex HMAC-SHA256 of `"{timestamp}.{payload}"`, as Stripe computes it
pub fn sign_payload(secret: &str, timestamp: i64, payload: &[u8]) -> MarketResult<String> {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    type HmacSha256 = Hmac<Sha256>;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| MarketError::Configuration(format!("webhook secret: {}", e)))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0, |acc, (x, y)| acc | (x ^ y))
        == 0
}
