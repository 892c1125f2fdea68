//! Vendor carts, one per supplier

use super::{found, ApiError, ApiJson, ApiResult, Success};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use supply_core::{CartView, MarketError};
use tracing::instrument;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    #[serde(default)]
    pub vendor_id: Option<String>,
    pub product_id: String,
    pub quantity: i64,
    #[serde(default)]
    pub supplier_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct QuantityUpdate {
    pub quantity: i64,
}

/// All carts of a vendor with their lines and totals
pub async fn vendor_carts(
    State(state): State<AppState>,
    Path(vendor_id): Path<String>,
) -> ApiResult<Vec<CartView>> {
    Ok(Json(state.store.carts_for_vendor(&vendor_id)?))
}

#[instrument(skip_all, fields(product_id = %request.product_id))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AddToCartRequest>,
) -> ApiResult<CartView> {
    let vendor_id = request
        .vendor_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| MarketError::Unauthorized("User not authenticated".into()))?;
    let quantity = u32::try_from(request.quantity)
        .ok()
        .filter(|q| *q > 0)
        .ok_or_else(|| MarketError::InvalidRequest("Quantity must be positive".into()))?;

    let cart = state.store.add_to_cart(
        vendor_id,
        &request.product_id,
        quantity,
        request.supplier_id.as_deref(),
    )?;
    Ok(Json(cart))
}

/// Set a line's quantity; zero or less removes the line
pub async fn update_cart_item(
    State(state): State<AppState>,
    Path((cart_id, item_id)): Path<(String, String)>,
    ApiJson(update): ApiJson<QuantityUpdate>,
) -> Result<Json<Success>, ApiError> {
    let matched = state
        .store
        .update_cart_item(&cart_id, &item_id, update.quantity)?;
    found(matched, "Cart item", &item_id)
}

pub async fn remove_cart_item(
    State(state): State<AppState>,
    Path((cart_id, item_id)): Path<(String, String)>,
) -> Result<Json<Success>, ApiError> {
    let matched = state.store.remove_cart_item(&cart_id, &item_id)?;
    found(matched, "Cart item", &item_id)
}

pub async fn clear_cart(
    State(state): State<AppState>,
    Path(cart_id): Path<String>,
) -> Result<Json<Success>, ApiError> {
    let matched = state.store.clear_cart(&cart_id)?;
    found(matched, "Cart", &cart_id)
}
