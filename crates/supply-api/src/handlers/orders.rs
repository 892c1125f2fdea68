//! Orders and their payments

use super::{ApiJson, ApiQuery, ApiResult};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use supply_core::{NewOrder, Order, OrderFilter, OrderUpdate, Payment};
use tracing::instrument;

pub async fn list_orders(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<OrderFilter>,
) -> ApiResult<Vec<Order>> {
    Ok(Json(state.store.list_orders(&filter)?))
}

pub async fn create_order(
    State(state): State<AppState>,
    ApiJson(order): ApiJson<NewOrder>,
) -> ApiResult<Order> {
    Ok(Json(state.store.create_order(order)?))
}

pub async fn get_order(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Order> {
    Ok(Json(state.store.get_order(&id)?))
}

#[instrument(skip(state, update))]
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<OrderUpdate>,
) -> ApiResult<Order> {
    Ok(Json(state.store.update_order(&id, update)?))
}

pub async fn order_payments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<Payment>> {
    Ok(Json(state.store.payments_for_order(&id)?))
}
