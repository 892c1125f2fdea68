//! Supplier directory and profiles

use super::{ApiJson, ApiQuery, ApiResult};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use supply_core::{NewSupplier, Supplier, SupplierFilter, SupplierUpdate};

/// Default search radius in kilometres
const DEFAULT_RADIUS_KM: f64 = 10.0;

#[derive(Debug, Default, Deserialize)]
pub struct NearbyQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius: Option<f64>,
}

pub async fn list_suppliers(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<SupplierFilter>,
) -> ApiResult<Vec<Supplier>> {
    Ok(Json(state.store.list_suppliers(&filter)?))
}

pub async fn nearby_suppliers(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<NearbyQuery>,
) -> ApiResult<Vec<Supplier>> {
    let radius = query
        .radius
        .filter(|r| *r > 0.0)
        .unwrap_or(DEFAULT_RADIUS_KM);
    let suppliers = state.store.nearby_suppliers(
        query.lat.unwrap_or_default(),
        query.lng.unwrap_or_default(),
        radius,
    )?;
    Ok(Json(suppliers))
}

pub async fn pending_suppliers(State(state): State<AppState>) -> ApiResult<Vec<Supplier>> {
    Ok(Json(state.store.pending_suppliers()?))
}

pub async fn create_supplier(
    State(state): State<AppState>,
    ApiJson(new_supplier): ApiJson<NewSupplier>,
) -> ApiResult<Supplier> {
    Ok(Json(state.store.create_supplier(new_supplier)?))
}

pub async fn get_supplier(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Supplier> {
    Ok(Json(state.store.get_supplier(&id)?))
}

pub async fn update_supplier(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<SupplierUpdate>,
) -> ApiResult<Supplier> {
    Ok(Json(state.store.update_supplier(&id, update)?))
}
