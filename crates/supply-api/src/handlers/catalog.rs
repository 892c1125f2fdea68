//! Categories and products

use super::{ApiJson, ApiQuery, ApiResult};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use supply_core::{Category, NewCategory, NewProduct, Product, ProductFilter, ProductUpdate};

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub message: &'static str,
}

pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Vec<Category>> {
    Ok(Json(state.store.list_categories()?))
}

pub async fn create_category(
    State(state): State<AppState>,
    ApiJson(category): ApiJson<NewCategory>,
) -> ApiResult<Category> {
    Ok(Json(state.store.create_category(category)?))
}

/// Get products list
pub async fn list_products(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<ProductFilter>,
) -> ApiResult<Vec<Product>> {
    Ok(Json(state.store.list_products(&filter)?))
}

/// Get single product
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Product> {
    Ok(Json(state.store.get_product(&id)?))
}

pub async fn create_product(
    State(state): State<AppState>,
    ApiJson(product): ApiJson<NewProduct>,
) -> ApiResult<Product> {
    Ok(Json(state.store.create_product(product)?))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<ProductUpdate>,
) -> ApiResult<Product> {
    Ok(Json(state.store.update_product(&id, update)?))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Deleted> {
    state.store.delete_product(&id)?;
    Ok(Json(Deleted {
        message: "Product deleted successfully",
    }))
}
