//! Login and registration

use super::{ApiJson, ApiResult};
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use supply_core::{LoginRequest, RegisterRequest, Supplier, User};
use tracing::{info, instrument};

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: User,
    /// Supplier profile, for supplier accounts
    pub supplier: Option<Supplier>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: User,
}

#[instrument(skip_all, fields(email = %request.email))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let (user, supplier) = state.store.login(&request)?;
    info!(user_id = %user.id, role = user.role.as_str(), "user logged in");
    Ok(Json(LoginResponse { user, supplier }))
}

#[instrument(skip_all, fields(email = %request.user.email))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> ApiResult<RegisterResponse> {
    let user = state.store.register(request)?;
    Ok(Json(RegisterResponse { user }))
}
