//! Admin: platform analytics and supplier verification

use super::{ApiJson, ApiResult};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use supply_core::{PlatformAnalytics, Supplier, VerificationStatus};
use tracing::instrument;

#[derive(Debug, Deserialize)]
pub struct VerificationDecision {
    pub status: VerificationStatus,
}

pub async fn platform_analytics(State(state): State<AppState>) -> ApiResult<PlatformAnalytics> {
    Ok(Json(state.store.platform_analytics()?))
}

#[instrument(skip(state))]
pub async fn set_verification(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(decision): ApiJson<VerificationDecision>,
) -> ApiResult<Supplier> {
    Ok(Json(state.store.set_verification(&id, decision.status)?))
}
