use super::ApiResult;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use supply_core::{DashboardStats, Role};

/// Role-specific counters; an unrecognised role gets an empty object
pub async fn dashboard_stats(
    State(state): State<AppState>,
    Path((user_id, role)): Path<(String, String)>,
) -> ApiResult<DashboardStats> {
    let stats = match role.parse::<Role>() {
        Ok(role) => state.store.dashboard_stats(&user_id, role)?,
        Err(_) => DashboardStats::Empty {},
    };
    Ok(Json(stats))
}
