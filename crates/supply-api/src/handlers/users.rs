use super::ApiResult;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use supply_core::User;

pub async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<User> {
    Ok(Json(state.store.get_user(&id)?))
}
