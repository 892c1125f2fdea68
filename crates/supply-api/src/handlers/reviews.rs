use super::{ApiJson, ApiQuery, ApiResult};
use crate::state::AppState;
use axum::{extract::State, Json};
use supply_core::{NewReview, Review, ReviewFilter};

pub async fn list_reviews(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<ReviewFilter>,
) -> ApiResult<Vec<Review>> {
    Ok(Json(state.store.list_reviews(&filter)?))
}

pub async fn create_review(
    State(state): State<AppState>,
    ApiJson(review): ApiJson<NewReview>,
) -> ApiResult<Review> {
    Ok(Json(state.store.create_review(review)?))
}
