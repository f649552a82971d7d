//! Review route handlers

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};

use crate::handlers::AppState;
use crate::models::review::{
    CreateReviewRequest, PatchUpdateReviewRequest, PutUpdateReviewRequest, ReviewDto,
    ReviewListDto, ReviewQuery,
};
use crate::services::auth::CurrentUser;
use crate::utils::errors::Result;

pub async fn create_review(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CreateReviewRequest>,
) -> Result<impl IntoResponse> {
    let review = state
        .services
        .review_service
        .create_review(payload, &user)
        .await?;
    Ok((StatusCode::CREATED, Json(review)))
}

pub async fn get_review(
    State(state): State<AppState>,
    Path(review_id): Path<i64>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ReviewDto>> {
    let review = state
        .services
        .review_service
        .get_review(review_id, &user)
        .await?;
    Ok(Json(review))
}

pub async fn list_reviews(
    State(state): State<AppState>,
    Query(query): Query<ReviewQuery>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ReviewListDto>> {
    let reviews = state
        .services
        .review_service
        .list_reviews(query, &user)
        .await?;
    Ok(Json(reviews))
}

pub async fn put_update_review(
    State(state): State<AppState>,
    Path(review_id): Path<i64>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<PutUpdateReviewRequest>,
) -> Result<Json<ReviewDto>> {
    let review = state
        .services
        .review_service
        .put_update_review(review_id, payload, &user)
        .await?;
    Ok(Json(review))
}

pub async fn patch_update_review(
    State(state): State<AppState>,
    Path(review_id): Path<i64>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<PatchUpdateReviewRequest>,
) -> Result<Json<ReviewDto>> {
    let review = state
        .services
        .review_service
        .patch_update_review(review_id, payload, &user)
        .await?;
    Ok(Json(review))
}

pub async fn delete_review(
    State(state): State<AppState>,
    Path(review_id): Path<i64>,
    Extension(user): Extension<CurrentUser>,
) -> Result<StatusCode> {
    state
        .services
        .review_service
        .delete_review(review_id, &user)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
