//! Event route handlers

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};

use crate::handlers::AppState;
use crate::models::event::{
    CreateEventRequest, EventDto, EventJoinRequest, EventListDto, EventListQuery,
    UpdateEventRequest,
};
use crate::services::auth::CurrentUser;
use crate::utils::errors::Result;

pub async fn create_event(
    State(state): State<AppState>,
    Json(payload): Json<CreateEventRequest>,
) -> Result<impl IntoResponse> {
    let event = state.services.event_service.create_event(payload).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<EventDto>> {
    let event = state.services.event_service.get_event(event_id, &user).await?;
    Ok(Json(event))
}

pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventListQuery>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<EventListDto>> {
    let events = state.services.event_service.list_events(query, &user).await?;
    Ok(Json(events))
}

pub async fn join_event(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
    Json(payload): Json<EventJoinRequest>,
) -> Result<StatusCode> {
    state
        .services
        .event_service
        .join_event(event_id, payload.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn out_event(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
    Json(payload): Json<EventJoinRequest>,
) -> Result<StatusCode> {
    state
        .services
        .event_service
        .leave_event(event_id, payload.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_event(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<Json<EventDto>> {
    let event = state
        .services
        .event_service
        .update_event(event_id, payload)
        .await?;
    Ok(Json(event))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> Result<StatusCode> {
    state.services.event_service.delete_event(event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
