//! Club route handlers

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};

use crate::handlers::AppState;
use crate::models::club::{
    ClubDto, ClubListDto, ClubMemberListDto, ClubMemberStatusQuery, CreateClubRequest,
    HandleApplicantRequest, UpdateClubRequest,
};
use crate::services::auth::CurrentUser;
use crate::utils::errors::Result;

pub async fn create_club(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CreateClubRequest>,
) -> Result<impl IntoResponse> {
    let club = state.services.club_service.create_club(payload, &user).await?;
    Ok((StatusCode::CREATED, Json(club)))
}

pub async fn get_club(
    State(state): State<AppState>,
    Path(club_id): Path<i64>,
) -> Result<Json<ClubDto>> {
    let club = state.services.club_service.get_club(club_id).await?;
    Ok(Json(club))
}

pub async fn list_clubs(State(state): State<AppState>) -> Result<Json<ClubListDto>> {
    let clubs = state.services.club_service.list_clubs().await?;
    Ok(Json(clubs))
}

pub async fn get_club_members(
    State(state): State<AppState>,
    Path(club_id): Path<i64>,
    Query(query): Query<ClubMemberStatusQuery>,
) -> Result<Json<ClubMemberListDto>> {
    let members = state
        .services
        .club_service
        .get_members_by_status(club_id, query.status)
        .await?;
    Ok(Json(ClubMemberListDto { members }))
}

pub async fn handle_applicant(
    State(state): State<AppState>,
    Path((club_id, member_id)): Path<(i64, i64)>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<HandleApplicantRequest>,
) -> Result<StatusCode> {
    state
        .services
        .club_service
        .handle_applicant(club_id, member_id, payload.decision, &user)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_club(
    State(state): State<AppState>,
    Path(club_id): Path<i64>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<UpdateClubRequest>,
) -> Result<Json<ClubDto>> {
    let club = state
        .services
        .club_service
        .update_club(club_id, payload, &user)
        .await?;
    Ok(Json(club))
}

pub async fn delete_club(
    State(state): State<AppState>,
    Path(club_id): Path<i64>,
    Extension(user): Extension<CurrentUser>,
) -> Result<StatusCode> {
    state.services.club_service.delete_club(club_id, &user).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn join_club(
    State(state): State<AppState>,
    Path(club_id): Path<i64>,
    Extension(user): Extension<CurrentUser>,
) -> Result<StatusCode> {
    state.services.club_service.join_club(club_id, &user).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn out_club(
    State(state): State<AppState>,
    Path(club_id): Path<i64>,
    Extension(user): Extension<CurrentUser>,
) -> Result<StatusCode> {
    state.services.club_service.leave_club(club_id, &user).await?;
    Ok(StatusCode::NO_CONTENT)
}
