//! User route handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Extension;

use crate::handlers::AppState;
use crate::services::auth::CurrentUser;
use crate::utils::errors::Result;

pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Extension(user): Extension<CurrentUser>,
) -> Result<StatusCode> {
    state.services.user_service.delete_user(user_id, &user).await?;
    Ok(StatusCode::NO_CONTENT)
}
