//! Authentication middleware
//!
//! Extracts and verifies the bearer token, resolves the principal to an
//! existing active user and injects `CurrentUser` into the request
//! extensions for the handlers.

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::handlers::AppState;
use crate::utils::errors::GatherlyError;

pub async fn require_auth(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let Some(token) = token else {
        return GatherlyError::Unauthorized("missing bearer token".to_string()).into_response();
    };

    let current_user = match state.services.auth_service.verify_token(token) {
        Ok(current_user) => current_user,
        Err(_) => {
            return GatherlyError::Unauthorized("invalid bearer token".to_string()).into_response();
        }
    };

    // The principal must still be an active account.
    match state.db.users.find_by_id(current_user.id).await {
        Ok(Some(_)) => {
            request.extensions_mut().insert(current_user);
            next.run(request).await
        }
        Ok(None) => {
            GatherlyError::Unauthorized("unknown or deleted user".to_string()).into_response()
        }
        Err(error) => error.into_response(),
    }
}
