//! HTTP handlers module
//!
//! Thin axum handlers over the service layer plus the router wiring.
//! Mutating operations and privacy-sensitive reads sit behind the bearer
//! middleware; club reads and the health endpoint are open.

pub mod clubs;
pub mod events;
pub mod health;
pub mod reviews;
pub mod users;

use std::time::Duration;

use axum::routing::{delete, get, patch, post};
use axum::{middleware as axum_middleware, Router};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;

use crate::database::{DatabasePool, DatabaseService};
use crate::middleware::{auth, logging};
use crate::services::ServiceFactory;

/// Shared application state for the HTTP layer
#[derive(Clone)]
pub struct AppState {
    pub pool: DatabasePool,
    pub db: DatabaseService,
    pub services: ServiceFactory,
}

impl AppState {
    pub fn new(pool: DatabasePool, db: DatabaseService, services: ServiceFactory) -> Self {
        Self { pool, db, services }
    }
}

/// Build the application router
pub fn router(state: AppState, request_timeout: Duration) -> Router {
    let open = Router::new()
        .route("/health", get(health::health_check))
        .route("/clubs", get(clubs::list_clubs))
        .route("/clubs/:club_id", get(clubs::get_club))
        .route("/clubs/:club_id/members", get(clubs::get_club_members));

    let protected = Router::new()
        .route("/clubs", post(clubs::create_club))
        .route(
            "/clubs/:club_id",
            patch(clubs::update_club).delete(clubs::delete_club),
        )
        .route(
            "/clubs/:club_id/members/:member_id/status",
            patch(clubs::handle_applicant),
        )
        .route("/clubs/:club_id/join", post(clubs::join_club))
        .route("/clubs/:club_id/out", post(clubs::out_club))
        .route("/events", post(events::create_event).get(events::list_events))
        .route(
            "/events/:event_id",
            get(events::get_event)
                .patch(events::update_event)
                .delete(events::delete_event),
        )
        .route("/events/:event_id/join", post(events::join_event))
        .route("/events/:event_id/out", post(events::out_event))
        .route(
            "/reviews",
            post(reviews::create_review).get(reviews::list_reviews),
        )
        .route(
            "/reviews/:review_id",
            get(reviews::get_review)
                .put(reviews::put_update_review)
                .patch(reviews::patch_update_review)
                .delete(reviews::delete_review),
        )
        .route("/users/:user_id", delete(users::delete_user))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    Router::new()
        .merge(open)
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn(logging::log_requests))
                .layer(TimeoutLayer::new(request_timeout))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
