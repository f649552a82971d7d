//! Services module
//!
//! This module contains business logic services

pub mod auth;
pub mod club;
pub mod event;
pub mod review;
pub mod user;

// Re-export commonly used services
pub use auth::{AuthService, Claims, CurrentUser};
pub use club::ClubService;
pub use event::EventService;
pub use review::ReviewService;
pub use user::UserService;

use crate::config::Settings;
use crate::database::DatabaseService;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub club_service: ClubService,
    pub event_service: EventService,
    pub review_service: ReviewService,
    pub user_service: UserService,
    pub auth_service: AuthService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(db: &DatabaseService, settings: &Settings) -> Self {
        Self {
            club_service: ClubService::new(db.clubs.clone(), db.users.clone()),
            event_service: EventService::new(db.events.clone(), db.users.clone()),
            review_service: ReviewService::new(db.reviews.clone()),
            user_service: UserService::new(db.users.clone()),
            auth_service: AuthService::new(settings.auth.clone()),
        }
    }
}
