//! Database service layer
//!
//! Bundles the per-entity repositories behind a single constructor so the
//! rest of the application only threads one handle around.

use crate::database::{ClubRepository, DatabasePool, EventRepository, ReviewRepository, UserRepository};

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub users: UserRepository,
    pub clubs: ClubRepository,
    pub events: EventRepository,
    pub reviews: ReviewRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            clubs: ClubRepository::new(pool.clone()),
            events: EventRepository::new(pool.clone()),
            reviews: ReviewRepository::new(pool),
        }
    }
}
