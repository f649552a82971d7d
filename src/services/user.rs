//! User service implementation
//!
//! Self-service account deletion. Accounts are soft-deleted so rows
//! referenced from memberships, attendance and reviews stay intact.

use tracing::info;

use crate::database::repositories::UserRepository;
use crate::services::auth::CurrentUser;
use crate::utils::errors::{GatherlyError, Result};

#[derive(Clone)]
pub struct UserService {
    users: UserRepository,
}

impl UserService {
    pub fn new(users: UserRepository) -> Self {
        Self { users }
    }

    /// Delete an account; only self-deletion is permitted.
    pub async fn delete_user(&self, user_id: i64, actor: &CurrentUser) -> Result<()> {
        if user_id != actor.id {
            return Err(GatherlyError::InvalidInput(
                "cannot delete another user's account".to_string(),
            ));
        }

        self.users.soft_delete(user_id).await?;

        info!(user_id = user_id, "User account deleted");
        Ok(())
    }
}
