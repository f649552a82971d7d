//! Review repository implementation
//!
//! The review module reads events and club membership on its own instead
//! of going through the other repositories, so each repository stays a
//! self-contained data-access unit.

use sqlx::PgPool;

use crate::models::event::Event;
use crate::models::review::{Review, ReviewQuery, UpdateReviewData};
use crate::utils::errors::GatherlyError;

#[derive(Debug, Clone)]
pub struct ReviewRepository {
    pool: PgPool,
}

impl ReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a review
    pub async fn create(
        &self,
        user_id: i64,
        event_id: i64,
        score: i32,
        title: String,
        description: Option<String>,
    ) -> Result<Review, GatherlyError> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (user_id, event_id, score, title, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, event_id, score, title, description, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(event_id)
        .bind(score)
        .bind(title)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        Ok(review)
    }

    /// Find review by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Review>, GatherlyError> {
        let review = sqlx::query_as::<_, Review>(
            "SELECT id, user_id, event_id, score, title, description, created_at, updated_at FROM reviews WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(review)
    }

    /// List reviews matching the filter; reviews by soft-deleted authors
    /// are excluded
    pub async fn list(&self, query: &ReviewQuery) -> Result<Vec<Review>, GatherlyError> {
        let reviews = sqlx::query_as::<_, Review>(
            r#"
            SELECT r.id, r.user_id, r.event_id, r.score, r.title, r.description,
                   r.created_at, r.updated_at
            FROM reviews r
            INNER JOIN users u ON u.id = r.user_id
            WHERE u.deleted_at IS NULL
              AND ($1::BIGINT IS NULL OR r.event_id = $1)
              AND ($2::BIGINT IS NULL OR r.user_id = $2)
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(query.event_id)
        .bind(query.user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    /// Update a review. Score and title keep their value when absent; the
    /// description column is only written when the outer Option is set,
    /// and an inner None writes null.
    pub async fn update(
        &self,
        review_id: i64,
        data: UpdateReviewData,
    ) -> Result<Review, GatherlyError> {
        let write_description = data.description.is_some();
        let description = data.description.flatten();

        let review = sqlx::query_as::<_, Review>(
            r#"
            UPDATE reviews
            SET score = COALESCE($2, score),
                title = COALESCE($3, title),
                description = CASE WHEN $4 THEN $5 ELSE description END,
                updated_at = now()
            WHERE id = $1
            RETURNING id, user_id, event_id, score, title, description, created_at, updated_at
            "#,
        )
        .bind(review_id)
        .bind(data.score)
        .bind(data.title)
        .bind(write_description)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        Ok(review)
    }

    /// Delete a review
    pub async fn delete(&self, review_id: i64) -> Result<(), GatherlyError> {
        sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(review_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Check whether a user already reviewed an event
    pub async fn exists(&self, user_id: i64, event_id: i64) -> Result<bool, GatherlyError> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM reviews r
            INNER JOIN users u ON u.id = r.user_id
            WHERE r.user_id = $1 AND r.event_id = $2 AND u.deleted_at IS NULL
            "#,
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0 > 0)
    }

    /// Check whether a user attended an event (active users only)
    pub async fn is_user_joined_event(
        &self,
        user_id: i64,
        event_id: i64,
    ) -> Result<bool, GatherlyError> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM event_joins ej
            INNER JOIN users u ON u.id = ej.user_id
            WHERE ej.user_id = $1 AND ej.event_id = $2 AND u.deleted_at IS NULL
            "#,
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0 > 0)
    }

    /// Check whether a user has any join row for a club, regardless of
    /// status; applicants can already see the club's reviews
    pub async fn is_user_in_club(&self, user_id: i64, club_id: i64) -> Result<bool, GatherlyError> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM club_joins cj
            INNER JOIN users u ON u.id = cj.user_id
            WHERE cj.user_id = $1 AND cj.club_id = $2 AND u.deleted_at IS NULL
            "#,
        )
        .bind(user_id)
        .bind(club_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0 > 0)
    }

    /// Load the event a review refers to
    pub async fn get_event(&self, event_id: i64) -> Result<Option<Event>, GatherlyError> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            SELECT id, host_id, club_id, title, description, category_id,
                   start_time, end_time, max_people, archived, created_at, updated_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Load the events behind a set of reviews in one query
    pub async fn events_by_ids(&self, event_ids: &[i64]) -> Result<Vec<Event>, GatherlyError> {
        let events = sqlx::query_as::<_, Event>(
            r#"
            SELECT id, host_id, club_id, title, description, category_id,
                   start_time, end_time, max_people, archived, created_at, updated_at
            FROM events
            WHERE id = ANY($1)
            "#,
        )
        .bind(event_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// IDs of every event the user has ever joined
    pub async fn user_event_ids(&self, user_id: i64) -> Result<Vec<i64>, GatherlyError> {
        let rows: Vec<(i64,)> =
            sqlx::query_as("SELECT event_id FROM event_joins WHERE user_id = $1")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(|row| row.0).collect())
    }

    /// IDs of every club the user has a join row for, any status
    pub async fn user_club_ids(&self, user_id: i64) -> Result<Vec<i64>, GatherlyError> {
        let rows: Vec<(i64,)> =
            sqlx::query_as("SELECT club_id FROM club_joins WHERE user_id = $1")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(|row| row.0).collect())
    }
}
