//! Event repository implementation
//!
//! Attendance queries exclude soft-deleted users.

use sqlx::PgPool;

use crate::models::club::ClubJoinStatus;
use crate::models::event::{CreateEventData, Event, EventListQuery, UpdateEventData};
use crate::utils::errors::GatherlyError;

#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an event together with its city rows
    pub async fn create(&self, data: CreateEventData) -> Result<Event, GatherlyError> {
        let mut tx = self.pool.begin().await?;

        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (host_id, club_id, title, description, category_id,
                                start_time, end_time, max_people)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, host_id, club_id, title, description, category_id,
                      start_time, end_time, max_people, archived, created_at, updated_at
            "#,
        )
        .bind(data.host_id)
        .bind(data.club_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.category_id)
        .bind(data.start_time)
        .bind(data.end_time)
        .bind(data.max_people)
        .fetch_one(&mut *tx)
        .await?;

        for city_id in &data.city_ids {
            sqlx::query("INSERT INTO event_cities (event_id, city_id) VALUES ($1, $2)")
                .bind(event.id)
                .bind(city_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(event)
    }

    /// Find event by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Event>, GatherlyError> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            SELECT id, host_id, club_id, title, description, category_id,
                   start_time, end_time, max_people, archived, created_at, updated_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// City IDs attached to an event
    pub async fn city_ids(&self, event_id: i64) -> Result<Vec<i64>, GatherlyError> {
        let rows: Vec<(i64,)> = sqlx::query_as(
            "SELECT city_id FROM event_cities WHERE event_id = $1 ORDER BY city_id ASC",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|row| row.0).collect())
    }

    /// List events matching the given filter criteria
    pub async fn list(&self, query: &EventListQuery) -> Result<Vec<Event>, GatherlyError> {
        let events = sqlx::query_as::<_, Event>(
            r#"
            SELECT id, host_id, club_id, title, description, category_id,
                   start_time, end_time, max_people, archived, created_at, updated_at
            FROM events
            WHERE ($1::BIGINT IS NULL OR host_id = $1)
              AND ($2::BIGINT IS NULL OR category_id = $2)
              AND ($3::BIGINT IS NULL OR club_id = $3)
              AND ($4::BIGINT IS NULL OR EXISTS (
                    SELECT 1 FROM event_cities ec
                    WHERE ec.event_id = events.id AND ec.city_id = $4
              ))
            ORDER BY start_time ASC
            "#,
        )
        .bind(query.host_id)
        .bind(query.category_id)
        .bind(query.club_id)
        .bind(query.city_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Register a user as an event attendee
    pub async fn join(&self, event_id: i64, user_id: i64) -> Result<(), GatherlyError> {
        sqlx::query("INSERT INTO event_joins (event_id, user_id) VALUES ($1, $2)")
            .bind(event_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Remove a user's attendance row
    pub async fn leave(&self, event_id: i64, user_id: i64) -> Result<(), GatherlyError> {
        sqlx::query("DELETE FROM event_joins WHERE event_id = $1 AND user_id = $2")
            .bind(event_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Check if a user attends an event (active users only)
    pub async fn is_joined(&self, event_id: i64, user_id: i64) -> Result<bool, GatherlyError> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM event_joins ej
            INNER JOIN users u ON u.id = ej.user_id
            WHERE ej.event_id = $1 AND ej.user_id = $2 AND u.deleted_at IS NULL
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0 > 0)
    }

    /// Count attendees of an event (active users only)
    pub async fn attendee_count(&self, event_id: i64) -> Result<i64, GatherlyError> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM event_joins ej
            INNER JOIN users u ON u.id = ej.user_id
            WHERE ej.event_id = $1 AND u.deleted_at IS NULL
            "#,
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// Update event attributes; when a city set is given the old rows are
    /// replaced in the same transaction
    pub async fn update(
        &self,
        event_id: i64,
        data: UpdateEventData,
    ) -> Result<Event, GatherlyError> {
        let mut tx = self.pool.begin().await?;

        let event = sqlx::query_as::<_, Event>(
            r#"
            UPDATE events
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                category_id = COALESCE($4, category_id),
                start_time = COALESCE($5, start_time),
                end_time = COALESCE($6, end_time),
                max_people = COALESCE($7, max_people),
                updated_at = now()
            WHERE id = $1
            RETURNING id, host_id, club_id, title, description, category_id,
                      start_time, end_time, max_people, archived, created_at, updated_at
            "#,
        )
        .bind(event_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.category_id)
        .bind(data.start_time)
        .bind(data.end_time)
        .bind(data.max_people)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(city_ids) = data.city_ids {
            sqlx::query("DELETE FROM event_cities WHERE event_id = $1")
                .bind(event_id)
                .execute(&mut *tx)
                .await?;
            for city_id in &city_ids {
                sqlx::query("INSERT INTO event_cities (event_id, city_id) VALUES ($1, $2)")
                    .bind(event_id)
                    .bind(city_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;

        Ok(event)
    }

    /// Delete an event with its city, attendance and review rows
    pub async fn delete(&self, event_id: i64) -> Result<(), GatherlyError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM event_cities WHERE event_id = $1")
            .bind(event_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM event_joins WHERE event_id = $1")
            .bind(event_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM reviews WHERE event_id = $1")
            .bind(event_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(event_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Check if a category exists
    pub async fn category_exists(&self, category_id: i64) -> Result<bool, GatherlyError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM categories WHERE id = $1")
            .bind(category_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0 > 0)
    }

    /// Check that every given city ID exists
    pub async fn cities_exist(&self, city_ids: &[i64]) -> Result<bool, GatherlyError> {
        let mut unique = city_ids.to_vec();
        unique.sort_unstable();
        unique.dedup();

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM cities WHERE id = ANY($1)")
            .bind(&unique)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0 == unique.len() as i64)
    }

    /// Check if a club exists
    pub async fn club_exists(&self, club_id: i64) -> Result<bool, GatherlyError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM clubs WHERE id = $1")
            .bind(club_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0 > 0)
    }

    /// Check if a user is a full MEMBER of a club (active users only)
    pub async fn is_club_member(&self, club_id: i64, user_id: i64) -> Result<bool, GatherlyError> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM club_joins cj
            INNER JOIN users u ON u.id = cj.user_id
            WHERE cj.club_id = $1 AND cj.user_id = $2 AND cj.status = $3
              AND u.deleted_at IS NULL
            "#,
        )
        .bind(club_id)
        .bind(user_id)
        .bind(ClubJoinStatus::Member)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0 > 0)
    }

    /// IDs of all events a user has attendance rows for
    pub async fn joined_event_ids(&self, user_id: i64) -> Result<Vec<i64>, GatherlyError> {
        let rows: Vec<(i64,)> =
            sqlx::query_as("SELECT event_id FROM event_joins WHERE user_id = $1")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(|row| row.0).collect())
    }

    /// IDs of all clubs a user is a full MEMBER of
    pub async fn member_club_ids(&self, user_id: i64) -> Result<Vec<i64>, GatherlyError> {
        let rows: Vec<(i64,)> = sqlx::query_as(
            "SELECT club_id FROM club_joins WHERE user_id = $1 AND status = $2",
        )
        .bind(user_id)
        .bind(ClubJoinStatus::Member)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|row| row.0).collect())
    }
}
