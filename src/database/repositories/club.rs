//! Club repository implementation
//!
//! Membership queries exclude soft-deleted users. The club-leave and
//! club-delete cascades each run inside a single transaction so partial
//! cascades are never observable.

use chrono::Utc;
use sqlx::PgPool;

use crate::models::club::{Club, ClubJoinStatus, ClubMember, CreateClubData, UpdateClubData};
use crate::models::event::Event;
use crate::utils::errors::GatherlyError;

#[derive(Debug, Clone)]
pub struct ClubRepository {
    pool: PgPool,
}

impl ClubRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a club and persist all listed members with MEMBER status
    pub async fn create(&self, data: CreateClubData) -> Result<Club, GatherlyError> {
        let mut tx = self.pool.begin().await?;

        let club = sqlx::query_as::<_, Club>(
            r#"
            INSERT INTO clubs (title, description, leader_id, max_people)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, description, leader_id, max_people, created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.leader_id)
        .bind(data.max_people)
        .fetch_one(&mut *tx)
        .await?;

        for user_id in &data.member_ids {
            sqlx::query("INSERT INTO club_joins (club_id, user_id, status) VALUES ($1, $2, $3)")
                .bind(club.id)
                .bind(user_id)
                .bind(ClubJoinStatus::Member)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(club)
    }

    /// Find club by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Club>, GatherlyError> {
        let club = sqlx::query_as::<_, Club>(
            "SELECT id, title, description, leader_id, max_people, created_at, updated_at FROM clubs WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(club)
    }

    /// List all clubs
    pub async fn list(&self) -> Result<Vec<Club>, GatherlyError> {
        let clubs = sqlx::query_as::<_, Club>(
            "SELECT id, title, description, leader_id, max_people, created_at, updated_at FROM clubs ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(clubs)
    }

    /// Get all membership rows of a club (active users only)
    pub async fn members(&self, club_id: i64) -> Result<Vec<ClubMember>, GatherlyError> {
        let members = sqlx::query_as::<_, ClubMember>(
            r#"
            SELECT cj.user_id, cj.status
            FROM club_joins cj
            INNER JOIN users u ON u.id = cj.user_id
            WHERE cj.club_id = $1 AND u.deleted_at IS NULL
            ORDER BY cj.created_at ASC
            "#,
        )
        .bind(club_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }

    /// Get membership rows of a club filtered by status (active users only)
    pub async fn members_by_status(
        &self,
        club_id: i64,
        status: ClubJoinStatus,
    ) -> Result<Vec<ClubMember>, GatherlyError> {
        let members = sqlx::query_as::<_, ClubMember>(
            r#"
            SELECT cj.user_id, cj.status
            FROM club_joins cj
            INNER JOIN users u ON u.id = cj.user_id
            WHERE cj.club_id = $1 AND cj.status = $2 AND u.deleted_at IS NULL
            ORDER BY cj.created_at ASC
            "#,
        )
        .bind(club_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }

    /// Count MEMBER rows of a club (active users only)
    pub async fn member_count(&self, club_id: i64) -> Result<i64, GatherlyError> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM club_joins cj
            INNER JOIN users u ON u.id = cj.user_id
            WHERE cj.club_id = $1 AND cj.status = $2 AND u.deleted_at IS NULL
            "#,
        )
        .bind(club_id)
        .bind(ClubJoinStatus::Member)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// Current membership status of a user in a club, if any
    pub async fn member_status(
        &self,
        club_id: i64,
        user_id: i64,
    ) -> Result<Option<ClubJoinStatus>, GatherlyError> {
        let status: Option<(ClubJoinStatus,)> = sqlx::query_as(
            r#"
            SELECT cj.status
            FROM club_joins cj
            INNER JOIN users u ON u.id = cj.user_id
            WHERE cj.club_id = $1 AND cj.user_id = $2 AND u.deleted_at IS NULL
            "#,
        )
        .bind(club_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(status.map(|row| row.0))
    }

    /// Check if a user is a full MEMBER of a club
    pub async fn is_member(&self, club_id: i64, user_id: i64) -> Result<bool, GatherlyError> {
        let status = self.member_status(club_id, user_id).await?;
        Ok(status == Some(ClubJoinStatus::Member))
    }

    /// Update club attributes; absent fields keep their current value
    pub async fn update(&self, club_id: i64, data: UpdateClubData) -> Result<Club, GatherlyError> {
        let club = sqlx::query_as::<_, Club>(
            r#"
            UPDATE clubs
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                leader_id = COALESCE($4, leader_id),
                max_people = COALESCE($5, max_people),
                updated_at = now()
            WHERE id = $1
            RETURNING id, title, description, leader_id, max_people, created_at, updated_at
            "#,
        )
        .bind(club_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.leader_id)
        .bind(data.max_people)
        .fetch_one(&self.pool)
        .await?;

        Ok(club)
    }

    /// Move a membership row to a new lifecycle status
    pub async fn update_member_status(
        &self,
        club_id: i64,
        user_id: i64,
        status: ClubJoinStatus,
    ) -> Result<(), GatherlyError> {
        sqlx::query(
            "UPDATE club_joins SET status = $3, updated_at = now() WHERE club_id = $1 AND user_id = $2",
        )
        .bind(club_id)
        .bind(user_id)
        .bind(status)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Record a join request with APPLICANT status
    pub async fn insert_applicant(&self, club_id: i64, user_id: i64) -> Result<(), GatherlyError> {
        sqlx::query("INSERT INTO club_joins (club_id, user_id, status) VALUES ($1, $2, $3)")
            .bind(club_id)
            .bind(user_id)
            .bind(ClubJoinStatus::Applicant)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Remove a member from a club, cascading over the club's future events.
    ///
    /// In one transaction: the member's future-dated hosted events of this
    /// club are deleted (city and attendance rows first), their attendance
    /// rows on the club's other future events are deleted, and finally the
    /// membership row itself is removed.
    pub async fn leave(&self, club_id: i64, user_id: i64) -> Result<(), GatherlyError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let hosted_ids: Vec<i64> = sqlx::query_as::<_, (i64,)>(
            "SELECT id FROM events WHERE club_id = $1 AND host_id = $2 AND start_time > $3",
        )
        .bind(club_id)
        .bind(user_id)
        .bind(now)
        .fetch_all(&mut *tx)
        .await?
        .into_iter()
        .map(|row| row.0)
        .collect();

        if !hosted_ids.is_empty() {
            sqlx::query("DELETE FROM event_cities WHERE event_id = ANY($1)")
                .bind(&hosted_ids)
                .execute(&mut *tx)
                .await?;
            sqlx::query("DELETE FROM event_joins WHERE event_id = ANY($1)")
                .bind(&hosted_ids)
                .execute(&mut *tx)
                .await?;
            sqlx::query("DELETE FROM events WHERE id = ANY($1)")
                .bind(&hosted_ids)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query(
            r#"
            DELETE FROM event_joins ej
            USING events e
            WHERE ej.event_id = e.id
              AND ej.user_id = $2
              AND e.club_id = $1
              AND e.start_time > $3
            "#,
        )
        .bind(club_id)
        .bind(user_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM club_joins WHERE club_id = $1 AND user_id = $2")
            .bind(club_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Delete a club together with its events.
    ///
    /// Future events are removed entirely (city and attendance rows first);
    /// events that already started are archived in place with club_id set
    /// to null so they stay queryable as archived records. Membership rows
    /// and the club row go last. All of it is one transaction.
    pub async fn delete_with_events(&self, club_id: i64) -> Result<(), GatherlyError> {
        let events = sqlx::query_as::<_, Event>(
            r#"
            SELECT id, host_id, club_id, title, description, category_id,
                   start_time, end_time, max_people, archived, created_at, updated_at
            FROM events
            WHERE club_id = $1
            "#,
        )
        .bind(club_id)
        .fetch_all(&self.pool)
        .await?;

        let now = Utc::now();
        let (upcoming, started): (Vec<_>, Vec<_>) =
            events.into_iter().partition(|event| event.start_time >= now);

        let upcoming_ids: Vec<i64> = upcoming.iter().map(|event| event.id).collect();
        let started_ids: Vec<i64> = started.iter().map(|event| event.id).collect();

        let mut tx = self.pool.begin().await?;

        if !upcoming_ids.is_empty() {
            sqlx::query("DELETE FROM event_cities WHERE event_id = ANY($1)")
                .bind(&upcoming_ids)
                .execute(&mut *tx)
                .await?;
            sqlx::query("DELETE FROM event_joins WHERE event_id = ANY($1)")
                .bind(&upcoming_ids)
                .execute(&mut *tx)
                .await?;
            sqlx::query("DELETE FROM events WHERE id = ANY($1)")
                .bind(&upcoming_ids)
                .execute(&mut *tx)
                .await?;
        }

        if !started_ids.is_empty() {
            // club_id is nulled to release the FK before the club row goes
            sqlx::query(
                "UPDATE events SET archived = TRUE, club_id = NULL, updated_at = now() WHERE id = ANY($1)",
            )
            .bind(&started_ids)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("DELETE FROM club_joins WHERE club_id = $1")
            .bind(club_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM clubs WHERE id = $1")
            .bind(club_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}
