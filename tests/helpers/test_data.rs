//! Seed data builders for integration tests
//!
//! Happy-path setup goes through the services where possible; rows the
//! services refuse to create (finished events, pre-seeded memberships)
//! are inserted directly.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{Duration, Utc};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;

use gatherly::models::club::{ClubDto, ClubJoinStatus, CreateClubRequest};
use gatherly::models::event::{CreateEventRequest, EventDto};
use gatherly::models::user::{CreateUserData, User};
use gatherly::services::auth::CurrentUser;

use super::database_helper::TestContext;

static SEQ: AtomicU64 = AtomicU64::new(0);

fn next_seq() -> u64 {
    SEQ.fetch_add(1, Ordering::Relaxed)
}

pub async fn create_user(ctx: &TestContext) -> User {
    let name: String = Name().fake();
    let email: String = SafeEmail().fake();

    ctx.db
        .users
        .create(CreateUserData {
            name,
            email: format!("{}-{}", next_seq(), email),
        })
        .await
        .expect("Failed to create test user")
}

pub async fn create_category(ctx: &TestContext) -> i64 {
    let (id,): (i64,) =
        sqlx::query_as("INSERT INTO categories (name) VALUES ($1) RETURNING id")
            .bind(format!("category-{}", next_seq()))
            .fetch_one(&ctx.pool)
            .await
            .expect("Failed to create test category");
    id
}

pub async fn create_city(ctx: &TestContext) -> i64 {
    let (id,): (i64,) = sqlx::query_as("INSERT INTO cities (name) VALUES ($1) RETURNING id")
        .bind(format!("city-{}", next_seq()))
        .fetch_one(&ctx.pool)
        .await
        .expect("Failed to create test city");
    id
}

/// Create a club through the service with the given leader and members.
pub async fn create_club(
    ctx: &TestContext,
    leader_id: i64,
    member_ids: Vec<i64>,
    max_people: i32,
) -> ClubDto {
    ctx.services
        .club_service
        .create_club(
            CreateClubRequest {
                title: format!("club {}", next_seq()),
                description: "a club for tests".to_string(),
                max_people,
                member_ids,
            },
            &CurrentUser { id: leader_id },
        )
        .await
        .expect("Failed to create test club")
}

/// Insert a membership row directly, bypassing the applicant flow.
pub async fn add_club_member(ctx: &TestContext, club_id: i64, user_id: i64, status: ClubJoinStatus) {
    sqlx::query("INSERT INTO club_joins (club_id, user_id, status) VALUES ($1, $2, $3)")
        .bind(club_id)
        .bind(user_id)
        .bind(status)
        .execute(&ctx.pool)
        .await
        .expect("Failed to insert club join row");
}

/// Create an upcoming event through the service; a fresh category and
/// city are seeded for it. The host is auto-joined.
pub async fn create_future_event(
    ctx: &TestContext,
    host_id: i64,
    club_id: Option<i64>,
    starts_in_minutes: i64,
    duration_minutes: i64,
    max_people: i32,
) -> EventDto {
    let category_id = create_category(ctx).await;
    let city_id = create_city(ctx).await;
    let start_time = Utc::now() + Duration::minutes(starts_in_minutes);

    ctx.services
        .event_service
        .create_event(CreateEventRequest {
            host_id,
            title: format!("event {}", next_seq()),
            description: "an event for tests".to_string(),
            category_id,
            city_ids: vec![city_id],
            club_id,
            start_time,
            end_time: start_time + Duration::minutes(duration_minutes),
            max_people,
        })
        .await
        .expect("Failed to create test event")
}

/// Insert an event row directly with an arbitrary time window; the
/// service refuses to create events in the past. The host gets an
/// attendance row like the service would create.
pub async fn insert_event_raw(
    ctx: &TestContext,
    host_id: i64,
    club_id: Option<i64>,
    starts_in_minutes: i64,
    ends_in_minutes: i64,
    max_people: i32,
    archived: bool,
) -> i64 {
    let category_id = create_category(ctx).await;
    let city_id = create_city(ctx).await;
    let now = Utc::now();

    let (event_id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO events (host_id, club_id, title, description, category_id,
                            start_time, end_time, max_people, archived)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id
        "#,
    )
    .bind(host_id)
    .bind(club_id)
    .bind(format!("event {}", next_seq()))
    .bind("an event for tests")
    .bind(category_id)
    .bind(now + Duration::minutes(starts_in_minutes))
    .bind(now + Duration::minutes(ends_in_minutes))
    .bind(max_people)
    .bind(archived)
    .fetch_one(&ctx.pool)
    .await
    .expect("Failed to insert event row");

    sqlx::query("INSERT INTO event_cities (event_id, city_id) VALUES ($1, $2)")
        .bind(event_id)
        .bind(city_id)
        .execute(&ctx.pool)
        .await
        .expect("Failed to insert event city row");

    join_event_raw(ctx, event_id, host_id).await;

    event_id
}

/// Insert an attendance row directly.
pub async fn join_event_raw(ctx: &TestContext, event_id: i64, user_id: i64) {
    sqlx::query("INSERT INTO event_joins (event_id, user_id) VALUES ($1, $2)")
        .bind(event_id)
        .bind(user_id)
        .execute(&ctx.pool)
        .await
        .expect("Failed to insert event join row");
}
