//! Event and attendance models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub host_id: i64,
    /// None for open events; nulled when the owning club is deleted and
    /// the event is archived in place.
    pub club_id: Option<i64>,
    pub title: String,
    pub description: String,
    pub category_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub max_people: i32,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventJoin {
    pub id: i64,
    pub event_id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct City {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateEventRequest {
    pub host_id: i64,
    pub title: String,
    pub description: String,
    pub category_id: i64,
    pub city_ids: Vec<i64>,
    pub club_id: Option<i64>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub max_people: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub city_ids: Option<Vec<i64>>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub max_people: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventJoinRequest {
    pub user_id: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventListQuery {
    pub host_id: Option<i64>,
    pub category_id: Option<i64>,
    pub city_id: Option<i64>,
    pub club_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct CreateEventData {
    pub host_id: i64,
    pub club_id: Option<i64>,
    pub title: String,
    pub description: String,
    pub category_id: i64,
    pub city_ids: Vec<i64>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub max_people: i32,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateEventData {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub city_ids: Option<Vec<i64>>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub max_people: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventDto {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub host_id: i64,
    pub category_id: i64,
    pub city_ids: Vec<i64>,
    pub club_id: Option<i64>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub max_people: i32,
    pub archived: bool,
}

impl EventDto {
    pub fn from_parts(event: Event, city_ids: Vec<i64>) -> Self {
        Self {
            id: event.id,
            title: event.title,
            description: event.description,
            host_id: event.host_id,
            category_id: event.category_id,
            city_ids,
            club_id: event.club_id,
            start_time: event.start_time,
            end_time: event.end_time,
            max_people: event.max_people,
            archived: event.archived,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EventListDto {
    pub events: Vec<EventDto>,
}
