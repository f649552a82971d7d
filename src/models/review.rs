//! Review models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::helpers::double_option;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: i64,
    pub user_id: i64,
    pub event_id: i64,
    pub score: i32,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateReviewRequest {
    pub event_id: i64,
    pub score: i32,
    pub title: String,
    pub description: Option<String>,
}

/// Full replacement; an omitted description resets the column to null.
#[derive(Debug, Clone, Deserialize)]
pub struct PutUpdateReviewRequest {
    pub score: i32,
    pub title: String,
    pub description: Option<String>,
}

/// Partial update; explicit null is rejected for score and title but
/// allowed for description.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatchUpdateReviewRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub score: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewQuery {
    pub event_id: Option<i64>,
    pub user_id: Option<i64>,
}

/// Repository-level update data. The outer Option on description marks
/// whether the column should be written at all; `Some(None)` sets null.
#[derive(Debug, Clone, Default)]
pub struct UpdateReviewData {
    pub score: Option<i32>,
    pub title: Option<String>,
    pub description: Option<Option<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewDto {
    pub id: i64,
    pub user_id: i64,
    pub event_id: i64,
    pub score: i32,
    pub title: String,
    pub description: Option<String>,
}

impl From<Review> for ReviewDto {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            user_id: review.user_id,
            event_id: review.event_id,
            score: review.score,
            title: review.title,
            description: review.description,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewListDto {
    pub reviews: Vec<ReviewDto>,
}
