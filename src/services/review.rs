//! Review service implementation
//!
//! Reviews are one per (user, event), only by attendees of finished
//! events, never by the host. Visibility mirrors the event rules.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use tracing::info;

use crate::database::repositories::ReviewRepository;
use crate::models::event::Event;
use crate::models::review::{
    CreateReviewRequest, PatchUpdateReviewRequest, PutUpdateReviewRequest, Review, ReviewDto,
    ReviewListDto, ReviewQuery, UpdateReviewData,
};
use crate::services::auth::CurrentUser;
use crate::utils::errors::{GatherlyError, Result};
use crate::utils::helpers::normalize_whitespace;

const MIN_SCORE: i32 = 1;
const MAX_SCORE: i32 = 5;

#[derive(Clone)]
pub struct ReviewService {
    reviews: ReviewRepository,
}

impl ReviewService {
    pub fn new(reviews: ReviewRepository) -> Self {
        Self { reviews }
    }

    /// Create a review for a finished event the actor attended.
    pub async fn create_review(
        &self,
        payload: CreateReviewRequest,
        actor: &CurrentUser,
    ) -> Result<ReviewDto> {
        validate_score(payload.score)?;
        let title = normalize_whitespace(&payload.title);
        if title.is_empty() {
            return Err(GatherlyError::InvalidInput(
                "review title must not be empty".to_string(),
            ));
        }

        if self.reviews.exists(actor.id, payload.event_id).await? {
            return Err(GatherlyError::Conflict(
                "a review for this event already exists".to_string(),
            ));
        }

        if !self
            .reviews
            .is_user_joined_event(actor.id, payload.event_id)
            .await?
        {
            return Err(GatherlyError::Conflict(
                "only attendees can review an event".to_string(),
            ));
        }

        let event = self
            .reviews
            .get_event(payload.event_id)
            .await?
            .ok_or(GatherlyError::EventNotFound {
                event_id: payload.event_id,
            })?;

        if event.end_time > Utc::now() {
            return Err(GatherlyError::Conflict(
                "the event has not finished yet".to_string(),
            ));
        }

        if event.host_id == actor.id {
            return Err(GatherlyError::Conflict(
                "the host cannot review their own event".to_string(),
            ));
        }

        let review = self
            .reviews
            .create(
                actor.id,
                payload.event_id,
                payload.score,
                title,
                payload.description,
            )
            .await?;

        info!(
            review_id = review.id,
            event_id = review.event_id,
            user_id = actor.id,
            "Review created"
        );
        Ok(review.into())
    }

    /// Get a single review; reviews of club events are member-only.
    pub async fn get_review(&self, review_id: i64, actor: &CurrentUser) -> Result<ReviewDto> {
        let review = self
            .reviews
            .find_by_id(review_id)
            .await?
            .ok_or(GatherlyError::ReviewNotFound { review_id })?;

        let event = self
            .reviews
            .get_event(review.event_id)
            .await?
            .ok_or_else(|| {
                GatherlyError::InvalidInput("no event exists for this review".to_string())
            })?;

        if let Some(club_id) = event.club_id {
            if !self.reviews.is_user_in_club(actor.id, club_id).await? {
                return Err(GatherlyError::Conflict(
                    "only club members can view this review".to_string(),
                ));
            }
        }

        Ok(review.into())
    }

    /// List reviews by filter, retaining only those whose event the actor
    /// may see.
    pub async fn list_reviews(
        &self,
        query: ReviewQuery,
        actor: &CurrentUser,
    ) -> Result<ReviewListDto> {
        let reviews = self.reviews.list(&query).await?;
        let visible = self.filter_club_event_reviews(reviews, actor).await?;

        Ok(ReviewListDto {
            reviews: visible.into_iter().map(ReviewDto::from).collect(),
        })
    }

    /// Replace a review; the description resets to null when omitted.
    pub async fn put_update_review(
        &self,
        review_id: i64,
        payload: PutUpdateReviewRequest,
        actor: &CurrentUser,
    ) -> Result<ReviewDto> {
        validate_score(payload.score)?;
        let title = normalize_whitespace(&payload.title);
        if title.is_empty() {
            return Err(GatherlyError::InvalidInput(
                "review title must not be empty".to_string(),
            ));
        }

        self.check_author(review_id, actor).await?;

        let updated = self
            .reviews
            .update(
                review_id,
                UpdateReviewData {
                    score: Some(payload.score),
                    title: Some(title),
                    description: Some(payload.description),
                },
            )
            .await?;

        info!(review_id = review_id, "Review replaced");
        Ok(updated.into())
    }

    /// Partially update a review; explicit nulls for score or title are
    /// invalid, an explicit null description clears it.
    pub async fn patch_update_review(
        &self,
        review_id: i64,
        payload: PatchUpdateReviewRequest,
        actor: &CurrentUser,
    ) -> Result<ReviewDto> {
        if matches!(payload.score, Some(None)) {
            return Err(GatherlyError::InvalidInput("score cannot be null".to_string()));
        }
        if matches!(payload.title, Some(None)) {
            return Err(GatherlyError::InvalidInput("title cannot be null".to_string()));
        }

        let score = payload.score.flatten();
        if let Some(score) = score {
            validate_score(score)?;
        }

        let title = match payload.title.flatten() {
            Some(title) => {
                let title = normalize_whitespace(&title);
                if title.is_empty() {
                    return Err(GatherlyError::InvalidInput(
                        "review title must not be empty".to_string(),
                    ));
                }
                Some(title)
            }
            None => None,
        };

        self.check_author(review_id, actor).await?;

        let updated = self
            .reviews
            .update(
                review_id,
                UpdateReviewData {
                    score,
                    title,
                    description: payload.description,
                },
            )
            .await?;

        info!(review_id = review_id, "Review updated");
        Ok(updated.into())
    }

    /// Delete a review; author only.
    pub async fn delete_review(&self, review_id: i64, actor: &CurrentUser) -> Result<()> {
        self.check_author(review_id, actor).await?;

        self.reviews.delete(review_id).await?;

        info!(review_id = review_id, "Review deleted");
        Ok(())
    }

    /// Retain reviews whose event the actor may see: open events are
    /// public, archived open events only for past attendees, club events
    /// only for users with a join row.
    async fn filter_club_event_reviews(
        &self,
        reviews: Vec<Review>,
        actor: &CurrentUser,
    ) -> Result<Vec<Review>> {
        if reviews.is_empty() {
            return Ok(reviews);
        }

        let joined_events: HashSet<i64> = self
            .reviews
            .user_event_ids(actor.id)
            .await?
            .into_iter()
            .collect();
        let joined_clubs: HashSet<i64> = self
            .reviews
            .user_club_ids(actor.id)
            .await?
            .into_iter()
            .collect();

        let mut event_ids: Vec<i64> = reviews.iter().map(|review| review.event_id).collect();
        event_ids.sort_unstable();
        event_ids.dedup();

        let events: HashMap<i64, Event> = self
            .reviews
            .events_by_ids(&event_ids)
            .await?
            .into_iter()
            .map(|event| (event.id, event))
            .collect();

        let mut visible = Vec::with_capacity(reviews.len());
        for review in reviews {
            let event = events.get(&review.event_id).ok_or_else(|| {
                GatherlyError::InvalidInput("no event exists for this review".to_string())
            })?;

            let keep = match event.club_id {
                Some(club_id) => joined_clubs.contains(&club_id),
                None => {
                    if event.archived {
                        joined_events.contains(&event.id)
                    } else {
                        true
                    }
                }
            };

            if keep {
                visible.push(review);
            }
        }

        Ok(visible)
    }

    async fn check_author(&self, review_id: i64, actor: &CurrentUser) -> Result<Review> {
        let review = self
            .reviews
            .find_by_id(review_id)
            .await?
            .ok_or(GatherlyError::ReviewNotFound { review_id })?;

        if review.user_id != actor.id {
            return Err(GatherlyError::Conflict(
                "only the author may modify this review".to_string(),
            ));
        }

        Ok(review)
    }
}

fn validate_score(score: i32) -> Result<()> {
    if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        return Err(GatherlyError::InvalidInput(format!(
            "score must be between {MIN_SCORE} and {MAX_SCORE}"
        )));
    }
    Ok(())
}
