//! Event service implementation
//!
//! Event CRUD, attendance and the per-event visibility rules: a
//! club-scoped event is only visible to that club's members or its
//! attendees, an archived event only to its past attendees.

use std::collections::HashSet;

use chrono::Utc;
use futures::future::try_join_all;
use tracing::info;

use crate::database::repositories::{EventRepository, UserRepository};
use crate::models::event::{
    CreateEventData, CreateEventRequest, Event, EventDto, EventListDto, EventListQuery,
    UpdateEventData, UpdateEventRequest,
};
use crate::services::auth::CurrentUser;
use crate::utils::errors::{GatherlyError, Result};
use crate::utils::helpers::normalize_whitespace;

#[derive(Clone)]
pub struct EventService {
    events: EventRepository,
    users: UserRepository,
}

impl EventService {
    pub fn new(events: EventRepository, users: UserRepository) -> Self {
        Self { events, users }
    }

    /// Create an event; the host is auto-joined as its first attendee.
    pub async fn create_event(&self, payload: CreateEventRequest) -> Result<EventDto> {
        let title = normalize_whitespace(&payload.title);
        if title.is_empty() {
            return Err(GatherlyError::InvalidInput(
                "event title must not be empty".to_string(),
            ));
        }
        if payload.max_people < 1 {
            return Err(GatherlyError::InvalidInput(
                "max_people must be at least 1".to_string(),
            ));
        }

        if !self.events.category_exists(payload.category_id).await? {
            return Err(GatherlyError::CategoryNotFound {
                category_id: payload.category_id,
            });
        }

        let mut city_ids = payload.city_ids;
        city_ids.sort_unstable();
        city_ids.dedup();
        if city_ids.is_empty() {
            return Err(GatherlyError::InvalidInput(
                "at least one city is required".to_string(),
            ));
        }
        if !self.events.cities_exist(&city_ids).await? {
            return Err(GatherlyError::CityNotFound);
        }

        let now = Utc::now();
        if payload.start_time <= now {
            return Err(GatherlyError::InvalidInput(
                "an event must start in the future".to_string(),
            ));
        }
        if payload.start_time >= payload.end_time {
            return Err(GatherlyError::InvalidInput(
                "an event must end after it starts".to_string(),
            ));
        }

        if self.users.find_by_id(payload.host_id).await?.is_none() {
            return Err(GatherlyError::UserNotFound {
                user_id: payload.host_id,
            });
        }

        if let Some(club_id) = payload.club_id {
            if !self.events.club_exists(club_id).await? {
                return Err(GatherlyError::ClubNotFound { club_id });
            }
            if !self.events.is_club_member(club_id, payload.host_id).await? {
                return Err(GatherlyError::Conflict(
                    "the host must be a member of the club".to_string(),
                ));
            }
        }

        let event = self
            .events
            .create(CreateEventData {
                host_id: payload.host_id,
                club_id: payload.club_id,
                title,
                description: payload.description,
                category_id: payload.category_id,
                city_ids,
                start_time: payload.start_time,
                end_time: payload.end_time,
                max_people: payload.max_people,
            })
            .await?;

        // the host always attends their own event
        self.events.join(event.id, event.host_id).await?;

        info!(event_id = event.id, host_id = event.host_id, "Event created");

        let city_ids = self.events.city_ids(event.id).await?;
        Ok(EventDto::from_parts(event, city_ids))
    }

    /// Get a single event, subject to the visibility rules.
    pub async fn get_event(&self, event_id: i64, actor: &CurrentUser) -> Result<EventDto> {
        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(GatherlyError::EventNotFound { event_id })?;

        self.check_visibility(&event, actor).await?;

        let city_ids = self.events.city_ids(event.id).await?;
        Ok(EventDto::from_parts(event, city_ids))
    }

    /// List events by filter criteria, then retain those visible to the
    /// actor.
    pub async fn list_events(
        &self,
        query: EventListQuery,
        actor: &CurrentUser,
    ) -> Result<EventListDto> {
        let events = self.events.list(&query).await?;

        let joined: HashSet<i64> = self
            .events
            .joined_event_ids(actor.id)
            .await?
            .into_iter()
            .collect();
        let member_clubs: HashSet<i64> = self
            .events
            .member_club_ids(actor.id)
            .await?
            .into_iter()
            .collect();

        let visible: Vec<Event> = events
            .into_iter()
            .filter(|event| {
                if event.archived {
                    return joined.contains(&event.id);
                }
                match event.club_id {
                    Some(club_id) => {
                        member_clubs.contains(&club_id) || joined.contains(&event.id)
                    }
                    None => true,
                }
            })
            .collect();

        let city_ids = try_join_all(visible.iter().map(|event| self.events.city_ids(event.id)))
            .await?;

        let events = visible
            .into_iter()
            .zip(city_ids)
            .map(|(event, cities)| EventDto::from_parts(event, cities))
            .collect();

        Ok(EventListDto { events })
    }

    /// Join an event. Capacity and duplicate checks precede the temporal
    /// one, matching the order the errors are reported in.
    pub async fn join_event(&self, event_id: i64, user_id: i64) -> Result<()> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(GatherlyError::UserNotFound { user_id });
        }

        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(GatherlyError::EventNotFound { event_id })?;

        let attendee_count = self.events.attendee_count(event_id).await?;
        if attendee_count >= i64::from(event.max_people) {
            return Err(GatherlyError::Conflict("the event is already full".to_string()));
        }

        if self.events.is_joined(event_id, user_id).await? {
            return Err(GatherlyError::Conflict(
                "already joined this event".to_string(),
            ));
        }

        if event.start_time <= Utc::now() {
            return Err(GatherlyError::InvalidInput(
                "the event has already started".to_string(),
            ));
        }

        if let Some(club_id) = event.club_id {
            if !self.events.is_club_member(club_id, user_id).await? {
                return Err(GatherlyError::Conflict(
                    "only club members can join a club event".to_string(),
                ));
            }
        }

        self.events.join(event_id, user_id).await?;

        info!(event_id = event_id, user_id = user_id, "User joined event");
        Ok(())
    }

    /// Leave an event. The host cannot leave their own event.
    pub async fn leave_event(&self, event_id: i64, user_id: i64) -> Result<()> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(GatherlyError::UserNotFound { user_id });
        }

        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(GatherlyError::EventNotFound { event_id })?;

        if event.start_time <= Utc::now() {
            return Err(GatherlyError::InvalidInput(
                "the event has already started".to_string(),
            ));
        }

        if !self.events.is_joined(event_id, user_id).await? {
            return Err(GatherlyError::InvalidInput(
                "not joined to this event".to_string(),
            ));
        }

        if event.host_id == user_id {
            return Err(GatherlyError::Conflict(
                "the host cannot leave the event".to_string(),
            ));
        }

        self.events.leave(event_id, user_id).await?;

        info!(event_id = event_id, user_id = user_id, "User left event");
        Ok(())
    }

    /// Update an event that has not started yet. The merged start/end
    /// window must stay valid and capacity cannot drop below the current
    /// attendance.
    pub async fn update_event(
        &self,
        event_id: i64,
        payload: UpdateEventRequest,
    ) -> Result<EventDto> {
        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(GatherlyError::EventNotFound { event_id })?;

        let now = Utc::now();
        if event.start_time <= now {
            return Err(GatherlyError::InvalidInput(
                "an event that already started cannot be updated".to_string(),
            ));
        }

        let start_time = payload.start_time.unwrap_or(event.start_time);
        let end_time = payload.end_time.unwrap_or(event.end_time);
        if start_time <= now {
            return Err(GatherlyError::InvalidInput(
                "an event must start in the future".to_string(),
            ));
        }
        if start_time >= end_time {
            return Err(GatherlyError::InvalidInput(
                "an event must end after it starts".to_string(),
            ));
        }

        if let Some(category_id) = payload.category_id {
            if !self.events.category_exists(category_id).await? {
                return Err(GatherlyError::CategoryNotFound { category_id });
            }
        }

        let city_ids = payload.city_ids.map(|mut city_ids| {
            city_ids.sort_unstable();
            city_ids.dedup();
            city_ids
        });
        if let Some(city_ids) = &city_ids {
            if city_ids.is_empty() {
                return Err(GatherlyError::InvalidInput(
                    "at least one city is required".to_string(),
                ));
            }
            if !self.events.cities_exist(city_ids).await? {
                return Err(GatherlyError::CityNotFound);
            }
        }

        if let Some(max_people) = payload.max_people {
            if max_people < 1 {
                return Err(GatherlyError::InvalidInput(
                    "max_people must be at least 1".to_string(),
                ));
            }
            let attendee_count = self.events.attendee_count(event_id).await?;
            if i64::from(max_people) < attendee_count {
                return Err(GatherlyError::Conflict(
                    "max_people cannot be lower than the current attendee count".to_string(),
                ));
            }
        }

        if let Some(title) = &payload.title {
            if normalize_whitespace(title).is_empty() {
                return Err(GatherlyError::InvalidInput(
                    "event title must not be empty".to_string(),
                ));
            }
        }

        let updated = self
            .events
            .update(
                event_id,
                UpdateEventData {
                    title: payload.title,
                    description: payload.description,
                    category_id: payload.category_id,
                    city_ids,
                    start_time: payload.start_time,
                    end_time: payload.end_time,
                    max_people: payload.max_people,
                },
            )
            .await?;

        info!(event_id = event_id, "Event updated");

        let city_ids = self.events.city_ids(event_id).await?;
        Ok(EventDto::from_parts(updated, city_ids))
    }

    /// Delete an event that has not started yet.
    pub async fn delete_event(&self, event_id: i64) -> Result<()> {
        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(GatherlyError::EventNotFound { event_id })?;

        if event.start_time <= Utc::now() {
            return Err(GatherlyError::InvalidInput(
                "an event that already started cannot be deleted".to_string(),
            ));
        }

        self.events.delete(event_id).await?;

        info!(event_id = event_id, "Event deleted");
        Ok(())
    }

    /// Visibility predicate shared by get and list: archived events belong
    /// to their past attendees, club events to club members and attendees.
    async fn check_visibility(&self, event: &Event, actor: &CurrentUser) -> Result<()> {
        if event.archived {
            if !self.events.is_joined(event.id, actor.id).await? {
                return Err(GatherlyError::Conflict(
                    "only past attendees can view an archived event".to_string(),
                ));
            }
            return Ok(());
        }

        if let Some(club_id) = event.club_id {
            let is_member = self.events.is_club_member(club_id, actor.id).await?;
            let is_attendee = self.events.is_joined(event.id, actor.id).await?;
            if !is_member && !is_attendee {
                return Err(GatherlyError::Conflict(
                    "only club members can view a club event".to_string(),
                ));
            }
        }

        Ok(())
    }
}
