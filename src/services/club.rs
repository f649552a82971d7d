//! Club service implementation
//!
//! Club CRUD, the membership-request lifecycle and the two cascading
//! operations (member leave, club deletion). Every operation runs its
//! validation predicates before any write.

use tracing::{debug, info};

use crate::database::repositories::{ClubRepository, UserRepository};
use crate::models::club::{
    ApplicantDecision, ClubDto, ClubJoinStatus, ClubListDto, ClubMemberDto, CreateClubData,
    CreateClubRequest, UpdateClubData, UpdateClubRequest,
};
use crate::services::auth::CurrentUser;
use crate::utils::errors::{GatherlyError, Result};
use crate::utils::helpers::normalize_whitespace;

#[derive(Clone)]
pub struct ClubService {
    clubs: ClubRepository,
    users: UserRepository,
}

impl ClubService {
    pub fn new(clubs: ClubRepository, users: UserRepository) -> Self {
        Self { clubs, users }
    }

    /// Create a club with the actor as leader and all listed members as
    /// MEMBER rows.
    pub async fn create_club(
        &self,
        payload: CreateClubRequest,
        actor: &CurrentUser,
    ) -> Result<ClubDto> {
        let title = normalize_whitespace(&payload.title);
        if title.is_empty() {
            return Err(GatherlyError::InvalidInput(
                "club title must not be empty".to_string(),
            ));
        }
        if payload.max_people < 1 {
            return Err(GatherlyError::InvalidInput(
                "max_people must be at least 1".to_string(),
            ));
        }

        let mut member_ids = payload.member_ids.clone();
        member_ids.sort_unstable();
        member_ids.dedup();

        if !self.users.all_exist(&member_ids).await? {
            return Err(GatherlyError::InvalidInput(
                "member_ids must reference existing users".to_string(),
            ));
        }
        if !member_ids.contains(&actor.id) {
            return Err(GatherlyError::InvalidInput(
                "the club leader must be one of the members".to_string(),
            ));
        }
        if member_ids.len() as i32 > payload.max_people {
            return Err(GatherlyError::Conflict(
                "a club cannot start with more members than max_people".to_string(),
            ));
        }

        let club = self
            .clubs
            .create(CreateClubData {
                title,
                description: payload.description,
                leader_id: actor.id,
                max_people: payload.max_people,
                member_ids,
            })
            .await?;

        info!(club_id = club.id, leader_id = actor.id, "Club created");

        let members = self.clubs.members(club.id).await?;
        Ok(ClubDto::from_parts(club, members))
    }

    /// Get a single club with its membership rows
    pub async fn get_club(&self, club_id: i64) -> Result<ClubDto> {
        let club = self
            .clubs
            .find_by_id(club_id)
            .await?
            .ok_or(GatherlyError::ClubNotFound { club_id })?;

        let members = self.clubs.members(club.id).await?;
        Ok(ClubDto::from_parts(club, members))
    }

    /// List all clubs
    pub async fn list_clubs(&self) -> Result<ClubListDto> {
        let clubs = self.clubs.list().await?;

        let mut dtos = Vec::with_capacity(clubs.len());
        for club in clubs {
            let members = self.clubs.members(club.id).await?;
            dtos.push(ClubDto::from_parts(club, members));
        }

        Ok(ClubListDto { clubs: dtos })
    }

    /// List a club's join rows filtered by lifecycle status
    pub async fn get_members_by_status(
        &self,
        club_id: i64,
        status: ClubJoinStatus,
    ) -> Result<Vec<ClubMemberDto>> {
        if self.clubs.find_by_id(club_id).await?.is_none() {
            return Err(GatherlyError::ClubNotFound { club_id });
        }

        let members = self.clubs.members_by_status(club_id, status).await?;
        Ok(members
            .into_iter()
            .map(|member| ClubMemberDto {
                user_id: member.user_id,
                status: member.status,
            })
            .collect())
    }

    /// Accept or reject a pending applicant. Leader only; accepting into a
    /// full club is a conflict.
    pub async fn handle_applicant(
        &self,
        club_id: i64,
        user_id: i64,
        decision: ApplicantDecision,
        actor: &CurrentUser,
    ) -> Result<()> {
        let club = self
            .clubs
            .find_by_id(club_id)
            .await?
            .ok_or(GatherlyError::ClubNotFound { club_id })?;

        if club.leader_id != actor.id {
            return Err(GatherlyError::InvalidInput(
                "only the club leader may decide on applicants".to_string(),
            ));
        }
        if !self.users.all_exist(&[user_id]).await? {
            return Err(GatherlyError::InvalidInput(
                "user_id does not reference an existing user".to_string(),
            ));
        }

        if decision == ApplicantDecision::Accept {
            let member_count = self.clubs.member_count(club_id).await?;
            if i64::from(club.max_people) <= member_count {
                return Err(GatherlyError::Conflict("the club is already full".to_string()));
            }
        }

        let current = self.clubs.member_status(club_id, user_id).await?;
        if current != Some(ClubJoinStatus::Applicant) {
            return Err(GatherlyError::Conflict(
                "the user is not an applicant of this club".to_string(),
            ));
        }

        let new_status = match decision {
            ApplicantDecision::Accept => ClubJoinStatus::Member,
            ApplicantDecision::Reject => ClubJoinStatus::Rejected,
        };
        self.clubs
            .update_member_status(club_id, user_id, new_status)
            .await?;

        info!(
            club_id = club_id,
            user_id = user_id,
            decision = ?decision,
            "Applicant handled"
        );
        Ok(())
    }

    /// Update club attributes. Leader only; explicit nulls are invalid; a
    /// new leader must already be a member; max_people cannot drop below
    /// the current member count.
    pub async fn update_club(
        &self,
        club_id: i64,
        payload: UpdateClubRequest,
        actor: &CurrentUser,
    ) -> Result<ClubDto> {
        let club = self
            .clubs
            .find_by_id(club_id)
            .await?
            .ok_or(GatherlyError::ClubNotFound { club_id })?;

        if club.leader_id != actor.id {
            return Err(GatherlyError::Conflict(
                "only the club leader may update the club".to_string(),
            ));
        }

        if matches!(payload.title, Some(None)) {
            return Err(GatherlyError::InvalidInput("title cannot be null".to_string()));
        }
        if matches!(payload.description, Some(None)) {
            return Err(GatherlyError::InvalidInput(
                "description cannot be null".to_string(),
            ));
        }
        if matches!(payload.leader_id, Some(None)) {
            return Err(GatherlyError::InvalidInput(
                "leader_id cannot be null".to_string(),
            ));
        }
        if matches!(payload.max_people, Some(None)) {
            return Err(GatherlyError::InvalidInput(
                "max_people cannot be null".to_string(),
            ));
        }

        let title = payload.title.flatten();
        let description = payload.description.flatten();
        let leader_id = payload.leader_id.flatten();
        let max_people = payload.max_people.flatten();

        if let Some(title) = &title {
            if normalize_whitespace(title).is_empty() {
                return Err(GatherlyError::InvalidInput(
                    "club title must not be empty".to_string(),
                ));
            }
        }

        if let Some(new_leader_id) = leader_id {
            if !self.users.all_exist(&[new_leader_id]).await? {
                return Err(GatherlyError::InvalidInput(
                    "leader_id does not reference an existing user".to_string(),
                ));
            }
            if !self.clubs.is_member(club_id, new_leader_id).await? {
                return Err(GatherlyError::InvalidInput(
                    "a user who is not a club member cannot become the leader".to_string(),
                ));
            }
        }

        if let Some(new_max) = max_people {
            if new_max < 1 {
                return Err(GatherlyError::InvalidInput(
                    "max_people must be at least 1".to_string(),
                ));
            }
            let member_count = self.clubs.member_count(club_id).await?;
            if i64::from(new_max) < member_count {
                return Err(GatherlyError::Conflict(
                    "max_people cannot be lower than the current member count".to_string(),
                ));
            }
        }

        let updated = self
            .clubs
            .update(
                club_id,
                UpdateClubData {
                    title,
                    description,
                    leader_id,
                    max_people,
                },
            )
            .await?;

        info!(club_id = club_id, "Club updated");

        let members = self.clubs.members(club_id).await?;
        Ok(ClubDto::from_parts(updated, members))
    }

    /// Apply to join a club; the request starts in APPLICANT status.
    pub async fn join_club(&self, club_id: i64, actor: &CurrentUser) -> Result<()> {
        let club = self
            .clubs
            .find_by_id(club_id)
            .await?
            .ok_or(GatherlyError::ClubNotFound { club_id })?;

        if let Some(status) = self.clubs.member_status(club_id, actor.id).await? {
            let message = match status {
                ClubJoinStatus::Member => "already a member of this club",
                ClubJoinStatus::Applicant => "a join request is already pending",
                ClubJoinStatus::Rejected => "the join request was rejected",
            };
            return Err(GatherlyError::Conflict(message.to_string()));
        }

        let member_count = self.clubs.member_count(club_id).await?;
        if i64::from(club.max_people) <= member_count {
            return Err(GatherlyError::Conflict("the club is already full".to_string()));
        }

        self.clubs.insert_applicant(club_id, actor.id).await?;

        info!(club_id = club_id, user_id = actor.id, "Join request recorded");
        Ok(())
    }

    /// Leave a club. The leader cannot leave; the member's future events
    /// inside the club are cascaded away atomically.
    pub async fn leave_club(&self, club_id: i64, actor: &CurrentUser) -> Result<()> {
        let club = self
            .clubs
            .find_by_id(club_id)
            .await?
            .ok_or(GatherlyError::ClubNotFound { club_id })?;

        if club.leader_id == actor.id {
            return Err(GatherlyError::Conflict(
                "the club leader cannot leave the club".to_string(),
            ));
        }

        let status = self.clubs.member_status(club_id, actor.id).await?;
        if status != Some(ClubJoinStatus::Member) {
            return Err(GatherlyError::Conflict(
                "not a member of this club".to_string(),
            ));
        }

        self.clubs.leave(club_id, actor.id).await?;

        info!(club_id = club_id, user_id = actor.id, "Member left club");
        Ok(())
    }

    /// Delete a club. Leader only. Future events are removed, started
    /// events archived in place; everything runs in one transaction.
    pub async fn delete_club(&self, club_id: i64, actor: &CurrentUser) -> Result<()> {
        let club = self
            .clubs
            .find_by_id(club_id)
            .await?
            .ok_or(GatherlyError::ClubNotFound { club_id })?;

        if club.leader_id != actor.id {
            return Err(GatherlyError::Conflict(
                "only the club leader may delete the club".to_string(),
            ));
        }

        debug!(club_id = club_id, "Deleting club with events");
        self.clubs.delete_with_events(club_id).await?;

        info!(club_id = club_id, "Club deleted");
        Ok(())
    }
}
