//! Club and membership models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::helpers::double_option;

/// Lifecycle state of a club membership request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "club_join_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClubJoinStatus {
    Applicant,
    Member,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Club {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub leader_id: i64,
    pub max_people: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ClubJoin {
    pub id: i64,
    pub club_id: i64,
    pub user_id: i64,
    pub status: ClubJoinStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Membership projection used in club listings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ClubMember {
    pub user_id: i64,
    pub status: ClubJoinStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateClubRequest {
    pub title: String,
    pub description: String,
    pub max_people: i32,
    pub member_ids: Vec<i64>,
}

/// Club update payload. Every field is optional, but an explicit JSON
/// `null` is rejected, so each is wrapped to keep absent and null apart.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateClubRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub leader_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub max_people: Option<Option<i32>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicantDecision {
    Accept,
    Reject,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HandleApplicantRequest {
    pub decision: ApplicantDecision,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClubMemberStatusQuery {
    pub status: ClubJoinStatus,
}

/// Repository-level data for club creation; all listed members are
/// persisted with MEMBER status.
#[derive(Debug, Clone)]
pub struct CreateClubData {
    pub title: String,
    pub description: String,
    pub leader_id: i64,
    pub max_people: i32,
    pub member_ids: Vec<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateClubData {
    pub title: Option<String>,
    pub description: Option<String>,
    pub leader_id: Option<i64>,
    pub max_people: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClubMemberDto {
    pub user_id: i64,
    pub status: ClubJoinStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClubDto {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub leader_id: i64,
    pub max_people: i32,
    pub members: Vec<ClubMemberDto>,
}

impl ClubDto {
    pub fn from_parts(club: Club, members: Vec<ClubMember>) -> Self {
        Self {
            id: club.id,
            title: club.title,
            description: club.description,
            leader_id: club.leader_id,
            max_people: club.max_people,
            members: members
                .into_iter()
                .map(|member| ClubMemberDto {
                    user_id: member.user_id,
                    status: member.status,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClubListDto {
    pub clubs: Vec<ClubDto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClubMemberListDto {
    pub members: Vec<ClubMemberDto>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_club_join_status_serde_names() {
        assert_eq!(
            serde_json::to_string(&ClubJoinStatus::Applicant).unwrap(),
            r#""APPLICANT""#
        );
        let status: ClubJoinStatus = serde_json::from_str(r#""MEMBER""#).unwrap();
        assert_eq!(status, ClubJoinStatus::Member);
    }

    #[test]
    fn test_update_club_request_distinguishes_null_from_absent() {
        let request: UpdateClubRequest =
            serde_json::from_str(r#"{"title": null, "max_people": 5}"#).unwrap();
        assert_eq!(request.title, Some(None));
        assert_eq!(request.description, None);
        assert_eq!(request.max_people, Some(Some(5)));
    }
}
