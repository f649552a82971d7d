//! Club lifecycle and membership integration tests

mod helpers;

use assert_matches::assert_matches;
use serial_test::serial;

use gatherly::models::club::{ApplicantDecision, ClubJoinStatus, UpdateClubRequest};
use gatherly::services::auth::CurrentUser;
use gatherly::utils::errors::GatherlyError;

use helpers::database_helper::TestContext;
use helpers::test_data;

#[tokio::test]
#[serial]
async fn create_club_persists_all_members_as_member_rows() {
    let ctx = TestContext::new().await;
    let leader = test_data::create_user(&ctx).await;
    let friend = test_data::create_user(&ctx).await;

    let club = test_data::create_club(&ctx, leader.id, vec![leader.id, friend.id], 5).await;

    assert_eq!(club.leader_id, leader.id);
    assert_eq!(club.members.len(), 2);
    assert!(club
        .members
        .iter()
        .all(|member| member.status == ClubJoinStatus::Member));

    // the leader invariant: always among the MEMBER rows
    let members = ctx
        .services
        .club_service
        .get_members_by_status(club.id, ClubJoinStatus::Member)
        .await
        .unwrap();
    assert!(members.iter().any(|member| member.user_id == leader.id));
}

#[tokio::test]
#[serial]
async fn create_club_rejects_unknown_member_ids() {
    let ctx = TestContext::new().await;
    let leader = test_data::create_user(&ctx).await;

    let result = ctx
        .services
        .club_service
        .create_club(
            gatherly::models::club::CreateClubRequest {
                title: "ghost club".to_string(),
                description: "members do not exist".to_string(),
                max_people: 5,
                member_ids: vec![leader.id, 999_999],
            },
            &CurrentUser { id: leader.id },
        )
        .await;

    assert_matches!(result, Err(GatherlyError::InvalidInput(_)));
}

#[tokio::test]
#[serial]
async fn create_club_requires_leader_among_members() {
    let ctx = TestContext::new().await;
    let leader = test_data::create_user(&ctx).await;
    let other = test_data::create_user(&ctx).await;

    let result = ctx
        .services
        .club_service
        .create_club(
            gatherly::models::club::CreateClubRequest {
                title: "leaderless".to_string(),
                description: "the actor is missing from the member list".to_string(),
                max_people: 5,
                member_ids: vec![other.id],
            },
            &CurrentUser { id: leader.id },
        )
        .await;

    assert_matches!(result, Err(GatherlyError::InvalidInput(_)));
}

#[tokio::test]
#[serial]
async fn applicant_acceptance_respects_capacity() {
    let ctx = TestContext::new().await;
    let leader = test_data::create_user(&ctx).await;
    let user_b = test_data::create_user(&ctx).await;
    let user_c = test_data::create_user(&ctx).await;
    let user_d = test_data::create_user(&ctx).await;

    // club with max_people = 2 and the leader as sole member
    let club = test_data::create_club(&ctx, leader.id, vec![leader.id], 2).await;
    let leader_actor = CurrentUser { id: leader.id };

    // B, C and D apply while there is still room
    for applicant in [&user_b, &user_c, &user_d] {
        ctx.services
            .club_service
            .join_club(club.id, &CurrentUser { id: applicant.id })
            .await
            .unwrap();
    }

    // accepting B fills the club
    ctx.services
        .club_service
        .handle_applicant(club.id, user_b.id, ApplicantDecision::Accept, &leader_actor)
        .await
        .unwrap();
    assert_eq!(ctx.db.clubs.member_count(club.id).await.unwrap(), 2);
    assert_eq!(
        ctx.db.clubs.member_status(club.id, user_b.id).await.unwrap(),
        Some(ClubJoinStatus::Member)
    );

    // rejecting is still possible once full
    ctx.services
        .club_service
        .handle_applicant(club.id, user_c.id, ApplicantDecision::Reject, &leader_actor)
        .await
        .unwrap();
    assert_eq!(
        ctx.db.clubs.member_status(club.id, user_c.id).await.unwrap(),
        Some(ClubJoinStatus::Rejected)
    );

    // accepting another applicant into the full club is a conflict
    let result = ctx
        .services
        .club_service
        .handle_applicant(club.id, user_d.id, ApplicantDecision::Accept, &leader_actor)
        .await;
    assert_matches!(result, Err(GatherlyError::Conflict(_)));
    assert_eq!(ctx.db.clubs.member_count(club.id).await.unwrap(), 2);

    // and new applications are rejected while the club stays full
    let user_e = test_data::create_user(&ctx).await;
    let result = ctx
        .services
        .club_service
        .join_club(club.id, &CurrentUser { id: user_e.id })
        .await;
    assert_matches!(result, Err(GatherlyError::Conflict(_)));
}

#[tokio::test]
#[serial]
async fn only_the_leader_decides_on_applicants() {
    let ctx = TestContext::new().await;
    let leader = test_data::create_user(&ctx).await;
    let member = test_data::create_user(&ctx).await;
    let applicant = test_data::create_user(&ctx).await;

    let club = test_data::create_club(&ctx, leader.id, vec![leader.id, member.id], 5).await;
    ctx.services
        .club_service
        .join_club(club.id, &CurrentUser { id: applicant.id })
        .await
        .unwrap();

    let result = ctx
        .services
        .club_service
        .handle_applicant(
            club.id,
            applicant.id,
            ApplicantDecision::Accept,
            &CurrentUser { id: member.id },
        )
        .await;

    assert_matches!(result, Err(GatherlyError::InvalidInput(_)));
}

#[tokio::test]
#[serial]
async fn handling_a_non_applicant_is_a_conflict() {
    let ctx = TestContext::new().await;
    let leader = test_data::create_user(&ctx).await;
    let member = test_data::create_user(&ctx).await;

    let club = test_data::create_club(&ctx, leader.id, vec![leader.id, member.id], 5).await;

    // member is already MEMBER, not APPLICANT
    let result = ctx
        .services
        .club_service
        .handle_applicant(
            club.id,
            member.id,
            ApplicantDecision::Accept,
            &CurrentUser { id: leader.id },
        )
        .await;

    assert_matches!(result, Err(GatherlyError::Conflict(_)));
}

#[tokio::test]
#[serial]
async fn join_club_twice_is_a_conflict() {
    let ctx = TestContext::new().await;
    let leader = test_data::create_user(&ctx).await;
    let user = test_data::create_user(&ctx).await;

    let club = test_data::create_club(&ctx, leader.id, vec![leader.id], 5).await;
    let actor = CurrentUser { id: user.id };

    ctx.services.club_service.join_club(club.id, &actor).await.unwrap();
    let result = ctx.services.club_service.join_club(club.id, &actor).await;

    assert_matches!(result, Err(GatherlyError::Conflict(_)));
}

#[tokio::test]
#[serial]
async fn join_full_club_is_a_conflict() {
    let ctx = TestContext::new().await;
    let leader = test_data::create_user(&ctx).await;
    let user = test_data::create_user(&ctx).await;

    let club = test_data::create_club(&ctx, leader.id, vec![leader.id], 1).await;

    let result = ctx
        .services
        .club_service
        .join_club(club.id, &CurrentUser { id: user.id })
        .await;

    assert_matches!(result, Err(GatherlyError::Conflict(_)));
}

#[tokio::test]
#[serial]
async fn update_club_rules() {
    let ctx = TestContext::new().await;
    let leader = test_data::create_user(&ctx).await;
    let member = test_data::create_user(&ctx).await;
    let outsider = test_data::create_user(&ctx).await;

    let club = test_data::create_club(&ctx, leader.id, vec![leader.id, member.id], 5).await;
    let leader_actor = CurrentUser { id: leader.id };

    // only the leader may update
    let result = ctx
        .services
        .club_service
        .update_club(
            club.id,
            UpdateClubRequest {
                title: Some(Some("renamed".to_string())),
                ..Default::default()
            },
            &CurrentUser { id: member.id },
        )
        .await;
    assert_matches!(result, Err(GatherlyError::Conflict(_)));

    // explicit null title is invalid
    let result = ctx
        .services
        .club_service
        .update_club(
            club.id,
            UpdateClubRequest {
                title: Some(None),
                ..Default::default()
            },
            &leader_actor,
        )
        .await;
    assert_matches!(result, Err(GatherlyError::InvalidInput(_)));

    // a non-member cannot become the leader
    let result = ctx
        .services
        .club_service
        .update_club(
            club.id,
            UpdateClubRequest {
                leader_id: Some(Some(outsider.id)),
                ..Default::default()
            },
            &leader_actor,
        )
        .await;
    assert_matches!(result, Err(GatherlyError::InvalidInput(_)));

    // max_people below the current member count is a conflict
    let result = ctx
        .services
        .club_service
        .update_club(
            club.id,
            UpdateClubRequest {
                max_people: Some(Some(1)),
                ..Default::default()
            },
            &leader_actor,
        )
        .await;
    assert_matches!(result, Err(GatherlyError::Conflict(_)));

    // handing leadership to a member works
    let updated = ctx
        .services
        .club_service
        .update_club(
            club.id,
            UpdateClubRequest {
                title: Some(Some("board games".to_string())),
                leader_id: Some(Some(member.id)),
                ..Default::default()
            },
            &leader_actor,
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "board games");
    assert_eq!(updated.leader_id, member.id);
}

#[tokio::test]
#[serial]
async fn leader_cannot_leave_and_non_member_cannot_leave() {
    let ctx = TestContext::new().await;
    let leader = test_data::create_user(&ctx).await;
    let outsider = test_data::create_user(&ctx).await;

    let club = test_data::create_club(&ctx, leader.id, vec![leader.id], 5).await;

    let result = ctx
        .services
        .club_service
        .leave_club(club.id, &CurrentUser { id: leader.id })
        .await;
    assert_matches!(result, Err(GatherlyError::Conflict(_)));

    let result = ctx
        .services
        .club_service
        .leave_club(club.id, &CurrentUser { id: outsider.id })
        .await;
    assert_matches!(result, Err(GatherlyError::Conflict(_)));
}

#[tokio::test]
#[serial]
async fn leaving_a_club_cascades_over_future_events() {
    let ctx = TestContext::new().await;
    let leader = test_data::create_user(&ctx).await;
    let member = test_data::create_user(&ctx).await;

    let club = test_data::create_club(&ctx, leader.id, vec![leader.id, member.id], 5).await;

    // the member hosts a future club event and attends the leader's
    let hosted = test_data::create_future_event(&ctx, member.id, Some(club.id), 120, 60, 10).await;
    let leaders_event =
        test_data::create_future_event(&ctx, leader.id, Some(club.id), 180, 60, 10).await;
    test_data::join_event_raw(&ctx, leaders_event.id, member.id).await;

    ctx.services
        .club_service
        .leave_club(club.id, &CurrentUser { id: member.id })
        .await
        .unwrap();

    // hosted future event is gone entirely
    assert!(ctx.db.events.find_by_id(hosted.id).await.unwrap().is_none());
    assert!(ctx.db.events.city_ids(hosted.id).await.unwrap().is_empty());

    // attendance at the other future event is gone, the event survives
    assert!(ctx.db.events.find_by_id(leaders_event.id).await.unwrap().is_some());
    assert!(!ctx
        .db
        .events
        .is_joined(leaders_event.id, member.id)
        .await
        .unwrap());

    // the membership row itself is gone
    assert_eq!(
        ctx.db.clubs.member_status(club.id, member.id).await.unwrap(),
        None
    );
}

#[tokio::test]
#[serial]
async fn deleting_a_club_removes_future_events_and_archives_started_ones() {
    let ctx = TestContext::new().await;
    let leader = test_data::create_user(&ctx).await;
    let member = test_data::create_user(&ctx).await;

    let club = test_data::create_club(&ctx, leader.id, vec![leader.id, member.id], 5).await;

    let future_event =
        test_data::create_future_event(&ctx, leader.id, Some(club.id), 120, 60, 10).await;
    // started an hour ago, still running
    let started_event_id =
        test_data::insert_event_raw(&ctx, leader.id, Some(club.id), -60, 60, 10, false).await;
    test_data::join_event_raw(&ctx, started_event_id, member.id).await;

    // only the leader may delete
    let result = ctx
        .services
        .club_service
        .delete_club(club.id, &CurrentUser { id: member.id })
        .await;
    assert_matches!(result, Err(GatherlyError::Conflict(_)));

    ctx.services
        .club_service
        .delete_club(club.id, &CurrentUser { id: leader.id })
        .await
        .unwrap();

    // the future event and its rows are gone
    assert!(ctx
        .db
        .events
        .find_by_id(future_event.id)
        .await
        .unwrap()
        .is_none());

    // the started event is archived in place with club_id nulled
    let archived = ctx
        .db
        .events
        .find_by_id(started_event_id)
        .await
        .unwrap()
        .expect("started event must survive as an archived record");
    assert!(archived.archived);
    assert_eq!(archived.club_id, None);

    // club and membership rows are gone
    assert!(ctx.db.clubs.find_by_id(club.id).await.unwrap().is_none());

    // the archived event stays visible to its past attendees
    let dto = ctx
        .services
        .event_service
        .get_event(started_event_id, &CurrentUser { id: member.id })
        .await
        .unwrap();
    assert!(dto.archived);

    // and hidden from strangers
    let stranger = test_data::create_user(&ctx).await;
    let result = ctx
        .services
        .event_service
        .get_event(started_event_id, &CurrentUser { id: stranger.id })
        .await;
    assert_matches!(result, Err(GatherlyError::Conflict(_)));
}

#[tokio::test]
#[serial]
async fn soft_deleted_users_are_excluded_from_member_listings() {
    let ctx = TestContext::new().await;
    let leader = test_data::create_user(&ctx).await;
    let member = test_data::create_user(&ctx).await;

    let club = test_data::create_club(&ctx, leader.id, vec![leader.id, member.id], 5).await;
    assert_eq!(ctx.db.clubs.member_count(club.id).await.unwrap(), 2);

    ctx.services
        .user_service
        .delete_user(member.id, &CurrentUser { id: member.id })
        .await
        .unwrap();

    assert_eq!(ctx.db.clubs.member_count(club.id).await.unwrap(), 1);
    let members = ctx
        .services
        .club_service
        .get_members_by_status(club.id, ClubJoinStatus::Member)
        .await
        .unwrap();
    assert!(members.iter().all(|m| m.user_id != member.id));
}
