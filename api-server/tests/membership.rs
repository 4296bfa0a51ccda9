//! Membership and organization tests over an in-memory database

use api_server::core::ServerState;
use api_server::services::RecordingMailSender;
use api_server::tenancy::MembershipService;
use shared::error::ErrorCode;
use shared::models::Role;
use std::sync::{Arc, Mutex};

async fn state() -> ServerState {
    ServerState::for_tests().await.expect("state")
}

#[tokio::test]
async fn create_organization_grants_owner_membership() {
    let state = state().await;
    let org = state
        .membership()
        .create_organization("user-1", "Acme", "Acme")
        .await
        .expect("organization");

    assert_eq!(org.slug, "acme");
    assert_eq!(org.invite_code.len(), 6);

    let org_id = org.id.unwrap().to_string();
    let membership = state
        .membership()
        .require_member("user-1", &org_id)
        .await
        .expect("membership");
    assert_eq!(membership.role, Role::Owner);
}

#[tokio::test]
async fn duplicate_slug_is_rejected() {
    let state = state().await;
    state
        .membership()
        .create_organization("user-1", "Acme", "acme")
        .await
        .expect("organization");

    let err = state
        .membership()
        .create_organization("user-2", "Other Acme", "acme")
        .await
        .expect_err("should conflict");
    assert_eq!(err.code, ErrorCode::SlugExists);
}

#[tokio::test]
async fn empty_name_or_slug_is_rejected() {
    let state = state().await;
    let err = state
        .membership()
        .create_organization("user-1", "  ", "acme")
        .await
        .expect_err("should fail");
    assert_eq!(err.code, ErrorCode::ValidationFailed);
    assert_eq!(err.message, "Name and Slug are required");
}

#[tokio::test]
async fn join_by_invite_code() {
    let state = state().await;
    let org = state
        .membership()
        .create_organization("owner-1", "Acme", "acme")
        .await
        .expect("organization");

    let joined = state
        .membership()
        .join_organization("user-2", &org.invite_code)
        .await
        .expect("join");
    assert_eq!(joined.slug, "acme");

    let org_id = org.id.unwrap().to_string();
    let membership = state
        .membership()
        .require_member("user-2", &org_id)
        .await
        .expect("membership");
    assert_eq!(membership.role, Role::Member);
}

#[tokio::test]
async fn unknown_invite_code_is_rejected() {
    let state = state().await;
    let err = state
        .membership()
        .join_organization("user-2", "ZZZZZZ")
        .await
        .expect_err("should fail");
    assert_eq!(err.code, ErrorCode::InviteCodeInvalid);
    assert_eq!(err.message, "Invalid Invite Code");
}

#[tokio::test]
async fn joining_twice_conflicts() {
    let state = state().await;
    let org = state
        .membership()
        .create_organization("owner-1", "Acme", "acme")
        .await
        .expect("organization");

    state
        .membership()
        .join_organization("user-2", &org.invite_code)
        .await
        .expect("first join");
    let err = state
        .membership()
        .join_organization("user-2", &org.invite_code)
        .await
        .expect_err("second join should conflict");
    assert_eq!(err.code, ErrorCode::MembershipExists);
}

#[tokio::test]
async fn non_member_is_denied() {
    let state = state().await;
    let org = state
        .membership()
        .create_organization("owner-1", "Acme", "acme")
        .await
        .expect("organization");
    let org_id = org.id.unwrap().to_string();

    let err = state
        .membership()
        .require_member("stranger", &org_id)
        .await
        .expect_err("should be denied");
    assert_eq!(err.code, ErrorCode::NotOrganizationMember);
    assert_eq!(err.message, "You are not a member of this organization");
}

#[tokio::test]
async fn member_cannot_manage_members() {
    let state = state().await;
    let org = state
        .membership()
        .create_organization("owner-1", "Acme", "acme")
        .await
        .expect("organization");
    state
        .membership()
        .join_organization("user-2", &org.invite_code)
        .await
        .expect("join");

    let org_id = org.id.unwrap().to_string();
    let err = state
        .membership()
        .require_manager("user-2", &org_id)
        .await
        .expect_err("member is not a manager");
    assert_eq!(err.code, ErrorCode::PermissionDenied);
}

#[tokio::test]
async fn add_member_sends_notification() {
    let state = state().await;
    let org = state
        .membership()
        .create_organization("owner-1", "Acme", "acme")
        .await
        .expect("organization");
    let org_id = org.id.unwrap().to_string();

    let membership = state
        .membership()
        .add_member("owner-1", &org_id, "user-2", "user2@example.com", Role::Admin)
        .await
        .expect("add member");
    assert_eq!(membership.role, Role::Admin);

    // Adding the same user again conflicts
    let err = state
        .membership()
        .add_member("owner-1", &org_id, "user-2", "user2@example.com", Role::Member)
        .await
        .expect_err("duplicate membership");
    assert_eq!(err.code, ErrorCode::MembershipExists);
}

#[tokio::test]
async fn failed_notification_mail_surfaces_as_mail_error() {
    let state = state().await;
    let service = MembershipService::new(
        state.get_db(),
        Arc::new(RecordingMailSender {
            sent: Mutex::new(Vec::new()),
            fail_sends: true,
        }),
    );
    let org = service
        .create_organization("owner-1", "Acme", "acme")
        .await
        .expect("organization");
    let org_id = org.id.unwrap().to_string();

    let err = service
        .add_member("owner-1", &org_id, "user-2", "user2@example.com", Role::Member)
        .await
        .expect_err("mail failure should surface");
    assert_eq!(err.code, ErrorCode::MailFailed);

    // The membership was created before the notification was attempted
    service
        .require_member("user-2", &org_id)
        .await
        .expect("membership exists despite the failed mail");
}

#[tokio::test]
async fn self_removal_is_rejected() {
    let state = state().await;
    let org = state
        .membership()
        .create_organization("owner-1", "Acme", "acme")
        .await
        .expect("organization");
    let org_id = org.id.unwrap().to_string();

    let members = state
        .membership()
        .list_members("owner-1", &org_id)
        .await
        .expect("members");
    let own_membership_id = members[0].id.clone().unwrap().to_string();

    let err = state
        .membership()
        .remove_member("owner-1", &org_id, &own_membership_id)
        .await
        .expect_err("self removal");
    assert_eq!(err.code, ErrorCode::ValidationFailed);
    assert_eq!(err.message, "You cannot remove yourself using this feature.");
}

#[tokio::test]
async fn admin_cannot_remove_owner() {
    let state = state().await;
    let org = state
        .membership()
        .create_organization("owner-1", "Acme", "acme")
        .await
        .expect("organization");
    let org_id = org.id.unwrap().to_string();

    state
        .membership()
        .add_member("owner-1", &org_id, "admin-1", "admin@example.com", Role::Admin)
        .await
        .expect("add admin");

    let members = state
        .membership()
        .list_members("owner-1", &org_id)
        .await
        .expect("members");
    let owner_membership_id = members
        .iter()
        .find(|m| m.role == Role::Owner)
        .and_then(|m| m.id.clone())
        .unwrap()
        .to_string();

    let err = state
        .membership()
        .remove_member("admin-1", &org_id, &owner_membership_id)
        .await
        .expect_err("admin removing owner");
    assert_eq!(err.code, ErrorCode::PermissionDenied);
    assert_eq!(err.message, "Admins cannot remove Owners");
}

#[tokio::test]
async fn owner_can_remove_member() {
    let state = state().await;
    let org = state
        .membership()
        .create_organization("owner-1", "Acme", "acme")
        .await
        .expect("organization");
    state
        .membership()
        .join_organization("user-2", &org.invite_code)
        .await
        .expect("join");

    let org_id = org.id.unwrap().to_string();
    let members = state
        .membership()
        .list_members("owner-1", &org_id)
        .await
        .expect("members");
    let target = members
        .iter()
        .find(|m| m.user == "user-2")
        .and_then(|m| m.id.clone())
        .unwrap()
        .to_string();

    state
        .membership()
        .remove_member("owner-1", &org_id, &target)
        .await
        .expect("remove");

    let err = state
        .membership()
        .require_member("user-2", &org_id)
        .await
        .expect_err("membership gone");
    assert_eq!(err.code, ErrorCode::NotOrganizationMember);
}

#[tokio::test]
async fn list_for_user_reports_roles() {
    let state = state().await;
    let org_a = state
        .membership()
        .create_organization("user-1", "Acme", "acme")
        .await
        .expect("org a");
    state
        .membership()
        .create_organization("someone-else", "Beta", "beta")
        .await
        .expect("org b");
    state
        .membership()
        .join_organization(
            "user-1",
            &state
                .membership()
                .list_for_user("someone-else")
                .await
                .expect("orgs")[0]
                .0
                .invite_code,
        )
        .await
        .expect("join");

    let mine = state
        .membership()
        .list_for_user("user-1")
        .await
        .expect("orgs");
    assert_eq!(mine.len(), 2);
    let acme = mine.iter().find(|(o, _)| o.slug == "acme").unwrap();
    assert_eq!(acme.1, Role::Owner);
    let beta = mine.iter().find(|(o, _)| o.slug == "beta").unwrap();
    assert_eq!(beta.1, Role::Member);

    let _ = org_a;
}
