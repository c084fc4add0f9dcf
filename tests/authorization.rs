// Ownership guard and role gate behavior through the public surface.

use uuid::Uuid;

use bootcamp_api::database::models::user::Role;
use bootcamp_api::middleware::{require_role, AuthUser};
use bootcamp_api::services::ownership;

fn requester(id: Uuid, role: Role) -> AuthUser {
    AuthUser {
        id,
        name: "Jane".to_string(),
        email: "jane@devworks.com".to_string(),
        role,
    }
}

#[test]
fn owner_and_admin_may_mutate_anyone_else_is_rejected() {
    let owner_id = Uuid::new_v4();

    assert!(ownership::can_mutate(
        owner_id,
        &requester(owner_id, Role::Publisher)
    ));
    assert!(ownership::can_mutate(
        owner_id,
        &requester(Uuid::new_v4(), Role::Admin)
    ));
    assert!(!ownership::can_mutate(
        owner_id,
        &requester(Uuid::new_v4(), Role::Publisher)
    ));
    assert!(!ownership::can_mutate(
        owner_id,
        &requester(Uuid::new_v4(), Role::User)
    ));
}

#[test]
fn ownership_rejection_is_401() {
    let err = ownership::ensure_can_mutate(
        Uuid::new_v4(),
        &requester(Uuid::new_v4(), Role::User),
        "review",
    )
    .expect_err("non-owner must be rejected");
    assert_eq!(err.status_code(), 401);
}

#[test]
fn role_gate_rejection_is_403() {
    let err = require_role(&requester(Uuid::new_v4(), Role::User), &[Role::Admin])
        .expect_err("plain user is not an admin");
    assert_eq!(err.status_code(), 403);

    assert!(require_role(
        &requester(Uuid::new_v4(), Role::Admin),
        &[Role::Publisher, Role::Admin]
    )
    .is_ok());
}
