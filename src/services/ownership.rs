use uuid::Uuid;

use crate::database::models::user::Role;
use crate::error::ApiError;
use crate::middleware::AuthUser;

/// Reusable authorization predicate: admins may mutate anything, everyone
/// else only records they own.
pub fn can_mutate(owner_id: Uuid, requester: &AuthUser) -> bool {
    requester.role == Role::Admin || owner_id == requester.id
}

/// Ownership rejections surface as 401
pub fn ensure_can_mutate(
    owner_id: Uuid,
    requester: &AuthUser,
    resource: &str,
) -> Result<(), ApiError> {
    if can_mutate(owner_id, requester) {
        return Ok(());
    }
    Err(ApiError::unauthorized(format!(
        "User {} is not authorized to modify this {}",
        requester.id, resource
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requester(id: Uuid, role: Role) -> AuthUser {
        AuthUser {
            id,
            name: "John".to_string(),
            email: "john@gmail.com".to_string(),
            role,
        }
    }

    #[test]
    fn owner_may_mutate() {
        let id = Uuid::new_v4();
        assert!(can_mutate(id, &requester(id, Role::Publisher)));
    }

    #[test]
    fn admin_may_mutate_any_record() {
        assert!(can_mutate(
            Uuid::new_v4(),
            &requester(Uuid::new_v4(), Role::Admin)
        ));
    }

    #[test]
    fn other_identities_are_rejected_with_401() {
        let err = ensure_can_mutate(
            Uuid::new_v4(),
            &requester(Uuid::new_v4(), Role::Publisher),
            "bootcamp",
        )
        .expect_err("non-owner must be rejected");
        assert_eq!(err.status_code(), 401);
    }
}
