//! Role-scoped access policy.
//!
//! One explicit decision function per concern instead of role-string checks
//! scattered through handlers. Callers check existence first (missing rows
//! are 404), then call `ensure_read`/`ensure_write` (403 on denial), so a
//! caller can only be unable to distinguish "forbidden" from "missing" when
//! the resource truly does not exist.

use uuid::Uuid;

use crate::errors::AppError;
use crate::middleware::auth::CurrentUser;
use crate::models::user::UserRole;

/// Row filter applied to list queries, mirroring the detail-read policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListScope {
    /// Admin: no filter.
    All,
    /// Parent with a family: rows owned by the user or shared with the family.
    OwnerOrFamily { owner_id: Uuid, family_id: Uuid },
    /// Everyone else (including a parent without a family): own rows only.
    Owner { owner_id: Uuid },
}

impl ListScope {
    /// Bind values for the shared SQL filter
    /// `($1 OR owner_id = $2 OR (family_id IS NOT NULL AND family_id = $3))`.
    pub fn binds(&self) -> (bool, Uuid, Option<Uuid>) {
        match *self {
            ListScope::All => (true, Uuid::nil(), None),
            ListScope::OwnerOrFamily {
                owner_id,
                family_id,
            } => (false, owner_id, Some(family_id)),
            ListScope::Owner { owner_id } => (false, owner_id, None),
        }
    }
}

/// Scope for the caller's list queries.
pub fn list_scope(user: &CurrentUser) -> ListScope {
    match (user.role, user.family_id) {
        (UserRole::Admin, _) => ListScope::All,
        (UserRole::Parent, Some(family_id)) => ListScope::OwnerOrFamily {
            owner_id: user.id,
            family_id,
        },
        // A parent without a family fails closed to ownership only.
        _ => ListScope::Owner { owner_id: user.id },
    }
}

/// May the caller read a resource owned by `owner_id`, optionally shared with
/// `resource_family`?
pub fn can_read(user: &CurrentUser, owner_id: Uuid, resource_family: Option<Uuid>) -> bool {
    if user.role == UserRole::Admin || owner_id == user.id {
        return true;
    }
    if user.role == UserRole::Parent {
        if let (Some(own_family), Some(shared_family)) = (user.family_id, resource_family) {
            return own_family == shared_family;
        }
    }
    false
}

/// May the caller mutate a resource owned by `owner_id`? Ownership only,
/// plus the admin override — family membership never grants writes.
pub fn can_write(user: &CurrentUser, owner_id: Uuid) -> bool {
    user.role == UserRole::Admin || owner_id == user.id
}

pub fn ensure_read(
    user: &CurrentUser,
    owner_id: Uuid,
    resource_family: Option<Uuid>,
) -> Result<(), AppError> {
    if can_read(user, owner_id, resource_family) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You do not have access to this resource".to_string(),
        ))
    }
}

pub fn ensure_write(user: &CurrentUser, owner_id: Uuid) -> Result<(), AppError> {
    if can_write(user, owner_id) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You are not allowed to modify this resource".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: UserRole, family_id: Option<Uuid>) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            username: "caller".to_string(),
            role,
            family_id,
        }
    }

    #[test]
    fn admin_reads_and_writes_everything() {
        let admin = user(UserRole::Admin, None);
        let other = Uuid::new_v4();
        assert!(can_read(&admin, other, None));
        assert!(can_write(&admin, other));
        assert_eq!(list_scope(&admin), ListScope::All);
    }

    #[test]
    fn owner_reads_and_writes_own_resource() {
        let member = user(UserRole::Member, None);
        assert!(can_read(&member, member.id, None));
        assert!(can_write(&member, member.id));
        assert!(!can_read(&member, Uuid::new_v4(), None));
        assert!(!can_write(&member, Uuid::new_v4()));
    }

    #[test]
    fn parent_reads_family_resources() {
        let family = Uuid::new_v4();
        let parent = user(UserRole::Parent, Some(family));
        let other_owner = Uuid::new_v4();
        assert!(can_read(&parent, other_owner, Some(family)));
        assert!(!can_read(&parent, other_owner, Some(Uuid::new_v4())));
        assert!(!can_read(&parent, other_owner, None));
    }

    #[test]
    fn parent_without_family_fails_closed() {
        let parent = user(UserRole::Parent, None);
        let other_owner = Uuid::new_v4();
        assert!(!can_read(&parent, other_owner, Some(Uuid::new_v4())));
        assert!(ensure_read(&parent, other_owner, Some(Uuid::new_v4()))
            .unwrap_err()
            .is_forbidden());
        assert_eq!(
            list_scope(&parent),
            ListScope::Owner {
                owner_id: parent.id
            }
        );
    }

    #[test]
    fn family_membership_never_grants_writes() {
        let family = Uuid::new_v4();
        let parent = user(UserRole::Parent, Some(family));
        let other_owner = Uuid::new_v4();
        assert!(can_read(&parent, other_owner, Some(family)));
        assert!(!can_write(&parent, other_owner));
        assert!(ensure_write(&parent, other_owner).unwrap_err().is_forbidden());
    }

    #[test]
    fn parent_list_scope_includes_family() {
        let family = Uuid::new_v4();
        let parent = user(UserRole::Parent, Some(family));
        assert_eq!(
            list_scope(&parent),
            ListScope::OwnerOrFamily {
                owner_id: parent.id,
                family_id: family
            }
        );
    }
}
