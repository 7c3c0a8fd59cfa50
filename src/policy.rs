//! Central authorization policy.
//!
//! Every protected handler asks this module instead of checking roles inline,
//! so the full permission matrix lives (and is tested) in one place.

use thiserror::Error;
use uuid::Uuid;

use crate::database::models::UserRole;
use crate::middleware::auth::AuthUser;

/// A privileged operation a caller may attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Create or delete a node of the category hierarchy
    ManageCategories,
    /// Upload a new content document
    UploadContent,
    /// Delete a content document owned by `owner`
    DeleteContent { owner: Uuid },
    /// List users through the admin surface
    ManageUsers,
    /// Delete the user account `target`
    DeleteUser { target: Uuid },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Denial {
    #[error("{0}")]
    NotPermitted(&'static str),

    #[error("cannot delete your own account")]
    SelfDeletion,
}

/// Decide whether `user` may perform `action`. Handlers convert a `Denial`
/// into the appropriate HTTP response via `ApiError`.
pub fn authorize(user: &AuthUser, action: Action) -> Result<(), Denial> {
    match action {
        Action::ManageCategories => match user.role {
            UserRole::Admin => Ok(()),
            _ => Err(Denial::NotPermitted("Admin access required")),
        },

        Action::UploadContent => match user.role {
            UserRole::Teacher | UserRole::Admin => Ok(()),
            UserRole::Student => Err(Denial::NotPermitted("Students cannot upload content")),
        },

        Action::DeleteContent { owner } => match user.role {
            UserRole::Admin => Ok(()),
            UserRole::Teacher if owner == user.id => Ok(()),
            UserRole::Teacher => {
                Err(Denial::NotPermitted("You can only delete your own content"))
            }
            UserRole::Student => Err(Denial::NotPermitted("Students cannot delete content")),
        },

        Action::ManageUsers => match user.role {
            UserRole::Admin => Ok(()),
            _ => Err(Denial::NotPermitted("Admin access required")),
        },

        Action::DeleteUser { target } => match user.role {
            UserRole::Admin if target == user.id => Err(Denial::SelfDeletion),
            UserRole::Admin => Ok(()),
            _ => Err(Denial::NotPermitted("Admin access required")),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: UserRole) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            username: format!("{}-1", role.as_str()),
            role,
        }
    }

    #[test]
    fn only_admins_manage_categories() {
        assert!(authorize(&user(UserRole::Admin), Action::ManageCategories).is_ok());
        assert!(authorize(&user(UserRole::Teacher), Action::ManageCategories).is_err());
        assert!(authorize(&user(UserRole::Student), Action::ManageCategories).is_err());
    }

    #[test]
    fn students_cannot_upload() {
        assert!(authorize(&user(UserRole::Teacher), Action::UploadContent).is_ok());
        assert!(authorize(&user(UserRole::Admin), Action::UploadContent).is_ok());
        assert_eq!(
            authorize(&user(UserRole::Student), Action::UploadContent),
            Err(Denial::NotPermitted("Students cannot upload content"))
        );
    }

    #[test]
    fn teachers_delete_only_their_own_content() {
        let teacher = user(UserRole::Teacher);
        assert!(authorize(&teacher, Action::DeleteContent { owner: teacher.id }).is_ok());
        assert_eq!(
            authorize(&teacher, Action::DeleteContent { owner: Uuid::new_v4() }),
            Err(Denial::NotPermitted("You can only delete your own content"))
        );
    }

    #[test]
    fn admins_delete_any_content_students_none() {
        let admin = user(UserRole::Admin);
        assert!(authorize(&admin, Action::DeleteContent { owner: Uuid::new_v4() }).is_ok());

        let student = user(UserRole::Student);
        assert!(
            authorize(&student, Action::DeleteContent { owner: student.id }).is_err()
        );
    }

    #[test]
    fn admin_self_deletion_is_a_distinct_denial() {
        let admin = user(UserRole::Admin);
        assert_eq!(
            authorize(&admin, Action::DeleteUser { target: admin.id }),
            Err(Denial::SelfDeletion)
        );
        assert!(authorize(&admin, Action::DeleteUser { target: Uuid::new_v4() }).is_ok());
        assert!(
            authorize(&user(UserRole::Teacher), Action::DeleteUser { target: Uuid::new_v4() })
                .is_err()
        );
    }
}
