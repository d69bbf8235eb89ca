pub mod account;
pub mod competition;
pub mod credential;
pub mod notification;

pub use account::AccountService;
pub use competition::CompetitionService;
pub use credential::CredentialService;
pub use notification::NotificationService;

use crate::error::AppError;

/// Permission names granted through `role_permission`.
pub mod permissions {
    pub const CREDENTIAL_SUBMIT: &str = "credential:submit";
    pub const CREDENTIAL_REVIEW: &str = "credential:review";
    pub const COMPETITION_SUBMIT: &str = "competition:submit";
    pub const COMPETITION_REVIEW: &str = "competition:review";
    pub const COMPETITION_MANAGE: &str = "competition:manage";
}

/// The caller on whose behalf a service operation runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: i32,
    pub permissions: Vec<String>,
}

impl Actor {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }

    pub fn require_permission(&self, permission: &str) -> Result<(), AppError> {
        if self.has_permission(permission) {
            Ok(())
        } else {
            Err(AppError::PermissionDenied)
        }
    }

    /// Whether the caller may see every credential of `owner_id`,
    /// not only approved ones.
    pub fn sees_all_credentials_of(&self, owner_id: i32) -> bool {
        self.id == owner_id || self.has_permission(permissions::CREDENTIAL_REVIEW)
    }
}
