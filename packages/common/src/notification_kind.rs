#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::credential_status::{CredentialStatus, ReviewAction};

/// Tag describing what a notification announces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    /// A participant claimed a credential for a competition the recipient submitted.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "CREDENTIAL_SUBMITTED"))]
    CredentialSubmitted,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "CREDENTIAL_APPROVED"))]
    CredentialApproved,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "CREDENTIAL_REJECTED"))]
    CredentialRejected,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "CREDENTIAL_DELETED"))]
    CredentialDeleted,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "COMPETITION_APPROVED"))]
    CompetitionApproved,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "COMPETITION_REJECTED"))]
    CompetitionRejected,
}

impl NotificationKind {
    /// Notification announcing the outcome of a credential review.
    pub fn for_credential_review(action: ReviewAction) -> Self {
        match action.outcome() {
            CredentialStatus::Rejected => Self::CredentialRejected,
            _ => Self::CredentialApproved,
        }
    }

    /// Notification announcing the outcome of a competition review.
    pub fn for_competition_review(action: ReviewAction) -> Self {
        match action {
            ReviewAction::Approve => Self::CompetitionApproved,
            ReviewAction::Reject => Self::CompetitionRejected,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CredentialSubmitted => "CREDENTIAL_SUBMITTED",
            Self::CredentialApproved => "CREDENTIAL_APPROVED",
            Self::CredentialRejected => "CREDENTIAL_REJECTED",
            Self::CredentialDeleted => "CREDENTIAL_DELETED",
            Self::CompetitionApproved => "COMPETITION_APPROVED",
            Self::CompetitionRejected => "COMPETITION_REJECTED",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
