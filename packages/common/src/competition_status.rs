#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::credential_status::ParseStatusError;

/// Approval and lifecycle state of a competition.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompetitionStatus {
    /// Being prepared by its organizer, not yet visible to reviewers.
    #[default]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "DRAFT"))]
    Draft,
    /// Waiting for an administrator.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "SUBMITTED"))]
    Submitted,
    /// Approved and open for credentials.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "ACCEPTED"))]
    Accepted,
    /// Currently running, still open for credentials.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "ONGOING"))]
    Ongoing,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "COMPLETED"))]
    Completed,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "REJECTED"))]
    Rejected,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "CANCELLED"))]
    Cancelled,
}

impl CompetitionStatus {
    pub const ALL: &'static [CompetitionStatus] = &[
        Self::Draft,
        Self::Submitted,
        Self::Accepted,
        Self::Ongoing,
        Self::Completed,
        Self::Rejected,
        Self::Cancelled,
    ];

    /// Whether participants may submit credentials against this competition.
    pub fn accepts_participants(&self) -> bool {
        matches!(self, Self::Accepted | Self::Ongoing)
    }

    /// Whether no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Rejected | Self::Cancelled)
    }

    /// Allowed lifecycle transitions.
    pub fn can_transition_to(&self, next: CompetitionStatus) -> bool {
        use CompetitionStatus::*;
        matches!(
            (self, next),
            (Draft, Submitted)
                | (Draft, Cancelled)
                | (Submitted, Accepted)
                | (Submitted, Rejected)
                | (Accepted, Ongoing)
                | (Accepted, Cancelled)
                | (Ongoing, Completed)
                | (Ongoing, Cancelled)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Submitted => "SUBMITTED",
            Self::Accepted => "ACCEPTED",
            Self::Ongoing => "ONGOING",
            Self::Completed => "COMPLETED",
            Self::Rejected => "REJECTED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for CompetitionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompetitionStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                ParseStatusError::new(s, &Self::ALL.iter().map(|s| s.as_str()).collect::<Vec<_>>())
            })
    }
}
