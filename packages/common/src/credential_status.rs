#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Review status of a competition credential.
///
/// When the `sea-orm` feature is enabled, this enum can be used directly in SeaORM entities.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CredentialStatus {
    /// Submitted and waiting for an administrator.
    #[default]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "PENDING"))]
    Pending,
    /// Verified by an administrator.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "APPROVED"))]
    Approved,
    /// Turned down by an administrator.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "REJECTED"))]
    Rejected,
}

impl CredentialStatus {
    pub const ALL: &'static [CredentialStatus] = &[Self::Pending, Self::Approved, Self::Rejected];

    /// Returns true once a review decision has been recorded.
    pub fn is_reviewed(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Apply a review action. Only pending credentials can be reviewed.
    pub fn apply(self, action: ReviewAction) -> Option<CredentialStatus> {
        match self {
            Self::Pending => Some(action.outcome()),
            Self::Approved | Self::Rejected => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for CredentialStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an invalid status or action string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatusError {
    invalid: String,
    expected: String,
}

impl ParseStatusError {
    pub(crate) fn new(invalid: &str, expected: &[&str]) -> Self {
        Self {
            invalid: invalid.to_string(),
            expected: expected.join(", "),
        }
    }
}

impl fmt::Display for ParseStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid value '{}'. Valid values: {}",
            self.invalid, self.expected
        )
    }
}

impl std::error::Error for ParseStatusError {}

impl FromStr for CredentialStatus {
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

/// Administrator decision on a pending review.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewAction {
    Approve,
    Reject,
}

impl ReviewAction {
    /// The credential status this action produces.
    pub fn outcome(&self) -> CredentialStatus {
        match self {
            Self::Approve => CredentialStatus::Approved,
            Self::Reject => CredentialStatus::Rejected,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "APPROVE",
            Self::Reject => "REJECT",
        }
    }
}

impl fmt::Display for ReviewAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewAction {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "APPROVE" => Ok(Self::Approve),
            "REJECT" => Ok(Self::Reject),
            _ => Err(ParseStatusError::new(s, &["APPROVE", "REJECT"])),
        }
    }
}
